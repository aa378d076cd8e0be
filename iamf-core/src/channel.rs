//! Channel labels and per-layer channel counts for scalable layouts.
//!
//! Scalable channel audio stacks cumulative layers, each layer a superset of
//! the previous. Labels cover both the channels as authored and the demixed
//! counterparts synthesized when reconstructing a lower layer from a higher
//! one.

use crate::error::{CoreError, Result};
use std::fmt;

/// A channel in a scalable channel layout.
///
/// The `Demixed*` variants name channels synthesized by the demixer when a
/// lower layer is reconstructed from a higher one; all other variants name
/// channels as they appear in the input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelLabel {
    /// Mono.
    Mono,
    /// Left, stereo layout.
    L2,
    /// Right, stereo layout.
    R2,
    /// Centre.
    Centre,
    /// Low frequency effects.
    Lfe,
    /// Left, 3.1.x layout.
    L3,
    /// Right, 3.1.x layout.
    R3,
    /// Left, 5.1.x layout.
    L5,
    /// Right, 5.1.x layout.
    R5,
    /// Left surround, 5.1.x layout.
    Ls5,
    /// Right surround, 5.1.x layout.
    Rs5,
    /// Left, 7.1.x layout.
    L7,
    /// Right, 7.1.x layout.
    R7,
    /// Left side surround, 7.1.x layout.
    Lss7,
    /// Right side surround, 7.1.x layout.
    Rss7,
    /// Left rear surround, 7.1.x layout.
    Lrs7,
    /// Right rear surround, 7.1.x layout.
    Rrs7,
    /// Left top front, two-height layout.
    Ltf2,
    /// Right top front, two-height layout.
    Rtf2,
    /// Left top front, 3.1.2 layout.
    Ltf3,
    /// Right top front, 3.1.2 layout.
    Rtf3,
    /// Left top front, four-height layout.
    Ltf4,
    /// Right top front, four-height layout.
    Rtf4,
    /// Left top back, four-height layout.
    Ltb4,
    /// Right top back, four-height layout.
    Rtb4,

    /// Demixed right, stereo reconstructed from mono.
    DemixedR2,
    /// Demixed left, 3.1.x.
    DemixedL3,
    /// Demixed right, 3.1.x.
    DemixedR3,
    /// Demixed left, 5.1.x.
    DemixedL5,
    /// Demixed right, 5.1.x.
    DemixedR5,
    /// Demixed left surround, 5.1.x.
    DemixedLs5,
    /// Demixed right surround, 5.1.x.
    DemixedRs5,
    /// Demixed left, 7.1.x.
    DemixedL7,
    /// Demixed right, 7.1.x.
    DemixedR7,
    /// Demixed left rear surround, 7.1.x.
    DemixedLrs7,
    /// Demixed right rear surround, 7.1.x.
    DemixedRrs7,
    /// Demixed left top front, two-height.
    DemixedLtf2,
    /// Demixed right top front, two-height.
    DemixedRtf2,
    /// Demixed left top back, four-height.
    DemixedLtb4,
    /// Demixed right top back, four-height.
    DemixedRtb4,
}

impl ChannelLabel {
    /// Get the short name for this label.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Mono => "M",
            Self::L2 => "L2",
            Self::R2 => "R2",
            Self::Centre => "C",
            Self::Lfe => "LFE",
            Self::L3 => "L3",
            Self::R3 => "R3",
            Self::L5 => "L5",
            Self::R5 => "R5",
            Self::Ls5 => "Ls5",
            Self::Rs5 => "Rs5",
            Self::L7 => "L7",
            Self::R7 => "R7",
            Self::Lss7 => "Lss7",
            Self::Rss7 => "Rss7",
            Self::Lrs7 => "Lrs7",
            Self::Rrs7 => "Rrs7",
            Self::Ltf2 => "Ltf2",
            Self::Rtf2 => "Rtf2",
            Self::Ltf3 => "Ltf3",
            Self::Rtf3 => "Rtf3",
            Self::Ltf4 => "Ltf4",
            Self::Rtf4 => "Rtf4",
            Self::Ltb4 => "Ltb4",
            Self::Rtb4 => "Rtb4",
            Self::DemixedR2 => "D_R2",
            Self::DemixedL3 => "D_L3",
            Self::DemixedR3 => "D_R3",
            Self::DemixedL5 => "D_L5",
            Self::DemixedR5 => "D_R5",
            Self::DemixedLs5 => "D_Ls5",
            Self::DemixedRs5 => "D_Rs5",
            Self::DemixedL7 => "D_L7",
            Self::DemixedR7 => "D_R7",
            Self::DemixedLrs7 => "D_Lrs7",
            Self::DemixedRrs7 => "D_Rrs7",
            Self::DemixedLtf2 => "D_Ltf2",
            Self::DemixedRtf2 => "D_Rtf2",
            Self::DemixedLtb4 => "D_Ltb4",
            Self::DemixedRtb4 => "D_Rtb4",
        }
    }

    /// Check if this is a demixed label.
    pub fn is_demixed(&self) -> bool {
        matches!(
            self,
            Self::DemixedR2
                | Self::DemixedL3
                | Self::DemixedR3
                | Self::DemixedL5
                | Self::DemixedR5
                | Self::DemixedLs5
                | Self::DemixedRs5
                | Self::DemixedL7
                | Self::DemixedR7
                | Self::DemixedLrs7
                | Self::DemixedRrs7
                | Self::DemixedLtf2
                | Self::DemixedRtf2
                | Self::DemixedLtb4
                | Self::DemixedRtb4
        )
    }

    /// Get the mixed channel this demixed label is reconstructed from.
    ///
    /// Each demixed channel is recovered by inverting one step of the
    /// downmix chain; the returned label is the channel that step mixed
    /// into. Returns `None` for labels that are not demixed.
    pub fn relevant_mixed_label(&self) -> Option<ChannelLabel> {
        match self {
            Self::DemixedR2 => Some(Self::Mono),
            Self::DemixedL3 => Some(Self::L2),
            Self::DemixedR3 => Some(Self::R2),
            Self::DemixedLs5 => Some(Self::L3),
            Self::DemixedRs5 => Some(Self::R3),
            Self::DemixedL5 => Some(Self::L3),
            Self::DemixedR5 => Some(Self::R3),
            Self::DemixedL7 => Some(Self::L5),
            Self::DemixedR7 => Some(Self::R5),
            Self::DemixedLrs7 => Some(Self::Ls5),
            Self::DemixedRrs7 => Some(Self::Rs5),
            Self::DemixedLtf2 => Some(Self::Ltf3),
            Self::DemixedRtf2 => Some(Self::Rtf3),
            Self::DemixedLtb4 => Some(Self::Ltf2),
            Self::DemixedRtb4 => Some(Self::Rtf2),
            _ => None,
        }
    }
}

impl fmt::Display for ChannelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Channel counts for one layer of a scalable layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelNumbers {
    /// Number of surround channels (1, 2, 3, 5, or 7).
    pub surround: u32,
    /// Number of LFE channels (0 or 1).
    pub lfe: u32,
    /// Number of height channels (0, 2, or 4).
    pub height: u32,
}

impl ChannelNumbers {
    /// Create validated channel numbers.
    pub fn new(surround: u32, lfe: u32, height: u32) -> Result<Self> {
        let numbers = ChannelNumbers {
            surround,
            lfe,
            height,
        };
        numbers.validate()?;
        Ok(numbers)
    }

    /// Validate against the layouts a scalable layer may use.
    pub fn validate(&self) -> Result<()> {
        let surround_ok = matches!(self.surround, 1 | 2 | 3 | 5 | 7);
        let lfe_ok = self.lfe <= 1;
        let height_ok = matches!(self.height, 0 | 2 | 4);
        if surround_ok && lfe_ok && height_ok {
            Ok(())
        } else {
            Err(CoreError::InvalidChannelNumbers {
                surround: self.surround,
                lfe: self.lfe,
                height: self.height,
            })
        }
    }

    /// Total channel count of this layout.
    pub fn total(&self) -> u32 {
        self.surround + self.lfe + self.height
    }
}

impl fmt::Display for ChannelNumbers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.surround, self.lfe, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviation() {
        assert_eq!(ChannelLabel::Ls5.abbreviation(), "Ls5");
        assert_eq!(ChannelLabel::DemixedR2.to_string(), "D_R2");
    }

    #[test]
    fn test_is_demixed() {
        assert!(ChannelLabel::DemixedLrs7.is_demixed());
        assert!(!ChannelLabel::Lrs7.is_demixed());
        assert!(!ChannelLabel::Mono.is_demixed());
    }

    #[test]
    fn test_relevant_mixed_label() {
        assert_eq!(
            ChannelLabel::DemixedR2.relevant_mixed_label(),
            Some(ChannelLabel::Mono)
        );
        assert_eq!(
            ChannelLabel::DemixedLrs7.relevant_mixed_label(),
            Some(ChannelLabel::Ls5)
        );
        assert_eq!(
            ChannelLabel::DemixedLtb4.relevant_mixed_label(),
            Some(ChannelLabel::Ltf2)
        );
        assert_eq!(ChannelLabel::L2.relevant_mixed_label(), None);
    }

    #[test]
    fn test_channel_numbers_valid() {
        for surround in [1, 2, 3, 5, 7] {
            for height in [0, 2, 4] {
                assert!(ChannelNumbers::new(surround, 1, height).is_ok());
            }
        }
    }

    #[test]
    fn test_channel_numbers_invalid() {
        assert!(ChannelNumbers::new(4, 0, 0).is_err());
        assert!(ChannelNumbers::new(9, 0, 0).is_err());
        assert!(ChannelNumbers::new(2, 2, 0).is_err());
        assert!(ChannelNumbers::new(2, 0, 3).is_err());
    }

    #[test]
    fn test_total_and_display() {
        let layout = ChannelNumbers::new(5, 1, 2).unwrap();
        assert_eq!(layout.total(), 8);
        assert_eq!(layout.to_string(), "5.1.2");
    }
}
