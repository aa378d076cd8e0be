//! Labeled PCM frames.
//!
//! The encoder works on one frame of audio at a time, addressed by channel
//! label rather than by interleaved position. Samples use a signed 32-bit
//! internal representation regardless of the input bit depth.

use crate::channel::ChannelLabel;
use crate::DecodedUleb128;
use std::collections::HashMap;

/// Map from channel label to that channel's samples within one frame.
pub type LabelSamplesMap = HashMap<ChannelLabel, Vec<i32>>;

/// One frame of PCM addressed by channel label.
#[derive(Debug, Clone, Default)]
pub struct LabeledFrame {
    /// Samples per channel label.
    pub label_to_samples: LabelSamplesMap,
}

impl LabeledFrame {
    /// Create an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame from `(label, samples)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ChannelLabel, Vec<i32>)>) -> Self {
        LabeledFrame {
            label_to_samples: pairs.into_iter().collect(),
        }
    }

    /// Samples for one label, if present.
    pub fn samples(&self, label: ChannelLabel) -> Option<&[i32]> {
        self.label_to_samples.get(&label).map(Vec::as_slice)
    }

    /// Number of labels in the frame.
    pub fn num_channels(&self) -> usize {
        self.label_to_samples.len()
    }
}

/// Per-audio-element labeled frames for one time window.
pub type IdLabeledFrameMap = HashMap<DecodedUleb128, LabeledFrame>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs() {
        let frame = LabeledFrame::from_pairs([
            (ChannelLabel::L2, vec![1, 2, 3]),
            (ChannelLabel::R2, vec![4, 5, 6]),
        ]);
        assert_eq!(frame.num_channels(), 2);
        assert_eq!(frame.samples(ChannelLabel::L2), Some(&[1, 2, 3][..]));
        assert_eq!(frame.samples(ChannelLabel::Centre), None);
    }
}
