//! Scalable channel audio elements.

use crate::channel::ChannelNumbers;
use crate::error::{CoreError, Result};
use crate::DecodedUleb128;

/// One layer of a scalable channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalableLayer {
    /// Channel counts of this layer's layout. Layers are cumulative: each
    /// layer's channel set includes the whole previous layer.
    pub channels: ChannelNumbers,
    /// Whether recon gain is carried for this layer.
    pub recon_gain_is_present: bool,
}

/// A scalable channel-layout audio element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AudioElement {
    /// Identifier of this element.
    pub audio_element_id: DecodedUleb128,
    /// Ordered layers, lowest first.
    pub layers: Vec<ScalableLayer>,
}

impl AudioElement {
    /// Create an element, validating every layer and the cumulative
    /// ordering between consecutive layers.
    pub fn new(audio_element_id: DecodedUleb128, layers: Vec<ScalableLayer>) -> Result<Self> {
        let mut previous: Option<ChannelNumbers> = None;
        for layer in &layers {
            layer.channels.validate()?;
            if let Some(prev) = previous {
                if layer.channels.surround < prev.surround
                    || layer.channels.lfe < prev.lfe
                    || layer.channels.height < prev.height
                {
                    return Err(CoreError::InvalidChannelNumbers {
                        surround: layer.channels.surround,
                        lfe: layer.channels.lfe,
                        height: layer.channels.height,
                    });
                }
            }
            previous = Some(layer.channels);
        }
        Ok(AudioElement {
            audio_element_id,
            layers,
        })
    }

    /// Number of layers.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Per-layer channel numbers, in layer order.
    pub fn channel_numbers_for_layers(&self) -> Vec<ChannelNumbers> {
        self.layers.iter().map(|l| l.channels).collect()
    }

    /// Per-layer recon-gain presence flags, in layer order.
    pub fn recon_gain_is_present_flags(&self) -> Vec<bool> {
        self.layers.iter().map(|l| l.recon_gain_is_present).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(surround: u32, lfe: u32, height: u32, recon: bool) -> ScalableLayer {
        ScalableLayer {
            channels: ChannelNumbers::new(surround, lfe, height).unwrap(),
            recon_gain_is_present: recon,
        }
    }

    #[test]
    fn test_two_layer_element() {
        let element =
            AudioElement::new(11, vec![layer(1, 0, 0, false), layer(2, 0, 0, true)]).unwrap();
        assert_eq!(element.num_layers(), 2);
        assert_eq!(element.recon_gain_is_present_flags(), vec![false, true]);
        assert_eq!(element.channel_numbers_for_layers()[1].surround, 2);
    }

    #[test]
    fn test_rejects_shrinking_layers() {
        let result = AudioElement::new(11, vec![layer(5, 1, 0, false), layer(2, 0, 0, true)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_invalid_layer() {
        let bad = ScalableLayer {
            channels: ChannelNumbers {
                surround: 4,
                lfe: 0,
                height: 0,
            },
            recon_gain_is_present: false,
        };
        assert!(AudioElement::new(11, vec![bad]).is_err());
    }
}
