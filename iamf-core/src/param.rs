//! Parameter definitions and per-subblock parameter payloads.
//!
//! A parameter definition fixes the static properties of one parameter
//! stream (id, rate, timing mode); parameter blocks then carry per-subblock
//! payloads of the matching kind. The three supported kinds are mix gain,
//! demixing info, and recon gain.

use crate::error::{CoreError, Result};
use crate::{leb128, DecodedUleb128};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Kind tag of a parameter definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamDefinitionType {
    /// Time-varying mix gain.
    MixGain,
    /// Demixing mode selection.
    Demixing,
    /// Per-layer reconstruction gains.
    ReconGain,
}

impl std::fmt::Display for ParamDefinitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MixGain => "mix_gain",
            Self::Demixing => "demixing",
            Self::ReconGain => "recon_gain",
        };
        write!(f, "{}", name)
    }
}

/// Kind-specific payload of a parameter definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamDefinitionVariant {
    /// Mix-gain definition.
    MixGain {
        /// Gain applied when no parameter block covers a timestamp.
        default_mix_gain: i16,
    },
    /// Demixing definition.
    Demixing {
        /// Mode applied when no parameter block covers a timestamp.
        default_dmixp_mode: DmixpMode,
        /// Default weight index.
        default_w: u8,
    },
    /// Recon-gain definition. Holds the id of the audio element the gains
    /// describe; the element itself is looked up at registration time.
    ReconGain {
        /// Referenced scalable channel audio element.
        audio_element_id: DecodedUleb128,
    },
}

/// Static properties of one parameter stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamDefinition {
    /// Identifier correlating definition and parameter blocks.
    pub parameter_id: DecodedUleb128,
    /// Ticks per second for all durations of this stream.
    pub parameter_rate: DecodedUleb128,
    /// 0: durations fixed by this definition. 1: durations carried per
    /// block.
    pub param_definition_mode: u8,
    /// Block duration in ticks. Meaningful when mode is 0.
    pub duration: DecodedUleb128,
    /// Constant subblock duration in ticks. Meaningful when mode is 0;
    /// zero means per-subblock durations.
    pub constant_subblock_duration: DecodedUleb128,
    /// Kind-specific payload.
    pub variant: ParamDefinitionVariant,
}

impl ParamDefinition {
    /// Kind tag of this definition.
    pub fn param_definition_type(&self) -> ParamDefinitionType {
        match self.variant {
            ParamDefinitionVariant::MixGain { .. } => ParamDefinitionType::MixGain,
            ParamDefinitionVariant::Demixing { .. } => ParamDefinitionType::Demixing,
            ParamDefinitionVariant::ReconGain { .. } => ParamDefinitionType::ReconGain,
        }
    }

    /// Subblock count fixed by this definition, when mode is 0 and a
    /// constant subblock duration is set.
    pub fn fixed_num_subblocks(&self) -> Option<u32> {
        if self.param_definition_mode != 0 {
            return None;
        }
        derive_num_subblocks(self.duration, self.constant_subblock_duration)
    }
}

/// Subblock count implied by `(duration, constant_subblock_duration)`.
///
/// `None` when the constant subblock duration is zero, which means the
/// block carries explicit per-subblock durations instead.
pub fn derive_num_subblocks(
    duration: DecodedUleb128,
    constant_subblock_duration: DecodedUleb128,
) -> Option<u32> {
    if constant_subblock_duration == 0 {
        None
    } else {
        Some(duration.div_ceil(constant_subblock_duration))
    }
}

/// Narrow a 32-bit metadata value into a 16-bit field.
pub fn checked_i16(field: &'static str, value: i32) -> Result<i16> {
    i16::try_from(value).map_err(|_| CoreError::ValueOutOfRange {
        field,
        value: i64::from(value),
    })
}

/// Narrow a 32-bit metadata value into an 8-bit field.
pub fn checked_u8(field: &'static str, value: u32) -> Result<u8> {
    u8::try_from(value).map_err(|_| CoreError::ValueOutOfRange {
        field,
        value: i64::from(value),
    })
}

/// Gain animation over one subblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MixGainAnimation {
    /// Constant value.
    Step {
        /// Gain over the whole subblock, Q7.8 dB.
        start_point_value: i16,
    },
    /// Linear ramp.
    Linear {
        /// Gain at the subblock start, Q7.8 dB.
        start_point_value: i16,
        /// Gain at the subblock end, Q7.8 dB.
        end_point_value: i16,
    },
    /// Quadratic Bezier ramp.
    Bezier {
        /// Gain at the subblock start, Q7.8 dB.
        start_point_value: i16,
        /// Gain at the subblock end, Q7.8 dB.
        end_point_value: i16,
        /// Control point gain, Q7.8 dB.
        control_point_value: i16,
        /// Control point time as a fraction of the subblock, Q0.8.
        control_point_relative_time: u8,
    },
}

impl MixGainAnimation {
    fn type_code(&self) -> u32 {
        match self {
            Self::Step { .. } => 0,
            Self::Linear { .. } => 1,
            Self::Bezier { .. } => 2,
        }
    }
}

/// Mix-gain payload of one subblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixGainParameterData {
    /// The animation for this subblock.
    pub animation: MixGainAnimation,
}

impl MixGainParameterData {
    /// Write the fixed-width payload: animation type as ULEB128, then the
    /// animation fields as little-endian integers.
    pub fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        leb128::encode(self.animation.type_code(), writer)?;
        match self.animation {
            MixGainAnimation::Step { start_point_value } => {
                writer.write_i16::<LittleEndian>(start_point_value)?;
            }
            MixGainAnimation::Linear {
                start_point_value,
                end_point_value,
            } => {
                writer.write_i16::<LittleEndian>(start_point_value)?;
                writer.write_i16::<LittleEndian>(end_point_value)?;
            }
            MixGainAnimation::Bezier {
                start_point_value,
                end_point_value,
                control_point_value,
                control_point_relative_time,
            } => {
                writer.write_i16::<LittleEndian>(start_point_value)?;
                writer.write_i16::<LittleEndian>(end_point_value)?;
                writer.write_i16::<LittleEndian>(control_point_value)?;
                writer.write_u8(control_point_relative_time)?;
            }
        }
        Ok(())
    }
}

/// Demixing mode.
///
/// The `*Alt` modes select the same mixing coefficients as their base mode
/// but step the demixing weight index in the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DmixpMode {
    /// Mode 1.
    #[default]
    Mode1,
    /// Mode 2.
    Mode2,
    /// Mode 3.
    Mode3,
    /// Mode 1, weight index decreasing.
    Mode1Alt,
    /// Mode 2, weight index decreasing.
    Mode2Alt,
    /// Mode 3, weight index decreasing.
    Mode3Alt,
}

/// Downmix/demix coefficient set selected by a [`DmixpMode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemixingCoefficients {
    /// Side surround contribution.
    pub alpha: f64,
    /// Rear surround contribution.
    pub beta: f64,
    /// Top back contribution.
    pub gamma: f64,
    /// Surround-to-height contribution.
    pub delta: f64,
    /// Step applied to the weight index.
    pub w_idx_offset: i32,
}

impl DmixpMode {
    /// Three-bit wire code of this mode.
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Mode1 => 0,
            Self::Mode2 => 1,
            Self::Mode3 => 2,
            Self::Mode1Alt => 4,
            Self::Mode2Alt => 5,
            Self::Mode3Alt => 6,
        }
    }

    /// Decode a three-bit wire code. Code 3 and 7 are reserved.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Mode1),
            1 => Some(Self::Mode2),
            2 => Some(Self::Mode3),
            4 => Some(Self::Mode1Alt),
            5 => Some(Self::Mode2Alt),
            6 => Some(Self::Mode3Alt),
            _ => None,
        }
    }

    /// Coefficients selected by this mode.
    pub fn coefficients(&self) -> DemixingCoefficients {
        let (alpha, beta, gamma, delta) = match self {
            Self::Mode1 | Self::Mode1Alt => (1.0, 1.0, 0.707, 0.707),
            Self::Mode2 | Self::Mode2Alt => (0.707, 0.707, 0.707, 0.707),
            Self::Mode3 | Self::Mode3Alt => (1.0, 0.866, 0.866, 0.866),
        };
        let w_idx_offset = match self {
            Self::Mode1 | Self::Mode2 | Self::Mode3 => -1,
            _ => 1,
        };
        DemixingCoefficients {
            alpha,
            beta,
            gamma,
            delta,
            w_idx_offset,
        }
    }
}

/// Demixing payload of one subblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemixingInfoParameterData {
    /// Selected demixing mode.
    pub dmixp_mode: DmixpMode,
    /// Five reserved bits, preserved bitwise.
    pub reserved: u8,
}

impl DemixingInfoParameterData {
    /// Write the one-byte payload: mode in the top three bits, reserved
    /// bits below.
    pub fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8((self.dmixp_mode.as_u8() << 5) | (self.reserved & 0x1f))?;
        Ok(())
    }
}

/// Number of gain slots in one recon-gain layer.
pub const RECON_GAIN_SLOTS: usize = 12;

/// Recon gains for one layer.
///
/// Bit `i` of `recon_gain_flag` is set iff `recon_gain[i]` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconGainElement {
    /// Twelve-bit presence bitmask.
    pub recon_gain_flag: DecodedUleb128,
    /// Gain per slot; `round(gain * 255)`.
    pub recon_gain: [u8; RECON_GAIN_SLOTS],
}

/// Recon-gain payload of one subblock: one element per audio-element layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconGainInfoParameterData {
    /// Per-layer elements, layer 0 first.
    pub recon_gain_elements: Vec<ReconGainElement>,
}

impl ReconGainInfoParameterData {
    /// Write the payload: for every layer that carries gains, the flag as
    /// ULEB128 followed by the flagged gain bytes in slot order.
    pub fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        for element in &self.recon_gain_elements {
            if element.recon_gain_flag == 0 {
                continue;
            }
            leb128::encode(element.recon_gain_flag, writer)?;
            for (slot, gain) in element.recon_gain.iter().enumerate() {
                if element.recon_gain_flag & (1 << slot) != 0 {
                    writer.write_u8(*gain)?;
                }
            }
        }
        Ok(())
    }
}

/// Payload of one parameter subblock.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterData {
    /// Mix-gain payload.
    MixGain(MixGainParameterData),
    /// Demixing payload.
    Demixing(DemixingInfoParameterData),
    /// Recon-gain payload.
    ReconGain(ReconGainInfoParameterData),
}

impl ParameterData {
    /// Write this payload's wire form.
    pub fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self {
            Self::MixGain(data) => data.write_payload(writer),
            Self::Demixing(data) => data.write_payload(writer),
            Self::ReconGain(data) => data.write_payload(writer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_definition_type() {
        let definition = ParamDefinition {
            parameter_id: 1,
            parameter_rate: 48_000,
            param_definition_mode: 0,
            duration: 960,
            constant_subblock_duration: 960,
            variant: ParamDefinitionVariant::ReconGain {
                audio_element_id: 300,
            },
        };
        assert_eq!(
            definition.param_definition_type(),
            ParamDefinitionType::ReconGain
        );
        assert_eq!(definition.fixed_num_subblocks(), Some(1));
    }

    #[test]
    fn test_derive_num_subblocks() {
        assert_eq!(derive_num_subblocks(960, 960), Some(1));
        assert_eq!(derive_num_subblocks(960, 480), Some(2));
        assert_eq!(derive_num_subblocks(960, 500), Some(2));
        assert_eq!(derive_num_subblocks(960, 0), None);
    }

    #[test]
    fn test_checked_narrowing() {
        assert_eq!(checked_i16("v", 32767).unwrap(), 32767);
        assert_eq!(checked_i16("v", -32768).unwrap(), -32768);
        assert!(checked_i16("v", 32768).is_err());
        assert!(checked_u8("t", 256).is_err());
        assert_eq!(checked_u8("t", 255).unwrap(), 255);
    }

    #[test]
    fn test_mix_gain_payload_linear() {
        let data = MixGainParameterData {
            animation: MixGainAnimation::Linear {
                start_point_value: i16::MIN,
                end_point_value: i16::MAX,
            },
        };
        let mut out = Vec::new();
        data.write_payload(&mut out).unwrap();
        assert_eq!(out, vec![0x01, 0x00, 0x80, 0xff, 0x7f]);
    }

    #[test]
    fn test_mix_gain_payload_bezier() {
        let data = MixGainParameterData {
            animation: MixGainAnimation::Bezier {
                start_point_value: 1,
                end_point_value: -1,
                control_point_value: 2,
                control_point_relative_time: 192,
            },
        };
        let mut out = Vec::new();
        data.write_payload(&mut out).unwrap();
        assert_eq!(out, vec![0x02, 0x01, 0x00, 0xff, 0xff, 0x02, 0x00, 0xc0]);
    }

    #[test]
    fn test_dmixp_mode_codes() {
        for mode in [
            DmixpMode::Mode1,
            DmixpMode::Mode2,
            DmixpMode::Mode3,
            DmixpMode::Mode1Alt,
            DmixpMode::Mode2Alt,
            DmixpMode::Mode3Alt,
        ] {
            assert_eq!(DmixpMode::from_u8(mode.as_u8()), Some(mode));
        }
        assert_eq!(DmixpMode::from_u8(3), None);
        assert_eq!(DmixpMode::from_u8(7), None);
    }

    #[test]
    fn test_dmixp_coefficients() {
        let coeffs = DmixpMode::Mode3.coefficients();
        assert_eq!(coeffs.alpha, 1.0);
        assert_eq!(coeffs.beta, 0.866);
        assert_eq!(coeffs.w_idx_offset, -1);
        assert_eq!(DmixpMode::Mode3Alt.coefficients().w_idx_offset, 1);
    }

    #[test]
    fn test_demixing_payload() {
        let data = DemixingInfoParameterData {
            dmixp_mode: DmixpMode::Mode2Alt,
            reserved: 0x15,
        };
        let mut out = Vec::new();
        data.write_payload(&mut out).unwrap();
        assert_eq!(out, vec![(5 << 5) | 0x15]);
    }

    #[test]
    fn test_recon_gain_payload_skips_empty_layers() {
        let mut gains = [0u8; RECON_GAIN_SLOTS];
        gains[2] = 0x80;
        let data = ReconGainInfoParameterData {
            recon_gain_elements: vec![
                ReconGainElement::default(),
                ReconGainElement {
                    recon_gain_flag: 0b100,
                    recon_gain: gains,
                },
            ],
        };
        let mut out = Vec::new();
        data.write_payload(&mut out).unwrap();
        assert_eq!(out, vec![0x04, 0x80]);
    }
}
