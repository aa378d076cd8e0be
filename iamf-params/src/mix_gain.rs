//! Mix-gain subblock building.

use crate::error::Result;
use crate::metadata::MixGainAnimationMetadata;
use iamf_core::param::{checked_i16, checked_u8};
use iamf_core::{MixGainAnimation, MixGainParameterData};

/// Narrow an authored animation into its wire form.
///
/// Every point value must fit in 16 bits and the Bezier control time in
/// 8 bits; out-of-range values fail naming the offending field.
pub fn build_mix_gain_subblock(
    metadata: &MixGainAnimationMetadata,
) -> Result<MixGainParameterData> {
    let animation = match *metadata {
        MixGainAnimationMetadata::Step { start_point_value } => MixGainAnimation::Step {
            start_point_value: checked_i16("start_point_value", start_point_value)?,
        },
        MixGainAnimationMetadata::Linear {
            start_point_value,
            end_point_value,
        } => MixGainAnimation::Linear {
            start_point_value: checked_i16("start_point_value", start_point_value)?,
            end_point_value: checked_i16("end_point_value", end_point_value)?,
        },
        MixGainAnimationMetadata::Bezier {
            start_point_value,
            end_point_value,
            control_point_value,
            control_point_relative_time,
        } => MixGainAnimation::Bezier {
            start_point_value: checked_i16("start_point_value", start_point_value)?,
            end_point_value: checked_i16("end_point_value", end_point_value)?,
            control_point_value: checked_i16("control_point_value", control_point_value)?,
            control_point_relative_time: checked_u8(
                "control_point_relative_time",
                control_point_relative_time,
            )?,
        },
    };
    Ok(MixGainParameterData { animation })
}
