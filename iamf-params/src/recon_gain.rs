//! Recon-gain computation and packing.
//!
//! When a decoder reconstructs a lower layer of a scalable channel layout
//! from a higher one, the demixed channels need per-channel gains to match
//! the loudness of the originals. This module discovers which channels a
//! layer transition demixes, computes each gain from original versus
//! decoded PCM, and packs the results into the 12-slot wire layout.

use crate::error::{ParamError, Result};
use crate::metadata::ReconGainMetadata;
use crate::registry::PerIdParameterMetadata;
use iamf_core::param::RECON_GAIN_SLOTS;
use iamf_core::{
    ChannelLabel, ChannelNumbers, IdLabeledFrameMap, LabelSamplesMap, ParamDefinitionType,
    ReconGainElement, ReconGainInfoParameterData,
};

/// Below this level the original channel counts as silent and its gain is
/// zero. Relative to full scale squared.
const SILENCE_THRESHOLD_DB: f64 = -80.0;

/// At or above this original-to-mixed ratio the demixed channel needs no
/// attenuation and the gain is one.
const RATIO_THRESHOLD_DB: f64 = -6.0;

const MAX_SAMPLE: f64 = 32767.0;

/// Channels newly demixed when a layer transition raises the channel
/// counts from `accumulated` to `layer`.
///
/// Transitions are evaluated in surround order, then height; accumulating
/// the result into the running channel set keeps repeated application
/// idempotent.
pub fn find_demixed_channels(
    accumulated: ChannelNumbers,
    layer: ChannelNumbers,
) -> Result<Vec<ChannelLabel>> {
    use ChannelLabel::*;

    let mut labels = Vec::new();
    for surround in accumulated.surround + 1..=layer.surround {
        match surround {
            2 => {
                // Previous layer is mono, this layer is stereo.
                if accumulated.surround == 1 {
                    labels.push(DemixedR2);
                }
            }
            3 => {
                labels.push(DemixedL3);
                labels.push(DemixedR3);
            }
            5 => {
                labels.push(DemixedLs5);
                labels.push(DemixedRs5);
            }
            7 => {
                labels.push(DemixedL7);
                labels.push(DemixedR7);
                labels.push(DemixedLrs7);
                labels.push(DemixedRrs7);
            }
            s if s > 7 => {
                return Err(ParamError::UnsupportedSurround { surround: s });
            }
            _ => {}
        }
    }

    if accumulated.height == 2 {
        if layer.height == 4 {
            labels.push(DemixedLtb4);
            labels.push(DemixedRtb4);
        } else if layer.height == 2 && accumulated.surround == 3 && layer.surround > 3 {
            labels.push(DemixedLtf2);
            labels.push(DemixedRtf2);
        }
    }

    Ok(labels)
}

/// Root-mean-square level of one channel.
fn rms(samples: &[i32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_of_squares / samples.len() as f64).sqrt()
}

fn samples_for(map: &LabelSamplesMap, label: ChannelLabel) -> Result<&[i32]> {
    map.get(&label)
        .map(Vec::as_slice)
        .ok_or(ParamError::SamplesNotFound { label })
}

/// Compute the gain for one demixed channel.
///
/// `label_to_samples` holds the original channels, including the demixed
/// channel as produced by the encoder's downmix chain;
/// `label_to_decoded_samples` holds the channels demixed from decoded
/// audio.
pub fn compute_recon_gain(
    label: ChannelLabel,
    label_to_samples: &LabelSamplesMap,
    label_to_decoded_samples: &LabelSamplesMap,
    verbose: bool,
) -> Result<f64> {
    let original_level = rms(samples_for(label_to_samples, label)?);

    // Silent original: nothing to reconstruct.
    let level_db = 10.0 * (original_level / (MAX_SAMPLE * MAX_SAMPLE)).log10();
    if level_db < SILENCE_THRESHOLD_DB {
        if verbose {
            tracing::debug!(label = %label, level_db, "Original channel below silence threshold");
        }
        return Ok(0.0);
    }

    let mixed_label = label
        .relevant_mixed_label()
        .ok_or(ParamError::SamplesNotFound { label })?;
    let mixed_level = rms(samples_for(label_to_samples, mixed_label)?);

    let ratio_db = 10.0 * (original_level / mixed_level).log10();
    if ratio_db >= RATIO_THRESHOLD_DB {
        if verbose {
            tracing::debug!(label = %label, ratio_db, "Original dominates the mix");
        }
        return Ok(1.0);
    }

    let demixed_level = rms(samples_for(label_to_decoded_samples, label)?);
    let gain = (original_level / demixed_level).sqrt().clamp(0.0, 1.0);
    if verbose {
        tracing::debug!(label = %label, gain, "Computed recon gain");
    }
    Ok(gain)
}

/// Wire slot of a demixed label, per the recon-gain bit layout.
///
/// Slots 1 (centre) and 11 (LFE) are reserved: those channels are never
/// demixed.
fn bit_position(label: ChannelLabel) -> Option<usize> {
    use ChannelLabel::*;
    match label {
        DemixedL7 | DemixedL5 | DemixedL3 => Some(0),
        DemixedR7 | DemixedR5 | DemixedR3 | DemixedR2 => Some(2),
        DemixedLs5 => Some(3),
        DemixedRs5 => Some(4),
        DemixedLtf2 => Some(5),
        DemixedRtf2 => Some(6),
        DemixedLrs7 => Some(7),
        DemixedRrs7 => Some(8),
        DemixedLtb4 => Some(9),
        DemixedRtb4 => Some(10),
        _ => None,
    }
}

/// Pack per-label gains into the flag bitmask and gain vector.
pub fn convert_recon_gains_and_flags(
    label_to_recon_gain: &[(ChannelLabel, f64)],
    verbose: bool,
) -> (u32, [u8; RECON_GAIN_SLOTS]) {
    let mut flag = 0u32;
    let mut gains = [0u8; RECON_GAIN_SLOTS];
    for &(label, gain) in label_to_recon_gain {
        if verbose {
            tracing::debug!(label = %label, gain, "Recon gain");
        }
        let Some(position) = bit_position(label) else {
            tracing::error!(label = %label, "Unrecognized demixed channel label");
            continue;
        };
        flag |= 1 << position;
        gains[position] = (gain * 255.0).round() as u8;
    }
    (flag, gains)
}

/// Compute one layer's packed recon gains and validate the presence flag.
fn compute_layer_recon_gains(
    layer_index: usize,
    layer_channels: ChannelNumbers,
    accumulated: ChannelNumbers,
    verbose: bool,
    label_to_samples: &LabelSamplesMap,
    label_to_decoded_samples: &LabelSamplesMap,
    recon_gain_is_present_flags: &[bool],
) -> Result<(u32, [u8; RECON_GAIN_SLOTS])> {
    if verbose {
        tracing::debug!(layer = layer_index, channels = %layer_channels, "Computing recon gains");
    }
    let mut label_to_recon_gain = Vec::new();
    if layer_index > 0 {
        for label in find_demixed_channels(accumulated, layer_channels)? {
            let gain =
                compute_recon_gain(label, label_to_samples, label_to_decoded_samples, verbose)?;
            label_to_recon_gain.push((label, gain));
        }
    }

    let has_demixed = !label_to_recon_gain.is_empty();
    if recon_gain_is_present_flags[layer_index] != has_demixed {
        return Err(ParamError::PresenceFlagMismatch {
            layer: layer_index,
            flag: recon_gain_is_present_flags[layer_index],
            has_demixed,
        });
    }

    Ok(convert_recon_gains_and_flags(&label_to_recon_gain, verbose))
}

/// Build the recon-gain payload for one parameter block.
///
/// The user-supplied gains are always what is written out. Unless
/// `override_computed_recon_gains` is set, the gains are also recomputed
/// from PCM and every disagreement is reported before failing.
pub(crate) fn generate_recon_gain_subblock(
    override_computed_recon_gains: bool,
    verbose: bool,
    id_to_labeled_frame: &IdLabeledFrameMap,
    id_to_labeled_decoded_frame: &IdLabeledFrameMap,
    per_id: &PerIdParameterMetadata,
    metadata: &ReconGainMetadata,
) -> Result<ReconGainInfoParameterData> {
    let Some(audio_element_id) = per_id.audio_element_id else {
        return Err(ParamError::ParameterTypeMismatch {
            parameter_id: per_id.param_definition.parameter_id,
            expected: ParamDefinitionType::ReconGain,
        });
    };

    let num_layers = per_id.num_layers;
    let user_layers = &metadata.recon_gains_for_layer;
    if num_layers > 1 && user_layers.len() != num_layers {
        return Err(ParamError::LayerCountMismatch {
            num_layers,
            user_layers: user_layers.len(),
        });
    }

    let mut recon_gain_elements = vec![ReconGainElement::default(); num_layers];
    let mut accumulated = ChannelNumbers::default();
    for (layer_index, element) in recon_gain_elements.iter_mut().enumerate() {
        // Write out the user-supplied gains. Depending on the mode these
        // either must match the computed gains or act as an override.
        let mut user_flag = 0u32;
        let mut user_gains = [0u8; RECON_GAIN_SLOTS];
        if let Some(layer_map) = user_layers.get(layer_index) {
            for (&bit, &gain) in layer_map {
                if bit as usize >= RECON_GAIN_SLOTS {
                    return Err(iamf_core::CoreError::ValueOutOfRange {
                        field: "recon_gain bit position",
                        value: i64::from(bit),
                    }
                    .into());
                }
                user_flag |= 1 << bit;
                user_gains[bit as usize] = gain;
            }
        }
        *element = ReconGainElement {
            recon_gain_flag: user_flag,
            recon_gain: user_gains,
        };

        if override_computed_recon_gains {
            continue;
        }

        let (Some(labeled_frame), Some(labeled_decoded_frame)) = (
            id_to_labeled_frame.get(&audio_element_id),
            id_to_labeled_decoded_frame.get(&audio_element_id),
        ) else {
            return Err(ParamError::FrameNotFound { audio_element_id });
        };

        let layer_channels = per_id.channel_numbers_for_layers[layer_index];
        let (computed_flag, computed_gains) = compute_layer_recon_gains(
            layer_index,
            layer_channels,
            accumulated,
            verbose,
            &labeled_frame.label_to_samples,
            &labeled_decoded_frame.label_to_samples,
            &per_id.recon_gain_is_present_flags,
        )?;
        accumulated = layer_channels;

        if !per_id.recon_gain_is_present_flags[layer_index] {
            continue;
        }

        if computed_flag != user_flag {
            return Err(ParamError::ReconGainFlagMismatch {
                layer: layer_index,
                computed: computed_flag,
                user: user_flag,
            });
        }
        // Find all mismatches before returning an error.
        let mut byte_indices = Vec::new();
        for slot in 0..RECON_GAIN_SLOTS {
            if user_gains[slot] != computed_gains[slot] {
                tracing::error!(
                    slot,
                    computed = computed_gains[slot],
                    user = user_gains[slot],
                    "Computed recon gain differs from what user specified"
                );
                byte_indices.push(slot);
            }
        }
        if !byte_indices.is_empty() {
            return Err(ParamError::ReconGainMismatch {
                layer: layer_index,
                byte_indices,
            });
        }
    }

    Ok(ReconGainInfoParameterData {
        recon_gain_elements,
    })
}
