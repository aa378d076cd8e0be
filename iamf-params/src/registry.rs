//! Per-parameter-id metadata registry.
//!
//! Built once from the parameter definitions and audio elements, then
//! read-only for the rest of the encoder session.

use crate::error::{ParamError, Result};
use iamf_core::{
    AudioElement, ChannelNumbers, DecodedUleb128, ParamDefinition, ParamDefinitionType,
    ParamDefinitionVariant,
};
use std::collections::HashMap;

/// Immutable snapshot of everything block generation needs for one
/// parameter id.
///
/// The layer fields are populated only for recon-gain definitions; other
/// kinds have zero layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerIdParameterMetadata {
    /// Kind of the definition.
    pub param_definition_type: ParamDefinitionType,
    /// The definition itself.
    pub param_definition: ParamDefinition,
    /// Layers of the referenced audio element.
    pub num_layers: usize,
    /// Per-layer recon-gain presence flags.
    pub recon_gain_is_present_flags: Vec<bool>,
    /// Per-layer channel numbers.
    pub channel_numbers_for_layers: Vec<ChannelNumbers>,
    /// Referenced audio element, for recon-gain definitions.
    pub audio_element_id: Option<DecodedUleb128>,
}

/// Read-only map from parameter id to its metadata snapshot.
#[derive(Debug, Clone, Default)]
pub struct ParameterRegistry {
    parameter_id_to_metadata: HashMap<DecodedUleb128, PerIdParameterMetadata>,
}

impl ParameterRegistry {
    /// Build the registry by walking every parameter definition.
    ///
    /// Recon-gain definitions dereference their audio element here; a
    /// missing element fails registration.
    pub fn initialize(
        audio_elements: &HashMap<DecodedUleb128, AudioElement>,
        param_definitions: &HashMap<DecodedUleb128, ParamDefinition>,
    ) -> Result<Self> {
        let mut parameter_id_to_metadata = HashMap::new();
        for (&parameter_id, definition) in param_definitions {
            let metadata = build_per_id_metadata(parameter_id, audio_elements, definition)?;
            parameter_id_to_metadata.insert(parameter_id, metadata);
        }
        Ok(ParameterRegistry {
            parameter_id_to_metadata,
        })
    }

    /// Look up the snapshot for one parameter id.
    pub fn get(&self, parameter_id: DecodedUleb128) -> Result<&PerIdParameterMetadata> {
        self.parameter_id_to_metadata
            .get(&parameter_id)
            .ok_or(ParamError::UnknownParameterId { parameter_id })
    }

    /// Number of registered ids.
    pub fn len(&self) -> usize {
        self.parameter_id_to_metadata.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.parameter_id_to_metadata.is_empty()
    }
}

fn build_per_id_metadata(
    parameter_id: DecodedUleb128,
    audio_elements: &HashMap<DecodedUleb128, AudioElement>,
    definition: &ParamDefinition,
) -> Result<PerIdParameterMetadata> {
    let mut metadata = PerIdParameterMetadata {
        param_definition_type: definition.param_definition_type(),
        param_definition: *definition,
        num_layers: 0,
        recon_gain_is_present_flags: Vec::new(),
        channel_numbers_for_layers: Vec::new(),
        audio_element_id: None,
    };

    if let ParamDefinitionVariant::ReconGain { audio_element_id } = definition.variant {
        let element = audio_elements.get(&audio_element_id).ok_or(
            ParamError::AudioElementNotFound {
                audio_element_id,
                parameter_id,
            },
        )?;
        metadata.audio_element_id = Some(audio_element_id);
        metadata.num_layers = element.num_layers();
        metadata.recon_gain_is_present_flags = element.recon_gain_is_present_flags();
        metadata.channel_numbers_for_layers = element.channel_numbers_for_layers();
    }

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iamf_core::ScalableLayer;

    fn recon_gain_definition(parameter_id: u32, audio_element_id: u32) -> ParamDefinition {
        ParamDefinition {
            parameter_id,
            parameter_rate: 48_000,
            param_definition_mode: 0,
            duration: 960,
            constant_subblock_duration: 960,
            variant: ParamDefinitionVariant::ReconGain { audio_element_id },
        }
    }

    fn two_layer_element(id: u32) -> AudioElement {
        AudioElement::new(
            id,
            vec![
                ScalableLayer {
                    channels: ChannelNumbers::new(1, 0, 0).unwrap(),
                    recon_gain_is_present: false,
                },
                ScalableLayer {
                    channels: ChannelNumbers::new(2, 0, 0).unwrap(),
                    recon_gain_is_present: true,
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_recon_gain_snapshot() {
        let audio_elements = HashMap::from([(300, two_layer_element(300))]);
        let definitions = HashMap::from([(5, recon_gain_definition(5, 300))]);

        let registry = ParameterRegistry::initialize(&audio_elements, &definitions).unwrap();
        let metadata = registry.get(5).unwrap();
        assert_eq!(metadata.param_definition_type, ParamDefinitionType::ReconGain);
        assert_eq!(metadata.num_layers, 2);
        assert_eq!(metadata.recon_gain_is_present_flags, vec![false, true]);
        assert_eq!(metadata.audio_element_id, Some(300));
        assert_eq!(metadata.channel_numbers_for_layers[1].surround, 2);
    }

    #[test]
    fn test_missing_audio_element_fails() {
        let definitions = HashMap::from([(5, recon_gain_definition(5, 999))]);
        let result = ParameterRegistry::initialize(&HashMap::new(), &definitions);
        assert!(matches!(
            result,
            Err(ParamError::AudioElementNotFound {
                audio_element_id: 999,
                parameter_id: 5,
            })
        ));
    }

    #[test]
    fn test_mix_gain_has_no_layers() {
        let definitions = HashMap::from([(
            7,
            ParamDefinition {
                parameter_id: 7,
                parameter_rate: 48_000,
                param_definition_mode: 1,
                duration: 0,
                constant_subblock_duration: 0,
                variant: ParamDefinitionVariant::MixGain { default_mix_gain: 0 },
            },
        )]);
        let registry = ParameterRegistry::initialize(&HashMap::new(), &definitions).unwrap();
        let metadata = registry.get(7).unwrap();
        assert_eq!(metadata.num_layers, 0);
        assert!(metadata.audio_element_id.is_none());
    }

    #[test]
    fn test_unknown_id_fails() {
        let registry = ParameterRegistry::default();
        assert!(matches!(
            registry.get(1),
            Err(ParamError::UnknownParameterId { parameter_id: 1 })
        ));
    }
}
