//! Parameter block generation.
//!
//! The generator is driven one parameter kind at a time: metadata records
//! accumulate in per-kind FIFO queues, and each `generate_*` call drains
//! its queue into assembled blocks. Recon-gain generation additionally
//! needs the original and decoded PCM for the covered window.

use crate::block::{ParameterBlockObu, ParameterBlockWithData, ParameterSubblock};
use crate::demixing::build_demixing_subblock;
use crate::error::{ParamError, Result};
use crate::metadata::{ParameterBlockMetadata, ParameterDataMetadata};
use crate::mix_gain::build_mix_gain_subblock;
use crate::recon_gain::generate_recon_gain_subblock;
use crate::registry::{ParameterRegistry, PerIdParameterMetadata};
use crate::timing::GlobalTimingModule;
use iamf_core::param::derive_num_subblocks;
use iamf_core::{
    AudioElement, DecodedUleb128, IdLabeledFrameMap, ParamDefinition, ParamDefinitionType,
    ParameterData,
};
use std::collections::{HashMap, VecDeque};

/// Assembles parameter blocks from queued metadata records.
pub struct ParameterBlockGenerator {
    registry: ParameterRegistry,
    override_computed_recon_gains: bool,
    verbose_first_block_only: bool,
    recon_gain_blocks_generated: u64,
    mix_gain_queue: VecDeque<ParameterBlockMetadata>,
    demixing_queue: VecDeque<ParameterBlockMetadata>,
    recon_gain_queue: VecDeque<ParameterBlockMetadata>,
}

impl ParameterBlockGenerator {
    /// Build the per-id registry and an empty generator.
    pub fn initialize(
        audio_elements: &HashMap<DecodedUleb128, AudioElement>,
        param_definitions: &HashMap<DecodedUleb128, ParamDefinition>,
    ) -> Result<Self> {
        let registry = ParameterRegistry::initialize(audio_elements, param_definitions)?;
        Ok(ParameterBlockGenerator {
            registry,
            override_computed_recon_gains: false,
            verbose_first_block_only: true,
            recon_gain_blocks_generated: 0,
            mix_gain_queue: VecDeque::new(),
            demixing_queue: VecDeque::new(),
            recon_gain_queue: VecDeque::new(),
        })
    }

    /// Trust user-supplied recon gains instead of recomputing them.
    pub fn with_override_computed_recon_gains(mut self, override_gains: bool) -> Self {
        self.override_computed_recon_gains = override_gains;
        self
    }

    /// Log per-label recon gains only while generating the first
    /// recon-gain block (the default), or for every block.
    pub fn with_verbose_first_block_only(mut self, first_only: bool) -> Self {
        self.verbose_first_block_only = first_only;
        self
    }

    /// The read-only per-id registry.
    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    /// Queue one metadata record on its kind's queue.
    ///
    /// Fails when the record's parameter id was never registered.
    pub fn add_metadata(&mut self, metadata: ParameterBlockMetadata) -> Result<()> {
        let per_id = self.registry.get(metadata.parameter_id)?;
        match per_id.param_definition_type {
            ParamDefinitionType::MixGain => self.mix_gain_queue.push_back(metadata),
            ParamDefinitionType::Demixing => self.demixing_queue.push_back(metadata),
            ParamDefinitionType::ReconGain => self.recon_gain_queue.push_back(metadata),
        }
        Ok(())
    }

    /// Drain the mix-gain queue into assembled blocks.
    pub fn generate_mix_gain(
        &mut self,
        timing: &mut GlobalTimingModule,
    ) -> Result<Vec<ParameterBlockWithData>> {
        let queue = std::mem::take(&mut self.mix_gain_queue);
        let empty = IdLabeledFrameMap::new();
        self.generate_parameter_blocks(queue, &empty, &empty, timing)
    }

    /// Drain the demixing queue into assembled blocks.
    pub fn generate_demixing(
        &mut self,
        timing: &mut GlobalTimingModule,
    ) -> Result<Vec<ParameterBlockWithData>> {
        let queue = std::mem::take(&mut self.demixing_queue);
        let empty = IdLabeledFrameMap::new();
        self.generate_parameter_blocks(queue, &empty, &empty, timing)
    }

    /// Drain the recon-gain queue into assembled blocks.
    ///
    /// The frame maps must cover every audio element referenced by the
    /// queued records, with original and decoded PCM for the current
    /// window.
    pub fn generate_recon_gain(
        &mut self,
        timing: &mut GlobalTimingModule,
        id_to_labeled_frame: &IdLabeledFrameMap,
        id_to_labeled_decoded_frame: &IdLabeledFrameMap,
    ) -> Result<Vec<ParameterBlockWithData>> {
        let queue = std::mem::take(&mut self.recon_gain_queue);
        self.generate_parameter_blocks(
            queue,
            id_to_labeled_frame,
            id_to_labeled_decoded_frame,
            timing,
        )
    }

    fn generate_parameter_blocks(
        &mut self,
        queue: VecDeque<ParameterBlockMetadata>,
        id_to_labeled_frame: &IdLabeledFrameMap,
        id_to_labeled_decoded_frame: &IdLabeledFrameMap,
        timing: &mut GlobalTimingModule,
    ) -> Result<Vec<ParameterBlockWithData>> {
        let mut blocks = Vec::with_capacity(queue.len());
        for metadata in queue {
            let per_id = self.registry.get(metadata.parameter_id)?;
            let verbose = !self.verbose_first_block_only || self.recon_gain_blocks_generated == 0;
            let block = generate_one_block(
                per_id,
                &metadata,
                self.override_computed_recon_gains,
                verbose,
                id_to_labeled_frame,
                id_to_labeled_decoded_frame,
                timing,
            )?;
            if per_id.param_definition_type == ParamDefinitionType::ReconGain
                && !self.override_computed_recon_gains
            {
                self.recon_gain_blocks_generated += 1;
            }
            blocks.push(block);
        }

        log_parameter_blocks(&blocks);
        Ok(blocks)
    }
}

/// Resolve a timing field that only the definition may fix.
///
/// In mode 0 the definition is authoritative; metadata may repeat the
/// value or leave it zero, but contradicting it fails.
fn resolve_mode0_field(
    parameter_id: DecodedUleb128,
    field: &'static str,
    definition: DecodedUleb128,
    metadata: DecodedUleb128,
) -> Result<DecodedUleb128> {
    if metadata != 0 && metadata != definition {
        return Err(ParamError::DurationMismatch {
            parameter_id,
            field,
            definition,
            metadata,
        });
    }
    Ok(definition)
}

fn generate_one_block(
    per_id: &PerIdParameterMetadata,
    metadata: &ParameterBlockMetadata,
    override_computed_recon_gains: bool,
    verbose: bool,
    id_to_labeled_frame: &IdLabeledFrameMap,
    id_to_labeled_decoded_frame: &IdLabeledFrameMap,
    timing: &mut GlobalTimingModule,
) -> Result<ParameterBlockWithData> {
    let parameter_id = metadata.parameter_id;
    let definition = &per_id.param_definition;

    // The block is authoritative for timing in mode 1, the definition in
    // mode 0.
    let (duration, constant_subblock_duration) = if definition.param_definition_mode == 1 {
        (metadata.duration, metadata.constant_subblock_duration)
    } else {
        (
            resolve_mode0_field(parameter_id, "duration", definition.duration, metadata.duration)?,
            resolve_mode0_field(
                parameter_id,
                "constant_subblock_duration",
                definition.constant_subblock_duration,
                metadata.constant_subblock_duration,
            )?,
        )
    };

    let (start_timestamp, end_timestamp) =
        timing.next_parameter_block_timestamps(parameter_id, metadata.start_timestamp, duration)?;

    // With a constant subblock duration the count is derived; otherwise the
    // metadata declares it and carries per-subblock durations.
    let num_subblocks = match derive_num_subblocks(duration, constant_subblock_duration) {
        Some(derived) => {
            if metadata.num_subblocks != 0 && metadata.num_subblocks != derived {
                return Err(ParamError::SubblockCountMismatch {
                    parameter_id,
                    expected: derived,
                    actual: metadata.num_subblocks,
                });
            }
            derived
        }
        None => metadata.num_subblocks,
    };
    if metadata.subblocks.len() as u32 != num_subblocks {
        return Err(ParamError::SubblockCountMismatch {
            parameter_id,
            expected: num_subblocks,
            actual: metadata.subblocks.len() as u32,
        });
    }

    let include_subblock_duration =
        definition.param_definition_mode == 1 && constant_subblock_duration == 0;
    if include_subblock_duration {
        let total: u64 = metadata
            .subblocks
            .iter()
            .map(|s| u64::from(s.subblock_duration))
            .sum();
        if total != u64::from(duration) {
            return Err(ParamError::DurationMismatch {
                parameter_id,
                field: "subblock durations",
                definition: duration,
                metadata: total as u32,
            });
        }
    }

    let mut subblocks = Vec::with_capacity(metadata.subblocks.len());
    for (index, subblock_metadata) in metadata.subblocks.iter().enumerate() {
        let param_data = match (&per_id.param_definition_type, &subblock_metadata.param_data) {
            (ParamDefinitionType::MixGain, ParameterDataMetadata::MixGain(animation)) => {
                ParameterData::MixGain(build_mix_gain_subblock(animation)?)
            }
            (ParamDefinitionType::Demixing, ParameterDataMetadata::Demixing(data)) => {
                ParameterData::Demixing(build_demixing_subblock(index, data)?)
            }
            (ParamDefinitionType::ReconGain, ParameterDataMetadata::ReconGain(gains)) => {
                if index > 0 {
                    return Err(ParamError::TooManySubblocks {
                        param_type: ParamDefinitionType::ReconGain,
                    });
                }
                ParameterData::ReconGain(generate_recon_gain_subblock(
                    override_computed_recon_gains,
                    verbose,
                    id_to_labeled_frame,
                    id_to_labeled_decoded_frame,
                    per_id,
                    gains,
                )?)
            }
            _ => {
                return Err(ParamError::ParameterTypeMismatch {
                    parameter_id,
                    expected: per_id.param_definition_type,
                });
            }
        };
        subblocks.push(ParameterSubblock {
            subblock_duration: include_subblock_duration
                .then(|| subblock_metadata.subblock_duration),
            param_data,
        });
    }

    Ok(ParameterBlockWithData {
        obu: ParameterBlockObu {
            parameter_id,
            duration,
            constant_subblock_duration,
            subblocks,
        },
        start_timestamp,
        end_timestamp,
    })
}

/// Log the first and last blocks of a batch.
fn log_parameter_blocks(blocks: &[ParameterBlockWithData]) {
    let first = blocks.first();
    let last = if blocks.len() > 1 { blocks.last() } else { None };
    for block in first.into_iter().chain(last) {
        tracing::debug!(
            parameter_id = block.obu.parameter_id,
            num_subblocks = block.obu.num_subblocks(),
            start_timestamp = block.start_timestamp,
            end_timestamp = block.end_timestamp,
            "Generated parameter block"
        );
    }
}
