//! Incoming parameter-block metadata records.
//!
//! One record describes one intended parameter block. Values arrive in the
//! widths the authoring format uses (32-bit integers); the builders narrow
//! them to their wire widths.

use iamf_core::{DecodedUleb128, DemixingInfoParameterData};
use std::collections::BTreeMap;

/// Metadata for one intended parameter block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterBlockMetadata {
    /// Target parameter id.
    pub parameter_id: DecodedUleb128,
    /// Expected start of this block in ticks of the parameter rate.
    pub start_timestamp: i64,
    /// Block duration. Authoritative only when the definition has
    /// `param_definition_mode == 1`; zero otherwise.
    pub duration: DecodedUleb128,
    /// Constant subblock duration; same authority rules as `duration`.
    pub constant_subblock_duration: DecodedUleb128,
    /// Declared subblock count; same authority rules as `duration`.
    pub num_subblocks: DecodedUleb128,
    /// Per-subblock payload metadata.
    pub subblocks: Vec<ParameterSubblockMetadata>,
}

/// Metadata for one subblock.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterSubblockMetadata {
    /// Duration of this subblock; consulted only when the block carries
    /// explicit per-subblock durations.
    pub subblock_duration: DecodedUleb128,
    /// Kind-specific payload.
    pub param_data: ParameterDataMetadata,
}

/// Kind-specific subblock metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterDataMetadata {
    /// Mix-gain animation with wide integer values.
    MixGain(MixGainAnimationMetadata),
    /// Demixing info, already in wire form.
    Demixing(DemixingInfoParameterData),
    /// User-supplied recon gains.
    ReconGain(ReconGainMetadata),
}

/// Mix-gain animation as authored, before narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MixGainAnimationMetadata {
    /// Constant value.
    Step {
        /// Gain over the whole subblock.
        start_point_value: i32,
    },
    /// Linear ramp.
    Linear {
        /// Gain at the subblock start.
        start_point_value: i32,
        /// Gain at the subblock end.
        end_point_value: i32,
    },
    /// Quadratic Bezier ramp.
    Bezier {
        /// Gain at the subblock start.
        start_point_value: i32,
        /// Gain at the subblock end.
        end_point_value: i32,
        /// Control point gain.
        control_point_value: i32,
        /// Control point time as a fraction of the subblock.
        control_point_relative_time: u32,
    },
}

/// User-supplied recon gains, one map per layer keyed by bit position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconGainMetadata {
    /// `recon_gains_for_layer[k][bit] = gain` for layer `k`.
    pub recon_gains_for_layer: Vec<BTreeMap<u32, u8>>,
}
