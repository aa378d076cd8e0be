//! # IAMF Params
//!
//! Parameter-block generation for IAMF encoding.
//!
//! An IAMF stream interleaves audio frames with parameter blocks carrying
//! time-varying mix gains, demixing modes, and reconstruction gains. This
//! crate correlates per-id metadata records with the parameter definitions
//! and audio elements they describe, and assembles OBU-ready parameter
//! blocks:
//!
//! - **Registry**: immutable per-parameter-id snapshots built once per
//!   session from the definitions and audio elements
//! - **Timing**: `[start, end)` timestamps allocated per id, rejecting
//!   out-of-order metadata
//! - **Builders**: mix-gain animations narrowed to their wire widths,
//!   demixing modes copied with validation, and recon gains computed from
//!   original versus decoded PCM and packed into per-layer bitmasks
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use iamf_core::{ParamDefinition, ParamDefinitionVariant};
//! use iamf_params::{GlobalTimingModule, ParameterBlockGenerator};
//!
//! let definitions = HashMap::from([(42, ParamDefinition {
//!     parameter_id: 42,
//!     parameter_rate: 48_000,
//!     param_definition_mode: 0,
//!     duration: 960,
//!     constant_subblock_duration: 960,
//!     variant: ParamDefinitionVariant::MixGain { default_mix_gain: 0 },
//! })]);
//!
//! let mut generator = ParameterBlockGenerator::initialize(&HashMap::new(), &definitions)?;
//! let mut timing = GlobalTimingModule::new();
//! let blocks = generator.generate_mix_gain(&mut timing)?;
//! assert!(blocks.is_empty());
//! # Ok::<(), iamf_params::ParamError>(())
//! ```

#![warn(missing_docs)]

pub mod block;
pub mod demixing;
pub mod error;
pub mod generator;
pub mod metadata;
pub mod mix_gain;
pub mod recon_gain;
pub mod registry;
pub mod timing;

pub use block::{ParameterBlockObu, ParameterBlockWithData, ParameterSubblock};
pub use error::{ParamError, Result};
pub use generator::ParameterBlockGenerator;
pub use metadata::{
    MixGainAnimationMetadata, ParameterBlockMetadata, ParameterDataMetadata,
    ParameterSubblockMetadata, ReconGainMetadata,
};
pub use registry::{ParameterRegistry, PerIdParameterMetadata};
pub use timing::GlobalTimingModule;
