//! # IAMF Core
//!
//! Shared data model for IAMF (Immersive Audio Model and Formats) encoding.
//!
//! This crate provides the types that the ingestion and parameter-block
//! generation crates build on:
//!
//! - **Identifiers**: ULEB128-coded ids decoded to 32-bit values, with
//!   encode/decode helpers
//! - **Channels**: the closed set of channel labels used by scalable channel
//!   layouts, including their demixed counterparts, and per-layer channel
//!   counts
//! - **Frames**: labeled PCM frames mapping channel labels to sample vectors
//! - **Parameter definitions**: mix-gain, demixing, and recon-gain parameter
//!   definitions plus the per-subblock payloads they produce
//!
//! ## Example
//!
//! ```rust
//! use iamf_core::{ChannelNumbers, ParamDefinition, ParamDefinitionVariant};
//!
//! let stereo = ChannelNumbers::new(2, 0, 0).unwrap();
//! assert_eq!(stereo.total(), 2);
//!
//! let definition = ParamDefinition {
//!     parameter_id: 100,
//!     parameter_rate: 48_000,
//!     param_definition_mode: 0,
//!     duration: 960,
//!     constant_subblock_duration: 960,
//!     variant: ParamDefinitionVariant::MixGain { default_mix_gain: 0 },
//! };
//! assert_eq!(definition.fixed_num_subblocks(), Some(1));
//! ```

#![warn(missing_docs)]

pub mod channel;
pub mod element;
pub mod error;
pub mod frame;
pub mod leb128;
pub mod param;

pub use channel::{ChannelLabel, ChannelNumbers};
pub use element::{AudioElement, ScalableLayer};
pub use error::{CoreError, Result};
pub use frame::{IdLabeledFrameMap, LabelSamplesMap, LabeledFrame};
pub use param::{
    DemixingInfoParameterData, DmixpMode, MixGainAnimation, MixGainParameterData,
    ParamDefinition, ParamDefinitionType, ParamDefinitionVariant, ParameterData,
    ReconGainElement, ReconGainInfoParameterData,
};

/// A ULEB128-coded identifier after decoding.
///
/// IAMF restricts decoded values to 32 bits even though the coded form may
/// span up to eight bytes.
pub type DecodedUleb128 = u32;
