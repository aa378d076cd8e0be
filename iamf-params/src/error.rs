//! Error types for parameter-block generation.

use iamf_core::{ChannelLabel, CoreError, ParamDefinitionType};
use thiserror::Error;

/// Errors produced while registering metadata or generating parameter
/// blocks.
#[derive(Error, Debug)]
pub enum ParamError {
    /// A metadata record referenced an unregistered parameter id.
    #[error("No per-id metadata found for parameter ID {parameter_id}")]
    UnknownParameterId {
        /// The unregistered id.
        parameter_id: u32,
    },

    /// A recon-gain definition referenced a missing audio element.
    #[error(
        "Audio element ID {audio_element_id} referenced by the recon gain \
         parameter of ID {parameter_id} not found"
    )]
    AudioElementNotFound {
        /// The dangling reference.
        audio_element_id: u32,
        /// The defining parameter id.
        parameter_id: u32,
    },

    /// A subblock carried data of a different kind than its definition.
    #[error("Parameter ID {parameter_id} expects {expected} data")]
    ParameterTypeMismatch {
        /// The offending parameter id.
        parameter_id: u32,
        /// Kind fixed by the definition.
        expected: ParamDefinitionType,
    },

    /// Metadata arrived out of order for its parameter id.
    #[error(
        "Parameter ID {parameter_id}: expected start timestamp {expected}, got {requested}"
    )]
    TimestampMismatch {
        /// The offending parameter id.
        parameter_id: u32,
        /// Next start the timing module would allocate.
        expected: i64,
        /// Start the metadata requested.
        requested: i64,
    },

    /// Declared subblock count disagrees with the durations.
    #[error("Parameter ID {parameter_id}: expected {expected} subblocks, got {actual}")]
    SubblockCountMismatch {
        /// The offending parameter id.
        parameter_id: u32,
        /// Count derived from the durations.
        expected: u32,
        /// Count the metadata carried.
        actual: u32,
    },

    /// Block metadata contradicts a mode-0 definition's timing fields.
    #[error(
        "Parameter ID {parameter_id}: metadata {field} {metadata} contradicts definition {definition}"
    )]
    DurationMismatch {
        /// The offending parameter id.
        parameter_id: u32,
        /// Which timing field disagreed.
        field: &'static str,
        /// Value fixed by the definition.
        definition: u32,
        /// Value the metadata carried.
        metadata: u32,
    },

    /// Demixing and recon-gain blocks carry exactly one subblock.
    #[error("There should be only one subblock for {param_type} info")]
    TooManySubblocks {
        /// Kind of the offending block.
        param_type: ParamDefinitionType,
    },

    /// User recon gains do not cover every layer.
    #[error(
        "There are {num_layers} layers of scalable audio element, but the \
         user only specifies {user_layers} layers"
    )]
    LayerCountMismatch {
        /// Layers of the audio element.
        num_layers: usize,
        /// Layers the user supplied.
        user_layers: usize,
    },

    /// `recon_gain_is_present` disagrees with the demixed channel set.
    #[error(
        "Layer {layer}: recon gain is present flag is {flag} vs whether \
         recon gain should be computed: {has_demixed}"
    )]
    PresenceFlagMismatch {
        /// Index of the offending layer.
        layer: usize,
        /// The flag from the audio element.
        flag: bool,
        /// Whether the layer transition produces demixed channels.
        has_demixed: bool,
    },

    /// Computed recon-gain bitmask differs from the user-supplied one.
    #[error(
        "Layer {layer}: computed recon gain flag {computed:#014b} differs \
         from user specified {user:#014b}"
    )]
    ReconGainFlagMismatch {
        /// Index of the offending layer.
        layer: usize,
        /// Bitmask derived from the PCM.
        computed: u32,
        /// Bitmask the user supplied.
        user: u32,
    },

    /// Computed recon-gain bytes differ from the user-supplied ones.
    #[error("Layer {layer}: recon gains mismatch at byte indices {byte_indices:?}")]
    ReconGainMismatch {
        /// Index of the offending layer.
        layer: usize,
        /// Every disagreeing byte index.
        byte_indices: Vec<usize>,
    },

    /// Original or decoded PCM is missing for an audio element.
    #[error(
        "Original or decoded audio frame for audio element ID \
         {audio_element_id} not found when computing recon gains"
    )]
    FrameNotFound {
        /// The audio element whose frame is missing.
        audio_element_id: u32,
    },

    /// A labeled channel needed for gain computation is missing.
    #[error("Samples for channel {label} not found when computing recon gains")]
    SamplesNotFound {
        /// The missing channel.
        label: ChannelLabel,
    },

    /// A layer transition crossed an unsupported surround count.
    #[error("Unsupported number of surround channels: {surround}")]
    UnsupportedSurround {
        /// The offending count.
        surround: u32,
    },

    /// Core data-model failure (narrowing overflow, invalid layout).
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias using [`ParamError`].
pub type Result<T> = std::result::Result<T, ParamError>;
