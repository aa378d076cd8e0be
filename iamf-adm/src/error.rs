//! Error types for ADM-BWF ingestion.

use thiserror::Error;

/// Errors produced while reading or splicing an ADM-BWF file.
#[derive(Error, Debug)]
pub enum AdmError {
    /// The outer container magic is not `RIFF`/`BW64` + `WAVE`.
    #[error("Invalid RIFF/BW64 header")]
    InvalidRiff,

    /// A required chunk was not found.
    #[error("Missing required chunk: {0}")]
    MissingChunk(&'static str),

    /// A chunk header was cut short by end-of-file.
    #[error("Truncated chunk header at offset {offset}")]
    TruncatedChunk {
        /// File offset of the truncated header.
        offset: u64,
    },

    /// A chunk's declared payload extends past end-of-file.
    #[error("Chunk '{id}' at offset {offset} declares {size} bytes past end of file")]
    ChunkOutOfBounds {
        /// Chunk identifier.
        id: String,
        /// File offset of the payload.
        offset: u64,
        /// Declared payload size.
        size: u32,
    },

    /// The `fmt ` chunk is too small to hold a PCM descriptor.
    #[error("Invalid fmt chunk: {size} bytes, need at least 16")]
    InvalidFmtChunk {
        /// Declared chunk size.
        size: u32,
    },

    /// The `fmt ` chunk declares zero channels.
    #[error("fmt chunk declares zero channels")]
    ZeroChannels,

    /// The `data` payload is not a whole number of frames.
    #[error("data chunk size {data_size} is not a multiple of block align {block_align}")]
    MisalignedData {
        /// Declared `data` payload size.
        data_size: u32,
        /// Frame size from the `fmt ` chunk.
        block_align: u16,
    },

    /// The `axml` payload could not be interpreted.
    #[error("Invalid axml payload: {0}")]
    InvalidAxml(String),

    /// ADM track count disagrees with the `fmt ` channel count.
    #[error("ADM references {adm_tracks} tracks but fmt declares {fmt_channels} channels")]
    ChannelCountMismatch {
        /// Track-UID references across all surviving objects.
        adm_tracks: u32,
        /// Channel count from the `fmt ` chunk.
        fmt_channels: u16,
    },

    /// Filesystem failure while reading input or writing spliced output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`AdmError`].
pub type Result<T> = std::result::Result<T, AdmError>;
