//! # IAMF ADM
//!
//! ADM-BWF ingestion for IAMF encoding.
//!
//! A Broadcast Wave File carrying an Audio Definition Model describes how its
//! interleaved PCM channels group into audio objects. This crate turns such a
//! file into one canonical WAV file per object:
//!
//! - **Chunk parsing**: a [`Bw64Reader`] indexes every chunk of a `RIFF` or
//!   `BW64` container and decodes the `fmt ` descriptor
//! - **ADM interpretation**: the `axml` payload is scanned for `audioObject`
//!   elements and their ordered `audioTrackUIDRef` children
//! - **Splicing**: [`splice_wav_files_from_adm`] partitions the interleaved
//!   `data` payload into per-object WAV files with recomputed headers
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::path::Path;
//! use iamf_adm::{splice_wav_files_from_adm, Bw64Reader};
//!
//! let mut input = File::open("program.wav")?;
//! let reader = Bw64Reader::build_from_stream(10, &mut input)?;
//! splice_wav_files_from_adm(Path::new("out"), "program", &reader, &mut input)?;
//! # Ok::<(), iamf_adm::AdmError>(())
//! ```

#![warn(missing_docs)]

pub mod adm;
pub mod chunks;
pub mod error;
pub mod reader;
pub mod splicer;

pub use adm::AdmObject;
pub use chunks::{ChunkEntry, FormatInfo, FourCC};
pub use error::{AdmError, Result};
pub use reader::Bw64Reader;
pub use splicer::splice_wav_files_from_adm;
