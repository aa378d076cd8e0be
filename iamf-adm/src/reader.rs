//! BW64/RIFF container reader.

use crate::adm::{parse_audio_objects, AdmObject};
use crate::chunks::{ChunkEntry, FormatInfo, FourCC};
use crate::error::{AdmError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// Parsed view of an ADM-BWF container.
///
/// Holds the decoded `fmt ` descriptor, an index of every chunk after
/// `fmt ` in file order, and the audio objects interpreted from the `axml`
/// payload. The PCM itself stays in the stream; the splicer re-reads it
/// through the chunk index.
#[derive(Debug, Clone)]
pub struct Bw64Reader {
    /// Decoded `fmt ` descriptor.
    pub format: FormatInfo,
    /// Every chunk after `fmt `, in file order.
    pub chunks: Vec<ChunkEntry>,
    /// Audio objects from `axml`, importance-filtered, in document order.
    pub objects: Vec<AdmObject>,
}

impl Bw64Reader {
    /// Parse a seekable ADM-BWF stream.
    ///
    /// `importance_threshold` is handed to the ADM interpreter: objects
    /// whose importance falls below it are dropped. The `data` payload is
    /// indexed but not validated against the file length here; the splicer
    /// enforces that when it consumes the PCM.
    pub fn build_from_stream<R: Read + Seek>(
        importance_threshold: i32,
        stream: &mut R,
    ) -> Result<Self> {
        let file_len = stream.seek(SeekFrom::End(0))?;
        stream.seek(SeekFrom::Start(0))?;

        let magic = FourCC::read(stream).map_err(|_| AdmError::InvalidRiff)?;
        if magic != FourCC::RIFF && magic != FourCC::BW64 {
            return Err(AdmError::InvalidRiff);
        }
        let _riff_size = stream.read_u32::<LittleEndian>().map_err(|_| AdmError::InvalidRiff)?;
        let form = FourCC::read(stream).map_err(|_| AdmError::InvalidRiff)?;
        if form != FourCC::WAVE {
            return Err(AdmError::InvalidRiff);
        }

        let mut format: Option<FormatInfo> = None;
        let mut chunks = Vec::new();
        let mut axml: Option<Vec<u8>> = None;

        loop {
            let header_offset = stream.stream_position()?;
            if header_offset >= file_len {
                break;
            }
            if header_offset + 8 > file_len {
                return Err(AdmError::TruncatedChunk {
                    offset: header_offset,
                });
            }
            let id = FourCC::read(stream)?;
            let size = stream.read_u32::<LittleEndian>()?;
            let payload_offset = header_offset + 8;

            match id {
                FourCC::FMT => {
                    if payload_offset + u64::from(size) > file_len {
                        return Err(AdmError::ChunkOutOfBounds {
                            id: id.as_str(),
                            offset: payload_offset,
                            size,
                        });
                    }
                    format = Some(FormatInfo::read(stream, size)?);
                    skip_to_next_chunk(stream, payload_offset, size)?;
                }
                FourCC::DATA => {
                    // Recorded as declared; bounds are the splicer's concern.
                    chunks.push(ChunkEntry {
                        id,
                        offset: payload_offset,
                        size,
                    });
                    if payload_offset + u64::from(size) > file_len {
                        break;
                    }
                    skip_to_next_chunk(stream, payload_offset, size)?;
                }
                _ => {
                    if payload_offset + u64::from(size) > file_len {
                        return Err(AdmError::ChunkOutOfBounds {
                            id: id.as_str(),
                            offset: payload_offset,
                            size,
                        });
                    }
                    if id == FourCC::AXML {
                        let mut payload = vec![0u8; size as usize];
                        stream.read_exact(&mut payload)?;
                        axml = Some(payload);
                    } else {
                        tracing::debug!(id = %id, size, "Skipping chunk");
                    }
                    chunks.push(ChunkEntry {
                        id,
                        offset: payload_offset,
                        size,
                    });
                    skip_to_next_chunk(stream, payload_offset, size)?;
                }
            }
        }

        let format = format.ok_or(AdmError::MissingChunk("fmt "))?;
        if !chunks.iter().any(|c| c.id == FourCC::DATA) {
            return Err(AdmError::MissingChunk("data"));
        }

        let objects = match &axml {
            Some(payload) => parse_audio_objects(payload, importance_threshold)?,
            None => Vec::new(),
        };

        Ok(Bw64Reader {
            format,
            chunks,
            objects,
        })
    }

    /// The `data` chunk entry.
    pub fn data_chunk(&self) -> Option<&ChunkEntry> {
        self.chunks.iter().find(|c| c.id == FourCC::DATA)
    }
}

/// Seek past a chunk payload, honoring RIFF word alignment.
fn skip_to_next_chunk<R: Seek>(stream: &mut R, payload_offset: u64, size: u32) -> Result<()> {
    let padded = u64::from(size) + u64::from(size) % 2;
    stream.seek(SeekFrom::Start(payload_offset + padded))?;
    Ok(())
}
