//! Per-object WAV splicing.
//!
//! The ADM object table assigns each interleaved input channel to exactly
//! one object, in order of first appearance. Splicing walks the input
//! `data` payload one frame at a time and fans each frame's bytes out to
//! one canonical WAV file per object.

use crate::error::{AdmError, Result};
use crate::reader::Bw64Reader;
use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Size of the canonical 16-byte PCM `fmt ` payload.
const FMT_CHUNK_SIZE: u32 = 16;

/// Removes the files it tracks unless disarmed.
///
/// Splicing must leave no partial outputs behind; every created path is
/// registered here and the guard is disarmed only once all files are
/// complete.
struct OutputGuard {
    paths: Vec<PathBuf>,
    armed: bool,
}

impl OutputGuard {
    fn new() -> Self {
        OutputGuard {
            paths: Vec::new(),
            armed: true,
        }
    }

    fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        for path in &self.paths {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial output");
            }
        }
    }
}

/// Write one canonical WAV file per ADM audio object.
///
/// Output files are named `<file_prefix>_converted<k>.wav` with `k`
/// starting at 1, in object order. Each output carries only a `fmt ` and a
/// `data` chunk; header fields are recomputed for the object's channel
/// count. On any failure every file created by this call is removed.
pub fn splice_wav_files_from_adm<R: Read + Seek>(
    output_dir: &Path,
    file_prefix: &str,
    reader: &Bw64Reader,
    stream: &mut R,
) -> Result<()> {
    if reader.objects.is_empty() {
        tracing::debug!("No audio objects; nothing to splice");
        return Ok(());
    }

    let format = &reader.format;
    let adm_tracks: u32 = reader.objects.iter().map(|o| o.num_channels() as u32).sum();
    if adm_tracks != u32::from(format.channels) {
        return Err(AdmError::ChannelCountMismatch {
            adm_tracks,
            fmt_channels: format.channels,
        });
    }

    let data = reader.data_chunk().ok_or(AdmError::MissingChunk("data"))?;
    if data.size % u32::from(format.block_align) != 0 {
        return Err(AdmError::MisalignedData {
            data_size: data.size,
            block_align: format.block_align,
        });
    }
    let file_len = stream.seek(SeekFrom::End(0))?;
    if data.offset + u64::from(data.size) > file_len {
        return Err(AdmError::ChunkOutOfBounds {
            id: data.id.as_str(),
            offset: data.offset,
            size: data.size,
        });
    }

    let bytes_per_sample = format.bytes_per_sample();
    let num_frames = data.size / u32::from(format.block_align);

    let mut guard = OutputGuard::new();
    let mut writers = Vec::with_capacity(reader.objects.len());
    for (index, object) in reader.objects.iter().enumerate() {
        let path = output_dir.join(format!("{}_converted{}.wav", file_prefix, index + 1));
        let object_channels = object.num_channels() as u16;
        let data_size = u32::from(object_channels) * u32::from(bytes_per_sample) * num_frames;

        let file = File::create(&path)?;
        guard.track(path.clone());
        let mut writer = BufWriter::new(file);
        write_wav_header(&mut writer, format, object_channels, data_size)?;
        tracing::debug!(path = %path.display(), channels = object_channels, "Splicing object");
        writers.push(writer);
    }

    // One pass over the input: fan each frame's bytes out by object.
    stream.seek(SeekFrom::Start(data.offset))?;
    let mut frame = vec![0u8; usize::from(format.block_align)];
    for _ in 0..num_frames {
        stream.read_exact(&mut frame)?;
        let mut channel = 0usize;
        for (object, writer) in reader.objects.iter().zip(writers.iter_mut()) {
            let begin = channel * usize::from(bytes_per_sample);
            let end = begin + object.num_channels() * usize::from(bytes_per_sample);
            writer.write_all(&frame[begin..end])?;
            channel += object.num_channels();
        }
    }

    for mut writer in writers {
        writer.flush()?;
    }
    guard.disarm();
    Ok(())
}

/// Write a canonical `RIFF/WAVE` header holding only `fmt ` and `data`.
fn write_wav_header<W: Write>(
    writer: &mut W,
    format: &crate::chunks::FormatInfo,
    channels: u16,
    data_size: u32,
) -> Result<()> {
    let bytes_per_sample = format.bytes_per_sample();
    let block_align = channels * bytes_per_sample;
    let avg_bytes_per_sec =
        u32::from(block_align) * format.samples_per_sec;
    let riff_size = 4 + (8 + FMT_CHUNK_SIZE) + (8 + data_size);

    writer.write_all(b"RIFF")?;
    writer.write_u32::<LittleEndian>(riff_size)?;
    writer.write_all(b"WAVE")?;
    writer.write_all(b"fmt ")?;
    writer.write_u32::<LittleEndian>(FMT_CHUNK_SIZE)?;
    writer.write_u16::<LittleEndian>(format.format_tag)?;
    writer.write_u16::<LittleEndian>(channels)?;
    writer.write_u32::<LittleEndian>(format.samples_per_sec)?;
    writer.write_u32::<LittleEndian>(avg_bytes_per_sec)?;
    writer.write_u16::<LittleEndian>(block_align)?;
    writer.write_u16::<LittleEndian>(format.bits_per_sample)?;
    writer.write_all(b"data")?;
    writer.write_u32::<LittleEndian>(data_size)?;
    Ok(())
}
