//! RIFF/BW64 chunk primitives.

use crate::error::{AdmError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

/// FourCC (Four Character Code) chunk identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// `RIFF` outer chunk id.
    pub const RIFF: FourCC = FourCC(*b"RIFF");
    /// `BW64` outer chunk id (64-bit broadcast wave).
    pub const BW64: FourCC = FourCC(*b"BW64");
    /// `WAVE` form type.
    pub const WAVE: FourCC = FourCC(*b"WAVE");
    /// `fmt ` descriptor chunk id.
    pub const FMT: FourCC = FourCC(*b"fmt ");
    /// `data` PCM chunk id.
    pub const DATA: FourCC = FourCC(*b"data");
    /// `axml` ADM metadata chunk id.
    pub const AXML: FourCC = FourCC(*b"axml");

    /// Read a FourCC from a stream.
    pub fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut bytes = [0u8; 4];
        reader.read_exact(&mut bytes)?;
        Ok(FourCC(bytes))
    }

    /// Get as a lossy string.
    pub fn as_str(&self) -> String {
        String::from_utf8_lossy(&self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl std::fmt::Debug for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FourCC(\"{}\")", self.as_str())
    }
}

impl std::fmt::Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(bytes: [u8; 4]) -> Self {
        FourCC(bytes)
    }
}

/// Location of one chunk payload within the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEntry {
    /// Chunk identifier.
    pub id: FourCC,
    /// File offset of the payload (past the 8-byte chunk header).
    pub offset: u64,
    /// Declared payload size in bytes.
    pub size: u32,
}

/// Decoded `fmt ` descriptor of a PCM WAVE file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatInfo {
    /// Format tag; 0x0001 for integer PCM.
    pub format_tag: u16,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hertz.
    pub samples_per_sec: u32,
    /// Average bytes per second.
    pub avg_bytes_per_sec: u32,
    /// Bytes per interleaved frame.
    pub block_align: u16,
    /// Bits per sample.
    pub bits_per_sample: u16,
}

impl FormatInfo {
    /// Parse the fixed 16-byte PCM descriptor from a `fmt ` payload.
    pub fn read<R: Read>(reader: &mut R, chunk_size: u32) -> Result<Self> {
        if chunk_size < 16 {
            return Err(AdmError::InvalidFmtChunk { size: chunk_size });
        }
        let info = FormatInfo {
            format_tag: reader.read_u16::<LittleEndian>()?,
            channels: reader.read_u16::<LittleEndian>()?,
            samples_per_sec: reader.read_u32::<LittleEndian>()?,
            avg_bytes_per_sec: reader.read_u32::<LittleEndian>()?,
            block_align: reader.read_u16::<LittleEndian>()?,
            bits_per_sample: reader.read_u16::<LittleEndian>()?,
        };
        if info.channels == 0 {
            return Err(AdmError::ZeroChannels);
        }
        Ok(info)
    }

    /// Bytes each sample occupies, rounded up to whole bytes.
    pub fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample.div_ceil(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_fourcc() {
        let id = FourCC::read(&mut Cursor::new(b"fmt junk")).unwrap();
        assert_eq!(id, FourCC::FMT);
        assert_eq!(id.as_str(), "fmt ");
        assert_eq!(format!("{:?}", id), "FourCC(\"fmt \")");
    }

    #[test]
    fn test_format_info_read() {
        let payload = [
            0x01, 0x00, // format tag
            0x02, 0x00, // channels
            0x80, 0xbb, 0x00, 0x00, // 48000 Hz
            0x00, 0xee, 0x02, 0x00, // 192000 bytes/sec
            0x04, 0x00, // block align
            0x10, 0x00, // bits per sample
        ];
        let info = FormatInfo::read(&mut Cursor::new(&payload), 16).unwrap();
        assert_eq!(info.channels, 2);
        assert_eq!(info.samples_per_sec, 48_000);
        assert_eq!(info.bytes_per_sample(), 2);
    }

    #[test]
    fn test_format_info_rejects_short_chunk() {
        let payload = [0u8; 16];
        assert!(matches!(
            FormatInfo::read(&mut Cursor::new(&payload), 12),
            Err(AdmError::InvalidFmtChunk { size: 12 })
        ));
    }

    #[test]
    fn test_format_info_rejects_zero_channels() {
        let payload = [
            0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02, 0x00,
            0x10, 0x00,
        ];
        assert!(matches!(
            FormatInfo::read(&mut Cursor::new(&payload), 16),
            Err(AdmError::ZeroChannels)
        ));
    }

    #[test]
    fn test_odd_bit_depths_round_up() {
        let info = FormatInfo {
            format_tag: 1,
            channels: 1,
            samples_per_sec: 48_000,
            avg_bytes_per_sec: 0,
            block_align: 3,
            bits_per_sample: 20,
        };
        assert_eq!(info.bytes_per_sample(), 3);
    }
}
