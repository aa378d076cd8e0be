//! Assembled parameter blocks.

use crate::error::Result;
use iamf_core::{leb128, DecodedUleb128, ParameterData};
use std::io::Write;

/// One subblock of an assembled parameter block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSubblock {
    /// Explicit duration; present only when the block carries per-subblock
    /// durations.
    pub subblock_duration: Option<DecodedUleb128>,
    /// The subblock's payload.
    pub param_data: ParameterData,
}

/// An OBU-ready parameter block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBlockObu {
    /// Id correlating this block with its definition.
    pub parameter_id: DecodedUleb128,
    /// Block duration in ticks of the parameter rate.
    pub duration: DecodedUleb128,
    /// Constant subblock duration; zero when subblocks carry explicit
    /// durations.
    pub constant_subblock_duration: DecodedUleb128,
    /// The subblocks, in time order.
    pub subblocks: Vec<ParameterSubblock>,
}

impl ParameterBlockObu {
    /// Number of subblocks.
    pub fn num_subblocks(&self) -> usize {
        self.subblocks.len()
    }

    /// Write the parameter-data payload: per subblock, the explicit
    /// duration (when present) followed by the kind-specific payload.
    ///
    /// OBU framing (header, id, size) is the stream writer's concern.
    pub fn write_payload<W: Write>(&self, writer: &mut W) -> Result<()> {
        for subblock in &self.subblocks {
            if let Some(duration) = subblock.subblock_duration {
                leb128::encode(duration, writer)?;
            }
            subblock.param_data.write_payload(writer)?;
        }
        Ok(())
    }
}

/// A parameter block with its allocated time window.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBlockWithData {
    /// The assembled block.
    pub obu: ParameterBlockObu,
    /// Start of the covered window, inclusive.
    pub start_timestamp: i64,
    /// End of the covered window, exclusive.
    pub end_timestamp: i64,
}
