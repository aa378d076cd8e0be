//! Per-parameter-id timestamp allocation.

use crate::error::{ParamError, Result};
use iamf_core::DecodedUleb128;
use std::collections::HashMap;

/// Allocates `[start, end)` windows to successive parameter blocks.
///
/// Each parameter id starts at timestamp zero; every allocated block
/// advances that id's clock by its duration. Metadata requesting any other
/// start is rejected, which catches gaps and out-of-order arrival.
#[derive(Debug, Clone, Default)]
pub struct GlobalTimingModule {
    next_start: HashMap<DecodedUleb128, i64>,
}

impl GlobalTimingModule {
    /// Create a timing module with no allocated blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next `[start, end)` window for `parameter_id`.
    ///
    /// `requested_start` must equal the id's current clock.
    pub fn next_parameter_block_timestamps(
        &mut self,
        parameter_id: DecodedUleb128,
        requested_start: i64,
        duration: DecodedUleb128,
    ) -> Result<(i64, i64)> {
        let next = self.next_start.entry(parameter_id).or_insert(0);
        if *next != requested_start {
            return Err(ParamError::TimestampMismatch {
                parameter_id,
                expected: *next,
                requested: requested_start,
            });
        }
        let start = *next;
        let end = start + i64::from(duration);
        *next = end;
        Ok((start, end))
    }
}
