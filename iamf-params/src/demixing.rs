//! Demixing subblock building.

use crate::error::{ParamError, Result};
use iamf_core::{DemixingInfoParameterData, ParamDefinitionType};

/// Copy demixing info into a subblock.
///
/// A demixing parameter block carries exactly one subblock; any index past
/// the first fails.
pub fn build_demixing_subblock(
    subblock_index: usize,
    data: &DemixingInfoParameterData,
) -> Result<DemixingInfoParameterData> {
    if subblock_index > 0 {
        return Err(ParamError::TooManySubblocks {
            param_type: ParamDefinitionType::Demixing,
        });
    }
    Ok(*data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iamf_core::DmixpMode;

    #[test]
    fn test_copies_mode_and_reserved_bits() {
        let data = DemixingInfoParameterData {
            dmixp_mode: DmixpMode::Mode3,
            reserved: 0b10101,
        };
        let copied = build_demixing_subblock(0, &data).unwrap();
        assert_eq!(copied, data);
    }

    #[test]
    fn test_second_subblock_fails() {
        let data = DemixingInfoParameterData::default();
        assert!(matches!(
            build_demixing_subblock(1, &data),
            Err(ParamError::TooManySubblocks {
                param_type: ParamDefinitionType::Demixing,
            })
        ));
    }
}
