use crate::error::NvmlError;
use crate::ffi::bindings::*;

pub mod device;
pub mod unit;
pub mod vgpu;

pub fn bool_from_state(state: nvmlEnableState_t) -> Result<bool, NvmlError> {
    match state {
        nvmlEnableState_enum_NVML_FEATURE_DISABLED => Ok(false),
        nvmlEnableState_enum_NVML_FEATURE_ENABLED => Ok(true),
        _ => Err(NvmlError::UnexpectedVariant(state)),
    }
}

pub fn state_from_bool(enabled: bool) -> nvmlEnableState_t {
    if enabled {
        nvmlEnableState_enum_NVML_FEATURE_ENABLED
    } else {
        nvmlEnableState_enum_NVML_FEATURE_DISABLED
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn states() {
        assert!(!bool_from_state(state_from_bool(false)).unwrap());
        assert!(bool_from_state(state_from_bool(true)).unwrap());
        assert!(matches!(
            bool_from_state(2),
            Err(NvmlError::UnexpectedVariant(2))
        ));
    }
}
