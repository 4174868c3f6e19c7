use crate::error::{nvml_sym, nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::struct_wrappers::ComputeInstanceInfo;
use crate::Nvml;

use std::mem;

use static_assertions::assert_impl_all;

/// A compute instance inside a MIG GPU instance.
///
/// Dropping the handle does not destroy the instance.
#[derive(Debug, Clone, Copy)]
pub struct ComputeInstance<'nvml> {
    instance: nvmlComputeInstance_t,
    nvml: &'nvml Nvml,
}

unsafe impl<'nvml> Send for ComputeInstance<'nvml> {}
unsafe impl<'nvml> Sync for ComputeInstance<'nvml> {}

assert_impl_all!(ComputeInstance<'static>: Send, Sync, ComputeInstanceApi<'static>);

impl<'nvml> ComputeInstance<'nvml> {
    /**
    Create a new `ComputeInstance` wrapper.

    # Safety

    It is your responsibility to ensure that the given
    `nvmlComputeInstance_t` pointer is valid.
    */
    pub unsafe fn new(instance: nvmlComputeInstance_t, nvml: &'nvml Nvml) -> Self {
        Self { instance, nvml }
    }
}

impl<'nvml> ComputeInstanceApi<'nvml> for ComputeInstance<'nvml> {
    unsafe fn handle(&self) -> nvmlComputeInstance_t {
        self.instance
    }

    fn nvml(&self) -> &'nvml Nvml {
        self.nvml
    }
}

/// Operations on a compute instance.
pub trait ComputeInstanceApi<'nvml> {
    /// Get the raw compute instance handle.
    ///
    /// # Safety
    ///
    /// This is unsafe to prevent it from being used without care.
    unsafe fn handle(&self) -> nvmlComputeInstance_t;

    fn nvml(&self) -> &'nvml Nvml;

    /**
    Gets the device, GPU instance, ID, profile and placement of this
    compute instance.

    Uses the newest `nvmlComputeInstanceGetInfo` revision the library
    exports; only the second one fills in the placement.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `NoPermission`, if the caller lacks permission
    */
    #[doc(alias = "nvmlComputeInstanceGetInfo_v2")]
    fn info(&self) -> Result<ComputeInstanceInfo<'nvml>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().compute_instance_get_info)?;

        unsafe {
            let mut info: nvmlComputeInstanceInfo_t = mem::zeroed();
            nvml_try(sym(self.handle(), &mut info))?;

            Ok(ComputeInstanceInfo::convert(info, self.nvml()))
        }
    }

    /**
    Destroy this compute instance.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `InUse`, if processes still run on it
    * `NoPermission`, if the caller lacks permission
    */
    #[doc(alias = "nvmlComputeInstanceDestroy")]
    fn destroy(&self) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().compute_instance_destroy)?;

        unsafe { nvml_try(sym(self.handle())) }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn handle_round_trip() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let instance = unsafe { ComputeInstance::new(fake_handle(12), &nvml) };

        assert_eq!(unsafe { instance.handle() }, fake_handle(12));
    }

    #[test]
    fn info_reports_the_baseline_when_nothing_is_exported() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let instance = unsafe { ComputeInstance::new(fake_handle(12), &nvml) };

        match instance.info() {
            Err(NvmlError::FailedToLoadSymbol(symbol)) => {
                assert_eq!(symbol, "nvmlComputeInstanceGetInfo")
            }
            other => panic!("expected a missing symbol, got {:?}", other),
        }
    }
}
