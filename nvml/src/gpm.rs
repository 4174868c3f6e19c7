use crate::error::{nvml_sym, nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::Nvml;

use std::mem;

use static_assertions::assert_impl_all;

/**
A buffer NVML fills with a device's GPU performance monitoring counters.

Allocate one with `Nvml::gpm_sample()`, fill it with
`DeviceApi::gpm_sample_get()` and compare two of them with
`Nvml::gpm_metrics_get()`. The buffer is freed when dropped.
*/
#[derive(Debug)]
pub struct GpmSample<'nvml> {
    sample: nvmlGpmSample_t,
    nvml: &'nvml Nvml,
}

unsafe impl<'nvml> Send for GpmSample<'nvml> {}
unsafe impl<'nvml> Sync for GpmSample<'nvml> {}

assert_impl_all!(GpmSample<'static>: Send, Sync, GpmSampleApi<'static>);

impl<'nvml> GpmSample<'nvml> {
    /**
    Create a new `GpmSample` wrapper that frees the sample when dropped.

    # Safety

    It is your responsibility to ensure that the given `nvmlGpmSample_t`
    pointer is valid and owned by nothing else.
    */
    pub unsafe fn new(sample: nvmlGpmSample_t, nvml: &'nvml Nvml) -> Self {
        Self { sample, nvml }
    }

    /**
    Free this sample, reporting any error (*the `Drop` implementation ignores
    errors!*).

    # Errors

    * `InvalidArg`, if the sample is invalid
    */
    #[doc(alias = "nvmlGpmSampleFree")]
    pub fn free(self) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpm_sample_free)?;

        unsafe {
            nvml_try(sym(self.sample))?;
        }

        mem::forget(self);
        Ok(())
    }
}

impl<'nvml> GpmSampleApi<'nvml> for GpmSample<'nvml> {
    unsafe fn handle(&self) -> nvmlGpmSample_t {
        self.sample
    }

    fn nvml(&self) -> &'nvml Nvml {
        self.nvml
    }
}

/// Access to a GPM sample buffer.
///
/// Samples are filled and compared by `DeviceApi` and `Nvml` methods that
/// take `&impl GpmSampleApi`.
pub trait GpmSampleApi<'nvml> {
    /// Get the raw sample handle.
    ///
    /// # Safety
    ///
    /// This is unsafe to prevent it from being used without care.
    unsafe fn handle(&self) -> nvmlGpmSample_t;

    fn nvml(&self) -> &'nvml Nvml;
}

impl<'nvml> Drop for GpmSample<'nvml> {
    #[doc(alias = "nvmlGpmSampleFree")]
    fn drop(&mut self) {
        match nvml_sym(&self.nvml.lib().gpm_sample_free) {
            Ok(sym) => {
                if let Err(e) = unsafe { nvml_try(sym(self.sample)) } {
                    log::warn!("nvmlGpmSampleFree failed: {}", e);
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    }
}
