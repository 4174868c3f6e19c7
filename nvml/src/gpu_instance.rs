/*!
MIG GPU instances.

A GPU instance is a partition of a MIG-enabled device, created with
`DeviceApi::create_gpu_instance()` and carved further into compute instances.
Instances outlive the handles that refer to them: dropping a `GpuInstance`
leaves the partition in place, and only [`GpuInstanceApi::destroy`] removes it.
*/

use crate::compute_instance::ComputeInstance;
use crate::error::{nvml_sym, nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::struct_wrappers::gpu_instance::ComputeInstanceProfileInfo;
use crate::struct_wrappers::GpuInstanceInfo;
use crate::Nvml;

use std::mem;
use std::os::raw::c_uint;

use static_assertions::assert_impl_all;

/// A GPU instance on a MIG-enabled device.
#[derive(Debug, Clone, Copy)]
pub struct GpuInstance<'nvml> {
    instance: nvmlGpuInstance_t,
    nvml: &'nvml Nvml,
}

unsafe impl<'nvml> Send for GpuInstance<'nvml> {}
unsafe impl<'nvml> Sync for GpuInstance<'nvml> {}

assert_impl_all!(GpuInstance<'static>: Send, Sync, GpuInstanceApi<'static>);

impl<'nvml> GpuInstance<'nvml> {
    /**
    Create a new `GpuInstance` wrapper.

    # Safety

    It is your responsibility to ensure that the given `nvmlGpuInstance_t`
    pointer is valid.
    */
    pub unsafe fn new(instance: nvmlGpuInstance_t, nvml: &'nvml Nvml) -> Self {
        Self { instance, nvml }
    }
}

impl<'nvml> GpuInstanceApi<'nvml> for GpuInstance<'nvml> {
    unsafe fn handle(&self) -> nvmlGpuInstance_t {
        self.instance
    }

    fn nvml(&self) -> &'nvml Nvml {
        self.nvml
    }
}

/// Operations on a GPU instance.
pub trait GpuInstanceApi<'nvml> {
    /// Get the raw GPU instance handle.
    ///
    /// # Safety
    ///
    /// This is unsafe to prevent it from being used without care.
    unsafe fn handle(&self) -> nvmlGpuInstance_t;

    fn nvml(&self) -> &'nvml Nvml;

    /**
    Gets the device, ID, profile and placement of this instance.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `NotSupported`, if the device does not support MIG
    * `NoPermission`, if the caller lacks permission
    */
    #[doc(alias = "nvmlGpuInstanceGetInfo")]
    fn info(&self) -> Result<GpuInstanceInfo<'nvml>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().gpu_instance_get_info)?;

        unsafe {
            let mut info: nvmlGpuInstanceInfo_t = mem::zeroed();
            nvml_try(sym(self.handle(), &mut info))?;

            Ok(GpuInstanceInfo::convert(info, self.nvml()))
        }
    }

    /**
    Gets the resources of a compute instance profile within this instance.

    `profile` is one of the `NVML_COMPUTE_INSTANCE_PROFILE_*` constants and
    `engine_profile` one of the `NVML_COMPUTE_INSTANCE_ENGINE_PROFILE_*` ones.

    # Errors

    * `InvalidArg`, if this instance or either profile is invalid
    * `NotSupported`, if the profile is not supported
    * `NoPermission`, if the caller lacks permission
    */
    #[doc(alias = "nvmlGpuInstanceGetComputeInstanceProfileInfo")]
    fn compute_instance_profile_info(
        &self,
        profile: u32,
        engine_profile: u32,
    ) -> Result<ComputeInstanceProfileInfo, NvmlError> {
        let sym = nvml_sym(
            &self
                .nvml()
                .lib()
                .gpu_instance_get_compute_instance_profile_info,
        )?;

        unsafe {
            let mut info: nvmlComputeInstanceProfileInfo_t = mem::zeroed();
            nvml_try(sym(self.handle(), profile, engine_profile, &mut info))?;

            Ok(info.into())
        }
    }

    /**
    Create a compute instance of profile `profile_id` inside this instance.

    The compute instance is not destroyed when the returned handle is
    dropped; call [`crate::ComputeInstanceApi::destroy`].

    # Errors

    * `InvalidArg`, if this instance or `profile_id` is invalid
    * `NoPermission`, if the caller lacks permission
    * `InsufficientResources`, if this instance has no room left
    */
    #[doc(alias = "nvmlGpuInstanceCreateComputeInstance")]
    fn create_compute_instance(
        &self,
        profile_id: u32,
    ) -> Result<ComputeInstance<'nvml>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().gpu_instance_create_compute_instance)?;

        unsafe {
            let mut instance: nvmlComputeInstance_t = mem::zeroed();
            nvml_try(sym(self.handle(), profile_id, &mut instance))?;

            Ok(ComputeInstance::new(instance, self.nvml()))
        }
    }

    /**
    Gets the compute instances of profile `profile_id` inside this instance.

    The buffer is sized from the profile's instance count, read with the
    shared engine profile.

    # Errors

    * `InvalidArg`, if this instance or `profile_id` is invalid
    * `NoPermission`, if the caller lacks permission
    */
    #[doc(alias = "nvmlGpuInstanceGetComputeInstances")]
    fn compute_instances(
        &self,
        profile_id: u32,
    ) -> Result<Vec<ComputeInstance<'nvml>>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().gpu_instance_get_compute_instances)?;
        let capacity = self
            .compute_instance_profile_info(
                profile_id,
                NVML_COMPUTE_INSTANCE_ENGINE_PROFILE_SHARED,
            )?
            .instance_count;

        unsafe {
            let mut count: c_uint = 0;
            let mut instances: Vec<nvmlComputeInstance_t> =
                vec![mem::zeroed(); capacity as usize];

            nvml_try(sym(
                self.handle(),
                profile_id,
                instances.as_mut_ptr(),
                &mut count,
            ))?;

            instances.truncate(count as usize);
            Ok(instances
                .into_iter()
                .map(|i| ComputeInstance::new(i, self.nvml()))
                .collect())
        }
    }

    /**
    Gets the compute instance with the given ID inside this instance.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `NotFound`, if no compute instance has that ID
    */
    #[doc(alias = "nvmlGpuInstanceGetComputeInstanceById")]
    fn compute_instance_by_id(&self, id: u32) -> Result<ComputeInstance<'nvml>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().gpu_instance_get_compute_instance_by_id)?;

        unsafe {
            let mut instance: nvmlComputeInstance_t = mem::zeroed();
            nvml_try(sym(self.handle(), id, &mut instance))?;

            Ok(ComputeInstance::new(instance, self.nvml()))
        }
    }

    /**
    Destroy this GPU instance.

    Every handle to it, and to the compute instances inside it, is invalid
    afterwards.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `InUse`, if compute instances or processes still use it
    * `NoPermission`, if the caller lacks permission
    */
    #[doc(alias = "nvmlGpuInstanceDestroy")]
    fn destroy(&self) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().gpu_instance_destroy)?;

        unsafe { nvml_try(sym(self.handle())) }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::DeviceApi;
    use crate::test_utils::*;

    #[test]
    fn handle_round_trip() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let instance = unsafe { GpuInstance::new(fake_handle(9), &nvml) };

        assert_eq!(unsafe { instance.handle() }, fake_handle(9));
    }

    #[test]
    fn info_converts_field_by_field() {
        let (nvml, _library) = mock_nvml(
            MockLibrary::new().export("nvmlGpuInstanceGetInfo", fake::gpu_instance_get_info as usize),
        );
        let instance = unsafe { GpuInstance::new(fake_handle(4), &nvml) };

        let info = instance.info().unwrap();
        assert_eq!(info.id, 4);
        assert_eq!(info.profile_id, NVML_GPU_INSTANCE_PROFILE_1_SLICE);
        assert_eq!(unsafe { info.device.handle() }, fake_handle(1));
    }

    #[test]
    fn destroy_needs_its_entry_point() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let instance = unsafe { GpuInstance::new(fake_handle(4), &nvml) };

        match instance.destroy() {
            Err(NvmlError::FailedToLoadSymbol(symbol)) => {
                assert_eq!(symbol, "nvmlGpuInstanceDestroy")
            }
            other => panic!("expected a missing symbol, got {:?}", other),
        }
    }

    #[test]
    #[ignore = "requires a MIG-enabled GPU"]
    fn gpu_instances() {
        let nvml = nvml();
        let device = device(&nvml);

        for instance in device
            .gpu_instances(NVML_GPU_INSTANCE_PROFILE_1_SLICE)
            .expect("instances")
        {
            instance.info().expect("info");
        }
    }
}
