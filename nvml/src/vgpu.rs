/*!
vGPU instances and vGPU types.

Unlike the other handles, both of these are plain integers in the C API, so
they carry no pointer and are cheap to copy around.
*/

use crate::device::DeviceApi;
use crate::error::{nvml_sym, nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::struct_wrappers::vgpu::{read_with_opaque_data, VgpuLicenseInfo};
use crate::struct_wrappers::VgpuMetadata;
use crate::Nvml;

use std::ffi::CStr;
use std::mem;
use std::os::raw::{c_char, c_uint, c_ulonglong};

use static_assertions::assert_impl_all;

/// A vGPU instance running on this host.
#[derive(Debug, Clone, Copy)]
pub struct VgpuInstance<'nvml> {
    instance: nvmlVgpuInstance_t,
    nvml: &'nvml Nvml,
}

assert_impl_all!(VgpuInstance<'static>: Send, Sync, VgpuInstanceApi<'static>);

impl<'nvml> VgpuInstance<'nvml> {
    /**
    Create a new `VgpuInstance` wrapper.

    # Safety

    It is your responsibility to ensure that `instance` names a vGPU
    instance NVML handed out.
    */
    pub unsafe fn new(instance: nvmlVgpuInstance_t, nvml: &'nvml Nvml) -> Self {
        Self { instance, nvml }
    }
}

impl<'nvml> VgpuInstanceApi<'nvml> for VgpuInstance<'nvml> {
    unsafe fn handle(&self) -> nvmlVgpuInstance_t {
        self.instance
    }

    fn nvml(&self) -> &'nvml Nvml {
        self.nvml
    }
}

/// Operations on a vGPU instance.
pub trait VgpuInstanceApi<'nvml> {
    /// Get the raw vGPU instance id.
    ///
    /// # Safety
    ///
    /// This is unsafe to prevent it from being used without care.
    unsafe fn handle(&self) -> nvmlVgpuInstance_t;

    fn nvml(&self) -> &'nvml Nvml;

    /**
    Gets the metadata of this vGPU instance, including the opaque data NVML
    appends after the fixed fields.

    The result can be handed to `Nvml::vgpu_compatibility()` as is.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `NotFound`, if the instance is not running
    */
    #[doc(alias = "nvmlVgpuInstanceGetMetadata")]
    fn metadata(&self) -> Result<VgpuMetadata, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().vgpu_instance_get_metadata)?;

        unsafe {
            let instance = self.handle();
            let (raw, opaque_data) =
                read_with_opaque_data(|metadata, size| sym(instance, metadata, size))?;

            Ok(VgpuMetadata::from_parts(raw, opaque_data))
        }
    }

    /**
    Gets the UUID of this vGPU instance.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `NotFound`, if the instance is not running
    * `Utf8Error`, if the string obtained from the C function is not valid Utf8
    */
    #[doc(alias = "nvmlVgpuInstanceGetUUID")]
    fn uuid(&self) -> Result<String, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().vgpu_instance_get_uuid)?;

        unsafe {
            let mut buf: Vec<c_char> = vec![0; NVML_DEVICE_UUID_V2_BUFFER_SIZE as usize];
            nvml_try(sym(
                self.handle(),
                buf.as_mut_ptr(),
                NVML_DEVICE_UUID_V2_BUFFER_SIZE,
            ))?;

            Ok(CStr::from_ptr(buf.as_ptr()).to_str()?.into())
        }
    }

    /**
    Gets the vGPU type this instance was created with.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `NotFound`, if the instance is not running
    */
    #[doc(alias = "nvmlVgpuInstanceGetType")]
    fn type_id(&self) -> Result<VgpuTypeId<'nvml>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().vgpu_instance_get_type)?;

        unsafe {
            let mut type_id: nvmlVgpuTypeId_t = mem::zeroed();
            nvml_try(sym(self.handle(), &mut type_id))?;

            Ok(VgpuTypeId::new(type_id, self.nvml()))
        }
    }

    /**
    Gets the license state of this vGPU instance.

    Uses `nvmlVgpuInstanceGetLicenseInfo_v2` when the library exports it.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `NotFound`, if the instance is not running
    */
    #[doc(alias = "nvmlVgpuInstanceGetLicenseInfo_v2")]
    fn license_info(&self) -> Result<VgpuLicenseInfo, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().vgpu_instance_get_license_info)?;

        unsafe {
            let mut info: nvmlVgpuLicenseInfo_t = mem::zeroed();
            nvml_try(sym(self.handle(), &mut info))?;

            Ok(VgpuLicenseInfo::from(info))
        }
    }

    /**
    Gets the framebuffer memory this instance uses, in bytes.

    # Errors

    * `InvalidArg`, if this instance is invalid
    * `NotFound`, if the instance is not running
    */
    #[doc(alias = "nvmlVgpuInstanceGetFbUsage")]
    fn fb_usage(&self) -> Result<u64, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().vgpu_instance_get_fb_usage)?;

        unsafe {
            let mut usage: c_ulonglong = 0;
            nvml_try(sym(self.handle(), &mut usage))?;

            Ok(usage)
        }
    }
}

/// A vGPU type a device can host.
#[derive(Debug, Clone, Copy)]
pub struct VgpuTypeId<'nvml> {
    id: nvmlVgpuTypeId_t,
    nvml: &'nvml Nvml,
}

assert_impl_all!(VgpuTypeId<'static>: Send, Sync, VgpuTypeIdApi<'static>);

impl<'nvml> VgpuTypeId<'nvml> {
    /**
    Create a new `VgpuTypeId` wrapper.

    # Safety

    It is your responsibility to ensure that `id` names a vGPU type NVML
    handed out.
    */
    pub unsafe fn new(id: nvmlVgpuTypeId_t, nvml: &'nvml Nvml) -> Self {
        Self { id, nvml }
    }

    /// The numeric id of this type.
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl<'nvml> VgpuTypeIdApi<'nvml> for VgpuTypeId<'nvml> {
    unsafe fn handle(&self) -> nvmlVgpuTypeId_t {
        self.id
    }

    fn nvml(&self) -> &'nvml Nvml {
        self.nvml
    }
}

/// Reads a string through an entry point that takes the buffer size in and
/// out.
unsafe fn read_sized_string(
    sym: unsafe extern "C" fn(nvmlVgpuTypeId_t, *mut c_char, *mut c_uint) -> nvmlReturn_t,
    id: nvmlVgpuTypeId_t,
) -> Result<String, NvmlError> {
    let mut size = NVML_VGPU_NAME_BUFFER_SIZE;
    let mut buf: Vec<c_char> = vec![0; size as usize];
    nvml_try(sym(id, buf.as_mut_ptr(), &mut size))?;

    Ok(CStr::from_ptr(buf.as_ptr()).to_str()?.into())
}

/// Operations on a vGPU type.
pub trait VgpuTypeIdApi<'nvml> {
    /// Get the raw vGPU type id.
    ///
    /// # Safety
    ///
    /// This is unsafe to prevent it from being used without care.
    unsafe fn handle(&self) -> nvmlVgpuTypeId_t;

    fn nvml(&self) -> &'nvml Nvml;

    /**
    Gets the name of this vGPU type, e.g. `GRID M60-2Q`.

    # Errors

    * `InvalidArg`, if this type is invalid
    * `Utf8Error`, if the string obtained from the C function is not valid Utf8
    */
    #[doc(alias = "nvmlVgpuTypeGetName")]
    fn name(&self) -> Result<String, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().vgpu_type_get_name)?;

        unsafe { read_sized_string(sym, self.handle()) }
    }

    /**
    Gets the class of this vGPU type, e.g. `Quadro`.

    # Errors

    * `InvalidArg`, if this type is invalid
    * `Utf8Error`, if the string obtained from the C function is not valid Utf8
    */
    #[doc(alias = "nvmlVgpuTypeGetClass")]
    fn class(&self) -> Result<String, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().vgpu_type_get_class)?;

        unsafe { read_sized_string(sym, self.handle()) }
    }

    /**
    Gets the framebuffer size of this vGPU type, in bytes.

    # Errors

    * `InvalidArg`, if this type is invalid
    */
    #[doc(alias = "nvmlVgpuTypeGetFramebufferSize")]
    fn framebuffer_size(&self) -> Result<u64, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().vgpu_type_get_framebuffer_size)?;

        unsafe {
            let mut size: c_ulonglong = 0;
            nvml_try(sym(self.handle(), &mut size))?;

            Ok(size)
        }
    }

    /**
    Gets how many instances of this type `device` can host at once.

    # Errors

    * `InvalidArg`, if this type or `device` is invalid
    * `NotSupported`, if `device` cannot host this type
    */
    #[doc(alias = "nvmlVgpuTypeGetMaxInstances")]
    fn max_instances(&self, device: &impl DeviceApi<'nvml>) -> Result<u32, NvmlError>
    where
        Self: Sized,
    {
        let sym = nvml_sym(&self.nvml().lib().vgpu_type_get_max_instances)?;

        unsafe {
            let mut count: c_uint = 0;
            nvml_try(sym(device.handle(), self.handle(), &mut count))?;

            Ok(count)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::enum_wrappers::vgpu::VgpuGuestInfoState;
    use crate::test_utils::*;

    #[test]
    fn handles_are_plain_ids() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let instance = unsafe { VgpuInstance::new(7, &nvml) };
        let type_id = unsafe { VgpuTypeId::new(42, &nvml) };

        assert_eq!(unsafe { instance.handle() }, 7);
        assert_eq!(type_id.id(), 42);
    }

    #[test]
    fn instance_metadata() {
        let (nvml, _library) = mock_nvml(
            MockLibrary::new()
                .export("nvmlVgpuInstanceGetMetadata", fake::vgpu_instance_get_metadata as usize),
        );
        let instance = unsafe { VgpuInstance::new(7, &nvml) };

        let metadata = instance.metadata().unwrap();
        assert_eq!(metadata.revision(), 7);
        assert_eq!(metadata.guest_driver_version().unwrap(), "551.61");
        assert_eq!(
            metadata.guest_info_state().unwrap(),
            VgpuGuestInfoState::Initialized
        );
        assert!(metadata.opaque_data().is_empty());
    }

    #[test]
    fn type_name() {
        let (nvml, _library) = mock_nvml(
            MockLibrary::new().export("nvmlVgpuTypeGetName", fake::vgpu_type_get_name as usize),
        );
        let type_id = unsafe { VgpuTypeId::new(42, &nvml) };

        assert_eq!(type_id.name().unwrap(), "GRID A100-4C");
    }

    #[test]
    fn license_info_falls_back_to_the_baseline_name() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let instance = unsafe { VgpuInstance::new(7, &nvml) };

        match instance.license_info() {
            Err(NvmlError::FailedToLoadSymbol(symbol)) => {
                assert_eq!(symbol, "nvmlVgpuInstanceGetLicenseInfo")
            }
            other => panic!("expected a missing symbol, got {:?}", other),
        }
    }

    #[test]
    #[ignore = "requires a vGPU host"]
    fn active_vgpus() {
        let nvml = nvml();
        let device = device(&nvml);

        for vgpu in device.active_vgpus().expect("vgpus") {
            vgpu.uuid().expect("uuid");
            vgpu.type_id().expect("type").name().expect("name");
        }
    }
}
