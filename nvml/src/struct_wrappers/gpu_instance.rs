use crate::device::{Device, DeviceApi};
use crate::ffi::bindings::*;
use crate::gpu_instance::{GpuInstance, GpuInstanceApi};
use crate::struct_wrappers::device::GpuInstancePlacement;
use crate::Nvml;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

/// A GPU instance together with the device it was carved from.
#[derive(Debug)]
pub struct GpuInstanceInfo<'nvml> {
    pub device: Device<'nvml>,
    pub id: u32,
    pub profile_id: u32,
    pub placement: GpuInstancePlacement,
}

impl<'nvml> GpuInstanceInfo<'nvml> {
    /**
    Convert the C struct field by field.

    # Safety

    The device handle inside `raw` must be valid for `'nvml`.
    */
    pub unsafe fn convert(raw: nvmlGpuInstanceInfo_t, nvml: &'nvml Nvml) -> Self {
        Self {
            device: Device::new(raw.device, nvml),
            id: raw.id,
            profile_id: raw.profileId,
            placement: raw.placement.into(),
        }
    }

    pub fn as_c(&self) -> nvmlGpuInstanceInfo_t {
        nvmlGpuInstanceInfo_t {
            device: unsafe { self.device.handle() },
            id: self.id,
            profileId: self.profile_id,
            placement: self.placement.as_c(),
        }
    }
}

/// Where a compute instance sits within its GPU instance, in slices.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComputeInstancePlacement {
    pub start: u32,
    pub size: u32,
}

impl From<nvmlComputeInstancePlacement_t> for ComputeInstancePlacement {
    fn from(struct_: nvmlComputeInstancePlacement_t) -> Self {
        Self {
            start: struct_.start,
            size: struct_.size,
        }
    }
}

/// A compute instance together with the GPU instance and device it belongs to.
#[derive(Debug)]
pub struct ComputeInstanceInfo<'nvml> {
    pub device: Device<'nvml>,
    pub gpu_instance: GpuInstance<'nvml>,
    pub id: u32,
    pub profile_id: u32,
    pub placement: ComputeInstancePlacement,
}

impl<'nvml> ComputeInstanceInfo<'nvml> {
    /**
    Convert the C struct field by field.

    # Safety

    The device and GPU instance handles inside `raw` must be valid for `'nvml`.
    */
    pub unsafe fn convert(raw: nvmlComputeInstanceInfo_t, nvml: &'nvml Nvml) -> Self {
        Self {
            device: Device::new(raw.device, nvml),
            gpu_instance: GpuInstance::new(raw.gpuInstance, nvml),
            id: raw.id,
            profile_id: raw.profileId,
            placement: raw.placement.into(),
        }
    }

    pub fn as_c(&self) -> nvmlComputeInstanceInfo_t {
        unsafe {
            nvmlComputeInstanceInfo_t {
                device: self.device.handle(),
                gpuInstance: self.gpu_instance.handle(),
                id: self.id,
                profileId: self.profile_id,
                placement: nvmlComputeInstancePlacement_t {
                    start: self.placement.start,
                    size: self.placement.size,
                },
            }
        }
    }
}

/// Resources of one compute instance profile within a GPU instance.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComputeInstanceProfileInfo {
    pub id: u32,
    pub slice_count: u32,
    pub instance_count: u32,
    pub multiprocessor_count: u32,
    pub shared_copy_engine_count: u32,
    pub shared_decoder_count: u32,
    pub shared_encoder_count: u32,
    pub shared_jpeg_count: u32,
    pub shared_ofa_count: u32,
}

impl From<nvmlComputeInstanceProfileInfo_t> for ComputeInstanceProfileInfo {
    fn from(struct_: nvmlComputeInstanceProfileInfo_t) -> Self {
        Self {
            id: struct_.id,
            slice_count: struct_.sliceCount,
            instance_count: struct_.instanceCount,
            multiprocessor_count: struct_.multiprocessorCount,
            shared_copy_engine_count: struct_.sharedCopyEngineCount,
            shared_decoder_count: struct_.sharedDecoderCount,
            shared_encoder_count: struct_.sharedEncoderCount,
            shared_jpeg_count: struct_.sharedJpegCount,
            shared_ofa_count: struct_.sharedOfaCount,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{fake_handle, mock_nvml, MockLibrary};

    #[test]
    fn gpu_instance_info_round_trip() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let raw = nvmlGpuInstanceInfo_t {
            device: fake_handle(1),
            id: 7,
            profileId: NVML_GPU_INSTANCE_PROFILE_3_SLICE,
            placement: nvmlGpuInstancePlacement_t { start: 4, size: 4 },
        };

        let info = unsafe { GpuInstanceInfo::convert(raw, &nvml) };
        assert_eq!(info.id, 7);
        assert_eq!(info.placement, GpuInstancePlacement { start: 4, size: 4 });

        let back = info.as_c();
        assert_eq!(back.device, raw.device);
        assert_eq!(back.profileId, raw.profileId);
        assert_eq!(back.placement.start, 4);
    }

    #[test]
    fn compute_instance_info_keeps_both_handles() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let raw = nvmlComputeInstanceInfo_t {
            device: fake_handle(1),
            gpuInstance: fake_handle(2),
            id: 0,
            profileId: NVML_COMPUTE_INSTANCE_PROFILE_1_SLICE,
            placement: nvmlComputeInstancePlacement_t { start: 0, size: 1 },
        };

        let info = unsafe { ComputeInstanceInfo::convert(raw, &nvml) };
        let back = info.as_c();
        assert_eq!(back.device, raw.device);
        assert_eq!(back.gpuInstance, raw.gpuInstance);
        assert_eq!(info.placement.size, 1);
    }
}
