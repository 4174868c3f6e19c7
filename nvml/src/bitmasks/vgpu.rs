use crate::ffi::bindings::*;
use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

bitflags! {
    /// VM power states in which a vGPU can be migrated to a given physical GPU.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct VgpuVmCompatibility: u32 {
        /// Migrate with the VM powered off.
        const COLD      = nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_COLD;
        /// Migrate with the VM hibernated.
        const HIBERNATE = nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_HIBERNATE;
        /// Migrate with the VM asleep.
        const SLEEP     = nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_SLEEP;
        /// Migrate while the VM is running.
        const LIVE      = nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_LIVE;
    }
}

bitflags! {
    /// What limits the compatibility reported in a [`VgpuVmCompatibility`].
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct VgpuCompatibilityLimit: u32 {
        const HOST_DRIVER  =
            nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_HOST_DRIVER;
        const GUEST_DRIVER =
            nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_GUEST_DRIVER;
        const GPU          =
            nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_GPU;
        const OTHER        =
            nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_OTHER;
    }
}
