use crate::enums::device::UsedGpuMemory;
use crate::error::NvmlError;
use crate::ffi::bindings::*;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    convert::TryInto,
    ffi::{CStr, CString},
    os::raw::c_char,
};

/// PCI information about a GPU device.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PciInfo {
    /// The bus on which the device resides, 0 to 0xff.
    pub bus: u32,
    /// The PCI identifier.
    pub bus_id: String,
    /// The device's ID on the bus, 0 to 31.
    pub device: u32,
    /// The PCI domain on which the device's bus resides, 0 to 0xffff.
    pub domain: u32,
    /// The combined 16-bit device ID and 16-bit vendor ID.
    pub pci_device_id: u32,
    /**
    The 32-bit Sub System Device ID.

    Always `None` when obtained from `DeviceApi::nv_link_remote_pci_info()`;
    NVML leaves the field indeterminate there.
    */
    pub pci_sub_system_id: Option<u32>,
}

impl PciInfo {
    /**
    Try to create this struct from its C equivalent.

    Passing `false` for `sub_sys_id_present` will set the `pci_sub_system_id`
    field to `None`. See the field docs for more.

    # Errors

    * `Utf8Error`, if the string obtained from the C function is not valid Utf8
    */
    pub fn try_from(struct_: nvmlPciInfo_t, sub_sys_id_present: bool) -> Result<Self, NvmlError> {
        unsafe {
            let bus_id_raw = CStr::from_ptr(struct_.busId.as_ptr());

            Ok(Self {
                bus: struct_.bus,
                bus_id: bus_id_raw.to_str()?.into(),
                device: struct_.device,
                domain: struct_.domain,
                pci_device_id: struct_.pciDeviceId,
                pci_sub_system_id: if sub_sys_id_present {
                    Some(struct_.pciSubSystemId)
                } else {
                    None
                },
            })
        }
    }

    /// A `PciInfo` with every location field zeroed, which NVML reads as
    /// "search the entire PCI tree" in `Nvml::discover_gpus()`.
    pub fn whole_tree() -> Self {
        Self {
            bus: 0,
            bus_id: String::new(),
            device: 0,
            domain: 0,
            pci_device_id: 0,
            pci_sub_system_id: None,
        }
    }
}

impl TryInto<nvmlPciInfo_t> for PciInfo {
    type Error = NvmlError;

    /**
    Convert this `PciInfo` back into its C equivalent.

    # Errors

    * `NulError`, if a nul byte was found in the bus_id
    * `StringTooLong`, if `bus_id.len()` exceeded the length of
    `NVML_DEVICE_PCI_BUS_ID_BUFFER_SIZE`
    */
    fn try_into(self) -> Result<nvmlPciInfo_t, Self::Error> {
        const BUF_SIZE: usize = NVML_DEVICE_PCI_BUS_ID_BUFFER_SIZE as usize;

        let mut bus_id_c: [c_char; BUF_SIZE] = [0; BUF_SIZE];
        let bus_id = CString::new(self.bus_id)?.into_bytes_with_nul();

        match bus_id.len().cmp(&BUF_SIZE) {
            Ordering::Greater => {
                return Err(NvmlError::StringTooLong {
                    max_len: BUF_SIZE,
                    actual_len: bus_id.len(),
                })
            }
            Ordering::Less | Ordering::Equal => {
                for (dst, src) in bus_id_c.iter_mut().zip(bus_id) {
                    *dst = src as c_char;
                }
            }
        }

        Ok(nvmlPciInfo_t {
            busIdLegacy: [0; NVML_DEVICE_PCI_BUS_ID_BUFFER_V2_SIZE as usize],
            domain: self.domain,
            bus: self.bus,
            device: self.device,
            pciDeviceId: self.pci_device_id,
            pciSubSystemId: self.pci_sub_system_id.unwrap_or(0),
            busId: bus_id_c,
        })
    }
}

/// Information about a process running on the GPU.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessInfo {
    // Process ID.
    pub pid: u32,
    /// Amount of used GPU memory in bytes.
    pub used_gpu_memory: UsedGpuMemory,
    /// The ID of the GPU instance this process is running on, if applicable.
    ///
    /// MIG (Multi-Instance GPU) must be enabled on the device for this field
    /// to be set.
    pub gpu_instance_id: Option<u32>,
    /// The ID of the compute instance this process is running on, if applicable.
    ///
    /// MIG (Multi-Instance GPU) must be enabled on the device for this field
    /// to be set.
    pub compute_instance_id: Option<u32>,
}

/// The instance ID NVML reports for processes outside any MIG instance.
pub const NO_INSTANCE_ID: u32 = 0xFFFFFFFF;

impl ProcessInfo {
    fn with_ids(pid: u32, used_gpu_memory: u64, gpu_instance_id: u32, compute_instance_id: u32) -> Self {
        Self {
            pid,
            used_gpu_memory: UsedGpuMemory::from(used_gpu_memory),
            gpu_instance_id: Some(gpu_instance_id).filter(|id| *id != NO_INSTANCE_ID),
            compute_instance_id: Some(compute_instance_id).filter(|id| *id != NO_INSTANCE_ID),
        }
    }
}

/// The first revision of the process list predates MIG and carries no
/// instance IDs.
impl From<nvmlProcessInfo_v1_t> for ProcessInfo {
    fn from(struct_: nvmlProcessInfo_v1_t) -> Self {
        Self::with_ids(
            struct_.pid,
            struct_.usedGpuMemory,
            NO_INSTANCE_ID,
            NO_INSTANCE_ID,
        )
    }
}

impl From<nvmlProcessInfo_v2_t> for ProcessInfo {
    fn from(struct_: nvmlProcessInfo_v2_t) -> Self {
        Self::with_ids(
            struct_.pid,
            struct_.usedGpuMemory,
            struct_.gpuInstanceId,
            struct_.computeInstanceId,
        )
    }
}

impl From<nvmlProcessInfo_t> for ProcessInfo {
    fn from(struct_: nvmlProcessInfo_t) -> Self {
        Self::with_ids(
            struct_.pid,
            struct_.usedGpuMemory,
            struct_.gpuInstanceId,
            struct_.computeInstanceId,
        )
    }
}

/// Memory allocation information for a device (in bytes).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryInfo {
    /// Unallocated FB memory.
    pub free: u64,
    /// Total installed FB memory.
    pub total: u64,
    /// Allocated FB memory.
    ///
    /// Note that the driver/GPU always sets aside a small amount of memory for
    /// bookkeeping.
    pub used: u64,
}

impl From<nvmlMemory_t> for MemoryInfo {
    fn from(struct_: nvmlMemory_t) -> Self {
        Self {
            free: struct_.free,
            total: struct_.total,
            used: struct_.used,
        }
    }
}

/// Utilization information for a device. Each sample period may be between 1
/// second and 1/6 second, depending on the product being queried.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Utilization {
    /// Percent of time over the past sample period during which one or more
    /// kernels was executing on the GPU.
    pub gpu: u32,
    /// Percent of time over the past sample period during which global (device)
    /// memory was being read or written to.
    pub memory: u32,
}

impl From<nvmlUtilization_t> for Utilization {
    fn from(struct_: nvmlUtilization_t) -> Self {
        Self {
            gpu: struct_.gpu,
            memory: struct_.memory,
        }
    }
}

/// Engine and memory resources of a device, or of the MIG device it represents.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceAttributes {
    pub multiprocessor_count: u32,
    pub shared_copy_engine_count: u32,
    pub shared_decoder_count: u32,
    pub shared_encoder_count: u32,
    pub shared_jpeg_count: u32,
    pub shared_ofa_count: u32,
    pub gpu_instance_slice_count: u32,
    pub compute_instance_slice_count: u32,
    /// Device memory in MiB.
    pub memory_size_mb: u64,
}

impl From<nvmlDeviceAttributes_t> for DeviceAttributes {
    fn from(struct_: nvmlDeviceAttributes_t) -> Self {
        Self {
            multiprocessor_count: struct_.multiprocessorCount,
            shared_copy_engine_count: struct_.sharedCopyEngineCount,
            shared_decoder_count: struct_.sharedDecoderCount,
            shared_encoder_count: struct_.sharedEncoderCount,
            shared_jpeg_count: struct_.sharedJpegCount,
            shared_ofa_count: struct_.sharedOfaCount,
            gpu_instance_slice_count: struct_.gpuInstanceSliceCount,
            compute_instance_slice_count: struct_.computeInstanceSliceCount,
            memory_size_mb: struct_.memorySizeMB,
        }
    }
}

/// The MIG mode of a device; a change only takes effect after a GPU reset.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MigMode {
    pub current: bool,
    pub pending: bool,
}

impl MigMode {
    pub(crate) fn new(current: u32, pending: u32) -> Self {
        Self {
            current: current == NVML_DEVICE_MIG_ENABLE,
            pending: pending == NVML_DEVICE_MIG_ENABLE,
        }
    }
}

/// Resources of one GPU instance profile.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpuInstanceProfileInfo {
    pub id: u32,
    pub is_p2p_supported: bool,
    pub slice_count: u32,
    /// How many instances of this profile can exist at once.
    pub instance_count: u32,
    pub multiprocessor_count: u32,
    pub copy_engine_count: u32,
    pub decoder_count: u32,
    pub encoder_count: u32,
    pub jpeg_count: u32,
    pub ofa_count: u32,
    pub memory_size_mb: u64,
}

impl From<nvmlGpuInstanceProfileInfo_t> for GpuInstanceProfileInfo {
    fn from(struct_: nvmlGpuInstanceProfileInfo_t) -> Self {
        Self {
            id: struct_.id,
            is_p2p_supported: struct_.isP2pSupported != 0,
            slice_count: struct_.sliceCount,
            instance_count: struct_.instanceCount,
            multiprocessor_count: struct_.multiprocessorCount,
            copy_engine_count: struct_.copyEngineCount,
            decoder_count: struct_.decoderCount,
            encoder_count: struct_.encoderCount,
            jpeg_count: struct_.jpegCount,
            ofa_count: struct_.ofaCount,
            memory_size_mb: struct_.memorySizeMB,
        }
    }
}

/// Where a GPU instance sits on the device, in memory slices.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpuInstancePlacement {
    pub start: u32,
    pub size: u32,
}

impl From<nvmlGpuInstancePlacement_t> for GpuInstancePlacement {
    fn from(struct_: nvmlGpuInstancePlacement_t) -> Self {
        Self {
            start: struct_.start,
            size: struct_.size,
        }
    }
}

impl GpuInstancePlacement {
    pub fn as_c(&self) -> nvmlGpuInstancePlacement_t {
        nvmlGpuInstancePlacement_t {
            start: self.start,
            size: self.size,
        }
    }
}

/// The CUDA compute capability of a device.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CudaComputeCapability {
    pub major: i32,
    pub minor: i32,
}
