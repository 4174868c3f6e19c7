use crate::bitmasks::event::EventTypes;
use crate::enum_wrappers::device::{TemperatureSensor, TopologyLevel};
use crate::enum_wrappers::{bool_from_state, state_from_bool};
use crate::error::{nvml_sym, nvml_try, NvmlError, NvmlErrorWithSource};
use crate::event::{EventSet, EventSetApi};
use crate::ffi::bindings::*;
use crate::gpm::GpmSampleApi;
use crate::gpu_instance::GpuInstance;
use crate::struct_wrappers::device::*;
use crate::struct_wrappers::vgpu::read_with_opaque_data;
use crate::struct_wrappers::VgpuPgpuMetadata;
use crate::vgpu::{VgpuInstance, VgpuTypeId};
use crate::{query_list, Nvml};

use std::{
    convert::TryFrom,
    ffi::CStr,
    mem,
    os::raw::{c_char, c_int, c_uint, c_ulonglong},
};

use static_assertions::assert_impl_all;

/**
Struct that represents a device on the system.

Obtain a `Device` with the various methods available to you on the `Nvml`
struct. Its operations live on [`DeviceApi`].

Lifetimes are used to enforce that each `Device` instance cannot be used after
the `Nvml` instance it was obtained from is dropped:

```compile_fail
use nvml::{DeviceApi, Nvml};
# use nvml::error::*;

# fn main() -> Result<(), NvmlError> {
let nvml = Nvml::init()?;
let device = nvml.device_by_index(0)?;

drop(nvml);

// This won't compile
device.name()?;
# Ok(())
# }
```

This means you shouldn't have to worry about calls to `Device` methods returning
`Uninitialized` errors.
*/
#[derive(Debug, Clone, Copy)]
pub struct Device<'nvml> {
    device: nvmlDevice_t,
    nvml: &'nvml Nvml,
}

unsafe impl<'nvml> Send for Device<'nvml> {}
unsafe impl<'nvml> Sync for Device<'nvml> {}

assert_impl_all!(Device<'static>: Send, Sync, DeviceApi<'static>);

impl<'nvml> Device<'nvml> {
    /**
    Create a new `Device` wrapper.

    You will most likely never need to call this; see the methods available to you
    on the `Nvml` struct to get one.

    # Safety

    It is your responsibility to ensure that the given `nvmlDevice_t` pointer
    is valid.
    */
    pub unsafe fn new(device: nvmlDevice_t, nvml: &'nvml Nvml) -> Self {
        Self { device, nvml }
    }
}

impl<'nvml> DeviceApi<'nvml> for Device<'nvml> {
    unsafe fn handle(&self) -> nvmlDevice_t {
        self.device
    }

    fn nvml(&self) -> &'nvml Nvml {
        self.nvml
    }
}

#[derive(Debug, Clone, Copy)]
enum ProcessKind {
    Compute,
    Graphics,
    MpsCompute,
}

/// Query a running process list through whichever revision the loaded
/// library resolved for `kind`.
unsafe fn running_processes(
    nvml: &Nvml,
    device: nvmlDevice_t,
    kind: ProcessKind,
) -> Result<Vec<ProcessInfo>, NvmlError> {
    let lib = nvml.lib();
    let (active, v1, v2, v3) = match kind {
        ProcessKind::Compute => (
            &lib.device_get_compute_running_processes,
            &lib.device_get_compute_running_processes_v1,
            &lib.device_get_compute_running_processes_v2,
            &lib.device_get_compute_running_processes_v3,
        ),
        ProcessKind::Graphics => (
            &lib.device_get_graphics_running_processes,
            &lib.device_get_graphics_running_processes_v1,
            &lib.device_get_graphics_running_processes_v2,
            &lib.device_get_graphics_running_processes_v3,
        ),
        ProcessKind::MpsCompute => (
            &lib.device_get_mps_compute_running_processes,
            &lib.device_get_mps_compute_running_processes_v1,
            &lib.device_get_mps_compute_running_processes_v2,
            &lib.device_get_mps_compute_running_processes_v3,
        ),
    };

    let processes: Vec<ProcessInfo> = match active.version() {
        1 => {
            let sym = nvml_sym(v1)?;
            query_list(|count, infos| sym(device, count, infos))?
                .into_iter()
                .map(ProcessInfo::from)
                .collect()
        }
        2 => {
            let sym = nvml_sym(v2)?;
            query_list(|count, infos| sym(device, count, infos))?
                .into_iter()
                .map(ProcessInfo::from)
                .collect()
        }
        _ => {
            let sym = nvml_sym(v3)?;
            query_list(|count, infos| sym(device, count, infos))?
                .into_iter()
                .map(ProcessInfo::from)
                .collect()
        }
    };

    Ok(processes)
}

unsafe fn read_string(
    sym: unsafe extern "C" fn(nvmlDevice_t, *mut c_char, c_uint) -> nvmlReturn_t,
    device: nvmlDevice_t,
    len: u32,
) -> Result<String, NvmlError> {
    let mut buf = vec![0; len as usize];
    nvml_try(sym(device, buf.as_mut_ptr(), len))?;

    let raw = CStr::from_ptr(buf.as_ptr());
    Ok(raw.to_str()?.into())
}

/**
Operations on a GPU.

Implementors provide the raw handle and the `Nvml` it belongs to; every other
method has a default implementation on top of those two, so a type of your
own that wraps an `nvmlDevice_t` gets all of them by implementing
[`DeviceApi::handle`] and [`DeviceApi::nvml`].
*/
pub trait DeviceApi<'nvml> {
    /// Get the raw device handle.
    ///
    /// # Safety
    ///
    /// This is unsafe to prevent it from being used without care.
    unsafe fn handle(&self) -> nvmlDevice_t;

    /// The `Nvml` this device was obtained from.
    fn nvml(&self) -> &'nvml Nvml;

    /**
    Gets the NVML index of this `Device`.

    Keep in mind that the order in which NVML enumerates devices has no
    guarantees of consistency between reboots. Also, the NVML index may not
    correlate with other APIs, such as the CUDA device index.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetIndex")]
    fn index(&self) -> Result<u32, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_index)?;

        unsafe {
            let mut index: c_uint = mem::zeroed();
            nvml_try(sym(self.handle(), &mut index))?;

            Ok(index)
        }
    }

    /**
    Gets the name of this `Device`.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Utf8Error`, if the string obtained from the C function is not valid Utf8
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetName")]
    fn name(&self) -> Result<String, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_name)?;

        unsafe { read_string(sym, self.handle(), NVML_DEVICE_NAME_V2_BUFFER_SIZE) }
    }

    /**
    Gets the globally unique immutable UUID associated with this `Device` as a
    5 part hexadecimal string.

    This UUID augments the immutable, board serial identifier. It is a globally
    unique identifier and is the _only_ available identifier for pre-Fermi-architecture
    products. It does NOT correspond to any identifier printed on the board.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if this `Device` does not support this feature
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Utf8Error`, if the string obtained from the C function is not valid Utf8
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetUUID")]
    fn uuid(&self) -> Result<String, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_uuid)?;

        unsafe { read_string(sym, self.handle(), NVML_DEVICE_UUID_V2_BUFFER_SIZE) }
    }

    /**
    Gets the globally unique board serial number associated with this `Device`'s board
    as an alphanumeric string.

    This serial number matches the serial number tag that is physically attached to the board.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if this `Device` does not support this feature
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Utf8Error`, if the string obtained from the C function is not valid Utf8
    * `Unknown`, on any unexpected error

    # Device Support

    Supports all products with an infoROM.
    */
    #[doc(alias = "nvmlDeviceGetSerial")]
    fn serial(&self) -> Result<String, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_serial)?;

        unsafe { read_string(sym, self.handle(), NVML_DEVICE_SERIAL_BUFFER_SIZE) }
    }

    /**
    Gets the amount of used, free and total memory available on this `Device`, in bytes.

    Note that enabling ECC reduces the amount of total available memory due to the
    extra required parity bits.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetMemoryInfo")]
    fn memory_info(&self) -> Result<MemoryInfo, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_memory_info)?;

        unsafe {
            let mut info: nvmlMemory_t = mem::zeroed();
            nvml_try(sym(self.handle(), &mut info))?;

            Ok(info.into())
        }
    }

    /**
    Gets the current utilization rates for this `Device`'s major subsystems.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if this `Device` does not support this feature
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetUtilizationRates")]
    fn utilization_rates(&self) -> Result<Utilization, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_utilization_rates)?;

        unsafe {
            let mut utilization: nvmlUtilization_t = mem::zeroed();
            nvml_try(sym(self.handle(), &mut utilization))?;

            Ok(utilization.into())
        }
    }

    /**
    Gets the PCI attributes of this `Device`.

    Goes through the newest `nvmlDeviceGetPciInfo` revision the library
    exports.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Utf8Error`, if a string obtained from the C function is not valid Utf8
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetPciInfo_v3")]
    fn pci_info(&self) -> Result<PciInfo, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_pci_info)?;

        unsafe {
            let mut pci_info: nvmlPciInfo_t = mem::zeroed();
            nvml_try(sym(self.handle(), &mut pci_info))?;

            PciInfo::try_from(pci_info, true)
        }
    }

    /**
    Gets the current temperature readings for the given sensor, in °C.

    # Errors

    * `InvalidArg`, if this `Device` is invalid or `sensor` is invalid
    * `NotSupported`, if this `Device` does not have the specified sensor
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetTemperature")]
    fn temperature(&self, sensor: TemperatureSensor) -> Result<u32, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_temperature)?;

        unsafe {
            let mut temp: c_uint = mem::zeroed();
            nvml_try(sym(self.handle(), sensor.as_c(), &mut temp))?;

            Ok(temp)
        }
    }

    /**
    Gets the power usage for this GPU and its associated circuitry (memory) in
    milliwatts.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if this `Device` does not support power readings
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetPowerUsage")]
    fn power_usage(&self) -> Result<u32, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_power_usage)?;

        unsafe {
            let mut usage: c_uint = mem::zeroed();
            nvml_try(sym(self.handle(), &mut usage))?;

            Ok(usage)
        }
    }

    /**
    Gets information about processes with a compute context running on this `Device`.

    This only returns information about running compute processes (such as a CUDA
    application with an active context). Graphics applications (OpenGL, DirectX)
    won't be listed by this function.

    The list is read through the newest revision of
    `nvmlDeviceGetComputeRunningProcesses` the library exports. Processes
    read through the first revision carry no GPU or compute instance IDs.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetComputeRunningProcesses_v3")]
    fn running_compute_processes(&self) -> Result<Vec<ProcessInfo>, NvmlError> {
        unsafe { running_processes(self.nvml(), self.handle(), ProcessKind::Compute) }
    }

    /**
    Gets information about processes with a graphics context running on this `Device`.

    This only returns information about graphics based processes (OpenGL, DirectX).

    # Errors

    Same as [`DeviceApi::running_compute_processes`].
    */
    #[doc(alias = "nvmlDeviceGetGraphicsRunningProcesses_v3")]
    fn running_graphics_processes(&self) -> Result<Vec<ProcessInfo>, NvmlError> {
        unsafe { running_processes(self.nvml(), self.handle(), ProcessKind::Graphics) }
    }

    /**
    Gets information about processes with a compute context running on this
    `Device` through the Multi-Process Service.

    # Errors

    Same as [`DeviceApi::running_compute_processes`].
    */
    #[doc(alias = "nvmlDeviceGetMPSComputeRunningProcesses_v3")]
    fn mps_running_compute_processes(&self) -> Result<Vec<ProcessInfo>, NvmlError> {
        unsafe { running_processes(self.nvml(), self.handle(), ProcessKind::MpsCompute) }
    }

    /**
    Gets the common ancestor for this `Device` and `other`.

    # Errors

    * `InvalidArg`, if either `Device` is invalid
    * `NotSupported`, if this `Device` or the OS does not support this feature
    * `UnexpectedVariant`, for which you can read the docs for
    * `Unknown`, an error has occurred in the underlying topology discovery

    # Platform Support

    Only supports Linux.
    */
    #[doc(alias = "nvmlDeviceGetTopologyCommonAncestor")]
    fn topology_common_ancestor(
        &self,
        other: &impl DeviceApi<'nvml>,
    ) -> Result<TopologyLevel, NvmlError>
    where
        Self: Sized,
    {
        let sym = nvml_sym(&self.nvml().lib().device_get_topology_common_ancestor)?;

        unsafe {
            let mut level: nvmlGpuTopologyLevel_t = mem::zeroed();
            nvml_try(sym(self.handle(), other.handle(), &mut level))?;

            TopologyLevel::try_from(level)
        }
    }

    /**
    Starts recording the given `EventTypes` for this `Device` and adding them
    to the specified `EventSet`.

    Use `.supported_event_types()` to find out which events you can register for
    this `Device`.

    The set is consumed: if registration fails it is freed and not returned.

    All events that occurred before this call was made will not be recorded.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if the platform does not support this feature or some of
    the requested event types
    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `SetReleaseFailed`, if the set could not be freed after another error,
    with that error as the source
    * `Unknown`, on any unexpected error; NVML leaves the set in an undefined
    state in that case
    */
    #[doc(alias = "nvmlDeviceRegisterEvents")]
    fn register_events(
        &self,
        events: EventTypes,
        set: EventSet<'nvml>,
    ) -> Result<EventSet<'nvml>, NvmlErrorWithSource> {
        let sym = nvml_sym(&self.nvml().lib().device_register_events)?;

        unsafe {
            match nvml_try(sym(self.handle(), events.bits(), set.handle())) {
                Ok(()) => Ok(set),
                Err(e) => {
                    if let Err(release) = set.release_events() {
                        return Err(NvmlErrorWithSource {
                            error: NvmlError::SetReleaseFailed,
                            source: Some(release),
                        });
                    }

                    Err(e.into())
                }
            }
        }
    }

    /**
    Gets the `EventTypes` that this `Device` supports.

    The returned bitmask is created via the `EventTypes::from_bits_truncate`
    method, meaning that any bits that don't correspond to flags present in this
    version of the wrapper will be dropped.

    # Errors

    * `GpuLost`, if this `Device` has fallen off the bus or is otherwise inaccessible
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetSupportedEventTypes")]
    fn supported_event_types(&self) -> Result<EventTypes, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_supported_event_types)?;

        unsafe {
            let mut flags: c_ulonglong = mem::zeroed();
            nvml_try(sym(self.handle(), &mut flags))?;

            Ok(EventTypes::from_bits_truncate(flags))
        }
    }

    /**
    Gets the CUDA compute capability of this `Device`.

    The returned version numbers are the same as those returned by
    `cuDeviceGetAttribute()` from the CUDA API.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetCudaComputeCapability")]
    fn cuda_compute_capability(&self) -> Result<CudaComputeCapability, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_cuda_compute_capability)?;

        unsafe {
            let mut major: c_int = mem::zeroed();
            let mut minor: c_int = mem::zeroed();
            nvml_try(sym(self.handle(), &mut major, &mut minor))?;

            Ok(CudaComputeCapability { major, minor })
        }
    }

    /**
    Gets the PCI information for the remote node on the given NvLink.

    The `pci_sub_system_id` of the result is always `None`.

    # Errors

    * `InvalidArg`, if this `Device` or `link` is invalid
    * `NotSupported`, if this `Device` does not support this feature
    * `Utf8Error`, if a string obtained from the C function is not valid Utf8
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetNvLinkRemotePciInfo_v2")]
    fn nv_link_remote_pci_info(&self, link: u32) -> Result<PciInfo, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_nv_link_remote_pci_info)?;

        unsafe {
            let mut pci_info: nvmlPciInfo_t = mem::zeroed();
            nvml_try(sym(self.handle(), link, &mut pci_info))?;

            PciInfo::try_from(pci_info, false)
        }
    }

    /**
    Gets the engine and memory resources of this `Device`.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if this `Device` does not support this feature
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetAttributes_v2")]
    fn attributes(&self) -> Result<DeviceAttributes, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_attributes)?;

        unsafe {
            let mut attributes: nvmlDeviceAttributes_t = mem::zeroed();
            nvml_try(sym(self.handle(), &mut attributes))?;

            Ok(attributes.into())
        }
    }

    /**
    Gets the current and pending MIG modes of this `Device`.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if this `Device` does not support MIG
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetMigMode")]
    fn mig_mode(&self) -> Result<MigMode, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_mig_mode)?;

        unsafe {
            let mut current: c_uint = mem::zeroed();
            let mut pending: c_uint = mem::zeroed();
            nvml_try(sym(self.handle(), &mut current, &mut pending))?;

            Ok(MigMode::new(current, pending))
        }
    }

    /**
    Gets the resources of the GPU instance profile `profile`, one of the
    `NVML_GPU_INSTANCE_PROFILE_*` constants.

    # Errors

    * `InvalidArg`, if this `Device` or `profile` is invalid
    * `NotSupported`, if this `Device` does not support MIG or the profile
    * `NoPermission`, if the caller lacks permission
    */
    #[doc(alias = "nvmlDeviceGetGpuInstanceProfileInfo")]
    fn gpu_instance_profile_info(&self, profile: u32) -> Result<GpuInstanceProfileInfo, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_gpu_instance_profile_info)?;

        unsafe {
            let mut info: nvmlGpuInstanceProfileInfo_t = mem::zeroed();
            nvml_try(sym(self.handle(), profile, &mut info))?;

            Ok(info.into())
        }
    }

    /**
    Gets every placement a GPU instance of profile `profile_id` could take
    on this `Device`.

    # Errors

    * `InvalidArg`, if this `Device` or `profile_id` is invalid
    * `NotSupported`, if this `Device` does not support MIG
    */
    #[doc(alias = "nvmlDeviceGetGpuInstancePossiblePlacements_v2")]
    fn gpu_instance_possible_placements(
        &self,
        profile_id: u32,
    ) -> Result<Vec<GpuInstancePlacement>, NvmlError> {
        let sym = nvml_sym(
            &self
                .nvml()
                .lib()
                .device_get_gpu_instance_possible_placements,
        )?;

        unsafe {
            let device = self.handle();
            let placements =
                query_list(|count, placements| sym(device, profile_id, placements, count))?;

            Ok(placements.into_iter().map(GpuInstancePlacement::from).collect())
        }
    }

    /**
    Create a GPU instance of profile `profile_id` on this `Device`.

    The instance is not destroyed when the returned `GpuInstance` is dropped;
    call [`crate::GpuInstanceApi::destroy`].

    # Errors

    * `InvalidArg`, if this `Device` or `profile_id` is invalid
    * `NotSupported`, if MIG is disabled on this `Device`
    * `NoPermission`, if the caller lacks permission
    * `InsufficientResources`, if the device has no room for the instance
    */
    #[doc(alias = "nvmlDeviceCreateGpuInstance")]
    fn create_gpu_instance(&self, profile_id: u32) -> Result<GpuInstance<'nvml>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_create_gpu_instance)?;

        unsafe {
            let mut instance: nvmlGpuInstance_t = mem::zeroed();
            nvml_try(sym(self.handle(), profile_id, &mut instance))?;

            Ok(GpuInstance::new(instance, self.nvml()))
        }
    }

    /**
    Gets the GPU instances of profile `profile_id` that exist on this `Device`.

    The buffer is sized from the profile's instance count, so this makes one
    extra call to [`DeviceApi::gpu_instance_profile_info`].

    # Errors

    * `InvalidArg`, if this `Device` or `profile_id` is invalid
    * `NotSupported`, if MIG is disabled on this `Device`
    * `NoPermission`, if the caller lacks permission
    */
    #[doc(alias = "nvmlDeviceGetGpuInstances")]
    fn gpu_instances(&self, profile_id: u32) -> Result<Vec<GpuInstance<'nvml>>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_gpu_instances)?;
        let capacity = self.gpu_instance_profile_info(profile_id)?.instance_count;

        unsafe {
            let mut count: c_uint = 0;
            let mut instances: Vec<nvmlGpuInstance_t> =
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
                .map(|i| GpuInstance::new(i, self.nvml()))
                .collect())
        }
    }

    /**
    Gets the GPU instance with the given ID on this `Device`.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotFound`, if no instance has that ID
    * `NotSupported`, if MIG is disabled on this `Device`
    */
    #[doc(alias = "nvmlDeviceGetGpuInstanceById")]
    fn gpu_instance_by_id(&self, id: u32) -> Result<GpuInstance<'nvml>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_gpu_instance_by_id)?;

        unsafe {
            let mut instance: nvmlGpuInstance_t = mem::zeroed();
            nvml_try(sym(self.handle(), id, &mut instance))?;

            Ok(GpuInstance::new(instance, self.nvml()))
        }
    }

    /**
    Whether this `Device` supports GPU performance monitoring.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `ArgumentVersionMismatch`, if NVML expects a different struct version
    */
    #[doc(alias = "nvmlGpmQueryDeviceSupport")]
    fn gpm_support(&self) -> Result<bool, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().gpm_query_device_support)?;

        unsafe {
            let mut support = nvmlGpmSupport_t {
                version: NVML_GPM_SUPPORT_VERSION,
                isSupportedDevice: 0,
            };
            nvml_try(sym(self.handle(), &mut support))?;

            Ok(support.isSupportedDevice != 0)
        }
    }

    /**
    Whether GPM metrics are streamed to the profiler.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if this `Device` does not support GPM
    * `UnexpectedVariant`, if NVML reports a state other than enabled or disabled
    */
    #[doc(alias = "nvmlGpmQueryIfStreamingEnabled")]
    fn gpm_streaming_enabled(&self) -> Result<bool, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().gpm_query_if_streaming_enabled)?;

        unsafe {
            let mut state: c_uint = mem::zeroed();
            nvml_try(sym(self.handle(), &mut state))?;

            bool_from_state(state)
        }
    }

    /**
    Turn GPM streaming on or off.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if this `Device` does not support GPM
    * `NoPermission`, if the caller lacks permission
    */
    #[doc(alias = "nvmlGpmSetStreamingEnabled")]
    fn set_gpm_streaming_enabled(&self, enabled: bool) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().gpm_set_streaming_enabled)?;

        unsafe { nvml_try(sym(self.handle(), state_from_bool(enabled))) }
    }

    /**
    Read this `Device`'s GPM counters into `sample`.

    # Errors

    * `InvalidArg`, if this `Device` or `sample` is invalid
    * `NotSupported`, if this `Device` does not support GPM
    */
    #[doc(alias = "nvmlGpmSampleGet")]
    fn gpm_sample_get(&self, sample: &impl GpmSampleApi<'nvml>) -> Result<(), NvmlError>
    where
        Self: Sized,
    {
        let sym = nvml_sym(&self.nvml().lib().gpm_sample_get)?;

        unsafe { nvml_try(sym(self.handle(), sample.handle())) }
    }

    /**
    Read the GPM counters of the GPU instance `gpu_instance_id` on this
    `Device` into `sample`.

    # Errors

    * `InvalidArg`, if this `Device`, the instance or `sample` is invalid
    * `NotSupported`, if this `Device` does not support GPM
    */
    #[doc(alias = "nvmlGpmMigSampleGet")]
    fn gpm_mig_sample_get(
        &self,
        gpu_instance_id: u32,
        sample: &impl GpmSampleApi<'nvml>,
    ) -> Result<(), NvmlError>
    where
        Self: Sized,
    {
        let sym = nvml_sym(&self.nvml().lib().gpm_mig_sample_get)?;

        unsafe { nvml_try(sym(self.handle(), gpu_instance_id, sample.handle())) }
    }

    /**
    Gets the vGPU metadata of this physical GPU, opaque data included.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if vGPU is not supported on this host
    */
    #[doc(alias = "nvmlDeviceGetVgpuMetadata")]
    fn vgpu_metadata(&self) -> Result<VgpuPgpuMetadata, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_vgpu_metadata)?;

        unsafe {
            let device = self.handle();
            let (raw, opaque_data) = read_with_opaque_data(|metadata, size| {
                sym(device, metadata, size)
            })?;

            Ok(VgpuPgpuMetadata::from_parts(raw, opaque_data))
        }
    }

    /**
    Gets the vGPU instances currently running on this `Device`.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if vGPU is not supported on this host
    */
    #[doc(alias = "nvmlDeviceGetActiveVgpus")]
    fn active_vgpus(&self) -> Result<Vec<VgpuInstance<'nvml>>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_active_vgpus)?;

        unsafe {
            let device = self.handle();
            let instances = query_list(|count, instances| sym(device, count, instances))?;

            Ok(instances
                .into_iter()
                .map(|i| VgpuInstance::new(i, self.nvml()))
                .collect())
        }
    }

    /**
    Gets the vGPU types this `Device` can host.

    # Errors

    * `InvalidArg`, if this `Device` is invalid
    * `NotSupported`, if vGPU is not supported on this host
    */
    #[doc(alias = "nvmlDeviceGetSupportedVgpus")]
    fn supported_vgpus(&self) -> Result<Vec<VgpuTypeId<'nvml>>, NvmlError> {
        let sym = nvml_sym(&self.nvml().lib().device_get_supported_vgpus)?;

        unsafe {
            let device = self.handle();
            let types = query_list(|count, types| sym(device, count, types))?;

            Ok(types
                .into_iter()
                .map(|t| VgpuTypeId::new(t, self.nvml()))
                .collect())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bitmasks::event::EventTypes;
    use crate::enums::event::XidError;
    use crate::error::NvmlError;
    use crate::gpm::GpmSample;
    use crate::test_utils::*;

    const COMPUTE: &str = "nvmlDeviceGetComputeRunningProcesses";
    const COMPUTE_V2: &str = "nvmlDeviceGetComputeRunningProcesses_v2";
    const COMPUTE_V3: &str = "nvmlDeviceGetComputeRunningProcesses_v3";

    fn device_mock() -> MockLibrary {
        MockLibrary::new()
            .export("nvmlDeviceGetHandleByIndex_v2", fake::device_get_handle_by_index as usize)
            .export("nvmlDeviceGetIndex", fake::device_get_index as usize)
            .export("nvmlDeviceGetName", fake::device_get_name as usize)
            .export("nvmlDeviceGetMemoryInfo", fake::device_get_memory_info as usize)
            .export("nvmlDeviceGetPciInfo_v3", fake::device_get_pci_info as usize)
    }

    #[test]
    fn handle_round_trip() {
        let (nvml, _library) = mock_nvml(MockLibrary::new());
        let device = unsafe { Device::new(fake_handle(7), &nvml) };

        assert_eq!(unsafe { device.handle() }, fake_handle(7));
        assert!(std::ptr::eq(device.nvml(), &nvml));
    }

    #[test]
    fn basic_queries() {
        let (nvml, _library) = mock_nvml(device_mock());
        let device = nvml.device_by_index(1).unwrap();

        assert_eq!(device.index().unwrap(), 1);
        assert_eq!(device.name().unwrap(), "Mock GPU");

        let memory = device.memory_info().unwrap();
        assert_eq!(memory.used + memory.free, memory.total);

        let pci = device.pci_info().unwrap();
        assert_eq!(pci.bus, 2);
        assert_eq!(pci.bus_id, "00000000:01:00.0");
        assert_eq!(pci.pci_sub_system_id, Some(0x1234));
    }

    #[test]
    fn missing_entry_point_is_named() {
        let (nvml, _library) = mock_nvml(device_mock());
        let device = nvml.device_by_index(0).unwrap();

        match device.serial() {
            Err(NvmlError::FailedToLoadSymbol(symbol)) => {
                assert_eq!(symbol, "nvmlDeviceGetSerial")
            }
            other => panic!("expected a missing symbol, got {:?}", other),
        }
    }

    #[test]
    fn processes_use_the_newest_exported_revision() {
        let (nvml, _library) = mock_nvml(
            device_mock()
                .export(COMPUTE, fake::processes_v1 as usize)
                .export(COMPUTE_V2, fake::processes_v2 as usize),
        );
        let device = nvml.device_by_index(0).unwrap();

        let processes = device.running_compute_processes().unwrap();
        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0].pid, 2);
        assert_eq!(processes[0].gpu_instance_id, Some(5));
        assert_eq!(processes[0].compute_instance_id, Some(6));
    }

    #[test]
    fn first_revision_processes() {
        let (nvml, _library) = mock_nvml(device_mock().export(COMPUTE, fake::processes_v1 as usize));
        let device = nvml.device_by_index(0).unwrap();

        let processes = device.running_compute_processes().unwrap();
        assert_eq!(processes[0].pid, 1);
        assert_eq!(processes[0].gpu_instance_id, None);
    }

    #[test]
    fn third_revision_processes() {
        let (nvml, _library) = mock_nvml(
            device_mock()
                .export(COMPUTE, fake::processes_v1 as usize)
                .export(COMPUTE_V2, fake::processes_v2 as usize)
                .export(COMPUTE_V3, fake::processes_v3 as usize),
        );
        let device = nvml.device_by_index(0).unwrap();

        let processes = device.running_compute_processes().unwrap();
        assert_eq!(processes[0].pid, 3);
        assert_eq!(processes[0].compute_instance_id, Some(8));
    }

    #[test]
    fn no_processes() {
        let (nvml, _library) =
            mock_nvml(device_mock().export(COMPUTE_V3, fake::no_processes as usize));
        let device = nvml.device_by_index(0).unwrap();

        assert!(device.running_compute_processes().unwrap().is_empty());
    }

    #[test]
    fn process_kinds_resolve_separately() {
        let (nvml, _library) = mock_nvml(
            device_mock().export(
                "nvmlDeviceGetGraphicsRunningProcesses_v2",
                fake::processes_v2 as usize,
            ),
        );
        let device = nvml.device_by_index(0).unwrap();

        assert_eq!(device.running_graphics_processes().unwrap()[0].pid, 2);
        match device.running_compute_processes() {
            Err(NvmlError::FailedToLoadSymbol(symbol)) => assert_eq!(symbol, COMPUTE),
            other => panic!("expected a missing symbol, got {:?}", other),
        }
    }

    #[test]
    fn events_round_trip() {
        let (nvml, _library) = mock_nvml(
            device_mock()
                .export("nvmlEventSetCreate", fake::event_set_create as usize)
                .export("nvmlEventSetFree", fake::event_set_free as usize)
                .export("nvmlEventSetWait_v2", fake::event_set_wait as usize)
                .export("nvmlDeviceRegisterEvents", fake::device_register_events as usize),
        );
        let device = nvml.device_by_index(0).unwrap();
        let freed_before = fake::FREED_EVENT_SETS.with(|f| f.get());

        let set = nvml.create_event_set().unwrap();
        let set = device
            .register_events(EventTypes::CRITICAL_XID_ERROR, set)
            .unwrap();

        assert!(matches!(set.wait(0), Err(NvmlError::Timeout)));

        let data = set.wait(1000).unwrap();
        assert_eq!(unsafe { data.device.handle() }, unsafe { device.handle() });
        assert_eq!(data.event_type, EventTypes::CRITICAL_XID_ERROR);
        assert_eq!(data.event_data, Some(XidError::Value(79)));
        assert_eq!(data.gpu_instance_id, None);

        drop(set);
        assert_eq!(fake::FREED_EVENT_SETS.with(|f| f.get()), freed_before + 1);
    }

    struct Wrapped<'nvml> {
        raw: nvmlDevice_t,
        nvml: &'nvml Nvml,
    }

    impl<'nvml> DeviceApi<'nvml> for Wrapped<'nvml> {
        unsafe fn handle(&self) -> nvmlDevice_t {
            self.raw
        }

        fn nvml(&self) -> &'nvml Nvml {
            self.nvml
        }
    }

    #[test]
    fn own_types_get_every_operation() {
        let (nvml, _library) = mock_nvml(device_mock());
        let wrapped = Wrapped {
            raw: fake_handle(2),
            nvml: &nvml,
        };

        assert_eq!(wrapped.index().unwrap(), 1);
        assert_eq!(wrapped.name().unwrap(), "Mock GPU");
    }

    #[test]
    fn vgpu_metadata_keeps_opaque_data() {
        let (nvml, _library) = mock_nvml(
            device_mock().export("nvmlDeviceGetVgpuMetadata", fake::device_get_vgpu_metadata as usize),
        );
        let device = nvml.device_by_index(0).unwrap();

        let metadata = device.vgpu_metadata().unwrap();
        assert_eq!(metadata.revision(), 2);
        assert_eq!(metadata.host_driver_version().unwrap(), "550.54.14");
        assert_eq!(metadata.opaque_data(), fake::OPAQUE_DATA);
    }

    #[test]
    fn gpm_streaming() {
        let (nvml, _library) = mock_nvml(
            device_mock()
                .export(
                    "nvmlGpmQueryIfStreamingEnabled",
                    fake::gpm_query_if_streaming_enabled as usize,
                )
                .export("nvmlGpmSampleAlloc", fake::gpm_sample_alloc as usize)
                .export("nvmlGpmSampleFree", fake::gpm_sample_free as usize),
        );
        let device = nvml.device_by_index(0).unwrap();

        assert!(device.gpm_streaming_enabled().unwrap());

        let sample: GpmSample = nvml.gpm_sample().unwrap();
        assert!(matches!(
            device.gpm_sample_get(&sample),
            Err(NvmlError::FailedToLoadSymbol(_))
        ));
    }

    // Hardware tests

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn name() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.name())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn uuid() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.uuid())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn memory_info() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.memory_info())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn utilization_rates() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.utilization_rates())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn pci_info() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.pci_info())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn running_compute_processes() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.running_compute_processes())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn running_graphics_processes() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.running_graphics_processes())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn cuda_compute_capability() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.cuda_compute_capability())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn attributes() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.attributes())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn supported_event_types() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| device.supported_event_types())
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn register_events() {
        let nvml = nvml();
        test_with_device(3, &nvml, |device| {
            let set = nvml.create_event_set()?;
            device
                .register_events(EventTypes::PSTATE_CHANGE | EventTypes::CRITICAL_XID_ERROR, set)
                .map(|_| ())
                .map_err(|e| e.error)
        })
    }

    #[test]
    #[ignore = "requires NVML and a GPU"]
    fn topology_common_ancestor() {
        let nvml = nvml();
        let device1 = device(&nvml);
        let device2 = nvml.device_by_index(1).expect("second device");

        device1.topology_common_ancestor(&device2).expect("TopologyLevel");
    }
}
