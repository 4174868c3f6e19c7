/*!
A safe wrapper over the [NVIDIA Management Library][nvml] (NVML), loaded at
runtime rather than linked.

```no_run
use nvml::{DeviceApi, Nvml};
# use nvml::error::*;
# fn test() -> Result<(), NvmlError> {

let nvml = Nvml::init()?;
// Get the first `Device` (GPU) in the system
let device = nvml.device_by_index(0)?;

let name = device.name()?;
let memory_info = device.memory_info()?;
let processes = device.running_compute_processes()?;
# Ok(())
# }
```

## Usage

The NVML library is opened when a session starts, so a machine without an
NVIDIA driver gets an error from `Nvml::init` instead of failing to start.
Successful execution of `Nvml::init` means:

* The NVML library was present on the system and able to be opened
* Every known entry point was looked up, and each versioned operation was
  bound to the newest revision the library exports
* `nvmlInit` was called successfully

Every function you call thereafter will individually return
`FailedToLoadSymbol` if the loaded library does not export it.

Sessions share one loaded library through [`library::Library`]: the first
`Nvml::init` opens it, later ones reuse it, and the library is unloaded when
the last session shuts down.

## Handles and capabilities

Each NVML handle type has a struct that pairs the raw handle with the `Nvml`
it came from (`Device`, `Unit`, `EventSet`, ...) and a trait holding every
operation on it (`DeviceApi`, `UnitApi`, `EventSetApi`, ...). The traits only
require the raw handle and the owning session, so your own types wrapping a
handle can implement them and get every operation for free. Bring the traits
into scope to call their methods.

## Raw calls

[`Nvml::raw_api`] exposes a thin `unsafe` method per NVML entry point,
generated from the declarations in `idl/`, for functions without a
hand-written wrapper.

## Cargo Features

The `serde` feature can be toggled on in order to `#[derive(Serialize, Deserialize)]`
for every NVML data structure.

[nvml]: https://developer.nvidia.com/nvidia-management-library-nvml
*/

#![recursion_limit = "1024"]
#![allow(non_upper_case_globals)]

extern crate nvml_sys as ffi;

pub mod bitmasks;
pub mod compute_instance;
pub mod device;
pub mod enum_wrappers;
pub mod enums;
pub mod error;
pub mod event;
pub mod gpm;
pub mod gpu_instance;
pub mod library;
pub mod raw_api;
pub mod struct_wrappers;
#[cfg(test)]
mod test_utils;
pub mod unit;
pub mod vgpu;

// Re-exports for convenience
pub use crate::compute_instance::{ComputeInstance, ComputeInstanceApi};
pub use crate::device::{Device, DeviceApi};
pub use crate::event::{EventSet, EventSetApi};
pub use crate::gpm::{GpmSample, GpmSampleApi};
pub use crate::gpu_instance::{GpuInstance, GpuInstanceApi};
pub use crate::library::{Library, LibraryOptions};
pub use crate::raw_api::RawApi;
pub use crate::unit::{Unit, UnitApi};
pub use crate::vgpu::{VgpuInstance, VgpuInstanceApi, VgpuTypeId, VgpuTypeIdApi};

/// Re-exports from `nvml-sys` for use with [`RawApi`].
pub mod sys_exports {
    pub use crate::ffi::bindings;
}

use std::convert::{TryFrom, TryInto};
use std::ffi::{CStr, CString, OsStr};
use std::mem::{self, ManuallyDrop};
use std::os::raw::{c_int, c_uint};
use std::ptr;
use std::sync::Arc;

use static_assertions::assert_impl_all;

use crate::bitmasks::InitFlags;
use crate::enum_wrappers::device::{DetachGpuState, PcieLinkState, TopologyLevel};
use crate::error::{nvml_sym, nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::struct_wrappers::device::PciInfo;
use crate::struct_wrappers::unit::HwbcEntry;
use crate::struct_wrappers::vgpu::{with_opaque_data, VgpuPgpuCompatibility};
use crate::struct_wrappers::{ExcludedDeviceInfo, GpmMetricsGet, VgpuMetadata, VgpuPgpuMetadata};

/// Determines the major version of the CUDA driver given the full version.
///
/// Obtain the full version via `Nvml.sys_cuda_driver_version()`.
pub fn cuda_driver_version_major(version: i32) -> i32 {
    version / 1000
}

/// Determines the minor version of the CUDA driver given the full version.
///
/// Obtain the full version via `Nvml.sys_cuda_driver_version()`.
pub fn cuda_driver_version_minor(version: i32) -> i32 {
    (version % 1000) / 10
}

/// Extra slots passed on the second call of a count-then-fill query.
const LIST_HEADROOM: c_uint = 5;

/// Most host interface cards `Nvml::hic_versions` makes room for.
const MAX_HIC_ENTRIES: c_uint = 256;

/**
Fill a list the way NVML's count-then-fill functions expect.

The first call passes a zero count and a null buffer to learn the length. The
second passes a buffer with some headroom, in case entries appear between the
two calls, and the result is truncated to the count NVML reports.
*/
pub(crate) unsafe fn query_list<T, F>(mut call: F) -> Result<Vec<T>, NvmlError>
where
    T: Copy,
    F: FnMut(*mut c_uint, *mut T) -> nvmlReturn_t,
{
    let mut count: c_uint = 0;

    match call(&mut count, ptr::null_mut()) {
        nvmlReturn_enum_NVML_SUCCESS if count == 0 => return Ok(vec![]),
        nvmlReturn_enum_NVML_SUCCESS | nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE => {}
        other => nvml_try(other)?,
    }

    count += LIST_HEADROOM;
    let mut items: Vec<T> = vec![mem::zeroed(); count as usize];
    nvml_try(call(&mut count, items.as_mut_ptr()))?;

    items.truncate(count as usize);
    Ok(items)
}

/**
The main struct that this library revolves around.

According to NVIDIA's documentation, "It is the user's responsibility to call `nvmlInit()`
before calling any other methods, and `nvmlShutdown()` once NVML is no longer being used."
This struct is used to enforce those rules.

Also according to NVIDIA's documentation, "NVML is thread-safe so it is safe to make
simultaneous NVML calls from multiple threads." In the Rust world, this translates to `Nvml`
being `Send` + `Sync`. Calls made through it take no lock; they read the entry point table
resolved when the library was loaded.

NOTE: If you care about possible errors returned from `nvmlShutdown()`, use the `.shutdown()`
method on this struct. **The `Drop` implementation ignores errors.**
*/
pub struct Nvml {
    lib: ManuallyDrop<Arc<NvmlLib>>,
    library: ManuallyDrop<Arc<Library>>,
}

assert_impl_all!(Nvml: Send, Sync);

impl std::fmt::Debug for Nvml {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NVML")
    }
}

impl Nvml {
    /**
    Handles NVML initialization and must be called before doing anything else.

    Loads the library through [`Library::default_instance`], which looks for
    `libnvidia-ml.so.1` on Linux and `nvml.dll` on Windows. Use
    [`Nvml::builder`] for another path or session.

    Note that this will initialize NVML but not any GPUs. This means that NVML can
    communicate with a GPU even when other GPUs in a system are bad or unstable.

    # Errors

    * `Library`, if the library could not be loaded
    * `DriverNotLoaded`, if the NVIDIA driver is not running
    * `NoPermission`, if NVML does not have permission to talk to the driver
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlInit_v2")]
    pub fn init() -> Result<Self, NvmlError> {
        Self::init_internal(Library::default_instance(), InitFlags::empty())
    }

    /**
    An initialization function that allows you to pass flags to control certain behaviors.

    This is the same as `init()` except for the addition of flags.

    # Errors

    * `Library`, if the library could not be loaded
    * `DriverNotLoaded`, if the NVIDIA driver is not running
    * `NoPermission`, if NVML does not have permission to talk to the driver
    * `Unknown`, on any unexpected error

    # Examples

    ```no_run
    # use nvml::Nvml;
    # use nvml::error::*;
    use nvml::bitmasks::InitFlags;

    # fn main() -> Result<(), NvmlError> {
    // Don't fail if the system doesn't have any NVIDIA GPUs
    //
    // Also, don't attach any GPUs during initialization
    Nvml::init_with_flags(InitFlags::NO_GPUS | InitFlags::NO_ATTACH)?;
    # Ok(())
    # }
    ```
    */
    #[doc(alias = "nvmlInitWithFlags")]
    pub fn init_with_flags(flags: InitFlags) -> Result<Self, NvmlError> {
        Self::init_internal(Library::default_instance(), flags)
    }

    fn init_internal(library: Arc<Library>, flags: InitFlags) -> Result<Self, NvmlError> {
        let lib = library.load()?;

        let res = if flags.is_empty() {
            nvml_sym(&lib.init).and_then(|sym| unsafe { nvml_try(sym()) })
        } else {
            nvml_sym(&lib.init_with_flags).and_then(|sym| unsafe { nvml_try(sym(flags.bits())) })
        };

        if let Err(e) = res {
            if let Err(close) = library.close() {
                log::warn!("failed to release NVML after a failed init: {}", close);
            }
            return Err(e);
        }

        Ok(Self {
            lib: ManuallyDrop::new(lib),
            library: ManuallyDrop::new(library),
        })
    }

    /// Create an `NvmlBuilder` for further flexibility in how NVML is initialized.
    pub fn builder<'a>() -> NvmlBuilder<'a> {
        NvmlBuilder::default()
    }

    pub(crate) fn lib(&self) -> &NvmlLib {
        &self.lib
    }

    /// The library session this `Nvml` holds a reference on.
    pub fn library(&self) -> &Arc<Library> {
        &self.library
    }

    /// Thin `unsafe` wrappers over every NVML entry point.
    pub fn raw_api(&self) -> RawApi<'_> {
        RawApi::new(self)
    }

    /**
    Use this to shutdown NVML and release allocated resources if you care about handling
    potential errors (*the `Drop` implementation ignores errors!*).

    Calls `nvmlShutdown` and then drops this session's reference on the
    library, unloading it if this was the last one.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `Library`, if unloading the library failed
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlShutdown")]
    pub fn shutdown(mut self) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.lib.shutdown)?;

        unsafe {
            nvml_try(sym())?;
        }

        // SAFETY: we `mem::forget(self)` after this, so neither field gets
        // touched by our `Drop` impl
        let (lib, library) = unsafe {
            (
                ManuallyDrop::take(&mut self.lib),
                ManuallyDrop::take(&mut self.library),
            )
        };
        mem::forget(self);
        drop(lib);

        Ok(library.close()?)
    }

    /**
    NVML's description of `code`.

    Falls back to this crate's own description of the error when the library
    does not export `nvmlErrorString`.
    */
    #[doc(alias = "nvmlErrorString")]
    pub fn error_string(&self, code: nvmlReturn_t) -> String {
        error::error_string(self.lib(), code)
    }

    /**
    Get the number of compute devices in the system (compute device == one GPU).

    Note that this count can include devices you do not have permission to access.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetCount_v2")]
    pub fn device_count(&self) -> Result<u32, NvmlError> {
        let sym = nvml_sym(&self.lib.device_get_count)?;

        unsafe {
            let mut count: c_uint = mem::zeroed();
            nvml_try(sym(&mut count))?;

            Ok(count)
        }
    }

    /**
    Gets the version of the system's graphics driver and returns it as an alphanumeric
    string.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `Utf8Error`, if the string obtained from the C function is not valid Utf8
    */
    #[doc(alias = "nvmlSystemGetDriverVersion")]
    pub fn sys_driver_version(&self) -> Result<String, NvmlError> {
        let sym = nvml_sym(&self.lib.system_get_driver_version)?;

        unsafe {
            let mut version_vec = vec![0; NVML_SYSTEM_DRIVER_VERSION_BUFFER_SIZE as usize];

            nvml_try(sym(
                version_vec.as_mut_ptr(),
                NVML_SYSTEM_DRIVER_VERSION_BUFFER_SIZE,
            ))?;

            let version_raw = CStr::from_ptr(version_vec.as_ptr());
            Ok(version_raw.to_str()?.into())
        }
    }

    /**
    Gets the version of the system's NVML library and returns it as an alphanumeric
    string.

    # Errors

    * `Utf8Error`, if the string obtained from the C function is not valid Utf8
    */
    #[doc(alias = "nvmlSystemGetNVMLVersion")]
    pub fn sys_nvml_version(&self) -> Result<String, NvmlError> {
        let sym = nvml_sym(&self.lib.system_get_nvml_version)?;

        unsafe {
            let mut version_vec = vec![0; NVML_SYSTEM_NVML_VERSION_BUFFER_SIZE as usize];

            nvml_try(sym(
                version_vec.as_mut_ptr(),
                NVML_SYSTEM_NVML_VERSION_BUFFER_SIZE,
            ))?;

            let version_raw = CStr::from_ptr(version_vec.as_ptr());
            Ok(version_raw.to_str()?.into())
        }
    }

    /**
    Gets the version of the system's CUDA driver.

    Uses `nvmlSystemGetCudaDriverVersion_v2`, which reads the version from the
    CUDA library, when the loaded NVML exports it, and the first revision
    otherwise.

    You can use `cuda_driver_version_major` and `cuda_driver_version_minor`
    to get the major and minor driver versions from this number.

    # Errors

    * `FunctionNotFound`, if cuDriverGetVersion() is not found in the shared library
    * `LibraryNotFound`, if libcuda.so.1 or libcuda.dll cannot be found
    */
    #[doc(alias = "nvmlSystemGetCudaDriverVersion_v2")]
    pub fn sys_cuda_driver_version(&self) -> Result<i32, NvmlError> {
        let entry = if self.lib.system_get_cuda_driver_version_v2.is_loaded() {
            &self.lib.system_get_cuda_driver_version_v2
        } else {
            &self.lib.system_get_cuda_driver_version
        };
        let sym = nvml_sym(entry)?;

        unsafe {
            let mut version: c_int = mem::zeroed();
            nvml_try(sym(&mut version))?;

            Ok(version)
        }
    }

    /**
    Gets the name of the process for the given process ID, cropped to the provided length.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if the length is 0
    * `NotFound`, if the process does not exist
    * `NoPermission`, if the user doesn't have permission to perform the operation
    * `Utf8Error`, if the string obtained from the C function is not valid UTF-8. NVIDIA's docs say
    that the string encoding is ANSI, so this may very well happen.
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlSystemGetProcessName")]
    pub fn sys_process_name(&self, pid: u32, length: usize) -> Result<String, NvmlError> {
        let sym = nvml_sym(&self.lib.system_get_process_name)?;

        if length == 0 {
            return Err(NvmlError::InvalidArg);
        }

        unsafe {
            let mut name_vec = vec![0; length];

            nvml_try(sym(pid, name_vec.as_mut_ptr(), length as c_uint))?;

            let name_raw = CStr::from_ptr(name_vec.as_ptr());
            Ok(name_raw.to_str()?.into())
        }
    }

    /**
    Acquire the handle for a particular device based on its index (starts at 0).

    Usage of this function causes NVML to initialize the target GPU. Additional
    GPUs may be initialized if the target GPU is an SLI slave.

    NVIDIA's docs state that "The order in which NVML enumerates devices has
    no guarantees of consistency between reboots. For that reason it is recommended
    that devices be looked up by their PCI ids or UUID." In this library, that translates
    into usage of `.device_by_uuid()` and `.device_by_pci_bus_id()`.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if index is invalid
    * `InsufficientPower`, if any attached devices have improperly attached external power cables
    * `NoPermission`, if the user doesn't have permission to talk to this device
    * `IrqIssue`, if the NVIDIA kernel detected an interrupt issue with the attached GPUs
    * `GpuLost`, if the target GPU has fallen off the bus or is otherwise inaccessible
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetHandleByIndex_v2")]
    pub fn device_by_index(&self, index: u32) -> Result<Device, NvmlError> {
        let sym = nvml_sym(&self.lib.device_get_handle_by_index)?;

        unsafe {
            let mut device: nvmlDevice_t = mem::zeroed();
            nvml_try(sym(index, &mut device))?;

            Ok(Device::new(device, self))
        }
    }

    /**
    Acquire the handle for a particular device based on its PCI bus ID.

    The bus ID corresponds to the `bus_id` returned by `DeviceApi::pci_info()`.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if `pci_bus_id` is invalid
    * `NotFound`, if `pci_bus_id` does not match a valid device on the system
    * `GpuLost`, if the target GPU has fallen off the bus or is otherwise inaccessible
    * `NulError`, for which you can read the docs on `std::ffi::NulError`
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetHandleByPciBusId_v2")]
    pub fn device_by_pci_bus_id<S: AsRef<str>>(&self, pci_bus_id: S) -> Result<Device, NvmlError>
    where
        Vec<u8>: From<S>,
    {
        let sym = nvml_sym(&self.lib.device_get_handle_by_pci_bus_id)?;

        unsafe {
            let c_string = CString::new(pci_bus_id)?;
            let mut device: nvmlDevice_t = mem::zeroed();

            nvml_try(sym(c_string.as_ptr(), &mut device))?;

            Ok(Device::new(device, self))
        }
    }

    /// Not documenting this because it's deprecated and does not seem to work
    /// anymore.
    #[deprecated(note = "use `.device_by_uuid()`, this errors on dual GPU boards")]
    #[doc(alias = "nvmlDeviceGetHandleBySerial")]
    pub fn device_by_serial<S: AsRef<str>>(&self, board_serial: S) -> Result<Device, NvmlError>
    where
        Vec<u8>: From<S>,
    {
        let sym = nvml_sym(&self.lib.device_get_handle_by_serial)?;

        unsafe {
            let c_string = CString::new(board_serial)?;
            let mut device: nvmlDevice_t = mem::zeroed();

            nvml_try(sym(c_string.as_ptr(), &mut device))?;

            Ok(Device::new(device, self))
        }
    }

    /**
    Acquire the handle for a particular device based on its globally unique immutable
    UUID.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if `uuid` is invalid
    * `NotFound`, if `uuid` does not match a valid device on the system
    * `GpuLost`, if the target GPU has fallen off the bus or is otherwise inaccessible
    * `NulError`, for which you can read the docs on `std::ffi::NulError`
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetHandleByUUID")]
    pub fn device_by_uuid<S: AsRef<str>>(&self, uuid: S) -> Result<Device, NvmlError>
    where
        Vec<u8>: From<S>,
    {
        let sym = nvml_sym(&self.lib.device_get_handle_by_uuid)?;

        unsafe {
            let c_string = CString::new(uuid)?;
            let mut device: nvmlDevice_t = mem::zeroed();

            nvml_try(sym(c_string.as_ptr(), &mut device))?;

            Ok(Device::new(device, self))
        }
    }

    /**
    Gets the common ancestor for two devices.

    Note: this is the same as `DeviceApi::topology_common_ancestor()`.

    # Errors

    * `InvalidArg`, if the device is invalid
    * `NotSupported`, if this `Device` or the OS does not support this feature
    * `UnexpectedVariant`, for which you can read the docs for
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceGetTopologyCommonAncestor")]
    pub fn topology_common_ancestor<'nvml>(
        &'nvml self,
        device1: &impl DeviceApi<'nvml>,
        device2: &impl DeviceApi<'nvml>,
    ) -> Result<TopologyLevel, NvmlError> {
        device1.topology_common_ancestor(device2)
    }

    /**
    Acquire the handle for a particular `Unit` based on its index.

    Valid indices are derived from the count returned by `.unit_count()`.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `InvalidArg`, if `index` is invalid
    * `Unknown`, on any unexpected error

    # Device Support

    For S-class products.
    */
    #[doc(alias = "nvmlUnitGetHandleByIndex")]
    pub fn unit_by_index(&self, index: u32) -> Result<Unit, NvmlError> {
        let sym = nvml_sym(&self.lib.unit_get_handle_by_index)?;

        unsafe {
            let mut unit: nvmlUnit_t = mem::zeroed();
            nvml_try(sym(index as c_uint, &mut unit))?;

            Ok(Unit::new(unit, self))
        }
    }

    /**
    Gets the set of GPUs that have a CPU affinity with the given CPU number.

    # Errors

    * `InvalidArg`, if `cpu_number` is invalid
    * `NotSupported`, if this `Device` or the OS does not support this feature
    * `Unknown`, an error has occurred in the underlying topology discovery
    */
    #[doc(alias = "nvmlSystemGetTopologyGpuSet")]
    pub fn topology_gpu_set(&self, cpu_number: u32) -> Result<Vec<Device>, NvmlError> {
        let sym = nvml_sym(&self.lib.system_get_topology_gpu_set)?;

        unsafe {
            let devices = query_list(|count, devices| sym(cpu_number, count, devices))?;

            Ok(devices.into_iter().map(|d| Device::new(d, self)).collect())
        }
    }

    /**
    Gets the IDs and firmware versions for any Host Interface Cards in the system.

    The list starts with room for one card and doubles for as long as NVML
    reports `InsufficientSize`.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `Utf8Error`, if a firmware version is not valid UTF-8

    # Device Support

    Supports S-class products.
    */
    #[doc(alias = "nvmlSystemGetHicVersion")]
    pub fn hic_versions(&self) -> Result<Vec<HwbcEntry>, NvmlError> {
        let sym = nvml_sym(&self.lib.system_get_hic_version)?;

        unsafe {
            let mut capacity: c_uint = 1;

            loop {
                let mut count = capacity;
                let mut hics: Vec<nvmlHwbcEntry_t> = vec![mem::zeroed(); capacity as usize];

                match sym(&mut count, hics.as_mut_ptr()) {
                    nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE => {
                        if capacity >= MAX_HIC_ENTRIES {
                            return Err(NvmlError::InsufficientSize(Some(count as usize)));
                        }
                        capacity = (capacity * 2).max(count).min(MAX_HIC_ENTRIES);
                    }
                    other => {
                        nvml_try(other)?;

                        hics.truncate(count as usize);
                        return hics.into_iter().map(HwbcEntry::try_from).collect();
                    }
                }
            }
        }
    }

    /**
    Gets the number of units in the system.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `Unknown`, on any unexpected error

    # Device Support

    Supports S-class products.
    */
    #[doc(alias = "nvmlUnitGetCount")]
    pub fn unit_count(&self) -> Result<u32, NvmlError> {
        let sym = nvml_sym(&self.lib.unit_get_count)?;

        unsafe {
            let mut count: c_uint = mem::zeroed();
            nvml_try(sym(&mut count))?;

            Ok(count)
        }
    }

    /**
    Create an empty set of events.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `Unknown`, on any unexpected error

    # Device Support

    Supports Fermi and newer fully supported devices.
    */
    #[doc(alias = "nvmlEventSetCreate")]
    pub fn create_event_set(&self) -> Result<EventSet, NvmlError> {
        let sym = nvml_sym(&self.lib.event_set_create)?;

        unsafe {
            let mut set: nvmlEventSet_t = mem::zeroed();
            nvml_try(sym(&mut set))?;

            Ok(EventSet::new(set, self))
        }
    }

    /**
    Request the OS and the NVIDIA kernel driver to rediscover a portion of the PCI
    subsystem in search of GPUs that were previously removed.

    The portion of the PCI tree can be narrowed by specifying a domain, bus, and
    device in the passed-in `pci_info`. **If all of these fields are zeroes, the
    entire PCI tree will be searched**; see [`PciInfo::whole_tree`].

    All newly discovered GPUs will be initialized and have their ECC scrubbed which
    may take several seconds per GPU. **All device handles are no longer guaranteed
    to be valid post discovery**.

    Must be run as administrator.

    # Errors

    * `Uninitialized`, if the library has not been successfully initialized
    * `OperatingSystem`, if the operating system is denying this feature
    * `NoPermission`, if the calling process has insufficient permissions to
    perform this operation
    * `NulError`, if the bus ID contains a nul byte
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceDiscoverGpus")]
    pub fn discover_gpus(&self, pci_info: PciInfo) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.lib.device_discover_gpus)?;

        unsafe { nvml_try(sym(&mut pci_info.try_into()?)) }
    }

    /**
    Remove the GPU at `pci_info` from the view of the driver.

    Every `Device` for that GPU is invalid afterwards.

    # Errors

    * `NotFound`, if no GPU is at that location
    * `InUse`, if the GPU is still in use
    * `NoPermission`, if the calling process has insufficient permissions
    * `NulError`, if the bus ID contains a nul byte
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlDeviceRemoveGpu")]
    pub fn remove_gpu(&self, pci_info: PciInfo) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.lib.device_remove_gpu)?;

        unsafe { nvml_try(sym(&mut pci_info.try_into()?)) }
    }

    /**
    Remove the GPU at `pci_info`, choosing whether the kernel forgets it and
    whether its PCIe link is shut down.

    # Errors

    Same as [`Nvml::remove_gpu`].
    */
    #[doc(alias = "nvmlDeviceRemoveGpu_v2")]
    pub fn remove_gpu_v2(
        &self,
        pci_info: PciInfo,
        gpu_state: DetachGpuState,
        link_state: PcieLinkState,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.lib.device_remove_gpu_v2)?;

        unsafe {
            nvml_try(sym(
                &mut pci_info.try_into()?,
                gpu_state.as_c(),
                link_state.as_c(),
            ))
        }
    }

    /**
    Gets the number of excluded GPU devices in the system.

    # Device Support

    Supports all devices.
    */
    #[doc(alias = "nvmlGetExcludedDeviceCount")]
    pub fn excluded_device_count(&self) -> Result<u32, NvmlError> {
        let sym = nvml_sym(&self.lib.get_excluded_device_count)?;

        unsafe {
            let mut count: c_uint = mem::zeroed();

            nvml_try(sym(&mut count))?;
            Ok(count)
        }
    }

    /**
    Gets information for the specified excluded device.

    # Errors

    * `InvalidArg`, if the given index is invalid
    * `Utf8Error`, if strings obtained from the C function are not valid Utf8

    # Device Support

    Supports all devices.
    */
    #[doc(alias = "nvmlGetExcludedDeviceInfoByIndex")]
    pub fn excluded_device_info(&self, index: u32) -> Result<ExcludedDeviceInfo, NvmlError> {
        let sym = nvml_sym(&self.lib.get_excluded_device_info_by_index)?;

        unsafe {
            let mut info: nvmlExcludedDeviceInfo_t = mem::zeroed();

            nvml_try(sym(index, &mut info))?;
            ExcludedDeviceInfo::try_from(info)
        }
    }

    /**
    Allocate a sample buffer for GPU performance metrics.

    The buffer is freed when the returned `GpmSample` is dropped.

    # Errors

    * `InvalidArg`, if NVML rejected the call
    * `Unknown`, on any unexpected error
    */
    #[doc(alias = "nvmlGpmSampleAlloc")]
    pub fn gpm_sample(&self) -> Result<GpmSample, NvmlError> {
        let sym = nvml_sym(&self.lib.gpm_sample_alloc)?;

        unsafe {
            let mut sample: nvmlGpmSample_t = mem::zeroed();
            nvml_try(sym(&mut sample))?;

            Ok(GpmSample::new(sample, self))
        }
    }

    /**
    Compute the metrics requested in `metrics` from its two samples.

    The results are written into `metrics`; read them with
    [`GpmMetricsGet::metrics`].

    # Errors

    * `InvalidArg`, if the samples are unusable
    * `ArgumentVersionMismatch`, if NVML expects a different request layout
    * `NotSupported`, if the device does not support GPM
    */
    #[doc(alias = "nvmlGpmMetricsGet")]
    pub fn gpm_metrics_get(&self, metrics: &mut GpmMetricsGet) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.lib.gpm_metrics_get)?;

        unsafe { nvml_try(sym(&mut metrics.raw)) }
    }

    /**
    Check whether a vGPU described by `vgpu` can run on the physical GPU
    described by `pgpu`.

    Both metadata structs are passed with their opaque data.

    # Errors

    * `InvalidArg`, if either struct is malformed
    * `NotSupported`, if the host does not support vGPU migration
    */
    #[doc(alias = "nvmlGetVgpuCompatibility")]
    pub fn vgpu_compatibility(
        &self,
        vgpu: &VgpuMetadata,
        pgpu: &VgpuPgpuMetadata,
    ) -> Result<VgpuPgpuCompatibility, NvmlError> {
        let sym = nvml_sym(&self.lib.get_vgpu_compatibility)?;

        unsafe {
            let mut compat: nvmlVgpuPgpuCompatibility_t = mem::zeroed();

            with_opaque_data(&vgpu.raw, &vgpu.opaque_data, |vgpu| {
                with_opaque_data(&pgpu.raw, &pgpu.opaque_data, |pgpu| {
                    nvml_try(sym(vgpu, pgpu, &mut compat))
                })
            })?;

            Ok(VgpuPgpuCompatibility::from(compat))
        }
    }
}

/// This `Drop` implementation ignores errors! Use the `.shutdown()` method on
/// the `Nvml` struct if you care about handling them.
impl Drop for Nvml {
    #[doc(alias = "nvmlShutdown")]
    fn drop(&mut self) {
        match nvml_sym(&self.lib.shutdown) {
            Ok(sym) => {
                if let Err(e) = unsafe { nvml_try(sym()) } {
                    log::warn!("nvmlShutdown failed: {}", e);
                }
            }
            Err(e) => log::warn!("{}", e),
        }

        // SAFETY: called after the last usage of either field
        unsafe {
            ManuallyDrop::drop(&mut self.lib);
            if let Err(e) = self.library.close() {
                log::warn!("failed to release NVML: {}", e);
            }
            ManuallyDrop::drop(&mut self.library);
        }
    }
}

/**
A builder struct that provides further flexibility in how NVML is initialized.

# Examples

Initialize NVML with a non-default name for the shared object file:

```no_run
use nvml::Nvml;
use std::ffi::OsStr;

let init_result = Nvml::builder().lib_path(OsStr::new("libnvidia-ml-other-name.so")).init();
```

Initialize NVML from a library session of your own, independent of the
process-wide one:

```no_run
use nvml::{Library, LibraryOptions, Nvml};
use std::sync::Arc;

let library = Arc::new(Library::new(LibraryOptions::with_path("/opt/nvidia/libnvidia-ml.so.1")));
let init_result = Nvml::builder().library(library).init();
```
*/
#[derive(Debug, Clone, Default)]
pub struct NvmlBuilder<'a> {
    lib_path: Option<&'a OsStr>,
    flags: InitFlags,
    library: Option<Arc<Library>>,
}

impl<'a> NvmlBuilder<'a> {
    /**
    Set the path to the NVML lib file.

    The path can only change while the library session is not loaded; see
    [`Library::set_options`].
    */
    pub fn lib_path(&mut self, path: &'a OsStr) -> &mut Self {
        self.lib_path = Some(path);
        self
    }

    /// Set the `InitFlags` to initialize NVML with.
    pub fn flags(&mut self, flags: InitFlags) -> &mut Self {
        self.flags = flags;
        self
    }

    /// Load through `library` instead of [`Library::default_instance`].
    pub fn library(&mut self, library: Arc<Library>) -> &mut Self {
        self.library = Some(library);
        self
    }

    /**
    Perform initialization.

    # Errors

    * `Library`, with `AlreadyLoaded`, if a different path was requested
    while the session is loaded
    * anything [`Nvml::init`] returns
    */
    pub fn init(&self) -> Result<Nvml, NvmlError> {
        let library = self
            .library
            .clone()
            .unwrap_or_else(Library::default_instance);

        if let Some(path) = self.lib_path {
            let mut options = library.options();
            if options.path.as_os_str() != path {
                options.path = path.to_os_string();
                library.set_options(options)?;
            }
        }

        Nvml::init_internal(library, self.flags)
    }
}
