use crate::Device;
use crate::Nvml;
use crate::Unit;

use crate::bitmasks::event::EventTypes;
use crate::enum_wrappers::device::TopologyLevel;
use crate::enums::unit::LedState;
use crate::error::NvmlError;
use crate::event::EventSet;
use crate::library::{Library, LibraryOptions};
use crate::struct_wrappers::{device::*, event::*, unit::*, *};

use nvml_dl::{DlError, LoaderError};
use std::collections::HashMap;
use std::ffi::c_void;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait ShouldPrint: Debug {
    fn should_print(&self) -> bool {
        true
    }
}

impl ShouldPrint for () {
    fn should_print(&self) -> bool {
        false
    }
}

impl<'nvml> ShouldPrint for Device<'nvml> {
    fn should_print(&self) -> bool {
        false
    }
}

impl<'nvml> ShouldPrint for Unit<'nvml> {
    fn should_print(&self) -> bool {
        false
    }
}

impl<'nvml> ShouldPrint for EventSet<'nvml> {
    fn should_print(&self) -> bool {
        false
    }
}

impl ShouldPrint for bool {}
impl ShouldPrint for u32 {}
impl ShouldPrint for i32 {}
impl ShouldPrint for u64 {}
impl ShouldPrint for String {}
impl ShouldPrint for Vec<ProcessInfo> {}
impl<'nvml> ShouldPrint for Vec<Device<'nvml>> {}
impl ShouldPrint for Vec<HwbcEntry> {}
impl ShouldPrint for Utilization {}
impl ShouldPrint for ExcludedDeviceInfo {}
impl ShouldPrint for MemoryInfo {}
impl ShouldPrint for PciInfo {}
impl ShouldPrint for MigMode {}
impl ShouldPrint for DeviceAttributes {}
impl ShouldPrint for CudaComputeCapability {}
impl ShouldPrint for TopologyLevel {}
impl ShouldPrint for EventTypes {}
impl<'nvml> ShouldPrint for EventData<'nvml> {}
impl ShouldPrint for FansInfo {}
impl ShouldPrint for LedState {}
impl ShouldPrint for PsuInfo {}
impl ShouldPrint for UnitInfo {}

pub fn nvml() -> Nvml {
    Nvml::init().expect("initialized library")
}

pub fn device(nvml: &Nvml) -> Device<'_> {
    nvml.device_by_index(0).expect("device")
}

pub fn unit(nvml: &Nvml) -> Unit<'_> {
    nvml.unit_by_index(0).expect("unit")
}

/// Run all testing methods for the given test.
pub fn test<T, R>(reps: usize, test: T)
where
    T: Fn() -> Result<R, NvmlError>,
    R: ShouldPrint,
{
    single(|| test());

    multi(reps, || test());
}

pub fn test_with_device<T, R>(reps: usize, nvml: &Nvml, test: T)
where
    T: Fn(&Device) -> Result<R, NvmlError>,
    R: ShouldPrint,
{
    let device = device(nvml);

    single(|| test(&device));

    multi(reps, || test(&device));
}

pub fn test_with_unit<T, R>(reps: usize, nvml: &Nvml, test: T)
where
    T: Fn(&Unit) -> Result<R, NvmlError>,
    R: ShouldPrint,
{
    let unit = unit(nvml);

    single(|| test(&unit));

    multi(reps, || test(&unit));
}

/// Run the given test once.
pub fn single<T, R>(test: T)
where
    T: Fn() -> Result<R, NvmlError>,
    R: ShouldPrint,
{
    let res = test().expect("successful single test");

    if res.should_print() {
        print!("{:?} ... ", res);
    }
}

/// Run the given test multiple times.
pub fn multi<T, R>(count: usize, test: T)
where
    T: Fn() -> Result<R, NvmlError>,
    R: ShouldPrint,
{
    for i in 0..count {
        test().unwrap_or_else(|_| panic!("successful multi call #{}", i));
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A handle value that is never dereferenced, distinct per `n`.
pub fn fake_handle<T>(n: usize) -> *mut T {
    n as *mut T
}

/// How often a [`MockLibrary`] and its clones were opened and closed.
#[derive(Debug, Default)]
pub struct MockCalls {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
}

/**
A loader whose "exported symbols" are `extern "C"` functions in the test
binary.

Clones share their call counters, so a test can keep one clone and hand the
others to a `Library` factory.
*/
#[derive(Debug, Clone)]
pub struct MockLibrary {
    symbols: HashMap<&'static str, usize>,
    open: bool,
    fail_open: bool,
    fail_close: bool,
    calls: Arc<MockCalls>,
}

impl MockLibrary {
    /// A library exporting just enough to initialize and shut down.
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            open: false,
            fail_open: false,
            fail_close: false,
            calls: Arc::new(MockCalls::default()),
        }
        .export("nvmlInit_v2", fake::succeed as usize)
        .export("nvmlInitWithFlags", fake::init_with_flags as usize)
        .export("nvmlShutdown", fake::succeed as usize)
    }

    /// Export `address` under `symbol`.
    pub fn export(mut self, symbol: &'static str, address: usize) -> Self {
        self.symbols.insert(symbol, address);
        self
    }

    pub fn without(mut self, symbol: &str) -> Self {
        self.symbols.remove(symbol);
        self
    }

    pub fn fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn calls(&self) -> &MockCalls {
        &self.calls
    }
}

impl nvml_dl::Library for MockLibrary {
    fn open(&mut self) -> Result<(), DlError> {
        if self.fail_open {
            return Err(DlError::Open {
                name: "mock".into(),
                source: LoaderError::DlOpenUnknown,
            });
        }

        if !self.open {
            self.open = true;
            self.calls.opens.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DlError> {
        if !self.open {
            return Ok(());
        }

        if self.fail_close {
            return Err(DlError::Close {
                name: "mock".into(),
                source: LoaderError::DlCloseUnknown,
            });
        }

        self.open = false;
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn symbol(&self, symbol: &str) -> Result<*mut c_void, DlError> {
        if !self.open {
            return Err(DlError::NotOpen {
                name: "mock".into(),
            });
        }

        self.symbols
            .get(symbol)
            .map(|address| *address as *mut c_void)
            .ok_or_else(|| DlError::SymbolNotFound {
                symbol: symbol.to_owned(),
                source: LoaderError::DlSymUnknown,
            })
    }
}

/// A library session backed by `mock`, independent of every other session.
pub fn mock_library(mock: MockLibrary) -> Arc<Library> {
    Arc::new(Library::with_factory(
        LibraryOptions::default(),
        move |_| Box::new(mock.clone()),
    ))
}

/// An initialized `Nvml` over `mock`, and the session it holds.
pub fn mock_nvml(mock: MockLibrary) -> (Nvml, Arc<Library>) {
    init_logging();
    let library = mock_library(mock);
    let nvml = Nvml::builder()
        .library(library.clone())
        .init()
        .expect("mock initialized");

    (nvml, library)
}

/**
Stand-ins for NVML entry points.

Devices are `fake_handle(index + 1)`. Everything here is stateless apart from
the thread-local counters, which are safe because each test runs on its own
thread.
*/
pub mod fake {
    use crate::ffi::bindings::*;
    use std::cell::Cell;
    use std::os::raw::{c_char, c_int, c_uint, c_ulonglong};
    use std::ptr;

    pub const DEVICE_COUNT: c_uint = 2;

    thread_local! {
        pub static FREED_EVENT_SETS: Cell<usize> = Cell::new(0);
        pub static FREED_GPM_SAMPLES: Cell<usize> = Cell::new(0);
        pub static LAST_INIT_FLAGS: Cell<Option<c_uint>> = Cell::new(None);
    }

    pub extern "C" fn succeed() -> nvmlReturn_t {
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub extern "C" fn driver_not_loaded() -> nvmlReturn_t {
        nvmlReturn_enum_NVML_ERROR_DRIVER_NOT_LOADED
    }

    pub extern "C" fn init_with_flags(flags: c_uint) -> nvmlReturn_t {
        LAST_INIT_FLAGS.with(|f| f.set(Some(flags)));
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub extern "C" fn error_string(_code: nvmlReturn_t) -> *const c_char {
        b"mock error\0".as_ptr() as *const c_char
    }

    unsafe fn write_str(buf: *mut c_char, len: c_uint, value: &[u8]) -> nvmlReturn_t {
        if value.len() + 1 > len as usize {
            return nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE;
        }

        ptr::copy_nonoverlapping(value.as_ptr() as *const c_char, buf, value.len());
        *buf.add(value.len()) = 0;
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn driver_version(buf: *mut c_char, len: c_uint) -> nvmlReturn_t {
        write_str(buf, len, b"550.54.14")
    }

    pub unsafe extern "C" fn cuda_driver_version(version: *mut c_int) -> nvmlReturn_t {
        *version = 12040;
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn device_get_count(count: *mut c_uint) -> nvmlReturn_t {
        *count = DEVICE_COUNT;
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn device_get_handle_by_index(
        index: c_uint,
        device: *mut nvmlDevice_t,
    ) -> nvmlReturn_t {
        if index >= DEVICE_COUNT {
            return nvmlReturn_enum_NVML_ERROR_INVALID_ARGUMENT;
        }

        *device = (index as usize + 1) as nvmlDevice_t;
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn device_get_handle_by_uuid(
        uuid: *const c_char,
        device: *mut nvmlDevice_t,
    ) -> nvmlReturn_t {
        match std::ffi::CStr::from_ptr(uuid).to_bytes() {
            b"GPU-0" => device_get_handle_by_index(0, device),
            b"GPU-1" => device_get_handle_by_index(1, device),
            _ => nvmlReturn_enum_NVML_ERROR_NOT_FOUND,
        }
    }

    pub unsafe extern "C" fn device_get_index(
        device: nvmlDevice_t,
        index: *mut c_uint,
    ) -> nvmlReturn_t {
        *index = device as usize as c_uint - 1;
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn device_get_name(
        _device: nvmlDevice_t,
        name: *mut c_char,
        len: c_uint,
    ) -> nvmlReturn_t {
        write_str(name, len, b"Mock GPU")
    }

    pub unsafe extern "C" fn device_get_memory_info(
        _device: nvmlDevice_t,
        memory: *mut nvmlMemory_t,
    ) -> nvmlReturn_t {
        *memory = nvmlMemory_t {
            total: 16 << 30,
            free: 12 << 30,
            used: 4 << 30,
        };
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn device_get_pci_info(
        device: nvmlDevice_t,
        pci: *mut nvmlPciInfo_t,
    ) -> nvmlReturn_t {
        *pci = std::mem::zeroed();
        (*pci).bus = device as usize as c_uint;
        (*pci).pciSubSystemId = 0x1234;
        write_str((*pci).busId.as_mut_ptr(), 32, b"00000000:01:00.0")
    }

    macro_rules! processes {
        ($name:ident, $ty:ty, $pid:expr, $($field:ident: $value:expr),*) => {
            /// Reports a single process, sized the two-call way.
            pub unsafe extern "C" fn $name(
                _device: nvmlDevice_t,
                count: *mut c_uint,
                infos: *mut $ty,
            ) -> nvmlReturn_t {
                if *count < 1 || infos.is_null() {
                    *count = 1;
                    return nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE;
                }

                *infos = std::mem::zeroed();
                (*infos).pid = $pid;
                (*infos).usedGpuMemory = 1 << 20;
                $( (*infos).$field = $value; )*
                *count = 1;
                nvmlReturn_enum_NVML_SUCCESS
            }
        };
    }

    processes!(processes_v1, nvmlProcessInfo_v1_t, 1,);
    processes!(processes_v2, nvmlProcessInfo_v2_t, 2, gpuInstanceId: 5, computeInstanceId: 6);
    processes!(processes_v3, nvmlProcessInfo_t, 3, gpuInstanceId: 7, computeInstanceId: 8);

    pub unsafe extern "C" fn no_processes(
        _device: nvmlDevice_t,
        count: *mut c_uint,
        _infos: *mut nvmlProcessInfo_t,
    ) -> nvmlReturn_t {
        *count = 0;
        nvmlReturn_enum_NVML_SUCCESS
    }

    /// Opaque bytes the metadata fakes append after the fixed fields.
    pub const OPAQUE_DATA: &[u8] = b"opaque metadata blob";

    pub unsafe extern "C" fn device_get_vgpu_metadata(
        _device: nvmlDevice_t,
        metadata: *mut nvmlVgpuPgpuMetadata_t,
        size: *mut c_uint,
    ) -> nvmlReturn_t {
        let header = std::mem::size_of::<nvmlVgpuPgpuMetadata_t>() - 4;
        let needed = header + OPAQUE_DATA.len();
        if (*size as usize) < needed {
            *size = needed as c_uint;
            return nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE;
        }

        (*metadata).version = 1;
        (*metadata).revision = 2;
        (*metadata).pgpuVirtualizationCaps = 0x3;
        (*metadata).hostSupportedVgpuRange = nvmlVgpuVersion_t {
            minVersion: 0x10000,
            maxVersion: 0x20000,
        };
        let status = write_str((*metadata).hostDriverVersion.as_mut_ptr(), 80, b"550.54.14");
        (*metadata).opaqueDataSize = OPAQUE_DATA.len() as c_uint;
        ptr::copy_nonoverlapping(
            OPAQUE_DATA.as_ptr(),
            (metadata as *mut u8).add(header),
            OPAQUE_DATA.len(),
        );
        *size = needed as c_uint;
        status
    }

    /// Writes only the fixed fields, so it fits in a bare C struct.
    pub unsafe extern "C" fn vgpu_instance_get_metadata(
        instance: nvmlVgpuInstance_t,
        metadata: *mut nvmlVgpuMetadata_t,
        size: *mut c_uint,
    ) -> nvmlReturn_t {
        if (*size as usize) < std::mem::size_of::<nvmlVgpuMetadata_t>() {
            *size = std::mem::size_of::<nvmlVgpuMetadata_t>() as c_uint;
            return nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE;
        }

        (*metadata).version = 1;
        (*metadata).revision = instance;
        (*metadata).guestInfoState =
            nvmlVgpuGuestInfoState_enum_NVML_VGPU_INSTANCE_GUEST_INFO_STATE_INITIALIZED;
        (*metadata).guestVgpuVersion = 0x10000;
        (*metadata).opaqueDataSize = 0;
        write_str((*metadata).guestDriverVersion.as_mut_ptr(), 80, b"551.61")
    }

    pub unsafe extern "C" fn get_vgpu_compatibility(
        vgpu: *mut nvmlVgpuMetadata_t,
        pgpu: *mut nvmlVgpuPgpuMetadata_t,
        compat: *mut nvmlVgpuPgpuCompatibility_t,
    ) -> nvmlReturn_t {
        let range = (*pgpu).hostSupportedVgpuRange;
        let version = (*vgpu).guestVgpuVersion;

        *compat = if (range.minVersion..=range.maxVersion).contains(&version) {
            nvmlVgpuPgpuCompatibility_t {
                vgpuVmCompatibility: nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_LIVE,
                compatibilityLimitCode:
                    nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_NONE,
            }
        } else {
            nvmlVgpuPgpuCompatibility_t {
                vgpuVmCompatibility: nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_NONE,
                compatibilityLimitCode:
                    nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_GUEST_DRIVER,
            }
        };
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn vgpu_type_get_name(
        _type_id: nvmlVgpuTypeId_t,
        name: *mut c_char,
        size: *mut c_uint,
    ) -> nvmlReturn_t {
        let status = write_str(name, *size, b"GRID A100-4C");
        *size = 13;
        status
    }

    pub unsafe extern "C" fn event_set_create(set: *mut nvmlEventSet_t) -> nvmlReturn_t {
        *set = 0x5e7 as nvmlEventSet_t;
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub extern "C" fn event_set_free(_set: nvmlEventSet_t) -> nvmlReturn_t {
        FREED_EVENT_SETS.with(|freed| freed.set(freed.get() + 1));
        nvmlReturn_enum_NVML_SUCCESS
    }

    /// Times out when asked not to wait, otherwise reports XID 79 on device 0.
    pub unsafe extern "C" fn event_set_wait(
        _set: nvmlEventSet_t,
        data: *mut nvmlEventData_t,
        timeout_ms: c_uint,
    ) -> nvmlReturn_t {
        if timeout_ms == 0 {
            return nvmlReturn_enum_NVML_ERROR_TIMEOUT;
        }

        *data = nvmlEventData_t {
            device: 1 as nvmlDevice_t,
            eventType: nvmlEventTypeXidCriticalError,
            eventData: 79,
            gpuInstanceId: 0xFFFFFFFF,
            computeInstanceId: 0xFFFFFFFF,
        };
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn device_register_events(
        _device: nvmlDevice_t,
        events: c_ulonglong,
        _set: nvmlEventSet_t,
    ) -> nvmlReturn_t {
        if events & !nvmlEventTypeAll != 0 {
            nvmlReturn_enum_NVML_ERROR_NOT_SUPPORTED
        } else {
            nvmlReturn_enum_NVML_SUCCESS
        }
    }

    pub unsafe extern "C" fn gpm_sample_alloc(sample: *mut nvmlGpmSample_t) -> nvmlReturn_t {
        *sample = 0x6a as nvmlGpmSample_t;
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub extern "C" fn gpm_sample_free(_sample: nvmlGpmSample_t) -> nvmlReturn_t {
        FREED_GPM_SAMPLES.with(|freed| freed.set(freed.get() + 1));
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn gpm_query_if_streaming_enabled(
        _device: nvmlDevice_t,
        state: *mut c_uint,
    ) -> nvmlReturn_t {
        *state = 1;
        nvmlReturn_enum_NVML_SUCCESS
    }

    pub unsafe extern "C" fn gpu_instance_get_info(
        instance: nvmlGpuInstance_t,
        info: *mut nvmlGpuInstanceInfo_t,
    ) -> nvmlReturn_t {
        *info = nvmlGpuInstanceInfo_t {
            device: 1 as nvmlDevice_t,
            id: instance as usize as c_uint,
            profileId: NVML_GPU_INSTANCE_PROFILE_1_SLICE,
            placement: nvmlGpuInstancePlacement_t { start: 0, size: 1 },
        };
        nvmlReturn_enum_NVML_SUCCESS
    }

    /// Reports both fake devices as attached to the unit.
    pub unsafe extern "C" fn unit_get_devices(
        _unit: nvmlUnit_t,
        count: *mut c_uint,
        devices: *mut nvmlDevice_t,
    ) -> nvmlReturn_t {
        if *count < DEVICE_COUNT || devices.is_null() {
            *count = DEVICE_COUNT;
            return nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE;
        }

        for i in 0..DEVICE_COUNT as usize {
            *devices.add(i) = (i + 1) as nvmlDevice_t;
        }
        *count = DEVICE_COUNT;
        nvmlReturn_enum_NVML_SUCCESS
    }
}
