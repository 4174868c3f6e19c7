use std::ffi::c_void;
use std::fmt;
use std::os::raw::{c_char, c_int, c_uint, c_ulonglong};

use nvml_dl::{symbol_version, Library, VersionedSymbol};
use static_assertions::assert_impl_all;

use super::types::*;

/**
A function pointer resolved from the loaded library, together with the symbol
it was resolved from.

`get` returns `None` when the library does not export the symbol.
*/
#[derive(Clone, Copy)]
pub struct EntryPoint<F> {
    symbol: &'static str,
    func: Option<F>,
}

impl<F: Copy> EntryPoint<F> {
    pub const fn new(symbol: &'static str, func: Option<F>) -> Self {
        Self { symbol, func }
    }

    /// The exported name this entry point was bound to.
    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    /// The revision of the bound symbol, 1 for unsuffixed names.
    pub fn version(&self) -> u32 {
        symbol_version(self.symbol)
    }

    pub fn get(&self) -> Option<F> {
        self.func
    }

    pub fn is_loaded(&self) -> bool {
        self.func.is_some()
    }
}

impl<F> fmt::Debug for EntryPoint<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("symbol", &self.symbol)
            .field("loaded", &self.func.is_some())
            .finish()
    }
}

/**
The revision picked for an operation whose revisions take different argument
types.

Those revisions cannot share one function pointer type, so the table only
records which one won; callers dispatch on [`ActiveSymbol::version`] to the
matching per-revision entry point.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSymbol {
    symbol: &'static str,
}

impl ActiveSymbol {
    pub const fn new(symbol: &'static str) -> Self {
        Self { symbol }
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn version(&self) -> u32 {
        symbol_version(self.symbol)
    }
}

fn address<L: Library + ?Sized>(lib: &L, symbol: &str) -> Option<*mut c_void> {
    match lib.symbol(symbol) {
        Ok(addr) if !addr.is_null() => Some(addr),
        Ok(_) => None,
        Err(e) => {
            log::trace!("{}", e);
            None
        }
    }
}

macro_rules! return_type {
    () => {
        nvmlReturn_t
    };
    ($ret:ty) => {
        $ret
    };
}

macro_rules! entry_points {
    (
        functions {
            $( $field:ident = $symbol:literal fn($($arg:ty),*) $(-> $ret:ty)?; )*
        }
        versioned {
            $( $vfield:ident = [$vbase:literal $(, $vnewer:literal)*] fn($($varg:ty),*) $(-> $vret:ty)?; )*
        }
        selectors {
            $( $sfield:ident = [$sbase:literal $(, $snewer:literal)*]; )*
        }
    ) => {
        /**
        Every NVML entry point this crate knows about, resolved against one
        loaded library.

        Fields named after a single symbol are bound to exactly that symbol.
        Fields named after a logical operation (listed in [`Self::VERSIONED`])
        are bound to the newest revision the library exports.
        */
        #[derive(Debug, Clone)]
        pub struct NvmlLib {
            $( pub $field: EntryPoint<unsafe extern "C" fn($($arg),*) -> return_type!($($ret)?)>, )*
            $( pub $vfield: EntryPoint<unsafe extern "C" fn($($varg),*) -> return_type!($($vret)?)>, )*
            $( pub $sfield: ActiveSymbol, )*
        }

        impl NvmlLib {
            /// Logical operations and their revisions, oldest first.
            pub const VERSIONED: &'static [VersionedSymbol] = &[
                $( VersionedSymbol { name: $vbase, candidates: &[$vbase $(, $vnewer)*] }, )*
                $( VersionedSymbol { name: $sbase, candidates: &[$sbase $(, $snewer)*] }, )*
            ];

            /**
            Bind every entry point against `lib`, which must already be open.

            Resolution does not fail. Symbols the library does not export are
            left unbound and surface as errors when called.
            */
            pub fn resolve<L: Library + ?Sized>(lib: &L) -> Self {
                Self {
                    $( $field: {
                        let func = address(lib, $symbol).map(|addr| {
                            // SAFETY: the pointer type matches the declaration in nvml.h
                            unsafe {
                                std::mem::transmute::<
                                    *mut c_void,
                                    unsafe extern "C" fn($($arg),*) -> return_type!($($ret)?),
                                >(addr)
                            }
                        });
                        EntryPoint::new($symbol, func)
                    }, )*
                    $( $vfield: {
                        let symbol = VersionedSymbol {
                            name: $vbase,
                            candidates: &[$vbase $(, $vnewer)*],
                        }
                        .resolve(lib);
                        log::debug!("{} resolved to {}", $vbase, symbol);

                        let func = address(lib, symbol).map(|addr| {
                            // SAFETY: every revision in the group shares this type
                            unsafe {
                                std::mem::transmute::<
                                    *mut c_void,
                                    unsafe extern "C" fn($($varg),*) -> return_type!($($vret)?),
                                >(addr)
                            }
                        });
                        EntryPoint::new(symbol, func)
                    }, )*
                    $( $sfield: {
                        let symbol = VersionedSymbol {
                            name: $sbase,
                            candidates: &[$sbase $(, $snewer)*],
                        }
                        .resolve(lib);
                        log::debug!("{} resolved to {}", $sbase, symbol);

                        ActiveSymbol::new(symbol)
                    }, )*
                }
            }

            /// The symbol currently active for the logical operation `name`.
            pub fn active_symbol(&self, name: &str) -> Option<&'static str> {
                $( if name == $vbase { return Some(self.$vfield.symbol()); } )*
                $( if name == $sbase { return Some(self.$sfield.symbol()); } )*
                None
            }

            /// Symbols that could not be bound.
            pub fn unresolved(&self) -> Vec<&'static str> {
                let mut missing = Vec::new();
                $( if !self.$field.is_loaded() { missing.push(self.$field.symbol()); } )*
                $( if !self.$vfield.is_loaded() { missing.push(self.$vfield.symbol()); } )*
                missing
            }
        }
    };
}

// `_v1` fields are bound to the unsuffixed symbol.
entry_points! {
    functions {
        init_v1 = "nvmlInit" fn();
        init_v2 = "nvmlInit_v2" fn();
        init_with_flags = "nvmlInitWithFlags" fn(c_uint);
        shutdown = "nvmlShutdown" fn();
        error_string = "nvmlErrorString" fn(nvmlReturn_t) -> *const c_char;

        system_get_driver_version = "nvmlSystemGetDriverVersion" fn(*mut c_char, c_uint);
        system_get_nvml_version = "nvmlSystemGetNVMLVersion" fn(*mut c_char, c_uint);
        system_get_cuda_driver_version = "nvmlSystemGetCudaDriverVersion" fn(*mut c_int);
        system_get_cuda_driver_version_v2 = "nvmlSystemGetCudaDriverVersion_v2" fn(*mut c_int);
        system_get_process_name = "nvmlSystemGetProcessName" fn(c_uint, *mut c_char, c_uint);
        system_get_hic_version = "nvmlSystemGetHicVersion" fn(*mut c_uint, *mut nvmlHwbcEntry_t);
        system_get_topology_gpu_set =
            "nvmlSystemGetTopologyGpuSet" fn(c_uint, *mut c_uint, *mut nvmlDevice_t);
        get_excluded_device_count = "nvmlGetExcludedDeviceCount" fn(*mut c_uint);
        get_excluded_device_info_by_index =
            "nvmlGetExcludedDeviceInfoByIndex" fn(c_uint, *mut nvmlExcludedDeviceInfo_t);

        device_get_count_v1 = "nvmlDeviceGetCount" fn(*mut c_uint);
        device_get_count_v2 = "nvmlDeviceGetCount_v2" fn(*mut c_uint);
        device_get_handle_by_index_v1 = "nvmlDeviceGetHandleByIndex" fn(c_uint, *mut nvmlDevice_t);
        device_get_handle_by_index_v2 =
            "nvmlDeviceGetHandleByIndex_v2" fn(c_uint, *mut nvmlDevice_t);
        device_get_handle_by_pci_bus_id_v1 =
            "nvmlDeviceGetHandleByPciBusId" fn(*const c_char, *mut nvmlDevice_t);
        device_get_handle_by_pci_bus_id_v2 =
            "nvmlDeviceGetHandleByPciBusId_v2" fn(*const c_char, *mut nvmlDevice_t);
        device_get_handle_by_serial =
            "nvmlDeviceGetHandleBySerial" fn(*const c_char, *mut nvmlDevice_t);
        device_get_handle_by_uuid = "nvmlDeviceGetHandleByUUID" fn(*const c_char, *mut nvmlDevice_t);
        device_get_name = "nvmlDeviceGetName" fn(nvmlDevice_t, *mut c_char, c_uint);
        device_get_uuid = "nvmlDeviceGetUUID" fn(nvmlDevice_t, *mut c_char, c_uint);
        device_get_serial = "nvmlDeviceGetSerial" fn(nvmlDevice_t, *mut c_char, c_uint);
        device_get_index = "nvmlDeviceGetIndex" fn(nvmlDevice_t, *mut c_uint);
        device_get_memory_info = "nvmlDeviceGetMemoryInfo" fn(nvmlDevice_t, *mut nvmlMemory_t);
        device_get_utilization_rates =
            "nvmlDeviceGetUtilizationRates" fn(nvmlDevice_t, *mut nvmlUtilization_t);
        device_get_pci_info_v1 = "nvmlDeviceGetPciInfo" fn(nvmlDevice_t, *mut nvmlPciInfo_t);
        device_get_pci_info_v2 = "nvmlDeviceGetPciInfo_v2" fn(nvmlDevice_t, *mut nvmlPciInfo_t);
        device_get_pci_info_v3 = "nvmlDeviceGetPciInfo_v3" fn(nvmlDevice_t, *mut nvmlPciInfo_t);
        device_get_temperature =
            "nvmlDeviceGetTemperature" fn(nvmlDevice_t, nvmlTemperatureSensors_t, *mut c_uint);
        device_get_power_usage = "nvmlDeviceGetPowerUsage" fn(nvmlDevice_t, *mut c_uint);
        device_get_compute_running_processes_v1 = "nvmlDeviceGetComputeRunningProcesses"
            fn(nvmlDevice_t, *mut c_uint, *mut nvmlProcessInfo_v1_t);
        device_get_compute_running_processes_v2 = "nvmlDeviceGetComputeRunningProcesses_v2"
            fn(nvmlDevice_t, *mut c_uint, *mut nvmlProcessInfo_v2_t);
        device_get_compute_running_processes_v3 = "nvmlDeviceGetComputeRunningProcesses_v3"
            fn(nvmlDevice_t, *mut c_uint, *mut nvmlProcessInfo_t);
        device_get_graphics_running_processes_v1 = "nvmlDeviceGetGraphicsRunningProcesses"
            fn(nvmlDevice_t, *mut c_uint, *mut nvmlProcessInfo_v1_t);
        device_get_graphics_running_processes_v2 = "nvmlDeviceGetGraphicsRunningProcesses_v2"
            fn(nvmlDevice_t, *mut c_uint, *mut nvmlProcessInfo_v2_t);
        device_get_graphics_running_processes_v3 = "nvmlDeviceGetGraphicsRunningProcesses_v3"
            fn(nvmlDevice_t, *mut c_uint, *mut nvmlProcessInfo_t);
        device_get_mps_compute_running_processes_v1 = "nvmlDeviceGetMPSComputeRunningProcesses"
            fn(nvmlDevice_t, *mut c_uint, *mut nvmlProcessInfo_v1_t);
        device_get_mps_compute_running_processes_v2 = "nvmlDeviceGetMPSComputeRunningProcesses_v2"
            fn(nvmlDevice_t, *mut c_uint, *mut nvmlProcessInfo_v2_t);
        device_get_mps_compute_running_processes_v3 = "nvmlDeviceGetMPSComputeRunningProcesses_v3"
            fn(nvmlDevice_t, *mut c_uint, *mut nvmlProcessInfo_t);
        device_get_topology_common_ancestor = "nvmlDeviceGetTopologyCommonAncestor"
            fn(nvmlDevice_t, nvmlDevice_t, *mut nvmlGpuTopologyLevel_t);
        device_get_cuda_compute_capability =
            "nvmlDeviceGetCudaComputeCapability" fn(nvmlDevice_t, *mut c_int, *mut c_int);
        device_register_events =
            "nvmlDeviceRegisterEvents" fn(nvmlDevice_t, c_ulonglong, nvmlEventSet_t);
        device_get_supported_event_types =
            "nvmlDeviceGetSupportedEventTypes" fn(nvmlDevice_t, *mut c_ulonglong);
        device_remove_gpu = "nvmlDeviceRemoveGpu" fn(*mut nvmlPciInfo_t);
        device_remove_gpu_v2 = "nvmlDeviceRemoveGpu_v2"
            fn(*mut nvmlPciInfo_t, nvmlDetachGpuState_t, nvmlPcieLinkState_t);
        device_discover_gpus = "nvmlDeviceDiscoverGpus" fn(*mut nvmlPciInfo_t);
        device_get_nv_link_remote_pci_info_v1 =
            "nvmlDeviceGetNvLinkRemotePciInfo" fn(nvmlDevice_t, c_uint, *mut nvmlPciInfo_t);
        device_get_nv_link_remote_pci_info_v2 =
            "nvmlDeviceGetNvLinkRemotePciInfo_v2" fn(nvmlDevice_t, c_uint, *mut nvmlPciInfo_t);
        device_get_attributes_v1 =
            "nvmlDeviceGetAttributes" fn(nvmlDevice_t, *mut nvmlDeviceAttributes_t);
        device_get_attributes_v2 =
            "nvmlDeviceGetAttributes_v2" fn(nvmlDevice_t, *mut nvmlDeviceAttributes_t);
        device_get_mig_mode = "nvmlDeviceGetMigMode" fn(nvmlDevice_t, *mut c_uint, *mut c_uint);
        device_get_gpu_instance_profile_info = "nvmlDeviceGetGpuInstanceProfileInfo"
            fn(nvmlDevice_t, c_uint, *mut nvmlGpuInstanceProfileInfo_t);
        device_get_gpu_instance_possible_placements_v1 =
            "nvmlDeviceGetGpuInstancePossiblePlacements"
            fn(nvmlDevice_t, c_uint, *mut nvmlGpuInstancePlacement_t, *mut c_uint);
        device_get_gpu_instance_possible_placements_v2 =
            "nvmlDeviceGetGpuInstancePossiblePlacements_v2"
            fn(nvmlDevice_t, c_uint, *mut nvmlGpuInstancePlacement_t, *mut c_uint);
        device_create_gpu_instance =
            "nvmlDeviceCreateGpuInstance" fn(nvmlDevice_t, c_uint, *mut nvmlGpuInstance_t);
        device_get_gpu_instances = "nvmlDeviceGetGpuInstances"
            fn(nvmlDevice_t, c_uint, *mut nvmlGpuInstance_t, *mut c_uint);
        device_get_gpu_instance_by_id =
            "nvmlDeviceGetGpuInstanceById" fn(nvmlDevice_t, c_uint, *mut nvmlGpuInstance_t);

        gpm_query_device_support =
            "nvmlGpmQueryDeviceSupport" fn(nvmlDevice_t, *mut nvmlGpmSupport_t);
        gpm_query_if_streaming_enabled =
            "nvmlGpmQueryIfStreamingEnabled" fn(nvmlDevice_t, *mut c_uint);
        gpm_set_streaming_enabled = "nvmlGpmSetStreamingEnabled" fn(nvmlDevice_t, c_uint);
        gpm_sample_alloc = "nvmlGpmSampleAlloc" fn(*mut nvmlGpmSample_t);
        gpm_sample_free = "nvmlGpmSampleFree" fn(nvmlGpmSample_t);
        gpm_sample_get = "nvmlGpmSampleGet" fn(nvmlDevice_t, nvmlGpmSample_t);
        gpm_mig_sample_get = "nvmlGpmMigSampleGet" fn(nvmlDevice_t, c_uint, nvmlGpmSample_t);
        gpm_metrics_get = "nvmlGpmMetricsGet" fn(*mut nvmlGpmMetricsGet_t);

        device_get_active_vgpus =
            "nvmlDeviceGetActiveVgpus" fn(nvmlDevice_t, *mut c_uint, *mut nvmlVgpuInstance_t);
        device_get_vgpu_metadata = "nvmlDeviceGetVgpuMetadata"
            fn(nvmlDevice_t, *mut nvmlVgpuPgpuMetadata_t, *mut c_uint);
        device_get_supported_vgpus =
            "nvmlDeviceGetSupportedVgpus" fn(nvmlDevice_t, *mut c_uint, *mut nvmlVgpuTypeId_t);
        vgpu_instance_get_metadata = "nvmlVgpuInstanceGetMetadata"
            fn(nvmlVgpuInstance_t, *mut nvmlVgpuMetadata_t, *mut c_uint);
        get_vgpu_compatibility = "nvmlGetVgpuCompatibility" fn(
            *mut nvmlVgpuMetadata_t,
            *mut nvmlVgpuPgpuMetadata_t,
            *mut nvmlVgpuPgpuCompatibility_t
        );
        vgpu_instance_get_uuid =
            "nvmlVgpuInstanceGetUUID" fn(nvmlVgpuInstance_t, *mut c_char, c_uint);
        vgpu_instance_get_type =
            "nvmlVgpuInstanceGetType" fn(nvmlVgpuInstance_t, *mut nvmlVgpuTypeId_t);
        vgpu_instance_get_license_info_v1 =
            "nvmlVgpuInstanceGetLicenseInfo" fn(nvmlVgpuInstance_t, *mut nvmlVgpuLicenseInfo_t);
        vgpu_instance_get_license_info_v2 =
            "nvmlVgpuInstanceGetLicenseInfo_v2" fn(nvmlVgpuInstance_t, *mut nvmlVgpuLicenseInfo_t);
        vgpu_instance_get_fb_usage =
            "nvmlVgpuInstanceGetFbUsage" fn(nvmlVgpuInstance_t, *mut c_ulonglong);
        vgpu_type_get_name = "nvmlVgpuTypeGetName" fn(nvmlVgpuTypeId_t, *mut c_char, *mut c_uint);
        vgpu_type_get_class =
            "nvmlVgpuTypeGetClass" fn(nvmlVgpuTypeId_t, *mut c_char, *mut c_uint);
        vgpu_type_get_framebuffer_size =
            "nvmlVgpuTypeGetFramebufferSize" fn(nvmlVgpuTypeId_t, *mut c_ulonglong);
        vgpu_type_get_max_instances =
            "nvmlVgpuTypeGetMaxInstances" fn(nvmlDevice_t, nvmlVgpuTypeId_t, *mut c_uint);

        unit_get_count = "nvmlUnitGetCount" fn(*mut c_uint);
        unit_get_handle_by_index = "nvmlUnitGetHandleByIndex" fn(c_uint, *mut nvmlUnit_t);
        unit_get_unit_info = "nvmlUnitGetUnitInfo" fn(nvmlUnit_t, *mut nvmlUnitInfo_t);
        unit_get_led_state = "nvmlUnitGetLedState" fn(nvmlUnit_t, *mut nvmlLedState_t);
        unit_get_psu_info = "nvmlUnitGetPsuInfo" fn(nvmlUnit_t, *mut nvmlPSUInfo_t);
        unit_get_temperature = "nvmlUnitGetTemperature" fn(nvmlUnit_t, c_uint, *mut c_uint);
        unit_get_fan_speed_info =
            "nvmlUnitGetFanSpeedInfo" fn(nvmlUnit_t, *mut nvmlUnitFanSpeeds_t);
        unit_get_devices = "nvmlUnitGetDevices" fn(nvmlUnit_t, *mut c_uint, *mut nvmlDevice_t);
        unit_set_led_state = "nvmlUnitSetLedState" fn(nvmlUnit_t, nvmlLedColor_t);

        event_set_create = "nvmlEventSetCreate" fn(*mut nvmlEventSet_t);
        event_set_wait_v1 = "nvmlEventSetWait" fn(nvmlEventSet_t, *mut nvmlEventData_t, c_uint);
        event_set_wait_v2 = "nvmlEventSetWait_v2" fn(nvmlEventSet_t, *mut nvmlEventData_t, c_uint);
        event_set_free = "nvmlEventSetFree" fn(nvmlEventSet_t);

        gpu_instance_get_info =
            "nvmlGpuInstanceGetInfo" fn(nvmlGpuInstance_t, *mut nvmlGpuInstanceInfo_t);
        gpu_instance_destroy = "nvmlGpuInstanceDestroy" fn(nvmlGpuInstance_t);
        gpu_instance_get_compute_instance_profile_info =
            "nvmlGpuInstanceGetComputeInstanceProfileInfo"
            fn(nvmlGpuInstance_t, c_uint, c_uint, *mut nvmlComputeInstanceProfileInfo_t);
        gpu_instance_create_compute_instance = "nvmlGpuInstanceCreateComputeInstance"
            fn(nvmlGpuInstance_t, c_uint, *mut nvmlComputeInstance_t);
        gpu_instance_get_compute_instances = "nvmlGpuInstanceGetComputeInstances"
            fn(nvmlGpuInstance_t, c_uint, *mut nvmlComputeInstance_t, *mut c_uint);
        gpu_instance_get_compute_instance_by_id = "nvmlGpuInstanceGetComputeInstanceById"
            fn(nvmlGpuInstance_t, c_uint, *mut nvmlComputeInstance_t);

        compute_instance_destroy = "nvmlComputeInstanceDestroy" fn(nvmlComputeInstance_t);
        compute_instance_get_info_v1 =
            "nvmlComputeInstanceGetInfo" fn(nvmlComputeInstance_t, *mut nvmlComputeInstanceInfo_t);
        compute_instance_get_info_v2 = "nvmlComputeInstanceGetInfo_v2"
            fn(nvmlComputeInstance_t, *mut nvmlComputeInstanceInfo_t);
    }
    versioned {
        init = ["nvmlInit", "nvmlInit_v2"] fn();
        device_get_pci_info = [
            "nvmlDeviceGetPciInfo",
            "nvmlDeviceGetPciInfo_v2",
            "nvmlDeviceGetPciInfo_v3"
        ] fn(nvmlDevice_t, *mut nvmlPciInfo_t);
        device_get_count = ["nvmlDeviceGetCount", "nvmlDeviceGetCount_v2"] fn(*mut c_uint);
        device_get_handle_by_index = [
            "nvmlDeviceGetHandleByIndex",
            "nvmlDeviceGetHandleByIndex_v2"
        ] fn(c_uint, *mut nvmlDevice_t);
        device_get_handle_by_pci_bus_id = [
            "nvmlDeviceGetHandleByPciBusId",
            "nvmlDeviceGetHandleByPciBusId_v2"
        ] fn(*const c_char, *mut nvmlDevice_t);
        device_get_nv_link_remote_pci_info = [
            "nvmlDeviceGetNvLinkRemotePciInfo",
            "nvmlDeviceGetNvLinkRemotePciInfo_v2"
        ] fn(nvmlDevice_t, c_uint, *mut nvmlPciInfo_t);
        event_set_wait = ["nvmlEventSetWait", "nvmlEventSetWait_v2"]
            fn(nvmlEventSet_t, *mut nvmlEventData_t, c_uint);
        device_get_attributes = ["nvmlDeviceGetAttributes", "nvmlDeviceGetAttributes_v2"]
            fn(nvmlDevice_t, *mut nvmlDeviceAttributes_t);
        compute_instance_get_info = [
            "nvmlComputeInstanceGetInfo",
            "nvmlComputeInstanceGetInfo_v2"
        ] fn(nvmlComputeInstance_t, *mut nvmlComputeInstanceInfo_t);
        device_get_gpu_instance_possible_placements = [
            "nvmlDeviceGetGpuInstancePossiblePlacements",
            "nvmlDeviceGetGpuInstancePossiblePlacements_v2"
        ] fn(nvmlDevice_t, c_uint, *mut nvmlGpuInstancePlacement_t, *mut c_uint);
        vgpu_instance_get_license_info = [
            "nvmlVgpuInstanceGetLicenseInfo",
            "nvmlVgpuInstanceGetLicenseInfo_v2"
        ] fn(nvmlVgpuInstance_t, *mut nvmlVgpuLicenseInfo_t);
    }
    selectors {
        device_get_compute_running_processes = [
            "nvmlDeviceGetComputeRunningProcesses",
            "nvmlDeviceGetComputeRunningProcesses_v2",
            "nvmlDeviceGetComputeRunningProcesses_v3"
        ];
        device_get_graphics_running_processes = [
            "nvmlDeviceGetGraphicsRunningProcesses",
            "nvmlDeviceGetGraphicsRunningProcesses_v2",
            "nvmlDeviceGetGraphicsRunningProcesses_v3"
        ];
        device_get_mps_compute_running_processes = [
            "nvmlDeviceGetMPSComputeRunningProcesses",
            "nvmlDeviceGetMPSComputeRunningProcesses_v2",
            "nvmlDeviceGetMPSComputeRunningProcesses_v3"
        ];
    }
}

assert_impl_all!(NvmlLib: Send, Sync);

#[cfg(test)]
mod test {
    use super::*;
    use nvml_dl::DlError;
    use std::collections::HashSet;

    extern "C" fn succeed() -> nvmlReturn_t {
        nvmlReturn_enum_NVML_SUCCESS
    }

    struct Exports(HashSet<&'static str>);

    impl Exports {
        fn new(names: &[&'static str]) -> Self {
            Self(names.iter().copied().collect())
        }
    }

    impl Library for Exports {
        fn open(&mut self) -> Result<(), DlError> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), DlError> {
            Ok(())
        }

        fn symbol(&self, symbol: &str) -> Result<*mut c_void, DlError> {
            if self.0.contains(symbol) {
                Ok(succeed as *const () as *mut c_void)
            } else {
                Err(DlError::SymbolNotFound {
                    symbol: symbol.to_owned(),
                    source: nvml_dl::LoaderError::DlSymUnknown,
                })
            }
        }
    }

    #[test]
    fn nothing_exported() {
        let lib = NvmlLib::resolve(&Exports::new(&[]));

        assert!(lib.init.get().is_none());
        assert_eq!(lib.init.symbol(), "nvmlInit");
        assert!(lib.unresolved().contains(&"nvmlShutdown"));
        assert!(lib.unresolved().contains(&"nvmlInit_v2"));
    }

    #[test]
    fn newest_revision_is_bound() {
        let lib = NvmlLib::resolve(&Exports::new(&[
            "nvmlInit",
            "nvmlInit_v2",
            "nvmlDeviceGetPciInfo",
            "nvmlDeviceGetPciInfo_v2",
        ]));

        assert_eq!(lib.init.symbol(), "nvmlInit_v2");
        assert_eq!(lib.init.version(), 2);
        assert_eq!(lib.device_get_pci_info.symbol(), "nvmlDeviceGetPciInfo_v2");
        assert!(lib.device_get_pci_info.is_loaded());
        assert!(lib.init_v1.is_loaded());
        assert!(!lib.device_get_pci_info_v3.is_loaded());

        let init = lib.init.get().expect("bound");
        assert_eq!(unsafe { init() }, nvmlReturn_enum_NVML_SUCCESS);
    }

    #[test]
    fn selectors_follow_the_newest_revision() {
        let lib = NvmlLib::resolve(&Exports::new(&[
            "nvmlDeviceGetComputeRunningProcesses",
            "nvmlDeviceGetComputeRunningProcesses_v2",
            "nvmlDeviceGetGraphicsRunningProcesses_v3",
        ]));

        assert_eq!(lib.device_get_compute_running_processes.version(), 2);
        assert_eq!(lib.device_get_graphics_running_processes.version(), 3);
        assert_eq!(lib.device_get_mps_compute_running_processes.version(), 1);
    }

    #[test]
    fn remove_gpu_v2_is_separate() {
        assert!(NvmlLib::VERSIONED
            .iter()
            .all(|v| !v.candidates.contains(&"nvmlDeviceRemoveGpu_v2")));

        let lib = NvmlLib::resolve(&Exports::new(&["nvmlDeviceRemoveGpu_v2"]));
        assert!(lib.device_remove_gpu_v2.is_loaded());
        assert!(!lib.device_remove_gpu.is_loaded());
    }

    #[test]
    fn versioned_groups() {
        assert_eq!(NvmlLib::VERSIONED.len(), 14);
        assert!(NvmlLib::VERSIONED.iter().all(|v| v.is_versioned()));

        let lib = NvmlLib::resolve(&Exports::new(&["nvmlEventSetWait_v2"]));
        for versioned in NvmlLib::VERSIONED {
            assert!(lib.active_symbol(versioned.name).is_some());
        }
        assert_eq!(lib.active_symbol("nvmlEventSetWait"), Some("nvmlEventSetWait_v2"));
        assert_eq!(lib.active_symbol("nvmlShutdown"), None);
    }

    #[test]
    fn resolution_is_idempotent() {
        let exports = Exports::new(&["nvmlInit_v2", "nvmlDeviceGetCount_v2"]);
        let first = NvmlLib::resolve(&exports);
        let second = NvmlLib::resolve(&exports);

        for versioned in NvmlLib::VERSIONED {
            assert_eq!(
                first.active_symbol(versioned.name),
                second.active_symbol(versioned.name)
            );
        }
    }
}
