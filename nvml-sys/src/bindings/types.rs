use std::os::raw::{c_char, c_uint, c_ulonglong, c_ushort};

use static_assertions::const_assert_eq;

pub const NVML_DEVICE_PCI_BUS_ID_BUFFER_SIZE: u32 = 32;
pub const NVML_DEVICE_PCI_BUS_ID_BUFFER_V2_SIZE: u32 = 16;
pub const NVML_DEVICE_NAME_BUFFER_SIZE: u32 = 64;
pub const NVML_DEVICE_NAME_V2_BUFFER_SIZE: u32 = 96;
pub const NVML_DEVICE_UUID_BUFFER_SIZE: u32 = 80;
pub const NVML_DEVICE_UUID_V2_BUFFER_SIZE: u32 = 96;
pub const NVML_DEVICE_SERIAL_BUFFER_SIZE: u32 = 30;
pub const NVML_SYSTEM_DRIVER_VERSION_BUFFER_SIZE: u32 = 80;
pub const NVML_SYSTEM_NVML_VERSION_BUFFER_SIZE: u32 = 80;
pub const NVML_SYSTEM_PROCESS_NAME_BUFFER_SIZE: u32 = 256;
pub const NVML_VGPU_NAME_BUFFER_SIZE: u32 = 64;
pub const NVML_GRID_LICENSE_BUFFER_SIZE: u32 = 128;
pub const NVML_UNIT_INFO_BUFFER_SIZE: u32 = 96;
pub const NVML_LED_CAUSE_BUFFER_SIZE: u32 = 256;
pub const NVML_PSU_STATE_BUFFER_SIZE: u32 = 256;
pub const NVML_HWBC_FIRMWARE_BUFFER_SIZE: u32 = 32;
pub const NVML_MAX_FANS_PER_UNIT: u32 = 24;
pub const NVML_VGPU_METADATA_OPAQUE_DATA_SIZE: u32 = 4;
pub const NVML_VGPU_PGPU_METADATA_OPAQUE_DATA_SIZE: u32 = 4;
pub const NVML_GPM_METRIC_MAX: u32 = 98;
pub const NVML_GPM_METRICS_GET_VERSION: u32 = 1;
pub const NVML_GPM_SUPPORT_VERSION: u32 = 1;
pub const NVML_INIT_FLAG_NO_GPUS: u32 = 1;
pub const NVML_INIT_FLAG_NO_ATTACH: u32 = 2;
pub const NVML_DEVICE_MIG_DISABLE: u32 = 0;
pub const NVML_DEVICE_MIG_ENABLE: u32 = 1;
pub const NVML_VALUE_NOT_AVAILABLE: c_ulonglong = c_ulonglong::MAX;

pub const nvmlEventTypeNone: c_ulonglong = 0x0;
pub const nvmlEventTypeSingleBitEccError: c_ulonglong = 0x1;
pub const nvmlEventTypeDoubleBitEccError: c_ulonglong = 0x2;
pub const nvmlEventTypePState: c_ulonglong = 0x4;
pub const nvmlEventTypeXidCriticalError: c_ulonglong = 0x8;
pub const nvmlEventTypeClock: c_ulonglong = 0x10;
pub const nvmlEventTypePowerSourceChange: c_ulonglong = 0x80;
pub const nvmlEventMigConfigChange: c_ulonglong = 0x100;
pub const nvmlEventTypeAll: c_ulonglong = nvmlEventTypeSingleBitEccError
    | nvmlEventTypeDoubleBitEccError
    | nvmlEventTypePState
    | nvmlEventTypeXidCriticalError
    | nvmlEventTypeClock
    | nvmlEventTypePowerSourceChange
    | nvmlEventMigConfigChange;

pub const NVML_GPU_INSTANCE_PROFILE_1_SLICE: u32 = 0;
pub const NVML_GPU_INSTANCE_PROFILE_2_SLICE: u32 = 1;
pub const NVML_GPU_INSTANCE_PROFILE_3_SLICE: u32 = 2;
pub const NVML_GPU_INSTANCE_PROFILE_4_SLICE: u32 = 3;
pub const NVML_GPU_INSTANCE_PROFILE_7_SLICE: u32 = 4;
pub const NVML_GPU_INSTANCE_PROFILE_8_SLICE: u32 = 5;
pub const NVML_GPU_INSTANCE_PROFILE_6_SLICE: u32 = 6;
pub const NVML_GPU_INSTANCE_PROFILE_1_SLICE_REV1: u32 = 7;
pub const NVML_GPU_INSTANCE_PROFILE_2_SLICE_REV1: u32 = 8;
pub const NVML_GPU_INSTANCE_PROFILE_1_SLICE_REV2: u32 = 9;
pub const NVML_GPU_INSTANCE_PROFILE_COUNT: u32 = 10;

pub const NVML_COMPUTE_INSTANCE_PROFILE_1_SLICE: u32 = 0;
pub const NVML_COMPUTE_INSTANCE_PROFILE_2_SLICE: u32 = 1;
pub const NVML_COMPUTE_INSTANCE_PROFILE_3_SLICE: u32 = 2;
pub const NVML_COMPUTE_INSTANCE_PROFILE_4_SLICE: u32 = 3;
pub const NVML_COMPUTE_INSTANCE_PROFILE_7_SLICE: u32 = 4;
pub const NVML_COMPUTE_INSTANCE_PROFILE_8_SLICE: u32 = 5;
pub const NVML_COMPUTE_INSTANCE_PROFILE_6_SLICE: u32 = 6;
pub const NVML_COMPUTE_INSTANCE_PROFILE_1_SLICE_REV1: u32 = 7;
pub const NVML_COMPUTE_INSTANCE_PROFILE_COUNT: u32 = 8;

pub const NVML_COMPUTE_INSTANCE_ENGINE_PROFILE_SHARED: u32 = 0;
pub const NVML_COMPUTE_INSTANCE_ENGINE_PROFILE_COUNT: u32 = 1;

pub type nvmlReturn_enum = c_uint;
pub const nvmlReturn_enum_NVML_SUCCESS: nvmlReturn_enum = 0;
pub const nvmlReturn_enum_NVML_ERROR_UNINITIALIZED: nvmlReturn_enum = 1;
pub const nvmlReturn_enum_NVML_ERROR_INVALID_ARGUMENT: nvmlReturn_enum = 2;
pub const nvmlReturn_enum_NVML_ERROR_NOT_SUPPORTED: nvmlReturn_enum = 3;
pub const nvmlReturn_enum_NVML_ERROR_NO_PERMISSION: nvmlReturn_enum = 4;
pub const nvmlReturn_enum_NVML_ERROR_ALREADY_INITIALIZED: nvmlReturn_enum = 5;
pub const nvmlReturn_enum_NVML_ERROR_NOT_FOUND: nvmlReturn_enum = 6;
pub const nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE: nvmlReturn_enum = 7;
pub const nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_POWER: nvmlReturn_enum = 8;
pub const nvmlReturn_enum_NVML_ERROR_DRIVER_NOT_LOADED: nvmlReturn_enum = 9;
pub const nvmlReturn_enum_NVML_ERROR_TIMEOUT: nvmlReturn_enum = 10;
pub const nvmlReturn_enum_NVML_ERROR_IRQ_ISSUE: nvmlReturn_enum = 11;
pub const nvmlReturn_enum_NVML_ERROR_LIBRARY_NOT_FOUND: nvmlReturn_enum = 12;
pub const nvmlReturn_enum_NVML_ERROR_FUNCTION_NOT_FOUND: nvmlReturn_enum = 13;
pub const nvmlReturn_enum_NVML_ERROR_CORRUPTED_INFOROM: nvmlReturn_enum = 14;
pub const nvmlReturn_enum_NVML_ERROR_GPU_IS_LOST: nvmlReturn_enum = 15;
pub const nvmlReturn_enum_NVML_ERROR_RESET_REQUIRED: nvmlReturn_enum = 16;
pub const nvmlReturn_enum_NVML_ERROR_OPERATING_SYSTEM: nvmlReturn_enum = 17;
pub const nvmlReturn_enum_NVML_ERROR_LIB_RM_VERSION_MISMATCH: nvmlReturn_enum = 18;
pub const nvmlReturn_enum_NVML_ERROR_IN_USE: nvmlReturn_enum = 19;
pub const nvmlReturn_enum_NVML_ERROR_MEMORY: nvmlReturn_enum = 20;
pub const nvmlReturn_enum_NVML_ERROR_NO_DATA: nvmlReturn_enum = 21;
pub const nvmlReturn_enum_NVML_ERROR_VGPU_ECC_NOT_SUPPORTED: nvmlReturn_enum = 22;
pub const nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_RESOURCES: nvmlReturn_enum = 23;
pub const nvmlReturn_enum_NVML_ERROR_FREQ_NOT_SUPPORTED: nvmlReturn_enum = 24;
pub const nvmlReturn_enum_NVML_ERROR_ARGUMENT_VERSION_MISMATCH: nvmlReturn_enum = 25;
pub const nvmlReturn_enum_NVML_ERROR_DEPRECATED: nvmlReturn_enum = 26;
pub const nvmlReturn_enum_NVML_ERROR_NOT_READY: nvmlReturn_enum = 27;
pub const nvmlReturn_enum_NVML_ERROR_GPU_NOT_FOUND: nvmlReturn_enum = 28;
pub const nvmlReturn_enum_NVML_ERROR_INVALID_STATE: nvmlReturn_enum = 29;
pub const nvmlReturn_enum_NVML_ERROR_UNKNOWN: nvmlReturn_enum = 999;
pub use self::nvmlReturn_enum as nvmlReturn_t;

pub type nvmlTemperatureSensors_enum = c_uint;
pub const nvmlTemperatureSensors_enum_NVML_TEMPERATURE_GPU: nvmlTemperatureSensors_enum = 0;
pub const nvmlTemperatureSensors_enum_NVML_TEMPERATURE_COUNT: nvmlTemperatureSensors_enum = 1;
pub use self::nvmlTemperatureSensors_enum as nvmlTemperatureSensors_t;

pub type nvmlGpuTopologyLevel_enum = c_uint;
pub const nvmlGpuTopologyLevel_enum_NVML_TOPOLOGY_INTERNAL: nvmlGpuTopologyLevel_enum = 0;
pub const nvmlGpuTopologyLevel_enum_NVML_TOPOLOGY_SINGLE: nvmlGpuTopologyLevel_enum = 10;
pub const nvmlGpuTopologyLevel_enum_NVML_TOPOLOGY_MULTIPLE: nvmlGpuTopologyLevel_enum = 20;
pub const nvmlGpuTopologyLevel_enum_NVML_TOPOLOGY_HOSTBRIDGE: nvmlGpuTopologyLevel_enum = 30;
pub const nvmlGpuTopologyLevel_enum_NVML_TOPOLOGY_NODE: nvmlGpuTopologyLevel_enum = 40;
pub const nvmlGpuTopologyLevel_enum_NVML_TOPOLOGY_SYSTEM: nvmlGpuTopologyLevel_enum = 50;
pub use self::nvmlGpuTopologyLevel_enum as nvmlGpuTopologyLevel_t;

pub type nvmlLedColor_enum = c_uint;
pub const nvmlLedColor_enum_NVML_LED_COLOR_GREEN: nvmlLedColor_enum = 0;
pub const nvmlLedColor_enum_NVML_LED_COLOR_AMBER: nvmlLedColor_enum = 1;
pub use self::nvmlLedColor_enum as nvmlLedColor_t;

pub type nvmlFanState_enum = c_uint;
pub const nvmlFanState_enum_NVML_FAN_NORMAL: nvmlFanState_enum = 0;
pub const nvmlFanState_enum_NVML_FAN_FAILED: nvmlFanState_enum = 1;
pub use self::nvmlFanState_enum as nvmlFanState_t;

pub type nvmlDetachGpuState_enum = c_uint;
pub const nvmlDetachGpuState_enum_NVML_DETACH_GPU_KEEP: nvmlDetachGpuState_enum = 0;
pub const nvmlDetachGpuState_enum_NVML_DETACH_GPU_REMOVE: nvmlDetachGpuState_enum = 1;
pub use self::nvmlDetachGpuState_enum as nvmlDetachGpuState_t;

pub type nvmlPcieLinkState_enum = c_uint;
pub const nvmlPcieLinkState_enum_NVML_PCIE_LINK_KEEP: nvmlPcieLinkState_enum = 0;
pub const nvmlPcieLinkState_enum_NVML_PCIE_LINK_SHUT_DOWN: nvmlPcieLinkState_enum = 1;
pub use self::nvmlPcieLinkState_enum as nvmlPcieLinkState_t;

pub type nvmlEnableState_enum = c_uint;
pub const nvmlEnableState_enum_NVML_FEATURE_DISABLED: nvmlEnableState_enum = 0;
pub const nvmlEnableState_enum_NVML_FEATURE_ENABLED: nvmlEnableState_enum = 1;
pub use self::nvmlEnableState_enum as nvmlEnableState_t;

pub type nvmlVgpuGuestInfoState_enum = c_uint;
pub const nvmlVgpuGuestInfoState_enum_NVML_VGPU_INSTANCE_GUEST_INFO_STATE_UNINITIALIZED:
    nvmlVgpuGuestInfoState_enum = 0;
pub const nvmlVgpuGuestInfoState_enum_NVML_VGPU_INSTANCE_GUEST_INFO_STATE_INITIALIZED:
    nvmlVgpuGuestInfoState_enum = 1;
pub use self::nvmlVgpuGuestInfoState_enum as nvmlVgpuGuestInfoState_t;

pub type nvmlVgpuVmCompatibility_enum = c_uint;
pub const nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_NONE:
    nvmlVgpuVmCompatibility_enum = 0x0;
pub const nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_COLD:
    nvmlVgpuVmCompatibility_enum = 0x1;
pub const nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_HIBERNATE:
    nvmlVgpuVmCompatibility_enum = 0x2;
pub const nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_SLEEP:
    nvmlVgpuVmCompatibility_enum = 0x4;
pub const nvmlVgpuVmCompatibility_enum_NVML_VGPU_VM_COMPATIBILITY_LIVE:
    nvmlVgpuVmCompatibility_enum = 0x8;
pub use self::nvmlVgpuVmCompatibility_enum as nvmlVgpuVmCompatibility_t;

pub type nvmlVgpuPgpuCompatibilityLimitCode_enum = c_uint;
pub const nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_NONE:
    nvmlVgpuPgpuCompatibilityLimitCode_enum = 0x0;
pub const nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_HOST_DRIVER:
    nvmlVgpuPgpuCompatibilityLimitCode_enum = 0x1;
pub const nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_GUEST_DRIVER:
    nvmlVgpuPgpuCompatibilityLimitCode_enum = 0x2;
pub const nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_GPU:
    nvmlVgpuPgpuCompatibilityLimitCode_enum = 0x4;
pub const nvmlVgpuPgpuCompatibilityLimitCode_enum_NVML_VGPU_COMPATIBILITY_LIMIT_OTHER:
    nvmlVgpuPgpuCompatibilityLimitCode_enum = 0x80000000;
pub use self::nvmlVgpuPgpuCompatibilityLimitCode_enum as nvmlVgpuPgpuCompatibilityLimitCode_t;

pub type nvmlGpmMetricId_enum = c_uint;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_GRAPHICS_UTIL: nvmlGpmMetricId_enum = 1;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_SM_UTIL: nvmlGpmMetricId_enum = 2;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_SM_OCCUPANCY: nvmlGpmMetricId_enum = 3;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_INTEGER_UTIL: nvmlGpmMetricId_enum = 4;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_ANY_TENSOR_UTIL: nvmlGpmMetricId_enum = 5;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_DFMA_TENSOR_UTIL: nvmlGpmMetricId_enum = 6;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_HMMA_TENSOR_UTIL: nvmlGpmMetricId_enum = 7;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_IMMA_TENSOR_UTIL: nvmlGpmMetricId_enum = 9;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_DRAM_BW_UTIL: nvmlGpmMetricId_enum = 10;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_FP64_UTIL: nvmlGpmMetricId_enum = 11;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_FP32_UTIL: nvmlGpmMetricId_enum = 12;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_FP16_UTIL: nvmlGpmMetricId_enum = 13;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_PCIE_TX_PER_SEC: nvmlGpmMetricId_enum = 20;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_PCIE_RX_PER_SEC: nvmlGpmMetricId_enum = 21;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_NVDEC_0_UTIL: nvmlGpmMetricId_enum = 30;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_NVJPG_0_UTIL: nvmlGpmMetricId_enum = 40;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_NVOFA_0_UTIL: nvmlGpmMetricId_enum = 50;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_NVLINK_TOTAL_RX_PER_SEC: nvmlGpmMetricId_enum = 60;
pub const nvmlGpmMetricId_enum_NVML_GPM_METRIC_NVLINK_TOTAL_TX_PER_SEC: nvmlGpmMetricId_enum = 61;
pub use self::nvmlGpmMetricId_enum as nvmlGpmMetricId_t;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlDevice_st {
    _unused: [u8; 0],
}
pub type nvmlDevice_t = *mut nvmlDevice_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlUnit_st {
    _unused: [u8; 0],
}
pub type nvmlUnit_t = *mut nvmlUnit_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlEventSet_st {
    _unused: [u8; 0],
}
pub type nvmlEventSet_t = *mut nvmlEventSet_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlGpuInstance_st {
    _unused: [u8; 0],
}
pub type nvmlGpuInstance_t = *mut nvmlGpuInstance_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlComputeInstance_st {
    _unused: [u8; 0],
}
pub type nvmlComputeInstance_t = *mut nvmlComputeInstance_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlGpmSample_st {
    _unused: [u8; 0],
}
pub type nvmlGpmSample_t = *mut nvmlGpmSample_st;

pub type nvmlVgpuInstance_t = c_uint;
pub type nvmlVgpuTypeId_t = c_uint;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlPciInfo_st {
    pub busIdLegacy: [c_char; 16usize],
    pub domain: c_uint,
    pub bus: c_uint,
    pub device: c_uint,
    pub pciDeviceId: c_uint,
    pub pciSubSystemId: c_uint,
    pub busId: [c_char; 32usize],
}
pub type nvmlPciInfo_t = nvmlPciInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlMemory_st {
    pub total: c_ulonglong,
    pub free: c_ulonglong,
    pub used: c_ulonglong,
}
pub type nvmlMemory_t = nvmlMemory_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlUtilization_st {
    pub gpu: c_uint,
    pub memory: c_uint,
}
pub type nvmlUtilization_t = nvmlUtilization_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlProcessInfo_v1_st {
    pub pid: c_uint,
    pub usedGpuMemory: c_ulonglong,
}
pub type nvmlProcessInfo_v1_t = nvmlProcessInfo_v1_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlProcessInfo_v2_st {
    pub pid: c_uint,
    pub usedGpuMemory: c_ulonglong,
    pub gpuInstanceId: c_uint,
    pub computeInstanceId: c_uint,
}
pub type nvmlProcessInfo_v2_t = nvmlProcessInfo_v2_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlProcessInfo_st {
    pub pid: c_uint,
    pub usedGpuMemory: c_ulonglong,
    pub gpuInstanceId: c_uint,
    pub computeInstanceId: c_uint,
}
pub type nvmlProcessInfo_t = nvmlProcessInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlEventData_st {
    pub device: nvmlDevice_t,
    pub eventType: c_ulonglong,
    pub eventData: c_ulonglong,
    pub gpuInstanceId: c_uint,
    pub computeInstanceId: c_uint,
}
pub type nvmlEventData_t = nvmlEventData_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlExcludedDeviceInfo_st {
    pub pciInfo: nvmlPciInfo_t,
    pub uuid: [c_char; 80usize],
}
pub type nvmlExcludedDeviceInfo_t = nvmlExcludedDeviceInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlUnitInfo_st {
    pub name: [c_char; 96usize],
    pub id: [c_char; 96usize],
    pub serial: [c_char; 96usize],
    pub firmwareVersion: [c_char; 96usize],
}
pub type nvmlUnitInfo_t = nvmlUnitInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlLedState_st {
    pub cause: [c_char; 256usize],
    pub color: nvmlLedColor_t,
}
pub type nvmlLedState_t = nvmlLedState_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlPSUInfo_st {
    pub state: [c_char; 256usize],
    pub current: c_uint,
    pub voltage: c_uint,
    pub power: c_uint,
}
pub type nvmlPSUInfo_t = nvmlPSUInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlUnitFanInfo_st {
    pub speed: c_uint,
    pub state: nvmlFanState_t,
}
pub type nvmlUnitFanInfo_t = nvmlUnitFanInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlUnitFanSpeeds_st {
    pub fans: [nvmlUnitFanInfo_t; 24usize],
    pub count: c_uint,
}
pub type nvmlUnitFanSpeeds_t = nvmlUnitFanSpeeds_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlHwbcEntry_st {
    pub hwbcId: c_uint,
    pub firmwareVersion: [c_char; 32usize],
}
pub type nvmlHwbcEntry_t = nvmlHwbcEntry_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlGpuInstancePlacement_st {
    pub start: c_uint,
    pub size: c_uint,
}
pub type nvmlGpuInstancePlacement_t = nvmlGpuInstancePlacement_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlGpuInstanceInfo_st {
    pub device: nvmlDevice_t,
    pub id: c_uint,
    pub profileId: c_uint,
    pub placement: nvmlGpuInstancePlacement_t,
}
pub type nvmlGpuInstanceInfo_t = nvmlGpuInstanceInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlComputeInstancePlacement_st {
    pub start: c_uint,
    pub size: c_uint,
}
pub type nvmlComputeInstancePlacement_t = nvmlComputeInstancePlacement_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlComputeInstanceInfo_st {
    pub device: nvmlDevice_t,
    pub gpuInstance: nvmlGpuInstance_t,
    pub id: c_uint,
    pub profileId: c_uint,
    pub placement: nvmlComputeInstancePlacement_t,
}
pub type nvmlComputeInstanceInfo_t = nvmlComputeInstanceInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlGpuInstanceProfileInfo_st {
    pub id: c_uint,
    pub isP2pSupported: c_uint,
    pub sliceCount: c_uint,
    pub instanceCount: c_uint,
    pub multiprocessorCount: c_uint,
    pub copyEngineCount: c_uint,
    pub decoderCount: c_uint,
    pub encoderCount: c_uint,
    pub jpegCount: c_uint,
    pub ofaCount: c_uint,
    pub memorySizeMB: c_ulonglong,
}
pub type nvmlGpuInstanceProfileInfo_t = nvmlGpuInstanceProfileInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlComputeInstanceProfileInfo_st {
    pub id: c_uint,
    pub sliceCount: c_uint,
    pub instanceCount: c_uint,
    pub multiprocessorCount: c_uint,
    pub sharedCopyEngineCount: c_uint,
    pub sharedDecoderCount: c_uint,
    pub sharedEncoderCount: c_uint,
    pub sharedJpegCount: c_uint,
    pub sharedOfaCount: c_uint,
}
pub type nvmlComputeInstanceProfileInfo_t = nvmlComputeInstanceProfileInfo_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlDeviceAttributes_st {
    pub multiprocessorCount: c_uint,
    pub sharedCopyEngineCount: c_uint,
    pub sharedDecoderCount: c_uint,
    pub sharedEncoderCount: c_uint,
    pub sharedJpegCount: c_uint,
    pub sharedOfaCount: c_uint,
    pub gpuInstanceSliceCount: c_uint,
    pub computeInstanceSliceCount: c_uint,
    pub memorySizeMB: c_ulonglong,
}
pub type nvmlDeviceAttributes_t = nvmlDeviceAttributes_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlGpmSupport_t {
    pub version: c_uint,
    pub isSupportedDevice: c_uint,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlGpmMetricInfo_t {
    pub shortName: *mut c_char,
    pub longName: *mut c_char,
    pub unit: *mut c_char,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlGpmMetric_t {
    pub metricId: c_uint,
    pub nvmlReturn: nvmlReturn_t,
    pub value: f64,
    pub metricInfo: nvmlGpmMetricInfo_t,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlGpmMetricsGet_t {
    pub version: c_uint,
    pub numMetrics: c_uint,
    pub sample1: nvmlGpmSample_t,
    pub sample2: nvmlGpmSample_t,
    pub metrics: [nvmlGpmMetric_t; 98usize],
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlVgpuVersion_st {
    pub minVersion: c_uint,
    pub maxVersion: c_uint,
}
pub type nvmlVgpuVersion_t = nvmlVgpuVersion_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlVgpuMetadata_st {
    pub version: c_uint,
    pub revision: c_uint,
    pub guestInfoState: nvmlVgpuGuestInfoState_t,
    pub guestDriverVersion: [c_char; 80usize],
    pub hostDriverVersion: [c_char; 80usize],
    pub reserved: [c_uint; 6usize],
    pub vgpuVirtualizationCaps: c_uint,
    pub guestVgpuVersion: c_uint,
    pub opaqueDataSize: c_uint,
    pub opaqueData: [c_char; 4usize],
}
pub type nvmlVgpuMetadata_t = nvmlVgpuMetadata_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlVgpuPgpuMetadata_st {
    pub version: c_uint,
    pub revision: c_uint,
    pub hostDriverVersion: [c_char; 80usize],
    pub pgpuVirtualizationCaps: c_uint,
    pub reserved: [c_uint; 5usize],
    pub hostSupportedVgpuRange: nvmlVgpuVersion_t,
    pub opaqueDataSize: c_uint,
    pub opaqueData: [c_char; 4usize],
}
pub type nvmlVgpuPgpuMetadata_t = nvmlVgpuPgpuMetadata_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlVgpuPgpuCompatibility_st {
    pub vgpuVmCompatibility: nvmlVgpuVmCompatibility_t,
    pub compatibilityLimitCode: nvmlVgpuPgpuCompatibilityLimitCode_t,
}
pub type nvmlVgpuPgpuCompatibility_t = nvmlVgpuPgpuCompatibility_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlVgpuLicenseExpiry_st {
    pub year: c_uint,
    pub month: c_ushort,
    pub day: c_ushort,
    pub hour: c_ushort,
    pub min: c_ushort,
    pub sec: c_ushort,
    pub status: u8,
}
pub type nvmlVgpuLicenseExpiry_t = nvmlVgpuLicenseExpiry_st;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct nvmlVgpuLicenseInfo_st {
    pub isLicensed: u8,
    pub licenseExpiry: nvmlVgpuLicenseExpiry_t,
    pub currentState: c_uint,
}
pub type nvmlVgpuLicenseInfo_t = nvmlVgpuLicenseInfo_st;

#[cfg(target_pointer_width = "64")]
mod layout {
    use super::*;
    use std::mem::size_of;

    const_assert_eq!(size_of::<nvmlPciInfo_t>(), 68);
    const_assert_eq!(size_of::<nvmlMemory_t>(), 24);
    const_assert_eq!(size_of::<nvmlUtilization_t>(), 8);
    const_assert_eq!(size_of::<nvmlProcessInfo_v1_t>(), 16);
    const_assert_eq!(size_of::<nvmlProcessInfo_v2_t>(), 24);
    const_assert_eq!(size_of::<nvmlProcessInfo_t>(), 24);
    const_assert_eq!(size_of::<nvmlEventData_t>(), 32);
    const_assert_eq!(size_of::<nvmlExcludedDeviceInfo_t>(), 148);
    const_assert_eq!(size_of::<nvmlUnitInfo_t>(), 384);
    const_assert_eq!(size_of::<nvmlLedState_t>(), 260);
    const_assert_eq!(size_of::<nvmlPSUInfo_t>(), 268);
    const_assert_eq!(size_of::<nvmlUnitFanSpeeds_t>(), 196);
    const_assert_eq!(size_of::<nvmlHwbcEntry_t>(), 36);
    const_assert_eq!(size_of::<nvmlGpuInstanceInfo_t>(), 24);
    const_assert_eq!(size_of::<nvmlComputeInstanceInfo_t>(), 32);
    const_assert_eq!(size_of::<nvmlGpuInstanceProfileInfo_t>(), 48);
    const_assert_eq!(size_of::<nvmlComputeInstanceProfileInfo_t>(), 36);
    const_assert_eq!(size_of::<nvmlDeviceAttributes_t>(), 40);
    const_assert_eq!(size_of::<nvmlGpmMetric_t>(), 40);
    const_assert_eq!(size_of::<nvmlGpmMetricsGet_t>(), 24 + 98 * 40);
    const_assert_eq!(size_of::<nvmlVgpuMetadata_t>(), 212);
    const_assert_eq!(size_of::<nvmlVgpuPgpuMetadata_t>(), 128);
    const_assert_eq!(size_of::<nvmlVgpuLicenseExpiry_t>(), 16);
    const_assert_eq!(size_of::<nvmlVgpuLicenseInfo_t>(), 24);
}
