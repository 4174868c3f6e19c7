// Generated by nvml-gen from nvml/idl. Do not edit.

/*!
Thin `unsafe` wrappers over the NVML entry points declared in `nvml/idl`.

Every method maps the call's status to a `Result`, takes handles through their
capability traits and hands back handle structs. Output values are written
only when the call succeeds. Nothing else is checked: each entry point's
contract in `nvml.h` is the caller's to uphold.
*/

use std::ffi::CStr;
use std::mem;
use std::os::raw::{c_char, c_int, c_uint, c_ulonglong};

use crate::error::{nvml_sym, nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::struct_wrappers::{
    ComputeInstanceInfo,
    EventData,
    GpmMetricsGet,
    GpuInstanceInfo,
    VgpuMetadata,
    VgpuPgpuMetadata,
};
use crate::{
    ComputeInstance,
    ComputeInstanceApi,
    Device,
    DeviceApi,
    EventSet,
    EventSetApi,
    GpmSample,
    GpmSampleApi,
    GpuInstance,
    GpuInstanceApi,
    Nvml,
    Unit,
    UnitApi,
    VgpuInstance,
    VgpuInstanceApi,
    VgpuTypeId,
    VgpuTypeIdApi,
};

/// The raw NVML API, obtained with `Nvml::raw_api()`.
#[derive(Debug, Clone, Copy)]
pub struct RawApi<'nvml> {
    nvml: &'nvml Nvml,
}

impl<'nvml> RawApi<'nvml> {
    pub(crate) fn new(nvml: &'nvml Nvml) -> Self {
        Self { nvml }
    }

    /// Calls `nvmlComputeInstanceDestroy`.
    #[doc(alias = "nvmlComputeInstanceDestroy")]
    pub unsafe fn compute_instance_destroy(
        &self,
        compute_instance: &impl ComputeInstanceApi<'nvml>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().compute_instance_destroy)?;
        nvml_try(sym(compute_instance.handle()))?;
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlComputeInstanceGetInfo`, declared as `nvmlComputeInstanceGetInfo_v2`.
    #[doc(alias = "nvmlComputeInstanceGetInfo")]
    pub unsafe fn compute_instance_get_info(
        &self,
        compute_instance: &impl ComputeInstanceApi<'nvml>,
        info: &mut Option<ComputeInstanceInfo<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().compute_instance_get_info)?;
        let mut info_raw: nvmlComputeInstanceInfo_t = mem::zeroed();
        nvml_try(sym(compute_instance.handle(), &mut info_raw))?;
        *info = Some(ComputeInstanceInfo::convert(info_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlComputeInstanceGetInfo_v2`.
    #[doc(alias = "nvmlComputeInstanceGetInfo_v2")]
    pub unsafe fn compute_instance_get_info_v2(
        &self,
        compute_instance: &impl ComputeInstanceApi<'nvml>,
        info: &mut Option<ComputeInstanceInfo<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().compute_instance_get_info_v2)?;
        let mut info_raw: nvmlComputeInstanceInfo_t = mem::zeroed();
        nvml_try(sym(compute_instance.handle(), &mut info_raw))?;
        *info = Some(ComputeInstanceInfo::convert(info_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlDeviceCreateGpuInstance`.
    #[doc(alias = "nvmlDeviceCreateGpuInstance")]
    pub unsafe fn device_create_gpu_instance(
        &self,
        device: &impl DeviceApi<'nvml>,
        profile_id: c_uint,
        gpu_instance: &mut Option<GpuInstance<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_create_gpu_instance)?;
        let mut gpu_instance_raw: nvmlGpuInstance_t = mem::zeroed();
        nvml_try(sym(device.handle(), profile_id, &mut gpu_instance_raw))?;
        *gpu_instance = Some(GpuInstance::new(gpu_instance_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlDeviceDiscoverGpus`.
    #[doc(alias = "nvmlDeviceDiscoverGpus")]
    pub unsafe fn device_discover_gpus(
        &self,
        pci_info: *mut nvmlPciInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_discover_gpus)?;
        nvml_try(sym(pci_info))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetActiveVgpus`.
    #[doc(alias = "nvmlDeviceGetActiveVgpus")]
    pub unsafe fn device_get_active_vgpus(
        &self,
        device: &impl DeviceApi<'nvml>,
        vgpu_count: *mut c_uint,
        vgpu_instances: &mut Vec<VgpuInstance<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_active_vgpus)?;
        let mut vgpu_instances_raw: Vec<nvmlVgpuInstance_t> = vec![mem::zeroed(); *vgpu_count as usize];
        nvml_try(sym(device.handle(), vgpu_count, buffer_ptr(&mut vgpu_instances_raw)))?;
        vgpu_instances_raw.truncate(*vgpu_count as usize);
        *vgpu_instances = vgpu_instances_raw.into_iter().map(|raw| VgpuInstance::new(raw, self.nvml)).collect();
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlDeviceGetAttributes`, declared as `nvmlDeviceGetAttributes_v2`.
    #[doc(alias = "nvmlDeviceGetAttributes")]
    pub unsafe fn device_get_attributes(
        &self,
        device: &impl DeviceApi<'nvml>,
        attributes: *mut nvmlDeviceAttributes_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_attributes)?;
        nvml_try(sym(device.handle(), attributes))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetAttributes_v2`.
    #[doc(alias = "nvmlDeviceGetAttributes_v2")]
    pub unsafe fn device_get_attributes_v2(
        &self,
        device: &impl DeviceApi<'nvml>,
        attributes: *mut nvmlDeviceAttributes_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_attributes_v2)?;
        nvml_try(sym(device.handle(), attributes))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetComputeRunningProcesses_v2`.
    #[doc(alias = "nvmlDeviceGetComputeRunningProcesses_v2")]
    pub unsafe fn device_get_compute_running_processes_v2(
        &self,
        device: &impl DeviceApi<'nvml>,
        info_count: *mut c_uint,
        infos: *mut nvmlProcessInfo_v2_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_compute_running_processes_v2)?;
        nvml_try(sym(device.handle(), info_count, infos))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetComputeRunningProcesses_v3`.
    #[doc(alias = "nvmlDeviceGetComputeRunningProcesses_v3")]
    pub unsafe fn device_get_compute_running_processes_v3(
        &self,
        device: &impl DeviceApi<'nvml>,
        info_count: *mut c_uint,
        infos: *mut nvmlProcessInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_compute_running_processes_v3)?;
        nvml_try(sym(device.handle(), info_count, infos))?;
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlDeviceGetCount`, declared as `nvmlDeviceGetCount_v2`.
    #[doc(alias = "nvmlDeviceGetCount")]
    pub unsafe fn device_get_count(
        &self,
        device_count: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_count)?;
        nvml_try(sym(device_count))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetCount_v2`.
    #[doc(alias = "nvmlDeviceGetCount_v2")]
    pub unsafe fn device_get_count_v2(
        &self,
        device_count: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_count_v2)?;
        nvml_try(sym(device_count))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetCudaComputeCapability`.
    #[doc(alias = "nvmlDeviceGetCudaComputeCapability")]
    pub unsafe fn device_get_cuda_compute_capability(
        &self,
        device: &impl DeviceApi<'nvml>,
        major: *mut c_int,
        minor: *mut c_int,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_cuda_compute_capability)?;
        nvml_try(sym(device.handle(), major, minor))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetGpuInstanceById`.
    #[doc(alias = "nvmlDeviceGetGpuInstanceById")]
    pub unsafe fn device_get_gpu_instance_by_id(
        &self,
        device: &impl DeviceApi<'nvml>,
        id: c_uint,
        gpu_instance: &mut Option<GpuInstance<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_gpu_instance_by_id)?;
        let mut gpu_instance_raw: nvmlGpuInstance_t = mem::zeroed();
        nvml_try(sym(device.handle(), id, &mut gpu_instance_raw))?;
        *gpu_instance = Some(GpuInstance::new(gpu_instance_raw, self.nvml));
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlDeviceGetGpuInstancePossiblePlacements`, declared as `nvmlDeviceGetGpuInstancePossiblePlacements_v2`.
    #[doc(alias = "nvmlDeviceGetGpuInstancePossiblePlacements")]
    pub unsafe fn device_get_gpu_instance_possible_placements(
        &self,
        device: &impl DeviceApi<'nvml>,
        profile_id: c_uint,
        placements: *mut nvmlGpuInstancePlacement_t,
        count: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_gpu_instance_possible_placements)?;
        nvml_try(sym(device.handle(), profile_id, placements, count))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetGpuInstancePossiblePlacements_v2`.
    #[doc(alias = "nvmlDeviceGetGpuInstancePossiblePlacements_v2")]
    pub unsafe fn device_get_gpu_instance_possible_placements_v2(
        &self,
        device: &impl DeviceApi<'nvml>,
        profile_id: c_uint,
        placements: *mut nvmlGpuInstancePlacement_t,
        count: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_gpu_instance_possible_placements_v2)?;
        nvml_try(sym(device.handle(), profile_id, placements, count))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetGpuInstanceProfileInfo`.
    #[doc(alias = "nvmlDeviceGetGpuInstanceProfileInfo")]
    pub unsafe fn device_get_gpu_instance_profile_info(
        &self,
        device: &impl DeviceApi<'nvml>,
        profile: c_uint,
        info: *mut nvmlGpuInstanceProfileInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_gpu_instance_profile_info)?;
        nvml_try(sym(device.handle(), profile, info))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetGpuInstances`.
    #[doc(alias = "nvmlDeviceGetGpuInstances")]
    pub unsafe fn device_get_gpu_instances(
        &self,
        device: &impl DeviceApi<'nvml>,
        profile_id: c_uint,
        gpu_instances: &mut Vec<GpuInstance<'nvml>>,
        count: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_gpu_instances)?;
        let mut gpu_instances_raw: Vec<nvmlGpuInstance_t> = vec![mem::zeroed(); *count as usize];
        nvml_try(sym(device.handle(), profile_id, buffer_ptr(&mut gpu_instances_raw), count))?;
        gpu_instances_raw.truncate(*count as usize);
        *gpu_instances = gpu_instances_raw.into_iter().map(|raw| GpuInstance::new(raw, self.nvml)).collect();
        Ok(())
    }

    /// Calls `nvmlDeviceGetGraphicsRunningProcesses_v2`.
    #[doc(alias = "nvmlDeviceGetGraphicsRunningProcesses_v2")]
    pub unsafe fn device_get_graphics_running_processes_v2(
        &self,
        device: &impl DeviceApi<'nvml>,
        info_count: *mut c_uint,
        infos: *mut nvmlProcessInfo_v2_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_graphics_running_processes_v2)?;
        nvml_try(sym(device.handle(), info_count, infos))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetGraphicsRunningProcesses_v3`.
    #[doc(alias = "nvmlDeviceGetGraphicsRunningProcesses_v3")]
    pub unsafe fn device_get_graphics_running_processes_v3(
        &self,
        device: &impl DeviceApi<'nvml>,
        info_count: *mut c_uint,
        infos: *mut nvmlProcessInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_graphics_running_processes_v3)?;
        nvml_try(sym(device.handle(), info_count, infos))?;
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlDeviceGetHandleByIndex`, declared as `nvmlDeviceGetHandleByIndex_v2`.
    #[doc(alias = "nvmlDeviceGetHandleByIndex")]
    pub unsafe fn device_get_handle_by_index(
        &self,
        index: c_uint,
        device: &mut Option<Device<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_handle_by_index)?;
        let mut device_raw: nvmlDevice_t = mem::zeroed();
        nvml_try(sym(index, &mut device_raw))?;
        *device = Some(Device::new(device_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlDeviceGetHandleByIndex_v2`.
    #[doc(alias = "nvmlDeviceGetHandleByIndex_v2")]
    pub unsafe fn device_get_handle_by_index_v2(
        &self,
        index: c_uint,
        device: &mut Option<Device<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_handle_by_index_v2)?;
        let mut device_raw: nvmlDevice_t = mem::zeroed();
        nvml_try(sym(index, &mut device_raw))?;
        *device = Some(Device::new(device_raw, self.nvml));
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlDeviceGetHandleByPciBusId`, declared as `nvmlDeviceGetHandleByPciBusId_v2`.
    #[doc(alias = "nvmlDeviceGetHandleByPciBusId")]
    pub unsafe fn device_get_handle_by_pci_bus_id(
        &self,
        pci_bus_id: &CStr,
        device: &mut Option<Device<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_handle_by_pci_bus_id)?;
        let mut device_raw: nvmlDevice_t = mem::zeroed();
        nvml_try(sym(pci_bus_id.as_ptr(), &mut device_raw))?;
        *device = Some(Device::new(device_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlDeviceGetHandleByPciBusId_v2`.
    #[doc(alias = "nvmlDeviceGetHandleByPciBusId_v2")]
    pub unsafe fn device_get_handle_by_pci_bus_id_v2(
        &self,
        pci_bus_id: &CStr,
        device: &mut Option<Device<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_handle_by_pci_bus_id_v2)?;
        let mut device_raw: nvmlDevice_t = mem::zeroed();
        nvml_try(sym(pci_bus_id.as_ptr(), &mut device_raw))?;
        *device = Some(Device::new(device_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlDeviceGetHandleBySerial`.
    #[doc(alias = "nvmlDeviceGetHandleBySerial")]
    pub unsafe fn device_get_handle_by_serial(
        &self,
        serial: &CStr,
        device: &mut Option<Device<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_handle_by_serial)?;
        let mut device_raw: nvmlDevice_t = mem::zeroed();
        nvml_try(sym(serial.as_ptr(), &mut device_raw))?;
        *device = Some(Device::new(device_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlDeviceGetHandleByUUID`.
    #[doc(alias = "nvmlDeviceGetHandleByUUID")]
    pub unsafe fn device_get_handle_by_uuid(
        &self,
        uuid: &CStr,
        device: &mut Option<Device<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_handle_by_uuid)?;
        let mut device_raw: nvmlDevice_t = mem::zeroed();
        nvml_try(sym(uuid.as_ptr(), &mut device_raw))?;
        *device = Some(Device::new(device_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlDeviceGetIndex`.
    #[doc(alias = "nvmlDeviceGetIndex")]
    pub unsafe fn device_get_index(
        &self,
        device: &impl DeviceApi<'nvml>,
        index: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_index)?;
        nvml_try(sym(device.handle(), index))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetMPSComputeRunningProcesses_v2`.
    #[doc(alias = "nvmlDeviceGetMPSComputeRunningProcesses_v2")]
    pub unsafe fn device_get_mps_compute_running_processes_v2(
        &self,
        device: &impl DeviceApi<'nvml>,
        info_count: *mut c_uint,
        infos: *mut nvmlProcessInfo_v2_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_mps_compute_running_processes_v2)?;
        nvml_try(sym(device.handle(), info_count, infos))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetMPSComputeRunningProcesses_v3`.
    #[doc(alias = "nvmlDeviceGetMPSComputeRunningProcesses_v3")]
    pub unsafe fn device_get_mps_compute_running_processes_v3(
        &self,
        device: &impl DeviceApi<'nvml>,
        info_count: *mut c_uint,
        infos: *mut nvmlProcessInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_mps_compute_running_processes_v3)?;
        nvml_try(sym(device.handle(), info_count, infos))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetMemoryInfo`.
    #[doc(alias = "nvmlDeviceGetMemoryInfo")]
    pub unsafe fn device_get_memory_info(
        &self,
        device: &impl DeviceApi<'nvml>,
        memory: *mut nvmlMemory_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_memory_info)?;
        nvml_try(sym(device.handle(), memory))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetMigMode`.
    #[doc(alias = "nvmlDeviceGetMigMode")]
    pub unsafe fn device_get_mig_mode(
        &self,
        device: &impl DeviceApi<'nvml>,
        current_mode: *mut c_uint,
        pending_mode: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_mig_mode)?;
        nvml_try(sym(device.handle(), current_mode, pending_mode))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetName`.
    #[doc(alias = "nvmlDeviceGetName")]
    pub unsafe fn device_get_name(
        &self,
        device: &impl DeviceApi<'nvml>,
        name: &mut Option<String>,
        length: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_name)?;
        let mut name_buf: Vec<c_char> = vec![0; length as usize];
        nvml_try(sym(device.handle(), name_buf.as_mut_ptr(), length))?;
        *name = Some(decode_string(&name_buf)?);
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlDeviceGetNvLinkRemotePciInfo`, declared as `nvmlDeviceGetNvLinkRemotePciInfo_v2`.
    #[doc(alias = "nvmlDeviceGetNvLinkRemotePciInfo")]
    pub unsafe fn device_get_nv_link_remote_pci_info(
        &self,
        device: &impl DeviceApi<'nvml>,
        link: c_uint,
        pci: *mut nvmlPciInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_nv_link_remote_pci_info)?;
        nvml_try(sym(device.handle(), link, pci))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetNvLinkRemotePciInfo_v2`.
    #[doc(alias = "nvmlDeviceGetNvLinkRemotePciInfo_v2")]
    pub unsafe fn device_get_nv_link_remote_pci_info_v2(
        &self,
        device: &impl DeviceApi<'nvml>,
        link: c_uint,
        pci: *mut nvmlPciInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_nv_link_remote_pci_info_v2)?;
        nvml_try(sym(device.handle(), link, pci))?;
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlDeviceGetPciInfo`, declared as `nvmlDeviceGetPciInfo_v3`.
    #[doc(alias = "nvmlDeviceGetPciInfo")]
    pub unsafe fn device_get_pci_info(
        &self,
        device: &impl DeviceApi<'nvml>,
        pci: *mut nvmlPciInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_pci_info)?;
        nvml_try(sym(device.handle(), pci))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetPciInfo_v2`.
    #[doc(alias = "nvmlDeviceGetPciInfo_v2")]
    pub unsafe fn device_get_pci_info_v2(
        &self,
        device: &impl DeviceApi<'nvml>,
        pci: *mut nvmlPciInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_pci_info_v2)?;
        nvml_try(sym(device.handle(), pci))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetPciInfo_v3`.
    #[doc(alias = "nvmlDeviceGetPciInfo_v3")]
    pub unsafe fn device_get_pci_info_v3(
        &self,
        device: &impl DeviceApi<'nvml>,
        pci: *mut nvmlPciInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_pci_info_v3)?;
        nvml_try(sym(device.handle(), pci))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetPowerUsage`.
    #[doc(alias = "nvmlDeviceGetPowerUsage")]
    pub unsafe fn device_get_power_usage(
        &self,
        device: &impl DeviceApi<'nvml>,
        power: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_power_usage)?;
        nvml_try(sym(device.handle(), power))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetSerial`.
    #[doc(alias = "nvmlDeviceGetSerial")]
    pub unsafe fn device_get_serial(
        &self,
        device: &impl DeviceApi<'nvml>,
        serial: &mut Option<String>,
        length: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_serial)?;
        let mut serial_buf: Vec<c_char> = vec![0; length as usize];
        nvml_try(sym(device.handle(), serial_buf.as_mut_ptr(), length))?;
        *serial = Some(decode_string(&serial_buf)?);
        Ok(())
    }

    /// Calls `nvmlDeviceGetSupportedEventTypes`.
    #[doc(alias = "nvmlDeviceGetSupportedEventTypes")]
    pub unsafe fn device_get_supported_event_types(
        &self,
        device: &impl DeviceApi<'nvml>,
        event_types: *mut c_ulonglong,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_supported_event_types)?;
        nvml_try(sym(device.handle(), event_types))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetSupportedVgpus`.
    #[doc(alias = "nvmlDeviceGetSupportedVgpus")]
    pub unsafe fn device_get_supported_vgpus(
        &self,
        device: &impl DeviceApi<'nvml>,
        vgpu_count: *mut c_uint,
        vgpu_type_ids: &mut Vec<VgpuTypeId<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_supported_vgpus)?;
        let mut vgpu_type_ids_raw: Vec<nvmlVgpuTypeId_t> = vec![mem::zeroed(); *vgpu_count as usize];
        nvml_try(sym(device.handle(), vgpu_count, buffer_ptr(&mut vgpu_type_ids_raw)))?;
        vgpu_type_ids_raw.truncate(*vgpu_count as usize);
        *vgpu_type_ids = vgpu_type_ids_raw.into_iter().map(|raw| VgpuTypeId::new(raw, self.nvml)).collect();
        Ok(())
    }

    /// Calls `nvmlDeviceGetTemperature`.
    #[doc(alias = "nvmlDeviceGetTemperature")]
    pub unsafe fn device_get_temperature(
        &self,
        device: &impl DeviceApi<'nvml>,
        sensor_type: nvmlTemperatureSensors_t,
        temp: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_temperature)?;
        nvml_try(sym(device.handle(), sensor_type, temp))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetTopologyCommonAncestor`.
    #[doc(alias = "nvmlDeviceGetTopologyCommonAncestor")]
    pub unsafe fn device_get_topology_common_ancestor(
        &self,
        device1: &impl DeviceApi<'nvml>,
        device2: &impl DeviceApi<'nvml>,
        path_info: *mut nvmlGpuTopologyLevel_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_topology_common_ancestor)?;
        nvml_try(sym(device1.handle(), device2.handle(), path_info))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetUUID`.
    #[doc(alias = "nvmlDeviceGetUUID")]
    pub unsafe fn device_get_uuid(
        &self,
        device: &impl DeviceApi<'nvml>,
        uuid: &mut Option<String>,
        length: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_uuid)?;
        let mut uuid_buf: Vec<c_char> = vec![0; length as usize];
        nvml_try(sym(device.handle(), uuid_buf.as_mut_ptr(), length))?;
        *uuid = Some(decode_string(&uuid_buf)?);
        Ok(())
    }

    /// Calls `nvmlDeviceGetUtilizationRates`.
    #[doc(alias = "nvmlDeviceGetUtilizationRates")]
    pub unsafe fn device_get_utilization_rates(
        &self,
        device: &impl DeviceApi<'nvml>,
        utilization: *mut nvmlUtilization_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_utilization_rates)?;
        nvml_try(sym(device.handle(), utilization))?;
        Ok(())
    }

    /// Calls `nvmlDeviceGetVgpuMetadata`.
    #[doc(alias = "nvmlDeviceGetVgpuMetadata")]
    pub unsafe fn device_get_vgpu_metadata(
        &self,
        device: &impl DeviceApi<'nvml>,
        pgpu_metadata: &mut VgpuPgpuMetadata,
        buffer_size: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_get_vgpu_metadata)?;
        nvml_try(sym(device.handle(), &mut pgpu_metadata.raw, buffer_size))?;
        Ok(())
    }

    /// Calls `nvmlDeviceRegisterEvents`.
    #[doc(alias = "nvmlDeviceRegisterEvents")]
    pub unsafe fn device_register_events(
        &self,
        device: &impl DeviceApi<'nvml>,
        event_types: c_ulonglong,
        set: &impl EventSetApi<'nvml>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_register_events)?;
        nvml_try(sym(device.handle(), event_types, set.handle()))?;
        Ok(())
    }

    /// Calls `nvmlDeviceRemoveGpu`.
    #[doc(alias = "nvmlDeviceRemoveGpu")]
    pub unsafe fn device_remove_gpu(
        &self,
        pci_info: *mut nvmlPciInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_remove_gpu)?;
        nvml_try(sym(pci_info))?;
        Ok(())
    }

    /// Calls `nvmlDeviceRemoveGpu_v2`.
    #[doc(alias = "nvmlDeviceRemoveGpu_v2")]
    pub unsafe fn device_remove_gpu_v2(
        &self,
        pci_info: *mut nvmlPciInfo_t,
        gpu_state: nvmlDetachGpuState_t,
        link_state: nvmlPcieLinkState_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().device_remove_gpu_v2)?;
        nvml_try(sym(pci_info, gpu_state, link_state))?;
        Ok(())
    }

    /// Calls `nvmlEventSetCreate`.
    #[doc(alias = "nvmlEventSetCreate")]
    pub unsafe fn event_set_create(
        &self,
        set: &mut Option<EventSet<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().event_set_create)?;
        let mut set_raw: nvmlEventSet_t = mem::zeroed();
        nvml_try(sym(&mut set_raw))?;
        *set = Some(EventSet::new(set_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlEventSetFree`.
    #[doc(alias = "nvmlEventSetFree")]
    pub unsafe fn event_set_free(
        &self,
        set: EventSet<'nvml>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().event_set_free)?;
        nvml_try(sym(set.handle()))?;
        mem::forget(set);
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlEventSetWait`, declared as `nvmlEventSetWait_v2`.
    #[doc(alias = "nvmlEventSetWait")]
    pub unsafe fn event_set_wait(
        &self,
        set: &impl EventSetApi<'nvml>,
        data: &mut Option<EventData<'nvml>>,
        timeoutms: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().event_set_wait)?;
        let mut data_raw: nvmlEventData_t = mem::zeroed();
        nvml_try(sym(set.handle(), &mut data_raw, timeoutms))?;
        *data = Some(EventData::new(data_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlEventSetWait_v2`.
    #[doc(alias = "nvmlEventSetWait_v2")]
    pub unsafe fn event_set_wait_v2(
        &self,
        set: &impl EventSetApi<'nvml>,
        data: &mut Option<EventData<'nvml>>,
        timeoutms: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().event_set_wait_v2)?;
        let mut data_raw: nvmlEventData_t = mem::zeroed();
        nvml_try(sym(set.handle(), &mut data_raw, timeoutms))?;
        *data = Some(EventData::new(data_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlGetExcludedDeviceCount`.
    #[doc(alias = "nvmlGetExcludedDeviceCount")]
    pub unsafe fn get_excluded_device_count(
        &self,
        device_count: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().get_excluded_device_count)?;
        nvml_try(sym(device_count))?;
        Ok(())
    }

    /// Calls `nvmlGetExcludedDeviceInfoByIndex`.
    #[doc(alias = "nvmlGetExcludedDeviceInfoByIndex")]
    pub unsafe fn get_excluded_device_info_by_index(
        &self,
        index: c_uint,
        info: *mut nvmlExcludedDeviceInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().get_excluded_device_info_by_index)?;
        nvml_try(sym(index, info))?;
        Ok(())
    }

    /// Calls `nvmlGetVgpuCompatibility`.
    #[doc(alias = "nvmlGetVgpuCompatibility")]
    pub unsafe fn get_vgpu_compatibility(
        &self,
        vgpu_metadata: &mut VgpuMetadata,
        pgpu_metadata: &mut VgpuPgpuMetadata,
        compatibility_info: *mut nvmlVgpuPgpuCompatibility_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().get_vgpu_compatibility)?;
        nvml_try(sym(&mut vgpu_metadata.raw, &mut pgpu_metadata.raw, compatibility_info))?;
        Ok(())
    }

    /// Calls `nvmlGpmMetricsGet`.
    #[doc(alias = "nvmlGpmMetricsGet")]
    pub unsafe fn gpm_metrics_get(
        &self,
        metrics_get: &mut GpmMetricsGet,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpm_metrics_get)?;
        nvml_try(sym(&mut metrics_get.raw))?;
        Ok(())
    }

    /// Calls `nvmlGpmMigSampleGet`.
    #[doc(alias = "nvmlGpmMigSampleGet")]
    pub unsafe fn gpm_mig_sample_get(
        &self,
        device: &impl DeviceApi<'nvml>,
        gpu_instance_id: c_uint,
        gpm_sample: &impl GpmSampleApi<'nvml>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpm_mig_sample_get)?;
        nvml_try(sym(device.handle(), gpu_instance_id, gpm_sample.handle()))?;
        Ok(())
    }

    /// Calls `nvmlGpmQueryDeviceSupport`.
    #[doc(alias = "nvmlGpmQueryDeviceSupport")]
    pub unsafe fn gpm_query_device_support(
        &self,
        device: &impl DeviceApi<'nvml>,
        gpm_support: *mut nvmlGpmSupport_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpm_query_device_support)?;
        nvml_try(sym(device.handle(), gpm_support))?;
        Ok(())
    }

    /// Calls `nvmlGpmQueryIfStreamingEnabled`.
    #[doc(alias = "nvmlGpmQueryIfStreamingEnabled")]
    pub unsafe fn gpm_query_if_streaming_enabled(
        &self,
        device: &impl DeviceApi<'nvml>,
        state: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpm_query_if_streaming_enabled)?;
        nvml_try(sym(device.handle(), state))?;
        Ok(())
    }

    /// Calls `nvmlGpmSampleAlloc`.
    #[doc(alias = "nvmlGpmSampleAlloc")]
    pub unsafe fn gpm_sample_alloc(
        &self,
        gpm_sample: &mut Option<GpmSample<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpm_sample_alloc)?;
        let mut gpm_sample_raw: nvmlGpmSample_t = mem::zeroed();
        nvml_try(sym(&mut gpm_sample_raw))?;
        *gpm_sample = Some(GpmSample::new(gpm_sample_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlGpmSampleFree`.
    #[doc(alias = "nvmlGpmSampleFree")]
    pub unsafe fn gpm_sample_free(
        &self,
        gpm_sample: GpmSample<'nvml>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpm_sample_free)?;
        nvml_try(sym(gpm_sample.handle()))?;
        mem::forget(gpm_sample);
        Ok(())
    }

    /// Calls `nvmlGpmSampleGet`.
    #[doc(alias = "nvmlGpmSampleGet")]
    pub unsafe fn gpm_sample_get(
        &self,
        device: &impl DeviceApi<'nvml>,
        gpm_sample: &impl GpmSampleApi<'nvml>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpm_sample_get)?;
        nvml_try(sym(device.handle(), gpm_sample.handle()))?;
        Ok(())
    }

    /// Calls `nvmlGpmSetStreamingEnabled`.
    #[doc(alias = "nvmlGpmSetStreamingEnabled")]
    pub unsafe fn gpm_set_streaming_enabled(
        &self,
        device: &impl DeviceApi<'nvml>,
        state: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpm_set_streaming_enabled)?;
        nvml_try(sym(device.handle(), state))?;
        Ok(())
    }

    /// Calls `nvmlGpuInstanceCreateComputeInstance`.
    #[doc(alias = "nvmlGpuInstanceCreateComputeInstance")]
    pub unsafe fn gpu_instance_create_compute_instance(
        &self,
        gpu_instance: &impl GpuInstanceApi<'nvml>,
        profile_id: c_uint,
        compute_instance: &mut Option<ComputeInstance<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpu_instance_create_compute_instance)?;
        let mut compute_instance_raw: nvmlComputeInstance_t = mem::zeroed();
        nvml_try(sym(gpu_instance.handle(), profile_id, &mut compute_instance_raw))?;
        *compute_instance = Some(ComputeInstance::new(compute_instance_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlGpuInstanceDestroy`.
    #[doc(alias = "nvmlGpuInstanceDestroy")]
    pub unsafe fn gpu_instance_destroy(
        &self,
        gpu_instance: &impl GpuInstanceApi<'nvml>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpu_instance_destroy)?;
        nvml_try(sym(gpu_instance.handle()))?;
        Ok(())
    }

    /// Calls `nvmlGpuInstanceGetComputeInstanceById`.
    #[doc(alias = "nvmlGpuInstanceGetComputeInstanceById")]
    pub unsafe fn gpu_instance_get_compute_instance_by_id(
        &self,
        gpu_instance: &impl GpuInstanceApi<'nvml>,
        id: c_uint,
        compute_instance: &mut Option<ComputeInstance<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpu_instance_get_compute_instance_by_id)?;
        let mut compute_instance_raw: nvmlComputeInstance_t = mem::zeroed();
        nvml_try(sym(gpu_instance.handle(), id, &mut compute_instance_raw))?;
        *compute_instance = Some(ComputeInstance::new(compute_instance_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlGpuInstanceGetComputeInstanceProfileInfo`.
    #[doc(alias = "nvmlGpuInstanceGetComputeInstanceProfileInfo")]
    pub unsafe fn gpu_instance_get_compute_instance_profile_info(
        &self,
        gpu_instance: &impl GpuInstanceApi<'nvml>,
        profile: c_uint,
        eng_profile: c_uint,
        info: *mut nvmlComputeInstanceProfileInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpu_instance_get_compute_instance_profile_info)?;
        nvml_try(sym(gpu_instance.handle(), profile, eng_profile, info))?;
        Ok(())
    }

    /// Calls `nvmlGpuInstanceGetComputeInstances`.
    #[doc(alias = "nvmlGpuInstanceGetComputeInstances")]
    pub unsafe fn gpu_instance_get_compute_instances(
        &self,
        gpu_instance: &impl GpuInstanceApi<'nvml>,
        profile_id: c_uint,
        compute_instances: &mut Vec<ComputeInstance<'nvml>>,
        count: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpu_instance_get_compute_instances)?;
        let mut compute_instances_raw: Vec<nvmlComputeInstance_t> = vec![mem::zeroed(); *count as usize];
        nvml_try(sym(gpu_instance.handle(), profile_id, buffer_ptr(&mut compute_instances_raw), count))?;
        compute_instances_raw.truncate(*count as usize);
        *compute_instances = compute_instances_raw.into_iter().map(|raw| ComputeInstance::new(raw, self.nvml)).collect();
        Ok(())
    }

    /// Calls `nvmlGpuInstanceGetInfo`.
    #[doc(alias = "nvmlGpuInstanceGetInfo")]
    pub unsafe fn gpu_instance_get_info(
        &self,
        gpu_instance: &impl GpuInstanceApi<'nvml>,
        info: &mut Option<GpuInstanceInfo<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().gpu_instance_get_info)?;
        let mut info_raw: nvmlGpuInstanceInfo_t = mem::zeroed();
        nvml_try(sym(gpu_instance.handle(), &mut info_raw))?;
        *info = Some(GpuInstanceInfo::convert(info_raw, self.nvml));
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlInit`, declared as `nvmlInit_v2`.
    #[doc(alias = "nvmlInit")]
    pub unsafe fn init(&self) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().init)?;
        nvml_try(sym())?;
        Ok(())
    }

    /// Calls `nvmlInitWithFlags`.
    #[doc(alias = "nvmlInitWithFlags")]
    pub unsafe fn init_with_flags(
        &self,
        flags: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().init_with_flags)?;
        nvml_try(sym(flags))?;
        Ok(())
    }

    /// Calls `nvmlInit_v2`.
    #[doc(alias = "nvmlInit_v2")]
    pub unsafe fn init_v2(&self) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().init_v2)?;
        nvml_try(sym())?;
        Ok(())
    }

    /// Calls `nvmlShutdown`.
    #[doc(alias = "nvmlShutdown")]
    pub unsafe fn shutdown(&self) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().shutdown)?;
        nvml_try(sym())?;
        Ok(())
    }

    /// Calls `nvmlSystemGetCudaDriverVersion`.
    #[doc(alias = "nvmlSystemGetCudaDriverVersion")]
    pub unsafe fn system_get_cuda_driver_version(
        &self,
        cuda_driver_version: *mut c_int,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().system_get_cuda_driver_version)?;
        nvml_try(sym(cuda_driver_version))?;
        Ok(())
    }

    /// Calls `nvmlSystemGetCudaDriverVersion_v2`.
    #[doc(alias = "nvmlSystemGetCudaDriverVersion_v2")]
    pub unsafe fn system_get_cuda_driver_version_v2(
        &self,
        cuda_driver_version: *mut c_int,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().system_get_cuda_driver_version_v2)?;
        nvml_try(sym(cuda_driver_version))?;
        Ok(())
    }

    /// Calls `nvmlSystemGetDriverVersion`.
    #[doc(alias = "nvmlSystemGetDriverVersion")]
    pub unsafe fn system_get_driver_version(
        &self,
        version: &mut Option<String>,
        length: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().system_get_driver_version)?;
        let mut version_buf: Vec<c_char> = vec![0; length as usize];
        nvml_try(sym(version_buf.as_mut_ptr(), length))?;
        *version = Some(decode_string(&version_buf)?);
        Ok(())
    }

    /// Calls `nvmlSystemGetHicVersion`.
    #[doc(alias = "nvmlSystemGetHicVersion")]
    pub unsafe fn system_get_hic_version(
        &self,
        hwbc_count: *mut c_uint,
        hwbc_entries: *mut nvmlHwbcEntry_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().system_get_hic_version)?;
        nvml_try(sym(hwbc_count, hwbc_entries))?;
        Ok(())
    }

    /// Calls `nvmlSystemGetNVMLVersion`.
    #[doc(alias = "nvmlSystemGetNVMLVersion")]
    pub unsafe fn system_get_nvml_version(
        &self,
        version: &mut Option<String>,
        length: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().system_get_nvml_version)?;
        let mut version_buf: Vec<c_char> = vec![0; length as usize];
        nvml_try(sym(version_buf.as_mut_ptr(), length))?;
        *version = Some(decode_string(&version_buf)?);
        Ok(())
    }

    /// Calls `nvmlSystemGetProcessName`.
    #[doc(alias = "nvmlSystemGetProcessName")]
    pub unsafe fn system_get_process_name(
        &self,
        pid: c_uint,
        name: &mut Option<String>,
        length: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().system_get_process_name)?;
        let mut name_buf: Vec<c_char> = vec![0; length as usize];
        nvml_try(sym(pid, name_buf.as_mut_ptr(), length))?;
        *name = Some(decode_string(&name_buf)?);
        Ok(())
    }

    /// Calls `nvmlSystemGetTopologyGpuSet`.
    #[doc(alias = "nvmlSystemGetTopologyGpuSet")]
    pub unsafe fn system_get_topology_gpu_set(
        &self,
        cpu_number: c_uint,
        count: *mut c_uint,
        device_array: &mut Vec<Device<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().system_get_topology_gpu_set)?;
        let mut device_array_raw: Vec<nvmlDevice_t> = vec![mem::zeroed(); *count as usize];
        nvml_try(sym(cpu_number, count, buffer_ptr(&mut device_array_raw)))?;
        device_array_raw.truncate(*count as usize);
        *device_array = device_array_raw.into_iter().map(|raw| Device::new(raw, self.nvml)).collect();
        Ok(())
    }

    /// Calls `nvmlUnitGetCount`.
    #[doc(alias = "nvmlUnitGetCount")]
    pub unsafe fn unit_get_count(
        &self,
        unit_count: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().unit_get_count)?;
        nvml_try(sym(unit_count))?;
        Ok(())
    }

    /// Calls `nvmlUnitGetDevices`.
    #[doc(alias = "nvmlUnitGetDevices")]
    pub unsafe fn unit_get_devices(
        &self,
        unit: &impl UnitApi<'nvml>,
        device_count: *mut c_uint,
        devices: &mut Vec<Device<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().unit_get_devices)?;
        let mut devices_raw: Vec<nvmlDevice_t> = vec![mem::zeroed(); *device_count as usize];
        nvml_try(sym(unit.handle(), device_count, buffer_ptr(&mut devices_raw)))?;
        devices_raw.truncate(*device_count as usize);
        *devices = devices_raw.into_iter().map(|raw| Device::new(raw, self.nvml)).collect();
        Ok(())
    }

    /// Calls `nvmlUnitGetFanSpeedInfo`.
    #[doc(alias = "nvmlUnitGetFanSpeedInfo")]
    pub unsafe fn unit_get_fan_speed_info(
        &self,
        unit: &impl UnitApi<'nvml>,
        fan_speeds: *mut nvmlUnitFanSpeeds_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().unit_get_fan_speed_info)?;
        nvml_try(sym(unit.handle(), fan_speeds))?;
        Ok(())
    }

    /// Calls `nvmlUnitGetHandleByIndex`.
    #[doc(alias = "nvmlUnitGetHandleByIndex")]
    pub unsafe fn unit_get_handle_by_index(
        &self,
        index: c_uint,
        unit: &mut Option<Unit<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().unit_get_handle_by_index)?;
        let mut unit_raw: nvmlUnit_t = mem::zeroed();
        nvml_try(sym(index, &mut unit_raw))?;
        *unit = Some(Unit::new(unit_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlUnitGetLedState`.
    #[doc(alias = "nvmlUnitGetLedState")]
    pub unsafe fn unit_get_led_state(
        &self,
        unit: &impl UnitApi<'nvml>,
        state: *mut nvmlLedState_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().unit_get_led_state)?;
        nvml_try(sym(unit.handle(), state))?;
        Ok(())
    }

    /// Calls `nvmlUnitGetPsuInfo`.
    #[doc(alias = "nvmlUnitGetPsuInfo")]
    pub unsafe fn unit_get_psu_info(
        &self,
        unit: &impl UnitApi<'nvml>,
        psu: *mut nvmlPSUInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().unit_get_psu_info)?;
        nvml_try(sym(unit.handle(), psu))?;
        Ok(())
    }

    /// Calls `nvmlUnitGetTemperature`.
    #[doc(alias = "nvmlUnitGetTemperature")]
    pub unsafe fn unit_get_temperature(
        &self,
        unit: &impl UnitApi<'nvml>,
        reading: c_uint,
        temp: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().unit_get_temperature)?;
        nvml_try(sym(unit.handle(), reading, temp))?;
        Ok(())
    }

    /// Calls `nvmlUnitGetUnitInfo`.
    #[doc(alias = "nvmlUnitGetUnitInfo")]
    pub unsafe fn unit_get_unit_info(
        &self,
        unit: &impl UnitApi<'nvml>,
        info: *mut nvmlUnitInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().unit_get_unit_info)?;
        nvml_try(sym(unit.handle(), info))?;
        Ok(())
    }

    /// Calls `nvmlUnitSetLedState`.
    #[doc(alias = "nvmlUnitSetLedState")]
    pub unsafe fn unit_set_led_state(
        &self,
        unit: &impl UnitApi<'nvml>,
        color: nvmlLedColor_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().unit_set_led_state)?;
        nvml_try(sym(unit.handle(), color))?;
        Ok(())
    }

    /// Calls `nvmlVgpuInstanceGetFbUsage`.
    #[doc(alias = "nvmlVgpuInstanceGetFbUsage")]
    pub unsafe fn vgpu_instance_get_fb_usage(
        &self,
        vgpu_instance: &impl VgpuInstanceApi<'nvml>,
        fb_usage: *mut c_ulonglong,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_instance_get_fb_usage)?;
        nvml_try(sym(vgpu_instance.handle(), fb_usage))?;
        Ok(())
    }

    /// Calls the newest exported revision of `nvmlVgpuInstanceGetLicenseInfo`, declared as `nvmlVgpuInstanceGetLicenseInfo_v2`.
    #[doc(alias = "nvmlVgpuInstanceGetLicenseInfo")]
    pub unsafe fn vgpu_instance_get_license_info(
        &self,
        vgpu_instance: &impl VgpuInstanceApi<'nvml>,
        license_info: *mut nvmlVgpuLicenseInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_instance_get_license_info)?;
        nvml_try(sym(vgpu_instance.handle(), license_info))?;
        Ok(())
    }

    /// Calls `nvmlVgpuInstanceGetLicenseInfo_v2`.
    #[doc(alias = "nvmlVgpuInstanceGetLicenseInfo_v2")]
    pub unsafe fn vgpu_instance_get_license_info_v2(
        &self,
        vgpu_instance: &impl VgpuInstanceApi<'nvml>,
        license_info: *mut nvmlVgpuLicenseInfo_t,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_instance_get_license_info_v2)?;
        nvml_try(sym(vgpu_instance.handle(), license_info))?;
        Ok(())
    }

    /// Calls `nvmlVgpuInstanceGetMetadata`.
    #[doc(alias = "nvmlVgpuInstanceGetMetadata")]
    pub unsafe fn vgpu_instance_get_metadata(
        &self,
        vgpu_instance: &impl VgpuInstanceApi<'nvml>,
        vgpu_metadata: &mut VgpuMetadata,
        buffer_size: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_instance_get_metadata)?;
        nvml_try(sym(vgpu_instance.handle(), &mut vgpu_metadata.raw, buffer_size))?;
        Ok(())
    }

    /// Calls `nvmlVgpuInstanceGetType`.
    #[doc(alias = "nvmlVgpuInstanceGetType")]
    pub unsafe fn vgpu_instance_get_type(
        &self,
        vgpu_instance: &impl VgpuInstanceApi<'nvml>,
        vgpu_type_id: &mut Option<VgpuTypeId<'nvml>>,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_instance_get_type)?;
        let mut vgpu_type_id_raw: nvmlVgpuTypeId_t = mem::zeroed();
        nvml_try(sym(vgpu_instance.handle(), &mut vgpu_type_id_raw))?;
        *vgpu_type_id = Some(VgpuTypeId::new(vgpu_type_id_raw, self.nvml));
        Ok(())
    }

    /// Calls `nvmlVgpuInstanceGetUUID`.
    #[doc(alias = "nvmlVgpuInstanceGetUUID")]
    pub unsafe fn vgpu_instance_get_uuid(
        &self,
        vgpu_instance: &impl VgpuInstanceApi<'nvml>,
        uuid: &mut Option<String>,
        size: c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_instance_get_uuid)?;
        let mut uuid_buf: Vec<c_char> = vec![0; size as usize];
        nvml_try(sym(vgpu_instance.handle(), uuid_buf.as_mut_ptr(), size))?;
        *uuid = Some(decode_string(&uuid_buf)?);
        Ok(())
    }

    /// Calls `nvmlVgpuTypeGetClass`.
    #[doc(alias = "nvmlVgpuTypeGetClass")]
    pub unsafe fn vgpu_type_get_class(
        &self,
        vgpu_type_id: &impl VgpuTypeIdApi<'nvml>,
        vgpu_type_class: &mut Option<String>,
        size: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_type_get_class)?;
        let mut vgpu_type_class_buf: Vec<c_char> = vec![0; *size as usize];
        nvml_try(sym(vgpu_type_id.handle(), vgpu_type_class_buf.as_mut_ptr(), size))?;
        *vgpu_type_class = Some(decode_string(&vgpu_type_class_buf)?);
        Ok(())
    }

    /// Calls `nvmlVgpuTypeGetFramebufferSize`.
    #[doc(alias = "nvmlVgpuTypeGetFramebufferSize")]
    pub unsafe fn vgpu_type_get_framebuffer_size(
        &self,
        vgpu_type_id: &impl VgpuTypeIdApi<'nvml>,
        fb_size: *mut c_ulonglong,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_type_get_framebuffer_size)?;
        nvml_try(sym(vgpu_type_id.handle(), fb_size))?;
        Ok(())
    }

    /// Calls `nvmlVgpuTypeGetMaxInstances`.
    #[doc(alias = "nvmlVgpuTypeGetMaxInstances")]
    pub unsafe fn vgpu_type_get_max_instances(
        &self,
        device: &impl DeviceApi<'nvml>,
        vgpu_type_id: &impl VgpuTypeIdApi<'nvml>,
        vgpu_instance_count: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_type_get_max_instances)?;
        nvml_try(sym(device.handle(), vgpu_type_id.handle(), vgpu_instance_count))?;
        Ok(())
    }

    /// Calls `nvmlVgpuTypeGetName`.
    #[doc(alias = "nvmlVgpuTypeGetName")]
    pub unsafe fn vgpu_type_get_name(
        &self,
        vgpu_type_id: &impl VgpuTypeIdApi<'nvml>,
        vgpu_type_name: &mut Option<String>,
        size: *mut c_uint,
    ) -> Result<(), NvmlError> {
        let sym = nvml_sym(&self.nvml.lib().vgpu_type_get_name)?;
        let mut vgpu_type_name_buf: Vec<c_char> = vec![0; *size as usize];
        nvml_try(sym(vgpu_type_id.handle(), vgpu_type_name_buf.as_mut_ptr(), size))?;
        *vgpu_type_name = Some(decode_string(&vgpu_type_name_buf)?);
        Ok(())
    }
}

/// The buffer's address, or null when it is empty.
fn buffer_ptr<T>(buffer: &mut [T]) -> *mut T {
    if buffer.is_empty() {
        std::ptr::null_mut()
    } else {
        buffer.as_mut_ptr()
    }
}

/// Decode the NUL-terminated string NVML wrote into `buffer`.
fn decode_string(buffer: &[std::os::raw::c_char]) -> Result<String, NvmlError> {
    let bytes: Vec<u8> = buffer.iter().map(|c| *c as u8).collect();
    let text = match std::ffi::CStr::from_bytes_until_nul(&bytes) {
        Ok(text) => text.to_str()?,
        Err(_) => std::str::from_utf8(&bytes)?,
    };

    Ok(text.to_owned())
}
