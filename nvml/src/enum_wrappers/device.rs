use crate::error::NvmlError;
use crate::ffi::bindings::*;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use wrapcenum_derive::EnumWrapper;

#[derive(EnumWrapper, Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[wrap(c_enum = "nvmlTemperatureSensors_enum")]
pub enum TemperatureSensor {
    /// Sensor for the GPU die.
    #[wrap(c_variant = "NVML_TEMPERATURE_GPU")]
    Gpu,
}

/// Level relationships within a system between two GPUs.
#[derive(EnumWrapper, Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[wrap(c_enum = "nvmlGpuTopologyLevel_enum")]
pub enum TopologyLevel {
    /// e.g. Tesla K80.
    #[wrap(c_variant = "NVML_TOPOLOGY_INTERNAL")]
    Internal,
    /// All devices that only need traverse a single PCIe switch.
    #[wrap(c_variant = "NVML_TOPOLOGY_SINGLE")]
    Single,
    /// All devices that need not traverse a host bridge.
    #[wrap(c_variant = "NVML_TOPOLOGY_MULTIPLE")]
    Multiple,
    /// All devices that are connected to the same host bridge.
    #[wrap(c_variant = "NVML_TOPOLOGY_HOSTBRIDGE")]
    HostBridge,
    /// All devices that are connected to the same NUMA node but possibly
    /// multiple host bridges.
    #[wrap(c_variant = "NVML_TOPOLOGY_NODE")]
    Node,
    /// All devices in the system
    #[wrap(c_variant = "NVML_TOPOLOGY_SYSTEM")]
    System,
}

/// Whether `Nvml::remove_gpu_v2()` keeps the GPU visible to NVML.
#[derive(EnumWrapper, Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[wrap(c_enum = "nvmlDetachGpuState_enum")]
pub enum DetachGpuState {
    #[wrap(c_variant = "NVML_DETACH_GPU_KEEP")]
    Keep,
    #[wrap(c_variant = "NVML_DETACH_GPU_REMOVE")]
    Remove,
}

/// What `Nvml::remove_gpu_v2()` does with the PCIe link.
#[derive(EnumWrapper, Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[wrap(c_enum = "nvmlPcieLinkState_enum")]
pub enum PcieLinkState {
    #[wrap(c_variant = "NVML_PCIE_LINK_KEEP")]
    Keep,
    #[wrap(c_variant = "NVML_PCIE_LINK_SHUT_DOWN")]
    ShutDown,
}

/// GPU performance monitoring metrics, computed from two samples.
#[derive(EnumWrapper, Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[wrap(c_enum = "nvmlGpmMetricId_enum")]
pub enum GpmMetricId {
    /// Percentage of time any compute or graphics engine was busy.
    #[wrap(c_variant = "NVML_GPM_METRIC_GRAPHICS_UTIL")]
    GraphicsUtil,
    /// Percentage of SMs that were busy.
    #[wrap(c_variant = "NVML_GPM_METRIC_SM_UTIL")]
    SmUtil,
    /// Percentage of warps that were active versus the theoretical maximum.
    #[wrap(c_variant = "NVML_GPM_METRIC_SM_OCCUPANCY")]
    SmOccupancy,
    #[wrap(c_variant = "NVML_GPM_METRIC_INTEGER_UTIL")]
    IntegerUtil,
    #[wrap(c_variant = "NVML_GPM_METRIC_ANY_TENSOR_UTIL")]
    AnyTensorUtil,
    #[wrap(c_variant = "NVML_GPM_METRIC_DFMA_TENSOR_UTIL")]
    DfmaTensorUtil,
    #[wrap(c_variant = "NVML_GPM_METRIC_HMMA_TENSOR_UTIL")]
    HmmaTensorUtil,
    #[wrap(c_variant = "NVML_GPM_METRIC_IMMA_TENSOR_UTIL")]
    ImmaTensorUtil,
    /// Percentage of DRAM bandwidth used.
    #[wrap(c_variant = "NVML_GPM_METRIC_DRAM_BW_UTIL")]
    DramBwUtil,
    #[wrap(c_variant = "NVML_GPM_METRIC_FP64_UTIL")]
    Fp64Util,
    #[wrap(c_variant = "NVML_GPM_METRIC_FP32_UTIL")]
    Fp32Util,
    #[wrap(c_variant = "NVML_GPM_METRIC_FP16_UTIL")]
    Fp16Util,
    /// PCIe traffic from this GPU, in MiB/sec.
    #[wrap(c_variant = "NVML_GPM_METRIC_PCIE_TX_PER_SEC")]
    PcieTxPerSec,
    /// PCIe traffic to this GPU, in MiB/sec.
    #[wrap(c_variant = "NVML_GPM_METRIC_PCIE_RX_PER_SEC")]
    PcieRxPerSec,
    #[wrap(c_variant = "NVML_GPM_METRIC_NVDEC_0_UTIL")]
    Nvdec0Util,
    #[wrap(c_variant = "NVML_GPM_METRIC_NVJPG_0_UTIL")]
    Nvjpg0Util,
    #[wrap(c_variant = "NVML_GPM_METRIC_NVOFA_0_UTIL")]
    Nvofa0Util,
    #[wrap(c_variant = "NVML_GPM_METRIC_NVLINK_TOTAL_RX_PER_SEC")]
    NvlinkTotalRxPerSec,
    #[wrap(c_variant = "NVML_GPM_METRIC_NVLINK_TOTAL_TX_PER_SEC")]
    NvlinkTotalTxPerSec,
}

#[cfg(test)]
mod test {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn topology_levels() {
        assert_eq!(TopologyLevel::Node.as_c(), 40);
        assert_eq!(
            TopologyLevel::try_from(nvmlGpuTopologyLevel_enum_NVML_TOPOLOGY_SYSTEM).unwrap(),
            TopologyLevel::System
        );
        assert!(matches!(
            TopologyLevel::try_from(5),
            Err(NvmlError::UnexpectedVariant(5))
        ));
    }

    #[test]
    fn gpm_metric_ids_follow_nvml() {
        assert_eq!(GpmMetricId::GraphicsUtil.as_c(), 1);
        assert_eq!(GpmMetricId::ImmaTensorUtil.as_c(), 9);
        assert_eq!(GpmMetricId::NvlinkTotalTxPerSec.as_c(), 61);
    }
}
