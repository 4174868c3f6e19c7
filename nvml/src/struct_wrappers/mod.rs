pub mod device;
pub mod event;
pub mod gpm;
pub mod gpu_instance;
pub mod unit;
pub mod vgpu;

pub use self::event::EventData;
pub use self::gpm::GpmMetricsGet;
pub use self::gpu_instance::{ComputeInstanceInfo, GpuInstanceInfo};
pub use self::vgpu::{VgpuMetadata, VgpuPgpuMetadata};

use self::device::PciInfo;
use crate::error::NvmlError;
use crate::ffi::bindings::*;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::os::raw::c_char;

/// Decode a fixed-size C string field, stopping at the array's end if NVML
/// left it unterminated.
pub(crate) fn fixed_string(buf: &[c_char]) -> Result<String, NvmlError> {
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|c| **c != 0)
        .map(|c| *c as u8)
        .collect();

    Ok(std::str::from_utf8(&bytes)?.to_owned())
}

/// Information about an excluded device.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExcludedDeviceInfo {
    pub pci_info: PciInfo,
    pub uuid: String,
}

impl TryFrom<nvmlExcludedDeviceInfo_t> for ExcludedDeviceInfo {
    type Error = NvmlError;

    /**
    Construct [`ExcludedDeviceInfo`] from the corresponding C struct.

    # Errors

    * `Utf8Error`, if either string is not valid UTF-8
    */
    fn try_from(value: nvmlExcludedDeviceInfo_t) -> Result<Self, Self::Error> {
        Ok(Self {
            pci_info: PciInfo::try_from(value.pciInfo, true)?,
            uuid: fixed_string(&value.uuid)?,
        })
    }
}
