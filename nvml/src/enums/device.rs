use crate::ffi::bindings::*;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

/// Represents possible variants for used GPU memory.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UsedGpuMemory {
    /// Under WDDM, `NVML_VALUE_NOT_AVAILABLE` is always reported because
    /// Windows KMD manages all the memory, not the NVIDIA driver.
    Unavailable,
    /// Memory used in bytes.
    Used(u64),
}

impl From<u64> for UsedGpuMemory {
    fn from(value: u64) -> Self {
        match value {
            NVML_VALUE_NOT_AVAILABLE => UsedGpuMemory::Unavailable,
            _ => UsedGpuMemory::Used(value),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn not_available() {
        assert_eq!(UsedGpuMemory::from(u64::MAX), UsedGpuMemory::Unavailable);
        assert_eq!(UsedGpuMemory::from(4096), UsedGpuMemory::Used(4096));
    }
}
