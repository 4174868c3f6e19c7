#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

/// The last XID error reported with a critical XID event.
///
/// NVML reports 999 when the XID is not known.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum XidError {
    /// Contains the value of the error.
    Value(u64),
    Unknown,
}

impl From<u64> for XidError {
    fn from(value: u64) -> Self {
        match value {
            999 => XidError::Unknown,
            v => XidError::Value(v),
        }
    }
}
