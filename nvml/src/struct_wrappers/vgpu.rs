use crate::bitmasks::vgpu::{VgpuCompatibilityLimit, VgpuVmCompatibility};
use crate::enum_wrappers::vgpu::VgpuGuestInfoState;
use crate::error::{nvml_try, NvmlError};
use crate::ffi::bindings::*;
use crate::struct_wrappers::fixed_string;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::os::raw::c_uint;
use std::{mem, ptr, slice};

/// Bytes of opaque data that fit inside the C struct itself.
const INLINE_OPAQUE_DATA: usize = NVML_VGPU_METADATA_OPAQUE_DATA_SIZE as usize;

/// Largest opaque area `read_with_opaque_data` will allocate.
const MAX_OPAQUE_DATA: usize = 1 << 20;

/**
A metadata struct with a variable-length opaque blob trailing it.

NVML writes the fixed fields followed by `opaqueDataSize` bytes of opaque data,
which may run past the end of the C struct.
*/
pub(crate) trait OpaqueTail: Copy {
    fn opaque_data_size(&self) -> u32;
    fn set_opaque_data_size(&mut self, size: u32);

    /// Offset of the opaque data from the start of the struct.
    fn header_size() -> usize {
        mem::size_of::<Self>() - INLINE_OPAQUE_DATA
    }
}

impl OpaqueTail for nvmlVgpuMetadata_t {
    fn opaque_data_size(&self) -> u32 {
        self.opaqueDataSize
    }

    fn set_opaque_data_size(&mut self, size: u32) {
        self.opaqueDataSize = size;
    }
}

impl OpaqueTail for nvmlVgpuPgpuMetadata_t {
    fn opaque_data_size(&self) -> u32 {
        self.opaqueDataSize
    }

    fn set_opaque_data_size(&mut self, size: u32) {
        self.opaqueDataSize = size;
    }
}

/// 8-byte words, so the buffer is aligned for any of the metadata structs.
fn words_for(bytes: usize) -> Vec<u64> {
    vec![0u64; (bytes + 7) / 8]
}

/**
Run `query` with a buffer that grows until the opaque data fits.

The opaque area starts at its inline size and doubles on every
`InsufficientSize`, or grows straight to the size NVML asks for if that is
larger, up to `MAX_OPAQUE_DATA`. Returns the fixed fields and the opaque bytes
NVML reported, or `InsufficientSize` with the last size NVML asked for once the
cap is reached.
*/
pub(crate) unsafe fn read_with_opaque_data<T, F>(mut query: F) -> Result<(T, Vec<u8>), NvmlError>
where
    T: OpaqueTail,
    F: FnMut(*mut T, *mut c_uint) -> nvmlReturn_t,
{
    let header = T::header_size();
    let mut opaque_size = INLINE_OPAQUE_DATA;

    loop {
        let mut buffer = words_for(header + opaque_size);
        let mut size = (header + opaque_size) as c_uint;
        let ptr = buffer.as_mut_ptr() as *mut T;

        let code = query(ptr, &mut size);
        if code == nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE {
            if opaque_size >= MAX_OPAQUE_DATA {
                return Err(NvmlError::InsufficientSize(Some(size as usize)));
            }
            let requested = (size as usize).saturating_sub(header);
            opaque_size = (opaque_size * 2).max(requested).min(MAX_OPAQUE_DATA);
            continue;
        }
        nvml_try(code)?;

        let raw = ptr::read(ptr);
        let bytes = slice::from_raw_parts(buffer.as_ptr() as *const u8, buffer.len() * 8);
        let end = (header + raw.opaque_data_size() as usize).min(header + opaque_size);

        return Ok((raw, bytes[header..end].to_vec()));
    }
}

/**
Lay `raw` and `opaque_data` out contiguously again, the way NVML wrote them,
and call `f` with a pointer to the result.
*/
pub(crate) unsafe fn with_opaque_data<T, R>(
    raw: &T,
    opaque_data: &[u8],
    f: impl FnOnce(*mut T) -> R,
) -> R
where
    T: OpaqueTail,
{
    let header = T::header_size();
    let len = header + opaque_data.len().max(INLINE_OPAQUE_DATA);
    let mut buffer = words_for(len);
    let ptr = buffer.as_mut_ptr() as *mut T;

    ptr::write(ptr, *raw);
    (*ptr).set_opaque_data_size(opaque_data.len() as u32);
    ptr::copy_nonoverlapping(
        opaque_data.as_ptr(),
        (ptr as *mut u8).add(header),
        opaque_data.len(),
    );

    f(ptr)
}

/**
Metadata of a vGPU instance, as seen from the host.

The struct embeds the raw C struct so NVML can write into it directly; the
opaque data NVML appends past the fixed fields is kept separately.
*/
#[derive(Clone)]
pub struct VgpuMetadata {
    pub(crate) raw: nvmlVgpuMetadata_t,
    pub(crate) opaque_data: Vec<u8>,
}

impl VgpuMetadata {
    /// An empty struct for NVML to fill.
    pub fn new() -> Self {
        Self {
            raw: unsafe { mem::zeroed() },
            opaque_data: Vec::new(),
        }
    }

    pub(crate) fn from_parts(raw: nvmlVgpuMetadata_t, opaque_data: Vec<u8>) -> Self {
        Self { raw, opaque_data }
    }

    pub fn version(&self) -> u32 {
        self.raw.version
    }

    pub fn revision(&self) -> u32 {
        self.raw.revision
    }

    /**
    Whether the guest driver has reported in yet.

    # Errors

    * `UnexpectedVariant`, for an undocumented state
    */
    pub fn guest_info_state(&self) -> Result<VgpuGuestInfoState, NvmlError> {
        VgpuGuestInfoState::try_from(self.raw.guestInfoState)
    }

    pub fn guest_driver_version(&self) -> Result<String, NvmlError> {
        fixed_string(&self.raw.guestDriverVersion)
    }

    pub fn host_driver_version(&self) -> Result<String, NvmlError> {
        fixed_string(&self.raw.hostDriverVersion)
    }

    pub fn vgpu_virtualization_caps(&self) -> u32 {
        self.raw.vgpuVirtualizationCaps
    }

    pub fn guest_vgpu_version(&self) -> u32 {
        self.raw.guestVgpuVersion
    }

    /// The opaque data to hand back to `Nvml::vgpu_compatibility()`.
    pub fn opaque_data(&self) -> &[u8] {
        &self.opaque_data
    }

    pub fn as_raw(&self) -> &nvmlVgpuMetadata_t {
        &self.raw
    }
}

impl Default for VgpuMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VgpuMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VgpuMetadata")
            .field("version", &self.raw.version)
            .field("revision", &self.raw.revision)
            .field("guest_info_state", &self.raw.guestInfoState)
            .field("opaque_data_len", &self.opaque_data.len())
            .finish()
    }
}

/// Metadata of the physical GPU hosting vGPUs.
#[derive(Clone)]
pub struct VgpuPgpuMetadata {
    pub(crate) raw: nvmlVgpuPgpuMetadata_t,
    pub(crate) opaque_data: Vec<u8>,
}

impl VgpuPgpuMetadata {
    /// An empty struct for NVML to fill.
    pub fn new() -> Self {
        Self {
            raw: unsafe { mem::zeroed() },
            opaque_data: Vec::new(),
        }
    }

    pub(crate) fn from_parts(raw: nvmlVgpuPgpuMetadata_t, opaque_data: Vec<u8>) -> Self {
        Self { raw, opaque_data }
    }

    pub fn version(&self) -> u32 {
        self.raw.version
    }

    pub fn revision(&self) -> u32 {
        self.raw.revision
    }

    pub fn host_driver_version(&self) -> Result<String, NvmlError> {
        fixed_string(&self.raw.hostDriverVersion)
    }

    pub fn pgpu_virtualization_caps(&self) -> u32 {
        self.raw.pgpuVirtualizationCaps
    }

    /// The range of vGPU versions the host driver supports.
    pub fn host_supported_vgpu_range(&self) -> VgpuVersion {
        VgpuVersion::from(self.raw.hostSupportedVgpuRange)
    }

    pub fn opaque_data(&self) -> &[u8] {
        &self.opaque_data
    }

    pub fn as_raw(&self) -> &nvmlVgpuPgpuMetadata_t {
        &self.raw
    }
}

impl Default for VgpuPgpuMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VgpuPgpuMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VgpuPgpuMetadata")
            .field("version", &self.raw.version)
            .field("revision", &self.raw.revision)
            .field("opaque_data_len", &self.opaque_data.len())
            .finish()
    }
}

/// A range of vGPU versions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VgpuVersion {
    pub min: u32,
    pub max: u32,
}

impl From<nvmlVgpuVersion_t> for VgpuVersion {
    fn from(struct_: nvmlVgpuVersion_t) -> Self {
        Self {
            min: struct_.minVersion,
            max: struct_.maxVersion,
        }
    }
}

/// Whether a vGPU can be migrated to, or resumed on, a physical GPU.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VgpuPgpuCompatibility {
    /// The VM states in which the vGPU is compatible.
    pub vm_compatibility: VgpuVmCompatibility,
    /// What limits compatibility, empty when nothing does.
    pub limits: VgpuCompatibilityLimit,
}

impl From<nvmlVgpuPgpuCompatibility_t> for VgpuPgpuCompatibility {
    fn from(struct_: nvmlVgpuPgpuCompatibility_t) -> Self {
        Self {
            vm_compatibility: VgpuVmCompatibility::from_bits_truncate(
                struct_.vgpuVmCompatibility,
            ),
            limits: VgpuCompatibilityLimit::from_bits_truncate(struct_.compatibilityLimitCode),
        }
    }
}

/// When a vGPU license expires.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VgpuLicenseExpiry {
    pub year: u32,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub min: u16,
    pub sec: u16,
    pub status: u8,
}

impl From<nvmlVgpuLicenseExpiry_t> for VgpuLicenseExpiry {
    fn from(struct_: nvmlVgpuLicenseExpiry_t) -> Self {
        Self {
            year: struct_.year,
            month: struct_.month,
            day: struct_.day,
            hour: struct_.hour,
            min: struct_.min,
            sec: struct_.sec,
            status: struct_.status,
        }
    }
}

/// License state of a vGPU instance.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VgpuLicenseInfo {
    pub is_licensed: bool,
    pub expiry: VgpuLicenseExpiry,
    pub current_state: u32,
}

impl From<nvmlVgpuLicenseInfo_t> for VgpuLicenseInfo {
    fn from(struct_: nvmlVgpuLicenseInfo_t) -> Self {
        Self {
            is_licensed: struct_.isLicensed != 0,
            expiry: VgpuLicenseExpiry::from(struct_.licenseExpiry),
            current_state: struct_.currentState,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const OPAQUE: &[u8] = b"0123456789abcdefghij";

    /// Writes `OPAQUE` after the header once the buffer is big enough.
    unsafe fn fill_pgpu(buf: *mut nvmlVgpuPgpuMetadata_t, size: *mut c_uint) -> nvmlReturn_t {
        let header = nvmlVgpuPgpuMetadata_t::header_size();
        let needed = header + OPAQUE.len();

        if (*size as usize) < needed {
            *size = needed as c_uint;
            return nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE;
        }

        (*buf).version = 2;
        (*buf).hostSupportedVgpuRange = nvmlVgpuVersion_t {
            minVersion: 0x10,
            maxVersion: 0x20,
        };
        (*buf).opaqueDataSize = OPAQUE.len() as u32;
        ptr::copy_nonoverlapping(OPAQUE.as_ptr(), (buf as *mut u8).add(header), OPAQUE.len());
        nvmlReturn_enum_NVML_SUCCESS
    }

    #[test]
    fn header_sizes() {
        assert_eq!(nvmlVgpuMetadata_t::header_size(), mem::size_of::<nvmlVgpuMetadata_t>() - 4);
        assert_eq!(
            nvmlVgpuPgpuMetadata_t::header_size(),
            mem::size_of::<nvmlVgpuPgpuMetadata_t>() - 4
        );
    }

    #[test]
    fn buffer_grows_until_opaque_data_fits() {
        let mut calls = 0;
        let (raw, opaque) = unsafe {
            read_with_opaque_data(|buf, size| {
                calls += 1;
                fill_pgpu(buf, size)
            })
        }
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(opaque, OPAQUE);

        let metadata = VgpuPgpuMetadata::from_parts(raw, opaque);
        assert_eq!(metadata.version(), 2);
        assert_eq!(metadata.host_supported_vgpu_range(), VgpuVersion { min: 0x10, max: 0x20 });
    }

    #[test]
    fn doubling_without_a_size_hint() {
        let mut sizes = Vec::new();
        let res = unsafe {
            read_with_opaque_data::<nvmlVgpuMetadata_t, _>(|_, size| {
                sizes.push(*size as usize - nvmlVgpuMetadata_t::header_size());
                if sizes.len() < 4 {
                    nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE
                } else {
                    nvmlReturn_enum_NVML_ERROR_NOT_SUPPORTED
                }
            })
        };

        assert_eq!(sizes, [4, 8, 16, 32]);
        assert!(matches!(res, Err(NvmlError::NotSupported)));
    }

    #[test]
    fn growth_stops_at_the_cap() {
        let mut sizes = Vec::new();
        let res = unsafe {
            read_with_opaque_data::<nvmlVgpuMetadata_t, _>(|_, size| {
                sizes.push(*size as usize - nvmlVgpuMetadata_t::header_size());
                *size = c_uint::MAX;
                nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE
            })
        };

        assert_eq!(sizes, [INLINE_OPAQUE_DATA, MAX_OPAQUE_DATA]);
        assert!(matches!(
            res,
            Err(NvmlError::InsufficientSize(Some(size))) if size == c_uint::MAX as usize
        ));
    }

    #[test]
    fn opaque_data_is_laid_out_again() {
        let (raw, opaque) =
            unsafe { read_with_opaque_data(|buf, size| fill_pgpu(buf, size)) }.unwrap();

        let (size, tail) = unsafe {
            with_opaque_data(&raw, &opaque, |ptr| {
                let size = (*ptr).opaqueDataSize as usize;
                let start = (ptr as *const u8).add(nvmlVgpuPgpuMetadata_t::header_size());
                (size, slice::from_raw_parts(start, size).to_vec())
            })
        };

        assert_eq!(size, OPAQUE.len());
        assert_eq!(tail, OPAQUE);
    }

    #[test]
    fn compatibility_flags() {
        let compat = VgpuPgpuCompatibility::from(nvmlVgpuPgpuCompatibility_t {
            vgpuVmCompatibility: 0x1 | 0x8,
            compatibilityLimitCode: 0x80000000,
        });

        assert_eq!(
            compat.vm_compatibility,
            VgpuVmCompatibility::COLD | VgpuVmCompatibility::LIVE
        );
        assert_eq!(compat.limits, VgpuCompatibilityLimit::OTHER);
    }

    #[test]
    fn driver_versions() {
        let mut metadata = VgpuMetadata::new();
        for (dst, src) in metadata.raw.hostDriverVersion.iter_mut().zip(b"550.54.14") {
            *dst = *src as std::os::raw::c_char;
        }

        assert_eq!(metadata.host_driver_version().unwrap(), "550.54.14");
        assert_eq!(metadata.guest_driver_version().unwrap(), "");
        assert_eq!(
            metadata.guest_info_state().unwrap(),
            VgpuGuestInfoState::Uninitialized
        );
    }
}
