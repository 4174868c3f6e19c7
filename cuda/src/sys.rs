/*!
The slice of the CUDA driver ABI this crate calls, and the table of entry
points resolved from a loaded `libcuda`.
*/

use std::ffi::c_void;
use std::fmt;
use std::os::raw::{c_char, c_int, c_uint};

use nvml_dl::{Library, VersionedSymbol};
use static_assertions::assert_impl_all;

pub type CUresult = c_uint;
pub type CUdevice = c_int;

pub const CUDA_SUCCESS: CUresult = 0;
pub const CUDA_ERROR_INVALID_VALUE: CUresult = 1;
pub const CUDA_ERROR_OUT_OF_MEMORY: CUresult = 2;
pub const CUDA_ERROR_NOT_INITIALIZED: CUresult = 3;
pub const CUDA_ERROR_DEINITIALIZED: CUresult = 4;
pub const CUDA_ERROR_NO_DEVICE: CUresult = 100;
pub const CUDA_ERROR_INVALID_DEVICE: CUresult = 101;
pub const CUDA_ERROR_NOT_FOUND: CUresult = 500;
pub const CUDA_ERROR_NOT_SUPPORTED: CUresult = 801;
pub const CUDA_ERROR_UNKNOWN: CUresult = 999;

/// A function pointer bound to one exported symbol, or nothing.
#[derive(Clone, Copy)]
pub struct Symbol<F> {
    name: &'static str,
    func: Option<F>,
}

impl<F: Copy> Symbol<F> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> Option<F> {
        self.func
    }

    pub fn is_loaded(&self) -> bool {
        self.func.is_some()
    }
}

impl<F> fmt::Debug for Symbol<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name)
            .field("loaded", &self.func.is_some())
            .finish()
    }
}

fn bind<L, F>(lib: &L, name: &'static str, cast: fn(*mut c_void) -> F) -> Symbol<F>
where
    L: Library + ?Sized,
{
    let func = match lib.symbol(name) {
        Ok(addr) if !addr.is_null() => Some(cast(addr)),
        Ok(_) => None,
        Err(e) => {
            log::trace!("{}", e);
            None
        }
    };

    Symbol { name, func }
}

macro_rules! cast {
    (fn($($arg:ty),*)) => {
        |addr: *mut c_void| {
            // SAFETY: the pointer type matches the declaration in cuda.h
            unsafe {
                std::mem::transmute::<*mut c_void, unsafe extern "C" fn($($arg),*) -> CUresult>(addr)
            }
        }
    };
}

/// Every CUDA driver entry point this crate calls.
#[derive(Debug, Clone)]
pub struct CudaLib {
    pub init: Symbol<unsafe extern "C" fn(c_uint) -> CUresult>,
    pub driver_get_version: Symbol<unsafe extern "C" fn(*mut c_int) -> CUresult>,
    pub device_get_count: Symbol<unsafe extern "C" fn(*mut c_int) -> CUresult>,
    pub device_get: Symbol<unsafe extern "C" fn(*mut CUdevice, c_int) -> CUresult>,
    pub device_get_name: Symbol<unsafe extern "C" fn(*mut c_char, c_int, CUdevice) -> CUresult>,
    /// `cuDeviceTotalMem` is a macro for `_v2` in every supported `cuda.h`.
    pub device_total_mem: Symbol<unsafe extern "C" fn(*mut usize, CUdevice) -> CUresult>,
}

assert_impl_all!(CudaLib: Send, Sync);

impl CudaLib {
    /// Logical operations with more than one exported revision. None yet.
    pub const VERSIONED: &'static [VersionedSymbol] = &[];

    /// Bind every entry point against `lib`, which must already be open.
    pub fn resolve<L: Library + ?Sized>(lib: &L) -> Self {
        for versioned in Self::VERSIONED {
            log::debug!("{} resolved to {}", versioned.name, versioned.resolve(lib));
        }

        Self {
            init: bind(lib, "cuInit", cast!(fn(c_uint))),
            driver_get_version: bind(lib, "cuDriverGetVersion", cast!(fn(*mut c_int))),
            device_get_count: bind(lib, "cuDeviceGetCount", cast!(fn(*mut c_int))),
            device_get: bind(lib, "cuDeviceGet", cast!(fn(*mut CUdevice, c_int))),
            device_get_name: bind(lib, "cuDeviceGetName", cast!(fn(*mut c_char, c_int, CUdevice))),
            device_total_mem: bind(lib, "cuDeviceTotalMem_v2", cast!(fn(*mut usize, CUdevice))),
        }
    }

    /// Symbols that could not be bound.
    pub fn unresolved(&self) -> Vec<&'static str> {
        [
            (self.init.name(), self.init.is_loaded()),
            (self.driver_get_version.name(), self.driver_get_version.is_loaded()),
            (self.device_get_count.name(), self.device_get_count.is_loaded()),
            (self.device_get.name(), self.device_get.is_loaded()),
            (self.device_get_name.name(), self.device_get_name.is_loaded()),
            (self.device_total_mem.name(), self.device_total_mem.is_loaded()),
        ]
        .into_iter()
        .filter(|(_, loaded)| !loaded)
        .map(|(name, _)| name)
        .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::MockLibrary;

    #[test]
    fn unexported_symbols_stay_unbound() {
        let mut lib = MockLibrary::new().without("cuDeviceTotalMem_v2");
        lib.open().unwrap();

        let table = CudaLib::resolve(&lib);
        assert!(table.init.is_loaded());
        assert_eq!(table.unresolved(), vec!["cuDeviceTotalMem_v2"]);
    }

    #[test]
    fn nothing_is_versioned_yet() {
        assert!(CudaLib::VERSIONED.is_empty());
    }
}
