/*!
A minimal CUDA driver API over a dynamically loaded `libcuda`, sharing its
loader with the NVML binding. Nothing links against the driver at build time.

```no_run
use cuda_driver::Cuda;
# fn main() -> Result<(), cuda_driver::error::CudaError> {
let cuda = Cuda::init()?;
let device = cuda.device_get(0)?;
println!("{}: {} bytes", cuda.device_get_name(device)?, cuda.device_total_mem(device)?);
# Ok(())
# }
```
*/

pub mod error;
pub mod library;
pub mod sys;
#[cfg(test)]
mod test_utils;

use std::mem::{self, ManuallyDrop};
use std::os::raw::{c_char, c_int};
use std::sync::Arc;

use static_assertions::assert_impl_all;

use crate::error::{cuda_sym, cuda_try, CudaError};
pub use crate::library::{Library, LibraryOptions};
use crate::sys::{CUdevice, CudaLib};

/// Longest device name read back from the driver.
const NAME_BUFFER_SIZE: usize = 256;

/**
A loaded CUDA driver.

Holds one reference to its [`Library`] session, released on drop or by
[`Cuda::shutdown`].
*/
pub struct Cuda {
    library: ManuallyDrop<Arc<Library>>,
    lib: ManuallyDrop<Arc<CudaLib>>,
}

assert_impl_all!(Cuda: Send, Sync);

impl Cuda {
    /// Load the process-wide driver library and call `cuInit(0)`.
    pub fn init() -> Result<Self, CudaError> {
        Self::init_with_library(Library::default_instance())
    }

    /// Load `library` and call `cuInit(0)`.
    pub fn init_with_library(library: Arc<Library>) -> Result<Self, CudaError> {
        let cuda = Self::load(library)?;
        cuda.init_driver(0)?;

        Ok(cuda)
    }

    /// Take a reference to `library`, loading it if needed, without calling `cuInit`.
    pub fn load(library: Arc<Library>) -> Result<Self, CudaError> {
        let lib = library.load()?;

        Ok(Self {
            library: ManuallyDrop::new(library),
            lib: ManuallyDrop::new(lib),
        })
    }

    /**
    Release this reference to the library, reporting any error
    (*the `Drop` implementation ignores errors!*).
    */
    pub fn shutdown(mut self) -> Result<(), CudaError> {
        // SAFETY: `self` is forgotten right after, so `Drop` never sees either field
        let (lib, library) = unsafe {
            (
                ManuallyDrop::take(&mut self.lib),
                ManuallyDrop::take(&mut self.library),
            )
        };
        mem::forget(self);
        drop(lib);

        Ok(library.close()?)
    }

    /// Calls `cuInit`. `flags` must be 0.
    #[doc(alias = "cuInit")]
    pub fn init_driver(&self, flags: u32) -> Result<(), CudaError> {
        let sym = cuda_sym(&self.lib.init)?;

        unsafe { cuda_try(sym(flags)) }
    }

    /// The driver's CUDA version, as `1000 * major + 10 * minor`.
    #[doc(alias = "cuDriverGetVersion")]
    pub fn driver_get_version(&self) -> Result<i32, CudaError> {
        let sym = cuda_sym(&self.lib.driver_get_version)?;

        unsafe {
            let mut version: c_int = 0;
            cuda_try(sym(&mut version))?;

            Ok(version)
        }
    }

    #[doc(alias = "cuDeviceGetCount")]
    pub fn device_get_count(&self) -> Result<i32, CudaError> {
        let sym = cuda_sym(&self.lib.device_get_count)?;

        unsafe {
            let mut count: c_int = 0;
            cuda_try(sym(&mut count))?;

            Ok(count)
        }
    }

    /// The device handle for `ordinal`.
    #[doc(alias = "cuDeviceGet")]
    pub fn device_get(&self, ordinal: i32) -> Result<CUdevice, CudaError> {
        let sym = cuda_sym(&self.lib.device_get)?;

        unsafe {
            let mut device: CUdevice = 0;
            cuda_try(sym(&mut device, ordinal))?;

            Ok(device)
        }
    }

    #[doc(alias = "cuDeviceGetName")]
    pub fn device_get_name(&self, device: CUdevice) -> Result<String, CudaError> {
        let sym = cuda_sym(&self.lib.device_get_name)?;

        unsafe {
            let mut name = vec![0 as c_char; NAME_BUFFER_SIZE];
            cuda_try(sym(name.as_mut_ptr(), NAME_BUFFER_SIZE as c_int, device))?;

            let bytes: Vec<u8> = name
                .into_iter()
                .take_while(|c| *c != 0)
                .map(|c| c as u8)
                .collect();
            Ok(std::str::from_utf8(&bytes)?.to_owned())
        }
    }

    /// Total memory on `device`, in bytes.
    #[doc(alias = "cuDeviceTotalMem_v2")]
    pub fn device_total_mem(&self, device: CUdevice) -> Result<usize, CudaError> {
        let sym = cuda_sym(&self.lib.device_total_mem)?;

        unsafe {
            let mut bytes: usize = 0;
            cuda_try(sym(&mut bytes, device))?;

            Ok(bytes)
        }
    }
}

impl Drop for Cuda {
    fn drop(&mut self) {
        // SAFETY: called after the last usage of either field
        unsafe {
            ManuallyDrop::drop(&mut self.lib);
            if let Err(e) = self.library.close() {
                log::warn!("closing the CUDA driver failed: {}", e);
            }
            ManuallyDrop::drop(&mut self.library);
        }
    }
}

impl std::fmt::Debug for Cuda {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cuda").field("library", &*self.library).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn device_queries() {
        let cuda = Cuda::init_with_library(mock_library(&MockLibrary::new())).unwrap();

        assert_eq!(cuda.driver_get_version().unwrap(), 12040);
        assert_eq!(cuda.device_get_count().unwrap(), 1);

        let device = cuda.device_get(0).unwrap();
        assert_eq!(cuda.device_get_name(device).unwrap(), "Mock CUDA GPU");
        assert_eq!(cuda.device_total_mem(device).unwrap(), fake::TOTAL_MEM);

        assert!(matches!(cuda.device_get(3), Err(CudaError::InvalidDevice)));
    }

    #[test]
    fn init_flags_are_passed_through() {
        let cuda = Cuda::load(mock_library(&MockLibrary::new())).unwrap();
        assert!(matches!(cuda.init_driver(1), Err(CudaError::InvalidValue)));
    }

    #[test]
    fn missing_total_mem_entry_point() {
        let cuda = Cuda::init_with_library(mock_library(
            &MockLibrary::new().without("cuDeviceTotalMem_v2"),
        ))
        .unwrap();

        match cuda.device_total_mem(0) {
            Err(CudaError::FailedToLoadSymbol(symbol)) => assert_eq!(symbol, "cuDeviceTotalMem_v2"),
            other => panic!("expected a missing symbol, got {:?}", other),
        }
    }

    #[test]
    fn sessions_share_one_load() {
        let mock = MockLibrary::new();
        let library = mock_library(&mock);

        let first = Cuda::init_with_library(library.clone()).unwrap();
        let second = Cuda::init_with_library(library.clone()).unwrap();
        assert_eq!(library.refcount(), 2);

        drop(first);
        second.shutdown().unwrap();
        assert!(!library.is_loaded());
        assert_eq!(mock.calls().opens.load(Ordering::SeqCst), 1);
        assert_eq!(mock.calls().closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[ignore = "requires the CUDA driver"]
    fn real_driver() {
        let cuda = Cuda::init().expect("loaded");
        assert!(cuda.device_get_count().expect("count") >= 0);
    }
}
