use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nvml_dl::{DlError, LoaderError};

use crate::library::{Library, LibraryOptions};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Default)]
pub struct MockCalls {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
}

/// A loader exporting `extern "C"` fakes from the test binary.
#[derive(Debug, Clone)]
pub struct MockLibrary {
    symbols: HashMap<&'static str, usize>,
    open: bool,
    fail_open: bool,
    fail_close: bool,
    calls: Arc<MockCalls>,
}

impl MockLibrary {
    /// A driver with one 8 GiB device.
    pub fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            open: false,
            fail_open: false,
            fail_close: false,
            calls: Arc::new(MockCalls::default()),
        }
        .export("cuInit", fake::init as usize)
        .export("cuDriverGetVersion", fake::driver_get_version as usize)
        .export("cuDeviceGetCount", fake::device_get_count as usize)
        .export("cuDeviceGet", fake::device_get as usize)
        .export("cuDeviceGetName", fake::device_get_name as usize)
        .export("cuDeviceTotalMem_v2", fake::device_total_mem as usize)
    }

    pub fn export(mut self, symbol: &'static str, address: usize) -> Self {
        self.symbols.insert(symbol, address);
        self
    }

    pub fn without(mut self, symbol: &str) -> Self {
        self.symbols.remove(symbol);
        self
    }

    pub fn fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn calls(&self) -> &MockCalls {
        &self.calls
    }
}

impl nvml_dl::Library for MockLibrary {
    fn open(&mut self) -> Result<(), DlError> {
        if self.fail_open {
            return Err(DlError::Open {
                name: "mock".into(),
                source: LoaderError::DlOpenUnknown,
            });
        }

        if !self.open {
            self.open = true;
            self.calls.opens.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DlError> {
        if !self.open {
            return Ok(());
        }

        if self.fail_close {
            return Err(DlError::Close {
                name: "mock".into(),
                source: LoaderError::DlCloseUnknown,
            });
        }

        self.open = false;
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn symbol(&self, symbol: &str) -> Result<*mut c_void, DlError> {
        if !self.open {
            return Err(DlError::NotOpen {
                name: "mock".into(),
            });
        }

        self.symbols
            .get(symbol)
            .map(|address| *address as *mut c_void)
            .ok_or_else(|| DlError::SymbolNotFound {
                symbol: symbol.to_owned(),
                source: LoaderError::DlSymUnknown,
            })
    }
}

/// A session backed by clones of `mock`, sharing its call counters.
pub fn mock_library(mock: &MockLibrary) -> Arc<Library> {
    init_logging();
    let mock = mock.clone();

    Arc::new(Library::with_factory(LibraryOptions::default(), move |_| {
        Box::new(mock.clone())
    }))
}

pub mod fake {
    use crate::sys::*;
    use std::os::raw::{c_char, c_int, c_uint};

    pub const TOTAL_MEM: usize = 8 << 30;

    pub extern "C" fn init(flags: c_uint) -> CUresult {
        if flags == 0 {
            CUDA_SUCCESS
        } else {
            CUDA_ERROR_INVALID_VALUE
        }
    }

    pub unsafe extern "C" fn driver_get_version(version: *mut c_int) -> CUresult {
        *version = 12040;
        CUDA_SUCCESS
    }

    pub unsafe extern "C" fn device_get_count(count: *mut c_int) -> CUresult {
        *count = 1;
        CUDA_SUCCESS
    }

    pub unsafe extern "C" fn device_get(device: *mut CUdevice, ordinal: c_int) -> CUresult {
        if ordinal != 0 {
            return CUDA_ERROR_INVALID_DEVICE;
        }

        *device = 0;
        CUDA_SUCCESS
    }

    pub unsafe extern "C" fn device_get_name(
        name: *mut c_char,
        len: c_int,
        _device: CUdevice,
    ) -> CUresult {
        let text = b"Mock CUDA GPU\0";
        if (len as usize) < text.len() {
            return CUDA_ERROR_INVALID_VALUE;
        }

        std::ptr::copy_nonoverlapping(text.as_ptr() as *const c_char, name, text.len());
        CUDA_SUCCESS
    }

    pub unsafe extern "C" fn device_total_mem(bytes: *mut usize, _device: CUdevice) -> CUresult {
        *bytes = TOTAL_MEM;
        CUDA_SUCCESS
    }
}
