/*!
Opens a shared library by name and load flags, probes it for exported symbols
and closes it again.

This is the loader that both the NVML and the CUDA bindings sit on. It wraps
[`libloading`][libloading] so that callers can pass the same `RTLD_*` flags
they would hand to `dlopen`, and it exposes the [`Library`] trait so that
sessions built on top of it can be driven by a mock in tests.

```no_run
use nvml_dl::{DynamicLibrary, Library, RTLD_GLOBAL, RTLD_LAZY};
# fn main() -> Result<(), nvml_dl::DlError> {
let mut lib = DynamicLibrary::new("libnvidia-ml.so.1", RTLD_LAZY | RTLD_GLOBAL);
lib.open()?;
lib.lookup("nvmlInit_v2")?;
lib.close()?;
# Ok(())
# }
```

## Threads

Some dynamic loaders keep per-thread error state (`dlerror`) that must be read
on the thread that made the failing call. Every operation here runs to
completion on the calling OS thread without yielding, so that state is never
observed from another thread.

[libloading]: https://docs.rs/libloading
*/

use std::ffi::{c_void, OsStr, OsString};
use std::os::raw::c_int;

use thiserror::Error;

mod versioned;

pub use crate::versioned::{newest_available, symbol_version, VersionedSymbol};

/// The underlying loader error carried as the source of a [`DlError`].
pub use libloading::Error as LoaderError;

#[cfg(unix)]
pub use libc::{RTLD_GLOBAL, RTLD_LAZY, RTLD_LOCAL, RTLD_NOW};

#[cfg(target_os = "linux")]
pub use libc::{RTLD_NODELETE, RTLD_NOLOAD};

#[cfg(all(target_os = "linux", target_env = "gnu"))]
pub use libc::RTLD_DEEPBIND;

// Load flags are meaningless on Windows; keep the names so callers can share
// one set of constants across platforms.
#[cfg(not(unix))]
pub const RTLD_LAZY: c_int = 0x1;
#[cfg(not(unix))]
pub const RTLD_NOW: c_int = 0x2;
#[cfg(not(unix))]
pub const RTLD_GLOBAL: c_int = 0x100;
#[cfg(not(unix))]
pub const RTLD_LOCAL: c_int = 0;

#[derive(Error, Debug)]
pub enum DlError {
    #[error("error opening {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: libloading::Error,
    },
    #[error("error looking up {symbol}: {source}")]
    SymbolNotFound {
        symbol: String,
        #[source]
        source: libloading::Error,
    },
    #[error("{name} is not open")]
    NotOpen { name: String },
    #[error("error closing {name}: {source}")]
    Close {
        name: String,
        #[source]
        source: libloading::Error,
    },
}

/**
Operations a loaded library session needs from the OS loader.

[`DynamicLibrary`] is the real implementation. Tests substitute their own to
decide which symbols "exist" without touching the filesystem.
*/
pub trait Library: Send + Sync {
    /// Load the library. Opening an already open library is a no-op.
    fn open(&mut self) -> Result<(), DlError>;

    /// Unload the library. Closing a closed library is a no-op.
    fn close(&mut self) -> Result<(), DlError>;

    /// Resolve `symbol` to its address in the loaded library.
    fn symbol(&self, symbol: &str) -> Result<*mut c_void, DlError>;

    /// Check whether `symbol` is exported without using it.
    fn lookup(&self, symbol: &str) -> Result<(), DlError> {
        self.symbol(symbol).map(|_| ())
    }
}

/// A shared library identified by name and `dlopen` flags.
#[derive(Debug)]
pub struct DynamicLibrary {
    name: OsString,
    flags: c_int,
    handle: Option<libloading::Library>,
}

impl DynamicLibrary {
    /// Describe a library to load. Nothing is opened until [`Library::open`].
    pub fn new(name: impl AsRef<OsStr>, flags: c_int) -> Self {
        Self {
            name: name.as_ref().to_os_string(),
            flags,
            handle: None,
        }
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn flags(&self) -> c_int {
        self.flags
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }
}

impl Library for DynamicLibrary {
    fn open(&mut self) -> Result<(), DlError> {
        if self.handle.is_some() {
            return Ok(());
        }

        log::debug!(
            "opening {} with flags {:#x}",
            self.display_name(),
            self.flags
        );

        // SAFETY: running the library's initialisers is inherent to loading
        // it; the libraries opened here have no unsound constructors.
        let handle = unsafe { open_library(&self.name, self.flags) }.map_err(|source| {
            DlError::Open {
                name: self.display_name(),
                source,
            }
        })?;

        self.handle = Some(handle);
        Ok(())
    }

    fn close(&mut self) -> Result<(), DlError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        log::debug!("closing {}", self.display_name());

        handle.close().map_err(|source| DlError::Close {
            name: self.display_name(),
            source,
        })
    }

    fn symbol(&self, symbol: &str) -> Result<*mut c_void, DlError> {
        let handle = self.handle.as_ref().ok_or_else(|| DlError::NotOpen {
            name: self.display_name(),
        })?;

        // SAFETY: the symbol is only read as an address here. Callers that
        // turn it into a function pointer are responsible for its signature.
        unsafe {
            let sym: libloading::Symbol<*mut c_void> =
                handle
                    .get(symbol.as_bytes())
                    .map_err(|source| DlError::SymbolNotFound {
                        symbol: symbol.to_owned(),
                        source,
                    })?;

            Ok(*sym)
        }
    }
}

#[cfg(unix)]
unsafe fn open_library(
    name: &OsStr,
    flags: c_int,
) -> Result<libloading::Library, libloading::Error> {
    libloading::os::unix::Library::open(Some(name), flags).map(Into::into)
}

#[cfg(not(unix))]
unsafe fn open_library(
    name: &OsStr,
    _flags: c_int,
) -> Result<libloading::Library, libloading::Error> {
    libloading::Library::new(name)
}

#[cfg(test)]
#[cfg(all(target_os = "linux", target_env = "gnu"))]
mod test {
    use super::*;

    const LIBC: &str = "libc.so.6";

    #[test]
    fn open_and_close() {
        let mut lib = DynamicLibrary::new(LIBC, RTLD_LAZY | RTLD_GLOBAL);
        lib.open().expect("opened libc");
        assert!(lib.is_open());
        lib.close().expect("closed libc");
        assert!(!lib.is_open());
    }

    #[test]
    fn open_twice_keeps_handle() {
        let mut lib = DynamicLibrary::new(LIBC, RTLD_LAZY);
        lib.open().expect("first open");
        let first = lib.symbol("malloc").expect("malloc");
        lib.open().expect("second open");
        let second = lib.symbol("malloc").expect("malloc");
        assert_eq!(first, second);
    }

    #[test]
    fn open_missing_library() {
        let mut lib = DynamicLibrary::new("bogus.so.1", RTLD_LAZY);
        match lib.open() {
            Err(DlError::Open { name, .. }) => assert_eq!(name, "bogus.so.1"),
            other => panic!("expected an open error, got {:?}", other),
        }
        assert!(!lib.is_open());
    }

    #[test]
    fn lookup() {
        let mut lib = DynamicLibrary::new(LIBC, RTLD_LAZY);
        lib.open().expect("opened libc");

        lib.lookup("malloc").expect("malloc is exported");
        assert!(matches!(
            lib.lookup("bogus"),
            Err(DlError::SymbolNotFound { symbol, .. }) if symbol == "bogus"
        ));
    }

    #[test]
    fn lookup_before_open() {
        let lib = DynamicLibrary::new(LIBC, RTLD_LAZY);
        assert!(matches!(lib.lookup("malloc"), Err(DlError::NotOpen { .. })));
    }

    #[test]
    fn close_is_idempotent() {
        let mut lib = DynamicLibrary::new(LIBC, RTLD_LAZY);
        lib.close().expect("close without open");
        lib.open().expect("opened libc");
        lib.close().expect("first close");
        lib.close().expect("second close");
    }
}
