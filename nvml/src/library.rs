/*!
The load state of the NVML shared library.

A [`Library`] owns the OS handle of one NVML library and the entry point table
resolved from it. Every [`crate::Nvml`] session loads through a `Library`, and
loads are reference counted: the first load opens the library and resolves
every entry point, later loads share that table, and only the last close
unloads it.
*/

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::os::raw::c_int;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use nvml_dl::{DlError, DynamicLibrary, RTLD_GLOBAL, RTLD_LAZY};
use static_assertions::assert_impl_all;
use thiserror::Error;

use crate::ffi::bindings::NvmlLib;

/// The file name NVML is loaded from unless overridden.
#[cfg(not(target_os = "windows"))]
pub const DEFAULT_LIB_PATH: &str = "libnvidia-ml.so.1";
#[cfg(target_os = "windows")]
pub const DEFAULT_LIB_PATH: &str = "nvml.dll";

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error(transparent)]
    Dl(#[from] DlError),
    #[error("the NVML library is not loaded")]
    NotLoaded,
    #[error("the NVML library is already loaded")]
    AlreadyLoaded,
}

/// Where to load NVML from and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOptions {
    pub path: OsString,
    /// `dlopen` flags, ignored on Windows.
    pub flags: c_int,
}

impl LibraryOptions {
    pub fn with_path(path: impl AsRef<OsStr>) -> Self {
        Self {
            path: path.as_ref().to_os_string(),
            ..Self::default()
        }
    }
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            path: DEFAULT_LIB_PATH.into(),
            flags: RTLD_LAZY | RTLD_GLOBAL,
        }
    }
}

type Factory = Box<dyn Fn(&LibraryOptions) -> Box<dyn nvml_dl::Library> + Send + Sync>;

struct State {
    options: LibraryOptions,
    dl: Option<Box<dyn nvml_dl::Library>>,
    refcount: usize,
    entry_points: Option<Arc<NvmlLib>>,
}

/**
A reference counted NVML library session.

Use [`Library::default_instance`] for the process-wide library that
[`crate::Nvml::init`] loads, or create independent sessions with
[`Library::new`].

Load and close take an internal lock, so concurrent callers serialise. Calls
into NVML itself take no lock: they go through the resolved entry point table,
which never changes while the library is loaded.
*/
pub struct Library {
    state: Mutex<State>,
    factory: Factory,
}

assert_impl_all!(Library: Send, Sync);

impl Library {
    /// A session that opens NVML from disk with `options`.
    pub fn new(options: LibraryOptions) -> Self {
        Self::with_factory(options, |options| {
            Box::new(DynamicLibrary::new(&options.path, options.flags))
        })
    }

    /**
    A session that gets its loader from `factory` on every first load.

    Tests use this to substitute a loader that never touches the filesystem.
    */
    pub fn with_factory<F>(options: LibraryOptions, factory: F) -> Self
    where
        F: Fn(&LibraryOptions) -> Box<dyn nvml_dl::Library> + Send + Sync + 'static,
    {
        Self {
            state: Mutex::new(State {
                options,
                dl: None,
                refcount: 0,
                entry_points: None,
            }),
            factory: Box::new(factory),
        }
    }

    /// The process-wide library, created on first use with default options.
    pub fn default_instance() -> Arc<Library> {
        static DEFAULT: OnceLock<Arc<Library>> = OnceLock::new();

        DEFAULT
            .get_or_init(|| Arc::new(Library::new(LibraryOptions::default())))
            .clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn options(&self) -> LibraryOptions {
        self.state().options.clone()
    }

    /**
    Replace the options used by the next load.

    # Errors

    * `AlreadyLoaded`, if the library is currently loaded
    */
    pub fn set_options(&self, options: LibraryOptions) -> Result<(), LibraryError> {
        let mut state = self.state();
        if state.refcount > 0 {
            return Err(LibraryError::AlreadyLoaded);
        }

        state.options = options;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.state().refcount > 0
    }

    /// Outstanding loads not yet matched by a close.
    pub fn refcount(&self) -> usize {
        self.state().refcount
    }

    /**
    Check whether the loaded library exports `symbol`.

    # Errors

    * `NotLoaded`, if nothing is loaded
    * `Dl`, if the symbol is not exported
    */
    pub fn lookup(&self, symbol: &str) -> Result<(), LibraryError> {
        let state = self.state();
        let dl = state.dl.as_ref().ok_or(LibraryError::NotLoaded)?;

        dl.lookup(symbol)?;
        Ok(())
    }

    /// The resolved entry point table, if loaded.
    pub fn entry_points(&self) -> Option<Arc<NvmlLib>> {
        self.state().entry_points.clone()
    }

    /**
    Load the library, or take another reference to the loaded one.

    Only the first load opens the library and resolves the entry point table.
    A failed open leaves the session unloaded.
    */
    pub(crate) fn load(&self) -> Result<Arc<NvmlLib>, LibraryError> {
        let mut state = self.state();

        if let Some(entry_points) = state.entry_points.clone() {
            state.refcount += 1;
            log::debug!("library refcount {}", state.refcount);
            return Ok(entry_points);
        }

        let mut dl = (self.factory)(&state.options);
        dl.open()?;

        let entry_points = Arc::new(NvmlLib::resolve(&*dl));
        let unresolved = entry_points.unresolved();
        if !unresolved.is_empty() {
            log::debug!("{} NVML symbols are not exported", unresolved.len());
        }

        state.dl = Some(dl);
        state.entry_points = Some(entry_points.clone());
        state.refcount = 1;
        log::debug!("loaded {}", state.options.path.to_string_lossy());

        Ok(entry_points)
    }

    /**
    Drop one reference, unloading the library when it was the last.

    Closing an unloaded library does nothing. If unloading fails the library
    stays loaded with one reference left.
    */
    pub(crate) fn close(&self) -> Result<(), LibraryError> {
        let mut state = self.state();

        match state.refcount {
            0 => Ok(()),
            1 => {
                if let Some(dl) = state.dl.as_mut() {
                    dl.close()?;
                }

                state.dl = None;
                state.entry_points = None;
                state.refcount = 0;
                log::debug!("closed {}", state.options.path.to_string_lossy());
                Ok(())
            }
            _ => {
                state.refcount -= 1;
                log::debug!("library refcount {}", state.refcount);
                Ok(())
            }
        }
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new(LibraryOptions::default())
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Library")
            .field("options", &state.options)
            .field("refcount", &state.refcount)
            .finish()
    }
}
