/*!
The load state of the CUDA driver library.

Loads are reference counted the same way as NVML's: the first load opens
`libcuda` and resolves the entry point table, later loads share it, and the
last close unloads it.
*/

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::os::raw::c_int;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use nvml_dl::{DlError, DynamicLibrary, RTLD_GLOBAL, RTLD_LAZY};
use static_assertions::assert_impl_all;
use thiserror::Error;

use crate::sys::CudaLib;

#[cfg(not(target_os = "windows"))]
pub const DEFAULT_LIB_PATH: &str = "libcuda.so.1";
#[cfg(target_os = "windows")]
pub const DEFAULT_LIB_PATH: &str = "nvcuda.dll";

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error(transparent)]
    Dl(#[from] DlError),
    #[error("the CUDA driver library is not loaded")]
    NotLoaded,
    #[error("the CUDA driver library is already loaded")]
    AlreadyLoaded,
}

/// Where to load the CUDA driver from and how.
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
    entry_points: Option<Arc<CudaLib>>,
}

/// A reference counted CUDA driver library session.
pub struct Library {
    state: Mutex<State>,
    factory: Factory,
}

assert_impl_all!(Library: Send, Sync);

impl Library {
    pub fn new(options: LibraryOptions) -> Self {
        Self::with_factory(options, |options| {
            Box::new(DynamicLibrary::new(&options.path, options.flags))
        })
    }

    /// A session that gets its loader from `factory` on every first load.
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

    pub fn refcount(&self) -> usize {
        self.state().refcount
    }

    pub fn is_loaded(&self) -> bool {
        self.refcount() > 0
    }

    /**
    Load the library, or take another reference to the loaded one.

    # Errors

    * `Dl`, if the library could not be opened; the session stays unloaded
    */
    pub fn load(&self) -> Result<Arc<CudaLib>, LibraryError> {
        let mut state = self.state();

        if let Some(entry_points) = state.entry_points.clone() {
            state.refcount += 1;
            log::debug!("library refcount {}", state.refcount);
            return Ok(entry_points);
        }

        let mut dl = (self.factory)(&state.options);
        dl.open()?;

        let entry_points = Arc::new(CudaLib::resolve(&*dl));
        let unresolved = entry_points.unresolved();
        if !unresolved.is_empty() {
            log::debug!("CUDA symbols not exported: {}", unresolved.join(", "));
        }

        state.dl = Some(dl);
        state.entry_points = Some(entry_points.clone());
        state.refcount = 1;
        log::debug!("loaded {}", state.options.path.to_string_lossy());

        Ok(entry_points)
    }

    /**
    Drop one reference, unloading the library when it was the last.

    Closing an unloaded library does nothing.

    # Errors

    * `Dl`, if unloading failed; the library stays loaded with one reference
    */
    pub fn close(&self) -> Result<(), LibraryError> {
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{mock_library, MockLibrary};
    use std::sync::atomic::Ordering;

    #[test]
    fn default_path() {
        assert_eq!(LibraryOptions::default().path, OsString::from(DEFAULT_LIB_PATH));
        assert_eq!(LibraryOptions::default().flags, RTLD_LAZY | RTLD_GLOBAL);
    }

    #[test]
    fn refcounted_load_and_close() {
        let mock = MockLibrary::new();
        let library = mock_library(&mock);

        let first = library.load().unwrap();
        let second = library.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(mock.calls().opens.load(Ordering::SeqCst), 1);

        library.close().unwrap();
        assert!(library.is_loaded());
        library.close().unwrap();
        assert!(!library.is_loaded());
        library.close().unwrap();

        assert_eq!(mock.calls().closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_open_stays_unloaded() {
        let library = mock_library(&MockLibrary::new().fail_open());

        assert!(matches!(library.load(), Err(LibraryError::Dl(DlError::Open { .. }))));
        assert_eq!(library.refcount(), 0);
    }

    #[test]
    fn failed_close_keeps_last_reference() {
        let library = mock_library(&MockLibrary::new().fail_close());

        library.load().unwrap();
        assert!(library.close().is_err());
        assert_eq!(library.refcount(), 1);
    }

    #[test]
    fn options_are_fixed_while_loaded() {
        let library = mock_library(&MockLibrary::new());

        library.load().unwrap();
        assert!(matches!(
            library.set_options(LibraryOptions::with_path("elsewhere.so")),
            Err(LibraryError::AlreadyLoaded)
        ));
    }
}
