use crate::ffi::bindings::*;
use crate::library::LibraryError;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Bits {
    U32(u32),
    U64(u64),
}

/// An `NvmlError` with an optionally present source error for chaining errors
#[derive(Error, Debug)]
#[error("{error}")]
pub struct NvmlErrorWithSource {
    pub error: NvmlError,
    pub source: Option<NvmlError>,
}

impl From<NvmlError> for NvmlErrorWithSource {
    fn from(error: NvmlError) -> Self {
        Self {
            error,
            source: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum NvmlError {
    #[error("could not interpret string as utf-8")]
    Utf8Error(#[from] std::str::Utf8Error),
    #[error("nul byte inside string")]
    NulError(#[from] std::ffi::NulError),

    /// Loading or unloading the shared library failed.
    #[error(transparent)]
    Library(#[from] LibraryError),

    /**
    A function symbol is not exported by the loaded library.

    The single field is the name of the symbol the entry point was bound to.
    */
    #[error("function symbol failed to load: {0}")]
    FailedToLoadSymbol(String),

    #[error("max string length was {max_len} but string length is {actual_len}")]
    StringTooLong { max_len: usize, actual_len: usize },

    #[error("invalid combination of bits ({0:?}) when trying to interpret as bitflags")]
    IncorrectBits(Bits),

    /**
    An unexpected enum variant was encountered.

    Used when a C call hands back a value with no counterpart in these
    bindings, including return codes newer than this crate.
    */
    #[error("unexpected enum variant value: {0}")]
    UnexpectedVariant(u32),

    #[error("a call to `EventSet.release_events()` failed")]
    SetReleaseFailed,

    #[error("NVML was not first initialized with `Nvml::init()`")]
    Uninitialized,

    #[error("a supplied argument was invalid")]
    InvalidArg,

    #[error("the requested operation is not available on the target device")]
    NotSupported,

    #[error("the current user does not have permission to perform this operation")]
    NoPermission,

    #[error("NVML was already initialized")]
    #[deprecated = "deprecated in NVML (multiple initializations now allowed via refcounting)"]
    AlreadyInitialized,

    #[error("a query to find an object was unsuccessful")]
    NotFound,

    /**
    An input argument is not large enough.

    The single field is the size required for a successful call (if `Some`)
    and `None` if unknown.
    */
    #[error(
        "an input argument is not large enough{}",
        if let Some(size) = .0 {
            format!(", needs to be at least {}", size)
        } else {
            "".into()
        }
    )]
    InsufficientSize(Option<usize>),

    #[error("device's external power cables are not properly attached")]
    InsufficientPower,

    #[error("NVIDIA driver is not loaded")]
    DriverNotLoaded,

    #[error("the provided timeout was reached")]
    Timeout,

    #[error("NVIDIA kernel detected an interrupt issue with a device")]
    IrqIssue,

    #[error("a shared library couldn't be found or loaded")]
    LibraryNotFound,

    #[error("a function couldn't be found in a shared library")]
    FunctionNotFound,

    #[error("the infoROM is corrupted")]
    CorruptedInfoROM,

    #[error("device fell off the bus or has otherwise become inacessible")]
    GpuLost,

    #[error("device requires a reset before it can be used again")]
    ResetRequired,

    #[error("device control has been blocked by the operating system/cgroups")]
    OperatingSystem,

    #[error("RM detects a driver/library version mismatch")]
    LibRmVersionMismatch,

    #[error("operation cannot be performed because the GPU is currently in use")]
    InUse,

    #[error("insufficient memory")]
    InsufficientMemory,

    #[error("no data")]
    NoData,

    #[error(
        "the requested vgpu operation is not available on the target device because \
        ECC is enabled"
    )]
    VgpuEccNotSupported,

    #[error("not enough resources were available for the operation")]
    InsufficientResources,

    #[error("the requested frequency is not supported")]
    FreqNotSupported,

    #[error("the struct version passed in does not match what the driver expects")]
    ArgumentVersionMismatch,

    #[error("the requested functionality has been deprecated")]
    Deprecated,

    #[error("the system is not ready for the request")]
    NotReady,

    #[error("no GPU was found to perform the operation on")]
    GpuNotFound,

    #[error("the resource is in an invalid state for the operation")]
    InvalidState,

    #[error("an internal driver error occured")]
    Unknown,
}

impl NvmlError {
    /**
    The NVML return code this error was mapped from.

    `None` for errors raised by this crate rather than by the library.
    */
    #[allow(deprecated)]
    pub fn code(&self) -> Option<nvmlReturn_t> {
        use NvmlError::*;

        let code = match self {
            Uninitialized => nvmlReturn_enum_NVML_ERROR_UNINITIALIZED,
            InvalidArg => nvmlReturn_enum_NVML_ERROR_INVALID_ARGUMENT,
            NotSupported => nvmlReturn_enum_NVML_ERROR_NOT_SUPPORTED,
            NoPermission => nvmlReturn_enum_NVML_ERROR_NO_PERMISSION,
            AlreadyInitialized => nvmlReturn_enum_NVML_ERROR_ALREADY_INITIALIZED,
            NotFound => nvmlReturn_enum_NVML_ERROR_NOT_FOUND,
            InsufficientSize(_) => nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE,
            InsufficientPower => nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_POWER,
            DriverNotLoaded => nvmlReturn_enum_NVML_ERROR_DRIVER_NOT_LOADED,
            Timeout => nvmlReturn_enum_NVML_ERROR_TIMEOUT,
            IrqIssue => nvmlReturn_enum_NVML_ERROR_IRQ_ISSUE,
            LibraryNotFound => nvmlReturn_enum_NVML_ERROR_LIBRARY_NOT_FOUND,
            FunctionNotFound => nvmlReturn_enum_NVML_ERROR_FUNCTION_NOT_FOUND,
            CorruptedInfoROM => nvmlReturn_enum_NVML_ERROR_CORRUPTED_INFOROM,
            GpuLost => nvmlReturn_enum_NVML_ERROR_GPU_IS_LOST,
            ResetRequired => nvmlReturn_enum_NVML_ERROR_RESET_REQUIRED,
            OperatingSystem => nvmlReturn_enum_NVML_ERROR_OPERATING_SYSTEM,
            LibRmVersionMismatch => nvmlReturn_enum_NVML_ERROR_LIB_RM_VERSION_MISMATCH,
            InUse => nvmlReturn_enum_NVML_ERROR_IN_USE,
            InsufficientMemory => nvmlReturn_enum_NVML_ERROR_MEMORY,
            NoData => nvmlReturn_enum_NVML_ERROR_NO_DATA,
            VgpuEccNotSupported => nvmlReturn_enum_NVML_ERROR_VGPU_ECC_NOT_SUPPORTED,
            InsufficientResources => nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_RESOURCES,
            FreqNotSupported => nvmlReturn_enum_NVML_ERROR_FREQ_NOT_SUPPORTED,
            ArgumentVersionMismatch => nvmlReturn_enum_NVML_ERROR_ARGUMENT_VERSION_MISMATCH,
            Deprecated => nvmlReturn_enum_NVML_ERROR_DEPRECATED,
            NotReady => nvmlReturn_enum_NVML_ERROR_NOT_READY,
            GpuNotFound => nvmlReturn_enum_NVML_ERROR_GPU_NOT_FOUND,
            InvalidState => nvmlReturn_enum_NVML_ERROR_INVALID_STATE,
            Unknown => nvmlReturn_enum_NVML_ERROR_UNKNOWN,
            _ => return None,
        };

        Some(code)
    }
}

/// Converts an `nvmlReturn_t` type into a `Result<(), NvmlError>`.
#[allow(deprecated)]
pub fn nvml_try(code: nvmlReturn_t) -> Result<(), NvmlError> {
    use NvmlError::*;

    match code {
        nvmlReturn_enum_NVML_SUCCESS => Ok(()),
        nvmlReturn_enum_NVML_ERROR_UNINITIALIZED => Err(Uninitialized),
        nvmlReturn_enum_NVML_ERROR_INVALID_ARGUMENT => Err(InvalidArg),
        nvmlReturn_enum_NVML_ERROR_NOT_SUPPORTED => Err(NotSupported),
        nvmlReturn_enum_NVML_ERROR_NO_PERMISSION => Err(NoPermission),
        nvmlReturn_enum_NVML_ERROR_ALREADY_INITIALIZED => Err(AlreadyInitialized),
        nvmlReturn_enum_NVML_ERROR_NOT_FOUND => Err(NotFound),
        nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_SIZE => Err(InsufficientSize(None)),
        nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_POWER => Err(InsufficientPower),
        nvmlReturn_enum_NVML_ERROR_DRIVER_NOT_LOADED => Err(DriverNotLoaded),
        nvmlReturn_enum_NVML_ERROR_TIMEOUT => Err(Timeout),
        nvmlReturn_enum_NVML_ERROR_IRQ_ISSUE => Err(IrqIssue),
        nvmlReturn_enum_NVML_ERROR_LIBRARY_NOT_FOUND => Err(LibraryNotFound),
        nvmlReturn_enum_NVML_ERROR_FUNCTION_NOT_FOUND => Err(FunctionNotFound),
        nvmlReturn_enum_NVML_ERROR_CORRUPTED_INFOROM => Err(CorruptedInfoROM),
        nvmlReturn_enum_NVML_ERROR_GPU_IS_LOST => Err(GpuLost),
        nvmlReturn_enum_NVML_ERROR_RESET_REQUIRED => Err(ResetRequired),
        nvmlReturn_enum_NVML_ERROR_OPERATING_SYSTEM => Err(OperatingSystem),
        nvmlReturn_enum_NVML_ERROR_LIB_RM_VERSION_MISMATCH => Err(LibRmVersionMismatch),
        nvmlReturn_enum_NVML_ERROR_IN_USE => Err(InUse),
        nvmlReturn_enum_NVML_ERROR_MEMORY => Err(InsufficientMemory),
        nvmlReturn_enum_NVML_ERROR_NO_DATA => Err(NoData),
        nvmlReturn_enum_NVML_ERROR_VGPU_ECC_NOT_SUPPORTED => Err(VgpuEccNotSupported),
        nvmlReturn_enum_NVML_ERROR_INSUFFICIENT_RESOURCES => Err(InsufficientResources),
        nvmlReturn_enum_NVML_ERROR_FREQ_NOT_SUPPORTED => Err(FreqNotSupported),
        nvmlReturn_enum_NVML_ERROR_ARGUMENT_VERSION_MISMATCH => Err(ArgumentVersionMismatch),
        nvmlReturn_enum_NVML_ERROR_DEPRECATED => Err(Deprecated),
        nvmlReturn_enum_NVML_ERROR_NOT_READY => Err(NotReady),
        nvmlReturn_enum_NVML_ERROR_GPU_NOT_FOUND => Err(GpuNotFound),
        nvmlReturn_enum_NVML_ERROR_INVALID_STATE => Err(InvalidState),
        nvmlReturn_enum_NVML_ERROR_UNKNOWN => Err(Unknown),
        _ => Err(UnexpectedVariant(code)),
    }
}

/// Fetch the function pointer bound to `entry`, or name the missing symbol.
pub fn nvml_sym<F: Copy>(entry: &EntryPoint<F>) -> Result<F, NvmlError> {
    entry
        .get()
        .ok_or_else(|| NvmlError::FailedToLoadSymbol(entry.symbol().to_owned()))
}

/**
NVML's description of `code`, or this crate's description of the matching
error when the library does not export `nvmlErrorString`.
*/
pub fn error_string(lib: &NvmlLib, code: nvmlReturn_t) -> String {
    if let Some(sym) = lib.error_string.get() {
        let ptr = unsafe { sym(code) };
        if !ptr.is_null() {
            return unsafe { std::ffi::CStr::from_ptr(ptr) }
                .to_string_lossy()
                .into_owned();
        }
    }

    match nvml_try(code) {
        Ok(()) => "Success".to_owned(),
        Err(e) => e.to_string(),
    }
}
