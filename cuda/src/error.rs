use crate::library::LibraryError;
use crate::sys::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CudaError {
    #[error("could not interpret string as utf-8")]
    Utf8Error(#[from] std::str::Utf8Error),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("a symbol failed to load: {0}")]
    FailedToLoadSymbol(String),
    #[error("an invalid value was passed")]
    InvalidValue,
    #[error("the driver ran out of memory")]
    OutOfMemory,
    #[error("cuInit has not been called")]
    NotInitialized,
    #[error("the driver is shutting down")]
    Deinitialized,
    #[error("no CUDA-capable device is available")]
    NoDevice,
    #[error("not a valid CUDA device ordinal")]
    InvalidDevice,
    #[error("the requested item was not found")]
    NotFound,
    #[error("the operation is not supported")]
    NotSupported,
    #[error("an unknown error occurred")]
    Unknown,
    #[error("the driver returned error code {0}")]
    Driver(CUresult),
}

/// Converts a `CUresult` into a `Result<(), CudaError>`.
pub fn cuda_try(code: CUresult) -> Result<(), CudaError> {
    use CudaError::*;

    match code {
        CUDA_SUCCESS => Ok(()),
        CUDA_ERROR_INVALID_VALUE => Err(InvalidValue),
        CUDA_ERROR_OUT_OF_MEMORY => Err(OutOfMemory),
        CUDA_ERROR_NOT_INITIALIZED => Err(NotInitialized),
        CUDA_ERROR_DEINITIALIZED => Err(Deinitialized),
        CUDA_ERROR_NO_DEVICE => Err(NoDevice),
        CUDA_ERROR_INVALID_DEVICE => Err(InvalidDevice),
        CUDA_ERROR_NOT_FOUND => Err(NotFound),
        CUDA_ERROR_NOT_SUPPORTED => Err(NotSupported),
        CUDA_ERROR_UNKNOWN => Err(Unknown),
        other => Err(Driver(other)),
    }
}

/// The function pointer bound to `symbol`, or `FailedToLoadSymbol`.
pub fn cuda_sym<F: Copy>(symbol: &Symbol<F>) -> Result<F, CudaError> {
    symbol
        .get()
        .ok_or_else(|| CudaError::FailedToLoadSymbol(symbol.name().to_owned()))
}
