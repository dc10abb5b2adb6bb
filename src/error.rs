//! Per-file resolution errors.

use std::ffi::CStr;
use std::io;

use thiserror::Error;

/// Failure while locating the first physical block of one file.
///
/// The variant records which step failed. The displayed text is the
/// platform error message alone (`strerror`, without the `os error N`
/// suffix `io::Error` appends), so callers can prefix it with whatever
/// context they need.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The path could not be opened.
    #[error("{}", platform_message(.0))]
    Open(#[source] io::Error),

    /// The open descriptor could not be stat-ed.
    #[error("{}", platform_message(.0))]
    Stat(#[source] io::Error),

    /// The filesystem refused or does not support the block query.
    #[error("{}", platform_message(.0))]
    Query(#[source] io::Error),

    /// Releasing the descriptor failed after every other step succeeded.
    #[error("{}", platform_message(.0))]
    Close(#[source] io::Error),
}

impl ResolveError {
    /// Short name of the step that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            ResolveError::Open(_) => "open",
            ResolveError::Stat(_) => "stat",
            ResolveError::Query(_) => "query",
            ResolveError::Close(_) => "close",
        }
    }

    /// The underlying platform error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            ResolveError::Open(e)
            | ResolveError::Stat(e)
            | ResolveError::Query(e)
            | ResolveError::Close(e) => e,
        }
    }

    /// The raw OS error code, if the failure came from a syscall.
    pub fn raw_os_error(&self) -> Option<i32> {
        self.io_error().raw_os_error()
    }
}

/// `strerror` text for OS errors; other errors use their own `Display`.
fn platform_message(err: &io::Error) -> String {
    let Some(code) = err.raw_os_error() else {
        return err.to_string();
    };

    let mut buf = [0 as libc::c_char; 256];
    // SAFETY: `buf` is writable for `buf.len()` bytes; the XSI `strerror_r`
    // NUL-terminates it on success.
    if unsafe { libc::strerror_r(code, buf.as_mut_ptr(), buf.len()) } != 0 {
        return err.to_string();
    }
    // SAFETY: checked above that `strerror_r` wrote a terminated string.
    let text = unsafe { CStr::from_ptr(buf.as_ptr()) };
    text.to_string_lossy().into_owned()
}
