//! Physical block lookup for a single path.
//!
//! This module provides [`Resolver`], which opens a path without following
//! symlinks, confirms it is a regular file, and asks the filesystem for the
//! physical block where the file's data begins. Every outcome is reported as
//! a [`Classification`]; nothing here aborts the caller.

use crate::error::ResolveError;
use crate::options::Method;

use blkmap::{Fiemap, FiemapExtent};
use tracing::trace;

use std::fs::{File, Metadata, OpenOptions};
use std::io;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt};
use std::os::unix::io::{AsRawFd, IntoRawFd};
use std::path::Path;

/// Sort key: the first physical block of a file, in filesystem block units.
///
/// `0` doubles as "unknown" for files that could not be resolved.
pub type BlockKey = u64;

/// `FIBMAP` from `<linux/fs.h>`: `_IO(0x00, 1)`.
const FIBMAP: u32 = 1;

/// Extra open flags. The descriptor must not follow a symlink, block on a
/// FIFO or device, become a controlling terminal, or touch the atime.
const OPEN_FLAGS: libc::c_int =
    libc::O_NOCTTY | libc::O_NONBLOCK | libc::O_NOFOLLOW | libc::O_NOATIME;

/// Outcome of resolving one path.
#[derive(Debug)]
pub enum Classification {
    /// A regular file whose first block was read. Empty files may report 0.
    Resolved(BlockKey),
    /// The path exists but is not a regular file.
    NotApplicable,
    /// Opening, stat-ing or querying the path failed.
    Failed(ResolveError),
}

impl Classification {
    /// The sort key for this outcome. Anything but `Resolved` sorts as 0.
    pub fn key(&self) -> BlockKey {
        match self {
            Classification::Resolved(block) => *block,
            Classification::NotApplicable | Classification::Failed(_) => 0,
        }
    }

    /// The resolution error, if this outcome is a failure.
    pub fn error(&self) -> Option<&ResolveError> {
        match self {
            Classification::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Classification::Failed(_))
    }
}

/// Looks up the first physical block of files, one path at a time.
///
/// Each call owns exactly one descriptor and releases it before returning.
///
/// # Example
///
/// ```no_run
/// use blksort::{Method, Resolver};
/// use std::path::Path;
///
/// let resolver = Resolver::new(Method::Fiemap);
/// let class = resolver.resolve(Path::new("/etc/hostname"));
/// println!("key = {}", class.key());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    method: Method,
}

impl Resolver {
    pub fn new(method: Method) -> Self {
        Self { method }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Classify `path` by where its data starts on disk.
    pub fn resolve(&self, path: &Path) -> Classification {
        let class = match self.try_resolve(path) {
            Ok(class) => class,
            Err(e) => Classification::Failed(e),
        };
        trace!(path = %path.display(), method = %self.method, ?class, "resolved");
        class
    }

    fn try_resolve(&self, path: &Path) -> Result<Classification, ResolveError> {
        self.try_resolve_with(path, close)
    }

    /// Open, inspect, then hand the descriptor to `release` on every path.
    fn try_resolve_with<C>(
        &self,
        path: &Path,
        release: C,
    ) -> Result<Classification, ResolveError>
    where
        C: FnOnce(File) -> io::Result<()>,
    {
        let file = open_nofollow(path).map_err(ResolveError::Open)?;
        let outcome = self.inspect(&file);
        first_fault(outcome, release(file))
    }

    fn inspect(&self, file: &File) -> Result<Classification, ResolveError> {
        // fstat on the descriptor, so stat and query see the same inode.
        let metadata = file.metadata().map_err(ResolveError::Stat)?;

        // Block queries are only meaningful for regular file data.
        if !metadata.file_type().is_file() {
            return Ok(Classification::NotApplicable);
        }

        let block = match self.method {
            Method::Fibmap => fibmap_first_block(file),
            Method::Fiemap => fiemap_first_block(file, &metadata),
        }
        .map_err(ResolveError::Query)?;

        Ok(Classification::Resolved(block))
    }
}

/// Combine the inspection outcome with the release result.
///
/// An inspection error always wins; a release failure is only reported when
/// nothing else went wrong.
fn first_fault(
    outcome: Result<Classification, ResolveError>,
    released: io::Result<()>,
) -> Result<Classification, ResolveError> {
    let class = outcome?;
    released.map_err(ResolveError::Close)?;
    Ok(class)
}

fn open_nofollow(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .custom_flags(OPEN_FLAGS)
        .open(path)
}

/// Close the descriptor and report the result, which `Drop for File` discards.
fn close(file: File) -> io::Result<()> {
    let fd = file.into_raw_fd();
    // SAFETY: `fd` was released from an owned `File` and is closed exactly once.
    if unsafe { libc::close(fd) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Map logical block 0 to its physical block with the `FIBMAP` ioctl.
fn fibmap_first_block(file: &File) -> io::Result<BlockKey> {
    let mut block: libc::c_int = 0;
    // SAFETY: FIBMAP reads and writes a single `int` through the pointer,
    // which stays valid for the duration of the call.
    let ret = unsafe {
        libc::ioctl(
            file.as_raw_fd(),
            FIBMAP as _,
            &mut block as *mut libc::c_int,
        )
    };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(block as u32 as BlockKey)
}

/// Physical offset of the first extent, expressed in filesystem blocks.
fn fiemap_first_block(file: &File, metadata: &Metadata) -> io::Result<BlockKey> {
    let size = metadata.len();
    if size == 0 {
        return Ok(0);
    }

    let extents = file.fiemap_range(0, size)?;
    Ok(first_block(&extents, metadata.blksize()))
}

/// Block number where the first extent starts, or 0 if it has no location.
fn first_block(extents: &[FiemapExtent], block_size: u64) -> BlockKey {
    let Some(first) = extents.first() else {
        return 0;
    };

    // Physical address is undefined for these.
    if first.flags.is_unknown() || first.flags.is_delalloc() {
        return 0;
    }

    first.physical / block_size.max(1)
}
