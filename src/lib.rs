//! # blksort
//!
//! A Rust crate for ordering files by where their data physically starts on disk.
//!
//! ## Overview
//!
//! `blksort` reads a list of paths, asks the filesystem for the first physical
//! block of each regular file, and writes the list back out sorted by that
//! block number. Feeding the sorted list to a backup or copy tool turns a
//! scatter of random reads into a mostly forward sweep over a spinning disk.
//!
//! ## Features
//!
//! - Query the first block with the `FIBMAP` ioctl, or with `FIEMAP` via [`blkmap`]
//! - Safe opens: no symlink following, no blocking on FIFOs, no atime updates
//! - Stable ordering: records with equal block numbers keep their input order
//! - Per-file failures are reported and sorted first, never fatal
//! - Newline or NUL delimited records
//!
//! ## Example
//!
//! ```no_run
//! use blksort::{driver, Options, Resolver};
//! use std::io;
//!
//! let options = Options::default();
//! let resolver = Resolver::new(options.method);
//! let stdin = io::stdin();
//! let summary = driver::run(
//!     stdin.lock(),
//!     io::stdout().lock(),
//!     io::stderr().lock(),
//!     resolver,
//!     &options,
//! )
//! .unwrap();
//! eprintln!("{} files, {} unresolved", summary.records, summary.failed);
//! ```
//!
//! ## Privileges
//!
//! Most filesystems only answer `FIBMAP` for callers with `CAP_SYS_RAWIO`.
//! Without it every file sorts as block 0 and the input order is kept; use
//! [`Method::Fiemap`] to sort as an unprivileged user.

mod collector;
pub mod driver;
mod error;
mod options;
mod resolver;
mod summary;

pub use collector::{OrderedIndex, Record};
pub use driver::Locate;
pub use error::ResolveError;
pub use options::{Delimiter, Method, Options, ParseMethodError};
pub use resolver::{BlockKey, Classification, Resolver};
pub use summary::Summary;
