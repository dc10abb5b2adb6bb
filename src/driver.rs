//! One sort pass: read records, resolve each, emit them in block order.
//!
//! The pass runs strictly in sequence. Every record is resolved and filed in
//! the [`OrderedIndex`] before the next one is read; output is written only
//! after input is exhausted. Per-record failures are reported on the
//! diagnostic stream as they happen and never stop the pass. Only failures
//! of the streams themselves are returned as errors.

use crate::collector::{OrderedIndex, Record};
use crate::error::ResolveError;
use crate::options::Options;
use crate::resolver::{BlockKey, Classification, Resolver};
use crate::summary::Summary;

use tracing::debug;

use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Something that classifies a path by its first physical block.
///
/// Implemented by [`Resolver`] and by any `FnMut(&Path) -> Classification`.
pub trait Locate {
    fn locate(&mut self, path: &Path) -> Classification;
}

impl Locate for Resolver {
    fn locate(&mut self, path: &Path) -> Classification {
        self.resolve(path)
    }
}

impl<F> Locate for F
where
    F: FnMut(&Path) -> Classification,
{
    fn locate(&mut self, path: &Path) -> Classification {
        self(path)
    }
}

/// Run a full pass over `input`, writing the sorted records to `output`.
///
/// # Arguments
///
/// * `input` - Delimited path records
/// * `output` - Receives the reordered records, each followed by the delimiter
/// * `diagnostics` - Receives one line per record that failed to resolve
/// * `locator` - Classifies each record
/// * `options` - Delimiter, key prefix and program name
///
/// # Returns
///
/// A [`Summary`] of the pass, or the first error reading `input` or writing
/// either output stream.
pub fn run<R, W, E, L>(
    mut input: R,
    mut output: W,
    mut diagnostics: E,
    mut locator: L,
    options: &Options,
) -> io::Result<Summary>
where
    R: BufRead,
    W: Write,
    E: Write,
    L: Locate,
{
    let delimiter = options.delimiter.as_byte();
    let mut index = OrderedIndex::new();
    let mut summary = Summary::default();

    while let Some(record) = read_record(&mut input, delimiter)? {
        let class = locator.locate(Path::new(OsStr::from_bytes(&record)));
        summary.record(&class);

        if let Classification::Failed(e) = &class {
            report_failure(&mut diagnostics, &options.program, &record, e)?;
        }

        index.insert(class.key(), record);
    }

    summary.distinct_keys = index.key_count();
    debug!(
        records = summary.records,
        resolved = summary.resolved,
        not_applicable = summary.not_applicable,
        failed = summary.failed,
        distinct_keys = summary.distinct_keys,
        "input exhausted"
    );

    for (key, record) in index.drain() {
        write_record(&mut output, key, &record, delimiter, options.show_key)?;
    }
    output.flush()?;

    Ok(summary)
}

/// Read the next record, without its delimiter. `None` at end of input.
///
/// A trailing record with no delimiter is still returned.
fn read_record<R: BufRead>(input: &mut R, delimiter: u8) -> io::Result<Option<Record>> {
    let mut record = Vec::new();
    if input.read_until(delimiter, &mut record)? == 0 {
        return Ok(None);
    }
    if record.last() == Some(&delimiter) {
        record.pop();
    }
    Ok(Some(record))
}

/// Write `<program>: <path>: <error>` and flush it right away.
fn report_failure<E: Write>(
    diagnostics: &mut E,
    program: &str,
    record: &[u8],
    error: &ResolveError,
) -> io::Result<()> {
    write!(diagnostics, "{}: ", program)?;
    diagnostics.write_all(record)?;
    writeln!(diagnostics, ": {}", error)?;
    diagnostics.flush()
}

fn write_record<W: Write>(
    output: &mut W,
    key: BlockKey,
    record: &[u8],
    delimiter: u8,
    show_key: bool,
) -> io::Result<()> {
    if show_key {
        write!(output, "{} ", key)?;
    }
    output.write_all(record)?;
    output.write_all(&[delimiter])
}
