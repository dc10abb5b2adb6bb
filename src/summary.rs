//! Tallies returned from a sort pass.

use crate::resolver::Classification;

/// Counts of each classification seen during one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Records read from input (and written to output).
    pub records: usize,

    /// Regular files whose first block was resolved.
    pub resolved: usize,

    /// Paths that exist but are not regular files.
    pub not_applicable: usize,

    /// Paths that could not be opened, stat-ed or queried.
    pub failed: usize,

    /// Distinct block numbers in the output.
    pub distinct_keys: usize,
}

impl Summary {
    /// Count one classification.
    pub fn record(&mut self, class: &Classification) {
        self.records += 1;
        match class {
            Classification::Resolved(_) => self.resolved += 1,
            Classification::NotApplicable => self.not_applicable += 1,
            Classification::Failed(_) => self.failed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use std::io;

    #[test]
    fn test_summary_counts() {
        let mut summary = Summary::default();
        summary.record(&Classification::Resolved(12));
        summary.record(&Classification::Resolved(0));
        summary.record(&Classification::NotApplicable);
        summary.record(&Classification::Failed(ResolveError::Open(
            io::Error::from_raw_os_error(libc::ENOENT),
        )));

        assert_eq!(summary.records, 4);
        assert_eq!(summary.resolved, 2);
        assert_eq!(summary.not_applicable, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.distinct_keys, 0);
    }
}
