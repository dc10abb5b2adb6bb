//! Stable multi-map from block number to records.

use crate::resolver::BlockKey;

use std::collections::BTreeMap;

/// One input record with its trailing delimiter removed.
pub type Record = Vec<u8>;

/// Records grouped by block number.
///
/// Keys iterate in ascending order. Records sharing a key keep the order in
/// which they were inserted, so failures, non-regular files and empty files
/// (all key 0) come out in input order.
#[derive(Debug, Default)]
pub struct OrderedIndex {
    buckets: BTreeMap<BlockKey, Vec<Record>>,
    len: usize,
}

impl OrderedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the bucket for `key`.
    pub fn insert(&mut self, key: BlockKey, record: Record) {
        self.buckets.entry(key).or_default().push(record);
        self.len += 1;
    }

    /// Total number of records inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct block numbers seen.
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Consume the index, yielding `(key, record)` in final order.
    pub fn drain(self) -> impl Iterator<Item = (BlockKey, Record)> {
        self.buckets
            .into_iter()
            .flat_map(|(key, records)| records.into_iter().map(move |record| (key, record)))
    }
}
