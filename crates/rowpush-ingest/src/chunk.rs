//! Fixed-size chunking of a record stream
//!
//! [`chunk`] is lazy: it pulls at most `size` items from the underlying
//! iterator per chunk and never reorders them.

use rowpush_common::{Result, SyncError};
use serde::{Serialize, Serializer};

use crate::record::Record;

/// A non-empty, ordered slice of the run's records with a 1-based index
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<T = Record> {
    index: usize,
    items: Vec<T>,
}

impl<T> Chunk<T> {
    /// 1-based position of this chunk within its run
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for chunks produced by [`chunk`]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// On the wire a chunk is just the JSON array of its records
impl<T: Serialize> Serialize for Chunk<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

/// Iterator returned by [`chunk`]
#[derive(Debug)]
pub struct Chunks<I> {
    inner: I,
    size: usize,
    next_index: usize,
}

impl<I: Iterator> Iterator for Chunks<I> {
    type Item = Chunk<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let items: Vec<I::Item> = self.inner.by_ref().take(self.size).collect();
        if items.is_empty() {
            return None;
        }

        let index = self.next_index;
        self.next_index += 1;
        Some(Chunk { index, items })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.inner.size_hint();
        (
            lower.div_ceil(self.size),
            upper.map(|upper| upper.div_ceil(self.size)),
        )
    }
}

/// Split `items` into chunks of `size`; the last chunk may be shorter.
///
/// Fails with [`SyncError::InvalidConfiguration`] when `size` is zero.
pub fn chunk<I>(items: I, size: usize) -> Result<Chunks<I::IntoIter>>
where
    I: IntoIterator,
{
    if size < 1 {
        return Err(SyncError::invalid_configuration(
            "chunk_size must be a positive integer",
        ));
    }

    Ok(Chunks {
        inner: items.into_iter(),
        size,
        next_index: 1,
    })
}

/// Number of chunks `len` items split into with the given size
pub fn chunk_count(len: usize, size: usize) -> usize {
    if size == 0 {
        0
    } else {
        len.div_ceil(size)
    }
}
