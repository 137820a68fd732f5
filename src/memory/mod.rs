//! Memory model for the Intcode machine
//!
//! Memory is a map from non-negative addresses to [`Word`]s.  The program is
//! copied in at address 0; every address that was never written reads as 0.
//!
//! # Layout
//!
//! Two stores back the address space:
//! - a dense `Vec` covering the program and any write that lands within
//!   [`DENSE_GROWTH_WINDOW`] words of its end, and
//! - a sparse [`FxHashMap`] for writes far beyond the dense region.
//!
//! ```text
//! 0 ........ dense_len ... dense_len + window ............ usize::MAX
//! [  dense Vec  ][ grows on write ][     sparse map      ]
//! ```
//!
//! When the dense region grows over addresses already held in the sparse
//! map, those entries migrate into the `Vec` so each address lives in
//! exactly one store.

use crate::interpreter::constants::DENSE_GROWTH_WINDOW;
use num_bigint::BigInt;
use num_traits::Zero;
use rustc_hash::FxHashMap;

/// Machine word: a signed integer of unbounded size
pub type Word = BigInt;

/// Growable memory image
///
/// Two images are equal when every address reads the same value, however
/// those values are split between the dense and sparse stores.
#[derive(Debug, Clone)]
pub struct Memory {
    dense: Vec<Word>,
    sparse: FxHashMap<usize, Word>,
    program_len: usize,
}

impl Memory {
    /// Create a memory image holding an independent copy of `program`
    pub fn new<W>(program: &[W]) -> Self
    where
        W: Clone + Into<Word>,
    {
        Memory {
            dense: program.iter().cloned().map(Into::into).collect(),
            sparse: FxHashMap::default(),
            program_len: program.len(),
        }
    }

    /// Read a word; unwritten addresses read as 0
    #[inline]
    pub fn read(&self, addr: usize) -> Word {
        self.get(addr).cloned().unwrap_or_default()
    }

    /// Borrow a written word, if `addr` holds one
    #[inline]
    pub fn get(&self, addr: usize) -> Option<&Word> {
        self.dense.get(addr).or_else(|| self.sparse.get(&addr))
    }

    /// Write a word, growing the dense region if `addr` is close to its end
    pub fn write(&mut self, addr: usize, value: Word) {
        if let Some(slot) = self.dense.get_mut(addr) {
            *slot = value;
            return;
        }

        if addr - self.dense.len() < DENSE_GROWTH_WINDOW {
            self.grow_dense(addr + 1);
            self.dense[addr] = value;
        } else if value.is_zero() {
            // A zero needs no entry; drop any stale one
            self.sparse.remove(&addr);
        } else {
            self.sparse.insert(addr, value);
        }
    }

    fn grow_dense(&mut self, new_len: usize) {
        let old_len = self.dense.len();
        self.dense.resize(new_len, Word::zero());

        if self.sparse.is_empty() {
            return;
        }
        for addr in old_len..new_len {
            if let Some(value) = self.sparse.remove(&addr) {
                self.dense[addr] = value;
            }
        }
    }

    /// Length of the program this image was built from
    pub fn program_len(&self) -> usize {
        self.program_len
    }

    /// One past the highest address held in either store, saturating at `usize::MAX`
    pub fn extent(&self) -> usize {
        let sparse_end = self
            .sparse
            .keys()
            .max()
            .map_or(0, |&addr| addr.saturating_add(1));
        self.dense.len().max(sparse_end)
    }

    pub fn dense_len(&self) -> usize {
        self.dense.len()
    }

    pub fn sparse_len(&self) -> usize {
        self.sparse.len()
    }

    /// The dense region as a slice (program plus nearby extended memory)
    pub fn as_slice(&self) -> &[Word] {
        &self.dense
    }

    /// Flatten the dense region into an owned image
    pub fn to_vec(&self) -> Vec<Word> {
        self.dense.clone()
    }

    /// Sparse entries sorted by address
    pub fn sparse_entries(&self) -> Vec<(usize, Word)> {
        self.sorted_sparse()
            .into_iter()
            .map(|(addr, value)| (addr, value.clone()))
            .collect()
    }

    fn sorted_sparse(&self) -> Vec<(usize, &Word)> {
        let mut entries: Vec<(usize, &Word)> =
            self.sparse.iter().map(|(&addr, value)| (addr, value)).collect();
        entries.sort_unstable_by_key(|&(addr, _)| addr);
        entries
    }

    /// Every non-zero cell in address order
    ///
    /// Sparse keys always lie past the dense end, so the two stores chain
    /// without interleaving.
    fn nonzero_cells(&self) -> impl Iterator<Item = (usize, &Word)> + '_ {
        self.dense
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_zero())
            .chain(self.sorted_sparse())
    }
}

impl PartialEq for Memory {
    fn eq(&self, other: &Self) -> bool {
        self.nonzero_cells().eq(other.nonzero_cells())
    }
}

impl Eq for Memory {}
