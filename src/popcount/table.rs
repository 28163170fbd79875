//! Lookup-table counting.
//!
//! Both tables are filled at startup by running [`popcount_naive`] over
//! their whole domain. They are read-only afterwards and are borrowed by the
//! [`Tabular8`] and [`Tabular16`] kernels.

use super::naive::popcount_naive;
use super::Kernel;

/// Bit counts for every byte and every half-word.
#[derive(Clone)]
pub struct LookupTables {
    bytes: Box<[u8; 1 << 8]>,
    halves: Box<[u8; 1 << 16]>,
}

impl LookupTables {
    /// Build both tables.
    pub fn new() -> Self {
        let mut bytes = Box::new([0u8; 1 << 8]);
        for (i, slot) in bytes.iter_mut().enumerate() {
            *slot = popcount_naive(i as u32) as u8;
        }

        let mut halves = Box::new([0u8; 1 << 16]);
        for (i, slot) in halves.iter_mut().enumerate() {
            *slot = popcount_naive(i as u32) as u8;
        }

        log::debug!(
            "built lookup tables ({} + {} entries)",
            bytes.len(),
            halves.len()
        );
        Self { bytes, halves }
    }

    /// The 256-entry byte table.
    pub fn bytes(&self) -> &[u8; 1 << 8] {
        &self.bytes
    }

    /// The 65536-entry half-word table.
    pub fn halves(&self) -> &[u8; 1 << 16] {
        &self.halves
    }

    /// Sum of four byte lookups.
    #[inline(always)]
    pub fn popcount_tabular_8(&self, n: u32) -> u32 {
        let t = &self.bytes;
        u32::from(t[(n & 0xff) as usize])
            + u32::from(t[((n >> 8) & 0xff) as usize])
            + u32::from(t[((n >> 16) & 0xff) as usize])
            + u32::from(t[(n >> 24) as usize])
    }

    /// Sum of two half-word lookups.
    #[inline(always)]
    pub fn popcount_tabular_16(&self, n: u32) -> u32 {
        let t = &self.halves;
        u32::from(t[(n & 0xffff) as usize]) + u32::from(t[(n >> 16) as usize])
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LookupTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTables")
            .field("bytes", &self.bytes.len())
            .field("halves", &self.halves.len())
            .finish()
    }
}

/// Kernel for [`LookupTables::popcount_tabular_8`].
#[derive(Clone, Copy, Debug)]
pub struct Tabular8<'t>(pub &'t LookupTables);

impl Kernel for Tabular8<'_> {
    #[inline(always)]
    fn count(&self, x: u32) -> u32 {
        self.0.popcount_tabular_8(x)
    }
}

/// Kernel for [`LookupTables::popcount_tabular_16`].
#[derive(Clone, Copy, Debug)]
pub struct Tabular16<'t>(pub &'t LookupTables);

impl Kernel for Tabular16<'_> {
    #[inline(always)]
    fn count(&self, x: u32) -> u32 {
        self.0.popcount_tabular_16(x)
    }
}
