//! Static algorithm registry.
//!
//! Contains the name, family, divisor and hardware requirement of every
//! algorithm the suite can time, in report order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::popcount::{self, Kernel, LookupTables, Popcnt};
use crate::Selection;

/// Technique family of an algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Family {
    Naive,
    BitParallel,
    Hakmem,
    DivideAndConquer,
    Multiply,
    Table,
    Hardware,
}

impl Family {
    /// Every family, in catalog order.
    pub const ALL: [Family; 7] = [
        Self::Naive,
        Self::BitParallel,
        Self::Hakmem,
        Self::DivideAndConquer,
        Self::Multiply,
        Self::Table,
        Self::Hardware,
    ];
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive => write!(f, "naive"),
            Self::BitParallel => write!(f, "bit-parallel"),
            Self::Hakmem => write!(f, "hakmem"),
            Self::DivideAndConquer => write!(f, "divide-and-conquer"),
            Self::Multiply => write!(f, "multiply"),
            Self::Table => write!(f, "table"),
            Self::Hardware => write!(f, "hardware"),
        }
    }
}

impl std::str::FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naive" => Ok(Self::Naive),
            "bit-parallel" | "bitparallel" | "bit_parallel" | "parallel" => Ok(Self::BitParallel),
            "hakmem" => Ok(Self::Hakmem),
            "divide-and-conquer" | "divide" | "dnc" => Ok(Self::DivideAndConquer),
            "multiply" | "mult" => Ok(Self::Multiply),
            "table" | "tabular" => Ok(Self::Table),
            "hardware" | "hw" => Ok(Self::Hardware),
            _ => Err(format!(
                "unknown family '{}', expected: naive, bit-parallel, hakmem, \
                 divide-and-conquer, multiply, table, hardware",
                s
            )),
        }
    }
}

/// CPU feature an algorithm cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Capability {
    /// x86 `popcnt` instruction
    Popcnt,
}

impl Capability {
    /// Feature name as the CPU reports it.
    pub fn name(self) -> &'static str {
        match self {
            Self::Popcnt => Popcnt::FEATURE,
        }
    }

    /// Whether code using the capability exists for this target.
    pub fn is_compiled_in(self) -> bool {
        match self {
            Self::Popcnt => Popcnt::is_compiled_in(),
        }
    }

    /// Whether the running CPU has the capability.
    pub fn is_available(self) -> bool {
        match self {
            Self::Popcnt => Popcnt::detect().is_some(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of an algorithm, used to bind its kernel.
///
/// Variants are declared in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    Naive,
    Parallel8,
    Parallel8Unrolled,
    Parallel6,
    Parallel6Unrolled,
    Hakmem,
    Keane,
    DivideBy2,
    DivideBy3,
    DivideBy4,
    Anderson,
    Mult,
    Tabular8,
    Tabular16,
    Builtin,
    X86Popcnt,
}

/// Algorithm metadata.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AlgorithmInfo {
    /// Which kernel to bind
    pub algorithm: Algorithm,
    /// Unique report name (e.g., "popcount_keane")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Technique family for grouping
    pub family: Family,
    /// Repetition scale-down, so slow algorithms take comparable time
    pub divisor: u32,
    /// CPU feature required, if any
    pub requires: Option<Capability>,
}

impl AlgorithmInfo {
    /// Whether this entry exists on the compilation target.
    pub fn is_compiled_in(&self) -> bool {
        self.requires.map_or(true, Capability::is_compiled_in)
    }

    /// Bind the algorithm to a kernel.
    ///
    /// Fails with [`Error::MissingCapability`] when the entry needs a CPU
    /// feature the host lacks.
    pub fn kernel<'t>(&self, tables: &'t LookupTables) -> Result<Box<dyn Kernel + 't>> {
        self.kernel_with(tables, Capability::is_available)
    }

    /// Bind the algorithm to a kernel, asking `available` whether each
    /// required capability is present.
    ///
    /// A capability reported present is still probed before its kernel is
    /// built, so `available` can only narrow what the CPU offers.
    pub fn kernel_with<'t, P>(
        &self,
        tables: &'t LookupTables,
        available: P,
    ) -> Result<Box<dyn Kernel + 't>>
    where
        P: Fn(Capability) -> bool,
    {
        let missing = || Error::MissingCapability {
            algorithm: self.name,
            capability: self.requires.map_or("", Capability::name),
        };
        if let Some(capability) = self.requires {
            if !available(capability) {
                return Err(missing());
            }
        }

        let kernel: Box<dyn Kernel + 't> = match self.algorithm {
            Algorithm::Naive => Box::new(popcount::Naive),
            Algorithm::Parallel8 => Box::new(popcount::Parallel8),
            Algorithm::Parallel8Unrolled => Box::new(popcount::Parallel8Unrolled),
            Algorithm::Parallel6 => Box::new(popcount::Parallel6),
            Algorithm::Parallel6Unrolled => Box::new(popcount::Parallel6Unrolled),
            Algorithm::Hakmem => Box::new(popcount::Hakmem),
            Algorithm::Keane => Box::new(popcount::Keane),
            Algorithm::DivideBy2 => Box::new(popcount::DivideBy2),
            Algorithm::DivideBy3 => Box::new(popcount::DivideBy3),
            Algorithm::DivideBy4 => Box::new(popcount::DivideBy4),
            Algorithm::Anderson => Box::new(popcount::Anderson),
            Algorithm::Mult => Box::new(popcount::Mult),
            Algorithm::Tabular8 => Box::new(popcount::Tabular8(tables)),
            Algorithm::Tabular16 => Box::new(popcount::Tabular16(tables)),
            Algorithm::Builtin => Box::new(popcount::Builtin),
            Algorithm::X86Popcnt => match Popcnt::detect() {
                Some(popcnt) => Box::new(popcnt),
                None => return Err(missing()),
            },
        };
        Ok(kernel)
    }
}

/// Static registry of all algorithms, in report order.
pub static ALGORITHMS: &[AlgorithmInfo] = &[
    // ========== NAIVE ==========
    AlgorithmInfo {
        algorithm: Algorithm::Naive,
        name: "popcount_naive",
        description: "One bit at a time, stopping when the word is empty",
        family: Family::Naive,
        divisor: 16,
        requires: None,
    },
    // ========== BIT-PARALLEL ==========
    AlgorithmInfo {
        algorithm: Algorithm::Parallel8,
        name: "popcount_8",
        description: "Byte-lane shift-and-add, looped",
        family: Family::BitParallel,
        divisor: 4,
        requires: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Parallel8Unrolled,
        name: "popcount_8_unrolled",
        description: "Byte-lane shift-and-add, unrolled",
        family: Family::BitParallel,
        divisor: 2,
        requires: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Parallel6,
        name: "popcount_6",
        description: "6-bit-lane shift-and-add, looped",
        family: Family::BitParallel,
        divisor: 4,
        requires: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Parallel6Unrolled,
        name: "popcount_6_unrolled",
        description: "6-bit-lane shift-and-add, unrolled",
        family: Family::BitParallel,
        divisor: 2,
        requires: None,
    },
    // ========== HAKMEM ==========
    AlgorithmInfo {
        algorithm: Algorithm::Hakmem,
        name: "popcount_hakmem",
        description: "HAKMEM 169 with hardware modulus 63",
        family: Family::Hakmem,
        divisor: 1,
        requires: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Keane,
        name: "popcount_keane",
        description: "HAKMEM 169 with Keane's division-free modulus 63",
        family: Family::Hakmem,
        divisor: 1,
        requires: None,
    },
    // ========== DIVIDE-AND-CONQUER ==========
    AlgorithmInfo {
        algorithm: Algorithm::DivideBy2,
        name: "popcount_2",
        description: "Binary divide-and-conquer from a single mask",
        family: Family::DivideAndConquer,
        divisor: 1,
        requires: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::DivideBy3,
        name: "popcount_3",
        description: "Ternary first stage, then octal folding",
        family: Family::DivideAndConquer,
        divisor: 1,
        requires: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::DivideBy4,
        name: "popcount_4",
        description: "Quaternary first stage, then nibble folding",
        family: Family::DivideAndConquer,
        divisor: 1,
        requires: None,
    },
    // ========== MULTIPLY ==========
    AlgorithmInfo {
        algorithm: Algorithm::Anderson,
        name: "popcount_anderson",
        description: "Anderson's 64-bit multiply on 12-bit chunks, modulus 31",
        family: Family::Multiply,
        divisor: 2,
        requires: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Mult,
        name: "popcount_mult",
        description: "SWAR byte sums folded by multiply with 0x01010101",
        family: Family::Multiply,
        divisor: 1,
        requires: None,
    },
    // ========== TABLE ==========
    AlgorithmInfo {
        algorithm: Algorithm::Tabular8,
        name: "popcount_tabular_8",
        description: "Four lookups in a 256-entry table",
        family: Family::Table,
        divisor: 1,
        requires: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::Tabular16,
        name: "popcount_tabular_16",
        description: "Two lookups in a 65536-entry table",
        family: Family::Table,
        divisor: 1,
        requires: None,
    },
    // ========== HARDWARE ==========
    AlgorithmInfo {
        algorithm: Algorithm::Builtin,
        name: "popcount_builtin",
        description: "u32::count_ones as lowered for the build target",
        family: Family::Hardware,
        divisor: 1,
        requires: None,
    },
    AlgorithmInfo {
        algorithm: Algorithm::X86Popcnt,
        name: "popcount_x86",
        description: "x86 popcnt instruction, detected at runtime",
        family: Family::Hardware,
        divisor: 1,
        requires: Some(Capability::Popcnt),
    },
];

/// Entries compiled in for this target.
pub fn compiled_in() -> Vec<&'static AlgorithmInfo> {
    ALGORITHMS.iter().filter(|a| a.is_compiled_in()).collect()
}

/// Filter compiled-in entries by family.
pub fn filter_by_family(family: Family) -> Vec<&'static AlgorithmInfo> {
    ALGORITHMS
        .iter()
        .filter(|a| a.family == family && a.is_compiled_in())
        .collect()
}

/// Filter entries by name, keeping catalog order.
pub fn filter_by_names(names: &[String]) -> Vec<&'static AlgorithmInfo> {
    ALGORITHMS
        .iter()
        .filter(|a| names.iter().any(|n| n == a.name))
        .collect()
}

/// Get an entry by name.
pub fn get_by_name(name: &str) -> Option<&'static AlgorithmInfo> {
    ALGORITHMS.iter().find(|a| a.name == name)
}

/// Resolve a selection to catalog entries, in catalog order.
pub fn select(selection: &Selection) -> Result<Vec<&'static AlgorithmInfo>> {
    let selected = match selection {
        Selection::All => compiled_in(),
        Selection::Names(names) => {
            if let Some(unknown) = names.iter().find(|n| get_by_name(n).is_none()) {
                return Err(Error::UnknownAlgorithm {
                    name: unknown.clone(),
                });
            }
            filter_by_names(names)
        }
        Selection::Family(families) => {
            let mut selected: Vec<_> = families
                .iter()
                .flat_map(|&family| filter_by_family(family))
                .collect();
            selected.sort_by_key(|a| a.algorithm);
            selected.dedup_by_key(|a| a.algorithm);
            selected
        }
    };

    if selected.is_empty() {
        return Err(Error::EmptySelection);
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_not_empty() {
        assert!(!ALGORITHMS.is_empty());
    }

    #[test]
    fn test_names_unique() {
        for (i, a) in ALGORITHMS.iter().enumerate() {
            for b in &ALGORITHMS[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.algorithm, b.algorithm);
            }
        }
    }

    #[test]
    fn test_divisors_nonzero() {
        assert!(ALGORITHMS.iter().all(|a| a.divisor >= 1));
    }

    #[test]
    fn test_all_families_have_algorithms() {
        for family in Family::ALL {
            assert!(
                ALGORITHMS.iter().any(|a| a.family == family),
                "no algorithm in {}",
                family
            );
        }
    }

    #[test]
    fn test_family_parsing() {
        assert_eq!("naive".parse::<Family>().unwrap(), Family::Naive);
        assert_eq!(
            "divide-and-conquer".parse::<Family>().unwrap(),
            Family::DivideAndConquer
        );
        assert_eq!("Table".parse::<Family>().unwrap(), Family::Table);
        assert!("quantum".parse::<Family>().is_err());
    }

    #[test]
    fn test_family_display_round_trips() {
        for family in Family::ALL {
            assert_eq!(family.to_string().parse::<Family>().unwrap(), family);
        }
    }

    #[test]
    fn test_anderson_bound_to_anderson() {
        let tables = LookupTables::new();
        let info = get_by_name("popcount_anderson").unwrap();
        assert_eq!(info.algorithm, Algorithm::Anderson);
        let kernel = info.kernel(&tables).unwrap();
        assert_eq!(kernel.count(0xea90_31e8), 14);
    }

    #[test]
    fn test_every_compiled_in_kernel_binds_or_reports_capability() {
        let tables = LookupTables::new();
        for info in compiled_in() {
            match info.kernel(&tables) {
                Ok(kernel) => assert_eq!(kernel.count(u32::MAX), 32, "{}", info.name),
                Err(Error::MissingCapability { algorithm, .. }) => {
                    assert_eq!(algorithm, info.name);
                    assert!(info.requires.is_some());
                }
                Err(e) => panic!("{}: unexpected error {}", info.name, e),
            }
        }
    }

    #[test]
    fn test_select_all() {
        let selected = select(&Selection::All).unwrap();
        assert_eq!(selected.len(), compiled_in().len());
    }

    #[test]
    fn test_select_by_names_keeps_catalog_order() {
        let names = vec!["popcount_keane".to_string(), "popcount_naive".to_string()];
        let selected = select(&Selection::Names(names)).unwrap();
        let got: Vec<_> = selected.iter().map(|a| a.name).collect();
        assert_eq!(got, ["popcount_naive", "popcount_keane"]);
    }

    #[test]
    fn test_select_unknown_name() {
        let names = vec!["popcount_naive".to_string(), "popcount_magic".to_string()];
        match select(&Selection::Names(names)) {
            Err(Error::UnknownAlgorithm { name }) => assert_eq!(name, "popcount_magic"),
            other => panic!("expected UnknownAlgorithm, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_select_by_family() {
        let selected = select(&Selection::Family(vec![Family::Table])).unwrap();
        assert!(selected.iter().all(|a| a.family == Family::Table));
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_filter_by_family() {
        let hakmem: Vec<_> = filter_by_family(Family::Hakmem)
            .iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(hakmem, ["popcount_hakmem", "popcount_keane"]);

        let hardware = filter_by_family(Family::Hardware);
        assert_eq!(hardware.len(), compiled_in().len() - 14);
    }

    #[test]
    fn test_catalog_sorted_by_algorithm() {
        assert!(ALGORITHMS.windows(2).all(|w| w[0].algorithm < w[1].algorithm));
    }

    #[test]
    fn test_select_families_in_catalog_order() {
        let families = vec![Family::Table, Family::Naive, Family::Table];
        let selected = select(&Selection::Family(families)).unwrap();
        let got: Vec<_> = selected.iter().map(|a| a.name).collect();
        assert_eq!(
            got,
            ["popcount_naive", "popcount_tabular_8", "popcount_tabular_16"]
        );
    }

    #[test]
    fn test_kernel_with_missing_capability() {
        let tables = LookupTables::new();
        let info = get_by_name("popcount_x86").unwrap();
        match info.kernel_with(&tables, |_| false) {
            Err(Error::MissingCapability {
                algorithm,
                capability,
            }) => {
                assert_eq!(algorithm, "popcount_x86");
                assert_eq!(capability, "popcnt");
            }
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("popcount_x86 bound without popcnt"),
        }

        // entries without requirements ignore the probe
        let keane = get_by_name("popcount_keane").unwrap();
        assert!(keane.kernel_with(&tables, |_| false).is_ok());
    }

    #[test]
    fn test_select_empty() {
        assert!(matches!(
            select(&Selection::Names(Vec::new())),
            Err(Error::EmptySelection)
        ));
    }
}
