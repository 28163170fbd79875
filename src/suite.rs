//! The benchmark suite: self-test, then time, then report.

#[cfg(feature = "serde")]
use serde::Serialize;
use std::io::Write;

use crate::catalog::{self, AlgorithmInfo, Capability};
use crate::error::Result;
use crate::popcount::{Kernel, LookupTables};
use crate::random::random_block;
use crate::selftest::{first_mismatch, Mismatch};
use crate::timing::{time_kernel, Timing, TimingParams};
use crate::Config;

/// One algorithm as the suite runs it.
pub struct Entry<'t> {
    name: String,
    divisor: u32,
    kernel: Box<dyn Kernel + 't>,
    enabled: bool,
}

impl Entry<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// False once the self-test has disqualified the entry.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn kernel(&self) -> &dyn Kernel {
        &*self.kernel
    }
}

/// Ordered list of entries; tables and the block are borrowed, never owned.
#[derive(Default)]
pub struct Suite<'t> {
    entries: Vec<Entry<'t>>,
}

impl<'t> Suite<'t> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind catalog entries to their kernels.
    ///
    /// Fails before anything runs if an entry needs a missing CPU feature.
    pub fn from_catalog(infos: &[&'static AlgorithmInfo], tables: &'t LookupTables) -> Result<Self> {
        Self::from_catalog_with(infos, tables, Capability::is_available)
    }

    /// [`Suite::from_catalog`] with a custom capability probe.
    pub fn from_catalog_with<P>(
        infos: &[&'static AlgorithmInfo],
        tables: &'t LookupTables,
        available: P,
    ) -> Result<Self>
    where
        P: Fn(Capability) -> bool,
    {
        let mut suite = Self::new();
        for info in infos {
            suite.push(info.name, info.divisor, info.kernel_with(tables, &available)?);
        }
        Ok(suite)
    }

    /// Append an entry. A zero divisor is treated as 1.
    pub fn push(&mut self, name: impl Into<String>, divisor: u32, kernel: Box<dyn Kernel + 't>) {
        self.entries.push(Entry {
            name: name.into(),
            divisor: divisor.max(1),
            kernel,
            enabled: true,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry<'t>] {
        &self.entries
    }

    /// Entries that passed (or have not yet run) the self-test.
    pub fn enabled(&self) -> impl Iterator<Item = &Entry<'t>> {
        self.entries.iter().filter(|e| e.enabled)
    }

    /// Check every enabled entry against the test vectors.
    ///
    /// Each failing entry is disabled and its first mismatch returned; the
    /// rest are untouched.
    pub fn self_test(&mut self) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();
        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            if let Some(mismatch) = first_mismatch(&entry.name, &*entry.kernel) {
                log::warn!("disqualified {}", mismatch);
                entry.enabled = false;
                mismatches.push(mismatch);
            }
        }
        mismatches
    }

    /// Time every enabled entry in order, handing each result to `on_timing`
    /// as soon as it is measured.
    pub fn time_each<F>(&self, block: &[u32], params: TimingParams, mut on_timing: F) -> Result<Vec<Timing>>
    where
        F: FnMut(&Timing) -> Result<()>,
    {
        let mut timings = Vec::new();
        for entry in self.enabled() {
            let timing = time_kernel(&entry.name, entry.divisor, &*entry.kernel, block, params);
            on_timing(&timing)?;
            timings.push(timing);
        }
        Ok(timings)
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Report {
    /// One per disqualified entry
    pub mismatches: Vec<Mismatch>,
    /// One per timed entry, in catalog order
    pub timings: Vec<Timing>,
    /// Wrapping sum of every timing's checksum
    pub checksum: u32,
}

impl Report {
    pub fn from_parts(mismatches: Vec<Mismatch>, timings: Vec<Timing>) -> Self {
        let checksum = suite_checksum(&timings);
        Self {
            mismatches,
            timings,
            checksum,
        }
    }

    /// Write the text form: failures, timings, then the checksum line.
    pub fn write_text<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        write_mismatches(out, &self.mismatches)?;
        for timing in &self.timings {
            write_timing(out, timing)?;
        }
        write_checksum(out, self.checksum)
    }
}

/// Wrapping sum of per-entry checksums.
pub fn suite_checksum(timings: &[Timing]) -> u32 {
    timings
        .iter()
        .fold(0u32, |acc, t| acc.wrapping_add(t.checksum))
}

fn write_mismatches<W: Write + ?Sized>(
    out: &mut W,
    mismatches: &[Mismatch],
) -> std::io::Result<()> {
    for mismatch in mismatches {
        writeln!(out, "{}", mismatch)?;
    }
    out.flush()
}

fn write_timing<W: Write + ?Sized>(out: &mut W, timing: &Timing) -> std::io::Result<()> {
    writeln!(out, "{}", timing)?;
    out.flush()
}

fn write_checksum<W: Write + ?Sized>(out: &mut W, checksum: u32) -> std::io::Result<()> {
    writeln!(out, "checksum: {}", checksum)?;
    out.flush()
}

/// Run the whole suite described by `config`, writing text lines to `out`
/// as results arrive.
pub fn run<W: Write + ?Sized>(config: &Config, out: &mut W) -> Result<Report> {
    run_with(config, out, Capability::is_available)
}

/// [`run`] with a custom capability probe.
///
/// Every kernel is bound before the first line is written, so a missing
/// capability leaves `out` untouched.
pub fn run_with<W, P>(config: &Config, out: &mut W, available: P) -> Result<Report>
where
    W: Write + ?Sized,
    P: Fn(Capability) -> bool,
{
    config.validate()?;
    let selected = catalog::select(&config.selection)?;
    log::debug!("selected {} algorithms", selected.len());

    let tables = LookupTables::new();
    let mut suite = Suite::from_catalog_with(&selected, &tables, available)?;

    let block = random_block(config.block_size, config.seed);
    log::debug!(
        "generated {} words from seed {:#x}",
        block.len(),
        config.seed
    );

    let mismatches = suite.self_test();
    write_mismatches(out, &mismatches)?;

    let params = TimingParams {
        iterations: config.iterations,
        preheat: config.preheat,
        chained: config.chained,
    };
    let timings = suite.time_each(&block, params, |timing| Ok(write_timing(out, timing)?))?;

    let report = Report::from_parts(mismatches, timings);
    write_checksum(out, report.checksum)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popcount::{Keane, Naive};

    struct Broken;

    impl Kernel for Broken {
        fn count(&self, x: u32) -> u32 {
            x.count_ones() + u32::from(x == 0xff00_0000)
        }
    }

    fn time_all(suite: &Suite<'_>, block: &[u32]) -> Vec<Timing> {
        suite.time_each(block, quick(), |_| Ok(())).unwrap()
    }

    fn quick() -> TimingParams {
        TimingParams {
            iterations: 1,
            preheat: 0,
            chained: true,
        }
    }

    #[test]
    fn test_self_test_disables_only_failing_entry() {
        let mut suite = Suite::new();
        suite.push("naive", 16, Box::new(Naive));
        suite.push("broken", 1, Box::new(Broken));
        suite.push("keane", 1, Box::new(Keane));

        let mismatches = suite.self_test();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].algorithm, "broken");

        let enabled: Vec<_> = suite.enabled().map(|e| e.name()).collect();
        assert_eq!(enabled, ["naive", "keane"]);

        let timings = time_all(&suite, &[1, 2, 3]);
        let timed: Vec<_> = timings.iter().map(|t| t.algorithm.as_str()).collect();
        assert_eq!(timed, ["naive", "keane"]);
    }

    #[test]
    fn test_self_test_is_not_repeated_for_disabled() {
        let mut suite = Suite::new();
        suite.push("broken", 1, Box::new(Broken));
        assert_eq!(suite.self_test().len(), 1);
        assert!(suite.self_test().is_empty());
    }

    #[test]
    fn test_zero_divisor_clamped() {
        let mut suite = Suite::new();
        suite.push("naive", 0, Box::new(Naive));
        assert_eq!(suite.entries()[0].divisor(), 1);
    }

    #[test]
    fn test_report_text_layout() {
        let mut suite = Suite::new();
        suite.push("broken", 1, Box::new(Broken));
        suite.push("keane", 1, Box::new(Keane));
        let mismatches = suite.self_test();
        let timings = time_all(&suite, &[0xffff_ffff]);
        let report = Report::from_parts(mismatches, timings);

        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("broken failed case 9:"));
        assert!(lines[1].starts_with("keane: 1 iters in "));
        assert_eq!(lines[2], "checksum: 32");
    }

    #[test]
    fn test_streamed_output_matches_report_text() {
        let config = Config {
            iterations: 2,
            preheat: 0,
            block_size: 32,
            selection: crate::Selection::Names(vec![
                "popcount_naive".to_string(),
                "popcount_keane".to_string(),
            ]),
            ..Config::default()
        };
        let mut streamed = Vec::new();
        let report = run(&config, &mut streamed).unwrap();

        let mut rendered = Vec::new();
        report.write_text(&mut rendered).unwrap();
        assert_eq!(streamed, rendered);
    }

    #[test]
    fn test_time_each_streams_in_order() {
        let mut suite = Suite::new();
        suite.push("naive", 1, Box::new(Naive));
        suite.push("keane", 1, Box::new(Keane));
        let mut seen = Vec::new();
        let timings = suite
            .time_each(&[7, 8], quick(), |t| {
                seen.push(t.algorithm.clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, ["naive", "keane"]);
        assert_eq!(timings.len(), 2);
    }
}
