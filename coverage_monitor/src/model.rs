//! Typed coverage values built from JaCoCo reports.
//!
//! Every value here is constructed once by the parser and never mutated
//! afterwards. Counts are unsigned, so a negative count can never be
//! represented; the parser rejects it while reading attributes.

use std::fmt;
use std::ops::{Add, AddAssign};

/// Line-coverage percentage a module or file must reach to pass.
pub const THRESHOLD: f64 = 80.0;

/// Threshold check shared by files, modules and the overall summary.
pub fn meets_threshold(percentage: f64) -> bool {
    percentage >= THRESHOLD
}

/// Coverage dimension carried by a JaCoCo `counter` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Line,
    Branch,
    Instruction,
}

impl CounterKind {
    /// Maps a JaCoCo `type` attribute. Kinds this tool does not consume
    /// (`METHOD`, `CLASS`, `COMPLEXITY`) map to `None`.
    pub fn from_jacoco(value: &str) -> Option<Self> {
        match value {
            "LINE" => Some(CounterKind::Line),
            "BRANCH" => Some(CounterKind::Branch),
            "INSTRUCTION" => Some(CounterKind::Instruction),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CounterKind::Line => "LINE",
            CounterKind::Branch => "BRANCH",
            CounterKind::Instruction => "INSTRUCTION",
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Missed/covered pair for one coverage dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    missed: u64,
    covered: u64,
}

impl Counter {
    pub const fn new(missed: u64, covered: u64) -> Self {
        Self { missed, covered }
    }

    pub fn missed(&self) -> u64 {
        self.missed
    }

    pub fn covered(&self) -> u64 {
        self.covered
    }

    pub fn total(&self) -> u64 {
        self.missed.saturating_add(self.covered)
    }

    /// Covered share in percent; `0.0` when nothing is measurable.
    pub fn percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.covered as f64 / total as f64) * 100.0
    }
}

impl Add for Counter {
    type Output = Counter;

    fn add(self, rhs: Counter) -> Counter {
        Counter {
            missed: self.missed.saturating_add(rhs.missed),
            covered: self.covered.saturating_add(rhs.covered),
        }
    }
}

impl AddAssign for Counter {
    fn add_assign(&mut self, rhs: Counter) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Counter {
    fn sum<I: Iterator<Item = Counter>>(iter: I) -> Counter {
        iter.fold(Counter::default(), Add::add)
    }
}

/// The three counters this tool reads from a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub line: Counter,
    pub branch: Counter,
    pub instruction: Counter,
}

impl Counters {
    pub fn get(&self, kind: CounterKind) -> Counter {
        match kind {
            CounterKind::Line => self.line,
            CounterKind::Branch => self.branch,
            CounterKind::Instruction => self.instruction,
        }
    }

    pub(crate) fn slot_mut(&mut self, kind: CounterKind) -> &mut Counter {
        match kind {
            CounterKind::Line => &mut self.line,
            CounterKind::Branch => &mut self.branch,
            CounterKind::Instruction => &mut self.instruction,
        }
    }
}

/// Coverage of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCoverage {
    pub name: String,
    pub counters: Counters,
}

impl FileCoverage {
    pub fn new(name: impl Into<String>, counters: Counters) -> Self {
        Self {
            name: name.into(),
            counters,
        }
    }

    pub fn line_percentage(&self) -> f64 {
        self.counters.line.percentage()
    }

    pub fn meets_threshold(&self) -> bool {
        meets_threshold(self.line_percentage())
    }
}

/// Aggregate coverage of one build module.
///
/// `counters` come from the package-level rollups of the report, so they
/// can exceed the sum of `files` when the report holds classes that are not
/// attributed to any listed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCoverage {
    pub name: String,
    pub counters: Counters,
    pub files: Vec<FileCoverage>,
}

impl ModuleCoverage {
    pub fn new(name: impl Into<String>, counters: Counters, files: Vec<FileCoverage>) -> Self {
        Self {
            name: name.into(),
            counters,
            files,
        }
    }

    pub fn line_percentage(&self) -> f64 {
        self.counters.line.percentage()
    }

    pub fn branch_percentage(&self) -> f64 {
        self.counters.branch.percentage()
    }

    pub fn meets_threshold(&self) -> bool {
        meets_threshold(self.line_percentage())
    }

    /// Files below the threshold, in report order.
    pub fn low_coverage_files(&self) -> Vec<&FileCoverage> {
        self.files.iter().filter(|f| !f.meets_threshold()).collect()
    }
}
