//! Frequency palette generation.
//!
//! A palette is built by stacking one chord per octave: starting at the root,
//! every ratio of the [`IntervalPattern`] is applied to the current octave root,
//! then the root doubles. Results are floored to whole Hz, deduplicated and
//! sorted; anything that floors to 0 Hz or lands at or above the ceiling is
//! discarded.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

/// Ratios (>= 1) applied to each octave root. Include 1.0 to emit the root itself.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalPattern {
    ratios: Vec<f64>,
}

impl IntervalPattern {
    pub fn new(ratios: impl Into<Vec<f64>>) -> Result<Self> {
        let ratios = ratios.into();
        if ratios.is_empty() {
            return Err(Error::invalid("interval pattern has no ratios"));
        }
        if let Some(bad) = ratios.iter().find(|r| !r.is_finite() || **r < 1.0) {
            return Err(Error::invalid(format!(
                "interval ratio must be finite and >= 1 (got {bad})"
            )));
        }
        Ok(Self { ratios })
    }

    /// Root, minor third, perfect fifth.
    pub fn minor_triad() -> Self {
        Self {
            ratios: crate::config::MINOR_TRIAD.to_vec(),
        }
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }
}

/// Strictly ascending, duplicate-free set of whole-Hz frequencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySet {
    freqs: Vec<u32>,
}

impl FrequencySet {
    pub fn generate(root: f64, ceiling: f64, intervals: &IntervalPattern) -> Result<Self> {
        if !root.is_finite() || root <= 0.0 {
            return Err(Error::invalid(format!("root frequency must be > 0 (got {root})")));
        }
        if !ceiling.is_finite() || ceiling <= root {
            return Err(Error::invalid(format!(
                "ceiling must exceed the root (root={root}, ceiling={ceiling})"
            )));
        }

        let mut set = BTreeSet::new();
        let mut octave_root = root;
        while octave_root < ceiling {
            for ratio in intervals.ratios() {
                let f = (octave_root * ratio).floor();
                if f < 1.0 || f >= ceiling {
                    continue;
                }
                if f > u32::MAX as f64 {
                    return Err(Error::invalid(format!("{f} Hz does not fit in a whole-Hz u32")));
                }
                set.insert(f as u32);
            }
            octave_root *= 2.0;
        }

        Ok(Self {
            freqs: set.into_iter().collect(),
        })
    }

    /// Wraps an explicit list; sorts and deduplicates. Zero entries are dropped.
    pub fn from_hz(freqs: impl IntoIterator<Item = u32>) -> Self {
        let set: BTreeSet<u32> = freqs.into_iter().filter(|&f| f > 0).collect();
        Self {
            freqs: set.into_iter().collect(),
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.freqs
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.freqs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    pub fn min(&self) -> Option<u32> {
        self.freqs.first().copied()
    }

    pub fn max(&self) -> Option<u32> {
        self.freqs.last().copied()
    }
}

impl fmt::Display for FrequencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hz) in self.freqs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{hz}")?;
        }
        Ok(())
    }
}
