//! Length bins.

use std::cmp::Ordering;
use std::fmt;

use crate::error::ConfigError;

/// Default lower bound of the first bin.
pub const DEFAULT_BIN_START: usize = 1;

/// Default upper bound of the last bin.
pub const DEFAULT_BIN_STOP: usize = 100;

/// Default bin width.
pub const DEFAULT_BIN_STEP: usize = 10;

/// A set of length bins.
///
/// The lower bounds are `start, start + step, ...` and the upper bounds
/// `step, 2 * step, ...`, both up to and including `stop`. Lower and upper
/// bounds are paired in order until either runs out. A value that falls
/// in none of the ranges is put in the overflow bin `stop+`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Bins {
    start: usize,
    stop: usize,
    step: usize,
}

impl Bins {
    /// Construct bins.
    ///
    /// Returns an error when `step` is zero. `component` is the name of
    /// the analyzer or scorer the bins are configured for.
    pub fn new(
        component: &'static str,
        start: usize,
        stop: usize,
        step: usize,
    ) -> Result<Self, ConfigError> {
        if step == 0 {
            return Err(ConfigError::InvalidBins {
                component,
                start,
                stop,
                step,
            });
        }

        Ok(Bins { start, stop, step })
    }

    /// Get the bin of a value.
    pub fn bin(&self, value: usize) -> Bin {
        let lows = (self.start..=self.stop).step_by(self.step);
        let highs = (self.step..=self.stop).step_by(self.step);

        lows.zip(highs)
            .find(|&(low, high)| low <= value && value <= high)
            .map(|(low, high)| Bin::Range(low, high))
            .unwrap_or(Bin::Over(self.stop))
    }
}

impl Default for Bins {
    fn default() -> Self {
        Bins {
            start: DEFAULT_BIN_START,
            stop: DEFAULT_BIN_STOP,
            step: DEFAULT_BIN_STEP,
        }
    }
}

/// A length bin.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Bin {
    /// Values in `[low, high]`.
    Range(usize, usize),

    /// Values outside all ranges.
    Over(usize),
}

impl Bin {
    fn sort_key(self) -> (usize, usize, bool) {
        match self {
            Bin::Range(low, high) => (low, high, false),
            Bin::Over(stop) => (stop, stop, true),
        }
    }
}

impl Ord for Bin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Bin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bin::Range(low, high) => write!(f, "{}-{}", low, high),
            Bin::Over(stop) => write!(f, "{}+", stop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bin, Bins};
    use crate::error::ConfigError;

    #[test]
    fn default_bins() {
        let bins = Bins::default();
        assert_eq!(bins.bin(1), Bin::Range(1, 10));
        assert_eq!(bins.bin(10), Bin::Range(1, 10));
        assert_eq!(bins.bin(11), Bin::Range(11, 20));
        assert_eq!(bins.bin(100), Bin::Range(91, 100));
        assert_eq!(bins.bin(101), Bin::Over(100));
        assert_eq!(bins.bin(0), Bin::Over(100));
    }

    #[test]
    fn bins_from_zero() {
        // Lower bounds 0, 5, 10 are paired with upper bounds 5, 10.
        let bins = Bins::new("test", 0, 10, 5).unwrap();
        assert_eq!(bins.bin(0), Bin::Range(0, 5));
        assert_eq!(bins.bin(5), Bin::Range(0, 5));
        assert_eq!(bins.bin(6), Bin::Range(5, 10));
        assert_eq!(bins.bin(11), Bin::Over(10));
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(matches!(
            Bins::new("test", 1, 10, 0),
            Err(ConfigError::InvalidBins { step: 0, .. })
        ));
    }

    #[test]
    fn bins_are_ordered_by_bounds() {
        let mut bins = vec![Bin::Over(100), Bin::Range(11, 20), Bin::Range(1, 10)];
        bins.sort();
        assert_eq!(
            bins,
            vec![Bin::Range(1, 10), Bin::Range(11, 20), Bin::Over(100)]
        );
    }

    #[test]
    fn display() {
        assert_eq!(Bin::Range(1, 10).to_string(), "1-10");
        assert_eq!(Bin::Over(100).to_string(), "100+");
    }
}
