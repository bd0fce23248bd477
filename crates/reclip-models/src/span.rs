//! Time-span helpers shared by candidates, chunks and clips.

/// Anything occupying a `[start, end]` interval in source time (seconds).
pub trait TimeSpan {
    fn start(&self) -> f64;
    fn end(&self) -> f64;

    /// Span length, never negative.
    fn duration(&self) -> f64 {
        (self.end() - self.start()).max(0.0)
    }

    /// Length of the intersection with another span (0 when disjoint).
    fn intersection<S: TimeSpan + ?Sized>(&self, other: &S) -> f64 {
        let start = self.start().max(other.start());
        let end = self.end().min(other.end());
        (end - start).max(0.0)
    }

    /// True when the spans share a positive-length interval.
    fn overlaps<S: TimeSpan + ?Sized>(&self, other: &S) -> bool {
        self.intersection(other) > 0.0
    }

    /// Intersection divided by the shorter of the two durations.
    ///
    /// Zero when disjoint or when either span has no duration.
    fn overlap_ratio<S: TimeSpan + ?Sized>(&self, other: &S) -> f64 {
        let intersection = self.intersection(other);
        if intersection <= 0.0 {
            return 0.0;
        }
        let shortest = self.duration().min(other.duration());
        if shortest <= 0.0 {
            return 0.0;
        }
        intersection / shortest
    }
}

impl TimeSpan for (f64, f64) {
    fn start(&self) -> f64 {
        self.0
    }

    fn end(&self) -> f64 {
        self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_ratio_uses_shorter_span() {
        let a = (0.0, 10.0);
        let b = (5.0, 15.0);
        assert!((a.overlap_ratio(&b) - 0.5).abs() < 1e-12);

        let inner = (2.0, 4.0);
        assert!((a.overlap_ratio(&inner) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_ratio_disjoint_and_empty() {
        assert_eq!((0.0, 10.0).overlap_ratio(&(10.0, 20.0)), 0.0);
        assert_eq!((0.0, 10.0).overlap_ratio(&(3.0, 3.0)), 0.0);
        assert!(!(0.0, 1.0).overlaps(&(1.0, 2.0)));
    }
}
