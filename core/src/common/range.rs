use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range<N> {
    pub min: N,
    pub max: N,
}

impl<N> Range<N> {
    pub fn new(min: N, max: N) -> Self {
        Self { min, max }
    }
}

impl<N: Sub<Output = N> + Div<Output = N> + Copy> Range<N> {
    pub fn width(&self) -> <N as Sub>::Output {
        self.max - self.min
    }

    /// Maps `value` into `0..=1` relative to the range.
    pub fn map(&self, value: N) -> <<N as Sub>::Output as Div>::Output {
        (value - self.min) / self.width()
    }

    /// Inverse of [`Range::map`].
    pub fn unmap(&self, t: N) -> N
    where
        N: Mul<Output = N> + Add<Output = N>,
    {
        self.min + self.width() * t
    }
}

impl<N: PartialOrd + Copy> Range<N> {
    pub fn expand(&self, new: N) -> Self {
        Self::new(
            if self.min < new { self.min } else { new },
            if self.max > new { self.max } else { new },
        )
    }
}

impl Range<f64> {
    /// Widens a degenerate range so it can be used as a plot axis.
    pub fn non_empty(self) -> Self {
        if self.max > self.min {
            return self;
        }
        let pad = if self.min == 0.0 {
            0.5
        } else {
            self.min.abs() * 0.05
        };
        Self::new(self.min - pad, self.max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_unmap() {
        let range = Range::new(-2.0, 6.0);
        assert_eq!(range.width(), 8.0);
        assert_eq!(range.map(2.0), 0.5);
        assert_eq!(range.unmap(0.25), 0.0);
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        assert_eq!(Range::new(0.0, 0.0).non_empty(), Range::new(-0.5, 0.5));
        let r = Range::new(10.0, 10.0).non_empty();
        assert!(r.min < 10.0 && r.max > 10.0);
        assert_eq!(Range::new(1.0, 2.0).non_empty(), Range::new(1.0, 2.0));
    }
}
