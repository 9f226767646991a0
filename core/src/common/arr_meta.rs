use super::range::Range;

/// Summary statistics over the finite values of an array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayStats {
    pub range: Range<f64>,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl ArrayStats {
    /// Returns `None` when there is no finite value.
    pub fn new(data: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut data = data.into_iter().filter(|x| x.is_finite());
        let first = data.next()?;
        let mut range = Range::new(first, first);
        let mut count = 1usize;
        // Welford
        let mut mean = first;
        let mut m2 = 0.0;
        for value in data {
            range = range.expand(value);
            count += 1;
            let delta = value - mean;
            mean += delta / count as f64;
            m2 += delta * (value - mean);
        }
        Some(Self {
            range,
            mean,
            std_dev: (m2 / count as f64).sqrt(),
            count,
        })
    }
}
