use emses_toolbox_core::common::arr_meta::ArrayStats;
use ndarray::ArrayView1;
use plotters::{coord::Shift, prelude::*};

use crate::{Error, Figure};

/// A single series over the sample index, with grid lines.
pub struct LinePlot<'a> {
    pub values: ArrayView1<'a, f64>,
    pub title: &'a str,
    pub x_desc: String,
    pub y_desc: &'a str,
}

impl LinePlot<'_> {
    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .filter(|(_, v)| v.is_finite())
    }
}

impl Figure for LinePlot<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error> {
        let stats = ArrayStats::new(self.values.iter().copied()).ok_or(Error::EmptyData)?;
        let y = stats.range.non_empty();
        let pad = y.width() * 0.05;
        let x_max = self.values.len().saturating_sub(1).max(1) as f64;

        let mut chart = ChartBuilder::on(root)
            .caption(self.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..x_max, (y.min - pad)..(y.max + pad))?;

        chart
            .configure_mesh()
            .x_desc(self.x_desc.as_str())
            .y_desc(self.y_desc)
            .draw()?;

        chart.draw_series(LineSeries::new(self.points(), BLUE.stroke_width(2)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::arr1;

    use super::*;

    #[test]
    fn points_skip_nan() {
        let values = arr1(&[1.0, f64::NAN, 3.0]);
        let plot = LinePlot {
            values: values.view(),
            title: "phisp",
            x_desc: "z [grid]".to_string(),
            y_desc: "phisp",
        };
        assert_eq!(plot.points().collect::<Vec<_>>(), [(0.0, 1.0), (2.0, 3.0)]);
    }
}
