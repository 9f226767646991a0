use emses_toolbox_core::{
    common::{arr_meta::ArrayStats, range::Range},
    slice::PlaneSlice,
};
use plotters::{coord::Shift, prelude::*};
use tracing::debug;

use crate::{colormap, Error, Figure};

const COLORBAR_WIDTH: u32 = 120;
const COLORBAR_LABEL_AREA: u32 = 75;
const COLORBAR_STEPS: usize = 256;

/// Colormap image of a plane with a colorbar.
pub struct Heatmap<'a> {
    pub slice: &'a PlaneSlice,
    pub title: &'a str,
    /// Colorbar label, usually the field name.
    pub label: &'a str,
}

fn iter_2d(w: usize, h: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..w).flat_map(move |x| (0..h).map(move |y| (x, y)))
}

impl Figure for Heatmap<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error> {
        let values = &self.slice.values;
        let (w, h) = self.slice.extent();
        let stats = ArrayStats::new(values.iter().copied()).ok_or(Error::EmptyData)?;
        debug!(
            min = stats.range.min,
            max = stats.range.max,
            mean = stats.mean,
            std_dev = stats.std_dev,
            finite = stats.count,
            "Colormap data"
        );
        let range = stats.range;
        let plane = self.slice.plane;

        let (width, _) = root.dim_in_pixel();
        let (image_area, bar_area) = root.split_horizontally(width.saturating_sub(COLORBAR_WIDTH));

        let mut chart = ChartBuilder::on(&image_area)
            .caption(self.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..w as f64, 0.0..h as f64)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(format!("{} [grid]", plane.horizontal()))
            .y_desc(format!("{} [grid]", plane.vertical()))
            .draw()?;

        chart.draw_series(iter_2d(w, h).map(|(x, y)| {
            let color = colormap::jet_in(range, values[[x, y]]);
            let (x, y) = (x as f64, y as f64);
            Rectangle::new([(x, y), (x + 1.0, y + 1.0)], color.filled())
        }))?;

        draw_colorbar(&bar_area, range, self.label)
    }
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    range: Range<f64>,
    label: &str,
) -> Result<(), Error> {
    let axis = range.non_empty();

    let mut chart = ChartBuilder::on(area)
        .margin_top(45)
        .margin_bottom(50)
        .margin_right(10)
        .y_label_area_size(COLORBAR_LABEL_AREA)
        .build_cartesian_2d(0.0..1.0, axis.min..axis.max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(6)
        .y_label_style(("sans-serif", 12))
        .y_desc(label)
        .axis_desc_style(("sans-serif", 14))
        .draw()?;

    let step = axis.width() / COLORBAR_STEPS as f64;
    chart.draw_series((0..COLORBAR_STEPS).map(|i| {
        let lo = axis.min + step * i as f64;
        let color = colormap::jet_in(range, lo + step / 2.0);
        Rectangle::new([(0.0, lo), (1.0, lo + step)], color.filled())
    }))?;

    Ok(())
}
