use emses_toolbox_core::slice::{coarsen, PlaneSlice};
use ndarray::ArrayView2;
use plotters::{coord::Shift, prelude::*};
use tracing::debug;

use crate::{contour::Point, Error, Figure};

/// Grid stride between drawn arrows.
pub const STRIDE: usize = 4;
/// Longest arrow as a fraction of the stride.
const FILL: f64 = 0.9;
const HEAD_LENGTH: f64 = 0.3;
const HEAD_ANGLE: f64 = 25.0 * std::f64::consts::PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub tail: Point,
    pub head: Point,
}

impl Arrow {
    pub fn length(&self) -> f64 {
        (self.head.0 - self.tail.0).hypot(self.head.1 - self.tail.1)
    }

    /// End points of the two barbs of the arrow head.
    pub fn barbs(&self) -> [Point; 2] {
        let (dx, dy) = (self.head.0 - self.tail.0, self.head.1 - self.tail.1);
        let len = HEAD_LENGTH * self.length();
        let angle = dy.atan2(dx) + std::f64::consts::PI;
        [angle - HEAD_ANGLE, angle + HEAD_ANGLE]
            .map(|a| (self.head.0 + len * a.cos(), self.head.1 + len * a.sin()))
    }
}

/// Arrows for the components `u` (horizontal) and `v` (vertical), both
/// indexed `[x, y]`, sampled every `stride` grid points.
///
/// Arrows are scaled so the longest spans `FILL * stride` grid units. Zero
/// and non-finite vectors are left out.
pub fn arrows(u: ArrayView2<f64>, v: ArrayView2<f64>, stride: usize) -> Result<Vec<Arrow>, Error> {
    if u.dim() != v.dim() {
        return Err(Error::ComponentShape(u.dim(), v.dim()));
    }
    let stride = stride.max(1);
    let (u, v) = (coarsen(u, stride), coarsen(v, stride));

    let max = u
        .iter()
        .zip(v.iter())
        .map(|(u, v)| u.hypot(*v))
        .filter(|m| m.is_finite())
        .fold(0.0, f64::max);
    if max <= 0.0 {
        return Ok(Vec::new());
    }
    let scale = FILL * stride as f64 / max;

    let arrows = u
        .indexed_iter()
        .zip(v.iter())
        .filter(|((_, u), v)| u.is_finite() && v.is_finite() && (**u != 0.0 || **v != 0.0))
        .map(|(((i, j), u), v)| {
            let tail = ((i * stride) as f64, (j * stride) as f64);
            Arrow {
                tail,
                head: (tail.0 + u * scale, tail.1 + v * scale),
            }
        })
        .collect();
    Ok(arrows)
}

/// Quiver plot of two component planes.
pub struct QuiverPlot<'a> {
    pub u: &'a PlaneSlice,
    pub v: &'a PlaneSlice,
    pub title: &'a str,
}

impl Figure for QuiverPlot<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error> {
        let arrows = arrows(self.u.values.view(), self.v.values.view(), STRIDE)?;
        debug!(arrows = arrows.len(), "Quiver arrows");

        let (nx, ny) = self.u.extent();
        let plane = self.u.plane;
        let pad = STRIDE as f64 / 2.0;

        let mut chart = ChartBuilder::on(root)
            .caption(self.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-pad..nx as f64 + pad, -pad..ny as f64 + pad)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(format!("{} [grid]", plane.horizontal()))
            .y_desc(format!("{} [grid]", plane.vertical()))
            .draw()?;

        let style = BLACK.stroke_width(1);
        chart.draw_series(
            arrows
                .iter()
                .map(|arrow| PathElement::new(vec![arrow.tail, arrow.head], style)),
        )?;
        chart.draw_series(arrows.iter().map(|arrow| {
            let [left, right] = arrow.barbs();
            PathElement::new(vec![left, arrow.head, right], style)
        }))?;

        Ok(())
    }
}
