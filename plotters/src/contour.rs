use emses_toolbox_core::{
    common::{arr_meta::ArrayStats, range::Range},
    slice::PlaneSlice,
};
use ndarray::ArrayView2;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use tracing::debug;

use crate::{colormap, Error, Figure};

pub type Point = (f64, f64);
pub type Segment = (Point, Point);

pub const LEVELS: usize = 5;

/// `n` levels evenly spaced strictly inside `range`.
pub fn levels(range: Range<f64>, n: usize) -> Vec<f64> {
    (1..=n)
        .map(|k| range.unmap(k as f64 / (n + 1) as f64))
        .collect()
}

/// Point where the field crosses `level` on the edge `p -> q`.
fn crossing(level: f64, p: Point, vp: f64, q: Point, vq: f64) -> Point {
    let t = (level - vp) / (vq - vp);
    (p.0 + t * (q.0 - p.0), p.1 + t * (q.1 - p.1))
}

/// Marching squares over samples placed at integer coordinates, `values`
/// indexed `[x, y]`.
pub fn iso_segments(values: ArrayView2<f64>, level: f64) -> Vec<Segment> {
    let (nx, ny) = values.dim();
    let mut segments = Vec::new();

    for i in 0..nx.saturating_sub(1) {
        for j in 0..ny.saturating_sub(1) {
            let (x0, y0, x1, y1) = (i as f64, j as f64, i as f64 + 1.0, j as f64 + 1.0);
            // Corners counter-clockwise from the lower left
            let a = ((x0, y0), values[[i, j]]);
            let b = ((x1, y0), values[[i + 1, j]]);
            let c = ((x1, y1), values[[i + 1, j + 1]]);
            let d = ((x0, y1), values[[i, j + 1]]);

            if [a.1, b.1, c.1, d.1].iter().any(|v| !v.is_finite()) {
                continue;
            }

            let case = [a, b, c, d]
                .iter()
                .enumerate()
                .fold(0u8, |acc, (bit, (_, v))| {
                    acc | (u8::from(*v >= level) << bit)
                });
            if case == 0 || case == 15 {
                continue;
            }

            // Each edge is always interpolated in the same direction so cells
            // sharing it produce identical points
            let bottom = || crossing(level, a.0, a.1, b.0, b.1);
            let right = || crossing(level, b.0, b.1, c.0, c.1);
            let top = || crossing(level, d.0, d.1, c.0, c.1);
            let left = || crossing(level, a.0, a.1, d.0, d.1);
            let center_above = (a.1 + b.1 + c.1 + d.1) / 4.0 >= level;

            match case {
                1 | 14 => segments.push((left(), bottom())),
                2 | 13 => segments.push((bottom(), right())),
                3 | 12 => segments.push((left(), right())),
                4 | 11 => segments.push((right(), top())),
                6 | 9 => segments.push((bottom(), top())),
                7 | 8 => segments.push((left(), top())),
                5 if center_above => {
                    segments.push((bottom(), right()));
                    segments.push((top(), left()));
                }
                5 => {
                    segments.push((left(), bottom()));
                    segments.push((right(), top()));
                }
                10 if center_above => {
                    segments.push((left(), bottom()));
                    segments.push((right(), top()));
                }
                _ => {
                    segments.push((bottom(), right()));
                    segments.push((top(), left()));
                }
            }
        }
    }

    segments
}

/// Where the inline label of a contour line is placed.
pub fn label_position(segments: &[Segment]) -> Option<Point> {
    let (p, q) = segments.get(segments.len() / 2)?;
    Some(((p.0 + q.0) / 2.0, (p.1 + q.1) / 2.0))
}

pub fn format_level(level: f64) -> String {
    format!("{level:.1}")
}

/// Contour lines of a plane with inline level labels.
pub struct ContourPlot<'a> {
    pub slice: &'a PlaneSlice,
    pub title: &'a str,
}

impl Figure for ContourPlot<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error> {
        let values = self.slice.values.view();
        let (nx, ny) = self.slice.extent();
        let stats = ArrayStats::new(values.iter().copied()).ok_or(Error::EmptyData)?;
        let plane = self.slice.plane;

        let mut chart = ChartBuilder::on(root)
            .caption(self.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(
                0.0..(nx.max(2) - 1) as f64,
                0.0..(ny.max(2) - 1) as f64,
            )?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(format!("{} [grid]", plane.horizontal()))
            .y_desc(format!("{} [grid]", plane.vertical()))
            .draw()?;

        for level in levels(stats.range, LEVELS) {
            let segments = iso_segments(values, level);
            debug!(level, segments = segments.len(), "Contour level");

            let color = colormap::jet_in(stats.range, level);
            chart.draw_series(
                segments
                    .iter()
                    .map(|(p, q)| PathElement::new(vec![*p, *q], color.stroke_width(2))),
            )?;

            if let Some(pos) = label_position(&segments) {
                let style = ("sans-serif", 12)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                chart.draw_series(std::iter::once(Text::new(format_level(level), pos, style)))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{arr2, Array2};

    use super::*;

    fn close(p: Point, q: Point) -> bool {
        (p.0 - q.0).abs() < 1e-9 && (p.1 - q.1).abs() < 1e-9
    }

    #[test]
    fn five_levels_inside_range() {
        let levels = levels(Range::new(0.0, 6.0), LEVELS);
        assert_eq!(levels.len(), 5);
        for (level, expected) in levels.iter().zip([1.0, 2.0, 3.0, 4.0, 5.0]) {
            assert!((level - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn single_cell() {
        // Increasing along x only
        let values = arr2(&[[0.0, 0.0], [1.0, 1.0]]);
        let segments = iso_segments(values.view(), 0.5);
        assert_eq!(segments.len(), 1);
        let (p, q) = segments[0];
        assert!(close(p, (0.5, 0.0)));
        assert!(close(q, (0.5, 1.0)));
    }

    #[test]
    fn level_outside_data() {
        let values = arr2(&[[0.0, 1.0], [2.0, 3.0]]);
        assert!(iso_segments(values.view(), 10.0).is_empty());
        assert!(iso_segments(values.view(), -1.0).is_empty());
    }

    #[test]
    fn skips_cells_with_nan() {
        let values = arr2(&[[0.0, f64::NAN], [1.0, 1.0]]);
        assert!(iso_segments(values.view(), 0.5).is_empty());
    }

    #[test]
    fn closed_loop_around_minimum() {
        let values = Array2::from_shape_fn((5, 5), |(i, j)| {
            let (x, y) = (i as f64 - 2.0, j as f64 - 2.0);
            x * x + y * y
        });
        let segments = iso_segments(values.view(), 1.5);
        assert_eq!(segments.len(), 12);

        // Every end point is shared by exactly two segments
        let points = segments.iter().flat_map(|(p, q)| [*p, *q]).collect::<Vec<_>>();
        for p in &points {
            assert_eq!(points.iter().filter(|q| close(*p, **q)).count(), 2);
        }
    }

    #[test]
    fn saddle_produces_two_segments() {
        let values = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(iso_segments(values.view(), 0.5).len(), 2);
    }

    #[test]
    fn labels() {
        assert_eq!(format_level(1.26), "1.3");
        assert_eq!(format_level(-0.04), "-0.0");
        assert!(label_position(&[]).is_none());
        assert_eq!(
            label_position(&[((0.0, 0.0), (2.0, 2.0))]),
            Some((1.0, 1.0))
        );
    }
}
