//! PNG renderers for sliced EMSES fields.

use std::path::Path;

use plotters::{
    coord::Shift,
    prelude::{BitMapBackend, DrawingArea, DrawingAreaErrorKind, DrawingBackend, IntoDrawingArea},
    style::WHITE,
};
use thiserror::Error;
use tracing::info;

pub mod colormap;
pub mod contour;
pub mod heatmap;
pub mod lines;
pub mod quiver;

pub use contour::ContourPlot;
pub use heatmap::Heatmap;
pub use lines::LinePlot;
pub use quiver::QuiverPlot;

/// Image size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (640, 480);

#[derive(Error, Debug)]
pub enum Error {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("No finite values to plot")]
    EmptyData,
    #[error("Vector components have different shapes: {0:?} and {1:?}")]
    ComponentShape((usize, usize), (usize, usize)),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for Error {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Drawing(err.to_string())
    }
}

/// Something that can be drawn onto a drawing area.
pub trait Figure {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), Error>;
}

/// Renders `figure` into a PNG at `path`.
pub fn save_png(path: &Path, size: (u32, u32), figure: &impl Figure) -> Result<(), Error> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    figure.draw(&root)?;
    root.present()?;
    info!(path = %path.display(), "Saved figure");
    Ok(())
}
