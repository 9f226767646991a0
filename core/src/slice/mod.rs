//! Selection of lines, planes and points out of `zyx` ordered field volumes.

use miette::Diagnostic;
use ndarray::{
    s, Array1, Array2, ArrayD, ArrayView2, ArrayView3, ArrayView4, Axis, Ix1, Ix2, IxDyn,
    ShapeError,
};
use thiserror::Error;
use tracing::debug;

use crate::geom::{Dim3D, Plane, Vec3, Vec3U};

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Fixed {dim} coordinate {coord} is outside of the grid (extent {len})")]
    #[diagnostic(code(emses_tbx::slice::coord_out_of_range))]
    CoordOutOfRange { dim: Dim3D, coord: usize, len: usize },

    #[error("Axis {0} selected more than once")]
    #[diagnostic(code(emses_tbx::slice::duplicate_axis))]
    DuplicateAxis(Dim3D),

    #[error("Sliced data has an unexpected shape: {0}")]
    #[diagnostic(code(emses_tbx::slice::shape))]
    Shape(#[from] ShapeError),
}

/// Optional pinned index per axis. Unset coordinates fall back to the center
/// of the axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixedCoords(pub Vec3<Option<usize>>);

impl FixedCoords {
    pub fn new(x: Option<usize>, y: Option<usize>, z: Option<usize>) -> Self {
        Self(Vec3::new(x, y, z))
    }

    pub fn center() -> Self {
        Self::default()
    }

    /// Pinned index per axis. Every axis, defaulted or not, must hold the
    /// resolved index, so an empty axis is always out of range.
    pub fn resolve(&self, shape: Vec3U) -> Result<Vec3U, Error> {
        let pinned = shape.map(|dim, len| (self.0[dim].unwrap_or(len / 2), len));
        for (dim, (coord, len)) in pinned.enumerate() {
            if coord >= len {
                return Err(Error::CoordOutOfRange { dim, coord, len });
            }
        }
        Ok(pinned.map(|_, (coord, _)| coord))
    }
}

fn volume_shape(volume: &ArrayView3<f64>) -> Vec3U {
    let (nz, ny, nx) = volume.dim();
    Vec3::new(nx, ny, nz)
}

/// Keeps the axes in `keep` full-range and pins every other axis at its
/// fixed coordinate. The result has one axis per entry of `keep`, in that
/// order, and every value multiplied by `rescale`.
pub fn slice_volume(
    volume: ArrayView3<f64>,
    keep: &[Dim3D],
    fixed: &FixedCoords,
    rescale: f64,
) -> Result<ArrayD<f64>, Error> {
    for (i, dim) in keep.iter().enumerate() {
        if keep[..i].contains(dim) {
            return Err(Error::DuplicateAxis(*dim));
        }
    }

    let coords = fixed.resolve(volume_shape(&volume))?;
    debug!(?keep, ?coords, rescale, "Slicing field volume");

    // Pin from the last array axis backwards so earlier axis numbers stay valid
    let mut view = volume.into_dyn();
    for dim in Dim3D::iter().rev() {
        if !keep.contains(&dim) {
            view = view.index_axis_move(dim.array_axis(), coords[dim]);
        }
    }

    // Remaining axes are in storage order, reorder them as requested
    let mut stored = keep.to_vec();
    stored.sort_by_key(|dim| *dim as u8);
    let order = keep
        .iter()
        .map(|dim| stored.iter().position(|d| d == dim).unwrap_or_default())
        .collect::<Vec<_>>();
    let view = view.permuted_axes(IxDyn(&order));

    Ok(view.mapv(|v| v * rescale))
}

/// Values along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSlice {
    pub axis: Dim3D,
    pub values: Array1<f64>,
}

impl LineSlice {
    pub fn new(
        volume: ArrayView3<f64>,
        axis: Dim3D,
        fixed: &FixedCoords,
        rescale: f64,
    ) -> Result<Self, Error> {
        let values = slice_volume(volume, &[axis], fixed, rescale)?.into_dimensionality::<Ix1>()?;
        Ok(Self { axis, values })
    }
}

/// Values on a plane, indexed `[horizontal, vertical]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneSlice {
    pub plane: Plane,
    pub values: Array2<f64>,
}

impl PlaneSlice {
    pub fn new(
        volume: ArrayView3<f64>,
        plane: Plane,
        fixed: &FixedCoords,
        rescale: f64,
    ) -> Result<Self, Error> {
        let values =
            slice_volume(volume, &plane.dims(), fixed, rescale)?.into_dimensionality::<Ix2>()?;
        Ok(Self { plane, values })
    }

    /// `(horizontal, vertical)` number of samples.
    pub fn extent(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Every `stride`-th sample in both dimensions, starting at 0.
    pub fn coarsen(&self, stride: usize) -> ArrayView2<'_, f64> {
        coarsen(self.values.view(), stride)
    }
}

pub fn coarsen(values: ArrayView2<'_, f64>, stride: usize) -> ArrayView2<'_, f64> {
    let stride = stride.max(1) as isize;
    values.slice_move(s![..;stride, ..;stride])
}

/// Values at a single grid point over all steps of a `(t, z, y, x)` series.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    pub point: Vec3U,
    pub values: Array1<f64>,
}

impl PointSeries {
    pub fn new(series: ArrayView4<f64>, fixed: &FixedCoords, rescale: f64) -> Result<Self, Error> {
        let (_, nz, ny, nx) = series.dim();
        let point = fixed.resolve(Vec3::new(nx, ny, nz))?;
        debug!(?point, steps = series.len_of(Axis(0)), "Sampling time series");
        let values = series
            .slice(s![.., point.z, point.y, point.x])
            .mapv(|v| v * rescale);
        Ok(Self { point, values })
    }
}
