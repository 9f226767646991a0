use std::path::PathBuf;

use color_eyre::eyre;
use emses_toolbox_core::{
    formats::h5,
    geom::Plane,
    output::{default_file_name, output_path, PlotKind},
    pool::WorkerPool,
    slice::{LineSlice, PlaneSlice, PointSeries},
};
use emses_toolbox_plotters::{
    save_png, ContourPlot, Heatmap, LinePlot, QuiverPlot, DEFAULT_SIZE,
};
use tracing::info;

use crate::{
    Cmap2dArgs, CommonArgs, Contour2dArgs, Line1dArgs, PoolTestArgs, TimeseriesArgs,
    Vector2dArgs,
};

impl CommonArgs {
    /// Where the image goes, creating `<directory>/data` if needed.
    fn image_path(&self, default_name: impl FnOnce() -> String) -> eyre::Result<PathBuf> {
        let file_name = match &self.output {
            Some(name) => name.clone(),
            None => default_name(),
        };
        Ok(output_path(&self.directory, &file_name)?)
    }
}

pub fn line1d(args: &Line1dArgs) -> eyre::Result<PathBuf> {
    let common = &args.common;
    let axis = args.axis;

    let volume = h5::load_volume(&common.directory, &args.dname, args.index)?;
    let line = LineSlice::new(volume.view(), axis, &common.fixed(), common.rescale)?;

    let path = common.image_path(|| {
        default_file_name(&args.dname, args.index, &axis.to_string(), PlotKind::Line1d)
    })?;
    save_png(
        &path,
        DEFAULT_SIZE,
        &LinePlot {
            values: line.values.view(),
            title: &args.dname,
            x_desc: format!("{axis} [grid]"),
            y_desc: &args.dname,
        },
    )?;
    Ok(path)
}

fn load_plane(
    common: &CommonArgs,
    dname: &str,
    index: isize,
    plane: Plane,
) -> eyre::Result<PlaneSlice> {
    let volume = h5::load_volume(&common.directory, dname, index)?;
    Ok(PlaneSlice::new(
        volume.view(),
        plane,
        &common.fixed(),
        common.rescale,
    )?)
}

pub fn cmap2d(args: &Cmap2dArgs) -> eyre::Result<PathBuf> {
    let common = &args.common;
    let plane = args.axis;
    let slice = load_plane(common, &args.dname, args.index, plane)?;

    let path = common.image_path(|| {
        default_file_name(&args.dname, args.index, &plane.to_string(), PlotKind::Cmap2d)
    })?;
    save_png(
        &path,
        DEFAULT_SIZE,
        &Heatmap {
            slice: &slice,
            title: &args.dname,
            label: &args.dname,
        },
    )?;
    Ok(path)
}

pub fn contour2d(args: &Contour2dArgs) -> eyre::Result<PathBuf> {
    let common = &args.common;
    let plane = args.axis;
    let slice = load_plane(common, &args.dname, args.index, plane)?;

    let path = common.image_path(|| {
        default_file_name(&args.dname, args.index, &plane.to_string(), PlotKind::Contour2d)
    })?;
    save_png(
        &path,
        DEFAULT_SIZE,
        &ContourPlot {
            slice: &slice,
            title: &args.dname,
        },
    )?;
    Ok(path)
}

/// Field names of the horizontal and vertical components, e.g. `j1x` and
/// `j1z` for `j1` on the xz plane.
fn component_names(dname: &str, plane: Plane) -> [String; 2] {
    plane.dims().map(|dim| format!("{dname}{dim}"))
}

pub fn vector2d(args: &Vector2dArgs) -> eyre::Result<PathBuf> {
    let common = &args.common;
    let plane = args.axis;

    let [u_name, v_name] = component_names(&args.dname, plane);
    let u = load_plane(common, &u_name, args.index, plane)?;
    let v = load_plane(common, &v_name, args.index, plane)?;

    let title = format!("{}{plane}", args.dname);
    let path = common.image_path(|| {
        default_file_name(&args.dname, args.index, &plane.to_string(), PlotKind::Vector2d)
    })?;
    save_png(
        &path,
        DEFAULT_SIZE,
        &QuiverPlot {
            u: &u,
            v: &v,
            title: &title,
        },
    )?;
    Ok(path)
}

pub fn timeseries(args: &TimeseriesArgs) -> eyre::Result<PathBuf> {
    let common = &args.common;

    let series = h5::load_series(&common.directory, &args.dname, args.steps.as_deref())?;
    let point = PointSeries::new(series.view(), &common.fixed(), common.rescale)?;
    info!(point = ?point.point, steps = point.values.len(), "Sampled time series");

    let path = common.image_path(|| default_file_name(&args.dname, 0, "", PlotKind::Timeseries))?;
    save_png(
        &path,
        DEFAULT_SIZE,
        &LinePlot {
            values: point.values.view(),
            title: &args.dname,
            x_desc: "t [step / output interval]".to_string(),
            y_desc: &args.dname,
        },
    )?;
    Ok(path)
}

pub fn pool_test(args: &PoolTestArgs) -> eyre::Result<()> {
    let pool = WorkerPool::new(args.workers)?;
    let size = pool.size();

    for greeting in pool.map(0..size, |rank| {
        format!("Hello, world! from rank {rank} out of {size}")
    })? {
        println!("{greeting}");
    }

    let sum: u64 = pool.map(0..args.count, |item| item * 2)?.into_iter().sum();
    println!("Sum(2*range({})) = {sum}", args.count);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use emses_toolbox_core::{geom::Dim3D, slice::FixedCoords};
    use ndarray::Array3;

    use super::*;

    fn common(directory: PathBuf) -> CommonArgs {
        CommonArgs {
            directory,
            output: None,
            rescale: 1.0,
            x: None,
            y: None,
            z: None,
        }
    }

    /// Writes `<dir>/<dname>00_0000.h5` with `steps` volumes of shape
    /// `(nz, ny, nx)`, filled by `value(t, z, y, x)`.
    fn write_field(
        dir: &Path,
        dname: &str,
        steps: usize,
        (nz, ny, nx): (usize, usize, usize),
        value: impl Fn(usize, usize, usize, usize) -> f64,
    ) {
        let file = hdf5::File::create(h5::field_file_path(dir, dname)).unwrap();
        let group = file.create_group(dname).unwrap();
        for t in 0..steps {
            let data = Array3::from_shape_fn((nz, ny, nx), |(z, y, x)| value(t, z, y, x));
            group
                .new_dataset_builder()
                .with_data(&data)
                .create(format!("{t:04}").as_str())
                .unwrap();
        }
    }

    fn ramp(t: usize, z: usize, y: usize, x: usize) -> f64 {
        (1000 * t + 100 * z + 10 * y + x) as f64
    }

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", path.display());
    }

    #[test]
    fn missing_file_fails_before_plotting() {
        let dir = tempfile::tempdir().unwrap();
        let args = Cmap2dArgs {
            common: common(dir.path().to_path_buf()),
            dname: "phisp".to_string(),
            index: -1,
            axis: Plane::XY,
        };
        let err = cmap2d(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<h5::Error>(),
            Some(h5::Error::FileNotFound { .. })
        ));
        // Nothing was written
        assert!(!dir.path().join("data").exists());
    }

    #[test]
    fn output_name_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = common(dir.path().to_path_buf());
        assert_eq!(
            args.image_path(|| "default.png".to_string()).unwrap(),
            dir.path().join("data/default.png")
        );
        args.output = Some("mine.png".to_string());
        assert_eq!(
            args.image_path(|| "default.png".to_string()).unwrap(),
            dir.path().join("data/mine.png")
        );
        assert_eq!(args.fixed(), FixedCoords::center());
    }

    #[test]
    fn cmap2d_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        write_field(dir.path(), "phisp", 2, (6, 8, 10), ramp);

        let path = cmap2d(&Cmap2dArgs {
            common: common(dir.path().to_path_buf()),
            dname: "phisp".to_string(),
            index: -1,
            axis: Plane::XY,
        })
        .unwrap();
        assert_eq!(path, dir.path().join("data/phisp_-1_xy_cmap2d.png"));
        assert_png(&path);
    }

    #[test]
    fn line_contour_and_timeseries_write_files() {
        let dir = tempfile::tempdir().unwrap();
        write_field(dir.path(), "nd1p", 3, (6, 8, 10), ramp);
        let base = common(dir.path().to_path_buf());

        let line = line1d(&Line1dArgs {
            common: CommonArgs {
                y: Some(0),
                ..base.clone()
            },
            dname: "nd1p".to_string(),
            index: 0,
            axis: Dim3D::Z,
        })
        .unwrap();
        assert_eq!(line, dir.path().join("data/nd1p_0_z_line1d.png"));
        assert_png(&line);

        let contour = contour2d(&Contour2dArgs {
            common: base.clone(),
            dname: "nd1p".to_string(),
            index: -1,
            axis: Plane::XZ,
        })
        .unwrap();
        assert_eq!(contour, dir.path().join("data/nd1p_-1_xz_contour2d.png"));
        assert_png(&contour);

        let series = timeseries(&TimeseriesArgs {
            common: base,
            dname: "nd1p".to_string(),
            steps: None,
        })
        .unwrap();
        assert_eq!(series, dir.path().join("data/nd1p_timeseries.png"));
        assert_png(&series);
    }

    #[test]
    fn vector_components_follow_plane() {
        assert_eq!(component_names("j1", Plane::XZ), ["j1x", "j1z"]);
        assert_eq!(component_names("e", Plane::XY), ["ex", "ey"]);
        assert_eq!(component_names("b", Plane::YZ), ["by", "bz"]);
    }

    #[test]
    fn vector2d_reads_both_components() {
        let dir = tempfile::tempdir().unwrap();
        let args = Vector2dArgs {
            common: common(dir.path().to_path_buf()),
            dname: "j1".to_string(),
            index: -1,
            axis: Plane::XZ,
        };

        // Only the horizontal component exists, so the vertical one is missing
        write_field(dir.path(), "j1x", 1, (9, 3, 9), |_, _, _, _| 1.0);
        let err = vector2d(&args).unwrap_err();
        match err.downcast_ref::<h5::Error>() {
            Some(h5::Error::FileNotFound { path }) => {
                assert!(path.ends_with("j1z00_0000.h5"))
            }
            other => panic!("unexpected error: {other:?}"),
        }

        write_field(dir.path(), "j1z", 1, (9, 3, 9), |_, z, _, x| {
            x as f64 - z as f64
        });
        let path = vector2d(&args).unwrap();
        assert_eq!(path, dir.path().join("data/j1xz_-1_vector2d.png"));
        assert_png(&path);
    }

    #[test]
    fn pool_smoke_test() {
        pool_test(&PoolTestArgs {
            workers: 4,
            count: 1000,
        })
        .unwrap();
        assert!(pool_test(&PoolTestArgs {
            workers: 0,
            count: 10,
        })
        .is_err());
    }
}
