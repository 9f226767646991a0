use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use tracing::debug;

/// Name of the subdirectory images are written to.
pub const DATA_DIR: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotKind {
    Line1d,
    Cmap2d,
    Contour2d,
    Vector2d,
    Timeseries,
}

impl PlotKind {
    pub fn suffix(self) -> &'static str {
        match self {
            PlotKind::Line1d => "line1d",
            PlotKind::Cmap2d => "cmap2d",
            PlotKind::Contour2d => "contour2d",
            PlotKind::Vector2d => "vector2d",
            PlotKind::Timeseries => "timeseries",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Creates `<directory>/data` unless it already exists and returns its path.
pub fn ensure_data_dir(directory: &Path) -> io::Result<PathBuf> {
    let dir = directory.join(DATA_DIR);
    std::fs::create_dir_all(&dir)?;
    debug!(dir = %dir.display(), "Output directory ready");
    Ok(dir)
}

/// File name used when none is given on the command line.
///
/// `axis` is the axis or plane label (`"z"`, `"xy"`, ...) and is ignored for
/// time series, as is `index`.
pub fn default_file_name(dname: &str, index: isize, axis: &str, kind: PlotKind) -> String {
    match kind {
        PlotKind::Timeseries => format!("{dname}_{kind}.png"),
        PlotKind::Vector2d => format!("{dname}{axis}_{index}_{kind}.png"),
        PlotKind::Line1d | PlotKind::Cmap2d | PlotKind::Contour2d => {
            format!("{dname}_{index}_{axis}_{kind}.png")
        }
    }
}

/// Path of the image inside `<directory>/data`, creating the directory.
pub fn output_path(directory: &Path, file_name: &str) -> io::Result<PathBuf> {
    Ok(ensure_data_dir(directory)?.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names() {
        assert_eq!(
            default_file_name("phisp", -1, "xy", PlotKind::Cmap2d),
            "phisp_-1_xy_cmap2d.png"
        );
        assert_eq!(
            default_file_name("nd1p", 3, "z", PlotKind::Line1d),
            "nd1p_3_z_line1d.png"
        );
        assert_eq!(
            default_file_name("phisp", -1, "xz", PlotKind::Contour2d),
            "phisp_-1_xz_contour2d.png"
        );
        assert_eq!(
            default_file_name("j1", -1, "xz", PlotKind::Vector2d),
            "j1xz_-1_vector2d.png"
        );
        assert_eq!(
            default_file_name("phisp", 7, "", PlotKind::Timeseries),
            "phisp_timeseries.png"
        );
    }

    #[test]
    fn data_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let first = ensure_data_dir(dir.path()).unwrap();
        let second = ensure_data_dir(dir.path()).unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
        assert_eq!(
            output_path(dir.path(), "a.png").unwrap(),
            dir.path().join("data").join("a.png")
        );
    }
}
