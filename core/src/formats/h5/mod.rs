//! Reader for EMSES field output.
//!
//! EMSES writes one HDF5 file per field, `<dname>00_0000.h5`. The file holds a
//! single top-level group whose members are the output steps, each a 3D
//! dataset in `zyx` order.

use std::path::{Path, PathBuf};

use hdf5::{File, Group};
use ndarray::{Array3, Array4, Axis, Ix3};
use tracing::{debug, instrument};

mod err;

pub use err::Error;

/// Location of the output file for field `dname` inside `directory`.
pub fn field_file_path(directory: &Path, dname: &str) -> PathBuf {
    directory.join(format!("{dname}00_0000.h5"))
}

/// Resolves a possibly negative step index against `len` steps.
///
/// Negative indices count from the end, `-1` being the last step.
pub fn resolve_index(index: isize, len: usize) -> Result<usize, Error> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        Some(index.unsigned_abs())
    };
    match resolved {
        Some(i) if i < len => Ok(i),
        _ => Err(Error::IndexOutOfRange { index, len }),
    }
}

#[derive(Debug)]
pub struct FieldFile {
    path: PathBuf,
    group_name: String,
    steps: Vec<String>,
    group: Group,
    // Keeps the file handle alive as long as the group is in use
    _file: File,
}

impl FieldFile {
    #[instrument]
    pub fn open(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            return Err(Error::FileNotFound { path });
        }

        let file = File::open(path)?;
        let group_name = file
            .member_names()?
            .into_iter()
            .next()
            .ok_or(Error::NoGroup)?;
        let group = file.group(&group_name)?;
        let steps = group.member_names()?;

        debug!(group = %group_name, steps = steps.len(), "Selected field group");

        Ok(Self {
            path: path.to_path_buf(),
            group_name,
            steps,
            group,
            _file: file,
        })
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Names of the output steps, in file order.
    pub fn step_names(&self) -> &[String] {
        &self.steps
    }

    /// Reads the field volume of output step `index`.
    pub fn volume(&self, index: isize) -> Result<Array3<f64>, Error> {
        let i = resolve_index(index, self.steps.len())?;
        self.read_step(i)
    }

    /// Reads the selected output steps (all of them for `None`) stacked into
    /// a `(t, z, y, x)` array.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn series(&self, indexes: Option<&[isize]>) -> Result<Array4<f64>, Error> {
        let len = self.steps.len();
        let selected = match indexes {
            Some(indexes) => indexes
                .iter()
                .map(|&index| resolve_index(index, len))
                .collect::<Result<Vec<_>, _>>()?,
            None => (0..len).collect(),
        };
        if selected.is_empty() {
            return Err(Error::NoSteps);
        }

        let volumes = selected
            .into_iter()
            .map(|i| self.read_step(i))
            .collect::<Result<Vec<_>, _>>()?;
        let views = volumes.iter().map(|v| v.view()).collect::<Vec<_>>();
        let series = ndarray::stack(Axis(0), &views)?;

        debug!(shape = ?series.shape(), "Stacked output steps");
        Ok(series)
    }

    fn read_step(&self, i: usize) -> Result<Array3<f64>, Error> {
        let name = &self.steps[i];
        let data = self.group.dataset(name)?.read::<f64, Ix3>()?;
        debug!(step = %name, shape = ?data.shape(), "Loaded field volume");
        Ok(data)
    }
}

/// Loads one field volume of `dname` from `directory`.
pub fn load_volume(directory: &Path, dname: &str, index: isize) -> Result<Array3<f64>, Error> {
    FieldFile::open(&field_file_path(directory, dname))?.volume(index)
}

/// Loads the time series of `dname` from `directory`.
pub fn load_series(
    directory: &Path,
    dname: &str,
    indexes: Option<&[isize]>,
) -> Result<Array4<f64>, Error> {
    FieldFile::open(&field_file_path(directory, dname))?.series(indexes)
}
