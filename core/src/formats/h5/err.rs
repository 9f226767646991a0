use std::path::PathBuf;

use miette::Diagnostic;
use ndarray::ShapeError;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("the following h5 filepath is not found: {}", .path.display())]
    #[diagnostic(
        code(emses_tbx::h5::file_not_found),
        help("Expected EMSES output named <dname>00_0000.h5 in the given directory")
    )]
    FileNotFound { path: PathBuf },

    #[error("HDF5 file has no top-level group")]
    #[diagnostic(code(emses_tbx::h5::no_group))]
    NoGroup,

    #[error("No output steps selected")]
    #[diagnostic(code(emses_tbx::h5::no_steps))]
    NoSteps,

    #[error("Output index {index} is out of range ({len} steps available)")]
    #[diagnostic(code(emses_tbx::h5::index_out_of_range))]
    IndexOutOfRange { index: isize, len: usize },

    #[error("Output steps have mismatching shapes: {0}")]
    #[diagnostic(code(emses_tbx::h5::shape))]
    Shape(#[from] ShapeError),

    #[error("HDF5 error: {0}")]
    #[diagnostic(code(emses_tbx::h5::hdf5))]
    Hdf5(#[from] hdf5::Error),
}
