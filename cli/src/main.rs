use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use emses_toolbox_core::{
    geom::{Dim3D, Plane},
    slice::FixedCoords,
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 1D visualization of field data such as potential (phisp) and electron density (nd1p)
    Line1d(Line1dArgs),
    /// 2D colormap visualization of scalar data such as potential (phisp) and electron density (nd1p)
    Cmap2d(Cmap2dArgs),
    /// 2D contour visualization of scalar data such as potential (phisp) and electron density (nd1p)
    Contour2d(Contour2dArgs),
    /// 2D vector visualization of vector data such as current (j1x, j1z) and electric field (ex, ez)
    Vector2d(Vector2dArgs),
    /// 1D timeseries visualization of scalar data at a single grid point
    Timeseries(TimeseriesArgs),
    /// Maps a doubling function over a range on a fixed-size worker pool
    PoolTest(PoolTestArgs),
}

/// Options shared by all plot commands.
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Directory where simulation output data exists
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Output image file name, written into <DIRECTORY>/data
    #[arg(short, long)]
    output: Option<String>,

    /// Multiplication factor to rescale data
    #[arg(short, long, default_value_t = 1.0, allow_negative_numbers = true)]
    rescale: f64,

    /// Fixed x grid index [default: center]
    #[arg(short, long)]
    x: Option<usize>,

    /// Fixed y grid index [default: center]
    #[arg(short, long)]
    y: Option<usize>,

    /// Fixed z grid index [default: center]
    #[arg(short, long)]
    z: Option<usize>,
}

impl CommonArgs {
    fn fixed(&self) -> FixedCoords {
        FixedCoords::new(self.x, self.y, self.z)
    }
}

#[derive(Args, Debug)]
struct Line1dArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Field data name
    #[arg(short, long, default_value = "phisp")]
    dname: String,

    /// Output index, negative values count from the last output
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    index: isize,

    /// Axis to plot along: x, y or z
    #[arg(short, long, default_value_t = Dim3D::Z)]
    axis: Dim3D,
}

#[derive(Args, Debug)]
struct Cmap2dArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Field data name
    #[arg(short, long, default_value = "phisp")]
    dname: String,

    /// Output index, negative values count from the last output
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    index: isize,

    /// Plane to plot, horizontal axis first: xy, xz or yz
    #[arg(short, long, default_value_t = Plane::XY)]
    axis: Plane,
}

#[derive(Args, Debug)]
struct Contour2dArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Field data name
    #[arg(short, long, default_value = "phisp")]
    dname: String,

    /// Output index, negative values count from the last output
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    index: isize,

    /// Plane to plot, horizontal axis first: xy, xz or yz
    #[arg(short, long, default_value_t = Plane::XZ)]
    axis: Plane,
}

#[derive(Args, Debug)]
struct Vector2dArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Vector field name, components are read from <DNAME><axis>00_0000.h5
    #[arg(short, long, default_value = "j1")]
    dname: String,

    /// Output index, negative values count from the last output
    #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
    index: isize,

    /// Plane to plot, horizontal axis first: xy, xz or yz
    #[arg(short, long, default_value_t = Plane::XZ)]
    axis: Plane,
}

#[derive(Args, Debug)]
struct TimeseriesArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Field data name
    #[arg(short, long, default_value = "phisp")]
    dname: String,

    /// Comma separated output indexes to include [default: all]
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    steps: Option<Vec<isize>>,
}

#[derive(Args, Debug)]
struct PoolTestArgs {
    /// Number of workers
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// Length of the mapped range
    #[arg(short, long, default_value_t = 1000)]
    count: u64,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match &args.command {
        Command::Line1d(args) => commands::line1d(args).map(drop),
        Command::Cmap2d(args) => commands::cmap2d(args).map(drop),
        Command::Contour2d(args) => commands::contour2d(args).map(drop),
        Command::Vector2d(args) => commands::vector2d(args).map(drop),
        Command::Timeseries(args) => commands::timeseries(args).map(drop),
        Command::PoolTest(args) => commands::pool_test(args),
    }
}
