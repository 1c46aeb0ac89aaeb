//! Command line front end: centerline diagnostics and STL export.
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};
use tube::{
    io::{
        centerline::{self, Ingested},
        stl::{self, StlFormat},
    },
    RadiusProfile, TubeConfig,
};

#[derive(Parser)]
#[command(name = "tube", version)]
#[command(about = "Sweep a tube mesh along a centerline read from CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the point count, bounding box and radius statistics of a centerline file
    Info {
        /// Centerline file, asked for on stdin if omitted
        path: Option<PathBuf>,
    },
    /// Sweep a tube along a centerline file and write it as STL
    Build(BuildArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Centerline file, asked for on stdin if omitted
    path: Option<PathBuf>,

    /// Where to write the STL
    #[arg(short, long, default_value = "tube.stl")]
    output: PathBuf,

    /// JSON tube configuration, flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of sides of the tube cross-section
    #[arg(short, long)]
    sides: Option<usize>,

    /// Constant tube radius
    #[arg(short, long, conflicts_with_all = ["start_radius", "end_radius"])]
    radius: Option<f64>,

    /// Sine profile radius at the ends
    #[arg(long, requires = "end_radius")]
    start_radius: Option<f64>,

    /// Sine profile radius at the middle
    #[arg(long, requires = "start_radius")]
    end_radius: Option<f64>,

    /// Write ASCII STL rather than binary
    #[arg(long)]
    ascii: bool,
}

impl BuildArgs {
    fn tube_config(&self) -> anyhow::Result<TubeConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let s = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str::<TubeConfig>(&s)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => TubeConfig::default(),
        };

        if let Some(sides) = self.sides {
            cfg.sides = sides;
        }
        if let Some(r) = self.radius {
            cfg.radius = RadiusProfile::Constant(r);
        }
        if let (Some(start), Some(end)) = (self.start_radius, self.end_radius) {
            cfg.radius = RadiusProfile::Sine { start, end };
        }

        Ok(cfg)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { path } => info(path),
        Commands::Build(args) => build(args),
    }
}

fn info(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = resolve_path(path)?;
    let x = read(&path)?;

    print!("{}", x.report());

    Ok(())
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
    // configuration problems are reported before touching the input
    let cfg = args.tube_config()?;
    cfg.validate().context("invalid tube configuration")?;

    let path = resolve_path(args.path.clone())?;
    let x = read(&path)?;
    let had_header = x.had_header;
    let centerline = x
        .into_centerline()
        .with_context(|| format!("building centerline from {}", path.display()))?;

    println!(
        "Loaded point count: {}{}",
        centerline.len(),
        if had_header { " (header)" } else { "" }
    );

    let mesh = tube::build_tube(&centerline, &cfg)?;

    let format = if args.ascii {
        StlFormat::Ascii
    } else {
        StlFormat::Binary
    };
    stl::save_stl(&mesh, &args.output, format)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!("STL saved to: {}", args.output.display());

    Ok(())
}

fn read(path: &Path) -> anyhow::Result<Ingested> {
    centerline::from_path(path).with_context(|| format!("reading {}", path.display()))
}

/// Use the given path, otherwise ask for one on stdin.
fn resolve_path(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = path {
        return Ok(path);
    }

    print!("Enter CSV file path: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        bail!("file selection canceled");
    }

    Ok(PathBuf::from(line))
}
