use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

use sciquant_bench::report::{
    first_per_dataset, read_lossless_csv, read_quantized_csv, tradeoff_curve, write_lossless_csv, write_quantized_csv,
    REAL_MICROSCOPY, SIMULATED_STACK,
};
use sciquant_bench::{export_visualization, run_lossless, run_quantized, scan_dir, BenchError, DatasetSource, SweepConfig};
use sciquant_codecs::CoderKind;
use sciquant_core::{CallConvention, LosslessCodec, QuantizationMode};
use sciquant_store::{describe, VariableSet};
use sciquant_synth::{generate, generate_microscopy_stack, EntropyLevel, MicroscopyParams, STACK_NAME};

#[derive(Parser, Debug)]
#[command(author, version, about = "Compression trade-off benchmark for scientific images")]
struct Args {
    /// JSON sweep configuration; flags below override its fields
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base seed for generators
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Entropy coder: zstd, lz4, rle or stored
    #[arg(long, global = true)]
    coder: Option<CoderKind>,

    /// Coder level (zstd)
    #[arg(long, global = true)]
    level: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the synthetic datasets
    Generate {
        #[arg(long, default_value = "data/simulated")]
        out_dir: PathBuf,
        /// Side length of the uint8 entropy images
        #[arg(long, default_value_t = 2048)]
        size: usize,
        /// Side length of the microscopy frames
        #[arg(long, default_value_t = 256)]
        frame_size: usize,
        #[arg(long, default_value_t = 2000)]
        frames: usize,
    },
    /// Exact round trips of every uint8 dataset
    Lossless {
        #[arg(long, default_value = "data/simulated")]
        data_dir: PathBuf,
        #[arg(long, default_value = "uint8_")]
        prefix: String,
        #[arg(long, default_value = "results/02/lossless.csv")]
        out: PathBuf,
    },
    /// Scale sweep over the simulated stack and, when present, real data
    Quantize {
        #[arg(long, default_value = "data/simulated/microscopy_stack.sqa")]
        sim: PathBuf,
        /// Labeled-variable container with real acquisitions
        #[arg(long)]
        real: Option<PathBuf>,
        /// Variable to read from the container; largest array when omitted
        #[arg(long)]
        variable: Option<String>,
        /// Time axis of the real stack, used for the visualization slice
        #[arg(long, default_value_t = 0)]
        time_axis: usize,
        /// Comma-separated scales
        #[arg(long, value_delimiter = ',')]
        scales: Option<Vec<f64>>,
        #[arg(long)]
        mode: Option<QuantizationMode>,
        #[arg(long, default_value = "results/03/quantization.csv")]
        out: PathBuf,
        #[arg(long, default_value = "results/03")]
        vis_dir: PathBuf,
    },
    /// Describe the variables of a container
    Inspect { path: PathBuf },
    /// Summaries drawn from the result tables
    Report {
        #[arg(long, default_value = "results/02/lossless.csv")]
        lossless: PathBuf,
        #[arg(long, default_value = "results/03/quantization.csv")]
        quantized: PathBuf,
    },
}

fn load_config(args: &Args) -> Result<SweepConfig> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::from_json_file(path).with_context(|| format!("read config {}", path.display()))?,
        None => SweepConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(coder) = args.coder {
        config.coder = coder;
    }
    if let Some(level) = args.level {
        config.level = level;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let mut config = load_config(&args)?;

    match &args.command {
        Command::Generate {
            out_dir,
            size,
            frame_size,
            frames,
        } => cmd_generate(&config, out_dir, *size, *frame_size, *frames),
        Command::Lossless { data_dir, prefix, out } => cmd_lossless(&config, data_dir, prefix, out),
        Command::Quantize {
            sim,
            real,
            variable,
            time_axis,
            scales,
            mode,
            out,
            vis_dir,
        } => {
            if let Some(scales) = scales {
                config.scales = scales.clone();
            }
            if let Some(mode) = mode {
                config.mode = *mode;
            }
            config.validate()?;
            cmd_quantize(&config, sim, real.as_deref(), variable.clone(), *time_axis, out, vis_dir)
        }
        Command::Inspect { path } => cmd_inspect(path),
        Command::Report { lossless, quantized } => cmd_report(lossless, quantized),
    }
}

fn cmd_generate(config: &SweepConfig, out_dir: &Path, size: usize, frame_size: usize, frames: usize) -> Result<()> {
    std::fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    println!("Generating uint8 data ({}x{})...", size, size);
    for (i, level) in EntropyLevel::ALL.into_iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
        let ds = generate(&[size, size], level, &mut rng)?;
        let path = ds.save_in(out_dir)?;
        println!("  {} -> {}", ds.name, path.display());
    }

    println!("Generating microscopy stack (uint16, {} frames)...", frames);
    let params = MicroscopyParams {
        height: frame_size,
        width: frame_size,
        n_frames: frames,
        ..MicroscopyParams::default()
    };
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(EntropyLevel::ALL.len() as u64));
    let stack = generate_microscopy_stack(&params, &mut rng)?;
    let path = stack.save_in(out_dir)?;
    println!("  {} -> {}", STACK_NAME, path.display());

    println!("Data generated in {}", out_dir.display());
    Ok(())
}

fn cmd_lossless(config: &SweepConfig, data_dir: &Path, prefix: &str, out: &Path) -> Result<()> {
    let sources = match scan_dir(data_dir, prefix) {
        Ok(s) => s,
        Err(e) if e.is_recoverable() => {
            println!("{}. Run `generate` first.", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let codec = LosslessCodec::new(config.build_coder());
    let records = match run_lossless(&sources, &codec) {
        Err(e @ BenchError::CorrectnessViolation { .. }) => {
            println!("FAILURE: lossless round trip is not exact");
            return Err(e.into());
        }
        other => other?,
    };

    for r in &records {
        let row = r.to_row();
        println!(
            "  {:<24} {:<9} {:>8.2} MB -> {:>8.2} MB  ratio {:>6.3}  enc {:>8.1} MB/s  dec {:>8.1} MB/s",
            row.dataset, row.method, row.orig_mb, row.comp_mb, row.ratio, row.comp_speed_mb_s, row.decomp_speed_mb_s
        );
    }
    write_lossless_csv(out, &records)?;
    println!("Results saved to {}", out.display());
    Ok(())
}

fn cmd_quantize(
    config: &SweepConfig,
    sim: &Path,
    real: Option<&Path>,
    variable: Option<String>,
    time_axis: usize,
    out: &Path,
    vis_dir: &Path,
) -> Result<()> {
    let mut sources = vec![DatasetSource::array_file(SIMULATED_STACK, sim)];
    // the container is decoded once and shared by the sweep and the slice export
    let real_dataset = match real.map(|p| DatasetSource::container(REAL_MICROSCOPY, p, variable)) {
        None => None,
        Some(source) => match source.load() {
            Ok(ds) => Some(ds),
            Err(e) if e.is_recoverable() => {
                println!("Real data not available: {}", e);
                None
            }
            Err(e) => return Err(e.into()),
        },
    };
    sources.extend(real_dataset.clone().map(DatasetSource::InMemory));

    let records = run_quantized(&sources, config)?;
    for r in &records {
        let row = r.to_row();
        println!(
            "  {:<16} scale {:>4}  ratio {:>6.3}  rmse {:>8.4}  psnr {:>7.2} dB  max_err {:>5}",
            row.dataset, row.scale, row.ratio, row.rmse, row.psnr, row.max_error
        );
    }

    if let Some(ds) = &real_dataset {
        let coder = config.build_coder();
        let vis = export_visualization(ds, time_axis, config.mode, coder.as_ref(), vis_dir)
            .context("export visualization slice")?;
        println!(
            "Saved visualization slices ({}, {}), offset {}",
            vis.original.display(),
            vis.decompressed.display(),
            vis.offset
        );
    }

    write_quantized_csv(out, &records)?;
    println!("Results saved to {}", out.display());
    Ok(())
}

fn cmd_inspect(path: &Path) -> Result<()> {
    let vars = VariableSet::load(path).with_context(|| format!("load {}", path.display()))?;
    println!("Analyzing file: {}", path.display());
    println!("{}", "-".repeat(50));
    let names: Vec<_> = vars.names().filter(|n| !sciquant_store::is_metadata(n)).collect();
    println!("Found variables: {:?}", names);
    println!("{}", "-".repeat(50));
    for summary in describe(&vars) {
        println!("{}", summary);
        println!("{}", "-".repeat(30));
    }
    Ok(())
}

fn cmd_report(lossless: &Path, quantized: &Path) -> Result<()> {
    let rows = read_lossless_csv(lossless).context("read lossless results")?;
    let method = CallConvention::BySize.label();
    println!("Lossless compression ratio ({}):", method);
    for row in first_per_dataset(&rows, method) {
        println!(
            "  {:<24} ratio {:>6.3}  enc {:>8.1} MB/s  dec {:>8.1} MB/s",
            row.dataset, row.ratio, row.comp_speed_mb_s, row.decomp_speed_mb_s
        );
    }

    let rows = read_quantized_csv(quantized).context("read quantization results")?;
    let Some((dataset, curve)) = tradeoff_curve(&rows, REAL_MICROSCOPY, SIMULATED_STACK) else {
        bail!("no quantization rows for {} or {}", REAL_MICROSCOPY, SIMULATED_STACK);
    };
    println!("Quantization trade-off ({}):", dataset);
    println!("  {:>6}  {:>8}  {:>8}  {:>9}", "scale", "ratio", "rmse", "psnr");
    for row in curve {
        println!("  {:>6}  {:>8.3}  {:>8.4}  {:>9.2}", row.scale, row.ratio, row.rmse, row.psnr);
    }
    Ok(())
}
