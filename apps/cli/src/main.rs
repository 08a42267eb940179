use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use shmlab_core::motion::velocity;
use shmlab_core::{
    default_presets, format_tooltip, generate_waveform, load_config, position, save_config,
    FrameScheduler, IntervalScheduler, ManualTimeSource, MonotonicTimeSource, Simulation,
    SimulationConfig, SimulationParameters, SteppedScheduler, TimeSource,
};
use std::io::{self, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Simple harmonic motion simulator")]
struct Args {
    /// JSON config file to start from
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Named preset, e.g. "slow-and-wide"
    #[arg(long, global = true)]
    preset: Option<String>,
    /// Amplitude in px, clamped to [20, 200]
    #[arg(short = 'a', long, global = true, allow_negative_numbers = true)]
    amplitude: Option<f64>,
    /// Frequency in Hz, clamped to [0.1, 2]
    #[arg(short = 'f', long, global = true, allow_negative_numbers = true)]
    frequency: Option<f64>,
    /// Initial phase in rad, clamped to [-π, π]
    #[arg(short = 'p', long, global = true, allow_negative_numbers = true)]
    phase: Option<f64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the position (and velocity) at one instant
    Eval {
        /// Seconds since start
        #[arg(short, long, default_value_t = 0.0)]
        time: f64,
    },
    /// Print the waveform table
    Table {
        #[arg(long, value_enum, default_value_t = TableFormat::Csv)]
        format: TableFormat,
    },
    /// Run the animation loop, printing one line per frame
    Animate {
        /// Stop after this many frames
        #[arg(long)]
        frames: Option<u64>,
        /// Stop once this many seconds have elapsed
        #[arg(long)]
        duration: Option<f64>,
        /// Step simulated time instead of waiting on the wall clock
        #[arg(long)]
        offline: bool,
    },
    /// Write the effective configuration as JSON
    SaveConfig { path: PathBuf },
    /// List the built-in presets
    Presets,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TableFormat {
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    match &args.command {
        Command::Eval { time } => {
            let params = config.parameters;
            println!("t = {time:.3} s");
            println!("x = {}", format_tooltip(position(&params, *time)));
            println!("v = {:.1} px/s", velocity(&params, *time));
        }
        Command::Table { format } => print_table(&config, *format)?,
        Command::Animate {
            frames,
            duration,
            offline,
        } => {
            let limits = Limits {
                frames: *frames,
                duration: *duration,
            };
            if *offline {
                let source = ManualTimeSource::new();
                let step = Duration::from_secs_f64(1.0 / config.frame_rate_hz);
                let mut scheduler = SteppedScheduler::new(source.clone(), step);
                animate(Simulation::new(&config, source), &mut scheduler, limits)?;
            } else {
                let mut scheduler = IntervalScheduler::from_rate(config.frame_rate_hz);
                animate(
                    Simulation::new(&config, MonotonicTimeSource::default()),
                    &mut scheduler,
                    limits,
                )?;
            }
        }
        Command::SaveConfig { path } => {
            save_config(path, &config)?;
            println!("Saved configuration to {}.", path.display());
        }
        Command::Presets => {
            for preset in default_presets() {
                let params = preset.config.parameters;
                println!(
                    "{:<24} A={:>5.0} f={:.2} φ={:+.2}",
                    preset_key(&preset.name),
                    params.amplitude,
                    params.frequency,
                    params.phase
                );
            }
        }
    }
    Ok(())
}

fn resolve_config(args: &Args) -> anyhow::Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(name) = &args.preset {
        let preset = default_presets()
            .into_iter()
            .find(|preset| preset_key(&preset.name) == name.to_lowercase())
            .with_context(|| format!("unknown preset {name:?}; see `shmlab presets`"))?;
        config.parameters = preset.config.parameters;
    }
    let params = config.parameters;
    config.parameters = SimulationParameters::clamped(
        args.amplitude.unwrap_or(params.amplitude),
        args.frequency.unwrap_or(params.frequency),
        args.phase.unwrap_or(params.phase),
    );
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn preset_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn print_table(config: &SimulationConfig, format: TableFormat) -> anyhow::Result<()> {
    let table = generate_waveform(&config.parameters, &config.window);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match format {
        TableFormat::Csv => {
            writeln!(out, "t,x")?;
            for sample in &table {
                writeln!(out, "{:.2},{}", sample.t, sample.x)?;
            }
        }
        TableFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &table).context("writing waveform table")?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    frames: Option<u64>,
    duration: Option<f64>,
}

impl Limits {
    fn reached(&self, frame: u64, elapsed: f64) -> bool {
        self.frames.is_some_and(|max| frame >= max) || self.duration.is_some_and(|max| elapsed >= max)
    }
}

fn animate<S, R>(mut simulation: Simulation<S>, scheduler: &mut R, limits: Limits) -> anyhow::Result<()>
where
    S: TimeSource,
    R: FrameScheduler,
{
    let token = simulation.start();
    if limits.frames.is_none() && limits.duration.is_none() {
        ctrlc::set_handler(move || token.cancel()).context("installing Ctrl+C handler")?;
        eprintln!("Animating; press Ctrl+C to stop.");
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_error = None;
    let delivered = simulation.run(scheduler, |_, frame| {
        let line = format!(
            "{:>6}  t={:>8.3}s  x={:>8.1} px  |{}|",
            frame.index,
            frame.elapsed,
            frame.position,
            body_track(frame.position)
        );
        if let Err(err) = writeln!(out, "{line}") {
            write_error = Some(err);
            return ControlFlow::Break(());
        }
        if limits.reached(frame.index, frame.elapsed) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    if let Some(err) = write_error {
        return Err(err).context("writing frame");
    }
    tracing::info!(frames = delivered, "animation finished");
    Ok(())
}

/// One-line rendering of the body: `o` at its offset on a ±200 px track.
fn body_track(position: f64) -> String {
    const WIDTH: usize = 41;
    let half = (WIDTH / 2) as f64;
    let slot = (half + (position / 200.0) * half).round().clamp(0.0, (WIDTH - 1) as f64) as usize;
    (0..WIDTH)
        .map(|i| match i {
            _ if i == slot => 'o',
            _ if i == WIDTH / 2 => '+',
            _ => '-',
        })
        .collect()
}
