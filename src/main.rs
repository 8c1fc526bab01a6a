// src/main.rs - Command line runner for the bundled sketches
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use sketchboard::config::{self, Config, TerminationPolicy};
use sketchboard::demos::{self, DEMOS};
use sketchboard::peripheral::PeripheralState;
use sketchboard::platform::{HeadlessPlatform, Platform};
use sketchboard::{RunSummary, SimError, SimResult, Simulation};

/// Tick limit applied to headless runs that configure no limit of their own
const HEADLESS_DEFAULT_TICKS: u64 = 600;

#[derive(Parser, Debug)]
#[command(name = "sketchboard", about = "Run sketches on a simulated microcontroller board.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the bundled demo sketches
    List,
    /// Run a demo sketch
    Run {
        /// Demo name (see `list`)
        demo: String,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run without a window, on a virtual clock
        #[arg(long)]
        headless: bool,

        /// Seed for the sketch's random numbers
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many main-loop ticks
        #[arg(long)]
        max_ticks: Option<u64>,

        /// Print the final board state as JSON (headless only)
        #[arg(long)]
        dump_state: bool,
    },
}

#[derive(Serialize)]
struct StateDump<'a> {
    demo: &'a str,
    summary: RunSummary,
    peripherals: Vec<PeripheralState>,
    serial: &'a [String],
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Run { config: Some(path), .. } => config::load_config(path),
        _ => Ok(Config::default()),
    };
    let level = config
        .as_ref()
        .ok()
        .and_then(|c| c.logging.max_level().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = config
        .map_err(SimError::from)
        .and_then(|config| execute(cli.command, config));
    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn execute(command: Commands, mut config: Config) -> SimResult<()> {
    let Commands::Run { demo, headless, seed, max_ticks, dump_state, .. } = command else {
        for demo in DEMOS {
            println!("{:<12} {}", demo.name, demo.description);
        }
        return Ok(());
    };

    let entry = demos::find(&demo).ok_or_else(|| {
        let names: Vec<&str> = DEMOS.iter().map(|d| d.name).collect();
        SimError::Platform(format!("unknown demo '{}' (available: {})", demo, names.join(", ")))
    })?;

    if let Some(seed) = seed {
        config.random.seed = Some(seed);
    }
    if let Some(ticks) = max_ticks {
        config.scheduler.max_ticks = ticks;
    }
    if config.window.title == Config::default().window.title {
        config.window.title = entry.title.to_string();
    }

    if dump_state && !headless {
        return Err(SimError::Platform("--dump-state requires --headless".to_string()));
    }

    let platform: Box<dyn Platform> = if headless {
        config.scheduler.termination = TerminationPolicy::Halt;
        if config.scheduler.max_ticks == 0 && config.scheduler.max_runtime_ms == 0 {
            tracing::info!("No run limit configured, stopping after {} ticks", HEADLESS_DEFAULT_TICKS);
            config.scheduler.max_ticks = HEADLESS_DEFAULT_TICKS;
        }
        Box::new(HeadlessPlatform::new().with_serial_echo(!dump_state))
    } else {
        window_platform(&config)?
    };

    let mut sim = Simulation::new(config, platform)?;
    let mut sketch = entry.build(&mut sim)?;
    let summary = sim.run(sketch.as_mut());

    if dump_state {
        let dump = StateDump {
            demo: entry.name,
            summary,
            peripherals: sim.snapshot(),
            serial: sim.serial_log(),
        };
        let json = serde_json::to_string_pretty(&dump)
            .map_err(|e| SimError::Platform(format!("failed to encode state: {e}")))?;
        println!("{json}");
    }
    sim.shutdown();
    Ok(())
}

#[cfg(feature = "window")]
fn window_platform(config: &Config) -> SimResult<Box<dyn Platform>> {
    let platform = sketchboard::platform::WindowPlatform::new(&config.window)?;
    Ok(Box::new(platform))
}

#[cfg(not(feature = "window"))]
fn window_platform(_config: &Config) -> SimResult<Box<dyn Platform>> {
    Err(SimError::Platform(
        "built without the `window` feature; rebuild with `--features window` or pass --headless"
            .to_string(),
    ))
}
