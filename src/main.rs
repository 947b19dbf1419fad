use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gridsnake::config::{
    AppConfig, ColorOverrides, Features, Rgb, SessionOverrides, load_config, player_name,
};
use gridsnake::modes::{PlayMode, run_export};
use gridsnake::storage::{DataPaths, ScoreKeeper};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridsnake")]
#[command(version, about = "Grid snake with procedural levels and a persisted leaderboard")]
struct Cli {
    /// Program mode
    #[arg(long, value_enum, default_value = "play")]
    mode: Mode,

    /// Profile slot (1-5)
    #[arg(long)]
    profile: Option<u32>,

    /// Grid width in cells
    #[arg(long)]
    cols: Option<u32>,

    /// Grid height in cells
    #[arg(long)]
    rows: Option<u32>,

    /// Starting tick interval in milliseconds
    #[arg(long)]
    speed: Option<u32>,

    /// RNG seed; any integer, folded into 32 bits
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Wrap around the grid edges
    #[arg(long, conflicts_with = "no_wrap")]
    wrap: bool,

    /// Stop at the grid edges
    #[arg(long)]
    no_wrap: bool,

    /// Challenge code (v1:seed:cols:rows:wrap:speed:preset), applied last
    #[arg(long)]
    challenge: Option<String>,

    /// Background color (#RRGGBB)
    #[arg(long)]
    bg: Option<Rgb>,

    /// Grid and wall color (#RRGGBB)
    #[arg(long)]
    grid: Option<Rgb>,

    /// Food color (#RRGGBB)
    #[arg(long)]
    food: Option<Rgb>,

    /// Snake head color (#RRGGBB)
    #[arg(long)]
    head: Option<Rgb>,

    /// Snake body color (#RRGGBB)
    #[arg(long)]
    body: Option<Rgb>,

    /// Name recorded on leaderboard entries
    #[arg(long)]
    name: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Full game: profiles, leaderboard, challenge codes
    Play,
    /// Single profile, no leaderboard or challenges
    Classic,
    /// Write the HTML and JSON leaderboard exports and exit
    Export,
}

impl Mode {
    fn features(self) -> Features {
        match self {
            Mode::Play | Mode::Export => Features::full(),
            Mode::Classic => Features::classic(),
        }
    }
}

impl Cli {
    fn overrides(&self) -> SessionOverrides {
        let wrap = if self.wrap {
            Some(true)
        } else if self.no_wrap {
            Some(false)
        } else {
            None
        };

        SessionOverrides {
            profile: self.profile,
            colors: ColorOverrides {
                bg: self.bg,
                grid: self.grid,
                food: self.food,
                head: self.head,
                body: self.body,
            },
            cols: self.cols,
            rows: self.rows,
            speed_ms: self.speed,
            seed: self.seed,
            wrap,
            challenge: self.challenge.clone(),
        }
    }
}

/// Log to a file; the terminal belongs to the game. Without a usable log
/// file the game runs without logging.
fn init_tracing(log_file: &Path) {
    let Ok(file) = open_log(log_file) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = DataPaths::from_env();
    init_tracing(&paths.log_file());

    let features = cli.mode.features();
    let player = cli.name.clone().unwrap_or_else(player_name);
    let keeper = ScoreKeeper::new(paths.clone(), features, player);

    if let Mode::Export = cli.mode {
        return run_export(&keeper);
    }

    // Defaults, then the profile's config file, then the command line
    let overrides = cli.overrides();
    let mut config = AppConfig {
        profile: overrides.profile(features),
        ..AppConfig::default()
    };
    let config_path = paths.config(config.profile);
    if let Err(e) = load_config(&mut config, &config_path) {
        warn!(error = %e, path = %config_path.display(), "ignoring unreadable config");
    }
    if let Err(e) = overrides.apply(&mut config, features) {
        warn!(error = %e, "ignoring invalid challenge code");
        eprintln!("warning: {e}");
    }
    info!(profile = config.profile, player = keeper.player(), "gridsnake starting");

    let mut play_mode = PlayMode::new(config, keeper);
    play_mode.run().await.context("Game loop failed")?;

    Ok(())
}
