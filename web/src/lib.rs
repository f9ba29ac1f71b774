use clap::Parser;
use geoplace_core::{DistanceBands, DurationBounds, GameConfig, ScoringMode};
use wasm_bindgen::prelude::*;

pub use game::GeoGame;

mod events;
mod game;
mod memory;
mod reveal;
mod scheduler;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: GameArgs,
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
pub(crate) struct GameArgs {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// How many reference points are shown from the start
    #[arg(short = 'n', long, default_value_t = GameConfig::DEFAULT_START_COUNT)]
    start_points: usize,

    /// Reveal every point instantly
    #[arg(long)]
    no_animation: bool,

    /// Placed markers cannot be dragged anymore
    #[arg(long)]
    fixed_markers: bool,

    /// Longest reveal animation of a single point, in milliseconds
    #[arg(long, default_value_t = DurationBounds::default().max_ms)]
    max_duration: f64,

    /// Also award points, one less per started band of this many meters
    #[arg(long)]
    score_band: Option<f64>,
}

impl Args {
    /// Parses `#-n3&--seed=42` style location hashes like a command line.
    pub(crate) fn from_hash(hash: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(hash.split(['#', '&']))
    }

    /// Options clap rejects fall back to the defaults.
    pub(crate) fn from_location() -> Result<Self, clap::Error> {
        let hash = location_hash();
        Self::from_hash(&hash).or_else(|err| {
            log::warn!("ignoring invalid options {:?}: {}", hash, err);
            Self::from_hash("")
        })
    }

    pub(crate) fn game(&self) -> &GameArgs {
        &self.game
    }
}

impl GameArgs {
    pub(crate) fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Options that make no valid configuration together are replaced by the defaults.
    pub(crate) fn config(&self) -> GameConfig {
        let defaults = GameConfig::default();
        let durations = DurationBounds {
            max_ms: self.max_duration,
            ..defaults.durations
        };
        let scoring = match self.score_band {
            Some(band_m) => ScoringMode::Bands(DistanceBands {
                band_m,
                ..Default::default()
            }),
            None => ScoringMode::Distance,
        };

        let config = GameConfig {
            start_count: self.start_points,
            animate: !self.no_animation,
            allow_correction: !self.fixed_markers,
            durations,
            scoring,
            ..defaults
        };
        config.validate().unwrap_or_else(|err| {
            log::warn!("ignoring options {:?}: {}", self, err);
            defaults
        })
    }
}

fn location_hash() -> String {
    gloo::utils::window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string())
}

#[wasm_bindgen(start)]
pub fn run_app() {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let args = Args::from_location().expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("options: {:?}", args.game);
}
