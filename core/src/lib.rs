//! Game engine of a map guessing game: a few reference points are shown, the player places the
//! others on the map, then every guess is revealed and scored by its distance to the truth.

pub use animation::*;
pub use area::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use events::*;
pub use geo::*;
pub use memory::*;
pub use point::*;
pub use reveal::*;
pub use scoring::*;
pub use selection::*;
pub use sequencer::*;
pub use session::*;
pub use utils::*;

mod animation;
mod area;
mod config;
mod controller;
mod error;
mod events;
mod geo;
mod memory;
mod point;
mod reveal;
mod scoring;
mod selection;
mod sequencer;
mod session;
mod utils;
