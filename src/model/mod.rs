mod common;
mod game;
mod params;
mod profile;
mod tournament;

pub use common::*;
pub use game::*;
pub use params::*;
pub use profile::*;
pub use tournament::*;
