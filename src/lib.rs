//! Normalized player, tournament and game data from Lichess and Chess.com.
//!
//! Both sites are reached through [`ChessClient`]. Its URL-driven entry
//! points pick the site from the shape of a public URL; the per-site
//! methods can be called directly when the site is already known.

pub use client::ChessClient;
pub use config::ClientConfig;
pub use error::{CallbackError, CallbackResult, ChessError, Result};
pub use model::*;

mod chesscom;
mod client;
pub mod config;
mod error;
mod lichess;
pub mod model;
mod ndjson;
mod pgn;
mod router;
mod transport;
