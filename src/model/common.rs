use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The platform a record was fetched from.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum_macros::Display,
)]
pub enum Site {
    #[serde(rename = "lichess")]
    #[strum(serialize = "lichess")]
    Lichess,
    #[serde(rename = "chess.com")]
    #[strum(serialize = "chess.com")]
    Chesscom,
}

/// A side of the board.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The opposing side.
    pub fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Player titles recognized on either site.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Title {
    Gm,
    Im,
    Fm,
    Cm,
    Nm,
    Wgm,
    Wim,
    Wfm,
    Wcm,
    Wnm,
    /// Lichess Master.
    Lm,
    /// Automated account.
    Bot,
}

impl Title {
    /// Human titles that Chess.com publishes a titled-player list for.
    pub const CHESSCOM_CATEGORIES: [Title; 10] = [
        Title::Cm,
        Title::Fm,
        Title::Gm,
        Title::Im,
        Title::Nm,
        Title::Wcm,
        Title::Wfm,
        Title::Wgm,
        Title::Wim,
        Title::Wnm,
    ];

    /// Parse an upstream title code, logging and dropping unknown ones.
    pub(crate) fn from_code(code: &str) -> Option<Title> {
        match Title::from_str(code) {
            Ok(title) => Some(title),
            Err(_) => {
                warn!(code, "ignoring unknown title");
                None
            }
        }
    }
}

/// Lower-cased username to title, built once per bulk fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitledPlayers(HashMap<String, Title>);

impl TitledPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `username` as holding `title`. Later inserts win.
    pub fn insert(&mut self, username: &str, title: Title) {
        self.0.insert(username.to_lowercase(), title);
    }

    /// Case-insensitive lookup; unknown players have no title.
    pub fn get(&self, username: &str) -> Option<Title> {
        self.0.get(&username.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, Title)> for TitledPlayers {
    fn from_iter<I: IntoIterator<Item = (&'a str, Title)>>(iter: I) -> Self {
        let mut players = TitledPlayers::new();
        for (username, title) in iter {
            players.insert(username, title);
        }
        players
    }
}
