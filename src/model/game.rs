use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::common::{Color, Site, Title};

/// A finished (or ongoing) game, normalized across sites.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "game")]
pub struct Game {
    pub site: Site,
    pub id: String,
    pub links: GameLinks,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_move_at: Option<i64>,
    /// Standard starting position and standard rules.
    pub is_standard: bool,
    pub result: GameResult,
    pub players: GamePlayers,
    pub time_control: TimeControl,
    pub opening: Opening,
    /// Empty for non-standard games.
    pub moves: Vec<Move>,
    /// Remaining clock after each move, in centiseconds.
    pub clocks: Vec<u32>,
    /// Engine annotations aligned by index with `moves`.
    pub analysis: Vec<Analysis>,
}

/// Analysis-board links, one oriented for each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameLinks {
    pub white: String,
    pub black: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GamePlayers {
    pub white: GamePlayer,
    pub black: GamePlayer,
}

impl GamePlayers {
    pub fn get(&self, color: Color) -> &GamePlayer {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GamePlayer {
    pub username: String,
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Decisive { winner: Color, via: Termination },
    Draw { via: Option<Termination> },
}

impl GameResult {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameResult::Decisive { winner, .. } => Some(*winner),
            GameResult::Draw { .. } => None,
        }
    }

    pub fn via(&self) -> Option<Termination> {
        match self {
            GameResult::Decisive { via, .. } => Some(*via),
            GameResult::Draw { via } => *via,
        }
    }

    /// Display label, derived from the outcome alone.
    pub fn label(&self) -> ResultLabel {
        match self {
            GameResult::Decisive {
                winner: Color::White,
                ..
            } => ResultLabel::WhiteWins,
            GameResult::Decisive {
                winner: Color::Black,
                ..
            } => ResultLabel::BlackWins,
            GameResult::Draw { .. } => ResultLabel::Draw,
        }
    }
}

impl Serialize for GameResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GameResult", 3)?;
        match self {
            GameResult::Decisive { winner, via } => {
                state.serialize_field("winner", winner)?;
                state.serialize_field("via", via)?;
            }
            GameResult::Draw { via } => {
                state.serialize_field("outcome", "draw")?;
                match via {
                    Some(via) => state.serialize_field("via", via)?,
                    None => state.skip_field("via")?,
                }
            }
        }
        state.serialize_field("label", &self.label())?;
        state.end()
    }
}

/// Why a game ended.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Termination {
    Agreement,
    Insufficient,
    Repetition,
    #[serde(rename = "50moves")]
    #[strum(serialize = "50moves")]
    FiftyMoves,
    Stalemate,
    Checkmate,
    Resignation,
    Timeout,
    Abandonment,
    NoStart,
    Cheat,
    /// A variant-specific ending, e.g. three checks or king of the hill.
    Variant,
}

/// Conventional result notation.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
pub enum ResultLabel {
    #[serde(rename = "1-0")]
    #[strum(serialize = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    #[strum(serialize = "0-1")]
    BlackWins,
    #[serde(rename = "½-½")]
    #[strum(serialize = "½-½")]
    Draw,
    /// Not decided, as written in PGN for unfinished games.
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    Undecided,
}

/// Clock settings. Correspondence games only carry a per-move allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum TimeControl {
    Clock { initial: u32, increment: u32 },
    Correspondence { correspondence: u32 },
}

/// Opening name and ECO code; both empty when the site does not report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Opening {
    pub name: String,
    pub eco: String,
}

/// A single half-move from the movetext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Move {
    pub number: u32,
    pub color: Color,
    /// SAN, e.g. `Nxe5+`.
    pub notation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Remaining clock from a `[%clk]` annotation, in centiseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<u32>,
}

/// One engine annotation, passed through as the site reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Centipawns from white's point of view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mate: Option<i32>,
    /// Best move in UCI notation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judgment: Option<Judgment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    /// `Inaccuracy`, `Mistake` or `Blunder`.
    pub name: String,
    pub comment: String,
}
