use serde::Serialize;

use super::common::Site;
use super::game::TimeControl;

/// Tournament format. Derived from the raw payload's shape, never supplied.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TournamentType {
    /// Continuous pairing for a fixed duration.
    Arena,
    /// A fixed number of rounds.
    Swiss,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tournament {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub site: Site,
    pub url: String,
    pub name: String,
    pub time_control: TimeControl,
    pub is_finished: bool,
    pub player_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TournamentStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TournamentStats {
    pub games: u32,
}
