use serde::{Deserialize, Serialize};

use super::common::Color;

/// Sort order for the Lichess game export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum GameSort {
    DateAsc,
    DateDesc,
}

/// Lichess performance categories usable as a game filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PerfType {
    UltraBullet,
    Bullet,
    Blitz,
    Rapid,
    Classical,
    Correspondence,
    Chess960,
    Crazyhouse,
    Antichess,
    Atomic,
    Horde,
    KingOfTheHill,
    RacingKings,
    ThreeCheck,
}

/// Filters for game listings.
///
/// Lichess forwards every set field upstream as a query parameter. Chess.com
/// applies `since` and `max` on the client and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameParams {
    /// Epoch milliseconds. Chess.com rejects anything but 13 digits.
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub max: Option<u32>,
    pub vs: Option<String>,
    pub rated: Option<bool>,
    pub perf_type: Option<PerfType>,
    pub color: Option<Color>,
    pub analysed: Option<bool>,
    pub moves: Option<bool>,
    pub pgn_in_json: Option<bool>,
    pub tags: Option<bool>,
    pub clocks: Option<bool>,
    pub evals: Option<bool>,
    pub opening: Option<bool>,
    pub ongoing: Option<bool>,
    pub finished: Option<bool>,
    pub literate: Option<bool>,
    pub players: Option<String>,
    pub sort: Option<GameSort>,
}

impl GameParams {
    pub fn since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }

    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    /// Set fields as `(name, value)` pairs, in declaration order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        fn push<T: ToString>(
            pairs: &mut Vec<(&'static str, String)>,
            key: &'static str,
            value: &Option<T>,
        ) {
            if let Some(value) = value {
                pairs.push((key, value.to_string()));
            }
        }

        let mut pairs = Vec::new();
        push(&mut pairs, "since", &self.since);
        push(&mut pairs, "until", &self.until);
        push(&mut pairs, "max", &self.max);
        push(&mut pairs, "vs", &self.vs);
        push(&mut pairs, "rated", &self.rated);
        push(&mut pairs, "perfType", &self.perf_type);
        push(&mut pairs, "color", &self.color);
        push(&mut pairs, "analysed", &self.analysed);
        push(&mut pairs, "moves", &self.moves);
        push(&mut pairs, "pgnInJson", &self.pgn_in_json);
        push(&mut pairs, "tags", &self.tags);
        push(&mut pairs, "clocks", &self.clocks);
        push(&mut pairs, "evals", &self.evals);
        push(&mut pairs, "opening", &self.opening);
        push(&mut pairs, "ongoing", &self.ongoing);
        push(&mut pairs, "finished", &self.finished);
        push(&mut pairs, "literate", &self.literate);
        push(&mut pairs, "players", &self.players);
        push(&mut pairs, "sort", &self.sort);
        pairs
    }
}
