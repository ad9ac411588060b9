use serde::Serialize;

use super::common::{Site, Title};

/// A player's public profile, normalized across sites.
///
/// A disabled (closed) account carries only `site`, `username` and `link`;
/// `details` is `None` and nothing about ratings or activity is reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "profile")]
pub struct Profile {
    pub site: Site,
    pub username: String,
    pub link: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(flatten)]
    pub details: Option<ProfileDetails>,
}

impl Profile {
    /// An open account with its full details.
    pub fn active(site: Site, username: String, link: String, details: ProfileDetails) -> Self {
        Self {
            site,
            username,
            link,
            disabled: false,
            details: Some(details),
        }
    }

    /// A closed account. No other fields are known.
    pub fn disabled(site: Site, username: String, link: String) -> Self {
        Self {
            site,
            username,
            link,
            disabled: true,
            details: None,
        }
    }
}

/// Everything an open account reports beyond its identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDetails {
    pub title: Option<Title>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub last_seen_at: i64,
    pub name: String,
    pub location: String,
    pub ratings: Ratings,
    /// Total games across every rating bucket the site reports.
    pub game_count: u64,
    /// Flagged for a terms-of-service violation.
    pub marked: bool,
}

/// Ratings per speed. A speed the player never played is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ratings {
    pub bullet: Option<Rating>,
    pub blitz: Option<Rating>,
    pub rapid: Option<Rating>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rating {
    pub rating: u32,
    pub games: u32,
}

/// Either kind of entity that [`info`](crate::ChessClient::info) can resolve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Info {
    Profile(Profile),
    Tournament(super::Tournament),
}

impl Info {
    pub fn site(&self) -> Site {
        match self {
            Info::Profile(profile) => profile.site,
            Info::Tournament(tournament) => tournament.site,
        }
    }
}
