use itertools::Itertools;

use super::raw::{
    LichessArena, LichessClock, LichessGame, LichessGamePlayer, LichessPerf, LichessSwiss,
    LichessUser,
};
use crate::error::{ChessError, Result};
use crate::model::{
    Color, Game, GameLinks, GamePlayer, GamePlayers, GameResult, Opening, Profile,
    ProfileDetails, Rating, Ratings, Site, Termination, TimeControl, Title, Tournament,
    TournamentStats, TournamentType,
};
use crate::pgn::{self, STANDARD_FEN};

const SITE_URL: &str = "https://lichess.org";

pub(crate) fn format_profile(user: &LichessUser) -> Result<Profile> {
    let link = user
        .url
        .clone()
        .unwrap_or_else(|| format!("{SITE_URL}/@/{}", user.username));

    if user.disabled {
        return Ok(Profile::disabled(Site::Lichess, user.username.clone(), link));
    }

    let created_at = user.created_at.ok_or(ChessError::MalformedField {
        field: "lichess user createdAt",
        value: user.username.clone(),
    })?;
    let profile = user.profile.clone().unwrap_or_default();
    let name = match profile.real_name {
        Some(real_name) => real_name.trim().to_string(),
        None => [profile.first_name, profile.last_name]
            .into_iter()
            .flatten()
            .join(" ")
            .trim()
            .to_string(),
    };
    let rating = |perf: Option<LichessPerf>| {
        perf.map(|perf| Rating {
            rating: perf.rating,
            games: perf.games,
        })
    };

    Ok(Profile::active(
        Site::Lichess,
        user.username.clone(),
        link,
        ProfileDetails {
            title: user.title.as_deref().and_then(Title::from_code),
            created_at,
            last_seen_at: user.seen_at.unwrap_or(created_at),
            name,
            location: profile.location.unwrap_or_default(),
            ratings: Ratings {
                bullet: rating(user.perfs.bullet),
                blitz: rating(user.perfs.blitz),
                rapid: rating(user.perfs.rapid),
            },
            game_count: user.count.map(|count| count.all).unwrap_or_default(),
            marked: user.tos_violation,
        },
    ))
}

/// Swiss payloads are the only ones with a round count.
pub(crate) fn format_tournament(json: serde_json::Value) -> Result<Tournament> {
    let malformed = |e: serde_json::Error| ChessError::MalformedField {
        field: "lichess tournament",
        value: e.to_string(),
    };

    if json.get("nbRounds").is_some() {
        let swiss: LichessSwiss = serde_json::from_value(json).map_err(malformed)?;
        return Ok(Tournament {
            url: format!("{SITE_URL}/swiss/{}", swiss.id),
            id: swiss.id,
            kind: TournamentType::Swiss,
            site: Site::Lichess,
            name: swiss.name,
            time_control: clock_time_control(swiss.clock),
            is_finished: swiss.status == "finished",
            player_count: swiss.nb_players,
            stats: swiss.stats.map(|stats| TournamentStats { games: stats.games }),
        });
    }

    let arena: LichessArena = serde_json::from_value(json).map_err(malformed)?;
    Ok(Tournament {
        url: format!("{SITE_URL}/tournament/{}", arena.id),
        id: arena.id,
        kind: TournamentType::Arena,
        site: Site::Lichess,
        name: arena.full_name,
        time_control: clock_time_control(arena.clock),
        is_finished: arena.is_finished,
        player_count: arena.nb_players,
        stats: arena.stats.map(|stats| TournamentStats { games: stats.games }),
    })
}

pub(crate) fn format_game(json: &LichessGame) -> Result<Game> {
    let is_standard = json.variant == "standard"
        && json
            .initial_fen
            .as_deref()
            .is_none_or(|fen| fen == STANDARD_FEN);

    // The movetext parser does not understand variant notation.
    let movetext = json
        .pgn
        .as_deref()
        .or(json.moves.as_deref())
        .filter(|movetext| !movetext.trim().is_empty());
    let moves = match movetext {
        Some(movetext) if is_standard => pgn::parse_moves(movetext)?,
        _ => Vec::new(),
    };

    Ok(Game {
        site: Site::Lichess,
        id: json.id.clone(),
        links: GameLinks {
            white: format!("{SITE_URL}/{}", json.id),
            black: format!("{SITE_URL}/{}/black", json.id),
        },
        timestamp: json.created_at,
        last_move_at: json.last_move_at,
        is_standard,
        result: resolve_result(&json.status, json.winner)?,
        players: GamePlayers {
            white: format_player(&json.players.white),
            black: format_player(&json.players.black),
        },
        time_control: game_time_control(json),
        opening: json
            .opening
            .as_ref()
            .map(|opening| Opening {
                name: opening.name.clone(),
                eco: opening.eco.clone(),
            })
            .unwrap_or_default(),
        moves,
        clocks: json.clocks.clone().unwrap_or_default(),
        analysis: json.analysis.clone().unwrap_or_default(),
    })
}

/// Map a Lichess game status and winner to a normalized result.
pub(crate) fn resolve_result(status: &str, winner: Option<Color>) -> Result<GameResult> {
    let via = match status {
        "draw" => return Ok(GameResult::Draw { via: None }),
        "stalemate" => {
            return Ok(GameResult::Draw {
                via: Some(Termination::Stalemate),
            })
        }
        "mate" => Termination::Checkmate,
        "resign" => Termination::Resignation,
        "outoftime" => Termination::Timeout,
        "timeout" => Termination::Abandonment,
        "noStart" => Termination::NoStart,
        "variantEnd" => Termination::Variant,
        "cheat" => Termination::Cheat,
        _ => return Err(ChessError::UnexpectedResult(status.to_string())),
    };

    match (winner, via) {
        (Some(winner), via) => Ok(GameResult::Decisive { winner, via }),
        // Flagging against bare material, or claiming a draw after the
        // opponent left, ends without a winner.
        (None, Termination::Timeout | Termination::Abandonment) => {
            Ok(GameResult::Draw { via: Some(via) })
        }
        (None, _) => Err(ChessError::UnexpectedResult(format!(
            "{status} without a winner"
        ))),
    }
}

fn format_player(player: &LichessGamePlayer) -> GamePlayer {
    let username = match (&player.user, player.ai_level) {
        (Some(user), _) => user.name.clone(),
        (None, Some(level)) => format!("Stockfish level {level}"),
        (None, None) => "Anonymous".to_string(),
    };

    GamePlayer {
        username,
        title: player
            .user
            .as_ref()
            .and_then(|user| user.title.as_deref())
            .and_then(Title::from_code),
        rating: player.rating,
    }
}

fn game_time_control(json: &LichessGame) -> TimeControl {
    match (json.clock, json.days_per_turn) {
        (Some(clock), _) => clock_time_control(clock),
        (None, Some(days)) => TimeControl::Correspondence {
            correspondence: days * 86400,
        },
        (None, None) => TimeControl::Clock {
            initial: 0,
            increment: 0,
        },
    }
}

fn clock_time_control(clock: LichessClock) -> TimeControl {
    TimeControl::Clock {
        initial: clock.initial,
        increment: clock.increment,
    }
}
