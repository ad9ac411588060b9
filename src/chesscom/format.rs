use serde::Deserialize;

use super::raw::{
    ChesscomGame, ChesscomGamePlayer, ChesscomPerf, ChesscomPlayer, ChesscomStats,
    ChesscomTournament,
};
use crate::error::{ChessError, Result};
use crate::model::{
    Color, Game, GameLinks, GamePlayer, GamePlayers, GameResult, Opening, Profile, ProfileDetails,
    Rating, Ratings, Site, Termination, TimeControl, Title, TitledPlayers, Tournament,
    TournamentType,
};
use crate::pgn::{self, STANDARD_FEN};

const WEB_URL: &str = "https://www.chess.com";

/// Last path segment of a Chess.com URL.
fn last_segment(url: &str) -> &str {
    let url = url.trim_end_matches('/');
    url.rsplit('/').next().unwrap_or(url)
}

/// Build a profile from the player record and, for open accounts, its stats.
///
/// A closed account yields the minimal record; nothing else on `player` is
/// read and `stats` is ignored.
pub(crate) fn format_profile(player: &ChesscomPlayer, stats: &ChesscomStats) -> Result<Profile> {
    let username = match last_segment(&player.url) {
        "" => player.username.clone(),
        segment => segment.to_string(),
    };

    if player.status.starts_with("closed") {
        return Ok(Profile::disabled(Site::Chesscom, username, player.url.clone()));
    }

    let joined = player.joined.ok_or(ChessError::MalformedField {
        field: "chess.com player joined",
        value: player.username.clone(),
    })?;
    let created_at = joined * 1000;
    let perfs = speed_buckets(stats)?;
    let rating = |key: &str| {
        perfs
            .iter()
            .find(|(name, _)| *name == key)
            .and_then(|(_, perf)| {
                perf.last.map(|last| Rating {
                    rating: last.rating,
                    games: perf.record.win + perf.record.loss + perf.record.draw,
                })
            })
    };

    Ok(Profile::active(
        Site::Chesscom,
        username,
        player.url.clone(),
        ProfileDetails {
            title: player.title.as_deref().and_then(Title::from_code),
            created_at,
            last_seen_at: player
                .last_online
                .map(|seconds| seconds * 1000)
                .unwrap_or(created_at),
            name: player.name.clone().unwrap_or_default(),
            location: player.location.clone().unwrap_or_default(),
            ratings: Ratings {
                bullet: rating("chess_bullet"),
                blitz: rating("chess_blitz"),
                rapid: rating("chess_rapid"),
            },
            game_count: perfs
                .iter()
                .map(|(_, perf)| {
                    u64::from(perf.record.win) + u64::from(perf.record.loss) + u64::from(perf.record.draw)
                })
                .sum(),
            marked: false,
        },
    ))
}

/// Every `chess*` bucket of a stats payload, typed.
fn speed_buckets(stats: &ChesscomStats) -> Result<Vec<(&str, ChesscomPerf)>> {
    stats
        .iter()
        .filter(|(key, _)| key.starts_with("chess"))
        .map(|(key, value)| {
            let perf = ChesscomPerf::deserialize(value).map_err(|e| ChessError::MalformedField {
                field: "chess.com stats bucket",
                value: format!("{key}: {e}"),
            })?;
            Ok((key.as_str(), perf))
        })
        .collect()
}

/// `settings.type == "standard"` is an arena; every other type is round-based.
pub(crate) fn format_tournament(json: &ChesscomTournament) -> Result<Tournament> {
    let id = last_segment(&json.url).to_string();
    let (kind, url) = if json.settings.kind == "standard" {
        (
            TournamentType::Arena,
            format!("{WEB_URL}/tournament/live/arena/{id}"),
        )
    } else {
        (
            TournamentType::Swiss,
            format!("{WEB_URL}/tournament/live/{id}"),
        )
    };

    Ok(Tournament {
        id,
        kind,
        site: Site::Chesscom,
        url,
        name: json.name.clone(),
        time_control: parse_time_control(&json.settings.time_control)?,
        is_finished: json.status == "finished",
        player_count: json.settings.registered_user_count,
        stats: None,
    })
}

pub(crate) fn format_game(json: &ChesscomGame, titled: &TitledPlayers) -> Result<Game> {
    let is_standard = json.rules == "chess" && json.initial_setup == STANDARD_FEN;
    let id = last_segment(&json.url).to_string();
    let kind = if json.url.contains("/daily/") {
        "daily"
    } else {
        "live"
    };

    // The movetext parser does not understand variant notation.
    let moves = if is_standard {
        pgn::parse_moves(&json.pgn)?
    } else {
        Vec::new()
    };
    let clocks = if moves.iter().all(|m| m.clock.is_some()) {
        moves.iter().filter_map(|m| m.clock).collect()
    } else {
        Vec::new()
    };

    Ok(Game {
        site: Site::Chesscom,
        links: GameLinks {
            white: format!("{WEB_URL}/analysis/game/{kind}/{id}?tab=analysis&flip=false&move=0"),
            black: format!("{WEB_URL}/analysis/game/{kind}/{id}?tab=analysis&flip=true&move=0"),
        },
        id,
        timestamp: json.end_time * 1000,
        last_move_at: None,
        is_standard,
        result: resolve_result(&json.white.result, &json.black.result)?,
        players: GamePlayers {
            white: format_player(&json.white, titled),
            black: format_player(&json.black, titled),
        },
        time_control: parse_time_control(&json.time_control)?,
        opening: Opening::default(),
        moves,
        clocks,
        analysis: Vec::new(),
    })
}

fn format_player(player: &ChesscomGamePlayer, titled: &TitledPlayers) -> GamePlayer {
    GamePlayer {
        username: player.username.clone(),
        title: titled.get(&player.username),
        rating: player.rating,
    }
}

/// Map the per-color result codes of a Chess.com game to a normalized result.
///
/// White's code is inspected first. A loss-class code names the losing side,
/// so the winner is the other color; `win` itself carries no reason and is
/// skipped.
pub(crate) fn resolve_result(white: &str, black: &str) -> Result<GameResult> {
    for (color, code) in [(Color::White, white), (Color::Black, black)] {
        let draw = |via: Termination| -> Result<GameResult> {
            Ok(GameResult::Draw { via: Some(via) })
        };
        let loss = |via: Termination| -> Result<GameResult> {
            Ok(GameResult::Decisive {
                winner: color.other(),
                via,
            })
        };

        match code {
            "agreed" => return draw(Termination::Agreement),
            "insufficient" | "timevsinsufficient" => return draw(Termination::Insufficient),
            "repetition" => return draw(Termination::Repetition),
            "50move" => return draw(Termination::FiftyMoves),
            "stalemate" => return draw(Termination::Stalemate),
            "checkmated" => return loss(Termination::Checkmate),
            "resigned" => return loss(Termination::Resignation),
            "timeout" => return loss(Termination::Timeout),
            "abandoned" => return loss(Termination::Abandonment),
            // `lose` is the generic code variant games report with no reason.
            "lose" | "bughousepartnerlose" | "kingofthehill" | "threecheck" => {
                return loss(Termination::Variant)
            }
            _ => {}
        }
    }

    Err(ChessError::UnexpectedResult(format!("{white} or {black}")))
}

/// `"initial+increment"`, `"initial"` or `"1/secondsPerMove"`.
pub(crate) fn parse_time_control(value: &str) -> Result<TimeControl> {
    let malformed = || ChessError::MalformedField {
        field: "time control",
        value: value.to_string(),
    };
    let number = |s: &str| s.trim().parse::<u32>().map_err(|_| malformed());

    if let Some((_, per_move)) = value.split_once('/') {
        return Ok(TimeControl::Correspondence {
            correspondence: number(per_move)?,
        });
    }

    match value.split_once('+') {
        Some((initial, increment)) => Ok(TimeControl::Clock {
            initial: number(initial)?,
            increment: if increment.is_empty() { 0 } else { number(increment)? },
        }),
        None => Ok(TimeControl::Clock {
            initial: number(value)?,
            increment: 0,
        }),
    }
}
