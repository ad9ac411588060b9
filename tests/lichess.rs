mod common;

use chess_fetch::{
    ChessError, Color, GameParams, GameResult, PerfType, Site, Termination, TimeControl, Title,
    TournamentType,
};
use common::MockServer;

#[tokio::test]
async fn test_profile() {
    let server = MockServer::start().await;
    let profile = server.client().lichess_profile("EricRosen").await.unwrap();
    let details = profile.details.as_ref().unwrap();

    assert_eq!(profile.site, Site::Lichess);
    assert_eq!(profile.username, "EricRosen");
    assert_eq!(profile.link, "https://lichess.org/@/EricRosen");
    assert_eq!(details.title, Some(Title::Im));
    assert_eq!(details.name, "Eric Rosen");
    assert_eq!(details.ratings.blitz.unwrap().rating, 2603);
    assert_eq!(details.game_count, 28015);
    assert_eq!(details.ratings.rapid.unwrap().games, 982);
}

#[tokio::test]
async fn test_profile_without_profile_section() {
    let server = MockServer::start().await;
    let profile = server.client().lichess_profile("blank-user").await.unwrap();
    let details = profile.details.unwrap();

    assert_eq!(details.name, "");
    assert_eq!(details.location, "");
    assert_eq!(details.ratings.bullet, None);
    assert_eq!(details.game_count, 0);
}

#[tokio::test]
async fn test_disabled_profile() {
    let server = MockServer::start().await;
    let profile = server.client().lichess_profile("closed-user").await.unwrap();

    assert!(profile.disabled);
    let json = serde_json::to_value(&profile).unwrap();
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["disabled", "link", "site", "type", "username"]);
}

#[tokio::test]
async fn test_tournaments() {
    let server = MockServer::start().await;
    let client = server.client();

    let arena = client.lichess_arena("2oEh6hZw").await.unwrap();
    assert_eq!(arena.kind, TournamentType::Arena);
    assert_eq!(arena.name, "Yearly Blitz Arena");
    assert_eq!(arena.player_count, 8907);

    let swiss = client.lichess_swiss("48jrx3m6").await.unwrap();
    assert_eq!(swiss.kind, TournamentType::Swiss);
    assert_eq!(swiss.stats.unwrap().games, 847);
}

#[tokio::test]
async fn test_player_games_stream() {
    let server = MockServer::start().await;
    let mut games = Vec::new();
    server
        .client()
        .lichess_player_games("EricRosen", &GameParams::default(), |game| {
            games.push(game);
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(games.len(), 3);
    assert!(games.iter().all(|game| game.site == Site::Lichess));

    assert_eq!(games[0].id, "6sHZIw5F");
    assert_eq!(games[0].moves.len(), 8);
    assert_eq!(games[0].clocks.len(), 8);

    assert_eq!(games[1].result, GameResult::Draw { via: None });
    assert_eq!(games[1].analysis.len(), 6);
    assert_eq!(games[1].analysis[5].mate, Some(7));
    assert_eq!(games[1].opening.eco, "D37");

    assert!(!games[2].is_standard);
    assert!(games[2].moves.is_empty());
    assert_eq!(games[2].players.black.username, "Stockfish level 6");
}

#[tokio::test]
async fn test_filters_are_sent_upstream() {
    let server = MockServer::start().await;
    let params = GameParams {
        since: Some(1655725514562),
        perf_type: Some(PerfType::Correspondence),
        ..Default::default()
    };

    let mut games = Vec::new();
    server
        .client()
        .lichess_player_games("EricRosen", &params, |game| {
            games.push(game);
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(games.len(), 1);
    assert_eq!(
        games[0].time_control,
        TimeControl::Correspondence {
            correspondence: 259200
        }
    );
    assert_eq!(games[0].players.black.username, "Anonymous");
    assert_eq!(
        games[0].result,
        GameResult::Decisive {
            winner: Color::White,
            via: Termination::Timeout
        }
    );
}

#[tokio::test]
async fn test_empty_stream() {
    let server = MockServer::start().await;
    let mut count = 0;
    server
        .client()
        .lichess_player_games("user-with-no-games", &GameParams::default(), |_| {
            count += 1;
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_tournament_game_streams() {
    let server = MockServer::start().await;
    let client = server.client();

    let mut arena = 0;
    client
        .lichess_arena_games("2oEh6hZw", &GameParams::default(), |_| {
            arena += 1;
            Ok(())
        })
        .await
        .unwrap();

    let mut swiss = 0;
    client
        .lichess_swiss_games("48jrx3m6", &GameParams::default(), |_| {
            swiss += 1;
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!((arena, swiss), (3, 3));
}

#[tokio::test]
async fn test_callback_error_stops_stream() {
    let server = MockServer::start().await;
    let mut seen = 0;
    let err = server
        .client()
        .lichess_player_games("EricRosen", &GameParams::default(), |_| {
            seen += 1;
            Err("stop here".into())
        })
        .await
        .unwrap_err();

    assert_eq!(seen, 1);
    assert!(matches!(err, ChessError::Callback(_)));
}

#[tokio::test]
async fn test_single_game() {
    let server = MockServer::start().await;
    let client = server.client();

    let game = client.lichess_game("KSMY85yj").await.unwrap();
    assert_eq!(game.id, "KSMY85yj");
    assert_eq!(game.moves.len(), 4);
    assert_eq!(game.moves[3].notation, "Qxd5");
    assert_eq!(game.moves[3].clock, Some(17902));
    assert_eq!(game.clocks, [18003, 18003, 17851, 17902]);
    assert_eq!(game.result.winner(), Some(Color::Black));

    let same = client.lichess_game("KSMY85yjAbCd").await.unwrap();
    assert_eq!(same, game);
}

#[tokio::test]
async fn test_invalid_game_id_fails_before_request() {
    let server = MockServer::start().await;
    let err = server.client().lichess_game("KSMY85").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid game ID: KSMY85");
    assert_eq!(server.request_count(), 0);
}

#[tokio::test]
async fn test_team_members() {
    let server = MockServer::start().await;
    let mut members = Vec::new();
    server
        .client()
        .lichess_team_members("chess-fetch-testers", |profile| {
            members.push(profile);
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(members.len(), 3);
    assert_eq!(members[0].username, "EricRosen");
    // Puzzle-mode perfs ride along with the rated speeds.
    let details = members[0].details.as_ref().unwrap();
    assert_eq!(details.ratings.blitz.unwrap().rating, 2603);
    assert!(members[1].disabled);
    assert!(members[2].details.as_ref().unwrap().marked);
}

#[tokio::test]
async fn test_not_found() {
    let server = MockServer::start().await;
    let client = server.client();
    let params = GameParams::default();

    let err = client.lichess_profile("user404").await.unwrap_err();
    assert_eq!(err.to_string(), "404: Not Found");
    assert!(matches!(err, ChessError::UnexpectedStatus { status: 404, .. }));

    for result in [
        client.lichess_arena("tournament404").await.map(|_| ()),
        client.lichess_swiss("tournament404").await.map(|_| ()),
        client.lichess_player_games("user404", &params, |_| Ok(())).await,
        client.lichess_arena_games("tournament404", &params, |_| Ok(())).await,
        client.lichess_swiss_games("tournament404", &params, |_| Ok(())).await,
    ] {
        assert_eq!(result.unwrap_err().to_string(), "404: Not Found");
    }
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;
    let client = server.client();
    let params = GameParams::default();

    for result in [
        client.lichess_profile("user429").await.map(|_| ()),
        client.lichess_arena("tournament429").await.map(|_| ()),
        client.lichess_swiss("tournament429").await.map(|_| ()),
        client.lichess_player_games("user429", &params, |_| Ok(())).await,
        client.lichess_arena_games("tournament429", &params, |_| Ok(())).await,
        client.lichess_swiss_games("tournament429", &params, |_| Ok(())).await,
    ] {
        assert_eq!(result.unwrap_err().to_string(), "429: Too Many Requests");
    }
}
