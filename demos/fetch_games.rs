//! Dump the games behind a profile or tournament URL as JSON files.
//!
//! ```text
//! RUST_LOG=chess_fetch=debug cargo run --example fetch_games -- https://lichess.org/@/EricRosen 50
//! ```

use chess_fetch::{ChessClient, GameParams};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "https://lichess.org/@/EricRosen".to_string());
    let max = args.next().and_then(|max| max.parse().ok()).unwrap_or(20);

    let client = ChessClient::new();
    let info = client.info(&url).await.unwrap();
    println!("Fetching up to {max} games from {}", info.site());

    std::fs::create_dir_all("games").unwrap();
    serde_json::to_writer_pretty(std::fs::File::create("games/info.json").unwrap(), &info)
        .unwrap();

    let mut count = 0;
    client
        .games(&url, &GameParams::default().max(max), |game| {
            let file = std::fs::File::create(format!("games/{}.json", game.id))?;
            serde_json::to_writer_pretty(file, &game)?;
            count += 1;
            println!("{} {} vs {}", game.id, game.players.white.username, game.players.black.username);
            Ok(())
        })
        .await
        .unwrap();

    println!("Wrote {count} games");
}
