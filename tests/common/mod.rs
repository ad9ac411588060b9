//! In-process stand-in for the Lichess and Chess.com APIs.
//!
//! One listener serves all three upstreams under distinct path prefixes
//! (`/lichess`, `/chesscom-api`, `/chesscom-web`), so the Lichess token check
//! in the client still tells the sites apart.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chess_fetch::{ChessClient, ClientConfig};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// A request as the server saw it: path with query, lower-cased headers.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub headers: BTreeMap<String, String>,
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let base = format!("http://{addr}");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let server_base = base.clone();
        let log = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let base = server_base.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, &base, &log).await;
                });
            }
        });

        Self {
            addr,
            base,
            requests,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            lichess_url: format!("{}/lichess", self.base),
            chesscom_api_url: format!("{}/chesscom-api", self.base),
            chesscom_web_url: format!("{}/chesscom-web", self.base),
            user_agent: Some("chess-fetch-tests".to_string()),
            timeout: Some(Duration::from_secs(10)),
        }
    }

    pub fn client(&self) -> ChessClient {
        ChessClient::with_config(self.config()).expect("build client")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    /// Headers of the first request made to `path`.
    pub fn headers_for(&self, path: &str) -> Option<BTreeMap<String, String>> {
        self.requests
            .lock()
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.headers.clone())
    }
}

enum Reply {
    Fixture(&'static str),
    Ndjson(&'static str),
    Status(u16),
    Hang,
    Missing,
}

fn route(path: &str) -> Reply {
    use Reply::*;

    if ["user404", "tournament404"].iter().any(|p| path.contains(p)) {
        return Status(404);
    }
    if ["user429", "tournament429"].iter().any(|p| path.contains(p)) {
        return Status(429);
    }

    match path {
        "/lichess/api/user/EricRosen" => Fixture("lichess/player.json"),
        "/lichess/api/user/blank-user" => Fixture("lichess/player-without-profile.json"),
        "/lichess/api/user/closed-user" => Fixture("lichess/player-disabled.json"),
        "/lichess/api/tournament/2oEh6hZw" => Fixture("lichess/arena.json"),
        "/lichess/api/swiss/48jrx3m6" => Fixture("lichess/swiss.json"),
        "/lichess/game/export/KSMY85yj?pgnInJson=true&clocks=true" => Fixture("lichess/game.json"),
        "/lichess/api/games/user/EricRosen"
        | "/lichess/api/tournament/2oEh6hZw/games"
        | "/lichess/api/swiss/48jrx3m6/games" => Ndjson("lichess/games.ndjson"),
        "/lichess/api/games/user/EricRosen?since=1655725514562&perfType=correspondence" => {
            Ndjson("lichess/games-filtered.ndjson")
        }
        "/lichess/api/games/user/user-with-no-games" => Ndjson("lichess/games-empty.ndjson"),
        "/lichess/api/team/chess-fetch-testers/users" => Ndjson("lichess/team.ndjson"),
        "/lichess/api/games/user/longRequest" => Hang,

        "/chesscom-api/pub/player/imrosen" => Fixture("chesscom/player.json"),
        "/chesscom-api/pub/player/imrosen/stats" => Fixture("chesscom/stats.json"),
        "/chesscom-api/pub/player/closed-account" => Fixture("chesscom/player-closed.json"),
        "/chesscom-api/pub/player/imrosen/games/archives" => Fixture("chesscom/archives.json"),
        "/chesscom-api/pub/player/imrosen/games/2022/03" => Fixture("chesscom/03.json"),
        "/chesscom-api/pub/player/imrosen/games/2022/04" => Fixture("chesscom/04.json"),
        "/chesscom-api/pub/player/imrosen/games/2022/05" => Fixture("chesscom/05.json"),
        "/chesscom-api/pub/titled/CM" => Fixture("chesscom/titled/CM.json"),
        "/chesscom-api/pub/titled/FM" => Fixture("chesscom/titled/FM.json"),
        "/chesscom-api/pub/titled/GM" => Fixture("chesscom/titled/GM.json"),
        "/chesscom-api/pub/titled/IM" => Fixture("chesscom/titled/IM.json"),
        "/chesscom-api/pub/titled/NM" => Fixture("chesscom/titled/NM.json"),
        "/chesscom-api/pub/titled/WCM" => Fixture("chesscom/titled/WCM.json"),
        "/chesscom-api/pub/titled/WFM" => Fixture("chesscom/titled/WFM.json"),
        "/chesscom-api/pub/titled/WGM" => Fixture("chesscom/titled/WGM.json"),
        "/chesscom-api/pub/titled/WIM" => Fixture("chesscom/titled/WIM.json"),
        "/chesscom-api/pub/titled/WNM" => Fixture("chesscom/titled/WNM.json"),
        "/chesscom-api/pub/tournament/late-titled-tuesday-blitz-june-07-2022-3192103" => {
            Fixture("chesscom/swiss.json")
        }
        "/chesscom-api/pub/tournament/10-bullet-1925132" => Fixture("chesscom/arena.json"),
        "/chesscom-api/pub/tournament/late-titled-tuesday-blitz-june-07-2022-3192103/11/1"
        | "/chesscom-api/pub/tournament/10-bullet-1925132/1" => {
            Fixture("chesscom/tournament-games.json")
        }

        "/chesscom-web/callback/live/game/45328864849" => {
            Fixture("chesscom/game-45328864849.json")
        }
        "/chesscom-web/callback/live/game/45331170609" => {
            Fixture("chesscom/game-45331170609.json")
        }
        "/chesscom-web/callback/live/game/999" => Fixture("chesscom/game-missing-from-archive.json"),

        _ => Missing,
    }
}

fn fixture(name: &str, base: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read fixture {}: {e}", path.display()))
        .replace("{{base}}", base)
}

async fn serve(stream: TcpStream, base: &str, log: &Mutex<Vec<Recorded>>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();

    let mut headers = BTreeMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }
    log.lock().push(Recorded {
        path: path.clone(),
        headers: headers.clone(),
    });

    let mut stream = reader.into_inner();
    match route(&path) {
        Reply::Fixture(name) => {
            respond(&mut stream, 200, "application/json", &fixture(name, base)).await
        }
        Reply::Ndjson(name) => {
            if headers.get("accept").map(String::as_str) != Some("application/x-ndjson") {
                let body = r#"{"error":"Missing header: `Accept: application/x-ndjson`"}"#;
                return respond(&mut stream, 400, "application/json", body).await;
            }
            respond_chunked(&mut stream, &fixture(name, base)).await
        }
        Reply::Status(code) => {
            let body = format!(r#"{{"error":"Error","code":{code}}}"#);
            respond(&mut stream, code, "application/json", &body).await
        }
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
        Reply::Missing => {
            let body = format!("Missing mocked endpoint: {path}");
            respond(&mut stream, 404, "text/plain", &body).await
        }
    }
}

async fn respond(stream: &mut TcpStream, status: u16, content_type: &str, body: &str) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reason(status),
        body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body.as_bytes()).await?;
    stream.shutdown().await
}

/// Send the body in small, uneven chunks so records straddle chunk boundaries.
async fn respond_chunked(stream: &mut TcpStream, body: &str) -> std::io::Result<()> {
    let head = "HTTP/1.1 200 OK\r\nContent-Type: application/x-ndjson\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n";
    stream.write_all(head.as_bytes()).await?;

    let bytes = body.as_bytes();
    let mut offset = 0;
    let mut size = 97;
    while offset < bytes.len() {
        let end = (offset + size).min(bytes.len());
        let chunk = &bytes[offset..end];
        stream
            .write_all(format!("{:x}\r\n", chunk.len()).as_bytes())
            .await?;
        stream.write_all(chunk).await?;
        stream.write_all(b"\r\n").await?;
        stream.flush().await?;
        tokio::time::sleep(Duration::from_millis(1)).await;
        offset = end;
        size = if size == 97 { 331 } else { 97 };
    }

    stream.write_all(b"0\r\n\r\n").await?;
    stream.shutdown().await
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        429 => "Too Many Requests",
        _ => "Unknown",
    }
}
