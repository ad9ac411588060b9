use std::collections::BTreeMap;

use tracing::instrument;

use crate::chesscom;
use crate::config::ClientConfig;
use crate::error::{CallbackResult, ChessError, Result};
use crate::lichess;
use crate::model::*;
use crate::router::{self, GameRoute, GamesRoute, InfoRoute, ProfileRoute, TournamentRoute};
use crate::transport::Transport;

/// The main entry point for fetching chess data.
///
/// `ChessClient` wraps a [`reqwest::Client`] and exposes the URL-driven
/// entry points (`player`, `tournament`, `games`, ...) along with the
/// per-site fetchers they dispatch to.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> chess_fetch::Result<()> {
/// use chess_fetch::{ChessClient, GameParams};
///
/// let client = ChessClient::new();
/// let profile = client.player("https://lichess.org/@/EricRosen").await?;
/// println!("{} on {}", profile.username, profile.site);
///
/// let mut count = 0;
/// client
///     .games(
///         "https://www.chess.com/member/imrosen",
///         &GameParams::default().max(10),
///         |_game| {
///             count += 1;
///             Ok(())
///         },
///     )
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ChessClient {
    transport: Transport,
    config: ClientConfig,
}

impl ChessClient {
    /// Create a new client against the public sites with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new(), ClientConfig::default())
    }

    /// Create a client whose HTTP client is built from `config`.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = config.build_http_client().map_err(ChessError::ClientBuild)?;
        Ok(Self::with_client(http, config))
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure proxies, headers, etc. The
    /// `user_agent` and `timeout` fields of `config` are ignored.
    pub fn with_client(client: reqwest::Client, mut config: ClientConfig) -> Self {
        for url in [
            &mut config.lichess_url,
            &mut config.chesscom_api_url,
            &mut config.chesscom_web_url,
        ] {
            let trimmed = url.trim_end_matches('/').len();
            url.truncate(trimmed);
        }

        Self {
            transport: Transport::new(client, config.lichess_url.clone()),
            config,
        }
    }

    /// Send `Authorization: Bearer {token}` with every later Lichess request.
    pub fn set_lichess_token(&self, token: impl Into<String>) {
        self.transport.set_lichess_token(token.into());
    }

    pub fn clear_lichess_token(&self) {
        self.transport.clear_lichess_token();
    }

    /// Abort every request in flight with [`ChessError::Aborted`].
    ///
    /// Requests started afterwards fail the same way until
    /// [`reset_cancellation`](Self::reset_cancellation) is called.
    pub fn cancel_all(&self) {
        self.transport.cancel_all();
    }

    pub fn reset_cancellation(&self) {
        self.transport.reset_cancellation();
    }

    // Router entry points

    /// Fetch the profile a Lichess or Chess.com profile URL points to.
    #[instrument(skip(self))]
    pub async fn player(&self, url: &str) -> Result<Profile> {
        self.profile_route(router::profile(url)?).await
    }

    /// Stream every member of a Lichess team.
    #[instrument(skip(self, callback))]
    pub async fn players(
        &self,
        url: &str,
        callback: impl FnMut(Profile) -> CallbackResult,
    ) -> Result<()> {
        let team = router::team(url)?;
        self.lichess_team_members(&team, callback).await
    }

    /// Fetch an arena or swiss tournament from either site.
    #[instrument(skip(self))]
    pub async fn tournament(&self, url: &str) -> Result<Tournament> {
        self.tournament_route(router::tournament(url)?).await
    }

    /// Fetch whatever a profile or tournament URL points to.
    #[instrument(skip(self))]
    pub async fn info(&self, url: &str) -> Result<Info> {
        match router::info(url)? {
            InfoRoute::Profile(route) => self.profile_route(route).await.map(Info::Profile),
            InfoRoute::Tournament(route) => self.tournament_route(route).await.map(Info::Tournament),
        }
    }

    /// Fetch a single game from its URL.
    #[instrument(skip(self))]
    pub async fn game(&self, url: &str) -> Result<Game> {
        match router::game(url)? {
            GameRoute::Lichess(id) => self.lichess_game(&id).await,
            GameRoute::ChesscomLive(id) => self.chesscom_game(&id, false).await,
            GameRoute::ChesscomDaily(id) => self.chesscom_game(&id, true).await,
        }
    }

    /// Deliver the games of a player or tournament to `callback`, one at a time.
    ///
    /// Lichess applies every set field of `params` upstream. Chess.com player
    /// games honor `since` and `max`; Chess.com tournaments ignore `params`.
    #[instrument(skip(self, callback))]
    pub async fn games(
        &self,
        url: &str,
        params: &GameParams,
        callback: impl FnMut(Game) -> CallbackResult,
    ) -> Result<()> {
        match router::games(url)? {
            GamesRoute::Player(ProfileRoute::Lichess(username)) => {
                self.lichess_player_games(&username, params, callback).await
            }
            GamesRoute::Player(ProfileRoute::Chesscom(username)) => {
                self.chesscom_player_games(&username, params, callback).await
            }
            GamesRoute::Tournament(TournamentRoute::LichessArena(id)) => {
                self.lichess_arena_games(&id, params, callback).await
            }
            GamesRoute::Tournament(TournamentRoute::LichessSwiss(id)) => {
                self.lichess_swiss_games(&id, params, callback).await
            }
            GamesRoute::Tournament(TournamentRoute::Chesscom(id)) => {
                self.chesscom_tournament_games(&id, callback).await
            }
        }
    }

    async fn profile_route(&self, route: ProfileRoute) -> Result<Profile> {
        match route {
            ProfileRoute::Lichess(username) => self.lichess_profile(&username).await,
            ProfileRoute::Chesscom(username) => self.chesscom_profile(&username).await,
        }
    }

    async fn tournament_route(&self, route: TournamentRoute) -> Result<Tournament> {
        match route {
            TournamentRoute::LichessArena(id) => self.lichess_arena(&id).await,
            TournamentRoute::LichessSwiss(id) => self.lichess_swiss(&id).await,
            TournamentRoute::Chesscom(id) => self.chesscom_tournament(&id).await,
        }
    }

    // Lichess

    #[instrument(skip(self))]
    pub async fn lichess_profile(&self, username: &str) -> Result<Profile> {
        lichess::get_profile(&self.transport, &self.config.lichess_url, username).await
    }

    #[instrument(skip(self))]
    pub async fn lichess_arena(&self, id: &str) -> Result<Tournament> {
        lichess::get_arena(&self.transport, &self.config.lichess_url, id).await
    }

    #[instrument(skip(self))]
    pub async fn lichess_swiss(&self, id: &str) -> Result<Tournament> {
        lichess::get_swiss(&self.transport, &self.config.lichess_url, id).await
    }

    /// Stream a player's games as NDJSON, filtered upstream by `params`.
    #[instrument(skip(self, callback))]
    pub async fn lichess_player_games(
        &self,
        username: &str,
        params: &GameParams,
        callback: impl FnMut(Game) -> CallbackResult,
    ) -> Result<()> {
        let base = &self.config.lichess_url;
        lichess::get_player_games(&self.transport, base, username, params, callback).await
    }

    #[instrument(skip(self, callback))]
    pub async fn lichess_arena_games(
        &self,
        id: &str,
        params: &GameParams,
        callback: impl FnMut(Game) -> CallbackResult,
    ) -> Result<()> {
        lichess::get_arena_games(&self.transport, &self.config.lichess_url, id, params, callback)
            .await
    }

    #[instrument(skip(self, callback))]
    pub async fn lichess_swiss_games(
        &self,
        id: &str,
        params: &GameParams,
        callback: impl FnMut(Game) -> CallbackResult,
    ) -> Result<()> {
        lichess::get_swiss_games(&self.transport, &self.config.lichess_url, id, params, callback)
            .await
    }

    /// Fetch one game by its 8-character id (or the 12-character player form).
    #[instrument(skip(self))]
    pub async fn lichess_game(&self, id: &str) -> Result<Game> {
        lichess::get_game(&self.transport, &self.config.lichess_url, id).await
    }

    #[instrument(skip(self, callback))]
    pub async fn lichess_team_members(
        &self,
        team: &str,
        callback: impl FnMut(Profile) -> CallbackResult,
    ) -> Result<()> {
        lichess::get_team_members(&self.transport, &self.config.lichess_url, team, callback).await
    }

    // Chess.com

    #[instrument(skip(self))]
    pub async fn chesscom_profile(&self, username: &str) -> Result<Profile> {
        chesscom::get_profile(&self.transport, &self.config.chesscom_api_url, username).await
    }

    /// The raw stats payload, keyed by rating category.
    #[instrument(skip(self))]
    pub async fn chesscom_stats(
        &self,
        username: &str,
    ) -> Result<BTreeMap<String, serde_json::Value>> {
        chesscom::get_stats(&self.transport, &self.config.chesscom_api_url, username).await
    }

    /// Monthly archive URLs, oldest first.
    #[instrument(skip(self))]
    pub async fn chesscom_archives(&self, username: &str) -> Result<Vec<String>> {
        chesscom::get_archives(&self.transport, &self.config.chesscom_api_url, username).await
    }

    /// Every game of one archive URL, titles looked up in `titled`.
    #[instrument(skip(self, titled))]
    pub async fn chesscom_archive(&self, url: &str, titled: &TitledPlayers) -> Result<Vec<Game>> {
        chesscom::get_archive(&self.transport, url, titled).await
    }

    /// Titled players of the given categories only.
    #[instrument(skip(self))]
    pub async fn chesscom_titled_players(&self, titles: &[Title]) -> Result<TitledPlayers> {
        chesscom::get_titled_players(&self.transport, &self.config.chesscom_api_url, titles).await
    }

    /// Every human title category plus the known engine accounts.
    #[instrument(skip(self))]
    pub async fn chesscom_all_titled_players(&self) -> Result<TitledPlayers> {
        chesscom::get_all_titled_players(&self.transport, &self.config.chesscom_api_url).await
    }

    /// Walk a player's archives newest first, honoring `since` and `max`.
    ///
    /// A `since` that is not a 13-digit millisecond timestamp fails before any
    /// request is made.
    #[instrument(skip(self, callback))]
    pub async fn chesscom_player_games(
        &self,
        username: &str,
        params: &GameParams,
        callback: impl FnMut(Game) -> CallbackResult,
    ) -> Result<()> {
        let api = &self.config.chesscom_api_url;
        chesscom::get_player_games(&self.transport, api, username, params, callback).await
    }

    #[instrument(skip(self, callback))]
    pub async fn chesscom_player_games_for_month(
        &self,
        username: &str,
        year: i32,
        month: u32,
        callback: impl FnMut(Game) -> CallbackResult,
    ) -> Result<()> {
        let api = &self.config.chesscom_api_url;
        chesscom::get_player_games_for_month(&self.transport, api, username, year, month, callback)
            .await
    }

    #[instrument(skip(self))]
    pub async fn chesscom_tournament(&self, id: &str) -> Result<Tournament> {
        chesscom::get_tournament(&self.transport, &self.config.chesscom_api_url, id).await
    }

    #[instrument(skip(self, callback))]
    pub async fn chesscom_tournament_games(
        &self,
        id: &str,
        callback: impl FnMut(Game) -> CallbackResult,
    ) -> Result<()> {
        let api = &self.config.chesscom_api_url;
        chesscom::get_tournament_games(&self.transport, api, id, callback).await
    }

    /// Fetch a live (or daily) game through the monthly archive it belongs to.
    #[instrument(skip(self))]
    pub async fn chesscom_game(&self, id: &str, daily: bool) -> Result<Game> {
        chesscom::get_game(
            &self.transport,
            &self.config.chesscom_api_url,
            &self.config.chesscom_web_url,
            id,
            daily,
        )
        .await
    }
}

impl Default for ChessClient {
    fn default() -> Self {
        Self::new()
    }
}
