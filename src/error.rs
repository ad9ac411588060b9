/// Error type returned by a per-game or per-profile callback to stop an iteration.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// All errors that can occur while fetching or normalizing chess data.
#[derive(thiserror::Error, Debug)]
pub enum ChessError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// The underlying HTTP client could not be built from the configuration.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Server returned a non-success HTTP status code.
    #[error("{status}: {status_text}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        status_text: String,
    },

    /// Failed to read the response body.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode JSON from {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    /// The request was aborted by [`cancel_all`](crate::ChessClient::cancel_all).
    #[error("the operation was aborted: {url}")]
    Aborted { url: String },

    /// The input URL matched none of the known shapes.
    #[error("{expected}")]
    InvalidUrl { url: String, expected: &'static str },

    /// A Lichess game id with an unexpected length.
    #[error("Invalid game ID: {0}")]
    InvalidGameId(String),

    /// A `since` filter that is not a 13-digit millisecond timestamp.
    #[error("Invalid timestamp format: Use milliseconds (13-digit timestamp), got {0}")]
    InvalidTimestamp(i64),

    /// A game-termination code we do not know how to normalize.
    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),

    /// An upstream field was present but could not be interpreted.
    #[error("malformed {field}: {value:?}")]
    MalformedField { field: &'static str, value: String },

    /// A single-game lookup could not find its game in the archive it points to.
    #[error("Game not found in monthly archive: {id} ({archive})")]
    GameNotInArchive { id: String, archive: String },

    /// The movetext parser failed to read a game.
    #[error("failed to parse movetext: {0}")]
    Pgn(#[from] std::io::Error),

    /// A caller-supplied callback returned an error.
    #[error("callback failed: {0}")]
    Callback(#[source] CallbackError),
}

pub type Result<T> = std::result::Result<T, ChessError>;

/// What a per-item callback returns. An `Err` stops the iteration.
pub type CallbackResult = std::result::Result<(), CallbackError>;

/// Hand `item` to `callback`, turning a callback failure into a [`ChessError`].
pub(crate) fn deliver<T>(callback: &mut impl FnMut(T) -> CallbackResult, item: T) -> Result<()> {
    callback(item).map_err(ChessError::Callback)
}
