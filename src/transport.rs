use std::future::Future;

use parking_lot::RwLock;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::error::{ChessError, Result};
use crate::ndjson::NdjsonStream;

pub(crate) const ACCEPT_JSON: &str = "application/json";
pub(crate) const ACCEPT_NDJSON: &str = "application/x-ndjson";

/// HTTP plumbing shared by both sites.
///
/// Owns the optional Lichess token and the cancellation signal. Both are
/// read by every request; only the explicit setters change them.
pub(crate) struct Transport {
    http: reqwest::Client,
    lichess_url: Option<reqwest::Url>,
    lichess_token: RwLock<Option<String>>,
    cancelled: watch::Sender<bool>,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, lichess_url: String) -> Self {
        let (cancelled, _) = watch::channel(false);
        Self {
            http,
            lichess_url: reqwest::Url::parse(&lichess_url).ok(),
            lichess_token: RwLock::new(None),
            cancelled,
        }
    }

    pub(crate) fn set_lichess_token(&self, token: String) {
        *self.lichess_token.write() = Some(token);
    }

    pub(crate) fn clear_lichess_token(&self) {
        *self.lichess_token.write() = None;
    }

    /// Abort every in-flight request, and every later one until re-armed.
    pub(crate) fn cancel_all(&self) {
        self.cancelled.send_replace(true);
    }

    pub(crate) fn reset_cancellation(&self) {
        self.cancelled.send_replace(false);
    }

    /// Run `fut` unless the cancellation signal fires first.
    pub(crate) async fn cancellable<F: Future>(&self, url: &str, fut: F) -> Result<F::Output> {
        let mut cancelled = self.cancelled.subscribe();
        tokio::select! {
            biased;
            _ = cancelled.wait_for(|cancelled| *cancelled) => Err(ChessError::Aborted {
                url: url.to_owned(),
            }),
            output = fut => Ok(output),
        }
    }

    /// Same origin as the Lichess base, and a path at or below its path.
    fn is_lichess(&self, url: &str) -> bool {
        let (Some(base), Ok(url)) = (&self.lichess_url, reqwest::Url::parse(url)) else {
            return false;
        };
        if url.origin() != base.origin() {
            return false;
        }

        let prefix = base.path().trim_end_matches('/');
        url.path()
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Issue a GET and fail on any non-2xx status.
    pub(crate) async fn send(&self, url: &str, accept: &str) -> Result<reqwest::Response> {
        let mut request = self.http.get(url).header(ACCEPT, accept);
        if self.is_lichess(url) {
            if let Some(token) = self.lichess_token.read().as_deref() {
                request = request.bearer_auth(token);
            }
        }

        debug!(url, accept, "sending request");
        let response = self
            .cancellable(url, request.send())
            .await?
            .map_err(|e| ChessError::Http {
                url: url.to_owned(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChessError::UnexpectedStatus {
                url: url.to_owned(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        Ok(response)
    }

    /// Fetch a URL and decode the whole body as JSON.
    #[instrument(skip(self))]
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(url, ACCEPT_JSON).await?;
        let body = self
            .cancellable(url, response.bytes())
            .await?
            .map_err(|e| ChessError::ResponseBody {
                url: url.to_owned(),
                source: e,
            })?;

        serde_json::from_slice(&body).map_err(|e| ChessError::Json {
            url: url.to_owned(),
            source: e,
        })
    }

    /// Open a newline-delimited JSON stream.
    #[instrument(skip(self))]
    pub(crate) async fn get_ndjson(&self, url: &str) -> Result<NdjsonStream<'_>> {
        let response = self.send(url, ACCEPT_NDJSON).await?;
        Ok(NdjsonStream::new(self, url.to_owned(), response))
    }
}
