//! Authenticated request transport.
//!
//! Every request carries the session's bearer token. A 401 from any endpoint except login
//! refreshes the token and replays the request once. Concurrent requests that hit 401 at the
//! same time share one refresh call; a request whose token was already replaced by someone
//! else's refresh replays straight away with the newer token.

use crate::config::ClientConfig;
use crate::session::SessionContext;
use frontdesk_core::constants::{LOGIN_PATH, REFRESH_TOKEN_PATH};
use frontdesk_core::{BackendError, BackendResult};
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;

type SharedRefresh = Shared<BoxFuture<'static, BackendResult<String>>>;

#[derive(Default)]
struct RefreshSlot {
    generation: u64,
    in_flight: Option<SharedRefresh>,
}

/// Status and body of a settled response.
#[derive(Debug)]
pub(crate) struct Reply {
    pub(crate) status: StatusCode,
    body: String,
}

impl Reply {
    /// Fails unless the status is exactly `expected`.
    pub(crate) fn expect_status(&self, path: &str, expected: u16) -> BackendResult<()> {
        if self.status.as_u16() == expected {
            Ok(())
        } else {
            Err(BackendError::UnexpectedStatus {
                path: path.to_string(),
                expected,
                actual: self.status.as_u16(),
            })
        }
    }

    /// Fails unless the status is 2xx.
    pub(crate) fn expect_success(&self, path: &str) -> BackendResult<()> {
        if self.status.is_success() {
            Ok(())
        } else {
            Err(BackendError::UnexpectedStatus {
                path: path.to_string(),
                expected: StatusCode::OK.as_u16(),
                actual: self.status.as_u16(),
            })
        }
    }

    pub(crate) fn decode<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        serde_json::from_str(&self.body).map_err(|e| BackendError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Reads a token sent either as a JSON string or as plain text.
    pub(crate) fn token(&self) -> Option<String> {
        parse_token(&self.body)
    }
}

fn parse_token(body: &str) -> Option<String> {
    let token = serde_json::from_str::<String>(body)
        .unwrap_or_else(|_| body.trim().trim_matches('"').to_string());
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn transport_error(path: &str, err: reqwest::Error) -> BackendError {
    BackendError::Transport {
        path: path.to_string(),
        message: err.to_string(),
    }
}

pub(crate) struct Transport {
    http: reqwest::Client,
    config: ClientConfig,
    session: Arc<SessionContext>,
    refresh: Mutex<RefreshSlot>,
}

impl Transport {
    pub(crate) fn new(
        http: reqwest::Client,
        config: ClientConfig,
        session: Arc<SessionContext>,
    ) -> Self {
        Self {
            http,
            config,
            session,
            refresh: Mutex::new(RefreshSlot::default()),
        }
    }

    pub(crate) fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Sends a request, refreshing the token and replaying once on 401.
    ///
    /// Only transport failures, a failed refresh, or a second 401 are errors; any other status
    /// is returned for the caller to judge.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> BackendResult<Reply> {
        let token = self.session.token().await;
        let reply = self
            .attempt(method.clone(), path, body, token.as_deref())
            .await?;

        if reply.status != StatusCode::UNAUTHORIZED || path == LOGIN_PATH {
            return Ok(reply);
        }

        tracing::debug!("{path} answered 401, refreshing token");
        let fresh = self.fresh_token(token).await?;
        let replay = self.attempt(method, path, body, Some(&fresh)).await?;
        if replay.status == StatusCode::UNAUTHORIZED {
            tracing::warn!("{path} still unauthorised after token refresh");
            return Err(BackendError::Unauthorised {
                path: path.to_string(),
            });
        }
        Ok(replay)
    }

    /// GET `path`, requiring 2xx, and decode the body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        let reply = self.send(Method::GET, path, None).await?;
        reply.expect_success(path)?;
        reply.decode(path)
    }

    async fn attempt(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        token: Option<&str>,
    ) -> BackendResult<Reply> {
        let url = self
            .config
            .endpoint(path)
            .map_err(|e| BackendError::InvalidRequest(format!("{path}: {e}")))?;

        tracing::debug!("HTTP {method} {url}");
        let mut request = self.http.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| transport_error(path, e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(path, e))?;
        Ok(Reply { status, body })
    }

    /// A token newer than `stale`, refreshing only when nobody else already has.
    async fn fresh_token(&self, stale: Option<String>) -> BackendResult<String> {
        let (generation, refresh) = {
            let mut slot = self.refresh.lock().await;

            if let Some(current) = self.session.token().await {
                if stale.as_deref() != Some(current.as_str()) {
                    return Ok(current);
                }
            }

            match &slot.in_flight {
                Some(refresh) => (slot.generation, refresh.clone()),
                None => {
                    slot.generation += 1;
                    let refresh = self.refresh_call().shared();
                    slot.in_flight = Some(refresh.clone());
                    (slot.generation, refresh)
                }
            }
        };

        let outcome = refresh.await;

        let mut slot = self.refresh.lock().await;
        if slot.generation == generation {
            slot.in_flight = None;
        }
        outcome
    }

    fn refresh_call(&self) -> BoxFuture<'static, BackendResult<String>> {
        let http = self.http.clone();
        let url = self.config.endpoint(REFRESH_TOKEN_PATH);
        let session = Arc::clone(&self.session);

        async move {
            let url = url.map_err(|e| BackendError::RefreshFailed(e.to_string()))?;
            let response = http
                .patch(url)
                .send()
                .await
                .map_err(|e| BackendError::RefreshFailed(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                tracing::error!("token refresh answered HTTP {}", status.as_u16());
                return Err(BackendError::RefreshFailed(format!(
                    "HTTP {}",
                    status.as_u16()
                )));
            }

            let body = response
                .text()
                .await
                .map_err(|e| BackendError::RefreshFailed(e.to_string()))?;
            let token = parse_token(&body)
                .ok_or_else(|| BackendError::RefreshFailed("empty token".into()))?;

            session.set_token(Some(token.clone())).await;
            tracing::info!("access token refreshed");
            Ok(token)
        }
        .boxed()
    }
}
