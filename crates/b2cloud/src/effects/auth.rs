use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::core;
use crate::data::Authorization;
use crate::data::Credentials;
use crate::data::auth::AuthorizeResponse;
use crate::effects::cache::RefreshSlot;
use crate::effects::http::HttpClient;
use crate::error::{Error, Result};

/// Process-wide authorization cache.
///
/// Serves the cached record while it is valid and performs at most one
/// login at a time when it is not. Concurrent callers that miss together
/// share the result of that login. A failed login leaves the cache as it
/// was, so the next caller tries again.
pub(crate) struct CredentialCache {
    credentials: Credentials,
    auth_url: String,
    ttl: Duration,
    slot: RefreshSlot<Authorization>,
}

impl CredentialCache {
    pub(crate) fn new(credentials: Credentials, auth_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            credentials,
            auth_url: auth_url.into(),
            ttl,
            slot: RefreshSlot::new(),
        }
    }

    pub(crate) async fn get<C: HttpClient>(&self, http: &C) -> Result<Arc<Authorization>> {
        if let Some(auth) = self.slot.snapshot().filter(|a| a.is_valid()) {
            debug!(account_id = %auth.account_id, "authorization served from cache");
            return Ok(auth);
        }
        self.slot
            .get_or_refresh(Authorization::is_valid, || self.login(http))
            .await
    }

    /// The cached record, valid or not, without contacting the service.
    pub(crate) fn peek(&self) -> Option<Arc<Authorization>> { self.slot.snapshot() }

    pub(crate) fn invalidate(&self) { self.slot.clear() }

    async fn login<C: HttpClient>(&self, http: &C) -> Result<Authorization> {
        let headers = [(
            "Authorization".to_string(),
            core::basic_auth(&self.credentials.account_id, &self.credentials.application_key),
        )];

        let response = http
            .post_json(&self.auth_url, &headers, None)
            .await
            .map_err(Error::network)?;

        if !core::is_success(response.status) {
            warn!(status = response.status, "login rejected");
            return Err(Error::Auth {
                status: response.status,
                message: core::error_message(&response.body),
            });
        }

        let parsed: AuthorizeResponse = serde_json::from_slice(&response.body)?;
        let auth = parsed.into_authorization(core::expires_after(Utc::now(), self.ttl));
        info!(
            account_id = %auth.account_id,
            api_url = %auth.api_url,
            expires = %auth.expires,
            "logged in"
        );
        Ok(auth)
    }
}
