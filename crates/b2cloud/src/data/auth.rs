use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account credentials used for the login call.
///
/// Held in process memory only; `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account_id: String,
    pub application_key: String,
}

impl Credentials {
    pub fn new(account_id: impl Into<String>, application_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            application_key: application_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("application_key", &"<redacted>")
            .finish()
    }
}

/// Wire shape of a successful `b2_authorize_account` response.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthorizeResponse {
    pub account_id: String,
    pub api_url: String,
    pub authorization_token: String,
    pub download_url: String,
    #[serde(default)]
    pub recommended_part_size: Option<u64>,
    #[serde(default)]
    pub absolute_minimum_part_size: Option<u64>,
}

impl AuthorizeResponse {
    pub(crate) fn into_authorization(self, expires: DateTime<Utc>) -> Authorization {
        Authorization {
            account_id: self.account_id,
            api_url: self.api_url,
            authorization_token: self.authorization_token,
            download_url: self.download_url,
            expires,
            recommended_part_size: self.recommended_part_size,
            absolute_minimum_part_size: self.absolute_minimum_part_size,
        }
    }
}

/// A cached authorization record.
///
/// Valid only while the current time is before [`Authorization::expires`].
/// Records are replaced whole on refresh and never mutated in place.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    pub account_id: String,
    pub api_url: String,
    #[serde(skip_serializing)]
    pub authorization_token: String,
    pub download_url: String,
    pub expires: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_part_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_minimum_part_size: Option<u64>,
}

impl Authorization {
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool { now < self.expires }

    #[must_use]
    pub fn is_valid(&self) -> bool { self.is_valid_at(Utc::now()) }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("account_id", &self.account_id)
            .field("api_url", &self.api_url)
            .field("authorization_token", &"<redacted>")
            .field("download_url", &self.download_url)
            .field("expires", &self.expires)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires: DateTime<Utc>) -> Authorization {
        AuthorizeResponse {
            account_id: "acct".into(),
            api_url: "https://api.test".into(),
            authorization_token: "secret-token".into(),
            download_url: "https://download.test".into(),
            recommended_part_size: None,
            absolute_minimum_part_size: None,
        }
        .into_authorization(expires)
    }

    #[test]
    fn test_validity_is_strictly_before_expiry() {
        let now = Utc::now();
        let auth = record(now);

        assert!(auth.is_valid_at(now - Duration::seconds(1)));
        assert!(!auth.is_valid_at(now));
        assert!(!auth.is_valid_at(now + Duration::seconds(1)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let auth = record(Utc::now());
        let creds = Credentials::new("acct", "super-secret-key");

        assert!(!format!("{auth:?}").contains("secret-token"));
        assert!(!format!("{creds:?}").contains("super-secret-key"));
    }

    #[test]
    fn test_authorize_response_ignores_unknown_fields() {
        let json = r#"{
            "accountId": "acct",
            "apiUrl": "https://api.test",
            "authorizationToken": "tok",
            "downloadUrl": "https://download.test",
            "recommendedPartSize": 100000000,
            "allowed": {"capabilities": ["listBuckets"]}
        }"#;

        let parsed: AuthorizeResponse = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.api_url, "https://api.test");
        assert_eq!(parsed.recommended_part_size, Some(100_000_000));
    }
}
