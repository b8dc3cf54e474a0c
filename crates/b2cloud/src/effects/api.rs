use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::core;
use crate::data::Authorization;
use crate::effects::http::HttpClient;
use crate::error::{Error, Result};

/// POST a JSON request to an API operation and decode the JSON reply.
pub(crate) async fn call<C, B, R>(
    http: &C,
    auth: &Authorization,
    operation: &str,
    body: &B,
) -> Result<R>
where
    C: HttpClient,
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let url = core::api_url(&auth.api_url, operation);
    let headers = [(
        "Authorization".to_string(),
        auth.authorization_token.clone(),
    )];
    let body = serde_json::to_value(body)?;

    let response = http
        .post_json(&url, &headers, Some(body))
        .await
        .map_err(Error::network)?;

    if !core::is_success(response.status) {
        warn!(operation, status = response.status, "API call rejected");
        return Err(core::api_error(response.status, &response.body));
    }
    Ok(serde_json::from_slice(&response.body)?)
}
