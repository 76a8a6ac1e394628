use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::RemoteCallError;

/// Upper bound for any single provider call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
}

/// Authenticated access to the provider's Web API.
///
/// The one capability the pipeline components are built on: call an endpoint
/// with a bearer token, get JSON back or a classified [`RemoteCallError`].
#[derive(Debug, Clone)]
pub struct WebApi {
    http: Client,
    base_url: String,
}

impl WebApi {
    pub fn new(base_url: String) -> Self {
        WebApi {
            http: http_client(),
            base_url,
        }
    }

    /// GET an endpoint and decode its JSON body. Non-2xx statuses are
    /// errors; an undecodable body on a 2xx is `MalformedResponse`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, RemoteCallError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(RemoteCallError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteCallError::BadStatus(status));
        }

        response.json::<T>().await.map_err(RemoteCallError::from)
    }

    /// POST a JSON body and hand the raw response back; the caller owns the
    /// status interpretation. Only transport-level failures error here.
    pub async fn post_json<B: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<Response, RemoteCallError> {
        self.http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(RemoteCallError::from)
    }
}
