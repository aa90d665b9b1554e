use reqwest::{Method, RequestBuilder, StatusCode};

use labwise_core::store::StoreError;

/// Authenticated handle to the hosted PostgREST store.
///
/// Explicit context object: the base URL, project key, and the current
/// user's bearer token travel with the client rather than living in a
/// module-level singleton. Row-level security at the store enforces
/// ownership from the bearer identity.
#[derive(Clone)]
pub struct PostgrestClient {
    base_url: String,
    anon_key: String,
    bearer: String,
    http: reqwest::Client,
}

impl PostgrestClient {
    pub fn new(base_url: &str, anon_key: &str, bearer: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            bearer: bearer.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// A request against `/rest/v1/{table}` with auth headers attached.
    pub(crate) fn table(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.bearer)
    }

    /// A POST against `/rest/v1/rpc/{function}`.
    pub(crate) fn rpc(&self, function: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        self.http
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.bearer)
    }
}

pub(crate) fn transport_error(e: reqwest::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Map a non-success response to a `StoreError`, consuming the body for
/// the message.
pub(crate) async fn status_error(response: reqwest::Response) -> StoreError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(body),
        StatusCode::CONFLICT => StoreError::Conflict(body),
        _ => StoreError::Backend(format!("store returned {status}: {body}")),
    }
}
