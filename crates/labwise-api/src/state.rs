use labwise_interpret::client::OpenAiClient;
use labwise_store::client::PostgrestClient;

/// Shared application state, injected into all route handlers via Axum
/// state. Collaborator endpoints are configured once at startup; the
/// per-user bearer token joins at request time.
#[derive(Clone)]
pub struct AppState {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub openai_url: String,
    pub openai_key: String,
    pub openai_model: String,
}

impl AppState {
    /// Store handle carrying the request's bearer token.
    pub fn store_for(&self, bearer: &str) -> PostgrestClient {
        PostgrestClient::new(&self.supabase_url, &self.supabase_anon_key, bearer)
    }

    pub fn interpreter(&self) -> OpenAiClient {
        OpenAiClient::new(&self.openai_url, &self.openai_key, &self.openai_model)
    }
}
