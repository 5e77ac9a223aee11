//! AI assistant endpoints.
//!
//! Thin wrappers: each call is one request through the shared
//! [`ApiClient`], so the bearer token and the 401 handling apply exactly as
//! for any other call. Envelopes are returned as-is for the caller to
//! inspect.

use serde_json::Value;
use tracing::instrument;

use strove_core::Result;

use crate::client::ApiClient;
use crate::endpoints::{
    AI_CHAT, AI_CONVERSATIONS, AI_INSPIRATION, AI_POLISH, AI_TEST_CONNECTION, ApiResponse,
    ChatRequest, ChatResponse, Conversation, HistoryQuery, InspirationRequest, PolishRequest,
    Provider, ProviderRequest,
};

/// History page size used when the caller has no preference.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// Client for the `/api/ai` endpoints.
#[derive(Debug, Clone)]
pub struct AiApi {
    client: ApiClient,
}

impl AiApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Send one chat message.
    #[instrument(skip(self, message))]
    pub async fn chat(
        &self,
        message: &str,
        provider: &Provider,
    ) -> Result<ApiResponse<ChatResponse>> {
        self.client
            .post(AI_CHAT, &ChatRequest { message, provider })
            .await
    }

    /// Most recent conversations, newest first.
    #[instrument(skip(self))]
    pub async fn history(&self, limit: u32) -> Result<ApiResponse<Vec<Conversation>>> {
        self.client
            .get_with_query(AI_CONVERSATIONS, &HistoryQuery { limit })
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_conversation(&self, id: i64) -> Result<ApiResponse<Value>> {
        self.client
            .delete(&format!("{}/{}", AI_CONVERSATIONS, id))
            .await
    }

    /// Writing prompts for a keyword.
    #[instrument(skip(self))]
    pub async fn generate_inspiration(
        &self,
        keyword: &str,
        provider: &Provider,
    ) -> Result<ApiResponse<Vec<String>>> {
        self.client
            .post(AI_INSPIRATION, &InspirationRequest { keyword, provider })
            .await
    }

    /// Rewrite `text` in the given style.
    #[instrument(skip(self, text))]
    pub async fn polish_text(
        &self,
        text: &str,
        style: &str,
        provider: &Provider,
    ) -> Result<ApiResponse<String>> {
        self.client
            .post(
                AI_POLISH,
                &PolishRequest {
                    text,
                    style,
                    provider,
                },
            )
            .await
    }

    /// Check that the provider settings work.
    #[instrument(skip(self))]
    pub async fn test_connection(&self, provider: &Provider) -> Result<ApiResponse<Value>> {
        self.client
            .post(AI_TEST_CONNECTION, &ProviderRequest { provider })
            .await
    }
}
