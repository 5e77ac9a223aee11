//! API paths and request/response types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============================================================================
// Paths
// ============================================================================

/// POST, body [`LoginRequest`].
pub const LOGIN: &str = "/api/auth/login";

/// POST, body [`RegisterRequest`].
pub const REGISTER: &str = "/api/auth/register";

/// GET, current account as seen by the server.
pub const CURRENT_USER: &str = "/api/auth/me";

/// POST, body [`ChatRequest`].
pub const AI_CHAT: &str = "/api/ai/chat";

/// GET with `?limit=`, and DELETE on `/{id}`.
pub const AI_CONVERSATIONS: &str = "/api/ai/conversations";

/// POST, body [`InspirationRequest`].
pub const AI_INSPIRATION: &str = "/api/ai/inspiration";

/// POST, body [`PolishRequest`].
pub const AI_POLISH: &str = "/api/ai/polish";

/// POST, body [`ProviderRequest`].
pub const AI_TEST_CONNECTION: &str = "/api/ai/test-connection";

// ============================================================================
// Envelope
// ============================================================================

/// The `{success, message, data}` envelope every API response uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Returns the payload of a successful response.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Request body for login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    /// Username or email.
    pub login_name: &'a str,
    pub password: &'a str,
}

/// Request body for registration.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

// ============================================================================
// AI
// ============================================================================

/// Provider selection shared by every AI request.
///
/// The API key belongs to the user's AI provider, not to the Strove session.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub api_key: String,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("api_key", &"[REDACTED]")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Request body for a chat turn.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(flatten)]
    pub provider: &'a Provider,
}

/// Response payload of a chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    pub conversation_id: i64,
}

/// A stored chat exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub response: String,
    pub created_at: NaiveDateTime,
}

/// Query parameters for the conversation history.
#[derive(Debug, Serialize)]
pub struct HistoryQuery {
    pub limit: u32,
}

/// Request body for inspiration generation.
#[derive(Debug, Serialize)]
pub struct InspirationRequest<'a> {
    pub keyword: &'a str,
    #[serde(flatten)]
    pub provider: &'a Provider,
}

/// Request body for text polishing.
#[derive(Debug, Serialize)]
pub struct PolishRequest<'a> {
    pub text: &'a str,
    pub style: &'a str,
    #[serde(flatten)]
    pub provider: &'a Provider,
}

/// Request body for a provider connectivity check.
#[derive(Debug, Serialize)]
pub struct ProviderRequest<'a> {
    #[serde(flatten)]
    pub provider: &'a Provider,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn provider() -> Provider {
        Provider {
            api_key: "sk-test".to_string(),
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            api_url: None,
        }
    }

    #[test]
    fn login_request_uses_camel_case() {
        let body = serde_json::to_value(LoginRequest {
            login_name: "alice",
            password: "pw",
        })
        .unwrap();
        assert_eq!(body, json!({"loginName": "alice", "password": "pw"}));
    }

    #[test]
    fn provider_fields_are_flattened() {
        let provider = provider();
        let body = serde_json::to_value(ChatRequest {
            message: "hi",
            provider: &provider,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"message": "hi", "apiKey": "sk-test", "provider": "openai", "model": "gpt-4o"})
        );
    }

    #[test]
    fn provider_debug_hides_key() {
        assert!(!format!("{:?}", provider()).contains("sk-test"));
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let response: ApiResponse<ChatResponse> =
            serde_json::from_value(json!({"success": false})).unwrap();
        assert!(!response.success);
        assert!(response.message.is_none());
        assert!(response.into_data().is_none());
    }

    #[test]
    fn conversation_parses_server_timestamps() {
        let conversation: Conversation = serde_json::from_value(json!({
            "id": 7,
            "userId": 1,
            "message": "hello",
            "response": "hi there",
            "createdAt": "2025-03-01T10:15:30.123456"
        }))
        .unwrap();
        assert_eq!(conversation.id, 7);
        assert_eq!(conversation.created_at.format("%Y-%m-%d").to_string(), "2025-03-01");
    }
}
