// src/application/dto/events.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::auth::AuthenticatedClient;

/// Principal block embedded in the `connection` event.
#[derive(Debug, Clone, Serialize)]
pub struct ClientInfo {
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub provider: String,
}

impl From<&AuthenticatedClient> for ClientInfo {
    fn from(client: &AuthenticatedClient) -> Self {
        Self {
            client_id: client.client_id.clone(),
            token_type: client.token_type.clone(),
            provider: client
                .auth_provider
                .clone()
                .unwrap_or_else(|| "oauth".into()),
        }
    }
}

/// Events pushed over a streaming session. Field names match the wire
/// contract consumed by existing clients, hence the camelCase renames.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Connection {
        #[serde(rename = "sessionId")]
        session_id: String,
        authenticated: bool,
        #[serde(rename = "authMethod")]
        auth_method: &'static str,
        user: ClientInfo,
    },
    AuthRequired {
        #[serde(rename = "sessionId")]
        session_id: String,
        authenticated: bool,
        #[serde(rename = "authUrl")]
        auth_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    AuthCheck {
        #[serde(rename = "authUrl")]
        auth_url: String,
    },
    Keepalive,
    RequestReceived {
        #[serde(rename = "requestId")]
        request_id: String,
        action: String,
        #[serde(rename = "serviceId", skip_serializing_if = "Option::is_none")]
        service_id: Option<String>,
    },
    RequestCompleted {
        #[serde(rename = "requestId")]
        request_id: String,
        action: String,
        #[serde(rename = "serviceId", skip_serializing_if = "Option::is_none")]
        service_id: Option<String>,
        result: JsonValue,
    },
    RequestError {
        error: String,
    },
}

impl StreamEvent {
    /// Serialize with the `timestamp` field every event carries.
    pub fn envelope(&self, now: DateTime<Utc>) -> JsonValue {
        let mut value = serde_json::to_value(self).unwrap_or_else(|_| JsonValue::Null);
        if let Some(map) = value.as_object_mut() {
            map.insert("timestamp".into(), JsonValue::String(now.to_rfc3339()));
        }
        value
    }
}
