// src/presentation/http/controllers/stream.rs
use crate::application::dto::{ClientInfo, StreamEvent};
use crate::application::error::ApplicationError;
use crate::application::ports::control_plane::EnvVar;
use crate::infrastructure::stream::{SessionGuard, SessionHub};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{Authenticated, StreamAuth};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    http::{HeaderName, HeaderValue},
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio_stream::{Stream, wrappers::ReceiverStream};
use uuid::Uuid;

/// Response header advertising where unauthenticated clients authenticate.
pub const AUTH_URL_HEADER: &str = "x-auth-url";

/// Long-lived push channel. The authentication state is resolved exactly
/// once, at accept time; a client that wants to upgrade reconnects with
/// credentials. Authentication failures never close the transport.
pub async fn events(Extension(state): Extension<HttpState>, auth: StreamAuth) -> Response {
    let session_id = Uuid::new_v4().to_string();
    let authenticated = auth.client.is_some();

    let receiver = state.hub.register(&session_id, authenticated);

    let initial = match auth.client.as_ref() {
        Some(client) => StreamEvent::Connection {
            session_id: session_id.clone(),
            authenticated: true,
            auth_method: "token",
            user: ClientInfo::from(client),
        },
        None => StreamEvent::AuthRequired {
            session_id: session_id.clone(),
            authenticated: false,
            auth_url: state.hub.auth_url().to_string(),
            error: auth.error,
        },
    };
    state.hub.send_to(&session_id, &initial);

    let timers = SessionHub::spawn_session_timers(Arc::clone(&state.hub), &session_id);
    let guard = SessionGuard::new(Arc::clone(&state.hub), session_id, timers);
    let stream = SessionStream {
        inner: ReceiverStream::new(receiver),
        _guard: guard,
    };

    let mut response = Sse::new(stream).into_response();
    if let Ok(value) = HeaderValue::from_str(state.hub.auth_url()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(AUTH_URL_HEADER), value);
    }
    response
}

/// Event stream tied to the session's registry entry and timers: dropping
/// the transport drops the stream, and the guard's single cleanup hook
/// deregisters the session and cancels its emitters.
struct SessionStream {
    inner: ReceiverStream<JsonValue>,
    _guard: SessionGuard,
}

impl Stream for SessionStream {
    type Item = Result<Event, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match Pin::new(&mut self.inner).poll_next(cx) {
            Poll::Ready(Some(payload)) => {
                let event = Event::default()
                    .json_data(&payload)
                    .unwrap_or_else(|_| Event::default().data(payload.to_string()));
                Poll::Ready(Some(Ok(event)))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct DispatchParameters {
    #[serde(rename = "clearCache", default)]
    pub clear_cache: bool,
    #[serde(rename = "envVars", default)]
    pub env_vars: Option<Vec<EnvVar>>,
}

#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub action: String,
    #[serde(rename = "serviceId")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub parameters: DispatchParameters,
    #[serde(rename = "requestId")]
    pub request_id: Option<String>,
}

/// Proxy an action to the control plane while narrating its lifecycle to
/// every open session. Broadcast delivery is best-effort and never affects
/// the caller's response.
pub async fn dispatch(
    Extension(state): Extension<HttpState>,
    Authenticated(_client): Authenticated,
    Json(request): Json<DispatchRequest>,
) -> HttpResult<Json<JsonValue>> {
    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    state.hub.broadcast(&StreamEvent::RequestReceived {
        request_id: request_id.clone(),
        action: request.action.clone(),
        service_id: request.service_id.clone(),
    });

    let result = run_action(&state, &request).await;

    match result {
        Ok(result) => {
            state.hub.broadcast(&StreamEvent::RequestCompleted {
                request_id,
                action: request.action.clone(),
                service_id: request.service_id.clone(),
                result: result.clone(),
            });

            Ok(Json(json!({
                "success": true,
                "action": request.action,
                "serviceId": request.service_id,
                "result": result,
                "timestamp": state.services.clock().now().to_rfc3339(),
            })))
        }
        Err(err) => {
            state.hub.broadcast(&StreamEvent::RequestError {
                error: err.to_string(),
            });
            Err(err).into_http()
        }
    }
}

async fn run_action(
    state: &HttpState,
    request: &DispatchRequest,
) -> Result<JsonValue, ApplicationError> {
    let control_plane = state.services.control_plane();

    let service_id = |action: &str| {
        request.service_id.as_deref().ok_or_else(|| {
            ApplicationError::invalid_request(format!("serviceId is required for {action}"))
        })
    };

    match request.action.as_str() {
        "list_services" => control_plane.list_services().await,
        "get_service" => control_plane.get_service(service_id("get_service")?).await,
        "deploy" => {
            control_plane
                .deploy_service(service_id("deploy")?, request.parameters.clear_cache)
                .await
        }
        "restart" => control_plane.restart_service(service_id("restart")?).await,
        "suspend" => control_plane.suspend_service(service_id("suspend")?).await,
        "resume" => control_plane.resume_service(service_id("resume")?).await,
        "update_env" => {
            let env_vars = request.parameters.env_vars.as_deref().ok_or_else(|| {
                ApplicationError::invalid_request("envVars is required for update_env")
            })?;
            control_plane
                .update_env_vars(service_id("update_env")?, env_vars)
                .await
        }
        other => Err(ApplicationError::invalid_request(format!(
            "unsupported action: {other}"
        ))),
    }
}
