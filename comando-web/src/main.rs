//! Servidor web Axum que expõe o interpretador de comandos (HTTP + WebSocket)

mod config;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use comando_core::{catalog::demo_utterances, InterpretEvent, Interpreter, ParsedCommand};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Estado compartilhado: o interpretador é imutável e `Sync`.
struct AppState {
    interpreter: Interpreter,
}

#[derive(Deserialize)]
struct InterpretRequest {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InterpretResponse {
    command: ParsedCommand,
    processing_us: u64,
}

#[derive(Deserialize)]
struct BatchRequest {
    #[serde(default)]
    texts: Vec<String>,
}

#[derive(Serialize)]
struct BatchResponse {
    commands: Vec<ParsedCommand>,
}

/// Mensagem WebSocket recebida do cliente
#[derive(Deserialize)]
struct WsRequest {
    text: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let interpreter = config.build_interpreter()?;
    let state = Arc::new(AppState { interpreter });

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!("Interpretador de comandos em http://{}", config.addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/interpret", post(interpret_handler))
        .route("/interpret/batch", post(batch_handler))
        .route("/ws", get(ws_handler))
        .route("/vocabulary", get(vocabulary_handler))
        .route("/demo-utterances", get(demo_utterances_handler))
        .layer(cors)
        .with_state(state)
}

/// Interpreta uma frase (transcrição final ou parcial)
async fn interpret_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InterpretRequest>,
) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        warn!("requisição /interpret sem texto");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Texto vazio"})),
        )
            .into_response();
    }

    let start = Instant::now();
    let command = state.interpreter.interpret(&req.text);
    Json(InterpretResponse {
        command,
        processing_us: start.elapsed().as_micros() as u64,
    })
    .into_response()
}

/// Interpreta várias frases em paralelo fora do runtime assíncrono
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> impl IntoResponse {
    let worker = Arc::clone(&state);
    match tokio::task::spawn_blocking(move || worker.interpreter.interpret_batch(&req.texts)).await {
        Ok(commands) => Json(BatchResponse { commands }).into_response(),
        Err(err) => {
            warn!(%err, "falha no lote de interpretação");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn vocabulary_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.interpreter.vocabulary().clone())
}

async fn demo_utterances_handler() -> impl IntoResponse {
    let utterances: Vec<serde_json::Value> = demo_utterances()
        .iter()
        .map(|(label, text)| serde_json::json!({ "label": label, "text": text }))
        .collect();
    Json(utterances)
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Cada frase recebida é interpretada e todos os eventos voltam ao cliente.
/// Quem chama é responsável pelo debounce das transcrições parciais.
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // JSON {text} ou texto puro
                let utterance = match serde_json::from_str::<WsRequest>(&text) {
                    Ok(req) => req.text,
                    Err(_) => text.to_string(),
                };
                if utterance.trim().is_empty() {
                    continue;
                }

                let worker = Arc::clone(&state);
                let events = match tokio::task::spawn_blocking(move || stream_events(&worker, &utterance)).await {
                    Ok(events) => events,
                    Err(err) => {
                        warn!(%err, "falha na interpretação via WebSocket");
                        continue;
                    }
                };

                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

/// Roda o interpretador (síncrono) e coleta os eventos emitidos.
fn stream_events(state: &AppState, utterance: &str) -> Vec<InterpretEvent> {
    let (tx, rx) = std::sync::mpsc::channel::<InterpretEvent>();
    state.interpreter.interpret_streaming(utterance, tx);
    rx.try_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use comando_core::catalog::demo_vocabulary;
    use tower::ServiceExt;

    fn app() -> Router {
        let interpreter = Interpreter::with_defaults(demo_vocabulary()).unwrap();
        router(Arc::new(AppState { interpreter }))
    }

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_interpret_compound() {
        let (status, json) =
            post_json("/interpret", serde_json::json!({"text": "canetas azuis até 30 reais"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["command"]["type"], "compound");
        assert_eq!(json["command"]["filters"][2]["filterKey"], "priceRange");
        assert!(json["processingUs"].is_u64());
    }

    #[tokio::test]
    async fn test_interpret_rejects_blank_text() {
        let (status, json) = post_json("/interpret", serde_json::json!({"text": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Texto vazio");
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let (status, json) = post_json(
            "/interpret/batch",
            serde_json::json!({"texts": ["limpar filtros", "ordenar por nome", "buscar brindes para eventos"]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let kinds: Vec<&str> = json["commands"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["type"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["clear", "sort", "search"]);
    }

    #[tokio::test]
    async fn test_stream_events_ends_with_done() {
        let interpreter = Interpreter::with_defaults(demo_vocabulary()).unwrap();
        let state = Arc::new(AppState { interpreter });
        let worker = Arc::clone(&state);
        let events = tokio::task::spawn_blocking(move || stream_events(&worker, "canetas azuis"))
            .await
            .unwrap();
        assert!(matches!(events.first(), Some(InterpretEvent::Normalized { .. })));
        match events.last() {
            Some(InterpretEvent::Done { command, .. }) => {
                assert_eq!(command, &state.interpreter.interpret("canetas azuis"))
            }
            other => panic!("último evento deveria ser Done: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_vocabulary_endpoint() {
        let response = app()
            .oneshot(Request::builder().uri("/vocabulary").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["categories"][0]["id"], "cat-canetas");
    }
}
