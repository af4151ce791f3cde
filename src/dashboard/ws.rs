//! WebSocket server + REST endpoints for the dashboard.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::feed::OnboardingFeed;
use crate::model::{overall_completion, EmployeeRow, RecordId, TaskRecord};
use crate::notify::Toast;

use super::controller::Dashboard;
use super::state::DashboardState;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub feed: Arc<OnboardingFeed>,
}

/// Events sent to WS clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full state sync (sent on connect and after a lag).
    Snapshot { state: DashboardState },
    /// A fresh employee list landed on the feed.
    Employees {
        employees: Vec<EmployeeRow>,
        total_employees: usize,
        overall_completion: i64,
    },
    /// A notification for the client to toast.
    Toast { toast: Toast },
    /// Keepalive ping.
    Ping,
}

/// Actions a client can send over the socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientAction {
    /// Onboard the first employees in current list order.
    BulkOnboard,
    /// Trigger a background check for one employee.
    BackgroundCheck { employee_id: RecordId },
    /// Show an employee's task detail.
    ShowTasks { employee_id: RecordId },
    /// A task-table row action (name + row record).
    RowAction { name: String, task: TaskRecord },
    /// Re-issue the data query.
    Refresh,
}

/// Build the Axum router with the dashboard WebSocket and REST routes.
pub fn dashboard_routes(dashboard: Arc<Dashboard>, feed: Arc<OnboardingFeed>) -> Router {
    let state = AppState { dashboard, feed };

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/actions/bulk_onboard", post(bulk_onboard))
        .route("/api/employees/{id}/background_check", post(background_check))
        .route("/api/employees/{id}/tasks", get(show_tasks))
        .route("/api/tasks/complete", post(complete_task))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "onboard-dash"
    }))
}

// ── WebSocket ───────────────────────────────────────────────────────────

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("WebSocket client connecting");
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    info!("WebSocket client connected");

    // Full sync on connect
    if !send_snapshot(&mut socket, &state).await {
        warn!("Failed to send initial sync, client disconnected");
        return;
    }

    let mut feed_rx = state.feed.subscribe();
    let mut toast_rx = state.dashboard.notifier().subscribe();

    loop {
        tokio::select! {
            // Forward feed emissions as employee-list events
            result = feed_rx.recv() => {
                match result {
                    Ok(event) => {
                        if let Ok(employees) = event.employees {
                            let rows: Vec<EmployeeRow> = employees
                                .into_iter()
                                .map(EmployeeRow::from_employee)
                                .collect();
                            let event = ServerEvent::Employees {
                                total_employees: rows.len(),
                                overall_completion: overall_completion(&rows),
                                employees: rows,
                            };
                            if !send_event(&mut socket, &event).await {
                                break;
                            }
                        }
                        // Error emissions reach the client as toasts.
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "WS client lagged behind feed");
                        if !send_snapshot(&mut socket, &state).await {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Feed channel closed");
                        break;
                    }
                }
            }

            // Forward toasts
            result = toast_rx.recv() => {
                match result {
                    Ok(toast) => {
                        if !send_event(&mut socket, &ServerEvent::Toast { toast }).await {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!(missed = n, "WS client lagged behind toasts");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Toast channel closed");
                        break;
                    }
                }
            }

            // Receive actions from client
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_message(&text, &state).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("WebSocket connection closed");
}

async fn send_snapshot(socket: &mut WebSocket, state: &AppState) -> bool {
    let snapshot = ServerEvent::Snapshot {
        state: state.dashboard.snapshot().await,
    };
    send_event(socket, &snapshot).await
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to encode server event");
            true
        }
    }
}

async fn handle_client_message(text: &str, state: &AppState) {
    match serde_json::from_str::<ClientAction>(text) {
        Ok(action) => match action {
            ClientAction::BulkOnboard => {
                debug!("Bulk onboard requested via WS");
                state.dashboard.handle_bulk_onboard().await;
            }
            ClientAction::BackgroundCheck { employee_id } => {
                debug!(employee_id = %employee_id, "Background check requested via WS");
                state
                    .dashboard
                    .handle_trigger_background_check(&employee_id)
                    .await;
            }
            ClientAction::ShowTasks { employee_id } => {
                state.dashboard.handle_show_tasks(&employee_id).await;
            }
            ClientAction::RowAction { name, task } => {
                state.dashboard.handle_row_action(&name, &task).await;
            }
            ClientAction::Refresh => {
                state.dashboard.reload().await;
            }
        },
        Err(e) => {
            debug!(error = %e, text = text, "Unrecognized WS message from client");
        }
    }
}

// ── REST Endpoints ──────────────────────────────────────────────────────

async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dashboard.snapshot().await)
}

async fn bulk_onboard(State(state): State<AppState>) -> impl IntoResponse {
    state.dashboard.handle_bulk_onboard().await;
    (StatusCode::OK, Json(state.dashboard.snapshot().await))
}

async fn background_check(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let employee_id = RecordId::from(id);
    state
        .dashboard
        .handle_trigger_background_check(&employee_id)
        .await;
    (StatusCode::OK, Json(state.dashboard.snapshot().await))
}

async fn show_tasks(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let employee_id = RecordId::from(id);
    state.dashboard.handle_show_tasks(&employee_id).await;

    let snapshot = state.dashboard.snapshot().await;
    match snapshot.selected {
        Some(row) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "employee": row,
                "tasks": snapshot.selected_tasks.unwrap_or_default(),
            })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Employee not found"})),
        ),
    }
}

#[derive(Deserialize)]
struct RowActionRequest {
    name: String,
    task: TaskRecord,
}

async fn complete_task(
    State(state): State<AppState>,
    Json(body): Json<RowActionRequest>,
) -> impl IntoResponse {
    state.dashboard.handle_row_action(&body.name, &body.task).await;
    (StatusCode::OK, Json(state.dashboard.snapshot().await))
}
