//! Route handlers.
//!
//! Every handler runs inside one span named after its operation. Counters are
//! bumped only once the store call has succeeded, so failed requests never
//! show up in `http_request_count`.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::TodoAction;
use crate::store::{NewTodo, TodoItem};

pub const TODOS_ROUTE: &str = "/todos";
pub const TODO_ROUTE: &str = "/todos/{id}";
pub const METRICS_ROUTE: &str = "/metrics";

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

#[tracing::instrument(name = "get_todos", skip_all)]
pub async fn get_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoItem>>, ApiError> {
    let todos = state
        .store
        .list()
        .await
        .map_err(ApiError::store("failed to query todos"))?;

    state.metrics.record_request(&Method::GET, TODOS_ROUTE);
    Ok(Json(todos))
}

#[tracing::instrument(name = "create_todo", skip_all)]
pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<TodoItem>), ApiError> {
    let new_todo = decode_new_todo(&body)?;

    let todo = state
        .store
        .create(new_todo)
        .await
        .map_err(ApiError::store("failed to insert todo"))?;

    tracing::debug!(id = todo.id, "Todo created");
    state.metrics.record_todo_action(TodoAction::Created);
    state.metrics.record_request(&Method::POST, TODOS_ROUTE);
    Ok((StatusCode::CREATED, Json(todo)))
}

#[tracing::instrument(name = "delete_todo", skip_all)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .store
        .delete(&id)
        .await
        .map_err(ApiError::store("failed to delete todo"))?;

    tracing::debug!(removed, "Todo delete executed");
    state.metrics.record_todo_action(TodoAction::Deleted);
    state.metrics.record_request(&Method::DELETE, TODO_ROUTE);
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "render_metrics", skip_all)]
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

/// Best-effort decode: an empty body means "all defaults", anything else must
/// be a JSON object whose known fields have the right types.
fn decode_new_todo(body: &[u8]) -> Result<NewTodo, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NewTodo::default());
    }
    Ok(serde_json::from_slice(body)?)
}
