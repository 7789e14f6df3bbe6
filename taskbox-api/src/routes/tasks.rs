/// Task endpoints
///
/// All routes here sit behind the authentication gate; the single-task
/// routes additionally pass the ownership gate, which binds the loaded task
/// to the request.
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Create a task owned by the caller
/// - `GET /v1/tasks` - List the caller's tasks
/// - `POST /v1/tasks/import` - Import tasks from the external todo API
/// - `GET /v1/tasks/:id` - Get one task
/// - `PUT /v1/tasks/:id` - Update name/description
/// - `DELETE /v1/tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::{auth::CurrentUser, ownership::OwnedTask},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskbox_shared::models::task::{CreateTask, Task, UpdateTask};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update task request; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// Response wrapping a single task projection
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// The task
    pub task: Task,
}

/// Response wrapping a list of task projections
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    /// The tasks
    pub tasks: Vec<Task>,
}

/// Create a task owned by the authenticated caller
///
/// The owner is always the caller; the payload cannot name another user.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            name: req.name,
            description: req.description,
            user_id: user.id,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, user_id = %user.id, "Task created");

    Ok((StatusCode::CREATED, Json(TaskResponse { task })))
}

/// List all tasks owned by the authenticated caller
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<TasksResponse>> {
    let tasks = Task::list_by_user(&state.db, user.id).await?;

    Ok(Json(TasksResponse { tasks }))
}

/// Get one task
///
/// The ownership gate already loaded and checked the task; this handler
/// just projects it.
pub async fn get_task(
    Extension(OwnedTask(task)): Extension<OwnedTask>,
) -> ApiResult<Json<TaskResponse>> {
    Ok(Json(TaskResponse { task }))
}

/// Update a task's name and/or description
///
/// The owner is immutable; only name and description can change. Returns
/// the refreshed row, so `updated_at` reflects this write.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(OwnedTask(task)): Extension<OwnedTask>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    req.validate()?;

    let task = Task::update(
        &state.db,
        task.id,
        UpdateTask {
            name: req.name,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Task {} does not exist", task.id)))?;

    tracing::info!(task_id = %task.id, "Task updated");

    Ok(Json(TaskResponse { task }))
}

/// Delete a task
///
/// Returns 204 with an empty body.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(OwnedTask(task)): Extension<OwnedTask>,
) -> ApiResult<StatusCode> {
    Task::delete(&state.db, task.id).await?;

    tracing::info!(task_id = %task.id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Import tasks from the external todo API
///
/// Fetches the remote todo collection and creates one task per item, owned
/// by the caller, named after the item's title, with an empty description.
/// An importer failure is logged and surfaces as a 500; nothing is retried.
pub async fn import_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<(StatusCode, Json<TasksResponse>)> {
    let todos = state.todos.list_todos().await.map_err(|e| {
        tracing::error!(error = %e, "Todo import fetch failed");
        ApiError::InternalError(format!("Todo import failed: {}", e))
    })?;

    tracing::info!(count = todos.len(), user_id = %user.id, "Importing todos");

    let mut tasks = Vec::with_capacity(todos.len());
    for todo in todos {
        let task = Task::create(
            &state.db,
            CreateTask {
                name: todo.title,
                description: None,
                user_id: user.id,
            },
        )
        .await?;

        tasks.push(task);
    }

    Ok((StatusCode::CREATED, Json(TasksResponse { tasks })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_validation() {
        let valid = CreateTaskRequest {
            name: "Buy groceries".to_string(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateTaskRequest {
            name: "".to_string(),
            description: Some("details".to_string()),
        };
        assert!(empty_name.validate().is_err());

        let long_name = CreateTaskRequest {
            name: "a".repeat(256),
            description: None,
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_update_task_request_allows_partial_payloads() {
        let name_only: UpdateTaskRequest =
            serde_json::from_str(r#"{"name": "New name"}"#).unwrap();
        assert!(name_only.validate().is_ok());
        assert!(name_only.description.is_none());

        let empty: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.validate().is_ok());

        let bad_name: UpdateTaskRequest = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(bad_name.validate().is_err());
    }
}
