/// Task-ownership gate
///
/// Runs after [`require_auth`](crate::middleware::auth::require_auth) on the
/// single-task routes. Loads the task named by the `:id` path parameter and
/// binds it as an [`OwnedTask`] extension, so the handler never re-fetches.
///
/// - Task does not exist -> 404 `NotFound`
/// - Task belongs to someone else -> 403 `Forbidden`

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::{app::AppState, error::ApiError, middleware::auth::CurrentUser};
use taskbox_shared::models::task::Task;

/// Task owned by the authenticated caller, bound after the gate runs
#[derive(Debug, Clone)]
pub struct OwnedTask(pub Task);

/// Ownership middleware for `/v1/tasks/:id` routes
///
/// # Errors
///
/// - 404 `NotFound` if no task has the given id
/// - 403 `Forbidden` if the task's owner is not the authenticated user
pub async fn require_task_owner(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} does not exist", task_id)))?;

    if task.user_id != user.id {
        tracing::debug!(
            task_id = %task_id,
            owner_id = %task.user_id,
            user_id = %user.id,
            "Ownership check failed"
        );
        return Err(ApiError::Forbidden);
    }

    req.extensions_mut().insert(OwnedTask(task));

    Ok(next.run(req).await)
}
