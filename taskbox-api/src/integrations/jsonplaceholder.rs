/// External todo API client
///
/// The import endpoint pulls the full todo collection from a JSONPlaceholder
/// compatible API and turns each item into a task. The remote service is an
/// external collaborator: no retry, no pagination, just a single bounded GET.
/// Its failures propagate to the handler, which logs them and answers 500.
///
/// The [`TodoSource`] trait is the seam; integration tests substitute a stub
/// so no network access is needed.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::ImportConfig;

/// A todo item as returned by the external API
///
/// Unknown fields (e.g. `userId`) are ignored; only the title is carried
/// into the imported task.
#[derive(Debug, Clone, Deserialize)]
pub struct Todo {
    /// Remote item id
    pub id: i64,

    /// Item title; becomes the imported task's name
    pub title: String,

    /// Remote completion flag
    #[serde(default)]
    pub completed: bool,
}

/// Source of external todo items
///
/// Implemented by the real HTTP client and by test stubs.
#[async_trait]
pub trait TodoSource: Send + Sync {
    /// Fetches the full collection of remote todo items
    async fn list_todos(&self) -> anyhow::Result<Vec<Todo>>;
}

/// HTTP client for a JSONPlaceholder-compatible todo API
pub struct JsonPlaceholderClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl JsonPlaceholderClient {
    /// Creates a client for the configured base URL
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

#[async_trait]
impl TodoSource for JsonPlaceholderClient {
    async fn list_todos(&self) -> anyhow::Result<Vec<Todo>> {
        let url = format!("{}/todos", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let todos = response.json::<Vec<Todo>>().await?;

        tracing::debug!(count = todos.len(), "Fetched todos from external API");
        Ok(todos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_deserializes_jsonplaceholder_shape() {
        let json = r#"
        [
            { "userId": 1, "id": 1, "title": "delectus aut autem", "completed": false },
            { "userId": 1, "id": 2, "title": "quis ut nam", "completed": true }
        ]
        "#;

        let todos: Vec<Todo> = serde_json::from_str(json).unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].title, "delectus aut autem");
        assert!(!todos[0].completed);
        assert!(todos[1].completed);
    }

    #[test]
    fn test_todo_tolerates_missing_completed() {
        let json = r#"[{ "id": 7, "title": "bare item" }]"#;
        let todos: Vec<Todo> = serde_json::from_str(json).unwrap();
        assert_eq!(todos[0].id, 7);
        assert!(!todos[0].completed);
    }

    #[test]
    fn test_client_normalizes_base_url() {
        let client = JsonPlaceholderClient::new(&ImportConfig {
            base_url: "https://jsonplaceholder.typicode.com/".to_string(),
            timeout_seconds: 10,
        });
        assert_eq!(client.base_url, "https://jsonplaceholder.typicode.com");
    }
}
