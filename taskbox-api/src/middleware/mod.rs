/// Middleware modules for the API server
///
/// The request pipeline is composed of two gates plus a headers layer:
///
/// - `auth`: bearer-token authentication gate
/// - `ownership`: task-ownership gate for `/v1/tasks/:id` routes
/// - `security`: OWASP security headers

pub mod auth;
pub mod ownership;
pub mod security;
