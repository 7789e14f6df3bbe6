//! # Taskbox Shared Library
//!
//! This crate contains the domain layer shared between the Taskbox API server
//! and its integration tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing and access-token utilities
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskbox shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
