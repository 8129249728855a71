//! Request-level middleware: authentication and role extractors.

pub mod auth;
pub mod rbac;
