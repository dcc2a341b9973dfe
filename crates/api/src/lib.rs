//! `lotdesk-api` — HTTP surface for the lotdesk back office.
//!
//! Token transport, request-time guarding and route handlers live here;
//! the policy itself lives in `lotdesk-auth`.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod cookie;
pub mod middleware;
