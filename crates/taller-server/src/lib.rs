//! Taller service-order management server.
//!
//! Library surface exists so the integration tests can drive the service
//! layer directly against an in-memory database; `tallerd` (main.rs) is a
//! thin binary over [`routes::router`].

pub mod auth;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod handlers;
pub mod policy;
pub mod routes;
pub mod state;
pub mod util;
pub mod workflow;
