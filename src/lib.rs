#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]

//! runstub library. The router and its building blocks, shared by the
//! `runstub` server binary, the `runstub-load` generator and the tests.
//!
//! - `config`: TOML + env-var configuration
//! - `build_info`: compile-time version/commit/date
//! - `auth`: `X-API-Key` gate for `/run`
//! - `routes`: handlers and [`routes::router`]
//! - `client`: typed HTTP client
//! - `loadtest`: closed-loop load generator

pub mod auth;
pub mod build_info;
pub mod client;
pub mod config;
pub mod loadtest;
pub mod routes;
pub mod state;

// Re-export key types at crate root for convenience.
pub use auth::RunKey;
pub use build_info::BuildInfo;
pub use client::RunstubClient;
pub use config::Config;
pub use state::AppState;
