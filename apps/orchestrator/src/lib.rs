// [apps/orchestrator/src/lib.rs]
//! Library surface for the orchestrator binary: wires configuration,
//! shared state, the scheduler, the worker pool and the HTTP API together.
//! Split out from `main.rs` so integration tests can build an `AppState`
//! and a router without going through a real `main`.

pub mod auth;
pub mod config;
pub mod errors;
pub mod job_state;
pub mod pipeline;
pub mod routes;
pub mod scheduler;
pub mod state;
pub mod worker;

pub use config::Config;
pub use routes::{router, ApiState};
pub use state::AppState;
