//! Observer API server for the Vigil scene engine.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/scene`) streaming every
//!   [`SceneUpdate`](vigil_types::SceneUpdate) the engine publishes
//! - **Read endpoints** for the realtime world-view, the derived
//!   presentation state, the recent event log and zone tooltips
//! - **History endpoints** for capturing snapshots and navigating
//!   undo/redo
//!
//! # Architecture
//!
//! The server shares one [`SceneSyncEngine`](vigil_core::SceneSyncEngine)
//! with the ingest task behind a single [`tokio::sync::Mutex`]. Every
//! request holds the lock only for the duration of one engine call, so
//! history cursor updates never interleave with event application.

pub mod error;
pub mod handlers;
pub mod history;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_observer};
pub use state::{AppState, SharedEngine};
