//! Core engine for Vigil: configuration, scene derivation, state
//! serialization, the undo/redo history stack and the owning
//! [`SceneSyncEngine`].
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`scene`] -- World-view to presentation parameters
//! - [`serializer`] -- Canonical history entries and signatures
//! - [`history`] -- Bounded, dedup-aware undo/redo stack
//! - [`engine`] -- Single-owner state container with change notification

pub mod config;
pub mod engine;
pub mod history;
pub mod scene;
pub mod serializer;

pub use config::{
    ConfigError, EventLogConfig, HistoryConfig, InfrastructureConfig, LogFormat, LoggingConfig,
    SceneConfig, VigilConfig,
};
pub use engine::{IngestOutcome, SceneSyncEngine};
pub use history::{HistoryStack, PushOutcome, Signed};
pub use scene::SceneDeriver;
pub use serializer::serialize;
