//! Governor telemetry ingest over NATS.
//!
//! [`GovernorIngest`] subscribes to the governor subject and feeds each
//! message body to the shared [`SceneSyncEngine`] in arrival order. A
//! single task owns the subscription, so the engine sees events exactly
//! as NATS delivers them on one connection.
//!
//! Bodies that are not a JSON envelope object are logged and skipped. Reconnect
//! and backoff are handled by the NATS client; the world-view and history
//! survive reconnects untouched.

use futures::StreamExt as _;
use tracing::{debug, info, warn};
use vigil_core::{IngestOutcome, SceneSyncEngine};
use vigil_events::parse_envelope;
use vigil_observer::SharedEngine;

use crate::error::EngineError;

/// What happened to one message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// The envelope was applied to the engine.
    Applied {
        /// Dotted kind of the normalized event.
        kind: &'static str,
    },
    /// The body was not a valid envelope.
    Malformed,
    /// The engine has been torn down.
    Stopped,
}

/// Counters reported when the ingest loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Envelopes applied to the engine.
    pub applied: u64,
    /// Bodies skipped because they were not envelopes.
    pub malformed: u64,
}

/// Feed one message body to the engine.
pub fn ingest_message(engine: &mut SceneSyncEngine, body: &[u8]) -> MessageOutcome {
    let raw = match parse_envelope(body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, bytes = body.len(), "skipping malformed governor message");
            return MessageOutcome::Malformed;
        }
    };
    match engine.ingest(&raw) {
        IngestOutcome::Applied { kind, .. } => MessageOutcome::Applied { kind },
        IngestOutcome::Ignored => MessageOutcome::Stopped,
    }
}

/// NATS subscriber that drives the engine.
pub struct GovernorIngest {
    subscriber: async_nats::Subscriber,
    subject: String,
}

impl GovernorIngest {
    /// Connect to NATS and subscribe to the governor subject.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Nats`] if the connection or the subscription
    /// fails.
    pub async fn connect(url: &str, subject: &str) -> Result<Self, EngineError> {
        let client = async_nats::connect(url).await.map_err(|e| EngineError::Nats {
            message: format!("failed to connect to NATS at {url}: {e}"),
        })?;
        let subscriber = client
            .subscribe(subject.to_owned())
            .await
            .map_err(|e| EngineError::Nats {
                message: format!("failed to subscribe to {subject}: {e}"),
            })?;
        Ok(Self {
            subscriber,
            subject: subject.to_owned(),
        })
    }

    /// Ingest messages until the subscription ends or the engine is torn
    /// down.
    pub async fn run(mut self, engine: SharedEngine) -> IngestStats {
        info!(subject = %self.subject, "governor ingest started");
        let mut stats = IngestStats::default();

        while let Some(msg) = self.subscriber.next().await {
            let outcome = {
                let mut engine = engine.lock().await;
                ingest_message(&mut engine, &msg.payload)
            };
            match outcome {
                MessageOutcome::Applied { kind } => {
                    stats.applied = stats.applied.saturating_add(1);
                    debug!(kind, subject = %msg.subject, "governor event ingested");
                }
                MessageOutcome::Malformed => {
                    stats.malformed = stats.malformed.saturating_add(1);
                }
                MessageOutcome::Stopped => {
                    debug!("engine torn down, leaving ingest loop");
                    break;
                }
            }
        }

        info!(
            applied = stats.applied,
            malformed = stats.malformed,
            "governor ingest stopped"
        );
        stats
    }
}
