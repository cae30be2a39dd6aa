//! Battle progression for Math Boxing.
//!
//! A [`BattleEngine`] turns answers into punches. It owns the run state,
//! schedules its own follow-up transitions on a virtual clock, persists the
//! best level through a [`BestLevelStore`], and reports every change to a
//! [`Presenter`]. Nothing here touches a real timer or a terminal.

/// Virtual time for deferred transitions.
pub mod clock;
/// Configuration for an engine.
pub mod config;
/// The battle state machine.
pub mod engine;
/// Error types for the battle crate.
pub mod error;
/// Battle event types and the event log.
pub mod event;
/// The presenter boundary.
pub mod presenter;
/// State of a single run.
pub mod run;
/// Cancelable deferred tasks.
pub mod scheduler;
/// Read-only frames for renderers.
pub mod snapshot;
/// Best-level persistence.
pub mod store;

/// Re-export of [`clock::VirtualClock`].
pub use clock::VirtualClock;
/// Re-export of [`config::BattleConfig`].
pub use config::BattleConfig;
/// Re-exports of the engine and its command results.
pub use engine::{BattleEngine, FollowUp, IgnoreReason, Submission, TurnOutcome, TurnResult};
/// Re-exports of the error types.
pub use error::{BattleError, BattleResult, StoreError, StoreResult};
/// Re-exports of [`event::BattleEvent`], [`event::BattleEventKind`], and [`event::EventLog`].
pub use event::{BattleEvent, BattleEventKind, EventLog};
/// Re-exports of the presenter trait and its stock implementations.
pub use presenter::{NullPresenter, Presenter, RecordingPresenter};
/// Re-exports of run state.
pub use run::{Feedback, Run, RunStats};
/// Re-exports of [`scheduler::Scheduler`] and [`scheduler::TaskId`].
pub use scheduler::{Scheduler, TaskId};
/// Re-exports of snapshot types.
pub use snapshot::{HealthView, Snapshot};
/// Re-exports of the best-level stores.
pub use store::{BestLevelStore, FileStore, MemoryStore};
