//! # Focusbank Core Library
//!
//! This library provides the core business logic for Focusbank, a focus
//! timer that banks unused rest time against future breaks and projects the
//! remaining work queue onto a calendar. All operations are available via
//! the standalone CLI binary; any GUI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Break-Bank Timer**: a wall-clock-based state machine that requires
//!   the caller to invoke `tick(now)` once per second. Every command
//!   returns effects (log appends, persistence writes, alarm tokens) for
//!   the caller to execute
//! - **Grace resolver**: retroactive attribution of the time between a work
//!   interval completing and the user acting on it
//! - **Schedule timeline**: a pure projection of the remaining work queue
//!   into positioned calendar blocks, routed around pinned break windows
//! - **Storage**: SQLite key-value buckets plus TOML settings
//!
//! ## Key Components
//!
//! - [`BankTimer`]: core timer state machine
//! - [`Session`]: single owner of cross-component state
//! - [`schedule::generate`]: the timeline generator
//! - [`Store`]: bucket persistence

pub mod error;
pub mod events;
pub mod log;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod sync;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, StoreError, SyncError, ValidationError};
pub use events::Effect;
pub use log::{LogEntry, LogKind, SessionLog, SessionStats};
pub use schedule::{BlockKind, ScheduleBreak, SchedulePlan, TimeBlock, Timeline, TimelineInput};
pub use session::{EffectOutcome, Session};
pub use storage::{Bucket, Settings, Store};
pub use sync::{GroupLink, GroupRole, GroupSession, GroupTransport, SyncSnapshot};
pub use task::{Subtask, Task, TaskQueue, WorkUnit};
pub use timer::{
    Attribution, BankTimer, GraceChoice, GraceContext, Mode, Phase, TimerSnapshot,
};
