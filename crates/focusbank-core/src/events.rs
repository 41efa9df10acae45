use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::log::LogEntry;
use crate::storage::Bucket;

/// Every engine command returns a list of effects. The engine itself never
/// performs I/O; the caller (session controller, CLI, GUI) executes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Effect {
    /// Append an entry to the session log.
    AppendLog { entry: LogEntry },
    /// Fill in the end/duration of the open all-pause log entry.
    FinalizeAllPause { end: DateTime<Utc> },
    /// A work interval completed; the session should advance the completed
    /// counter of the owning task and enrich the work log entry.
    WorkUnitCompleted,
    /// Play the alarm associated with the completed interval. The core only
    /// carries the sound-selection token; audio synthesis is external.
    Notify { sound: String },
    /// Persist the named bucket to the store.
    Persist { bucket: Bucket },
    /// The session ended; the controller should compute and show the summary.
    SessionEnded,
}
