//! Per-run context
//!
//! Everything the transform needs to know about the current invocation that
//! isn't in the source document. Passing it explicitly keeps the transform a
//! pure function of (input bytes, mapping, context).

use chrono::{DateTime, Local, TimeZone};
use uuid::Uuid;

/// Identity and start time of one relay invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Unique id of this run, attached to every log line
    pub run_id: Uuid,

    /// Wall-clock time at which the run started
    pub started_at: DateTime<Local>,
}

impl RunContext {
    /// Context for a run starting now
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Local::now(),
        }
    }

    /// Context with a fixed start time
    pub fn at<Tz: TimeZone>(started_at: DateTime<Tz>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: started_at.with_timezone(&Local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_runs_get_distinct_ids() {
        assert_ne!(RunContext::start().run_id, RunContext::start().run_id);
    }

    #[test]
    fn test_fixed_start_time() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap();
        let context = RunContext::at(instant);
        assert_eq!(context.started_at.with_timezone(&Utc), instant);
    }
}
