//! One practice session: owns the error log, runs drills against it.

use chrono::{DateTime, Local, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::drill::{self, Action, Outcome};
use crate::export;
use crate::store::ErrorLogStore;

/// A single user's interaction lifetime. Owns exactly one log store and is
/// never shared between sessions.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Local>,
    store: ErrorLogStore,
}

impl Session {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        debug!(%id, "session opened");
        Self {
            id,
            started_at: Local::now(),
            store: ErrorLogStore::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Run one drill and record its failure, if any.
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        self.report(drill::handle(action))
    }

    /// Absorb an already-built outcome. Used for failures raised outside the
    /// drills, e.g. an upload that could not be read at all.
    pub fn report(&mut self, outcome: Outcome) -> Outcome {
        if let Some(record) = &outcome.record {
            debug!(kind = %record.error_kind, location = %record.location, "failure recorded");
            self.store.append(record.clone());
        }
        outcome
    }

    pub fn store(&self) -> &ErrorLogStore {
        &self.store
    }

    /// Drop every recorded failure.
    pub fn clear_log(&mut self) {
        self.store.clear();
    }

    /// Downloadable log file, gated on a non-empty log. `None` means "no
    /// errors yet"; the caller shows the notice instead of a file.
    pub fn export_log(&self, date: NaiveDate) -> Option<(String, Vec<u8>)> {
        if self.store.is_empty() {
            return None;
        }
        Some((
            export::export_filename(date),
            export::export_csv(self.store.read_all()),
        ))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_action(n: usize) -> Action {
        Action::CheckNumber {
            input: format!("abc-{n}"),
        }
    }

    #[test]
    fn dispatch_records_failures_in_order() {
        let mut session = Session::new();
        for n in 0..3 {
            session.dispatch(failing_action(n));
        }

        let all = session.store().read_all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].input_value, "abc-0");
        assert_eq!(all[2].input_value, "abc-2");
    }

    #[test]
    fn dispatch_ignores_successes() {
        let mut session = Session::new();
        session.dispatch(Action::CheckNumber {
            input: "100".to_string(),
        });
        session.dispatch(Action::PickItem { index: 2 });

        assert!(session.store().is_empty());
    }

    #[test]
    fn sessions_are_isolated() {
        let mut left = Session::new();
        let mut right = Session::new();

        left.dispatch(failing_action(0));

        assert_ne!(left.id(), right.id());
        assert_eq!(left.store().len(), 1);
        assert!(right.store().is_empty());

        right.clear_log();
        assert_eq!(left.store().len(), 1);
    }

    #[test]
    fn empty_log_exports_nothing() {
        let session = Session::new();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(session.export_log(date).is_none());
    }

    #[test]
    fn non_empty_log_exports_dated_file() {
        let mut session = Session::new();
        session.dispatch(failing_action(0));

        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let (filename, bytes) = session.export_log(date).unwrap();
        assert_eq!(filename, "error_log_20250601.csv");
        assert!(bytes.starts_with(&export::UTF8_BOM));
    }

    #[test]
    fn clear_then_export_is_gated_again() {
        let mut session = Session::new();
        session.dispatch(failing_action(0));
        session.clear_log();

        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(session.export_log(date).is_none());
    }
}
