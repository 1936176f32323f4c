//! Pending award intents.
//!
//! The engine never calls collaborators from the tick path. Each award is
//! recorded in the tally first, then queued here as an intent; the host
//! drains the queue between ticks and dispatches to the ledger and profile
//! store. A failed delivery is reported and logged, never retried, and the
//! in-memory tally is not rolled back -- an award can be promised but never
//! recorded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::points::AwardKind;
use crate::collab::{Ledger, ProfileStore};

/// One pending side effect owed to a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum AwardIntent {
    Points {
        amount: u32,
        kind: AwardKind,
        note: String,
    },
    StudyMinutes {
        minutes: u32,
    },
}

/// FIFO queue of intents awaiting dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwardOutbox {
    pending: VecDeque<AwardIntent>,
}

impl AwardOutbox {
    pub fn push(&mut self, intent: AwardIntent) {
        self.pending.push_back(intent);
    }

    /// Remove and return every pending intent, oldest first.
    pub fn drain(&mut self) -> Vec<AwardIntent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// An intent that a collaborator rejected.
#[derive(Debug, Clone)]
pub struct DeliveryFailure {
    pub intent: AwardIntent,
    pub message: String,
}

/// Deliver intents to the collaborators, in order.
///
/// Returns the intents that failed. Delivery stops for nothing: a rejected
/// intent is logged and collected, and the rest still go out.
pub fn dispatch(
    intents: Vec<AwardIntent>,
    ledger: &dyn Ledger,
    profile: &dyn ProfileStore,
) -> Vec<DeliveryFailure> {
    let mut failures = Vec::new();
    for intent in intents {
        let result = match &intent {
            AwardIntent::Points { amount, kind, note } => ledger.award(*amount, *kind, note),
            AwardIntent::StudyMinutes { minutes } => profile.add_study_minutes(*minutes),
        };
        if let Err(err) = result {
            tracing::warn!(?intent, error = %err, "award delivery failed");
            failures.push(DeliveryFailure {
                intent,
                message: err.to_string(),
            });
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::recorders::{RecordingLedger, RecordingProfile};

    fn points(amount: u32) -> AwardIntent {
        AwardIntent::Points {
            amount,
            kind: AwardKind::MinuteStudy,
            note: "focus minute".into(),
        }
    }

    #[test]
    fn drain_empties_queue_in_order() {
        let mut outbox = AwardOutbox::default();
        outbox.push(points(1));
        outbox.push(AwardIntent::StudyMinutes { minutes: 25 });
        assert_eq!(outbox.len(), 2);

        let drained = outbox.drain();
        assert_eq!(drained.len(), 2);
        assert!(outbox.is_empty());
        assert!(matches!(drained[0], AwardIntent::Points { amount: 1, .. }));
        assert!(matches!(drained[1], AwardIntent::StudyMinutes { minutes: 25 }));
    }

    #[test]
    fn dispatch_routes_to_collaborators() {
        let ledger = RecordingLedger::default();
        let profile = RecordingProfile::default();

        let failures = dispatch(
            vec![points(1), AwardIntent::StudyMinutes { minutes: 25 }],
            &ledger,
            &profile,
        );

        assert!(failures.is_empty());
        assert_eq!(ledger.awards.borrow().len(), 1);
        assert_eq!(profile.minutes.borrow().as_slice(), &[25]);
    }

    #[test]
    fn dispatch_reports_failures_and_continues() {
        let ledger = RecordingLedger {
            fail: true,
            ..Default::default()
        };
        let profile = RecordingProfile::default();

        let failures = dispatch(
            vec![points(1), AwardIntent::StudyMinutes { minutes: 5 }],
            &ledger,
            &profile,
        );

        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].intent, AwardIntent::Points { .. }));
        // The later intent was still delivered.
        assert_eq!(profile.minutes.borrow().as_slice(), &[5]);
    }

    #[test]
    fn outbox_round_trips_through_json() {
        let mut outbox = AwardOutbox::default();
        outbox.push(points(3));
        let json = serde_json::to_string(&outbox).unwrap();
        let mut restored: AwardOutbox = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.drain(), vec![points(3)]);
    }
}
