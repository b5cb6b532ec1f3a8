//! Lifecycle states for tellers and customers, with shared status boards.

use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TellerStatus {
    #[default]
    Idle,
    WaitingForCustomer,
    Serving,
    Terminated,
}

impl TellerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Created,
    AtBarrier,
    Admitted,
    Assigned,
    InService,
    Departed,
}

impl CustomerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Departed)
    }
}

/// One status slot per task, written at lifecycle transitions and read by
/// the final report. Best-effort observability, not a protocol primitive.
pub struct StatusBoard<T: Copy + Default> {
    slots: Mutex<Vec<T>>,
}

impl<T: Copy + Default> StatusBoard<T> {
    pub fn new(count: usize) -> Self {
        Self {
            slots: Mutex::new(vec![T::default(); count]),
        }
    }

    pub fn set(&self, index: usize, status: T) {
        self.lock_slots()[index] = status;
    }

    pub fn get(&self, index: usize) -> T {
        self.lock_slots()[index]
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.lock_slots().clone()
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Status board mutex poisoned - recovering");
                poisoned.into_inner()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_have_single_terminal_state() {
        assert!(!TellerStatus::Idle.is_terminal());
        assert!(!TellerStatus::Serving.is_terminal());
        assert!(TellerStatus::Terminated.is_terminal());

        assert!(!CustomerStatus::Created.is_terminal());
        assert!(!CustomerStatus::InService.is_terminal());
        assert!(CustomerStatus::Departed.is_terminal());
    }

    #[test]
    fn board_tracks_per_slot_status() {
        let board = StatusBoard::<TellerStatus>::new(2);
        assert_eq!(board.get(0), TellerStatus::Idle);

        board.set(1, TellerStatus::Serving);
        assert_eq!(board.get(1), TellerStatus::Serving);
        assert_eq!(
            board.snapshot(),
            vec![TellerStatus::Idle, TellerStatus::Serving]
        );
    }

    #[test]
    fn statuses_serialize_snake_case() {
        assert_eq!(
            serde_json::to_value(TellerStatus::WaitingForCustomer).unwrap(),
            serde_json::json!("waiting_for_customer")
        );
        assert_eq!(
            serde_json::to_value(CustomerStatus::InService).unwrap(),
            serde_json::json!("in_service")
        );
    }
}
