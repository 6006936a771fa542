use crate::core::types::{ProcessId, StationId};
use log::error;
use std::collections::VecDeque;

/// A capacity-1 workstation with a FIFO queue of waiting processes.
///
/// Ownership is handed over directly on release, so nobody can slip in
/// between the release and the resumption of the next waiter.
#[derive(Debug)]
pub struct Station {
    id: StationId,
    holder: Option<ProcessId>,
    wait_queue: VecDeque<ProcessId>,
}

impl Station {
    pub fn new(id: StationId) -> Self {
        Self {
            id,
            holder: None,
            wait_queue: VecDeque::new(),
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    /// Request the station for `process`.
    ///
    /// Returns true if it was granted immediately; otherwise the process is
    /// queued and will own the station when `release` hands it over.
    pub fn acquire(&mut self, process: ProcessId) -> bool {
        if self.holder.is_none() {
            self.holder = Some(process);
            true
        } else {
            self.wait_queue.push_back(process);
            false
        }
    }

    /// Release the station held by `process`.
    ///
    /// Returns the waiter that now owns the station and must be resumed.
    pub fn release(&mut self, process: ProcessId) -> Option<ProcessId> {
        if self.holder != Some(process) {
            error!(
                "Station {} released by process {} but held by {:?}",
                self.id, process, self.holder
            );
            return None;
        }
        self.holder = self.wait_queue.pop_front();
        self.holder
    }

    pub fn holder(&self) -> Option<ProcessId> {
        self.holder
    }

    pub fn is_busy(&self) -> bool {
        self.holder.is_some()
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_station_grants_immediately() {
        let mut station = Station::new(2);
        assert!(station.acquire(10));
        assert_eq!(station.holder(), Some(10));
        assert_eq!(station.queue_len(), 0);
    }

    #[test]
    fn test_release_hands_over_in_fifo_order() {
        let mut station = Station::new(0);
        assert!(station.acquire(1));
        assert!(!station.acquire(2));
        assert!(!station.acquire(3));
        assert_eq!(station.queue_len(), 2);

        assert_eq!(station.release(1), Some(2));
        assert_eq!(station.holder(), Some(2));
        // a newcomer cannot take the station from the handed-over waiter
        assert!(!station.acquire(4));

        assert_eq!(station.release(2), Some(3));
        assert_eq!(station.release(3), Some(4));
        assert_eq!(station.release(4), None);
        assert!(!station.is_busy());
    }

    #[test]
    fn test_release_by_non_holder_is_ignored() {
        let mut station = Station::new(5);
        station.acquire(1);
        station.acquire(2);
        assert_eq!(station.release(2), None);
        assert_eq!(station.holder(), Some(1));
        assert_eq!(station.queue_len(), 1);
    }
}
