use super::types::SimTime;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry; only `schedule_at` assigns the (time, sequence) key
#[derive(Debug)]
struct ScheduledEvent<E> {
    time: SimTime,
    sequence_num: u64,
    event: E,
}

impl<E> PartialEq for ScheduledEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time.total_cmp(&other.time) == Ordering::Equal && self.sequence_num == other.sequence_num
    }
}

impl<E> Eq for ScheduledEvent<E> {}

impl<E> PartialOrd for ScheduledEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for ScheduledEvent<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Min-heap of pending resumptions keyed by (absolute time, insertion order).
///
/// Events sharing a timestamp come out in the order they were scheduled.
pub struct EventScheduler<E> {
    event_queue: BinaryHeap<ScheduledEvent<E>>,
    sequence_counter: u64,
}

impl<E> EventScheduler<E> {
    /// Create a new EventScheduler
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule an event at an absolute simulated time
    pub fn schedule_at(&mut self, event: E, time: SimTime) {
        let scheduled_event = ScheduledEvent {
            time,
            sequence_num: self.sequence_counter,
            event,
        };

        self.event_queue.push(scheduled_event);
        self.sequence_counter += 1;
    }

    /// Remove and return the earliest event together with its time
    pub fn pop_next(&mut self) -> Option<(SimTime, E)> {
        self.event_queue
            .pop()
            .map(|scheduled_event| (scheduled_event.time, scheduled_event.event))
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Get the next event time without removing events
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|event| event.time)
    }

    pub fn len(&self) -> usize {
        self.event_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_queue.is_empty()
    }
}

impl<E> Default for EventScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at("late", 5.0);
        scheduler.schedule_at("early", 1.5);
        scheduler.schedule_at("middle", 3.0);

        assert_eq!(scheduler.peek_next_time(), Some(1.5));
        assert_eq!(scheduler.pop_next(), Some((1.5, "early")));
        assert_eq!(scheduler.pop_next(), Some((3.0, "middle")));
        assert_eq!(scheduler.pop_next(), Some((5.0, "late")));
        assert!(!scheduler.has_events());
    }

    #[test]
    fn test_equal_times_are_fifo() {
        let mut scheduler = EventScheduler::new();
        for i in 0..10 {
            scheduler.schedule_at(i, 2.0);
        }
        scheduler.schedule_at(99, 1.0);

        assert_eq!(scheduler.pop_next(), Some((1.0, 99)));
        let order: Vec<i32> = std::iter::from_fn(|| scheduler.pop_next().map(|(_, e)| e)).collect();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_ties_keep_insertion_order_across_pops() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule_at("first", 1.0);
        scheduler.schedule_at("held", 4.0);
        assert_eq!(scheduler.pop_next(), Some((1.0, "first")));

        // scheduled later at the same time as "held", so they come after it
        scheduler.schedule_at("second", 4.0);
        scheduler.schedule_at("third", 4.0);
        assert_eq!(scheduler.len(), 3);
        assert_eq!(scheduler.pop_next(), Some((4.0, "held")));
        assert_eq!(scheduler.pop_next(), Some((4.0, "second")));
        assert_eq!(scheduler.pop_next(), Some((4.0, "third")));
    }

    #[test]
    fn test_empty_scheduler() {
        let mut scheduler: EventScheduler<u64> = EventScheduler::default();
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.peek_next_time(), None);
        assert_eq!(scheduler.pop_next(), None);
    }
}
