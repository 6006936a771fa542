use super::event_scheduler::EventScheduler;
use super::types::SimTime;
use log::{debug, warn};

/// A model driven by the engine.
///
/// Each popped event is handed to `react`, which mutates the model and
/// returns the follow-up events together with their delays relative to `now`.
pub trait Reactor {
    type Event;

    fn react(&mut self, now: SimTime, event: Self::Event) -> Vec<(Self::Event, SimTime)>;
}

/// Observer trait for simulation events
pub trait SimulationObserver<R: Reactor> {
    /// Called when the simulation clock moves forward
    fn on_time_advance(&mut self, old_time: SimTime, new_time: SimTime);

    /// Called after each resumption has been processed
    fn on_step_complete(&mut self, now: SimTime, model: &R);
}

/// Single-threaded discrete-event engine: a clock plus a time-ordered queue
/// of pending resumptions for the model `R`.
pub struct SimulationEngine<R: Reactor> {
    model: R,
    scheduler: EventScheduler<R::Event>,
    now: SimTime,
    advances: u64,
    observers: Vec<Box<dyn SimulationObserver<R>>>,
}

impl<R: Reactor> SimulationEngine<R> {
    pub fn new(model: R) -> Self {
        Self {
            model,
            scheduler: EventScheduler::new(),
            now: 0.0,
            advances: 0,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver<R>>) {
        self.observers.push(observer);
    }

    /// Schedule `event` to fire `delay` time units from now.
    /// Negative or NaN delays are treated as zero.
    pub fn schedule_after(&mut self, delay: SimTime, event: R::Event) {
        let delay = if delay >= 0.0 {
            delay
        } else {
            warn!("Negative or invalid delay {} clamped to 0 at t={:.4}", delay, self.now);
            0.0
        };
        self.scheduler.schedule_at(event, self.now + delay);
    }

    /// Pop the earliest event, move the clock to it and let the model react.
    /// Returns true if events remain.
    pub fn advance(&mut self) -> bool {
        let Some((time, event)) = self.scheduler.pop_next() else {
            return false;
        };

        let old_time = self.now;
        self.now = time;
        self.advances += 1;

        if old_time != self.now {
            for observer in &mut self.observers {
                observer.on_time_advance(old_time, self.now);
            }
        }

        debug!("=== Simulation step {} at t={:.4} ===", self.advances, self.now);

        for (next_event, delay) in self.model.react(self.now, event) {
            self.schedule_after(delay, next_event);
        }

        for observer in &mut self.observers {
            observer.on_step_complete(self.now, &self.model);
        }

        self.has_pending_events()
    }

    /// Advance while the earliest pending event is at or before `horizon`.
    ///
    /// Events left in the queue are abandoned; the clock ends at `horizon`.
    /// Returns the number of resumptions executed by this call.
    pub fn run_until(&mut self, horizon: SimTime) -> u64 {
        let start = self.advances;
        while self
            .scheduler
            .peek_next_time()
            .map_or(false, |next| next <= horizon)
        {
            self.advance();
        }
        if horizon.is_finite() && horizon > self.now {
            let old_time = self.now;
            self.now = horizon;
            for observer in &mut self.observers {
                observer.on_time_advance(old_time, horizon);
            }
        }
        self.advances - start
    }

    /// Get current simulation time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Total number of resumptions executed so far
    pub fn advances(&self) -> u64 {
        self.advances
    }

    /// Number of events still waiting in the queue
    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }

    pub fn model(&self) -> &R {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut R {
        &mut self.model
    }

    pub fn into_model(self) -> R {
        self.model
    }
}
