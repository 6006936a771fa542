use crate::core::factory::ShopFloor;
use crate::core::types::SimTime;

/// Perpetual source of new units, one every Exp(arrival_mean) time units
#[derive(Debug, Clone, Default)]
pub struct ArrivalGenerator {
    arrivals: u64,
}

impl ArrivalGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay until the first arrival
    pub fn start(&self, floor: &mut ShopFloor) -> SimTime {
        floor.sample_inter_arrival()
    }

    /// Count an arrival and return the delay until the next one
    pub fn fire(&mut self, floor: &mut ShopFloor) -> SimTime {
        self.arrivals += 1;
        floor.sample_inter_arrival()
    }

    /// Units spawned so far
    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }
}
