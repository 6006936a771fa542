use crate::core::errors::SimResult;
use crate::core::execution::config::FactoryParams;
use crate::core::metrics::{MetricsCollector, MetricsSnapshot};
use crate::core::process::{ArrivalGenerator, AssemblyProcess, Suspend};
use crate::core::resources::{MaterialInventory, Station};
use crate::core::sampling::Sampler;
use crate::core::simulation_engine::Reactor;
use crate::core::types::{ProcessId, SimTime, StationId, STATION_COUNT};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Process id reserved for the arrival generator
pub const ARRIVAL_PROCESS: ProcessId = 0;

/// State shared by every process of one replication: stations, materials,
/// metrics and the replication's random stream.
pub struct ShopFloor {
    pub stations: Vec<Station>,
    pub inventory: MaterialInventory,
    pub metrics: MetricsCollector,
    rng: StdRng,
    sampler: Sampler,
    failure_probabilities: [f64; STATION_COUNT],
    defect_probability: f64,
    wakeups: Vec<ProcessId>,
}

impl ShopFloor {
    pub fn new(params: &FactoryParams, seed: u64) -> SimResult<Self> {
        Ok(Self {
            stations: (0..STATION_COUNT).map(Station::new).collect(),
            inventory: MaterialInventory::new(params.material_capacity, params.resupply_agents),
            metrics: MetricsCollector::new(),
            rng: StdRng::seed_from_u64(seed),
            sampler: Sampler::from_params(params)?,
            failure_probabilities: params.failure_probabilities,
            defect_probability: params.defect_probability,
            wakeups: Vec::new(),
        })
    }

    /// Queue a parked process for resumption at the current instant
    pub fn wake(&mut self, process: ProcessId) {
        self.wakeups.push(process);
    }

    /// Release `station` and wake whoever it was handed to
    pub fn release_station(&mut self, station: StationId, process: ProcessId) {
        if let Some(next) = self.stations[station].release(process) {
            self.wake(next);
        }
    }

    pub fn sample_inter_arrival(&mut self) -> SimTime {
        self.sampler.inter_arrival(&mut self.rng)
    }

    pub fn sample_work_time(&mut self) -> SimTime {
        self.sampler.work_time(&mut self.rng)
    }

    pub fn sample_repair_time(&mut self) -> SimTime {
        self.sampler.repair_time(&mut self.rng)
    }

    pub fn sample_resupply_time(&mut self) -> SimTime {
        self.sampler.resupply_time(&mut self.rng)
    }

    /// Bernoulli draw against the station's failure probability
    pub fn station_fails(&mut self, station: StationId) -> bool {
        self.rng.gen::<f64>() < self.failure_probabilities[station]
    }

    /// Final quality check, independent of any repairs the unit went through
    pub fn fails_quality_check(&mut self) -> bool {
        self.rng.gen::<f64>() < self.defect_probability
    }

    pub fn choose_case_station(&mut self, options: [StationId; 2]) -> StationId {
        options[self.rng.gen_range(0..options.len())]
    }
}

/// The six-station watch assembly line as a reactive model.
///
/// Every event is the id of a process to resume; the arrival generator owns
/// id 0 and assembly units get increasing ids from 1.
pub struct WatchFactory {
    floor: ShopFloor,
    generator: ArrivalGenerator,
    units: HashMap<ProcessId, AssemblyProcess>,
    next_process_id: ProcessId,
}

impl WatchFactory {
    pub fn new(params: &FactoryParams, seed: u64) -> SimResult<Self> {
        Ok(Self {
            floor: ShopFloor::new(params, seed)?,
            generator: ArrivalGenerator::new(),
            units: HashMap::new(),
            next_process_id: ARRIVAL_PROCESS + 1,
        })
    }

    /// Events that start the line: the first arrival
    pub fn initial_events(&mut self) -> Vec<(ProcessId, SimTime)> {
        vec![(ARRIVAL_PROCESS, self.generator.start(&mut self.floor))]
    }

    /// Register a new unit starting at `now`; the caller schedules its first resumption
    pub fn spawn_unit(&mut self, now: SimTime) -> ProcessId {
        let id = self.next_process_id;
        self.next_process_id += 1;
        self.units.insert(id, AssemblyProcess::new(now));
        id
    }

    pub fn snapshot(&self, total_time: SimTime) -> MetricsSnapshot {
        self.floor.metrics.get_metrics(total_time)
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.floor.metrics
    }

    pub fn inventory(&self) -> &MaterialInventory {
        &self.floor.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut MaterialInventory {
        &mut self.floor.inventory
    }

    pub fn stations(&self) -> &[Station] {
        &self.floor.stations
    }

    pub fn unit(&self, id: ProcessId) -> Option<&AssemblyProcess> {
        self.units.get(&id)
    }

    /// Units still on the line, in no particular order
    pub fn units(&self) -> impl Iterator<Item = (ProcessId, &AssemblyProcess)> + '_ {
        self.units.iter().map(|(&id, unit)| (id, unit))
    }

    /// Units spawned by the arrival generator
    pub fn arrivals(&self) -> u64 {
        self.generator.arrivals()
    }

    /// Units started but not yet completed
    pub fn in_flight(&self) -> usize {
        self.units.len()
    }
}

impl Reactor for WatchFactory {
    type Event = ProcessId;

    fn react(&mut self, now: SimTime, process: ProcessId) -> Vec<(ProcessId, SimTime)> {
        if process == ARRIVAL_PROCESS {
            let unit = self.spawn_unit(now);
            let next_arrival = self.generator.fire(&mut self.floor);
            debug!("Arrival of unit {} at t={:.3}, next in {:.3}", unit, now, next_arrival);
            return vec![(unit, 0.0), (ARRIVAL_PROCESS, next_arrival)];
        }

        let Some(unit) = self.units.get_mut(&process) else {
            warn!("Resumption for unknown process {} at t={:.3}", process, now);
            return Vec::new();
        };

        let mut next = Vec::new();
        match unit.resume(process, now, &mut self.floor) {
            Suspend::Timeout(delay) => next.push((process, delay)),
            Suspend::Wait => {}
            Suspend::Finished => {
                self.units.remove(&process);
            }
        }
        next.extend(self.floor.wakeups.drain(..).map(|woken| (woken, 0.0)));
        next
    }
}
