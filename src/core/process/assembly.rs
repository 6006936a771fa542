use crate::core::factory::ShopFloor;
use crate::core::types::{Material, ProcessId, SimTime, StationId};
use log::{debug, warn};

/// Materials in the order a unit consumes them; index = step
pub const ASSEMBLY_STEPS: [Material; 6] = Material::ALL;

const CASE_STEP: usize = 3;
const WATER_SEAL_STEP: usize = 4;
const CASE_STATIONS: [StationId; 2] = [3, 4];

/// Where a unit is parked between resumptions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssemblyState {
    /// About to consume the material of `step`
    AwaitingMaterial { step: usize },
    /// Container empty, queued for a free resupply agent
    AwaitingResupplyAgent { step: usize },
    /// Holding an agent while the container is refilled
    Resupplying { step: usize },
    AwaitingStation { step: usize, station: StationId },
    Working { step: usize, station: StationId, duration: SimTime },
    AwaitingRepair { step: usize, station: StationId, duration: SimTime },
    Completed,
}

/// What the unit is waiting for after a resumption
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suspend {
    /// Resume after the given delay
    Timeout(SimTime),
    /// Parked in a resource queue; whoever releases the resource resumes it
    Wait,
    Finished,
}

/// One watch travelling down the line
#[derive(Debug, Clone)]
pub struct AssemblyProcess {
    start_time: SimTime,
    case_station: Option<StationId>,
    state: AssemblyState,
}

impl AssemblyProcess {
    pub fn new(start_time: SimTime) -> Self {
        Self {
            start_time,
            case_station: None,
            state: AssemblyState::AwaitingMaterial { step: 0 },
        }
    }

    pub fn state(&self) -> AssemblyState {
        self.state
    }

    pub fn start_time(&self) -> SimTime {
        self.start_time
    }

    /// Station used for the case step, once chosen
    pub fn case_station(&self) -> Option<StationId> {
        self.case_station
    }

    /// The other of the two interchangeable stations
    pub fn water_seal_station(&self) -> Option<StationId> {
        self.case_station.map(|s| if s == CASE_STATIONS[0] { CASE_STATIONS[1] } else { CASE_STATIONS[0] })
    }

    fn station_for(&self, step: usize) -> StationId {
        match step {
            CASE_STEP => self.case_station.unwrap_or(CASE_STATIONS[0]),
            WATER_SEAL_STEP => self.water_seal_station().unwrap_or(CASE_STATIONS[1]),
            // steps 0-2 and 5 map one-to-one onto their station
            s => s,
        }
    }

    /// Steps whose material this unit has already drawn from inventory
    pub fn materials_consumed(&self) -> usize {
        match self.state {
            AssemblyState::AwaitingMaterial { step }
            | AssemblyState::AwaitingResupplyAgent { step }
            | AssemblyState::Resupplying { step } => step,
            AssemblyState::AwaitingStation { step, .. }
            | AssemblyState::Working { step, .. }
            | AssemblyState::AwaitingRepair { step, .. } => step + 1,
            AssemblyState::Completed => ASSEMBLY_STEPS.len(),
        }
    }

    /// Run the unit from its current state until the next suspension point
    pub fn resume(&mut self, id: ProcessId, now: SimTime, floor: &mut ShopFloor) -> Suspend {
        loop {
            match self.state {
                AssemblyState::AwaitingMaterial { step } => {
                    if step == ASSEMBLY_STEPS.len() {
                        self.complete(id, now, floor);
                        return Suspend::Finished;
                    }
                    if step == CASE_STEP && self.case_station.is_none() {
                        let pick = floor.choose_case_station(CASE_STATIONS);
                        self.case_station = Some(pick);
                    }

                    let material = ASSEMBLY_STEPS[step];
                    if floor.inventory.consume(material) {
                        floor.metrics.record_material_use(material);
                        let station = self.station_for(step);
                        if floor.stations[station].acquire(id) {
                            return self.start_work(step, station, floor);
                        }
                        debug!("Unit {} queued at station {} (t={:.3})", id, station, now);
                        self.state = AssemblyState::AwaitingStation { step, station };
                        return Suspend::Wait;
                    }

                    if floor.inventory.pool_mut().try_acquire(id) {
                        return self.start_resupply(id, step, now, floor);
                    }
                    debug!("Unit {} waiting for a resupply agent for {} (t={:.3})", id, material, now);
                    self.state = AssemblyState::AwaitingResupplyAgent { step };
                    return Suspend::Wait;
                }
                AssemblyState::AwaitingResupplyAgent { step } => {
                    return self.start_resupply(id, step, now, floor);
                }
                AssemblyState::Resupplying { step } => {
                    let material = ASSEMBLY_STEPS[step];
                    floor.inventory.restock(material);
                    floor.metrics.record_resupply(material);
                    if let Some(next) = floor.inventory.pool_mut().release() {
                        floor.wake(next);
                    }
                    self.state = AssemblyState::AwaitingMaterial { step };
                }
                AssemblyState::AwaitingStation { step, station } => {
                    return self.start_work(step, station, floor);
                }
                AssemblyState::Working { step, station, duration } => {
                    floor.metrics.record_work_time(station, duration);
                    if floor.station_fails(station) {
                        let repair = floor.sample_repair_time();
                        debug!("Station {} failed under unit {}, repair {:.3}", station, id, repair);
                        self.state = AssemblyState::AwaitingRepair { step, station, duration: repair };
                        return Suspend::Timeout(repair);
                    }
                    floor.release_station(station, id);
                    self.state = AssemblyState::AwaitingMaterial { step: step + 1 };
                }
                AssemblyState::AwaitingRepair { step, station, duration } => {
                    floor.metrics.record_fixing_time(station, duration);
                    floor.release_station(station, id);
                    self.state = AssemblyState::AwaitingMaterial { step: step + 1 };
                }
                AssemblyState::Completed => {
                    warn!("Unit {} resumed after completion", id);
                    return Suspend::Finished;
                }
            }
        }
    }

    fn start_work(&mut self, step: usize, station: StationId, floor: &mut ShopFloor) -> Suspend {
        let duration = floor.sample_work_time();
        self.state = AssemblyState::Working { step, station, duration };
        Suspend::Timeout(duration)
    }

    fn start_resupply(&mut self, id: ProcessId, step: usize, now: SimTime, floor: &mut ShopFloor) -> Suspend {
        let duration = floor.sample_resupply_time();
        debug!(
            "Unit {} resupplying {} for {:.3} (t={:.3})",
            id, ASSEMBLY_STEPS[step], duration, now
        );
        self.state = AssemblyState::Resupplying { step };
        Suspend::Timeout(duration)
    }

    fn complete(&mut self, id: ProcessId, now: SimTime, floor: &mut ShopFloor) {
        floor.metrics.record_production_time(now - self.start_time);
        floor.metrics.record_production();
        let faulty = floor.fails_quality_check();
        if faulty {
            floor.metrics.record_faulty();
        }
        debug!(
            "Unit {} completed in {:.3}{}",
            id,
            now - self.start_time,
            if faulty { " (faulty)" } else { "" }
        );
        self.state = AssemblyState::Completed;
    }
}
