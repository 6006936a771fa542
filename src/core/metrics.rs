use crate::core::types::{Material, SimTime, StationId, STATION_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionMetrics {
    pub total: u64,
    pub faulty: u64,
    pub faulty_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMetrics {
    pub occupancy_rates: Vec<f64>,
    pub downtimes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeMetrics {
    pub avg_production_time: f64,
    pub avg_fixing_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialMetrics {
    pub materials_used: BTreeMap<Material, u64>,
    pub resupply_counts: BTreeMap<Material, u64>,
}

/// Immutable end-of-run view of a replication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub production: ProductionMetrics,
    pub station_metrics: StationMetrics,
    pub time_metrics: TimeMetrics,
    pub material_metrics: MaterialMetrics,
}

/// Per-run accumulator written by every in-flight unit
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    production_count: u64,
    faulty_products: u64,
    station_work_times: [SimTime; STATION_COUNT],
    station_downtimes: [SimTime; STATION_COUNT],
    production_times: Vec<SimTime>,
    fixing_times: Vec<SimTime>,
    materials_used: [u64; Material::ALL.len()],
    resupply_counts: [u64; Material::ALL.len()],
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_production(&mut self) {
        self.production_count += 1;
    }

    pub fn record_faulty(&mut self) {
        self.faulty_products += 1;
    }

    pub fn record_work_time(&mut self, station: StationId, time: SimTime) {
        self.station_work_times[station] += time;
    }

    pub fn record_fixing_time(&mut self, station: StationId, time: SimTime) {
        self.fixing_times.push(time);
        self.station_downtimes[station] += time;
    }

    pub fn record_production_time(&mut self, time: SimTime) {
        self.production_times.push(time);
    }

    pub fn record_material_use(&mut self, material: Material) {
        self.materials_used[material.index()] += 1;
    }

    pub fn record_resupply(&mut self, material: Material) {
        self.resupply_counts[material.index()] += 1;
    }

    pub fn production_count(&self) -> u64 {
        self.production_count
    }

    pub fn faulty_count(&self) -> u64 {
        self.faulty_products
    }

    pub fn work_time(&self, station: StationId) -> SimTime {
        self.station_work_times[station]
    }

    pub fn downtime(&self, station: StationId) -> SimTime {
        self.station_downtimes[station]
    }

    pub fn materials_used(&self, material: Material) -> u64 {
        self.materials_used[material.index()]
    }

    pub fn resupply_count(&self, material: Material) -> u64 {
        self.resupply_counts[material.index()]
    }

    pub fn production_times(&self) -> &[SimTime] {
        &self.production_times
    }

    pub fn fixing_times(&self) -> &[SimTime] {
        &self.fixing_times
    }

    /// Derive the snapshot for a run of length `total_time`.
    ///
    /// Every ratio is 0 when its denominator is 0.
    pub fn get_metrics(&self, total_time: SimTime) -> MetricsSnapshot {
        let faulty_rate = if self.production_count > 0 {
            self.faulty_products as f64 / self.production_count as f64
        } else {
            0.0
        };

        let occupancy_rates = self
            .station_work_times
            .iter()
            .map(|work| if total_time > 0.0 { work / total_time } else { 0.0 })
            .collect();

        let per_material = |counts: &[u64; Material::ALL.len()]| {
            Material::ALL
                .iter()
                .map(|m| (*m, counts[m.index()]))
                .collect::<BTreeMap<_, _>>()
        };

        MetricsSnapshot {
            production: ProductionMetrics {
                total: self.production_count,
                faulty: self.faulty_products,
                faulty_rate,
            },
            station_metrics: StationMetrics {
                occupancy_rates,
                downtimes: self.station_downtimes.to_vec(),
            },
            time_metrics: TimeMetrics {
                avg_production_time: mean(&self.production_times),
                avg_fixing_time: mean(&self.fixing_times),
            },
            material_metrics: MaterialMetrics {
                materials_used: per_material(&self.materials_used),
                resupply_counts: per_material(&self.resupply_counts),
            },
        }
    }
}

/// Arithmetic mean summed in insertion order, 0 for an empty slice
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
