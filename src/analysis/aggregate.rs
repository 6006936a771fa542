use crate::core::errors::{SimError, SimResult};
use crate::core::metrics::{mean, MetricsSnapshot};
use crate::core::types::{Material, STATION_COUNT};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionSummary {
    pub avg_total: f64,
    pub std_total: f64,
    pub avg_faulty: f64,
    pub avg_faulty_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSummary {
    pub avg_occupancy_rates: Vec<f64>,
    pub avg_downtimes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSummary {
    pub avg_production_time: f64,
    pub avg_fixing_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialSummary {
    pub avg_usage: BTreeMap<Material, f64>,
    pub avg_resupply: BTreeMap<Material, f64>,
}

/// Cross-replication statistics for a batch of snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResults {
    pub replications: usize,
    pub production: ProductionSummary,
    pub station_metrics: StationSummary,
    pub time_metrics: TimeSummary,
    pub material_metrics: MaterialSummary,
}

impl AggregatedResults {
    pub fn from_snapshots(snapshots: &[MetricsSnapshot]) -> SimResult<Self> {
        if snapshots.is_empty() {
            return Err(SimError::EmptyBatch);
        }

        let totals: Vec<f64> = snapshots.iter().map(|s| s.production.total as f64).collect();

        Ok(Self {
            replications: snapshots.len(),
            production: ProductionSummary {
                avg_total: mean(&totals),
                std_total: population_std_dev(&totals),
                avg_faulty: mean_of(snapshots, |s| s.production.faulty as f64),
                avg_faulty_rate: mean_of(snapshots, |s| s.production.faulty_rate),
            },
            station_metrics: StationSummary {
                avg_occupancy_rates: (0..STATION_COUNT)
                    .map(|i| mean_of(snapshots, |s| station_value(&s.station_metrics.occupancy_rates, i)))
                    .collect(),
                avg_downtimes: (0..STATION_COUNT)
                    .map(|i| mean_of(snapshots, |s| station_value(&s.station_metrics.downtimes, i)))
                    .collect(),
            },
            time_metrics: TimeSummary {
                avg_production_time: mean_of(snapshots, |s| s.time_metrics.avg_production_time),
                avg_fixing_time: mean_of(snapshots, |s| s.time_metrics.avg_fixing_time),
            },
            material_metrics: MaterialSummary {
                avg_usage: Material::ALL
                    .iter()
                    .map(|&m| (m, mean_of(snapshots, |s| material_count(&s.material_metrics.materials_used, m) as f64)))
                    .collect(),
                avg_resupply: Material::ALL
                    .iter()
                    .map(|&m| (m, mean_of(snapshots, |s| material_count(&s.material_metrics.resupply_counts, m) as f64)))
                    .collect(),
            },
        })
    }
}

fn mean_of<F: Fn(&MetricsSnapshot) -> f64>(snapshots: &[MetricsSnapshot], f: F) -> f64 {
    mean(&snapshots.iter().map(f).collect::<Vec<_>>())
}

pub(crate) fn station_value(values: &[f64], station: usize) -> f64 {
    values.get(station).copied().unwrap_or(0.0)
}

pub(crate) fn material_count(counts: &BTreeMap<Material, u64>, material: Material) -> u64 {
    counts.get(&material).copied().unwrap_or(0)
}

fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
