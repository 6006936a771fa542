//! Tabular views of a batch of snapshots, in the three CSV layouts the
//! dashboard reads: a per-replication time series, a per-station summary
//! and a per-material summary.

use crate::analysis::aggregate::{material_count, station_value};
use crate::core::errors::{SimError, SimResult};
use crate::core::metrics::MetricsSnapshot;
use crate::core::types::{Material, STATION_COUNT, STATION_NAMES};
use chrono::{Days, NaiveDate};
use log::info;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const PRODUCTION_FILE: &str = "production_data.csv";
pub const STATION_FILE: &str = "station_data.csv";
pub const MATERIAL_FILE: &str = "material_data.csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionRow {
    pub date: NaiveDate,
    pub production: u64,
    pub faulty: u64,
    pub faulty_rate: f64,
    pub avg_downtime: f64,
    pub avg_production_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRow {
    pub station_id: usize,
    pub station_name: &'static str,
    pub occupancy_rate: f64,
    pub downtime: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRow {
    pub material: Material,
    pub display_name: String,
    pub total_usage: u64,
    pub total_resupply: u64,
    pub avg_usage: f64,
    pub avg_resupply: f64,
}

/// One row per replication, treating each run as `days_per_run` days that
/// end at `end_date`.
///
/// Fails with [`SimError::InvalidDateRange`] when the series would start or
/// end outside the calendar `NaiveDate` can represent.
pub fn production_series(
    snapshots: &[MetricsSnapshot],
    days_per_run: u32,
    end_date: NaiveDate,
) -> SimResult<Vec<ProductionRow>> {
    let out_of_range = || SimError::InvalidDateRange {
        days_per_run,
        runs: snapshots.len(),
        end_date,
    };
    let step = u64::from(days_per_run);
    let span = u64::try_from(snapshots.len())
        .ok()
        .and_then(|runs| step.checked_mul(runs))
        .ok_or_else(out_of_range)?;
    let start_date = end_date
        .checked_sub_days(Days::new(span))
        .ok_or_else(out_of_range)?;

    snapshots
        .iter()
        .zip(0u64..)
        .map(|(s, i)| -> SimResult<ProductionRow> {
            // i < runs, so i * step <= span and the date stays within range
            let date = start_date
                .checked_add_days(Days::new(step * i))
                .ok_or_else(out_of_range)?;
            let downtimes = &s.station_metrics.downtimes;
            let avg_downtime = if downtimes.is_empty() {
                0.0
            } else {
                downtimes.iter().sum::<f64>() / downtimes.len() as f64
            };
            Ok(ProductionRow {
                date,
                production: s.production.total,
                faulty: s.production.faulty,
                faulty_rate: s.production.faulty_rate,
                avg_downtime,
                avg_production_time: s.time_metrics.avg_production_time,
            })
        })
        .collect()
}

pub fn station_summary(snapshots: &[MetricsSnapshot]) -> SimResult<Vec<StationRow>> {
    if snapshots.is_empty() {
        return Err(SimError::EmptyBatch);
    }
    let runs = snapshots.len() as f64;

    Ok((0..STATION_COUNT)
        .map(|i| StationRow {
            station_id: i,
            station_name: STATION_NAMES[i],
            occupancy_rate: snapshots
                .iter()
                .map(|s| station_value(&s.station_metrics.occupancy_rates, i))
                .sum::<f64>()
                / runs,
            downtime: snapshots
                .iter()
                .map(|s| station_value(&s.station_metrics.downtimes, i))
                .sum::<f64>()
                / runs,
        })
        .collect())
}

pub fn material_summary(snapshots: &[MetricsSnapshot]) -> SimResult<Vec<MaterialRow>> {
    if snapshots.is_empty() {
        return Err(SimError::EmptyBatch);
    }
    let runs = snapshots.len() as f64;

    Ok(Material::ALL
        .iter()
        .map(|&material| {
            let total_usage: u64 = snapshots
                .iter()
                .map(|s| material_count(&s.material_metrics.materials_used, material))
                .sum();
            let total_resupply: u64 = snapshots
                .iter()
                .map(|s| material_count(&s.material_metrics.resupply_counts, material))
                .sum();
            MaterialRow {
                material,
                display_name: material.display_name(),
                total_usage,
                total_resupply,
                avg_usage: total_usage as f64 / runs,
                avg_resupply: total_resupply as f64 / runs,
            }
        })
        .collect())
}

/// Serialize `rows` as CSV with a header line
pub fn write_csv<T: Serialize, W: Write>(rows: &[T], writer: W) -> SimResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the three dashboard tables into `dir`, creating it if needed
pub fn export_dashboard_data(
    snapshots: &[MetricsSnapshot],
    days_per_run: u32,
    end_date: NaiveDate,
    dir: &Path,
) -> SimResult<()> {
    let production = production_series(snapshots, days_per_run, end_date)?;
    std::fs::create_dir_all(dir)?;
    write_csv(&production, std::fs::File::create(dir.join(PRODUCTION_FILE))?)?;
    write_csv(&station_summary(snapshots)?, std::fs::File::create(dir.join(STATION_FILE))?)?;
    write_csv(&material_summary(snapshots)?, std::fs::File::create(dir.join(MATERIAL_FILE))?)?;

    info!("Exported {} runs to {}", snapshots.len(), dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::MetricsCollector;

    fn sample_snapshots() -> Vec<MetricsSnapshot> {
        (1..=3u64)
            .map(|n| {
                let mut metrics = MetricsCollector::new();
                for _ in 0..n * 10 {
                    metrics.record_production();
                    metrics.record_material_use(Material::Batteries);
                }
                metrics.record_faulty();
                metrics.record_fixing_time(3, 6.0 * n as f64);
                metrics.record_work_time(3, 50.0);
                metrics.record_resupply(Material::Batteries);
                metrics.get_metrics(100.0)
            })
            .collect()
    }

    #[test]
    fn test_production_series_dates_and_values() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let rows = production_series(&sample_snapshots(), 2, end).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
        assert_eq!(rows[1].production, 20);
        assert_eq!(rows[1].faulty, 1);
        assert_eq!(rows[1].avg_downtime, 2.0);
    }

    #[test]
    fn test_production_series_rejects_dates_out_of_range() {
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let snapshots = sample_snapshots();

        let err = production_series(&snapshots[..1], 100_000_000, end).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidDateRange { days_per_run: 100_000_000, runs: 1, .. }
        ));

        assert!(matches!(
            production_series(&snapshots, u32::MAX, end),
            Err(SimError::InvalidDateRange { runs: 3, .. })
        ));

        let dir = std::env::temp_dir().join(format!("watch_factory_export_{}", std::process::id()));
        assert!(matches!(
            export_dashboard_data(&snapshots, u32::MAX, end, &dir),
            Err(SimError::InvalidDateRange { .. })
        ));
        assert!(!dir.exists());
    }

    #[test]
    fn test_production_series_zero_days_and_empty_batch() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let rows = production_series(&sample_snapshots(), 0, end).unwrap();
        assert!(rows.iter().all(|r| r.date == end));
        assert!(production_series(&[], 7, end).unwrap().is_empty());
    }

    #[test]
    fn test_station_summary_averages_runs() {
        let rows = station_summary(&sample_snapshots()).unwrap();
        assert_eq!(rows.len(), STATION_COUNT);
        assert_eq!(rows[3].station_name, "Case Assembly");
        assert_eq!(rows[3].occupancy_rate, 0.5);
        assert_eq!(rows[3].downtime, 12.0);
        assert_eq!(rows[0].downtime, 0.0);
    }

    #[test]
    fn test_material_summary_totals() {
        let rows = material_summary(&sample_snapshots()).unwrap();
        let batteries = rows.iter().find(|r| r.material == Material::Batteries).unwrap();
        assert_eq!(batteries.display_name, "Batteries");
        assert_eq!(batteries.total_usage, 60);
        assert_eq!(batteries.avg_usage, 20.0);
        assert_eq!(batteries.total_resupply, 3);
        assert_eq!(batteries.avg_resupply, 1.0);
    }

    #[test]
    fn test_summaries_reject_empty_batch() {
        assert!(matches!(station_summary(&[]), Err(SimError::EmptyBatch)));
        assert!(matches!(material_summary(&[]), Err(SimError::EmptyBatch)));
    }

    #[test]
    fn test_write_csv_layout() {
        let end = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let rows = production_series(&sample_snapshots()[..1], 1, end).unwrap();
        let mut buffer = Vec::new();
        write_csv(&rows, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date,production,faulty,faulty_rate,avg_downtime,avg_production_time")
        );
        assert!(lines.next().unwrap().starts_with("2024-01-01,10,1,0.1,"));
    }

    #[test]
    fn test_material_csv_uses_snake_case_names() {
        let rows = material_summary(&sample_snapshots()).unwrap();
        let mut buffer = Vec::new();
        write_csv(&rows, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("water_sealant,Water Sealant,0,0,0.0,0.0"));
    }
}
