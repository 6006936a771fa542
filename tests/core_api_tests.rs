use chrono::NaiveDate;
use watch_factory_sim::analysis::export::{material_summary, production_series, station_summary, write_csv};
use watch_factory_sim::{
    run_batch, run_replication, AggregatedResults, ConcurrencyMode, FactoryParams, Material, SimError,
    SimulationConfig,
};

fn small_config() -> SimulationConfig {
    SimulationConfig::new()
        .with_horizon(1000.0)
        .with_replications(4)
        .with_seed(2024)
}

#[test]
fn test_batch_end_to_end() {
    let snapshots = run_batch(&small_config()).unwrap();
    assert_eq!(snapshots.len(), 4);

    for snapshot in &snapshots {
        assert!(snapshot.production.total > 0);
        assert!(snapshot.production.faulty <= snapshot.production.total);
        assert!((0.0..=1.0).contains(&snapshot.production.faulty_rate));
        assert_eq!(snapshot.station_metrics.occupancy_rates.len(), 6);
        for rate in &snapshot.station_metrics.occupancy_rates {
            assert!((0.0..=1.0).contains(rate), "occupancy {}", rate);
        }
        assert!(snapshot.time_metrics.avg_production_time >= 24.0 * 0.5);
        assert_eq!(snapshot.material_metrics.materials_used.len(), Material::ALL.len());
        // far more than 25 units go through in 1000 time units
        assert!(snapshot.material_metrics.resupply_counts[&Material::BaseCircuits] > 0);
    }

    let results = AggregatedResults::from_snapshots(&snapshots).unwrap();
    assert_eq!(results.replications, 4);
    assert!(results.production.avg_total > 0.0);
    assert!(results.production.std_total >= 0.0);
    assert_eq!(results.station_metrics.avg_occupancy_rates.len(), 6);
}

#[test]
fn test_batch_is_reproducible() {
    let first = run_batch(&small_config()).unwrap();
    let second = run_batch(&small_config()).unwrap();
    assert_eq!(first, second);

    let parallel = run_batch(&small_config().with_concurrency(ConcurrencyMode::Rayon)).unwrap();
    assert_eq!(first, parallel);
}

#[test]
fn test_replications_are_independent() {
    let config = small_config();
    let snapshots = run_batch(&config).unwrap();
    for (i, snapshot) in snapshots.iter().enumerate() {
        let alone = run_replication(&config.params, config.replication_seed(i), config.horizon).unwrap();
        assert_eq!(&alone, snapshot);
    }
}

#[test]
fn test_invalid_config_is_rejected_before_running() {
    let err = run_batch(&SimulationConfig::new().with_horizon(-1.0)).unwrap_err();
    assert!(matches!(err, SimError::InvalidHorizon(_)));
    assert!(err.to_string().contains("horizon"));

    let err = run_batch(&SimulationConfig::new().with_replications(0)).unwrap_err();
    assert!(matches!(err, SimError::InvalidReplications));

    let params = FactoryParams { defect_probability: -0.1, ..FactoryParams::default() };
    let err = run_batch(&SimulationConfig::new().with_params(params)).unwrap_err();
    assert!(matches!(err, SimError::InvalidParameter { name: "defect_probability", .. }));
}

#[test]
fn test_export_tables_from_batch() {
    let snapshots = run_batch(&small_config()).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();

    let production = production_series(&snapshots, 1, end).unwrap();
    assert_eq!(production.len(), 4);
    assert_eq!(production[0].date, NaiveDate::from_ymd_opt(2025, 6, 26).unwrap());
    assert_eq!(production[3].production, snapshots[3].production.total);

    let stations = station_summary(&snapshots).unwrap();
    assert_eq!(stations.len(), 6);
    assert_eq!(stations[5].station_name, "Testing & Packaging");

    let materials = material_summary(&snapshots).unwrap();
    assert_eq!(materials.len(), 6);
    assert_eq!(materials[0].display_name, "Base Circuits");

    let mut buffer = Vec::new();
    write_csv(&stations, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.starts_with("station_id,station_name,occupancy_rate,downtime\n"));
    assert_eq!(text.lines().count(), 7);
}

#[test]
fn test_snapshot_json_shape() {
    let snapshot = run_replication(&FactoryParams::default(), 5, 300.0).unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();
    for key in ["production", "station_metrics", "time_metrics", "material_metrics"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert!(json["production"]["faulty_rate"].is_number());
    assert_eq!(json["station_metrics"]["downtimes"].as_array().unwrap().len(), 6);
    assert!(json["material_metrics"]["materials_used"]["case"].is_u64());
}
