//! Snapshot Tests - read surface for the presentation layer
//!
//! Critical invariants tested:
//! - Snapshot reflects state after commands and ticks
//! - JSON output uses the display formats the dashboard expects
//! - Config fingerprint is stable per scenario and differs across scenarios

use railops_sim_core::orchestrator::{compute_config_hash, KpiSeed, TrainSeed};
use railops_sim_core::{
    Command, DashboardSnapshot, KpiKind, Orchestrator, SimTime, SimulationConfig, TrainStatus,
    Trend,
};

fn create_test_config(seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig::new(seed, SimTime::from_hms(14, 32, 15));
    config.trains.push(TrainSeed {
        id: "T004".to_string(),
        label: "Local 004".to_string(),
        position: 0.68,
        status: TrainStatus::Delayed,
        delay_minutes: 7,
        next_waypoint: Some("ULH".to_string()),
        eta: Some(SimTime::from_hms(14, 35, 0)),
    });
    config.kpis.push(KpiSeed {
        id: "conflicts".to_string(),
        label: "Conflict Resolutions".to_string(),
        kind: KpiKind::Count,
        value: 12.0,
        unit: String::new(),
        bound: None,
        variance: 2.0,
    });
    config
}

#[test]
fn test_snapshot_reflects_clock() {
    let mut orch = Orchestrator::new(create_test_config(1)).unwrap();
    orch.execute(Command::Play).unwrap();
    orch.execute(Command::SetRate { multiplier: 4.0 }).unwrap();
    orch.tick();

    let snapshot = orch.snapshot();
    assert_eq!(snapshot.tick, 1);
    assert!(snapshot.clock.running);
    assert_eq!(snapshot.clock.sim_time, SimTime::from_hms(14, 32, 19));
    assert_eq!(snapshot.clock.real_elapsed_ms, 1_000);
}

#[test]
fn test_snapshot_json_formats() {
    let orch = Orchestrator::new(create_test_config(1)).unwrap();
    let json = orch.snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["clock"]["sim_time"], "14:32:15");
    assert_eq!(value["clock"]["rate"], 1.0);
    assert_eq!(value["trains"][0]["status"], "delayed");
    assert_eq!(value["trains"][0]["eta"], "14:35:00");
    assert_eq!(value["kpis"][0]["trend"], "neutral");
}

#[test]
fn test_snapshot_parses_back() {
    let mut orch = Orchestrator::new(create_test_config(1)).unwrap();
    orch.execute(Command::Play).unwrap();
    orch.step(2_500);

    let snapshot = orch.snapshot();
    let parsed: DashboardSnapshot = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(parsed.clock, snapshot.clock);
    assert_eq!(parsed.config_hash, snapshot.config_hash);
}

#[test]
fn test_kpi_trend_after_resolution() {
    let mut config = create_test_config(1);
    config.advisories.push(railops_sim_core::orchestrator::AdvisorySeed {
        id: "A001".to_string(),
        category: railops_sim_core::AdvisoryCategory::Conflict,
        priority: railops_sim_core::AdvisoryPriority::High,
        title: String::new(),
        description: String::new(),
        rationale: String::new(),
        created_at: SimTime::from_hms(14, 23, 12),
        applied: false,
    });
    let mut orch = Orchestrator::new(config).unwrap();
    orch.execute(Command::ApplyAdvisory {
        id: "A001".to_string(),
    })
    .unwrap();

    let kpi = &orch.snapshot().kpis[0];
    assert_eq!(kpi.value, 11.0);
    assert_eq!(kpi.baseline, 12.0);
    assert_eq!(kpi.change, -1.0);
    assert_eq!(kpi.trend, Trend::Down);
}

#[test]
fn test_config_hash_stable_per_scenario() {
    let a = Orchestrator::new(create_test_config(7)).unwrap().snapshot();
    let b = Orchestrator::new(create_test_config(7)).unwrap().snapshot();
    let c = Orchestrator::new(create_test_config(8)).unwrap().snapshot();

    assert_eq!(a.config_hash, b.config_hash);
    assert_ne!(a.config_hash, c.config_hash);
    assert_eq!(a.config_hash, compute_config_hash(&create_test_config(7)).unwrap());
    assert_eq!(a.config_hash.len(), 64);
}
