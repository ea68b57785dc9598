//! Tests for the train motion model

use proptest::prelude::*;
use railops_sim_core::motion::{advance, ticks_until_wrap, MotionConfig, DEFAULT_WRAP_OFFSET};
use railops_sim_core::orchestrator::TrainSeed;
use railops_sim_core::{Command, Orchestrator, SimTime, SimulationConfig, Train, TrainStatus};

fn train_seed(id: &str, position: f64) -> TrainSeed {
    TrainSeed {
        id: id.to_string(),
        label: format!("Local {}", id),
        position,
        status: TrainStatus::OnTime,
        delay_minutes: 0,
        next_waypoint: None,
        eta: None,
    }
}

#[test]
fn test_train_wraps_to_offset_not_origin() {
    let config = MotionConfig::default();
    let mut trains = vec![Train::new("T005", "Express 005", 0.82)];

    let ticks = ticks_until_wrap(0.82, &config);
    let mut wrapped_at = None;
    for i in 0..ticks + 1 {
        if !advance(&mut trains, &config).is_empty() {
            wrapped_at = Some(i);
            break;
        }
    }

    assert!(wrapped_at.is_some(), "train never wrapped");
    assert_eq!(trains[0].route_position(), DEFAULT_WRAP_OFFSET);
    assert_ne!(trains[0].route_position(), 0.0);
}

#[test]
fn test_custom_wrap_offset_zero() {
    let config = MotionConfig {
        step: 0.5,
        wrap_offset: 0.0,
    };
    let mut trains = vec![Train::new("T", "T", 0.5)];
    assert_eq!(advance(&mut trains, &config), vec!["T".to_string()]);
    assert_eq!(trains[0].route_position(), 0.0);
}

#[test]
fn test_display_fields_untouched() {
    let mut trains = vec![Train::new("T002", "Local 002", 0.28)
        .with_delay(TrainStatus::Delayed, 3)
        .with_next_stop("KRL", SimTime::from_hms(14, 31, 0))];
    advance(&mut trains, &MotionConfig::default());

    assert_eq!(trains[0].status(), TrainStatus::Delayed);
    assert_eq!(trains[0].delay_minutes(), 3);
    assert_eq!(trains[0].next_waypoint(), Some("KRL"));
    assert_eq!(trains[0].eta(), Some(SimTime::from_hms(14, 31, 0)));
}

#[test]
fn test_positions_frozen_while_paused() {
    let mut config = SimulationConfig::new(1, SimTime::from_hms(14, 0, 0));
    config.trains = vec![train_seed("T001", 0.12)];
    let mut orch = Orchestrator::new(config).unwrap();

    for _ in 0..10 {
        orch.tick();
    }
    assert_eq!(orch.state().get_train("T001").unwrap().route_position(), 0.12);

    orch.execute(Command::Play).unwrap();
    orch.tick();
    let pos = orch.state().get_train("T001").unwrap().route_position();
    assert!((pos - 0.121).abs() < 1e-12);
}

#[test]
fn test_wraps_are_logged_per_train() {
    let mut config = SimulationConfig::new(1, SimTime::from_hms(14, 0, 0));
    config.start_running = true;
    config.motion.step = 0.1;
    config.trains = vec![train_seed("A", 0.95), train_seed("B", 0.5)];
    let mut orch = Orchestrator::new(config).unwrap();

    let result = orch.tick();
    assert_eq!(result.wrapped, vec!["A".to_string()]);
    assert_eq!(orch.event_log().events_of_type("TrainWrapped").len(), 1);
}

proptest! {
    #[test]
    fn prop_positions_stay_in_unit_interval(
        starts in prop::collection::vec(0.0f64..1.0, 1..8),
        step in 0.0001f64..0.5,
        wrap_offset in 0.0f64..0.99,
        ticks in 1usize..2_000,
    ) {
        let config = MotionConfig { step, wrap_offset };
        let mut trains: Vec<Train> = starts
            .iter()
            .enumerate()
            .map(|(i, &p)| Train::new(format!("T{}", i), "T", p))
            .collect();

        for _ in 0..ticks {
            advance(&mut trains, &config);
            for train in &trains {
                let p = train.route_position();
                prop_assert!((0.0..1.0).contains(&p), "position {} escaped [0, 1)", p);
            }
        }
    }

    #[test]
    fn prop_every_train_eventually_wraps(start in 0.0f64..1.0, step in 0.001f64..0.5) {
        let config = MotionConfig { step, wrap_offset: DEFAULT_WRAP_OFFSET };
        let mut trains = vec![Train::new("T", "T", start)];
        let limit = ticks_until_wrap(start, &config) + 1;

        let wrapped = (0..limit).any(|_| !advance(&mut trains, &config).is_empty());
        prop_assert!(wrapped);
    }
}
