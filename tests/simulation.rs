use conferre::engine::Simulation;
use conferre::model::{Agent, AgentType, Distribution, GROUP_SIZE, MAX_CONTRIBUTION, SimError};
use conferre::sweep::{SweepPoint, free_rider_share, sweep, uc_grid};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

fn rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

#[test]
fn distribution_derives_conditional_share() {
    let dist = Distribution::new(0.56, 0.035).expect("valid distribution");
    assert!((dist.cc() - (1.0 - 0.56 - 0.035)).abs() < 1e-12);
    assert!((dist.uc() + dist.fr() + dist.cc() - 1.0).abs() < 1e-12);
}

#[test]
fn distribution_rejects_invalid_proportions() {
    assert_eq!(
        Distribution::new(1.1, 0.0).unwrap_err(),
        SimError::InvalidDistribution { uc: 1.1, fr: 0.0 }
    );
    assert_eq!(
        Distribution::new(0.7, 0.5).unwrap_err(),
        SimError::InvalidDistribution { uc: 0.7, fr: 0.5 }
    );
    assert!(Distribution::new(-0.1, 0.2).is_err());
    assert!(Distribution::new(0.2, -0.1).is_err());
    assert!(Distribution::new(1.0, 0.0).is_ok());
    assert!(Distribution::new(0.0, 0.0).is_ok());
}

#[test]
fn degenerate_distributions_sample_a_single_type() {
    let mut rng = rng(9);
    let cases = [
        (1.0, 0.0, AgentType::UnconditionalCooperator),
        (0.0, 1.0, AgentType::FreeRider),
        (0.0, 0.0, AgentType::ConditionalCooperator),
    ];
    for (uc, fr, expected) in cases {
        let dist = Distribution::new(uc, fr).expect("valid distribution");
        let group = dist.sample_group(&mut rng);
        for agent in group.agents() {
            assert_eq!(agent.kind(), expected);
        }
    }
}

#[test]
fn population_size_must_be_a_positive_multiple_of_group_size() {
    let dist = Distribution::new(0.5, 0.1).expect("valid distribution");

    let sim = Simulation::new(4000, &dist, &mut rng(1)).expect("valid population size");
    assert_eq!(sim.population().n_groups(), 1000);

    let err = Simulation::new(4001, &dist, &mut rng(1)).unwrap_err();
    assert_eq!(err, SimError::InvalidPopulationSize(4001));

    assert!(Simulation::new(0, &dist, &mut rng(1)).is_err());
}

#[test]
fn results_require_a_run() {
    let dist = Distribution::new(0.5, 0.1).expect("valid distribution");
    let sim = Simulation::new(8, &dist, &mut rng(2)).expect("valid population size");
    assert!(matches!(
        sim.proportion_successful_groups(60.0),
        Err(SimError::Precondition(_))
    ));
}

#[test]
fn response_contribution_is_capped_but_stored_raw() {
    // Conditional cooperators respond with slope ~0.87, so a large
    // others-average pushes the raw response above the cap.
    let mut agent = Agent::new(AgentType::ConditionalCooperator);
    let par = AgentType::ConditionalCooperator.parameters();
    let high = 25.0;
    let raw = par.intercept + par.slope * high;
    assert!(raw > MAX_CONTRIBUTION);
    assert_eq!(agent.contribute(high), MAX_CONTRIBUTION);
    assert_eq!(agent.last_contribution(), Some(raw));

    // A negative others-average drives a free rider's raw response below
    // zero; the returned contribution is floored at zero.
    let mut agent = Agent::new(AgentType::FreeRider);
    let par = AgentType::FreeRider.parameters();
    let low = -40.0;
    let raw = par.intercept + par.slope * low;
    assert!(raw < 0.0);
    assert_eq!(agent.contribute(low), 0.0);
    assert_eq!(agent.last_contribution(), Some(raw));
}

#[test]
fn first_round_contribution_is_never_capped() {
    let kinds = [
        AgentType::UnconditionalCooperator,
        AgentType::ConditionalCooperator,
        AgentType::FreeRider,
    ];
    for kind in kinds {
        let mut agent = Agent::new(kind);
        let contribution = agent.contribute_first();
        assert_eq!(contribution, kind.parameters().first_round);
        assert_eq!(agent.last_contribution(), Some(contribution));
    }
}

#[test]
fn all_unconditional_groups_converge_to_the_linear_fixed_point() {
    let dist = Distribution::new(1.0, 0.0).expect("valid distribution");
    let mut sim = Simulation::new(4, &dist, &mut rng(7)).expect("valid population size");
    for agent in sim.population().groups()[0].agents() {
        assert_eq!(agent.kind(), AgentType::UnconditionalCooperator);
    }

    sim.run(200).expect("simulation runs");

    // 1 baseline round plus 198 response rounds.
    let trace = sim.trace();
    assert_eq!(trace.len(), 199);

    let at_150 = trace[149].average;
    let last = trace.last().expect("trace is not empty").average;
    assert!((at_150 - last).abs() < 1e-3);

    let par = AgentType::UnconditionalCooperator.parameters();
    let fixed_point = par.intercept / (1.0 - par.slope);
    assert!((last - fixed_point).abs() < 1e-3);

    let final_contribution = sim.population().groups()[0]
        .final_contribution()
        .expect("final contribution is set");
    assert!((final_contribution - GROUP_SIZE as f64 * fixed_point).abs() < 1e-2);
}

#[test]
fn seeded_runs_are_reproducible() {
    let dist = Distribution::new(0.0, 1.0).expect("valid distribution");

    let run = |seed: u64| {
        let mut rng = rng(seed);
        let mut sim = Simulation::new(40, &dist, &mut rng).expect("valid population size");
        sim.run(200).expect("simulation runs");
        sim.proportion_successful_groups(60.0)
            .expect("results are ready")
    };

    let first = run(11);
    let second = run(11);
    assert_eq!(first, second);
    // Free riders alone stay far below the threshold.
    assert_eq!(first, 0.0);
}

#[test]
fn sweeps_are_deterministic_given_a_seed() {
    let values = uc_grid(4);

    let run = |seed: u64| -> Vec<SweepPoint> {
        let mut rng = rng(seed);
        sweep(&values, free_rider_share, 40, 50, 60.0, &mut rng).expect("sweep runs")
    };

    assert_eq!(run(3), run(3));
}

#[test]
fn uc_grid_covers_the_unit_interval() {
    let values = uc_grid(20);
    assert_eq!(values.len(), 21);
    for (idx, &val) in values.iter().enumerate() {
        assert_eq!(val, idx as f64 / 20.0);
    }
    assert_eq!(values[0], 0.0);
    assert_eq!(*values.last().expect("grid is not empty"), 1.0);
}

#[test]
fn sweep_produces_one_point_per_setting() {
    let values = uc_grid(20);
    let mut rng = rng(5);
    let points = sweep(&values, free_rider_share, 8, 10, 60.0, &mut rng).expect("sweep runs");

    assert_eq!(points.len(), 21);
    for (point, &val) in points.iter().zip(values.iter()) {
        assert_eq!(point.param, val);
        assert!((0.0..=1.0).contains(&point.proportion));
    }
}
