//! 유압 피스톤 응답 회귀 테스트. 초기 미분값은 손계산, 평형 속도는 닫힌 식과 비교한다.
use hydraulics_toolbox::{
    numerics::OdeOptions,
    piston::{derivatives, simulate, PistonParams, PistonSettings, PistonState},
};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1.0);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.6}, tol {rel_tol})"
    );
}

#[test]
fn derivative_at_rest_matches_hand_calculation() {
    let p = PistonParams::default();
    let d = derivatives(0.0, &PistonState::new(0.0, 0.0, 1.0e5, 1.0e5), &p);
    assert_eq!(d[0], 0.0);
    assert_eq!(d[1], 0.0);
    // β/(Vρ) · yK · (Ps − P1) = 1.59738e10 · 4e-8 · 1.39e7
    assert_close("P1'", d[2], 8.8814e9, 1e-4);
    assert_close("P2'", d[3], 0.0, 1e-12);
}

#[test]
fn derivative_at_moving_state() {
    let p = PistonParams::default();
    let (x, v, p1, p2) = (0.001, 0.5, 5.0e6, 3.0e6);
    let d = derivatives(0.0, &PistonState::new(x, v, p1, p2), &p);
    let c = p.bulk_modulus / (p.volume * p.density);
    let yk = p.spool_opening * p.valve_gain;
    assert_close("x'", d[0], v, 1e-12);
    assert_close("x''", d[1], p.area / p.mass * (p1 - p2), 1e-9);
    assert_close(
        "P1'",
        d[2],
        c * (yk * (p.supply_pressure - p1) - p.density * p.area * v),
        1e-9,
    );
    assert_close(
        "P2'",
        d[3],
        c * (p.density * p.area * v - yk * (p2 - p.ambient_pressure)),
        1e-9,
    );
}

#[test]
fn response_settles_near_equilibrium() {
    let settings = PistonSettings::default();
    let traj = simulate(&settings, OdeOptions::default()).expect("simulate");
    assert_eq!(traj.times.len(), 200);
    assert_eq!(traj.states.len(), 200);
    assert_eq!(traj.times[0], 0.0);
    assert_close("t_end", *traj.times.last().unwrap(), 0.02, 1e-12);

    let (pressure, velocity) = settings.params.equilibrium();
    assert_close("v_eq", velocity, 0.6660, 1e-3);
    let last = traj.final_state().expect("final state");
    assert_close("v(t_end)", last[1], velocity, 0.02);
    assert_close("P1(t_end) / P_eq", last[2] / pressure, 1.0, 0.05);
    assert_close("P2(t_end) / P_eq", last[3] / pressure, 1.0, 0.05);
    // 피스톤은 한 방향으로만 움직인다
    assert!(traj.position().windows(2).all(|w| w[1] >= w[0] - 1e-12));
}

#[test]
fn chamber_pressures_stay_between_ambient_and_supply() {
    let settings = PistonSettings::default();
    let traj = simulate(&settings, OdeOptions::default()).expect("simulate");
    let p = settings.params;
    for (t, (p1, p2)) in traj.times.iter().zip(traj.p1().into_iter().zip(traj.p2())) {
        assert!(p1 <= p.supply_pressure + 1.0, "t={t} P1={p1}");
        assert!(p2 >= p.ambient_pressure - 1.0, "t={t} P2={p2}");
    }
}

#[test]
fn starting_at_equilibrium_stays_there() {
    let mut settings = PistonSettings::default();
    let (pressure, velocity) = settings.params.equilibrium();
    settings.initial_state = [0.0, velocity, pressure, pressure];
    let traj = simulate(&settings, OdeOptions::default()).expect("simulate");
    let last = traj.final_state().expect("final state");
    assert_close("v", last[1], velocity, 1e-9);
    assert_close("x", last[0], velocity * settings.end_time, 1e-9);
}
