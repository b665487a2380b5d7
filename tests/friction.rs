//! 관마찰계수 회귀 테스트. 층류식과 Colebrook 해의 잔차, 무디 선도 데이터 형태를 확인한다.
use hydraulics_toolbox::{
    app,
    friction::{
        auto_friction_factor, colebrook_friction_factor, colebrook_residual, compute_moody,
        laminar_friction_factor, FlowRegime, FrictionModel, MoodySettings,
    },
    numerics::RootOptions,
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
fn laminar_is_64_over_re() {
    assert_close("f(1000)", laminar_friction_factor(1000.0), 0.064, 1e-12);
    assert_close("f(2000)", laminar_friction_factor(2000.0), 0.032, 1e-12);
}

#[test]
fn colebrook_solutions_satisfy_equation() {
    for (re, rr) in [(4000.0, 0.0), (1.0e5, 1.0e-4), (1.0e6, 1.0e-3), (1.0e8, 0.05)] {
        let f = colebrook_friction_factor(re, rr).expect("colebrook");
        assert!(f > 0.005 && f < 0.1, "Re={re} rr={rr} f={f}");
        let r = colebrook_residual(f, re, rr);
        assert!(r.abs() < 1e-5, "Re={re} rr={rr} residual={r}");
    }
}

#[test]
fn smooth_pipe_reference_value() {
    // 매끈한 관, Re = 1e5: f ≈ 0.01799
    let f = colebrook_friction_factor(1.0e5, 0.0).expect("colebrook");
    assert_close("f", f, 0.01799, 1e-4);
}

#[test]
fn fully_rough_limit_matches_von_karman() {
    let rr = 0.05;
    let f = colebrook_friction_factor(1.0e8, rr).expect("colebrook");
    let rough = (-2.0 * (rr / 3.7_f64).log10()).powi(-2);
    assert_close("f", f, rough, 1e-3);
}

#[test]
fn auto_selection_follows_regime() {
    let (f, model) = auto_friction_factor(1500.0, 1e-3).expect("laminar");
    assert_eq!(model, FrictionModel::Laminar);
    assert_close("f", f, 64.0 / 1500.0, 1e-12);
    let (_, model) = auto_friction_factor(5.0e4, 1e-3).expect("turbulent");
    assert_eq!(model, FrictionModel::Colebrook);
    assert_eq!(FlowRegime::classify(3000.0), FlowRegime::Transitional);
}

#[test]
fn friction_report_carries_residual_only_for_colebrook() {
    let lam = app::friction_report(1000.0, 0.0, None).expect("report");
    assert!(lam.residual.is_none());
    let turb = app::friction_report(1.0e6, 1e-4, None).expect("report");
    assert!(turb.residual.expect("residual").abs() < 1e-5);
    let forced = app::friction_report(1000.0, 0.0, Some(FrictionModel::Colebrook)).expect("forced");
    assert_eq!(forced.model, FrictionModel::Colebrook);
    assert_eq!(forced.regime, FlowRegime::Laminar);
}

#[test]
fn moody_data_shapes_and_monotonic_curves() {
    let settings = MoodySettings::default();
    let data = compute_moody(&settings, RootOptions::default()).expect("moody");
    assert_eq!(data.re_laminar.len(), 20);
    assert_eq!(data.re_transition.len(), 20);
    assert_eq!(data.re_turbulent.len(), 100);
    assert_eq!(data.f_turbulent.len(), settings.roughness.len());
    assert_close("Re first", data.re_laminar[0], 600.0, 1e-12);
    assert_close("Re last", *data.re_turbulent.last().unwrap(), 1.0e8, 1e-9);
    for (rr, curve) in data.roughness.iter().zip(&data.f_turbulent) {
        assert_eq!(curve.len(), data.re_turbulent.len());
        assert!(
            curve.windows(2).all(|w| w[1] <= w[0] + 1e-7),
            "curve for rr={rr} is not non-increasing"
        );
    }
    // 거친 관일수록 마찰계수가 크다
    let smooth = data.f_turbulent[0].last().copied().unwrap();
    let rough = data.f_turbulent.last().and_then(|c| c.last()).copied().unwrap();
    assert!(rough > smooth);
}
