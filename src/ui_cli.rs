use std::path::PathBuf;

use crate::app::FrictionReport;
use crate::friction::{FlowRegime, FrictionModel};
use crate::i18n::{keys, Translator};
use crate::piston::{PistonParams, PistonTrajectory};

fn regime_label(tr: &Translator, regime: FlowRegime) -> String {
    match regime {
        FlowRegime::Laminar => tr.t(keys::REGIME_LAMINAR),
        FlowRegime::Transitional => tr.t(keys::REGIME_TRANSITIONAL),
        FlowRegime::Turbulent => tr.t(keys::REGIME_TURBULENT),
    }
}

/// 마찰계수 계산 결과를 출력한다.
pub fn print_friction_report(tr: &Translator, report: &FrictionReport) {
    println!("Re = {:.4e}, ε/d = {}", report.re, report.rr);
    println!("{} {:.6}", tr.t(keys::RESULT_FRICTION), report.friction_factor);
    println!(
        "{} {}",
        tr.t(keys::RESULT_REGIME),
        regime_label(tr, report.regime)
    );
    let model = match report.model {
        FrictionModel::Laminar => "64/Re",
        FrictionModel::Colebrook => "Colebrook",
    };
    println!("{} {model}", tr.t(keys::RESULT_MODEL));
    if let Some(r) = report.residual {
        println!("{} {r:.3e}", tr.t(keys::RESULT_RESIDUAL));
    }
}

/// 샘플링된 피스톤 상태를 탭 구분 표로 출력한다.
pub fn print_trajectory_table(tr: &Translator, traj: &PistonTrajectory) {
    println!("{}", tr.t(keys::TABLE_HEADER));
    for (t, s) in traj.times.iter().zip(&traj.states) {
        println!(
            "{t:.6}\t{:.6e}\t{:.6}\t{:.1}\t{:.1}",
            s[0], s[1], s[2], s[3]
        );
    }
}

/// 최종 상태와 평형값을 비교해 출력한다.
pub fn print_piston_summary(tr: &Translator, params: &PistonParams, traj: &PistonTrajectory) {
    if let Some(s) = traj.final_state() {
        println!(
            "{} x={:.5} m, ẋ={:.4} m/s, P1={:.4e} Pa, P2={:.4e} Pa",
            tr.t(keys::RESULT_FINAL_STATE),
            s[0],
            s[1],
            s[2],
            s[3]
        );
    }
    let (pressure, velocity) = params.equilibrium();
    println!(
        "{} {pressure:.4e} Pa, {velocity:.4} m/s",
        tr.t(keys::RESULT_EQUILIBRIUM)
    );
}

/// 저장한 파일 경로를 출력한다.
pub fn print_written(tr: &Translator, paths: &[PathBuf]) {
    for p in paths {
        println!("{} {}", tr.t(keys::RESULT_WRITTEN), p.display());
    }
}
