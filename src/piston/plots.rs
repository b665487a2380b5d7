use super::hydraulic_piston::PistonTrajectory;
use crate::chart::{Axis, Chart, Rgb, Series};
use crate::i18n::{keys, Translator};

/// 피스톤 속도 ẋ의 시간 이력 그래프.
pub fn velocity_chart(traj: &PistonTrajectory, tr: &Translator) -> Chart {
    let velocity = traj.velocity();
    let mut chart = Chart::new(
        tr.t(keys::PISTON_VELOCITY_TITLE),
        Axis::fit_linear(tr.t(keys::TIME_LABEL), &traj.times),
        Axis::fit_linear(tr.t(keys::PISTON_VELOCITY_Y_LABEL), &velocity),
    );
    chart
        .series
        .push(Series::line(traj.times.clone(), velocity, Rgb::HOT_PINK));
    chart
}

/// 두 챔버 압력 P1(실선), P2(점선)의 시간 이력 그래프.
pub fn pressure_chart(traj: &PistonTrajectory, tr: &Translator) -> Chart {
    let p1 = traj.p1();
    let p2 = traj.p2();
    let mut chart = Chart::new(
        tr.t(keys::PISTON_PRESSURE_TITLE),
        Axis::fit_linear(tr.t(keys::TIME_LABEL), &traj.times),
        Axis::fit_linear(tr.t(keys::PISTON_PRESSURE_Y_LABEL), p1.iter().chain(&p2)),
    );
    chart.legend = true;
    chart
        .series
        .push(Series::line(traj.times.clone(), p1, Rgb::TURQUOISE).labeled("P1"));
    chart
        .series
        .push(Series::line(traj.times.clone(), p2, Rgb::PURPLE).dashed().labeled("P2"));
    chart
}
