use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

use crate::numerics::{integrate, linspace, OdeError, OdeOptions, OdeStats};

/// 피스톤 상태 벡터 `[x, ẋ, P1, P2]`.
pub type PistonState = Vector4<f64>;

/// 유압 피스톤 물리 상수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PistonParams {
    /// 피스톤 단면적 A [m²]
    pub area: f64,
    /// 실린더 한쪽 체적 V [m³]
    pub volume: f64,
    /// 이동부 질량 m [kg]
    pub mass: f64,
    /// 유량계수 Cd. 현재 식에서는 쓰지 않는다.
    pub discharge_coefficient: f64,
    /// 작동유 체적탄성계수 β [Pa]
    pub bulk_modulus: f64,
    /// 공급 압력 Ps [Pa]
    pub supply_pressure: f64,
    /// 작동유 밀도 ρ [kg/m³]
    pub density: f64,
    /// 대기(배유) 압력 Pa [Pa]
    pub ambient_pressure: f64,
    /// 밸브 유량 이득 K
    pub valve_gain: f64,
    /// 스풀 개도 y [m]
    pub spool_opening: f64,
}

impl Default for PistonParams {
    fn default() -> Self {
        Self {
            area: 4.909e-4,
            volume: 1.473e-4,
            mass: 30.0,
            discharge_coefficient: 0.6,
            bulk_modulus: 2.0e9,
            supply_pressure: 1.4e7,
            density: 850.0,
            ambient_pressure: 1.0e5,
            valve_gain: 2.0e-5,
            spool_opening: 0.002,
        }
    }
}

impl PistonParams {
    /// 평형 상태의 챔버 압력과 피스톤 속도. (P1 = P2, 모든 미분 0)
    pub fn equilibrium(&self) -> (f64, f64) {
        let pressure = 0.5 * (self.supply_pressure + self.ambient_pressure);
        let velocity = self.spool_opening * self.valve_gain
            * (self.supply_pressure - self.ambient_pressure)
            / (2.0 * self.density * self.area);
        (pressure, velocity)
    }
}

/// 피스톤 운동방정식의 우변.
///
/// ẍ = (A/m)(P1 − P2)
/// Ṗ1 = β/(Vρ) · (yK(Ps − P1) − ρAẋ)
/// Ṗ2 = β/(Vρ) · (ρAẋ − yK(P2 − Pa))
pub fn derivatives(_t: f64, state: &PistonState, p: &PistonParams) -> PistonState {
    let xdot = state[1];
    let p1 = state[2];
    let p2 = state[3];

    let stiffness = p.bulk_modulus / (p.volume * p.density);
    let valve = p.spool_opening * p.valve_gain;
    let displaced = p.density * p.area * xdot;

    let xddot = (p.area / p.mass) * (p1 - p2);
    let p1dot = stiffness * (valve * (p.supply_pressure - p1) - displaced);
    let p2dot = stiffness * (displaced - valve * (p2 - p.ambient_pressure));

    Vector4::new(xdot, xddot, p1dot, p2dot)
}

/// 시뮬레이션 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PistonSettings {
    pub params: PistonParams,
    /// 초기 상태 `[x, ẋ, P1, P2]`
    pub initial_state: [f64; 4],
    /// 종료 시각 [s]
    pub end_time: f64,
    /// 출력 시점 개수 (0부터 `end_time`까지 균등)
    pub samples: usize,
}

impl Default for PistonSettings {
    fn default() -> Self {
        Self {
            params: PistonParams::default(),
            initial_state: [0.0, 0.0, 1.0e5, 1.0e5],
            end_time: 0.02,
            samples: 200,
        }
    }
}

/// 피스톤 계산 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum PistonError {
    /// 적분 실패
    Ode(OdeError),
}

impl std::fmt::Display for PistonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PistonError::Ode(e) => write!(f, "피스톤 방정식 적분 실패: {e}"),
        }
    }
}

impl std::error::Error for PistonError {}

impl From<OdeError> for PistonError {
    fn from(value: OdeError) -> Self {
        PistonError::Ode(value)
    }
}

/// 시간 격자 위의 피스톤 상태 이력.
#[derive(Debug, Clone)]
pub struct PistonTrajectory {
    pub times: Vec<f64>,
    pub states: Vec<PistonState>,
    pub stats: OdeStats,
}

impl PistonTrajectory {
    fn column(&self, i: usize) -> Vec<f64> {
        self.states.iter().map(|s| s[i]).collect()
    }

    pub fn position(&self) -> Vec<f64> {
        self.column(0)
    }

    pub fn velocity(&self) -> Vec<f64> {
        self.column(1)
    }

    pub fn p1(&self) -> Vec<f64> {
        self.column(2)
    }

    pub fn p2(&self) -> Vec<f64> {
        self.column(3)
    }

    pub fn final_state(&self) -> Option<&PistonState> {
        self.states.last()
    }
}

/// 설정된 초기 상태에서 `end_time`까지 적분한다.
pub fn simulate(settings: &PistonSettings, opts: OdeOptions) -> Result<PistonTrajectory, PistonError> {
    let grid = linspace(0.0, settings.end_time, settings.samples);
    let params = settings.params;
    let y0 = PistonState::from(settings.initial_state);
    let sol = integrate(|t, y| derivatives(t, y, &params), y0, &grid, opts)?;
    log::info!(
        "piston simulated to t={:.4} s with {} accepted steps",
        settings.end_time,
        sol.stats.accepted
    );
    Ok(PistonTrajectory {
        times: sol.times,
        states: sol.states,
        stats: sol.stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_state_only_drives_p1() {
        let d = derivatives(0.0, &Vector4::new(0.0, 0.0, 1e5, 1e5), &PistonParams::default());
        assert_eq!(d[0], 0.0);
        assert_eq!(d[1], 0.0);
        assert!(d[2] > 0.0);
        assert_eq!(d[3], 0.0);
    }

    #[test]
    fn equilibrium_is_a_fixed_point() {
        let p = PistonParams::default();
        let (pressure, velocity) = p.equilibrium();
        let d = derivatives(0.0, &Vector4::new(0.0, velocity, pressure, pressure), &p);
        assert_eq!(d[1], 0.0);
        assert!(d[2].abs() < 1e-3 * p.supply_pressure);
        assert!(d[3].abs() < 1e-3 * p.supply_pressure);
    }
}
