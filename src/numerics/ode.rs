//! 적응 스텝 상미분방정식 적분기.
//!
//! Dormand-Prince 5(4) 임베디드 룽게-쿠타 쌍을 사용한다. 호출자가 준 시간 격자의
//! 각 점에 정확히 도달하도록 스텝을 잘라 그 시점의 해를 기록한다.

use nalgebra::SVector;

/// 적분 옵션. 기본값은 odeint 기본값과 같다.
#[derive(Debug, Clone, Copy)]
pub struct OdeOptions {
    /// 상대 허용오차
    pub rtol: f64,
    /// 절대 허용오차
    pub atol: f64,
    /// 이보다 작은 스텝이 필요하면 실패로 본다
    pub min_step: f64,
    /// 출력 구간 하나당 허용되는 최대 스텝 수
    pub max_steps: usize,
    /// 첫 스텝 크기. `None`이면 자동 추정한다.
    pub first_step: Option<f64>,
}

impl Default for OdeOptions {
    fn default() -> Self {
        Self {
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            min_step: 1.0e-14,
            max_steps: 500,
            first_step: None,
        }
    }
}

/// 적분 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OdeStats {
    pub accepted: usize,
    pub rejected: usize,
    pub evaluations: usize,
}

/// 시간 격자 위에서 샘플링된 해.
#[derive(Debug, Clone)]
pub struct OdeSolution<const D: usize> {
    pub times: Vec<f64>,
    pub states: Vec<SVector<f64, D>>,
    pub stats: OdeStats,
}

impl<const D: usize> OdeSolution<D> {
    /// `index`번째 상태 성분의 시계열을 꺼낸다.
    pub fn component(&self, index: usize) -> Vec<f64> {
        self.states.iter().map(|s| s[index]).collect()
    }

    pub fn last_y(&self) -> &SVector<f64, D> {
        &self.states[self.states.len() - 1]
    }
}

/// 적분 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum OdeError {
    /// 시간 격자가 비었거나 증가하지 않음
    InvalidGrid,
    /// 허용오차를 만족하려면 최소 스텝보다 작은 스텝이 필요함
    StepTooSmall { t: f64, step: f64 },
    /// 한 출력 구간에서 최대 스텝 수를 넘김
    TooManySteps { t: f64 },
    /// 우변이 NaN/무한대를 반환함
    NonFinite { t: f64 },
}

impl std::fmt::Display for OdeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OdeError::InvalidGrid => write!(f, "시간 격자는 비어 있지 않고 단조 증가해야 합니다."),
            OdeError::StepTooSmall { t, step } => {
                write!(f, "t={t:.6e}에서 스텝 크기({step:.3e})가 최소값보다 작습니다.")
            }
            OdeError::TooManySteps { t } => {
                write!(f, "t={t:.6e}에서 출력 구간당 최대 스텝 수를 초과했습니다.")
            }
            OdeError::NonFinite { t } => write!(f, "t={t:.6e}에서 미분값이 유한하지 않습니다."),
        }
    }
}

impl std::error::Error for OdeError {}

// Dormand-Prince 5(4) 계수
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const A71: f64 = 35.0 / 384.0;
const A73: f64 = 500.0 / 1113.0;
const A74: f64 = 125.0 / 192.0;
const A75: f64 = -2187.0 / 6784.0;
const A76: f64 = 11.0 / 84.0;

// 5차 해와 4차 해의 차이
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

struct Step<const D: usize> {
    y_new: SVector<f64, D>,
    k_last: SVector<f64, D>,
    error: f64,
}

/// `y' = rhs(t, y)`를 `t_grid[0]`의 `y0`에서 출발해 적분하고 각 격자점의 해를 돌려준다.
pub fn integrate<F, const D: usize>(
    mut rhs: F,
    y0: SVector<f64, D>,
    t_grid: &[f64],
    opts: OdeOptions,
) -> Result<OdeSolution<D>, OdeError>
where
    F: FnMut(f64, &SVector<f64, D>) -> SVector<f64, D>,
{
    if t_grid.is_empty() || t_grid.windows(2).any(|w| w[1] <= w[0]) {
        return Err(OdeError::InvalidGrid);
    }

    let mut stats = OdeStats::default();
    let mut t = t_grid[0];
    let mut y = y0;
    let mut k1 = rhs(t, &y);
    stats.evaluations += 1;
    if !is_finite(&k1) {
        return Err(OdeError::NonFinite { t });
    }

    let mut times = Vec::with_capacity(t_grid.len());
    let mut states = Vec::with_capacity(t_grid.len());
    times.push(t);
    states.push(y);

    let span = t_grid[t_grid.len() - 1] - t;
    let mut h = match opts.first_step {
        Some(h0) => h0,
        None if span > 0.0 => initial_step(&mut rhs, t, &y, &k1, span, &opts, &mut stats),
        None => 0.0,
    };

    for &t_out in &t_grid[1..] {
        let mut steps = 0;
        while t < t_out {
            if steps >= opts.max_steps {
                return Err(OdeError::TooManySteps { t });
            }
            steps += 1;

            let remaining = t_out - t;
            let hits_output = h >= remaining;
            let h_try = if hits_output { remaining } else { h };
            if h_try < opts.min_step && !hits_output {
                return Err(OdeError::StepTooSmall { t, step: h_try });
            }

            let step = dopri_step(&mut rhs, t, &y, &k1, h_try, &opts);
            stats.evaluations += 6;

            if !step.error.is_finite() {
                stats.rejected += 1;
                h = h_try * MIN_FACTOR;
                if h < opts.min_step {
                    return Err(OdeError::NonFinite { t });
                }
                continue;
            }

            let factor = if step.error == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * step.error.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
            };

            if step.error <= 1.0 {
                t = if hits_output { t_out } else { t + h_try };
                y = step.y_new;
                k1 = step.k_last;
                stats.accepted += 1;
                // 출력점 때문에 잘린 스텝은 다음 스텝 크기를 줄이지 않는다
                h = if hits_output { h.max(h_try * factor) } else { h_try * factor };
            } else {
                stats.rejected += 1;
                h = h_try * factor.min(1.0);
            }
        }
        times.push(t_out);
        states.push(y);
    }

    log::debug!(
        "ode integration done: {} accepted, {} rejected, {} evaluations",
        stats.accepted,
        stats.rejected,
        stats.evaluations
    );
    Ok(OdeSolution {
        times,
        states,
        stats,
    })
}

fn dopri_step<F, const D: usize>(
    rhs: &mut F,
    t: f64,
    y: &SVector<f64, D>,
    k1: &SVector<f64, D>,
    h: f64,
    opts: &OdeOptions,
) -> Step<D>
where
    F: FnMut(f64, &SVector<f64, D>) -> SVector<f64, D>,
{
    let k2 = rhs(t + C2 * h, &(y + k1 * (h * A21)));
    let k3 = rhs(t + C3 * h, &(y + (k1 * A31 + k2 * A32) * h));
    let k4 = rhs(t + C4 * h, &(y + (k1 * A41 + k2 * A42 + k3 * A43) * h));
    let k5 = rhs(
        t + C5 * h,
        &(y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h),
    );
    let k6 = rhs(
        t + h,
        &(y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h),
    );
    let y_new = y + (k1 * A71 + k3 * A73 + k4 * A74 + k5 * A75 + k6 * A76) * h;
    let k7 = rhs(t + h, &y_new);

    let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;
    let error = scaled_rms(&err, y, &y_new, opts);

    Step {
        y_new,
        k_last: k7,
        error,
    }
}

fn scaled_rms<const D: usize>(
    v: &SVector<f64, D>,
    y_old: &SVector<f64, D>,
    y_new: &SVector<f64, D>,
    opts: &OdeOptions,
) -> f64 {
    if D == 0 {
        return 0.0;
    }
    let sum: f64 = (0..D)
        .map(|i| {
            let sc = opts.atol + opts.rtol * y_old[i].abs().max(y_new[i].abs());
            (v[i] / sc).powi(2)
        })
        .sum();
    (sum / D as f64).sqrt()
}

// Hairer, Nørsett & Wanner의 초기 스텝 추정
fn initial_step<F, const D: usize>(
    rhs: &mut F,
    t0: f64,
    y0: &SVector<f64, D>,
    f0: &SVector<f64, D>,
    span: f64,
    opts: &OdeOptions,
    stats: &mut OdeStats,
) -> f64
where
    F: FnMut(f64, &SVector<f64, D>) -> SVector<f64, D>,
{
    let d0 = scaled_rms(y0, y0, y0, opts);
    let d1 = scaled_rms(f0, y0, y0, opts);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
    .min(span);

    let y1 = y0 + f0 * h0;
    let f1 = rhs(t0 + h0, &y1);
    stats.evaluations += 1;
    let d2 = scaled_rms(&(f1 - f0), y0, y0, opts) / h0;

    let h1 = if d1.max(d2) <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(0.2)
    };
    (100.0 * h0).min(h1).min(span)
}

fn is_finite<const D: usize>(v: &SVector<f64, D>) -> bool {
    v.iter().all(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::grid::linspace;
    use nalgebra::{Vector1, Vector2};

    #[test]
    fn exponential_decay() {
        let grid = linspace(0.0, 1.0, 11);
        let sol = integrate(|_t, y: &Vector1<f64>| -y, Vector1::new(1.0), &grid, OdeOptions::default())
            .unwrap();
        assert_eq!(sol.times.len(), 11);
        for (t, y) in sol.times.iter().zip(&sol.states) {
            assert!((y[0] - (-t).exp()).abs() < 1e-7, "t={t} y={}", y[0]);
        }
    }

    #[test]
    fn harmonic_oscillator_returns_after_one_period() {
        let period = 2.0 * std::f64::consts::PI;
        let grid = linspace(0.0, period, 50);
        let sol = integrate(
            |_t, y: &Vector2<f64>| Vector2::new(y[1], -y[0]),
            Vector2::new(1.0, 0.0),
            &grid,
            OdeOptions::default(),
        )
        .unwrap();
        let end = sol.last_y();
        assert!((end[0] - 1.0).abs() < 1e-6);
        assert!(end[1].abs() < 1e-6);
        assert!(sol.stats.rejected <= sol.stats.accepted);
    }

    #[test]
    fn rejects_non_increasing_grid() {
        let err = integrate(
            |_t, y: &Vector1<f64>| *y,
            Vector1::new(1.0),
            &[0.0, 1.0, 1.0],
            OdeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, OdeError::InvalidGrid);
    }

    #[test]
    fn step_budget_is_enforced() {
        let opts = OdeOptions {
            max_steps: 2,
            first_step: Some(1e-6),
            ..OdeOptions::default()
        };
        let err = integrate(|_t, y: &Vector1<f64>| -y, Vector1::new(1.0), &[0.0, 10.0], opts)
            .unwrap_err();
        assert!(matches!(err, OdeError::TooManySteps { .. }));
    }
}
