use crate::numerics::{newton_fdiff, RootError, RootOptions};

/// 층류 상한 레이놀즈수
pub const LAMINAR_RE_MAX: f64 = 2000.0;
/// 완전 난류 시작 레이놀즈수
pub const TURBULENT_RE_MIN: f64 = 4000.0;
/// Colebrook 반복의 고정 시작값
pub const COLEBROOK_INITIAL_GUESS: f64 = 0.001;

/// 마찰계수 계산 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum FrictionError {
    /// Colebrook 식의 근을 찾지 못함
    Root(RootError),
}

impl std::fmt::Display for FrictionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrictionError::Root(e) => write!(f, "Colebrook 식 풀이 실패: {e}"),
        }
    }
}

impl std::error::Error for FrictionError {}

impl From<RootError> for FrictionError {
    fn from(value: RootError) -> Self {
        FrictionError::Root(value)
    }
}

/// 마찰계수 계산식 선택.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrictionModel {
    /// f = 64/Re
    Laminar,
    /// Colebrook 음함수 식
    Colebrook,
}

/// 레이놀즈수로 구분한 유동 영역.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowRegime {
    Laminar,
    Transitional,
    Turbulent,
}

impl FlowRegime {
    pub fn classify(re: f64) -> Self {
        if re <= LAMINAR_RE_MAX {
            FlowRegime::Laminar
        } else if re < TURBULENT_RE_MIN {
            FlowRegime::Transitional
        } else {
            FlowRegime::Turbulent
        }
    }
}

/// 층류 Darcy 마찰계수.
pub fn laminar_friction_factor(re: f64) -> f64 {
    64.0 / re
}

/// Colebrook 식의 잔차. 근에서 0이 된다.
///
/// 1/√f + 2·log10(ε/d / 3.7 + 2.51 / (Re·√f))
pub fn colebrook_residual(f: f64, re: f64, rr: f64) -> f64 {
    let sqrt_f = f.sqrt();
    1.0 / sqrt_f + 2.0 * (rr / 3.7 + 2.51 / (re * sqrt_f)).log10()
}

/// Colebrook 식을 고정 시작값에서 풀어 Darcy 마찰계수를 구한다.
pub fn colebrook_friction_factor(re: f64, rr: f64) -> Result<f64, FrictionError> {
    colebrook_with(re, rr, COLEBROOK_INITIAL_GUESS, RootOptions::default())
}

/// 시작값과 근 찾기 옵션을 지정해 Colebrook 식을 푼다.
pub fn colebrook_with(
    re: f64,
    rr: f64,
    initial_guess: f64,
    opts: RootOptions,
) -> Result<f64, FrictionError> {
    let res = newton_fdiff(|f| colebrook_residual(f, re, rr), initial_guess, opts)?;
    log::trace!(
        "colebrook Re={re:e} rr={rr:e}: f={:.6} after {} iterations",
        res.root,
        res.iterations
    );
    Ok(res.root)
}

/// 선택한 계산식으로 Darcy 마찰계수를 계산한다. 층류식은 `rr`를 무시한다.
pub fn friction_factor(re: f64, rr: f64, model: FrictionModel) -> Result<f64, FrictionError> {
    match model {
        FrictionModel::Laminar => Ok(laminar_friction_factor(re)),
        FrictionModel::Colebrook => colebrook_friction_factor(re, rr),
    }
}

/// 레이놀즈수로 계산식을 고른다. 층류 영역은 64/Re, 그 외는 Colebrook.
pub fn auto_friction_factor(re: f64, rr: f64) -> Result<(f64, FrictionModel), FrictionError> {
    let model = match FlowRegime::classify(re) {
        FlowRegime::Laminar => FrictionModel::Laminar,
        FlowRegime::Transitional | FlowRegime::Turbulent => FrictionModel::Colebrook,
    };
    Ok((friction_factor(re, rr, model)?, model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laminar_ignores_roughness() {
        let a = friction_factor(1000.0, 0.0, FrictionModel::Laminar).unwrap();
        let b = friction_factor(1000.0, 0.05, FrictionModel::Laminar).unwrap();
        assert_eq!(a, 0.064);
        assert_eq!(a, b);
    }

    #[test]
    fn regime_boundaries() {
        assert_eq!(FlowRegime::classify(2000.0), FlowRegime::Laminar);
        assert_eq!(FlowRegime::classify(2000.1), FlowRegime::Transitional);
        assert_eq!(FlowRegime::classify(4000.0), FlowRegime::Turbulent);
    }

    #[test]
    fn smooth_pipe_near_blasius() {
        // Re=1e5 매끈한 관: f ≈ 0.0180
        let f = colebrook_friction_factor(1.0e5, 0.0).unwrap();
        assert!((f - 0.0180).abs() < 2e-4, "f={f}");
    }
}
