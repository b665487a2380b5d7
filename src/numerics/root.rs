//! 스칼라 비선형 방정식 근 찾기.
//!
//! 유한차분으로 도함수를 근사하는 뉴턴-랩슨 반복을 사용한다. 시작값 하나만
//! 받고, 잔차가 정의되지 않는 영역(NaN/무한대)으로 나가면 스텝을 절반씩 줄인다.

/// 근 찾기 옵션.
#[derive(Debug, Clone, Copy)]
pub struct RootOptions {
    /// 상대 스텝 허용오차. |Δx| <= xtol * max(|x|, xtol) 이면 수렴으로 본다.
    pub xtol: f64,
    /// 최대 반복 횟수
    pub max_iter: usize,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            xtol: 1.49012e-8,
            max_iter: 100,
        }
    }
}

/// 근 찾기 결과.
#[derive(Debug, Clone, Copy)]
pub struct RootResult {
    pub root: f64,
    pub residual: f64,
    pub iterations: usize,
}

/// 근 찾기 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum RootError {
    /// 최대 반복 횟수 안에 수렴하지 못함
    MaxIterations { last: f64, residual: f64 },
    /// 잔차 또는 도함수가 유한하지 않음
    NonFinite { at: f64 },
}

impl std::fmt::Display for RootError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootError::MaxIterations { last, residual } => write!(
                f,
                "최대 반복 횟수 초과 (x={last:.6e}, 잔차={residual:.3e})"
            ),
            RootError::NonFinite { at } => write!(f, "잔차를 계산할 수 없음 (x={at:.6e})"),
        }
    }
}

impl std::error::Error for RootError {}

const MAX_HALVINGS: usize = 60;

/// `fxn(x) = 0`의 근을 `x0`에서 시작해 찾는다.
pub fn newton_fdiff<F>(fxn: F, x0: f64, opts: RootOptions) -> Result<RootResult, RootError>
where
    F: Fn(f64) -> f64,
{
    let mut x = x0;
    let mut fx = fxn(x);
    if !fx.is_finite() {
        return Err(RootError::NonFinite { at: x });
    }

    for iter in 1..=opts.max_iter {
        if fx == 0.0 {
            return Ok(RootResult {
                root: x,
                residual: fx,
                iterations: iter - 1,
            });
        }
        let slope = fdiff_derivative(&fxn, x, fx);
        if !slope.is_finite() || slope == 0.0 {
            return Err(RootError::NonFinite { at: x });
        }

        let mut step = -fx / slope;
        let mut x_new = x + step;
        let mut f_new = fxn(x_new);
        let mut halvings = 0;
        while !f_new.is_finite() {
            halvings += 1;
            if halvings > MAX_HALVINGS {
                return Err(RootError::NonFinite { at: x_new });
            }
            step *= 0.5;
            x_new = x + step;
            f_new = fxn(x_new);
        }

        x = x_new;
        fx = f_new;
        if step.abs() <= opts.xtol * x.abs().max(opts.xtol) {
            log::trace!("newton converged in {iter} iterations: x={x:e}");
            return Ok(RootResult {
                root: x,
                residual: fx,
                iterations: iter,
            });
        }
    }

    Err(RootError::MaxIterations {
        last: x,
        residual: fx,
    })
}

// 전진 차분. 스텝은 대략 sqrt(ULP) * |x|, x가 0 근처면 고정값을 쓴다.
fn fdiff_derivative<F>(fxn: &F, x: f64, fx: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    const H_FACTOR: f64 = 1.0e-7;
    const Z_TOL: f64 = 1.0e-10;
    const Z_STEP: f64 = 1.0e-12;

    let h = if x.abs() > Z_TOL { x.abs() * H_FACTOR } else { Z_STEP };
    let f_h = fxn(x + h);
    if f_h.is_finite() {
        return (f_h - fx) / h;
    }
    // 정의역 경계에 걸리면 후진 차분
    (fx - fxn(x - h)) / h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_square_root_of_two() {
        let res = newton_fdiff(|x| x * x - 2.0, 1.0, RootOptions::default()).unwrap();
        assert!((res.root - 2f64.sqrt()).abs() < 1e-8);
        assert!(res.iterations < 20);
    }

    #[test]
    fn halves_step_out_of_domain() {
        // sqrt 정의역 밖으로 나가는 첫 스텝을 되돌린다
        let res = newton_fdiff(|x| x.sqrt() - 0.5, 4.0, RootOptions::default()).unwrap();
        assert!((res.root - 0.25).abs() < 1e-8);
    }

    #[test]
    fn reports_non_convergence() {
        let opts = RootOptions {
            xtol: 1e-12,
            max_iter: 3,
        };
        let err = newton_fdiff(|x| x * x + 1.0, 3.0, opts).unwrap_err();
        assert!(matches!(err, RootError::MaxIterations { .. }));
    }

    #[test]
    fn non_finite_start_is_error() {
        let err = newton_fdiff(|x| x.ln(), -1.0, RootOptions::default()).unwrap_err();
        assert_eq!(err, RootError::NonFinite { at: -1.0 });
    }
}
