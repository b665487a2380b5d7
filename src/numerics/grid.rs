//! 균등/로그 간격 격자 생성.

/// `start`부터 `stop`까지(양 끝 포함) `n`개의 균등 간격 값을 만든다.
///
/// `n == 1`이면 `[start]`, `n == 0`이면 빈 벡터를 반환한다.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // 누적 오차 없이 끝점을 정확히 맞춘다
            out[n - 1] = stop;
            out
        }
    }
}

/// 10의 `start_exp`승부터 10의 `stop_exp`승까지 로그 간격으로 `n`개의 값을 만든다.
pub fn logspace(start_exp: f64, stop_exp: f64, n: usize) -> Vec<f64> {
    linspace(start_exp, stop_exp, n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// 양 끝 값을 직접 받아 로그 간격 격자를 만든다. (`logspace(log10(a), log10(b), n)`)
pub fn geomspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    let mut out = logspace(start.log10(), stop.log10(), n);
    if let Some(first) = out.first_mut() {
        *first = start;
    }
    if let Some(last) = out.last_mut() {
        *last = stop;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_hits_both_ends() {
        let t = linspace(0.0, 0.02, 200);
        assert_eq!(t.len(), 200);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[199], 0.02);
        assert!((t[1] - 0.02 / 199.0).abs() < 1e-15);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn logspace_decades() {
        let v = logspace(0.0, 3.0, 4);
        for (a, b) in v.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
            assert!((a - b).abs() < 1e-9 * b);
        }
    }

    #[test]
    fn geomspace_keeps_exact_endpoints() {
        let v = geomspace(600.0, 2000.0, 20);
        assert_eq!(v.len(), 20);
        assert_eq!(v[0], 600.0);
        assert_eq!(v[19], 2000.0);
        assert!(v.windows(2).all(|w| w[1] > w[0]));
    }
}
