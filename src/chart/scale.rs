use super::{Axis, AxisScale, Chart};

/// 축 눈금 하나.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub major: bool,
    pub label: Option<String>,
}

/// 출력 영역과 플롯 영역의 픽셀 배치. 데이터→픽셀 변환을 제공한다.
#[derive(Debug, Clone)]
pub struct PlotFrame {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    x_axis: AxisMap,
    y_axis: AxisMap,
}

#[derive(Debug, Clone, Copy)]
struct AxisMap {
    scale: AxisScale,
    lo: f64,
    hi: f64,
}

impl AxisMap {
    fn from_axis(axis: &Axis) -> Self {
        let (lo, hi) = match axis.scale {
            AxisScale::Linear => (axis.min, axis.max),
            AxisScale::Log => (axis.min.log10(), axis.max.log10()),
        };
        Self {
            scale: axis.scale,
            lo,
            hi,
        }
    }

    /// 축 범위 안의 상대 위치 [0, 1]. 로그 축에서 0 이하 값은 NaN.
    fn fraction(&self, v: f64) -> f64 {
        let t = match self.scale {
            AxisScale::Linear => v,
            AxisScale::Log if v > 0.0 => v.log10(),
            AxisScale::Log => return f64::NAN,
        };
        (t - self.lo) / (self.hi - self.lo)
    }

    fn value_at(&self, fraction: f64) -> f64 {
        let t = self.lo + fraction * (self.hi - self.lo);
        match self.scale {
            AxisScale::Linear => t,
            AxisScale::Log => 10f64.powf(t),
        }
    }
}

impl PlotFrame {
    /// 주어진 크기 안에 제목/축 라벨/주석 자리를 남기고 플롯 영역을 배치한다.
    pub fn for_chart(chart: &Chart, width: f64, height: f64) -> Self {
        let mut right_margin = 30.0;
        if !chart.annotations.is_empty() {
            right_margin += 60.0;
        }
        if chart.right_label.is_some() {
            right_margin += 30.0;
        }
        Self::with_margins(chart, width, height, 90.0, 50.0, right_margin, 70.0)
    }

    pub fn with_margins(
        chart: &Chart,
        width: f64,
        height: f64,
        left_margin: f64,
        top_margin: f64,
        right_margin: f64,
        bottom_margin: f64,
    ) -> Self {
        Self {
            width,
            height,
            left: left_margin,
            top: top_margin,
            right: (width - right_margin).max(left_margin + 1.0),
            bottom: (height - bottom_margin).max(top_margin + 1.0),
            x_axis: AxisMap::from_axis(&chart.x_axis),
            y_axis: AxisMap::from_axis(&chart.y_axis),
        }
    }

    pub fn plot_width(&self) -> f64 {
        self.right - self.left
    }

    pub fn plot_height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn x_px(&self, x: f64) -> f64 {
        self.left + self.x_axis.fraction(x) * self.plot_width()
    }

    pub fn y_px(&self, y: f64) -> f64 {
        self.bottom - self.y_axis.fraction(y) * self.plot_height()
    }

    /// 데이터 좌표를 픽셀로 바꾼다. 로그 축에 0 이하 값이면 `None`.
    pub fn to_px(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (px, py) = (self.x_px(x), self.y_px(y));
        (px.is_finite() && py.is_finite()).then_some((px, py))
    }

    /// 픽셀 좌표를 데이터 좌표로 되돌린다. (마우스 위치 표시용)
    pub fn to_data(&self, px: f64, py: f64) -> (f64, f64) {
        let fx = (px - self.left) / self.plot_width();
        let fy = (self.bottom - py) / self.plot_height();
        (self.x_axis.value_at(fx), self.y_axis.value_at(fy))
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.left && px <= self.right && py >= self.top && py <= self.bottom
    }
}

/// 축 종류에 맞는 눈금 목록을 만든다.
pub fn ticks(axis: &Axis) -> Vec<Tick> {
    match axis.scale {
        AxisScale::Log => log_ticks(axis),
        AxisScale::Linear => linear_ticks(axis),
    }
}

fn log_ticks(axis: &Axis) -> Vec<Tick> {
    let mut out = Vec::new();
    if axis.min <= 0.0 || axis.max <= axis.min {
        return out;
    }
    let lo = axis.min * (1.0 - 1e-9);
    let hi = axis.max * (1.0 + 1e-9);
    let first = axis.min.log10().floor() as i32;
    let last = axis.max.log10().ceil() as i32;
    for k in first..=last {
        let base = 10f64.powi(k);
        for m in 1..=9 {
            let value = base * m as f64;
            if value < lo || value > hi {
                continue;
            }
            let major = m == 1;
            let label = if major {
                Some(format!("10{}", superscript(k)))
            } else {
                axis.minor_label_decimals.map(|d| format!("{value:.d$}"))
            };
            out.push(Tick {
                value,
                major,
                label,
            });
        }
    }
    out
}

fn linear_ticks(axis: &Axis) -> Vec<Tick> {
    let range = axis.max - axis.min;
    if !(range > 0.0) || !range.is_finite() {
        return Vec::new();
    }
    let step = nice_step(range, 6.0);
    let mut out = Vec::new();
    let mut i = (axis.min / step).ceil() as i64;
    loop {
        let mut value = i as f64 * step;
        if value > axis.max + step * 1e-9 {
            break;
        }
        if value.abs() < step * 1e-9 {
            value = 0.0;
        }
        out.push(Tick {
            value,
            major: true,
            label: Some(format_linear(value, step)),
        });
        i += 1;
    }
    out
}

/// 1, 2, 5 × 10ⁿ 중 목표 개수에 가까운 간격.
pub fn nice_step(range: f64, target_count: f64) -> f64 {
    let raw = range / target_count;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm < 1.5 {
        1.0
    } else if norm < 3.0 {
        2.0
    } else if norm < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

/// 눈금 간격에 맞춘 자릿수로 값을 쓴다. 간격이 크거나 아주 작으면 지수 표기.
pub fn format_linear(value: f64, step: f64) -> String {
    if step >= 1e4 || step < 1e-4 {
        if value == 0.0 {
            return "0".to_string();
        }
        return format!("{value:.1e}");
    }
    let decimals = if step >= 1.0 {
        0
    } else {
        (-(step.log10()) - 1e-9).ceil() as usize
    };
    format!("{value:.decimals$}")
}

fn superscript(k: i32) -> String {
    k.to_string()
        .chars()
        .map(|c| match c {
            '-' => '⁻',
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moody_y_axis_ticks() {
        let axis = Axis::new("f", AxisScale::Log, 0.008, 0.10).with_minor_labels(3);
        let t = ticks(&axis);
        let majors: Vec<f64> = t.iter().filter(|t| t.major).map(|t| t.value).collect();
        assert_eq!(majors.len(), 2);
        assert!((majors[0] - 0.01).abs() < 1e-12);
        assert_eq!(t[0].label.as_deref(), Some("0.008"));
        assert_eq!(
            t.iter().find(|t| t.major).and_then(|t| t.label.clone()).as_deref(),
            Some("10⁻²")
        );
    }

    #[test]
    fn linear_ticks_are_nice() {
        let axis = Axis::new("t", AxisScale::Linear, 0.0, 0.02);
        let labels: Vec<String> = ticks(&axis).into_iter().filter_map(|t| t.label).collect();
        assert_eq!(labels.first().map(String::as_str), Some("0.000"));
        assert_eq!(labels.last().map(String::as_str), Some("0.020"));
    }

    #[test]
    fn log_mapping_spans_plot() {
        let chart = Chart::new(
            "",
            Axis::new("x", AxisScale::Log, 600.0, 1e8),
            Axis::new("y", AxisScale::Log, 0.008, 0.1),
        );
        let frame = PlotFrame::with_margins(&chart, 500.0, 400.0, 50.0, 50.0, 50.0, 50.0);
        assert!((frame.x_px(600.0) - 50.0).abs() < 1e-9);
        assert!((frame.x_px(1e8) - 450.0).abs() < 1e-9);
        assert!((frame.y_px(0.1) - 50.0).abs() < 1e-9);
        assert!(frame.to_px(0.0, 0.05).is_none());
        let (re, f) = frame.to_data(frame.x_px(1.0e5), frame.y_px(0.02));
        assert!((re / 1.0e5 - 1.0).abs() < 1e-9);
        assert!((f / 0.02 - 1.0).abs() < 1e-9);
    }
}
