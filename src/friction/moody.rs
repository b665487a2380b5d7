use serde::{Deserialize, Serialize};

use super::friction_factor::{
    colebrook_with, laminar_friction_factor, FrictionError, LAMINAR_RE_MAX, TURBULENT_RE_MIN,
};
use crate::chart::{Annotation, Axis, AxisScale, Chart, Marker, MarkerShape, Rgb, Series};
use crate::i18n::{keys, Translator};
use crate::numerics::{geomspace, RootOptions};

/// 무디 선도 작성 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodySettings {
    /// 층류 곡선 시작 Re
    pub re_laminar_min: f64,
    /// 난류 곡선 끝 Re
    pub re_turbulent_max: f64,
    pub laminar_points: usize,
    pub transition_points: usize,
    pub turbulent_points: usize,
    /// 곡선을 그릴 상대 조도 목록
    pub roughness: Vec<f64>,
    /// x축 범위 (Re)
    pub x_limits: (f64, f64),
    /// y축 범위 (f)
    pub y_limits: (f64, f64),
    /// Colebrook 반복 시작값
    pub initial_guess: f64,
}

impl Default for MoodySettings {
    fn default() -> Self {
        Self {
            re_laminar_min: 600.0,
            re_turbulent_max: 1.0e8,
            laminar_points: 20,
            transition_points: 20,
            turbulent_points: 100,
            roughness: vec![
                0.0, 1e-6, 5e-6, 1e-5, 5e-5, 1e-4, 2e-4, 4e-4, 6e-4, 8e-4, 1e-3, 2e-3, 4e-3,
                6e-3, 8e-8, 1.5e-2, 2e-2, 3e-2, 4e-2, 5e-2,
            ],
            x_limits: (600.0, 1.0e8),
            y_limits: (0.008, 0.10),
            initial_guess: super::friction_factor::COLEBROOK_INITIAL_GUESS,
        }
    }
}

/// 무디 선도의 곡선 데이터.
#[derive(Debug, Clone)]
pub struct MoodyChartData {
    pub re_laminar: Vec<f64>,
    pub f_laminar: Vec<f64>,
    pub re_transition: Vec<f64>,
    pub f_transition: Vec<f64>,
    pub re_turbulent: Vec<f64>,
    pub roughness: Vec<f64>,
    /// `roughness[i]`에 대한 난류 곡선. 각 행의 길이는 `re_turbulent`와 같다.
    pub f_turbulent: Vec<Vec<f64>>,
}

/// 조도 목록에서 앞 값보다 작아지는 항목을 찾는다. (인덱스, 앞 값, 해당 값)
pub fn roughness_order_warnings(roughness: &[f64]) -> Vec<(usize, f64, f64)> {
    roughness
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[1] < w[0])
        .map(|(i, w)| (i + 1, w[0], w[1]))
        .collect()
}

/// 층류/천이/난류 구간의 마찰계수를 모두 계산한다.
pub fn compute_moody(
    settings: &MoodySettings,
    opts: RootOptions,
) -> Result<MoodyChartData, FrictionError> {
    for (idx, prev, value) in roughness_order_warnings(&settings.roughness) {
        log::warn!(
            "roughness[{idx}] = {value:e} is smaller than the previous value {prev:e}; \
             the list is plotted as given, check the input for a typo"
        );
    }

    let re_laminar = geomspace(settings.re_laminar_min, LAMINAR_RE_MAX, settings.laminar_points);
    let re_transition = geomspace(LAMINAR_RE_MAX, TURBULENT_RE_MIN, settings.transition_points);
    let re_turbulent = geomspace(
        TURBULENT_RE_MIN,
        settings.re_turbulent_max,
        settings.turbulent_points,
    );

    let f_laminar = re_laminar.iter().map(|&re| laminar_friction_factor(re)).collect();
    // 천이 구간은 층류식을 연장해 점선으로 그린다
    let f_transition = re_transition
        .iter()
        .map(|&re| laminar_friction_factor(re))
        .collect();

    let f_turbulent = settings
        .roughness
        .iter()
        .map(|&rr| {
            re_turbulent
                .iter()
                .map(|&re| colebrook_with(re, rr, settings.initial_guess, opts))
                .collect::<Result<Vec<f64>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!(
        "moody data: {} roughness curves x {} Reynolds points",
        settings.roughness.len(),
        re_turbulent.len()
    );

    Ok(MoodyChartData {
        re_laminar,
        f_laminar,
        re_transition,
        f_transition,
        re_turbulent,
        roughness: settings.roughness.clone(),
        f_turbulent,
    })
}

/// 운전점 표식 모양. 층류/난류 영역은 원, 천이 영역은 삼각형.
pub fn marker_shape_for(re: f64) -> MarkerShape {
    if re <= LAMINAR_RE_MAX || re >= TURBULENT_RE_MIN {
        MarkerShape::Circle
    } else {
        MarkerShape::Triangle
    }
}

/// 운전점 (Re, f) 표식. 빨간 테두리, 속은 비운다.
pub fn operating_point_marker(re: f64, f: f64) -> Marker {
    Marker {
        x: re,
        y: f,
        shape: marker_shape_for(re),
        size: 12.0,
        edge: Rgb::RED,
        fill: None,
    }
}

/// 조도 주석 표기. 작은 값은 지수 표기.
pub fn format_roughness(rr: f64) -> String {
    if rr == 0.0 {
        "0".to_string()
    } else if rr < 1e-4 {
        format!("{rr:e}")
    } else {
        format!("{rr}")
    }
}

/// 계산된 데이터로 무디 선도를 조립한다.
pub fn moody_chart(
    data: &MoodyChartData,
    settings: &MoodySettings,
    point: Option<(f64, f64)>,
    tr: &Translator,
) -> Chart {
    let x_axis = Axis::new(
        tr.t(keys::MOODY_X_LABEL),
        AxisScale::Log,
        settings.x_limits.0,
        settings.x_limits.1,
    );
    let y_axis = Axis::new(
        tr.t(keys::MOODY_Y_LABEL),
        AxisScale::Log,
        settings.y_limits.0,
        settings.y_limits.1,
    )
    .with_minor_labels(3);

    let mut chart = Chart::new(tr.t(keys::MOODY_TITLE), x_axis, y_axis);
    chart.minor_grid = true;
    chart.right_label = Some(tr.t(keys::MOODY_ROUGHNESS_LABEL));

    chart.series.push(Series::line(
        data.re_laminar.clone(),
        data.f_laminar.clone(),
        Rgb::BLACK,
    ));
    chart.series.push(
        Series::line(
            data.re_transition.clone(),
            data.f_transition.clone(),
            Rgb::BLACK,
        )
        .dashed(),
    );

    let x_end = settings.re_turbulent_max;
    for (rr, curve) in data.roughness.iter().zip(&data.f_turbulent) {
        chart.series.push(Series::line(
            data.re_turbulent.clone(),
            curve.clone(),
            Rgb::BLACK,
        ));
        if let Some(&f_last) = curve.last() {
            chart.annotations.push(Annotation {
                x: x_end,
                y: f_last,
                text: format_roughness(*rr),
            });
        }
    }

    if let Some((re, f)) = point {
        chart.markers.push(operating_point_marker(re, f));
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roughness_flags_one_entry() {
        let warnings = roughness_order_warnings(&MoodySettings::default().roughness);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].0, 14);
        assert_eq!(warnings[0].2, 8e-8);
    }

    #[test]
    fn marker_shape_by_regime() {
        assert_eq!(marker_shape_for(1500.0), MarkerShape::Circle);
        assert_eq!(marker_shape_for(2000.0), MarkerShape::Circle);
        assert_eq!(marker_shape_for(3000.0), MarkerShape::Triangle);
        assert_eq!(marker_shape_for(4000.0), MarkerShape::Circle);
    }

    #[test]
    fn roughness_labels() {
        assert_eq!(format_roughness(0.0), "0");
        assert_eq!(format_roughness(1e-6), "1e-6");
        assert_eq!(format_roughness(8e-8), "8e-8");
        assert_eq!(format_roughness(0.015), "0.015");
    }
}
