//! 출력 백엔드와 무관한 2차원 선 그래프 모델.
//!
//! 계산 모듈은 `Chart`만 조립하고, 실제 그리기는 SVG 작성기(`svg`), PNG
//! 래스터라이저(`raster`), GUI 페인터가 각각 맡는다. 좌표 변환과 눈금 계산은
//! 세 백엔드가 `scale`을 공유한다.

pub mod raster;
pub mod scale;
pub mod svg;

use std::path::Path;

pub use scale::{PlotFrame, Tick};

/// 그래프 저장 오류.
#[derive(Debug)]
pub enum ChartError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// PNG 인코딩 오류
    Image(image::ImageError),
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ChartError::Image(e) => write!(f, "PNG 저장 오류: {e}"),
        }
    }
}

impl std::error::Error for ChartError {}

impl From<std::io::Error> for ChartError {
    fn from(value: std::io::Error) -> Self {
        ChartError::Io(value)
    }
}

impl From<image::ImageError> for ChartError {
    fn from(value: image::ImageError) -> Self {
        ChartError::Image(value)
    }
}

/// 8비트 RGB 색.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const HOT_PINK: Rgb = Rgb(255, 105, 180);
    pub const TURQUOISE: Rgb = Rgb(64, 224, 208);
    pub const PURPLE: Rgb = Rgb(128, 0, 128);
    pub const GRID: Rgb = Rgb(176, 176, 176);

    /// `#rrggbb` 표기.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Linear,
    Log,
}

/// 축 정의. `min`/`max`는 데이터 좌표 범위다.
#[derive(Debug, Clone)]
pub struct Axis {
    pub label: String,
    pub scale: AxisScale,
    pub min: f64,
    pub max: f64,
    /// 보조 눈금에 라벨을 붙일 때의 소수 자릿수 (`%.3f` → 3)
    pub minor_label_decimals: Option<usize>,
}

impl Axis {
    pub fn new(label: impl Into<String>, scale: AxisScale, min: f64, max: f64) -> Self {
        Self {
            label: label.into(),
            scale,
            min,
            max,
            minor_label_decimals: None,
        }
    }

    /// 데이터 범위에 양쪽 5% 여백을 둔 선형 축.
    pub fn fit_linear<'a>(label: impl Into<String>, values: impl IntoIterator<Item = &'a f64>) -> Self {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let (lo, hi) = if lo > hi {
            (0.0, 1.0)
        } else if lo == hi {
            let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
            (lo - pad, hi + pad)
        } else {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        };
        Self::new(label, AxisScale::Linear, lo, hi)
    }

    pub fn with_minor_labels(mut self, decimals: usize) -> Self {
        self.minor_label_decimals = Some(decimals);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// 꺾은선 하나.
#[derive(Debug, Clone)]
pub struct Series {
    /// 범례에 표시할 이름. `None`이면 범례에서 빠진다.
    pub label: Option<String>,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: Rgb,
    pub style: LineStyle,
    pub width: f64,
}

impl Series {
    pub fn line(xs: Vec<f64>, ys: Vec<f64>, color: Rgb) -> Self {
        Self {
            label: None,
            xs,
            ys,
            color,
            style: LineStyle::Solid,
            width: 1.5,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.style = LineStyle::Dashed;
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Triangle,
}

/// 단일 점 표식. `size`는 지름(픽셀)이다.
#[derive(Debug, Clone)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub shape: MarkerShape,
    pub size: f64,
    pub edge: Rgb,
    pub fill: Option<Rgb>,
}

/// 데이터 좌표에 붙이는 글자. 플롯 영역 밖으로 나가도 잘리지 않는다.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// 그래프 전체.
#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
    pub markers: Vec<Marker>,
    /// 플롯 오른쪽 바깥에 세로로 쓰는 설명
    pub right_label: Option<String>,
    pub legend: bool,
    pub minor_grid: bool,
}

impl Chart {
    pub fn new(title: impl Into<String>, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            title: title.into(),
            x_axis,
            y_axis,
            series: Vec::new(),
            annotations: Vec::new(),
            markers: Vec::new(),
            right_label: None,
            legend: false,
            minor_grid: false,
        }
    }

    /// 범례에 나올 (이름, 색, 선 모양) 목록.
    pub fn legend_entries(&self) -> Vec<(&str, Rgb, LineStyle)> {
        self.series
            .iter()
            .filter_map(|s| s.label.as_deref().map(|l| (l, s.color, s.style)))
            .collect()
    }

    /// 기본 크기의 SVG 문서로 저장한다.
    pub fn save_svg(&self, path: &Path) -> Result<(), ChartError> {
        let doc = svg::render(self, &PlotFrame::for_chart(self, 1000.0, 700.0));
        std::fs::write(path, doc)?;
        Ok(())
    }

    /// 기본 크기의 PNG로 저장한다. 글자는 그리지 않는다.
    pub fn save_png(&self, path: &Path) -> Result<(), ChartError> {
        let img = raster::render(self, &PlotFrame::for_chart(self, 1000.0, 700.0));
        img.save(path)?;
        Ok(())
    }
}
