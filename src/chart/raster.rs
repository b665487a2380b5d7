//! `image` 버퍼에 그래프 도형(틀, 격자, 눈금, 선, 표식)을 그린다. 글자는 그리지 않는다.

use image::{Rgba, RgbaImage};

use super::scale::{ticks, PlotFrame};
use super::svg::triangle_points;
use super::{Chart, LineStyle, MarkerShape, Rgb};

const DASH_ON: f64 = 6.0;
const DASH_OFF: f64 = 4.0;

/// 그래프를 RGBA 이미지로 그린다.
pub fn render(chart: &Chart, frame: &PlotFrame) -> RgbaImage {
    let w = frame.width.max(1.0) as u32;
    let h = frame.height.max(1.0) as u32;
    let mut canvas = Canvas {
        img: RgbaImage::from_pixel(w, h, rgba(Rgb::WHITE, 255)),
        clip: None,
    };

    for tick in ticks(&chart.x_axis) {
        let x = frame.x_px(tick.value);
        if !x.is_finite() {
            continue;
        }
        if tick.major || chart.minor_grid {
            let alpha = if tick.major { 128 } else { 64 };
            canvas.line(x, frame.top, x, frame.bottom, Rgb::GRID, alpha, None);
        }
        let len = if tick.major { 6.0 } else { 3.0 };
        canvas.line(x, frame.bottom, x, frame.bottom - len, Rgb::BLACK, 255, None);
        canvas.line(x, frame.top, x, frame.top + len, Rgb::BLACK, 255, None);
    }
    for tick in ticks(&chart.y_axis) {
        let y = frame.y_px(tick.value);
        if !y.is_finite() {
            continue;
        }
        if tick.major || chart.minor_grid {
            let alpha = if tick.major { 128 } else { 64 };
            canvas.line(frame.left, y, frame.right, y, Rgb::GRID, alpha, None);
        }
        let len = if tick.major { 6.0 } else { 3.0 };
        canvas.line(frame.left, y, frame.left + len, y, Rgb::BLACK, 255, None);
        canvas.line(frame.right, y, frame.right - len, y, Rgb::BLACK, 255, None);
    }

    canvas.clip = Some((frame.left, frame.top, frame.right, frame.bottom));
    for series in &chart.series {
        let dash = match series.style {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some((DASH_ON, DASH_OFF)),
        };
        let pts: Vec<(f64, f64)> = series
            .points()
            .filter_map(|(x, y)| frame.to_px(x, y))
            .collect();
        let mut travelled = 0.0;
        for pair in pts.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            travelled = canvas.dashed_line(a, b, series.color, dash, travelled);
        }
    }
    canvas.clip = None;

    for m in &chart.markers {
        let Some((cx, cy)) = frame.to_px(m.x, m.y) else {
            continue;
        };
        let r = m.size / 2.0;
        match m.shape {
            MarkerShape::Circle => canvas.circle(cx, cy, r, m.edge),
            MarkerShape::Triangle => {
                let p = triangle_points(cx, cy, r);
                for (a, b) in [(p[0], p[1]), (p[1], p[2]), (p[2], p[0])] {
                    canvas.line(a.0, a.1, b.0, b.1, m.edge, 255, None);
                }
            }
        }
    }

    let (l, t, r, b) = (frame.left, frame.top, frame.right, frame.bottom);
    canvas.line(l, t, r, t, Rgb::BLACK, 255, None);
    canvas.line(r, t, r, b, Rgb::BLACK, 255, None);
    canvas.line(r, b, l, b, Rgb::BLACK, 255, None);
    canvas.line(l, b, l, t, Rgb::BLACK, 255, None);

    canvas.img
}

fn rgba(c: Rgb, a: u8) -> Rgba<u8> {
    Rgba([c.0, c.1, c.2, a])
}

struct Canvas {
    img: RgbaImage,
    clip: Option<(f64, f64, f64, f64)>,
}

impl Canvas {
    fn blend(&mut self, x: i64, y: i64, color: Rgb, alpha: u8) {
        if x < 0 || y < 0 || x >= self.img.width() as i64 || y >= self.img.height() as i64 {
            return;
        }
        if let Some((l, t, r, b)) = self.clip {
            let (fx, fy) = (x as f64, y as f64);
            if fx < l.floor() || fx > r.ceil() || fy < t.floor() || fy > b.ceil() {
                return;
            }
        }
        let px = self.img.get_pixel_mut(x as u32, y as u32);
        let a = alpha as u32;
        let mix = |dst: u8, src: u8| ((src as u32 * a + dst as u32 * (255 - a)) / 255) as u8;
        *px = Rgba([mix(px[0], color.0), mix(px[1], color.1), mix(px[2], color.2), 255]);
    }

    #[allow(clippy::too_many_arguments)]
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Rgb, alpha: u8, dash: Option<(f64, f64)>) {
        let _ = self.stroke((x1, y1), (x2, y2), color, alpha, dash, 0.0);
    }

    fn dashed_line(
        &mut self,
        a: (f64, f64),
        b: (f64, f64),
        color: Rgb,
        dash: Option<(f64, f64)>,
        offset: f64,
    ) -> f64 {
        self.stroke(a, b, color, 255, dash, offset)
    }

    // 샘플링 방식 선분. 대시 패턴 진행 거리를 돌려준다.
    fn stroke(
        &mut self,
        a: (f64, f64),
        b: (f64, f64),
        color: Rgb,
        alpha: u8,
        dash: Option<(f64, f64)>,
        offset: f64,
    ) -> f64 {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len = (dx * dx + dy * dy).sqrt();
        let n = len.ceil().max(1.0) as usize;
        for i in 0..=n {
            let s = i as f64 / n as f64;
            let along = offset + s * len;
            if let Some((on, off)) = dash {
                if along % (on + off) >= on {
                    continue;
                }
            }
            let x = (a.0 + dx * s).round() as i64;
            let y = (a.1 + dy * s).round() as i64;
            self.blend(x, y, color, alpha);
        }
        offset + len
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, color: Rgb) {
        let n = (2.0 * std::f64::consts::PI * r).ceil().max(8.0) as usize * 2;
        for i in 0..n {
            let th = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            let x = (cx + r * th.cos()).round() as i64;
            let y = (cy + r * th.sin()).round() as i64;
            self.blend(x, y, color, 255);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Axis, AxisScale, Marker, Series};

    #[test]
    fn draws_series_and_marker_pixels() {
        let mut chart = Chart::new(
            "",
            Axis::new("x", AxisScale::Linear, 0.0, 1.0),
            Axis::new("y", AxisScale::Linear, 0.0, 1.0),
        );
        chart
            .series
            .push(Series::line(vec![0.0, 1.0], vec![0.5, 0.5], Rgb::HOT_PINK));
        chart.markers.push(Marker {
            x: 0.25,
            y: 0.25,
            shape: MarkerShape::Circle,
            size: 12.0,
            edge: Rgb::RED,
            fill: None,
        });
        let frame = PlotFrame::with_margins(&chart, 200.0, 200.0, 20.0, 20.0, 20.0, 20.0);
        let img = render(&chart, &frame);
        assert_eq!(img.dimensions(), (200, 200));
        // 수평선 y=0.5 → 픽셀 100
        assert_eq!(img.get_pixel(100, 100), &Rgba([255, 105, 180, 255]));
        // 원 테두리 오른쪽 끝
        let (cx, cy) = (frame.x_px(0.25), frame.y_px(0.25));
        assert_eq!(
            img.get_pixel((cx + 6.0).round() as u32, cy.round() as u32),
            &Rgba([255, 0, 0, 255])
        );
    }
}
