//! SVG 1.1 문서 작성기.

use std::fmt::Write;

use super::scale::{ticks, PlotFrame};
use super::{Chart, LineStyle, MarkerShape, Rgb};

const FONT: &str = "DejaVu Sans, Arial, sans-serif";
const MAJOR_TICK: f64 = 6.0;
const MINOR_TICK: f64 = 3.0;

/// 그래프를 SVG 문자열로 그린다.
pub fn render(chart: &Chart, frame: &PlotFrame) -> String {
    let mut out = String::new();
    // String에 쓰는 write!는 실패하지 않는다
    let _ = write_document(&mut out, chart, frame);
    out
}

fn write_document(out: &mut String, chart: &Chart, frame: &PlotFrame) -> std::fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT}">"#,
        w = frame.width,
        h = frame.height
    )?;
    writeln!(
        out,
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        frame.width,
        frame.height,
        Rgb::WHITE.hex()
    )?;
    writeln!(
        out,
        r#"<defs><clipPath id="plot"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath></defs>"#,
        frame.left,
        frame.top,
        frame.plot_width(),
        frame.plot_height()
    )?;

    write_grid_and_ticks(out, chart, frame)?;
    write_series(out, chart, frame)?;
    write_markers(out, chart, frame)?;

    writeln!(
        out,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="black" stroke-width="1"/>"#,
        frame.left,
        frame.top,
        frame.plot_width(),
        frame.plot_height()
    )?;

    write_labels(out, chart, frame)?;
    if chart.legend {
        write_legend(out, chart, frame)?;
    }
    writeln!(out, "</svg>")
}

fn write_grid_and_ticks(out: &mut String, chart: &Chart, frame: &PlotFrame) -> std::fmt::Result {
    for tick in ticks(&chart.x_axis) {
        let x = frame.x_px(tick.value);
        if !x.is_finite() {
            continue;
        }
        if tick.major || chart.minor_grid {
            grid_line(out, x, frame.top, x, frame.bottom, tick.major)?;
        }
        let len = if tick.major { MAJOR_TICK } else { MINOR_TICK };
        // 안쪽 눈금, 위아래 모두
        line(out, x, frame.bottom, x, frame.bottom - len, Rgb::BLACK, 1.0, None)?;
        line(out, x, frame.top, x, frame.top + len, Rgb::BLACK, 1.0, None)?;
        if let Some(label) = &tick.label {
            text(out, x, frame.bottom + 18.0, "middle", 12.0, label)?;
        }
    }
    for tick in ticks(&chart.y_axis) {
        let y = frame.y_px(tick.value);
        if !y.is_finite() {
            continue;
        }
        if tick.major || chart.minor_grid {
            grid_line(out, frame.left, y, frame.right, y, tick.major)?;
        }
        let len = if tick.major { MAJOR_TICK } else { MINOR_TICK };
        line(out, frame.left, y, frame.left + len, y, Rgb::BLACK, 1.0, None)?;
        line(out, frame.right, y, frame.right - len, y, Rgb::BLACK, 1.0, None)?;
        if let Some(label) = &tick.label {
            text(out, frame.left - 8.0, y + 4.0, "end", 12.0, label)?;
        }
    }
    Ok(())
}

fn write_series(out: &mut String, chart: &Chart, frame: &PlotFrame) -> std::fmt::Result {
    for series in &chart.series {
        let mut points = String::new();
        for (px, py) in series.points().filter_map(|(x, y)| frame.to_px(x, y)) {
            write!(points, "{px:.2},{py:.2} ")?;
        }
        if points.is_empty() {
            continue;
        }
        let dash = match series.style {
            LineStyle::Solid => String::new(),
            LineStyle::Dashed => r#" stroke-dasharray="6,4""#.to_string(),
        };
        writeln!(
            out,
            r#"<polyline clip-path="url(#plot)" fill="none" stroke="{}" stroke-width="{}"{dash} points="{}"/>"#,
            series.color.hex(),
            series.width,
            points.trim_end()
        )?;
    }
    Ok(())
}

fn write_markers(out: &mut String, chart: &Chart, frame: &PlotFrame) -> std::fmt::Result {
    for m in &chart.markers {
        let Some((cx, cy)) = frame.to_px(m.x, m.y) else {
            continue;
        };
        let r = m.size / 2.0;
        let fill = m.fill.map(|c| c.hex()).unwrap_or_else(|| "none".to_string());
        match m.shape {
            MarkerShape::Circle => writeln!(
                out,
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{fill}" stroke="{}" stroke-width="1.5"/>"#,
                m.edge.hex()
            )?,
            MarkerShape::Triangle => {
                let pts = triangle_points(cx, cy, r);
                writeln!(
                    out,
                    r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{fill}" stroke="{}" stroke-width="1.5"/>"#,
                    pts[0].0,
                    pts[0].1,
                    pts[1].0,
                    pts[1].1,
                    pts[2].0,
                    pts[2].1,
                    m.edge.hex()
                )?
            }
        }
    }
    Ok(())
}

/// 위쪽 꼭짓점 삼각형 표식의 세 꼭짓점.
pub fn triangle_points(cx: f64, cy: f64, r: f64) -> [(f64, f64); 3] {
    let half = r * 3f64.sqrt() / 2.0;
    [
        (cx, cy - r),
        (cx - half, cy + r / 2.0),
        (cx + half, cy + r / 2.0),
    ]
}

fn write_labels(out: &mut String, chart: &Chart, frame: &PlotFrame) -> std::fmt::Result {
    let cx = (frame.left + frame.right) / 2.0;
    let cy = (frame.top + frame.bottom) / 2.0;
    text(out, cx, frame.top - 16.0, "middle", 16.0, &chart.title)?;
    text(out, cx, frame.height - 20.0, "middle", 14.0, &chart.x_axis.label)?;
    writeln!(
        out,
        r#"<text x="24" y="{cy:.2}" text-anchor="middle" font-size="14" transform="rotate(-90 24 {cy:.2})">{}</text>"#,
        escape(&chart.y_axis.label)
    )?;

    for a in &chart.annotations {
        if let Some((px, py)) = frame.to_px(a.x, a.y) {
            text(out, px + 4.0, py + 4.0, "start", 10.0, &a.text)?;
        }
    }
    if let Some(label) = &chart.right_label {
        let x = frame.width - 18.0;
        writeln!(
            out,
            r#"<text x="{x:.2}" y="{cy:.2}" text-anchor="middle" font-size="14" transform="rotate(90 {x:.2} {cy:.2})">{}</text>"#,
            escape(label)
        )?;
    }
    Ok(())
}

fn write_legend(out: &mut String, chart: &Chart, frame: &PlotFrame) -> std::fmt::Result {
    let entries = chart.legend_entries();
    if entries.is_empty() {
        return Ok(());
    }
    let row = 20.0;
    let w = 110.0;
    let h = row * entries.len() as f64 + 10.0;
    let x0 = frame.right - w - 10.0;
    let y0 = frame.top + 10.0;
    writeln!(
        out,
        r#"<rect x="{x0:.2}" y="{y0:.2}" width="{w}" height="{h}" fill="white" fill-opacity="0.8" stroke="{}"/>"#,
        Rgb::GRID.hex()
    )?;
    for (i, (label, color, style)) in entries.into_iter().enumerate() {
        let y = y0 + 15.0 + row * i as f64;
        let dash = match style {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some("6,4"),
        };
        line(out, x0 + 8.0, y, x0 + 38.0, y, color, 1.5, dash)?;
        text(out, x0 + 46.0, y + 4.0, "start", 12.0, label)?;
    }
    Ok(())
}

fn grid_line(out: &mut String, x1: f64, y1: f64, x2: f64, y2: f64, major: bool) -> std::fmt::Result {
    let opacity = if major { 0.5 } else { 0.25 };
    writeln!(
        out,
        r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="1" stroke-opacity="{opacity}"/>"#,
        Rgb::GRID.hex()
    )
}

#[allow(clippy::too_many_arguments)]
fn line(
    out: &mut String,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    color: Rgb,
    width: f64,
    dash: Option<&str>,
) -> std::fmt::Result {
    let dash = dash
        .map(|d| format!(r#" stroke-dasharray="{d}""#))
        .unwrap_or_default();
    writeln!(
        out,
        r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{width}"{dash}/>"#,
        color.hex()
    )
}

fn text(out: &mut String, x: f64, y: f64, anchor: &str, size: f64, body: &str) -> std::fmt::Result {
    writeln!(
        out,
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="{anchor}" font-size="{size}">{}</text>"#,
        escape(body)
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Axis, AxisScale, Series};

    #[test]
    fn escapes_text_and_draws_dashes() {
        let mut chart = Chart::new(
            "P1 & P2",
            Axis::new("t", AxisScale::Linear, 0.0, 1.0),
            Axis::new("p", AxisScale::Linear, 0.0, 1.0),
        );
        chart
            .series
            .push(Series::line(vec![0.0, 1.0], vec![0.0, 1.0], Rgb::PURPLE).dashed().labeled("P2"));
        chart.legend = true;
        let frame = PlotFrame::for_chart(&chart, 400.0, 300.0);
        let doc = render(&chart, &frame);
        assert!(doc.starts_with("<svg"));
        assert!(doc.trim_end().ends_with("</svg>"));
        assert!(doc.contains("P1 &amp; P2"));
        assert!(doc.contains("stroke-dasharray=\"6,4\""));
        assert!(doc.contains("#800080"));
    }
}
