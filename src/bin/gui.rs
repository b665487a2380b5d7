#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 그래프 창 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{env, fs, path::Path, path::PathBuf};
use hydraulics_toolbox::{
    app,
    chart::{self, Chart, LineStyle, MarkerShape, PlotFrame, Rgb},
    config, i18n,
    i18n::keys,
    logging,
};

fn main() -> Result<(), eframe::Error> {
    // CLI 옵션 처리: --lang xx / --lang=xx, --config 경로
    let mut cli_lang: Option<String> = None;
    let mut config_path = PathBuf::from(config::DEFAULT_CONFIG_PATH);
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if let Some(val) = a.strip_prefix("--config=") {
            config_path = PathBuf::from(val);
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        } else if a == "--config" && i + 1 < args.len() {
            config_path = PathBuf::from(&args[i + 1]);
            i += 1;
        }
        i += 1;
    }
    logging::init_logging(0);

    let app_cfg = config::load_or_default_from(&config_path).unwrap_or_else(|e| {
        log::warn!("config load failed, using defaults: {e}");
        config::Config::default()
    });
    let lang = i18n::resolve_language(
        cli_lang.as_deref().unwrap_or("auto"),
        Some(app_cfg.language.as_str()),
    );
    let tr = i18n::Translator::new_with_pack(&lang, None);

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([1100.0, 780.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        &tr.t(keys::APP_TITLE),
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                log::warn!("font setup: {e}");
            }
            Box::new(GuiApp::new(app_cfg, tr))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 공통: 바이너리 폰트 바이트를 egui 기본 폰트 뒤의 대체 폰트로 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(font_name.clone());
    }
    ctx.set_fonts(fonts);
}

/// 한글 라벨을 위해 프로젝트/시스템 폰트를 찾아 등록한다. 못 찾으면 기본 폰트를 유지한다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<PathBuf> = vec![
        PathBuf::from("assets/fonts/malgun.ttf"),
        PathBuf::from("/usr/share/fonts/truetype/nanum/NanumGothic.ttf"),
        PathBuf::from("/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc"),
        PathBuf::from("/System/Library/Fonts/AppleSDGothicNeo.ttc"),
    ];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.insert(1, fonts.join("malgun.ttf"));
        candidates.insert(2, fonts.join("gulim.ttc"));
    }
    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font file ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("Korean font not found; labels fall back to the default font.".into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Moody,
    Velocity,
    Pressure,
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    tab: Tab,
    show_point: bool,
    point_re: f64,
    point_rr: f64,
    point_f: Option<f64>,
    moody: Option<Chart>,
    velocity: Option<Chart>,
    pressure: Option<Chart>,
    status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config, tr: i18n::Translator) -> Self {
        let mut app = Self {
            config,
            tr,
            tab: Tab::Moody,
            show_point: false,
            point_re: 1.0e5,
            point_rr: 1.0e-4,
            point_f: None,
            moody: None,
            velocity: None,
            pressure: None,
            status: None,
        };
        app.recompute_moody();
        app.recompute_piston();
        app
    }

    fn recompute_moody(&mut self) {
        let point = if self.show_point {
            match app::friction_report(self.point_re, self.point_rr, None) {
                Ok(report) => Some((self.point_re, report.friction_factor)),
                Err(e) => {
                    self.status = Some(format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)));
                    None
                }
            }
        } else {
            None
        };
        self.point_f = point.map(|(_, f)| f);
        match app::build_moody_chart(&self.config, point, &self.tr) {
            Ok(chart) => self.moody = Some(chart),
            Err(e) => self.status = Some(format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX))),
        }
    }

    fn recompute_piston(&mut self) {
        match app::build_piston_charts(&self.config, &self.tr) {
            Ok((_, velocity, pressure)) => {
                self.velocity = Some(velocity);
                self.pressure = Some(pressure);
            }
            Err(e) => self.status = Some(format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX))),
        }
    }

    fn current_chart(&self) -> Option<&Chart> {
        match self.tab {
            Tab::Moody => self.moody.as_ref(),
            Tab::Velocity => self.velocity.as_ref(),
            Tab::Pressure => self.pressure.as_ref(),
        }
    }

    fn file_stem(&self) -> &'static str {
        match self.tab {
            Tab::Moody => "moody",
            Tab::Velocity => "piston_velocity",
            Tab::Pressure => "piston_pressures",
        }
    }

    fn save_current(&mut self, png: bool) {
        let Some(chart) = self.current_chart() else {
            return;
        };
        let (label, ext) = if png { ("PNG", "png") } else { ("SVG", "svg") };
        let Some(path) = FileDialog::new()
            .add_filter(label, &[ext])
            .set_file_name(format!("{}.{ext}", self.file_stem()))
            .save_file()
        else {
            return;
        };
        let res = if png {
            chart.save_png(&path)
        } else {
            chart.save_svg(&path)
        };
        self.status = Some(match res {
            Ok(()) => format!("{} {}", self.tr.t(keys::GUI_SAVED), path.display()),
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }

    fn ui_moody_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut changed = ui
                .checkbox(&mut self.show_point, self.tr.t(keys::GUI_SHOW_POINT))
                .changed();
            ui.add_enabled_ui(self.show_point, |ui| {
                changed |= ui
                    .add(
                        egui::Slider::new(&mut self.point_re, 600.0..=1.0e8)
                            .logarithmic(true)
                            .text("Re"),
                    )
                    .changed();
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut self.point_rr)
                            .speed(1e-5)
                            .clamp_range(0.0..=0.05)
                            .prefix("ε/d = "),
                    )
                    .changed();
            });
            if let Some(f) = self.point_f {
                ui.label(format!("f = {f:.5}"));
            }
            if changed {
                self.recompute_moody();
            }
        });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.tr.t(keys::APP_TITLE));
                ui.separator();
                ui.selectable_value(&mut self.tab, Tab::Moody, self.tr.t(keys::TAB_MOODY));
                ui.selectable_value(&mut self.tab, Tab::Velocity, self.tr.t(keys::TAB_VELOCITY));
                ui.selectable_value(&mut self.tab, Tab::Pressure, self.tr.t(keys::TAB_PRESSURE));
                ui.separator();
                if ui.button(self.tr.t(keys::GUI_SAVE_SVG)).clicked() {
                    self.save_current(false);
                }
                if ui.button(self.tr.t(keys::GUI_SAVE_PNG)).clicked() {
                    self.save_current(true);
                }
                if ui.button(self.tr.t(keys::GUI_RECOMPUTE)).clicked() {
                    self.recompute_moody();
                    self.recompute_piston();
                }
            });
            if self.tab == Tab::Moody {
                self.ui_moody_controls(ui);
            }
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.status.as_deref().unwrap_or(""));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(chart) = self.current_chart() {
                paint_chart(ui, chart);
            }
        });
    }
}

fn color(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.0, c.1, c.2)
}

/// 공유 배치(`PlotFrame`)로 그래프를 egui 페인터에 그린다. 마우스 위치의 데이터 좌표를 함께 표시한다.
fn paint_chart(ui: &mut egui::Ui, chart: &Chart) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
    let rect = response.rect;
    let frame = PlotFrame::for_chart(chart, rect.width() as f64, rect.height() as f64);
    let pos = |x: f64, y: f64| egui::pos2(rect.left() + x as f32, rect.top() + y as f32);
    let plot_rect = egui::Rect::from_min_max(pos(frame.left, frame.top), pos(frame.right, frame.bottom));
    let black = egui::Color32::BLACK;
    let grid = |major: bool| {
        let alpha = if major { 128 } else { 64 };
        egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(176, 176, 176, alpha))
    };
    let tick_font = egui::FontId::proportional(12.0);

    painter.rect_filled(rect, 0.0, egui::Color32::WHITE);

    for tick in chart::scale::ticks(&chart.x_axis) {
        let x = frame.x_px(tick.value);
        if !x.is_finite() {
            continue;
        }
        if tick.major || chart.minor_grid {
            painter.line_segment([pos(x, frame.top), pos(x, frame.bottom)], grid(tick.major));
        }
        let len = if tick.major { 6.0 } else { 3.0 };
        let stroke = egui::Stroke::new(1.0, black);
        painter.line_segment([pos(x, frame.bottom), pos(x, frame.bottom - len)], stroke);
        painter.line_segment([pos(x, frame.top), pos(x, frame.top + len)], stroke);
        if let Some(label) = &tick.label {
            painter.text(pos(x, frame.bottom + 6.0), egui::Align2::CENTER_TOP, label, tick_font.clone(), black);
        }
    }
    for tick in chart::scale::ticks(&chart.y_axis) {
        let y = frame.y_px(tick.value);
        if !y.is_finite() {
            continue;
        }
        if tick.major || chart.minor_grid {
            painter.line_segment([pos(frame.left, y), pos(frame.right, y)], grid(tick.major));
        }
        let len = if tick.major { 6.0 } else { 3.0 };
        let stroke = egui::Stroke::new(1.0, black);
        painter.line_segment([pos(frame.left, y), pos(frame.left + len, y)], stroke);
        painter.line_segment([pos(frame.right, y), pos(frame.right - len, y)], stroke);
        if let Some(label) = &tick.label {
            painter.text(pos(frame.left - 8.0, y), egui::Align2::RIGHT_CENTER, label, tick_font.clone(), black);
        }
    }

    let clipped = painter.with_clip_rect(plot_rect);
    for series in &chart.series {
        let pts: Vec<egui::Pos2> = series
            .points()
            .filter_map(|(x, y)| frame.to_px(x, y))
            .map(|(x, y)| pos(x, y))
            .collect();
        let stroke = egui::Stroke::new(series.width as f32, color(series.color));
        match series.style {
            LineStyle::Solid => {
                clipped.add(egui::Shape::line(pts, stroke));
            }
            LineStyle::Dashed => {
                clipped.extend(egui::Shape::dashed_line(&pts, stroke, 6.0, 4.0));
            }
        }
    }

    for m in &chart.markers {
        let Some((cx, cy)) = frame.to_px(m.x, m.y) else {
            continue;
        };
        let stroke = egui::Stroke::new(1.5, color(m.edge));
        let r = (m.size / 2.0) as f32;
        match m.shape {
            MarkerShape::Circle => {
                painter.circle_stroke(pos(cx, cy), r, stroke);
            }
            MarkerShape::Triangle => {
                let p = chart::svg::triangle_points(cx, cy, m.size / 2.0);
                painter.add(egui::Shape::closed_line(
                    p.iter().map(|&(x, y)| pos(x, y)).collect(),
                    stroke,
                ));
            }
        }
    }

    painter.rect_stroke(plot_rect, 0.0, egui::Stroke::new(1.0, black));

    let center_x = (frame.left + frame.right) / 2.0;
    painter.text(pos(center_x, 8.0), egui::Align2::CENTER_TOP, &chart.title, egui::FontId::proportional(18.0), black);
    painter.text(
        pos(center_x, frame.height - 8.0),
        egui::Align2::CENTER_BOTTOM,
        &chart.x_axis.label,
        egui::FontId::proportional(14.0),
        black,
    );
    // 세로 라벨 대신 플롯 왼쪽 위에 가로로 쓴다
    painter.text(
        pos(frame.left, frame.top - 6.0),
        egui::Align2::LEFT_BOTTOM,
        &chart.y_axis.label,
        egui::FontId::proportional(13.0),
        black,
    );
    if let Some(label) = &chart.right_label {
        painter.text(
            pos(frame.width - 6.0, frame.top - 6.0),
            egui::Align2::RIGHT_BOTTOM,
            label,
            egui::FontId::proportional(13.0),
            black,
        );
    }
    for a in &chart.annotations {
        if let Some((x, y)) = frame.to_px(a.x, a.y) {
            painter.text(pos(x + 4.0, y), egui::Align2::LEFT_CENTER, &a.text, egui::FontId::proportional(10.0), black);
        }
    }

    if chart.legend {
        let entries = chart.legend_entries();
        let x0 = frame.right - 120.0;
        let mut y = frame.top + 16.0;
        for (label, c, style) in entries {
            let stroke = egui::Stroke::new(1.5, color(c));
            let a = pos(x0, y);
            let b = pos(x0 + 30.0, y);
            match style {
                LineStyle::Solid => {
                    painter.line_segment([a, b], stroke);
                }
                LineStyle::Dashed => {
                    painter.extend(egui::Shape::dashed_line(&[a, b], stroke, 6.0, 4.0));
                }
            }
            painter.text(pos(x0 + 38.0, y), egui::Align2::LEFT_CENTER, label, tick_font.clone(), black);
            y += 20.0;
        }
    }

    if let Some(hover) = response.hover_pos() {
        let (px, py) = ((hover.x - rect.left()) as f64, (hover.y - rect.top()) as f64);
        if frame.contains(px, py) {
            let (x, y) = frame.to_data(px, py);
            painter.text(
                pos(frame.right, frame.bottom + 24.0),
                egui::Align2::RIGHT_TOP,
                format!("x = {x:.4e}, y = {y:.4e}"),
                tick_font,
                egui::Color32::DARK_GRAY,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_follows_tab() {
        let mut app = GuiApp::new(config::Config::default(), i18n::Translator::new("en"));
        assert_eq!(app.file_stem(), "moody");
        app.tab = Tab::Pressure;
        assert_eq!(app.file_stem(), "piston_pressures");
        assert!(app.current_chart().is_some());
    }

    #[test]
    fn operating_point_updates_friction_readout() {
        let mut app = GuiApp::new(config::Config::default(), i18n::Translator::new("en"));
        app.show_point = true;
        app.point_re = 3000.0;
        app.recompute_moody();
        let chart = app.moody.as_ref().unwrap();
        assert_eq!(chart.markers.len(), 1);
        assert_eq!(chart.markers[0].shape, MarkerShape::Triangle);
        assert!(app.point_f.unwrap() > 0.0);
    }
}
