//! 그래프 조립/저장과 설정 파일 왕복 테스트.
use std::fs;

use hydraulics_toolbox::{
    app,
    chart::{svg, LineStyle, PlotFrame},
    config::{self, Config},
    i18n::Translator,
};

fn temp_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("hydraulics_toolbox_{name}_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

#[test]
fn moody_chart_has_all_curves_and_labels() {
    let tr = Translator::new("en");
    let cfg = Config::default();
    let chart = app::build_moody_chart(&cfg, Some((1.0e5, 0.02)), &tr).expect("moody chart");
    // 층류 + 천이 + 조도별 난류 곡선
    assert_eq!(chart.series.len(), 2 + cfg.moody.roughness.len());
    assert_eq!(chart.series[1].style, LineStyle::Dashed);
    assert_eq!(chart.annotations.len(), cfg.moody.roughness.len());
    assert_eq!(chart.markers.len(), 1);

    let doc = svg::render(&chart, &PlotFrame::for_chart(&chart, 1000.0, 700.0));
    assert!(doc.starts_with("<svg") || doc.starts_with("<?xml"));
    assert!(doc.contains("Moody Chart"));
    assert!(doc.contains("0.008"));
}

#[test]
fn piston_charts_are_written_to_disk() {
    let tr = Translator::new("en");
    let cfg = Config::default();
    let (traj, velocity, pressure) = app::build_piston_charts(&cfg, &tr).expect("piston charts");
    assert_eq!(velocity.series[0].xs.len(), traj.times.len());
    assert_eq!(pressure.legend_entries().len(), 2);

    let dir = temp_dir("charts");
    let written = app::write_chart(&pressure, &dir, "piston_pressures", true).expect("write");
    assert_eq!(written.len(), 2);
    let svg_text = fs::read_to_string(&written[0]).expect("read svg");
    assert!(svg_text.contains("P1 and P2 vs Time"));
    assert!(fs::metadata(&written[1]).expect("png").len() > 0);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn config_is_created_then_reloaded() {
    let dir = temp_dir("config");
    let path = dir.join("config.toml");
    let _ = fs::remove_file(&path);

    let created = config::load_or_default_from(&path).expect("create");
    assert!(path.exists());
    assert_eq!(created.piston.samples, 200);

    let mut edited = created.clone();
    edited.language = "en".to_string();
    edited.piston.end_time = 0.01;
    edited.moody.roughness = vec![0.0, 1e-4];
    edited.save_to(&path).expect("save");

    let loaded = config::load_or_default_from(&path).expect("reload");
    assert_eq!(loaded.language, "en");
    assert_eq!(loaded.piston.end_time, 0.01);
    assert_eq!(loaded.moody.roughness, vec![0.0, 1e-4]);
    assert_eq!(loaded.solver.root_max_iter, created.solver.root_max_iter);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn partial_config_falls_back_to_defaults() {
    let cfg: Config = toml::from_str("language = \"ko\"\n[piston]\nsamples = 50\n").expect("parse");
    assert_eq!(cfg.language, "ko");
    assert_eq!(cfg.piston.samples, 50);
    assert_eq!(cfg.piston.end_time, 0.02);
    assert_eq!(cfg.moody.roughness.len(), 20);
}
