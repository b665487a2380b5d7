use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::chart::{Chart, ChartError};
use crate::config::{Config, ConfigError};
use crate::friction::{
    self, colebrook_residual, compute_moody, moody_chart, FlowRegime, FrictionError,
    FrictionModel,
};
use crate::i18n::Translator;
use crate::piston::{self, PistonError, PistonTrajectory};
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(ConfigError),
    /// 마찰계수 계산 오류
    Friction(FrictionError),
    /// 피스톤 적분 오류
    Piston(PistonError),
    /// 그래프 저장 오류
    Chart(ChartError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "입출력 오류: {e}"),
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::Friction(e) => write!(f, "마찰계수 계산 오류: {e}"),
            AppError::Piston(e) => write!(f, "피스톤 계산 오류: {e}"),
            AppError::Chart(e) => write!(f, "그래프 저장 오류: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<FrictionError> for AppError {
    fn from(value: FrictionError) -> Self {
        AppError::Friction(value)
    }
}

impl From<PistonError> for AppError {
    fn from(value: PistonError) -> Self {
        AppError::Piston(value)
    }
}

impl From<ChartError> for AppError {
    fn from(value: ChartError) -> Self {
        AppError::Chart(value)
    }
}

/// CLI 하위 명령.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 한 점의 Darcy 마찰계수를 계산한다
    Friction {
        /// 레이놀즈수
        #[arg(long)]
        re: f64,
        /// 상대 조도 ε/d
        #[arg(long, default_value_t = 0.0)]
        rr: f64,
        /// Re와 무관하게 층류식(64/Re)을 쓴다
        #[arg(long, conflicts_with = "colebrook")]
        laminar: bool,
        /// Re와 무관하게 Colebrook 식을 쓴다
        #[arg(long)]
        colebrook: bool,
    },
    /// 무디 선도를 그린다
    Moody {
        /// 운전점 레이놀즈수
        #[arg(long)]
        point_re: Option<f64>,
        /// 운전점 마찰계수. 생략하면 --point-rr로 계산한다
        #[arg(long, requires = "point_re")]
        point_f: Option<f64>,
        /// 운전점 마찰계수 계산에 쓸 상대 조도
        #[arg(long, default_value_t = 0.0)]
        point_rr: f64,
        /// 출력 디렉터리 (기본: 설정의 output_dir)
        #[arg(long)]
        out: Option<PathBuf>,
        /// PNG도 함께 저장
        #[arg(long)]
        png: bool,
    },
    /// 유압 피스톤 응답을 적분하고 그래프를 그린다
    Piston {
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        png: bool,
        /// 샘플링된 상태 이력을 표로 출력
        #[arg(long)]
        table: bool,
    },
}

/// 한 점 마찰계수 계산 결과.
#[derive(Debug, Clone)]
pub struct FrictionReport {
    pub re: f64,
    pub rr: f64,
    pub model: FrictionModel,
    pub regime: FlowRegime,
    pub friction_factor: f64,
    /// Colebrook 식을 쓴 경우의 잔차
    pub residual: Option<f64>,
}

/// 계산식을 강제하지 않으면 Re에 따라 고른다.
pub fn friction_report(
    re: f64,
    rr: f64,
    forced: Option<FrictionModel>,
) -> Result<FrictionReport, AppError> {
    let (f, model) = match forced {
        Some(model) => (friction::friction_factor(re, rr, model)?, model),
        None => friction::auto_friction_factor(re, rr)?,
    };
    let residual = (model == FrictionModel::Colebrook).then(|| colebrook_residual(f, re, rr));
    Ok(FrictionReport {
        re,
        rr,
        model,
        regime: FlowRegime::classify(re),
        friction_factor: f,
        residual,
    })
}

/// 설정대로 무디 선도를 계산해 조립한다.
pub fn build_moody_chart(
    cfg: &Config,
    point: Option<(f64, f64)>,
    tr: &Translator,
) -> Result<Chart, AppError> {
    let data = compute_moody(&cfg.moody, cfg.solver.root_options())?;
    Ok(moody_chart(&data, &cfg.moody, point, tr))
}

/// 피스톤을 적분하고 속도/압력 그래프를 만든다.
pub fn build_piston_charts(
    cfg: &Config,
    tr: &Translator,
) -> Result<(PistonTrajectory, Chart, Chart), AppError> {
    let traj = piston::simulate(&cfg.piston, cfg.solver.ode_options())?;
    let velocity = piston::velocity_chart(&traj, tr);
    let pressure = piston::pressure_chart(&traj, tr);
    Ok((traj, velocity, pressure))
}

/// `dir/stem.svg`(및 PNG)로 저장하고 기록한 경로를 돌려준다.
pub fn write_chart(chart: &Chart, dir: &Path, stem: &str, png: bool) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    let svg_path = dir.join(format!("{stem}.svg"));
    chart.save_svg(&svg_path)?;
    written.push(svg_path);
    if png {
        let png_path = dir.join(format!("{stem}.png"));
        chart.save_png(&png_path)?;
        written.push(png_path);
    }
    for path in &written {
        log::info!("wrote {}", path.display());
    }
    Ok(written)
}

/// 하위 명령 하나를 실행한다.
pub fn run(command: Command, cfg: &Config, tr: &Translator) -> Result<(), AppError> {
    match command {
        Command::Friction {
            re,
            rr,
            laminar,
            colebrook,
        } => {
            let forced = if laminar {
                Some(FrictionModel::Laminar)
            } else if colebrook {
                Some(FrictionModel::Colebrook)
            } else {
                None
            };
            let report = friction_report(re, rr, forced)?;
            ui_cli::print_friction_report(tr, &report);
        }
        Command::Moody {
            point_re,
            point_f,
            point_rr,
            out,
            png,
        } => {
            let point = match (point_re, point_f) {
                (Some(re), Some(f)) => Some((re, f)),
                (Some(re), None) => {
                    let report = friction_report(re, point_rr, None)?;
                    ui_cli::print_friction_report(tr, &report);
                    Some((re, report.friction_factor))
                }
                _ => None,
            };
            let chart = build_moody_chart(cfg, point, tr)?;
            let dir = out.unwrap_or_else(|| PathBuf::from(&cfg.output_dir));
            let written = write_chart(&chart, &dir, "moody", png)?;
            ui_cli::print_written(tr, &written);
        }
        Command::Piston { out, png, table } => {
            let (traj, velocity, pressure) = build_piston_charts(cfg, tr)?;
            if table {
                ui_cli::print_trajectory_table(tr, &traj);
            }
            ui_cli::print_piston_summary(tr, &cfg.piston.params, &traj);
            let dir = out.unwrap_or_else(|| PathBuf::from(&cfg.output_dir));
            let mut written = write_chart(&velocity, &dir, "piston_velocity", png)?;
            written.extend(write_chart(&pressure, &dir, "piston_pressures", png)?);
            ui_cli::print_written(tr, &written);
        }
    }
    Ok(())
}
