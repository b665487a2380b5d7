use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::friction::MoodySettings;
use crate::numerics::{OdeOptions, RootOptions};
use crate::piston::PistonSettings;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 수치 해법 허용오차 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub root_xtol: f64,
    pub root_max_iter: usize,
    pub ode_rtol: f64,
    pub ode_atol: f64,
    pub ode_min_step: f64,
    /// 출력 구간당 최대 스텝 수
    pub ode_max_steps: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        let root = RootOptions::default();
        let ode = OdeOptions::default();
        Self {
            root_xtol: root.xtol,
            root_max_iter: root.max_iter,
            ode_rtol: ode.rtol,
            ode_atol: ode.atol,
            ode_min_step: ode.min_step,
            ode_max_steps: ode.max_steps,
        }
    }
}

impl SolverSettings {
    pub fn root_options(&self) -> RootOptions {
        RootOptions {
            xtol: self.root_xtol,
            max_iter: self.root_max_iter,
        }
    }

    pub fn ode_options(&self) -> OdeOptions {
        OdeOptions {
            rtol: self.ode_rtol,
            atol: self.ode_atol,
            min_step: self.ode_min_step,
            max_steps: self.ode_max_steps,
            first_step: None,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UI 언어 코드 (auto/ko/en)
    pub language: String,
    /// 그래프 파일 출력 디렉터리
    pub output_dir: String,
    pub moody: MoodySettings,
    pub piston: PistonSettings,
    pub solver: SolverSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            output_dir: ".".to_string(),
            moody: MoodySettings::default(),
            piston: PistonSettings::default(),
            solver: SolverSettings::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// 기본 경로(config.toml)의 설정을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_default_from(Path::new(DEFAULT_CONFIG_PATH))
}

/// 지정한 경로의 설정을 로드한다. 파일이 없으면 기본 설정을 그 경로에 저장하고 돌려준다.
pub fn load_or_default_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        log::debug!("loaded config from {}", path.display());
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        log::info!("created default config at {}", path.display());
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 지정한 경로에 저장한다.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)
    }
}
