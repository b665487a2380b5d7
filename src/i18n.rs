use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_TITLE: &str = "general.app_title";

    pub const MOODY_TITLE: &str = "moody.title";
    pub const MOODY_X_LABEL: &str = "moody.x_label";
    pub const MOODY_Y_LABEL: &str = "moody.y_label";
    pub const MOODY_ROUGHNESS_LABEL: &str = "moody.roughness_label";
    pub const MOODY_POINT_LABEL: &str = "moody.point_label";

    pub const PISTON_VELOCITY_TITLE: &str = "piston.velocity_title";
    pub const PISTON_VELOCITY_Y_LABEL: &str = "piston.velocity_y_label";
    pub const PISTON_PRESSURE_TITLE: &str = "piston.pressure_title";
    pub const PISTON_PRESSURE_Y_LABEL: &str = "piston.pressure_y_label";
    pub const TIME_LABEL: &str = "piston.time_label";

    pub const TAB_MOODY: &str = "tab.moody";
    pub const TAB_VELOCITY: &str = "tab.velocity";
    pub const TAB_PRESSURE: &str = "tab.pressure";
    pub const GUI_SHOW_POINT: &str = "gui.show_point";
    pub const GUI_SAVE_SVG: &str = "gui.save_svg";
    pub const GUI_SAVE_PNG: &str = "gui.save_png";
    pub const GUI_RECOMPUTE: &str = "gui.recompute";
    pub const GUI_SAVED: &str = "gui.saved";

    pub const RESULT_FRICTION: &str = "result.friction";
    pub const RESULT_REGIME: &str = "result.regime";
    pub const RESULT_MODEL: &str = "result.model";
    pub const RESULT_RESIDUAL: &str = "result.residual";
    pub const RESULT_WRITTEN: &str = "result.written";
    pub const RESULT_EQUILIBRIUM: &str = "result.equilibrium";
    pub const RESULT_FINAL_STATE: &str = "result.final_state";
    pub const TABLE_HEADER: &str = "result.table_header";

    pub const REGIME_LAMINAR: &str = "regime.laminar";
    pub const REGIME_TRANSITIONAL: &str = "regime.transitional";
    pub const REGIME_TURBULENT: &str = "regime.turbulent";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 번역을 가져온다. 언어팩 값이 있으면 우선하고, 한국어 번역이 없으면 영어로 폴백한다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v.clone();
        }
        let s = match self.lang {
            Language::Ko => ko(key).unwrap_or_else(|| en(key)),
            Language::En => en(key),
        };
        s.to_string()
    }
}

impl Default for Translator {
    fn default() -> Self {
        Translator::new("en")
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko".into()),
        other if other.starts_with("en") => Some("en".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().and_then(|loc| normalize_locale_string(&loc)) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 테이블은 점으로 이은 키로 평탄화한다.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{lang}.toml"));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        APP_TITLE => "수력학 도구상자",
        MOODY_TITLE => "무디 선도",
        MOODY_X_LABEL => "레이놀즈수 Re = Vd/ν",
        MOODY_Y_LABEL => "마찰계수 f = h / ((L/d)·(V²/2g))",
        MOODY_ROUGHNESS_LABEL => "상대 조도 ε/d",
        MOODY_POINT_LABEL => "운전점",
        PISTON_VELOCITY_TITLE => "피스톤 변위 속도 (ẋ)",
        PISTON_VELOCITY_Y_LABEL => "피스톤 속도 (m/s)",
        PISTON_PRESSURE_TITLE => "시간에 따른 P1, P2",
        PISTON_PRESSURE_Y_LABEL => "압력 (Pa)",
        TIME_LABEL => "시간 (s)",
        TAB_MOODY => "무디 선도",
        TAB_VELOCITY => "피스톤 속도",
        TAB_PRESSURE => "피스톤 압력",
        GUI_SHOW_POINT => "운전점 표시",
        GUI_SAVE_SVG => "SVG 저장…",
        GUI_SAVE_PNG => "PNG 저장…",
        GUI_RECOMPUTE => "다시 계산",
        GUI_SAVED => "저장됨:",
        RESULT_FRICTION => "마찰계수 f:",
        RESULT_REGIME => "유동 영역:",
        RESULT_MODEL => "계산식:",
        RESULT_RESIDUAL => "Colebrook 잔차:",
        RESULT_WRITTEN => "파일 저장:",
        RESULT_EQUILIBRIUM => "평형 상태 (압력, 속도):",
        RESULT_FINAL_STATE => "최종 상태:",
        TABLE_HEADER => "t [s]\tx [m]\tẋ [m/s]\tP1 [Pa]\tP2 [Pa]",
        REGIME_LAMINAR => "층류",
        REGIME_TRANSITIONAL => "천이",
        REGIME_TURBULENT => "난류",
        _ => return None,
    })
}

fn en(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "Error",
        APP_TITLE => "Hydraulics Toolbox",
        MOODY_TITLE => "Moody Chart",
        MOODY_X_LABEL => "Reynolds number Re = Vd/ν",
        MOODY_Y_LABEL => "Friction factor f = h / ((L/d)·(V²/2g))",
        MOODY_ROUGHNESS_LABEL => "Relative roughness ε/d",
        MOODY_POINT_LABEL => "Operating point",
        PISTON_VELOCITY_TITLE => "Mechanical Displacement Speed (ẋ)",
        PISTON_VELOCITY_Y_LABEL => "Velocity of Piston (m/s)",
        PISTON_PRESSURE_TITLE => "P1 and P2 vs Time",
        PISTON_PRESSURE_Y_LABEL => "Pressure (Pa)",
        TIME_LABEL => "Time (s)",
        TAB_MOODY => "Moody chart",
        TAB_VELOCITY => "Piston velocity",
        TAB_PRESSURE => "Piston pressures",
        GUI_SHOW_POINT => "Show operating point",
        GUI_SAVE_SVG => "Save SVG…",
        GUI_SAVE_PNG => "Save PNG…",
        GUI_RECOMPUTE => "Recompute",
        GUI_SAVED => "Saved:",
        RESULT_FRICTION => "Friction factor f:",
        RESULT_REGIME => "Flow regime:",
        RESULT_MODEL => "Model:",
        RESULT_RESIDUAL => "Colebrook residual:",
        RESULT_WRITTEN => "Wrote:",
        RESULT_EQUILIBRIUM => "Equilibrium (pressure, velocity):",
        RESULT_FINAL_STATE => "Final state:",
        TABLE_HEADER => "t [s]\tx [m]\txdot [m/s]\tP1 [Pa]\tP2 [Pa]",
        REGIME_LAMINAR => "laminar",
        REGIME_TRANSITIONAL => "transitional",
        REGIME_TURBULENT => "turbulent",
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_falls_back_to_english() {
        let tr = Translator::new("de");
        assert_eq!(tr.language(), Language::En);
        assert_eq!(tr.t(keys::MOODY_TITLE), "Moody Chart");
    }

    #[test]
    fn korean_lookup() {
        let tr = Translator::new("ko-KR");
        assert_eq!(tr.language_code(), "ko");
        assert_eq!(tr.t(keys::REGIME_LAMINAR), "층류");
    }

    #[test]
    fn cli_flag_wins_over_config() {
        assert_eq!(resolve_language("ko", Some("en")), "ko");
        assert_eq!(resolve_language("auto", Some("en-US")), "en");
    }

    #[test]
    fn nested_tables_flatten_to_dotted_keys() {
        let map = parse_toml_to_map("[moody]\ntitle = \"Diagramme\"\n").unwrap();
        assert_eq!(map.get("moody.title").map(String::as_str), Some("Diagramme"));
    }
}
