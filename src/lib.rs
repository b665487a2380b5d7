//! 관마찰계수(무디 선도)와 유압 피스톤 응답 계산을 라이브러리로 분리하여 CLI와 GUI가 함께 쓴다.

pub mod app;
pub mod chart;
pub mod config;
pub mod friction;
pub mod i18n;
pub mod logging;
pub mod numerics;
pub mod piston;
pub mod ui_cli;
