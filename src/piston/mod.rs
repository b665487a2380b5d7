//! 유압 피스톤 운동방정식 적분과 결과 그래프.

pub mod hydraulic_piston;
pub mod plots;

pub use hydraulic_piston::*;
pub use plots::{pressure_chart, velocity_chart};
