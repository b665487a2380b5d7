//! 관마찰계수 계산과 무디 선도 작성.

pub mod friction_factor;
pub mod moody;

pub use friction_factor::*;
pub use moody::{compute_moody, moody_chart, MoodyChartData, MoodySettings};
