//! 범용 수치 루틴 모음. (격자 생성, 근 찾기, 상미분방정식 적분)

pub mod grid;
pub mod ode;
pub mod root;

pub use grid::{geomspace, linspace, logspace};
pub use ode::{integrate, OdeError, OdeOptions, OdeSolution, OdeStats};
pub use root::{newton_fdiff, RootError, RootOptions, RootResult};
