pub mod assumptions;
pub mod cashflow;
pub mod comparison;
pub mod cost_stack;
pub mod engine;
pub mod program;
pub mod scenario;
pub mod sensitivity;
pub mod totals;
pub mod validation;

pub use assumptions::ProFormaAssumptions;
pub use engine::{compute_pro_forma, run_pro_forma, ProFormaOutputs};
