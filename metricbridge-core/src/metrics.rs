mod error_bias_table;
mod error_distribution;
mod legacy_calculation;
mod mae;
mod metric;
mod predicted_vs_actual;

pub use error_bias_table::*;
pub use error_distribution::*;
pub use legacy_calculation::*;
pub use mae::*;
pub use metric::*;
pub use predicted_vs_actual::*;
