mod error_bias_table;
mod error_distribution;
mod legacy_metric;
mod predicted_vs_actual;

pub use error_bias_table::*;
pub use error_distribution::*;
pub use legacy_metric::*;
pub use predicted_vs_actual::*;
