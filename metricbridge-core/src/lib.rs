pub mod config_schema;
pub mod context;
pub mod data_definition;
pub mod dataset;
pub mod error;
pub mod legacy;
pub mod metric_factory;
pub mod metric_registry;
pub mod metrics;
pub mod parsers;
pub mod render;
pub mod report;
pub mod run_config;
pub mod snapshot;

pub mod utils;

pub use data_definition::{DataDefinition, Regression};
pub use dataset::{Column, ColumnType, Dataset};
pub use report::Report;
pub use snapshot::Snapshot;
