mod csv_parser;
mod json_parser;

pub use csv_parser::*;
pub use json_parser::*;

use crate::{data_definition::DataDefinition, dataset::Dataset, error::Result};

pub trait TableParser {
    fn parse_table(&self, input: &str, definition: DataDefinition) -> Result<Dataset>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Guess the format from a file name, falling back to CSV.
    pub fn from_path(path: &str) -> DataFormat {
        if path.to_ascii_lowercase().ends_with(".json") {
            DataFormat::Json
        } else {
            DataFormat::Csv
        }
    }

    pub fn parser(&self) -> Box<dyn TableParser> {
        match self {
            DataFormat::Csv => Box::<CsvParser>::default(),
            DataFormat::Json => Box::<JsonRecordsParser>::default(),
        }
    }
}
