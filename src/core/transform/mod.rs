//! XML to CSV transformation
//!
//! The transform is a pure function of the input bytes, the compiled column
//! mapping and the run context. It never touches the network or the file
//! system, so it can be tested and run locally (`xmlrelay convert`).
//!
//! - [`document`]: owned XML element tree
//! - [`selector`]: record-relative paths
//! - [`mapping`]: per-column extraction rules
//! - [`builtin`]: the partner programme mapping
//! - [`extract`]: XML document to [`OutputTable`]
//! - [`serialize`]: [`OutputTable`] to CSV bytes
//!
//! # Examples
//!
//! ```
//! use xmlrelay::config::{ColumnConfig, CsvConfig, TransformConfig};
//! use xmlrelay::core::transform::Transformer;
//! use xmlrelay::domain::RunContext;
//!
//! # fn example() -> xmlrelay::domain::Result<()> {
//! let transform = TransformConfig {
//!     container_path: "orders".to_string(),
//!     record_tag: "order".to_string(),
//!     columns: vec![
//!         ColumnConfig::field("id", "@id"),
//!         ColumnConfig::field("amount", "amount"),
//!     ],
//! };
//! let transformer = Transformer::new(&transform, &CsvConfig::default())?;
//!
//! let xml = br#"<orders><order id="1"><amount>10,50</amount></order><order id="2"/></orders>"#;
//! let output = transformer.transform(xml, &RunContext::start())?;
//! assert_eq!(output.csv, b"id,amount\n1,\"10,50\"\n2,\n");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod builtin;
pub mod document;
pub mod extract;
pub mod mapping;
pub mod selector;
pub mod serialize;

pub use extract::extract_records;
pub use mapping::ColumnMapping;
pub use serialize::write_csv;

use crate::config::{CsvConfig, TransformConfig};
use crate::domain::context::RunContext;
use crate::domain::record::OutputTable;
use crate::domain::result::Result;

/// Result of transforming one document
#[derive(Debug, Clone)]
pub struct Transformed {
    /// Extracted rows
    pub table: OutputTable,
    /// Rendered CSV
    pub csv: Vec<u8>,
}

impl Transformed {
    /// Number of data rows
    pub fn record_count(&self) -> usize {
        self.table.len()
    }
}

/// Compiled extractor plus serializer settings
#[derive(Debug, Clone)]
pub struct Transformer {
    mapping: ColumnMapping,
    csv: CsvConfig,
}

impl Transformer {
    /// Compiles the column mapping
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the mapping cannot be compiled.
    pub fn new(transform: &TransformConfig, csv: &CsvConfig) -> Result<Self> {
        Ok(Self {
            mapping: ColumnMapping::from_config(transform)?,
            csv: csv.clone(),
        })
    }

    /// Column mapping in use
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Extracts records and renders them as CSV
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::RelayError::MalformedInput`] for unparsable XML.
    /// Nothing is rendered in that case.
    pub fn transform(&self, input: &[u8], context: &RunContext) -> Result<Transformed> {
        let table = extract_records(input, &self.mapping, context)?;
        let csv = write_csv(&table, &self.csv)?;
        Ok(Transformed { table, csv })
    }
}
