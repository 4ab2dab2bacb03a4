//! Compiled column mapping
//!
//! [`ColumnMapping`] is built once from [`TransformConfig`] and then applied to
//! every record element. Each column value goes through the same pipeline:
//!
//! 1. Select raw values with the column's selectors
//! 2. Normalize whitespace (and optionally strip markup)
//! 3. Substitute the column default when nothing non-empty was found
//! 4. Truncate to `max_length` characters

use super::builtin;
use super::document::Element;
use super::selector::Path;
use crate::config::{ColumnConfig, Normalize, SelectorConfig, TransformConfig};
use crate::domain::context::RunContext;
use crate::domain::errors::RelayError;
use crate::domain::record::Record;
use crate::domain::result::Result;
use chrono::format::{Item, StrftimeItems};
use regex::Regex;

#[derive(Debug, Clone)]
enum Mode {
    First,
    Join(String),
    Contains(String),
}

#[derive(Debug, Clone)]
struct Selector {
    path: Path,
    mode: Mode,
}

#[derive(Debug, Clone)]
enum Kind {
    Extract(Vec<Selector>),
    Constant(String),
    Timestamp(String),
}

#[derive(Debug, Clone)]
struct ColumnRule {
    name: String,
    kind: Kind,
    default: String,
    normalize: Normalize,
    max_length: Option<usize>,
}

/// Record layout plus per-column extraction rules
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    container: Vec<String>,
    record_tag: String,
    rules: Vec<ColumnRule>,
    markup: Regex,
}

impl ColumnMapping {
    /// Compiles a mapping from configuration
    ///
    /// An empty column list selects the built-in partner mapping.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Configuration`] for unparsable selector paths,
    /// invalid timestamp formats or columns without a value rule.
    pub fn from_config(config: &TransformConfig) -> Result<Self> {
        let columns = if config.columns.is_empty() {
            builtin::partner_columns()
        } else {
            config.columns.clone()
        };

        let rules = columns
            .iter()
            .map(compile_column)
            .collect::<Result<Vec<_>>>()?;

        let markup = Regex::new(r"<[^>]*>")
            .map_err(|e| RelayError::Other(format!("invalid markup pattern: {e}")))?;

        Ok(Self {
            container: config
                .container_path
                .split('/')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            record_tag: config.record_tag.trim().to_string(),
            rules,
            markup,
        })
    }

    /// Element names from the document root down to the record container
    pub fn container(&self) -> &[String] {
        &self.container
    }

    /// Element name of a record
    pub fn record_tag(&self) -> &str {
        &self.record_tag
    }

    /// Header row
    pub fn columns(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.name.clone()).collect()
    }

    /// Builds one output row from a record element
    ///
    /// Never fails: missing fields become the column default.
    pub fn apply(&self, record: &Element, context: &RunContext) -> Record {
        Record::new(
            self.rules
                .iter()
                .map(|rule| self.column_value(rule, record, context))
                .collect(),
        )
    }

    fn column_value(&self, rule: &ColumnRule, record: &Element, context: &RunContext) -> String {
        let value = match &rule.kind {
            Kind::Constant(value) => value.clone(),
            Kind::Timestamp(format) => context.started_at.format(format).to_string(),
            Kind::Extract(selectors) => selectors
                .iter()
                .map(|selector| self.select(selector, record, rule.normalize))
                .find(|value| !value.is_empty())
                .unwrap_or_default(),
        };

        let value = if value.is_empty() {
            rule.default.clone()
        } else {
            value
        };

        match rule.max_length {
            Some(max) if value.chars().count() > max => value.chars().take(max).collect(),
            _ => value,
        }
    }

    fn select(&self, selector: &Selector, record: &Element, normalize: Normalize) -> String {
        let mut values = selector
            .path
            .select(record)
            .into_iter()
            .map(|raw| self.normalize(&raw, normalize))
            .filter(|value| !value.is_empty());

        match &selector.mode {
            Mode::First => values.next().unwrap_or_default(),
            Mode::Join(separator) => values.collect::<Vec<_>>().join(separator),
            Mode::Contains(needle) => values
                .find(|v| v.contains(needle.as_str()))
                .unwrap_or_default(),
        }
    }

    fn normalize(&self, raw: &str, normalize: Normalize) -> String {
        match normalize {
            Normalize::Trim => raw.trim().to_string(),
            Normalize::Collapse => collapse(raw),
            Normalize::StripMarkup => collapse(&self.markup.replace_all(raw, " ")),
        }
    }
}

fn collapse(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compile_column(column: &ColumnConfig) -> Result<ColumnRule> {
    let kind = if let Some(value) = &column.constant {
        Kind::Constant(value.clone())
    } else if let Some(format) = &column.timestamp {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(RelayError::Configuration(format!(
                "column '{}': invalid timestamp format '{format}'",
                column.name
            )));
        }
        Kind::Timestamp(format.clone())
    } else if !column.sources.is_empty() {
        Kind::Extract(
            column
                .sources
                .iter()
                .map(|source| compile_selector(&column.name, source))
                .collect::<Result<Vec<_>>>()?,
        )
    } else {
        return Err(RelayError::Configuration(format!(
            "column '{}' has no sources, constant or timestamp",
            column.name
        )));
    };

    Ok(ColumnRule {
        name: column.name.clone(),
        kind,
        default: column.default.clone(),
        normalize: column.normalize,
        max_length: column.max_length,
    })
}

fn compile_selector(column: &str, source: &SelectorConfig) -> Result<Selector> {
    let path = Path::parse(&source.path)
        .map_err(|e| RelayError::Configuration(format!("column '{column}': {e}")))?;

    let mode = match (&source.join, &source.contains) {
        (Some(separator), None) => Mode::Join(separator.clone()),
        (None, Some(needle)) => Mode::Contains(needle.clone()),
        (None, None) => Mode::First,
        (Some(_), Some(_)) => {
            return Err(RelayError::Configuration(format!(
                "column '{column}': a source cannot set both join and contains"
            )));
        }
    };

    Ok(Selector { path, mode })
}
