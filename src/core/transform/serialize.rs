//! CSV rendering of the output table

use crate::config::{CsvConfig, LineTerminator, QuoteStyle};
use crate::domain::errors::RelayError;
use crate::domain::record::OutputTable;
use crate::domain::result::Result;

/// Renders the table as CSV bytes
///
/// Writes the header followed by one line per record. Fields containing the
/// delimiter, a quote or a line break are quoted with internal quotes doubled,
/// so any standard CSV reader recovers the original values. Output is UTF-8
/// without a byte order mark.
///
/// # Errors
///
/// Returns [`RelayError::Configuration`] for a non-ASCII delimiter and
/// [`RelayError::Serialization`] if the writer fails.
pub fn write_csv(table: &OutputTable, config: &CsvConfig) -> Result<Vec<u8>> {
    let delimiter = u8::try_from(config.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            RelayError::Configuration(format!(
                "CSV delimiter must be a single ASCII character, got '{}'",
                config.delimiter
            ))
        })?;

    let quote_style = match config.quote_style {
        QuoteStyle::Necessary => csv::QuoteStyle::Necessary,
        QuoteStyle::Always => csv::QuoteStyle::Always,
    };
    let terminator = match config.line_terminator {
        LineTerminator::Lf => csv::Terminator::Any(b'\n'),
        LineTerminator::Crlf => csv::Terminator::CRLF,
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(quote_style)
        .terminator(terminator)
        .from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for record in table.records() {
        writer.write_record(record.values())?;
    }

    writer
        .into_inner()
        .map_err(|e| RelayError::Serialization(format!("failed to flush CSV output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Record;

    fn table(rows: &[&[&str]]) -> OutputTable {
        let mut table = OutputTable::new(vec!["id".to_string(), "amount".to_string()]).unwrap();
        for row in rows {
            table
                .push(Record::new(row.iter().map(|v| v.to_string()).collect()))
                .unwrap();
        }
        table
    }

    fn render(table: &OutputTable, config: &CsvConfig) -> String {
        String::from_utf8(write_csv(table, config).unwrap()).unwrap()
    }

    #[test]
    fn test_header_only_for_empty_table() {
        assert_eq!(render(&table(&[]), &CsvConfig::default()), "id,amount\n");
    }

    #[test]
    fn test_quotes_only_when_needed() {
        let table = table(&[&["1", "10,50"], &["2", ""], &["3", "say \"hi\""], &["4", "a\nb"]]);
        assert_eq!(
            render(&table, &CsvConfig::default()),
            "id,amount\n1,\"10,50\"\n2,\n3,\"say \"\"hi\"\"\"\n4,\"a\nb\"\n"
        );
    }

    #[test]
    fn test_always_quote_with_crlf() {
        let config = CsvConfig {
            quote_style: QuoteStyle::Always,
            line_terminator: LineTerminator::Crlf,
            ..CsvConfig::default()
        };
        assert_eq!(
            render(&table(&[&["1", "x"]]), &config),
            "\"id\",\"amount\"\r\n\"1\",\"x\"\r\n"
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let config = CsvConfig {
            delimiter: ';',
            ..CsvConfig::default()
        };
        assert_eq!(render(&table(&[&["1", "10,50"]]), &config), "id;amount\n1;10,50\n");
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let config = CsvConfig {
            delimiter: '§',
            ..CsvConfig::default()
        };
        assert!(matches!(
            write_csv(&table(&[]), &config),
            Err(RelayError::Configuration(_))
        ));
    }
}
