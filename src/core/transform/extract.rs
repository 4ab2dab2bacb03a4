//! XML record extraction
//!
//! Parses the whole document, walks from the root down the configured
//! container path and turns every record element below it into a [`Record`].

use super::document::{parse_document, Element};
use super::mapping::ColumnMapping;
use crate::domain::context::RunContext;
use crate::domain::record::OutputTable;
use crate::domain::result::Result;

/// Extracts the output table from a raw XML document
///
/// Records are returned in document order. A missing container yields an
/// empty table, and missing fields yield column defaults.
///
/// # Errors
///
/// Returns [`crate::domain::RelayError::MalformedInput`] if the buffer is not
/// well-formed XML. No partial table is returned.
pub fn extract_records(
    input: &[u8],
    mapping: &ColumnMapping,
    context: &RunContext,
) -> Result<OutputTable> {
    let root = parse_document(input)?;
    let mut table = OutputTable::new(mapping.columns())?;

    for record in record_elements(&root, mapping) {
        table.push(mapping.apply(record, context))?;
    }

    tracing::debug!(
        records = table.len(),
        container = %mapping.container().join("/"),
        record_tag = mapping.record_tag(),
        "Extracted records"
    );

    Ok(table)
}

/// Record elements in document order
///
/// A record nested inside another record is part of the outer one and is not
/// counted separately.
pub fn record_elements<'a>(root: &'a Element, mapping: &ColumnMapping) -> Vec<&'a Element> {
    let mut records = Vec::new();
    for container in containers(root, mapping.container()) {
        collect_records(container, mapping.record_tag(), &mut records);
    }
    records
}

fn containers<'a>(root: &'a Element, path: &[String]) -> Vec<&'a Element> {
    let Some((first, rest)) = path.split_first() else {
        return vec![root];
    };
    if root.name() != first {
        return Vec::new();
    }

    let mut current = vec![root];
    for name in rest {
        current = current
            .into_iter()
            .flat_map(|element| element.child_elements())
            .filter(|child| child.name() == name.as_str())
            .collect();
    }
    current
}

fn collect_records<'a>(element: &'a Element, tag: &str, out: &mut Vec<&'a Element>) {
    if element.name() == tag {
        out.push(element);
        return;
    }
    for child in element.child_elements() {
        collect_records(child, tag, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnConfig, TransformConfig};
    use crate::domain::RelayError;

    fn mapping(container: &str) -> ColumnMapping {
        ColumnMapping::from_config(&TransformConfig {
            container_path: container.to_string(),
            record_tag: "item".to_string(),
            columns: vec![ColumnConfig::field("id", "id")],
        })
        .unwrap()
    }

    fn ids(xml: &str, container: &str) -> Vec<String> {
        extract_records(xml.as_bytes(), &mapping(container), &RunContext::start())
            .unwrap()
            .records()
            .iter()
            .map(|r| r.values()[0].clone())
            .collect()
    }

    #[test]
    fn test_records_in_document_order() {
        let xml = r#"<feed><item id="1"/><item id="2"/><group><item id="3"/></group></feed>"#;
        assert_eq!(ids(xml, "feed"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_container_path_is_anchored_at_root() {
        let xml = r#"<feed><a><item id="1"/></a><b><item id="2"/></b></feed>"#;
        assert_eq!(ids(xml, "feed/b"), vec!["2"]);
        assert!(ids(xml, "b").is_empty());
        assert!(ids(xml, "feed/missing").is_empty());
    }

    #[test]
    fn test_empty_container_matches_anywhere() {
        let xml = r#"<feed><a><item id="1"/></a><item id="2"/></feed>"#;
        assert_eq!(ids(xml, ""), vec!["1", "2"]);
        assert_eq!(ids(r#"<item id="9"/>"#, ""), vec!["9"]);
    }

    #[test]
    fn test_nested_records_are_not_double_counted() {
        let xml = r#"<feed><item id="1"><item id="inner"/></item></feed>"#;
        assert_eq!(ids(xml, "feed"), vec!["1"]);
    }

    #[test]
    fn test_malformed_input_returns_no_table() {
        let result = extract_records(b"<feed><item>", &mapping("feed"), &RunContext::start());
        assert!(matches!(result, Err(RelayError::MalformedInput(_))));
    }
}
