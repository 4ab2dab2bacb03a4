//! Integration tests for the XML to CSV transform
//!
//! These tests drive the public transform API only: no network, no files
//! other than fixtures.

use chrono::{Local, TimeZone};
use xmlrelay::config::{
    ColumnConfig, CsvConfig, LineTerminator, QuoteStyle, SelectorConfig, TransformConfig,
};
use xmlrelay::core::transform::builtin::PARTNER_COLUMNS;
use xmlrelay::core::transform::{ColumnMapping, Transformer};
use xmlrelay::domain::{RelayError, RunContext};

const PARTNER_FEED: &[u8] = include_bytes!("fixtures/partner_feed.xml");

fn orders_config(columns: &[(&str, &str)]) -> TransformConfig {
    TransformConfig {
        container_path: "orders".to_string(),
        record_tag: "order".to_string(),
        columns: columns
            .iter()
            .map(|(name, path)| ColumnConfig::field(*name, *path))
            .collect(),
    }
}

fn transformer(columns: &[(&str, &str)]) -> Transformer {
    Transformer::new(&orders_config(columns), &CsvConfig::default()).unwrap()
}

fn context() -> RunContext {
    RunContext::at(Local.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap())
}

fn read_back(csv: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_reader(csv);
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

#[test]
fn test_two_records_end_to_end() {
    let xml = br#"<orders>
  <order><id>1</id><amount>10,50</amount></order>
  <order><id>2</id></order>
</orders>"#;

    let output = transformer(&[("id", "id"), ("amount", "amount")])
        .transform(xml, &context())
        .unwrap();

    assert_eq!(
        String::from_utf8(output.csv).unwrap(),
        "id,amount\n1,\"10,50\"\n2,\n"
    );
}

#[test]
fn test_fields_may_be_attributes() {
    let xml = br#"<orders><order id="1" amount="10,50"/><order id="2"/></orders>"#;

    let output = transformer(&[("id", "id"), ("amount", "amount")])
        .transform(xml, &context())
        .unwrap();

    assert_eq!(output.csv, b"id,amount\n1,\"10,50\"\n2,\n");
}

#[test]
fn test_record_count_matches_elements_in_document_order() {
    let mut xml = String::from("<orders>");
    for i in 0..250 {
        xml.push_str(&format!("<order><id>{i}</id></order>"));
    }
    xml.push_str("</orders>");

    let output = transformer(&[("id", "id")])
        .transform(xml.as_bytes(), &context())
        .unwrap();

    assert_eq!(output.record_count(), 250);
    let (_, rows) = read_back(&output.csv);
    let ids: Vec<String> = rows.into_iter().map(|r| r[0].clone()).collect();
    let expected: Vec<String> = (0..250).map(|i| i.to_string()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_missing_fields_are_empty_never_absent() {
    let xml = b"<orders><order><name>x</name></order></orders>";

    let output = transformer(&[("id", "id"), ("name", "name"), ("note", "meta/note")])
        .transform(xml, &context())
        .unwrap();

    let record = &output.table.records()[0];
    assert_eq!(record.len(), 3);
    assert_eq!(record.values(), ["", "x", ""]);
}

#[test]
fn test_round_trip_through_csv_reader() {
    let xml = r#"<orders>
  <order><id>1</id><name>Acme, Inc</name><note>He said "fine"</note></order>
  <order><id>2</id><name>Multi
line</name><note>semi;colon</note></order>
  <order><id>3</id><name>Crème brûlée</name><note></note></order>
</orders>"#;

    let output = transformer(&[("id", "id"), ("name", "name"), ("note", "note")])
        .transform(xml.as_bytes(), &context())
        .unwrap();

    let (headers, rows) = read_back(&output.csv);
    assert_eq!(headers, output.table.columns());
    let expected: Vec<Vec<String>> = output
        .table
        .records()
        .iter()
        .map(|r| r.values().to_vec())
        .collect();
    assert_eq!(rows, expected);
    assert_eq!(rows[0][1], "Acme, Inc");
    assert_eq!(rows[1][1], "Multi\nline");
}

#[test]
fn test_comma_value_is_quoted() {
    let xml = b"<orders><order><name>Acme, Inc</name></order></orders>";
    let output = transformer(&[("name", "name")])
        .transform(xml, &context())
        .unwrap();
    assert_eq!(output.csv, b"name\n\"Acme, Inc\"\n");
}

#[test]
fn test_no_records_gives_header_only() {
    let columns = [("id", "id"), ("amount", "amount")];

    let empty_container = transformer(&columns)
        .transform(b"<orders></orders>", &context())
        .unwrap();
    assert_eq!(empty_container.csv, b"id,amount\n");

    let missing_container = transformer(&columns)
        .transform(b"<catalog><order><id>1</id></order></catalog>", &context())
        .unwrap();
    assert_eq!(missing_container.csv, b"id,amount\n");
    assert_eq!(missing_container.record_count(), 0);
}

#[test]
fn test_malformed_xml_is_rejected() {
    let transformer = transformer(&[("id", "id")]);

    let inputs: [&[u8]; 4] = [
        b"<orders><order><id>1</id></orders>",
        b"<orders><order><id>1</id></order>",
        b"",
        b"not xml at all",
    ];
    for input in inputs {
        let result = transformer.transform(input, &context());
        assert!(
            matches!(result, Err(RelayError::MalformedInput(_))),
            "expected malformed input for {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_deeply_nested_record_is_rejected() {
    let depth = 50_000;
    let xml = format!(
        "<orders><order id=\"1\">{}{}</order></orders>",
        "<x>".repeat(depth),
        "</x>".repeat(depth)
    );

    let result = transformer(&[("id", "id")]).transform(xml.as_bytes(), &context());
    assert!(matches!(result, Err(RelayError::MalformedInput(_))));
}

#[test]
fn test_output_is_deterministic() {
    let transformer = transformer(&[("id", "id"), ("amount", "amount")]);
    let xml = b"<orders><order id=\"1\"><amount> 3 </amount></order></orders>";
    let first = transformer.transform(xml, &context()).unwrap();
    let second = transformer.transform(xml, &context()).unwrap();
    assert_eq!(first.csv, second.csv);
}

#[test]
fn test_csv_options() {
    let csv = CsvConfig {
        delimiter: ';',
        quote_style: QuoteStyle::Always,
        line_terminator: LineTerminator::Crlf,
    };
    let transformer = Transformer::new(&orders_config(&[("id", "id")]), &csv).unwrap();
    let output = transformer
        .transform(b"<orders><order><id>1</id></order></orders>", &context())
        .unwrap();
    assert_eq!(output.csv, b"\"id\"\r\n\"1\"\r\n");
}

#[test]
fn test_partner_feed_with_builtin_mapping() {
    let transformer = Transformer::new(&TransformConfig::default(), &CsvConfig::default()).unwrap();
    let output = transformer.transform(PARTNER_FEED, &context()).unwrap();

    let (headers, rows) = read_back(&output.csv);
    assert_eq!(headers, PARTNER_COLUMNS);
    assert_eq!(rows.len(), 3);

    let first = &rows[0];
    assert_eq!(
        first[0],
        "https://www.example.com/programme-neuf-lyon-les-jardins-d-ambre"
    );
    assert_eq!(first[1], "OP-1042");
    assert_eq!(first[2], "Les Jardins d'Ambre");
    assert_eq!(first[3], "Lyon");
    assert_eq!(first[4], "69003");
    assert_eq!(first[5], "69");
    assert_eq!(
        first[6],
        "Proche tram T1 | Terrasses plein sud | Parking, caves & local vélos"
    );
    assert_eq!(first[7], "2026-03-01 06:00:00");
    assert_eq!(first[8], "SUCCESS");
    assert_eq!(first[9], "");
    assert_eq!(first[10], "https://cdn.example.com/1042/facade.jpg");

    let second = &rows[1];
    assert_eq!(second[0], "");
    assert_eq!(second[1], "2077");
    assert_eq!(second[5], "35", "department is capped at two characters");
    assert_eq!(second[6], "Vue mer, à deux pas des remparts.");
    assert_eq!(second[10], "NO IMAGE");

    let third = &rows[2];
    assert_eq!(third[2], "");
    assert_eq!(third[6], "N/A");
    assert_eq!(third[10], "NO IMAGE");
}

#[test]
fn test_custom_mapping_with_modifiers() {
    let config = TransformConfig {
        container_path: String::new(),
        record_tag: "PROGRAMME".to_string(),
        columns: vec![
            ColumnConfig {
                sources: vec![SelectorConfig {
                    path: "//PF".to_string(),
                    join: Some(", ".to_string()),
                    contains: None,
                }],
                normalize: xmlrelay::config::Normalize::StripMarkup,
                max_length: Some(20),
                ..ColumnConfig::field("highlights", "x")
            },
            ColumnConfig {
                default: "?".to_string(),
                ..ColumnConfig::field("ref", "REF_OPERATION")
            },
        ],
    };
    let mapping = ColumnMapping::from_config(&config).unwrap();
    assert_eq!(mapping.columns(), ["highlights", "ref"]);

    let transformer = Transformer::new(&config, &CsvConfig::default()).unwrap();
    let output = transformer.transform(PARTNER_FEED, &context()).unwrap();
    let (_, rows) = read_back(&output.csv);

    assert_eq!(rows[0], ["Proche tram T1, Terr", "OP-1042"]);
    assert_eq!(rows[1], ["", "?"]);
}
