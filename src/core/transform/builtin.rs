//! Built-in column mapping for the partner programme feed
//!
//! Used whenever `transform.columns` is empty. Column names and order match
//! what the downstream import expects for `PartenaireBI.csv`.

use crate::config::{ColumnConfig, Normalize, SelectorConfig};

/// Timestamp format of the `Scraping_Date` column
pub const SCRAPING_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header of the built-in mapping, in output order
pub const PARTNER_COLUMNS: [&str; 11] = [
    "Program_URL",
    "Program_Ref",
    "Program_Name",
    "Program_City",
    "Program_ZipCode",
    "Program_Department",
    "Program_Arguments",
    "Scraping_Date",
    "Scraping_Status",
    "Error_Message",
    "Program_Image",
];

fn text(name: &str, paths: &[&str], max_length: usize) -> ColumnConfig {
    ColumnConfig {
        name: name.to_string(),
        sources: paths.iter().map(|p| SelectorConfig::path(*p)).collect(),
        constant: None,
        timestamp: None,
        default: String::new(),
        normalize: Normalize::Collapse,
        max_length: Some(max_length),
    }
}

fn constant(name: &str, value: &str) -> ColumnConfig {
    ColumnConfig {
        name: name.to_string(),
        sources: Vec::new(),
        constant: Some(value.to_string()),
        timestamp: None,
        default: String::new(),
        normalize: Normalize::Trim,
        max_length: None,
    }
}

/// Column configuration of the partner programme feed
pub fn partner_columns() -> Vec<ColumnConfig> {
    let url = ColumnConfig {
        sources: vec![SelectorConfig {
            path: "//URL".to_string(),
            join: None,
            contains: Some("/programme-neuf-".to_string()),
        }],
        ..text("Program_URL", &[], 500)
    };

    let mut arguments_sources = vec![SelectorConfig {
        path: "//POINTS_FORTS//PF".to_string(),
        join: Some(" | ".to_string()),
        contains: None,
    }];
    arguments_sources.extend(
        [
            "//PROMESSE_PROGRAMME",
            "//DESCRIPTIF_COURT",
            "//DESCRIPTIF_LONG",
            "//DESCRIPTIF_CENTRE_D_APPEL",
            "//NOM",
        ]
        .into_iter()
        .map(SelectorConfig::path),
    );
    let arguments = ColumnConfig {
        sources: arguments_sources,
        default: "N/A".to_string(),
        normalize: Normalize::StripMarkup,
        ..text("Program_Arguments", &[], 4000)
    };

    let scraping_date = ColumnConfig {
        name: "Scraping_Date".to_string(),
        sources: Vec::new(),
        constant: None,
        timestamp: Some(SCRAPING_DATE_FORMAT.to_string()),
        default: String::new(),
        normalize: Normalize::Trim,
        max_length: None,
    };

    let image = ColumnConfig {
        default: "NO IMAGE".to_string(),
        ..text("Program_Image", &["//PERSPECTIVES//URL"], 500)
    };

    vec![
        url,
        text("Program_Ref", &["//REF_OPERATION", "//NUMERO"], 50),
        text("Program_Name", &["//NOM"], 255),
        text("Program_City", &["//VILLE"], 100),
        text("Program_ZipCode", &["//CP"], 10),
        text("Program_Department", &["//DEPARTEMENT"], 2),
        arguments,
        scraping_date,
        constant("Scraping_Status", "SUCCESS"),
        constant("Error_Message", ""),
        image,
    ]
}
