//! Record-relative paths
//!
//! A path addresses elements or an attribute below a record element:
//!
//! | Syntax    | Selects                                        |
//! |-----------|------------------------------------------------|
//! | `name`    | `name` children, else the `name` attribute     |
//! | `A/B`     | `B` children of `A` children                   |
//! | `@id`     | the record's `id` attribute                    |
//! | `A/@id`   | `id` attribute of `A` children                 |
//! | `A//B`    | `B` elements at any depth under `A` children   |
//! | `//B`     | `B` elements at any depth under the record     |
//! | `.`       | the record itself                              |

use super::document::Element;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Child(String),
    Descendant(String),
}

/// Parsed record-relative path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    raw: String,
    steps: Vec<Step>,
    attribute: Option<String>,
}

impl Path {
    /// Parses a path expression
    ///
    /// # Errors
    ///
    /// Returns a description of the problem for absolute paths, `///`,
    /// trailing slashes, misplaced attributes and empty paths.
    pub fn parse(input: &str) -> Result<Self, String> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err("path cannot be empty".to_string());
        }

        let (mut descend, rest) = match raw.strip_prefix("//") {
            Some(rest) => (true, rest),
            None if raw.starts_with('/') => {
                return Err(format!(
                    "path '{raw}' must be relative to the record element"
                ));
            }
            None => (false, raw),
        };

        let segments: Vec<&str> = rest.split('/').collect();
        let mut steps = Vec::new();
        let mut attribute = None;

        for (i, segment) in segments.iter().enumerate() {
            let segment = segment.trim();
            if segment.is_empty() {
                if descend || i == 0 {
                    return Err(format!("path '{raw}' has an empty step"));
                }
                descend = true;
                continue;
            }

            if let Some(name) = segment.strip_prefix('@') {
                if i + 1 != segments.len() || descend || name.is_empty() {
                    return Err(format!(
                        "path '{raw}': an attribute can only be the last step"
                    ));
                }
                attribute = Some(name.to_string());
            } else if segment == "." {
                if descend {
                    return Err(format!("path '{raw}': '.' cannot follow '//'"));
                }
            } else {
                let name = segment.to_string();
                steps.push(if descend {
                    Step::Descendant(name)
                } else {
                    Step::Child(name)
                });
                descend = false;
            }
        }

        if descend {
            return Err(format!("path '{raw}' cannot end with '/'"));
        }

        Ok(Self {
            raw: raw.to_string(),
            steps,
            attribute,
        })
    }

    /// Raw values addressed by this path, in document order
    ///
    /// Element matches yield their full text content; attribute matches yield
    /// the attribute value. Missing matches produce an empty list.
    pub fn select(&self, record: &Element) -> Vec<String> {
        let values = self.select_steps(record);
        if !values.is_empty() {
            return values;
        }

        match (self.steps.as_slice(), &self.attribute) {
            ([Step::Child(name)], None) => {
                record.attribute(name).map(str::to_string).into_iter().collect()
            }
            _ => values,
        }
    }

    fn select_steps(&self, record: &Element) -> Vec<String> {
        let mut current: Vec<&Element> = vec![record];

        for step in &self.steps {
            let mut next: Vec<&Element> = Vec::new();
            for element in &current {
                match step {
                    Step::Child(name) => {
                        next.extend(
                            element.child_elements().filter(|c| c.name() == name.as_str()),
                        );
                    }
                    Step::Descendant(name) => {
                        for found in element.descendants() {
                            if found.name() == name.as_str()
                                && !next.iter().any(|e| std::ptr::eq(*e, found))
                            {
                                next.push(found);
                            }
                        }
                    }
                }
            }
            if next.is_empty() {
                return Vec::new();
            }
            current = next;
        }

        match &self.attribute {
            Some(name) => current
                .iter()
                .filter_map(|e| e.attribute(name))
                .map(str::to_string)
                .collect(),
            None => current.iter().map(|e| e.text()).collect(),
        }
    }
}

impl FromStr for Path {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
