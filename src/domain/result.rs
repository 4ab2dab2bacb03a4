//! Crate-wide result alias

use super::errors::RelayError;

/// Result of any fallible relay operation
///
/// ```
/// use xmlrelay::domain::{RelayError, Result};
///
/// fn parse_port(raw: &str) -> Result<u16> {
///     raw.parse()
///         .map_err(|_| RelayError::Configuration(format!("bad port '{raw}'")))
/// }
///
/// assert_eq!(parse_port("22").unwrap(), 22);
/// assert_eq!(parse_port("ssh").unwrap_err().exit_code(), 2);
/// ```
pub type Result<T> = std::result::Result<T, RelayError>;
