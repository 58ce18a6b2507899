//! Enum definition files and the model built from them.
//!
//! Each non-blank line declares one symbol:
//!
//! ```text
//! full_block_snapped, "Full block"
//! half_block_snapped = 4
//! quarter_block_snapped
//! ```
//!
//! Values are non-negative and never decrease. A symbol without a value
//! takes the running counter; the counter then moves past the assigned
//! value. `invalid` is reserved for the generated sentinel member.

use crate::error::{SchemaError, SchemaResult};
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Value the generated `invalid` member carries in every enum.
pub const INVALID_VALUE: i64 = -1;

/// Name of the sentinel member appended to every generated enum.
pub const INVALID_SYMBOL: &str = "invalid";

/// One enum member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumSymbol {
    pub value: u32,
    pub description: String,
}

/// One enum definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumSpec {
    pub name: String,
    pub symbols: IndexMap<String, EnumSymbol>,
}

impl EnumSpec {
    /// Value of a symbol by name.
    pub fn value_of(&self, symbol: &str) -> Option<u32> {
        self.symbols.get(symbol).map(|s| s.value)
    }

    /// First symbol carrying `value`.
    pub fn name_of(&self, value: u32) -> Option<&str> {
        self.symbols
            .iter()
            .find(|(_, s)| s.value == value)
            .map(|(name, _)| name.as_str())
    }

    /// Description of the first symbol carrying `value`.
    pub fn description_of(&self, value: u32) -> Option<&str> {
        self.symbols
            .values()
            .find(|s| s.value == value)
            .map(|s| s.description.as_str())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\s*(\w+)\s*(?:=\s*([0-9]+))?\s*(?:,\s*"([^"]*)")?\s*$"#)
            .expect("enum line pattern is valid")
    })
}

/// Build an enum from the content of its definition file.
///
/// `name` is the file-derived enum name; it doubles as the description of
/// every symbol that does not supply one.
pub fn build_enum(name: &str, content: &str) -> SchemaResult<EnumSpec> {
    let mut symbols = IndexMap::new();
    // `None` once a symbol has taken `u32::MAX`; only a following symbol fails.
    let mut next_value: Option<u32> = Some(0);

    for (i, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let captures = line_pattern()
            .captures(line)
            .ok_or_else(|| SchemaError::Syntax {
                file: name.to_string(),
                line_number: i + 1,
                line: line.to_string(),
            })?;

        let symbol = &captures[1];
        if symbol == INVALID_SYMBOL {
            return Err(SchemaError::ReservedSymbol {
                file: name.to_string(),
                line_number: i + 1,
                symbol: symbol.to_string(),
            });
        }
        if symbols.contains_key(symbol) {
            return Err(SchemaError::DuplicateSymbol {
                file: name.to_string(),
                line_number: i + 1,
                symbol: symbol.to_string(),
            });
        }

        let out_of_range = |value: String| SchemaError::ValueOutOfRange {
            file: name.to_string(),
            symbol: symbol.to_string(),
            value,
        };

        let value = match (captures.get(2), next_value) {
            (Some(m), next) => {
                let value: u32 = m
                    .as_str()
                    .parse()
                    .map_err(|_| out_of_range(m.as_str().to_string()))?;
                match next {
                    Some(expected) if value < expected => {
                        return Err(SchemaError::NonMonotonic {
                            file: name.to_string(),
                            symbol: symbol.to_string(),
                            expected,
                            found: value,
                        });
                    }
                    Some(_) => value,
                    None => return Err(out_of_range(m.as_str().to_string())),
                }
            }
            (None, Some(next)) => next,
            (None, None) => return Err(out_of_range((u64::from(u32::MAX) + 1).to_string())),
        };

        let description = captures
            .get(3)
            .map_or_else(|| name.to_string(), |m| m.as_str().to_string());

        symbols.insert(symbol.to_string(), EnumSymbol { value, description });

        next_value = value.checked_add(1);
    }

    tracing::debug!(enum_name = %name, symbols = symbols.len(), "built enum");

    Ok(EnumSpec {
        name: name.to_string(),
        symbols,
    })
}
