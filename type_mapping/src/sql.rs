//! SQL text utilities
//!
//! This module handles store type names and the quoting rules
//! shared by the literal generators.

use std::fmt::Write;

use crate::parameters::StoreTypePostfix;

/// Size value meaning "no bound"; never applied to a parameter
pub const UNBOUNDED_SIZE: i32 = -1;

/// The SQL literal for an absent value
pub const NULL_LITERAL: &str = "NULL";

/// Render bytes as uppercase hex digits, two per byte
pub fn hex_upper(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(out, "{byte:02X}");
    }
    out
}

/// Quote text as a SQL string literal, doubling embedded single quotes
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// Split a store type into its base name and the facet list inside parentheses.
///
/// `"varchar(50)"` yields `("varchar", Some("50"))`, `"int"` yields `("int", None)`.
pub fn split_store_type(store_type: &str) -> (&str, Option<&str>) {
    let trimmed = store_type.trim();
    match (trimmed.find('('), trimmed.rfind(')')) {
        (Some(open), Some(close)) if close > open => {
            let base = trimmed[..open].trim_end();
            let facets = trimmed[open + 1..close].trim();
            (base, Some(facets))
        }
        _ => (trimmed, None),
    }
}

/// The store type name with any facet suffix removed
pub fn store_type_name_base(store_type: &str) -> &str {
    split_store_type(store_type).0
}

/// Parse the size facet of a store type like `nvarchar(200)`.
///
/// `max` parses as [`UNBOUNDED_SIZE`]. Precision/scale pairs yield `None`.
pub fn parse_size(store_type: &str) -> Option<i32> {
    let (_, facets) = split_store_type(store_type);
    let facets = facets?;
    if facets.eq_ignore_ascii_case("max") {
        return Some(UNBOUNDED_SIZE);
    }
    facets.parse::<i32>().ok()
}

/// Parse a `(precision, scale)` or `(precision)` facet list
pub fn parse_precision_scale(store_type: &str) -> (Option<u32>, Option<u32>) {
    let (_, facets) = split_store_type(store_type);
    let Some(facets) = facets else {
        return (None, None);
    };
    let mut parts = facets.split(',').map(|part| part.trim().parse::<u32>().ok());
    let precision = parts.next().flatten();
    let scale = parts.next().flatten();
    (precision, scale)
}

/// Build a full store type name from a base name and the facets the postfix asks for
pub fn build_store_type(
    base: &str,
    postfix: StoreTypePostfix,
    size: Option<i32>,
    precision: Option<u32>,
    scale: Option<u32>,
) -> String {
    match postfix {
        StoreTypePostfix::None => base.to_string(),
        StoreTypePostfix::Size => match size {
            Some(UNBOUNDED_SIZE) => format!("{base}(max)"),
            Some(size) => format!("{base}({size})"),
            None => base.to_string(),
        },
        StoreTypePostfix::Precision => match precision {
            Some(precision) => format!("{base}({precision})"),
            None => base.to_string(),
        },
        StoreTypePostfix::PrecisionAndScale => match (precision, scale) {
            (Some(precision), Some(scale)) => format!("{base}({precision},{scale})"),
            (Some(precision), None) => format!("{base}({precision})"),
            _ => base.to_string(),
        },
    }
}
