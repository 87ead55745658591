//! Query string parsing and validation for the charts view
//!
//! Parameters arrive as ordered `(key, value)` pairs so that array fields can
//! be given as repeated `name`, `name[]` or `name[N]` keys. Every rule is
//! checked and all failures are reported together.

use crate::charts::{ChartsViewRequest, SearchType, ViewAs};
use crate::timeline::{self, PeriodLimits};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

const SCALAR_FIELDS: &[&str] = &[
    "from",
    "to",
    "view_as",
    "filter_set",
    "filter_rst",
    "filter_search_type",
    "page",
];

const ARRAY_FIELDS: &[&str] = &["filter_hostids", "filter_graphids", "filter_graph_patterns"];

/// A single rejected parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// All rejected parameters of one request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid request parameters")]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }
}

/// Values collected for one known field
#[derive(Debug, Default)]
struct RawField {
    values: Vec<String>,
    array_syntax: bool,
    bad_index: bool,
}

/// Split `name[]` / `name[N]` into the base name and whether array syntax was
/// used. The index must be empty or numeric.
fn split_key(key: &str) -> (&str, bool, bool) {
    match key.find('[') {
        Some(open) if key.ends_with(']') => {
            let index = &key[open + 1..key.len() - 1];
            let bad_index = !index.chars().all(|c| c.is_ascii_digit());
            (&key[..open], true, bad_index)
        }
        _ => (key, false, false),
    }
}

fn group_pairs(pairs: &[(String, String)]) -> HashMap<&'static str, RawField> {
    let mut fields: HashMap<&'static str, RawField> = HashMap::new();

    for (key, value) in pairs {
        let (name, array_syntax, bad_index) = split_key(key);
        let Some(&known) = SCALAR_FIELDS
            .iter()
            .chain(ARRAY_FIELDS.iter())
            .find(|f| **f == name)
        else {
            continue;
        };

        let field = fields.entry(known).or_default();
        field.values.push(value.clone());
        field.array_syntax |= array_syntax;
        field.bad_index |= bad_index;
    }

    fields
}

/// Parser over the grouped fields that records every failure it meets
struct Checker {
    fields: HashMap<&'static str, RawField>,
    errors: Vec<FieldError>,
}

impl Checker {
    fn scalar(&mut self, name: &'static str) -> Option<String> {
        let field = self.fields.remove(name)?;
        if field.array_syntax || field.values.len() != 1 {
            self.errors
                .push(FieldError::new(name, "must be given exactly once"));
            return None;
        }
        field.values.into_iter().next()
    }

    fn parsed<T>(
        &mut self,
        name: &'static str,
        parse: impl Fn(&str) -> Option<T>,
        expected: &str,
    ) -> Option<T> {
        let raw = self.scalar(name)?;
        let value = parse(&raw);
        if value.is_none() {
            self.errors.push(FieldError::new(
                name,
                format!("invalid value \"{}\", expected {}", raw, expected),
            ));
        }
        value
    }

    fn flag(&mut self, name: &'static str) -> bool {
        self.parsed(name, |s| (s == "1").then_some(()), "1")
            .is_some()
    }

    fn array(&mut self, name: &'static str) -> Option<Vec<String>> {
        let field = self.fields.remove(name)?;
        if field.bad_index {
            self.errors
                .push(FieldError::new(name, "array index must be numeric"));
            return None;
        }
        Some(field.values)
    }

    fn ids<T: FromStr>(&mut self, name: &'static str) -> Option<Vec<T>> {
        let raw = self.array(name)?;
        let mut ids = Vec::with_capacity(raw.len());
        for value in &raw {
            match parse_id(value) {
                Some(id) => ids.push(id),
                None => {
                    self.errors.push(FieldError::new(
                        name,
                        format!("invalid id \"{}\"", value),
                    ));
                    return None;
                }
            }
        }
        Some(ids)
    }

    fn range_time(&mut self, name: &'static str) -> Option<String> {
        let raw = self.scalar(name)?;
        match timeline::validate(&raw) {
            Ok(()) => Some(raw),
            Err(e) => {
                self.errors.push(FieldError::new(name, e.to_string()));
                None
            }
        }
    }
}

/// Digits only, no sign or whitespace
fn parse_id<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_page(s: &str) -> Option<u32> {
    parse_id::<u32>(s).filter(|&page| page >= 1)
}

/// Validate the charts view parameters.
///
/// Unknown keys are ignored. The from/to period is checked against `limits`
/// only when both ends are present and individually valid.
pub fn parse_charts_request(
    pairs: &[(String, String)],
    limits: &PeriodLimits,
    now: DateTime<Utc>,
) -> Result<ChartsViewRequest, ValidationErrors> {
    let mut checker = Checker {
        fields: group_pairs(pairs),
        errors: Vec::new(),
    };

    let from = checker.range_time("from");
    let to = checker.range_time("to");
    let view_as = checker.parsed("view_as", ViewAs::parse, "graph or values");
    let filter_set = checker.flag("filter_set");
    let filter_rst = checker.flag("filter_rst");
    let filter_search_type =
        checker.parsed("filter_search_type", SearchType::parse, "strict or pattern");
    let filter_hostids = checker.ids("filter_hostids");
    let filter_graphids = checker.ids("filter_graphids");
    let filter_graph_patterns = checker.array("filter_graph_patterns");
    let page = checker.parsed("page", parse_page, "an integer of at least 1");

    if let Err(e) = timeline::validate_period(from.as_deref(), to.as_deref(), limits, now) {
        checker.errors.push(FieldError::new("from", e.to_string()));
    }

    if !checker.errors.is_empty() {
        return Err(ValidationErrors(checker.errors));
    }

    Ok(ChartsViewRequest {
        from,
        to,
        view_as,
        filter_set,
        filter_rst,
        filter_search_type,
        filter_hostids,
        filter_graphids,
        filter_graph_patterns,
        page,
    })
}
