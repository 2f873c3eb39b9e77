use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::error::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Integer,
    DateTime,
}

impl FieldKind {
    fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Bool => "true or false",
            FieldKind::Integer => "an integer",
            FieldKind::DateTime => "a date (YYYY-MM-DD) or datetime (YYYY-MM-DDTHH:MM[:SS])",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    DateTime(String),
}

impl FilterValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FilterValue::Text(_) => FieldKind::Text,
            FilterValue::Bool(_) => FieldKind::Bool,
            FilterValue::Integer(_) => FieldKind::Integer,
            FilterValue::DateTime(_) => FieldKind::DateTime,
        }
    }

    /// Parse raw input for `field`. Blank input means "no filter".
    pub fn parse(field: &str, kind: FieldKind, raw: &str) -> Result<Option<Self>, QueryError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let invalid = || QueryError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
            expected: kind.expected(),
        };

        let value = match kind {
            FieldKind::Text => FilterValue::Text(raw.to_string()),
            FieldKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => FilterValue::Bool(true),
                "false" | "0" | "no" => FilterValue::Bool(false),
                _ => return Err(invalid()),
            },
            FieldKind::Integer => FilterValue::Integer(raw.parse().map_err(|_| invalid())?),
            FieldKind::DateTime => {
                let valid = DateTime::parse_from_rfc3339(raw).is_ok()
                    || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").is_ok()
                    || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").is_ok()
                    || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok();
                if !valid {
                    return Err(invalid());
                }
                FilterValue::DateTime(raw.to_string())
            }
        };
        Ok(Some(value))
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(s) | FilterValue::DateTime(s) => write!(f, "{}", s),
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Integer(i) => write!(f, "{}", i),
        }
    }
}

/// How a backend addresses page windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `skip` + `limit`
    Offset,
    /// `page` + `page_size`
    PageNumber,
}

/// Static description of a list endpoint's query surface.
#[derive(Debug)]
pub struct FilterSchema {
    pub fields: &'static [(&'static str, FieldKind)],
    pub sortable: &'static [&'static str],
    pub pagination: Pagination,
    pub sort_field_param: &'static str,
    pub sort_direction_param: &'static str,
    pub default_page_size: u32,
    pub default_sort: Option<(&'static str, SortDirection)>,
}

impl FilterSchema {
    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.fields.iter().find(|(name, _)| *name == field).map(|(_, kind)| *kind)
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.sortable.contains(&field)
    }
}
