//! Request and result shapes exchanged with the CRUD framework.
//!
//! # Design
//! Records stay untyped (`serde_json::Map`): the adapter forwards whatever
//! the backend returns and never needs to know a resource's schema.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A backend record, always a JSON object.
pub type Record = Map<String, Value>;

/// Comparison operators the framework attaches to filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    Ncontains,
    In,
    Startswith,
    Endswith,
}

/// A filter or query-parameter value. Numbers keep their JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<u64> for ParamValue {
    fn from(n: u64) -> Self {
        ParamValue::Number(n.into())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Number(n.into())
    }
}

/// One `(field, operator, value)` constraint on a list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: ParamValue,
}

impl Filter {
    pub fn new(field: &str, operator: FilterOperator, value: impl Into<ParamValue>) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: &str, value: impl Into<ParamValue>) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    pub fn contains(field: &str, value: impl Into<ParamValue>) -> Self {
        Self::new(field, FilterOperator::Contains, value)
    }
}

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Requested page window. `current` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub current: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(current: u64, page_size: u64) -> Self {
        Self { current, page_size }
    }

    /// Page and limit as sent on the wire; zero is raised to 1.
    pub fn normalized(self) -> (u64, u64) {
        (self.current.max(1), self.page_size.max(1))
    }
}

/// Inbound list request: `{resource, pagination?, filters?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRequest {
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl ListRequest {
    pub fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            pagination: None,
            filters: Vec::new(),
        }
    }

    pub fn paginate(mut self, current: u64, page_size: u64) -> Self {
        self.pagination = Some(Pagination::new(current, page_size));
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Inbound create request: `{resource, variables}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub resource: String,
    pub variables: Value,
}

impl CreateRequest {
    pub fn new(resource: &str, variables: Value) -> Self {
        Self {
            resource: resource.to_string(),
            variables,
        }
    }
}

/// Outbound list result: `{data, total}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListResult {
    pub data: Vec<Record>,
    pub total: u64,
}

/// Outbound create result: `{data}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateResult {
    pub data: Record,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_deserializes_from_framework_shape() {
        let filter: Filter =
            serde_json::from_str(r#"{"field":"name","operator":"contains","value":"Calc"}"#).unwrap();
        assert_eq!(filter, Filter::contains("name", "Calc"));

        let filter: Filter =
            serde_json::from_str(r#"{"field":"capacity","operator":"gte","value":30}"#).unwrap();
        assert_eq!(filter.operator, FilterOperator::Gte);
        assert_eq!(filter.value, ParamValue::from(30u64));
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let result: Result<Filter, _> =
            serde_json::from_str(r#"{"field":"name","operator":"like","value":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn pagination_defaults() {
        let p = Pagination::default();
        assert_eq!((p.current, p.page_size), (1, 10));

        let p: Pagination = serde_json::from_str(r#"{"pageSize":1000}"#).unwrap();
        assert_eq!((p.current, p.page_size), (1, 1000));
    }

    #[test]
    fn zero_pagination_is_raised_to_one() {
        assert_eq!(Pagination::new(0, 0).normalized(), (1, 1));
        assert_eq!(Pagination::new(3, 25).normalized(), (3, 25));
    }

    #[test]
    fn list_request_without_optional_fields() {
        let req: ListRequest = serde_json::from_str(r#"{"resource":"users"}"#).unwrap();
        assert_eq!(req, ListRequest::new("users"));
    }

    #[test]
    fn param_value_display() {
        assert_eq!(ParamValue::from("Physics").to_string(), "Physics");
        assert_eq!(ParamValue::from(42u64).to_string(), "42");
        assert_eq!(ParamValue::from(-7i64).to_string(), "-7");
    }
}
