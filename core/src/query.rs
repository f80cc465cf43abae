//! Query-parameter construction for list requests.
//!
//! # Design
//! Filters are translated through an explicit `(resource, field)` lookup
//! table instead of per-resource branching. A filter with no rule, or whose
//! operator the rule does not accept, is dropped: the backend only ever sees
//! parameters somebody registered. The table is checked once when it is
//! built, so a bad registration fails at startup rather than per request.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::ConfigError;
use crate::types::{Filter, FilterOperator, Pagination, ParamValue};

pub const PAGE_PARAM: &str = "page";
pub const LIMIT_PARAM: &str = "limit";
pub const SEARCH_PARAM: &str = "search";

/// Flat name → value map for a single GET. Iterates in name order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing any earlier value.
    pub fn insert(&mut self, name: &str, value: ParamValue) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Where one filter field lands on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub param: String,
    /// Accepted operators; empty accepts any.
    pub operators: Vec<FilterOperator>,
}

impl FieldRule {
    fn accepts(&self, operator: FilterOperator) -> bool {
        self.operators.is_empty() || self.operators.contains(&operator)
    }
}

/// Validated `(resource, field)` → parameter table.
#[derive(Debug, Clone, Default)]
pub struct FilterMap {
    resources: HashMap<String, HashMap<String, FieldRule>>,
}

impl FilterMap {
    pub fn builder() -> FilterMapBuilder {
        FilterMapBuilder::default()
    }

    /// The school backend's filter vocabulary.
    pub fn school() -> Result<Self, ConfigError> {
        use FilterOperator::{Contains, Eq};

        Self::builder()
            .resource("subjects", |r| {
                r.field("department", "department", &[Eq])
                    .field("name", SEARCH_PARAM, &[Eq, Contains])
                    .field("code", SEARCH_PARAM, &[Eq, Contains])
            })
            .resource("classes", |r| {
                r.field("name", SEARCH_PARAM, &[])
                    .field("subject", "subject", &[])
                    .field("teacher", "teacher", &[])
            })
            .resource("users", |r| r)
            .build()
    }

    pub fn is_registered(&self, resource: &str) -> bool {
        self.resources.contains_key(resource)
    }

    pub fn rule(&self, resource: &str, field: &str) -> Option<&FieldRule> {
        self.resources.get(resource)?.get(field)
    }

    /// Builds the parameter set for one list call.
    ///
    /// `page` and `limit` are always present. Filters are applied in order, so
    /// two filters that map to the same parameter resolve to the last one.
    pub fn build_params(
        &self,
        resource: &str,
        pagination: Option<Pagination>,
        filters: &[Filter],
    ) -> QueryParams {
        let (page, limit) = pagination.unwrap_or_default().normalized();

        let mut params = QueryParams::new();
        params.insert(PAGE_PARAM, page.into());
        params.insert(LIMIT_PARAM, limit.into());

        if !self.is_registered(resource) {
            if !filters.is_empty() {
                debug!(resource, dropped = filters.len(), "resource has no filter registration");
            }
            return params;
        }

        for filter in filters {
            match self.rule(resource, &filter.field) {
                Some(rule) if rule.accepts(filter.operator) => {
                    params.insert(&rule.param, filter.value.clone());
                }
                _ => debug!(
                    resource,
                    field = %filter.field,
                    operator = ?filter.operator,
                    "dropping unmapped filter"
                ),
            }
        }

        params
    }
}

/// Collects resource registrations and validates them in `build`.
#[derive(Debug, Default)]
pub struct FilterMapBuilder {
    resources: Vec<ResourceRules>,
}

impl FilterMapBuilder {
    pub fn resource(
        mut self,
        name: &str,
        rules: impl FnOnce(ResourceRules) -> ResourceRules,
    ) -> Self {
        self.resources.push(rules(ResourceRules::new(name)));
        self
    }

    pub fn build(self) -> Result<FilterMap, ConfigError> {
        let mut resources = HashMap::new();

        for ResourceRules { name, fields } in self.resources {
            if name.is_empty() {
                return Err(ConfigError::EmptyName("resource"));
            }
            if resources.contains_key(&name) {
                return Err(ConfigError::DuplicateResource(name));
            }

            let mut table = HashMap::new();
            for (field, rule) in fields {
                if field.is_empty() {
                    return Err(ConfigError::EmptyName("field"));
                }
                if rule.param.is_empty() {
                    return Err(ConfigError::EmptyName("parameter"));
                }
                if rule.param == PAGE_PARAM || rule.param == LIMIT_PARAM {
                    return Err(ConfigError::ReservedParam {
                        resource: name,
                        field,
                        param: rule.param,
                    });
                }
                if table.contains_key(&field) {
                    return Err(ConfigError::DuplicateField {
                        resource: name,
                        field,
                    });
                }
                table.insert(field, rule);
            }
            resources.insert(name, table);
        }

        Ok(FilterMap { resources })
    }
}

/// Field rules for one resource, in registration order.
#[derive(Debug)]
pub struct ResourceRules {
    name: String,
    fields: Vec<(String, FieldRule)>,
}

impl ResourceRules {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    /// Maps `field` to `param` for the given operators (empty slice: any).
    pub fn field(mut self, field: &str, param: &str, operators: &[FilterOperator]) -> Self {
        self.fields.push((
            field.to_string(),
            FieldRule {
                param: param.to_string(),
                operators: operators.to_vec(),
            },
        ));
        self
    }
}
