//! Data-access adapter for the school-management backend.
//!
//! # Overview
//! Turns abstract list and create requests (resource, pagination, filters)
//! into concrete REST calls, and turns whatever comes back into a normalized
//! result: records plus a total, a created record, or a `{message,
//! status_code}` error.
//!
//! # Design
//! - `DataClient` is stateless after construction and safe to share.
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`); a `Transport` runs the round
//!   trip in between. `UreqTransport` is the blocking default.
//! - Filters reach the wire only through the registered `FilterMap`.
//! - Endpoint resolution is a replaceable `EndpointResolver`.

pub mod adapter;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod provider;
pub mod query;
pub mod response;
pub mod types;

pub use adapter::Operation;
pub use client::DataClient;
pub use config::Config;
pub use endpoint::{ConfigurableEndpointResolver, EndpointResolver, IdentityEndpointResolver};
pub use error::{ApiError, ConfigError, Result, DEFAULT_ERROR_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use provider::{DataProvider, MockDataProvider, RestDataProvider};
pub use query::{FilterMap, QueryParams};
pub use types::{
    CreateRequest, CreateResult, Filter, FilterOperator, ListRequest, ListResult, Pagination,
    ParamValue, Record,
};
