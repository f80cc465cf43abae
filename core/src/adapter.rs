//! The three extension points, per adapter kind.
//!
//! # Design
//! Each request type knows how to resolve its endpoint, how to build its
//! query parameters and body, and how to map a successful response. The
//! client drives any `Operation` through the same pipeline:
//! build params → resolve endpoint → issue request → parse or normalize.

use crate::endpoint::EndpointResolver;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse};
use crate::query::{FilterMap, QueryParams};
use crate::response::{parse_create, parse_list};
use crate::types::{CreateRequest, CreateResult, ListRequest, ListResult};

pub trait Operation {
    type Output;

    const METHOD: HttpMethod;

    /// Short name used in logs.
    const NAME: &'static str;

    fn resource(&self) -> &str;

    fn endpoint(&self, resolver: &dyn EndpointResolver) -> String;

    fn params(&self, filters: &FilterMap) -> QueryParams;

    /// JSON body, if the operation sends one.
    fn body(&self) -> Result<Option<String>, ApiError>;

    /// Maps a 2xx response to the operation's result.
    fn map_response(response: &HttpResponse) -> Result<Self::Output, ApiError>;
}

impl Operation for ListRequest {
    type Output = ListResult;

    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "list";

    fn resource(&self) -> &str {
        &self.resource
    }

    fn endpoint(&self, resolver: &dyn EndpointResolver) -> String {
        resolver.list_endpoint(&self.resource)
    }

    fn params(&self, filters: &FilterMap) -> QueryParams {
        filters.build_params(&self.resource, self.pagination, &self.filters)
    }

    fn body(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }

    fn map_response(response: &HttpResponse) -> Result<ListResult, ApiError> {
        parse_list(response)
    }
}

impl Operation for CreateRequest {
    type Output = CreateResult;

    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "create";

    fn resource(&self) -> &str {
        &self.resource
    }

    fn endpoint(&self, resolver: &dyn EndpointResolver) -> String {
        resolver.create_endpoint(&self.resource)
    }

    fn params(&self, _filters: &FilterMap) -> QueryParams {
        QueryParams::new()
    }

    fn body(&self) -> Result<Option<String>, ApiError> {
        serde_json::to_string(&self.variables)
            .map(Some)
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }

    fn map_response(response: &HttpResponse) -> Result<CreateResult, ApiError> {
        parse_create(response)
    }
}
