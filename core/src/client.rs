//! Stateless request builder and response parser for the school backend.
//!
//! # Design
//! `DataClient` holds its base URL, the filter table and an endpoint
//! resolver, none of which change after construction. Each operation splits
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`; `send` glues the two around a
//! `Transport` for callers that want the round trip done for them.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::Operation;
use crate::config::Config;
use crate::endpoint::{EndpointResolver, IdentityEndpointResolver};
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::query::FilterMap;
use crate::response::check_status;
use crate::types::{CreateRequest, CreateResult, ListRequest, ListResult};

#[derive(Clone)]
pub struct DataClient {
    base_url: String,
    filters: Arc<FilterMap>,
    endpoints: Arc<dyn EndpointResolver>,
}

impl std::fmt::Debug for DataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataClient")
            .field("base_url", &self.base_url)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

impl DataClient {
    /// Client with the school filter table and identity endpoints.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::with_parts(
            config,
            FilterMap::school()?,
            IdentityEndpointResolver,
        ))
    }

    pub fn with_parts(
        config: &Config,
        filters: FilterMap,
        endpoints: impl EndpointResolver + 'static,
    ) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            filters: Arc::new(filters),
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build<O: Operation>(&self, op: &O) -> Result<HttpRequest, ApiError> {
        let body = op.body()?;
        Ok(self.assemble(op, body))
    }

    pub fn parse<O: Operation>(&self, response: &HttpResponse) -> Result<O::Output, ApiError> {
        check_status(response)?;
        O::map_response(response)
    }

    /// Builds, executes and parses `op` in one call.
    pub fn send<O: Operation, T: Transport>(
        &self,
        transport: &T,
        op: &O,
    ) -> Result<O::Output, ApiError> {
        let request = self.build(op)?;
        let response = transport.execute(&request)?;
        self.parse::<O>(&response)
    }

    pub fn build_list(&self, request: &ListRequest) -> HttpRequest {
        self.assemble(request, None)
    }

    pub fn parse_list(&self, response: &HttpResponse) -> Result<ListResult, ApiError> {
        self.parse::<ListRequest>(response)
    }

    pub fn build_create(&self, request: &CreateRequest) -> Result<HttpRequest, ApiError> {
        self.build(request)
    }

    pub fn parse_create(&self, response: &HttpResponse) -> Result<CreateResult, ApiError> {
        self.parse::<CreateRequest>(response)
    }

    fn assemble<O: Operation>(&self, op: &O, body: Option<String>) -> HttpRequest {
        let query = op.params(&self.filters);
        let url = format!("{}{}", self.base_url, op.endpoint(self.endpoints.as_ref()));
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };

        debug!(
            operation = O::NAME,
            resource = op.resource(),
            method = %O::METHOD,
            %url,
            params = query.len(),
            "built request"
        );

        HttpRequest {
            method: O::METHOD,
            url,
            query,
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::endpoint::ConfigurableEndpointResolver;
    use crate::http::HttpMethod;
    use crate::types::{Filter, ParamValue};

    fn client() -> DataClient {
        DataClient::new(&Config::new("http://localhost:3000").unwrap()).unwrap()
    }

    /// Records the last request and replays a canned response.
    struct StubTransport {
        response: HttpResponse,
        seen: RefCell<Option<HttpRequest>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: HttpResponse::new(status, body),
                seen: RefCell::new(None),
            }
        }
    }

    impl Transport for StubTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            *self.seen.borrow_mut() = Some(request.clone());
            Ok(self.response.clone())
        }
    }

    struct DownTransport;

    impl Transport for DownTransport {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".into()))
        }
    }

    #[test]
    fn build_list_produces_get_with_params() {
        let req = client().build_list(
            &ListRequest::new("subjects")
                .paginate(2, 20)
                .filter(Filter::eq("department", "Physics")),
        );
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/subjects");
        assert_eq!(req.query.get("page"), Some(&ParamValue::from(2u64)));
        assert_eq!(req.query.get("limit"), Some(&ParamValue::from(20u64)));
        assert_eq!(req.query.get("department"), Some(&ParamValue::from("Physics")));
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_matches_generic_build() {
        let c = client();
        let request = ListRequest::new("classes").filter(Filter::contains("name", "Intro"));
        assert_eq!(c.build_list(&request), c.build(&request).unwrap());
    }

    #[test]
    fn build_create_produces_post_with_json_body() {
        let variables = json!({"name": "Physics 1A", "capacity": 30});
        let req = client()
            .build_create(&CreateRequest::new("classes", variables.clone()))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/classes");
        assert!(req.query.is_empty());
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, variables);
    }

    #[test]
    fn custom_resolver_changes_only_the_path() {
        let config = Config::new("http://api.test/v1").unwrap();
        let c = DataClient::with_parts(
            &config,
            FilterMap::school().unwrap(),
            ConfigurableEndpointResolver::new().route("users", "people"),
        );
        let req = c.build_list(&ListRequest::new("users"));
        assert_eq!(req.url, "http://api.test/v1/people");
        assert_eq!(req.query.len(), 2);
    }

    #[test]
    fn parse_list_success() {
        let result = client()
            .parse_list(&HttpResponse::new(
                200,
                r#"{"data":[{"id":1,"name":"Quantum Physics"}],"pagination":{"total":12}}"#,
            ))
            .unwrap();
        assert_eq!(result.total, 12);
        assert_eq!(result.data[0]["name"], "Quantum Physics");
    }

    #[test]
    fn parse_list_failure_is_normalized() {
        let err = client()
            .parse_list(&HttpResponse::new(404, r#"{"message":"Not found"}"#))
            .unwrap_err();
        assert_eq!(err, ApiError::http("Not found", 404));
    }

    #[test]
    fn parse_create_failure_with_garbage_body() {
        let err = client()
            .parse_create(&HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert_eq!(err, ApiError::http("Request failed!", 500));
    }

    #[test]
    fn send_runs_the_whole_pipeline() {
        let transport = StubTransport::new(200, r#"{"data":[{"id":1},{"id":2}]}"#);
        let result = client()
            .send(&transport, &ListRequest::new("classes").filter(Filter::eq("teacher", "John Doe")))
            .unwrap();
        assert_eq!(result.total, 2);

        let seen = transport.seen.borrow().clone().unwrap();
        assert_eq!(seen.query.get("teacher"), Some(&ParamValue::from("John Doe")));
    }

    #[test]
    fn send_create_returns_record() {
        let transport = StubTransport::new(201, r#"{"data":{"id":9}}"#);
        let result = client()
            .send(&transport, &CreateRequest::new("subjects", json!({"name": "Law"})))
            .unwrap();
        assert_eq!(result.data["id"], 9);
    }

    #[test]
    fn send_surfaces_transport_failure() {
        let err = client()
            .send(&DownTransport, &ListRequest::new("subjects"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DataClient>();
    }
}
