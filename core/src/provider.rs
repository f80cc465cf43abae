//! Data providers: the surface a CRUD framework binds to.
//!
//! Every operation defaults to `ApiError::Unsupported`, so a provider that
//! only implements list and create fails loudly on the rest instead of
//! quietly doing nothing.

use serde_json::{json, Value};

use crate::client::DataClient;
use crate::error::{ApiError, Result};
use crate::http::Transport;
use crate::types::{CreateRequest, CreateResult, ListRequest, ListResult, Record};

pub trait DataProvider {
    fn list(&self, request: &ListRequest) -> Result<ListResult> {
        Err(ApiError::unsupported("list", &request.resource))
    }

    fn create(&self, request: &CreateRequest) -> Result<CreateResult> {
        Err(ApiError::unsupported("create", &request.resource))
    }

    fn get_one(&self, resource: &str, _id: &str) -> Result<Record> {
        Err(ApiError::unsupported("getOne", resource))
    }

    fn update(&self, resource: &str, _id: &str, _variables: &Value) -> Result<Record> {
        Err(ApiError::unsupported("update", resource))
    }

    fn delete_one(&self, resource: &str, _id: &str) -> Result<Record> {
        Err(ApiError::unsupported("deleteOne", resource))
    }
}

/// REST-backed provider: list and create go over `transport`.
#[derive(Debug, Clone)]
pub struct RestDataProvider<T> {
    client: DataClient,
    transport: T,
}

impl<T: Transport> RestDataProvider<T> {
    pub fn new(client: DataClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &DataClient {
        &self.client
    }
}

impl<T: Transport> DataProvider for RestDataProvider<T> {
    fn list(&self, request: &ListRequest) -> Result<ListResult> {
        self.client.send(&self.transport, request)
    }

    fn create(&self, request: &CreateRequest) -> Result<CreateResult> {
        self.client.send(&self.transport, request)
    }
}

/// Offline provider serving the built-in subject catalogue.
///
/// `subjects` lists the whole catalogue in one page; any other resource
/// lists empty. Nothing else is available.
#[derive(Debug, Clone)]
pub struct MockDataProvider {
    subjects: Vec<Record>,
}

impl Default for MockDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDataProvider {
    pub fn new() -> Self {
        Self {
            subjects: subject_catalogue(),
        }
    }
}

impl DataProvider for MockDataProvider {
    fn list(&self, request: &ListRequest) -> Result<ListResult> {
        if request.resource != "subjects" {
            return Ok(ListResult::default());
        }
        Ok(ListResult {
            data: self.subjects.clone(),
            total: self.subjects.len() as u64,
        })
    }
}

fn subject_catalogue() -> Vec<Record> {
    let subjects = json!([
        {
            "id": 1,
            "name": "Introduction to Computer Science",
            "code": "CS101",
            "department": "Computer Science",
            "description": "A foundational course covering the basics of computer science, including algorithms, data structures, and problem-solving techniques."
        },
        {
            "id": 2,
            "name": "Advanced Calculus",
            "code": "MATH301",
            "department": "Mathematics",
            "description": "An in-depth study of multivariable calculus, vector analysis, and differential equations with applications in physics and engineering."
        },
        {
            "id": 3,
            "name": "Quantum Physics",
            "code": "PHY401",
            "department": "Physics",
            "description": "Explores the fundamental principles of quantum mechanics, including wave-particle duality, the Schrodinger equation, and atomic theory."
        }
    ]);

    match subjects {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
