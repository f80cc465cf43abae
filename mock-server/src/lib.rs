use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub id: u64,
    pub name: String,
    pub code: String,
    pub department: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Named {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub capacity: u32,
    pub subject: Named,
    pub teacher: Named,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct CreateSubject {
    pub name: String,
    pub code: String,
    pub department: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClass {
    pub name: String,
    pub subject_id: u64,
    pub teacher_id: u64,
    pub capacity: u32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Query string accepted by every list route. Unused keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub department: Option<String>,
    pub subject: Option<String>,
    pub teacher: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Default)]
pub struct Store {
    pub subjects: Vec<Subject>,
    pub classes: Vec<Class>,
    pub users: Vec<User>,
}

impl Store {
    /// Subject catalogue and teaching staff the admin UI starts with.
    pub fn seeded() -> Self {
        let subjects = vec![
            Subject {
                id: 1,
                name: "Introduction to Computer Science".into(),
                code: "CS101".into(),
                department: "Computer Science".into(),
                description: "A foundational course covering the basics of computer science, including algorithms, data structures, and problem-solving techniques.".into(),
            },
            Subject {
                id: 2,
                name: "Advanced Calculus".into(),
                code: "MATH301".into(),
                department: "Mathematics".into(),
                description: "An in-depth study of multivariable calculus, vector analysis, and differential equations with applications in physics and engineering.".into(),
            },
            Subject {
                id: 3,
                name: "Quantum Physics".into(),
                code: "PHY401".into(),
                department: "Physics".into(),
                description: "Explores the fundamental principles of quantum mechanics, including wave-particle duality, the Schrodinger equation, and atomic theory.".into(),
            },
        ];
        let users = vec![
            user(1, "John Doe", "john.doe@school.test", "teacher"),
            user(2, "Jane Smith", "jane.smith@school.test", "teacher"),
            user(3, "Dr. Alan Turing", "alan.turing@school.test", "teacher"),
            user(4, "Ada Student", "ada@school.test", "student"),
            user(5, "Admin", "admin@school.test", "admin"),
        ];
        Self {
            subjects,
            classes: Vec::new(),
            users,
        }
    }
}

fn user(id: u64, name: &str, email: &str, role: &str) -> User {
    User {
        id,
        name: name.into(),
        email: email.into(),
        role: role.into(),
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/classes", get(list_classes).post(create_class))
        .route("/users", get(list_users).post(create_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

fn created<T: Serialize>(record: T) -> Response {
    (StatusCode::CREATED, Json(DataEnvelope { data: record })).into_response()
}

fn matches_search(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn paginate<T: Clone>(items: Vec<&T>, query: &ListQuery) -> ListEnvelope<T> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let total = items.len();
    let data = items
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .cloned()
        .collect();
    ListEnvelope {
        data,
        pagination: PageInfo {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    }
}

fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}

async fn list_subjects(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Json<ListEnvelope<Subject>> {
    let store = db.read().await;
    let items = store
        .subjects
        .iter()
        .filter(|s| {
            query
                .search
                .as_deref()
                .map_or(true, |q| matches_search(&s.name, q) || matches_search(&s.code, q))
        })
        .filter(|s| query.department.as_deref().map_or(true, |d| s.department == d))
        .collect();
    Json(paginate(items, &query))
}

async fn create_subject(State(db): State<Db>, Json(input): Json<CreateSubject>) -> Response {
    if input.name.trim().is_empty() || input.code.trim().is_empty() {
        return bad_request("Subject name and code are required");
    }
    let mut store = db.write().await;
    if store.subjects.iter().any(|s| s.code.eq_ignore_ascii_case(&input.code)) {
        return bad_request("Subject code already exists");
    }
    let subject = Subject {
        id: next_id(store.subjects.iter().map(|s| s.id)),
        name: input.name,
        code: input.code,
        department: input.department,
        description: input.description,
    };
    store.subjects.push(subject.clone());
    info!(id = subject.id, code = %subject.code, "created subject");
    created(subject)
}

async fn list_classes(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Json<ListEnvelope<Class>> {
    let store = db.read().await;
    let items = store
        .classes
        .iter()
        .filter(|c| query.search.as_deref().map_or(true, |q| matches_search(&c.name, q)))
        .filter(|c| query.subject.as_deref().map_or(true, |s| c.subject.name == s))
        .filter(|c| query.teacher.as_deref().map_or(true, |t| c.teacher.name == t))
        .collect();
    Json(paginate(items, &query))
}

async fn create_class(State(db): State<Db>, Json(input): Json<CreateClass>) -> Response {
    if input.name.trim().is_empty() {
        return bad_request("Class name is required");
    }
    if input.capacity == 0 {
        return bad_request("Capacity must be positive");
    }
    let mut store = db.write().await;
    let Some(subject) = store.subjects.iter().find(|s| s.id == input.subject_id) else {
        return bad_request("Subject not found");
    };
    let subject = Named {
        id: subject.id,
        name: subject.name.clone(),
    };
    let Some(teacher) = store
        .users
        .iter()
        .find(|u| u.id == input.teacher_id && u.role == "teacher")
    else {
        return bad_request("Teacher not found");
    };
    let teacher = Named {
        id: teacher.id,
        name: teacher.name.clone(),
    };
    let class = Class {
        id: next_id(store.classes.iter().map(|c| c.id)),
        name: input.name,
        status: input.status.unwrap_or_else(|| "active".to_string()),
        capacity: input.capacity,
        subject,
        teacher,
        banner_url: input.banner_url,
    };
    store.classes.push(class.clone());
    info!(id = class.id, name = %class.name, "created class");
    created(class)
}

async fn list_users(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Json<ListEnvelope<User>> {
    let store = db.read().await;
    let items = store
        .users
        .iter()
        .filter(|u| {
            query
                .search
                .as_deref()
                .map_or(true, |q| matches_search(&u.name, q) || matches_search(&u.email, q))
        })
        .filter(|u| query.role.as_deref().map_or(true, |r| u.role == r))
        .collect();
    Json(paginate(items, &query))
}

async fn create_user(State(db): State<Db>, Json(input): Json<CreateUser>) -> Response {
    if !matches!(input.role.as_str(), "student" | "teacher" | "admin") {
        return bad_request("Unknown role");
    }
    if !input.email.contains('@') {
        return bad_request("Invalid email address");
    }
    let mut store = db.write().await;
    let user = User {
        id: next_id(store.users.iter().map(|u| u.id)),
        name: input.name,
        email: input.email,
        role: input.role,
    };
    store.users.push(user.clone());
    info!(id = user.id, role = %user.role, "created user");
    created(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_serializes_camel_case() {
        let class = Class {
            id: 1,
            name: "Physics 1A".into(),
            status: "active".into(),
            capacity: 30,
            subject: Named { id: 3, name: "Quantum Physics".into() },
            teacher: Named { id: 2, name: "Jane Smith".into() },
            banner_url: Some("https://cdn.test/a.png".into()),
        };
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["bannerUrl"], "https://cdn.test/a.png");
        assert_eq!(json["subject"]["name"], "Quantum Physics");
    }

    #[test]
    fn create_class_requires_references() {
        let result: Result<CreateClass, _> =
            serde_json::from_str(r#"{"name":"A","capacity":10}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_subject_defaults_description() {
        let input: CreateSubject =
            serde_json::from_str(r#"{"name":"Law I","code":"LAW101","department":"Law"}"#).unwrap();
        assert!(input.description.is_empty());
    }

    #[test]
    fn paginate_slices_and_counts() {
        let items: Vec<u32> = (1..=25).collect();
        let query = ListQuery {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        let page = paginate(items.iter().collect(), &query);
        assert_eq!(page.data, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn paginate_defaults_and_out_of_range() {
        let items: Vec<u32> = (1..=3).collect();
        let page = paginate(items.iter().collect(), &ListQuery::default());
        assert_eq!((page.pagination.page, page.pagination.limit), (1, 10));
        assert_eq!(page.data.len(), 3);

        let query = ListQuery {
            page: Some(9),
            ..Default::default()
        };
        let page = paginate(items.iter().collect(), &query);
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 3);
    }

    #[test]
    fn search_is_case_insensitive() {
        assert!(matches_search("Advanced Calculus", "calc"));
        assert!(!matches_search("Advanced Calculus", "physics"));
    }
}
