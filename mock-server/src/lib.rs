use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub department: String,
    pub position: String,
    pub join_date: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    pub location: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerson {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub department: String,
    pub position: String,
    pub join_date: String,
    pub status: Status,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    pub location: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePerson {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub join_date: Option<String>,
    pub status: Option<Status>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub data: Vec<Person>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub data: Person,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

#[derive(Deserialize)]
pub struct BatchDelete {
    pub ids: Vec<String>,
}

pub type Db = Arc<RwLock<HashMap<String, Person>>>;

type NotFound = (StatusCode, Json<OperationResult>);

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router whose store starts out holding `people`.
pub fn app_with(people: Vec<Person>) -> Router {
    let db: Db = Arc::new(RwLock::new(
        people.into_iter().map(|p| (p.id.clone(), p)).collect(),
    ));
    Router::new()
        .route("/persons", get(list_persons))
        .route("/getPerson/{id}", get(get_person))
        .route("/createPerson", post(create_person))
        .route("/updatePerson/{id}", put(update_person))
        .route("/deletePerson/{id}", delete(delete_person))
        .route("/batchDeletePersons", post(batch_delete_persons))
        .with_state(db)
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// A small fixed roster for manual testing.
pub fn seed_people() -> Vec<Person> {
    let rows = [
        ("Zhang Wei", "Engineering", "Backend Engineer", "2019-04-01", Status::Active, "Beijing"),
        ("Li Na", "Product", "Product Manager", "2020-07-15", Status::Active, "Shanghai"),
        ("Wang Fang", "Design", "UI Designer", "2021-02-20", Status::Inactive, "Hangzhou"),
        ("Liu Yang", "Operations", "Ops Specialist", "2018-11-05", Status::Active, "Shenzhen"),
        ("Chen Jing", "Engineering", "Frontend Engineer", "2022-03-10", Status::Active, "Beijing"),
        ("Zhao Lei", "Engineering", "SRE", "2017-09-30", Status::Inactive, "Chengdu"),
    ];
    rows.iter()
        .enumerate()
        .map(|(i, (name, department, position, joined, status, location))| {
            let handle = name.to_lowercase().replace(' ', ".");
            Person {
                id: format!("{}", i + 1),
                name: name.to_string(),
                email: format!("{handle}@example.com"),
                phone: format!("138-0000-{:04}", i + 1),
                avatar: None,
                department: department.to_string(),
                position: position.to_string(),
                join_date: joined.to_string(),
                status: *status,
                bio: None,
                skills: None,
                location: location.to_string(),
            }
        })
        .collect()
}

fn not_found(id: &str) -> NotFound {
    (
        StatusCode::NOT_FOUND,
        Json(OperationResult {
            success: false,
            message: format!("person {id} not found"),
        }),
    )
}

fn matches_filters(person: &Person, params: &ListParams) -> bool {
    let keyword = params.keyword.to_lowercase();
    if !keyword.is_empty()
        && ![&person.name, &person.email, &person.department]
            .iter()
            .any(|field| field.to_lowercase().contains(&keyword))
    {
        return false;
    }
    if !params.department.is_empty() && person.department != params.department {
        return false;
    }
    if !params.status.is_empty() && person.status.as_str() != params.status {
        return false;
    }
    true
}

async fn list_persons(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Json<ListResponse> {
    let page = params.page.filter(|p| *p >= 1).unwrap_or(1);
    let page_size = params
        .page_size
        .filter(|s| *s >= 1)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let persons = db.read().await;
    let mut hits: Vec<&Person> = persons.values().filter(|p| matches_filters(p, &params)).collect();
    hits.sort_by(|a, b| a.join_date.cmp(&b.join_date).then_with(|| a.id.cmp(&b.id)));

    let total = hits.len() as u64;
    let skip = (page as usize - 1).saturating_mul(page_size as usize);
    let data = hits
        .into_iter()
        .skip(skip)
        .take(page_size as usize)
        .cloned()
        .collect();

    Json(ListResponse {
        data,
        total,
        page,
        page_size,
    })
}

async fn get_person(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<DetailResponse>, NotFound> {
    let persons = db.read().await;
    persons
        .get(&id)
        .cloned()
        .map(|data| Json(DetailResponse { data }))
        .ok_or_else(|| not_found(&id))
}

async fn create_person(
    State(db): State<Db>,
    Json(input): Json<CreatePerson>,
) -> (StatusCode, Json<DetailResponse>) {
    let person = Person {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        email: input.email,
        phone: input.phone,
        avatar: input.avatar,
        department: input.department,
        position: input.position,
        join_date: input.join_date,
        status: input.status,
        bio: input.bio,
        skills: input.skills,
        location: input.location,
    };
    log::info!("created person {}", person.id);
    db.write().await.insert(person.id.clone(), person.clone());
    (StatusCode::CREATED, Json(DetailResponse { data: person }))
}

async fn update_person(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePerson>,
) -> Result<Json<DetailResponse>, NotFound> {
    let mut persons = db.write().await;
    let person = persons.get_mut(&id).ok_or_else(|| not_found(&id))?;
    if let Some(name) = input.name {
        person.name = name;
    }
    if let Some(email) = input.email {
        person.email = email;
    }
    if let Some(phone) = input.phone {
        person.phone = phone;
    }
    if let Some(avatar) = input.avatar {
        person.avatar = Some(avatar);
    }
    if let Some(department) = input.department {
        person.department = department;
    }
    if let Some(position) = input.position {
        person.position = position;
    }
    if let Some(join_date) = input.join_date {
        person.join_date = join_date;
    }
    if let Some(status) = input.status {
        person.status = status;
    }
    if let Some(bio) = input.bio {
        person.bio = Some(bio);
    }
    if let Some(skills) = input.skills {
        person.skills = Some(skills);
    }
    if let Some(location) = input.location {
        person.location = location;
    }
    Ok(Json(DetailResponse {
        data: person.clone(),
    }))
}

async fn delete_person(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<OperationResult>, NotFound> {
    let mut persons = db.write().await;
    persons.remove(&id).ok_or_else(|| not_found(&id))?;
    log::info!("deleted person {id}");
    Ok(Json(OperationResult {
        success: true,
        message: format!("person {id} deleted"),
    }))
}

async fn batch_delete_persons(
    State(db): State<Db>,
    Json(input): Json<BatchDelete>,
) -> Json<OperationResult> {
    let mut persons = db.write().await;
    let requested = input.ids.len();
    let deleted = input
        .ids
        .iter()
        .filter(|id| persons.remove(id.as_str()).is_some())
        .count();
    log::info!("batch delete removed {deleted} of {requested}");
    Json(OperationResult {
        success: deleted == requested,
        message: format!("deleted {deleted} of {requested} persons"),
    })
}
