//! In-process pet store used as the conformant service in end-to-end tests.
//!
//! Mirrors the subset of the public pet-store API the harness exercises:
//! find by status, create, update, fetch and delete. Every response carries
//! the CORS and `server` headers the real service sends.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    middleware::map_response,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const STATUSES: [&str; 3] = ["available", "pending", "sold"];

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, DELETE, PUT";
pub const ALLOW_HEADERS: &str = "Content-Type, api_key, Authorization";
pub const SERVER_NAME: &str = "Jetty(9.2.9.v20150224)";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub category: Option<Category>,
    pub name: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error and acknowledgement envelope used by the pet store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    pets: BTreeMap<i64, Pet>,
    next_id: i64,
}

impl Store {
    fn with_pets(pets: Vec<Pet>) -> Self {
        let mut store = Store {
            pets: BTreeMap::new(),
            next_id: 1,
        };
        for pet in pets {
            store.insert(pet);
        }
        store
    }

    /// Insert or replace, assigning an id when the pet has none.
    fn insert(&mut self, mut pet: Pet) -> Pet {
        if pet.id <= 0 {
            pet.id = self.next_id;
        }
        self.next_id = self.next_id.max(pet.id.saturating_add(1));
        self.pets.insert(pet.id, pet.clone());
        pet
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiError = (StatusCode, Json<ApiResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ApiResponse {
            code: 1,
            kind: "error".to_string(),
            message: message.to_string(),
        }),
    )
}

/// Two pets per status, ids 1 through 6.
pub fn sample_pets() -> Vec<Pet> {
    let names = ["Rex", "Fluffy", "Bella", "Max", "Luna", "Charlie"];
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Pet {
            id: i as i64 + 1,
            category: Some(Category {
                id: 1,
                name: "Dogs".to_string(),
            }),
            name: name.to_string(),
            photo_urls: vec![format!("https://example.com/{}.jpg", name.to_lowercase())],
            tags: Vec::new(),
            status: Some(STATUSES[i / 2].to_string()),
        })
        .collect()
}

pub fn app() -> Router {
    app_with(sample_pets())
}

pub fn app_with(pets: Vec<Pet>) -> Router {
    let db: Db = Arc::new(RwLock::new(Store::with_pets(pets)));
    Router::new()
        .route("/pet", post(create_pet).put(update_pet))
        .route("/pet/findByStatus", get(find_by_status))
        .route("/pet/{petId}", get(get_pet).delete(delete_pet))
        .layer(map_response(petstore_headers))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn petstore_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(header::SERVER, HeaderValue::from_static(SERVER_NAME));
    response
}

async fn find_by_status(
    State(db): State<Db>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Pet>>, ApiError> {
    let status = query
        .status
        .filter(|s| STATUSES.contains(&s.as_str()))
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Invalid status value"))?;
    let store = db.read().await;
    let pets: Vec<Pet> = store
        .pets
        .values()
        .filter(|pet| pet.status.as_deref() == Some(status.as_str()))
        .cloned()
        .collect();
    tracing::debug!(%status, count = pets.len(), "find by status");
    Ok(Json(pets))
}

async fn create_pet(State(db): State<Db>, Json(input): Json<Pet>) -> Json<Pet> {
    let pet = db.write().await.insert(input);
    tracing::info!(id = pet.id, name = %pet.name, "created pet");
    Json(pet)
}

async fn update_pet(State(db): State<Db>, Json(input): Json<Pet>) -> Result<Json<Pet>, ApiError> {
    if input.id <= 0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "Invalid ID supplied"));
    }
    let mut store = db.write().await;
    if !store.pets.contains_key(&input.id) {
        return Err(api_error(StatusCode::NOT_FOUND, "Pet not found"));
    }
    let pet = store.insert(input);
    tracing::info!(id = pet.id, name = %pet.name, "updated pet");
    Ok(Json(pet))
}

async fn get_pet(State(db): State<Db>, Path(pet_id): Path<i64>) -> Result<Json<Pet>, ApiError> {
    let store = db.read().await;
    store
        .pets
        .get(&pet_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Pet not found"))
}

async fn delete_pet(
    State(db): State<Db>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ApiResponse>, ApiError> {
    let mut store = db.write().await;
    store
        .pets
        .remove(&pet_id)
        .map(|_| {
            Json(ApiResponse {
                code: 200,
                kind: "unknown".to_string(),
                message: pet_id.to_string(),
            })
        })
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Pet not found"))
}
