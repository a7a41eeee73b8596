//! In-memory stand-in for the pets records server, used to exercise the
//! client over real HTTP.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const NAME_BLANK: &str = "Name can't be blank";
pub const KIND_INVALID: &str = "Kind must be 'cat' or 'dog'";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    pub kind: Option<String>,
    pub photo: Option<String>,
}

/// Body of `POST /pets` and `PUT /pets/{id}`. Every field is optional on
/// the wire so that a missing or blank value is reported as a validation
/// message instead of a deserialization failure. An `id` in the body is
/// ignored; the path decides.
#[derive(Debug, Default, Deserialize)]
pub struct PetInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Validated field values, ready to be stored under an id.
struct Fields {
    name: String,
    kind: String,
    photo: Option<String>,
}

impl PetInput {
    fn validate(self) -> Result<Fields, ValidationErrors> {
        let name = self.name.unwrap_or_default();
        let kind = self.kind.unwrap_or_default();
        let mut errors = ValidationErrors::default();
        if name.trim().is_empty() {
            errors.name = Some(NAME_BLANK.to_string());
        }
        if kind != "cat" && kind != "dog" {
            errors.kind = Some(KIND_INVALID.to_string());
        }
        if errors.name.is_some() || errors.kind.is_some() {
            return Err(errors);
        }
        Ok(Fields {
            name,
            kind,
            photo: self.photo,
        })
    }
}

/// Pets in insertion order plus the next id to hand out.
#[derive(Debug, Default)]
pub struct Records {
    pets: Vec<Pet>,
    next_id: u64,
}

impl Records {
    fn insert(&mut self, fields: Fields) -> Pet {
        self.next_id += 1;
        let pet = Pet {
            id: self.next_id,
            name: fields.name,
            kind: Some(fields.kind),
            photo: fields.photo,
        };
        self.pets.push(pet.clone());
        pet
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| p.id == id)
    }
}

pub type Db = Arc<RwLock<Records>>;

enum Rejection {
    NotFound,
    Invalid(ValidationErrors),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::NotFound => StatusCode::NOT_FOUND.into_response(),
            Rejection::Invalid(errors) => {
                debug!(?errors, "rejecting pet");
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
        }
    }
}

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router pre-loaded with `pets`. Ids handed out later continue after the
/// highest seeded id.
pub fn app_with(pets: Vec<Pet>) -> Router {
    let next_id = pets.iter().map(|p| p.id).max().unwrap_or(0);
    let db: Db = Arc::new(RwLock::new(Records { pets, next_id }));
    Router::new()
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/{id}", get(get_pet).put(update_pet).delete(delete_pet))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock pets server listening");
    }
    axum::serve(listener, app()).await
}

async fn list_pets(State(db): State<Db>) -> Json<Vec<Pet>> {
    let records = db.read().await;
    Json(records.pets.clone())
}

async fn create_pet(
    State(db): State<Db>,
    Json(input): Json<PetInput>,
) -> Result<(StatusCode, Json<Pet>), Rejection> {
    let fields = input.validate().map_err(Rejection::Invalid)?;
    let pet = db.write().await.insert(fields);
    debug!(id = pet.id, "pet created");
    Ok((StatusCode::CREATED, Json(pet)))
}

async fn get_pet(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Pet>, Rejection> {
    let records = db.read().await;
    records
        .pets
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(Rejection::NotFound)
}

async fn update_pet(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<PetInput>,
) -> Result<Json<Pet>, Rejection> {
    let mut records = db.write().await;
    let pet = records.get_mut(id).ok_or(Rejection::NotFound)?;
    let fields = input.validate().map_err(Rejection::Invalid)?;
    pet.name = fields.name;
    pet.kind = Some(fields.kind);
    pet.photo = fields.photo;
    debug!(id, "pet updated");
    Ok(Json(pet.clone()))
}

async fn delete_pet(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Pet>, Rejection> {
    let mut records = db.write().await;
    let index = records
        .pets
        .iter()
        .position(|p| p.id == id)
        .ok_or(Rejection::NotFound)?;
    debug!(id, "pet deleted");
    Ok(Json(records.pets.remove(index)))
}
