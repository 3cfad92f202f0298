use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyProgram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_loyalty_program: Option<i64>,
    pub loyalty_level: i32,
    pub discount_amount: i32,
    pub validity_period: i32,
    pub description: String,
}

/// A client's program, embedded or by id. Responses always embed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgramRef {
    Embedded(LoyaltyProgram),
    Id(i64),
}

impl ProgramRef {
    pub fn id(&self) -> Option<i64> {
        match self {
            ProgramRef::Embedded(program) => program.id_loyalty_program,
            ProgramRef::Id(id) => Some(*id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_client: Option<i64>,
    pub last_name: String,
    pub first_name: String,
    pub patronymic: String,
    pub phone_number: String,
    pub address: String,
    pub email: String,
    pub date_registration: String,
    pub loyalty_program: ProgramRef,
}

/// In-memory tables. Stored clients reference their program by id.
#[derive(Debug, Default)]
pub struct Store {
    programs: BTreeMap<i64, LoyaltyProgram>,
    clients: BTreeMap<i64, Client>,
    last_program_id: i64,
    last_client_id: i64,
}

impl Store {
    fn resolve_program(&self, reference: &ProgramRef) -> Option<i64> {
        reference.id().filter(|id| self.programs.contains_key(id))
    }

    fn render_client(&self, client: &Client) -> Client {
        let mut rendered = client.clone();
        if let Some(program) = client.loyalty_program.id().and_then(|id| self.programs.get(&id)) {
            rendered.loyalty_program = ProgramRef::Embedded(program.clone());
        }
        rendered
    }

    fn is_program_in_use(&self, program_id: i64) -> bool {
        self.clients
            .values()
            .any(|client| client.loyalty_program.id() == Some(program_id))
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).patch(patch_client).delete(delete_client),
        )
        .route("/lp", get(list_programs).post(create_program))
        .route(
            "/lp/{id}",
            get(get_program).patch(patch_program).delete(delete_program),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Overlay `changes` onto `current`, keeping `id_key` as it was, and check
/// the result still has the entity's shape.
fn merge<T: Serialize + DeserializeOwned>(
    current: &T,
    changes: Map<String, Value>,
    id_key: &str,
) -> Result<T, StatusCode> {
    let mut value = serde_json::to_value(current).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let Value::Object(fields) = &mut value else {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    };
    for (key, change) in changes {
        if key != id_key {
            fields.insert(key, change);
        }
    }
    serde_json::from_value(value).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)
}

// --- clients ---

async fn list_clients(State(db): State<Db>) -> Json<Vec<Client>> {
    let store = db.read().await;
    Json(store.clients.values().map(|c| store.render_client(c)).collect())
}

async fn create_client(
    State(db): State<Db>,
    Json(input): Json<Client>,
) -> Result<(StatusCode, Json<Client>), StatusCode> {
    let mut store = db.write().await;
    let program_id = store
        .resolve_program(&input.loyalty_program)
        .ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    store.last_client_id += 1;
    let id = store.last_client_id;
    let client = Client {
        id_client: Some(id),
        loyalty_program: ProgramRef::Id(program_id),
        ..input
    };
    let rendered = store.render_client(&client);
    store.clients.insert(id, client);
    tracing::info!(id, program_id, "client created");
    Ok((StatusCode::CREATED, Json(rendered)))
}

async fn get_client(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, StatusCode> {
    let store = db.read().await;
    store
        .clients
        .get(&id)
        .map(|c| Json(store.render_client(c)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn patch_client(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(changes): Json<Map<String, Value>>,
) -> Result<Json<Client>, StatusCode> {
    let mut store = db.write().await;
    let current = store
        .clients
        .get(&id)
        .map(|c| store.render_client(c))
        .ok_or(StatusCode::NOT_FOUND)?;
    let merged: Client = merge(&current, changes, "id_client")?;
    let program_id = store
        .resolve_program(&merged.loyalty_program)
        .ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let client = Client {
        id_client: Some(id),
        loyalty_program: ProgramRef::Id(program_id),
        ..merged
    };
    let rendered = store.render_client(&client);
    store.clients.insert(id, client);
    tracing::info!(id, "client updated");
    Ok(Json(rendered))
}

async fn delete_client(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .clients
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

// --- loyalty programs ---

async fn list_programs(State(db): State<Db>) -> Json<Vec<LoyaltyProgram>> {
    let store = db.read().await;
    Json(store.programs.values().cloned().collect())
}

async fn create_program(
    State(db): State<Db>,
    Json(input): Json<LoyaltyProgram>,
) -> (StatusCode, Json<LoyaltyProgram>) {
    let mut store = db.write().await;
    store.last_program_id += 1;
    let id = store.last_program_id;
    let program = LoyaltyProgram {
        id_loyalty_program: Some(id),
        ..input
    };
    store.programs.insert(id, program.clone());
    tracing::info!(id, "loyalty program created");
    (StatusCode::CREATED, Json(program))
}

async fn get_program(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<LoyaltyProgram>, StatusCode> {
    let store = db.read().await;
    store.programs.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn patch_program(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(changes): Json<Map<String, Value>>,
) -> Result<Json<LoyaltyProgram>, StatusCode> {
    let mut store = db.write().await;
    let current = store.programs.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let merged: LoyaltyProgram = merge(current, changes, "id_loyalty_program")?;
    store.programs.insert(id, merged.clone());
    tracing::info!(id, "loyalty program updated");
    Ok(Json(merged))
}

async fn delete_program(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    if !store.programs.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    if store.is_program_in_use(id) {
        tracing::warn!(id, "refusing to delete loyalty program still in use");
        return Err(StatusCode::CONFLICT);
    }
    store.programs.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
