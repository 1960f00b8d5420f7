use std::{collections::BTreeMap, collections::HashMap, net::Ipv4Addr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

const DEFAULT_MAX_KEYS: usize = 1000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadBalancer {
    #[serde(rename = "blbId")]
    pub blb_id: String,
    pub name: String,
    pub desc: String,
    pub address: String,
    pub status: String,
    #[serde(rename = "publicIp")]
    pub public_ip: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateLoadBalancer {
    pub desc: String,
    pub name: String,
    pub vpc_id: String,
    pub subnet_id: String,
    pub allocate_vip: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateLoadBalancerResponse {
    #[serde(rename = "blbId")]
    pub blb_id: String,
    pub address: String,
    pub desc: String,
    pub name: String,
}

/// `desc` is applied whenever present, so `""` clears it; an empty `name`
/// leaves the name unchanged.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateLoadBalancer {
    pub desc: Option<String>,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub marker: String,
    pub is_truncated: bool,
    pub next_marker: String,
    pub max_keys: usize,
    pub blb_list: Vec<LoadBalancer>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub request_id: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    pub blb_id: String,
    pub name: String,
    pub bcc_id: String,
    pub address: String,
    pub exactly_match: Option<bool>,
    pub marker: Option<String>,
    pub max_keys: Option<usize>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenQuery {
    pub client_token: Option<String>,
}

#[derive(Default)]
pub struct Store {
    /// Keyed by id so listings come out sorted and markers are ids.
    pub blbs: BTreeMap<String, LoadBalancer>,
    /// Create responses by client token, replayed on retries.
    pub tokens: HashMap<String, CreateLoadBalancerResponse>,
    pub next_address: u32,
}

pub type Db = Arc<RwLock<Store>>;

pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code.to_string(),
            message: self.message,
            request_id: Uuid::new_v4().to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/v1/blb", get(list_blbs).post(create_blb))
        .route("/v1/blb/{id}", put(update_blb).delete(delete_blb))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock blb server listening");
    }
    axum::serve(listener, app()).await
}

/// The `n`th address inside `base`, spread across the host bits of a
/// network with `prefix` leading bits. Wraps once the host bits run out.
fn nth_address(base: Ipv4Addr, prefix: u32, n: u32) -> Ipv4Addr {
    let host_mask = u32::MAX >> prefix;
    Ipv4Addr::from((u32::from(base) & !host_mask) | (n & host_mask))
}

fn filter_matches(filter: &str, value: &str, exact: bool) -> bool {
    filter.is_empty() || if exact { value == filter } else { value.contains(filter) }
}

async fn list_blbs(State(db): State<Db>, Query(query): Query<ListQuery>) -> Json<ListResponse> {
    let store = db.read().await;
    let exact = query.exactly_match.unwrap_or(false);
    let max_keys = query.max_keys.filter(|n| *n > 0).unwrap_or(DEFAULT_MAX_KEYS);
    let marker = query.marker.unwrap_or_default();

    let mut hits = store
        .blbs
        .range(marker.clone()..)
        .map(|(_, blb)| blb)
        .filter(|blb| filter_matches(&query.blb_id, &blb.blb_id, true))
        .filter(|blb| filter_matches(&query.name, &blb.name, exact))
        .filter(|blb| filter_matches(&query.address, &blb.address, exact))
        // Instances are not modelled; a bcc filter never matches.
        .filter(|_| query.bcc_id.is_empty());

    let blb_list: Vec<LoadBalancer> = hits.by_ref().take(max_keys).cloned().collect();
    let next_marker = hits.next().map(|blb| blb.blb_id.clone()).unwrap_or_default();
    debug!(count = blb_list.len(), %next_marker, "listed blbs");

    Json(ListResponse {
        marker,
        is_truncated: !next_marker.is_empty(),
        next_marker,
        max_keys,
        blb_list,
    })
}

async fn create_blb(
    State(db): State<Db>,
    Query(query): Query<TokenQuery>,
    Json(input): Json<Option<CreateLoadBalancer>>,
) -> Json<CreateLoadBalancerResponse> {
    let mut store = db.write().await;
    if let Some(resp) = query.client_token.as_ref().and_then(|t| store.tokens.get(t)) {
        debug!(blb_id = %resp.blb_id, "replaying create for known client token");
        return Json(resp.clone());
    }

    let input = input.unwrap_or_default();
    store.next_address = store.next_address.wrapping_add(1);
    let id = format!("lb-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let blb = LoadBalancer {
        blb_id: id.clone(),
        name: if input.name.is_empty() { id.clone() } else { input.name },
        desc: input.desc,
        address: nth_address(Ipv4Addr::new(10, 0, 0, 0), 8, store.next_address).to_string(),
        status: "available".to_string(),
        public_ip: if input.allocate_vip {
            nth_address(Ipv4Addr::new(180, 76, 0, 0), 16, store.next_address).to_string()
        } else {
            String::new()
        },
    };
    let resp = CreateLoadBalancerResponse {
        blb_id: blb.blb_id.clone(),
        address: blb.address.clone(),
        desc: blb.desc.clone(),
        name: blb.name.clone(),
    };
    info!(blb_id = %id, vpc_id = %input.vpc_id, subnet_id = %input.subnet_id, "created blb");
    store.blbs.insert(id, blb);
    if let Some(token) = query.client_token {
        store.tokens.insert(token, resp.clone());
    }
    Json(resp)
}

fn require_token(query: &TokenQuery) -> Result<(), ApiError> {
    match query.client_token.as_deref() {
        Some(token) if !token.is_empty() => Ok(()),
        _ => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "MissingClientToken",
            "clientToken is required",
        )),
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "NoSuchObject", format!("blb {id} not found"))
}

async fn update_blb(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
    Json(input): Json<UpdateLoadBalancer>,
) -> Result<StatusCode, ApiError> {
    require_token(&query)?;
    let mut store = db.write().await;
    let blb = store.blbs.get_mut(&id).ok_or_else(|| not_found(&id))?;
    if let Some(desc) = input.desc {
        blb.desc = desc;
    }
    if !input.name.is_empty() {
        blb.name = input.name;
    }
    info!(blb_id = %id, "updated blb");
    Ok(StatusCode::OK)
}

async fn delete_blb(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<StatusCode, ApiError> {
    require_token(&query)?;
    let mut store = db.write().await;
    store.blbs.remove(&id).ok_or_else(|| not_found(&id))?;
    info!(blb_id = %id, "deleted blb");
    Ok(StatusCode::OK)
}
