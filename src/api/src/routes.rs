//! API route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::plan::{
    add_bankroll, add_bet_to_day, generate_plan, remove_bet_from_day, update_bet, BetUpdate,
    DayResult,
};
use crate::stats::PlanStats;
use crate::storage::{PlanRepository, PlanSlot};
use crate::types::{
    BankrollRequest, ConfigInput, ErrorResponse, HealthResponse, PlanState, SavePlanRequest,
    SavedPlanSummary,
};
use crate::validation::{
    validate_amount, validate_bet_update, validate_config, validate_plan, ValidationError,
};

/// Application state shared across handlers.
pub struct AppState {
    pub repo: Mutex<PlanRepository>,
    pub config: AppConfig,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.status.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Storage error: {:#}", err);
        Self::internal("Storage error")
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/plan/generate", post(generate))
        .route(
            "/owners/{owner}/plans/{slot}",
            get(get_plan).put(create_plan).delete(reset_plan),
        )
        .route(
            "/owners/{owner}/plans/{slot}/days/{day_index}/bets",
            post(add_bet),
        )
        .route(
            "/owners/{owner}/plans/{slot}/days/{day_index}/bets/{bet_id}",
            patch(edit_bet).delete(remove_bet),
        )
        .route("/owners/{owner}/plans/{slot}/bankroll", post(add_funds))
        .route("/owners/{owner}/plans/{slot}/stats", get(plan_stats))
        .route("/owners/{owner}/simulation", post(start_simulation))
        .route("/owners/{owner}/saved", get(list_saved).post(save_plan))
        .route("/owners/{owner}/saved/{id}/load", post(load_saved))
        .route("/owners/{owner}/saved/{id}", delete(delete_saved))
        .with_state(state)
}

fn lock_repo(state: &AppState) -> Result<MutexGuard<'_, PlanRepository>, ApiError> {
    state
        .repo
        .lock()
        .map_err(|e| ApiError::internal(format!("Failed to lock repository: {}", e)))
}

fn parse_slot(slot: &str) -> Result<PlanSlot, ApiError> {
    PlanSlot::parse(slot).ok_or_else(|| ApiError::bad_request(format!("Unknown plan slot: {}", slot)))
}

fn load_plan(repo: &PlanRepository, owner: &str, slot: PlanSlot) -> Result<PlanState, ApiError> {
    repo.get_plan(owner, slot)?.ok_or_else(|| {
        ApiError::not_found(format!("No {} plan for owner {}", slot.name(), owner))
    })
}

/// Load a stored plan, apply an engine operation and persist the result.
///
/// Operations that leave the plan unchanged (missing day or bet) skip the write,
/// and a plan that overflows is rejected before it is stored.
fn mutate_plan(
    state: &AppState,
    owner: &str,
    slot: &str,
    op: impl FnOnce(&PlanState) -> Vec<DayResult>,
) -> Result<Json<PlanState>, ApiError> {
    let slot = parse_slot(slot)?;
    let repo = lock_repo(state)?;
    let stored = load_plan(&repo, owner, slot)?;

    let plan = op(&stored);
    if plan == stored.plan {
        debug!(owner, slot = slot.name(), "plan unchanged");
        return Ok(Json(stored));
    }
    validate_plan(&plan)?;

    let next = PlanState::new(stored.config, plan);
    repo.upsert_plan(owner, slot, &next)?;
    Ok(Json(next))
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Stateless projection: validate a strategy and return its plan.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ConfigInput>,
) -> Result<Json<PlanState>, ApiError> {
    let config = state.config.defaults.resolve(input);
    validate_config(&config)?;

    let plan = generate_plan(&config, config.initial_budget);
    validate_plan(&plan)?;
    Ok(Json(PlanState::new(config, plan)))
}

/// Load a stored plan.
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path((owner, slot)): Path<(String, String)>,
) -> Result<Json<PlanState>, ApiError> {
    let slot = parse_slot(&slot)?;
    let repo = lock_repo(&state)?;
    Ok(Json(load_plan(&repo, &owner, slot)?))
}

/// Generate a plan from a strategy and store it, replacing any existing one.
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Path((owner, slot)): Path<(String, String)>,
    Json(input): Json<ConfigInput>,
) -> Result<Json<PlanState>, ApiError> {
    let slot = parse_slot(&slot)?;
    let config = state.config.defaults.resolve(input);
    validate_config(&config)?;

    let plan = generate_plan(&config, config.initial_budget);
    validate_plan(&plan)?;
    let plan_state = PlanState::new(config, plan);

    let repo = lock_repo(&state)?;
    repo.upsert_plan(&owner, slot, &plan_state)?;
    info!(
        owner = %owner,
        slot = slot.name(),
        days = plan_state.plan.len(),
        "Plan generated"
    );

    Ok(Json(plan_state))
}

/// Reset (remove) a stored plan.
pub async fn reset_plan(
    State(state): State<Arc<AppState>>,
    Path((owner, slot)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let slot = parse_slot(&slot)?;
    let repo = lock_repo(&state)?;
    if !repo.delete_plan(&owner, slot)? {
        return Err(ApiError::not_found(format!(
            "No {} plan for owner {}",
            slot.name(),
            owner
        )));
    }
    info!(owner = %owner, slot = slot.name(), "Plan reset");
    Ok(StatusCode::NO_CONTENT)
}

/// Append a bet to a day.
pub async fn add_bet(
    State(state): State<Arc<AppState>>,
    Path((owner, slot, day_index)): Path<(String, String, usize)>,
) -> Result<Json<PlanState>, ApiError> {
    mutate_plan(&state, &owner, &slot, |s| {
        add_bet_to_day(&s.plan, day_index, &s.config)
    })
}

/// Edit a bet's stake percentage, odds or result.
pub async fn edit_bet(
    State(state): State<Arc<AppState>>,
    Path((owner, slot, day_index, bet_id)): Path<(String, String, usize, String)>,
    Json(update): Json<BetUpdate>,
) -> Result<Json<PlanState>, ApiError> {
    validate_bet_update(&update)?;
    mutate_plan(&state, &owner, &slot, |s| {
        update_bet(&s.plan, day_index, &bet_id, &update, &s.config)
    })
}

/// Remove a bet from a day.
pub async fn remove_bet(
    State(state): State<Arc<AppState>>,
    Path((owner, slot, day_index, bet_id)): Path<(String, String, usize, String)>,
) -> Result<Json<PlanState>, ApiError> {
    mutate_plan(&state, &owner, &slot, |s| {
        remove_bet_from_day(&s.plan, day_index, &bet_id, &s.config)
    })
}

/// Inject funds and regenerate the plan from the new balance.
pub async fn add_funds(
    State(state): State<Arc<AppState>>,
    Path((owner, slot)): Path<(String, String)>,
    Json(req): Json<BankrollRequest>,
) -> Result<Json<PlanState>, ApiError> {
    validate_amount(req.amount)?;
    let slot = parse_slot(&slot)?;

    let repo = lock_repo(&state)?;
    let stored = load_plan(&repo, &owner, slot)?;

    let (config, plan) = add_bankroll(&stored.config, stored.current_balance, req.amount);
    validate_plan(&plan)?;
    let next = PlanState::new(config, plan);
    repo.upsert_plan(&owner, slot, &next)?;
    info!(
        owner = %owner,
        slot = slot.name(),
        amount = req.amount,
        budget = next.config.initial_budget,
        "Bankroll added, plan regenerated"
    );

    Ok(Json(next))
}

/// Summary statistics for a stored plan.
pub async fn plan_stats(
    State(state): State<Arc<AppState>>,
    Path((owner, slot)): Path<(String, String)>,
) -> Result<Json<PlanStats>, ApiError> {
    let slot = parse_slot(&slot)?;
    let repo = lock_repo(&state)?;
    let stored = load_plan(&repo, &owner, slot)?;
    Ok(Json(PlanStats::from_plan(&stored.plan, &stored.config)))
}

/// Copy the active plan into the simulation sandbox.
pub async fn start_simulation(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
) -> Result<Json<PlanState>, ApiError> {
    let repo = lock_repo(&state)?;
    let active = load_plan(&repo, &owner, PlanSlot::Active)?;
    repo.upsert_plan(&owner, PlanSlot::Simulation, &active)?;
    info!(owner = %owner, "Simulation started from active plan");
    Ok(Json(active))
}

/// List saved plans.
pub async fn list_saved(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
) -> Result<Json<Vec<SavedPlanSummary>>, ApiError> {
    let repo = lock_repo(&state)?;
    Ok(Json(repo.list_saved(&owner)?))
}

/// Snapshot the active plan under a name.
pub async fn save_plan(
    State(state): State<Arc<AppState>>,
    Path(owner): Path<String>,
    Json(req): Json<SavePlanRequest>,
) -> Result<(StatusCode, Json<SavedPlanSummary>), ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Plan name must not be empty"));
    }

    let repo = lock_repo(&state)?;
    let active = load_plan(&repo, &owner, PlanSlot::Active)?;

    let limit = state.config.limits.max_saved_plans;
    if !repo.saved_name_exists(&owner, name)? && repo.count_saved(&owner)? >= limit {
        return Err(ApiError::conflict(format!(
            "Saved plan limit reached ({})",
            limit
        )));
    }

    let id = repo.save_named(&owner, name, &active)?;
    let summary = repo
        .list_saved(&owner)?
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| ApiError::internal("Saved plan vanished"))?;
    info!(owner = %owner, id, name, "Plan saved");

    Ok((StatusCode::CREATED, Json(summary)))
}

/// Replace the active plan with a saved one.
pub async fn load_saved(
    State(state): State<Arc<AppState>>,
    Path((owner, id)): Path<(String, i64)>,
) -> Result<Json<PlanState>, ApiError> {
    let repo = lock_repo(&state)?;
    let saved = repo
        .get_saved(&owner, id)?
        .ok_or_else(|| ApiError::not_found(format!("No saved plan {}", id)))?;
    repo.upsert_plan(&owner, PlanSlot::Active, &saved)?;
    info!(owner = %owner, id, "Saved plan loaded");
    Ok(Json(saved))
}

/// Delete a saved plan.
pub async fn delete_saved(
    State(state): State<Arc<AppState>>,
    Path((owner, id)): Path<(String, i64)>,
) -> Result<StatusCode, ApiError> {
    let repo = lock_repo(&state)?;
    if !repo.delete_saved(&owner, id)? {
        return Err(ApiError::not_found(format!("No saved plan {}", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
