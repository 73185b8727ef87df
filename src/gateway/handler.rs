use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::constants::DEFAULT_SEED_LIMIT;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    FlashRequestCreate, FlashRequestView, PingMatchesRequest, PingResponse, ProfileCreated,
    ProfileList, ProfileSummary, SeedQuery, SeedResponse, SellerProfileCreate,
};
use crate::gateway::state::HandlerState;
use crate::matching::MatchResponse;
use crate::profile::{build_representative_item, seed_synthetic_profiles};
use crate::record::{
    FALLBACK_CATEGORY, FlashRequest, PingLogEntry, ProfileSource, SellerProfile, StructuredRecord,
    apply_request_metadata,
};

const REQUEST_NOT_FOUND: &str = "Flash request not found.";

#[instrument(skip(state, body))]
pub async fn create_flash_request_handler(
    State(state): State<HandlerState>,
    Json(body): Json<FlashRequestCreate>,
) -> Result<Json<MatchResponse>, GatewayError> {
    if body.text.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Flash request text cannot be empty.".to_string(),
        ));
    }

    let metadata = body.metadata.unwrap_or_default();
    let parsed = match state.parser.parse_request(&body.text).await {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Request parsing failed, using fallback record");
            StructuredRecord::fallback(fallback_category(&metadata))
        }
    };
    let parsed = apply_request_metadata(parsed, &metadata);

    let request = FlashRequest::new(body.text, parsed, metadata);
    state.requests.put(request.clone()).await?;
    info!(request_id = %request.id, "Stored flash request");

    let request_id = request.id.clone();
    let parsed = request.parsed_request.clone();
    match state.engine.build_match_payload(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            warn!(%request_id, error = %e, "Matching failed, returning empty matches");
            Ok(Json(MatchResponse::degraded(request_id, parsed, e.to_string())))
        }
    }
}

#[instrument(skip(state))]
pub async fn get_flash_request_handler(
    State(state): State<HandlerState>,
    Path(id): Path<String>,
) -> Result<Json<FlashRequestView>, GatewayError> {
    let request = state
        .requests
        .get(&id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(REQUEST_NOT_FOUND.to_string()))?;

    Ok(Json(FlashRequestView {
        success: true,
        request_id: request.id,
        request: request.parsed_request,
        metadata: request.metadata,
    }))
}

#[instrument(skip(state))]
pub async fn get_matches_handler(
    State(state): State<HandlerState>,
    Path(id): Path<String>,
) -> Result<Json<MatchResponse>, GatewayError> {
    state
        .engine
        .matches_for(&id)
        .await?
        .map(Json)
        .ok_or_else(|| GatewayError::NotFound(REQUEST_NOT_FOUND.to_string()))
}

#[instrument(skip(state, body))]
pub async fn send_pings_handler(
    State(state): State<HandlerState>,
    Path(id): Path<String>,
    Json(body): Json<PingMatchesRequest>,
) -> Result<Json<PingResponse>, GatewayError> {
    if state.requests.get(&id).await?.is_none() {
        return Err(GatewayError::NotFound(REQUEST_NOT_FOUND.to_string()));
    }

    let pinged = body.match_ids.len();
    let entry = PingLogEntry::new(body.match_ids, body.broadcast_type.clone());
    let log_len = state.requests.append_ping(&id, entry).await?;
    info!(request_id = %id, pinged, log_len, "Recorded pings");

    Ok(Json(PingResponse {
        success: true,
        pinged,
        broadcast_type: body.broadcast_type,
    }))
}

#[instrument(skip(state, body), fields(user_id = tracing::field::Empty))]
pub async fn create_profile_handler(
    State(state): State<HandlerState>,
    Json(body): Json<SellerProfileCreate>,
) -> Result<Json<ProfileCreated>, GatewayError> {
    if body.text.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Seller profile text cannot be empty.".to_string(),
        ));
    }
    if body.user_id.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Seller profile user_id cannot be empty.".to_string(),
        ));
    }

    tracing::Span::current().record("user_id", tracing::field::display(&body.user_id));

    let parsed = state
        .parser
        .parse_profile(&body.text, &body.user_id)
        .await?;
    let representative_item = build_representative_item(&parsed);

    let profile = SellerProfile::new(
        body.user_id.clone(),
        parsed.clone(),
        Some(body.text),
        representative_item.clone(),
        ProfileSource::Live,
    )
    .with_metadata(body.metadata.unwrap_or_else(|| Value::Object(Map::new())));
    state.profiles.put(profile).await?;

    let total_profiles = state.profiles.len().await?;
    info!(total_profiles, "Stored live seller profile");

    Ok(Json(ProfileCreated {
        success: true,
        profile: parsed,
        representative_item,
        total_profiles,
    }))
}

#[instrument(skip(state))]
pub async fn list_profiles_handler(
    State(state): State<HandlerState>,
) -> Result<Json<ProfileList>, GatewayError> {
    let mut profiles: Vec<ProfileSummary> = state
        .profiles
        .list()
        .await?
        .iter()
        .map(ProfileSummary::from)
        .collect();
    profiles.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    Ok(Json(ProfileList {
        success: true,
        profiles,
    }))
}

#[instrument(skip(state))]
pub async fn seed_profiles_handler(
    State(state): State<HandlerState>,
    Query(query): Query<SeedQuery>,
) -> Result<Json<SeedResponse>, GatewayError> {
    let limit = query.limit.unwrap_or(DEFAULT_SEED_LIMIT);

    let loaded = match &state.synthetic_dir {
        Some(dir) => seed_synthetic_profiles(state.profiles.as_ref(), dir, limit).await?,
        None => {
            warn!("No synthetic profile directory configured");
            0
        }
    };

    Ok(Json(SeedResponse {
        success: true,
        loaded,
        total_profiles: state.profiles.len().await?,
    }))
}

/// `metadata.category` when it is a non-blank string, else [`FALLBACK_CATEGORY`].
pub(crate) fn fallback_category(metadata: &Map<String, Value>) -> &str {
    metadata
        .get("category")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .unwrap_or(FALLBACK_CATEGORY)
}
