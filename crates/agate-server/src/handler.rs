use agate_service::Validate;
use agate_types::{Advert, Entity, EntityKind, RecordId, UpdateMode};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::state::{AppState, HasService};

/// Health check response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

fn parse_id(raw: &str, kind: EntityKind) -> Result<RecordId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId(kind))
}

fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody {
        detail: e.to_string(),
    })
}

fn message(text: impl Into<String>) -> Json<serde_json::Value> {
    Json(json!({ "message": text.into() }))
}

/// `GET /{entity}`
pub async fn list<E>(State(state): State<AppState>) -> Result<Json<Vec<E>>, ApiError>
where
    E: Entity,
    E::Draft: Validate,
    AppState: HasService<E>,
{
    Ok(Json(HasService::<E>::service(&state).list().await?))
}

/// `GET /{entity}/{id}`
pub async fn get_one<E>(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<E>, ApiError>
where
    E: Entity,
    E::Draft: Validate,
    AppState: HasService<E>,
{
    let id = parse_id(&raw_id, E::KIND)?;
    Ok(Json(HasService::<E>::service(&state).get(id).await?))
}

/// `POST /{entity}`: 201 with the new record's location.
pub async fn create<E>(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError>
where
    E: Entity,
    E::Draft: Validate,
    AppState: HasService<E>,
{
    let draft: E::Draft = decode(&body)?;
    let id = HasService::<E>::service(&state).create(draft).await?;
    let location = format!("{}/{id}", E::KIND.collection_path());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        message(format!("{} added", E::KIND)),
    )
        .into_response())
}

/// `PUT /{entity}/{id}`: merge or full replace depending on the entity.
pub async fn update<E>(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError>
where
    E: Entity,
    E::Draft: Validate,
    AppState: HasService<E>,
{
    let id = parse_id(&raw_id, E::KIND)?;
    match E::UPDATE_MODE {
        UpdateMode::Merge => {
            let patch: E::Patch = decode(&body)?;
            HasService::<E>::service(&state).update(id, patch).await?;
        }
        UpdateMode::Replace => {
            let draft: E::Draft = decode(&body)?;
            HasService::<E>::service(&state).replace(id, draft).await?;
        }
    }
    Ok(message(format!("{} updated", E::KIND)))
}

/// `DELETE /{entity}/{id}`
pub async fn delete<E>(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    E: Entity,
    E::Draft: Validate,
    AppState: HasService<E>,
{
    let id = parse_id(&raw_id, E::KIND)?;
    HasService::<E>::service(&state).delete(id).await?;
    Ok(message(format!("{} deleted", E::KIND)))
}

/// `GET /campaigns/client/{clientID}`
pub async fn campaigns_by_client(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let client_id = parse_id(&raw_id, EntityKind::Client)?;
    Ok(Json(state.campaigns.for_client(client_id).await?))
}

/// `GET /adverts/campaign/{campaignID}`
pub async fn adverts_by_campaign(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign_id = parse_id(&raw_id, EntityKind::Campaign)?;
    Ok(Json(
        state
            .adverts
            .list_by(Advert::CAMPAIGN_REF, campaign_id)
            .await?,
    ))
}

/// `PUT /campaigns/{id}/manager/{managerID}`
pub async fn assign_manager(
    State(state): State<AppState>,
    Path((raw_campaign, raw_manager)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign_id = parse_id(&raw_campaign, EntityKind::Campaign)?;
    let manager_id = parse_id(&raw_manager, EntityKind::CampaignManager)?;
    state.campaigns.assign_manager(campaign_id, manager_id).await?;
    Ok(message("manager assigned to campaign"))
}

/// `PUT /staff/{id}/grade/{gradeID}`
pub async fn assign_grade(
    State(state): State<AppState>,
    Path((raw_staff, raw_grade)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let staff_id = parse_id(&raw_staff, EntityKind::Staff)?;
    let grade_id = parse_id(&raw_grade, EntityKind::StaffGrade)?;
    state.staff.assign_grade(staff_id, grade_id).await?;
    Ok(message("grade assigned to staff"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_parsing() {
        assert_eq!(parse_id("42", EntityKind::Client).unwrap(), 42);
        assert!(matches!(
            parse_id("abc", EntityKind::Client),
            Err(ApiError::InvalidId(EntityKind::Client))
        ));
        assert!(parse_id("", EntityKind::Staff).is_err());
        assert!(parse_id("1.5", EntityKind::Staff).is_err());
    }

    #[test]
    fn decode_rejects_malformed_json() {
        let body = Bytes::from_static(b"{\"name\": ");
        let err = decode::<agate_types::ClientPatch>(&body).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody { .. }));
    }

    #[test]
    fn health_defaults() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert!(!h.version.is_empty());
    }
}
