use std::time::Duration;

use agate_service::Validate;
use agate_types::{Advert, Campaign, CampaignManager, Client, Entity, Staff, StaffGrade};
use axum::error_handling::HandleErrorLayer;
use axum::routing::{get, put};
use axum::{BoxError, Router};
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handler;
use crate::state::{AppState, HasService};

/// The five CRUD routes for one entity collection.
fn entity_routes<E>() -> Router<AppState>
where
    E: Entity,
    E::Draft: Validate,
    AppState: HasService<E>,
{
    let base = E::KIND.collection_path();
    Router::new()
        .route(base, get(handler::list::<E>).post(handler::create::<E>))
        .route(
            &format!("{base}/:id"),
            get(handler::get_one::<E>)
                .put(handler::update::<E>)
                .delete(handler::delete::<E>),
        )
}

/// Render failures raised by the middleware stack as API errors.
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Middleware(err.to_string())
    }
}

/// Build the axum router with all Agate endpoints.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handler::health))
        .merge(entity_routes::<Client>())
        .merge(entity_routes::<Campaign>())
        .merge(entity_routes::<Staff>())
        .merge(entity_routes::<StaffGrade>())
        .merge(entity_routes::<Advert>())
        .merge(entity_routes::<CampaignManager>())
        .route("/campaigns/client/:client_id", get(handler::campaigns_by_client))
        .route("/adverts/campaign/:campaign_id", get(handler::adverts_by_campaign))
        .route("/campaigns/:id/manager/:manager_id", put(handler::assign_manager))
        .route("/staff/:id/grade/:grade_id", put(handler::assign_grade))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
