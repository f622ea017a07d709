use crate::server::render::{
    render_titles, INTERNAL_ERROR_PAGE, NOT_FOUND_BODY, NO_ADDRESSES_PAGE,
};
use crate::fetch::FetchResult;
use crate::server::AppState;
use crate::ScoutError;
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use url::form_urlencoded;

/// Path of the title lookup endpoint
pub const TITLE_ROUTE: &str = "/I/want/title";

/// Query parameter naming one address; repeat it for a batch
pub const ADDRESS_PARAM: &str = "address";

/// Builds the application router
///
/// Any path or method other than `GET /I/want/title` answers 404.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(TITLE_ROUTE, get(get_titles).fallback(not_found))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Collects every `address` parameter in the order it appears
///
/// Returns `None` when the query carries no `address` parameter at all. An
/// empty value still counts as an address.
pub fn collect_addresses(query: Option<&str>) -> Option<Vec<String>> {
    let addresses: Vec<String> = form_urlencoded::parse(query?.as_bytes())
        .filter(|(key, _)| key == ADDRESS_PARAM)
        .map(|(_, value)| value.into_owned())
        .collect();

    if addresses.is_empty() {
        None
    } else {
        Some(addresses)
    }
}

async fn get_titles(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let Some(addresses) = collect_addresses(query.as_deref()) else {
        tracing::debug!("Rejected title request without addresses");
        return (StatusCode::BAD_REQUEST, Html(NO_ADDRESSES_PAGE)).into_response();
    };

    batch_response(state.orchestrator().fetch_all(addresses).await)
}

/// Maps a finished batch to the listing page, or 500 if it did not complete
fn batch_response(batch: Result<Vec<FetchResult>, ScoutError>) -> Response {
    match batch {
        Ok(results) => Html(render_titles(&results)).into_response(),
        Err(e) => {
            tracing::error!("Title batch failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Html(INTERNAL_ERROR_PAGE)).into_response()
        }
    }
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}
