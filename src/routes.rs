use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    catalog::{self, ListingOptions, ListingParams, MovieListing},
    error::{AppError, AppResult},
    models::{MovieForm, NewMovie},
    templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/movies", get(movies))
        .route("/movies/create", get(create_form).post(create))
        .route("/api/movies", get(api_movies))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn index() -> Redirect {
    Redirect::to("/movies")
}

pub async fn movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> AppResult<Html<String>> {
    let listing =
        catalog::load_listing(&state.db, &params, ListingOptions::from(&*state.config)).await?;
    Ok(Html(templates::movies_page(&listing, &params)))
}

pub async fn api_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> AppResult<Json<MovieListing>> {
    let listing =
        catalog::load_listing(&state.db, &params, ListingOptions::from(&*state.config)).await?;
    Ok(Json(listing))
}

pub async fn create_form() -> Html<String> {
    Html(templates::create_page(&MovieForm::default(), None))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<MovieForm>,
) -> AppResult<Response> {
    let new = match NewMovie::try_from(&form) {
        Ok(new) => new,
        Err(AppError::Invalid(msg)) => {
            tracing::debug!(error = %msg, "rejected movie form");
            let body = templates::create_page(&form, Some(&msg));
            return Ok((StatusCode::BAD_REQUEST, Html(body)).into_response());
        },
        Err(err) => return Err(err),
    };

    catalog::create_movie(&state.db, new).await?;
    Ok(Redirect::to("/movies").into_response())
}
