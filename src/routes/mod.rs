use axum::http::{header, HeaderValue};
use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{config::JSON_BODY_LIMIT_BYTES, error::AppResult, pdf::Document, state::AppState};

pub mod candidates;
pub mod consultants;
pub mod contact;
pub mod health;
pub mod invoices;
pub mod jobs;
pub mod orders;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = cors_layer(state.config.cors_allowed_origin.as_deref());

    let jobs_routes = Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/:id",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        );

    let candidates_routes = Router::new()
        .route(
            "/",
            get(candidates::list_candidates).post(candidates::submit_application),
        )
        .route("/:id", put(candidates::review_candidate));

    let invoices_routes = Router::new()
        .route("/", get(invoices::list_invoices))
        .route("/:id/pdf", get(invoices::invoice_pdf));

    let consultant_routes = Router::new()
        .route("/payrolls", get(consultants::list_payrolls))
        .route("/shifts", get(consultants::list_shifts));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/orders", post(orders::create_order))
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/payrolls/:id/pdf", get(consultants::payslip_pdf))
        .nest("/api/invoices", invoices_routes)
        .nest("/api/consultant", consultant_routes)
        .nest("/api/jobs", jobs_routes)
        .nest("/api/candidates", candidates_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT_BYTES))
}

fn cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let allow_origin = match allowed_origins {
        Some(origins) => {
            let headers: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .filter_map(|value| match value.parse::<HeaderValue>() {
                    Ok(header) => Some(header),
                    Err(_) => {
                        tracing::warn!(origin = value, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(headers)
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any())
}

/// Renders `document` on the blocking pool and wraps the bytes as an inline PDF.
pub(crate) async fn pdf_response(
    state: &AppState,
    document: Document,
    filename: String,
) -> AppResult<Response> {
    let renderer = state.renderer.clone();
    let bytes = tokio::task::spawn_blocking(move || renderer.render(&document)).await??;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}
