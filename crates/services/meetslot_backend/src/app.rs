// --- File: crates/services/meetslot_backend/src/app.rs ---
use axum::Router;
use meetslot_gcal::handlers::GcalState;
use meetslot_gcal::routes::routes;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The complete application: suggestion and booking routes, request tracing,
/// CORS, and Swagger UI at `/api/docs` when built with `openapi`.
pub fn build_app(state: Arc<GcalState>) -> Router {
    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut app = routes(state);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use meetslot_gcal::doc::GcalApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Meetslot API",
                version = "0.1.0",
                description = "Meeting slot suggestions and booking",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Meetslot", description = "Core service endpoints")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(GcalApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    info!("Routes: GET /, GET /suggest, POST /calendar/suggest, POST /book");
    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
