// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{any, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Tudo aqui exige token; `route_layer` mantém 404 para rotas inexistentes.
    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_me))
        // Revendedores
        .route(
            "/api/resellers",
            get(handlers::resellers::list_resellers)
                .post(handlers::resellers::create_reseller)
                .delete(handlers::resellers::delete_all_resellers),
        )
        .route(
            "/api/resellers/{id}",
            get(handlers::resellers::get_reseller)
                .put(handlers::resellers::update_reseller)
                .delete(handlers::resellers::delete_reseller),
        )
        // PIX
        .route("/api/pix/status", get(handlers::pix::get_status))
        .route(
            "/api/pix/charges",
            get(handlers::pix::list_charges).post(handlers::pix::create_charge),
        )
        .route(
            "/api/pix/charges/active",
            axum::routing::delete(handlers::pix::cancel_all_active),
        )
        .route(
            "/api/pix/charges/{id}",
            get(handlers::pix::get_charge).delete(handlers::pix::cancel_charge),
        )
        .route("/api/pix/charges/{id}/send", post(handlers::pix::send_charge))
        .route("/api/pix/bulk-charges", post(handlers::pix::start_bulk_charges))
        .route(
            "/api/pix/tracking",
            get(handlers::pix::list_tracking).delete(handlers::pix::clear_tracking),
        )
        .route("/api/pix/tracking/refresh", post(handlers::pix::refresh_tracking))
        // Tarefas em lote
        .route("/api/jobs/{id}", get(handlers::jobs::get_job))
        .route("/api/jobs/{id}/cancel", post(handlers::jobs::cancel_job))
        // WhatsApp
        .route("/api/whatsapp/preview", post(handlers::whatsapp::preview_message))
        .route("/api/whatsapp/send", post(handlers::whatsapp::send_charge_message))
        .route("/api/whatsapp/messages", post(handlers::whatsapp::send_raw_message))
        .route("/api/whatsapp/bulk-send", post(handlers::whatsapp::start_bulk_send))
        // Dashboard
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .route("/api/dashboard/clients-chart", get(handlers::dashboard::get_clients_chart))
        .route(
            "/api/dashboard/recent-resellers",
            get(handlers::dashboard::get_recent_resellers),
        )
        // Notificações
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications)
                .delete(handlers::notifications::clear_notifications),
        )
        .route("/api/notifications/read-all", post(handlers::notifications::mark_all_read))
        .route("/api/notifications/{id}/read", post(handlers::notifications::mark_read))
        // Configurações
        .route("/api/settings", get(handlers::settings::get_settings))
        .route("/api/settings/theme", put(handlers::settings::update_theme))
        // Proxy do serviço de revendedores
        .route("/proxy/resellers", any(handlers::proxy::forward_root))
        .route("/proxy/resellers/{*path}", any(handlers::proxy::forward_path))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login))
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
