//! Router assembly and the server run loop.

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use carebook_db_postgres::PgPool;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn build_app(cfg: &AppConfig, pool: PgPool) -> Router {
    let state = AppState::new(pool, cfg);
    let body_limit = cfg.server.body_limit_bytes;

    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .route("/readyz", get(handlers::health::readyz))
        .route("/api/signup", post(handlers::accounts::signup))
        .route("/api/login", post(handlers::accounts::login))
        .route("/api/logout", get(handlers::accounts::logout))
        .route(
            "/api/hospitals",
            post(handlers::hospital::add_hospital).get(handlers::hospital::list_hospitals),
        )
        .route(
            "/api/doctors",
            post(handlers::doctor::add_doctor).get(handlers::doctor::list_doctors),
        )
        .route(
            "/api/appointment-slots",
            post(handlers::slot::add_slot).get(handlers::slot::list_slots),
        )
        .route(
            "/api/appointments",
            post(handlers::appointment::book_appointment),
        )
        .route(
            "/api/appointment-histories",
            post(handlers::history::add_history),
        )
        .route(
            "/api/prescriptions",
            post(handlers::prescription::add_prescription),
        )
        .route(
            "/api/medications",
            post(handlers::medication::add_medication),
        )
        .route(
            "/api/medication-prescriptions",
            post(handlers::medicine_prescription::add_medicine_prescription),
        )
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub struct CarebookServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    pub fn build(self, pool: PgPool) -> CarebookServer {
        let addr = self.config.addr();
        let app = build_app(&self.config, pool);

        CarebookServer { addr, app }
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CarebookServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    fn test_app() -> Router {
        let cfg = AppConfig::default();
        let pool = carebook_db_postgres::pool::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/carebook_test")
            .expect("lazy pool");
        build_app(&cfg, pool)
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let app = test_app();
        let res = app
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res.into_body()).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_with_envelope() {
        let app = test_app();
        let res = app
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let json = body_json(res.into_body()).await;
        assert_eq!(json["error"], "Not found.");
    }

    #[tokio::test]
    async fn test_wrong_verb_is_405_with_envelope() {
        let app = test_app();
        let res = app
            .oneshot(Request::get("/api/appointments").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = body_json(res.into_body()).await;
        assert_eq!(json["error"], "Method not allowed.");
    }

    #[tokio::test]
    async fn test_mutating_endpoint_without_token_is_401() {
        let app = test_app();
        let res = app
            .oneshot(
                Request::post("/api/doctors")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"license_number":"L","years_of_experience":1,
                            "qualification":"Q","hospital_id":1}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(res.into_body()).await;
        assert_eq!(json["error"], "Authentication credentials were not provided.");
    }

    #[tokio::test]
    async fn test_malformed_bearer_is_401() {
        let app = test_app();
        let res = app
            .oneshot(
                Request::get("/api/logout")
                    .header(header::AUTHORIZATION, "Token abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signup_missing_body_is_400() {
        let app = test_app();
        let res = app
            .oneshot(
                Request::post("/api/signup")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res.into_body()).await;
        assert_eq!(json["error"], "Invalid JSON format.");
    }
}
