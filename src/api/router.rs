use axum::{
    http::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
    http::{HeaderName, Method, Request, Response},
    routing::{delete, get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::api::assessments;
use crate::api::auth;
use crate::api::forms;
use crate::api::handlers;
use crate::api::submissions;
use crate::api::users;
use crate::core::{config::Settings, state::AppState};

pub(crate) fn router(state: AppState) -> Router {
    let cors = build_cors_layer(state.settings());

    let request_id_header = HeaderName::from_static("x-request-id");
    let request_id_header_for_span = request_id_header.clone();
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<_>| {
            let request_id = request
                .headers()
                .get(&request_id_header_for_span)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_response(|response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            let status_label = response.status().as_u16().to_string();
            metrics::counter!(
                "http_requests_total",
                "status" => status_label.clone()
            )
            .increment(1);
            metrics::histogram!(
                "http_request_duration_seconds",
                "status" => status_label
            )
            .record(latency.as_secs_f64());
        });

    let mut router: Router<AppState> = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz).head(handlers::healthz))
        .nest("/auth", auth::router())
        .route("/me/role", post(users::set_role))
        .route("/assessments", post(assessments::create_assessment))
        .route("/assessments/from-bank", post(assessments::create_from_bank))
        .route("/answer-keys", post(assessments::save_answer_key))
        .route("/student-answers", post(submissions::create_student_answer))
        .route("/all-data", get(assessments::all_data))
        .route("/clear-data", delete(assessments::clear_data))
        .route("/forms", post(forms::create_form))
        .route("/form/:token", get(forms::show_form))
        .route("/form/:token/submit", post(forms::submit_form))
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(trace_layer)
        .layer(cors);

    if state.settings().telemetry().prometheus_enabled {
        router = router.route("/metrics", get(handlers::metrics));
    }

    router.with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins = settings
        .cors()
        .origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            ORIGIN,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        // Wildcard origin cannot be combined with allow_credentials
        base.allow_origin(Any)
    } else {
        base.allow_credentials(true)
            .allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::router;
    use axum::http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::core::config::Settings;
    use crate::test_support;

    fn build_app() -> axum::Router {
        let settings = Settings::load().expect("settings");
        router(test_support::build_state(settings))
    }

    #[tokio::test]
    async fn root_returns_message() {
        let _guard = test_support::env_lock();
        test_support::set_test_env();

        let response = build_app()
            .oneshot(test_support::json_request(Method::GET, "/", None, None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = test_support::read_json(response).await;
        assert_eq!(json["message"], "Gabarito API");
    }

    #[tokio::test]
    async fn metrics_disabled_returns_404() {
        let _guard = test_support::env_lock();
        test_support::set_test_env();

        let response = build_app()
            .oneshot(test_support::json_request(Method::GET, "/metrics", None, None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn protected_routes_require_bearer_token() {
        let _guard = test_support::env_lock();
        test_support::set_test_env();

        let app = build_app();

        for (method, uri) in [
            (Method::GET, "/auth/me"),
            (Method::GET, "/all-data"),
            (Method::POST, "/me/role"),
            (Method::POST, "/assessments"),
            (Method::POST, "/assessments/from-bank"),
            (Method::POST, "/answer-keys"),
            (Method::POST, "/student-answers"),
            (Method::POST, "/forms"),
            (Method::DELETE, "/clear-data"),
        ] {
            let label = format!("{method} {uri}");
            let response = app
                .clone()
                .oneshot(test_support::json_request(
                    method,
                    uri,
                    None,
                    Some(serde_json::json!({})),
                ))
                .await
                .expect("response");

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{label}");
        }
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_rejected() {
        let _guard = test_support::env_lock();
        test_support::set_test_env();

        let response = build_app()
            .oneshot(test_support::json_request(
                Method::GET,
                "/all-data",
                Some("not-a-jwt"),
                None,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
