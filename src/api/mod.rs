//! HTTP surface: route table, middleware stack and request extractors.

pub mod extract;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the application router. Public and protected routes share paths
/// (e.g. `GET /posts/:id` vs `PUT /posts/:id`); only the protected methods
/// run the auth middleware.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .fallback(fallback)
        // Global middleware, outermost last
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(middleware::map_response(uniform_error_body))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::{comments, posts, users};

    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/:id/posts", get(users::posts_by_user))
        .route("/users/:id/feed", get(users::feed_of_user))
        .route("/posts/:id", get(posts::get_post))
        .route("/posts/:id/comments", get(posts::list_comments))
        .route("/comments/:id", get(comments::get_comment))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{comments, posts, users};

    Router::new()
        .route("/users/feed", get(users::feed))
        .route("/users/:id", get(users::get_user))
        .route(
            "/users/:id/subscriptions",
            get(users::subscriptions)
                .post(users::subscribe)
                .delete(users::unsubscribe),
        )
        .route("/posts", post(posts::create_post))
        .route("/posts/:id", put(posts::update_post).delete(posts::delete_post))
        .route("/posts/:id/comments", post(posts::create_comment))
        .route("/posts/:id/likes", post(posts::like_post).delete(posts::unlike_post))
        .route(
            "/comments/:id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route(
            "/comments/:id/likes",
            post(comments::like_comment).delete(comments::unlike_comment),
        )
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = &config.security.cors_origins;
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Give the empty 405/408/413 responses from routing, timeout and body limit
/// layers the same JSON body as every other error.
async fn uniform_error_body(response: Response) -> Response {
    let Some(err) = ApiError::from_transport_status(response.status()) else {
        return response;
    };
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut rewritten = err.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(header::ALLOW, allow);
    }
    rewritten
}
