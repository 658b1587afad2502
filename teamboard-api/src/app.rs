/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use teamboard_api::{app::AppState, config::Config};
/// use teamboard_shared::services::Services;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let services = Services::connect(&config.service_config()).await?;
/// let state = AppState::new(services, config);
/// let app = teamboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use teamboard_shared::services::Services;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// The services share one pool, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// User, team and board services
    pub services: Services,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(services: Services, config: Config) -> Self {
        Self {
            services,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health
/// └── /v1/
///     ├── /users
///     │   ├── POST /                 create_user
///     │   ├── GET  /                 list_users
///     │   ├── GET  /:id              describe_user
///     │   ├── PUT  /:id              update_user
///     │   └── GET  /:id/teams        get_user_teams
///     ├── /teams
///     │   ├── POST /                 create_team
///     │   ├── GET  /                 list_teams
///     │   ├── GET  /:id              describe_team
///     │   ├── PUT  /:id              update_team
///     │   ├── POST /:id/users        add_users_to_team
///     │   ├── GET  /:id/users        list_team_users
///     │   ├── POST /:id/users/remove remove_users_from_team
///     │   └── GET  /:id/boards       list_boards
///     ├── /boards
///     │   ├── POST /                 create_board
///     │   ├── POST /:id/close        close_board
///     │   └── POST /:id/export       export_board
///     └── /tasks
///         ├── POST /                 add_task
///         └── PUT  /:id/status       update_task_status
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route(
            "/",
            post(routes::users::create_user).get(routes::users::list_users),
        )
        .route(
            "/:id",
            get(routes::users::describe_user).put(routes::users::update_user),
        )
        .route("/:id/teams", get(routes::users::get_user_teams));

    let team_routes = Router::new()
        .route(
            "/",
            post(routes::teams::create_team).get(routes::teams::list_teams),
        )
        .route(
            "/:id",
            get(routes::teams::describe_team).put(routes::teams::update_team),
        )
        .route(
            "/:id/users",
            post(routes::teams::add_users_to_team).get(routes::teams::list_team_users),
        )
        .route("/:id/users/remove", post(routes::teams::remove_users_from_team))
        .route("/:id/boards", get(routes::boards::list_boards));

    let board_routes = Router::new()
        .route("/", post(routes::boards::create_board))
        .route("/:id/close", post(routes::boards::close_board))
        .route("/:id/export", post(routes::boards::export_board));

    let task_routes = Router::new()
        .route("/", post(routes::tasks::add_task))
        .route("/:id/status", put(routes::tasks::update_task_status));

    let v1_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/teams", team_routes)
        .nest("/boards", board_routes)
        .nest("/tasks", task_routes);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
