/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use lodestar_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::from_config(pool, config)?;
/// let app = lodestar_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use lodestar_shared::{
    auth::{identity::Authenticatable, jwt::{self, JwtSettings}},
    models::account::Account,
    store::AccountStore,
    tasks::{HttpTaskDispatcher, LogDispatcher, TaskDispatcher},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Account lifecycle operations
    pub store: AccountStore,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token settings derived from `config`
    pub jwt: Arc<JwtSettings>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, tasks: Arc<dyn TaskDispatcher>) -> Self {
        let jwt = Arc::new(config.jwt_settings());
        Self {
            store: AccountStore::new(db.clone(), tasks),
            db,
            config: Arc::new(config),
            jwt,
        }
    }

    /// State with the task dispatcher chosen by configuration
    ///
    /// Welcome emails go to the configured task runner, or to the log when no
    /// runner URL is set.
    pub fn from_config(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let tasks = task_dispatcher(&config)?;
        Ok(Self::new(db, config, tasks))
    }
}

fn task_dispatcher(config: &Config) -> anyhow::Result<Arc<dyn TaskDispatcher>> {
    match &config.tasks.welcome_email_url {
        Some(url) => {
            tracing::info!(url = %url, "Welcome emails go to task runner");
            Ok(Arc::new(HttpTaskDispatcher::new(url.clone())?))
        }
        None => {
            tracing::warn!("WELCOME_EMAIL_TASK_URL not set, welcome emails are only logged");
            Ok(Arc::new(LogDispatcher))
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health               # Health check (public)
/// └── /v1/
///     ├── /auth/                 # Public
///     │   ├── POST /register
///     │   └── POST /login
///     └── /me/                   # Bearer JWT
///         ├── GET  /
///         ├── GET  /profile
///         └── PUT  /profile
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let me_routes = Router::new()
        .route("/", get(routes::me::current_account))
        .route(
            "/profile",
            get(routes::profile::get_profile).put(routes::profile::update_profile),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/me", me_routes);

    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

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

/// JWT authentication middleware layer
///
/// Validates the Bearer token, loads the account named by its subject and
/// injects the [`Account`] into request extensions. Unknown and inactive
/// accounts are rejected.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = jwt::decode_token(token, &state.jwt)?;

    let account = Account::find_by_public_id(&state.db, claims.sub)
        .await?
        .filter(|account| account.is_active())
        .ok_or_else(|| ApiError::Unauthorized("Account not found or inactive".to_string()))?;

    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}
