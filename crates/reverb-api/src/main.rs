//! reverb-api - HTTP API server for reverb

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use reverb_core::{
    defaults, Admin, AdminNote, AdminNoteRepository, CreateAdminNoteRequest, CreateReviewRequest,
    DashboardMetrics, GenerationBackend, ListReviewsRequest, MonthlyTrendPoint, ReportDocument,
    ReportSection, Review, ReviewFilter, ReviewRepository, WeeklyInsight,
};
use reverb_db::{log_pool_metrics, Database, PgReviewRepository, PoolConfig};
use reverb_inference::GroqBackend;
use reverb_pipeline::{InsightGenerator, ReportAssembler, ReviewIngestor};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so request IDs sort in arrival order
/// when grepping aggregated logs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Database,
    /// Two-phase review ingest (store, then best-effort enrichment).
    ingestor: Arc<ReviewIngestor>,
    /// Weekly window comparison.
    insights: Arc<InsightGenerator>,
    /// Monthly report assembly.
    reports: Arc<ReportAssembler>,
    /// Access token lifetime handed to the token endpoint.
    token_ttl_minutes: i64,
}

/// OpenAPI documentation, served through Swagger UI at `/docs`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reverb API",
        version = "2026.8.23",
        description = "Customer review collection with AI enrichment, analytics, and monthly reporting"
    ),
    components(schemas(
        Review,
        Admin,
        AdminNote,
        CreateReviewRequest,
        CreateAdminNoteRequest,
        DashboardMetrics,
        MonthlyTrendPoint,
        WeeklyInsight,
        ReportDocument,
        ReportSection,
    )),
    tags(
        (name = "Reviews", description = "Review ingestion and listing"),
        (name = "Notes", description = "Internal admin notes on reviews"),
        (name = "Analytics", description = "Dashboard metrics, weekly insight, monthly report"),
        (name = "Auth", description = "Token issuance and admin setup"),
        (name = "System", description = "Health checks")
    )
)]
struct ApiDoc;

// =============================================================================
// STANDARD RESPONSE TYPES
// =============================================================================

/// Standardized pagination metadata for list responses.
#[derive(Serialize, Deserialize, Debug)]
pub struct PaginationMeta {
    /// Total number of items matching the query (across all pages)
    pub total: usize,
    /// Maximum number of items per page (request parameter)
    pub limit: usize,
    /// Number of items skipped (request parameter)
    pub offset: usize,
    /// True if more items are available after this page
    pub has_more: bool,
}

/// Standardized list response wrapper with pagination metadata.
#[derive(Serialize, Deserialize, Debug)]
pub struct ListResponse<T> {
    /// The list of items for the current page
    pub data: Vec<T>,
    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T: Serialize> ListResponse<T> {
    /// Create a new paginated list response.
    ///
    /// Automatically calculates `has_more` based on offset, data length, and
    /// total count.
    pub fn new(data: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        let has_more = offset + data.len() < total;
        Self {
            data,
            pagination: PaginationMeta {
                total,
                limit,
                offset,
                has_more,
            },
        }
    }
}

// =============================================================================
// CORS CONFIGURATION HELPER
// =============================================================================

/// Parse a comma-separated origin list into header values, skipping entries
/// that are empty or not valid header values.
fn parse_origin_list(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

/// Allowed CORS origins from the `ALLOWED_ORIGINS` environment variable
/// (comma-separated). Defaults to the common local frontend ports.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

    let origins = parse_origin_list(&origins_str);
    if origins.is_empty() {
        return vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
        ];
    }
    origins
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "reverb_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "reverb_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("reverb-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/reverb".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| defaults::SERVER_PORT.to_string())
        .parse()
        .unwrap_or(defaults::SERVER_PORT);
    let token_ttl_minutes: i64 = std::env::var("TOKEN_TTL_MINUTES")
        .unwrap_or_else(|_| defaults::TOKEN_TTL_MINUTES.to_string())
        .parse()
        .unwrap_or(defaults::TOKEN_TTL_MINUTES);

    // Connect to database. DATABASE_MAX_CONNECTIONS overrides pool sizing;
    // everything else stays at the pool defaults.
    info!("Connecting to database...");
    let db = match std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
    {
        Some(limit) => {
            let config = PoolConfig::default().max_connections(limit);
            Database::connect_with_config(&database_url, config).await?
        }
        None => Database::connect(&database_url).await?,
    };
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Periodic pool utilization snapshots; the first fires immediately so
    // startup logs record the post-migration pool state.
    let metrics_pool = db.pool().clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(
            defaults::POOL_METRICS_INTERVAL_SECS,
        ));
        loop {
            ticker.tick().await;
            log_pool_metrics(&metrics_pool);
        }
    });

    // Drop tokens that expired while the server was down
    let removed = db.admins.cleanup_expired_tokens().await?;
    if removed > 0 {
        info!(removed, "Removed expired access tokens");
    }

    // First start: create the bootstrap admin account
    if db.admins.count().await? == 0 {
        db.admins
            .create(
                defaults::BOOTSTRAP_ADMIN_USERNAME,
                defaults::BOOTSTRAP_ADMIN_PASSWORD,
            )
            .await?;
        warn!(
            username = defaults::BOOTSTRAP_ADMIN_USERNAME,
            "No admin accounts found; created bootstrap admin with the default password. \
             Rotate it immediately."
        );
    }

    // Generation backend. A missing GROQ_API_KEY is a supported mode: the
    // pipeline stores its fixed fallback copy instead of failing requests.
    let backend = GroqBackend::from_env()?;
    if backend.is_configured() {
        info!(model = backend.model_name(), "Generation backend configured");
    } else {
        warn!("GROQ_API_KEY not set; enrichment and insights will use fallback copy");
    }
    let backend: Arc<dyn GenerationBackend> = Arc::new(backend);

    // Pipeline services share one repository handle and one backend handle
    let reviews: Arc<dyn ReviewRepository> = Arc::new(PgReviewRepository::new(db.pool().clone()));
    let state = AppState {
        ingestor: Arc::new(ReviewIngestor::new(reviews.clone(), backend.clone())),
        insights: Arc::new(InsightGenerator::new(reviews.clone(), backend.clone())),
        reports: Arc::new(ReportAssembler::new(reviews, backend)),
        db,
        token_ttl_minutes,
    };

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(health_check))
        // OpenAPI / Swagger UI
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Reviews
        .route("/api/v1/reviews", get(list_reviews).post(create_review))
        .route("/api/v1/reviews/:id", get(get_review))
        // Admin notes
        .route(
            "/api/v1/reviews/:id/notes",
            get(list_review_notes).post(create_review_note),
        )
        // Analytics (bearer-protected)
        .route("/api/v1/analytics/dashboard", get(get_dashboard))
        .route("/api/v1/analytics/weekly-insight", get(get_weekly_insight))
        .route("/api/v1/analytics/report/:month", get(get_monthly_report))
        // Auth
        .route("/api/v1/auth/token", post(issue_token))
        .route("/api/v1/auth/setup-admin", post(setup_admin))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(defaults::CORS_MAX_AGE_SECS))
        })
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// REVIEW HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
struct ReviewListQuery {
    limit: Option<i64>,
    offset: Option<i64>,
    /// Matches the exact star rating (legacy parameter name).
    min_rating: Option<i32>,
    /// Case-sensitive substring over the review text.
    search: Option<String>,
    /// UTC month key, `YYYY-MM`.
    month: Option<String>,
    sentiment: Option<String>,
    aspect: Option<String>,
}

impl ReviewListQuery {
    fn filter(&self) -> ReviewFilter {
        ReviewFilter {
            min_rating: self.min_rating,
            search: self.search.clone(),
            month: self.month.clone(),
            sentiment: self.sentiment.clone(),
            aspect: self.aspect.clone(),
        }
    }
}

async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate limit parameter before the database query
    if let Some(limit) = query.limit {
        if limit <= 0 {
            return Err(ApiError::BadRequest("limit must be >= 1".into()));
        }
    }

    let limit = query.limit.unwrap_or(defaults::PAGE_LIMIT);
    let offset = query.offset.unwrap_or(defaults::PAGE_OFFSET).max(0);

    let req = ListReviewsRequest {
        filter: query.filter(),
        limit: Some(limit),
        offset: Some(offset),
    };

    let response = state.db.reviews.list(req).await?;
    Ok(Json(ListResponse::new(
        response.reviews,
        response.total as usize,
        limit as usize,
        offset as usize,
    )))
}

async fn create_review(
    State(state): State<AppState>,
    Json(body): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.ingestor.ingest(body).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.db.reviews.get(id).await?;
    Ok(Json(review))
}

// =============================================================================
// ADMIN NOTE HANDLERS
// =============================================================================

async fn create_review_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateAdminNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.db.notes.insert(id, body).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn list_review_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = state.db.notes.list_for_review(id).await?;
    Ok(Json(notes))
}

// =============================================================================
// ANALYTICS HANDLERS
// =============================================================================

/// Filter parameters accepted by the dashboard endpoint.
#[derive(Debug, Deserialize)]
struct FilterQuery {
    min_rating: Option<i32>,
    search: Option<String>,
    month: Option<String>,
    sentiment: Option<String>,
    aspect: Option<String>,
}

impl FilterQuery {
    fn into_filter(self) -> ReviewFilter {
        ReviewFilter {
            min_rating: self.min_rating,
            search: self.search,
            month: self.month,
            sentiment: self.sentiment,
            aspect: self.aspect,
        }
    }
}

/// Filter parameters accepted by the report endpoint. The month comes from
/// the path, so it is not a query parameter here.
#[derive(Debug, Deserialize)]
struct ReportQuery {
    min_rating: Option<i32>,
    search: Option<String>,
    sentiment: Option<String>,
    aspect: Option<String>,
}

impl ReportQuery {
    fn into_filter(self) -> ReviewFilter {
        ReviewFilter {
            min_rating: self.min_rating,
            search: self.search,
            month: None,
            sentiment: self.sentiment,
            aspect: self.aspect,
        }
    }
}

async fn get_dashboard(
    State(state): State<AppState>,
    _admin: RequireAuth,
    Query(query): Query<FilterQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state.db.reviews.scan(&query.into_filter()).await?;
    let metrics = reverb_analytics::aggregate(&reviews);
    Ok(Json(metrics))
}

async fn get_weekly_insight(
    State(state): State<AppState>,
    _admin: RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let insight = state.insights.weekly_insight(chrono::Utc::now()).await?;
    Ok(Json(insight))
}

async fn get_monthly_report(
    State(state): State<AppState>,
    _admin: RequireAuth,
    Path(month): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.reports.assemble(&month, &query.into_filter()).await?;
    Ok(Json(report))
}

// =============================================================================
// AUTH HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenForm {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
}

async fn issue_token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = state
        .db
        .admins
        .verify_credentials(&form.username, &form.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Incorrect username or password".to_string()))?;

    let token = state
        .db
        .admins
        .issue_token(admin.id, state.token_ttl_minutes)
        .await?;

    info!(username = %admin.username, "Issued access token");
    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
struct SetupAdminRequest {
    username: String,
    password: String,
}

async fn setup_admin(
    State(state): State<AppState>,
    Json(body): Json<SetupAdminRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if state.db.admins.count().await? > 0 {
        return Err(ApiError::BadRequest("Admin already exists".to_string()));
    }

    let admin = state.db.admins.create(&body.username, &body.password).await?;
    info!(username = %admin.username, "Created first admin account");
    Ok((StatusCode::CREATED, Json(admin)))
}

// =============================================================================
// AUTHENTICATION MIDDLEWARE
// =============================================================================

/// Extractor that requires a valid bearer token.
///
/// Validates the `Authorization: Bearer` header against the token store and
/// yields the owning admin. Handlers take it as an opaque proof of identity;
/// none of them branch on its contents today.
#[derive(Debug, Clone)]
struct RequireAuth {
    #[allow(dead_code)]
    admin: Admin,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let admin = state
            .db
            .admins
            .validate_token(token)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(RequireAuth { admin })
    }
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    Internal(reverb_core::Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<reverb_core::Error> for ApiError {
    fn from(err: reverb_core::Error) -> Self {
        match &err {
            reverb_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            reverb_core::Error::ReviewNotFound(_) => ApiError::NotFound(err.to_string()),
            reverb_core::Error::AdminNotFound(_) => ApiError::NotFound(err.to_string()),
            // An empty report month is a 404 with the exact no-data message
            reverb_core::Error::NoData(msg) => ApiError::NotFound(msg.clone()),
            reverb_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            reverb_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            reverb_core::Error::Database(sqlx_err) => {
                let msg = sqlx_err.to_string();
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    let friendly_msg = if msg.contains("username") {
                        "An account with this username already exists".to_string()
                    } else {
                        msg
                    };
                    return ApiError::Conflict(friendly_msg);
                }
                ApiError::Internal(err)
            }
            _ => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
