//! HTTP API for workdesk: routing, OpenAPI document and server startup

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use chrono::Duration;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use sea_orm::DatabaseConnection;

/// Default session lifetime
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
    /// HS256 key used to sign session tokens
    pub jwt_secret: Vec<u8>,
    pub session_ttl: Duration,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workdesk API",
        version = "0.1.0",
        description = "REST API for company structure, tasks, meetings and calendars"
    ),
    paths(
        handlers::system::health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::users::get_me,
        handlers::users::change_me,
        handlers::users::delete_me,
        handlers::users::my_tasks,
        handlers::users::owned_tasks,
        handlers::users::my_ratings,
        handlers::users::average_rating,
        handlers::users::change_role,
        handlers::users::remove_from_department,
        handlers::companies::create_company,
        handlers::companies::list_company_users,
        handlers::companies::add_company_user,
        handlers::companies::remove_company_user,
        handlers::companies::delete_company,
        handlers::departments::list_departments,
        handlers::departments::create_department,
        handlers::departments::change_department_head,
        handlers::departments::delete_department,
        handlers::departments::add_department_member,
        handlers::tasks::create_task,
        handlers::tasks::get_task,
        handlers::tasks::change_task,
        handlers::tasks::change_task_status,
        handlers::tasks::delete_task,
        handlers::tasks::list_comments,
        handlers::tasks::create_comment,
        handlers::tasks::delete_comment,
        handlers::tasks::create_rating,
        handlers::meetings::list_meetings,
        handlers::meetings::create_meeting,
        handlers::meetings::change_meeting,
        handlers::meetings::delete_meeting,
        handlers::meetings::add_participant,
        handlers::calendar::day_schedule,
        handlers::calendar::month_schedule,
        handlers::news::list_news,
        handlers::news::create_news,
        handlers::news::delete_news,
    ),
    components(
        schemas(
            models::HealthResponse,
            models::ErrorResponse,
            models::MessageResponse,
            models::CompanyRole,
            models::TaskStatus,
            models::EventType,
            models::RegisterRequest,
            models::LoginRequest,
            models::LoginResponse,
            models::User,
            models::ChangeUserRequest,
            models::ChangeRoleRequest,
            models::AverageRating,
            models::CreateCompanyRequest,
            models::Company,
            models::CreateDepartmentRequest,
            models::ChangeHeadRequest,
            models::Department,
            models::CreateTaskRequest,
            models::ChangeTaskRequest,
            models::ChangeTaskStatusRequest,
            models::Task,
            models::CreateCommentRequest,
            models::Comment,
            models::CreateRatingRequest,
            models::Rating,
            models::CreateMeetingRequest,
            models::ChangeMeetingRequest,
            models::Meeting,
            models::CalendarEvent,
            models::CreateNewsRequest,
            models::News,
        )
    ),
    tags(
        (name = "auth", description = "Registration and sessions"),
        (name = "users", description = "Current user and colleague administration"),
        (name = "companies", description = "Companies and membership"),
        (name = "departments", description = "Departments and their heads"),
        (name = "tasks", description = "Tasks, comments and ratings"),
        (name = "meetings", description = "Meetings and participants"),
        (name = "calendar", description = "Personal calendar views"),
        (name = "news", description = "Company news"),
        (name = "system", description = "System health and info endpoints")
    )
)]
struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS (for development)
    pub enable_cors: bool,
    /// Secret for signing session tokens
    pub jwt_secret: String,
    /// Session token and cookie lifetime
    pub session_ttl: Duration,
}

impl ApiServerConfig {
    pub fn new(bind_addr: SocketAddr, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr,
            enable_cors: false,
            jwt_secret: jwt_secret.into(),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, db: DatabaseConnection) -> Self {
        let state = Arc::new(AppState {
            db,
            jwt_secret: config.jwt_secret.as_bytes().to_vec(),
            session_ttl: config.session_ttl,
        });

        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let api_doc = ApiDoc::openapi();

        let jwt_state = Arc::new(middleware::JwtState::new(&self.state.jwt_secret));

        // PUBLIC routes (no authentication required)
        let public_router = Router::new()
            .route("/api/health", get(handlers::system::health_check))
            .route("/registration", post(handlers::auth::register))
            .route("/auth/login", post(handlers::auth::login))
            .route("/auth/logout", post(handlers::auth::logout))
            .with_state(self.state.clone());

        // PROTECTED routes (require a session token)
        let protected_router = Router::new()
            .route(
                "/users/me",
                get(handlers::users::get_me)
                    .patch(handlers::users::change_me)
                    .delete(handlers::users::delete_me),
            )
            .route("/users/me/tasks", get(handlers::users::my_tasks))
            .route("/users/me/tasks/owned", get(handlers::users::owned_tasks))
            .route("/users/me/ratings", get(handlers::users::my_ratings))
            .route(
                "/users/me/ratings/average",
                get(handlers::users::average_rating),
            )
            .route("/users/{id}/role", patch(handlers::users::change_role))
            .route(
                "/users/{id}/department",
                delete(handlers::users::remove_from_department),
            )
            // Companies and departments
            .route("/companies", post(handlers::companies::create_company))
            .route("/companies/{id}", delete(handlers::companies::delete_company))
            .route(
                "/companies/{id}/users",
                get(handlers::companies::list_company_users),
            )
            .route(
                "/companies/{id}/users/{user_id}",
                post(handlers::companies::add_company_user)
                    .delete(handlers::companies::remove_company_user),
            )
            .route(
                "/companies/{id}/departments",
                get(handlers::departments::list_departments)
                    .post(handlers::departments::create_department),
            )
            .route(
                "/companies/{id}/departments/{dep_id}",
                patch(handlers::departments::change_department_head)
                    .delete(handlers::departments::delete_department),
            )
            .route(
                "/companies/{id}/departments/{dep_id}/members/{user_id}",
                post(handlers::departments::add_department_member),
            )
            .route(
                "/companies/{id}/news",
                get(handlers::news::list_news).post(handlers::news::create_news),
            )
            .route(
                "/companies/{id}/news/{news_id}",
                delete(handlers::news::delete_news),
            )
            // Tasks
            .route("/companies/tasks", post(handlers::tasks::create_task))
            .route(
                "/companies/tasks/{id}",
                get(handlers::tasks::get_task)
                    .patch(handlers::tasks::change_task)
                    .delete(handlers::tasks::delete_task),
            )
            .route(
                "/companies/tasks/{id}/status",
                patch(handlers::tasks::change_task_status),
            )
            .route(
                "/companies/tasks/{id}/comments",
                get(handlers::tasks::list_comments).post(handlers::tasks::create_comment),
            )
            .route(
                "/companies/tasks/{id}/comments/{comment_id}",
                delete(handlers::tasks::delete_comment),
            )
            .route(
                "/companies/tasks/{id}/ratings",
                post(handlers::tasks::create_rating),
            )
            // Meetings and calendar
            .route(
                "/meeting",
                get(handlers::meetings::list_meetings).post(handlers::meetings::create_meeting),
            )
            .route(
                "/meeting/{id}",
                patch(handlers::meetings::change_meeting)
                    .delete(handlers::meetings::delete_meeting),
            )
            .route(
                "/meeting/{id}/participants/{user_id}",
                post(handlers::meetings::add_participant),
            )
            .route("/calendar/my/day", get(handlers::calendar::day_schedule))
            .route("/calendar/my/month", get(handlers::calendar::month_schedule))
            .with_state(self.state.clone())
            .layer(axum_middleware::from_fn_with_state(
                jwt_state,
                middleware::require_auth,
            ));

        let api_router = public_router.merge(protected_router);

        // SwaggerUi also serves /api/openapi.json
        let router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(api_router);

        let cors = if self.config.enable_cors {
            use tower_http::cors::AllowOrigin;

            // Cookie auth needs credentials, which rules out a wildcard origin
            let cors_layer = CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::PATCH,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
                    let origin_str = origin.to_str().unwrap_or("");
                    origin_str.starts_with("http://localhost:")
                        || origin_str.starts_with("http://127.0.0.1:")
                        || origin_str.starts_with("https://localhost:")
                        || origin_str.starts_with("https://127.0.0.1:")
                }));

            Some(cors_layer)
        } else {
            None
        };

        let mut router = router.layer(TraceLayer::new_for_http());

        if let Some(cors) = cors {
            router = router.layer(cors);
        }

        router
    }

    /// Start the API server and run until `shutdown` resolves
    pub async fn start(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI spec: http://{}/api/openapi.json",
            self.config.bind_addr
        );
        info!("Swagger UI: http://{}/swagger-ui", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        info!("API server stopped");
        Ok(())
    }
}
