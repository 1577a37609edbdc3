use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};

use storefront_backend::api::{AuditLogApi, AuthApi, HealthApi, ReferralApi, UserAdminApi};
use storefront_backend::app_data::AppData;
use storefront_backend::config::{init_logging, Settings};
use storefront_backend::domain::Role;
use storefront_backend::services::crypto;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let settings = Settings::from_env().expect("Invalid configuration");

    let db: DatabaseConnection = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(database_url = %settings.database_url, "Connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    let app_data = AppData::init(db, &settings);

    seed_admin(&app_data).await;

    let auth_api = AuthApi::new(
        app_data.auth_service.clone(),
        app_data.token_service.clone(),
        app_data.user_store.clone(),
    );
    let user_api = UserAdminApi::new(
        app_data.user_service.clone(),
        app_data.token_service.clone(),
        app_data.user_store.clone(),
    );
    let referral_api = ReferralApi::new(
        app_data.referral_service.clone(),
        app_data.token_service.clone(),
        app_data.user_store.clone(),
    );
    let audit_api = AuditLogApi::new(
        app_data.audit_service.clone(),
        app_data.token_service.clone(),
        app_data.user_store.clone(),
    );

    // Create OpenAPI service with API implementation
    let api_service = OpenApiService::new(
        (HealthApi, auth_api, user_api, referral_api, audit_api),
        "Storefront Back Office API",
        env!("CARGO_PKG_VERSION"),
    )
    .server("http://localhost:3000/api");

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    // Compose routes: nest API service under /api and Swagger UI under /swagger
    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!(bind_addr = %settings.bind_addr, "Starting server");
    Server::new(TcpListener::bind(settings.bind_addr)).run(app).await
}

/// Create the administrator account on first boot when `SEED_ADMIN_EMAIL`
/// and `SEED_ADMIN_PASSWORD` are set. A second run is a no-op.
async fn seed_admin(app_data: &AppData) {
    let (email, password) = match (
        std::env::var("SEED_ADMIN_EMAIL"),
        std::env::var("SEED_ADMIN_PASSWORD"),
    ) {
        (Ok(email), Ok(password)) => (email, password),
        _ => return,
    };

    match app_data.user_store.get_by_email(&email).await {
        Ok(Some(_)) => {
            tracing::info!(email = %email, "Admin account already exists, skipping seed");
        }
        Ok(None) => {
            let hash = match crypto::hash_password(&password) {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::error!("Failed to hash seed admin password: {}", e);
                    return;
                }
            };
            match app_data
                .user_store
                .insert_user(&email, Some("Administrator"), &hash, Role::Admin)
                .await
            {
                Ok(user) => tracing::info!(user_id = user.id, "Seeded admin account"),
                Err(e) => tracing::error!("Failed to seed admin account: {}", e),
            }
        }
        Err(e) => tracing::error!("Failed to check for existing admin: {}", e),
    }
}
