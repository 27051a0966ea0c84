pub mod auth;
pub mod health;
pub mod location;
pub mod profiles;
pub mod swagger;

use actix_web::{error, web, HttpRequest};

use crate::utils::AppError;

fn json_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("❌ Rejected JSON body on {}: {}", req.path(), err);
    AppError::InvalidRequest(format!("Invalid request body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("❌ Rejected query string on {}: {}", req.path(), err);
    AppError::InvalidRequest(format!("Invalid query parameters: {}", err)).into()
}

/// Registers every API route. App data (store, config, geolocator) is
/// provided by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(64 * 1024).error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Accounts & session
        .route("/register-user", web::post().to(auth::register_user))
        .route("/providers", web::get().to(auth::list_providers))
        .route("/users/{email}", web::get().to(auth::check_user))
        .route("/api/login", web::post().to(auth::login))
        .route("/api/logout", web::post().to(auth::logout))
        .route("/api/session", web::get().to(auth::current_session))
        // Profiles
        .route("/create-profile", web::post().to(profiles::create_profile))
        .route("/get-profile/{email}", web::get().to(profiles::get_profile))
        .route("/edit-profile/{email}", web::put().to(profiles::edit_profile))
        // Listing
        .route("/providersInfo", web::get().to(profiles::list_profiles))
        .route("/api/getAllProvidersInfo", web::get().to(profiles::all_providers_info))
        .route("/get-profiles/{location}", web::get().to(profiles::profiles_by_location))
        .route("/get-filtered-providers", web::get().to(profiles::filtered_providers))
        .route("/api/browse", web::get().to(profiles::browse))
        // Location
        .route("/api/locate", web::get().to(location::locate));
}
