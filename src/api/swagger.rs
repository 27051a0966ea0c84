use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Service Hunt API",
        version = "1.0.0",
        description = "Marketplace API connecting service providers and customers.\n\n**Session:** `POST /api/login` sets an HttpOnly `session` cookie (signed) plus client-readable `email` and `username` cookies. `GET /api/session` verifies the signed cookie.",
    ),
    paths(
        // Auth
        crate::api::auth::register_user,
        crate::api::auth::login,
        crate::api::auth::current_session,
        crate::api::auth::logout,

        // Accounts
        crate::api::auth::list_providers,
        crate::api::auth::check_user,

        // Profiles
        crate::api::profiles::create_profile,
        crate::api::profiles::get_profile,
        crate::api::profiles::edit_profile,

        // Listing
        crate::api::profiles::list_profiles,
        crate::api::profiles::all_providers_info,
        crate::api::profiles::profiles_by_location,
        crate::api::profiles::filtered_providers,
        crate::api::profiles::browse,

        // Location & Health
        crate::api::location::locate,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::RegisterRequest,
            crate::models::LoginRequest,
            crate::models::AccountSummary,
            crate::models::ProfileForm,
            crate::models::ProfileResponse,
            crate::api::location::LocateResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and cookie session endpoints."),
        (name = "Accounts", description = "Account listing and existence checks. Passwords are never returned."),
        (name = "Profiles", description = "Create, fetch and overwrite a provider's public profile, keyed by email."),
        (name = "Listing", description = "Profile listings with optional service/location/experience/rate filters."),
        (name = "Location", description = "IP-based city detection."),
        (name = "Health", description = "Service and database health."),
    )
)]
pub struct ApiDoc;
