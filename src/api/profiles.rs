use actix_web::{web, HttpResponse};

use crate::database::ProviderStore;
use crate::models::{
    to_responses, FilteredProvidersQuery, ProfileForm, ProfileResponse, ProviderFilter,
};
use crate::services::profile_service;

#[utoipa::path(
    post,
    path = "/create-profile",
    tag = "Profiles",
    request_body = ProfileForm,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Missing required fields"),
        (status = 409, description = "Profile with this email already exists")
    )
)]
pub async fn create_profile(
    store: web::Data<dyn ProviderStore>,
    form: web::Json<ProfileForm>,
) -> HttpResponse {
    let email = form.email.as_deref().unwrap_or("N/A");
    log::info!("📇 POST /create-profile - email: {}", email);

    match profile_service::create_profile(store.get_ref(), &form).await {
        Ok(profile) => {
            log::info!("✅ Profile created: {}", profile.email);
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "message": "Profile created successfully",
                "profile": ProfileResponse::from(profile)
            }))
        }
        Err(e) => {
            log::warn!("❌ Profile creation failed: {} - {}", email, e);
            e.to_http_response("Failed to create profile")
        }
    }
}

#[utoipa::path(
    get,
    path = "/get-profile/{email}",
    tag = "Profiles",
    params(("email" = String, Path, description = "Provider email")),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    store: web::Data<dyn ProviderStore>,
    path: web::Path<String>,
) -> HttpResponse {
    let email = path.into_inner();
    log::info!("📇 GET /get-profile/{}", email);

    match profile_service::get_profile(store.get_ref(), &email).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": ProfileResponse::from(profile)
        })),
        Err(e) => e.to_http_response("Failed to fetch profile"),
    }
}

#[utoipa::path(
    put,
    path = "/edit-profile/{email}",
    tag = "Profiles",
    params(("email" = String, Path, description = "Email of the profile to overwrite")),
    request_body = ProfileForm,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Missing required fields"),
        (status = 404, description = "Profile not found to update")
    )
)]
pub async fn edit_profile(
    store: web::Data<dyn ProviderStore>,
    path: web::Path<String>,
    form: web::Json<ProfileForm>,
) -> HttpResponse {
    let email = path.into_inner();
    log::info!("✏️  PUT /edit-profile/{}", email);

    match profile_service::edit_profile(store.get_ref(), &email, &form).await {
        Ok(profile) => {
            log::info!("✅ Profile updated: {}", email);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Profile updated successfully",
                "profile": ProfileResponse::from(profile)
            }))
        }
        Err(e) => {
            log::warn!("❌ Profile update failed: {} - {}", email, e);
            e.to_http_response("Error updating profile")
        }
    }
}

/// The dashboard expects a bare array here.
#[utoipa::path(
    get,
    path = "/providersInfo",
    tag = "Listing",
    responses((status = 200, description = "All profiles", body = [ProfileResponse]))
)]
pub async fn list_profiles(store: web::Data<dyn ProviderStore>) -> HttpResponse {
    log::info!("📋 GET /providersInfo");

    match profile_service::list_profiles(store.get_ref()).await {
        Ok(profiles) => HttpResponse::Ok().json(to_responses(profiles)),
        Err(e) => e.to_http_response("Failed to fetch providers info"),
    }
}

#[utoipa::path(
    get,
    path = "/api/getAllProvidersInfo",
    tag = "Listing",
    responses((status = 200, description = "All profiles, wrapped", body = [ProfileResponse]))
)]
pub async fn all_providers_info(store: web::Data<dyn ProviderStore>) -> HttpResponse {
    log::info!("📋 GET /api/getAllProvidersInfo");

    match profile_service::list_profiles(store.get_ref()).await {
        Ok(profiles) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "providers": to_responses(profiles)
        })),
        Err(e) => e.to_http_response("Failed to get providers info"),
    }
}

#[utoipa::path(
    get,
    path = "/get-profiles/{location}",
    tag = "Listing",
    params(("location" = String, Path, description = "Case-insensitive substring of the city")),
    responses((status = 200, description = "Profiles in matching locations", body = [ProfileResponse]))
)]
pub async fn profiles_by_location(
    store: web::Data<dyn ProviderStore>,
    path: web::Path<String>,
) -> HttpResponse {
    let location = path.into_inner();
    log::info!("📍 GET /get-profiles/{}", location);

    match profile_service::profiles_by_location(store.get_ref(), &location).await {
        Ok(profiles) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profiles": to_responses(profiles)
        })),
        Err(e) => e.to_http_response("Failed to fetch profiles by location"),
    }
}

#[utoipa::path(
    get,
    path = "/get-filtered-providers",
    tag = "Listing",
    params(FilteredProvidersQuery),
    responses((status = 200, description = "Profiles matching service and location", body = [ProfileResponse]))
)]
pub async fn filtered_providers(
    store: web::Data<dyn ProviderStore>,
    query: web::Query<FilteredProvidersQuery>,
) -> HttpResponse {
    log::info!(
        "🔍 GET /get-filtered-providers - service: {:?}, location: {:?}",
        query.service,
        query.location
    );

    match profile_service::filtered_profiles(store.get_ref(), &query.service, &query.location).await {
        Ok(profiles) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "providers": to_responses(profiles)
        })),
        Err(e) => e.to_http_response("Failed to fetch filtered providers"),
    }
}

#[utoipa::path(
    get,
    path = "/api/browse",
    tag = "Listing",
    params(ProviderFilter),
    responses((status = 200, description = "Profiles passing every non-blank filter", body = [ProfileResponse]))
)]
pub async fn browse(
    store: web::Data<dyn ProviderStore>,
    filter: web::Query<ProviderFilter>,
) -> HttpResponse {
    log::info!("🔍 GET /api/browse - {:?}", filter.0);

    match profile_service::browse(store.get_ref(), &filter).await {
        Ok(profiles) => {
            let providers = to_responses(profiles);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "total": providers.len(),
                "providers": providers
            }))
        }
        Err(e) => e.to_http_response("Failed to browse providers"),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{body_json, call_get, call_post, call_put, init_app};
    use actix_web::http::StatusCode;
    use serde_json::json;

    fn profile_body(email: &str, service: &str, location: &str, years: i64, rate: i64) -> serde_json::Value {
        json!({
            "email": email,
            "userName": "Asha",
            "mobileNumber": "9876543210",
            "yearsOfExperience": years.to_string(),
            "hourlyRate": rate,
            "service": service,
            "location": location
        })
    }

    #[actix_web::test]
    async fn test_create_then_fetch_unchanged() {
        let app = init_app!();

        let resp = call_post!(app, "/create-profile", profile_body("a@x.com", "Plumber", "Pune", 4, 500));
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await["profile"].clone();

        let resp = call_get!(app, "/get-profile/a@x.com");
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched = body_json(resp).await["profile"].clone();

        assert_eq!(created, fetched);
        assert_eq!(fetched["yearsOfExperience"], 4);
        assert_eq!(fetched["hourlyRate"], 500);
        assert_eq!(fetched["service"], "Plumber");
    }

    #[actix_web::test]
    async fn test_create_missing_fields_and_duplicate() {
        let app = init_app!();

        let resp = call_post!(app, "/create-profile", json!({ "email": "a@x.com", "userName": "Asha" }));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["message"], "Missing required fields");

        let resp = call_post!(app, "/create-profile", profile_body("a@x.com", "Plumber", "Pune", 1, 1));
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = call_post!(app, "/create-profile", profile_body("A@x.com", "Chef", "Goa", 1, 1));
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_non_numeric_rate_is_rejected() {
        let app = init_app!();
        let mut body = profile_body("a@x.com", "Plumber", "Pune", 1, 1);
        body["hourlyRate"] = json!("a lot");

        let resp = call_post!(app, "/create-profile", body);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["success"], false);
    }

    #[actix_web::test]
    async fn test_get_and_edit_unknown_profile() {
        let app = init_app!();

        let resp = call_get!(app, "/get-profile/ghost@x.com");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = call_put!(app, "/edit-profile/ghost@x.com", profile_body("", "Chef", "Goa", 1, 1));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["message"], "Profile not found to update");

        let listing = body_json(call_get!(app, "/providersInfo")).await;
        assert_eq!(listing, json!([]));
    }

    #[actix_web::test]
    async fn test_listing_routes() {
        let app = init_app!();
        call_post!(app, "/create-profile", profile_body("a@x.com", "Plumber", "Pune", 5, 400));
        call_post!(app, "/create-profile", profile_body("b@x.com", "Electrician", "Navi Mumbai", 2, 900));
        call_post!(app, "/create-profile", profile_body("c@x.com", "Plumber", "Mumbai", 10, 1500));

        let all = body_json(call_get!(app, "/providersInfo")).await;
        assert_eq!(all.as_array().map(|a| a.len()), Some(3));

        let wrapped = body_json(call_get!(app, "/api/getAllProvidersInfo")).await;
        assert_eq!(wrapped["providers"].as_array().map(|a| a.len()), Some(3));

        let by_location = body_json(call_get!(app, "/get-profiles/MUMBAI")).await;
        let emails: Vec<_> = by_location["profiles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["email"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(emails, vec!["b@x.com", "c@x.com"]);

        let plumbers = body_json(call_get!(app, "/get-filtered-providers?service=Plumber")).await;
        let plumbers = plumbers["providers"].as_array().unwrap().clone();
        assert_eq!(plumbers.len(), 2);
        assert!(plumbers.iter().all(|p| p["service"] == "Plumber"));

        let combined = body_json(call_get!(app, "/get-filtered-providers?service=plumber&location=mum")).await;
        assert_eq!(combined["providers"].as_array().map(|a| a.len()), Some(1));
        assert_eq!(combined["providers"][0]["email"], "c@x.com");
    }

    #[actix_web::test]
    async fn test_browse_applies_every_filter() {
        let app = init_app!();
        call_post!(app, "/create-profile", profile_body("a@x.com", "Plumber", "Pune", 5, 400));
        call_post!(app, "/create-profile", profile_body("b@x.com", "Plumber", "Pune", 1, 300));
        call_post!(app, "/create-profile", profile_body("c@x.com", "Plumber", "Pune", 8, 2500));

        let body = body_json(call_get!(
            app,
            "/api/browse?service=plumber&location=pun&minExperience=3&maxHourlyRate=2000"
        ))
        .await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["providers"][0]["email"], "a@x.com");

        let body = body_json(call_get!(app, "/api/browse?service=&location=")).await;
        assert_eq!(body["total"], 3);
    }
}
