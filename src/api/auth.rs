use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::Config;
use crate::database::ProviderStore;
use crate::models::{AccountSummary, LoginRequest, RegisterRequest};
use crate::services::auth_service;

pub const SESSION_COOKIE: &str = "session";
pub const EMAIL_COOKIE: &str = "email";
pub const USER_NAME_COOKIE: &str = "username";

fn cookie(name: &'static str, value: String, http_only: bool, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(http_only)
        .max_age(max_age)
        .finish()
}

/// `email` and `username` stay readable by the browser client; `session`
/// is the signed copy the server can verify.
fn session_cookies(user: &AccountSummary, token: String, ttl_hours: i64) -> Vec<Cookie<'static>> {
    let max_age = CookieDuration::hours(ttl_hours);
    vec![
        cookie(SESSION_COOKIE, token, true, max_age),
        cookie(EMAIL_COOKIE, urlencoding::encode(&user.email).into_owned(), false, max_age),
        cookie(USER_NAME_COOKIE, urlencoding::encode(&user.user_name).into_owned(), false, max_age),
    ]
}

fn expired_cookies() -> Vec<Cookie<'static>> {
    [SESSION_COOKIE, EMAIL_COOKIE, USER_NAME_COOKIE]
        .into_iter()
        .map(|name| cookie(name, String::new(), name == SESSION_COOKIE, CookieDuration::ZERO))
        .collect()
}

#[utoipa::path(
    post,
    path = "/register-user",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AccountSummary),
        (status = 400, description = "Missing fields, short password or invalid email"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn register_user(
    store: web::Data<dyn ProviderStore>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /register-user - email: {}", email);

    match auth_service::register(store.get_ref(), &request).await {
        Ok(user) => {
            log::info!("✅ Registration successful: {}", user.email);
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "message": "Registration successful",
                "user": user
            }))
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", email, e);
            e.to_http_response("Failed to register user")
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookies set", body = AccountSummary),
        (status = 400, description = "Email and password are required"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    store: web::Data<dyn ProviderStore>,
    config: web::Data<Config>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔐 POST /api/login - email: {}", email);

    let user = match auth_service::login(store.get_ref(), &request).await {
        Ok(user) => user,
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            return e.to_http_response("Server error during login");
        }
    };

    let token = match auth_service::issue_session(&user, &config.jwt_secret, config.session_ttl_hours) {
        Ok(token) => token,
        Err(e) => return e.to_http_response("Server error during login"),
    };

    log::info!("✅ Login successful: {}", user.email);

    let mut response = HttpResponse::Ok();
    for c in session_cookies(&user, token, config.session_ttl_hours) {
        response.cookie(c);
    }
    response.json(serde_json::json!({
        "success": true,
        "message": "Login successful",
        "user": user
    }))
}

#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie is valid", body = AccountSummary),
        (status = 401, description = "Missing, invalid or expired session")
    )
)]
pub async fn current_session(req: HttpRequest, config: web::Data<Config>) -> HttpResponse {
    log::info!("✓ GET /api/session");

    let Some(cookie) = req.cookie(SESSION_COOKIE) else {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "message": "No active session"
        }));
    };

    match auth_service::verify_session(cookie.value(), &config.jwt_secret) {
        Ok(claims) => {
            let user = AccountSummary {
                user_name: claims.name,
                email: claims.sub,
            };
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "user": user,
                "expiresAt": claims.exp
            }))
        }
        Err(e) => {
            log::warn!("❌ Session rejected: {}", e);
            e.to_http_response("Failed to verify session")
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Auth",
    responses((status = 200, description = "Session cookies cleared"))
)]
pub async fn logout() -> HttpResponse {
    log::info!("👋 POST /api/logout");

    let mut response = HttpResponse::Ok();
    for c in expired_cookies() {
        response.cookie(c);
    }
    response.json(serde_json::json!({
        "success": true,
        "message": "Logged out"
    }))
}

#[utoipa::path(
    get,
    path = "/providers",
    tag = "Accounts",
    responses(
        (status = 200, description = "All registered accounts, without passwords", body = [AccountSummary])
    )
)]
pub async fn list_providers(store: web::Data<dyn ProviderStore>) -> HttpResponse {
    log::info!("👥 GET /providers");

    match auth_service::list_accounts(store.get_ref()).await {
        Ok(providers) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "providers": providers
        })),
        Err(e) => e.to_http_response("Failed to fetch providers"),
    }
}

#[utoipa::path(
    get,
    path = "/users/{email}",
    tag = "Accounts",
    params(("email" = String, Path, description = "Account email, matched case-insensitively")),
    responses(
        (status = 200, description = "Existence check result", body = [AccountSummary])
    )
)]
pub async fn check_user(
    store: web::Data<dyn ProviderStore>,
    path: web::Path<String>,
) -> HttpResponse {
    let email = path.into_inner();
    log::info!("🔎 GET /users/{}", email);

    match auth_service::find_users(store.get_ref(), &email).await {
        Ok(users) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "exists": !users.is_empty(),
            "users": users
        })),
        Err(e) => e.to_http_response("Failed to check user"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, call_get, call_post, init_app};
    use actix_web::{http::StatusCode, test};

    #[actix_web::test]
    async fn test_register_returns_sanitized_user() {
        let app = init_app!();

        let resp = call_post!(
            app,
            "/register-user",
            serde_json::json!({
                "userName": "Asha",
                "email": "a@x.com",
                "password": "secret1",
                "mobile": "9876543210"
            })
        );

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["user"], serde_json::json!({ "userName": "Asha", "email": "a@x.com" }));
        assert!(!body.to_string().contains("secret1"));
    }

    #[actix_web::test]
    async fn test_register_validation_and_conflict() {
        let app = init_app!();

        let resp = call_post!(
            app,
            "/register-user",
            serde_json::json!({ "userName": "Asha", "email": "a@x.com", "password": "short" })
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["success"], false);

        let first = call_post!(
            app,
            "/register-user",
            serde_json::json!({ "userName": "Asha", "email": "a@x.com", "password": "secret1" })
        );
        assert_eq!(first.status(), StatusCode::CREATED);

        let duplicate = call_post!(
            app,
            "/register-user",
            serde_json::json!({ "userName": "Asha", "email": "A@X.com", "password": "secret1" })
        );
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(duplicate).await["message"], "Email already exists");
    }

    #[actix_web::test]
    async fn test_malformed_json_is_a_json_400() {
        let app = init_app!();

        let req = test::TestRequest::post()
            .uri("/register-user")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["success"], false);
    }

    #[actix_web::test]
    async fn test_login_sets_cookies_and_session_verifies() {
        let app = init_app!();
        call_post!(
            app,
            "/register-user",
            serde_json::json!({ "userName": "Asha", "email": "a@x.com", "password": "secret1" })
        );

        let resp = call_post!(
            app,
            "/api/login",
            serde_json::json!({ "email": "a@x.com", "password": "secret1" })
        );
        assert_eq!(resp.status(), StatusCode::OK);

        let mut names: Vec<String> = resp.response().cookies().map(|c| c.name().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["email", "session", "username"]);

        let session = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .expect("session cookie");
        let display_name = resp
            .response()
            .cookies()
            .find(|c| c.name() == "username")
            .map(|c| c.value().to_string());
        assert_eq!(display_name.as_deref(), Some("Asha"));

        let body = body_json(resp).await;
        assert_eq!(body["user"], serde_json::json!({ "userName": "Asha", "email": "a@x.com" }));
        assert!(body["user"].get("password").is_none());

        let req = test::TestRequest::get()
            .uri("/api/session")
            .cookie(Cookie::new(SESSION_COOKIE, session))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["user"]["email"], "a@x.com");
    }

    #[actix_web::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let app = init_app!();
        call_post!(
            app,
            "/register-user",
            serde_json::json!({ "userName": "Asha", "email": "a@x.com", "password": "secret1" })
        );

        let wrong = call_post!(
            app,
            "/api/login",
            serde_json::json!({ "email": "a@x.com", "password": "secret2" })
        );
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert!(wrong.response().cookies().next().is_none());
        let wrong_body = body_json(wrong).await;

        let unknown = call_post!(
            app,
            "/api/login",
            serde_json::json!({ "email": "nobody@x.com", "password": "secret1" })
        );
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(unknown).await, wrong_body);
    }

    #[actix_web::test]
    async fn test_session_without_or_with_forged_cookie() {
        let app = init_app!();

        let resp = call_get!(app, "/api/session");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let forged = auth_service::issue_session(
            &AccountSummary {
                user_name: "Mallory".into(),
                email: "m@x.com".into(),
            },
            "wrong-secret",
            1,
        )
        .unwrap();
        let req = test::TestRequest::get()
            .uri("/api/session")
            .cookie(Cookie::new(SESSION_COOKIE, forged))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_logout_expires_cookies() {
        let app = init_app!();
        let resp = call_post!(app, "/api/logout", serde_json::json!({}));

        assert_eq!(resp.status(), StatusCode::OK);
        let mut names: Vec<String> = resp.response().cookies().map(|c| c.name().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["email", "session", "username"]);
        assert!(resp
            .response()
            .cookies()
            .all(|c| c.max_age() == Some(CookieDuration::ZERO)));
    }

    #[actix_web::test]
    async fn test_providers_and_user_check_hide_passwords() {
        let app = init_app!();
        call_post!(
            app,
            "/register-user",
            serde_json::json!({ "userName": "Asha", "email": "a@x.com", "password": "secret1" })
        );

        let body = body_json(call_get!(app, "/providers")).await;
        assert_eq!(body["providers"].as_array().map(|p| p.len()), Some(1));
        assert!(body["providers"][0].get("password").is_none());

        let body = body_json(call_get!(app, "/users/A@x.com")).await;
        assert_eq!(body["exists"], true);
        assert!(body["users"][0].get("password").is_none());

        let body = body_json(call_get!(app, "/users/b@x.com")).await;
        assert_eq!(body["exists"], false);
    }
}
