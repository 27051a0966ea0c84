use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::ProviderStore;
use crate::models::{Account, AccountSummary, LoginRequest, RegisterRequest};
use crate::utils::validation::{is_valid_email, non_blank, MIN_PASSWORD_LEN};
use crate::utils::AppError;

const SESSION_ISSUER: &str = "service-hunt";
const SESSION_AUDIENCE: &str = "service-hunt-web";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Checked against when the email is unknown, so both login failures pay
/// for one bcrypt verify.
const UNKNOWN_ACCOUNT_HASH: &str = "$2b$12$XKbRsnzSpDkAU/2sRPJ4ZOLyZqJ.DW3k0IQxeaMx27K19s561itHO";

/// Claims of the signed `session` cookie
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String, // email
    pub name: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

/// Hashing is CPU bound; keep it off the request threads.
async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::DatabaseError(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::DatabaseError(format!("Failed to hash password: {}", e)))
}

fn is_bcrypt_hash(stored: &str) -> bool {
    stored.len() == 60
        && (stored.starts_with("$2a$") || stored.starts_with("$2b$") || stored.starts_with("$2y$"))
}

/// Rows created before hashing was introduced still hold the plaintext
/// password and are compared directly.
async fn verify_password(supplied: String, stored: String) -> bool {
    if !is_bcrypt_hash(&stored) {
        return supplied == stored;
    }

    tokio::task::spawn_blocking(move || verify(supplied, &stored).unwrap_or(false))
        .await
        .unwrap_or(false)
}

fn stored_password_for(account: Option<&Account>) -> String {
    account
        .map(|a| a.password.clone())
        .unwrap_or_else(|| UNKNOWN_ACCOUNT_HASH.to_string())
}

// User registration
pub async fn register(
    store: &dyn ProviderStore,
    request: &RegisterRequest,
) -> Result<AccountSummary, AppError> {
    let (user_name, email, password) = match (
        non_blank(&request.user_name),
        non_blank(&request.email),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) {
        (Some(name), Some(email), Some(password)) => (name, email, password),
        _ => {
            return Err(AppError::InvalidRequest(
                "Missing required fields. Name, email and password are required.".to_string(),
            ))
        }
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }

    if !is_valid_email(email) {
        return Err(AppError::InvalidRequest("Invalid email format".to_string()));
    }

    // Not atomic: two concurrent registrations can both pass this check
    if store.find_account_by_email(email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let account = Account {
        id: None,
        user_name: user_name.to_string(),
        email: email.to_string(),
        password: hash_password(password.to_string()).await?,
        mobile: request.mobile.clone(),
        created_at: Some(Utc::now().timestamp()),
    };

    let account = store.insert_account(account).await?;
    log::info!("👤 User registered: {}", account.email);

    Ok(AccountSummary::from(&account))
}

// User login
pub async fn login(
    store: &dyn ProviderStore,
    request: &LoginRequest,
) -> Result<AccountSummary, AppError> {
    let (email, password) = match (
        non_blank(&request.email),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            return Err(AppError::InvalidRequest(
                "Email and password are required".to_string(),
            ))
        }
    };

    // Unknown account and wrong password look the same to the caller,
    // in body and in timing
    let account = store.find_account_by_email(email).await?;
    let stored = stored_password_for(account.as_ref());

    let verified = verify_password(password.to_string(), stored).await;
    match account {
        Some(account) if verified => Ok(AccountSummary::from(&account)),
        _ => Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string())),
    }
}

pub async fn list_accounts(store: &dyn ProviderStore) -> Result<Vec<AccountSummary>, AppError> {
    let accounts = store.list_accounts().await?;
    Ok(accounts.iter().map(AccountSummary::from).collect())
}

pub async fn find_users(
    store: &dyn ProviderStore,
    email: &str,
) -> Result<Vec<AccountSummary>, AppError> {
    let accounts = store.find_accounts_by_email(email.trim()).await?;
    Ok(accounts.iter().map(AccountSummary::from).collect())
}

// Generate session token
pub fn issue_session(
    user: &AccountSummary,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, AppError> {
    let now = Utc::now();

    let claims = SessionClaims {
        sub: user.email.clone(),
        name: user.user_name.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(ttl_hours)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: SESSION_AUDIENCE.to_string(),
        iss: SESSION_ISSUER.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| AppError::DatabaseError(format!("Failed to sign session: {}", e)))
}

// Verify session token
pub fn verify_session(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[SESSION_AUDIENCE]);
    validation.set_issuer(&[SESSION_ISSUER]);

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Session rejected: {}", e);
        AppError::Unauthorized("Invalid or expired session".to_string())
    })
}
