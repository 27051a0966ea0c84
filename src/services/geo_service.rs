use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::utils::AppError;

/// Shape of an ipapi.co style answer. On failure the service replies 200
/// with `error: true` and a `reason`.
#[derive(Debug, Deserialize)]
pub struct IpLookupResponse {
    pub city: Option<String>,
    #[serde(default)]
    pub error: bool,
    pub reason: Option<String>,
}

/// IP-geocoding client used to prefill a provider's city.
#[derive(Clone)]
pub struct GeoLocator {
    client: reqwest::Client,
    base_url: String,
}

impl GeoLocator {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Public addresses are looked up explicitly; for anything else the
    /// service resolves the address the request arrives from.
    pub fn lookup_url(&self, ip: Option<IpAddr>) -> String {
        match ip.filter(is_public) {
            Some(ip) => format!(
                "{}/{}/json/",
                self.base_url,
                urlencoding::encode(&ip.to_string())
            ),
            None => format!("{}/json/", self.base_url),
        }
    }

    pub async fn city_for(&self, ip: Option<IpAddr>) -> Result<String, AppError> {
        let url = self.lookup_url(ip);
        log::info!("🌍 Looking up city: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to reach geolocation API: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Geolocation API error: {}",
                response.status()
            )));
        }

        let payload: IpLookupResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse geolocation response: {}", e)))?;

        city_from_response(payload)
    }
}

pub fn city_from_response(payload: IpLookupResponse) -> Result<String, AppError> {
    if payload.error {
        return Err(AppError::ExternalService(format!(
            "Geolocation API refused lookup: {}",
            payload.reason.unwrap_or_else(|| "unknown reason".to_string())
        )));
    }

    payload
        .city
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::NotFound("City could not be determined".to_string()))
}

/// Accepts a bare address or `address:port`.
pub fn parse_client_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}

fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified())
        }
        IpAddr::V6(v6) => !(v6.is_loopback() || v6.is_unspecified()),
    }
}
