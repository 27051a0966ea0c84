use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::services::geo_service::{parse_client_ip, GeoLocator};

#[derive(Serialize, utoipa::ToSchema)]
pub struct LocateResponse {
    pub success: bool,
    pub city: String,
}

/// Best-effort city for the caller, used to prefill location fields.
#[utoipa::path(
    get,
    path = "/api/locate",
    tag = "Location",
    responses(
        (status = 200, description = "City resolved from the caller's IP", body = LocateResponse),
        (status = 404, description = "City could not be determined"),
        (status = 502, description = "Geolocation service failed")
    )
)]
pub async fn locate(req: HttpRequest, geo: web::Data<GeoLocator>) -> HttpResponse {
    let ip = {
        let info = req.connection_info();
        info.realip_remote_addr().and_then(parse_client_ip)
    };
    log::info!("🌍 GET /api/locate - client: {:?}", ip);

    match geo.city_for(ip).await {
        Ok(city) => HttpResponse::Ok().json(LocateResponse {
            success: true,
            city,
        }),
        Err(e) => {
            log::warn!("⚠️  Location lookup failed: {}", e);
            e.to_http_response("Failed to detect location")
        }
    }
}
