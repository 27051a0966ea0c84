pub mod auth_service;
pub mod geo_service;
pub mod profile_service;

pub use geo_service::GeoLocator;
