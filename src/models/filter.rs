use serde::Deserialize;

use crate::models::Profile;
use crate::utils::serde_helpers::{lenient_i64, lenient_string};
use crate::utils::validation::{contains_ignore_case, eq_ignore_case};

/// Server-side listing filter, translated into a MongoDB query by the
/// Mongo store and evaluated in memory by the memory store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileQuery {
    /// Case-insensitive exact match
    pub service: Option<String>,
    /// Case-insensitive substring match
    pub location: Option<String>,
}

impl ProfileQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_location(location: &str) -> Self {
        Self {
            service: None,
            location: Some(location.to_string()),
        }
    }

    pub fn matches(&self, profile: &Profile) -> bool {
        if let Some(service) = &self.service {
            if !eq_ignore_case(&profile.service, service) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ignore_case(&profile.location, location) {
                return false;
            }
        }
        true
    }
}

/// Query string of `/get-filtered-providers`
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilteredProvidersQuery {
    pub service: Option<String>,
    pub location: Option<String>,
}

/// Browse filter used by the provider dashboard: every control is optional
/// and blank controls do not filter.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProviderFilter {
    #[serde(default, deserialize_with = "lenient_string")]
    #[param(value_type = Option<String>)]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[param(value_type = Option<String>)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>)]
    pub min_experience: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>)]
    pub max_hourly_rate: Option<i64>,
}

impl ProviderFilter {
    pub fn matches(&self, profile: &Profile) -> bool {
        if let Some(service) = &self.service {
            if !eq_ignore_case(&profile.service, service) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ignore_case(&profile.location, location) {
                return false;
            }
        }
        if let Some(min) = self.min_experience {
            if profile.years_of_experience() < min {
                return false;
            }
        }
        if let Some(max) = self.max_hourly_rate {
            if profile.hourly_rate() > max {
                return false;
            }
        }
        true
    }

    /// Single linear pass, preserving input order.
    pub fn apply(&self, profiles: Vec<Profile>) -> Vec<Profile> {
        profiles.into_iter().filter(|p| self.matches(p)).collect()
    }
}
