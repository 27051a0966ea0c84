use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::serde_helpers::{lenient_i64, lenient_string};

/// Document in the "providersInfo" collection: a provider's public listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub email: String,
    pub user_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mobile_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub years_of_experience: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub hourly_rate: Option<i64>,
    pub service: String,
    pub location: String,
}

impl Profile {
    pub fn years_of_experience(&self) -> i64 {
        self.years_of_experience.unwrap_or(0)
    }

    pub fn hourly_rate(&self) -> i64 {
        self.hourly_rate.unwrap_or(0)
    }
}

/// Body of create-profile and edit-profile. Only `email` differs between the
/// two: edit takes it from the path.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub email: Option<String>,
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(value_type = Option<String>)]
    pub mobile_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    #[schema(value_type = Option<i64>)]
    pub years_of_experience: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    #[schema(value_type = Option<i64>)]
    pub hourly_rate: Option<i64>,
    pub service: Option<String>,
    pub location: Option<String>,
}

/// Full overwrite applied by edit-profile. `mobileNumber` is written even
/// when absent so the stored value is cleared.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    pub user_name: String,
    pub mobile_number: Option<String>,
    pub years_of_experience: i64,
    pub hourly_rate: i64,
    pub service: String,
    pub location: String,
}

impl ProfileChanges {
    pub fn apply_to(&self, profile: &mut Profile) {
        profile.user_name = self.user_name.clone();
        profile.mobile_number = self.mobile_number.clone();
        profile.years_of_experience = Some(self.years_of_experience);
        profile.hourly_rate = Some(self.hourly_rate);
        profile.service = self.service.clone();
        profile.location = self.location.clone();
    }
}

/// Profile as returned by the API (`_id` rendered as hex)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub email: String,
    pub user_name: String,
    pub mobile_number: Option<String>,
    pub years_of_experience: i64,
    pub hourly_rate: i64,
    pub service: String,
    pub location: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let years_of_experience = profile.years_of_experience();
        let hourly_rate = profile.hourly_rate();
        Self {
            id: profile.id.map(|id| id.to_hex()),
            email: profile.email,
            user_name: profile.user_name,
            mobile_number: profile.mobile_number,
            years_of_experience,
            hourly_rate,
            service: profile.service,
            location: profile.location,
        }
    }
}

pub fn to_responses(profiles: Vec<Profile>) -> Vec<ProfileResponse> {
    profiles.into_iter().map(ProfileResponse::from).collect()
}
