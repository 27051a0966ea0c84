use crate::database::ProviderStore;
use crate::models::{Profile, ProfileChanges, ProfileForm, ProfileQuery, ProviderFilter};
use crate::utils::validation::non_blank;
use crate::utils::AppError;

fn non_negative(value: Option<i64>, field: &str) -> Result<i64, AppError> {
    match value {
        Some(v) if v < 0 => Err(AppError::InvalidRequest(format!("{} cannot be negative", field))),
        Some(v) => Ok(v),
        None => Ok(0),
    }
}

/// Validates the fields shared by create and edit.
fn changes_from_form(form: &ProfileForm) -> Result<ProfileChanges, AppError> {
    let (user_name, service, location) = match (
        non_blank(&form.user_name),
        non_blank(&form.service),
        non_blank(&form.location),
    ) {
        (Some(user_name), Some(service), Some(location)) => (user_name, service, location),
        _ => return Err(AppError::InvalidRequest("Missing required fields".to_string())),
    };

    Ok(ProfileChanges {
        user_name: user_name.to_string(),
        mobile_number: form.mobile_number.clone(),
        years_of_experience: non_negative(form.years_of_experience, "yearsOfExperience")?,
        hourly_rate: non_negative(form.hourly_rate, "hourlyRate")?,
        service: service.to_string(),
        location: location.to_string(),
    })
}

pub async fn create_profile(
    store: &dyn ProviderStore,
    form: &ProfileForm,
) -> Result<Profile, AppError> {
    let email = non_blank(&form.email)
        .ok_or_else(|| AppError::InvalidRequest("Missing required fields".to_string()))?;
    let changes = changes_from_form(form)?;

    // Application-level check only, same race as registration
    if store.find_profile_by_email(email).await?.is_some() {
        return Err(AppError::Conflict(
            "Profile with this email already exists".to_string(),
        ));
    }

    let mut profile = Profile {
        id: None,
        email: email.to_string(),
        user_name: String::new(),
        mobile_number: None,
        years_of_experience: None,
        hourly_rate: None,
        service: String::new(),
        location: String::new(),
    };
    changes.apply_to(&mut profile);

    let profile = store.insert_profile(profile).await?;
    log::info!("📇 Profile created: {}", profile.email);

    Ok(profile)
}

pub async fn get_profile(store: &dyn ProviderStore, email: &str) -> Result<Profile, AppError> {
    store
        .find_profile_by_email(email.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// Overwrites every editable field of the profile keyed by `email`.
/// The email itself is never changed.
pub async fn edit_profile(
    store: &dyn ProviderStore,
    email: &str,
    form: &ProfileForm,
) -> Result<Profile, AppError> {
    let changes = changes_from_form(form)?;

    store
        .update_profile(email.trim(), &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found to update".to_string()))
}

pub async fn list_profiles(store: &dyn ProviderStore) -> Result<Vec<Profile>, AppError> {
    store.list_profiles(&ProfileQuery::all()).await
}

pub async fn profiles_by_location(
    store: &dyn ProviderStore,
    location: &str,
) -> Result<Vec<Profile>, AppError> {
    let location = location.trim();
    if location.is_empty() {
        return list_profiles(store).await;
    }
    store.list_profiles(&ProfileQuery::by_location(location)).await
}

pub async fn filtered_profiles(
    store: &dyn ProviderStore,
    service: &Option<String>,
    location: &Option<String>,
) -> Result<Vec<Profile>, AppError> {
    let query = ProfileQuery {
        service: non_blank(service).map(str::to_string),
        location: non_blank(location).map(str::to_string),
    };
    store.list_profiles(&query).await
}

/// Dashboard browsing: fetch the whole listing once, then filter in memory.
pub async fn browse(
    store: &dyn ProviderStore,
    filter: &ProviderFilter,
) -> Result<Vec<Profile>, AppError> {
    let profiles = list_profiles(store).await?;
    Ok(filter.apply(profiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn form(email: &str, service: &str, location: &str) -> ProfileForm {
        ProfileForm {
            email: Some(email.into()),
            user_name: Some("Asha".into()),
            mobile_number: Some("9876543210".into()),
            years_of_experience: Some(4),
            hourly_rate: Some(500),
            service: Some(service.into()),
            location: Some(location.into()),
        }
    }

    #[tokio::test]
    async fn test_created_profile_is_retrievable_unchanged() {
        let store = MemoryStore::new();
        let created = create_profile(&store, &form("a@x.com", "Plumber", "Pune"))
            .await
            .unwrap();

        let fetched = get_profile(&store, "a@x.com").await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.service, "Plumber");
        assert_eq!(fetched.location, "Pune");
        assert_eq!(fetched.years_of_experience(), 4);
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let store = MemoryStore::new();
        let mut incomplete = form("a@x.com", "Plumber", "Pune");
        incomplete.location = Some(" ".into());

        let err = create_profile(&store, &incomplete).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let mut no_email = form("a@x.com", "Plumber", "Pune");
        no_email.email = None;
        assert!(create_profile(&store, &no_email).await.is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_negative_numbers() {
        let store = MemoryStore::new();
        let mut negative = form("a@x.com", "Plumber", "Pune");
        negative.years_of_experience = Some(-1);

        let err = create_profile(&store, &negative).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_numbers_default_to_zero() {
        let store = MemoryStore::new();
        let mut sparse = form("a@x.com", "Plumber", "Pune");
        sparse.years_of_experience = None;
        sparse.hourly_rate = None;

        let profile = create_profile(&store, &sparse).await.unwrap();
        assert_eq!(profile.years_of_experience, Some(0));
        assert_eq!(profile.hourly_rate, Some(0));
    }

    #[tokio::test]
    async fn test_duplicate_profile_conflicts() {
        let store = MemoryStore::new();
        create_profile(&store, &form("a@x.com", "Plumber", "Pune"))
            .await
            .unwrap();

        let err = create_profile(&store, &form("A@x.com", "Chef", "Goa"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_edit_missing_profile_is_not_found() {
        let store = MemoryStore::new();
        let err = edit_profile(&store, "ghost@x.com", &form("", "Chef", "Goa"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(list_profiles(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_keeps_email_from_path() {
        let store = MemoryStore::new();
        create_profile(&store, &form("a@x.com", "Plumber", "Pune"))
            .await
            .unwrap();

        let updated = edit_profile(&store, "a@x.com", &form("evil@x.com", "Plumber", "Mumbai"))
            .await
            .unwrap();

        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.location, "Mumbai");
        assert!(get_profile(&store, "evil@x.com").await.is_err());
    }

    #[tokio::test]
    async fn test_filtered_profiles() {
        let store = MemoryStore::new();
        create_profile(&store, &form("a@x.com", "Plumber", "Pune")).await.unwrap();
        create_profile(&store, &form("b@x.com", "Electrician", "Pune")).await.unwrap();
        create_profile(&store, &form("c@x.com", "Plumber", "Navi Mumbai")).await.unwrap();

        let plumbers = filtered_profiles(&store, &Some("plumber".into()), &None)
            .await
            .unwrap();
        assert_eq!(plumbers.len(), 2);
        assert!(plumbers.iter().all(|p| p.service == "Plumber"));

        let in_mumbai = filtered_profiles(&store, &Some("Plumber".into()), &Some("mumbai".into()))
            .await
            .unwrap();
        assert_eq!(in_mumbai.len(), 1);
        assert_eq!(in_mumbai[0].email, "c@x.com");

        let everything = filtered_profiles(&store, &Some("".into()), &None).await.unwrap();
        assert_eq!(everything.len(), 3);

        let by_location = profiles_by_location(&store, "PUN").await.unwrap();
        assert_eq!(by_location.len(), 2);
    }
}
