//! User profile models: the Web API payload and the cached projection.

use serde::Deserialize;

/// User profile as the Web API returns it (the subset we consume).
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    /// Display name (may be null for accounts that never set one)
    #[serde(default)]
    pub display_name: Option<String>,
    /// Web API endpoint for this user
    pub href: String,
    /// Spotify user ID
    pub id: String,
    /// Profile images, largest first; often empty
    #[serde(default)]
    pub images: Vec<Image>,
}

/// An image entry as Spotify returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

/// Profile projection kept in the cache and served to the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub id: String,
    pub display_name: String,
    pub profile_url: String,
    /// First profile image, if the account has any
    pub image_url: Option<String>,
}

impl From<UserProfile> for StoredUser {
    fn from(profile: UserProfile) -> Self {
        Self {
            display_name: profile
                .display_name
                .unwrap_or_else(|| profile.id.clone()),
            profile_url: profile.href,
            image_url: profile.images.into_iter().next().map(|image| image.url),
            id: profile.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_profile_payload() {
        let json = r#"{
            "display_name": "Roland",
            "href": "https://api.spotify.com/v1/users/roland",
            "id": "roland",
            "images": [{"url": "https://i.scdn.co/image/abc", "height": 300, "width": 300}],
            "country": "US",
            "product": "premium"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        let user = StoredUser::from(profile);

        assert_eq!(user.id, "roland");
        assert_eq!(user.display_name, "Roland");
        assert_eq!(user.profile_url, "https://api.spotify.com/v1/users/roland");
        assert_eq!(user.image_url.as_deref(), Some("https://i.scdn.co/image/abc"));
    }

    #[test]
    fn missing_images_leave_image_url_empty() {
        let json = r#"{"display_name": "Roland", "href": "h", "id": "roland", "images": []}"#;
        let user = StoredUser::from(serde_json::from_str::<UserProfile>(json).unwrap());
        assert_eq!(user.image_url, None);

        // The images key can be absent outright.
        let json = r#"{"display_name": "Roland", "href": "h", "id": "roland"}"#;
        let user = StoredUser::from(serde_json::from_str::<UserProfile>(json).unwrap());
        assert_eq!(user.image_url, None);
    }

    #[test]
    fn null_display_name_falls_back_to_id() {
        let json = r#"{"display_name": null, "href": "h", "id": "roland"}"#;
        let user = StoredUser::from(serde_json::from_str::<UserProfile>(json).unwrap());
        assert_eq!(user.display_name, "roland");
    }
}
