/// User profile data model
///
/// Canonical record produced by mapping directory attributes. Field names
/// line up with the OIDC standard claims served by the embedding identity
/// provider.
use serde::{Deserialize, Serialize};

/// Normalized user profile resolved from the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub sub: String,
    pub preferred_username: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub phone_number: Option<String>,
    pub phone_number_verified: Option<bool>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub middle_name: Option<String>,
    pub profile: Option<String>,
    pub website: Option<String>,
}

impl UserProfile {
    /// Create a profile whose subject and preferred username both come from
    /// the same identity attribute. A profile never exists with only one of
    /// the two set.
    pub fn new(identity: &str) -> Self {
        Self {
            sub: identity.to_string(),
            preferred_username: identity.to_string(),
            email: None,
            email_verified: None,
            phone_number: None,
            phone_number_verified: None,
            name: None,
            given_name: None,
            family_name: None,
            middle_name: None,
            profile: None,
            website: None,
        }
    }
}

/// Outcome of resolving a username against the directory
///
/// `NotFound` is a normal, cacheable outcome (negative caching). Transient
/// directory failures are errors, not resolutions, and are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(UserProfile),
    NotFound,
}

impl Resolution {
    /// Collapse to the shape exposed by the public lookup surface.
    pub fn into_profile(self) -> Option<UserProfile> {
        match self {
            Resolution::Found(profile) => Some(profile),
            Resolution::NotFound => None,
        }
    }
}
