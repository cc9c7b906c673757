/// Attribute mapping
///
/// Converts a raw, sparse directory attribute set into a canonical
/// [`UserProfile`], or `NotFound` when the record carries no usable identity.
use crate::directory::AttributeSet;
use crate::profile::{Resolution, UserProfile};

/// Map a raw attribute set into a profile.
///
/// The identity comes from the first of `uid`, `sAMAccountName`, `cn` (in
/// that precedence order); the chosen value becomes both the subject and the
/// preferred username. With none of the three present the record is unusable
/// regardless of other attributes, and mapping yields `NotFound`.
pub fn map_attributes(attrs: &AttributeSet) -> Resolution {
    let identity = attrs
        .get("uid")
        .or_else(|| attrs.get("sAMAccountName"))
        .or_else(|| attrs.get("cn"));

    let Some(identity) = identity else {
        return Resolution::NotFound;
    };

    let mut profile = UserProfile::new(identity);

    if let Some(mail) = attrs.get("mail") {
        profile.email = Some(mail.to_string());
        // The directory gives no ownership proof for this address; a
        // deployment with out-of-band proof must override downstream.
        profile.email_verified = Some(false);
    }

    if let Some(phone) = attrs.get("telephoneNumber") {
        profile.phone_number = Some(phone.to_string());
        profile.phone_number_verified = Some(false);
    }

    if let Some(name) = attrs.get("displayName") {
        profile.name = Some(name.to_string());
    }

    if let Some(given) = attrs.get("givenName") {
        profile.given_name = Some(given.to_string());
    }

    if let Some(family) = attrs.get("sn") {
        profile.family_name = Some(family.to_string());
    }

    if let Some(middle) = attrs.get("initials") {
        profile.middle_name = Some(middle.to_string());
    }

    if let Some(uri) = attrs.get("labeledURI") {
        profile.profile = Some(uri.to_string());
    }

    if let Some(website) = attrs.get("organizationName") {
        profile.website = Some(website.to_string());
    }

    Resolution::Found(profile)
}
