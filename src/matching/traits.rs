use crate::record::SellerProfileRecord;

pub const SAME_CATEGORY_TRAIT: &str = "Same category speciality";
pub const FALLBACK_TRAIT: &str = "Active campus seller";

/// Short human-readable reasons a seller fits a request.
pub fn shared_traits(profile: &SellerProfileRecord, category_match: bool) -> Vec<String> {
    let mut traits = Vec::new();

    if category_match {
        traits.push(SAME_CATEGORY_TRAIT.to_string());
    }
    if let Some(major) = profile.inferred_major().filter(|m| !m.trim().is_empty()) {
        traits.push(format!("{major} major"));
    }
    if let Some(place) = first_location(profile) {
        traits.push(format!("Near {place}"));
    }
    if traits.is_empty() {
        traits.push(FALLBACK_TRAIT.to_string());
    }

    traits
}

/// The first location keyword, unless it is blank.
pub fn first_location(profile: &SellerProfileRecord) -> Option<&str> {
    profile
        .inferred_location_keywords()
        .first()
        .map(String::as_str)
        .filter(|place| !place.trim().is_empty())
}
