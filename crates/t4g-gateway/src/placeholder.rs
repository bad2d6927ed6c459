//! Demo records shown when a resource call fails for non-authorization reasons.
//!
//! Never substituted for `Forbidden` or `Unauthenticated` outcomes.

use t4g_api_models::{Challenge, ChallengeStatus, Gift, ResourceId};

const PLACEHOLDER_ORG: &str = "org-1";
const PLACEHOLDER_CREATOR: &str = "admin";

/// Sample gift catalogue.
#[must_use]
pub fn placeholder_gifts() -> Vec<Gift> {
    [
        (1_u64, "Premium Gift Package", "Exclusive collection of premium items", 99.99, "Premium", "🎁"),
        (2, "Starter Bundle", "Perfect for beginners", 29.99, "Starter", "📦"),
        (3, "Holiday Special", "Limited time holiday offering", 149.99, "Special", "🎄"),
    ]
    .into_iter()
    .map(|(id, name, description, value, category, glyph)| Gift {
        id: ResourceId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        value,
        category: category.to_string(),
        image_url: Some(glyph.to_string()),
        is_active: true,
        created_by: Some(PLACEHOLDER_CREATOR.to_string()),
        created_at: None,
        updated_at: None,
        organization_id: Some(PLACEHOLDER_ORG.to_string()),
    })
    .collect()
}

/// Sample challenge board.
#[must_use]
pub fn placeholder_challenges() -> Vec<Challenge> {
    [
        (1_u64, "Summer Sales Sprint", "Achieve 100 sales in 30 days", ChallengeStatus::Active, 45, "$500", 67),
        (2, "Customer Satisfaction", "Maintain 4.8+ rating for a month", ChallengeStatus::Completed, 23, "$300", 100),
        (3, "New User Acquisition", "Bring 50 new users to the platform", ChallengeStatus::Active, 67, "$750", 34),
    ]
    .into_iter()
    .map(
        |(id, title, description, status, participants, reward, progress)| Challenge {
            id: ResourceId::from(id),
            title: title.to_string(),
            description: description.to_string(),
            status,
            participants,
            reward: Some(reward.to_string()),
            progress,
            ends_at: None,
        },
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_distinct_and_active() {
        let gifts = placeholder_gifts();
        assert_eq!(gifts.len(), 3);
        assert!(gifts.iter().all(|gift| gift.is_active));
        let challenges = placeholder_challenges();
        assert_eq!(challenges.len(), 3);
        assert!(challenges.iter().all(|challenge| challenge.progress <= 100));
        assert_eq!(challenges[1].status, ChallengeStatus::Completed);
    }
}
