#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the T4G tenant API.
//!
//! These types are used by the gateway for request/response encoding so the
//! contract with the remote API lives in one place. Field names follow the
//! API's camelCase JSON convention.

pub mod id;

pub use id::{InvalidResourceId, ResourceId};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// RFC 9457 problem document returned by the resource API on failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    #[serde(rename = "type", default)]
    /// Problem type URI (`about:blank` when unset).
    pub kind: String,
    /// Summary of the problem.
    pub title: String,
    /// Status code the server attached.
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Occurrence-specific explanation.
    pub detail: Option<String>,
}

/// Business account profile returned by `GET /tenants/profile`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfile {
    /// Tenant identifier.
    pub id: ResourceId,
    /// Registered business name.
    pub business_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Contact address for the business.
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Number of gifts the tenant has created.
    pub total_gifts: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Number of challenges the tenant has won.
    pub challenges_won: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Lifetime revenue in the tenant's currency.
    pub total_revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Average user rating (0-5).
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Last profile modification.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial profile update accepted by `PUT /tenants/profile`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// New business name.
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// New contact address.
    pub contact_email: Option<String>,
}

/// Aggregate counters plus the recent activity feed for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    /// Gifts owned by the tenant.
    pub total_gifts: u64,
    /// Challenges owned by the tenant.
    pub total_challenges: u64,
    /// Users active in the current period.
    pub active_users: u64,
    #[serde(default)]
    /// Most recent first.
    pub recent_activity: Vec<ActivityEntry>,
}

impl DashboardAnalytics {
    /// Whether the activity feed is ordered newest first.
    #[must_use]
    pub fn is_reverse_chronological(&self) -> bool {
        self.recent_activity
            .windows(2)
            .all(|pair| pair[0].timestamp >= pair[1].timestamp)
    }

    /// Re-sort the activity feed newest first. Stable for equal timestamps.
    pub fn sort_recent_activity(&mut self) {
        self.recent_activity
            .sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
    }
}

/// Single entry in the dashboard activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    /// Identifier of the activity record.
    pub id: ResourceId,
    /// Kind of resource the activity concerns.
    pub resource: ActivityResource,
    /// What happened to the resource.
    pub action: ActivityAction,
    /// Display name of the affected resource.
    pub name: String,
    /// When the activity happened.
    pub timestamp: DateTime<Utc>,
}

/// Resource kinds that appear in the activity feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityResource {
    /// Gift resource.
    Gift,
    /// Challenge resource.
    Challenge,
    /// Tenant profile.
    Profile,
}

/// Actions recorded in the activity feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// Resource was created.
    Created,
    /// Resource was modified.
    Updated,
    /// Resource was removed.
    Deleted,
    /// Challenge was completed by a participant.
    Completed,
}

/// Gift resource managed by a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    /// Gift identifier.
    pub id: ResourceId,
    /// Display name.
    pub name: String,
    #[serde(default)]
    /// Longer description.
    pub description: String,
    /// Monetary value.
    pub value: f64,
    #[serde(default)]
    /// Catalogue category.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Image URL or glyph.
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    /// Whether the gift is offered.
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Creator reference.
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Owning organisation.
    pub organization_id: Option<String>,
}

/// Partial gift payload for create/update. The server validates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GiftDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Display name.
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Longer description.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Monetary value.
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Catalogue category.
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Image URL or glyph.
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Whether the gift is offered.
    pub is_active: Option<bool>,
}

/// Lifecycle of a challenge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    /// Not yet published.
    Draft,
    /// Accepting participants.
    Active,
    /// Finished.
    Completed,
}

/// Challenge resource managed by a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    /// Challenge identifier.
    pub id: ResourceId,
    /// Display title.
    pub title: String,
    #[serde(default)]
    /// Goal description.
    pub description: String,
    /// Current lifecycle state.
    pub status: ChallengeStatus,
    #[serde(default)]
    /// Number of participants.
    pub participants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Reward label (e.g. "$500").
    pub reward: Option<String>,
    #[serde(default)]
    /// Completion percentage (0-100).
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Deadline.
    pub ends_at: Option<DateTime<Utc>>,
}

/// Partial challenge payload for create/update. The server validates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Display title.
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Goal description.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Lifecycle state.
    pub status: Option<ChallengeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Reward label.
    pub reward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Deadline.
    pub ends_at: Option<DateTime<Utc>>,
}

/// Acknowledgement body returned by delete endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAck {
    /// Whether the server removed the resource.
    pub success: bool,
}

impl Default for DeleteAck {
    fn default() -> Self {
        Self { success: true }
    }
}

const fn default_true() -> bool {
    true
}
