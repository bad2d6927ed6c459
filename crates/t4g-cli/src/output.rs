//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use serde::Serialize;
use t4g_api_models::{
    ActivityAction, ActivityResource, Challenge, ChallengeStatus, DashboardAnalytics, DeleteAck, Gift,
    TenantProfile,
};
use t4g_gateway::SessionSnapshot;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_session(snapshot: &SessionSnapshot, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(snapshot)?,
        OutputFormat::Table => {
            println!("status: {:?}", snapshot.status());
            if let Some(identity) = snapshot.identity() {
                println!("user: {} ({})", identity.display_name, identity.id);
                if let Some(email) = &identity.email {
                    println!("email: {email}");
                }
            }
            if let Some(business) = snapshot.business_name() {
                println!("business: {business}");
            }
            if let Some(tenant) = snapshot.tenant_id() {
                println!("tenant: {tenant}");
            }
            if let Some(role) = snapshot.tenant_role() {
                println!("role: {}", role.display_label());
            }
            if let Some(error) = snapshot.last_error() {
                println!("last error: {error}");
            }
        }
    }
    Ok(())
}

pub(crate) fn render_profile(profile: &TenantProfile, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(profile)?,
        OutputFormat::Table => {
            println!("id: {}", profile.id);
            println!("business: {}", profile.business_name);
            if let Some(email) = &profile.contact_email {
                println!("contact: {email}");
            }
            if let Some(total) = profile.total_gifts {
                println!("gifts: {total}");
            }
            if let Some(won) = profile.challenges_won {
                println!("challenges won: {won}");
            }
            if let Some(revenue) = profile.total_revenue {
                println!("revenue: {}", format_money(revenue));
            }
            if let Some(rating) = profile.rating {
                println!("rating: {rating:.1}");
            }
        }
    }
    Ok(())
}

pub(crate) fn render_analytics(
    analytics: &DashboardAnalytics,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(analytics)?,
        OutputFormat::Table => {
            println!(
                "gifts: {}  challenges: {}  active users: {}",
                analytics.total_gifts, analytics.total_challenges, analytics.active_users
            );
            if !analytics.recent_activity.is_empty() {
                println!("{:<20} {:<10} {:<10} NAME", "WHEN", "RESOURCE", "ACTION");
                for entry in &analytics.recent_activity {
                    println!(
                        "{:<20} {:<10} {:<10} {}",
                        entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        resource_to_str(entry.resource),
                        action_to_str(entry.action),
                        entry.name
                    );
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn render_gifts(gifts: &[Gift], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(gifts)?,
        OutputFormat::Table => {
            println!("{:<12} {:>10} {:<12} {:<8} NAME", "ID", "VALUE", "CATEGORY", "ACTIVE");
            for gift in gifts {
                println!(
                    "{:<12} {:>10} {:<12} {:<8} {}",
                    gift.id,
                    format_money(gift.value),
                    gift.category,
                    if gift.is_active { "yes" } else { "no" },
                    gift.name
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn render_gift(gift: &Gift, format: OutputFormat) -> CliResult<()> {
    render_gifts(std::slice::from_ref(gift), format)
}

pub(crate) fn render_challenges(challenges: &[Challenge], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(challenges)?,
        OutputFormat::Table => {
            println!(
                "{:<12} {:<10} {:>6} {:>6} {:<8} TITLE",
                "ID", "STATUS", "USERS", "PROG", "REWARD"
            );
            for challenge in challenges {
                println!(
                    "{:<12} {:<10} {:>6} {:>5}% {:<8} {}",
                    challenge.id,
                    status_to_str(challenge.status),
                    challenge.participants,
                    challenge.progress,
                    challenge.reward.as_deref().unwrap_or("-"),
                    challenge.title
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn render_challenge(challenge: &Challenge, format: OutputFormat) -> CliResult<()> {
    render_challenges(std::slice::from_ref(challenge), format)
}

pub(crate) fn render_delete(what: &str, ack: DeleteAck, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&ack)?,
        OutputFormat::Table if ack.success => println!("{what} deleted."),
        OutputFormat::Table => println!("{what} was not deleted by the server."),
    }
    Ok(())
}

pub(crate) fn format_money(value: f64) -> String {
    format!("${value:.2}")
}

pub(crate) const fn status_to_str(status: ChallengeStatus) -> &'static str {
    match status {
        ChallengeStatus::Draft => "draft",
        ChallengeStatus::Active => "active",
        ChallengeStatus::Completed => "completed",
    }
}

const fn resource_to_str(resource: ActivityResource) -> &'static str {
    match resource {
        ActivityResource::Gift => "gift",
        ActivityResource::Challenge => "challenge",
        ActivityResource::Profile => "profile",
    }
}

const fn action_to_str(action: ActivityAction) -> &'static str {
    match action {
        ActivityAction::Created => "created",
        ActivityAction::Updated => "updated",
        ActivityAction::Deleted => "deleted",
        ActivityAction::Completed => "completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_two_decimals() {
        assert_eq!(format_money(99.99), "$99.99");
        assert_eq!(format_money(5.0), "$5.00");
    }

    #[test]
    fn renderers_accept_placeholder_data() {
        let gifts = t4g_gateway::placeholder_gifts();
        render_gifts(&gifts, OutputFormat::Table).expect("table render");
        render_gifts(&gifts, OutputFormat::Json).expect("json render");
        let challenges = t4g_gateway::placeholder_challenges();
        render_challenges(&challenges, OutputFormat::Table).expect("table render");
        assert_eq!(status_to_str(challenges[1].status), "completed");
    }
}
