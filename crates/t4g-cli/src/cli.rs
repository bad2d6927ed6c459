//! Argument parsing and command dispatch.

use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use reqwest::Url;
use t4g_api_models::{ChallengeDraft, ChallengeStatus, GiftDraft, ResourceId, TenantProfilePatch};
use t4g_config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, ENV_LOG_LEVEL, LogSettings};
use t4g_gateway::PageRequirement;
use t4g_telemetry::{LogFormat, LogOutput, LoggingConfig, init_logging};

use crate::client::{AppContext, CliResult, parse_resource_id, parse_url};
use crate::commands::{challenges, gifts, session, tenant};
use crate::credentials::StaticCredentialSource;

const CLI_LOG_LEVEL: &str = "warn";

/// Parses CLI arguments, executes the requested command, and reports errors.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    init_cli_logging();
    let command_name = command_label(&cli.command);

    match dispatch(cli).await {
        Ok(()) => {
            tracing::debug!(command = command_name, "command finished");
            0
        }
        Err(err) => {
            let message = err.to_string();
            tracing::debug!(command = command_name, error = %message, "command failed");
            eprintln!("error: {message}");
            err.exit_code()
        }
    }
}

fn init_cli_logging() {
    let lookup = |name: &str| {
        std::env::var(name)
            .ok()
            .or_else(|| (name == ENV_LOG_LEVEL).then(|| CLI_LOG_LEVEL.to_string()))
    };
    let settings = LogSettings::from_lookup(lookup).unwrap_or_else(|err| {
        eprintln!("warning: {err}; using default logging");
        LogSettings {
            level: CLI_LOG_LEVEL.to_string(),
            format: LogFormat::Pretty,
        }
    });
    let config = LoggingConfig {
        level: &settings.level,
        format: settings.format,
        build_sha: option_env!("T4G_BUILD_SHA").unwrap_or("dev"),
        output: LogOutput::Stderr,
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: failed to initialise logging: {err}");
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let Cli {
        api_url,
        timeout,
        access_token,
        id_token,
        output,
        command,
    } = cli;
    let source = StaticCredentialSource::from_tokens(access_token, id_token)?;
    let ctx = AppContext::connect(api_url, Duration::from_secs(timeout), source).await?;

    match command {
        Command::Status(args) => session::handle_status(&ctx, args.require.map(Into::into), output),
        Command::Login => session::handle_login(&ctx).await,
        Command::Callback(args) => session::handle_callback(&ctx, &args.url, output).await,
        Command::Logout(args) => session::handle_logout(&ctx, args.return_to).await,
        Command::Profile(profile) => match profile {
            ProfileCommand::Show => tenant::handle_profile_show(&ctx, output).await,
            ProfileCommand::Update(args) => {
                tenant::handle_profile_update(&ctx, args.into(), output).await
            }
        },
        Command::Analytics => tenant::handle_analytics(&ctx, output).await,
        Command::Gifts(gift) => match gift {
            GiftCommand::List(args) => gifts::handle_list(&ctx, args.placeholder, output).await,
            GiftCommand::Create(args) => gifts::handle_create(&ctx, args.into(), output).await,
            GiftCommand::Update(args) => {
                gifts::handle_update(&ctx, &args.id, args.fields.into(), output).await
            }
            GiftCommand::Delete(args) => gifts::handle_delete(&ctx, &args.id, output).await,
        },
        Command::Challenges(challenge) => match challenge {
            ChallengeCommand::List(args) => {
                challenges::handle_list(&ctx, args.placeholder, output).await
            }
            ChallengeCommand::Create(args) => {
                challenges::handle_create(&ctx, args.into(), output).await
            }
            ChallengeCommand::Update(args) => {
                challenges::handle_update(&ctx, &args.id, args.fields.into(), output).await
            }
            ChallengeCommand::Delete(args) => {
                challenges::handle_delete(&ctx, &args.id, output).await
            }
        },
    }
}

#[derive(Parser)]
#[command(name = "t4g", about = "Tenant dashboard gateway CLI")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "T4G_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "T4G_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(long, global = true, env = "T4G_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
    #[arg(long, global = true, env = "T4G_ID_TOKEN", hide_env_values = true)]
    id_token: Option<String>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Show the session and optionally check a page requirement.
    Status(StatusArgs),
    /// Print the provider login URL.
    Login,
    /// Finish a login from the provider callback URL.
    Callback(CallbackArgs),
    /// End the session and print the provider logout URL.
    Logout(LogoutArgs),
    /// Tenant business profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Dashboard counters and recent activity.
    Analytics,
    /// Gift catalogue.
    #[command(subcommand)]
    Gifts(GiftCommand),
    /// Challenge board.
    #[command(subcommand)]
    Challenges(ChallengeCommand),
}

#[derive(Args)]
pub(crate) struct StatusArgs {
    #[arg(long, value_enum, help = "Exit with status 2 unless this requirement is met")]
    pub(crate) require: Option<RequirementArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum RequirementArg {
    Public,
    Auth,
    Admin,
}

impl From<RequirementArg> for PageRequirement {
    fn from(value: RequirementArg) -> Self {
        match value {
            RequirementArg::Public => Self::Public,
            RequirementArg::Auth => Self::RequireAuth,
            RequirementArg::Admin => Self::RequireAdmin,
        }
    }
}

#[derive(Args)]
pub(crate) struct CallbackArgs {
    #[arg(help = "Callback URL the provider redirected to", value_parser = parse_url)]
    pub(crate) url: Url,
}

#[derive(Args)]
pub(crate) struct LogoutArgs {
    #[arg(long, value_parser = parse_url, help = "Where the provider should send the browser")]
    pub(crate) return_to: Option<Url>,
}

#[derive(Subcommand)]
pub(crate) enum ProfileCommand {
    Show,
    Update(ProfileUpdateArgs),
}

#[derive(Args)]
pub(crate) struct ProfileUpdateArgs {
    #[arg(long)]
    business_name: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
}

impl From<ProfileUpdateArgs> for TenantProfilePatch {
    fn from(args: ProfileUpdateArgs) -> Self {
        Self {
            business_name: args.business_name,
            contact_email: args.contact_email,
        }
    }
}

#[derive(Args, Default)]
pub(crate) struct ListArgs {
    #[arg(long, help = "Show sample data when the API cannot be reached")]
    pub(crate) placeholder: bool,
}

#[derive(Args)]
pub(crate) struct DeleteArgs {
    #[arg(help = "Resource identifier", value_parser = parse_resource_id)]
    pub(crate) id: ResourceId,
}

#[derive(Subcommand)]
pub(crate) enum GiftCommand {
    List(ListArgs),
    Create(GiftFields),
    Update(GiftUpdateArgs),
    Delete(DeleteArgs),
}

#[derive(Args, Default)]
pub(crate) struct GiftFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    value: Option<f64>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    active: Option<bool>,
}

impl From<GiftFields> for GiftDraft {
    fn from(fields: GiftFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            value: fields.value,
            category: fields.category,
            image_url: fields.image_url,
            is_active: fields.active,
        }
    }
}

#[derive(Args)]
pub(crate) struct GiftUpdateArgs {
    #[arg(help = "Gift identifier", value_parser = parse_resource_id)]
    pub(crate) id: ResourceId,
    #[command(flatten)]
    pub(crate) fields: GiftFields,
}

#[derive(Subcommand)]
pub(crate) enum ChallengeCommand {
    List(ListArgs),
    Create(ChallengeFields),
    Update(ChallengeUpdateArgs),
    Delete(DeleteArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum ChallengeStatusArg {
    Draft,
    Active,
    Completed,
}

impl From<ChallengeStatusArg> for ChallengeStatus {
    fn from(value: ChallengeStatusArg) -> Self {
        match value {
            ChallengeStatusArg::Draft => Self::Draft,
            ChallengeStatusArg::Active => Self::Active,
            ChallengeStatusArg::Completed => Self::Completed,
        }
    }
}

#[derive(Args, Default)]
pub(crate) struct ChallengeFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_enum)]
    status: Option<ChallengeStatusArg>,
    #[arg(long)]
    reward: Option<String>,
    #[arg(long, help = "Deadline as an RFC 3339 timestamp")]
    ends_at: Option<DateTime<Utc>>,
}

impl From<ChallengeFields> for ChallengeDraft {
    fn from(fields: ChallengeFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            status: fields.status.map(Into::into),
            reward: fields.reward,
            ends_at: fields.ends_at,
        }
    }
}

#[derive(Args)]
pub(crate) struct ChallengeUpdateArgs {
    #[arg(help = "Challenge identifier", value_parser = parse_resource_id)]
    pub(crate) id: ResourceId,
    #[command(flatten)]
    pub(crate) fields: ChallengeFields,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Status(_) => "status",
        Command::Login => "login",
        Command::Callback(_) => "callback",
        Command::Logout(_) => "logout",
        Command::Profile(ProfileCommand::Show) => "profile_show",
        Command::Profile(ProfileCommand::Update(_)) => "profile_update",
        Command::Analytics => "analytics",
        Command::Gifts(GiftCommand::List(_)) => "gifts_list",
        Command::Gifts(GiftCommand::Create(_)) => "gifts_create",
        Command::Gifts(GiftCommand::Update(_)) => "gifts_update",
        Command::Gifts(GiftCommand::Delete(_)) => "gifts_delete",
        Command::Challenges(ChallengeCommand::List(_)) => "challenges_list",
        Command::Challenges(ChallengeCommand::Create(_)) => "challenges_create",
        Command::Challenges(ChallengeCommand::Update(_)) => "challenges_update",
        Command::Challenges(ChallengeCommand::Delete(_)) => "challenges_delete",
    }
}
