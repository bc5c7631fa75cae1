use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use launch_calendar::auth::Authenticator;
use launch_calendar::config::{self, AuthSettings, CalendarSettings, ScheduleSource, SyncConfig};
use launch_calendar::schedule::SystemClock;
use launch_calendar::sync;

#[derive(Parser)]
#[command(name = "launch-calendar")]
#[command(about = "Publish the upcoming rocket launch schedule to Google Calendar")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: Options,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the schedule and publish it to a new calendar (default)
    Sync {
        /// Parse and log the launches without publishing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Fetch and parse the schedule, printing one JSON record per line
    Parse,
    /// Authorize with Google and store the token file
    Auth,
}

#[derive(Args)]
struct Options {
    /// Schedule page to scrape
    #[arg(long, global = true, env = "LAUNCH_CALENDAR_SCHEDULE_URL", default_value = config::DEFAULT_SCHEDULE_URL)]
    schedule_url: String,

    /// Parse a saved copy of the schedule page instead of fetching it
    #[arg(long, global = true, env = "LAUNCH_CALENDAR_HTML_FILE")]
    html_file: Option<PathBuf>,

    /// Name of the calendar to create
    #[arg(long, global = true, env = "LAUNCH_CALENDAR_NAME", default_value = config::DEFAULT_CALENDAR_NAME)]
    calendar_name: String,

    /// Time zone of the created calendar
    #[arg(long, global = true, env = "LAUNCH_CALENDAR_TIME_ZONE", default_value = config::DEFAULT_TIME_ZONE)]
    time_zone: String,

    /// OAuth client secrets file
    #[arg(long, global = true, env = "LAUNCH_CALENDAR_CREDENTIALS", default_value = config::DEFAULT_CREDENTIALS_PATH)]
    credentials: PathBuf,

    /// Cached OAuth token file
    #[arg(long, global = true, env = "LAUNCH_CALENDAR_TOKEN", default_value = config::DEFAULT_TOKEN_PATH)]
    token: PathBuf,

    /// Calendar API base URL
    #[arg(long, global = true, env = "LAUNCH_CALENDAR_API_URL", default_value = config::DEFAULT_CALENDAR_API)]
    calendar_api: String,
}

impl Options {
    fn into_config(self, dry_run: bool) -> SyncConfig {
        let source = match self.html_file {
            Some(path) => ScheduleSource::File(path),
            None => ScheduleSource::Url(self.schedule_url),
        };
        SyncConfig {
            source,
            calendar: CalendarSettings {
                name: self.calendar_name,
                time_zone: self.time_zone,
            },
            auth: AuthSettings {
                credentials_path: self.credentials,
                token_path: self.token,
                ..AuthSettings::default()
            },
            calendar_api: self.calendar_api,
            dry_run,
        }
    }
}

/// Initialize tracing with output to stderr so stdout stays free for `parse`
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "launch_calendar=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Parse) => {
            let config = cli.options.into_config(true);
            let launches = sync::load_launches(&config, &SystemClock).await?;
            for launch in &launches {
                println!("{}", serde_json::to_string(launch)?);
            }
        }
        Some(Commands::Auth) => {
            let config = cli.options.into_config(false);
            Authenticator::new(config.auth).access_token().await?;
            tracing::info!("Authorization complete");
        }
        Some(Commands::Sync { dry_run }) => {
            let config = cli.options.into_config(dry_run);
            report(sync::run_sync(&config, &SystemClock).await?);
        }
        None => {
            let config = cli.options.into_config(false);
            report(sync::run_sync(&config, &SystemClock).await?);
        }
    }

    Ok(())
}

fn report(result: sync::SyncReport) {
    match result.calendar_id {
        Some(id) => tracing::info!(
            "Published {} launches to calendar {}",
            result.events_created,
            id
        ),
        None => tracing::info!("Dry run, nothing published"),
    }
}
