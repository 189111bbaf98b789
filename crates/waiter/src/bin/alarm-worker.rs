//! alarm-worker — schedules one alarm from CLI flags and logs when it
//! fires.
//!
//! ```text
//! alarm-worker --time 06:30 --weekdays mon,tue,wed,thu,fri --repeat
//! ```

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use wecker_core::{Alarm, AlarmTimeZone};
use wecker_waiter::{parse_local_time, parse_weekdays, schedule};

/// Wait for a local-time alarm in an IANA timezone and log when it fires.
#[derive(Parser, Debug)]
#[command(name = "alarm-worker", version, about)]
struct Cli {
    /// IANA timezone identifier (defaults to the host timezone).
    #[arg(long, env = "WECKER_TZ")]
    timezone: Option<String>,

    /// Local time of day, "HH:MM" or "HH:MM:SS".
    #[arg(long, env = "WECKER_TIME")]
    time: String,

    /// Comma-separated weekdays ("mon,fri" or "1,5"; empty = one-time).
    #[arg(long, env = "WECKER_DAYS", default_value = "")]
    weekdays: String,

    /// Keep re-scheduling after each firing.
    #[arg(long, default_value_t = false)]
    repeat: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let tz = match &cli.timezone {
        Some(id) => AlarmTimeZone::resolve(id)
            .with_context(|| format!("unknown timezone '{}'", id))?,
        None => AlarmTimeZone::system_default().context("no usable host timezone")?,
    };

    let local_time = match parse_local_time(&cli.time) {
        Some(t) => t,
        None => bail!("invalid --time '{}': expected HH:MM or HH:MM:SS", cli.time),
    };
    let weekdays = match parse_weekdays(&cli.weekdays) {
        Some(days) => days,
        None => bail!("invalid --weekdays '{}'", cli.weekdays),
    };

    let alarm = Alarm::with_weekdays(local_time, weekdays);
    info!(timezone = %tz, time = %alarm.local_time, one_time = alarm.is_one_time(), "alarm-worker started");

    loop {
        info!(next = %alarm.next_occurrence(&tz), "waiting for next occurrence");
        let fired = schedule(&alarm, &tz, || info!("alarm!")).join().await;
        if !fired {
            bail!("alarm wait was cancelled unexpectedly");
        }
        if !cli.repeat || alarm.is_one_time() {
            break;
        }
    }

    Ok(())
}
