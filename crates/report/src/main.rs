use monitor_report::ReportSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "monitor_report=info,monitor_core=info,monitor_db=info".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    // Logs go to stderr so stdout stays free for the report itself.
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let settings = ReportSettings::from_env()?;
    tracing::info!(
        projects = settings.report.cohort.project_ids.len(),
        timezone = %settings.report.target_timezone,
        "Report starting"
    );

    monitor_report::run(&settings).await?;
    Ok(())
}
