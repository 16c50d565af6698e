use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "warn,warlog=info";

/// Logs go to stderr; stdout is kept for the status line.
///
/// `RUST_LOG` replaces the default, which keeps dependencies such as
/// reqwest and rustls quiet below `warn`.
pub fn init() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter()?)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}

fn filter() -> anyhow::Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("parse {}={directives}", EnvFilter::DEFAULT_ENV)),
        _ => EnvFilter::try_new(DEFAULT_DIRECTIVES).context("build default log filter"),
    }
}
