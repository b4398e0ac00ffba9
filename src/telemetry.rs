use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

/// Install the global tracing subscriber.
///
/// The filter is taken from `explicit_filter`, then `RUST_LOG`, then falls
/// back to `info`; the first candidate that parses wins.
///
/// # Errors
///
/// Fails when no filter candidate parses, when JSON output is requested but the
/// `json-logs` feature was not compiled in, or when a global subscriber is
/// already installed.
pub fn init_tracing(explicit_filter: Option<&str>, use_json: bool) -> Result<()> {
    let filter = build_filter(explicit_filter)?;

    #[cfg(feature = "json-logs")]
    if use_json {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .json()
                .flatten_event(true),
        );
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|err| Error::Telemetry(err.to_string()))?;
        return Ok(());
    }

    #[cfg(not(feature = "json-logs"))]
    if use_json {
        return Err(Error::Telemetry(
            "binary was built without the `json-logs` feature".to_string(),
        ));
    }

    // stdout belongs to the renderer
    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr),
    );
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| Error::Telemetry(err.to_string()))
}

fn build_filter(explicit_filter: Option<&str>) -> Result<EnvFilter> {
    let mut candidates = Vec::new();
    if let Some(f) = explicit_filter {
        candidates.push(f.to_string());
    }
    if let Ok(env) = std::env::var("RUST_LOG") {
        candidates.push(env);
    }
    candidates.push("info".to_string());

    candidates
        .into_iter()
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))
}

#[cfg(test)]
mod tests {
    use super::build_filter;

    #[test]
    fn explicit_filter_is_preferred() {
        let filter = match build_filter(Some("toastq=debug")) {
            Ok(filter) => filter,
            Err(err) => panic!("filter should parse: {err}"),
        };
        assert!(filter.to_string().contains("toastq=debug"));
    }
}
