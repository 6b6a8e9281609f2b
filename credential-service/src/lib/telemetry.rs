use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::util::TryInitError;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "credential_service=debug,auth=info";

/// Install the global tracing subscriber (fmt output, `RUST_LOG` filter).
///
/// # Errors
/// * `TryInitError` - A global subscriber is already installed
pub fn init() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
