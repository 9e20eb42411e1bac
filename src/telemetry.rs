use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins; otherwise `info`.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  fmt().with_env_filter(filter).with_target(false).init();
}
