use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so that stdout only ever carries the responses.
/// `RUST_LOG` overrides `default_level`; an unparsable value is reported
/// and ignored.
pub fn init_logger(default_level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env()
        .unwrap_or_else(|err| {
            eprintln!("ignoring {}: {err}", EnvFilter::DEFAULT_ENV);
            EnvFilter::new(default_level.to_string())
        });

    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .try_init();

    if let Err(err) = installed {
        eprintln!("tracing subscriber already set - {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        init_logger(LevelFilter::DEBUG);
        init_logger(LevelFilter::INFO);
    }
}
