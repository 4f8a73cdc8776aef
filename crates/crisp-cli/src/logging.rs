//! Tracing initialization.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `CRISP_LOG`, then `RUST_LOG`, override the level picked by `-v`.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env("CRISP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to initialize tracing: {}", e);
    }
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "trace");
    }
}
