//! Diagnostic logging setup
//!
//! Logs go to stderr so piped table output stays clean. `RUST_LOG` wins over
//! the level picked from `--verbose` / `--quiet`.

use tracing_subscriber::EnvFilter;

use crate::cli::GlobalOpts;

/// Default directive for the crate given the global flags
pub fn default_directive(global: &GlobalOpts) -> &'static str {
    if global.verbose {
        "taskfmt=debug"
    } else if global.quiet {
        "taskfmt=error"
    } else {
        "taskfmt=warn"
    }
}

/// Install the global subscriber; a second call is a no-op
pub fn init(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(global)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn opts(verbose: bool, quiet: bool) -> GlobalOpts {
        GlobalOpts {
            format: OutputFormat::Auto,
            quiet,
            verbose,
            config: None,
        }
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(&opts(false, false)), "taskfmt=warn");
        assert_eq!(default_directive(&opts(true, false)), "taskfmt=debug");
        assert_eq!(default_directive(&opts(false, true)), "taskfmt=error");
        // verbose beats quiet
        assert_eq!(default_directive(&opts(true, true)), "taskfmt=debug");
    }
}
