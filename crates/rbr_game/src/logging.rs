use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialize the global logger: `info` by default, `debug` when `verbose`.
/// `RUST_LOG` still wins when set.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // A logger may already be installed (tests); that is fine.
    let _ = Builder::from_env(env).try_init();
}
