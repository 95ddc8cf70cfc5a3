use log::LevelFilter;

const CRATES: &[&str] = &["nutri_flow"];

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn default_filter(level: LevelFilter) -> String {
    let level = level.as_str().to_lowercase();
    CRATES
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global logger. `RUST_LOG`, when set, overrides `verbosity`.
pub fn init(verbosity: u8) {
    let filter = default_filter(level_for(verbosity));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}
