use clap::Parser;
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Scene delivery collector
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Scene file to collect (JSON scene graph)
    #[arg(value_name = "SCENE")]
    pub scene: PathBuf,

    /// Destination directory for the delivery
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: PathBuf,

    /// Directory to search for gizmo definitions (can be repeated)
    #[arg(short = 'g', long = "gizmo-dir", value_name = "DIR")]
    pub gizmo_dirs: Vec<PathBuf>,

    /// Skip the gizmo flattening pass
    #[arg(long = "no-flatten")]
    pub no_flatten: bool,

    /// Suppress the progress bar
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Enable debug logging to file (default: collekt.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let args = Args::parse_from(["collekt", "shot.json", "-o", "/deliveries/shot"]);
        assert_eq!(args.scene, PathBuf::from("shot.json"));
        assert_eq!(args.output, PathBuf::from("/deliveries/shot"));
        assert!(args.gizmo_dirs.is_empty());
        assert!(!args.no_flatten);
    }

    #[test]
    fn gizmo_dirs_accumulate() {
        let args = Args::parse_from([
            "collekt", "shot.json", "-o", "out", "-g", "/pipeline/gizmos", "-g", "./gizmos",
        ]);
        assert_eq!(args.gizmo_dirs.len(), 2);
    }
}
