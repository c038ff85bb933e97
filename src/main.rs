use clap::Parser;
use log::{debug, error, info};

use collekt::cli::Args;
use collekt::collect::{Collector, planned_copies};
use collekt::flatten::flatten_gizmos;
use collekt::progress::CopyProgress;
use collekt::report::RunReport;
use collekt::scene::{GizmoLibrary, Scene};

fn main() {
    let args = Args::parse();
    init_logging(&args);

    info!("collekt starting");
    debug!("Command-line args: {:?}", args);

    let mut report = RunReport::new();
    let result = run(&args, &mut report);

    // Summary is printed even when the run aborts: partial results are on
    // disk and the user needs to know what made it across.
    print!("{}", report.summary());

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("collect aborted: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args, report: &mut RunReport) -> anyhow::Result<()> {
    use anyhow::Context;

    let mut scene = Scene::from_json(&args.scene)
        .with_context(|| format!("loading scene {}", args.scene.display()))?;
    info!(
        "Loaded scene '{}' ({} top-level nodes)",
        scene.file_name(),
        scene.graph.len()
    );

    if args.no_flatten {
        info!("Gizmo flattening skipped (--no-flatten)");
    } else {
        // The scene's own directory is always searched after explicit dirs
        let mut dirs = args.gizmo_dirs.clone();
        if let Some(parent) = args.scene.parent() {
            dirs.push(parent.to_path_buf());
        }
        let mut library = GizmoLibrary::new(dirs);
        flatten_gizmos(&mut scene, &mut library, report);
    }

    let progress = if args.quiet {
        CopyProgress::hidden()
    } else {
        CopyProgress::new(planned_copies(&scene) as u64)
    };

    let mut collector = Collector::new(&args.output)
        .with_context(|| format!("preparing destination {}", args.output.display()))?
        .with_progress(progress);
    collector.collect(&mut scene, report)?;
    collector.finish(&scene)?;

    Ok(())
}

fn init_logging(args: &Args) {
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| "collekt.log".into());

        let file = std::fs::File::create(&log_path).expect("Failed to create log file");

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!(
            "Logging to file: {} (level: {:?})",
            log_path.display(),
            log_level
        );
    } else {
        // Console logging (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }
}
