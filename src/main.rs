//! Entry point for the **wsnamer** daemon.
//!
//! Subscribes to i3 window events on a background thread and runs one
//! rename pass per relevant event on the main thread, strictly one after
//! the other.

use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc;
use wsnamer::command::WindowEvent;
use wsnamer::config::Config;
use wsnamer::i3::events::I3EventSource;
use wsnamer::i3::ipc::I3Error;
use wsnamer::i3::wm::I3Wm;
use wsnamer::renamer::Renamer;
use wsnamer::traits::EventSource;

/// Extract the `--config <path>` / `--config=<path>` flag.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Option<PathBuf>, String> {
    let mut config = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args
                .next()
                .ok_or_else(|| "--config requires a path".to_string())?;
            config = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--config=") {
            config = Some(PathBuf::from(path));
        } else {
            return Err(format!("unexpected argument: {}", arg));
        }
    }
    Ok(config)
}

/// Load the config named on the command line, or the defaults.
fn load_config(path: Option<PathBuf>) -> Config {
    let Some(path) = path else {
        info!("no config file given, using defaults");
        return Config::default();
    };
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            error!("failed to load config: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let config_path = match parse_args(std::env::args().skip(1)) {
        Ok(p) => p,
        Err(e) => {
            error!("{}", e);
            eprintln!("usage: wsnamer [--config <path>]");
            std::process::exit(1);
        }
    };
    let config = load_config(config_path);

    let wm = match I3Wm::from_env() {
        Ok(wm) => wm,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("using i3 socket {}", wm.path().display());

    let mut source = match I3EventSource::from_env() {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let (event_tx, event_rx) = mpsc::channel::<WindowEvent>();
    let events = std::thread::spawn(move || source.run(event_tx));

    info!("wsnamer running");
    Renamer::new(wm, config).run(event_rx);
    std::process::exit(exit_code(events.join()));
}

/// Exit status for how the event source thread ended.
///
/// The renamer only stops once the source is gone, so a source error
/// (failing to subscribe, or to re-subscribe after a restart) is what
/// decides whether the daemon failed.
fn exit_code(source: std::thread::Result<Result<(), I3Error>>) -> i32 {
    match source {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            error!("event source error: {}", e);
            1
        }
        Err(_) => {
            error!("event source thread panicked");
            1
        }
    }
}
