//! Entry point for the **tilegrd** daemon.
//!
//! Spawns the Unix-socket [`CommandSource`](tilegrd::traits::CommandSource)
//! on a background thread and processes incoming commands on the main
//! thread.  Between commands the main thread sleeps until the next dwell or
//! grace deadline so timers fire without a pointer move.

use tilegrd::clock::SystemClock;
use tilegrd::command::Command;
use tilegrd::config::Config;
use tilegrd::controller::{GridController, GridEvent};
use tilegrd::ipc::listener::UnixSocketListener;
use tilegrd::store::JsonFileStore;
use tilegrd::traits::{Clock, CommandSource};
use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

/// Default socket path for the command listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/tilegrd.sock", runtime)
}

/// `$VAR/tilegrd`, or `$HOME/<fallback>/tilegrd` when `$VAR` is unset.
fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    let base = std::env::var(var).unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/{}", home, fallback)
    });
    PathBuf::from(base).join("tilegrd")
}

/// `$XDG_CONFIG_HOME/tilegrd/config.json`.
fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("config.json")
}

/// Try to load the config file, falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        info!("no config file at {}, using defaults", path.display());
        return Config::default();
    }
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            error!("{}, using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    let store_path = config
        .grid
        .store_path
        .clone()
        .unwrap_or_else(|| xdg_dir("XDG_DATA_HOME", ".local/share").join("items.json"));

    let store = JsonFileStore::new(&store_path);
    info!("item list at {}", store.path().display());

    let clock = SystemClock::new();
    let mut controller = match GridController::new(clock, store, config) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to start: {}", e);
            std::process::exit(1);
        }
    };
    controller.set_config_path(config_path());

    let (event_tx, event_rx) = mpsc::channel();
    controller.set_event_sink(event_tx);
    spawn_event_logger(event_rx);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx);

    run_event_loop(&mut controller, clock, cmd_rx);
}

//  Event loop

fn run_event_loop(
    controller: &mut GridController<SystemClock, JsonFileStore>,
    clock: SystemClock,
    cmd_rx: mpsc::Receiver<Command>,
) {
    info!("tilegrd running");
    loop {
        let received = match controller.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_sub(clock.now_ms());
                cmd_rx.recv_timeout(Duration::from_millis(wait))
            }
            None => cmd_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(cmd) => {
                if let Err(e) = controller.handle(cmd) {
                    error!("command error: {}", e);
                }
            }
            Err(RecvTimeoutError::Timeout) => controller.poll(),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>) {
    let path = default_socket_path();
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}

/// Log what a renderer would react to.
fn spawn_event_logger(rx: mpsc::Receiver<GridEvent>) {
    std::thread::spawn(move || {
        for event in rx {
            match event {
                GridEvent::DropStateChanged(state) => debug!(
                    "drop state: {} folder={:?} website={:?} armed={}",
                    state.intent, state.target_folder_id, state.target_website_id, state.is_armed
                ),
                GridEvent::ItemsChanged(items) => info!("grid now has {} item(s)", items.len()),
            }
        }
    });
}
