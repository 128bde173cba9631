use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::warn;
#[cfg(windows)]
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Clears the run flag on the first signal so workers wind down at their
/// next channel boundary; a second signal forces the process down.
pub async fn notify_on_signals(run: Arc<AtomicBool>) {
    #[cfg(unix)]
    {
        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to set up SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to set up SIGINT handler");
        loop {
            tokio::select! {
                _ = sigint.recv() => stop(&run, "SIGINT"),
                _ = sigterm.recv() => stop(&run, "SIGTERM"),
            }
        }
    }
    #[cfg(windows)]
    {
        loop {
            let _ = ctrl_c().await;
            stop(&run, "Ctrl+C");
        }
    }
}

fn stop(run: &Arc<AtomicBool>, signal: &str) {
    if !run.load(Ordering::Relaxed) {
        warn!("{signal} received again, terminating");
        process::exit(1);
    }
    warn!("{signal} received, stopping (repeat to force close)");
    run.store(false, Ordering::Relaxed);
}
