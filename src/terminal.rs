use crate::error::ShellError;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::sync::Once;

static PANIC_HOOK_SET: Once = Once::new();

/// Keeps the terminal in raw mode for as long as it is alive.
///
/// Dropping the guard restores the previous mode. A panic hook does the same, and so does
/// a termination signal (SIGTERM, SIGHUP, SIGQUIT), which then ends the process with
/// `128 + signal`. Neither path leaves the user's terminal raw.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Result<Self, ShellError> {
        enable_raw_mode().map_err(ShellError::RawMode)?;
        set_panic_hook();
        if let Err(e) = set_signal_watch() {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn set_panic_hook() {
    PANIC_HOOK_SET.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            default_hook(panic_info);
        }));
    });
}

#[cfg(unix)]
fn set_signal_watch() -> Result<(), ShellError> {
    use signal_hook::consts::{SIGHUP, SIGQUIT, SIGTERM};
    use std::sync::atomic::{AtomicBool, Ordering};

    static SIGNAL_WATCH_SET: AtomicBool = AtomicBool::new(false);

    if SIGNAL_WATCH_SET.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    let watch = signals::watch(&[SIGTERM, SIGHUP, SIGQUIT], |sig| {
        let _ = disable_raw_mode();
        std::process::exit(128 + sig);
    });
    if let Err(e) = watch {
        SIGNAL_WATCH_SET.store(false, Ordering::SeqCst);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_signal_watch() -> Result<(), ShellError> {
    Ok(())
}

#[cfg(unix)]
mod signals {
    use signal_hook::iterator::{Handle, Signals};
    use std::ffi::c_int;
    use std::io;
    use tracing::info;

    /// Runs `on_signal` on a background thread for the first of `signals` delivered.
    ///
    /// While registered, the signals no longer run their default action.
    pub(super) fn watch<F>(signals: &[c_int], on_signal: F) -> io::Result<Handle>
    where
        F: FnOnce(c_int) + Send + 'static,
    {
        let mut signals = Signals::new(signals)?;
        let handle = signals.handle();
        std::thread::Builder::new()
            .name("signal-watch".to_string())
            .spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    info!(signal = sig, "terminating on signal");
                    on_signal(sig);
                }
            })?;
        Ok(handle)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use signal_hook::consts::SIGUSR1;
        use signal_hook::low_level::raise;
        use std::sync::mpsc;
        use std::time::Duration;

        #[test]
        fn test_watch_runs_callback_for_delivered_signal() {
            let (tx, rx) = mpsc::channel();
            let handle = watch(&[SIGUSR1], move |sig| {
                let _ = tx.send(sig);
            })
            .unwrap();

            raise(SIGUSR1).unwrap();
            assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(SIGUSR1));
            handle.close();
        }
    }
}
