use std::sync::Once;

static INIT: Once = Once::new();

/// Install the process-wide console logger.
///
/// Safe to call repeatedly; only the first call attaches a subscriber, and
/// a subscriber already installed by the host wins silently. Output goes to
/// the console with ANSI level colors.
pub fn init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_ansi(true)
            .with_target(false)
            .try_init();
    });
}
