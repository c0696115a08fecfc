use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::GlobalFlags;

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub progress: bool,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

/// Progress bars draw on stderr, so stdout stays clean for rendered output.
pub fn init(flags: &GlobalFlags) {
    let progress = std::io::stderr().is_terminal() && !flags.quiet && !flags.verbose;
    let _ = UI_PREFS.set(UiPrefs { progress });
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs { progress: false })
}
