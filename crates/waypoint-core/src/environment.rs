//! Termux environment detection.
//!
//! Waypoint specializes its guidance for the Termux shell on Android.
//! Detection is a pure read of environment variables Termux sets out
//! of the box; core logic receives the detected boolean as data (via
//! [`crate::planner::PlannerBuilder`]) so tests never have to mutate
//! process state.

/// Returns `true` when the current process appears to run under
/// Termux.
///
/// Either marker is sufficient: the `TERMUX_VERSION` variable, or a
/// `PREFIX` containing the Termux application id.
pub fn detect_termux() -> bool {
    std::env::var_os("TERMUX_VERSION").is_some()
        || std::env::var("PREFIX")
            .map(|prefix| prefix.contains("com.termux"))
            .unwrap_or(false)
}

/// Default environment note for a plan, chosen by the detected
/// environment. Always prefixed with the literal `Environment:` tag.
pub fn environment_note(is_termux: bool) -> String {
    if is_termux {
        "Environment: Detected Termux. Prefer `pkg` for package management and avoid sudo."
            .to_string()
    } else {
        "Environment: Non-Termux detected. If targeting Termux, ensure commands \
         are `pkg` compatible."
            .to_string()
    }
}
