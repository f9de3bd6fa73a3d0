//! Terminal and environment checks.

use std::io::IsTerminal;

#[must_use]
pub fn stdout_is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// The spinner draws on stderr, so it checks this rather than stdout.
#[must_use]
pub fn stderr_is_tty() -> bool {
    std::io::stderr().is_terminal()
}

/// Colors are off for `--no-color`, any `NO_COLOR`, `TERM=dumb`, or a
/// non-terminal stdout.
#[must_use]
pub fn should_use_color(no_color_flag: bool) -> bool {
    let disabled_by_env =
        std::env::var_os("NO_COLOR").is_some() || std::env::var("TERM").is_ok_and(|t| t == "dumb");
    !no_color_flag && !disabled_by_env && stdout_is_tty()
}

/// Read an environment variable, trimmed, treating blank values as unset.
#[must_use]
pub fn non_empty_var(var: &str) -> Option<String> {
    let value = std::env::var(var).ok()?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
