//! Path resolution for data and configuration files.
//!
//! Locations follow the XDG base directory conventions, with `FOLIO_*` environment
//! variables taking precedence. Resolution is split into pure functions over an
//! environment lookup so it can be tested without touching the process environment.

use std::path::PathBuf;

/// Application directory name under the XDG base directories.
const APP_DIR: &str = "folio";

/// File holding the JSON storage medium.
pub const STORAGE_FILE: &str = "storage.json";

/// File receiving exported trace spans.
pub const TRACE_FILE: &str = "folio-traces.json";

/// Configuration file name.
pub const CONFIG_FILE: &str = "folio.toml";

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolves the data directory from an environment lookup.
///
/// Order: `FOLIO_DATA_DIR`, `$XDG_DATA_HOME/folio`, `$HOME/.local/share/folio`,
/// and finally `./.folio` when no home directory is known.
///
/// # Examples
///
/// ```
/// use folio::infrastructure::paths::data_dir_from;
/// use std::path::PathBuf;
///
/// let env = |name: &str| (name == "HOME").then(|| "/home/ada".to_string());
/// assert_eq!(data_dir_from(env), PathBuf::from("/home/ada/.local/share/folio"));
/// ```
pub fn data_dir_from<F>(env: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = env("FOLIO_DATA_DIR") {
        return PathBuf::from(expand_tilde_with(&dir, env("HOME").as_deref()));
    }
    if let Some(xdg) = env("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    env("HOME").map_or_else(
        || PathBuf::from(".").join(".folio"),
        |home| PathBuf::from(home).join(".local").join("share").join(APP_DIR),
    )
}

/// Resolves the configuration file path from an environment lookup.
///
/// Order: `FOLIO_CONFIG`, `$XDG_CONFIG_HOME/folio/folio.toml`,
/// `$HOME/.config/folio/folio.toml`; `None` without any of them.
pub fn config_file_from<F>(env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(file) = env("FOLIO_CONFIG") {
        return Some(PathBuf::from(expand_tilde_with(&file, env("HOME").as_deref())));
    }
    if let Some(xdg) = env("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE));
    }
    env("HOME").map(|home| PathBuf::from(home).join(".config").join(APP_DIR).join(CONFIG_FILE))
}

/// Returns the data directory for the current process environment.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    data_dir_from(env_var)
}

/// Returns the default configuration file for the current process environment.
#[must_use]
pub fn get_config_file() -> Option<PathBuf> {
    config_file_from(env_var)
}

/// Replaces a leading `~` with `home`, leaving other paths untouched.
///
/// # Examples
///
/// ```
/// use folio::infrastructure::paths::expand_tilde_with;
///
/// assert_eq!(expand_tilde_with("~/data", Some("/home/ada")), "/home/ada/data");
/// assert_eq!(expand_tilde_with("~", Some("/home/ada")), "/home/ada");
/// assert_eq!(expand_tilde_with("/abs/path", Some("/home/ada")), "/abs/path");
/// assert_eq!(expand_tilde_with("~/data", None), "~/data");
/// ```
#[must_use]
pub fn expand_tilde_with(path: &str, home: Option<&str>) -> String {
    match home {
        Some(home) if path == "~" => home.to_string(),
        Some(home) if path.starts_with("~/") => path.replacen('~', home, 1),
        _ => path.to_string(),
    }
}

/// Replaces a leading `~` with the current `HOME`.
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    expand_tilde_with(path, env_var("HOME").as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn explicit_data_dir_wins() {
        let env = env_of(&[("FOLIO_DATA_DIR", "~/portfolio"), ("HOME", "/home/ada"), ("XDG_DATA_HOME", "/xdg")]);
        assert_eq!(data_dir_from(env), PathBuf::from("/home/ada/portfolio"));
    }

    #[test]
    fn xdg_data_home_before_home() {
        let env = env_of(&[("HOME", "/home/ada"), ("XDG_DATA_HOME", "/xdg")]);
        assert_eq!(data_dir_from(env), PathBuf::from("/xdg/folio"));
    }

    #[test]
    fn no_home_falls_back_to_cwd() {
        assert_eq!(data_dir_from(env_of(&[])), PathBuf::from("./.folio"));
        assert_eq!(config_file_from(env_of(&[])), None);
    }

    #[test]
    fn config_file_under_home() {
        let env = env_of(&[("HOME", "/home/ada")]);
        assert_eq!(
            config_file_from(env),
            Some(PathBuf::from("/home/ada/.config/folio/folio.toml"))
        );
    }
}
