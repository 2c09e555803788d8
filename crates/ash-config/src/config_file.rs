use std::{env, path::PathBuf};

const CONFIG_FILE: &str = ".ash.toml";

/// Load config file content from the first location that has one
///
/// Searches, in order:
/// 1. `.ash.toml` in the current working directory
/// 2. `.ash.toml` in the home directory
/// 3. `config.toml` in the application config directory
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    for path in config_file_candidates() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            log::debug!("Loaded config from {}", path.display());
            return Some(content);
        }
    }

    None
}

/// Locations searched by [`load_config_file`], in order
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];

    if let Some(home_config) = get_home_config_path() {
        candidates.push(home_config);
    }

    match crate::app_config_path() {
        Ok(path) => candidates.push(path),
        Err(e) => log::debug!("No config directory: {}", e),
    }

    candidates
}

/// Get the path to the config file in the home directory
fn get_home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cwd_is_searched_first() {
        let candidates = config_file_candidates();
        assert_eq!(candidates[0], PathBuf::from(CONFIG_FILE));
        assert!(candidates.len() <= 3);
    }
}
