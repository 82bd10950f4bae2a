//! Reader configuration
//!
//! Identifies which application's preference store to read and whether the
//! process is an editor or a packaged player. Passed explicitly to
//! [`crate::PrefsReader`]; there is no global configuration.

/// Whether the host process is an editor session or a packaged player.
///
/// Editor and player builds persist preferences in different locations
/// (separate registry subtrees on Windows, file-system plists instead of a
/// live defaults bridge on macOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Packaged player build
    #[default]
    Player,
    /// Editor session
    Editor,
}

/// Application identity used to locate the preference store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Company name as configured in player settings
    pub company: String,
    /// Product name as configured in player settings
    pub product: String,
    /// Bundle identifier (Android shared-preferences naming)
    pub bundle_id: String,
    /// Editor vs. player environment
    pub environment: Environment,
}

impl ReaderConfig {
    /// Build a config, substituting the engine's defaults for empty names.
    pub fn new(company: &str, product: &str, bundle_id: &str) -> Self {
        Self {
            company: non_empty_or(company, "UnityDefaultCompany"),
            product: non_empty_or(product, "UnnamedProduct"),
            bundle_id: bundle_id.to_string(),
            environment: Environment::Player,
        }
    }

    /// Switch the config to the editor environment.
    pub fn editor(mut self) -> Self {
        self.environment = Environment::Editor;
        self
    }

    /// Registry subtree for this application on Windows.
    pub fn registry_subkey(&self) -> String {
        match self.environment {
            Environment::Player => format!(r"Software\{}\{}", self.company, self.product),
            Environment::Editor => format!(
                r"Software\Unity\UnityEditor\{}\{}",
                self.company, self.product
            ),
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_names() {
        let config = ReaderConfig::new("", "  ", "");
        assert_eq!(config.company, "UnityDefaultCompany");
        assert_eq!(config.product, "UnnamedProduct");
    }

    #[test]
    fn test_registry_subkeys() {
        let config = ReaderConfig::new("Acme", "Game", "com.acme.game");
        assert_eq!(config.registry_subkey(), r"Software\Acme\Game");
        assert_eq!(
            config.editor().registry_subkey(),
            r"Software\Unity\UnityEditor\Acme\Game"
        );
    }
}
