use crate::error::CliError;
use connectors::partner::Partner;
use model::sync::result::Credentials;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Environment variables from the process plus optional .env files, used to
/// assemble partner credentials.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    sensitive_patterns: Vec<String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
            sensitive_patterns: Self::default_sensitive_patterns(),
        }
    }

    /// Load variables from a .env file; file values override the process env.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Credentials for `partner`: its env variable mapped onto its credential
    /// key, then any explicit `KEY=VALUE` overrides.
    pub fn credentials_for(
        &self,
        partner: &dyn Partner,
        overrides: &[String],
    ) -> Result<Credentials, CliError> {
        let mut creds = Credentials::new();

        if let Some(value) = self.get(partner.credential_env()) {
            debug!(
                partner = partner.id(),
                var = partner.credential_env(),
                value = %self.redact(partner.credential_env(), value),
                "Using credential from environment."
            );
            creds.insert(partner.credential_key().to_string(), value.to_string());
        }

        for pair in overrides {
            let (key, value) = Self::split_pair(pair).ok_or_else(|| {
                CliError::Config(format!("Invalid credential '{pair}', expected KEY=VALUE"))
            })?;
            creds.insert(key.to_string(), value);
        }

        Ok(creds)
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            match Self::split_pair(line) {
                Some((key, value)) => {
                    self.vars.insert(key.to_string(), value);
                }
                None => {
                    return Err(CliError::Config(format!(
                        "Invalid env file: malformed line {} (expected KEY=VALUE)",
                        line_num + 1
                    )));
                }
            }
        }

        Ok(())
    }

    fn split_pair(line: &str) -> Option<(&str, String)> {
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some((key, Self::unquote_value(value)))
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            return value[1..value.len() - 1].to_string();
        }

        value.to_string()
    }

    fn redact<'a>(&self, key: &str, value: &'a str) -> &'a str {
        let key = key.to_ascii_lowercase();
        if self.sensitive_patterns.iter().any(|p| key.contains(p)) {
            "***"
        } else {
            value
        }
    }

    fn default_sensitive_patterns() -> Vec<String> {
        ["password", "secret", "token", "key", "auth", "credential"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectors::partner::{changenow::ChangeNow, godex::Godex};

    fn empty() -> EnvManager {
        EnvManager {
            vars: HashMap::new(),
            sensitive_patterns: EnvManager::default_sensitive_patterns(),
        }
    }

    #[test]
    fn test_parse_env_file() {
        let mut env = empty();
        let content = r#"
# Comment
CHANGENOW_API_KEY="cn key"
export GODEX_API_KEY='gd-key'
PLAIN=value
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("CHANGENOW_API_KEY"), Some("cn key"));
        assert_eq!(env.get("GODEX_API_KEY"), Some("gd-key"));
        assert_eq!(env.get("PLAIN"), Some("value"));
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=novalue").is_err());
    }

    #[test]
    fn test_env_var_maps_to_partner_key() {
        let mut env = empty();
        env.parse_env_content("GODEX_API_KEY=abc").unwrap();

        let creds = env.credentials_for(&Godex::new(), &[]).unwrap();
        assert_eq!(creds.get("apiKey").map(String::as_str), Some("abc"));

        let creds = env.credentials_for(&ChangeNow::new(), &[]).unwrap();
        assert!(creds.is_empty());
    }

    #[test]
    fn test_overrides_win() {
        let mut env = empty();
        env.parse_env_content("CHANGENOW_API_KEY=from-env").unwrap();

        let creds = env
            .credentials_for(&ChangeNow::new(), &["changenowApiKey=from-flag".into()])
            .unwrap();
        assert_eq!(
            creds.get("changenowApiKey").map(String::as_str),
            Some("from-flag")
        );

        assert!(
            env.credentials_for(&ChangeNow::new(), &["broken".into()])
                .is_err()
        );
    }

    #[test]
    fn test_redacts_sensitive_values() {
        let env = empty();
        assert_eq!(env.redact("GODEX_API_KEY", "abc"), "***");
        assert_eq!(env.redact("RUST_LOG", "info"), "info");
    }
}
