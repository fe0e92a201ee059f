//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use drawsync_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "api_url": config.api_url,
                    "api_version": config.api_version,
                    "repository": config.repository,
                    "repository_description": config.repository_description,
                    "private_repository": config.private_repository,
                    "document_path": config.document_path,
                    "timeout_secs": config.timeout_secs,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:               {}", config.data_dir.display());
            println!("  api_url:                {}", config.api_url);
            println!("  api_version:            {}", config.api_version);
            println!("  repository:             {}", config.repository);
            println!("  repository_description: {}", config.repository_description);
            println!("  private_repository:     {}", config.private_repository);
            println!("  document_path:          {}", config.document_path);
            println!("  timeout_secs:           {}", config.timeout_secs);
            println!(
                "  log_file:               {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply a single `key = value` change
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => config.data_dir = value.into(),
        "api_url" => config.api_url = non_empty(key, value)?,
        "api_version" => config.api_version = non_empty(key, value)?,
        "repository" => config.repository = non_empty(key, value)?,
        "repository_description" => config.repository_description = value.to_string(),
        "private_repository" => {
            config.private_repository = value
                .parse()
                .context("Invalid value for private_repository. Use 'true' or 'false'.")?;
        }
        "document_path" => config.document_path = non_empty(key, value)?,
        "timeout_secs" => {
            let secs: u64 = value
                .parse()
                .context("Invalid value for timeout_secs. Use a whole number of seconds.")?;
            if secs == 0 {
                bail!("timeout_secs must be at least 1");
            }
            config.timeout_secs = secs;
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, api_url, api_version, repository, repository_description, \
                 private_repository, document_path, timeout_secs, log_file",
                key
            );
        }
    }
    Ok(())
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        bail!("{} cannot be empty", key);
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "repository", "sketches").unwrap();
        apply(&mut config, "private_repository", "false").unwrap();
        apply(&mut config, "timeout_secs", "12").unwrap();
        apply(&mut config, "log_file", "/tmp/drawsync.log").unwrap();

        assert_eq!(config.repository, "sketches");
        assert!(!config.private_repository);
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/drawsync.log")));

        apply(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply(&mut config, "private_repository", "maybe").is_err());
        assert!(apply(&mut config, "timeout_secs", "-1").is_err());
        assert!(apply(&mut config, "timeout_secs", "0").is_err());
        assert_eq!(config.timeout_secs, 30);
        assert!(apply(&mut config, "repository", "").is_err());

        let err = apply(&mut config, "sync_url", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_set_writes_given_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            format!("data_dir = {:?}\n", temp_dir.path().join("data")),
        )
        .unwrap();

        let output = Output::new(OutputFormat::Quiet);
        set(
            "document_path".to_string(),
            "boards/main.json".to_string(),
            Some(&path),
            &output,
        )
        .unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("boards/main.json"));
    }
}
