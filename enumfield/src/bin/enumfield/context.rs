use anyhow::{Context, Result};
use enumfield::{ConfigurationIssue, EnumConfig, EnumRegistry};
use std::path::{Path, PathBuf};

use crate::output::OutputManager;

/// Default config file name looked up from the current directory upwards.
pub const DEFAULT_CONFIG_FILE: &str = "enums.toml";

/// Loaded configuration plus the registry built from it.
pub struct ConfigContext {
    pub config_path: PathBuf,
    pub registry: EnumRegistry,
    /// Declarations rejected while building the registry.
    pub issues: Vec<ConfigurationIssue>,
}

impl ConfigContext {
    /// Loads the config at `explicit`, or searches for `enums.toml` in the
    /// current directory and its ancestors.
    pub fn load(explicit: Option<&Path>, output: &OutputManager) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let current_dir = std::env::current_dir().context("Failed to get current directory")?;
                Self::find_config(&current_dir)?
            }
        };

        output.verbose(&format!("Using config {}", config_path.display()));
        let config = EnumConfig::load(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;

        let (registry, issues) = config.build_registry();

        Ok(Self {
            config_path,
            registry,
            issues,
        })
    }

    /// Warns about every rejected declaration; the rest of the config stays usable.
    pub fn report_skipped(&self, output: &OutputManager) {
        for issue in &self.issues {
            output.warning(&format!("Skipped {issue}"));
        }
    }

    fn find_config(start: &Path) -> Result<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(DEFAULT_CONFIG_FILE);
            if candidate.exists() {
                return Ok(candidate);
            }

            if !current.pop() {
                anyhow::bail!(
                    "Could not find {DEFAULT_CONFIG_FILE} in {start:?} or any parent directory. \
                     Pass --config or set ENUMFIELD_CONFIG."
                );
            }
        }
    }

    /// Fails with a helpful message when `model` is not in the config.
    pub fn require_model(&self, model: &str) -> Result<()> {
        if self.registry.is_registered(model) {
            return Ok(());
        }
        let known = self.registry.models().join(", ");
        anyhow::bail!("Model '{model}' is not declared in {} (known: {known})", self.config_path.display())
    }
}
