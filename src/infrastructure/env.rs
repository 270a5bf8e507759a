//! Environment configuration.
//!
//! `DEPRECATIONS` selects the initial mode and
//! `DEPRECATIONS_IGNORE_PACKAGES` lists packages (comma-separated) whose
//! deprecations are never emitted.

use crate::domain::mode::ModeKind;
use crate::infrastructure::builder::BuildError;

use std::env::VarError;

/// Variable holding the mode name.
pub const MODE_VAR: &str = "DEPRECATIONS";

/// Variable holding the comma-separated ignored packages.
pub const IGNORE_PACKAGES_VAR: &str = "DEPRECATIONS_IGNORE_PACKAGES";

/// Configuration read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Initial mode, `Disabled` when the variable is unset
    pub mode: ModeKind,
    /// Packages to ignore, in the order given
    pub ignored_packages: Vec<String>,
}

impl EnvConfig {
    /// Read `DEPRECATIONS` and `DEPRECATIONS_IGNORE_PACKAGES`.
    ///
    /// # Errors
    /// Returns `BuildError` if a variable is not valid unicode or names an
    /// unknown mode.
    pub fn from_env() -> Result<Self, BuildError> {
        Self::from_var(MODE_VAR)
    }

    /// Like [`from_env`](Self::from_env) but reading the mode from `mode_var`.
    ///
    /// # Errors
    /// Returns `BuildError` if a variable is not valid unicode or names an
    /// unknown mode.
    pub fn from_var(mode_var: &str) -> Result<Self, BuildError> {
        Self::from_lookup(mode_var, |name| std::env::var(name))
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(mode_var: &str, lookup: F) -> Result<Self, BuildError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let mode = match read(&lookup, mode_var)? {
            Some(name) => name.parse()?,
            None => ModeKind::Disabled,
        };

        let ignored_packages = read(&lookup, IGNORE_PACKAGES_VAR)?
            .map(|list| parse_package_list(&list))
            .unwrap_or_default();

        Ok(Self {
            mode,
            ignored_packages,
        })
    }
}

fn read<F>(lookup: &F, name: &str) -> Result<Option<String>, BuildError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(BuildError::InvalidEnvironment {
            var: name.to_string(),
        }),
    }
}

fn parse_package_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
