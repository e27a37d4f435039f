//! Connection profiles.
//!
//! Profiles are an explicit, passed-in configuration object with defined
//! load/save boundaries at the composition root; nothing in the library
//! reads or writes them ambiently.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

/// One saved bridge connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub name: String,
    /// Origin of the bridge endpoint, e.g. "http://127.0.0.1:8006"
    pub endpoint: String,
    /// Optional per-request timeout for the HTTP transport, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl ConnectionProfile {
    /// The configured request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// The set of saved connection profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profiles {
    /// Name of the profile used when none is selected explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: Vec<ConnectionProfile>,
}

impl Profiles {
    /// Load profiles from `path`. A missing file is an empty profile set,
    /// not an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Save profiles to `path`, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Look up a profile by name.
    pub fn get(&self, name: &str) -> Option<&ConnectionProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// The profile to use when none is named: the configured default, else
    /// the first saved one.
    pub fn default_profile(&self) -> Option<&ConnectionProfile> {
        match &self.default_profile {
            Some(name) => self.get(name),
            None => self.profiles.first(),
        }
    }

    /// Insert or replace a profile by name.
    pub fn upsert(&mut self, profile: ConnectionProfile) {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }
}
