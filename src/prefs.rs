//! User preferences persistence.
//!
//! Optional trace defaults read from ~/.config/hoptrace/config.toml.
//! Command-line flags win over anything set here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{IpVersion, ProbeProtocol};

/// User preferences
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ttl: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_hop: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ProbeProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<IpVersion>,
    /// Probe timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Reverse DNS lookups (default on)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<bool>,
}

impl Prefs {
    /// Get config file path: ~/.config/hoptrace/config.toml
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hoptrace").join("config.toml"))
    }

    /// Load preferences from disk (returns default if missing/invalid)
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load preferences from a specific file
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&text) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid preferences file");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefs_default() {
        let prefs = Prefs::default();
        assert!(prefs.max_ttl.is_none());
        assert!(prefs.protocol.is_none());
        assert!(prefs.dns.is_none());
    }

    #[test]
    fn test_prefs_serialization() {
        let prefs = Prefs {
            max_ttl: Some(20),
            protocol: Some(ProbeProtocol::Udp),
            ip_version: Some(IpVersion::V6),
            timeout: Some(1.5),
            ..Prefs::default()
        };
        let toml_str = toml::to_string_pretty(&prefs).unwrap();
        assert!(toml_str.contains("max_ttl = 20"));
        assert!(toml_str.contains("protocol = \"udp\""));
        assert!(toml_str.contains("ip_version = \"6\""));
        assert!(!toml_str.contains("first_hop"));

        let loaded: Prefs = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_prefs_partial_file() {
        let loaded: Prefs = toml::from_str("dns = false\n").unwrap();
        assert_eq!(loaded.dns, Some(false));
        assert!(loaded.max_ttl.is_none());
    }

    #[test]
    fn test_load_from_missing_or_invalid_file() {
        let dir = std::env::temp_dir().join(format!("hoptrace-prefs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(Prefs::load_from(&dir.join("missing.toml")), Prefs::default());

        let bad = dir.join("bad.toml");
        fs::write(&bad, "max_ttl = \"lots\"").unwrap();
        assert_eq!(Prefs::load_from(&bad), Prefs::default());

        let good = dir.join("good.toml");
        fs::write(&good, "first_hop = 3\nprotocol = \"icmp\"\n").unwrap();
        let prefs = Prefs::load_from(&good);
        assert_eq!(prefs.first_hop, Some(3));
        assert_eq!(prefs.protocol, Some(ProbeProtocol::Icmp));

        let _ = fs::remove_dir_all(&dir);
    }
}
