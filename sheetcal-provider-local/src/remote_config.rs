//! Local-provider remote configuration.
//!
//! Typed view of the `[remote]` params sheetcal passes along with every
//! request.

use std::path::PathBuf;

use anyhow::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRemoteConfig {
    pub local_path: PathBuf,
}

impl LocalRemoteConfig {
    /// `<data_dir>/sheetcal/local.json`
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(data_dir.join("sheetcal").join("local.json"))
    }
}

impl TryFrom<&serde_json::Map<String, serde_json::Value>> for LocalRemoteConfig {
    type Error = anyhow::Error;

    fn try_from(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let local_path = match map.get("local_path") {
            Some(value) => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| anyhow::anyhow!("local_path must be a string"))?;
                PathBuf::from(shellexpand::tilde(raw).into_owned())
            }
            None => Self::default_path()?,
        };

        Ok(Self { local_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path() {
        let mut map = serde_json::Map::new();
        map.insert("local_path".into(), "/tmp/cal.json".into());
        let config = LocalRemoteConfig::try_from(&map).unwrap();
        assert_eq!(config.local_path, PathBuf::from("/tmp/cal.json"));
    }

    #[test]
    fn test_non_string_path_is_rejected() {
        let mut map = serde_json::Map::new();
        map.insert("local_path".into(), 42.into());
        assert!(LocalRemoteConfig::try_from(&map).is_err());
    }
}
