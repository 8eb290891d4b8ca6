// src/infra/session.rs — Local user profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::infra::paths;

/// The locally signed-in user. Generation works without one; campaigns are
/// tagged with the profile name when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(name: &str, email: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            email: email.map(|e| e.to_string()),
            created_at: Utc::now(),
        }
    }

    /// Load the stored profile, if any.
    pub fn load() -> Option<Profile> {
        let path = paths::profile_path();
        let content = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = paths::profile_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn clear() -> anyhow::Result<()> {
        let path = paths::profile_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_new() {
        let p = Profile::new("Ada", Some("ada@example.com"));
        assert_eq!(p.name, "Ada");
        assert_eq!(p.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_profile_serde_roundtrip() {
        let p = Profile::new("Ada", None);
        let json = serde_json::to_string(&p).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "Ada");
        assert!(back.email.is_none());
    }
}
