// Grantee registry: the list of grantees a batch scrapes, each with a
// website to scan and/or known profile URLs.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use presence_common::Platform;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranteeTarget {
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    /// Known profile URLs or handles. These win over links found on the website.
    #[serde(default)]
    pub profiles: BTreeMap<Platform, String>,
}

impl GranteeTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            website: None,
            profiles: BTreeMap::new(),
        }
    }

    pub fn with_website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn with_profile(mut self, platform: Platform, input: impl Into<String>) -> Self {
        self.profiles.insert(platform, input.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryFile {
    List(Vec<GranteeTarget>),
    Wrapped { grantees: Vec<GranteeTarget> },
}

/// Parse a registry document: either a bare array of grantees or
/// `{ "grantees": [...] }`.
pub fn parse_registry(json: &str) -> Result<Vec<GranteeTarget>> {
    let file: RegistryFile = serde_json::from_str(json).context("Invalid grantee registry")?;
    let targets = match file {
        RegistryFile::List(targets) | RegistryFile::Wrapped { grantees: targets } => targets,
    };
    if let Some(blank) = targets.iter().position(|t| t.name.trim().is_empty()) {
        anyhow::bail!("Grantee #{} has an empty name", blank + 1);
    }
    Ok(targets)
}

pub fn load_registry(path: impl AsRef<Path>) -> Result<Vec<GranteeTarget>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read registry {}", path.display()))?;
    parse_registry(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let targets = parse_registry(
            r#"[
                {"name": "Park Friends", "website": "https://parkfriends.org"},
                {"name": "River Trust", "profiles": {"instagram": "@rivertrust", "x": "rivertrust"}}
            ]"#,
        );
        // "x" is not a serde name for Platform
        assert!(targets.is_err());

        let targets = parse_registry(
            r#"[
                {"name": "Park Friends", "website": "https://parkfriends.org"},
                {"name": "River Trust", "profiles": {"instagram": "@rivertrust", "twitter": "rivertrust"}}
            ]"#,
        )
        .unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].website.as_deref(), Some("https://parkfriends.org"));
        assert_eq!(targets[1].profiles[&Platform::Instagram], "@rivertrust");
    }

    #[test]
    fn parses_wrapped_form() {
        let targets = parse_registry(r#"{"grantees": [{"name": "Solo"}]}"#).unwrap();
        assert_eq!(targets, vec![GranteeTarget::new("Solo")]);
    }

    #[test]
    fn rejects_blank_names() {
        assert!(parse_registry(r#"[{"name": "  "}]"#).is_err());
    }
}
