//! Provider seed list loaded from `config/providers.yaml`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::TechnologyType;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSeed {
    pub name: String,
    pub url: String,
    /// Defaults to a slug derived from the name when absent.
    pub slug: Option<String>,
    /// Default technology for plans this provider sells; individual plans
    /// may still be classified differently by the parser.
    pub technology: Option<TechnologyType>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub notes: Option<String>,
}

fn default_active() -> bool {
    true
}

impl ProviderSeed {
    /// The provider's slug: explicit when configured, otherwise derived
    /// from the display name (lowercased, non-alphanumerics collapsed to
    /// single dashes).
    #[must_use]
    pub fn slug(&self) -> String {
        if let Some(slug) = &self.slug {
            return slug.clone();
        }
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct ProvidersFile {
    pub providers: Vec<ProviderSeed>,
}

/// Load and validate the provider seed list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation (empty list, duplicate slugs, non-http urls).
pub fn load_providers(path: &Path) -> Result<ProvidersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProvidersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ProvidersFile = serde_yaml::from_str(&content)?;
    validate_providers(&file)?;

    Ok(file)
}

fn validate_providers(file: &ProvidersFile) -> Result<(), ConfigError> {
    if file.providers.is_empty() {
        return Err(ConfigError::InvalidProviders(
            "providers list is empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for provider in &file.providers {
        let slug = provider.slug();
        if slug.is_empty() {
            return Err(ConfigError::InvalidProviders(format!(
                "provider \"{}\" produces an empty slug",
                provider.name
            )));
        }
        if !seen.insert(slug.clone()) {
            return Err(ConfigError::InvalidProviders(format!(
                "duplicate provider slug: {slug}"
            )));
        }
        if !provider.url.starts_with("http://") && !provider.url.starts_with("https://") {
            return Err(ConfigError::InvalidProviders(format!(
                "provider \"{}\" has a non-http url: {}",
                provider.name, provider.url
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(name: &str, url: &str) -> ProviderSeed {
        ProviderSeed {
            name: name.to_string(),
            url: url.to_string(),
            slug: None,
            technology: None,
            active: true,
            notes: None,
        }
    }

    #[test]
    fn slug_is_derived_from_name() {
        assert_eq!(
            seed("Aussie Broadband", "https://x").slug(),
            "aussie-broadband"
        );
        assert_eq!(seed("TPG", "https://x").slug(), "tpg");
        assert_eq!(seed("Mate  Communicate!", "https://x").slug(), "mate-communicate");
    }

    #[test]
    fn explicit_slug_wins() {
        let mut s = seed("Telstra Limited", "https://x");
        s.slug = Some("telstra".to_string());
        assert_eq!(s.slug(), "telstra");
    }

    #[test]
    fn duplicate_slugs_are_rejected() {
        let file = ProvidersFile {
            providers: vec![
                seed("Exetel", "https://exetel.com.au"),
                seed("Exetel", "https://exetel.com.au/nbn"),
            ],
        };
        let err = validate_providers(&file).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProviders(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let file = ProvidersFile {
            providers: vec![seed("Optus", "ftp://optus.com.au")],
        };
        assert!(validate_providers(&file).is_err());
    }

    #[test]
    fn parses_yaml_document() {
        let yaml = r"
providers:
  - name: Aussie Broadband
    url: https://www.aussiebroadband.com.au/internet/nbn-plans/
  - name: Telstra
    url: https://www.telstra.com.au/internet/nbn
    technology: standard
    active: false
";
        let file: ProvidersFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.providers.len(), 2);
        assert!(!file.providers[1].active);
        assert!(validate_providers(&file).is_ok());
    }
}
