// Reconciliation settings
// Loaded from ~/.config/tsrecon/settings.toml

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use tsrecon_engine::alias::TRADE_ID;
use tsrecon_engine::config::{DEFAULT_DATE_TOLERANCE_DAYS, DEFAULT_NUMERIC_TOLERANCE};
use tsrecon_engine::{AliasTable, CanonicalField, ReconConfig, TextMatch};
use tsrecon_io::ReportFormat;

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    Io { path: PathBuf, message: String },
    Parse(String),
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io { path, message } => {
                write!(f, "cannot read settings {}: {}", path.display(), message)
            }
            SettingsError::Parse(msg) => write!(f, "invalid settings TOML: {}", msg),
            SettingsError::Invalid(msg) => write!(f, "invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToleranceSettings {
    pub date_tolerance_days: i64,
    pub numeric_tolerance: f64,
}

impl Default for ToleranceSettings {
    fn default() -> Self {
        Self {
            date_tolerance_days: DEFAULT_DATE_TOLERANCE_DAYS,
            numeric_tolerance: DEFAULT_NUMERIC_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextSettings {
    pub case_sensitive: bool,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self { case_sensitive: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Report directory, relative to the working directory.
    pub dir: PathBuf,
    pub formats: Vec<ReportFormat>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("outputs"),
            formats: vec![ReportFormat::Csv, ReportFormat::Markdown],
        }
    }
}

/// Settings file contents. Every table is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Only reconcile booking records carrying the term sheet's ISIN.
    pub filter_by_isin: bool,
    pub tolerance: ToleranceSettings,
    pub text: TextSettings,
    /// Replaces the default alias list of a canonical name.
    pub aliases: BTreeMap<String, Vec<String>>,
    /// Appended after the default (or replaced) aliases.
    pub extra_aliases: BTreeMap<String, Vec<String>>,
    pub output: OutputSettings,
}

impl Settings {
    /// `<config dir>/tsrecon/settings.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tsrecon").join("settings.toml"))
    }

    /// Load an explicitly named settings file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings = Self::from_toml_str(&contents)?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load the per-user settings file, falling back to defaults when absent.
    pub fn load_default() -> Result<Self, SettingsError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse and validate settings TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            toml::from_str(contents).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.recon_config()?;

        for (table, entries) in [("aliases", &self.aliases), ("extra_aliases", &self.extra_aliases)] {
            for (canonical, list) in entries {
                if canonical != TRADE_ID && canonical.parse::<CanonicalField>().is_err() {
                    return Err(SettingsError::Invalid(format!(
                        "[{}] names unknown canonical field '{}'",
                        table, canonical
                    )));
                }
                if list.iter().any(|alias| alias.trim().is_empty()) {
                    return Err(SettingsError::Invalid(format!(
                        "[{}] {}: aliases must not be empty",
                        table, canonical
                    )));
                }
            }
        }

        if self.output.formats.is_empty() {
            return Err(SettingsError::Invalid(
                "[output] formats must name at least one format (use --no-reports to skip reports)"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Engine configuration described by these settings.
    pub fn recon_config(&self) -> Result<ReconConfig, SettingsError> {
        let text_match = if self.text.case_sensitive {
            TextMatch::CaseSensitive
        } else {
            TextMatch::CaseInsensitive
        };
        let config = ReconConfig::new(
            self.tolerance.date_tolerance_days,
            self.tolerance.numeric_tolerance,
        )
        .map_err(|e| SettingsError::Invalid(e.to_string()))?;
        Ok(config.with_text_match(text_match).with_isin_filter(self.filter_by_isin))
    }

    /// Default bond aliases with `[aliases]` replacements and `[extra_aliases]`
    /// appended.
    pub fn alias_table(&self) -> AliasTable {
        let mut table = AliasTable::bond_defaults();
        for (canonical, list) in &self.aliases {
            table.set(canonical.clone(), list.clone());
        }
        for (canonical, list) in &self.extra_aliases {
            table.extend(canonical.clone(), list.iter().cloned());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.recon_config().unwrap(), ReconConfig::default());
        assert_eq!(settings.alias_table(), AliasTable::bond_defaults());
        assert_eq!(settings.output.dir, PathBuf::from("outputs"));
    }

    #[test]
    fn test_full_file() {
        let settings = Settings::from_toml_str(
            r#"
filter_by_isin = true

[tolerance]
date_tolerance_days = 2
numeric_tolerance = 0.01

[text]
case_sensitive = false

[aliases]
coupon_rate = ["Cpn", "Coupon"]

[extra_aliases]
issuer = ["Emittent"]

[output]
dir = "reports"
formats = ["json"]
"#,
        )
        .unwrap();

        let config = settings.recon_config().unwrap();
        assert_eq!(config.date_tolerance_days(), 2);
        assert_eq!(config.numeric_tolerance(), 0.01);
        assert_eq!(config.text_match(), TextMatch::CaseInsensitive);
        assert!(config.filter_by_isin());

        let table = settings.alias_table();
        assert_eq!(table.aliases_for("coupon_rate"), ["Cpn", "Coupon"]);
        assert_eq!(table.aliases_for("issuer").last().map(String::as_str), Some("Emittent"));
        assert_eq!(table.aliases_for("isin"), ["ISIN", "Isin"]);

        assert_eq!(settings.output.formats, vec![ReportFormat::Json]);
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let settings = Settings::from_toml_str("[tolerance]\ndate_tolerance_days = 3\n").unwrap();
        assert_eq!(settings.tolerance.date_tolerance_days, 3);
        assert_eq!(settings.tolerance.numeric_tolerance, DEFAULT_NUMERIC_TOLERANCE);
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let err = Settings::from_toml_str("[tolerance]\nnumeric_tolerance = -0.5\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(err.to_string().contains("numeric_tolerance"));

        let err = Settings::from_toml_str("[tolerance]\ndate_tolerance_days = -1\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_keys_and_fields() {
        let err = Settings::from_toml_str("[tolerance]\nnumeric = 1\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));

        let err = Settings::from_toml_str("[aliases]\nnotional = [\"Notional\"]\n").unwrap_err();
        assert!(err.to_string().contains("notional"));

        let err = Settings::from_toml_str("[extra_aliases]\nissuer = [\" \"]\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let err = Settings::from_toml_str("[output]\nformats = [\"pdf\"]\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));

        let err = Settings::from_toml_str("[output]\nformats = []\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_trade_id_aliases_allowed() {
        let settings = Settings::from_toml_str("[extra_aliases]\ntrade_id = [\"DealNo\"]\n").unwrap();
        assert!(settings.alias_table().aliases_for(TRADE_ID).contains(&"DealNo".to_string()));
    }

    #[test]
    fn test_default_path_location() {
        if let Some(path) = Settings::default_path() {
            assert!(path.ends_with("tsrecon/settings.toml"));
        }
    }
}
