//! Login file handling.
//!
//! Every tool is started with `--login <file>`, a flat YAML mapping holding the
//! API token, the host and whatever parameters the tool needs. Validation is
//! all-or-nothing: every missing key is collected before failing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::DateTime;
use log::warn;
use serde_yaml::Value;

use crate::error::ConfigError;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Raw key/value contents of a login file, rendered to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    path: String,
    values: BTreeMap<String, String>,
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_yaml_str(&display, &text)
    }

    /// Parses `text` as if it had been read from `path`. `path` is only used in
    /// diagnostics.
    pub fn from_yaml_str(path: &str, text: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;

        let mapping = match document {
            Value::Mapping(mapping) => mapping,
            // An empty file parses as null; treat it as a mapping with no keys.
            Value::Null => Default::default(),
            _ => {
                return Err(ConfigError::NotAMapping {
                    path: path.to_string(),
                })
            }
        };

        let mut values = BTreeMap::new();
        for (key, value) in mapping {
            let (Some(key), Some(value)) = (render_scalar(&key), render_scalar(&value)) else {
                continue;
            };
            values.insert(key, value);
        }

        Ok(Self {
            path: path.to_string(),
            values,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the credentials unchanged if every key in `required` is present,
    /// otherwise an error naming all of the missing ones.
    pub fn validate(self, required: &[&str]) -> Result<Self, ConfigError> {
        let missing: Vec<String> = required
            .iter()
            .filter(|key| !self.values.contains_key(**key))
            .map(|key| key.to_string())
            .collect();

        if missing.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::MissingKeys {
                path: self.path,
                missing,
            })
        }
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingKeys {
                path: self.path.clone(),
                missing: vec![key.to_string()],
            })
    }

    fn optional_bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self.get(key) {
            None => Ok(false),
            Some(raw) => raw.parse().map_err(|_| self.invalid(key, raw, "expected true or false")),
        }
    }

    fn invalid(&self, key: &str, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            path: self.path.clone(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// YAML null counts as absent; nested collections are not part of the format.
fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => render_scalar(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Timestamps are sent to the API verbatim; this only warns about obvious typos.
fn check_timestamp(path: &str, key: &str, value: &str) {
    if DateTime::parse_from_rfc3339(value).is_err() {
        warn!(
            "{}: {} '{}' is not an RFC 3339 timestamp, sending it unchanged",
            path, key, value
        );
    }
}

/// Parameters for the paged activity search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub token: String,
    pub host: String,
    pub identifier_type: String,
    pub modified_from: String,
    pub modified_to: String,
    pub page_size: u32,
    /// Spell the upper bound `modidifedTo` on the wire, as the first client did.
    pub legacy_modified_to_key: bool,
    pub show_transactions: bool,
}

impl SearchConfig {
    pub const REQUIRED: &'static [&'static str] =
        &["token", "host", "identifierType", "modifiedFrom", "modifiedTo"];

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_credentials(Credentials::load(path)?)
    }

    pub fn from_credentials(credentials: Credentials) -> Result<Self, ConfigError> {
        let credentials = credentials.validate(Self::REQUIRED)?;

        let page_size = match credentials.get("pageSize") {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => match raw.parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => return Err(credentials.invalid("pageSize", raw, "expected a positive integer")),
            },
        };

        let config = Self {
            token: credentials.required("token")?,
            host: credentials.required("host")?,
            identifier_type: credentials.required("identifierType")?,
            modified_from: credentials.required("modifiedFrom")?,
            modified_to: credentials.required("modifiedTo")?,
            page_size,
            legacy_modified_to_key: credentials.optional_bool("legacyModifiedToKey")?,
            show_transactions: credentials.optional_bool("showTransactions")?,
        };

        check_timestamp(credentials.path(), "modifiedFrom", &config.modified_from);
        check_timestamp(credentials.path(), "modifiedTo", &config.modified_to);
        Ok(config)
    }
}

/// Parameters for rewriting one custom field on a supporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConfig {
    pub token: String,
    pub host: String,
    pub email: String,
    pub field_name: String,
    pub field_value: String,
}

impl UpdateConfig {
    pub const REQUIRED: &'static [&'static str] =
        &["token", "host", "email", "fieldName", "fieldValue"];

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_credentials(Credentials::load(path)?)
    }

    pub fn from_credentials(credentials: Credentials) -> Result<Self, ConfigError> {
        let credentials = credentials.validate(Self::REQUIRED)?;
        Ok(Self {
            token: credentials.required("token")?,
            host: credentials.required("host")?,
            email: credentials.required("email")?,
            field_name: credentials.required("fieldName")?,
            field_value: credentials.required("fieldValue")?,
        })
    }
}

/// Parameters for a plain supporter lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupporterConfig {
    pub token: String,
    pub host: String,
    pub email: String,
}

impl SupporterConfig {
    pub const REQUIRED: &'static [&'static str] = &["token", "host", "email"];

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_credentials(Credentials::load(path)?)
    }

    pub fn from_credentials(credentials: Credentials) -> Result<Self, ConfigError> {
        let credentials = credentials.validate(Self::REQUIRED)?;
        Ok(Self {
            token: credentials.required("token")?,
            host: credentials.required("host")?,
            email: credentials.required("email")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEARCH_YAML: &str = r#"
token:          "your-incredibly-long-token"
host:           "https://api.salsalabs.org"
identifierType: FUNDRAISE
modifiedFrom:   "2018-07-01T00:00:00.000Z"
modifiedTo:     "2018-07-31T23:59:59.999Z"
"#;

    #[test]
    fn search_config_reads_all_keys() {
        let credentials = Credentials::from_yaml_str("login.yaml", SEARCH_YAML).unwrap();
        let config = SearchConfig::from_credentials(credentials).unwrap();
        assert_eq!(config.identifier_type, "FUNDRAISE");
        assert_eq!(config.modified_to, "2018-07-31T23:59:59.999Z");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(!config.legacy_modified_to_key);
        assert!(!config.show_transactions);
    }

    #[test]
    fn validate_reports_every_missing_key() {
        let credentials = Credentials::from_yaml_str("login.yaml", "token: abc\nemail: a@b.org\n").unwrap();
        let err = credentials.validate(UpdateConfig::REQUIRED).unwrap_err();
        let lines = err.diagnostics();
        assert_eq!(
            lines,
            vec![
                "Error: login.yaml must contain a host.",
                "Error: login.yaml must contain a fieldName.",
                "Error: login.yaml must contain a fieldValue.",
            ]
        );
    }

    #[test]
    fn validate_returns_credentials_unchanged() {
        let credentials = Credentials::from_yaml_str("login.yaml", SEARCH_YAML).unwrap();
        let validated = credentials.clone().validate(SearchConfig::REQUIRED).unwrap();
        assert_eq!(validated, credentials);
    }

    #[test]
    fn null_values_count_as_missing() {
        let credentials = Credentials::from_yaml_str("login.yaml", "token: ~\nhost: h\nemail:\n").unwrap();
        let err = SupporterConfig::from_credentials(credentials).unwrap_err();
        match err {
            ConfigError::MissingKeys { missing, .. } => assert_eq!(missing, vec!["token", "email"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_file_is_missing_everything() {
        let credentials = Credentials::from_yaml_str("empty.yaml", "").unwrap();
        let err = credentials.validate(SearchConfig::REQUIRED).unwrap_err();
        assert_eq!(err.diagnostics().len(), SearchConfig::REQUIRED.len());
    }

    #[test]
    fn scalars_are_rendered_as_strings() {
        let credentials =
            Credentials::from_yaml_str("login.yaml", "fieldValue: 42\nflag: true\n").unwrap();
        assert_eq!(credentials.get("fieldValue"), Some("42"));
        assert_eq!(credentials.get("flag"), Some("true"));
    }

    #[test]
    fn sequence_document_is_rejected() {
        let err = Credentials::from_yaml_str("login.yaml", "- token\n- host\n").unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { .. }));
    }

    #[test]
    fn optional_search_keys() {
        let yaml = format!("{SEARCH_YAML}pageSize: 50\nlegacyModifiedToKey: true\nshowTransactions: yes\n");
        let credentials = Credentials::from_yaml_str("login.yaml", &yaml).unwrap();
        let err = SearchConfig::from_credentials(credentials).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "showTransactions"));

        let yaml = format!("{SEARCH_YAML}pageSize: 50\nlegacyModifiedToKey: true\n");
        let credentials = Credentials::from_yaml_str("login.yaml", &yaml).unwrap();
        let config = SearchConfig::from_credentials(credentials).unwrap();
        assert_eq!(config.page_size, 50);
        assert!(config.legacy_modified_to_key);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let yaml = format!("{SEARCH_YAML}pageSize: 0\n");
        let credentials = Credentials::from_yaml_str("login.yaml", &yaml).unwrap();
        assert!(SearchConfig::from_credentials(credentials).is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "token: t\nhost: https://hq.example.org\nemail: someone@whatever.biz\nfieldName: Color\nfieldValue: blue\n"
        )
        .unwrap();
        let config = UpdateConfig::load(file.path()).unwrap();
        assert_eq!(config.email, "someone@whatever.biz");
        assert_eq!(config.field_name, "Color");
        assert_eq!(config.field_value, "blue");
    }

    #[test]
    fn load_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Credentials::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
