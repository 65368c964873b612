//! Settings loaded from the `[API]` section of an INI file

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{Ini, ParseOption, Properties};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.ini";
pub const DEFAULT_URL: &str = "https://steamcommunity.com/market/priceoverview/";
pub const DEFAULT_FILE_NAME: &str = "scripExcel.xlsx";
pub const DEFAULT_CURRENCY: &str = "9";
pub const DEFAULT_DELAY_SECS: u64 = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const SECTION: &str = "API";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error reading configuration file: {0}")]
    Load(#[from] ini::Error),
    #[error("Error reading configuration file: missing section [{0}]")]
    MissingSection(&'static str),
    #[error("Error reading configuration file: missing key '{0}'")]
    MissingKey(&'static str),
    #[error("Error parsing configuration value '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("Error parsing configuration value 'my_items': {0}")]
    Catalog(#[from] serde_json::Error),
}

/// Ordered namespace (Steam app id) -> item names mapping
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    namespaces: Vec<(String, Vec<String>)>,
}

impl Catalog {
    pub fn new(namespaces: Vec<(String, Vec<String>)>) -> Self {
        Catalog { namespaces }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// All (namespace, item) pairs, namespace order then item order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces.iter().flat_map(|(namespace, items)| {
            items.iter().map(move |item| (namespace.as_str(), item.as_str()))
        })
    }

    pub fn item_count(&self) -> usize {
        self.namespaces.iter().map(|(_, items)| items.len()).sum()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping app ids to lists of item names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Catalog, A::Error> {
        let mut namespaces = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((namespace, items)) = access.next_entry::<String, Vec<String>>()? {
            namespaces.push((namespace, items));
        }
        Ok(Catalog { namespaces })
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Immutable run settings, built once at startup
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub url: String,
    pub file_name: PathBuf,
    pub currency: String,
    pub delay: Duration,
    /// Number of leading catalog entries to skip
    pub offset: usize,
    pub timeout: Duration,
    pub items: Catalog,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            url: DEFAULT_URL.to_owned(),
            file_name: PathBuf::from(DEFAULT_FILE_NAME),
            currency: DEFAULT_CURRENCY.to_owned(),
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
            offset: 0,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            items: Catalog::default(),
        }
    }
}

/// Values are taken as written: `my_items` is JSON and needs its backslashes
/// and quotes untouched.
fn parse_option() -> ParseOption {
    ParseOption { enabled_quote: false, enabled_escape: false, ..ParseOption::default() }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file_opt(path, parse_option())?;
        Self::from_ini(&ini)
    }

    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str_opt(text, parse_option()).map_err(ini::Error::Parse)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let section = ini.section(Some(SECTION)).ok_or(ConfigError::MissingSection(SECTION))?;

        let delay = parse_u64(section, "delay")?;
        let offset = parse_u64(section, "offset")?;
        let timeout = match lookup(section, "timeout") {
            Some(_) => parse_u64(section, "timeout")?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let offset = usize::try_from(offset)
            .map_err(|err| ConfigError::InvalidValue { key: "offset", reason: err.to_string() })?;

        Ok(Settings {
            url: required(section, "url")?.to_owned(),
            file_name: PathBuf::from(required(section, "file_name")?),
            currency: required(section, "currency")?.to_owned(),
            delay: Duration::from_secs(delay),
            offset,
            timeout: Duration::from_secs(timeout),
            items: Catalog::from_json(required(section, "my_items")?)?,
        })
    }
}

// Keys are case-insensitive, sections are not
fn lookup<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, value)| value.trim())
}

fn required<'a>(section: &'a Properties, key: &'static str) -> Result<&'a str, ConfigError> {
    lookup(section, key).ok_or(ConfigError::MissingKey(key))
}

fn parse_u64(section: &Properties, key: &'static str) -> Result<u64, ConfigError> {
    required(section, key)?
        .parse::<u64>()
        .map_err(|err| ConfigError::InvalidValue { key, reason: err.to_string() })
}
