//! Grapher options and their YAML configuration file.
//!
//! [`GrapherOptions`] is what the graphers consume. [`GrapherConfig`] is the
//! serializable form read from disk; it expresses the name mangler as an
//! exact-name rename map plus an optional case conversion.

use crate::label::NameMangler;
use crate::style::{Attributes, StyleOverrides};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Options shared by the model and table graphers
#[derive(Debug, Clone)]
pub struct GrapherOptions {
    /// List model attributes
    pub show_attributes: bool,
    /// Append `: type` to attribute and column names
    pub show_datatypes: bool,
    /// List attributes declared on a parent model's table
    pub show_inherited: bool,
    /// List locally declared operations
    pub show_operations: bool,
    /// Label required to-one relationships with `1`
    pub show_multiplicity_one: bool,
    /// List primary key and secondary indexes of tables
    pub show_indexes: bool,
    /// Applied to every displayed name
    pub name_mangler: NameMangler,
    /// Per-category style overrides
    pub style: StyleOverrides,
    /// Passed through as graph attributes
    pub graph_options: Attributes,
    /// Entity names left out of the graph (case-insensitive)
    pub skip: Vec<String>,
}

impl Default for GrapherOptions {
    fn default() -> Self {
        Self {
            show_attributes: true,
            show_datatypes: true,
            show_inherited: true,
            show_operations: false,
            show_multiplicity_one: false,
            show_indexes: true,
            name_mangler: NameMangler::identity(),
            style: StyleOverrides::new(),
            graph_options: Attributes::new(),
            skip: Vec::new(),
        }
    }
}

/// Case conversion applied to displayed names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    #[default]
    Preserve,
    Upper,
    Lower,
}

impl FromStr for NameCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preserve" => Ok(NameCase::Preserve),
            "upper" => Ok(NameCase::Upper),
            "lower" => Ok(NameCase::Lower),
            _ => Err(format!(
                "Unknown case: {}. Valid options: preserve, upper, lower",
                s
            )),
        }
    }
}

impl fmt::Display for NameCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameCase::Preserve => write!(f, "preserve"),
            NameCase::Upper => write!(f, "upper"),
            NameCase::Lower => write!(f, "lower"),
        }
    }
}

/// Complete YAML configuration for the graph commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GrapherConfig {
    pub show_attributes: bool,
    pub show_datatypes: bool,
    pub show_inherited: bool,
    pub show_operations: bool,
    pub show_multiplicity_one: bool,
    pub show_indexes: bool,
    /// Exact display-name replacements
    pub rename: BTreeMap<String, String>,
    /// Case conversion, applied after `rename`
    pub case: NameCase,
    pub style: StyleOverrides,
    pub graph_options: Attributes,
    pub skip: Vec<String>,
}

impl Default for GrapherConfig {
    fn default() -> Self {
        let options = GrapherOptions::default();
        Self {
            show_attributes: options.show_attributes,
            show_datatypes: options.show_datatypes,
            show_inherited: options.show_inherited,
            show_operations: options.show_operations,
            show_multiplicity_one: options.show_multiplicity_one,
            show_indexes: options.show_indexes,
            rename: BTreeMap::new(),
            case: NameCase::Preserve,
            style: options.style,
            graph_options: options.graph_options,
            skip: options.skip,
        }
    }
}

impl GrapherConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: GrapherConfig = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Build the mangler described by `rename` and `case`
    pub fn name_mangler(&self) -> NameMangler {
        if self.rename.is_empty() && self.case == NameCase::Preserve {
            return NameMangler::identity();
        }
        let rename = self.rename.clone();
        let case = self.case;
        NameMangler::new(move |name| {
            let renamed = rename.get(name).map(String::as_str).unwrap_or(name);
            match case {
                NameCase::Preserve => renamed.to_string(),
                NameCase::Upper => renamed.to_uppercase(),
                NameCase::Lower => renamed.to_lowercase(),
            }
        })
    }

    pub fn into_options(self) -> GrapherOptions {
        let name_mangler = self.name_mangler();
        GrapherOptions {
            show_attributes: self.show_attributes,
            show_datatypes: self.show_datatypes,
            show_inherited: self.show_inherited,
            show_operations: self.show_operations,
            show_multiplicity_one: self.show_multiplicity_one,
            show_indexes: self.show_indexes,
            name_mangler,
            style: self.style,
            graph_options: self.graph_options,
            skip: self.skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::AttrValue;

    #[test]
    fn test_defaults() {
        let options = GrapherOptions::default();
        assert!(options.show_attributes);
        assert!(options.show_datatypes);
        assert!(options.show_inherited);
        assert!(!options.show_operations);
        assert!(!options.show_multiplicity_one);
        assert!(options.show_indexes);
        assert_eq!(options.name_mangler.apply("Parent"), "Parent");
    }

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r##"
show_datatypes: false
show_operations: true
case: upper
rename:
  favourite_toy: fav
style:
  relationship:
    color: "#336699"
    penwidth: 2
graph_options:
  rankdir: LR
skip:
  - migrations
"##;
        let config: GrapherConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert!(!config.show_datatypes);
        assert!(config.show_attributes);
        assert_eq!(config.case, NameCase::Upper);
        assert_eq!(
            config.style["relationship"].get("penwidth"),
            Some(&AttrValue::Int(2))
        );

        let options = config.into_options();
        assert!(options.show_operations);
        assert_eq!(options.skip, vec!["migrations".to_string()]);
        assert_eq!(
            options.graph_options.get("rankdir"),
            Some(&AttrValue::from("LR"))
        );
        assert_eq!(options.name_mangler.apply("favourite_toy"), "FAV");
        assert_eq!(options.name_mangler.apply("owner"), "OWNER");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: GrapherConfig = serde_yaml_ng::from_str("{}").unwrap();
        assert_eq!(config, GrapherConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.yaml");
        fs::write(&path, "show_indexes: false\ncase: lower\n").unwrap();

        let config = GrapherConfig::load(&path).unwrap();
        assert!(!config.show_indexes);
        assert_eq!(config.name_mangler().apply("Toy"), "toy");
    }

    #[test]
    fn test_case_parsing() {
        assert_eq!("UPPER".parse::<NameCase>(), Ok(NameCase::Upper));
        assert!("title".parse::<NameCase>().is_err());
    }
}
