//! Configuration parsing for analysis runs
//!
//! This module provides TOML-based configuration for a run: where the
//! catalog CSV files live, where results are written, and which stereotype
//! names count as valid OntoUML vocabulary for classes and relations.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{EntityKind, NONE_KEY, OTHER_KEY};

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory holding the CSV files produced by catalog loading and querying
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Root directory for every generated CSV file
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// Last year of the "until" cohort; the "after" cohort starts the year after
    #[serde(default = "default_split_year")]
    pub split_year: i32,
    /// Valid OntoUML class stereotypes
    #[serde(default = "default_class_allowlist")]
    pub stereotype_allowlist_classes: Vec<String>,
    /// Valid OntoUML relation stereotypes
    #[serde(default = "default_relation_allowlist")]
    pub stereotype_allowlist_relations: Vec<String>,
    /// Input file names, relative to `catalog_path`
    #[serde(default)]
    pub inputs: InputFiles,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            output_root: default_output_root(),
            split_year: default_split_year(),
            stereotype_allowlist_classes: default_class_allowlist(),
            stereotype_allowlist_relations: default_relation_allowlist(),
            inputs: InputFiles::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - An allow-list contains a reserved stereotype key
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ontouml_stats::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("analysis.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use ontouml_stats::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     catalog_path = "outputs/01_loaded_data"
    ///     output_root = "outputs/02_datasets"
    ///     stereotype_allowlist_classes = ["kind", "role"]
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.stereotype_allowlist_classes.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject allow-lists that would classify reserved keys as valid.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (kind, list) in [
            (EntityKind::Class, &self.stereotype_allowlist_classes),
            (EntityKind::Relation, &self.stereotype_allowlist_relations),
        ] {
            for reserved in [NONE_KEY, OTHER_KEY] {
                if list.iter().any(|name| name == reserved) {
                    bail!(
                        "The {} allow-list must not contain the reserved key '{}'",
                        kind,
                        reserved
                    );
                }
            }
        }
        Ok(())
    }

    /// The allow-lists as lookup sets.
    pub fn allowlists(&self) -> StereotypeAllowlists {
        StereotypeAllowlists::new(
            self.stereotype_allowlist_classes.iter().cloned(),
            self.stereotype_allowlist_relations.iter().cloned(),
        )
    }

    pub fn models_path(&self) -> PathBuf {
        self.catalog_path.join(&self.inputs.models_file)
    }

    pub fn stereotypes_path(&self, kind: EntityKind) -> PathBuf {
        match kind {
            EntityKind::Class => self.catalog_path.join(&self.inputs.class_stereotypes_file),
            EntityKind::Relation => self
                .catalog_path
                .join(&self.inputs.relation_stereotypes_file),
        }
    }

    pub fn totals_path(&self) -> PathBuf {
        self.catalog_path.join(&self.inputs.totals_file)
    }
}

/// Names of the collaborator CSV files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputFiles {
    /// `model, year, is_classroom`
    #[serde(default = "default_models_file")]
    pub models_file: String,
    /// `model` + one column per class stereotype
    #[serde(default = "default_class_stereotypes_file")]
    pub class_stereotypes_file: String,
    /// `model` + one column per relation stereotype
    #[serde(default = "default_relation_stereotypes_file")]
    pub relation_stereotypes_file: String,
    /// Optional `model, total_class_number, total_relation_number`
    #[serde(default = "default_totals_file")]
    pub totals_file: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            models_file: default_models_file(),
            class_stereotypes_file: default_class_stereotypes_file(),
            relation_stereotypes_file: default_relation_stereotypes_file(),
            totals_file: default_totals_file(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("outputs/01_loaded_data")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("outputs/02_datasets")
}

fn default_split_year() -> i32 {
    2018
}

fn default_models_file() -> String {
    "models_data.csv".to_string()
}

fn default_class_stereotypes_file() -> String {
    "class_stereotypes.csv".to_string()
}

fn default_relation_stereotypes_file() -> String {
    "relation_stereotypes.csv".to_string()
}

fn default_totals_file() -> String {
    "model_totals.csv".to_string()
}

/// OntoUML class stereotype vocabulary.
pub const ONTOUML_CLASS_STEREOTYPES: [&str; 21] = [
    "abstract",
    "category",
    "collective",
    "datatype",
    "enumeration",
    "event",
    "historicalRole",
    "historicalRoleMixin",
    "kind",
    "mixin",
    "mode",
    "phase",
    "phaseMixin",
    "quality",
    "quantity",
    "relator",
    "role",
    "roleMixin",
    "situation",
    "subkind",
    "type",
];

/// OntoUML relation stereotype vocabulary.
pub const ONTOUML_RELATION_STEREOTYPES: [&str; 19] = [
    "bringsAbout",
    "characterization",
    "comparative",
    "componentOf",
    "creation",
    "derivation",
    "externalDependence",
    "historicalDependence",
    "instantiation",
    "manifestation",
    "material",
    "mediation",
    "memberOf",
    "participation",
    "participational",
    "subCollectionOf",
    "subQuantityOf",
    "termination",
    "triggers",
];

fn default_class_allowlist() -> Vec<String> {
    ONTOUML_CLASS_STEREOTYPES.iter().map(|s| s.to_string()).collect()
}

fn default_relation_allowlist() -> Vec<String> {
    ONTOUML_RELATION_STEREOTYPES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Valid stereotype names per entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereotypeAllowlists {
    classes: BTreeSet<String>,
    relations: BTreeSet<String>,
}

impl StereotypeAllowlists {
    pub fn new<C, R>(classes: C, relations: R) -> Self
    where
        C: IntoIterator<Item = String>,
        R: IntoIterator<Item = String>,
    {
        Self {
            classes: classes.into_iter().collect(),
            relations: relations.into_iter().collect(),
        }
    }

    pub fn for_kind(&self, kind: EntityKind) -> &BTreeSet<String> {
        match kind {
            EntityKind::Class => &self.classes,
            EntityKind::Relation => &self.relations,
        }
    }

    pub fn contains(&self, kind: EntityKind, stereotype: &str) -> bool {
        self.for_kind(kind).contains(stereotype)
    }
}

impl Default for StereotypeAllowlists {
    fn default() -> Self {
        Self::new(default_class_allowlist(), default_relation_allowlist())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.split_year, 2018);
        assert_eq!(config.stereotype_allowlist_classes.len(), 21);
        assert_eq!(config.stereotype_allowlist_relations.len(), 19);
        assert_eq!(config.inputs.models_file, "models_data.csv");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            catalog_path = "/data/catalog"
            output_root = "/data/out"
            split_year = 2015
            stereotype_allowlist_classes = ["kind", "subkind"]
            stereotype_allowlist_relations = ["material"]

            [inputs]
            models_file = "models.csv"
            class_stereotypes_file = "cs.csv"
            relation_stereotypes_file = "rs.csv"
            totals_file = "totals.csv"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("/data/catalog"));
        assert_eq!(config.output_root, PathBuf::from("/data/out"));
        assert_eq!(config.split_year, 2015);
        assert_eq!(config.models_path(), PathBuf::from("/data/catalog/models.csv"));
        assert_eq!(
            config.stereotypes_path(EntityKind::Relation),
            PathBuf::from("/data/catalog/rs.csv")
        );
        assert_eq!(config.totals_path(), PathBuf::from("/data/catalog/totals.csv"));

        let allowlists = config.allowlists();
        assert!(allowlists.contains(EntityKind::Class, "subkind"));
        assert!(!allowlists.contains(EntityKind::Class, "material"));
        assert!(allowlists.contains(EntityKind::Relation, "material"));
    }

    #[test]
    fn test_reserved_key_in_allowlist_is_rejected() {
        let toml = r#"stereotype_allowlist_relations = ["material", "other"]"#;
        let err = Config::from_str(toml).unwrap_err();
        assert!(err.to_string().contains("reserved key 'other'"));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(Config::from_str("split_year = \"soon\"").is_err());
    }

    #[test]
    fn test_default_allowlists_exclude_reserved_keys() {
        let allowlists = StereotypeAllowlists::default();
        for kind in EntityKind::ALL {
            assert!(!allowlists.contains(kind, NONE_KEY));
            assert!(!allowlists.contains(kind, OTHER_KEY));
        }
        assert!(allowlists.contains(EntityKind::Class, "kind"));
    }
}
