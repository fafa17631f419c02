use crate::core::models::residue::ResidueKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Contact cutoff in Ångström used when none is configured.
pub const DEFAULT_CONTACT_CUTOFF: f64 = 3.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration in '{path}': {source}")]
    Invalid { path: String, source: ConfigError },
}

/// Which residues take part in contact detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResidueClass {
    #[default]
    NucleicAcid,
    AminoAcid,
    All,
}

impl ResidueClass {
    pub fn matches(&self, kind: &ResidueKind) -> bool {
        match self {
            ResidueClass::NucleicAcid => kind.is_nucleic_acid(),
            ResidueClass::AminoAcid => kind.is_amino_acid(),
            ResidueClass::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub cutoff: f64,
    pub residue_class: ResidueClass,
    /// Atom-set registry overriding the built-in entries.
    pub topology_path: Option<PathBuf>,
    /// Calibrated mixture table replacing the built-in one.
    pub mixture_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CONTACT_CUTOFF,
            residue_class: ResidueClass::default(),
            topology_path: None,
            mixture_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PipelineConfigFile {
    cutoff: Option<f64>,
    residue_class: Option<ResidueClass>,
    topology_path: Option<PathBuf>,
    mixture_path: Option<PathBuf>,
}

impl PipelineConfig {
    /// Reads a TOML configuration file. Relative resource paths are resolved against
    /// the directory holding the file.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        let file: PipelineConfigFile =
            toml::from_str(&content).map_err(|e| ConfigLoadError::Toml {
                path: path_str.clone(),
                source: e,
            })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let resolve = |p: PathBuf| if p.is_relative() { base_dir.join(p) } else { p };

        let mut builder = PipelineConfigBuilder::new();
        if let Some(cutoff) = file.cutoff {
            builder = builder.cutoff(cutoff);
        }
        if let Some(class) = file.residue_class {
            builder = builder.residue_class(class);
        }
        if let Some(p) = file.topology_path {
            builder = builder.topology_path(resolve(p));
        }
        if let Some(p) = file.mixture_path {
            builder = builder.mixture_path(resolve(p));
        }
        builder.build().map_err(|e| ConfigLoadError::Invalid {
            path: path_str,
            source: e,
        })
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    cutoff: Option<f64>,
    residue_class: Option<ResidueClass>,
    topology_path: Option<PathBuf>,
    mixture_path: Option<PathBuf>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn residue_class(mut self, class: ResidueClass) -> Self {
        self.residue_class = Some(class);
        self
    }
    pub fn topology_path(mut self, path: PathBuf) -> Self {
        self.topology_path = Some(path);
        self
    }
    pub fn mixture_path(mut self, path: PathBuf) -> Self {
        self.mixture_path = Some(path);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let cutoff = self.cutoff.unwrap_or(DEFAULT_CONTACT_CUTOFF);
        if !cutoff.is_finite() || cutoff < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "cutoff",
                reason: format!("expected a finite, non-negative distance, got {}", cutoff),
            });
        }
        Ok(PipelineConfig {
            cutoff,
            residue_class: self.residue_class.unwrap_or_default(),
            topology_path: self.topology_path,
            mixture_path: self.mixture_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn builder_uses_defaults() {
        let config = PipelineConfigBuilder::new().build().unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.cutoff, 3.0);
        assert_eq!(config.residue_class, ResidueClass::NucleicAcid);
    }

    #[test]
    fn builder_sets_every_field() {
        let config = PipelineConfigBuilder::new()
            .cutoff(4.5)
            .residue_class(ResidueClass::All)
            .topology_path(PathBuf::from("topology.toml"))
            .mixture_path(PathBuf::from("mixture.csv"))
            .build()
            .unwrap();
        assert_eq!(config.cutoff, 4.5);
        assert_eq!(config.residue_class, ResidueClass::All);
        assert_eq!(config.topology_path, Some(PathBuf::from("topology.toml")));
        assert_eq!(config.mixture_path, Some(PathBuf::from("mixture.csv")));
    }

    #[test]
    fn builder_rejects_negative_or_non_finite_cutoff() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let result = PipelineConfigBuilder::new().cutoff(bad).build();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidParameter { name: "cutoff", .. })
            ));
        }
    }

    #[test]
    fn residue_class_filters_kinds() {
        assert!(ResidueClass::NucleicAcid.matches(&ResidueKind::DG));
        assert!(!ResidueClass::NucleicAcid.matches(&ResidueKind::Gly));
        assert!(ResidueClass::AminoAcid.matches(&ResidueKind::Gly));
        assert!(!ResidueClass::AminoAcid.matches(&ResidueKind::from_name("HOH")));
        assert!(ResidueClass::All.matches(&ResidueKind::from_name("HOH")));
    }

    #[test]
    fn load_reads_kebab_case_keys_and_resolves_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ribonet.toml");
        fs::write(
            &path,
            r#"
            cutoff = 3.5
            residue-class = "all"
            topology-path = "topology.toml"
            mixture-path = "/opt/models/mixture.csv"
            "#,
        )
        .unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.cutoff, 3.5);
        assert_eq!(config.residue_class, ResidueClass::All);
        assert_eq!(config.topology_path, Some(dir.path().join("topology.toml")));
        assert_eq!(
            config.mixture_path,
            Some(PathBuf::from("/opt/models/mixture.csv"))
        );
    }

    #[test]
    fn load_of_empty_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        fs::write(&path, "").unwrap();
        assert_eq!(PipelineConfig::load(&path).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "cut-off = 3.0\n").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigLoadError::Toml { .. })
        ));
    }

    #[test]
    fn load_reports_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("negative.toml");
        fs::write(&path, "cutoff = -2.0\n").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigLoadError::Invalid { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        assert!(matches!(
            PipelineConfig::load(Path::new("/definitely/not/here.toml")),
            Err(ConfigLoadError::Io { .. })
        ));
    }
}
