//! Names the generators put into generated code.
//!
//! Every field has a default, so a configuration file only lists what it
//! overrides:
//!
//! ```yaml
//! dependency:
//!   protocol_suffix: Interface
//! enum_codec:
//!   discriminator_key: kind
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    pub dependency: DependencyConfig,
    pub enum_codec: EnumCodecConfig,
}

/// Names used by `@AutoDependency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Appended to the type name to name the generated protocol.
    pub protocol_suffix: String,
    /// Appended to the type name to name the generated mock.
    pub mock_suffix: String,
    /// Prepended to a member name to name its mock slot.
    pub slot_prefix: String,
    /// A function whose call fails loudly; slots default to calling it.
    pub placeholder: String,
    /// Inherited by the protocol of a class.
    pub reference_constraint: String,
    /// Inherited by the protocol of an actor.
    pub isolated_constraint: String,
    /// The marker of types that are safe to share across concurrency domains.
    pub shareable_marker: String,
}

/// Names used by `@EnumCodable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumCodecConfig {
    pub discriminator_enum: String,
    pub keys_enum: String,
    pub discriminator_key: String,
    pub encoder_type: String,
    pub decoder_type: String,
    pub codable_marker: String,
    pub coding_key_marker: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            protocol_suffix: "Protocol".into(),
            mock_suffix: "Mock".into(),
            slot_prefix: "_".into(),
            placeholder: "unimplemented".into(),
            reference_constraint: "AnyObject".into(),
            isolated_constraint: "Actor".into(),
            shareable_marker: "Sendable".into(),
        }
    }
}

impl Default for EnumCodecConfig {
    fn default() -> Self {
        Self {
            discriminator_enum: "SubType".into(),
            keys_enum: "CodingKeys".into(),
            discriminator_key: "type".into(),
            encoder_type: "Encoder".into(),
            decoder_type: "Decoder".into(),
            codable_marker: "Codable".into(),
            coding_key_marker: "CodingKey".into(),
        }
    }
}

impl ExpansionConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_override() {
        let config = ExpansionConfig::from_yaml_str(
            "dependency:\n  protocol_suffix: Interface\nenum_codec:\n  discriminator_key: kind\n",
        )
        .unwrap();
        assert_eq!(config.dependency.protocol_suffix, "Interface");
        assert_eq!(config.dependency.mock_suffix, "Mock");
        assert_eq!(config.enum_codec.discriminator_key, "kind");
        assert_eq!(config.enum_codec.keys_enum, "CodingKeys");
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(
            ExpansionConfig::from_yaml_str("\n").unwrap(),
            ExpansionConfig::default()
        );
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dependency:\n  slot_prefix: stub_").unwrap();
        let config = ExpansionConfig::from_path(file.path()).unwrap();
        assert_eq!(config.dependency.slot_prefix, "stub_");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            ExpansionConfig::from_yaml_str("dependency: [1, 2]"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            ExpansionConfig::from_path("/nonexistent/companion.yaml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
