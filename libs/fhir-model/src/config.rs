//! Model-wide validation switches.
//!
//! Two checks performed during construction can be turned off: reference
//! target types and control characters in string values. The active
//! configuration is resolved per thread: a value installed with
//! [`with_config`] wins over the process-wide one set by [`install`].
//!
//! ```
//! use ferrum_model::config::{ModelConfig, Preset};
//!
//! let cfg = ModelConfig::builder()
//!     .preset(Preset::Strict)
//!     .check_control_chars(false)
//!     .build();
//! assert!(cfg.check_reference_types);
//! assert!(!cfg.check_control_chars);
//! ```

use std::cell::Cell;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Named starting points for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    /// Every check enabled. This is the default.
    Strict,
    /// Reference target and control character checks disabled.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Reject references whose literal target type is not allowed for the field.
    pub check_reference_types: bool,
    /// Reject string values containing control characters other than tab, CR and LF.
    pub check_control_chars: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::preset(Preset::Strict)
    }
}

impl ModelConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Strict => Self {
                check_reference_types: true,
                check_control_chars: true,
            },
            Preset::Lenient => Self {
                check_reference_types: false,
                check_control_chars: false,
            },
        }
    }

    pub fn builder() -> ModelConfigBuilder {
        ModelConfigBuilder::default()
    }

    /// Parse a YAML document. A `preset` key selects the base values, which the
    /// remaining keys override.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        let mut builder = Self::builder();
        if let Some(preset) = file.preset {
            builder = builder.preset(preset);
        }
        if let Some(flag) = file.check_reference_types {
            builder = builder.check_reference_types(flag);
        }
        if let Some(flag) = file.check_control_chars {
            builder = builder.check_control_chars(flag);
        }
        Ok(builder.build())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Make this the process-wide configuration.
    pub fn install(self) {
        install(self)
    }

    /// Configuration in effect on the calling thread.
    pub fn current() -> Self {
        current()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    preset: Option<Preset>,
    check_reference_types: Option<bool>,
    check_control_chars: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ModelConfigBuilder {
    config: ModelConfig,
}

impl ModelConfigBuilder {
    /// Reset every flag to the values of `preset`.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.config = ModelConfig::preset(preset);
        self
    }

    pub fn check_reference_types(mut self, enabled: bool) -> Self {
        self.config.check_reference_types = enabled;
        self
    }

    pub fn check_control_chars(mut self, enabled: bool) -> Self {
        self.config.check_control_chars = enabled;
        self
    }

    pub fn build(&self) -> ModelConfig {
        self.config
    }
}

// ============================================================================
// Active configuration
// ============================================================================

static GLOBAL: Lazy<RwLock<ModelConfig>> = Lazy::new(|| RwLock::new(ModelConfig::default()));

thread_local! {
    static SCOPED: Cell<Option<ModelConfig>> = const { Cell::new(None) };
}

/// Replace the process-wide configuration.
pub fn install(config: ModelConfig) {
    let mut global = GLOBAL.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *global = config;
    tracing::info!(
        check_reference_types = config.check_reference_types,
        check_control_chars = config.check_control_chars,
        "installed model configuration"
    );
}

/// Configuration in effect on the calling thread.
pub fn current() -> ModelConfig {
    SCOPED.with(Cell::get).unwrap_or_else(|| {
        *GLOBAL.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    })
}

/// Run `f` with `config` active on the calling thread only.
///
/// Scopes nest; the previous value is restored even if `f` panics.
pub fn with_config<R>(config: ModelConfig, f: impl FnOnce() -> R) -> R {
    struct Restore(Option<ModelConfig>);

    impl Drop for Restore {
        fn drop(&mut self) {
            SCOPED.with(|scoped| scoped.set(self.0));
        }
    }

    let _restore = Restore(SCOPED.with(|scoped| scoped.replace(Some(config))));
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(ModelConfig::default(), ModelConfig::preset(Preset::Strict));
        let lenient = ModelConfig::preset(Preset::Lenient);
        assert!(!lenient.check_reference_types);
        assert!(!lenient.check_control_chars);
    }

    #[test]
    fn test_yaml_preset_with_override() {
        let yaml = r#"
preset: Lenient
check_reference_types: true
"#;
        let cfg = ModelConfig::from_yaml(yaml).unwrap();
        assert!(cfg.check_reference_types);
        assert!(!cfg.check_control_chars);
    }

    #[test]
    fn test_yaml_round_trip() {
        let cfg = ModelConfig::builder().check_control_chars(false).build();
        let yaml = cfg.to_yaml().unwrap();
        assert_eq!(ModelConfig::from_yaml(&yaml).unwrap(), cfg);
    }

    #[test]
    fn test_yaml_rejects_unknown_keys() {
        let err = ModelConfig::from_yaml("check_everything: true").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_scoped_config_restores_previous() {
        let lenient = ModelConfig::preset(Preset::Lenient);
        let outer = ModelConfig::current();
        with_config(lenient, || {
            assert_eq!(current(), lenient);
            with_config(ModelConfig::default(), || {
                assert_eq!(current(), ModelConfig::default());
            });
            assert_eq!(current(), lenient);
        });
        assert_eq!(current(), outer);
    }
}
