//! Layout configuration loaded with figment.
//!
//! Sources, lowest precedence first:
//! 1. [`LayoutConfig::default`]
//! 2. `.formwright/layout.toml`, `.formwright/layout.yaml`, `.formwright/layout.json`
//!    under the directory passed to [`LayoutConfig::load`]
//! 3. `FORMWRIGHT_` environment variables, e.g. `FORMWRIGHT_LOOKUP_MIN_WIDTH=300`

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LayoutError, Result};

/// Directory holding configuration files, relative to the project root.
pub const CONFIG_DIR: &str = ".formwright";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FORMWRIGHT_";

/// Minimum width the host needs to render a lookup field's search button.
pub const DEFAULT_LOOKUP_MIN_WIDTH: u32 = 250;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width lookup fields are raised to by width correction.
    pub lookup_min_width: u32,
    /// `openGroup` assumed for decoded groups that do not state it.
    pub open_groups_by_default: bool,
    /// Fields per row when building a layout from a field list.
    pub fields_per_row: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            lookup_min_width: DEFAULT_LOOKUP_MIN_WIDTH,
            open_groups_by_default: true,
            fields_per_row: 1,
        }
    }
}

impl LayoutConfig {
    /// Load from defaults, config files under `root` and the environment.
    pub fn load(root: &Path) -> Result<Self> {
        Self::from_figment(Self::figment(root))
    }

    /// The provider chain used by [`LayoutConfig::load`].
    pub fn figment(root: &Path) -> Figment {
        let dir = root.join(CONFIG_DIR);
        Figment::from(Serialized::defaults(LayoutConfig::default()))
            .merge(Toml::file(dir.join("layout.toml")))
            .merge(Yaml::file(dir.join("layout.yaml")))
            .merge(Json::file(dir.join("layout.json")))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: LayoutConfig = figment.extract()?;
        config.validate()?;
        debug!(?config, "layout configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fields_per_row == 0 {
            return Err(LayoutError::InvalidConfig {
                key: "fields_per_row",
                reason: "must be at least 1".into(),
            });
        }
        if self.lookup_min_width == 0 {
            return Err(LayoutError::InvalidConfig {
                key: "lookup_min_width",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}
