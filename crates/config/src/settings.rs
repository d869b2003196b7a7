//! Operator settings.
//!
//! Layered with `figment`: built-in defaults, then the per-user config file,
//! then `FOLIO_`-prefixed environment variables (`FOLIO_VERBOSITY=2`,
//! `FOLIO_PLUGIN_DIRS='["/etc/folio/plugins"]'`).

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

const ENV_PREFIX: &str = "FOLIO_";
const EXTENSIONS: [&str; 4] = ["yaml", "yml", "toml", "json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directories searched, in order, for plugin definitions referenced by
    /// name.
    pub plugin_dirs: Vec<PathBuf>,
    /// Extra log verbosity on top of `warn`, as if `-v` had been given that
    /// many times.
    pub verbosity: u8,
}
impl Default for Settings {
    fn default() -> Self {
        let plugin_dirs = Self::project_dirs().map(|dirs| dirs.data_dir().join("plugins")).into_iter().collect();
        Self { plugin_dirs, verbosity: 0 }
    }
}
impl Settings {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "folio")
    }

    /// The per-user config file, if the platform has a home directory.
    pub fn config_file() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the settings from every layer.
    #[instrument]
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_file().as_deref())
    }

    /// Loads the settings with `file` standing in for the per-user config
    /// file. A missing file is not an error.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let settings: Self = Self::figment(file)
            .extract()
            .or_raise(|| ErrorKind::Settings(file.map(|file| file.display().to_string()).unwrap_or_default()))?;
        tracing::debug!(plugin_dirs = settings.plugin_dirs.len(), verbosity = settings.verbosity, "settings loaded");
        Ok(settings)
    }

    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Finds a definition named `name` in the plugin directories.
    pub fn find_plugin(&self, name: &str) -> Option<PathBuf> {
        self.plugin_dirs
            .iter()
            .flat_map(|dir| EXTENSIONS.iter().map(move |extension| dir.join(format!("{name}.{extension}"))))
            .find(|path| path.is_file())
    }
}
