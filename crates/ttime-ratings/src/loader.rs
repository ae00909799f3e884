//! Rating discovery.
//!
//! Rating code is compiled in as [`RatingModule`]s, each exposing a
//! registration entrypoint. Which modules are active is decided at startup:
//! either explicitly with [`PluginLoader::load_module`], or by dropping small
//! TOML *rating units* into one of the search directories:
//!
//! ```toml
//! # /usr/share/ttime/ratings/gaps.toml
//! module = "gaps"
//! description = "Penalize idle time between lectures"
//! ```
//!
//! A unit is identified by its file name. Each name is loaded at most once
//! per loader, no matter how many directories contain it.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};
use ttime_config::{ConfigError, RatingsConfig};

use crate::builtin;
use crate::error::LoadError;
use crate::registry::RatingRegistry;

/// Registration entrypoint of a compiled-in rating module.
#[derive(Clone, Copy)]
pub struct RatingModule {
    /// Name used by rating units to refer to the module.
    pub name: &'static str,
    /// Registers the module's rating types, returning how many were new.
    pub register: fn(&mut RatingRegistry) -> Result<usize, ConfigError>,
}

impl fmt::Debug for RatingModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RatingModule").field("name", &self.name).finish()
    }
}

/// Contents of a rating unit file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitManifest {
    /// Name of the module to register.
    pub module: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl UnitManifest {
    /// Parses a manifest from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Discovers rating units and registers their modules.
#[derive(Debug)]
pub struct PluginLoader {
    config: RatingsConfig,
    modules: Vec<RatingModule>,
    loaded: HashSet<String>,
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new(RatingsConfig::default())
    }
}

impl PluginLoader {
    /// Creates a loader that knows the built-in modules.
    pub fn new(config: RatingsConfig) -> Self {
        Self {
            config,
            modules: builtin::MODULES.to_vec(),
            loaded: HashSet::new(),
        }
    }

    /// Makes an additional module available to rating units.
    ///
    /// A module with the same name replaces the previous one.
    pub fn with_module(mut self, module: RatingModule) -> Self {
        self.modules.retain(|m| m.name != module.name);
        self.modules.push(module);
        self
    }

    /// Returns the discovery configuration.
    pub fn config(&self) -> &RatingsConfig {
        &self.config
    }

    /// Returns every module rating units may refer to.
    pub fn modules(&self) -> &[RatingModule] {
        &self.modules
    }

    /// Returns true if the unit or module named `name` has been loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    /// Returns the names of every loaded unit and module.
    pub fn loaded_units(&self) -> impl Iterator<Item = &str> {
        self.loaded.iter().map(String::as_str)
    }

    /// Loads every rating unit found in the process's candidate directories.
    ///
    /// Returns the number of units loaded by this call.
    ///
    /// # Errors
    ///
    /// Any unreadable or malformed unit aborts discovery.
    pub fn discover(&mut self, registry: &mut RatingRegistry) -> Result<usize, LoadError> {
        let dirs = self.config.candidate_dirs_for_process();
        self.discover_in(&dirs, registry)
    }

    /// Loads every rating unit found in `dirs`; missing directories are skipped.
    pub fn discover_in(
        &mut self,
        dirs: &[PathBuf],
        registry: &mut RatingRegistry,
    ) -> Result<usize, LoadError> {
        let mut count = 0;
        for dir in dirs {
            if !dir.is_dir() {
                debug!(dir = %dir.display(), "Skipping missing rating directory");
                continue;
            }
            for unit in self.units_in(dir)? {
                if self.load_unit(&unit, registry)? {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    // Unit files of `dir`, sorted by file name.
    fn units_in(&self, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let io_err = |source: std::io::Error| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut units = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext == self.config.unit_extension.as_str());
            if matches && path.is_file() {
                units.push(path);
            }
        }
        units.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(units)
    }

    /// Loads a single rating unit file.
    ///
    /// Returns `false` if a unit with the same file name was loaded before.
    pub fn load_unit(&mut self, path: &Path, registry: &mut RatingRegistry) -> Result<bool, LoadError> {
        let Some(unit) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file"),
            });
        };
        if self.loaded.contains(&unit) {
            debug!(unit = %unit, path = %path.display(), "Rating unit already loaded");
            return Ok(false);
        }

        let path = fs::canonicalize(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let contents = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest = UnitManifest::from_toml_str(&contents).map_err(|source| LoadError::Manifest {
            path: path.clone(),
            source,
        })?;

        self.register_module(&unit, &manifest.module, registry)?;
        info!(
            unit = %unit,
            path = %path.display(),
            module = %manifest.module,
            "Loading rating"
        );
        self.loaded.insert(unit);
        Ok(true)
    }

    /// Loads a compiled-in module directly, without a unit file.
    ///
    /// Returns `false` if the module was loaded before.
    pub fn load_module(&mut self, name: &str, registry: &mut RatingRegistry) -> Result<bool, LoadError> {
        if self.loaded.contains(name) {
            return Ok(false);
        }
        self.register_module(name, name, registry)?;
        info!(unit = %name, module = %name, "Loading rating");
        self.loaded.insert(name.to_string());
        Ok(true)
    }

    /// Loads every module known to the loader.
    pub fn load_all_modules(&mut self, registry: &mut RatingRegistry) -> Result<usize, LoadError> {
        let names: Vec<&'static str> = self.modules.iter().map(|m| m.name).collect();
        let mut count = 0;
        for name in names {
            if self.load_module(name, registry)? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn register_module(
        &self,
        unit: &str,
        module: &str,
        registry: &mut RatingRegistry,
    ) -> Result<usize, LoadError> {
        let entry = self
            .modules
            .iter()
            .find(|m| m.name == module)
            .ok_or_else(|| LoadError::UnknownModule {
                unit: unit.to_string(),
                module: module.to_string(),
            })?;
        (entry.register)(registry).map_err(|source| LoadError::Registration {
            unit: unit.to_string(),
            source,
        })
    }
}
