//! Layered configuration composition with recursive inclusion
//!
//! The `ConfigComposer` loads every configuration file given on the command
//! line together with the files they include (recursively, via `configs`),
//! and merges them in order into an [`EffectiveConfig`].

use genmake_fs::{PathResolver, ProjectPath};

use super::document::ConfigDocument;
use super::effective::{ConfigWarning, DEFAULT_BAUDRATE, DEFAULT_DEBUG_COMMAND, EffectiveConfig};
use crate::{Error, Result};

/// A parsed file, in merge order.
#[derive(Debug)]
struct Layer {
    path: ProjectPath,
    document: ConfigDocument,
}

/// Composes layered configuration files into one effective configuration
///
/// Layers are ordered depth-first: each main file is followed immediately by
/// its fully expanded include chain. Lists append across layers, scalars are
/// overridden by later layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigComposer {
    resolver: PathResolver,
}

impl ConfigComposer {
    /// Create a composer resolving `~/` against the real home directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composer with a custom path resolver.
    ///
    /// This is primarily useful for testing, to control where `~/` points.
    pub fn with_resolver(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Load, expand and merge `main_paths` in order.
    ///
    /// Fails on unreadable or malformed layers, on circular inclusion, and
    /// when no layer sets `fqbn`. Nothing is written to disk.
    pub fn compose(&self, main_paths: &[ProjectPath]) -> Result<EffectiveConfig> {
        let mut layers = Vec::new();
        for main_path in main_paths {
            let mut stack = Vec::new();
            self.expand(main_path, &mut stack, &mut layers)?;
        }

        let mut merged = Merged::default();
        for layer in &layers {
            merged.apply(layer, &self.resolver)?;
        }

        let fqbn = merged
            .fqbn
            .ok_or(Error::MissingRequiredField { field: "fqbn" })?;

        Ok(EffectiveConfig {
            fqbn,
            cflags: merged.cflags,
            debug_command: merged
                .debug_command
                .unwrap_or_else(|| DEFAULT_DEBUG_COMMAND.to_string()),
            baudrate: merged
                .baudrate
                .unwrap_or_else(|| DEFAULT_BAUDRATE.to_string()),
            lib_paths: merged.lib_paths,
            qmake_dirs: merged.qmake_dirs,
            qmake_exclude_dirs: merged.qmake_exclude_dirs,
            main_paths: main_paths.to_vec(),
            paths: layers.into_iter().map(|layer| layer.path).collect(),
            warnings: merged.warnings,
        })
    }

    /// Parse `path` and, depth-first, everything it includes.
    ///
    /// `stack` holds the files currently being expanded; meeting one of them
    /// again is a cycle.
    fn expand(
        &self,
        path: &ProjectPath,
        stack: &mut Vec<ProjectPath>,
        layers: &mut Vec<Layer>,
    ) -> Result<()> {
        if stack.contains(path) {
            return Err(Error::CircularInclusion {
                path: path.location().to_path_buf(),
                stack: stack.iter().map(|p| p.location().to_path_buf()).collect(),
            });
        }

        tracing::debug!(path = %path, depth = stack.len(), "Loading configuration layer");
        let document = ConfigDocument::load(path.location())?;

        let config_dir = path.parent_dir();
        let includes = document
            .configs
            .iter()
            .map(|raw| self.resolver.resolve(raw, Some(config_dir.location())))
            .collect::<genmake_fs::Result<Vec<_>>>()?;

        layers.push(Layer {
            path: path.clone(),
            document,
        });

        stack.push(path.clone());
        for include in &includes {
            self.expand(include, stack, layers)?;
        }
        stack.pop();

        Ok(())
    }
}

/// Accumulated state while merging layers.
#[derive(Debug, Default)]
struct Merged {
    fqbn: Option<String>,
    cflags: Vec<String>,
    debug_command: Option<String>,
    baudrate: Option<String>,
    lib_paths: Vec<ProjectPath>,
    qmake_dirs: Vec<ProjectPath>,
    qmake_exclude_dirs: Vec<ProjectPath>,
    warnings: Vec<ConfigWarning>,
}

impl Merged {
    fn apply(&mut self, layer: &Layer, resolver: &PathResolver) -> Result<()> {
        let document = &layer.document;
        let config_dir = layer.path.parent_dir();
        let resolve_all = |raw: &[String]| -> Result<Vec<ProjectPath>> {
            raw.iter()
                .map(|entry| Ok(resolver.resolve(entry, Some(config_dir.location()))?))
                .collect()
        };

        if document.fqbn.is_some() {
            self.fqbn.clone_from(&document.fqbn);
        }
        if document.debug_command.is_some() {
            self.debug_command.clone_from(&document.debug_command);
        }
        if document.baudrate.is_some() {
            self.baudrate.clone_from(&document.baudrate);
        }

        self.cflags.extend(document.cflags.iter().cloned());
        self.lib_paths.extend(resolve_all(&document.libs)?);
        self.qmake_dirs.extend(resolve_all(&document.qmake_dirs)?);
        self.qmake_exclude_dirs
            .extend(resolve_all(&document.qmake_exclude_dirs)?);

        for key in document.unknown.keys() {
            tracing::warn!(key = %key, path = %layer.path, "Ignoring unhandled configuration key");
            self.warnings.push(ConfigWarning::UnknownKey {
                key: key.clone(),
                path: layer.path.clone(),
            });
        }

        Ok(())
    }
}
