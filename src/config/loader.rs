//! Configuration loading and discovery for `sprpal.toml`
//!
//! Finds the project file, loads it, applies command-line overrides and
//! turns the result into a [`ProjectState`] and batch requests.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::schema::{SprpalConfig, CONFIG_FILE_NAME};
use crate::codec::{pal, spr, CodecError};
use crate::models::{OutputNaming, Palette, ProjectState};
use crate::variation::{BatchRequest, HueSampling, NamingScheme, RenderOptions};

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse sprpal.toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
    #[error("No sprpal.toml found in {} or any parent directory", .0.display())]
    NotFound(PathBuf),
    /// The base palette could not be loaded
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub count: Option<usize>,
    pub start_number: Option<u32>,
    pub targets: Option<Vec<String>>,
    pub seed: Option<u64>,
    pub random_saturation: Option<bool>,
    pub random_brightness: Option<bool>,
    pub sampling: Option<HueSampling>,
    pub swatches: Option<bool>,
    pub style_count: Option<u32>,
}

/// A parsed config and the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: SprpalConfig,
}

/// Find sprpal.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find sprpal.toml by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load the given config file, or the discovered one.
pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match find_config() {
            Some(p) => p,
            None => return Err(ConfigError::NotFound(env::current_dir()?)),
        },
    };
    load_config_file(&config_path)
}

fn load_config_file(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: SprpalConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    log::debug!("loaded config {}", path.display());
    Ok(LoadedConfig { path: path.to_path_buf(), config })
}

/// Merge CLI overrides into a configuration. CLI values win.
pub fn merge_cli_overrides(config: &mut SprpalConfig, overrides: &CliOverrides) {
    if let Some(ref output) = overrides.output {
        config.project.output = output.clone();
    }
    if let Some(count) = overrides.count {
        config.generate.count = count;
    }
    if let Some(start_number) = overrides.start_number {
        config.generate.start_number = start_number;
    }
    if let Some(ref targets) = overrides.targets {
        config.generate.targets = targets.clone();
    }
    if let Some(seed) = overrides.seed {
        config.generate.seed = Some(seed);
    }
    if let Some(random_saturation) = overrides.random_saturation {
        config.generate.random_saturation = random_saturation;
    }
    if let Some(random_brightness) = overrides.random_brightness {
        config.generate.random_brightness = random_brightness;
    }
    if let Some(sampling) = overrides.sampling {
        config.generate.sampling = sampling;
    }
    if let Some(swatches) = overrides.swatches {
        config.generate.swatches = swatches;
    }
    if let Some(style_count) = overrides.style_count {
        config.hair.style_count = style_count;
    }
}

/// Resolve a path relative to the project root. Absolute paths pass through.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

/// Load a base palette from a `.spr` (embedded palette) or `.pal` file.
pub fn load_base_palette(path: &Path) -> Result<Palette, CodecError> {
    let is_sprite =
        path.extension().map(|ext| ext.eq_ignore_ascii_case("spr")).unwrap_or(false);
    if is_sprite {
        Ok(spr::load_palette(path)?.to_palette())
    } else {
        pal::load(path)
    }
}

impl LoadedConfig {
    /// Directory holding the config file.
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn apply_overrides(&mut self, overrides: &CliOverrides) -> Result<(), ConfigError> {
        merge_cli_overrides(&mut self.config, overrides);
        let errors = self.config.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
        }
    }

    pub fn base_path(&self) -> PathBuf {
        resolve_path(self.root(), &self.config.project.base)
    }

    pub fn output_dir(&self) -> PathBuf {
        resolve_path(self.root(), &self.config.project.output)
    }

    /// Load the base palette and build the editing state.
    pub fn project_state(&self) -> Result<ProjectState, ConfigError> {
        let base = load_base_palette(&self.base_path())?;
        let groups = self.config.color_groups().map_err(|errors| {
            ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect())
        })?;
        Ok(ProjectState {
            base,
            groups,
            naming: OutputNaming {
                output_dir: self.output_dir(),
                prefix: self.config.project.prefix.clone(),
            },
        })
    }

    fn render_options(&self, micro_jitter: bool) -> RenderOptions {
        RenderOptions {
            sampling: self.config.generate.sampling,
            random_saturation: self.config.generate.random_saturation,
            random_brightness: self.config.generate.random_brightness,
            micro_jitter,
        }
    }

    /// The general batch for `state`.
    pub fn general_request(&self, state: &ProjectState) -> BatchRequest {
        BatchRequest::general(
            state.base.clone(),
            state.groups.clone(),
            self.config.generate.count,
            state.naming.output_dir.clone(),
            self.config.generate.targets.clone(),
            &state.naming.prefix,
        )
        .with_start_number(self.config.generate.start_number)
        .with_options(self.render_options(false))
        .with_swatches(self.config.generate.swatches)
    }

    /// The hair ramp batch for `state`. Hair always uses golden-ratio sampling.
    pub fn hair_request(&self, state: &ProjectState) -> BatchRequest {
        let mut request = BatchRequest::hair(
            state.base.clone(),
            state.groups.clone(),
            self.config.generate.count,
            state.naming.output_dir.clone(),
            self.config.hair.style_count,
        )
        .with_start_number(self.config.generate.start_number)
        .with_options(RenderOptions {
            sampling: HueSampling::GoldenRatio,
            ..self.render_options(true)
        });
        request.naming = NamingScheme::Hair {
            prefix: self.config.hair.prefix.clone(),
            style_count: self.config.hair.style_count,
        };
        request
    }
}
