//! Configuration schema types for `sprpal.toml`
//!
//! Defines the structure and validation rules for a recolor project.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::{parse_color, Color};
use crate::models::{
    interpolate_gradient, skin_preset, ColorGroup, GroupKind, GroupMode, HueRange, DEFAULT_PREFIX,
    GRADIENT_LEN, SKIN_PRESETS,
};
use crate::variation::naming::{DEFAULT_STYLE_COUNT, HAIR_PREFIX};
use crate::variation::HueSampling;

/// File name looked for during discovery.
pub const CONFIG_FILE_NAME: &str = "sprpal.toml";

/// Project metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,
    /// `.spr` or `.pal` file providing the base palette
    pub base: PathBuf,
    /// Output directory
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Base name used when no target names are given
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_output() -> PathBuf {
    PathBuf::from("out")
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// Batch generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub start_number: u32,
    /// Target names; empty means `[project.prefix]`
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub random_saturation: bool,
    #[serde(default)]
    pub random_brightness: bool,
    /// Fixed seed for reproducible batches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub sampling: HueSampling,
    /// Write a PNG swatch per variant
    #[serde(default)]
    pub swatches: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            start_number: 0,
            targets: Vec::new(),
            random_saturation: false,
            random_brightness: false,
            seed: None,
            sampling: HueSampling::default(),
            swatches: false,
        }
    }
}

fn default_count() -> usize {
    10
}

/// Hair ramp generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HairConfig {
    #[serde(default = "default_style_count")]
    pub style_count: u32,
    #[serde(default = "default_hair_prefix")]
    pub prefix: String,
}

impl Default for HairConfig {
    fn default() -> Self {
        Self { style_count: default_style_count(), prefix: default_hair_prefix() }
    }
}

fn default_style_count() -> u32 {
    DEFAULT_STYLE_COUNT
}

fn default_hair_prefix() -> String {
    HAIR_PREFIX.to_string()
}

/// A palette index or an inclusive `"a-b"` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexSpec {
    Single(i64),
    Range(String),
}

impl IndexSpec {
    /// Expand into palette indices.
    pub fn expand(&self) -> Result<Vec<u8>, String> {
        match self {
            IndexSpec::Single(i) => Ok(vec![to_index(*i)?]),
            IndexSpec::Range(s) => {
                let (a, b) = s
                    .split_once('-')
                    .ok_or_else(|| format!("'{}' is not a range like \"16-23\"", s))?;
                let parse = |part: &str| {
                    part.trim()
                        .parse::<i64>()
                        .map_err(|_| format!("'{}' is not a range like \"16-23\"", s))
                        .and_then(to_index)
                };
                let (start, end) = (parse(a)?, parse(b)?);
                if start > end {
                    return Err(format!("range '{}' runs backwards", s));
                }
                Ok((start..=end).collect())
            }
        }
    }
}

fn to_index(i: i64) -> Result<u8, String> {
    u8::try_from(i).map_err(|_| format!("index {} is outside 0-255", i))
}

/// A hue range end: degrees, or a colour whose hue is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HueBound {
    Degrees(f64),
    Color(String),
}

impl HueBound {
    pub fn degrees(&self) -> Result<f64, String> {
        match self {
            HueBound::Degrees(d) if (0.0..=360.0).contains(d) => Ok(*d),
            HueBound::Degrees(d) => Err(format!("{} is outside 0-360 degrees", d)),
            HueBound::Color(s) => parse_color(s)
                .map(|c| c.to_hsv().h * 360.0)
                .map_err(|e| format!("'{}': {}", s, e)),
        }
    }
}

/// Fixed gradient colours: all eight, or the two ends to interpolate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GradientSpec {
    Colors(Vec<String>),
    Endpoints { from: String, to: String },
}

/// One `[[groups]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub indices: Vec<IndexSpec>,
    #[serde(default)]
    pub mode: GroupMode,
    /// `[start, end]` in degrees or as colours
    #[serde(default = "default_hue_range")]
    pub hue_range: [HueBound; 2],
    /// Preview hue, in turns
    #[serde(default)]
    pub hue_shift: f64,
    #[serde(default)]
    pub sat_shift: f64,
    #[serde(default)]
    pub val_shift: f64,
    /// Makes the group a fixed gradient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<GradientSpec>,
    /// Named skin preset; makes the group a fixed gradient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_preset: Option<String>,
}

fn default_hue_range() -> [HueBound; 2] {
    [HueBound::Degrees(0.0), HueBound::Degrees(360.0)]
}

fn parse_gradient_color(s: &str, errors: &mut Vec<String>) -> Color {
    parse_color(s).unwrap_or_else(|e| {
        errors.push(format!("'{}': {}", s, e));
        Color::BLACK
    })
}

fn gradient_colors(gradient: &GradientSpec) -> Result<[Color; GRADIENT_LEN], Vec<String>> {
    let mut errors = Vec::new();
    let colors = match gradient {
        GradientSpec::Colors(strings) => {
            if strings.len() != GRADIENT_LEN {
                errors.push(format!(
                    "must have exactly {} colors, found {}",
                    GRADIENT_LEN,
                    strings.len()
                ));
            }
            let mut colors = [Color::BLACK; GRADIENT_LEN];
            for (slot, s) in strings.iter().enumerate() {
                let color = parse_gradient_color(s, &mut errors);
                if slot < GRADIENT_LEN {
                    colors[slot] = color;
                }
            }
            colors
        }
        GradientSpec::Endpoints { from, to } => {
            let first = parse_gradient_color(from, &mut errors);
            let last = parse_gradient_color(to, &mut errors);
            interpolate_gradient(first, last)
        }
    };
    if errors.is_empty() {
        Ok(colors)
    } else {
        Err(errors)
    }
}

impl GroupConfig {
    /// Build the group, collecting every problem found.
    pub fn to_color_group(&self, position: usize) -> Result<ColorGroup, Vec<ConfigValidationError>> {
        let mut errors = Vec::new();
        let field = |name: &str| format!("groups[{}].{}", position, name);

        let mut indices = BTreeSet::new();
        for spec in &self.indices {
            match spec.expand() {
                Ok(expanded) => indices.extend(expanded),
                Err(message) => errors.push(ConfigValidationError::new(field("indices"), message)),
            }
        }

        let mut hue_range = [0.0; 2];
        for (end, bound) in self.hue_range.iter().enumerate() {
            match bound.degrees() {
                Ok(degrees) => hue_range[end] = degrees,
                Err(message) => errors.push(ConfigValidationError::new(field("hue_range"), message)),
            }
        }

        let kind = match (&self.gradient, &self.gradient_preset) {
            (None, None) => GroupKind::Variable {
                mode: self.mode,
                hue_range: HueRange::new(hue_range[0], hue_range[1]),
                hue_shift: self.hue_shift,
            },
            (Some(_), Some(_)) => {
                errors.push(ConfigValidationError::new(
                    field("gradient_preset"),
                    "cannot be combined with 'gradient'",
                ));
                GroupKind::FixedGradient { colors: [Color::BLACK; GRADIENT_LEN] }
            }
            (Some(gradient), None) => {
                let colors = gradient_colors(gradient).unwrap_or_else(|messages| {
                    errors.extend(
                        messages.into_iter().map(|m| ConfigValidationError::new(field("gradient"), m)),
                    );
                    [Color::BLACK; GRADIENT_LEN]
                });
                GroupKind::FixedGradient { colors }
            }
            (None, Some(name)) => {
                let colors = match skin_preset(name) {
                    Some((first, last)) => interpolate_gradient(first, last),
                    None => {
                        let known: Vec<&str> = SKIN_PRESETS.iter().map(|(n, _, _)| *n).collect();
                        errors.push(ConfigValidationError::new(
                            field("gradient_preset"),
                            format!("unknown preset '{}' (known: {})", name, known.join(", ")),
                        ));
                        [Color::BLACK; GRADIENT_LEN]
                    }
                };
                GroupKind::FixedGradient { colors }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ColorGroup {
            name: self.name.clone(),
            indices,
            kind,
            sat_shift: self.sat_shift,
            val_shift: self.val_shift,
        })
    }
}

/// Complete sprpal.toml configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprpalConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub hair: HairConfig,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "groups[2].indices")
    pub field: String,
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sprpal.toml: '{}' {}", self.field, self.message)
    }
}

impl SprpalConfig {
    /// Validate the configuration and return every error.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.name.is_empty() {
            errors.push(ConfigValidationError::new("project.name", "must be a non-empty string"));
        }
        if self.generate.count == 0 {
            errors.push(ConfigValidationError::new("generate.count", "must be a positive integer"));
        }
        if self.hair.style_count == 0 {
            errors.push(ConfigValidationError::new("hair.style_count", "must be a positive integer"));
        }

        if self.generate.count > 0 {
            let last = u64::from(self.generate.start_number) + self.generate.count as u64 - 1;
            if last > u64::from(u32::MAX) {
                errors.push(ConfigValidationError::new(
                    "generate.start_number",
                    format!("numbering would pass {} after {} variants", u32::MAX, self.generate.count),
                ));
            }
        }

        let mut seen = HashSet::new();
        for (position, group) in self.groups.iter().enumerate() {
            if !seen.insert(group.name.as_str()) {
                errors.push(ConfigValidationError::new(
                    format!("groups[{}].name", position),
                    format!("duplicate group name '{}'", group.name),
                ));
            }
            if let Err(group_errors) = group.to_color_group(position) {
                errors.extend(group_errors);
            }
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Groups in file order.
    pub fn color_groups(&self) -> Result<Vec<ColorGroup>, Vec<ConfigValidationError>> {
        let mut groups = Vec::with_capacity(self.groups.len());
        let mut errors = Vec::new();
        for (position, group) in self.groups.iter().enumerate() {
            match group.to_color_group(position) {
                Ok(g) => groups.push(g),
                Err(e) => errors.extend(e),
            }
        }
        if errors.is_empty() {
            Ok(groups)
        } else {
            Err(errors)
        }
    }

    /// Target names with the project prefix as fallback.
    pub fn effective_targets(&self) -> Vec<String> {
        if self.generate.targets.is_empty() {
            vec![self.project.prefix.clone()]
        } else {
            self.generate.targets.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parse() {
        let toml = r#"
[project]
name = "knight"
base = "knight.spr"
"#;
        let config: SprpalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.project.output, PathBuf::from("out"));
        assert_eq!(config.project.prefix, "palette");
        assert_eq!(config.generate.count, 10);
        assert_eq!(config.generate.sampling, HueSampling::Stratified);
        assert_eq!(config.hair.style_count, 40);
        assert_eq!(config.hair.prefix, HAIR_PREFIX);
        assert!(config.groups.is_empty());
        assert!(config.is_valid());
        assert_eq!(config.effective_targets(), vec!["palette".to_string()]);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r##"
[project]
name = "knight"
base = "sprites/knight.spr"
output = "dist"
prefix = "knight"

[generate]
count = 25
start_number = 100
targets = ["Knight", "Crusader"]
random_saturation = true
seed = 7
sampling = "even"
swatches = true

[[groups]]
name = "hair"
indices = [16, "17-23"]
mode = "colorize"
hue_range = [350, 30]
sat_shift = 0.1

[[groups]]
name = "skin"
indices = ["40-47"]
gradient = ["#100800", "#201000", "#402010", "#603020", "#804030", "#a06040", "#c08060", "#e0a080"]
"##;
        let config: SprpalConfig = toml::from_str(toml).unwrap();
        assert!(config.is_valid(), "{:?}", config.validate());
        assert_eq!(config.generate.seed, Some(7));
        assert_eq!(config.generate.sampling, HueSampling::Even);

        let groups = config.color_groups().unwrap();
        assert_eq!(groups[0].indices.len(), 8);
        assert!(matches!(
            groups[0].kind,
            GroupKind::Variable { mode: GroupMode::Colorize, hue_range, .. }
                if hue_range == HueRange::new(350.0, 30.0)
        ));
        assert!(groups[1].is_fixed());
        assert_eq!(groups[1].indices.first(), Some(&40));
    }

    #[test]
    fn test_index_specs() {
        assert_eq!(IndexSpec::Single(5).expand().unwrap(), vec![5]);
        assert_eq!(IndexSpec::Range("8-10".into()).expand().unwrap(), vec![8, 9, 10]);
        assert!(IndexSpec::Single(256).expand().is_err());
        assert!(IndexSpec::Single(-1).expand().is_err());
        assert!(IndexSpec::Range("10-8".into()).expand().is_err());
        assert!(IndexSpec::Range("ten".into()).expand().is_err());
        assert!(IndexSpec::Range("250-300".into()).expand().is_err());
    }

    #[test]
    fn test_validation_reports_everything() {
        let toml = r#"
[project]
name = "bad"
base = "x.pal"

[generate]
count = 0

[[groups]]
name = "a"
indices = [300]
hue_range = [0, 400]

[[groups]]
name = "a"
gradient = ["red", "not-a-color"]
"#;
        let config: SprpalConfig = toml::from_str(toml).unwrap();
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"generate.count".to_string()));
        assert!(fields.contains(&"groups[0].indices".to_string()));
        assert!(fields.contains(&"groups[0].hue_range".to_string()));
        assert!(fields.contains(&"groups[1].name".to_string()));
        // Wrong length and an unparsable colour are both reported
        assert_eq!(fields.iter().filter(|f| *f == "groups[1].gradient").count(), 2);
    }

    fn single_group(body: &str) -> SprpalConfig {
        let toml = format!(
            "[project]\nname = \"p\"\nbase = \"b.pal\"\n\n[[groups]]\nname = \"skin\"\nindices = [\"40-47\"]\n{}",
            body
        );
        toml::from_str(&toml).unwrap()
    }

    #[test]
    fn test_gradient_from_endpoints() {
        let config = single_group("gradient = { from = \"#E0B88A\", to = \"#5A2F1B\" }\n");
        let groups = config.color_groups().unwrap();
        let expected = interpolate_gradient(Color::new(224, 184, 138), Color::new(90, 47, 27));
        assert_eq!(groups[0].kind, GroupKind::FixedGradient { colors: expected });
    }

    #[test]
    fn test_gradient_preset() {
        let config = single_group("gradient_preset = \"negro\"\n");
        let groups = config.color_groups().unwrap();
        match &groups[0].kind {
            GroupKind::FixedGradient { colors } => {
                assert_eq!(colors[0], Color::new(192, 138, 90));
                assert_eq!(colors[GRADIENT_LEN - 1], Color::new(26, 11, 6));
            }
            other => panic!("expected a fixed gradient, got {other:?}"),
        }
    }

    #[test]
    fn test_gradient_preset_errors() {
        let config = single_group("gradient_preset = \"pale\"\n");
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "groups[0].gradient_preset");

        let config = single_group(
            "gradient_preset = \"negro\"\ngradient = { from = \"red\", to = \"blue\" }\n",
        );
        assert!(!config.is_valid());

        let config = single_group("gradient = { from = \"red\", to = \"nope\" }\n");
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["groups[0].gradient".to_string()]);
    }

    #[test]
    fn test_hue_range_from_colors() {
        let config = single_group("hue_range = [\"#00FF00\", 240]\n");
        let groups = config.color_groups().unwrap();
        match groups[0].kind {
            GroupKind::Variable { hue_range, .. } => {
                assert!((hue_range.start - 120.0).abs() < 1e-9, "{hue_range:?}");
                assert_eq!(hue_range.end, 240.0);
            }
            ref other => panic!("expected a variable group, got {other:?}"),
        }
        let config = single_group("hue_range = [\"teal-ish\", 240]\n");
        assert!(!config.is_valid());
    }

    #[test]
    fn test_numbering_overflow_rejected() {
        let mut config = single_group("");
        config.generate.start_number = u32::MAX;
        config.generate.count = 1;
        assert!(config.is_valid());
        config.generate.count = 2;
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["generate.start_number".to_string()]);
    }
}
