use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::path::DEFAULT_STEP_LIMIT;

/// Scheduler pacing knobs. These are product-tuning values, so every one of
/// them can be overridden from `config.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Fraction of set progress within which every group should be introduced.
    #[serde(default = "default_intro_window")]
    pub intro_window: f64,
    #[serde(default = "default_intro_probability_floor")]
    pub intro_probability_floor: f64,
    #[serde(default = "default_intro_probability_span")]
    pub intro_probability_span: f64,
    #[serde(default = "default_min_group_weight")]
    pub min_group_weight: f64,
    #[serde(default = "default_primary_variant")]
    pub primary_variant: String,
    /// Primary mastery below which alternates are never shown.
    #[serde(default = "default_min_exposure")]
    pub min_exposure: f64,
    #[serde(default = "default_primary_weight_floor")]
    pub primary_weight_floor: f64,
    #[serde(default = "default_alternate_weight_floor")]
    pub alternate_weight_floor: f64,
}

fn default_intro_window() -> f64 {
    0.5
}
fn default_intro_probability_floor() -> f64 {
    0.3
}
fn default_intro_probability_span() -> f64 {
    0.5
}
fn default_min_group_weight() -> f64 {
    0.1
}
fn default_primary_variant() -> String {
    "primary".to_string()
}
fn default_min_exposure() -> f64 {
    20.0
}
fn default_primary_weight_floor() -> f64 {
    0.5
}
fn default_alternate_weight_floor() -> f64 {
    0.2
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            intro_window: default_intro_window(),
            intro_probability_floor: default_intro_probability_floor(),
            intro_probability_span: default_intro_probability_span(),
            min_group_weight: default_min_group_weight(),
            primary_variant: default_primary_variant(),
            min_exposure: default_min_exposure(),
            primary_weight_floor: default_primary_weight_floor(),
            alternate_weight_floor: default_alternate_weight_floor(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MasteryConfig {
    /// Mastery an entity is raised to when its introduction completes.
    #[serde(default = "default_intro_bootstrap")]
    pub intro_bootstrap: f64,
    #[serde(default = "default_gain_min")]
    pub gain_min: f64,
    #[serde(default = "default_gain_max")]
    pub gain_max: f64,
    #[serde(default = "default_gain_difficulty_scale")]
    pub gain_difficulty_scale: f64,
    #[serde(default = "default_diminishing_factor")]
    pub diminishing_factor: f64,
    #[serde(default = "default_diminishing_floor")]
    pub diminishing_floor: f64,
    #[serde(default = "default_penalty_base")]
    pub penalty_base: f64,
    #[serde(default = "default_penalty_difficulty_scale")]
    pub penalty_difficulty_scale: f64,
}

fn default_intro_bootstrap() -> f64 {
    5.0
}
fn default_gain_min() -> f64 {
    10.0
}
fn default_gain_max() -> f64 {
    15.0
}
fn default_gain_difficulty_scale() -> f64 {
    20.0
}
fn default_diminishing_factor() -> f64 {
    0.4
}
fn default_diminishing_floor() -> f64 {
    0.6
}
fn default_penalty_base() -> f64 {
    5.0
}
fn default_penalty_difficulty_scale() -> f64 {
    2.0
}

impl Default for MasteryConfig {
    fn default() -> Self {
        Self {
            intro_bootstrap: default_intro_bootstrap(),
            gain_min: default_gain_min(),
            gain_max: default_gain_max(),
            gain_difficulty_scale: default_gain_difficulty_scale(),
            diminishing_factor: default_diminishing_factor(),
            diminishing_floor: default_diminishing_floor(),
            penalty_base: default_penalty_base(),
            penalty_difficulty_scale: default_penalty_difficulty_scale(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordSearchConfig {
    #[serde(default = "default_min_grid_size")]
    pub min_grid_size: usize,
    #[serde(default = "default_max_grid_size")]
    pub max_grid_size: usize,
    #[serde(default = "default_attempts_per_size")]
    pub attempts_per_size: usize,
    #[serde(default = "default_growth_step")]
    pub growth_step: usize,
    #[serde(default = "default_max_size_rounds")]
    pub max_size_rounds: usize,
    /// Node expansions allowed per search attempt.
    #[serde(default = "default_step_limit")]
    pub step_limit: usize,
    #[serde(default)]
    pub snake_fallback: bool,
}

fn default_min_grid_size() -> usize {
    4
}
fn default_max_grid_size() -> usize {
    10
}
fn default_attempts_per_size() -> usize {
    100
}
fn default_growth_step() -> usize {
    2
}
fn default_max_size_rounds() -> usize {
    3
}
fn default_step_limit() -> usize {
    DEFAULT_STEP_LIMIT
}

impl Default for WordSearchConfig {
    fn default() -> Self {
        Self {
            min_grid_size: default_min_grid_size(),
            max_grid_size: default_max_grid_size(),
            attempts_per_size: default_attempts_per_size(),
            growth_step: default_growth_step(),
            max_size_rounds: default_max_size_rounds(),
            step_limit: default_step_limit(),
            snake_fallback: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChoiceConfig {
    #[serde(default = "default_distractors")]
    pub distractors: usize,
    #[serde(default = "default_letter_options")]
    pub letter_options: usize,
    #[serde(default = "default_lives")]
    pub lives: u32,
}

fn default_distractors() -> usize {
    1
}
fn default_letter_options() -> usize {
    4
}
fn default_lives() -> u32 {
    3
}

impl Default for ChoiceConfig {
    fn default() -> Self {
        Self {
            distractors: default_distractors(),
            letter_options: default_letter_options(),
            lives: default_lives(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub mastery: MasteryConfig,
    #[serde(default)]
    pub word_search: WordSearchConfig,
    #[serde(default)]
    pub choices: ChoiceConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fieldguide")
            .join("config.toml")
    }

    /// Pull hand-edited values back into a range the algorithms can work with.
    /// Non-finite numbers (TOML accepts `nan` and `inf`) fall back to defaults.
    pub fn validate(&mut self) {
        let p = &mut self.pacing;
        if !(p.intro_window > 0.0 && p.intro_window <= 1.0) {
            p.intro_window = default_intro_window();
        }
        p.intro_probability_floor =
            finite_or(p.intro_probability_floor, default_intro_probability_floor).clamp(0.0, 1.0);
        p.intro_probability_span =
            finite_or(p.intro_probability_span, default_intro_probability_span).clamp(0.0, 1.0);
        p.min_group_weight = finite_or(p.min_group_weight, default_min_group_weight).max(0.0);
        p.min_exposure = finite_or(p.min_exposure, default_min_exposure).clamp(0.0, 100.0);
        p.primary_weight_floor =
            finite_or(p.primary_weight_floor, default_primary_weight_floor).max(0.0);
        p.alternate_weight_floor =
            finite_or(p.alternate_weight_floor, default_alternate_weight_floor).clamp(0.0, 1.0);

        let m = &mut self.mastery;
        m.intro_bootstrap = finite_or(m.intro_bootstrap, default_intro_bootstrap).clamp(0.0, 100.0);
        m.gain_min = finite_or(m.gain_min, default_gain_min).max(0.0);
        m.gain_max = finite_or(m.gain_max, default_gain_max).max(m.gain_min);
        m.gain_difficulty_scale = finite_or(m.gain_difficulty_scale, default_gain_difficulty_scale);
        m.diminishing_factor = finite_or(m.diminishing_factor, default_diminishing_factor);
        m.diminishing_floor = finite_or(m.diminishing_floor, default_diminishing_floor).max(0.0);
        m.penalty_base = finite_or(m.penalty_base, default_penalty_base);
        m.penalty_difficulty_scale =
            finite_or(m.penalty_difficulty_scale, default_penalty_difficulty_scale);

        let ws = &mut self.word_search;
        ws.max_grid_size = ws.max_grid_size.max(1);
        ws.min_grid_size = ws.min_grid_size.clamp(1, ws.max_grid_size);
        ws.attempts_per_size = ws.attempts_per_size.max(1);
        ws.max_size_rounds = ws.max_size_rounds.max(1);
        ws.step_limit = ws.step_limit.max(1);

        self.choices.letter_options = self.choices.letter_options.clamp(1, 26);
        self.choices.lives = self.choices.lives.max(1);
    }
}

fn finite_or(value: f64, default: fn() -> f64) -> f64 {
    if value.is_finite() { value } else { default() }
}
