//! Scene configuration
//!
//! Every tunable of the scene — particle counts, cone dimensions, damping
//! rates, palette — lives here with defaults matching the reference look.
//! A YAML document can override any subset of fields.

use serde::Deserialize;

use crate::math::Vec3;

/// Top-level scene parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for the deterministic scene RNG
    pub seed: u32,
    pub foliage: FoliageConfig,
    pub boxes: OrnamentTuning,
    pub balls: OrnamentTuning,
    pub lights: OrnamentTuning,
    pub emeralds: OrnamentTuning,
    pub dust: DustConfig,
    pub star: StarConfig,
    pub post: PostConfig,
}

/// Foliage point-cloud parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FoliageConfig {
    pub count: usize,
    pub chaos_radius: f32,
    pub height: f32,
    pub base_radius: f32,
    pub y_offset: f32,
    pub damp_rate: f32,
    /// Deep shadow green
    pub color_low: String,
    /// Needle-tip emerald
    pub color_high: String,
    /// Sparkle glint
    pub color_sparkle: String,
}

/// One ornament category; four of these configure the instanced groups.
/// Overriding a category in YAML replaces it whole — no field-level merge,
/// so a partial override cannot silently inherit another category's values.
#[derive(Debug, Clone, Deserialize)]
pub struct OrnamentTuning {
    pub count: usize,
    pub damp_rate: f32,
    pub mass: f32,
    pub base_radius: f32,
    /// x/z multiplier pushing instances onto (or into) the foliage shell
    pub radial_push: f32,
    pub scale_min: f32,
    pub scale_range: f32,
    pub primary: String,
    pub secondary: String,
    /// Probability of the primary color; 1.0 disables the secondary
    pub primary_weight: f32,
    /// Color multiplier for emissive categories
    pub emissive_boost: f32,
}

/// Ambient dust parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DustConfig {
    pub count: usize,
    pub attraction_radius: f32,
    pub attraction_strength: f32,
    /// Base drift velocity magnitude per axis
    pub drift: f32,
    pub velocity_damping: f32,
    pub wrap_range: f32,
    pub spawn_extent_xy: f32,
    pub spawn_extent_z: f32,
    pub scale_min: f32,
    pub scale_range: f32,
    pub color: String,
    pub emissive: String,
}

/// Apex star parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub apex_height: f32,
    pub chaos_radius: f32,
    pub damp_rate: f32,
    pub scale_min: f32,
    pub scale_max: f32,
    pub color: String,
}

/// Postprocessing parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    pub bloom_threshold: f32,
    pub bloom_strength: f32,
    pub vignette_strength: f32,
    pub exposure: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            foliage: FoliageConfig::default(),
            boxes: OrnamentTuning {
                count: 100,
                damp_rate: 1.0,
                mass: 0.8,
                base_radius: 6.0,
                radial_push: 1.15,
                scale_min: 0.4,
                scale_range: 0.3,
                primary: "#d97706".into(),
                secondary: "#b91c1c".into(),
                primary_weight: 0.7,
                emissive_boost: 1.0,
            },
            balls: OrnamentTuning {
                count: 300,
                damp_rate: 2.0,
                mass: 1.5,
                base_radius: 6.0,
                radial_push: 1.15,
                scale_min: 0.3,
                scale_range: 0.2,
                primary: "#fbbf24".into(),
                secondary: "#ef4444".into(),
                primary_weight: 0.8,
                emissive_boost: 1.0,
            },
            lights: OrnamentTuning {
                count: 600,
                damp_rate: 4.0,
                mass: 3.0,
                base_radius: 6.0,
                radial_push: 1.15,
                scale_min: 0.1,
                scale_range: 0.0,
                primary: "#fffbeb".into(),
                secondary: "#fffbeb".into(),
                primary_weight: 1.0,
                emissive_boost: 2.0,
            },
            emeralds: OrnamentTuning {
                count: 700,
                damp_rate: 1.5,
                mass: 1.2,
                base_radius: 5.8,
                radial_push: 0.95,
                scale_min: 0.3,
                scale_range: 0.2,
                primary: "#047857".into(),
                secondary: "#047857".into(),
                primary_weight: 1.0,
                emissive_boost: 1.5,
            },
            dust: DustConfig::default(),
            star: StarConfig::default(),
            post: PostConfig::default(),
        }
    }
}

impl Default for FoliageConfig {
    fn default() -> Self {
        Self {
            count: 15000,
            chaos_radius: 20.0,
            height: 14.0,
            base_radius: 6.0,
            y_offset: -6.0,
            damp_rate: 1.5,
            color_low: "#022c22".into(),
            color_high: "#34d399".into(),
            color_sparkle: "#fbbf24".into(),
        }
    }
}

impl Default for DustConfig {
    fn default() -> Self {
        Self {
            count: 500,
            attraction_radius: 12.0,
            attraction_strength: 0.008,
            drift: 0.01,
            velocity_damping: 0.95,
            wrap_range: 18.0,
            spawn_extent_xy: 35.0,
            spawn_extent_z: 25.0,
            scale_min: 0.02,
            scale_range: 0.1,
            color: "#fbbf24".into(),
            emissive: "#d97706".into(),
        }
    }
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            apex_height: 8.5,
            chaos_radius: 25.0,
            damp_rate: 1.0,
            scale_min: 0.3,
            scale_max: 0.6,
            color: "#ffd700".into(),
        }
    }
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            bloom_threshold: 0.7,
            bloom_strength: 1.5,
            vignette_strength: 0.5,
            exposure: 1.1,
        }
    }
}

impl SceneConfig {
    /// Parse from a YAML string; missing fields fall back to defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: SceneConfig =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges and palette strings
    pub fn validate(&self) -> Result<(), String> {
        if self.foliage.count == 0 {
            return Err("foliage.count must be nonzero".into());
        }
        if self.foliage.height <= 0.0 || self.foliage.base_radius <= 0.0 {
            return Err("foliage cone dimensions must be positive".into());
        }
        for (name, tuning) in self.ornament_tunings() {
            if tuning.count == 0 {
                return Err(format!("{}.count must be nonzero", name));
            }
            if tuning.damp_rate <= 0.0 {
                return Err(format!("{}.damp_rate must be positive", name));
            }
            if !(0.0..=1.0).contains(&tuning.primary_weight) {
                return Err(format!("{}.primary_weight must be within [0, 1]", name));
            }
            Vec3::from_hex(&tuning.primary)?;
            Vec3::from_hex(&tuning.secondary)?;
        }
        if self.dust.count == 0 || self.dust.wrap_range <= 0.0 {
            return Err("dust.count and dust.wrap_range must be positive".into());
        }
        if !(0.0..1.0).contains(&self.dust.velocity_damping) {
            return Err("dust.velocity_damping must be within [0, 1)".into());
        }
        Vec3::from_hex(&self.foliage.color_low)?;
        Vec3::from_hex(&self.foliage.color_high)?;
        Vec3::from_hex(&self.foliage.color_sparkle)?;
        Vec3::from_hex(&self.dust.color)?;
        Vec3::from_hex(&self.dust.emissive)?;
        Vec3::from_hex(&self.star.color)?;
        Ok(())
    }

    fn ornament_tunings(&self) -> [(&'static str, &OrnamentTuning); 4] {
        [
            ("boxes", &self.boxes),
            ("balls", &self.balls),
            ("lights", &self.lights),
            ("emeralds", &self.emeralds),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let yaml = r#"
foliage:
  count: 5000
dust:
  count: 100
"#;
        let config = SceneConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.foliage.count, 5000);
        assert_eq!(config.dust.count, 100);
        // Untouched fields keep the defaults
        assert_eq!(config.balls.count, 300);
        assert!((config.foliage.height - 14.0).abs() < 0.0001);
    }

    #[test]
    fn test_bad_color_rejected() {
        let yaml = r#"
foliage:
  color_high: "not-a-color"
"#;
        assert!(SceneConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut config = SceneConfig::default();
        config.boxes.count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_group_override_is_rejected() {
        // Ornament categories are replaced whole, never merged
        let yaml = "boxes:\n  count: 50\n";
        assert!(SceneConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        assert!(SceneConfig::from_yaml(": not yaml [").is_err());
    }

    #[test]
    fn test_damping_range_rejected() {
        let yaml = "dust:\n  velocity_damping: 1.5\n";
        assert!(SceneConfig::from_yaml(yaml).is_err());
    }
}
