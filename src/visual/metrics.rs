//! Frame metrics for automated visual verification
//!
//! The bloom chain and the palette are hard to assert from unit tests alone,
//! so rendered frames can be read back and analyzed on the CPU. A harness
//! grabs pixels, feeds them through [`analyze_frame`], and checks the result
//! against [`FrameCriteria`].

use wasm_bindgen::prelude::*;

/// Bloom threshold used by the postprocessing chain
const BLOOM_THRESHOLD: f32 = 0.7;

/// Aggregate statistics over one rendered frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameMetrics {
    /// Mean luminance (Rec. 709), 0..1
    pub avg_brightness: f32,
    /// Brightest luminance found
    pub max_brightness: f32,
    /// Fraction of pixels hot enough to feed the bloom pass
    pub bloom_coverage: f32,
    /// Fraction of pixels in the warm gold band
    pub gold_coverage: f32,
    /// Fraction of pixels in the green/emerald band
    pub emerald_coverage: f32,
    /// Fraction of near-black pixels
    pub dark_fraction: f32,
}

/// Analyze RGBA pixel data (4 bytes per pixel)
pub fn analyze_frame(pixels: &[u8], width: u32, height: u32) -> FrameMetrics {
    let pixel_count = (width * height) as usize;
    if pixel_count == 0 || pixels.len() < pixel_count * 4 {
        return FrameMetrics::default();
    }

    let mut total_luma = 0.0f64;
    let mut max_luma = 0.0f32;
    let mut bloom = 0u32;
    let mut gold = 0u32;
    let mut emerald = 0u32;
    let mut dark = 0u32;

    for i in 0..pixel_count {
        let r = pixels[i * 4] as f32 / 255.0;
        let g = pixels[i * 4 + 1] as f32 / 255.0;
        let b = pixels[i * 4 + 2] as f32 / 255.0;

        let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        total_luma += f64::from(luma);
        max_luma = max_luma.max(luma);

        if luma > BLOOM_THRESHOLD {
            bloom += 1;
        }
        if luma < 0.05 {
            dark += 1;
            continue;
        }

        match hue_degrees(r, g, b) {
            Some(hue) if (25.0..70.0).contains(&hue) => gold += 1,
            Some(hue) if (120.0..180.0).contains(&hue) => emerald += 1,
            _ => {}
        }
    }

    let n = pixel_count as f32;
    FrameMetrics {
        avg_brightness: (total_luma / f64::from(n)) as f32,
        max_brightness: max_luma,
        bloom_coverage: bloom as f32 / n,
        gold_coverage: gold as f32 / n,
        emerald_coverage: emerald as f32 / n,
        dark_fraction: dark as f32 / n,
    }
}

/// Hue in degrees, or None for achromatic pixels
fn hue_degrees(r: f32, g: f32, b: f32) -> Option<f32> {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta < 0.05 {
        return None;
    }

    let hue = if (max - r).abs() < f32::EPSILON {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if (max - g).abs() < f32::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    Some(hue.rem_euclid(360.0))
}

/// Acceptance bands for a formed-tree frame
#[derive(Debug, Clone, Copy)]
pub struct FrameCriteria {
    pub min_brightness: f32,
    pub max_dark_fraction: f32,
    pub min_bloom_coverage: f32,
    pub min_emerald_coverage: f32,
    pub min_gold_coverage: f32,
}

impl Default for FrameCriteria {
    fn default() -> Self {
        Self {
            min_brightness: 0.03,
            max_dark_fraction: 0.95,
            min_bloom_coverage: 0.002,
            min_emerald_coverage: 0.05,
            min_gold_coverage: 0.001,
        }
    }
}

impl FrameCriteria {
    /// List every violated criterion; empty means the frame passes
    pub fn violations(&self, metrics: &FrameMetrics) -> Vec<String> {
        let mut failures = Vec::new();
        if metrics.avg_brightness < self.min_brightness {
            failures.push(format!(
                "avg brightness {:.3} below {:.3}",
                metrics.avg_brightness, self.min_brightness
            ));
        }
        if metrics.dark_fraction > self.max_dark_fraction {
            failures.push(format!(
                "dark fraction {:.3} above {:.3}",
                metrics.dark_fraction, self.max_dark_fraction
            ));
        }
        if metrics.bloom_coverage < self.min_bloom_coverage {
            failures.push(format!(
                "bloom coverage {:.4} below {:.4}",
                metrics.bloom_coverage, self.min_bloom_coverage
            ));
        }
        if metrics.emerald_coverage < self.min_emerald_coverage {
            failures.push(format!(
                "emerald coverage {:.3} below {:.3}",
                metrics.emerald_coverage, self.min_emerald_coverage
            ));
        }
        if metrics.gold_coverage < self.min_gold_coverage {
            failures.push(format!(
                "gold coverage {:.4} below {:.4}",
                metrics.gold_coverage, self.min_gold_coverage
            ));
        }
        failures
    }
}

/// JS-facing wrapper so a test harness can analyze canvas readbacks
#[wasm_bindgen]
pub struct FrameAnalyzer {
    metrics: FrameMetrics,
}

#[wasm_bindgen]
impl FrameAnalyzer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> FrameAnalyzer {
        FrameAnalyzer {
            metrics: FrameMetrics::default(),
        }
    }

    pub fn analyze(&mut self, pixels: &[u8], width: u32, height: u32) {
        self.metrics = analyze_frame(pixels, width, height);
    }

    pub fn avg_brightness(&self) -> f32 {
        self.metrics.avg_brightness
    }

    pub fn max_brightness(&self) -> f32 {
        self.metrics.max_brightness
    }

    pub fn bloom_coverage(&self) -> f32 {
        self.metrics.bloom_coverage
    }

    pub fn gold_coverage(&self) -> f32 {
        self.metrics.gold_coverage
    }

    pub fn emerald_coverage(&self) -> f32 {
        self.metrics.emerald_coverage
    }

    pub fn dark_fraction(&self) -> f32 {
        self.metrics.dark_fraction
    }

    /// Check against the default formed-tree criteria
    pub fn passes(&self) -> bool {
        FrameCriteria::default().violations(&self.metrics).is_empty()
    }
}

impl Default for FrameAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(rgb: [u8; 3], count: usize) -> Vec<u8> {
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        pixels
    }

    #[test]
    fn test_black_frame() {
        let pixels = solid_frame([0, 0, 0], 64);
        let m = analyze_frame(&pixels, 8, 8);
        assert_eq!(m.avg_brightness, 0.0);
        assert_eq!(m.bloom_coverage, 0.0);
        assert_eq!(m.dark_fraction, 1.0);
    }

    #[test]
    fn test_gold_frame_feeds_bloom() {
        // Amber #fbbf24 is bright and warm
        let pixels = solid_frame([251, 191, 36], 64);
        let m = analyze_frame(&pixels, 8, 8);
        assert_eq!(m.gold_coverage, 1.0);
        assert_eq!(m.emerald_coverage, 0.0);
        assert!(m.bloom_coverage > 0.99);
        assert!(m.max_brightness > 0.7);
    }

    #[test]
    fn test_emerald_frame_classified() {
        // Emerald #34d399
        let pixels = solid_frame([52, 211, 153], 64);
        let m = analyze_frame(&pixels, 8, 8);
        assert_eq!(m.emerald_coverage, 1.0);
        assert_eq!(m.gold_coverage, 0.0);
    }

    #[test]
    fn test_truncated_input_yields_default() {
        let m = analyze_frame(&[255, 255], 8, 8);
        assert_eq!(m.avg_brightness, 0.0);
        assert_eq!(m.max_brightness, 0.0);
    }

    #[test]
    fn test_hue_bands() {
        assert!(hue_degrees(1.0, 0.75, 0.14).unwrap() > 25.0);
        assert!(hue_degrees(0.2, 0.83, 0.6).unwrap() > 120.0);
        // Gray is achromatic
        assert!(hue_degrees(0.5, 0.5, 0.5).is_none());
    }

    #[test]
    fn test_criteria_on_mixed_frame() {
        // Two-thirds emerald scene, one-third hot gold highlights
        let mut pixels = solid_frame([52, 211, 153], 44);
        pixels.extend(solid_frame([255, 220, 90], 20));
        let m = analyze_frame(&pixels, 8, 8);
        assert!(FrameCriteria::default().violations(&m).is_empty());
    }

    #[test]
    fn test_criteria_rejects_black_frame() {
        let pixels = solid_frame([0, 0, 0], 64);
        let m = analyze_frame(&pixels, 8, 8);
        let failures = FrameCriteria::default().violations(&m);
        assert!(!failures.is_empty());
    }
}
