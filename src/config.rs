use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Attributes requested when a drawing context is created.
///
/// Field names and defaults follow the WebGL context attribute dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    pub alpha: bool,
    pub depth: bool,
    pub stencil: bool,
    pub antialias: bool,
    pub premultiplied_alpha: bool,
    pub preserve_drawing_buffer: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            alpha: true,
            depth: true,
            stencil: false,
            antialias: true,
            premultiplied_alpha: true,
            preserve_drawing_buffer: false,
        }
    }
}

impl ContextOptions {
    pub fn with_stencil(mut self, stencil: bool) -> Self {
        self.stencil = stencil;
        self
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_preserve_drawing_buffer(mut self, preserve: bool) -> Self {
        self.preserve_drawing_buffer = preserve;
        self
    }
}

/// Timing knobs for [`crate::render_loop::RenderLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Target spacing between ticks when the loop drives itself natively.
    pub frame_interval: Duration,
    pub min_delta: Duration,
    pub max_delta: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_micros(16_667),
            min_delta: Duration::ZERO,
            max_delta: Duration::from_millis(250),
        }
    }
}

impl LoopConfig {
    /// Bounds a raw frame delta. When `min_delta` exceeds `max_delta`,
    /// `max_delta` wins.
    pub fn clamp_delta(&self, raw: Duration) -> Duration {
        raw.max(self.min_delta).min(self.max_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_webgl_attributes() {
        let options = ContextOptions::default();
        assert!(options.alpha && options.depth && options.antialias);
        assert!(!options.stencil);
        assert!(!options.preserve_drawing_buffer);
    }

    #[test]
    fn builder_overrides_fields() {
        let options = ContextOptions::default()
            .with_stencil(true)
            .with_antialias(false);
        assert!(options.stencil);
        assert!(!options.antialias);
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let options: ContextOptions = serde_json::from_str(r#"{ "stencil": true }"#).unwrap();
        assert_eq!(options, ContextOptions::default().with_stencil(true));

        let config: LoopConfig =
            serde_json::from_str(r#"{ "max_delta": { "secs": 0, "nanos": 100000000 } }"#).unwrap();
        assert_eq!(config.max_delta, Duration::from_millis(100));
        assert_eq!(config.frame_interval, LoopConfig::default().frame_interval);
    }

    #[test]
    fn inverted_delta_bounds_settle_on_max() {
        let config: LoopConfig = serde_json::from_str(
            r#"{ "min_delta": { "secs": 0, "nanos": 50000000 },
                 "max_delta": { "secs": 0, "nanos": 10000000 } }"#,
        )
        .unwrap();
        assert_eq!(config.clamp_delta(Duration::ZERO), Duration::from_millis(10));
        assert_eq!(config.clamp_delta(Duration::from_secs(1)), Duration::from_millis(10));
    }
}
