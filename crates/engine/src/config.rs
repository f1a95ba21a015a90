//! Loop configuration.
//!
//! Read from `GG_*` environment variables; anything missing, unparsable or
//! out of range falls back to the default.
//!
//! - `GG_WIDTH`, `GG_HEIGHT`: frame buffer size (default 80x24)
//! - `GG_FPS`: frame-rate cap (default 60)
//! - `GG_TIME_SCALE`: multiplier applied to `dt` (default 1.0)
//! - `GG_INPUT_QUEUE`: pending input events kept (default 8)
//! - `GG_FRAME_LIMIT`: stop after this many frames (default unlimited)
//! - `GG_DEBUG`: `1`/`true` enables debug logging and overlays

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::types::{
    DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_INPUT_QUEUE_DEPTH, DEFAULT_TIME_SCALE, DEFAULT_WIDTH,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    pub width: u16,
    pub height: u16,
    pub target_fps: f64,
    pub time_scale: f64,
    pub input_queue_depth: usize,
    pub frame_limit: Option<u64>,
    pub debug: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            target_fps: DEFAULT_FPS,
            time_scale: DEFAULT_TIME_SCALE,
            input_queue_depth: DEFAULT_INPUT_QUEUE_DEPTH,
            frame_limit: None,
            debug: false,
        }
    }
}

impl LoopConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            width: parse_positive(get("GG_WIDTH"), 0).unwrap_or(d.width),
            height: parse_positive(get("GG_HEIGHT"), 0).unwrap_or(d.height),
            target_fps: parse_positive(get("GG_FPS"), 0.0).unwrap_or(d.target_fps),
            time_scale: parse_positive(get("GG_TIME_SCALE"), 0.0).unwrap_or(d.time_scale),
            input_queue_depth: parse_positive(get("GG_INPUT_QUEUE"), 0)
                .unwrap_or(d.input_queue_depth),
            frame_limit: parse_positive(get("GG_FRAME_LIMIT"), 0),
            debug: get("GG_DEBUG").as_deref().is_some_and(is_truthy),
        }
    }

    /// Wall-clock budget of one frame.
    pub fn target_frame_duration(&self) -> Duration {
        if self.target_fps.is_finite() && self.target_fps > 0.0 {
            Duration::from_secs_f64(1.0 / self.target_fps)
        } else {
            Duration::ZERO
        }
    }
}

pub(crate) fn is_truthy(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_positive<T: FromStr + PartialOrd>(raw: Option<String>, zero: T) -> Option<T> {
    raw?.trim().parse::<T>().ok().filter(|v| *v > zero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        assert_eq!(LoopConfig::from_lookup(|_| None), LoopConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let cfg = LoopConfig::from_lookup(lookup(&[
            ("GG_WIDTH", "120"),
            ("GG_HEIGHT", "40"),
            ("GG_FPS", "30"),
            ("GG_TIME_SCALE", "0.5"),
            ("GG_INPUT_QUEUE", "4"),
            ("GG_FRAME_LIMIT", "100"),
            ("GG_DEBUG", "true"),
        ]));
        assert_eq!(cfg.width, 120);
        assert_eq!(cfg.height, 40);
        assert_eq!(cfg.target_fps, 30.0);
        assert_eq!(cfg.time_scale, 0.5);
        assert_eq!(cfg.input_queue_depth, 4);
        assert_eq!(cfg.frame_limit, Some(100));
        assert!(cfg.debug);
    }

    #[test]
    fn rejects_garbage_and_non_positive() {
        let cfg = LoopConfig::from_lookup(lookup(&[
            ("GG_WIDTH", "0"),
            ("GG_FPS", "-5"),
            ("GG_TIME_SCALE", "fast"),
            ("GG_FRAME_LIMIT", "0"),
        ]));
        assert_eq!(cfg.width, DEFAULT_WIDTH);
        assert_eq!(cfg.target_fps, DEFAULT_FPS);
        assert_eq!(cfg.time_scale, DEFAULT_TIME_SCALE);
        assert_eq!(cfg.frame_limit, None);
    }

    #[test]
    fn frame_duration_from_fps() {
        let cfg = LoopConfig {
            target_fps: 4.0,
            ..LoopConfig::default()
        };
        assert_eq!(cfg.target_frame_duration(), Duration::from_millis(250));
    }
}
