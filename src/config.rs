//! Startup settings, read from the environment.
//!
//! * `RPS_TICK_HZ`: round clock rate, default 30
//! * `RPS_WIN_THRESHOLD`: round wins needed to win the match, default 2
//! * `RPS_SEED`: seed for the computer's moves, random by default
//! * `RPS_WINDOW`: window size as `WIDTHxHEIGHT`, default `1280x720`
use std::str::FromStr;

use anyhow::{ensure, Context};

use crate::{game_flow::MatchRules, rules::ParseError};

#[derive(Clone, Debug, PartialEq)]
pub struct DuelConfig {
    pub tick_hz: f32,
    pub win_threshold: u32,
    pub seed: Option<u64>,
    pub window: WindowSize,
}
impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            tick_hz: 30.0,
            win_threshold: MatchRules::default().win_threshold,
            seed: None,
            window: WindowSize { width: 1280.0, height: 720.0 },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
}
impl FromStr for WindowSize {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseError::BadNumber(s.to_owned());
        let (width, height) = s.split_once(|c: char| c == 'x' || c == 'X').ok_or_else(bad)?;
        let dimension = |text: &str| text.trim().parse::<f32>().ok().filter(|v| *v > 0.0);
        match (dimension(width), dimension(height)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(bad()),
        }
    }
}

impl DuelConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build the config from a variable lookup, unset variables keep their
    /// default.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        fn parsed<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> anyhow::Result<Option<T>>
        where
            T: FromStr,
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            var(name)
                .map(|value| value.trim().parse().with_context(|| format!("{name}={value}")))
                .transpose()
        }
        let mut config = Self::default();
        if let Some(tick_hz) = parsed(&var, "RPS_TICK_HZ")? {
            config.tick_hz = tick_hz;
        }
        if let Some(win_threshold) = parsed(&var, "RPS_WIN_THRESHOLD")? {
            config.win_threshold = win_threshold;
        }
        if let Some(window) = parsed(&var, "RPS_WINDOW")? {
            config.window = window;
        }
        config.seed = parsed(&var, "RPS_SEED")?;

        let period = 1.0 / config.tick_hz;
        ensure!(
            config.tick_hz > 0.0 && config.tick_hz.is_finite() && period.is_finite(),
            "RPS_TICK_HZ must be a positive number with a finite period, got {}",
            config.tick_hz
        );
        ensure!(config.win_threshold >= 1, "RPS_WIN_THRESHOLD must be at least 1");
        Ok(config)
    }

    pub fn rules(&self) -> MatchRules {
        MatchRules { win_threshold: self.win_threshold }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<DuelConfig> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        DuelConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_vars() {
        assert_eq!(DuelConfig::default(), config_from(&[]).unwrap());
        assert_eq!(2, DuelConfig::default().rules().win_threshold);
    }
    #[test]
    fn reads_every_var() {
        let config = config_from(&[
            ("RPS_TICK_HZ", "60"),
            ("RPS_WIN_THRESHOLD", "3"),
            ("RPS_SEED", "1234"),
            ("RPS_WINDOW", "800x600"),
        ])
        .unwrap();
        assert_eq!(60.0, config.tick_hz);
        assert_eq!(3, config.rules().win_threshold);
        assert_eq!(Some(1234), config.seed);
        assert_eq!(WindowSize { width: 800.0, height: 600.0 }, config.window);
    }
    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("RPS_TICK_HZ", "0")]).is_err());
        assert!(config_from(&[("RPS_TICK_HZ", "fast")]).is_err());
        assert!(config_from(&[("RPS_TICK_HZ", "1e-40")]).is_err());
        assert!(config_from(&[("RPS_TICK_HZ", "inf")]).is_err());
        assert!(config_from(&[("RPS_WIN_THRESHOLD", "0")]).is_err());
        assert!(config_from(&[("RPS_SEED", "-1")]).is_err());
        let err = config_from(&[("RPS_WINDOW", "800")]).unwrap_err();
        assert!(format!("{err:#}").contains("RPS_WINDOW=800"));
    }
    #[test]
    fn window_size_parsing() {
        assert_eq!(Ok(WindowSize { width: 640.0, height: 480.0 }), "640X480".parse());
        assert_eq!(Err(ParseError::BadNumber("0x480".into())), "0x480".parse::<WindowSize>());
    }
}
