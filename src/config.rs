use crate::diagnostics::LogLevel;

const DEFAULT_LAZY_MARGIN_PX: u32 = 200;
const DEFAULT_LAZY_THRESHOLD_PERCENT: u32 = 5;
const DEFAULT_HOLD_DELAY_MS: u32 = 400;
const DEFAULT_PARALLAX_SPEED_PERCENT: u32 = 30;
const DEFAULT_NAV_BREAKPOINT_PX: u32 = 768;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const DEFAULT_ASSET_BASE: &str = "assets/fondos/";
const MODAL_BACKDROP_FILE: &str = "fondo-modal.gif";

const LAZY_MARGIN_PX_BOUNDS: (u32, u32) = (0, 2_000);
const LAZY_THRESHOLD_PERCENT_BOUNDS: (u32, u32) = (0, 100);
const HOLD_DELAY_MS_BOUNDS: (u32, u32) = (100, 5_000);
const PARALLAX_SPEED_PERCENT_BOUNDS: (u32, u32) = (0, 100);
const NAV_BREAKPOINT_PX_BOUNDS: (u32, u32) = (320, 2_560);

/// Page-level tuning read once at start-up from `data-*` attributes on `<body>`.
#[derive(Clone, Debug, PartialEq)]
pub struct UiConfig {
    pub log_level: LogLevel,
    pub lazy_margin_px: u32,
    pub lazy_threshold: f64,
    pub hold_delay_ms: u32,
    pub parallax_speed: f64,
    pub nav_breakpoint_px: u32,
    pub asset_base: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            lazy_margin_px: DEFAULT_LAZY_MARGIN_PX,
            lazy_threshold: f64::from(DEFAULT_LAZY_THRESHOLD_PERCENT) / 100.0,
            hold_delay_ms: DEFAULT_HOLD_DELAY_MS,
            parallax_speed: f64::from(DEFAULT_PARALLAX_SPEED_PERCENT) / 100.0,
            nav_breakpoint_px: DEFAULT_NAV_BREAKPOINT_PX,
            asset_base: DEFAULT_ASSET_BASE.to_string(),
        }
    }
}

impl UiConfig {
    /// `lookup` receives dataset keys in camelCase (`lazyMargin`, `holdDelay`, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_level = parse_non_empty(&lookup, "logLevel")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);
        let lazy_margin_px = parse_u32_with_bounds(
            &lookup,
            "lazyMargin",
            DEFAULT_LAZY_MARGIN_PX,
            LAZY_MARGIN_PX_BOUNDS,
        );
        let lazy_threshold_percent = parse_u32_with_bounds(
            &lookup,
            "lazyThreshold",
            DEFAULT_LAZY_THRESHOLD_PERCENT,
            LAZY_THRESHOLD_PERCENT_BOUNDS,
        );
        let hold_delay_ms = parse_u32_with_bounds(
            &lookup,
            "holdDelay",
            DEFAULT_HOLD_DELAY_MS,
            HOLD_DELAY_MS_BOUNDS,
        );
        let parallax_speed_percent = parse_u32_with_bounds(
            &lookup,
            "parallaxSpeed",
            DEFAULT_PARALLAX_SPEED_PERCENT,
            PARALLAX_SPEED_PERCENT_BOUNDS,
        );
        let nav_breakpoint_px = parse_u32_with_bounds(
            &lookup,
            "navBreakpoint",
            DEFAULT_NAV_BREAKPOINT_PX,
            NAV_BREAKPOINT_PX_BOUNDS,
        );
        let asset_base = parse_non_empty(&lookup, "backgroundBase")
            .map(|value| asset_base_from_background(&value))
            .unwrap_or_else(|| DEFAULT_ASSET_BASE.to_string());

        Self {
            log_level,
            lazy_margin_px,
            lazy_threshold: f64::from(lazy_threshold_percent) / 100.0,
            hold_delay_ms,
            parallax_speed: f64::from(parallax_speed_percent) / 100.0,
            nav_breakpoint_px,
            asset_base,
        }
    }

    pub fn lazy_root_margin(&self) -> String {
        format!("0px 0px {}px 0px", self.lazy_margin_px)
    }

    pub fn modal_backdrop_path(&self) -> String {
        format!("{}{MODAL_BACKDROP_FILE}", self.asset_base)
    }
}

fn parse_non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u32_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u32,
    bounds: (u32, u32),
) -> u32 {
    parse_non_empty(lookup, key)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

/// The page advertises its general background (`.../fondo-gral-desktop.webp`);
/// sibling assets live in the same directory.
fn asset_base_from_background(background: &str) -> String {
    let lower = background.to_ascii_lowercase();
    match lower.find("fondo-gral") {
        Some(position) => background[..position].to_string(),
        None => background.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_attributes_use_defaults() {
        let config = UiConfig::from_lookup(|_| None);
        assert_eq!(config, UiConfig::default());
        assert_eq!(config.lazy_root_margin(), "0px 0px 200px 0px");
        assert_eq!(config.hold_delay_ms, 400);
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let config = UiConfig::from_lookup(lookup_from(&[
            ("holdDelay", "20"),
            ("lazyMargin", "not-a-number"),
            ("navBreakpoint", " 1024 "),
            ("logLevel", "debug"),
        ]));

        assert_eq!(config.hold_delay_ms, DEFAULT_HOLD_DELAY_MS);
        assert_eq!(config.lazy_margin_px, DEFAULT_LAZY_MARGIN_PX);
        assert_eq!(config.nav_breakpoint_px, 1024);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn percentages_become_fractions() {
        let config = UiConfig::from_lookup(lookup_from(&[
            ("parallaxSpeed", "50"),
            ("lazyThreshold", "10"),
        ]));

        assert!((config.parallax_speed - 0.5).abs() < f64::EPSILON);
        assert!((config.lazy_threshold - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn asset_base_strips_background_file_name() {
        let config = UiConfig::from_lookup(lookup_from(&[(
            "backgroundBase",
            "../../assets/fondos/Fondo-Gral-desktop.webp",
        )]));

        assert_eq!(config.asset_base, "../../assets/fondos/");
        assert_eq!(
            config.modal_backdrop_path(),
            "../../assets/fondos/fondo-modal.gif"
        );
    }
}
