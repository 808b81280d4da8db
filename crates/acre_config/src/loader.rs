//! Configuration and design file loading and validation.

use crate::design::{DesignFormat, DesignSpec};
use crate::error::ConfigError;
use crate::types::FloorplanConfig;
use std::path::Path;

/// Loads and validates an `acre.toml` run configuration from a file.
pub fn load_config(path: &Path) -> Result<FloorplanConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a run configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<FloorplanConfig, ConfigError> {
    let config: FloorplanConfig =
        toml::from_str(content).map_err(parse_error)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that every configuration value is within its legal range.
///
/// Called by the loaders, and again by callers that override values after
/// loading.
pub fn validate_config(config: &FloorplanConfig) -> Result<(), ConfigError> {
    let w = &config.weights;
    for (name, value) in [
        ("weights.area", w.area),
        ("weights.wirelength", w.wirelength),
        ("weights.outline", w.outline),
        ("weights.boundary", w.boundary),
        ("weights.macro_blockage", w.macro_blockage),
        ("weights.location", w.location),
        ("weights.notch", w.notch),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }

    let m = &config.moves;
    for (name, value) in [
        ("moves.resize", m.resize),
        ("moves.pos_swap", m.pos_swap),
        ("moves.neg_swap", m.neg_swap),
        ("moves.double_swap", m.double_swap),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(invalid(format!("{name} must be in [0, 1], got {value}")));
        }
    }
    let total = m.resize + m.pos_swap + m.neg_swap + m.double_swap;
    if total > 1.0 + 1e-6 {
        return Err(invalid(format!(
            "move probabilities sum to {total}, which exceeds 1"
        )));
    }

    let a = &config.anneal;
    if !(a.init_prob > 0.0 && a.init_prob < 1.0) {
        return Err(invalid(format!(
            "anneal.init_prob must be in (0, 1), got {}",
            a.init_prob
        )));
    }
    if a.max_num_step < 1 {
        return Err(invalid("anneal.max_num_step must be at least 1".to_string()));
    }
    if a.perturb_per_step < 2 {
        return Err(invalid(
            "anneal.perturb_per_step must be at least 2".to_string(),
        ));
    }

    let s = &config.shrink;
    if !(s.factor > 0.0 && s.factor <= 1.0) {
        return Err(invalid(format!(
            "shrink.factor must be in (0, 1], got {}",
            s.factor
        )));
    }
    if !(s.freq > 0.0 && s.freq <= 1.0) {
        return Err(invalid(format!(
            "shrink.freq must be in (0, 1], got {}",
            s.freq
        )));
    }

    let p = &config.parallel;
    if p.num_worker < 1 {
        return Err(invalid("parallel.num_worker must be at least 1".to_string()));
    }
    if !(p.heat_rate > 0.0 && p.heat_rate.is_finite()) {
        return Err(invalid(format!(
            "parallel.heat_rate must be positive, got {}",
            p.heat_rate
        )));
    }
    for (name, value) in [
        ("parallel.cooling_rate_max", p.cooling_rate_max),
        ("parallel.cooling_rate_min", p.cooling_rate_min),
    ] {
        if !(value > 0.0 && value < 1.0) {
            return Err(invalid(format!("{name} must be in (0, 1), got {value}")));
        }
    }
    if p.cooling_rate_min > p.cooling_rate_max {
        return Err(invalid(format!(
            "parallel.cooling_rate_min ({}) exceeds parallel.cooling_rate_max ({})",
            p.cooling_rate_min, p.cooling_rate_max
        )));
    }

    let n = &config.notch;
    if !(n.max_threshold > 0.0) || !(n.outline_fraction > 0.0) {
        return Err(invalid(
            "notch.max_threshold and notch.outline_fraction must be positive".to_string(),
        ));
    }

    Ok(())
}

fn invalid(message: String) -> ConfigError {
    ConfigError::ValidationError(message)
}

fn parse_error(e: impl std::fmt::Display) -> ConfigError {
    ConfigError::ParseError(e.to_string())
}

fn require_outline(present: bool) -> Result<(), ConfigError> {
    if present {
        Ok(())
    } else {
        Err(ConfigError::MissingField("outline".to_string()))
    }
}

/// Loads a design description, choosing TOML or JSON by file extension.
pub fn load_design(path: &Path) -> Result<DesignSpec, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_design_from_str(&content, DesignFormat::from_path(path))
}

/// Parses a design description from a string in the given format.
///
/// Only the outline is checked here; names and shapes are checked when the
/// design is resolved.
pub fn load_design_from_str(
    content: &str,
    format: DesignFormat,
) -> Result<DesignSpec, ConfigError> {
    let design: DesignSpec = match format {
        DesignFormat::Toml => {
            let table: toml::Table = toml::from_str(content).map_err(parse_error)?;
            require_outline(table.contains_key("outline"))?;
            toml::Value::Table(table).try_into().map_err(parse_error)?
        }
        DesignFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(content).map_err(parse_error)?;
            require_outline(value.get("outline").is_some())?;
            serde_json::from_value(value).map_err(parse_error)?
        }
    };
    let outline = design.outline;
    if !(outline.width > 0.0 && outline.height > 0.0)
        || !outline.width.is_finite()
        || !outline.height.is_finite()
    {
        return Err(invalid(format!(
            "outline must have positive dimensions, got {} x {}",
            outline.width, outline.height
        )));
    }
    Ok(design)
}
