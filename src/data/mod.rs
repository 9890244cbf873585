//! Default attribute network and its vocabulary.
//!
//! Node names are the engine's stable feature vocabulary: constraints map
//! onto them, the assembler reads them, and the learner writes back
//! through them. The default network wires the static tables in
//! [`tables`] into a ~17-node DAG.

pub mod tables;

use std::collections::BTreeMap;

use crate::engine::distribution::{
    Categorical, Conditional, Distribution, Gaussian, NumericClamp,
};
use crate::engine::errors::EngineError;
use crate::engine::graph::{AttributeNetwork, NodeKind};

pub const NODE_BROWSER: &str = "browser";
pub const NODE_BROWSER_VERSION: &str = "browser_version";
pub const NODE_DEVICE_TYPE: &str = "device_type";
pub const NODE_PLATFORM: &str = "platform";
pub const NODE_SCREEN_RESOLUTION: &str = "screen_resolution";
pub const NODE_HARDWARE_CONCURRENCY: &str = "hardware_concurrency";
pub const NODE_DEVICE_MEMORY: &str = "device_memory";
pub const NODE_TOUCH_SUPPORT: &str = "touch_support";
pub const NODE_GPU_VENDOR: &str = "gpu_vendor";
pub const NODE_GPU_MODEL: &str = "gpu_model";
pub const NODE_REGION: &str = "region";
pub const NODE_LOCALE: &str = "locale";
pub const NODE_TIMEZONE: &str = "timezone";
pub const NODE_HTTP_VERSION: &str = "http_version";
pub const NODE_COOKIE_COUNT: &str = "cookie_count";
pub const NODE_PLUGIN_COUNT: &str = "plugin_count";
pub const NODE_MEDIA_DEVICE_COUNT: &str = "media_device_count";

/// Recognized constraint vocabularies.
pub const SUPPORTED_BROWSERS: &[&str] = &["chrome", "edge", "firefox", "safari"];
pub const SUPPORTED_DEVICE_TYPES: &[&str] = &["desktop", "mobile", "tablet"];
pub const SUPPORTED_PLATFORMS: &[&str] = &["windows", "macos", "linux", "android", "ios"];
pub const SUPPORTED_REGIONS: &[&str] = &["americas", "europe", "asia_pacific"];
pub const SUPPORTED_HTTP_VERSIONS: &[&str] = &["1.1", "2", "3"];

/// UTC offset minutes and DST flag for a timezone name; unknown names
/// (e.g. learned from observations) fall back to UTC with no DST.
pub fn timezone_profile(name: &str) -> (i32, bool) {
    tables::TIMEZONE_TABLE
        .iter()
        .find(|(tz, _, _)| *tz == name)
        .map(|(_, offset, dst)| (*offset, *dst))
        .unwrap_or((0, false))
}

fn weighted(pairs: &[(&str, f64)]) -> Result<Distribution, EngineError> {
    let values = pairs.iter().map(|(v, _)| v.to_string()).collect();
    let weights = pairs.iter().map(|(_, w)| *w).collect();
    Ok(Distribution::Categorical(Categorical::new(values, weights)?))
}

fn conditional_weighted(
    table: &[(&str, &[(&str, f64)])],
    default: &[(&str, f64)],
) -> Result<Distribution, EngineError> {
    let mut cases = BTreeMap::new();
    for (key, pairs) in table {
        cases.insert(key.to_string(), weighted(pairs)?);
    }
    Ok(Distribution::Conditional(Conditional {
        cases,
        default: Box::new(weighted(default)?),
    }))
}

fn rounded_gaussian(mean: f64, variance: f64, min: f64, max: f64) -> Result<Distribution, EngineError> {
    Ok(Distribution::Gaussian(Gaussian::new(
        mean,
        variance,
        NumericClamp {
            min: Some(min),
            max: Some(max),
            round: true,
        },
    )?))
}

fn conditional_gaussian(
    table: &[(&str, f64, f64, f64, f64)],
    default: (f64, f64, f64, f64),
) -> Result<Distribution, EngineError> {
    let mut cases = BTreeMap::new();
    for (key, mean, variance, min, max) in table {
        cases.insert(key.to_string(), rounded_gaussian(*mean, *variance, *min, *max)?);
    }
    let (mean, variance, min, max) = default;
    Ok(Distribution::Conditional(Conditional {
        cases,
        default: Box::new(rounded_gaussian(mean, variance, min, max)?),
    }))
}

/// Builds the default attribute network from the static tables.
///
/// Structure (parents → child):
///
/// ```text
/// browser ──┬─ browser_version
///           ├─ device_type ──┬─ platform (also ← browser)
///           ├─ http_version  ├─ hardware_concurrency
///           └─ plugin_count  ├─ device_memory
///                            ├─ touch_support
///                            ├─ media_device_count
///                            └─ screen_resolution (also ← platform)
/// platform ── gpu_vendor ── gpu_model
/// region ──┬─ locale
///          └─ timezone
/// cookie_count (root)
/// ```
pub fn default_network() -> Result<AttributeNetwork, EngineError> {
    use tables::*;

    let mut network = AttributeNetwork::new();

    network.add_node(
        NODE_BROWSER,
        NodeKind::Categorical,
        &[],
        weighted(BROWSER_SHARES)?,
    )?;
    network.add_node(
        NODE_REGION,
        NodeKind::Categorical,
        &[],
        weighted(REGION_SHARES)?,
    )?;
    let (mean, variance, min, max) = COOKIE_PARAMS;
    network.add_node(
        NODE_COOKIE_COUNT,
        NodeKind::Numerical,
        &[],
        rounded_gaussian(mean, variance, min, max)?,
    )?;

    network.add_node(
        NODE_BROWSER_VERSION,
        NodeKind::Categorical,
        &[NODE_BROWSER],
        conditional_weighted(VERSION_SHARES, CHROME_VERSIONS)?,
    )?;
    network.add_node(
        NODE_DEVICE_TYPE,
        NodeKind::Categorical,
        &[NODE_BROWSER],
        conditional_weighted(DEVICE_SHARES, DEVICE_SHARES_DEFAULT)?,
    )?;
    network.add_node(
        NODE_HTTP_VERSION,
        NodeKind::Categorical,
        &[NODE_BROWSER],
        conditional_weighted(HTTP_SHARES, HTTP_SHARES_DEFAULT)?,
    )?;
    network.add_node(
        NODE_PLUGIN_COUNT,
        NodeKind::Numerical,
        &[NODE_BROWSER],
        conditional_gaussian(PLUGIN_PARAMS, PLUGIN_PARAMS_DEFAULT)?,
    )?;

    network.add_node(
        NODE_LOCALE,
        NodeKind::Categorical,
        &[NODE_REGION],
        conditional_weighted(LOCALE_SHARES, LOCALE_SHARES_DEFAULT)?,
    )?;
    network.add_node(
        NODE_TIMEZONE,
        NodeKind::Categorical,
        &[NODE_REGION],
        conditional_weighted(TIMEZONE_SHARES, TIMEZONE_SHARES_DEFAULT)?,
    )?;

    network.add_node(
        NODE_PLATFORM,
        NodeKind::Categorical,
        &[NODE_BROWSER, NODE_DEVICE_TYPE],
        conditional_weighted(PLATFORM_SHARES, PLATFORM_SHARES_DEFAULT)?,
    )?;
    network.add_node(
        NODE_HARDWARE_CONCURRENCY,
        NodeKind::Numerical,
        &[NODE_DEVICE_TYPE],
        conditional_gaussian(CONCURRENCY_PARAMS, CONCURRENCY_PARAMS_DEFAULT)?,
    )?;
    network.add_node(
        NODE_DEVICE_MEMORY,
        NodeKind::Categorical,
        &[NODE_DEVICE_TYPE],
        conditional_weighted(MEMORY_SHARES, MEMORY_SHARES_DEFAULT)?,
    )?;
    network.add_node(
        NODE_TOUCH_SUPPORT,
        NodeKind::Binary,
        &[NODE_DEVICE_TYPE],
        conditional_weighted(TOUCH_SHARES, TOUCH_SHARES_DEFAULT)?,
    )?;
    network.add_node(
        NODE_MEDIA_DEVICE_COUNT,
        NodeKind::Numerical,
        &[NODE_DEVICE_TYPE],
        conditional_gaussian(MEDIA_DEVICE_PARAMS, MEDIA_DEVICE_PARAMS_DEFAULT)?,
    )?;
    network.add_node(
        NODE_SCREEN_RESOLUTION,
        NodeKind::Categorical,
        &[NODE_DEVICE_TYPE, NODE_PLATFORM],
        conditional_weighted(SCREEN_SHARES, SCREEN_SHARES_DEFAULT)?,
    )?;

    network.add_node(
        NODE_GPU_VENDOR,
        NodeKind::Categorical,
        &[NODE_PLATFORM],
        conditional_weighted(GPU_VENDOR_SHARES, GPU_VENDOR_SHARES_DEFAULT)?,
    )?;
    network.add_node(
        NODE_GPU_MODEL,
        NodeKind::Categorical,
        &[NODE_GPU_VENDOR],
        conditional_weighted(GPU_MODEL_SHARES, GPU_MODEL_SHARES_DEFAULT)?,
    )?;

    Ok(network)
}
