//! Caller-supplied constraints and their resolution into per-node filters.
//!
//! Constraint resolution is a pure function: it validates the request
//! vocabulary and produces the filter map the sampler consults, drawing no
//! randomness itself. A bad value fails with a constraint error naming the
//! offending field; an unsatisfiable-but-well-formed constraint is not an
//! error here — the sampler resolves it with a documented fallback and a
//! reduced quality score.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::data::{
    NODE_BROWSER, NODE_BROWSER_VERSION, NODE_DEVICE_TYPE, NODE_HTTP_VERSION, NODE_LOCALE,
    NODE_PLATFORM, NODE_REGION, NODE_SCREEN_RESOLUTION, SUPPORTED_BROWSERS,
    SUPPORTED_DEVICE_TYPES, SUPPORTED_HTTP_VERSIONS, SUPPORTED_PLATFORMS, SUPPORTED_REGIONS,
};
use crate::engine::errors::EngineError;

/// One allowed browser, optionally narrowed to a major-version range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConstraint {
    pub name: String,
    #[serde(default)]
    pub min_major: Option<u32>,
    #[serde(default)]
    pub max_major: Option<u32>,
}

impl BrowserConstraint {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_major: None,
            max_major: None,
        }
    }

    pub fn with_min(mut self, major: u32) -> Self {
        self.min_major = Some(major);
        self
    }

    pub fn with_max(mut self, major: u32) -> Self {
        self.max_major = Some(major);
        self
    }
}

/// Optional allow-lists narrowing what a sampling call may produce.
///
/// Absent fields impose no restriction. Immutable for the duration of one
/// call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FingerprintConstraints {
    #[serde(default)]
    pub browsers: Option<Vec<BrowserConstraint>>,
    #[serde(default)]
    pub device_types: Option<Vec<String>>,
    #[serde(default)]
    pub platforms: Option<Vec<String>>,
    #[serde(default)]
    pub screen_resolutions: Option<Vec<String>>,
    #[serde(default)]
    pub locales: Option<Vec<String>>,
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    #[serde(default)]
    pub http_version: Option<String>,
}

impl FingerprintConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn browser(mut self, constraint: BrowserConstraint) -> Self {
        self.browsers.get_or_insert_with(Vec::new).push(constraint);
        self
    }

    pub fn device_type(mut self, device: impl Into<String>) -> Self {
        self.device_types
            .get_or_insert_with(Vec::new)
            .push(device.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platforms
            .get_or_insert_with(Vec::new)
            .push(platform.into());
        self
    }

    pub fn screen_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.screen_resolutions
            .get_or_insert_with(Vec::new)
            .push(resolution.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locales.get_or_insert_with(Vec::new).push(locale.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.regions.get_or_insert_with(Vec::new).push(region.into());
        self
    }

    pub fn http(mut self, version: impl Into<String>) -> Self {
        self.http_version = Some(version.into());
        self
    }

    /// Canonical cache key: stable across list ordering, so two requests
    /// that allow the same sets hit the same cache entry.
    pub fn canonical_key(&self) -> String {
        fn sorted(list: &Option<Vec<String>>) -> String {
            match list {
                None => "*".to_string(),
                Some(values) => {
                    let mut values = values.clone();
                    values.sort();
                    values.join(",")
                }
            }
        }
        let browsers = match &self.browsers {
            None => "*".to_string(),
            Some(list) => {
                let mut entries: Vec<String> = list
                    .iter()
                    .map(|b| {
                        format!(
                            "{}[{}..{}]",
                            b.name,
                            b.min_major.map_or("".to_string(), |v| v.to_string()),
                            b.max_major.map_or("".to_string(), |v| v.to_string()),
                        )
                    })
                    .collect();
                entries.sort();
                entries.join(",")
            }
        };
        format!(
            "b={browsers};d={};p={};s={};l={};r={};h={}",
            sorted(&self.device_types),
            sorted(&self.platforms),
            sorted(&self.screen_resolutions),
            sorted(&self.locales),
            sorted(&self.regions),
            self.http_version.as_deref().unwrap_or("*"),
        )
    }
}

/// Major-version window for one browser's version node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl VersionRange {
    pub fn contains(&self, major: u32) -> bool {
        self.min.map_or(true, |min| major >= min) && self.max.map_or(true, |max| major <= max)
    }

    /// Distance from `major` to the nearest range boundary; 0 inside the
    /// range. Drives the deterministic nearest-boundary fallback when no
    /// declared version lands in range.
    pub fn boundary_distance(&self, major: u32) -> u32 {
        if let Some(min) = self.min {
            if major < min {
                return min - major;
            }
        }
        if let Some(max) = self.max {
            if major > max {
                return major - max;
            }
        }
        0
    }
}

/// Filter the sampler applies to one node's effective distribution.
#[derive(Debug, Clone)]
pub enum NodeFilter {
    /// Restrict the support to these values.
    Allow(Vec<String>),
    /// Per-browser version windows, consulted against the already-sampled
    /// browser value.
    VersionRanges(FxHashMap<String, VersionRange>),
}

/// Per-node filters produced by constraint resolution.
pub type NodeFilters = FxHashMap<String, NodeFilter>;

fn validate_members(
    field: &str,
    values: &[String],
    recognized: &[&str],
) -> Result<(), EngineError> {
    for value in values {
        if !recognized.contains(&value.as_str()) {
            return Err(EngineError::constraint(
                field,
                format!("unrecognized value '{value}', expected one of {recognized:?}"),
            ));
        }
    }
    if values.is_empty() {
        return Err(EngineError::constraint(field, "allow-list must not be empty"));
    }
    Ok(())
}

/// Resolves caller constraints into the per-node filter map.
///
/// Validates every enumerable field against the recognized vocabulary;
/// screen resolutions are shape-checked (`<width>x<height>`) and locales
/// are passed through as-is since their domains are open-ended.
pub fn resolve(constraints: &FingerprintConstraints) -> Result<NodeFilters, EngineError> {
    let mut filters = NodeFilters::default();

    if let Some(browsers) = &constraints.browsers {
        let names: Vec<String> = browsers.iter().map(|b| b.name.clone()).collect();
        validate_members("browsers", &names, SUPPORTED_BROWSERS)?;
        let mut ranges = FxHashMap::default();
        for browser in browsers {
            if let (Some(min), Some(max)) = (browser.min_major, browser.max_major) {
                if min > max {
                    return Err(EngineError::constraint(
                        "browsers",
                        format!("version range for '{}' is inverted: {min} > {max}", browser.name),
                    ));
                }
            }
            if browser.min_major.is_some() || browser.max_major.is_some() {
                ranges.insert(
                    browser.name.clone(),
                    VersionRange {
                        min: browser.min_major,
                        max: browser.max_major,
                    },
                );
            }
        }
        filters.insert(NODE_BROWSER.to_string(), NodeFilter::Allow(names));
        if !ranges.is_empty() {
            filters.insert(
                NODE_BROWSER_VERSION.to_string(),
                NodeFilter::VersionRanges(ranges),
            );
        }
    }

    if let Some(devices) = &constraints.device_types {
        validate_members("device_types", devices, SUPPORTED_DEVICE_TYPES)?;
        filters.insert(
            NODE_DEVICE_TYPE.to_string(),
            NodeFilter::Allow(devices.clone()),
        );
    }

    if let Some(platforms) = &constraints.platforms {
        validate_members("platforms", platforms, SUPPORTED_PLATFORMS)?;
        filters.insert(
            NODE_PLATFORM.to_string(),
            NodeFilter::Allow(platforms.clone()),
        );
    }

    if let Some(resolutions) = &constraints.screen_resolutions {
        for resolution in resolutions {
            let valid = resolution
                .split_once('x')
                .map(|(w, h)| w.parse::<u32>().is_ok() && h.parse::<u32>().is_ok())
                .unwrap_or(false);
            if !valid {
                return Err(EngineError::constraint(
                    "screen_resolutions",
                    format!("'{resolution}' is not of the form <width>x<height>"),
                ));
            }
        }
        if resolutions.is_empty() {
            return Err(EngineError::constraint(
                "screen_resolutions",
                "allow-list must not be empty",
            ));
        }
        filters.insert(
            NODE_SCREEN_RESOLUTION.to_string(),
            NodeFilter::Allow(resolutions.clone()),
        );
    }

    if let Some(locales) = &constraints.locales {
        if locales.is_empty() {
            return Err(EngineError::constraint("locales", "allow-list must not be empty"));
        }
        filters.insert(NODE_LOCALE.to_string(), NodeFilter::Allow(locales.clone()));
    }

    if let Some(regions) = &constraints.regions {
        validate_members("regions", regions, SUPPORTED_REGIONS)?;
        filters.insert(NODE_REGION.to_string(), NodeFilter::Allow(regions.clone()));
    }

    if let Some(http) = &constraints.http_version {
        validate_members("http_version", std::slice::from_ref(http), SUPPORTED_HTTP_VERSIONS)?;
        filters.insert(
            NODE_HTTP_VERSION.to_string(),
            NodeFilter::Allow(vec![http.clone()]),
        );
    }

    Ok(filters)
}
