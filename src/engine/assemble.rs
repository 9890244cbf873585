//! Converts a completed evidence map into the externally visible
//! fingerprint record.
//!
//! All derivations here are deterministic functions of the evidence: the
//! major version is the integer prefix of the sampled version string, the
//! content hash is a SHA-256 over the canonical `name=value` serialization
//! in sorted node order (never map iteration order), and the quality score
//! discounts multiplicatively per constraint fallback the sampler took.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::data::{self, timezone_profile};
use crate::engine::distribution::AttrValue;
use crate::engine::errors::EngineError;
use crate::engine::sampler::{major_of, Evidence};

/// Quality multiplier applied once per constraint fallback.
pub const FALLBACK_DISCOUNT: f64 = 0.9;

/// Sampled browser identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserInfo {
    pub name: String,
    pub version: String,
    pub major_version: u32,
}

/// Screen geometry, parsed from the sampled `<width>x<height>` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
}

impl ScreenInfo {
    pub fn resolution(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Sampled device and hardware identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub device_type: String,
    pub platform: String,
    pub screen: ScreenInfo,
    pub hardware_concurrency: u32,
    pub device_memory_gb: u32,
    pub gpu_vendor: String,
    pub gpu_model: String,
    pub touch_support: bool,
}

/// Sampled timezone, with offset and DST flag resolved from the static
/// timezone table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimezoneInfo {
    pub name: String,
    pub utc_offset_minutes: i32,
    pub dst: bool,
}

/// The complete sampled browser/device identity.
///
/// Created once per sampling call and never mutated afterwards; each call
/// produces a fresh, independent value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub browser: BrowserInfo,
    pub device: DeviceInfo,
    pub locale: String,
    pub region: String,
    pub timezone: TimezoneInfo,
    /// Ordered, primary first.
    pub languages: Vec<String>,
    pub http_version: String,
    pub cookie_count: u32,
    pub plugin_count: u32,
    pub media_device_count: u32,
    /// SHA-256 hex digest over the canonical attribute serialization.
    pub content_hash: String,
    /// In `[0, 1]`; 1.0 when no constraint fallback was needed.
    pub quality_score: f64,
    pub generation_millis: f64,
    /// ISO-8601 creation instant. Not part of the content hash.
    pub created_at: String,
}

fn required_text<'a>(evidence: &'a Evidence, node: &str) -> Result<&'a str, EngineError> {
    evidence
        .get(node)
        .and_then(|v| v.as_text())
        .ok_or_else(|| EngineError::InvalidEvidence(format!("missing required text node '{node}'")))
}

fn required_number(evidence: &Evidence, node: &str) -> Result<f64, EngineError> {
    evidence
        .get(node)
        .and_then(|v| v.as_number())
        .ok_or_else(|| {
            EngineError::InvalidEvidence(format!("missing required numeric node '{node}'"))
        })
}

/// Canonical content hash: `name=value` pairs joined with `;` in sorted
/// node order, SHA-256, lowercase hex.
pub fn content_hash(evidence: &Evidence) -> String {
    // BTreeMap iterates in key order, which is exactly the canonical order.
    let mut hasher = Sha256::new();
    for (name, value) in evidence {
        hasher.update(name.as_bytes());
        hasher.update(b"=");
        hasher.update(value.canonical().as_bytes());
        hasher.update(b";");
    }
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Accept-Language-style ordering: the sampled locale first, its bare
/// language second, then English fallbacks for non-English locales.
pub fn languages_for(locale: &str) -> Vec<String> {
    let mut languages = vec![locale.to_string()];
    let primary = locale.split('-').next().unwrap_or(locale);
    if primary != locale {
        languages.push(primary.to_string());
    }
    if primary != "en" {
        languages.push("en-US".to_string());
        languages.push("en".to_string());
    }
    languages
}

/// Assembles the fingerprint from a completed evidence map.
///
/// Never fails for evidence produced by a full sampling pass; a missing
/// required node is a programming-invariant violation surfaced as
/// [`EngineError::InvalidEvidence`].
pub fn assemble(
    evidence: &Evidence,
    fallbacks: u32,
    generation_millis: f64,
) -> Result<Fingerprint, EngineError> {
    let browser_name = required_text(evidence, data::NODE_BROWSER)?;
    let version = required_text(evidence, data::NODE_BROWSER_VERSION)?;
    let device_type = required_text(evidence, data::NODE_DEVICE_TYPE)?;
    let platform = required_text(evidence, data::NODE_PLATFORM)?;
    let resolution = required_text(evidence, data::NODE_SCREEN_RESOLUTION)?;
    let gpu_vendor = required_text(evidence, data::NODE_GPU_VENDOR)?;
    let gpu_model = required_text(evidence, data::NODE_GPU_MODEL)?;
    let locale = required_text(evidence, data::NODE_LOCALE)?;
    let region = required_text(evidence, data::NODE_REGION)?;
    let timezone_name = required_text(evidence, data::NODE_TIMEZONE)?;
    let http_version = required_text(evidence, data::NODE_HTTP_VERSION)?;
    let touch = required_text(evidence, data::NODE_TOUCH_SUPPORT)?;
    let memory = required_text(evidence, data::NODE_DEVICE_MEMORY)?;

    let concurrency = required_number(evidence, data::NODE_HARDWARE_CONCURRENCY)?;
    let cookie_count = required_number(evidence, data::NODE_COOKIE_COUNT)?;
    let plugin_count = required_number(evidence, data::NODE_PLUGIN_COUNT)?;
    let media_device_count = required_number(evidence, data::NODE_MEDIA_DEVICE_COUNT)?;

    let (width, height) = resolution
        .split_once('x')
        .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
        .ok_or_else(|| {
            EngineError::InvalidEvidence(format!("malformed screen resolution '{resolution}'"))
        })?;

    let (utc_offset_minutes, dst) = timezone_profile(timezone_name);

    let quality_score = FALLBACK_DISCOUNT.powi(fallbacks as i32);

    Ok(Fingerprint {
        browser: BrowserInfo {
            name: browser_name.to_string(),
            version: version.to_string(),
            major_version: major_of(version),
        },
        device: DeviceInfo {
            device_type: device_type.to_string(),
            platform: platform.to_string(),
            screen: ScreenInfo { width, height },
            hardware_concurrency: concurrency.max(0.0) as u32,
            device_memory_gb: memory.parse().unwrap_or(0),
            gpu_vendor: gpu_vendor.to_string(),
            gpu_model: gpu_model.to_string(),
            touch_support: touch == "true",
        },
        locale: locale.to_string(),
        region: region.to_string(),
        timezone: TimezoneInfo {
            name: timezone_name.to_string(),
            utc_offset_minutes,
            dst,
        },
        languages: languages_for(locale),
        http_version: http_version.to_string(),
        cookie_count: cookie_count.max(0.0) as u32,
        plugin_count: plugin_count.max(0.0) as u32,
        media_device_count: media_device_count.max(0.0) as u32,
        content_hash: content_hash(evidence),
        quality_score,
        generation_millis,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Inverse of [`assemble`] over the network's node vocabulary: rebuilds
/// the node-name → value pairs a fingerprint implies so the learner can
/// fold observed fingerprints back into the distributions.
pub fn to_evidence(fingerprint: &Fingerprint) -> Evidence {
    let mut evidence = Evidence::new();
    evidence.insert(
        data::NODE_BROWSER.to_string(),
        AttrValue::text(&fingerprint.browser.name),
    );
    evidence.insert(
        data::NODE_BROWSER_VERSION.to_string(),
        AttrValue::text(&fingerprint.browser.version),
    );
    evidence.insert(
        data::NODE_DEVICE_TYPE.to_string(),
        AttrValue::text(&fingerprint.device.device_type),
    );
    evidence.insert(
        data::NODE_PLATFORM.to_string(),
        AttrValue::text(&fingerprint.device.platform),
    );
    evidence.insert(
        data::NODE_SCREEN_RESOLUTION.to_string(),
        AttrValue::text(fingerprint.device.screen.resolution()),
    );
    evidence.insert(
        data::NODE_HARDWARE_CONCURRENCY.to_string(),
        AttrValue::Number(f64::from(fingerprint.device.hardware_concurrency)),
    );
    evidence.insert(
        data::NODE_DEVICE_MEMORY.to_string(),
        AttrValue::text(fingerprint.device.device_memory_gb.to_string()),
    );
    evidence.insert(
        data::NODE_GPU_VENDOR.to_string(),
        AttrValue::text(&fingerprint.device.gpu_vendor),
    );
    evidence.insert(
        data::NODE_GPU_MODEL.to_string(),
        AttrValue::text(&fingerprint.device.gpu_model),
    );
    evidence.insert(
        data::NODE_TOUCH_SUPPORT.to_string(),
        AttrValue::text(if fingerprint.device.touch_support {
            "true"
        } else {
            "false"
        }),
    );
    evidence.insert(
        data::NODE_LOCALE.to_string(),
        AttrValue::text(&fingerprint.locale),
    );
    evidence.insert(
        data::NODE_REGION.to_string(),
        AttrValue::text(&fingerprint.region),
    );
    evidence.insert(
        data::NODE_TIMEZONE.to_string(),
        AttrValue::text(&fingerprint.timezone.name),
    );
    evidence.insert(
        data::NODE_HTTP_VERSION.to_string(),
        AttrValue::text(&fingerprint.http_version),
    );
    evidence.insert(
        data::NODE_COOKIE_COUNT.to_string(),
        AttrValue::Number(f64::from(fingerprint.cookie_count)),
    );
    evidence.insert(
        data::NODE_PLUGIN_COUNT.to_string(),
        AttrValue::Number(f64::from(fingerprint.plugin_count)),
    );
    evidence.insert(
        data::NODE_MEDIA_DEVICE_COUNT.to_string(),
        AttrValue::Number(f64::from(fingerprint.media_device_count)),
    );
    evidence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_ignores_insertion_sequence() {
        let mut a = Evidence::new();
        a.insert("x".to_string(), AttrValue::text("1"));
        a.insert("y".to_string(), AttrValue::text("2"));
        let mut b = Evidence::new();
        b.insert("y".to_string(), AttrValue::text("2"));
        b.insert("x".to_string(), AttrValue::text("1"));
        assert_eq!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn content_hash_distinguishes_values() {
        let mut a = Evidence::new();
        a.insert("x".to_string(), AttrValue::text("1"));
        let mut b = Evidence::new();
        b.insert("x".to_string(), AttrValue::text("2"));
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn languages_primary_first_with_english_fallback() {
        assert_eq!(
            languages_for("de-DE"),
            vec!["de-DE", "de", "en-US", "en"]
        );
        assert_eq!(languages_for("en-US"), vec!["en-US", "en"]);
        assert_eq!(languages_for("en"), vec!["en"]);
    }

    #[test]
    fn missing_node_is_invalid_evidence() {
        let evidence = Evidence::new();
        let err = assemble(&evidence, 0, 0.0);
        assert!(matches!(err, Err(EngineError::InvalidEvidence(_))));
    }

    #[test]
    fn quality_discounts_per_fallback() {
        assert_eq!(FALLBACK_DISCOUNT.powi(0), 1.0);
        assert!(FALLBACK_DISCOUNT.powi(2) < FALLBACK_DISCOUNT.powi(1));
    }
}
