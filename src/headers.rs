//! HTTP header assembly for a sampled fingerprint.
//!
//! Pure string templating over the fingerprint record: the User-Agent,
//! client-hint, and Accept-* values all agree with the sampled browser,
//! platform, and language set. Chromium-family browsers get Sec-CH-UA
//! headers; Firefox and Safari do not send them.

use crate::engine::assemble::Fingerprint;

const CHROME_WEBKIT: &str = "537.36";
const SAFARI_WEBKIT: &str = "605.1.15";

fn os_token(fingerprint: &Fingerprint) -> String {
    match fingerprint.device.platform.as_str() {
        "windows" => "Windows NT 10.0; Win64; x64".to_string(),
        "macos" => "Macintosh; Intel Mac OS X 10_15_7".to_string(),
        "linux" => "X11; Linux x86_64".to_string(),
        "android" => "Linux; Android 14".to_string(),
        "ios" => {
            if fingerprint.device.device_type == "tablet" {
                "iPad; CPU OS 17_5 like Mac OS X".to_string()
            } else {
                "iPhone; CPU iPhone OS 17_5 like Mac OS X".to_string()
            }
        }
        other => format!("X11; {other}"),
    }
}

/// User-Agent string consistent with the sampled browser and platform.
pub fn user_agent(fingerprint: &Fingerprint) -> String {
    let os = os_token(fingerprint);
    let version = &fingerprint.browser.version;
    match fingerprint.browser.name.as_str() {
        "firefox" => format!(
            "Mozilla/5.0 ({os}; rv:{version}) Gecko/20100101 Firefox/{version}"
        ),
        "safari" => format!(
            "Mozilla/5.0 ({os}) AppleWebKit/{SAFARI_WEBKIT} (KHTML, like Gecko) \
             Version/{version} Safari/{SAFARI_WEBKIT}"
        ),
        "edge" => format!(
            "Mozilla/5.0 ({os}) AppleWebKit/{CHROME_WEBKIT} (KHTML, like Gecko) \
             Chrome/{version} Safari/{CHROME_WEBKIT} Edg/{version}"
        ),
        _ => format!(
            "Mozilla/5.0 ({os}) AppleWebKit/{CHROME_WEBKIT} (KHTML, like Gecko) \
             Chrome/{version} Safari/{CHROME_WEBKIT}"
        ),
    }
}

fn accept_for(browser: &str) -> &'static str {
    match browser {
        "firefox" => {
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
        }
        "safari" => "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        _ => {
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
             image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7"
        }
    }
}

/// `Accept-Language` with descending q-values, primary language first.
pub fn accept_language(languages: &[String]) -> String {
    let mut parts = Vec::with_capacity(languages.len());
    for (i, language) in languages.iter().enumerate() {
        if i == 0 {
            parts.push(language.clone());
        } else {
            let q = (1.0 - 0.1 * i as f64).max(0.1);
            parts.push(format!("{language};q={q:.1}"));
        }
    }
    parts.join(",")
}

fn sec_ch_platform(platform: &str) -> &'static str {
    match platform {
        "windows" => "\"Windows\"",
        "macos" => "\"macOS\"",
        "linux" => "\"Linux\"",
        "android" => "\"Android\"",
        "ios" => "\"iOS\"",
        _ => "\"Unknown\"",
    }
}

/// Full ordered header set for a navigation request.
pub fn build_headers(fingerprint: &Fingerprint) -> Vec<(String, String)> {
    let browser = fingerprint.browser.name.as_str();
    let mut headers: Vec<(String, String)> = vec![
        ("User-Agent".to_string(), user_agent(fingerprint)),
        ("Accept".to_string(), accept_for(browser).to_string()),
        (
            "Accept-Language".to_string(),
            accept_language(&fingerprint.languages),
        ),
        (
            "Accept-Encoding".to_string(),
            // Safari does not advertise zstd.
            if browser == "safari" {
                "gzip, deflate, br".to_string()
            } else {
                "gzip, deflate, br, zstd".to_string()
            },
        ),
    ];

    if browser == "chrome" || browser == "edge" {
        let major = fingerprint.browser.major_version;
        let brand = if browser == "edge" {
            format!("\"Microsoft Edge\";v=\"{major}\"")
        } else {
            format!("\"Google Chrome\";v=\"{major}\"")
        };
        headers.push((
            "Sec-CH-UA".to_string(),
            format!("{brand}, \"Chromium\";v=\"{major}\", \"Not_A Brand\";v=\"24\""),
        ));
        headers.push((
            "Sec-CH-UA-Mobile".to_string(),
            if fingerprint.device.device_type == "mobile" {
                "?1".to_string()
            } else {
                "?0".to_string()
            },
        ));
        headers.push((
            "Sec-CH-UA-Platform".to_string(),
            sec_ch_platform(&fingerprint.device.platform).to_string(),
        ));
    }

    headers.push(("Sec-Fetch-Dest".to_string(), "document".to_string()));
    headers.push(("Sec-Fetch-Mode".to_string(), "navigate".to_string()));
    headers.push(("Sec-Fetch-Site".to_string(), "none".to_string()));
    headers.push(("Sec-Fetch-User".to_string(), "?1".to_string()));
    headers.push((
        "Upgrade-Insecure-Requests".to_string(),
        "1".to_string(),
    ));

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BrowserConstraint, FingerprintConstraints, FingerprintEngine};

    fn sample(browser: &str) -> Fingerprint {
        let mut engine = FingerprintEngine::from_seed(21).unwrap();
        let constraints =
            FingerprintConstraints::new().browser(BrowserConstraint::named(browser));
        engine.sample(&constraints).unwrap()
    }

    #[test]
    fn chrome_gets_client_hints() {
        let fp = sample("chrome");
        let headers = build_headers(&fp);
        let ua = &headers.iter().find(|(k, _)| k == "User-Agent").unwrap().1;
        assert!(ua.contains("Chrome/"));
        assert!(!ua.contains("Edg/"));
        assert!(headers.iter().any(|(k, _)| k == "Sec-CH-UA"));
    }

    #[test]
    fn firefox_omits_client_hints() {
        let fp = sample("firefox");
        let headers = build_headers(&fp);
        let ua = &headers.iter().find(|(k, _)| k == "User-Agent").unwrap().1;
        assert!(ua.contains("Firefox/"));
        assert!(headers.iter().all(|(k, _)| k != "Sec-CH-UA"));
    }

    #[test]
    fn safari_skips_zstd() {
        let fp = sample("safari");
        let headers = build_headers(&fp);
        let encoding = &headers
            .iter()
            .find(|(k, _)| k == "Accept-Encoding")
            .unwrap()
            .1;
        assert!(!encoding.contains("zstd"));
    }

    #[test]
    fn accept_language_q_values_descend() {
        let langs = vec!["de-DE".to_string(), "de".to_string(), "en-US".to_string()];
        assert_eq!(accept_language(&langs), "de-DE,de;q=0.9,en-US;q=0.8");
    }
}
