use regex::Regex;
use std::sync::OnceLock;

static SECONDS_REGEX: OnceLock<Regex> = OnceLock::new();

fn seconds_regex() -> &'static Regex {
    SECONDS_REGEX.get_or_init(|| {
        Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*s\s*$").expect("Seconds regex is valid")
    })
}

/// Extract `retryDelay` (e.g. `"42s"`) from a Google RPC error body, in whole seconds.
pub fn parse_retry_delay(body: &str) -> Option<u64> {
    let json: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    let details = json.get("error")?.get("details")?.as_array()?;

    details
        .iter()
        .filter_map(|d| d.get("retryDelay").and_then(|v| v.as_str()))
        .find_map(|raw| {
            let caps = seconds_regex().captures(raw)?;
            let secs = caps[1].parse::<f64>().ok()?;
            Some(secs.ceil() as u64)
        })
}
