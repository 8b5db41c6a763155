//! Lenient interpretation of model output.
//!
//! The model is asked for a JSON object but routinely wraps it in code
//! fences, prefixes it with prose, or renames fields. [`parse_verdict`] is a
//! total function: whatever the input, it returns a verdict whose status is
//! one of the four known values. Text that cannot be read as an object with
//! a `status` field becomes `UNKNOWN` with the raw text as the reason.


use halal_types::{ClassificationVerdict, DailyInsight, VerdictStatus};
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::OnceLock;

/// Field names the model has used for the verdict itself.
const STATUS_FIELDS: &[&str] = &["status", "verdict"];

/// Field names the model has used for the flagged ingredient list.
const INGREDIENT_FIELDS: &[&str] = &[
    "flaggedIngredients",
    "flagged_ingredients",
    "ingredients_detected",
    "ingredientsDetected",
    "detected_ingredients",
    "haram_ingredients",
    "ingredients",
];

static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();
static FENCE_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();

fn fence_regex() -> &'static Regex {
    FENCE_REGEX.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)```").expect("Fence regex is valid")
    })
}

fn fence_marker_regex() -> &'static Regex {
    FENCE_MARKER_REGEX
        .get_or_init(|| Regex::new(r"```[A-Za-z0-9_+-]*").expect("Fence marker regex is valid"))
}

/// Parse raw model output into a verdict. Never fails.
pub fn parse_verdict(raw: &str) -> ClassificationVerdict {
    match interpret_verdict(raw) {
        Some(verdict) => verdict,
        None => {
            tracing::debug!(len = raw.len(), "Model output not interpretable, degrading to UNKNOWN");
            ClassificationVerdict::unknown(raw)
        },
    }
}

/// Parse the daily verse/hadith card. `None` when the model's answer is unusable.
pub fn parse_daily_insight(raw: &str) -> Option<DailyInsight> {
    let object = extract_object(raw)?;
    let arabic = string_field(&object, "arabic")?;
    let translation = string_field(&object, "translation")?;
    let source = string_field(&object, "source").unwrap_or_default();
    Some(DailyInsight { arabic, translation, source })
}

fn interpret_verdict(raw: &str) -> Option<ClassificationVerdict> {
    let object = extract_object(raw)?;

    let status_value = STATUS_FIELDS.iter().find_map(|f| object.get(*f))?;
    let status = status_value.as_str().map_or(VerdictStatus::Unknown, VerdictStatus::from_loose);

    let reason = match object.get("reason") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let flagged_ingredients = INGREDIENT_FIELDS
        .iter()
        .find_map(|f| object.get(*f))
        .map(string_list)
        .unwrap_or_default();

    Some(ClassificationVerdict { status, reason, flagged_ingredients, product_name: None })
}

/// Locate a JSON object in the text: in any fenced block, bare, or embedded in prose.
pub(crate) fn extract_object(raw: &str) -> Option<Map<String, Value>> {
    fence_regex()
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| object_in(body.as_str()))
        .or_else(|| object_in(&strip_code_fences(raw)))
}

fn object_in(text: &str) -> Option<Map<String, Value>> {
    let candidate = text.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
        return Some(map);
    }

    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&candidate[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Drop fence markers and their language tags, keeping everything between them.
pub(crate) fn strip_code_fences(raw: &str) -> Cow<'_, str> {
    if raw.contains("```") {
        fence_marker_regex().replace_all(raw, "")
    } else {
        Cow::Borrowed(raw)
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Accept an array of strings or a single comma-separated string.
fn string_list(value: &Value) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    items.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}
