//! WASM bindings for rainbow-scheduler.
//!
//! Exposes filter construction, section filtering, missing-item reports,
//! conflict detection and schedule generation to JavaScript via
//! `wasm-bindgen`. Every argument and result crosses the boundary as a JSON
//! string; errors are thrown as JS strings.
//!
//! Request parameters use the query-string shape:
//! `{"crn": [...], "cid": [...], "start_after": "HH:MM", "end_before": "HH:MM",
//! "online": "true", "sync": "false", "day": ["M", "!F"]}`, every key optional.
//! Sections are a JSON array of
//! `{"crn", "course_id", "is_online", "is_synchronous", "meetings": [{"days", "start", "end"}]}`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p rainbow-scheduler-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/rainbow-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/rainbow_scheduler_wasm.wasm
//! ```

use rainbow_scheduler::{FilterParams, SearchLimits, Section};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON plumbing, independent of JsValue so it can be tested natively
// ---------------------------------------------------------------------------

fn parse_params(json: &str) -> Result<FilterParams, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid params JSON: {}", e))
}

fn parse_sections(json: &str) -> Result<Vec<Section>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid sections JSON: {}", e))
}

fn parse_limits(json: Option<&str>) -> Result<SearchLimits, String> {
    match json {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(raw).map_err(|e| format!("Invalid limits JSON: {}", e))
        }
        _ => Ok(SearchLimits::unbounded()),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn build_filter_json(params_json: &str) -> Result<String, String> {
    let params = parse_params(params_json)?;
    let filter = rainbow_scheduler::build_filter(&params).map_err(|e| e.to_string())?;
    to_json(&filter)
}

fn apply_filter_json(params_json: &str, sections_json: &str) -> Result<String, String> {
    let filter =
        rainbow_scheduler::build_filter(&parse_params(params_json)?).map_err(|e| e.to_string())?;
    let sections = parse_sections(sections_json)?;
    to_json(&rainbow_scheduler::apply_filter(&filter, &sections))
}

fn missing_requested_json(params_json: &str, matched_json: &str) -> Result<String, String> {
    let params = parse_params(params_json)?;
    let filter = rainbow_scheduler::build_filter(&params).map_err(|e| e.to_string())?;
    let matched = parse_sections(matched_json)?;
    let missing = rainbow_scheduler::missing_requested(
        filter.crns(),
        params.requested_course_ids(),
        &matched,
    );
    to_json(&missing)
}

fn generate_schedules_json(
    params_json: &str,
    sections_json: &str,
    limits_json: Option<&str>,
) -> Result<String, String> {
    let params = parse_params(params_json)?;
    let sections = parse_sections(sections_json)?;
    let limits = parse_limits(limits_json)?;
    let outcome = rainbow_scheduler::plan(&sections, "-", "-", &params, limits)
        .map_err(|e| e.to_string())?;
    to_json(&outcome)
}

fn find_conflicts_json(sections_json: &str) -> Result<String, String> {
    let sections = parse_sections(sections_json)?;
    to_json(&rainbow_scheduler::find_conflicts(&sections))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Validate request parameters into a normalized filter.
///
/// Returns the filter as JSON (course ids normalized, times as `HH:MM`), or
/// throws naming the offending field.
#[wasm_bindgen(js_name = "buildFilter")]
pub fn build_filter(params_json: &str) -> Result<String, JsValue> {
    build_filter_json(params_json).map_err(|e| JsValue::from_str(&e))
}

/// Keep only the sections that pass the request's filter, in input order.
#[wasm_bindgen(js_name = "applyFilter")]
pub fn apply_filter(params_json: &str, sections_json: &str) -> Result<String, JsValue> {
    apply_filter_json(params_json, sections_json).map_err(|e| JsValue::from_str(&e))
}

/// Report requested CRNs and course ids absent from `matched_json`.
///
/// Returns `{"crns": [...], "course_ids": [...]}`.
#[wasm_bindgen(js_name = "missingRequested")]
pub fn missing_requested(params_json: &str, matched_json: &str) -> Result<String, JsValue> {
    missing_requested_json(params_json, matched_json).map_err(|e| JsValue::from_str(&e))
}

/// Filter `sections_json` by the request and enumerate conflict-free schedules.
///
/// Returns an object tagged by `status`: `"scheduled"` with `schedules`,
/// `nodes_visited` and `truncated`, or `"nothing_found"` / `"incomplete"`
/// with the `missing` items. `limits_json` is an optional
/// `{"max_schedules": n, "max_nodes": n}`.
#[wasm_bindgen(js_name = "generateSchedules")]
pub fn generate_schedules(
    params_json: &str,
    sections_json: &str,
    limits_json: Option<String>,
) -> Result<String, JsValue> {
    generate_schedules_json(params_json, sections_json, limits_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Every pairwise time conflict among the given sections, one entry per
/// shared day.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(sections_json: &str) -> Result<String, JsValue> {
    find_conflicts_json(sections_json).map_err(|e| JsValue::from_str(&e))
}
