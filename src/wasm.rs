use wasm_bindgen::prelude::*;

use crate::model::{Document, TemplateSpec};

/// Validate a template and return its resolved pixel measure as JSON.
/// The full editor surface is driven through [`crate::Editor`] by the
/// host's binding layer; this entry covers the validate-first contract.
#[wasm_bindgen]
pub fn resolve_template(json: &str) -> Result<String, JsValue> {
    let template = TemplateSpec::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let doc = Document::validate(template).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let resolved = doc.measure.resolve();
    serde_json::to_string(&resolved).map_err(|e| JsValue::from_str(&e.to_string()))
}
