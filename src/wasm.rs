//! WASM bindings for secshsrv
//!
//! This module exposes request combining to JavaScript. Results are JSON strings
//! matching [`crate::commands::CombineResult`].

use wasm_bindgen::prelude::*;

use crate::commands::{self, Protocol};
use crate::engine::EngineKind;
use crate::render::SecretFormat;

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Use wee_alloc as the global allocator for smaller WASM binary size
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

fn combine(body: &str, protocol: Protocol, engine: &str, format: &str) -> Result<String, JsValue> {
    let engine: EngineKind = engine
        .parse()
        .map_err(|e: String| JsValue::from_str(&format!("Invalid engine: {e}")))?;
    let format: SecretFormat = format
        .parse()
        .map_err(|e: String| JsValue::from_str(&format!("Invalid format: {e}")))?;

    commands::combine_request_json(body, protocol, engine, format)
        .map_err(|e| JsValue::from_str(&format!("Combine failed: {e:#}")))
}

/// Combine a pipe-delimited request (`n|k|modulus|shares...|`)
///
/// # Example (JavaScript)
/// ```javascript
/// const result = JSON.parse(wasm_combine_wire("3|2||10|13|16|", "lagrange", "decimal"));
/// console.log(`Recovered ${result.secret} from ${result.shares_used} shares`);
/// ```
#[wasm_bindgen]
pub fn wasm_combine_wire(request: &str, engine: &str, format: &str) -> Result<String, JsValue> {
    combine(request, Protocol::Wire, engine, format)
}

/// Combine a line-protocol request (`n = ..`, `k = ..`, `Share (x:..) = ..`)
///
/// # Example (JavaScript)
/// ```javascript
/// const text = "n = 3\nk = 2\nShare (x:1) = 10\nShare (x:2) = 13\n";
/// const result = JSON.parse(wasm_combine_lines(text, "lagrange", "decimal"));
/// ```
#[wasm_bindgen]
pub fn wasm_combine_lines(text: &str, engine: &str, format: &str) -> Result<String, JsValue> {
    combine(text, Protocol::Lines, engine, format)
}
