//! Serde ↔ JsValue 转换辅助
//!
//! Leaflet 的选项对象需要普通的 JS 对象；这里统一经
//! `serde_wasm_bindgen` 序列化，并把两类互操作错误收敛为一个类型。

use js_sys::wasm_bindgen::JsValue;
use serde::Serialize;

/// JS 互操作的序列化错误
#[derive(Debug)]
pub enum Error {
    SerdeWasmBindgen(serde_wasm_bindgen::Error),
    JsSys(JsValue),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SerdeWasmBindgen(e) => write!(f, "serde wasm-bindgen: {e}"),
            Error::JsSys(v) => write!(f, "js-sys: {v:?}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_wasm_bindgen::Error> for Error {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Error::SerdeWasmBindgen(e)
    }
}

/// 把 Rust 数据结构序列化为 JsValue（结构体 → 普通 JS 对象）
pub fn to_value<T: Serialize>(value: &T) -> Result<JsValue, Error> {
    // 大数按 JS number 处理，避免 BigInt 混入选项对象
    let serializer =
        serde_wasm_bindgen::Serializer::new().serialize_large_number_types_as_bigints(false);
    value.serialize(&serializer).map_err(Error::from)
}
