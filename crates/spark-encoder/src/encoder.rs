use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::EncoderError;

/// `Encoder` 将有序键值结构渲染为文本。
///
/// # 设计初衷（Why）
/// - 解析器需要在多个具体实现之间切换，并把选中的实现长期缓存，因此以 trait 对象承载；
/// - 输入为 [`Value`]：顶层通常是对象，集合序列化时也可能是数组。
///
/// # 契约说明（What）
/// - 对任何合法的 [`Value`]（标量、嵌套对象/数组、null）都必须成功；
/// - 输出紧凑，不包含缩进或多余空白；
/// - 实现必须满足 `Send + Sync`，以便在 `Arc` 中跨线程共享。
pub trait Encoder: Send + Sync + 'static {
    /// 实现名称，用于日志与诊断。
    fn name(&self) -> &'static str;

    /// 执行编码。
    fn encode(&self, value: &Value) -> Result<String, EncoderError>;
}

/// 解析后的编码器句柄，同一后端的多次解析返回同一个 `Arc`。
pub type EncoderHandle = Arc<dyn Encoder>;

/// 默认编码器：标准 JSON，紧凑输出。
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &Value) -> Result<String, EncoderError> {
        Ok(serde_json::to_string(value)?)
    }
}

/// 快速 JSON 编码器（严格模式），由 `simd-json` 提供。
///
/// 严格模式只接受 JSON 原生类型，[`Value`] 天然满足该约束。
#[cfg(feature = "oj")]
#[derive(Clone, Copy, Debug, Default)]
pub struct FastJsonEncoder;

#[cfg(feature = "oj")]
impl Encoder for FastJsonEncoder {
    fn name(&self) -> &'static str {
        "oj"
    }

    fn encode(&self, value: &Value) -> Result<String, EncoderError> {
        simd_json::serde::to_string(value)
            .map_err(|err| EncoderError::backend(self.name(), err))
    }
}

/// 框架 JSON 编码器，由 `sonic-rs` 完成编码。
///
/// 与标准 JSON 的差异仅在字符串转义：`<`、`>`、`&` 以及 U+2028/U+2029 输出为 `\uXXXX`，
/// 使结果可以直接嵌入 HTML 页面。
#[cfg(feature = "active-support")]
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameworkJsonEncoder;

#[cfg(feature = "active-support")]
impl Encoder for FrameworkJsonEncoder {
    fn name(&self) -> &'static str {
        "active_support"
    }

    fn encode(&self, value: &Value) -> Result<String, EncoderError> {
        let json =
            sonic_rs::to_string(value).map_err(|err| EncoderError::backend(self.name(), err))?;
        Ok(escape_html(&json))
    }
}

/// 这些字符在合法 JSON 文本中只会出现在字符串字面量内，逐字符替换不会破坏结构。
#[cfg(feature = "active-support")]
fn escape_html(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

/// 编译进来的快速 JSON 编码器；未启用 `oj` 时为 `None`。
pub(crate) fn fast_json() -> Option<EncoderHandle> {
    #[cfg(feature = "oj")]
    {
        Some(Arc::new(FastJsonEncoder))
    }
    #[cfg(not(feature = "oj"))]
    {
        None
    }
}

/// 编译进来的框架 JSON 编码器；未启用 `active-support` 时为 `None`。
pub(crate) fn framework_json() -> Option<EncoderHandle> {
    #[cfg(feature = "active-support")]
    {
        Some(Arc::new(FrameworkJsonEncoder))
    }
    #[cfg(not(feature = "active-support"))]
    {
        None
    }
}

impl fmt::Debug for dyn Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoder").field("name", &self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_encoder_is_compact_and_ordered() {
        let value = json!({"name": "x", "age": 3, "tags": ["a", null], "ok": true});
        assert_eq!(
            JsonEncoder.encode(&value).expect("编码成功"),
            r#"{"name":"x","age":3,"tags":["a",null],"ok":true}"#
        );
    }

    #[cfg(feature = "oj")]
    #[test]
    fn fast_encoder_matches_default_output() {
        let value = json!({"nested": {"list": [1, 2.5, "s"]}, "empty": {}, "flag": false});
        assert_eq!(
            FastJsonEncoder.encode(&value).expect("编码成功"),
            JsonEncoder.encode(&value).expect("编码成功")
        );
    }

    #[cfg(feature = "active-support")]
    #[test]
    fn framework_encoder_escapes_html_entities() {
        let value = json!({"html": "<b>a & b</b>", "sep": "x\u{2028}y", "quote": "\""});
        assert_eq!(
            FrameworkJsonEncoder.encode(&value).expect("编码成功"),
            r#"{"html":"\u003cb\u003ea \u0026 b\u003c/b\u003e","sep":"x\u2028y","quote":"\""}"#
        );
    }

    #[cfg(feature = "active-support")]
    #[test]
    fn framework_encoder_escapes_keys_too() {
        let value = json!({"a<b": 1});
        assert_eq!(
            FrameworkJsonEncoder.encode(&value).expect("编码成功"),
            r#"{"a\u003cb":1}"#
        );
    }

    #[test]
    fn compiled_handles_follow_features() {
        assert_eq!(fast_json().is_some(), cfg!(feature = "oj"));
        assert_eq!(framework_json().is_some(), cfg!(feature = "active-support"));
    }
}
