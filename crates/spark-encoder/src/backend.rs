use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 后端标识：选择使用哪一个文本编码实现。
///
/// # 设计背景（Why）
/// - 受支持集合是封闭的（`default`/`json`/`oj`/`active_support`），但配置输入来自文本，
///   因此保留 [`BackendId::Other`] 承载无法识别的取值，由解析阶段报告错误；
/// - “未设置”使用 `Option<BackendId>` 的 `None` 表达，与 `Default` 语义等价但保留区分。
///
/// # 契约说明（What）
/// - 文本解析为精确匹配，不做大小写折叠；
/// - 序列化/反序列化均使用 [`BackendId::as_str`] 的文本形式。
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BackendId {
    /// 默认编码器。
    Default,
    /// 标准 JSON，等价于 `Default`。
    Json,
    /// 快速 JSON 后端（严格模式）。
    Oj,
    /// 框架 JSON 后端。
    ActiveSupport,
    /// 不在受支持集合内的标识。
    Other(Cow<'static, str>),
}

impl BackendId {
    /// 返回标识的文本形式。
    pub fn as_str(&self) -> &str {
        match self {
            BackendId::Default => "default",
            BackendId::Json => "json",
            BackendId::Oj => "oj",
            BackendId::ActiveSupport => "active_support",
            BackendId::Other(name) => name,
        }
    }

    /// 标识是否属于受支持集合。
    pub fn is_recognized(&self) -> bool {
        !matches!(self, BackendId::Other(_))
    }
}

impl From<&str> for BackendId {
    fn from(value: &str) -> Self {
        match value {
            "default" => BackendId::Default,
            "json" => BackendId::Json,
            "oj" => BackendId::Oj,
            "active_support" => BackendId::ActiveSupport,
            other => BackendId::Other(Cow::Owned(other.to_owned())),
        }
    }
}

impl From<String> for BackendId {
    fn from(value: String) -> Self {
        match BackendId::from(value.as_str()) {
            BackendId::Other(_) => BackendId::Other(Cow::Owned(value)),
            known => known,
        }
    }
}

impl From<BackendId> for String {
    fn from(value: BackendId) -> Self {
        match value {
            BackendId::Other(name) => name.into_owned(),
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_identifiers() {
        assert_eq!(BackendId::from("default"), BackendId::Default);
        assert_eq!(BackendId::from("json"), BackendId::Json);
        assert_eq!(BackendId::from("oj"), BackendId::Oj);
        assert_eq!(BackendId::from("active_support"), BackendId::ActiveSupport);
    }

    #[test]
    fn unknown_identifier_lands_in_other_bucket() {
        let id = BackendId::from("XML");
        assert!(!id.is_recognized());
        assert_eq!(id.as_str(), "XML");
        assert_eq!(String::from(id), "XML");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let id: BackendId = serde_json::from_str("\"active_support\"").expect("合法标识");
        assert_eq!(id, BackendId::ActiveSupport);
        assert_eq!(
            serde_json::to_string(&BackendId::Oj).expect("序列化标识"),
            "\"oj\""
        );
    }
}
