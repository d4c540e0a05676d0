//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 即席入口自身只产生一种错误：缺少声明闭包；
//! - Schema 求值、对象投影与编码器解析的错误原样向上传播，不做本地恢复。
//!
//! ## 设计要求（What）
//! - 所有错误派生 `thiserror::Error`；
//! - 来自 `spark-encoder` 的错误通过 `#[from]` 自动转换，调用方可直接 `?`。

use spark_encoder::EncoderError;
use thiserror::Error;

/// 资源序列化错误域。
#[derive(Debug, Error)]
pub enum ResourceError {
    /// 调用即席入口时没有提供声明闭包，未执行任何工作。
    #[error("block required: ad-hoc serialization needs a schema declaration")]
    MissingDeclarationBlock,

    /// 编码器解析或编码失败。
    #[error(transparent)]
    Encoder(#[from] EncoderError),

    /// 目标对象或派生属性无法投影为结构化值。
    #[error("failed to project object into a value: {0}")]
    Projection(#[source] serde_json::Error),

    /// 按名称声明的属性在对象上不存在。
    #[error("attribute `{name}` is not present on the serialized object")]
    MissingAttribute { name: String },

    /// `many` 关联指向的字段不是集合。
    #[error("association `{name}` is not a collection")]
    NotACollection { name: String },
}

impl ResourceError {
    /// 是否为编码后端无法识别导致的错误。
    pub fn is_unsupported_backend(&self) -> bool {
        matches!(self, ResourceError::Encoder(err) if err.is_unsupported_backend())
    }
}

/// 配置文件加载与应用阶段的错误。
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse resource settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid backend in resource settings: {0}")]
    Backend(#[from] EncoderError),
}
