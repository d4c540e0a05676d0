//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 编码后端解析只有一种“可预期”的失败：调用方给出了无法识别的后端标识；
//! - 可选依赖缺失不属于错误，由解析器就地降级处理，因此不会出现在本枚举中。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，可直接交给上层 `?` 传播；
//! - `Encode` 与 `Backend` 仅用于原样转交底层编码库的失败，正常输入不应触发。

use std::fmt;

use thiserror::Error;

/// 编码后端错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：集中描述配置后端与执行编码两个环节的失败，便于调用方统一处理；
/// - **契约 (What)**：
///   - [`EncoderError::UnsupportedBackend`] 携带原始标识文本，配置状态保持不变；
///   - 其余变体仅作为底层错误的透明包装；
/// - **设计权衡 (Trade-offs)**：标识以 `String` 保存，牺牲一次分配换取可读的诊断信息。
#[derive(Debug, Error)]
pub enum EncoderError {
    /// 后端标识不在受支持集合内。
    #[error("unsupported backend `{backend}`")]
    UnsupportedBackend { backend: String },

    /// serde_json 在序列化过程中失败。
    #[error("failed to encode mapping: {0}")]
    Encode(#[from] serde_json::Error),

    /// 可选编码库在编码过程中失败，保留库名与原始错误信息。
    #[error("{encoder} encoder failed to encode mapping: {reason}")]
    Backend {
        encoder: &'static str,
        reason: String,
    },
}

impl EncoderError {
    /// 便捷构造 [`EncoderError::UnsupportedBackend`]。
    pub fn unsupported(backend: impl Into<String>) -> Self {
        EncoderError::UnsupportedBackend {
            backend: backend.into(),
        }
    }

    /// 包装可选编码库的错误。
    pub fn backend(encoder: &'static str, err: impl fmt::Display) -> Self {
        EncoderError::Backend {
            encoder,
            reason: err.to_string(),
        }
    }

    /// 是否为后端标识无法识别导致的错误。
    pub fn is_unsupported_backend(&self) -> bool {
        matches!(self, EncoderError::UnsupportedBackend { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_backend_message_names_identifier() {
        let err = EncoderError::unsupported("xml");
        assert!(err.is_unsupported_backend());
        assert_eq!(err.to_string(), "unsupported backend `xml`");
    }

    #[test]
    fn backend_failure_names_encoder() {
        let err = EncoderError::backend("oj", "number out of range");
        assert!(!err.is_unsupported_backend());
        assert_eq!(
            err.to_string(),
            "oj encoder failed to encode mapping: number out of range"
        );
    }
}
