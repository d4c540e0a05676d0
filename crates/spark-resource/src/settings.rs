//! # 资源序列化配置
//!
//! ## 核心意图（Why）
//! - 允许宿主以 TOML 文本声明编码后端、默认序列化后端与即席 Schema 策略，
//!   不必在启动代码里逐项调用 setter；
//!
//! ## 文件格式（What）
//! ```toml
//! backend = "oj"
//! default_serializer = "active_support"
//! adhoc_mode = "isolated"
//! ```
//! - 三个键均可省略，未知键视为错误；
//! - 后端标识在应用时校验，解析阶段只检查格式。

use std::sync::Arc;

use serde::Deserialize;
use spark_encoder::{BackendId, EncoderConfig};
use tracing::info;

use crate::SettingsError;
use crate::serializer::{AdhocMode, Serializer};

/// 从配置文件读入的设置。
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceSettings {
    pub backend: Option<BackendId>,
    pub default_serializer: Option<BackendId>,
    pub adhoc_mode: AdhocMode,
}

impl ResourceSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// 把设置写入编码配置。
    ///
    /// # 教案式说明
    /// - **契约 (What)**：任一后端无法识别时返回错误，且 `config` 不被修改；
    /// - **执行 (How)**：先校验默认序列化后端，再设置编码后端，最后写入默认序列化后端，
    ///   保证失败发生在任何写入之前。
    pub fn apply_to(&self, config: &EncoderConfig) -> Result<(), SettingsError> {
        if let Some(id) = &self.default_serializer {
            config.resolver().resolve(Some(id))?;
        }
        config.set_backend(self.backend.clone())?;
        config.set_default_serializer(self.default_serializer.clone());
        info!(
            backend = self.backend.as_ref().map(BackendId::as_str),
            default_serializer = self.default_serializer.as_ref().map(BackendId::as_str),
            adhoc_mode = ?self.adhoc_mode,
            "resource settings applied"
        );
        Ok(())
    }

    /// 以全新的编码配置构造即席序列化上下文。
    pub fn build_serializer(&self) -> Result<Serializer, SettingsError> {
        self.build_serializer_with(Arc::new(EncoderConfig::new()))
    }

    /// 把设置写入给定配置后构造即席序列化上下文。
    pub fn build_serializer_with(
        &self,
        config: Arc<EncoderConfig>,
    ) -> Result<Serializer, SettingsError> {
        self.apply_to(&config)?;
        Ok(Serializer::new(config).with_mode(self.adhoc_mode))
    }
}
