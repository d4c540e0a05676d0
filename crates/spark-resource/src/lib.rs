#![deny(unsafe_code)]

//! # spark-resource
//!
//! ## 定位与职责（Why）
//! - 以声明式 [`Schema`] 描述对象如何展开为有序键值结构，并通过 `spark-encoder`
//!   选定的编码器渲染为 JSON 文本；
//! - 提供无需预先命名 Schema 的即席入口 [`serialize`]，调用处直接给出声明闭包。
//!
//! ## 架构嵌入（Where）
//! - `schema`：属性声明、条件属性、嵌套关联与键名转换；
//! - `resource`：把 Schema 绑定到单个对象或集合，处理根键包裹；
//! - `serializer`：即席入口与共享 Schema 持有者；
//! - `settings`：TOML 配置加载；
//! - `logging`：可选的日志订阅器安装入口。
//!
//! ## 快速上手（How）
//! ```
//! use serde_json::json;
//! use spark_resource::{BackendId, Schema};
//!
//! let out = spark_resource::serialize(
//!     &json!({"id": 1, "secret": "x"}),
//!     Some(BackendId::Json),
//!     Some(|s: &mut Schema<serde_json::Value>| {
//!         s.attributes(["id"]);
//!     }),
//! )
//! .unwrap();
//! assert_eq!(out, r#"{"id":1}"#);
//! ```

pub mod error;
pub mod logging;
pub mod resource;
pub mod schema;
pub mod serializer;
pub mod settings;

pub use error::{ResourceError, SettingsError};
pub use logging::LoggingError;
pub use resource::Resource;
pub use schema::{KeyTransform, Mapping, Schema};
pub use serializer::{AdhocMode, Serializer, global, serialize};
pub use settings::ResourceSettings;

pub use spark_encoder::{
    BackendId, Capability, CapabilityProbe, EncoderConfig, EncoderError, EncoderHandle,
    StaticCapabilities,
};
