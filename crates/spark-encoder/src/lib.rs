#![deny(unsafe_code)]

//! # spark-encoder
//!
//! ## 定位与职责（Why）
//! - 把后端标识（`default`/`json`/`oj`/`active_support`）解析为具体的文本编码器；
//! - 可选编码能力缺失时静默降级到默认编码器，优先保证可用性；
//! - 记忆化解析结果，同一后端始终复用同一个编码器实例。
//!
//! ## 架构嵌入（Where）
//! - `backend`：后端标识及其文本形式；
//! - `capability`：可选能力探测接口，替代“加载失败即异常”的控制流；
//! - `encoder`：编码器契约与三种实现；
//! - `resolver`：解析与记忆化；
//! - `config`：进程级配置上下文（当前后端、编码器、默认序列化后端）。
//!
//! ## Feature 策略（Trade-offs）
//! - `oj` 链接 `simd-json`，`active-support` 链接 `sonic-rs`，两者默认开启；
//! - [`CompiledCapabilities`] 按 Feature 回答探测；关闭时对应后端仍可设置，
//!   只是解析为默认编码器，不会报错。

pub mod backend;
pub mod capability;
pub mod config;
pub mod encoder;
pub mod error;
pub mod resolver;

pub use backend::BackendId;
pub use capability::{
    Availability, Capability, CapabilityProbe, CompiledCapabilities, StaticCapabilities,
};
pub use config::{EncoderConfig, EncoderState, global};
pub use encoder::{Encoder, EncoderHandle, JsonEncoder};
#[cfg(feature = "oj")]
pub use encoder::FastJsonEncoder;
#[cfg(feature = "active-support")]
pub use encoder::FrameworkJsonEncoder;
pub use error::EncoderError;
pub use resolver::BackendResolver;
