//! # 后端解析器
//!
//! ## 职责（Why）
//! - 把 [`BackendId`] 映射为具体的 [`Encoder`](crate::Encoder) 实现；
//! - 可选依赖缺失时静默降级为默认编码器，保证“总能产出合法输出”；
//! - 记忆化：每种编码器只构造一次，每项能力只探测一次。
//!
//! ## 解析顺序（How）
//! 按标识逐项匹配，首个命中者生效：
//! 1. `Oj` → 探测 [`Capability::FastJson`]，可用且 `simd-json` 已编译进来时返回快速 JSON 编码器；
//! 2. `ActiveSupport` → 探测 [`Capability::FrameworkJson`]，可用且 `sonic-rs` 已编译进来时
//!    返回框架 JSON 编码器；
//! 3. 未设置 / `Default` / `Json` → [`JsonEncoder`]；
//! 4. 其余 → [`EncoderError::UnsupportedBackend`]。

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::capability::{Availability, Capability, CapabilityProbe, CompiledCapabilities};
use crate::encoder::{self, EncoderHandle, JsonEncoder};
use crate::{BackendId, EncoderError};

/// 带记忆化的后端解析器。
///
/// # 契约说明（What）
/// - 同一后端的重复解析返回同一个 `Arc`（可用 `Arc::ptr_eq` 验证）；
/// - 降级路径同样返回默认编码器的共享句柄；
/// - 解析过程不修改任何进程级配置，可在任意线程并发调用。
pub struct BackendResolver {
    probe: Arc<dyn CapabilityProbe>,
    default: EncoderHandle,
    fast_json: OnceLock<Option<EncoderHandle>>,
    framework_json: OnceLock<Option<EncoderHandle>>,
    fast_json_probe: OnceLock<Availability>,
    framework_json_probe: OnceLock<Availability>,
}

impl BackendResolver {
    /// 使用编译期 Feature 作为能力来源。
    pub fn new() -> Self {
        Self::with_probe(Arc::new(CompiledCapabilities))
    }

    /// 注入自定义能力探测器。
    pub fn with_probe(probe: Arc<dyn CapabilityProbe>) -> Self {
        Self {
            probe,
            default: Arc::new(JsonEncoder),
            fast_json: OnceLock::new(),
            framework_json: OnceLock::new(),
            fast_json_probe: OnceLock::new(),
            framework_json_probe: OnceLock::new(),
        }
    }

    /// 默认编码器句柄。
    pub fn default_encoder(&self) -> EncoderHandle {
        Arc::clone(&self.default)
    }

    /// 解析后端标识。
    pub fn resolve(&self, backend: Option<&BackendId>) -> Result<EncoderHandle, EncoderError> {
        match backend {
            Some(BackendId::Oj) => Ok(self.optional(Capability::FastJson)),
            Some(BackendId::ActiveSupport) => Ok(self.optional(Capability::FrameworkJson)),
            None | Some(BackendId::Default) | Some(BackendId::Json) => Ok(self.default_encoder()),
            Some(BackendId::Other(name)) => Err(EncoderError::unsupported(name.clone())),
        }
    }

    /// 查询能力可用性，每项能力只探测一次。
    pub fn availability(&self, capability: Capability) -> Availability {
        let slot = match capability {
            Capability::FastJson => &self.fast_json_probe,
            Capability::FrameworkJson => &self.framework_json_probe,
        };
        *slot.get_or_init(|| {
            let availability = self.probe.probe(capability);
            debug!(%capability, ?availability, "probed optional encoder capability");
            availability
        })
    }

    fn optional(&self, capability: Capability) -> EncoderHandle {
        if !self.availability(capability).is_present() {
            debug!(
                %capability,
                feature = capability.feature_name(),
                "optional encoder unavailable, falling back to default encoder"
            );
            return self.default_encoder();
        }
        let compiled = match capability {
            Capability::FastJson => self.fast_json.get_or_init(encoder::fast_json),
            Capability::FrameworkJson => self.framework_json.get_or_init(encoder::framework_json),
        };
        match compiled {
            Some(handle) => Arc::clone(handle),
            None => {
                debug!(
                    %capability,
                    feature = capability.feature_name(),
                    "optional encoder not compiled in, falling back to default encoder"
                );
                self.default_encoder()
            }
        }
    }
}

impl Default for BackendResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BackendResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendResolver")
            .field("fast_json", &self.fast_json_probe.get())
            .field("framework_json", &self.framework_json_probe.get())
            .finish()
    }
}
