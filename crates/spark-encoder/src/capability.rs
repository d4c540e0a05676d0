//! 可选编码能力的探测接口。
//!
//! 解析器不通过错误控制流判断依赖是否存在，而是向 [`CapabilityProbe`] 询问
//! [`Availability`]。默认实现 [`CompiledCapabilities`] 依据可选编码库是否被编译进来回答，
//! 测试可注入 [`StaticCapabilities`] 模拟任意环境。

use std::fmt;

/// 可选的编码能力。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// 快速 JSON（`oj` 后端）。
    FastJson,
    /// 框架 JSON（`active_support` 后端）。
    FrameworkJson,
}

impl Capability {
    /// 对应的 Cargo Feature 名称。
    pub fn feature_name(self) -> &'static str {
        match self {
            Capability::FastJson => "oj",
            Capability::FrameworkJson => "active-support",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::FastJson => f.write_str("fast-json"),
            Capability::FrameworkJson => f.write_str("framework-json"),
        }
    }
}

/// 探测结果。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    Present,
    Absent,
}

impl Availability {
    pub fn is_present(self) -> bool {
        matches!(self, Availability::Present)
    }
}

impl From<bool> for Availability {
    fn from(value: bool) -> Self {
        if value {
            Availability::Present
        } else {
            Availability::Absent
        }
    }
}

/// `CapabilityProbe` 回答某项可选能力在当前环境中是否可用。
///
/// # 契约说明（What）
/// - 探测必须无副作用且不 panic；“不可用”是正常结果而非错误；
/// - 解析器对同一能力只探测一次，实现方无需自行缓存；
/// - 探测报告可用但对应编码库未编译进来时，解析器仍降级为默认编码器。
pub trait CapabilityProbe: Send + Sync + 'static {
    fn probe(&self, capability: Capability) -> Availability;
}

/// 依据可选编码库（`simd-json` / `sonic-rs`）是否随 Feature 编译进来报告能力可用性。
#[derive(Clone, Copy, Debug, Default)]
pub struct CompiledCapabilities;

impl CapabilityProbe for CompiledCapabilities {
    fn probe(&self, capability: Capability) -> Availability {
        match capability {
            Capability::FastJson => Availability::from(cfg!(feature = "oj")),
            Capability::FrameworkJson => Availability::from(cfg!(feature = "active-support")),
        }
    }
}

/// 固定答案的探测器，常用于测试。
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticCapabilities {
    fast_json: bool,
    framework_json: bool,
}

impl StaticCapabilities {
    /// 所有可选能力均不可用。
    pub const fn none() -> Self {
        Self {
            fast_json: false,
            framework_json: false,
        }
    }

    /// 所有可选能力均可用。
    pub const fn all() -> Self {
        Self {
            fast_json: true,
            framework_json: true,
        }
    }

    pub const fn with(mut self, capability: Capability, present: bool) -> Self {
        match capability {
            Capability::FastJson => self.fast_json = present,
            Capability::FrameworkJson => self.framework_json = present,
        }
        self
    }
}

impl CapabilityProbe for StaticCapabilities {
    fn probe(&self, capability: Capability) -> Availability {
        match capability {
            Capability::FastJson => Availability::from(self.fast_json),
            Capability::FrameworkJson => Availability::from(self.framework_json),
        }
    }
}
