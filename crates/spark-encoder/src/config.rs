//! 进程级编码配置。
//!
//! [`EncoderConfig`] 保存“当前后端标识 + 已解析编码器”以及可选的默认序列化后端。
//! 前两者作为同一个快照整体替换，读者只会看到旧快照或新快照，不会看到半成品。

use std::fmt;
use std::sync::{Arc, OnceLock};

use arc_swap::{ArcSwap, ArcSwapOption};
use tracing::debug;

use crate::capability::CapabilityProbe;
use crate::encoder::EncoderHandle;
use crate::resolver::BackendResolver;
use crate::{BackendId, EncoderError};

/// 一次成功解析后的配置快照。
#[derive(Clone)]
pub struct EncoderState {
    backend: Option<BackendId>,
    encoder: EncoderHandle,
}

impl EncoderState {
    pub fn backend(&self) -> Option<&BackendId> {
        self.backend.as_ref()
    }

    pub fn encoder(&self) -> &EncoderHandle {
        &self.encoder
    }
}

impl fmt::Debug for EncoderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderState")
            .field("backend", &self.backend)
            .field("encoder", &self.encoder.name())
            .finish()
    }
}

/// `EncoderConfig` 是编码后端的配置上下文。
///
/// # 设计背景（Why）
/// - 原有用法依赖进程级单例；这里把状态收拢到一个可显式构造、可注入的结构中，
///   测试可以各自持有实例，互不干扰；
/// - 需要进程级共享时，使用 [`global`] 返回的惰性实例。
///
/// # 并发语义（What）
/// - [`set_backend`](Self::set_backend) 是编码器的唯一写入者，采用 `ArcSwap` 整体替换，后写者胜；
/// - 读取无锁；
/// - 解析失败时快照保持不变：后端标识与编码器都不会被修改。
pub struct EncoderConfig {
    resolver: BackendResolver,
    state: ArcSwap<EncoderState>,
    default_serializer: ArcSwapOption<BackendId>,
}

impl EncoderConfig {
    /// 以编译期能力构造配置，初始编码器为默认编码器。
    pub fn new() -> Self {
        Self::with_resolver(BackendResolver::new())
    }

    /// 注入能力探测器。
    pub fn with_probe(probe: Arc<dyn CapabilityProbe>) -> Self {
        Self::with_resolver(BackendResolver::with_probe(probe))
    }

    pub fn with_resolver(resolver: BackendResolver) -> Self {
        let state = EncoderState {
            backend: None,
            encoder: resolver.default_encoder(),
        };
        Self {
            resolver,
            state: ArcSwap::from_pointee(state),
            default_serializer: ArcSwapOption::empty(),
        }
    }

    /// 当前后端标识。
    pub fn backend(&self) -> Option<BackendId> {
        self.state.load().backend.clone()
    }

    /// 当前编码器句柄。
    pub fn encoder(&self) -> EncoderHandle {
        Arc::clone(&self.state.load().encoder)
    }

    /// 当前快照。
    pub fn snapshot(&self) -> Arc<EncoderState> {
        self.state.load_full()
    }

    /// 设置后端并同步重新解析编码器。
    ///
    /// # 教案式说明
    /// - **契约 (What)**：`None` 表示未设置，等价于默认编码器；无法识别的标识返回
    ///   [`EncoderError::UnsupportedBackend`]，且不修改任何状态；
    /// - **执行 (How)**：先解析，成功后以新快照整体替换旧快照。
    pub fn set_backend(&self, backend: Option<BackendId>) -> Result<(), EncoderError> {
        let encoder = self.resolver.resolve(backend.as_ref())?;
        debug!(
            backend = backend.as_ref().map(BackendId::as_str),
            encoder = encoder.name(),
            "encoder backend configured"
        );
        self.state.store(Arc::new(EncoderState { backend, encoder }));
        Ok(())
    }

    /// 以文本形式设置后端。
    pub fn set_backend_str(&self, backend: Option<&str>) -> Result<(), EncoderError> {
        self.set_backend(backend.map(BackendId::from))
    }

    /// 默认序列化后端，未设置时返回 `None`。
    pub fn default_serializer(&self) -> Option<BackendId> {
        self.default_serializer
            .load_full()
            .map(|id| BackendId::clone(&id))
    }

    /// 设置默认序列化后端，此处不做校验，使用时才解析。
    pub fn set_default_serializer(&self, backend: Option<BackendId>) {
        self.default_serializer.store(backend.map(Arc::new));
    }

    /// 按单次调用解析编码器，不修改任何状态。
    ///
    /// `None` 时返回当前已配置的编码器。
    pub fn encoder_for(&self, backend: Option<&BackendId>) -> Result<EncoderHandle, EncoderError> {
        match backend {
            Some(id) => self.resolver.resolve(Some(id)),
            None => Ok(self.encoder()),
        }
    }

    pub fn resolver(&self) -> &BackendResolver {
        &self.resolver
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EncoderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderConfig")
            .field("state", &self.snapshot())
            .field("default_serializer", &self.default_serializer())
            .finish()
    }
}

/// 进程级共享配置，首次访问时惰性创建。
pub fn global() -> Arc<EncoderConfig> {
    static GLOBAL: OnceLock<Arc<EncoderConfig>> = OnceLock::new();
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(EncoderConfig::new())))
}
