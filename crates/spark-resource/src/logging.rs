//! 日志订阅器安装入口。
//!
//! 库内部只通过 `tracing` 宏发出事件，是否输出、输出到哪里由宿主决定。
//! 没有自有日志体系的宿主可以调用 [`install`] 获得 `fmt + EnvFilter` 的默认组合。

use std::sync::OnceLock;

use thiserror::Error;
use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// 安装日志订阅器时可能出现的错误。
#[derive(Debug, Error)]
pub enum LoggingError {
    /// [`install`] 被重复调用。
    #[error("logging subscriber already installed by spark-resource")]
    AlreadyInstalled,
    /// 宿主在此之前已设置全局 Subscriber。
    #[error("a global tracing subscriber has already been set")]
    SubscriberAlreadySet,
    /// 设置全局 Subscriber 失败的底层错误。
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[source] dispatcher::SetGlobalDefaultError),
}

/// 安装进程级日志订阅器。
///
/// # 教案式说明
/// - **契约 (What)**：过滤规则取自 `RUST_LOG`，缺省为 `info`；重复调用返回
///   [`LoggingError::AlreadyInstalled`]，外部已设置订阅器时返回
///   [`LoggingError::SubscriberAlreadySet`]；
/// - **执行 (How)**：`registry + EnvFilter + fmt` 组合后设置为全局默认。
pub fn install() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Err(LoggingError::AlreadyInstalled);
    }
    if dispatcher::has_been_set() {
        return Err(LoggingError::SubscriberAlreadySet);
    }

    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter())
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)
        .map_err(LoggingError::SetGlobalSubscriber)?;

    INSTALLED
        .set(())
        .map_err(|_| LoggingError::AlreadyInstalled)
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
