//! # 即席序列化入口
//!
//! ## 核心意图（Why）
//! - 调用方无需命名或预先定义 Schema 类型，只需在调用处给出一段声明闭包；
//! - 入口在内部维护一个惰性创建、可复用的 Schema 持有者。
//!
//! ## 调用流程（How）
//! 1. 检查声明闭包是否存在，缺失时立即返回 [`ResourceError::MissingDeclarationBlock`]；
//! 2. 把目标对象投影为结构化值；
//! 3. 取得（必要时创建）共享 Schema，并在其上执行声明闭包；
//! 4. 用 Schema 构建输出，集合对象逐个元素展开；
//! 5. 有效后端 = 单次覆盖 ?? 默认序列化后端；两者都缺省时使用当前配置的编码器；
//! 6. 编码并返回文本。单次覆盖不会修改进程级配置。
//!
//! ## 累积语义（What）
//! - [`AdhocMode::Accumulate`]（默认）：每次调用的声明追加到同一个共享 Schema 上，
//!   先前调用声明过的属性在后续调用中依然生效；
//! - [`AdhocMode::Isolated`]：每次调用使用全新的 Schema，互不影响。
//! - 共享 Schema 的“创建 → 声明 → 构建”在同一把锁内完成，并发调用不会交错叠加声明。

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spark_encoder::{BackendId, EncoderConfig, EncoderHandle};
use tracing::trace;

use crate::ResourceError;
use crate::resource::Resource;
use crate::schema::Schema;

/// 即席 Schema 的生命周期策略。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdhocMode {
    /// 所有调用共享并累积同一个 Schema。
    #[default]
    Accumulate,
    /// 每次调用使用独立的新 Schema。
    Isolated,
}

/// 即席序列化上下文。
///
/// # 教案式说明
/// - **意图 (Why)**：把编码配置与共享 Schema 收拢在一个可注入的对象里，测试可各自构造实例；
/// - **契约 (What)**：
///   - [`serialize`](Self::serialize) 是唯一入口，声明闭包为 `None` 时不做任何修改；
///   - Schema 持有者在首次成功通过前置检查的调用中创建；
/// - **并发 (How)**：持有者由 `parking_lot::Mutex` 保护，编码在释放锁之后进行。
pub struct Serializer {
    config: Arc<EncoderConfig>,
    mode: AdhocMode,
    holder: Mutex<Option<Schema<Value>>>,
}

impl Serializer {
    pub fn new(config: Arc<EncoderConfig>) -> Self {
        Self {
            config,
            mode: AdhocMode::default(),
            holder: Mutex::new(None),
        }
    }

    pub fn with_mode(mut self, mode: AdhocMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> AdhocMode {
        self.mode
    }

    pub fn config(&self) -> &Arc<EncoderConfig> {
        &self.config
    }

    /// 即席序列化。
    ///
    /// - `with`：本次调用使用的后端，不修改进程级配置；
    /// - `declare`：在 Schema 上登记属性的闭包，必须提供。
    pub fn serialize<T, F>(
        &self,
        object: &T,
        with: Option<BackendId>,
        declare: Option<F>,
    ) -> Result<String, ResourceError>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&mut Schema<Value>),
    {
        let declare = declare.ok_or(ResourceError::MissingDeclarationBlock)?;
        let target = serde_json::to_value(object).map_err(ResourceError::Projection)?;

        let value = match self.mode {
            AdhocMode::Accumulate => {
                let mut holder = self.holder.lock();
                let schema = holder.get_or_insert_with(Schema::new);
                declare(&mut *schema);
                trace!(
                    definitions = schema.len(),
                    "layered ad-hoc declarations onto shared schema"
                );
                render(schema, &target)?
            }
            AdhocMode::Isolated => {
                let mut schema = Schema::new();
                declare(&mut schema);
                render(&schema, &target)?
            }
        };

        let encoder = self.effective_encoder(with)?;
        Ok(encoder.encode(&value)?)
    }

    /// 共享 Schema 的当前快照；尚未创建时返回 `None`。
    pub fn shared_schema(&self) -> Option<Schema<Value>> {
        self.holder.lock().clone()
    }

    /// 丢弃共享 Schema，下一次调用会重新创建。
    pub fn reset_schema(&self) {
        self.holder.lock().take();
    }

    fn effective_encoder(&self, with: Option<BackendId>) -> Result<EncoderHandle, ResourceError> {
        let backend = with.or_else(|| self.config.default_serializer());
        Ok(self.config.encoder_for(backend.as_ref())?)
    }
}

/// 数组视为集合，其余视为单个对象。
fn render(schema: &Schema<Value>, target: &Value) -> Result<Value, ResourceError> {
    match target {
        Value::Array(items) => Resource::collection(schema, items).to_value(),
        object => Resource::new(schema, object).to_value(),
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("config", &self.config)
            .field("mode", &self.mode)
            .field("schema", &*self.holder.lock())
            .finish()
    }
}

/// 进程级即席序列化上下文，共享 [`spark_encoder::global`] 的编码配置。
pub fn global() -> &'static Serializer {
    static GLOBAL: OnceLock<Serializer> = OnceLock::new();
    GLOBAL.get_or_init(|| Serializer::new(spark_encoder::global()))
}

/// 使用进程级上下文执行即席序列化。
pub fn serialize<T, F>(
    object: &T,
    with: Option<BackendId>,
    declare: Option<F>,
) -> Result<String, ResourceError>
where
    T: Serialize + ?Sized,
    F: FnOnce(&mut Schema<Value>),
{
    global().serialize(object, with, declare)
}
