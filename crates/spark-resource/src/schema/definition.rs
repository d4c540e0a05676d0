use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::Schema;
use crate::ResourceError;

pub(crate) type Getter<T> = Arc<dyn Fn(&T) -> Result<Value, ResourceError> + Send + Sync>;
pub(crate) type Condition<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// 属性值的来源。
pub(crate) enum Source<T> {
    /// 从对象的结构化投影中按字段名取值。
    Field(String),
    /// 由闭包从对象派生。
    Derived(Getter<T>),
    /// 单个嵌套对象，字段值为 null 时输出 null。
    One { field: String, schema: Schema<Value> },
    /// 嵌套集合，逐个元素套用同一 Schema。
    Many { field: String, schema: Schema<Value> },
}

/// 一条属性声明记录。
pub(crate) struct Definition<T> {
    pub(crate) key: String,
    pub(crate) source: Source<T>,
    pub(crate) condition: Option<Condition<T>>,
}

impl<T> Definition<T> {
    pub(crate) fn new(key: String, source: Source<T>) -> Self {
        Self {
            key,
            source,
            condition: None,
        }
    }

    pub(crate) fn when(mut self, condition: Condition<T>) -> Self {
        self.condition = Some(condition);
        self
    }

    pub(crate) fn applies_to(&self, object: &T) -> bool {
        self.condition.as_ref().is_none_or(|condition| condition(object))
    }
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Source::Field(field) => Source::Field(field.clone()),
            Source::Derived(getter) => Source::Derived(Arc::clone(getter)),
            Source::One { field, schema } => Source::One {
                field: field.clone(),
                schema: schema.clone(),
            },
            Source::Many { field, schema } => Source::Many {
                field: field.clone(),
                schema: schema.clone(),
            },
        }
    }
}

impl<T> Clone for Definition<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            source: self.source.clone(),
            condition: self.condition.clone(),
        }
    }
}

impl<T> fmt::Debug for Definition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.source {
            Source::Field(_) => "field",
            Source::Derived(_) => "derived",
            Source::One { .. } => "one",
            Source::Many { .. } => "many",
        };
        f.debug_struct("Definition")
            .field("key", &self.key)
            .field("kind", &kind)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}
