use serde::Serialize;
use serde_json::{Map, Value};
use spark_encoder::EncoderHandle;

use crate::ResourceError;
use crate::schema::{KeyTransform, Schema};

enum Target<'a, T> {
    One(&'a T),
    Many(&'a [T]),
}

/// `Resource` 把一份 [`Schema`] 绑定到单个对象或一组对象上。
///
/// # 教案式说明
/// - **意图 (Why)**：Schema 描述“怎么展开”，Resource 负责“展开谁”，二者分离后同一 Schema
///   可以服务任意多次调用；
/// - **契约 (What)**：实例只借用 Schema 与目标对象，调用结束即丢弃；
///   设置了根键时，输出包裹在根键之下；
/// - **执行 (How)**：[`to_value`](Self::to_value) 构建结构化值，[`serialize`](Self::serialize)
///   再交给编码器渲染为文本。
pub struct Resource<'a, T> {
    schema: &'a Schema<T>,
    target: Target<'a, T>,
}

impl<'a, T: Serialize> Resource<'a, T> {
    pub fn new(schema: &'a Schema<T>, object: &'a T) -> Self {
        Self {
            schema,
            target: Target::One(object),
        }
    }

    pub fn collection(schema: &'a Schema<T>, objects: &'a [T]) -> Self {
        Self {
            schema,
            target: Target::Many(objects),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.target, Target::Many(_))
    }

    /// 构建结构化值（含根键包裹）。
    pub fn to_value(&self) -> Result<Value, ResourceError> {
        match self.target {
            Target::One(object) => {
                let mapping = self.schema.build_with(object, KeyTransform::None)?;
                Ok(wrap(self.schema.root_key_name(), Value::Object(mapping)))
            }
            Target::Many(objects) => {
                let items = objects
                    .iter()
                    .map(|object| {
                        self.schema
                            .build_with(object, KeyTransform::None)
                            .map(Value::Object)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(wrap(
                    self.schema.collection_root_key_name(),
                    Value::Array(items),
                ))
            }
        }
    }

    /// 构建并使用给定编码器渲染为文本。
    pub fn serialize(&self, encoder: &EncoderHandle) -> Result<String, ResourceError> {
        let value = self.to_value()?;
        Ok(encoder.encode(&value)?)
    }
}

fn wrap(root_key: Option<&str>, value: Value) -> Value {
    match root_key {
        Some(key) => {
            let mut root = Map::new();
            root.insert(key.to_owned(), value);
            Value::Object(root)
        }
        None => value,
    }
}
