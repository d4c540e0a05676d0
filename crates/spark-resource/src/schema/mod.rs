//! # 声明式资源 Schema
//!
//! ## 核心意图（Why）
//! - 用一个有序的属性声明列表描述“对象应如何展开为键值结构”，替代运行期动态构造类型；
//! - 声明通过闭包施加到 [`Schema`] 上，重复施加会在已有声明之后追加。
//!
//! ## 使用方式（How）
//! ```
//! use serde::Serialize;
//! use spark_resource::{KeyTransform, Schema};
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u32,
//!     first_name: String,
//!     admin: bool,
//! }
//!
//! let mut schema = Schema::<User>::new();
//! schema
//!     .attributes(["id", "first_name"])
//!     .attribute_if("role", |u: &User| u.admin, |_: &User| "admin")
//!     .transform_keys(KeyTransform::LowerCamel);
//!
//! let user = User { id: 1, first_name: "Ada".into(), admin: true };
//! let mapping = schema.build(&user).unwrap();
//! assert_eq!(
//!     serde_json::to_string(&mapping).unwrap(),
//!     r#"{"id":1,"firstName":"Ada","role":"admin"}"#
//! );
//! ```
//!
//! ## 契约（What）
//! - 输出键的顺序与声明顺序一致；
//! - 同名键的重复声明整体替换旧声明（包括来源与条件），位置保持首次出现处，
//!   因此反复施加同一段声明不会让 Schema 增长；
//! - 条件不成立的属性直接跳过；
//! - 嵌套 Schema 未设置键名转换时沿用外层规则。

mod definition;
mod key_transform;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::ResourceError;

use self::definition::{Definition, Source};
pub use self::key_transform::KeyTransform;

/// 有序键值结构。
pub type Mapping = Map<String, Value>;

/// 属性声明的持有者。
pub struct Schema<T> {
    definitions: Vec<Definition<T>>,
    transform: Option<KeyTransform>,
    root_key: Option<String>,
    collection_root_key: Option<String>,
}

impl<T> Schema<T> {
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
            transform: None,
            root_key: None,
            collection_root_key: None,
        }
    }

    /// 在当前 Schema 上执行一段声明闭包。
    pub fn apply<F>(&mut self, declare: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        declare(self);
        self
    }

    /// 按字段名从对象的结构化投影中复制属性。
    pub fn attributes<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            self.define(Definition::new(name.clone(), Source::Field(name)));
        }
        self
    }

    /// 声明派生属性。
    pub fn attribute<K, V, F>(&mut self, key: K, getter: F) -> &mut Self
    where
        K: Into<String>,
        V: Serialize,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.define(Definition::new(key.into(), Source::Derived(derive(getter))));
        self
    }

    /// 声明条件属性，`condition` 为假时跳过该键。
    pub fn attribute_if<K, V, C, F>(&mut self, key: K, condition: C, getter: F) -> &mut Self
    where
        K: Into<String>,
        V: Serialize,
        C: Fn(&T) -> bool + Send + Sync + 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let definition =
            Definition::new(key.into(), Source::Derived(derive(getter))).when(Arc::new(condition));
        self.define(definition);
        self
    }

    /// 声明单个嵌套对象。
    pub fn one<K, D>(&mut self, name: K, declare: D) -> &mut Self
    where
        K: Into<String>,
        D: FnOnce(&mut Schema<Value>),
    {
        let field = name.into();
        let mut schema = Schema::new();
        declare(&mut schema);
        self.define(Definition::new(field.clone(), Source::One { field, schema }));
        self
    }

    /// 声明嵌套集合。
    pub fn many<K, D>(&mut self, name: K, declare: D) -> &mut Self
    where
        K: Into<String>,
        D: FnOnce(&mut Schema<Value>),
    {
        let field = name.into();
        let mut schema = Schema::new();
        declare(&mut schema);
        self.define(Definition::new(field.clone(), Source::Many { field, schema }));
        self
    }

    pub fn transform_keys(&mut self, transform: KeyTransform) -> &mut Self {
        self.transform = Some(transform);
        self
    }

    /// 单对象输出时包裹在该键之下。
    pub fn root_key<K: Into<String>>(&mut self, key: K) -> &mut Self {
        self.root_key = Some(key.into());
        self
    }

    /// 集合输出时包裹在该键之下。
    pub fn root_key_for_collection<K: Into<String>>(&mut self, key: K) -> &mut Self {
        self.collection_root_key = Some(key.into());
        self
    }

    /// 已声明的属性条数，同名键只计一次。
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 按声明顺序返回原始键名。
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|definition| definition.key.as_str())
    }

    pub fn root_key_name(&self) -> Option<&str> {
        self.root_key.as_deref()
    }

    pub fn collection_root_key_name(&self) -> Option<&str> {
        self.collection_root_key.as_deref()
    }

    /// 登记一条声明：同名键整体替换旧记录并沿用其位置，否则追加到末尾。
    fn define(&mut self, definition: Definition<T>) {
        match self
            .definitions
            .iter_mut()
            .find(|existing| existing.key == definition.key)
        {
            Some(existing) => *existing = definition,
            None => self.definitions.push(definition),
        }
    }
}

impl<T: Serialize> Schema<T> {
    /// 按声明把对象展开为有序键值结构。
    pub fn build(&self, object: &T) -> Result<Mapping, ResourceError> {
        self.build_with(object, KeyTransform::None)
    }

    pub(crate) fn build_with(
        &self,
        object: &T,
        inherited: KeyTransform,
    ) -> Result<Mapping, ResourceError> {
        let transform = self.transform.unwrap_or(inherited);
        let mut projection = None;
        let mut mapping = Mapping::new();

        for definition in &self.definitions {
            if !definition.applies_to(object) {
                continue;
            }
            let value = match &definition.source {
                Source::Field(field) => field_of(project(&mut projection, object)?, field)?.clone(),
                Source::Derived(getter) => getter(object)?,
                Source::One { field, schema } => {
                    match field_of(project(&mut projection, object)?, field)? {
                        Value::Null => Value::Null,
                        child => Value::Object(schema.build_with(child, transform)?),
                    }
                }
                Source::Many { field, schema } => {
                    match field_of(project(&mut projection, object)?, field)? {
                        Value::Null => Value::Null,
                        Value::Array(items) => Value::Array(
                            items
                                .iter()
                                .map(|item| schema.build_with(item, transform).map(Value::Object))
                                .collect::<Result<_, _>>()?,
                        ),
                        _ => {
                            return Err(ResourceError::NotACollection {
                                name: field.clone(),
                            });
                        }
                    }
                }
            };
            mapping.insert(transform.apply(&definition.key), value);
        }
        Ok(mapping)
    }
}

/// 对象只在首次需要按字段取值时投影一次。
fn project<'p, T: Serialize>(
    slot: &'p mut Option<Value>,
    object: &T,
) -> Result<&'p Value, ResourceError> {
    if slot.is_none() {
        let value = serde_json::to_value(object).map_err(ResourceError::Projection)?;
        *slot = Some(value);
    }
    Ok(slot.get_or_insert(Value::Null))
}

fn field_of<'v>(projection: &'v Value, field: &str) -> Result<&'v Value, ResourceError> {
    projection
        .as_object()
        .and_then(|object| object.get(field))
        .ok_or_else(|| ResourceError::MissingAttribute {
            name: field.to_owned(),
        })
}

fn derive<T, V, F>(getter: F) -> definition::Getter<T>
where
    V: Serialize,
    F: Fn(&T) -> V + Send + Sync + 'static,
{
    Arc::new(move |object: &T| {
        serde_json::to_value(getter(object)).map_err(ResourceError::Projection)
    })
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Self {
            definitions: self.definitions.clone(),
            transform: self.transform,
            root_key: self.root_key.clone(),
            collection_root_key: self.collection_root_key.clone(),
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("definitions", &self.definitions)
            .field("transform", &self.transform)
            .field("root_key", &self.root_key)
            .field("collection_root_key", &self.collection_root_key)
            .finish()
    }
}
