use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::Deserialize;

/// 输出键名转换规则。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTransform {
    /// 保持声明时的键名。
    #[default]
    None,
    /// `user_name` → `UserName`
    Camel,
    /// `user_name` → `userName`
    LowerCamel,
    /// `user_name` → `user-name`
    Dash,
    /// `UserName` → `user_name`
    Snake,
}

impl KeyTransform {
    pub fn apply(self, key: &str) -> String {
        match self {
            KeyTransform::None => key.to_owned(),
            KeyTransform::Camel => key.to_upper_camel_case(),
            KeyTransform::LowerCamel => key.to_lower_camel_case(),
            KeyTransform::Dash => key.to_kebab_case(),
            KeyTransform::Snake => key.to_snake_case(),
        }
    }
}
