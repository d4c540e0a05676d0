//! 即席序列化入口的端到端场景。
//!
//! 每个用例持有独立的 [`EncoderConfig`]，能力探测通过 [`StaticCapabilities`] 注入，
//! 用例之间不会相互污染进程级状态。需要真实可选编码库的用例按 feature 编译。

use std::sync::Arc;
use std::thread;

use serde::Serialize;
use serde_json::{Value, json};
use spark_resource::{
    AdhocMode, BackendId, EncoderConfig, ResourceError, Schema, Serializer, StaticCapabilities,
};

fn bare_serializer(mode: AdhocMode) -> Serializer {
    let config = EncoderConfig::with_probe(Arc::new(StaticCapabilities::none()));
    Serializer::new(Arc::new(config)).with_mode(mode)
}

fn expose_name(schema: &mut Schema<Value>) {
    schema.attributes(["name"]);
}

#[test]
fn json_backend_renders_declared_attributes() {
    let serializer = bare_serializer(AdhocMode::Isolated);
    serializer
        .config()
        .set_backend(Some(BackendId::Json))
        .expect("json 是受支持后端");

    let out = serializer
        .serialize(&json!({"name": "x"}), None, Some(expose_name))
        .expect("序列化成功");
    assert_eq!(out, r#"{"name":"x"}"#);
}

#[test]
fn missing_fast_json_falls_back_silently() {
    let serializer = bare_serializer(AdhocMode::Isolated);
    serializer
        .config()
        .set_backend(Some(BackendId::Oj))
        .expect("依赖缺失时不报错");
    assert_eq!(serializer.config().backend(), Some(BackendId::Oj));
    assert_eq!(serializer.config().encoder().name(), "json");

    let out = serializer
        .serialize(&json!({"name": "x"}), None, Some(expose_name))
        .expect("序列化成功");
    assert_eq!(out, r#"{"name":"x"}"#);
}

#[cfg(feature = "oj")]
#[test]
fn unknown_backend_keeps_last_resolved_encoder() {
    let config = Arc::new(EncoderConfig::with_probe(Arc::new(
        StaticCapabilities::none().with(spark_resource::Capability::FastJson, true),
    )));
    config.set_backend(Some(BackendId::Oj)).expect("oj 可用");
    let serializer = Serializer::new(Arc::clone(&config)).with_mode(AdhocMode::Isolated);

    let err = config
        .set_backend_str(Some("unknown"))
        .expect_err("unknown 不受支持");
    assert!(err.is_unsupported_backend());
    assert_eq!(config.backend(), Some(BackendId::Oj));
    assert_eq!(config.encoder().name(), "oj");

    let out = serializer
        .serialize(&json!({"name": "x"}), None, Some(expose_name))
        .expect("仍使用上一次成功解析的编码器");
    assert_eq!(out, r#"{"name":"x"}"#);
}

#[test]
fn unknown_override_propagates_unchanged() {
    let serializer = bare_serializer(AdhocMode::Isolated);
    let err = serializer
        .serialize(
            &json!({"name": "x"}),
            Some(BackendId::from("xml")),
            Some(expose_name),
        )
        .expect_err("xml 不受支持");
    assert!(err.is_unsupported_backend());
    assert!(err.to_string().contains("xml"));
}

#[test]
fn missing_block_performs_no_work() {
    let serializer = bare_serializer(AdhocMode::Accumulate);
    let err = serializer
        .serialize(&json!({"name": "x"}), None, None::<fn(&mut Schema<Value>)>)
        .expect_err("缺少声明闭包");
    assert!(matches!(err, ResourceError::MissingDeclarationBlock));
    assert!(err.to_string().starts_with("block required"));
    assert!(serializer.shared_schema().is_none());
}

#[test]
fn accumulate_mode_layers_declarations_across_calls() {
    let serializer = bare_serializer(AdhocMode::Accumulate);
    let object = json!({"id": 7, "name": "x"});

    let only_id = |s: &mut Schema<Value>| {
        s.attributes(["id"]);
    };
    let first = serializer
        .serialize(&object, None, Some(only_id))
        .expect("第一次调用");
    assert_eq!(first, r#"{"id":7}"#);

    let second = serializer
        .serialize(&object, None, Some(expose_name))
        .expect("第二次调用");
    assert_eq!(second, r#"{"id":7,"name":"x"}"#);

    let keys: Vec<String> = serializer
        .shared_schema()
        .map(|schema| schema.keys().map(str::to_owned).collect())
        .unwrap_or_default();
    assert_eq!(keys, ["id", "name"]);
}

#[test]
fn repeated_identical_calls_keep_shared_schema_bounded() {
    let serializer = bare_serializer(AdhocMode::Accumulate);
    let object = json!({"name": "x"});
    for _ in 0..1000 {
        let out = serializer
            .serialize(&object, None, Some(expose_name))
            .expect("序列化成功");
        assert_eq!(out, r#"{"name":"x"}"#);
    }
    assert_eq!(serializer.shared_schema().map(|s| s.len()), Some(1));
}

#[test]
fn redeclaration_replaces_earlier_definition() {
    let serializer = bare_serializer(AdhocMode::Accumulate);
    let object = json!({"id": 1, "name": "x"});

    let first = serializer
        .serialize(&object, None, Some(expose_name))
        .expect("第一次调用");
    assert_eq!(first, r#"{"name":"x"}"#);

    let hide_name = |s: &mut Schema<Value>| {
        s.attribute_if("name", |_: &Value| false, |v: &Value| v["name"].clone())
            .attributes(["id"]);
    };
    let second = serializer
        .serialize(&object, None, Some(hide_name))
        .expect("第二次调用");
    assert_eq!(second, r#"{"id":1}"#);
    assert_eq!(serializer.shared_schema().map(|s| s.len()), Some(2));
}

#[test]
fn isolated_mode_starts_fresh_each_call() {
    let serializer = bare_serializer(AdhocMode::Isolated);
    let object = json!({"id": 7, "name": "x"});

    let only_id = |s: &mut Schema<Value>| {
        s.attributes(["id"]);
    };
    serializer
        .serialize(&object, None, Some(only_id))
        .expect("第一次调用");
    let second = serializer
        .serialize(&object, None, Some(expose_name))
        .expect("第二次调用");
    assert_eq!(second, r#"{"name":"x"}"#);
    assert!(serializer.shared_schema().is_none());
}

#[cfg(feature = "active-support")]
#[test]
fn override_selects_encoder_for_one_call_only() {
    let config = Arc::new(EncoderConfig::with_probe(Arc::new(StaticCapabilities::all())));
    let serializer = Serializer::new(Arc::clone(&config)).with_mode(AdhocMode::Isolated);
    let object = json!({"name": "<b>"});

    let escaped = serializer
        .serialize(&object, Some(BackendId::ActiveSupport), Some(expose_name))
        .expect("框架后端");
    assert_eq!(escaped, r#"{"name":"\u003cb\u003e"}"#);

    let plain = serializer
        .serialize(&object, None, Some(expose_name))
        .expect("默认后端");
    assert_eq!(plain, r#"{"name":"<b>"}"#);
    assert_eq!(config.backend(), None);
}

#[cfg(feature = "active-support")]
#[test]
fn default_serializer_is_used_without_override() {
    let config = Arc::new(EncoderConfig::with_probe(Arc::new(StaticCapabilities::all())));
    config.set_default_serializer(Some(BackendId::ActiveSupport));
    let serializer = Serializer::new(Arc::clone(&config)).with_mode(AdhocMode::Isolated);

    let out = serializer
        .serialize(&json!({"name": "a&b"}), None, Some(expose_name))
        .expect("默认序列化后端");
    assert_eq!(out, r#"{"name":"a\u0026b"}"#);

    let overridden = serializer
        .serialize(
            &json!({"name": "a&b"}),
            Some(BackendId::Json),
            Some(expose_name),
        )
        .expect("单次覆盖优先");
    assert_eq!(overridden, r#"{"name":"a&b"}"#);
}

#[test]
fn typed_objects_and_collections() {
    #[derive(Serialize)]
    struct Book {
        title: String,
        pages: u32,
    }

    let serializer = bare_serializer(AdhocMode::Isolated);
    let books = vec![
        Book {
            title: "A".into(),
            pages: 10,
        },
        Book {
            title: "B".into(),
            pages: 20,
        },
    ];
    let declare = |s: &mut Schema<Value>| {
        s.attributes(["title"])
            .attribute("long", |book: &Value| book["pages"].as_u64() > Some(15));
    };
    let out = serializer
        .serialize(&books, None, Some(declare))
        .expect("集合序列化");
    assert_eq!(
        out,
        r#"[{"title":"A","long":false},{"title":"B","long":true}]"#
    );
}

#[test]
fn concurrent_calls_share_one_holder() {
    let serializer = Arc::new(bare_serializer(AdhocMode::Accumulate));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let serializer = Arc::clone(&serializer);
            thread::spawn(move || {
                let key = format!("k{i}");
                let declare = move |s: &mut Schema<Value>| {
                    s.attribute(key, move |_: &Value| i);
                };
                serializer
                    .serialize(&json!({"n": i}), None, Some(declare))
                    .expect("并发序列化")
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("线程正常结束");
    }
    assert_eq!(serializer.shared_schema().map(|s| s.len()), Some(8));
}

#[test]
fn global_entry_point_uses_process_configuration() {
    let out = spark_resource::serialize(
        &json!({"name": "x", "hidden": true}),
        Some(BackendId::Default),
        Some(expose_name),
    )
    .expect("进程级入口");
    assert_eq!(out, r#"{"name":"x"}"#);
    assert!(Arc::ptr_eq(
        spark_resource::global().config(),
        &spark_encoder::global()
    ));
}
