use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use std::thread;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::Reflect;
use crate::codec::CodecFactory;
use crate::derive::{Bind, bind_interface, bind_methods};
use crate::error::{ConfigError, DecodeError};
use crate::info::Typed;
use crate::value::Untyped;

// -----------------------------------------------------------------------------
// Types

#[derive(Bind, Default, Debug, PartialEq)]
#[bind(skeleton)]
struct Point {
    pub x: i32,
    #[bind(rename = "vertical")]
    pub y: i32,
    tag: u8,
}

#[derive(Bind, Serialize, Deserialize, Default)]
#[serde(default)]
struct Account {
    pub user: String,
    #[bind(ignore)]
    pub password: String,
    note: String,
}

#[derive(Bind, Default)]
#[bind(skeleton)]
struct Base {
    pub id: u32,
    pub secret: String,
}

#[derive(Bind, Default)]
#[bind(skeleton)]
struct Derived {
    #[bind(extends)]
    base: Base,
    #[bind(ignore)]
    pub secret: String,
    pub active: bool,
}

#[bind_interface]
trait Named {
    fn get_name(&self) -> String;
}

#[derive(Bind, Default)]
#[bind(skeleton, implements(Named))]
struct Person {
    first: String,
}

impl Named for Person {
    fn get_name(&self) -> String {
        self.first.clone()
    }
}

#[derive(Bind, Default)]
#[bind(skeleton, methods)]
struct Temperature {
    celsius: f64,
}

#[bind_methods]
impl Temperature {
    pub fn get_fahrenheit(&self) -> f64 {
        self.celsius * 9.0 / 5.0 + 32.0
    }

    pub fn set_fahrenheit(&mut self, value: f64) {
        self.celsius = (value - 32.0) * 5.0 / 9.0;
    }
}

#[derive(Bind, Default)]
#[bind(skeleton, methods)]
struct Labels {
    entries: BTreeMap<String, String>,
}

#[bind_methods]
impl Labels {
    #[bind(any_getter)]
    fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

#[derive(Bind, Default)]
#[bind(skeleton, methods)]
struct Sink {
    #[bind(skip)]
    seen: Vec<(String, i32)>,
}

#[bind_methods]
impl Sink {
    #[bind(any_setter)]
    fn put(&mut self, key: String, value: i32) {
        self.seen.push((key, value));
    }
}

#[derive(Bind, Default, Debug)]
#[bind(skeleton, methods)]
struct NumericKeys;

#[bind_methods]
impl NumericKeys {
    #[bind(any_setter)]
    fn put(&mut self, _key: i32, _value: String) {}
}

#[derive(Bind, Default)]
#[bind(skeleton, methods)]
struct Overlapping {
    pub k1: String,
    entries: BTreeMap<String, String>,
}

#[bind_methods]
impl Overlapping {
    #[bind(any_getter)]
    fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

#[derive(Bind, Default)]
#[bind(skeleton, methods)]
struct Tagged {
    pub id: u32,
    #[bind(ignore)]
    pub secret: String,
    #[bind(skip)]
    seen: Vec<(String, i32)>,
}

#[bind_methods]
impl Tagged {
    #[bind(any_setter)]
    fn put(&mut self, key: String, value: i32) {
        self.seen.push((key, value));
    }
}

#[derive(Bind, Default)]
#[bind(skeleton, methods)]
struct BaseExtras {
    entries: BTreeMap<String, String>,
    #[bind(skip)]
    seen: Vec<(String, i32)>,
}

#[bind_methods]
impl BaseExtras {
    #[bind(any_getter)]
    fn base_entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    #[bind(any_setter)]
    fn base_put(&mut self, key: String, value: i32) {
        self.seen.push((key, value));
    }
}

#[derive(Bind, Default)]
#[bind(skeleton, methods)]
struct OwnExtras {
    #[bind(extends)]
    base: BaseExtras,
    entries: BTreeMap<String, String>,
    #[bind(skip)]
    seen: Vec<(String, i32)>,
}

#[bind_methods]
impl OwnExtras {
    #[bind(any_getter)]
    fn own_entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    #[bind(any_setter)]
    fn own_put(&mut self, key: String, value: i32) {
        self.seen.push((key, value));
    }
}

#[derive(Bind, Default)]
#[bind(skeleton)]
struct Pet {
    pub name: String,
}

#[derive(Bind, Default)]
#[bind(skeleton)]
struct Dog {
    #[bind(extends)]
    pet: Pet,
    pub breed: String,
}

#[derive(Bind, Default)]
#[bind(skeleton)]
struct Owner {
    #[bind(declared = Pet)]
    pub pet: Option<Box<dyn Reflect>>,
}

#[derive(Bind, Default)]
#[bind(skeleton)]
struct Sample {
    pub data: Untyped,
}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn round_trip_with_rename() {
    let factory = CodecFactory::new();
    let point = Point { x: 1, y: 2, tag: 9 };

    let tree = factory.to_value(&point).unwrap();
    assert_eq!(tree, json!({"x": 1, "vertical": 2}));

    let back: Point = factory.from_value(tree).unwrap();
    assert_eq!(back, Point { x: 1, y: 2, tag: 0 });
}

#[test]
fn ignored_member_is_hidden_from_delegate() {
    let factory = CodecFactory::new();
    let account = Account {
        user: "ada".to_string(),
        password: "hunter2".to_string(),
        note: "n".to_string(),
    };

    // `note` is private and unannotated, so the delegate's copy stays.
    let tree = factory.to_value(&account).unwrap();
    assert_eq!(tree, json!({"user": "ada", "note": "n"}));

    let back: Account = factory
        .from_value(json!({"user": "bob", "password": "x", "note": "m"}))
        .unwrap();
    assert_eq!(back.user, "bob");
    assert_eq!(back.password, "");
    assert_eq!(back.note, "m");
}

#[test]
fn ignore_overrides_inherited_binding() {
    let factory = CodecFactory::new();
    let derived = Derived {
        base: Base {
            id: 7,
            secret: "s".to_string(),
        },
        secret: "t".to_string(),
        active: true,
    };

    let tree = factory.to_value(&derived).unwrap();
    assert_eq!(tree, json!({"id": 7, "active": true}));

    let back: Derived = factory
        .from_value(json!({"id": 8, "secret": "leak", "active": true}))
        .unwrap();
    assert_eq!(back.base.id, 8);
    assert_eq!(back.base.secret, "");
    assert_eq!(back.secret, "");
}

#[test]
fn interface_bindings_are_inherited() {
    let factory = CodecFactory::new();
    let person = Person {
        first: "Grace".to_string(),
    };

    let tree = factory.to_value(&person).unwrap();
    assert_eq!(tree, json!({"name": "Grace"}));

    // The interface itself declares nothing without an implementor.
    let codec = factory.codec::<dyn Named>().unwrap().unwrap();
    assert!(codec.model().is_empty());
}

#[test]
fn method_properties() {
    let factory = CodecFactory::new();

    let tree = factory.to_value(&Temperature { celsius: 100.0 }).unwrap();
    assert_eq!(tree, json!({"fahrenheit": 212.0}));

    let back: Temperature = factory.from_value(json!({"fahrenheit": 32.0})).unwrap();
    assert_eq!(back.celsius, 0.0);
}

#[test]
fn any_getter_writes_flat_entries() {
    let factory = CodecFactory::new();
    let labels = Labels {
        entries: BTreeMap::from([
            ("k1".to_string(), "v1".to_string()),
            ("k2".to_string(), "v2".to_string()),
        ]),
    };

    let tree = factory.to_value(&labels).unwrap();
    assert_eq!(tree, json!({"k1": "v1", "k2": "v2"}));
}

#[test]
fn any_setter_receives_every_unknown_key() {
    let factory = CodecFactory::new();

    let sink: Sink = factory.from_value(json!({"a": 1, "b": 2})).unwrap();
    assert_eq!(
        sink.seen,
        vec![("a".to_string(), 1), ("b".to_string(), 2)]
    );
}

#[test]
fn named_property_wins_over_any_getter_entry() {
    let factory = CodecFactory::new();
    let value = Overlapping {
        k1: "named".to_string(),
        entries: BTreeMap::from([
            ("k1".to_string(), "extra".to_string()),
            ("k2".to_string(), "v2".to_string()),
        ]),
    };

    let tree = factory.to_value(&value).unwrap();
    assert_eq!(tree, json!({"k1": "named", "k2": "v2"}));
}

#[test]
fn any_setter_skips_bound_and_ignored_keys() {
    let factory = CodecFactory::new();

    let tagged: Tagged = factory
        .from_value(json!({"id": 3, "secret": 9, "x": 1}))
        .unwrap();
    assert_eq!(tagged.id, 3);
    assert_eq!(tagged.secret, "");
    assert_eq!(tagged.seen, vec![("x".to_string(), 1)]);
}

#[test]
fn subclass_any_accessors_replace_inherited() {
    let factory = CodecFactory::new();

    let model = factory.model(OwnExtras::type_info()).unwrap();
    assert!(model.any_getter().unwrap().qualified_name().ends_with("OwnExtras.own_entries"));
    assert!(model.any_setter().unwrap().qualified_name().ends_with("OwnExtras.own_put"));

    let value = OwnExtras {
        base: BaseExtras {
            entries: BTreeMap::from([("inherited".to_string(), "b".to_string())]),
            seen: Vec::new(),
        },
        entries: BTreeMap::from([("own".to_string(), "o".to_string())]),
        seen: Vec::new(),
    };
    let tree = factory.to_value(&value).unwrap();
    assert_eq!(tree, json!({"own": "o"}));

    let back: OwnExtras = factory.from_value(json!({"a": 1})).unwrap();
    assert_eq!(back.seen, vec![("a".to_string(), 1)]);
    assert!(back.base.seen.is_empty());
}

#[test]
fn failed_decode_leaves_factory_usable() {
    let factory = CodecFactory::new();

    let err = factory.from_value::<Base>(json!({"id": "x"}));
    assert!(err.is_err());

    let base: Base = factory.from_value(json!({"id": 4})).unwrap();
    assert_eq!(base.id, 4);
}

#[test]
fn invalid_any_setter_is_memoized() {
    let factory = CodecFactory::new();

    let first = factory.codec::<NumericKeys>().unwrap_err();
    let ConfigError::AnySetterSignature { method, reason } = &first else {
        panic!("unexpected error: {first}");
    };
    assert!(method.ends_with("NumericKeys.put"));
    assert_eq!(*reason, "first parameter must accept a string key");

    let second = factory.codec::<NumericKeys>().unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(factory.model_count(), 1);

    let err = factory.from_value::<NumericKeys>(json!({})).unwrap_err();
    assert!(matches!(err, DecodeError::Config(_)));
}

#[test]
fn encode_uses_runtime_type_decode_uses_declared() {
    let factory = CodecFactory::new();
    let owner = Owner {
        pet: Some(Box::new(Dog {
            pet: Pet {
                name: "rex".to_string(),
            },
            breed: "lab".to_string(),
        })),
    };

    let tree = factory.to_value(&owner).unwrap();
    assert_eq!(tree, json!({"pet": {"name": "rex", "breed": "lab"}}));

    let back: Owner = factory.from_value(tree).unwrap();
    let pet = back.pet.as_deref().unwrap();
    assert!(!pet.is::<Dog>());
    assert_eq!(pet.downcast_ref::<Pet>().unwrap().name, "rex");
}

#[test]
fn null_empties_optional_declared_field() {
    let factory = CodecFactory::new();

    let tree = factory.to_value(&Owner { pet: None }).unwrap();
    assert_eq!(tree, json!({"pet": null}));

    let back: Owner = factory.from_value(tree).unwrap();
    assert!(back.pet.is_none());
}

#[test]
fn containers_of_managed_values() {
    let factory = CodecFactory::new();
    let points = vec![Point { x: 1, y: 2, tag: 0 }, Point { x: 3, y: 4, tag: 0 }];

    let tree = factory.to_value(&points).unwrap();
    assert_eq!(
        tree,
        json!([{"x": 1, "vertical": 2}, {"x": 3, "vertical": 4}])
    );

    let back: Vec<Point> = factory.from_value(tree).unwrap();
    assert_eq!(back, points);
}

#[test]
fn concurrent_first_use_shares_one_model() {
    let factory = CodecFactory::new();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let factory = factory.clone();
            thread::spawn(move || factory.model(Point::type_info()).unwrap())
        })
        .collect();
    let models: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert!(models.iter().all(|model| Arc::ptr_eq(model, &models[0])));
    assert_eq!(factory.model_count(), 1);
}

#[test]
fn untyped_values_are_normalized() {
    let factory = CodecFactory::new();

    let sample: Sample = factory
        .from_str(r#"{"data": {"n": 10.0, "m": 2.5, "big": 4294967296}}"#)
        .unwrap();
    assert_eq!(sample.data.get("n"), Some(&Untyped::Int(10)));
    assert_eq!(sample.data.get("m"), Some(&Untyped::Float(2.5)));
    assert_eq!(sample.data.get("big"), Some(&Untyped::Long(4294967296)));
}

#[test]
fn serde_bridges() {
    let factory = CodecFactory::new();
    let point = Point { x: 1, y: 2, tag: 0 };

    let text = serde_json::to_string(&factory.json(&point)).unwrap();
    assert_eq!(text, r#"{"x":1,"vertical":2}"#);

    let codec = factory.codec::<Point>().unwrap().unwrap();
    let mut deserializer = serde_json::Deserializer::from_str(r#"{"x":5,"vertical":6}"#);
    let value = codec.deserialize(&mut deserializer).unwrap();
    assert_eq!(value.take::<Point>().unwrap(), Point { x: 5, y: 6, tag: 0 });
}

#[cfg(feature = "auto_register")]
#[test]
fn auto_register_builds_marked_types() {
    #[derive(Bind, Default)]
    #[bind(skeleton, auto_register)]
    struct Registered {
        pub id: u32,
    }

    let factory = CodecFactory::new();
    assert!(factory.auto_register().unwrap() >= 1);
    assert!(factory.codec::<Registered>().unwrap().is_some());
    assert!(factory.model_count() >= 1);
}
