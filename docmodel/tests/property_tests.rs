use chrono::{DateTime, TimeZone, Utc};
use docmodel::{bson::doc, prelude::*};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

#[derive(Clone, Model)]
struct Scalars {
    base: ModelBase,
    p_int: Property<i32>,
    p_int64: Property<i64>,
    p_double: Property<f64>,
    p_bool: Property<bool>,
    p_string: Property<String>,
    p_date: Property<DateTime<Utc>>,
    p_blob: Property<Blob>,
}

#[test]
fn test_basic_types() {
    let blob1 = Blob::new("text/plain", "I'm BoB");
    let blob2 = Blob::new("text/plain", "I'm PoP");

    let dict = MutableDictionary::new();
    dict.set_value("p_int", 10);
    dict.set_value("p_int64", 100i64);
    dict.set_value("p_double", 99.99);
    dict.set_value("p_bool", true);
    dict.set_value("p_string", "hello");
    dict.set_value("p_date", date(2020, 1, 1));
    dict.set_value("p_blob", blob1.clone());

    let model = Scalars::with_dictionary(dict.clone());
    assert_eq!(model.p_int.get(), 10);
    assert_eq!(model.p_int64.get(), 100);
    assert_eq!(model.p_double.get(), 99.99);
    assert!(model.p_bool.get());
    assert_eq!(model.p_string.get(), "hello");
    assert_eq!(model.p_date.get(), date(2020, 1, 1));
    assert_eq!(model.p_blob.get(), blob1);

    model.p_int.set(20);
    model.p_int64.set(200);
    model.p_double.set(999.99);
    model.p_bool.set(false);
    model.p_string.set("hello world!".to_string());
    model.p_date.set(date(2020, 6, 6));
    model.p_blob.set(blob2.clone());

    assert_eq!(model.p_int.get(), 20);
    assert_eq!(model.p_int64.get(), 200);
    assert_eq!(model.p_double.get(), 999.99);
    assert!(!model.p_bool.get());
    assert_eq!(model.p_string.get(), "hello world!");
    assert_eq!(model.p_date.get(), date(2020, 6, 6));
    assert_eq!(model.p_blob.get(), blob2);

    assert_eq!(dict.int("p_int"), Some(20));
    assert_eq!(dict.int64("p_int64"), Some(200));
    assert_eq!(dict.double("p_double"), Some(999.99));
    assert_eq!(dict.boolean("p_bool"), Some(false));
    assert_eq!(dict.string("p_string"), Some("hello world!".to_string()));
    assert_eq!(dict.date("p_date"), Some(date(2020, 6, 6)));
    assert_eq!(dict.blob("p_blob"), Some(blob2));
}

#[test]
#[should_panic(expected = "property `p_int` has no value and no default")]
fn test_unset_required_property_is_fatal() {
    Scalars::new().p_int.get();
}

#[derive(Clone, Model)]
struct OptionalScalars {
    base: ModelBase,
    p_int_opt: Property<Option<i32>>,
    p_int64_opt: Property<Option<i64>>,
    p_double_opt: Property<Option<f64>>,
    p_bool_opt: Property<Option<bool>>,
    p_string_opt: Property<Option<String>>,
    p_date_opt: Property<Option<DateTime<Utc>>>,
    p_blob_opt: Property<Option<Blob>>,
}

#[test]
fn test_basic_optional_types() {
    let blob = Blob::new("text/plain", "I'm BoB");

    let dict = MutableDictionary::new();
    let model = OptionalScalars::with_dictionary(dict.clone());

    assert_eq!(model.p_int_opt.get(), None);
    assert_eq!(model.p_int64_opt.get(), None);
    assert_eq!(model.p_double_opt.get(), None);
    assert_eq!(model.p_bool_opt.get(), None);
    assert_eq!(model.p_string_opt.get(), None);
    assert_eq!(model.p_date_opt.get(), None);
    assert_eq!(model.p_blob_opt.get(), None);

    model.p_int_opt.set(Some(30));
    model.p_int64_opt.set(Some(300));
    model.p_double_opt.set(Some(99.98));
    model.p_bool_opt.set(Some(true));
    model.p_string_opt.set(Some("hi!".to_string()));
    model.p_date_opt.set(Some(date(2020, 1, 1)));
    model.p_blob_opt.set(Some(blob.clone()));

    assert_eq!(model.p_int_opt.get(), Some(30));
    assert_eq!(model.p_int64_opt.get(), Some(300));
    assert_eq!(model.p_double_opt.get(), Some(99.98));
    assert_eq!(model.p_bool_opt.get(), Some(true));
    assert_eq!(model.p_string_opt.get(), Some("hi!".to_string()));
    assert_eq!(model.p_date_opt.get(), Some(date(2020, 1, 1)));
    assert_eq!(model.p_blob_opt.get(), Some(blob.clone()));

    assert_eq!(dict.int("p_int_opt"), Some(30));
    assert_eq!(dict.int64("p_int64_opt"), Some(300));
    assert_eq!(dict.double("p_double_opt"), Some(99.98));
    assert_eq!(dict.boolean("p_bool_opt"), Some(true));
    assert_eq!(dict.string("p_string_opt"), Some("hi!".to_string()));
    assert_eq!(dict.date("p_date_opt"), Some(date(2020, 1, 1)));
    assert_eq!(dict.blob("p_blob_opt"), Some(blob));
}

#[test]
fn test_setting_none_clears_the_key() {
    let dict = MutableDictionary::from_document(doc! { "p_string_opt": "hi!", "other": 1 });
    let model = OptionalScalars::with_dictionary(dict.clone());

    model.p_string_opt.set(None);

    assert_eq!(model.p_string_opt.get(), None);
    assert!(!dict.contains("p_string_opt"));
    assert_eq!(dict.to_document(), doc! { "other": 1 });
}

#[derive(Clone, Model)]
struct Arrays {
    base: ModelBase,
    p_array_int: Property<Vec<i32>>,
    p_array_int64: Property<Vec<i64>>,
    p_array_double: Property<Vec<f64>>,
    p_array_bool: Property<Vec<bool>>,
    p_array_string: Property<Vec<String>>,
}

#[test]
fn test_array() {
    let dict = MutableDictionary::from_document(doc! {
        "p_array_int": [1, 2, 3],
        "p_array_int64": [5i64, 6i64, 7i64],
        "p_array_double": [1.1, 1.2, 1.3],
        "p_array_bool": [true, false, true],
        "p_array_string": ["1", "2", "3"],
    });

    let model = Arrays::with_dictionary(dict.clone());
    assert_eq!(model.p_array_int.get(), vec![1, 2, 3]);
    assert_eq!(model.p_array_int64.get(), vec![5, 6, 7]);
    assert_eq!(model.p_array_double.get(), vec![1.1, 1.2, 1.3]);
    assert_eq!(model.p_array_bool.get(), vec![true, false, true]);
    assert_eq!(model.p_array_string.get(), vec!["1", "2", "3"]);

    model.p_array_int.set(vec![2, 4, 8]);
    model.p_array_int64.set(vec![10, 100, 1000]);
    model.p_array_double.set(vec![2.0, 2.5, 3.0]);
    model.p_array_bool.set(vec![false, true, false]);
    model.p_array_string.set(vec!["a".to_string(), "b".to_string(), "c".to_string()]);

    assert_eq!(model.p_array_int.get(), vec![2, 4, 8]);
    assert_eq!(model.p_array_string.get(), vec!["a", "b", "c"]);

    assert_eq!(
        dict.to_document(),
        doc! {
            "p_array_int": [2, 4, 8],
            "p_array_int64": [10i64, 100i64, 1000i64],
            "p_array_double": [2.0, 2.5, 3.0],
            "p_array_bool": [false, true, false],
            "p_array_string": ["a", "b", "c"],
        }
    );
}

#[test]
#[should_panic(expected = "array element 1 cannot be read")]
fn test_array_with_incompatible_element_is_fatal() {
    let dict = MutableDictionary::from_document(doc! { "p_array_int": [1, "two", 3] });
    Arrays::with_dictionary(dict).p_array_int.get();
}

#[derive(Clone, Model)]
struct OptionalArrays {
    base: ModelBase,
    p_array_int_opt: Property<Option<Vec<i32>>>,
    p_array_string_opt: Property<Option<Vec<String>>>,
    p_array_sparse: Property<Vec<Option<i64>>>,
}

#[test]
fn test_optional_array() {
    let dict = MutableDictionary::new();
    let model = OptionalArrays::with_dictionary(dict.clone());

    assert_eq!(model.p_array_int_opt.get(), None);
    assert_eq!(model.p_array_string_opt.get(), None);

    model.p_array_int_opt.set(Some(vec![1, 2, 3]));
    model.p_array_string_opt.set(Some(vec!["1".to_string(), "2".to_string()]));

    assert_eq!(model.p_array_int_opt.get(), Some(vec![1, 2, 3]));
    assert_eq!(model.p_array_string_opt.get(), Some(vec!["1".to_string(), "2".to_string()]));
    assert_eq!(
        dict.to_document(),
        doc! { "p_array_int_opt": [1, 2, 3], "p_array_string_opt": ["1", "2"] }
    );
}

#[test]
fn test_array_of_optionals_keeps_nulls() {
    let dict = MutableDictionary::from_document(doc! { "p_array_sparse": [1i64, null, 3i64] });
    let model = OptionalArrays::with_dictionary(dict.clone());

    assert_eq!(model.p_array_sparse.get(), vec![Some(1), None, Some(3)]);

    model.p_array_sparse.set(vec![None, Some(2)]);
    assert_eq!(dict.to_document(), doc! { "p_array_sparse": [null, 2i64] });
}

#[derive(Clone, Model)]
struct Holder {
    base: ModelBase,
    p_object: Property<Item>,
    p_array_object: Property<Vec<Item>>,
}

#[derive(Clone, Model)]
struct Item {
    base: ModelBase,
    p_string: Property<String>,
}

fn item(value: &str) -> Item {
    let item = Item::new();
    item.p_string.set(value.to_string());
    item
}

#[test]
fn test_object() {
    let dict = MutableDictionary::from_document(doc! {
        "p_object": { "p_string": "A" },
        "p_array_object": [{ "p_string": "1" }],
    });

    let model = Holder::with_dictionary(dict.clone());
    assert_eq!(model.p_object.get().p_string.get(), "A");
    assert_eq!(model.p_array_object.get().len(), 1);
    assert_eq!(model.p_array_object.get()[0].p_string.get(), "1");

    // Writes through nested models land in the parent.
    model.p_object.get().p_string.set("B".to_string());
    model.p_array_object.update(|items| items.push(item("2")));

    assert_eq!(model.p_object.get().p_string.get(), "B");
    assert_eq!(model.p_array_object.get().len(), 2);
    assert_eq!(model.p_array_object.get()[1].p_string.get(), "2");
    assert_eq!(
        dict.to_document(),
        doc! {
            "p_object": { "p_string": "B" },
            "p_array_object": [{ "p_string": "1" }, { "p_string": "2" }],
        }
    );

    model.p_object.set(item("C"));
    model.p_array_object.set(vec![item("X")]);

    assert_eq!(model.p_object.get().p_string.get(), "C");
    assert_eq!(model.p_array_object.get().len(), 1);
    assert_eq!(model.p_array_object.get()[0].p_string.get(), "X");
    assert_eq!(
        dict.to_document(),
        doc! {
            "p_object": { "p_string": "C" },
            "p_array_object": [{ "p_string": "X" }],
        }
    );
}

#[derive(Clone, Model)]
struct OptionalHolder {
    base: ModelBase,
    p_object: Property<Option<OptionalItem>>,
    p_array_object: Property<Option<Vec<OptionalItem>>>,
}

#[derive(Clone, Model)]
struct OptionalItem {
    base: ModelBase,
    p_string: Property<Option<String>>,
}

#[test]
fn test_optional_object() {
    let dict = MutableDictionary::new();
    let model = OptionalHolder::with_dictionary(dict.clone());

    assert!(model.p_object.get().is_none());
    assert!(model.p_array_object.get().is_none());

    let first = OptionalItem::new();
    first.p_string.set(Some("C".to_string()));
    model.p_object.set(Some(first));

    let second = OptionalItem::new();
    second.p_string.set(Some("X".to_string()));
    model.p_array_object.set(Some(vec![second]));

    assert_eq!(
        model.p_object.get().and_then(|object| object.p_string.get()),
        Some("C".to_string())
    );
    let objects = model.p_array_object.get().unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].p_string.get(), Some("X".to_string()));
    assert_eq!(
        dict.to_document(),
        doc! {
            "p_object": { "p_string": "C" },
            "p_array_object": [{ "p_string": "X" }],
        }
    );
}

#[derive(Clone, Model)]
struct Defaults {
    base: ModelBase,
    #[property(default = 10)]
    value1: Property<Option<i32>>,
    #[property(default = 20)]
    value2: Property<i32>,
    value3: Property<Option<i32>>,
}

#[test]
fn test_default_value() {
    let dict = MutableDictionary::new();
    let model = Defaults::with_dictionary(dict.clone());

    assert_eq!(model.value1.get(), Some(10));
    assert_eq!(model.value2.get(), 20);
    assert_eq!(model.value3.get(), None);

    assert!(dict.value("value1").is_none());
    assert!(dict.value("value2").is_none());
    assert!(dict.value("value3").is_none());

    model.value1.set(Some(100));
    model.value2.set(200);
    model.value3.set(Some(300));

    assert_eq!(model.value1.get(), Some(100));
    assert_eq!(model.value2.get(), 200);
    assert_eq!(model.value3.get(), Some(300));

    assert_eq!(dict.int("value1"), Some(100));
    assert_eq!(dict.int("value2"), Some(200));
    assert_eq!(dict.int("value3"), Some(300));
}

#[test]
fn test_default_covers_type_mismatch() {
    let dict = MutableDictionary::from_document(doc! { "value2": "twenty" });
    let model = Defaults::with_dictionary(dict.clone());

    assert_eq!(model.value2.get(), 20);
    assert_eq!(dict.string("value2"), Some("twenty".to_string()));
}

#[derive(Clone, Model)]
struct Validated {
    base: ModelBase,
    #[property(validator = |value: &Option<i32>| value.unwrap_or(0) > 10)]
    value: Property<Option<i32>>,
    #[property(key = "threshold", default = 10, validator = |value: &Option<i32>| value.unwrap_or(0) > 10)]
    guarded: Property<Option<i32>>,
}

#[test]
fn test_validator() {
    let dict = MutableDictionary::new();
    let model = Validated::with_dictionary(dict.clone());

    model.value.set(Some(5));
    assert_eq!(model.value.get(), None);
    assert!(dict.is_empty());

    model.value.set(Some(11));
    assert_eq!(model.value.get(), Some(11));
}

#[test]
fn test_validator_with_default() {
    let dict = MutableDictionary::new();
    let model = Validated::with_dictionary(dict.clone());

    assert_eq!(model.guarded.get(), Some(10));

    model.guarded.set(Some(5));
    assert_eq!(model.guarded.get(), Some(10));
    assert!(!dict.contains("threshold"));

    model.guarded.set(Some(11));
    assert_eq!(model.guarded.get(), Some(11));
    assert_eq!(dict.to_document(), doc! { "threshold": 11 });
}

#[test]
fn test_custom_keys_are_used_for_storage() {
    let model = Validated::new();
    assert_eq!(model.guarded.key(), "threshold");
    assert_eq!(model.value.key(), "value");
}
