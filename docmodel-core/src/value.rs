//! The value binding protocol: how a Rust type is read out of and written into a container.
//!
//! Every type a [`Property`](crate::property::Property) can hold implements [`PropertyValue`].
//! The implementations fall into exactly four kinds (see [`ValueKind`]):
//!
//! - **Scalars** (`i32`, `i64`, `f64`, `bool`, `String`, `DateTime<Utc>`, [`Blob`]) call the
//!   matching typed getter on the container, so the container's coercion rules apply unchanged.
//! - **`Option<T>`** checks that the key is set before asking `T`, and clears the key when written
//!   as `None`.
//! - **`Vec<T>`** reads every element of the stored array and writes a freshly built array.
//! - **Models** wrap the nested dictionary in place (generated by `#[derive(Model)]`, see
//!   [`crate::model`]).
//!
//! Reading never fails: a missing key or an incompatible primitive is simply `None`.

use chrono::{DateTime, Utc};

use crate::{
    blob::Blob,
    container::{MutableArray, MutableDictionary, Value},
};

/// The closed set of shapes a bindable type can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Optional,
    Sequence,
    Model,
}

/// A type that can be materialized from, and stored into, a container slot.
pub trait PropertyValue: Sized + Clone + Send + Sync + 'static {
    const KIND: ValueKind;

    /// Reads the value stored at `key`, or `None` when it is unset or of an incompatible kind.
    fn from_dictionary(dictionary: &MutableDictionary, key: &str) -> Option<Self>;

    /// Reads the value stored at `index`, or `None` when it is null, past the end or incompatible.
    fn from_array(array: &MutableArray, index: usize) -> Option<Self>;

    /// Converts the value into a primitive the container can store.
    ///
    /// `None` means "no value": writing it clears the key rather than leaving it untouched.
    fn to_value(&self) -> Option<Value>;

    /// The representation of "nothing stored", for types that have one.
    fn absent() -> Option<Self> {
        None
    }
}

macro_rules! scalar_property_value {
    ($ty:ty, $getter:ident) => {
        impl PropertyValue for $ty {
            const KIND: ValueKind = ValueKind::Scalar;

            fn from_dictionary(dictionary: &MutableDictionary, key: &str) -> Option<Self> {
                dictionary.$getter(key)
            }

            fn from_array(array: &MutableArray, index: usize) -> Option<Self> {
                array.$getter(index)
            }

            fn to_value(&self) -> Option<Value> {
                Some(Value::from(self.clone()))
            }
        }
    };
}

scalar_property_value!(i32, int);
scalar_property_value!(i64, int64);
scalar_property_value!(f64, double);
scalar_property_value!(bool, boolean);
scalar_property_value!(String, string);
scalar_property_value!(DateTime<Utc>, date);
scalar_property_value!(Blob, blob);

impl<T: PropertyValue> PropertyValue for Option<T> {
    const KIND: ValueKind = ValueKind::Optional;

    fn from_dictionary(dictionary: &MutableDictionary, key: &str) -> Option<Self> {
        if dictionary.contains(key) {
            return T::from_dictionary(dictionary, key).map(Some);
        }

        None
    }

    fn from_array(array: &MutableArray, index: usize) -> Option<Self> {
        match array.value(index) {
            Some(value) if !value.is_null() => T::from_array(array, index).map(Some),
            _ => None,
        }
    }

    fn to_value(&self) -> Option<Value> {
        self.as_ref().and_then(T::to_value)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl<T: PropertyValue> PropertyValue for Vec<T> {
    const KIND: ValueKind = ValueKind::Sequence;

    fn from_dictionary(dictionary: &MutableDictionary, key: &str) -> Option<Self> {
        dictionary
            .array(key)
            .map(|elements| collect_elements(&elements))
    }

    fn from_array(array: &MutableArray, index: usize) -> Option<Self> {
        array
            .array(index)
            .map(|elements| collect_elements(&elements))
    }

    fn to_value(&self) -> Option<Value> {
        let array = self
            .iter()
            .map(|element| element.to_value().unwrap_or(Value::Null))
            .collect::<MutableArray>();

        Some(Value::Array(array))
    }
}

/// Materializes every element of `elements`.
///
/// A stored array is all-or-nothing: an element that cannot be read as `T` means the document is
/// incompatible with the declared type, and that is treated as a broken invariant.
fn collect_elements<T: PropertyValue>(elements: &MutableArray) -> Vec<T> {
    (0..elements.count())
        .map(|index| {
            T::from_array(elements, index)
                .or_else(T::absent)
                .unwrap_or_else(|| {
                    panic!(
                        "array element {index} cannot be read as {}: {:?}",
                        std::any::type_name::<T>(),
                        elements.value(index),
                    )
                })
        })
        .collect()
}
