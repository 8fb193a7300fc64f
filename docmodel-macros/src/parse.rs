//! Parsing logic for the Model derive macro.

use syn::{Data, DeriveInput, Expr, Field, Fields, Ident, LitStr, Type, spanned::Spanned};

/// Type name that marks the base field of a model.
const BASE_TYPE: &str = "ModelBase";

/// Type name of property slots.
const PROPERTY_TYPE: &str = "Property";

/// A model struct, split into its base field and its properties.
#[derive(Debug)]
pub struct ModelInput<'a> {
    pub base: &'a Ident,
    pub properties: Vec<PropertyInput<'a>>,
}

/// One `Property<T>` field and its `#[property(...)]` options.
#[derive(Debug)]
pub struct PropertyInput<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub key: Option<LitStr>,
    pub default: Option<Expr>,
    pub validator: Option<Expr>,
}

impl PropertyInput<'_> {
    /// Dictionary key of this property.
    pub fn key(&self) -> String {
        self.key
            .as_ref()
            .map(LitStr::value)
            .unwrap_or_else(|| self.ident.to_string())
    }
}

impl<'a> ModelInput<'a> {
    pub fn from_derive_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Struct(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Model)] only supports structs",
            ));
        };
        let Fields::Named(fields) = &data.fields else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "#[derive(Model)] requires named fields",
            ));
        };

        let mut base = None;
        let mut properties = Vec::new();

        for field in &fields.named {
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };

            match type_name(&field.ty).as_deref() {
                Some(BASE_TYPE) => {
                    if base.replace(ident).is_some() {
                        return Err(syn::Error::new_spanned(
                            ident,
                            "a model has exactly one `ModelBase` field",
                        ));
                    }
                    if let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("property")) {
                        return Err(syn::Error::new_spanned(
                            attr,
                            "#[property] does not apply to the `ModelBase` field",
                        ));
                    }
                }
                Some(PROPERTY_TYPE) => properties.push(PropertyInput::from_field(field, ident)?),
                _ => {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "model fields must be `Property<T>` or the `ModelBase`",
                    ));
                }
            }
        }

        let Some(base) = base else {
            return Err(syn::Error::new(
                fields.span(),
                "#[derive(Model)] requires a field of type `ModelBase`",
            ));
        };

        Ok(Self { base, properties })
    }
}

impl<'a> PropertyInput<'a> {
    fn from_field(field: &'a Field, ident: &'a Ident) -> syn::Result<Self> {
        let mut property = Self {
            ident,
            ty: &field.ty,
            key: None,
            default: None,
            validator: None,
        };

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("property")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    let key: LitStr = meta.value()?.parse()?;
                    if key.value().is_empty() {
                        return Err(meta.error("property key must not be empty"));
                    }
                    property.key = Some(key);
                } else if meta.path.is_ident("default") {
                    property.default = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("validator") {
                    property.validator = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("expected `key`, `default` or `validator`"));
                }
                Ok(())
            })?;
        }

        Ok(property)
    }
}

/// Last path segment of a type, e.g. `Property` for `docmodel::property::Property<String>`.
fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_basic_model() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                base: ModelBase,
                name: Property<Option<String>>,
                age: docmodel::property::Property<i64>,
            }
        };

        let parsed = ModelInput::from_derive_input(&input).unwrap();
        assert_eq!(parsed.base.to_string(), "base");
        assert_eq!(parsed.properties.len(), 2);
        assert_eq!(parsed.properties[0].key(), "name");
        assert_eq!(parsed.properties[1].key(), "age");
    }

    #[test]
    fn test_parse_property_options() {
        let input: DeriveInput = parse_quote! {
            struct Account {
                #[property(key = "display_name", default = "anonymous")]
                name: Property<String>,
                #[property(validator = |v: &i64| *v >= 0, default = 0)]
                balance: Property<i64>,
                base: ModelBase,
            }
        };

        let parsed = ModelInput::from_derive_input(&input).unwrap();
        assert_eq!(parsed.properties[0].key(), "display_name");
        assert!(parsed.properties[0].default.is_some());
        assert!(parsed.properties[0].validator.is_none());
        assert_eq!(parsed.properties[1].key(), "balance");
        assert!(parsed.properties[1].default.is_some());
        assert!(parsed.properties[1].validator.is_some());
    }

    #[test]
    fn test_missing_base_is_an_error() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                name: Property<String>,
            }
        };

        let err = ModelInput::from_derive_input(&input).unwrap_err();
        assert!(err.to_string().contains("ModelBase"));
    }

    #[test]
    fn test_two_bases_is_an_error() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                base: ModelBase,
                other: ModelBase,
            }
        };

        assert!(ModelInput::from_derive_input(&input).is_err());
    }

    #[test]
    fn test_plain_fields_are_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                base: ModelBase,
                name: String,
            }
        };

        let err = ModelInput::from_derive_input(&input).unwrap_err();
        assert!(err.to_string().contains("Property<T>"));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                base: ModelBase,
                #[property(rename = "n")]
                name: Property<String>,
            }
        };

        assert!(ModelInput::from_derive_input(&input).is_err());
    }

    #[test]
    fn test_enums_are_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Person { A, B }
        };

        assert!(ModelInput::from_derive_input(&input).is_err());
    }
}
