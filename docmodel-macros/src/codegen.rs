//! Code generation for the Model derive macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::parse::{ModelInput, PropertyInput};

/// Main entry point for code generation.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let parsed = ModelInput::from_derive_input(input)?;

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let base = parsed.base;
    let properties = parsed.properties.iter().map(property_initializer);

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::docmodel::model::Model for #ident #ty_generics #where_clause {
            fn from_base(__docmodel_base: ::docmodel::model::ModelBase) -> Self {
                Self {
                    #(#properties,)*
                    #base: __docmodel_base,
                }
            }

            fn base(&self) -> &::docmodel::model::ModelBase {
                &self.#base
            }
        }

        #[automatically_derived]
        impl #impl_generics ::docmodel::value::PropertyValue for #ident #ty_generics #where_clause {
            const KIND: ::docmodel::value::ValueKind = ::docmodel::value::ValueKind::Model;

            fn from_dictionary(
                dictionary: &::docmodel::container::MutableDictionary,
                key: &str,
            ) -> ::core::option::Option<Self> {
                ::docmodel::model::nested_from_dictionary(dictionary, key)
            }

            fn from_array(
                array: &::docmodel::container::MutableArray,
                index: usize,
            ) -> ::core::option::Option<Self> {
                ::docmodel::model::nested_from_array(array, index)
            }

            fn to_value(&self) -> ::core::option::Option<::docmodel::container::Value> {
                ::docmodel::model::nested_to_value(self)
            }
        }
    })
}

/// `field: <Property<T>>::new(dictionary, "key").with_default(..).with_validator(..)`
fn property_initializer(property: &PropertyInput<'_>) -> TokenStream {
    let ident = property.ident;
    let ty = property.ty;
    let key = property.key();

    let default = property
        .default
        .as_ref()
        .map(|expr| quote! { .with_default(#expr) });
    let validator = property
        .validator
        .as_ref()
        .map(|expr| quote! { .with_validator(#expr) });

    quote! {
        #ident: <#ty>::new(__docmodel_base.dictionary(), #key) #default #validator
    }
}
