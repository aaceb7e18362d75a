use darling::ast::Data;
use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;
use syn::Ident;
use syn::parse_macro_input;

use darling::FromDeriveInput;
use darling::FromVariant;

/// Discord accepts at most this many choices for one option.
const MAX_CHOICES: usize = 25;

#[derive(FromDeriveInput)]
#[darling(attributes(choice), supports(enum_unit))]
struct ChoicesEnumReceiver {
    ident: Ident,
    data: Data<ChoiceVariant, ()>,
}

#[derive(FromVariant)]
#[darling(attributes(choice))]
struct ChoiceVariant {
    ident: Ident,
    #[darling(default)]
    name: Option<String>,
    #[darling(default)]
    value: Option<String>,
}

pub fn derive(tokens: TokenStream) -> TokenStream {
    let input = parse_macro_input!(tokens as DeriveInput);

    let receiver = match ChoicesEnumReceiver::from_derive_input(&input) {
        Ok(val) => val,
        Err(err) => return TokenStream::from(err.write_errors()),
    };

    let enum_name = &receiver.ident;
    let Some(variants) = receiver.data.as_ref().take_enum() else {
        return TokenStream::from(darling::Error::custom("should be an enum").write_errors());
    };

    let variants = variants
        .iter()
        .map(|variant| {
            (
                variant.ident.clone(),
                variant
                    .name
                    .clone()
                    .unwrap_or_else(|| variant.ident.to_string()),
                variant
                    .value
                    .clone()
                    .unwrap_or_else(|| variant.ident.to_string().to_lowercase()),
            )
        })
        .collect::<Vec<_>>();

    if variants.is_empty() {
        return TokenStream::from(
            darling::Error::custom("Choices enums need at least one variant").write_errors(),
        );
    }

    if variants.len() > MAX_CHOICES {
        return TokenStream::from(
            darling::Error::custom(format!(
                "Enums with more than {MAX_CHOICES} variants are not supported"
            ))
            .write_errors(),
        );
    }

    // Assert that all variants have unique values
    let mut seen_values = std::collections::HashSet::new();
    for (_ident, _name, value) in &variants {
        if !seen_values.insert(value) {
            return TokenStream::from(
                darling::Error::custom(format!("Duplicate choice value found: {}", value))
                    .write_errors(),
            );
        }
    }

    let choices = variants.iter().map(|(_ident, name, value)| {
        quote! { .choice(#name, #value) }
    });

    let argument_converter_matches = variants.iter().map(|(ident, _name, value)| {
        quote! {
            #value => Ok(#enum_name::#ident)
        }
    });

    let value_matches = variants.iter().map(|(ident, _name, value)| {
        quote! {
            #enum_name::#ident => #value
        }
    });

    quote! {
        #[automatically_derived]
        impl #enum_name {
            /// The value Discord sends when this choice is picked
            pub fn value(&self) -> &'static str {
                match self {
                    #(#value_matches),*
                }
            }
        }

        #[automatically_derived]
        impl ::twilight_slash::arguments::ToOption for #enum_name {
            fn to_option() -> ::twilight_slash::arguments::OptionSchema {
                ::twilight_slash::arguments::OptionSchema::string()
                    .required(true)
                    #(#choices)*
            }
        }

        #[automatically_derived]
        impl ::twilight_slash::arguments::ArgumentConverter for #enum_name {
            fn convert(
                data: &::twilight_slash::__private::twilight_model::application::interaction::application_command::CommandOptionValue,
            ) -> ::twilight_slash::__private::anyhow::Result<Self> {
                use ::twilight_slash::__private::twilight_model::application::interaction::application_command::CommandOptionValue;
                if let CommandOptionValue::String(value) = data {
                    match value.as_str() {
                        #(#argument_converter_matches,)*
                        _ => Err(::twilight_slash::__private::anyhow::anyhow!(
                            ::twilight_slash::arguments::Error::InvalidType
                        )),
                    }
                } else {
                    Err(::twilight_slash::__private::anyhow::anyhow!(
                        ::twilight_slash::arguments::Error::InvalidType
                    ))
                }
            }
        }
    }
    .into()
}
