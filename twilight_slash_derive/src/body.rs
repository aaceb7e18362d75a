use darling::util::PathList;
use darling::{FromDeriveInput, FromField, ast::Data};
use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::parse_macro_input;
use syn::{GenericArgument, PathArguments, Type};
use thiserror::Error;

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named, struct_unit))]
struct BodyReceiver {
    ident: syn::Ident,
    data: Data<(), OptionReceiver>,
}

#[derive(Debug, FromField)]
#[darling(attributes(option))]
struct OptionReceiver {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    /// Override the field name the option is decoded from
    #[darling(default)]
    name: Option<String>,
    /// Set the description of the command option
    #[darling(default)]
    description: Option<String>,
    /// Function run on the raw value before it is accepted
    #[darling(default)]
    validate: Option<syn::Path>,
    /// For channel options, restrict to specific channel types
    #[darling(default)]
    channel_types: Option<PathList>,
}

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    let receiver = match BodyReceiver::from_derive_input(&input) {
        Ok(r) => r,
        Err(e) => return e.write_errors().into(),
    };

    let fields = match receiver.data.take_struct() {
        Some(fields) => fields.fields,
        None => {
            return darling::Error::custom("only structs are supported")
                .write_errors()
                .into();
        }
    };

    let field_names: Result<Vec<(String, Ident)>, FieldNameError> =
        fields.iter().map(field_name).collect();
    let field_names = match field_names {
        Ok(names) => names,
        Err(e) => return darling::Error::custom(e.to_string()).write_errors().into(),
    };

    let options = fields
        .iter()
        .zip(&field_names)
        .map(|(field, (name, _))| {
            let schema = field_schema(field);
            quote! { .option(#name, #schema) }
        })
        .collect::<Vec<_>>();

    let struct_fields = field_names.iter().map(|(name, field_ident)| {
        quote! {
            #field_ident: body.parse(#name)?
        }
    });

    let ident = receiver.ident;

    quote! {
        #[automatically_derived]
        impl ::twilight_slash::commands::FromBody for #ident {
            #[allow(unused_variables)]
            fn from_body(
                body: &::twilight_slash::decode::Body,
            ) -> ::twilight_slash::__private::anyhow::Result<Self> {
                Ok(Self {
                    #(#struct_fields,)*
                })
            }
        }

        #[automatically_derived]
        impl ::twilight_slash::commands::CommandBody for #ident {
            fn options() -> ::twilight_slash::arguments::CommandOptions {
                ::twilight_slash::arguments::CommandOptions::new()
                    #(#options)*
            }
        }
    }
    .into()
}

fn field_schema(field: &OptionReceiver) -> proc_macro2::TokenStream {
    let ty = &field.ty;

    if field.channel_types.is_some() && !is_channel_id(ty) {
        return darling::Error::custom(
            "channel_types can only be specified for fields of type Id<ChannelMarker>",
        )
        .with_span(ty)
        .write_errors();
    }

    let mut schema = quote! {
        <#ty as ::twilight_slash::arguments::ToOption>::to_option()
    };

    if let Some(description) = &field.description {
        schema = quote! { #schema.description(#description) };
    }

    if let Some(validate) = &field.validate {
        schema = quote! { #schema.validator(#validate) };
    }

    if let Some(types) = &field.channel_types {
        let types = types.iter().map(
            |path| quote! { ::twilight_slash::__private::twilight_model::channel::ChannelType::#path },
        );
        schema = quote! { #schema.channel_types(vec![#(#types),*]) };
    }

    schema
}

#[derive(Error, Debug)]
enum FieldNameError {
    #[error("Field is missing an identifier")]
    MissingIdent,
}

/// Gets the body key and the struct field of an `OptionReceiver`
fn field_name(field: &OptionReceiver) -> Result<(String, Ident), FieldNameError> {
    let ident = field.ident.as_ref().ok_or(FieldNameError::MissingIdent)?.clone();
    let name = match &field.name {
        Some(name) => name.clone(),
        None => ident.to_string(),
    };
    Ok((name, ident))
}

/// Whether the type is `Id<ChannelMarker>`, optionally wrapped in `Option`.
fn is_channel_id(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    let Some(segment) = type_path.path.segments.last() else {
        return false;
    };
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return false;
    };
    let Some(GenericArgument::Type(inner)) = args.args.first() else {
        return false;
    };

    if segment.ident == "Option" {
        return is_channel_id(inner);
    }
    if segment.ident != "Id" {
        return false;
    }
    matches!(
        inner,
        Type::Path(inner_path)
            if inner_path
                .path
                .segments
                .last()
                .is_some_and(|inner_segment| inner_segment.ident == "ChannelMarker")
    )
}
