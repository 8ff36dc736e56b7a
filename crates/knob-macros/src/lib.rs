// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Procedural macros that turn annotated Rust types into Knob settings schemas.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, LitBool, LitStr, Token,
};

/// Derives `knob_core::settings::Settings` for a struct with named fields.
///
/// Every field becomes a setting, or a nested group when its type also
/// derives `Settings`. Fields accept `#[setting(...)]` with the keys `help`,
/// `display_name`, `min`, `max`, `step`, `shader_constant`, `view_space`,
/// `hdr`, `convert` and `hidden`. A field's doc comment is used as help text
/// when `help` is absent. The struct accepts `#[settings(expand = ..,
/// display_name = ..)]`.
#[proc_macro_derive(Settings, attributes(settings, setting))]
pub fn derive_settings(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_settings(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `knob_core::settings::SettingEnum` for a fieldless enum.
///
/// Labels default to the variant identifiers and can be overridden with
/// `#[setting(label = "...")]`.
#[proc_macro_derive(SettingEnum, attributes(setting))]
pub fn derive_setting_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_setting_enum(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct GroupAttrs {
    expand: Option<LitBool>,
    display_name: Option<LitStr>,
}

fn parse_group_attrs(attrs: &[Attribute]) -> syn::Result<GroupAttrs> {
    let mut out = GroupAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("settings")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("expand") {
                out.expand = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("display_name") {
                out.display_name = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported settings attribute, expected `expand` or `display_name`"))
            }
        })?;
    }
    Ok(out)
}

/// Parses one `#[setting(...)]` list into a chain of `SettingAttributes` builder calls.
fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<TokenStream2> {
    let mut calls = Vec::<TokenStream2>::new();
    let mut has_help = false;

    for attr in attrs.iter().filter(|a| a.path().is_ident("setting")) {
        attr.parse_nested_meta(|meta| {
            let path = &meta.path;
            if path.is_ident("help") {
                let s: LitStr = meta.value()?.parse()?;
                has_help = true;
                calls.push(quote! { .help(#s) });
            } else if path.is_ident("display_name") {
                let s: LitStr = meta.value()?.parse()?;
                calls.push(quote! { .display_name(#s) });
            } else if path.is_ident("min") {
                let e: Expr = meta.value()?.parse()?;
                calls.push(quote! { .min((#e) as f64) });
            } else if path.is_ident("max") {
                let e: Expr = meta.value()?.parse()?;
                calls.push(quote! { .max((#e) as f64) });
            } else if path.is_ident("step") {
                let e: Expr = meta.value()?.parse()?;
                calls.push(quote! { .step((#e) as f64) });
            } else if path.is_ident("shader_constant") {
                let b = parse_flag(&meta)?;
                calls.push(quote! { .shader_constant(#b) });
            } else if path.is_ident("view_space") {
                let b = parse_flag(&meta)?;
                calls.push(quote! { .view_space(#b) });
            } else if path.is_ident("hdr") {
                let b = parse_flag(&meta)?;
                calls.push(quote! { .hdr(#b) });
            } else if path.is_ident("hidden") {
                if parse_flag(&meta)?.value {
                    calls.push(quote! { .hidden() });
                }
            } else if path.is_ident("convert") {
                let s: LitStr = meta.value()?.parse()?;
                let variant = match s.value().as_str() {
                    "none" => quote! { None },
                    "degrees_to_radians" => quote! { DegreesToRadians },
                    "radians_to_degrees" => quote! { RadiansToDegrees },
                    "square" => quote! { Square },
                    _ => {
                        return Err(syn::Error::new(
                            s.span(),
                            "expected one of `none`, `degrees_to_radians`, `radians_to_degrees`, `square`",
                        ))
                    }
                };
                calls.push(quote! {
                    .conversion(::knob_core::settings::ConversionMode::#variant)
                });
            } else {
                return Err(meta.error("unsupported setting attribute"));
            }
            Ok(())
        })?;
    }

    if !has_help {
        if let Some(doc) = doc_text(attrs) {
            calls.insert(0, quote! { .help(#doc) });
        }
    }

    Ok(quote! {
        ::knob_core::settings::SettingAttributes::new() #(#calls)*
    })
}

/// `key` alone means `true`; `key = bool` is explicit.
fn parse_flag(meta: &syn::meta::ParseNestedMeta) -> syn::Result<LitBool> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse()
    } else {
        Ok(LitBool::new(true, meta.path.span()))
    }
}

fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| match &a.meta {
            syn::Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) => Some(s.value().trim().to_owned()),
                _ => None,
            },
            _ => None,
        })
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

fn expand_settings(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Settings can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Settings can only be derived for structs",
            ))
        }
    };

    let group = parse_group_attrs(&input.attrs)?;
    let expand = group
        .expand
        .map(|b| b.value)
        .unwrap_or(true);
    let struct_label = group.display_name.map(|s| quote! { group = group.display_name(#s); });

    let mut declares = Vec::new();
    let mut extracts = Vec::new();
    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let ty = &field.ty;
        let field_name = ident.to_string();
        let attrs = parse_field_attrs(&field.attrs)?;

        declares.push(quote! {
            group = group.item(<#ty as ::knob_core::settings::SettingField>::declare(
                #field_name,
                &default.#ident,
                #attrs,
            ));
        });
        extracts.push(quote! {
            #ident: <#ty as ::knob_core::settings::SettingField>::extract(
                &::knob_core::settings::reflect::field_path(path, #field_name),
                source,
            )?,
        });
    }

    Ok(quote! {
        impl #impl_generics ::knob_core::settings::Settings for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_str;

            fn declare_group(
                name: &str,
                default: &Self,
                attrs: ::knob_core::settings::SettingAttributes,
            ) -> ::knob_core::settings::GroupDecl {
                let mut group = ::knob_core::settings::GroupDecl::new(name).expanded(#expand);
                #struct_label
                if let ::core::option::Option::Some(label) = attrs.display_name {
                    group = group.display_name(label);
                }
                #(#declares)*
                group
            }

            fn extract_group(
                path: &str,
                source: &dyn ::knob_core::settings::ValueSource,
            ) -> ::core::option::Option<Self> {
                ::core::option::Option::Some(Self {
                    #(#extracts)*
                })
            }
        }

        impl #impl_generics ::knob_core::settings::SettingField for #name #ty_generics #where_clause {
            fn declare(
                name: &str,
                default: &Self,
                attrs: ::knob_core::settings::SettingAttributes,
            ) -> ::knob_core::settings::ItemDecl {
                ::knob_core::settings::ItemDecl::Group(
                    <Self as ::knob_core::settings::Settings>::declare_group(name, default, attrs),
                )
            }

            fn extract(
                path: &str,
                source: &dyn ::knob_core::settings::ValueSource,
            ) -> ::core::option::Option<Self> {
                <Self as ::knob_core::settings::Settings>::extract_group(path, source)
            }
        }
    })
}

fn expand_setting_enum(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "SettingEnum can only be derived for enums",
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "SettingEnum requires at least one variant",
        ));
    }

    let mut idents = Vec::new();
    let mut labels = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "SettingEnum variants cannot carry data",
            ));
        }
        let mut label = variant.ident.to_string();
        for attr in variant.attrs.iter().filter(|a| a.path().is_ident("setting")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("label") {
                    let s: LitStr = meta.value()?.parse()?;
                    label = s.value();
                    Ok(())
                } else {
                    Err(meta.error("unsupported variant attribute, expected `label`"))
                }
            })?;
        }
        idents.push(&variant.ident);
        labels.push(label);
    }
    let ordinals: Vec<u32> = (0..idents.len() as u32).collect();

    Ok(quote! {
        impl #impl_generics ::knob_core::settings::SettingEnum for #name #ty_generics #where_clause {
            const LABELS: &'static [&'static str] = &[#(#labels),*];

            fn ordinal(&self) -> u32 {
                match self {
                    #(Self::#idents => #ordinals,)*
                }
            }

            fn from_ordinal(ordinal: u32) -> ::core::option::Option<Self> {
                match ordinal {
                    #(#ordinals => ::core::option::Option::Some(Self::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #impl_generics ::knob_core::settings::SettingField for #name #ty_generics #where_clause {
            fn declare(
                name: &str,
                default: &Self,
                attrs: ::knob_core::settings::SettingAttributes,
            ) -> ::knob_core::settings::ItemDecl {
                ::knob_core::settings::ItemDecl::Setting(::knob_core::settings::SettingDecl::enumeration(
                    name,
                    <Self as ::knob_core::settings::SettingEnum>::ordinal(default),
                    <Self as ::knob_core::settings::SettingEnum>::LABELS.iter().copied(),
                    attrs,
                ))
            }

            fn extract(
                path: &str,
                source: &dyn ::knob_core::settings::ValueSource,
            ) -> ::core::option::Option<Self> {
                let ordinal = source.value(path)?.as_enum()?;
                <Self as ::knob_core::settings::SettingEnum>::from_ordinal(ordinal)
            }
        }
    })
}
