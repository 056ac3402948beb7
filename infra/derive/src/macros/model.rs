use super::shared::{derived_trait_names, generic_arg, last_segment};
use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::{Attribute, Field, Fields, Ident, ItemStruct, Lit, LitStr, Meta, Type, parse_quote};

const COPY_PRIMITIVES: &[&str] = &[
    "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
    "u64", "u128", "usize",
];

/// Expands the `#[sdk_model]` attribute macro.
///
/// Rewrites sequence fields to shared `Sequence` storage, strips `#[model(...)]` helper
/// attributes, injects derives and serde policy, then emits the accessor impl,
/// `StableHash`, `SdkModel` and (optionally) `Display`.
pub fn expand_sdk_model(args: TokenStream, mut input: ItemStruct) -> TokenStream {
    let args = match ModelArgs::parse(args) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error(),
    };

    let Fields::Named(named) = &mut input.fields else {
        return syn::Error::new_spanned(&input.ident, "sdk_model requires a struct with named fields")
            .to_compile_error();
    };

    let mut fields = Vec::with_capacity(named.named.len());
    for field in &mut named.named {
        match ModelField::take(field) {
            Ok(meta) => fields.push(meta),
            Err(err) => return err.to_compile_error(),
        }
    }

    let serde_rename = match serde_rename_attr(&args, &input.attrs) {
        Ok(attr) => attr,
        Err(err) => return err.to_compile_error(),
    };
    let all_optional = fields.iter().all(|f| !matches!(f.kind, FieldKind::Required { .. }));
    let derives = match derived_trait_names(&input.attrs) {
        Ok(present) => derive_attr(&present, all_optional),
        Err(err) => return err.to_compile_error(),
    };

    let accessors = accessors_impl(&input, &fields);
    let stable_hash = stable_hash_impl(&input, &fields);
    let sdk_model = sdk_model_impl(&input, &fields, &args);
    let display = if args.display { display_impl(&input, &fields) } else { quote! {} };

    quote! {
        #derives
        #serde_rename
        #input

        #accessors
        #stable_hash
        #sdk_model
        #display
    }
}

struct ModelArgs {
    shape: Option<LitStr>,
    rename_all: Option<LitStr>,
    display: bool,
}

impl ModelArgs {
    fn parse(args: TokenStream) -> syn::Result<Self> {
        let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
        let metas = parser.parse2(args)?;

        let mut parsed = Self { shape: None, rename_all: None, display: true };
        let mut seen = FxHashSet::default();

        for meta in metas {
            let name_value = match meta {
                Meta::NameValue(name_value) => name_value,
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "Expected name-value arguments like `shape = \"...\"`",
                    ));
                },
            };
            let Some(key) = name_value.path.get_ident().map(ToString::to_string) else {
                return Err(syn::Error::new_spanned(&name_value.path, "Unsupported argument"));
            };
            if !seen.insert(key.clone()) {
                return Err(syn::Error::new_spanned(&name_value, "Duplicate argument"));
            }
            let syn::Expr::Lit(expr) = &name_value.value else {
                return Err(syn::Error::new_spanned(&name_value.value, "Expected a literal"));
            };
            match (key.as_str(), &expr.lit) {
                ("shape", Lit::Str(lit)) => parsed.shape = Some(lit.clone()),
                ("rename_all", Lit::Str(lit)) => parsed.rename_all = Some(lit.clone()),
                ("display", Lit::Bool(lit)) => parsed.display = lit.value,
                ("shape" | "rename_all", _) => {
                    return Err(syn::Error::new_spanned(
                        &expr.lit,
                        format!("{key} must be a string literal"),
                    ));
                },
                ("display", _) => {
                    return Err(syn::Error::new_spanned(
                        &expr.lit,
                        "display must be a boolean literal",
                    ));
                },
                _ => {
                    return Err(syn::Error::new_spanned(
                        &name_value.path,
                        "Unsupported argument; expected shape, rename_all or display",
                    ));
                },
            }
        }

        Ok(parsed)
    }
}

enum Access {
    Str,
    Copy,
    Ref,
}

impl Access {
    fn of(ty: &Type, forced_copy: bool) -> Self {
        if forced_copy {
            return Self::Copy;
        }
        let Some(segment) = last_segment(ty).filter(|s| s.arguments.is_empty()) else {
            return Self::Ref;
        };
        if segment.ident == "String" {
            Self::Str
        } else if COPY_PRIMITIVES.iter().any(|p| segment.ident == p) {
            Self::Copy
        } else {
            Self::Ref
        }
    }
}

enum FieldKind {
    Required { ty: Type, access: Access },
    Optional { inner: Type, access: Access },
    Sequence { elem: Type },
}

struct ModelField {
    ident: Ident,
    label: String,
    kind: FieldKind,
}

impl ModelField {
    /// Reads and removes the `#[model(...)]` attributes, then applies the
    /// serde attributes and storage type the field kind calls for.
    fn take(field: &mut Field) -> syn::Result<Self> {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(&*field, "sdk_model fields must be named"));
        };

        let mut name: Option<LitStr> = None;
        let mut forced_copy = false;
        let mut error: Option<syn::Error> = None;
        field.attrs.retain(|attr| {
            if !attr.path().is_ident("model") {
                return true;
            }
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    name = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                if meta.path.is_ident("copy") {
                    forced_copy = true;
                    return Ok(());
                }
                Err(meta.error("Unsupported model attribute; expected `name = \"...\"` or `copy`"))
            });
            if let Err(err) = parsed {
                error.get_or_insert(err);
            }
            false
        });
        if let Some(err) = error {
            return Err(err);
        }

        let kind = match generic_arg(&field.ty, "Option") {
            Some(inner) => match generic_arg(inner, "Vec") {
                Some(elem) => FieldKind::Sequence { elem: elem.clone() },
                None => FieldKind::Optional {
                    inner: inner.clone(),
                    access: Access::of(inner, forced_copy),
                },
            },
            None => FieldKind::Required {
                ty: field.ty.clone(),
                access: Access::of(&field.ty, forced_copy),
            },
        };

        if let Some(lit) = &name {
            field.attrs.push(parse_quote!(#[serde(rename = #lit)]));
        }
        match &kind {
            FieldKind::Sequence { elem } => {
                field.attrs.push(parse_quote!(#[serde(default, skip_serializing_if = "::cirrus_model::Sequence::is_unset")]));
                field.ty = parse_quote!(::cirrus_model::Sequence<#elem>);
            },
            FieldKind::Optional { .. } => {
                field.attrs.push(parse_quote!(#[serde(default, skip_serializing_if = "Option::is_none")]));
            },
            FieldKind::Required { .. } => {},
        }

        let label = name.map_or_else(|| pascal_case(&ident.to_string()), |lit| lit.value());
        Ok(Self { ident, label, kind })
    }
}

fn pascal_case(ident: &str) -> String {
    ident
        .trim_start_matches("r#")
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect()
}

fn derive_attr(present: &FxHashSet<String>, all_optional: bool) -> TokenStream {
    let mut tokens = Vec::new();
    for (name, path) in [
        ("Debug", quote! { Debug }),
        ("Clone", quote! { Clone }),
        ("PartialEq", quote! { PartialEq }),
        ("Eq", quote! { Eq }),
        ("Hash", quote! { Hash }),
        ("Serialize", quote! { ::serde::Serialize }),
        ("Deserialize", quote! { ::serde::Deserialize }),
    ] {
        if !present.contains(name) {
            tokens.push(path);
        }
    }
    if all_optional && !present.contains("Default") {
        tokens.push(quote! { Default });
    }

    if tokens.is_empty() { quote! {} } else { quote! { #[derive(#(#tokens),*)] } }
}

fn serde_rename_attr(args: &ModelArgs, attrs: &[Attribute]) -> syn::Result<TokenStream> {
    let wanted = args
        .rename_all
        .clone()
        .unwrap_or_else(|| LitStr::new("PascalCase", Span::call_site()));

    let mut existing: Option<LitStr> = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                existing = Some(meta.value()?.parse()?);
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _nested;
                syn::parenthesized!(_nested in meta.input);
            }
            Ok(())
        })?;
    }

    match existing {
        Some(lit) if lit.value() != wanted.value() => Err(syn::Error::new_spanned(
            lit,
            "Conflicting serde rename_all; remove it or set sdk_model(rename_all = \"...\") to match",
        )),
        Some(_) => Ok(quote! {}),
        None => Ok(quote! { #[serde(rename_all = #wanted)] }),
    }
}

fn accessors_impl(input: &ItemStruct, fields: &[ModelField]) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let methods = fields.iter().map(field_accessors);

    quote! {
        #[automatically_derived]
        impl #impl_generics #name #ty_generics #where_clause {
            #( #methods )*
        }
    }
}

fn field_accessors(field: &ModelField) -> TokenStream {
    let ident = &field.ident;
    let set = format_ident!("set_{}", ident);
    let with = format_ident!("with_{}", ident);
    let get_doc = format!("Returns `{}`, or `None` while unset.", field.label);
    let set_doc = format!("Overwrites `{}`; `None` clears it.", field.label);
    let with_doc = format!("Sets `{}` and returns the model for chaining.", field.label);

    match &field.kind {
        FieldKind::Optional { inner, access } => {
            let getter = match access {
                Access::Str => quote! {
                    pub fn #ident(&self) -> Option<&str> { self.#ident.as_deref() }
                },
                Access::Copy => quote! {
                    pub fn #ident(&self) -> Option<#inner> { self.#ident }
                },
                Access::Ref => quote! {
                    pub fn #ident(&self) -> Option<&#inner> { self.#ident.as_ref() }
                },
            };
            quote! {
                #[doc = #get_doc]
                #[must_use]
                #getter

                #[doc = #set_doc]
                pub fn #set(&mut self, value: Option<#inner>) {
                    self.#ident = value;
                }

                #[doc = #with_doc]
                #[must_use]
                pub fn #with(mut self, value: impl Into<#inner>) -> Self {
                    self.#set(Some(value.into()));
                    self
                }
            }
        },
        FieldKind::Required { ty, access } => {
            let get_doc = format!("Returns `{}`.", field.label);
            let set_doc = format!("Overwrites `{}`.", field.label);
            let getter = match access {
                Access::Str => quote! { pub fn #ident(&self) -> &str { &self.#ident } },
                Access::Copy => quote! { pub fn #ident(&self) -> #ty { self.#ident } },
                Access::Ref => quote! { pub fn #ident(&self) -> &#ty { &self.#ident } },
            };
            quote! {
                #[doc = #get_doc]
                #[must_use]
                #getter

                #[doc = #set_doc]
                pub fn #set(&mut self, value: #ty) {
                    self.#ident = value;
                }

                #[doc = #with_doc]
                #[must_use]
                pub fn #with(mut self, value: impl Into<#ty>) -> Self {
                    self.#set(value.into());
                    self
                }
            }
        },
        FieldKind::Sequence { elem } => {
            let get_mut = format_ident!("{}_mut", ident);
            let has = format_ident!("has_{}", ident);
            let get_doc = format!("Reads `{}`; an unset sequence reads as empty.", field.label);
            let mut_doc = format!(
                "Mutable view of `{}`, materializing an empty sequence when unset. \
                 Clones share the list, so writes show through every copy.",
                field.label
            );
            let has_doc = format!("Whether `{}` is set (possibly empty).", field.label);
            let set_doc = format!("Replaces `{}`; `None` resets it to unset.", field.label);
            let with_doc = format!(
                "Appends every item to `{}` (materializing it first) and returns the model.",
                field.label
            );
            quote! {
                #[doc = #get_doc]
                #[must_use]
                pub fn #ident(&self) -> ::cirrus_model::seq::SequenceRef<'_, #elem> {
                    self.#ident.read()
                }

                #[doc = #mut_doc]
                pub fn #get_mut(&mut self) -> ::cirrus_model::seq::SequenceMut<'_, #elem> {
                    self.#ident.write()
                }

                #[doc = #has_doc]
                #[must_use]
                pub const fn #has(&self) -> bool {
                    self.#ident.is_set()
                }

                #[doc = #set_doc]
                pub fn #set(&mut self, value: Option<Vec<#elem>>) {
                    self.#ident.set(value);
                }

                #[doc = #with_doc]
                #[must_use]
                pub fn #with<I>(mut self, items: I) -> Self
                where
                    I: IntoIterator,
                    I::Item: Into<#elem>,
                {
                    self.#get_mut().extend(items.into_iter().map(Into::into));
                    self
                }
            }
        },
    }
}

fn stable_hash_impl(input: &ItemStruct, fields: &[ModelField]) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let idents = fields.iter().map(|f| &f.ident);

    quote! {
        #[automatically_derived]
        impl #impl_generics ::cirrus_model::StableHash for #name #ty_generics #where_clause {
            fn stable_hash(&self) -> i32 {
                let mut hash: i32 = 1;
                #(
                    hash = hash
                        .wrapping_mul(::cirrus_model::hash::PRIME)
                        .wrapping_add(::cirrus_model::StableHash::stable_hash(&self.#idents));
                )*
                hash
            }
        }
    }
}

fn sdk_model_impl(input: &ItemStruct, fields: &[ModelField], args: &ModelArgs) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let shape = args.shape.as_ref().map_or_else(|| name.to_string(), LitStr::value);
    let labels = fields.iter().map(|f| f.label.as_str());

    quote! {
        #[automatically_derived]
        impl #impl_generics ::cirrus_model::SdkModel for #name #ty_generics #where_clause {
            const SHAPE: &'static str = #shape;
            const FIELDS: &'static [&'static str] = &[#(#labels),*];
        }
    }
}

fn display_impl(input: &ItemStruct, fields: &[ModelField]) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let writes = fields.iter().map(|field| {
        let ident = &field.ident;
        let label = &field.label;
        match &field.kind {
            FieldKind::Required { .. } => quote! {
                write!(f, "{}: {},", #label, self.#ident)?;
            },
            FieldKind::Optional { .. } => quote! {
                if let Some(value) = &self.#ident {
                    write!(f, "{}: {},", #label, value)?;
                }
            },
            FieldKind::Sequence { .. } => quote! {
                if self.#ident.is_set() {
                    write!(f, "{}: ", #label)?;
                    ::cirrus_model::render::write_sequence(f, &*self.#ident.read())?;
                    f.write_str(",")?;
                }
            },
        }
    });

    quote! {
        #[automatically_derived]
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str("{")?;
                #( #writes )*
                f.write_str("}")
            }
        }
    }
}
