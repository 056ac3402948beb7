use fxhash::FxHashSet;
use syn::{Attribute, PathSegment, Type};

/// Names of traits already listed in `#[derive(...)]`, by last path segment.
pub(super) fn derived_trait_names(attrs: &[Attribute]) -> syn::Result<FxHashSet<String>> {
    let mut traits = FxHashSet::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        })?;
    }

    Ok(traits)
}

pub(super) fn last_segment(ty: &Type) -> Option<&PathSegment> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    path.path.segments.last()
}

/// Returns `T` when `ty` is `Wrapper<T>`.
pub(super) fn generic_arg<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let segment = last_segment(ty).filter(|segment| segment.ident == wrapper)?;
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn collects_derive_names_by_last_segment() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[derive(Debug, ::serde::Serialize)]),
            parse_quote!(#[doc = "ignored"]),
        ];
        let names = derived_trait_names(&attrs).unwrap();
        assert!(names.contains("Debug"));
        assert!(names.contains("Serialize"));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn malformed_derive_list_is_an_error() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[derive(Debug, 42)])];
        assert!(derived_trait_names(&attrs).is_err());
    }
}
