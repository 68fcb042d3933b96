//! Parsing of `#[derive(Describe)]` input and its `#[describe(...)]`
//! attributes.

use syn::parse::ParseStream;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Expr, Fields, Ident, LitStr, Token, Type};

use crate::DESCRIBE_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Model

/// The parsed derive target.
pub(crate) struct DescribeInput {
    pub ident: Ident,
    pub generics: syn::Generics,
    /// `#[describe(record)]`: immutable, constructor-parameter lifecycle.
    pub record: bool,
    /// `#[describe(default)]`: zero-argument constructor strategy.
    pub default: bool,
    /// Container-level `@expr` attributes.
    pub attrs: Vec<Expr>,
    /// The `#[describe(extends)]` field, if any.
    pub extends: Option<ExtendsField>,
    /// Declared fields, skipped ones already removed, in declaration order.
    pub fields: Vec<DescribeField>,
}

pub(crate) struct ExtendsField {
    pub ident: Ident,
    pub ty: Type,
}

pub(crate) struct DescribeField {
    pub ident: Ident,
    pub ty: Type,
    /// External name, `#[describe(name = "...")]` applied.
    pub name: String,
    /// Field-level `@expr` attributes.
    pub attrs: Vec<Expr>,
    /// Syntactically an `Option<...>` field.
    pub optional: bool,
}

// -----------------------------------------------------------------------------
// Attribute items

enum AttrItem {
    Flag(Ident),
    NameValue(Ident, LitStr),
    Attr(Expr),
}

fn parse_describe_items(attr: &syn::Attribute) -> syn::Result<Vec<AttrItem>> {
    attr.parse_args_with(parse_items)
}

fn parse_items(input: ParseStream) -> syn::Result<Vec<AttrItem>> {
    let mut items = Vec::new();
    loop {
        if input.is_empty() {
            break;
        }
        if input.peek(Token![@]) {
            input.parse::<Token![@]>()?;
            items.push(AttrItem::Attr(input.parse()?));
        } else {
            let ident: Ident = input.parse()?;
            if input.peek(Token![=]) {
                input.parse::<Token![=]>()?;
                items.push(AttrItem::NameValue(ident, input.parse()?));
            } else {
                items.push(AttrItem::Flag(ident));
            }
        }
        if input.is_empty() {
            break;
        }
        input.parse::<Token![,]>()?;
    }
    Ok(items)
}

// -----------------------------------------------------------------------------
// Parsing

impl DescribeInput {
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        let data = match input.data {
            Data::Struct(data) => data,
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span(),
                    "`Describe` does not support enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span(),
                    "`Describe` does not support unions",
                ));
            }
        };

        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "`Describe` does not support lifetime parameters",
            ));
        }

        let mut record = false;
        let mut default = false;
        let mut attrs = Vec::new();
        for attr in &input.attrs {
            if !attr.path().is_ident(DESCRIBE_ATTRIBUTE_NAME) {
                continue;
            }
            for item in parse_describe_items(attr)? {
                match item {
                    AttrItem::Flag(flag) if flag == "record" => record = true,
                    AttrItem::Flag(flag) if flag == "default" => default = true,
                    AttrItem::Flag(flag) => {
                        return Err(syn::Error::new(
                            flag.span(),
                            format!("unknown container flag `{flag}`"),
                        ));
                    }
                    AttrItem::NameValue(key, _) => {
                        return Err(syn::Error::new(
                            key.span(),
                            format!("unknown container attribute `{key}`"),
                        ));
                    }
                    AttrItem::Attr(expr) => attrs.push(expr),
                }
            }
        }

        let named = match data.fields {
            Fields::Named(named) => named.named,
            Fields::Unit => Default::default(),
            Fields::Unnamed(fields) => {
                return Err(syn::Error::new(
                    fields.span(),
                    "`Describe` does not support tuple structs",
                ));
            }
        };

        let mut extends: Option<ExtendsField> = None;
        let mut fields = Vec::new();
        for field in named {
            let ident = field.ident.clone().expect("named field");
            let mut skip = false;
            let mut is_extends = false;
            let mut name = ident.to_string();
            let mut field_attrs = Vec::new();

            for attr in &field.attrs {
                if !attr.path().is_ident(DESCRIBE_ATTRIBUTE_NAME) {
                    continue;
                }
                for item in parse_describe_items(attr)? {
                    match item {
                        AttrItem::Flag(flag) if flag == "skip" => skip = true,
                        AttrItem::Flag(flag) if flag == "extends" => is_extends = true,
                        AttrItem::Flag(flag) => {
                            return Err(syn::Error::new(
                                flag.span(),
                                format!("unknown field flag `{flag}`"),
                            ));
                        }
                        AttrItem::NameValue(key, value) if key == "name" => {
                            name = value.value();
                        }
                        AttrItem::NameValue(key, _) => {
                            return Err(syn::Error::new(
                                key.span(),
                                format!("unknown field attribute `{key}`"),
                            ));
                        }
                        AttrItem::Attr(expr) => field_attrs.push(expr),
                    }
                }
            }

            if is_extends {
                if skip {
                    return Err(syn::Error::new(
                        ident.span(),
                        "an `extends` field is never mapped directly; `skip` is redundant",
                    ));
                }
                if record {
                    return Err(syn::Error::new(
                        ident.span(),
                        "record types cannot extend a base type",
                    ));
                }
                if extends.is_some() {
                    return Err(syn::Error::new(
                        ident.span(),
                        "at most one field may be marked `extends`",
                    ));
                }
                extends = Some(ExtendsField {
                    ident,
                    ty: field.ty,
                });
                continue;
            }
            if skip {
                if record {
                    return Err(syn::Error::new(
                        ident.span(),
                        "record fields are constructor parameters and cannot be skipped",
                    ));
                }
                continue;
            }

            let optional = is_option(&field.ty);
            fields.push(DescribeField {
                ident,
                ty: field.ty,
                name,
                attrs: field_attrs,
                optional,
            });
        }

        Ok(Self {
            ident: input.ident,
            generics: input.generics,
            record,
            default,
            attrs,
            extends,
            fields,
        })
    }

    /// Whether any generic parameter is present (type or const).
    pub fn is_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
            || self.generics.const_params().next().is_some()
    }
}

/// Syntactic `Option<...>` detection, last path segment only.
///
/// An alias hiding an `Option` is treated as a plain field, the same
/// trade-off serde makes for its default detection.
fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
