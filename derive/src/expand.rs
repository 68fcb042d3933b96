//! Code generation for `#[derive(Describe)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::GenericParam;

use crate::input::{DescribeField, DescribeInput};

pub(crate) fn expand(input: DescribeInput) -> syn::Result<TokenStream> {
    let type_path_impl = impl_type_path(&input);
    let describe_impl = impl_describe(&input);
    Ok(quote! {
        #type_path_impl

        #describe_impl
    })
}

/// The input generics with a `::treebind::Describe` bound on every type
/// parameter.
fn bounded_generics(input: &DescribeInput) -> syn::Generics {
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(::treebind::Describe));
    }
    generics
}

// -----------------------------------------------------------------------------
// TypePath

fn impl_type_path(input: &DescribeInput) -> TokenStream {
    let ident = &input.ident;
    let ident_str = ident.to_string();
    let generics = bounded_generics(input);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    if !input.is_generic() {
        return quote! {
            impl ::treebind::info::TypePath for #ident {
                #[inline]
                fn type_path() -> &'static str {
                    ::core::concat!(::core::module_path!(), "::", #ident_str)
                }

                #[inline]
                fn type_name() -> &'static str {
                    #ident_str
                }

                #[inline]
                fn type_ident() -> &'static str {
                    #ident_str
                }

                #[inline]
                fn module_path() -> ::core::option::Option<&'static str> {
                    ::core::option::Option::Some(::core::module_path!())
                }
            }
        };
    }

    let path_pushes = param_pushes(input, true);
    let name_pushes = param_pushes(input, false);

    quote! {
        impl #impl_generics ::treebind::info::TypePath for #ident #ty_generics #where_clause {
            fn type_path() -> &'static str {
                static CELL: ::treebind::impls::GenericPathCell =
                    ::treebind::impls::GenericPathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let mut __path = ::std::string::String::from(
                        ::core::concat!(::core::module_path!(), "::", #ident_str),
                    );
                    __path.push('<');
                    #(#path_pushes)*
                    __path.push('>');
                    __path
                })
            }

            fn type_name() -> &'static str {
                static CELL: ::treebind::impls::GenericPathCell =
                    ::treebind::impls::GenericPathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let mut __path = ::std::string::String::from(#ident_str);
                    __path.push('<');
                    #(#name_pushes)*
                    __path.push('>');
                    __path
                })
            }

            #[inline]
            fn type_ident() -> &'static str {
                #ident_str
            }

            #[inline]
            fn module_path() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(::core::module_path!())
            }
        }
    }
}

/// `__path.push_str(..)` statements for every generic parameter, comma
/// separated, in declaration order.
fn param_pushes(input: &DescribeInput, full_path: bool) -> Vec<TokenStream> {
    let mut pushes = Vec::new();
    for param in &input.generics.params {
        if !pushes.is_empty() {
            pushes.push(quote! { __path.push_str(", "); });
        }
        match param {
            GenericParam::Type(ty) => {
                let ident = &ty.ident;
                let getter = if full_path {
                    quote! { <#ident as ::treebind::info::TypePath>::type_path() }
                } else {
                    quote! { <#ident as ::treebind::info::TypePath>::type_name() }
                };
                pushes.push(quote! { __path.push_str(#getter); });
            }
            GenericParam::Const(konst) => {
                let ident = &konst.ident;
                pushes.push(quote! {
                    __path.push_str(&::std::string::ToString::to_string(&#ident));
                });
            }
            GenericParam::Lifetime(_) => {}
        }
    }
    pushes
}

// -----------------------------------------------------------------------------
// Describe

fn impl_describe(input: &DescribeInput) -> TokenStream {
    let ident = &input.ident;
    let mut generics = bounded_generics(input);
    if input.default {
        let self_ty: syn::Type = {
            let (_, ty_generics, _) = generics.split_for_impl();
            syn::parse_quote!(#ident #ty_generics)
        };
        generics
            .make_where_clause()
            .predicates
            .push(syn::parse_quote!(#self_ty: ::core::default::Default));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let shape = if input.record {
        quote! { ::treebind::info::TypeShape::Record }
    } else {
        quote! { ::treebind::info::TypeShape::Struct }
    };

    let annotated_body = annotated_type_body(input, &shape);
    let table_expr = table_expr(input, &shape);

    let table_body = if input.is_generic() {
        quote! {
            static CELL: ::treebind::impls::GenericTableCell =
                ::treebind::impls::GenericTableCell::new();
            ::core::option::Option::Some(CELL.get_or_insert::<Self>(|| #table_expr))
        }
    } else {
        quote! {
            static CELL: ::treebind::impls::TableCell = ::treebind::impls::TableCell::new();
            ::core::option::Option::Some(CELL.get_or_init(|| #table_expr))
        }
    };

    quote! {
        impl #impl_generics ::treebind::Describe for #ident #ty_generics #where_clause {
            fn annotated_type() -> ::treebind::info::AnnotatedType {
                #annotated_body
            }

            fn field_table() -> ::core::option::Option<&'static ::treebind::FieldTable> {
                #table_body
            }
        }
    }
}

fn annotated_type_body(input: &DescribeInput, shape: &TokenStream) -> TokenStream {
    let mut builder = quote! {
        ::treebind::info::AnnotatedType::of::<Self>(#shape)
    };

    let type_params: Vec<_> = input.generics.type_params().collect();
    if !type_params.is_empty() {
        let infos = type_params.iter().map(|param| {
            let ident = &param.ident;
            let name = ident.to_string();
            quote! { ::treebind::info::TypeParamInfo::new::<#ident>(#name) }
        });
        builder = quote! {
            #builder.with_generics(::treebind::info::Generics::from([#(#infos),*]))
        };
    }

    if !input.attrs.is_empty() {
        let attrs = &input.attrs;
        builder = quote! {
            #builder.with_attributes(
                ::treebind::info::AttributeSet::new() #(.with(#attrs))*
            )
        };
    }

    if let Some(extends) = &input.extends {
        let base_ident = &extends.ident;
        let base_ty = &extends.ty;
        builder = quote! {
            #builder.with_ancestor(::treebind::info::AncestorLink::new(
                <#base_ty as ::treebind::Describe>::annotated_type,
                ::treebind::access::Project::new(
                    |__instance| match __instance.downcast_ref::<Self>() {
                        ::core::option::Option::Some(__v) => ::core::option::Option::Some(
                            &__v.#base_ident as &dyn ::core::any::Any,
                        ),
                        ::core::option::Option::None => ::core::option::Option::None,
                    },
                    |__instance| match __instance.downcast_mut::<Self>() {
                        ::core::option::Option::Some(__v) => ::core::option::Option::Some(
                            &mut __v.#base_ident as &mut dyn ::core::any::Any,
                        ),
                        ::core::option::Option::None => ::core::option::Option::None,
                    },
                ),
            ))
        };
    }

    builder
}

fn table_expr(input: &DescribeInput, shape: &TokenStream) -> TokenStream {
    let mut builder = quote! {
        ::treebind::FieldTable::new::<Self>(#shape)
    };

    if input.default {
        builder = quote! {
            #builder.with_maker(|| -> ::std::boxed::Box<dyn ::core::any::Any> {
                ::std::boxed::Box::new(<Self as ::core::default::Default>::default())
            })
        };
    }

    if input.record {
        let assembler = assembler_expr(input);
        let replacer = replacer_expr();
        builder = quote! {
            #builder #assembler #replacer
        };
    }

    if !input.fields.is_empty() {
        let specs = input.fields.iter().map(field_spec);
        builder = quote! {
            #builder.with_fields(::std::vec![#(#specs),*])
        };
    }

    builder
}

fn field_spec(field: &DescribeField) -> TokenStream {
    let fid = &field.ident;
    let fty = &field.ty;
    let name = &field.name;

    let vacant = if field.optional {
        quote! {
            |__instance| match __instance.downcast_ref::<Self>() {
                ::core::option::Option::Some(__v) => ::core::option::Option::Some(__v.#fid.is_none()),
                ::core::option::Option::None => ::core::option::Option::None,
            }
        }
    } else {
        quote! {
            |__instance| match __instance.downcast_ref::<Self>() {
                ::core::option::Option::Some(_) => ::core::option::Option::Some(false),
                ::core::option::Option::None => ::core::option::Option::None,
            }
        }
    };

    let mut spec = quote! {
        ::treebind::FieldSpec::new::<#fty>(
            #name,
            ::treebind::access::FieldAccessor::new(
                |__instance| match __instance.downcast_ref::<Self>() {
                    ::core::option::Option::Some(__v) => ::core::option::Option::Some(
                        &__v.#fid as &dyn ::core::any::Any,
                    ),
                    ::core::option::Option::None => ::core::option::Option::None,
                },
                |__instance, __value| match __instance.downcast_mut::<Self>() {
                    ::core::option::Option::Some(__v) => {
                        match __value.downcast::<#fty>() {
                            ::core::result::Result::Ok(__value) => {
                                __v.#fid = *__value;
                                ::core::result::Result::Ok(())
                            }
                            ::core::result::Result::Err(_) => ::core::result::Result::Err(
                                ::treebind::access::AccessErrorKind::WrongValue,
                            ),
                        }
                    }
                    ::core::option::Option::None => ::core::result::Result::Err(
                        ::treebind::access::AccessErrorKind::WrongInstance,
                    ),
                },
                #vacant,
            ),
        )
    };

    if !field.attrs.is_empty() {
        let attrs = &field.attrs;
        spec = quote! {
            #spec.with_attributes(
                ::treebind::info::AttributeSet::new() #(.with(#attrs))*
            )
        };
    }

    spec
}

fn assembler_expr(input: &DescribeInput) -> TokenStream {
    let arg_ty = quote! {
        ::std::vec::Vec<::core::option::Option<::std::boxed::Box<dyn ::core::any::Any>>>
    };
    let ret_ty = quote! {
        ::core::result::Result<::std::boxed::Box<dyn ::core::any::Any>, ::treebind::AssembleError>
    };

    if input.fields.is_empty() {
        return quote! {
            .with_assembler(|__args: #arg_ty| -> #ret_ty {
                let _ = __args;
                ::core::result::Result::Ok(::std::boxed::Box::new(Self {}))
            })
        };
    }

    let lets = input.fields.iter().enumerate().map(|(index, field)| {
        let fid = &field.ident;
        let fty = &field.ty;
        let fallback = if field.optional {
            quote! { ::core::option::Option::None }
        } else {
            quote! {
                return ::core::result::Result::Err(::treebind::AssembleError::missing(#index))
            }
        };
        quote! {
            let #fid: #fty = match __iter.next() {
                ::core::option::Option::Some(::core::option::Option::Some(__value)) => {
                    match __value.downcast::<#fty>() {
                        ::core::result::Result::Ok(__value) => *__value,
                        ::core::result::Result::Err(_) => {
                            return ::core::result::Result::Err(
                                ::treebind::AssembleError::mismatch(#index),
                            )
                        }
                    }
                }
                _ => #fallback,
            };
        }
    });
    let fids = input.fields.iter().map(|field| &field.ident);

    quote! {
        .with_assembler(|__args: #arg_ty| -> #ret_ty {
            let mut __iter = __args.into_iter();
            #(#lets)*
            ::core::result::Result::Ok(::std::boxed::Box::new(Self { #(#fids),* }))
        })
    }
}

fn replacer_expr() -> TokenStream {
    quote! {
        .with_replacer(|__instance, __value| {
            let ::core::option::Option::Some(__dst) = __instance.downcast_mut::<Self>() else {
                return ::core::result::Result::Err(
                    ::treebind::access::AccessErrorKind::WrongInstance,
                );
            };
            match __value.downcast::<Self>() {
                ::core::result::Result::Ok(__src) => {
                    *__dst = *__src;
                    ::core::result::Result::Ok(())
                }
                ::core::result::Result::Err(_) => ::core::result::Result::Err(
                    ::treebind::access::AccessErrorKind::WrongValue,
                ),
            }
        })
    }
}
