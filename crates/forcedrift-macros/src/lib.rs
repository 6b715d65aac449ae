use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Data, DeriveInput, Error, Expr, Field, Fields, Ident, Result, Token, Type,
    parse_macro_input,
};

/// Derive macro that generates a `Default` implementation for configuration
/// structs from inline `#[default(...)]` values.
///
/// String fields accept string literals and are converted with `.into()`.
/// Every other type uses the expression as written.
///
/// # Example
/// ```
/// use forcedrift_macros::ConfigDefaults;
///
/// #[derive(ConfigDefaults)]
/// pub struct DriverConfig {
///     #[default(0.05)]
///     pub max_step: f64,
///
///     #[default("out")]
///     pub output_dir: String,
/// }
///
/// let config = DriverConfig::default();
/// assert_eq!(config.max_step, 0.05);
/// assert_eq!(config.output_dir, "out");
/// ```
///
/// Every field must carry a `#[default(...)]` attribute.
#[proc_macro_derive(ConfigDefaults, attributes(default))]
pub fn config_defaults(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_default_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derive macro that generates a `sanitized(&self) -> Self` method for
/// structs of numeric parameters.
///
/// Fields marked with `#[clamp(lo, hi)]` are clamped into the closed range.
/// Fields marked with `#[clamp]` or `#[fallback(expr)]` are replaced when
/// they are not finite: by the `#[fallback]` value if present, otherwise by
/// the field's `#[default]` value. Unmarked fields are cloned unchanged.
///
/// # Example
/// ```
/// use forcedrift_macros::{ConfigDefaults, Sanitize};
///
/// #[derive(ConfigDefaults, Sanitize)]
/// pub struct Friction {
///     #[default(0.3)]
///     #[clamp(0.0, 1.0)]
///     #[fallback(0.0)]
///     pub mu: f64,
///
///     #[default(true)]
///     pub enabled: bool,
/// }
///
/// let raw = Friction { mu: 4.0, enabled: false };
/// assert_eq!(raw.sanitized().mu, 1.0);
///
/// let raw = Friction { mu: f64::NAN, enabled: true };
/// assert_eq!(raw.sanitized().mu, 0.0);
/// ```
#[proc_macro_derive(Sanitize, attributes(default, clamp, fallback))]
pub fn sanitize(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_sanitize_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Attributes collected from a single named field
struct FieldSpec<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    default: Option<proc_macro2::TokenStream>,
    clamp: Option<(Expr, Expr)>,
    fallback: Option<proc_macro2::TokenStream>,
}

fn named_fields<'a>(
    input: &'a DeriveInput,
    derive_name: &str,
) -> Result<&'a Punctuated<Field, Token![,]>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            Fields::Unnamed(_) => Err(Error::new_spanned(
                input,
                format!("{derive_name} only supports structs with named fields"),
            )),
            Fields::Unit => Err(Error::new_spanned(
                input,
                format!("{derive_name} cannot be derived for unit structs"),
            )),
        },
        Data::Enum(_) => Err(Error::new_spanned(
            input,
            format!("{derive_name} can only be derived for structs, not enums"),
        )),
        Data::Union(_) => Err(Error::new_spanned(
            input,
            format!("{derive_name} can only be derived for structs, not unions"),
        )),
    }
}

fn collect_fields<'a>(input: &'a DeriveInput, derive_name: &str) -> Result<Vec<FieldSpec<'a>>> {
    named_fields(input, derive_name)?
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| Error::new_spanned(field, "expected a named field"))?;

            let mut spec = FieldSpec {
                ident,
                ty: &field.ty,
                default: None,
                clamp: None,
                fallback: None,
            };

            for attr in &field.attrs {
                if attr.path().is_ident("default") {
                    spec.default = Some(non_empty_tokens(attr, ident, "default")?);
                } else if attr.path().is_ident("fallback") {
                    spec.fallback = Some(non_empty_tokens(attr, ident, "fallback")?);
                } else if attr.path().is_ident("clamp") {
                    spec.clamp = Some(clamp_bounds(attr, ident)?);
                }
            }

            Ok(spec)
        })
        .collect()
}

fn non_empty_tokens(
    attr: &Attribute,
    ident: &Ident,
    name: &str,
) -> Result<proc_macro2::TokenStream> {
    let tokens: proc_macro2::TokenStream = attr.parse_args().map_err(|e| {
        Error::new_spanned(
            attr,
            format!("Failed to parse {name} attribute for field '{ident}': {e}"),
        )
    })?;

    if tokens.is_empty() {
        return Err(Error::new_spanned(
            attr,
            format!("Field '{ident}' has an empty #[{name}()] attribute. Please provide a value."),
        ));
    }

    Ok(tokens)
}

fn clamp_bounds(attr: &Attribute, ident: &Ident) -> Result<(Expr, Expr)> {
    let bounds = attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
    let mut bounds = bounds.into_iter();

    match (bounds.next(), bounds.next(), bounds.next()) {
        (Some(lo), Some(hi), None) => Ok((lo, hi)),
        _ => Err(Error::new_spanned(
            attr,
            format!("Field '{ident}' expects #[clamp(lower, upper)] with exactly two bounds"),
        )),
    }
}

/// Check if the type is String
fn is_string_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "String";
        }
    }
    false
}

fn generate_default_impl(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_defaults = collect_fields(input, "ConfigDefaults")?
        .into_iter()
        .map(|spec| {
            let ident = spec.ident;
            let value = spec.default.ok_or_else(|| {
                Error::new_spanned(
                    ident,
                    format!(
                        "Field '{ident}' must have a #[default(...)] attribute specifying its default value"
                    ),
                )
            })?;

            Ok(if is_string_type(spec.ty) {
                quote! { #ident: ::std::convert::Into::into(#value) }
            } else {
                quote! { #ident: #value }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics Default for #name #ty_generics #where_clause {
            fn default() -> Self {
                Self {
                    #(#field_defaults),*
                }
            }
        }
    })
}

fn generate_sanitize_impl(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_values = collect_fields(input, "Sanitize")?
        .into_iter()
        .map(|spec| {
            let ident = spec.ident;

            if spec.clamp.is_none() && spec.fallback.is_none() {
                return Ok(quote! { #ident: ::core::clone::Clone::clone(&self.#ident) });
            }

            let replacement = spec.fallback.or(spec.default).ok_or_else(|| {
                Error::new_spanned(
                    ident,
                    format!(
                        "Field '{ident}' needs a #[fallback(...)] or #[default(...)] value to replace non-finite input"
                    ),
                )
            })?;

            let finite_value = match spec.clamp {
                Some((lo, hi)) => quote! { value.clamp(#lo, #hi) },
                None => quote! { value },
            };

            Ok(quote! {
                #ident: {
                    let value = self.#ident;
                    if value.is_finite() { #finite_value } else { #replacement }
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics #name #ty_generics #where_clause {
            /// Returns a copy with non-finite values replaced and bounded
            /// values clamped into range.
            pub fn sanitized(&self) -> Self {
                Self {
                    #(#field_values),*
                }
            }
        }
    })
}
