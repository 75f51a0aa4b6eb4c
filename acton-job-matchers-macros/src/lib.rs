//! Derive macros for acton-job-matchers
//!
//! - `#[derive(Worker)]` implements `acton_job_matchers::jobs::Worker`
//! - `#[derive(ApplicationJob)]` implements `acton_job_matchers::jobs::ApplicationJob`
//! - `#[derive(Mailer)]` implements `acton_job_matchers::jobs::Mailer`
//!
//! The recorded class name defaults to the type's identifier and can be
//! overridden with `name = "..."`. Workers and application jobs also accept
//! `queue = "..."`.
//!
//! # Example
//!
//! ```rust,ignore
//! use acton_job_matchers::{ApplicationJob, Mailer, Worker};
//!
//! #[derive(Worker)]
//! #[worker(queue = "critical")]
//! struct HardWorker;
//!
//! #[derive(ApplicationJob)]
//! #[job(name = "Billing::ChargeJob", queue = "billing")]
//! struct ChargeJob;
//!
//! #[derive(Mailer)]
//! struct AccountMailer;
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, LitStr};

/// Options shared by every derive in this crate.
#[derive(Default)]
struct ClassOptions {
    name: Option<LitStr>,
    queue: Option<LitStr>,
}

impl ClassOptions {
    fn parse(input: &DeriveInput, attr: &str, allow_queue: bool) -> syn::Result<Self> {
        let mut options = Self::default();

        for attribute in input.attrs.iter().filter(|a| a.path().is_ident(attr)) {
            attribute.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    options.name = Some(meta.value()?.parse()?);
                    Ok(())
                } else if allow_queue && meta.path.is_ident("queue") {
                    options.queue = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error(format!("unsupported `{attr}` attribute")))
                }
            })?;
        }

        Ok(options)
    }

    fn class_name(&self, input: &DeriveInput) -> LitStr {
        self.name
            .clone()
            .unwrap_or_else(|| LitStr::new(&input.ident.to_string(), input.ident.span()))
    }

    fn queue_tokens(&self) -> TokenStream2 {
        self.queue.as_ref().map_or_else(
            || quote! { ::core::option::Option::None },
            |queue| quote! { ::core::option::Option::Some(#queue) },
        )
    }
}

/// Derive `acton_job_matchers::jobs::Worker`
///
/// Accepts `#[worker(name = "...", queue = "...")]`.
#[proc_macro_derive(Worker, attributes(worker))]
pub fn derive_worker(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_queued(&input, "worker", &quote! { ::acton_job_matchers::jobs::Worker })
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive `acton_job_matchers::jobs::ApplicationJob`
///
/// Accepts `#[job(name = "...", queue = "...")]`.
#[proc_macro_derive(ApplicationJob, attributes(job))]
pub fn derive_application_job(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_queued(
        &input,
        "job",
        &quote! { ::acton_job_matchers::jobs::ApplicationJob },
    )
    .unwrap_or_else(syn::Error::into_compile_error)
    .into()
}

/// Derive `acton_job_matchers::jobs::Mailer`
///
/// Accepts `#[mailer(name = "...")]`.
#[proc_macro_derive(Mailer, attributes(mailer))]
pub fn derive_mailer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_mailer(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_queued(
    input: &DeriveInput,
    attr: &str,
    trait_path: &TokenStream2,
) -> syn::Result<TokenStream2> {
    let options = ClassOptions::parse(input, attr, true)?;
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let name = options.class_name(input);
    let queue = options.queue_tokens();

    Ok(quote! {
        impl #impl_generics #trait_path for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;

            fn queue() -> ::core::option::Option<&'static str> {
                #queue
            }
        }
    })
}

fn expand_mailer(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let options = ClassOptions::parse(input, "mailer", false)?;
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let name = options.class_name(input);

    Ok(quote! {
        impl #impl_generics ::acton_job_matchers::jobs::Mailer for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_class_name_defaults_to_ident() {
        let input: DeriveInput = parse_quote! {
            struct HardWorker;
        };

        let options = ClassOptions::parse(&input, "worker", true).unwrap();
        assert_eq!(options.class_name(&input).value(), "HardWorker");
        assert!(options.queue.is_none());
    }

    #[test]
    fn test_name_and_queue_override() {
        let input: DeriveInput = parse_quote! {
            #[job(name = "Billing::ChargeJob", queue = "billing")]
            struct ChargeJob;
        };

        let options = ClassOptions::parse(&input, "job", true).unwrap();
        assert_eq!(options.class_name(&input).value(), "Billing::ChargeJob");
        assert_eq!(options.queue.map(|queue| queue.value()).as_deref(), Some("billing"));
    }

    #[test]
    fn test_other_attributes_are_ignored() {
        let input: DeriveInput = parse_quote! {
            #[derive(Debug)]
            #[mailer(name = "Accounts")]
            struct AccountMailer;
        };

        let options = ClassOptions::parse(&input, "worker", true).unwrap();
        assert!(options.name.is_none());
    }

    #[test]
    fn test_unsupported_key_is_rejected() {
        let input: DeriveInput = parse_quote! {
            #[worker(retry = "5")]
            struct HardWorker;
        };

        let Err(err) = ClassOptions::parse(&input, "worker", true) else {
            panic!("`retry` should be rejected");
        };
        assert_eq!(err.to_string(), "unsupported `worker` attribute");
    }

    #[test]
    fn test_mailer_rejects_queue() {
        let input: DeriveInput = parse_quote! {
            #[mailer(queue = "priority")]
            struct AccountMailer;
        };

        let Err(err) = ClassOptions::parse(&input, "mailer", false) else {
            panic!("`queue` should be rejected for mailers");
        };
        assert_eq!(err.to_string(), "unsupported `mailer` attribute");
    }

    #[test]
    fn test_expand_queued_emits_queue() {
        let input: DeriveInput = parse_quote! {
            #[worker(queue = "critical")]
            struct HardWorker;
        };

        let tokens = expand_queued(&input, "worker", &quote! { Worker }).unwrap().to_string();
        assert!(tokens.contains("\"HardWorker\""));
        assert!(tokens.contains("Some (\"critical\")"));
    }

    #[test]
    fn test_expand_mailer_error_becomes_compile_error() {
        let input: DeriveInput = parse_quote! {
            #[mailer(queue = "priority")]
            struct AccountMailer;
        };

        let tokens = expand_mailer(&input)
            .unwrap_or_else(syn::Error::into_compile_error)
            .to_string();
        assert!(tokens.contains("compile_error"));
    }
}
