use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, FnArg, GenericArgument, ItemFn, LitInt, Pat, PathArguments, Type};

/// Times a system when the `perf_stats` feature is enabled.
///
/// The generated guard logs on drop through Bevy's `info!` when the body took
/// longer than the threshold (milliseconds, default 1). If the function takes a
/// `tick: Res<SimTick>` parameter the guard also logs every 100th tick, so slow
/// and steady systems both show up in the log.
///
/// Without `perf_stats` the attribute leaves the function untouched.
///
/// ```ignore
/// #[profile(2)]
/// pub fn wander_agents(tick: Res<SimTick>, /* ... */) { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let threshold_ms: u128 = if attr.is_empty() {
        1
    } else {
        let lit = parse_macro_input!(attr as LitInt);
        match lit.base10_parse::<u128>() {
            Ok(value) => value,
            Err(err) => return err.to_compile_error().into(),
        }
    };

    let input = parse_macro_input!(item as ItemFn);
    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let name = sig.ident.to_string();

    let tick_arg = sig.inputs.iter().find_map(|arg| match arg {
        FnArg::Typed(typed) => match &*typed.pat {
            Pat::Ident(ident) if mentions_sim_tick(&typed.ty) => Some(ident.ident.clone()),
            _ => None,
        },
        FnArg::Receiver(_) => None,
    });

    let guard = guard_tokens(&name, threshold_ms, tick_arg.as_ref());

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_guard = { #guard };

            #block
        }
    };

    output.into()
}

/// True when the type is (or wraps, e.g. `Res<SimTick>`) a path ending in `SimTick`.
fn mentions_sim_tick(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    let Some(last) = type_path.path.segments.last() else {
        return false;
    };
    if last.ident == "SimTick" {
        return true;
    }
    match &last.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| match arg {
            GenericArgument::Type(inner) => mentions_sim_tick(inner),
            _ => false,
        }),
        _ => false,
    }
}

fn guard_tokens(name: &str, threshold_ms: u128, tick_arg: Option<&syn::Ident>) -> TokenStream2 {
    let (tick_field, tick_init, tick_check) = match tick_arg {
        Some(ident) => (
            quote! { tick: u64, },
            quote! { tick: #ident.0, },
            quote! { || self.tick % 100 == 0 },
        ),
        None => (quote! {}, quote! {}, quote! {}),
    };

    quote! {
        struct ProfileGuard {
            started: std::time::Instant,
            #tick_field
        }
        impl Drop for ProfileGuard {
            fn drop(&mut self) {
                let elapsed = self.started.elapsed();
                if elapsed.as_millis() > #threshold_ms #tick_check {
                    bevy::prelude::info!("[PERF] {}: {:?}", #name, elapsed);
                }
            }
        }
        ProfileGuard {
            started: std::time::Instant::now(),
            #tick_init
        }
    }
}
