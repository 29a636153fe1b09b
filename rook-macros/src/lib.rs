//! Procedural macros for `rook`.
//!
//! Provides the `#[component]` attribute for placeholder views: loading screens, stubs for
//! routes whose real view is not written yet, and similar static panels.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemStruct, LitStr};

/// Implement `rook::Component` for a struct by rendering a centered message.
///
/// # Usage
///
/// ```ignore
/// #[rook::component("Loading…")]
/// pub struct LoadingView;
///
/// #[rook::component]
/// pub struct Placeholder;
/// ```
///
/// Without a message the struct name is shown. The generated component handles no events, so
/// keys fall through to whoever wraps it.
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    let message = if attr.is_empty() {
        None
    } else {
        Some(parse_macro_input!(attr as LitStr))
    };
    let input = parse_macro_input!(item as ItemStruct);
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let text: proc_macro2::TokenStream = match message {
        Some(message) => quote! { #message },
        None => quote! { stringify!(#struct_name) },
    };

    let expanded = quote! {
        #input

        impl #impl_generics ::rook::Component for #struct_name #ty_generics #where_clause {
            fn render(&mut self, frame: &mut ::ratatui::Frame, cx: &mut ::rook::Context<Self>) {
                let area = cx.area;
                let top = area.y + area.height / 2;
                let line = ::ratatui::layout::Rect::new(area.x, top, area.width, area.height.min(1));
                let paragraph = ::ratatui::widgets::Paragraph::new(#text)
                    .alignment(::ratatui::layout::Alignment::Center);
                frame.render_widget(paragraph, line);
            }
        }
    };

    TokenStream::from(expanded)
}
