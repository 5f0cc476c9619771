//! Derive macros that translate `#[repr(u8)]` enums to and from `u8`.
//!
//! The interpreter's bytecode stream is a flat `Vec<u8>`; opcodes need a
//! cheap, allocation-free way to round-trip between their enum form (used
//! everywhere in the compiler/VM) and the single byte written to/read from
//! a `Chunk`. Hand-writing `match` arms in both directions for every opcode
//! is exactly the kind of boilerplate a derive macro should eat.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;

/// Derives bidirectional conversions between an enum and `u8`.
///
/// Generates `impl From<Enum> for u8` (via `as u8`, so the enum must be
/// `#[repr(u8)]` with no data-carrying variants) and `impl From<u8> for Enum`
/// (a match over each discriminant, panicking on an out-of-range byte — a
/// malformed opcode byte is a VM bug, not a recoverable runtime condition).
#[proc_macro_derive(EnumU8)]
pub fn enum_u8(input: TokenStream) -> TokenStream {
  let ast: DeriveInput = syn::parse(input).unwrap();
  let name = &ast.ident;

  let variants: Vec<_> = match &ast.data {
    syn::Data::Enum(e) => e.variants.iter().map(|v| v.ident.clone()).collect(),
    _ => panic!("EnumU8 can only be used with enums"),
  };

  let gen = quote! {
      impl From<#name> for u8 {
          fn from(val: #name) -> Self {
              val as u8
          }
      }

      impl From<u8> for #name {
          fn from(val: u8) -> Self {
              match val {
                  #(
                      x if x == #name::#variants as u8 => #name::#variants,
                  )*
                  _ => panic!("invalid byte {} for enum {}", val, stringify!(#name)),
              }
          }
      }
  };

  gen.into()
}
