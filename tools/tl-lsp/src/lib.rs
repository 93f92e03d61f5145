//! Language server for Teal.
//!
//! Edits keep a [`tl_parse::Document`] in sync per open file. After each
//! change the `tl` compiler checks a temporary copy of the text; its
//! diagnostics are published and its type report is cached in the
//! [`session::Session`], where hover, definition, completion and signature
//! help read it.

pub mod compiler;
pub mod config;
pub mod convert;
pub mod features;
pub mod refresh;
pub mod server;
pub mod session;

pub use server::TealLanguageServer;
