// Decoding, validation and combining of threshold secret-share requests
// Backs the secshsrv binary and the WASM bindings

#[cfg(feature = "cli")]
pub mod cli;
pub mod codec;
pub mod combine;
pub mod commands;
pub mod domain;
pub mod engine;
pub mod error;
pub mod listener;
pub mod render;
pub mod validator;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{RecoveryError, ShareError};
