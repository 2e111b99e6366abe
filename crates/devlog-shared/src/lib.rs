//! # Devlog Shared
//!
//! Wire types shared by the API server and its clients.
//! This crate has no server dependencies so it can also be compiled for WASM.

pub mod dto;
pub mod response;

pub use response::{ApiMessage, ErrorResponse, PageResponse};
