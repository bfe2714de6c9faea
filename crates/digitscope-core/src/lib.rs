//! Core types, config, errors, and wire protocol for Digitscope.

pub mod config;
pub mod error;
pub mod protocol;
