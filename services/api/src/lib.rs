//! services/api/src/lib.rs
//!
//! The HTTP service for contract risk analysis: configuration, adapters for the
//! LLM provider and document decoders, and the Axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
