//! A typed, header-aware tabular data codec with an optional per-row
//! encryption transport.
//!
//! The pipeline a caller drives is: a [`dialect::Dialect`] describes the
//! lexical shape of the document; [`parser::parse_table`] turns a
//! [`resource::LineSource`] of physical lines into a [`table::Table`] of
//! typed [`record::Record`] values; [`render::render_table`] (or
//! [`render::write_table`]) turns a `Table` back into text. The
//! [`crypto`] module layers a per-row AES-128-CTR transport on top of the
//! same record framework for callers that need encrypted-at-rest rows.
//! [`parser::parse_generic_table`] is the untyped counterpart of
//! `parse_table`, producing [`generic::CellRow`] rows for callers that
//! don't want to declare a `Record` up front.
//!
//! This crate has no CLI surface of its own; embedding binaries may call
//! [`init_logging`] once at startup to get the same `env_logger` setup this
//! crate's own tests and examples assume.

pub mod crypto;
pub mod dialect;
pub mod error;
pub mod generic;
pub mod header;
pub mod lexer;
pub mod parser;
pub mod record;
pub mod render;
pub mod resource;
pub mod row;
pub mod table;
pub mod value;

use std::env;
use std::sync::OnceLock;

use log::LevelFilter;

static LOGGER: OnceLock<()> = OnceLock::new();

/// Initializes `env_logger` once, defaulting this crate's own log target to
/// `Info` when `RUST_LOG` is unset. Idempotent; safe to call from a host
/// binary's `main` or from multiple test harnesses in the same process.
pub fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("tablecodec", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}
