#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Operator CLI for the tenant dashboard gateway.
//!
//! Layout:
//! - `cli.rs`: clap definitions, logging setup, and routing to handlers
//! - `commands/`: one module per resource plus session commands
//! - `client.rs`: session/mediator context, exit tiers, outcome mapping
//! - `credentials.rs`: tokens from flags or `T4G_*` variables as a credential source
//! - `output.rs`: JSON and table rendering
//! - `main.rs`: calls [`run`] and exits with its status

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod credentials;
pub(crate) mod output;

pub use cli::run;
