#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (claim sets and tokens), mocks.rs (scripted credential source).

pub mod fixtures;
pub mod mocks;

pub use mocks::ScriptedCredentialSource;
