//! `license-verify` — check a license corpus against external approval lists.
//!
//! # Flow
//! 1. Load settings ([`config::load_config`]).
//! 2. Load the corpus and its rule/field schema from a [`corpus::ContentSource`].
//! 3. Fetch each authority's list once through the [`cache::AuthorityCache`]
//!    ([`authority::spdx`], [`authority::fsf`], [`authority::open_definition`]).
//! 4. Reconcile records against those lists and the schema
//!    ([`reconcile::Reconciler::verify`]), yielding [`models::Discrepancy`] values.
//!
//! Every identifier and name comparison goes through [`normalize::normalize`].

pub mod authority;
pub mod cache;
pub mod config;
pub mod corpus;
pub mod error;
pub mod models;
pub mod normalize;
pub mod reconcile;

pub use error::{Error, Result};
