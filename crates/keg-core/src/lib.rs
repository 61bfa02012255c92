//! keg-core: recipe-driven fetch/verify/install/test pipeline.
//!
//! A [`recipe::Recipe`] describes one installable package version: where its
//! release archive lives, the SHA-256 it must hash to, which files go where,
//! and which self-checks prove the install works. [`pipeline::run`] drives a
//! single recipe through the sequential stages
//! `Fetching -> Verifying -> Installing -> Testing`.

pub mod caveat;
pub mod checksum;
pub mod config;
pub mod fetch;
pub mod harness;
pub mod install;
pub mod logging;
pub mod pipeline;
pub mod recipe;
pub mod retry;
