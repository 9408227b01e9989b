//! Saveguard core — exposes modules for integration testing and embedding.
//!
//! A GUI front end links this library, drives the same services the CLI
//! does, and observes progress by subscribing to an
//! [`output::LogStream`].

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
