//! Shared test utilities for the git-sftp-mirror workspace.
//!
//! This crate provides standardised git fixtures so crate test suites do
//! not each reimplement repository setup. It is a dev-dependency only.
//!
//! # Modules
//!
//! - [`git`] — single repository fixtures
//! - [`repo`] — [`PullFixture`] with an upstream repository and a clone

pub mod git;
pub mod repo;

pub use repo::PullFixture;
