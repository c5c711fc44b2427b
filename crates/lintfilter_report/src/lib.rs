//! # lintfilter_report
//!
//! Report model shared by the lintfilter crates.
//!
//! This crate provides:
//! - [`DiagnosticMessage`], one finding produced by a lint engine
//! - [`FileReport`], the engine's output for a single file
//! - [`result_severity`], which reduces a set of messages to a [`Severity`] band
//! - [`strip_ignored_file_notices`], which drops "file ignored" meta-messages
//!
//! ## Features
//!
//! - `rkyv`: derive zero-copy archive support, used by the persistent cache.

mod message;
mod notice;
mod report;
mod severity;

pub use message::{DiagnosticMessage, Level};
pub use notice::{is_ignored_file_notice, strip_ignored_file_notices};
pub use report::FileReport;
pub use severity::{Severity, result_severity};
