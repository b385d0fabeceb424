//! Version catalog layer
//!
//! This module discovers the versions of a tool from its remote repository,
//! keeps the relevant ones, orders them and resolves "latest".
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  TagSource  │────▶│  TagFilter  │────▶│  Ordering   │
//! │ (list tags) │     │  (relevant) │     │   (sort)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐                         ┌─────────────┐
//! │   Sources   │                         │   Catalog   │◀── LatestResolver
//! │ (http, git) │                         │  (resolve)  │
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: Ties source, filter and resolver together for one tool
//! - [`error`]: Error types for listing and resolution
//! - [`filter`]: Tool-specific tag inclusion predicates
//! - [`ordering`]: Version comparison key and sort
//! - [`resolver`]: Trait for "latest release" resolution
//! - [`resolvers`]: Concrete resolvers (release page redirect)
//! - [`source`]: Trait for listing remote tags
//! - [`sources`]: Concrete sources (smart HTTP, git command)
//! - [`types`]: `VersionTag` and `VersionSet`

pub mod catalog;
pub mod error;
pub mod filter;
pub mod ordering;
pub mod resolver;
pub mod resolvers;
pub mod source;
pub mod sources;
pub mod types;
