//! # SmartSimilar Catalog
//!
//! Glue between the storefront and the ranking engine:
//!
//! - [`parse`] - reads the tab-delimited catalog export into
//!   [`AttributeRecord`](smartsimilar_core::AttributeRecord)s
//! - [`sql`] - renders ranked results as the SQL payload the storefront
//!   database expects

pub mod error;
pub mod parse;
pub mod sql;

pub use error::{CatalogError, Result};
pub use parse::{detect_domain, parse_catalog, read_catalog, Catalog, RejectedRow};
pub use sql::{render_sql, SqlTarget};
