//! Storefront catalog export parsing
//!
//! The export is tab-delimited text. Everything up to and including the line
//! containing `iblock_element_id` is header; the rows that follow are
//! products. An export mentioning `O_TYPE` anywhere describes medical frames,
//! otherwise sunglasses.
//!
//! Row layouts:
//!
//! ```text
//! sunglasses: sex  material  shape  color        id  name  brand
//! medical:    sex  material  shape  color  rim   id  name  brand
//! ```

use crate::error::{CatalogError, Result};
use smartsimilar_core::{AttributeRecord, Attributes, Domain};
use std::path::Path;
use tracing::{debug, warn};

const DATA_MARKER: &str = "iblock_element_id";
const MEDICAL_MARKER: &str = "O_TYPE";

/// A data row that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number in the export
    pub line: usize,
    pub reason: String,
}

/// Parsed export: accepted records plus the rows that were rejected
#[derive(Debug, Clone)]
pub struct Catalog {
    pub domain: Domain,
    pub records: Vec<AttributeRecord>,
    pub rejected: Vec<RejectedRow>,
}

/// Detect the product family of an export
pub fn detect_domain(text: &str) -> Domain {
    if text.contains(MEDICAL_MARKER) {
        Domain::Medical
    } else {
        Domain::Sunglasses
    }
}

/// Read and parse an export file
pub fn read_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)?;
    parse_catalog(&text)
}

/// Parse export text into records
///
/// Rows with an unexpected column count are skipped silently (blank lines,
/// trailers). Rows with malformed numbers or codes outside the domain
/// vocabulary are collected in [`Catalog::rejected`].
pub fn parse_catalog(text: &str) -> Result<Catalog> {
    let domain = detect_domain(text);
    let mut lines = text.split('\n').enumerate();

    if !lines.any(|(_, line)| line.contains(DATA_MARKER)) {
        return Err(CatalogError::MissingDataHeader);
    }

    let mut records = Vec::new();
    let mut rejected = Vec::new();

    for (index, line) in lines {
        let line_no = index + 1;
        let values: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();
        if values.len() != row_width(domain) {
            continue;
        }

        match parse_row(domain, &values) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!("Unprocessed row {}: {}", line_no, reason);
                rejected.push(RejectedRow { line: line_no, reason });
            }
        }
    }

    debug!(
        "Parsed {} {} records ({} rejected)",
        records.len(),
        domain,
        rejected.len()
    );

    Ok(Catalog {
        domain,
        records,
        rejected,
    })
}

fn row_width(domain: Domain) -> usize {
    // attribute codes, then id, name, brand
    domain.dimension_count() + 3
}

fn parse_row(domain: Domain, values: &[&str]) -> std::result::Result<AttributeRecord, String> {
    let dims = domain.dimension_count();
    let mut codes = [0u32; smartsimilar_core::MAX_DIMENSIONS];
    for (slot, (model, raw)) in codes.iter_mut().zip(domain.dimensions().iter().zip(values)) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid {} code '{}'", model.dimension, raw.trim()))?;
    }

    let id: u64 = values[dims]
        .trim()
        .parse()
        .map_err(|_| format!("invalid id '{}'", values[dims].trim()))?;

    let attributes = match domain {
        Domain::Sunglasses => Attributes::Sunglasses {
            sex: codes[0],
            material: codes[1],
            shape: codes[2],
            color: codes[3],
        },
        Domain::Medical => Attributes::Medical {
            sex: codes[0],
            material: codes[1],
            shape: codes[2],
            color: codes[3],
            rim: codes[4],
        },
    };
    attributes.encode().map_err(|e| e.to_string())?;

    Ok(AttributeRecord::new(
        id,
        values[dims + 1].trim(),
        values[dims + 2].trim(),
        attributes,
    ))
}
