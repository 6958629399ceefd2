use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog export has no data header line (expected a line containing 'iblock_element_id')")]
    MissingDataHeader,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
