use datedine_common::{DateDineError, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::types::{Rating, RestaurantRecord};

const NAME_COLUMN: &str = "name";
const DESCRIPTION_COLUMN: &str = "description";
const ADDRESS_COLUMN: &str = "address";
const RATING_COLUMN: &str = "rating";

/// Column positions resolved from the header row
struct ColumnMap {
    name: usize,
    description: usize,
    address: Option<usize>,
    rating: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };

        let name = find(NAME_COLUMN)
            .ok_or_else(|| DateDineError::catalog_load("missing required column 'Name'"))?;
        let description = find(DESCRIPTION_COLUMN).ok_or_else(|| {
            DateDineError::catalog_load("missing required column 'Description'")
        })?;

        Ok(Self {
            name,
            description,
            address: find(ADDRESS_COLUMN),
            rating: find(RATING_COLUMN),
        })
    }
}

/// Catalog records and the SHA-256 hex digest of the bytes they were parsed from
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub records: Vec<RestaurantRecord>,
    pub digest: String,
}

/// Load the restaurant catalog from a CSV file
///
/// The file is read once; the digest identifies exactly the loaded content.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<LoadedCatalog> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        DateDineError::catalog_load(format!("cannot read {}: {}", path.display(), e))
    })?;

    let records = load_catalog_from_reader(bytes.as_slice())?;
    let digest = hex::encode(Sha256::digest(&bytes));
    info!(
        "Catalog loaded from {} - {} restaurants (sha256 {})",
        path.display(),
        records.len(),
        &digest[..12]
    );

    Ok(LoadedCatalog { records, digest })
}

/// Load the restaurant catalog from any CSV source
///
/// Row order determines record ids (0-based). `Name` and `Description` must
/// be present and non-empty on every row.
pub fn load_catalog_from_reader<R: Read>(reader: R) -> Result<Vec<RestaurantRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DateDineError::catalog_load(format!("unreadable header row: {}", e)))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();

    for (id, row) in reader.records().enumerate() {
        let row_number = id + 1;
        let row = row.map_err(|e| {
            DateDineError::catalog_load(format!("malformed row {}: {}", row_number, e))
        })?;

        let field = |index: usize| row.get(index).unwrap_or("").to_string();

        let name = field(columns.name);
        if name.is_empty() {
            return Err(DateDineError::catalog_load(format!(
                "row {} has an empty Name",
                row_number
            )));
        }

        let description = field(columns.description);
        if description.is_empty() {
            return Err(DateDineError::catalog_load(format!(
                "row {} ({}) has an empty Description",
                row_number, name
            )));
        }

        let address = columns.address.map(field).unwrap_or_default();
        let rating = match columns.rating {
            Some(index) => Rating::parse(&field(index)).map_err(|e| {
                DateDineError::catalog_load(format!("row {} ({}): {}", row_number, name, e))
            })?,
            None => Rating::Unknown,
        };

        records.push(RestaurantRecord {
            id,
            name,
            description,
            address,
            rating,
        });
    }

    if records.is_empty() {
        return Err(DateDineError::catalog_load("catalog contains no restaurants"));
    }

    debug!("Parsed {} catalog rows", records.len());
    Ok(records)
}
