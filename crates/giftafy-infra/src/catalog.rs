//! Loads the local gift catalog from its configured source.

use giftafy_core::search::catalog::{CatalogDocument, GiftCatalog};
use giftafy_types::config::CatalogSource;
use giftafy_types::error::CatalogError;

/// Build the catalog named by `source`.
///
/// `Builtin` never fails. `File` reads a JSON [`CatalogDocument`]
/// (`{"baseline": [...], "bonusGroups": [...]}`) and validates every item.
pub async fn load_catalog(source: &CatalogSource) -> Result<GiftCatalog, CatalogError> {
    match source {
        CatalogSource::Builtin => Ok(GiftCatalog::builtin()),
        CatalogSource::File(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
            let document = parse_catalog_document(&content)?;
            let catalog = GiftCatalog::new(document)?;
            tracing::info!(
                path = %path.display(),
                items = catalog.items().count(),
                "loaded gift catalog"
            );
            Ok(catalog)
        }
    }
}

pub fn parse_catalog_document(content: &str) -> Result<CatalogDocument, CatalogError> {
    serde_json::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))
}
