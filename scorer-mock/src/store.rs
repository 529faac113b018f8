/// In-memory asset store
///
/// Holds uploaded documents and their extracted text, keyed by generated
/// asset id. Stands in for the production upload directory.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub filename: String,
    pub extracted_text: String,
}

#[derive(Default)]
pub struct AssetStore {
    assets: RwLock<HashMap<String, StoredAsset>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an upload and return its generated asset id
    pub fn insert(&self, filename: String, extracted_text: String) -> String {
        let asset_id = Uuid::new_v4().to_string();
        self.assets.write().expect("store lock poisoned").insert(
            asset_id.clone(),
            StoredAsset {
                filename,
                extracted_text,
            },
        );
        asset_id
    }

    /// Extracted text for an asset id, if known
    pub fn extracted_text(&self, asset_id: &str) -> Option<String> {
        self.assets
            .read()
            .expect("store lock poisoned")
            .get(asset_id)
            .map(|asset| asset.extracted_text.clone())
    }

    /// Number of stored assets
    pub fn asset_count(&self) -> usize {
        self.assets.read().expect("store lock poisoned").len()
    }
}
