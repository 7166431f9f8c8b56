use rust_embed::Embed;

use crate::engine::mastery::PracticeSet;
use crate::store::StoreError;

#[derive(Embed)]
#[folder = "assets/sets/"]
struct SetAssets;

/// Names of the practice sets compiled into the binary, sorted.
pub fn list_bundled() -> Vec<String> {
    let mut names: Vec<String> = SetAssets::iter()
        .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
        .collect();
    names.sort();
    names
}

pub fn load_bundled(name: &str) -> Result<PracticeSet, StoreError> {
    let filename = format!("{name}.json");
    let file = SetAssets::get(&filename).ok_or_else(|| StoreError::UnknownSet(name.to_string()))?;
    let content =
        std::str::from_utf8(file.data.as_ref()).map_err(|_| StoreError::Encoding(name.to_string()))?;
    serde_json::from_str(content).map_err(|source| StoreError::Parse {
        name: name.to_string(),
        source,
    })
}
