pub mod bundled;
pub mod json_store;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no bundled practice set named {0:?}")]
    UnknownSet(String),

    #[error("practice set {name:?} is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("practice set id {0:?} is not a plain file name")]
    InvalidSetId(String),

    #[error("practice set {0:?} is not valid UTF-8")]
    Encoding(String),

    #[error("no stored entity {entity_id:?} in group {group_id:?} of set {set_id:?}")]
    MissingEntity {
        set_id: String,
        group_id: String,
        entity_id: String,
    },
}
