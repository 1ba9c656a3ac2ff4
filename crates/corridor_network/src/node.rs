use serde::Serialize;

use crate::define_index_newtype;

define_index_newtype!(NodeIdx, Node);

/// An intersection.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Node {
    external_id: String,
}

impl Node {
    pub fn new(external_id: impl Into<String>) -> Self {
        Node {
            external_id: external_id.into(),
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }
}
