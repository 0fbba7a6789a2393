use std::collections::BTreeMap;

use crate::common::ChannelId;

/// Display names for collision channels. One registry is shared by all tiles
/// of a project; registration only ever adds or overwrites names.
#[derive(Clone, Default, Debug)]
pub struct CollisionChannelRegistry {
    names: BTreeMap<ChannelId, String>,
}

impl CollisionChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ChannelId, name: &str) {
        self.names.insert(id, name.to_string());
    }

    pub fn name(&self, id: ChannelId) -> Option<&str> {
        self.names.get(&id).map(|n| n.as_str())
    }

    pub fn names(&self) -> BTreeMap<ChannelId, String> {
        self.names.clone()
    }
}
