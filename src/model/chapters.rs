use std::collections::BTreeMap;

use crate::{
    foundation::error::{ConstellationError, ConstellationResult},
    model::snapshot::Snapshot,
};

const BUNDLED_CHAPTERS: &str = include_str!("../../data/chapters.json");

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
/// Static mapping from chapter id to its target [`Snapshot`].
///
/// The engine only ever reads from a chapter set.
pub struct ChapterSet {
    /// Snapshots keyed by chapter id.
    pub chapters: BTreeMap<String, Snapshot>,
}

impl ChapterSet {
    /// Build a validated chapter set from `(id, snapshot)` pairs.
    pub fn new(
        chapters: impl IntoIterator<Item = (String, Snapshot)>,
    ) -> ConstellationResult<Self> {
        let set = Self {
            chapters: chapters.into_iter().collect(),
        };
        set.validate()?;
        Ok(set)
    }

    /// Parse and validate a chapter set from JSON.
    pub fn from_json(json: &str) -> ConstellationResult<Self> {
        let set: Self = serde_json::from_str(json)?;
        set.validate()?;
        Ok(set)
    }

    /// The git tutorial dataset shipped with the crate.
    pub fn bundled() -> ConstellationResult<Self> {
        Self::from_json(BUNDLED_CHAPTERS)
    }

    /// Validate every snapshot, prefixing errors with the chapter id.
    pub fn validate(&self) -> ConstellationResult<()> {
        for (id, snapshot) in &self.chapters {
            snapshot.validate().map_err(|err| {
                ConstellationError::validation(format!("chapter '{id}': {err}"))
            })?;
        }
        Ok(())
    }

    /// Look up a chapter snapshot.
    pub fn get(&self, id: &str) -> Option<&Snapshot> {
        self.chapters.get(id)
    }

    /// Chapter ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.chapters.keys().map(String::as_str)
    }

    /// Number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// `true` when no chapter is defined.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/chapters.rs"]
mod tests;
