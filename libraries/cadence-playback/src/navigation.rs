//! Sequencing domain for next/previous
//!
//! The domain is the ordered list of songs that next/previous walk through:
//! the whole library, or the active playlist with dangling entries dropped.
//! It is resolved on demand and never stored by the controller.

use crate::types::ListContext;
use cadence_core::SongId;
use cadence_library::Library;

/// Direction of a sequencing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Ordered candidate songs for next/previous
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Domain {
    ids: Vec<SongId>,
}

impl Domain {
    /// Resolve the domain for a list context
    ///
    /// An unknown playlist resolves to an empty domain.
    pub fn resolve(library: &Library, context: &ListContext) -> Self {
        let ids = match context {
            ListContext::Library => library.songs().iter().map(|song| song.id.clone()).collect(),
            ListContext::Playlist(playlist_id) => library
                .playlist(playlist_id)
                .map(|playlist| {
                    playlist
                        .songs
                        .iter()
                        .filter(|id| library.song(id).is_some())
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
        };
        Self { ids }
    }

    /// Build a domain from ids directly
    pub fn from_ids(ids: Vec<SongId>) -> Self {
        Self { ids }
    }

    /// Song ids in order (duplicates preserved)
    pub fn ids(&self) -> &[SongId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Id at a position
    pub fn get(&self, index: usize) -> Option<&SongId> {
        self.ids.get(index)
    }

    /// Find the position of `current`
    ///
    /// A playlist may list a song more than once. `hint` is the position the
    /// controller last played from; it wins when it still holds `current`,
    /// otherwise the first occurrence is used.
    pub fn locate(&self, current: &SongId, hint: Option<usize>) -> Option<usize> {
        if let Some(index) = hint {
            if self.ids.get(index) == Some(current) {
                return Some(index);
            }
        }
        self.ids.iter().position(|id| id == current)
    }

    /// Cyclic step from `index`
    ///
    /// Returns `None` for an empty domain.
    pub fn step(&self, index: usize, direction: Direction) -> Option<usize> {
        step_index(index, self.ids.len(), direction)
    }
}

/// `(i + 1) % n` or `(i - 1 + n) % n`
pub fn step_index(index: usize, len: usize, direction: Direction) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let index = index % len;
    Some(match direction {
        Direction::Next => (index + 1) % len,
        Direction::Previous => (index + len - 1) % len,
    })
}
