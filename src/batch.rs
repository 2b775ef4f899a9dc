//! Partitioning of build tasks into numbered chunks

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Build action appended to each module identifier.
pub const BUILD_ACTION: &str = "assemble";

/// A bounded group of build tasks run by one CI job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based position of the chunk in the plan
    pub number: usize,
    pub modules: Vec<String>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Task string for one module, e.g. `:src:kotlin:foo:assembleRelease`.
///
/// `build_type` is interpolated verbatim.
pub fn task_label(identifier: &str, build_type: &str) -> String {
    format!("{}:{}{}", identifier, BUILD_ACTION, build_type)
}

/// Splits `tasks` into consecutive chunks of at most `chunk_size`, numbered from 1.
pub fn batch<I>(tasks: I, chunk_size: NonZeroUsize) -> Vec<Chunk>
where
    I: IntoIterator<Item = String>,
{
    let tasks: Vec<String> = tasks.into_iter().collect();

    tasks
        .chunks(chunk_size.get())
        .enumerate()
        .map(|(index, group)| Chunk {
            number: index + 1,
            modules: group.to_vec(),
        })
        .collect()
}
