use crate::fs::DirEntry;

/// Entry filter applied at both levels of the discovery walk
///
/// The default accepts everything, matching a plain directory listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryFilter {
    /// Skip entries whose name starts with `.`
    pub skip_hidden: bool,
    /// Skip anything that is not a directory
    pub directories_only: bool,
}

impl DiscoveryFilter {
    pub fn accepts(&self, entry: &DirEntry) -> bool {
        if self.skip_hidden && entry.is_hidden() {
            return false;
        }
        if self.directories_only && !entry.is_dir() {
            return false;
        }
        true
    }
}
