//! Game registry for front-end discovery.
//!
//! Every Astrocade game self-registers via [`inventory::submit!`] with a
//! [`MachineEntry`] holding its CLI name, ROM set name, title, and a
//! factory. The front-end lists and looks up games at runtime without a
//! central table.

use astrocade_core::core::machine::Machine;

use crate::rom_loader::{Checksums, RomLoadError, RomSet};

/// Factory signature shared by every registered game.
pub type CreateFn = fn(&RomSet, Checksums) -> Result<Box<dyn Machine>, RomLoadError>;

/// Describes a front-end-capable game.
pub struct MachineEntry {
    /// CLI name used to select this game (e.g., "wow").
    pub name: &'static str,
    /// ROM set name for ZIP lookup. Clones share their parent's archive
    /// name only when the files are identical, so this usually equals `name`.
    pub rom_name: &'static str,
    /// Human-readable title shown by `--list`.
    pub description: &'static str,
    /// Factory: construct the game from a loaded ROM set.
    pub create: CreateFn,
}

impl MachineEntry {
    pub const fn new(
        name: &'static str,
        rom_name: &'static str,
        description: &'static str,
        create: CreateFn,
    ) -> Self {
        Self {
            name,
            rom_name,
            description,
            create,
        }
    }
}

inventory::collect!(MachineEntry);

/// Return all registered games, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a game by its CLI name.
pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name == name)
}
