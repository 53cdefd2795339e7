#![allow(dead_code)]

use astrocade_machines::astrocade::{AstrocadeSystem, GameDef};
use astrocade_machines::rom_loader::{Checksums, RomRegion, RomSet};

/// Deterministic byte for `addr` within a region. `salt` keeps regions
/// distinguishable from each other.
pub fn pattern(salt: u8, addr: usize) -> u8 {
    (addr as u8) ^ ((addr >> 8) as u8).rotate_left(3) ^ ((addr >> 16) as u8) ^ salt
}

pub const MAINCPU_SALT: u8 = 0x10;
pub const USER1_SALT: u8 = 0x20;
pub const USER2_SALT: u8 = 0x30;
pub const SUB_SALT: u8 = 0x40;

fn regions(def: &GameDef) -> [(u8, Option<&'static RomRegion>); 4] {
    [
        (MAINCPU_SALT, Some(def.maincpu)),
        (USER1_SALT, def.user1),
        (USER2_SALT, def.user2),
        (SUB_SALT, def.sub),
    ]
}

/// A ROM set with every file the game needs, filled with [`pattern`] bytes
/// keyed on the file's position in its region.
pub fn synthetic_rom_set(def: &GameDef) -> RomSet {
    let mut files = Vec::new();
    for (salt, region) in regions(def) {
        let Some(region) = region else { continue };
        for entry in region.entries {
            let data = (0..entry.size)
                .map(|i| pattern(salt, entry.offset + i))
                .collect();
            files.push((entry.name.to_string(), data));
        }
    }
    RomSet::from_entries(files)
}

/// Build the game from a synthetic ROM set (checksums skipped).
pub fn boot(def: &'static GameDef) -> AstrocadeSystem {
    AstrocadeSystem::from_rom_set(def, &synthetic_rom_set(def), Checksums::Skip)
        .expect("synthetic ROM set should load")
}

/// The assembled image of one region, as the board sees it.
pub fn region_image(def: &GameDef, region: &RomRegion) -> Vec<u8> {
    region
        .load_with(&synthetic_rom_set(def), Checksums::Skip)
        .expect("synthetic region should load")
}
