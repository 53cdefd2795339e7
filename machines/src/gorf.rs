use astrocade_core::core::address_map::{Access, AddressRange};
use astrocade_core::core::input::PortDef;
use astrocade_core::core::machine::Machine;

use crate::astrocade::*;
use crate::astrocade_maps::{PortMap, ProgramMap};
use crate::registry::MachineEntry;
use crate::rom_loader::{Checksums, RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Gorf ROM definitions
// ---------------------------------------------------------------------------

const fn rom(name: &'static str, offset: usize, crc32: u32) -> RomEntry {
    RomEntry {
        name,
        size: 0x1000,
        offset,
        crc32: Some(crc32),
    }
}

pub static GORF_MAINCPU: RomRegion = RomRegion {
    size: 0x10000,
    fill: 0x00,
    entries: &[
        rom("gorf-a.bin", 0x0000, 0x5b348321),
        rom("gorf-b.bin", 0x1000, 0x62d6de77),
        rom("gorf-c.bin", 0x2000, 0x1d3bc9c9),
        rom("gorf-d.bin", 0x3000, 0x70046e56),
        rom("gorf-e.bin", 0x8000, 0x2d456eb5),
        rom("gorf-f.bin", 0x9000, 0xf7e4e155),
        rom("gorf-g.bin", 0xa000, 0x4e2bd9b9),
        rom("gorf-h.bin", 0xb000, 0xfe7b863d),
    ],
};

pub static GORFPGM1_MAINCPU: RomRegion = RomRegion {
    size: 0x10000,
    fill: 0x00,
    entries: &[
        rom("873a.x1", 0x0000, 0x97cb4a6a),
        rom("873b.x2", 0x1000, 0x257236f8),
        rom("873c.x3", 0x2000, 0x16b0638b),
        rom("873d.x4", 0x3000, 0xb5e821dc),
        rom("873e.x5", 0x8000, 0x8e82804b),
        rom("873f.x6", 0x9000, 0x715fb4d9),
        rom("873g.x7", 0xa000, 0x8a066456),
        rom("873h.x8", 0xb000, 0x56d40c7c),
    ],
};

pub static GORFPGM1G_MAINCPU: RomRegion = RomRegion {
    size: 0x10000,
    fill: 0x00,
    entries: &[
        rom("873a.x1", 0x0000, 0x97cb4a6a),
        rom("873b.x2", 0x1000, 0x257236f8),
        rom("873c.x3", 0x2000, 0x16b0638b),
        rom("873d.x4", 0x3000, 0xb5e821dc),
        rom("873e.x5", 0x8000, 0x8e82804b),
        rom("873f.x6", 0x9000, 0x715fb4d9),
        rom("873g.x7", 0xa000, 0x8a066456),
        rom("873h.x8", 0xb000, 0x56d40c7c),
        rom("german.x11", 0xc000, 0x3a3dbdcb),
    ],
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

static PORTS: [PortDef; 4] = [
    PortDef::new("P1HANDLE", 0xFF),
    PortDef::new("P2HANDLE", 0xFF),
    PortDef::new("P3HANDLE", 0x7F),
    PortDef::new("P4HANDLE", 0xEF),
];

static GERMAN_PORTS: [PortDef; 4] = [
    PortDef::new("P1HANDLE", 0xFF),
    PortDef::new("P2HANDLE", 0xFF),
    PortDef::new("P3HANDLE", 0x7F),
    PortDef::new("P4HANDLE", 0xE7),
];

static BUTTONS: [ButtonDef; 16] = [
    ButtonDef::low(INPUT_COIN1, "Coin 1", "P1HANDLE", 0x01),
    ButtonDef::low(INPUT_COIN2, "Coin 2", "P1HANDLE", 0x02),
    ButtonDef::low(INPUT_SERVICE, "Service", "P1HANDLE", 0x04),
    ButtonDef::low(INPUT_TILT, "Tilt", "P1HANDLE", 0x08),
    ButtonDef::low(INPUT_P1_START, "P1 Start", "P1HANDLE", 0x10),
    ButtonDef::low(INPUT_P2_START, "P2 Start", "P1HANDLE", 0x20),
    ButtonDef::low(INPUT_P1_UP, "P1 Up", "P3HANDLE", 0x01),
    ButtonDef::low(INPUT_P1_DOWN, "P1 Down", "P3HANDLE", 0x02),
    ButtonDef::low(INPUT_P1_LEFT, "P1 Left", "P3HANDLE", 0x04),
    ButtonDef::low(INPUT_P1_RIGHT, "P1 Right", "P3HANDLE", 0x08),
    ButtonDef::low(INPUT_P1_BUTTON1, "P1 Fire", "P3HANDLE", 0x10),
    ButtonDef::low(INPUT_P2_UP, "P2 Up", "P2HANDLE", 0x01),
    ButtonDef::low(INPUT_P2_DOWN, "P2 Down", "P2HANDLE", 0x02),
    ButtonDef::low(INPUT_P2_LEFT, "P2 Left", "P2HANDLE", 0x04),
    ButtonDef::low(INPUT_P2_RIGHT, "P2 Right", "P2HANDLE", 0x08),
    ButtonDef::low(INPUT_P2_BUTTON1, "P2 Fire", "P2HANDLE", 0x10),
];

// ---------------------------------------------------------------------------
// Address-decoded outputs
// ---------------------------------------------------------------------------

/// Port 15: as Wizard of Wor, plus select 6 which hands the audio mix
/// between the sound chip and the speech chip.
pub(crate) fn io_1_r(board: &mut AstrocadeBoard, access: Access) -> u8 {
    let level = (access.offset >> 8) & 1 != 0;
    match (access.offset >> 9) & 7 {
        0 => board.outputs.set_coin_counter(0, level),
        1 => board.outputs.set_coin_counter(1, level),
        n @ 2..=5 => board.state.sparkle[n as usize - 2] = level,
        6 => {
            board
                .outputs
                .set_sound_gain(0, if level { 0.0 } else { 1.0 });
            board.outputs.set_speech_gain(if level { 1.0 } else { 0.0 });
        }
        _ => log::debug!("gorf io_1: {}", u8::from(level)),
    }
    0xFF
}

/// Port 16: lamps 0-5.
pub(crate) fn io_2_r(board: &mut AstrocadeBoard, access: Access) -> u8 {
    let level = (access.offset >> 8) & 1 != 0;
    match (access.offset >> 9) & 7 {
        n @ 0..=5 => board.outputs.set_lamp(n as usize, level),
        6 => {}
        _ => log::debug!("gorf io_2: {}", u8::from(level)),
    }
    0xFF
}

fn init(board: &mut AstrocadeBoard) {
    board.state.video_config =
        VideoConfig::SOUND_PRESENT | VideoConfig::LIGHTPEN_INTS | VideoConfig::STARS;
    board.io.install_read_handler(
        AddressRange::at(0x15).mirror(0xFF00).mask(0x0FFF),
        Handler::GorfIo1,
    );
    board.io.install_read_handler(
        AddressRange::at(0x16).mirror(0xFF00).mask(0x0FFF),
        Handler::GorfIo2,
    );
    board.io.install_read_handler(
        AddressRange::at(0x17).mirror(0xFF00).mask(0xFFFF),
        Handler::Speech,
    );
}

pub static GORF: GameDef = GameDef {
    name: "gorf",
    description: "Gorf",
    program_map: ProgramMap::Wow,
    port_map: PortMap::StereoPattern,
    maincpu: &GORF_MAINCPU,
    user1: None,
    user2: None,
    sub: None,
    ports: &PORTS,
    custom_inputs: &[],
    buttons: &BUTTONS,
    init,
    port_changed: None,
};

pub static GORFPGM1: GameDef = GameDef {
    name: "gorfpgm1",
    description: "Gorf (program 1)",
    program_map: ProgramMap::Wow,
    port_map: PortMap::StereoPattern,
    maincpu: &GORFPGM1_MAINCPU,
    user1: None,
    user2: None,
    sub: None,
    ports: &PORTS,
    custom_inputs: &[],
    buttons: &BUTTONS,
    init,
    port_changed: None,
};

pub static GORFPGM1G: GameDef = GameDef {
    name: "gorfpgm1g",
    description: "Gorf (program 1, with German Language ROM)",
    program_map: ProgramMap::Wow,
    port_map: PortMap::StereoPattern,
    maincpu: &GORFPGM1G_MAINCPU,
    user1: None,
    user2: None,
    sub: None,
    ports: &GERMAN_PORTS,
    custom_inputs: &[],
    buttons: &BUTTONS,
    init,
    port_changed: None,
};

// ---------------------------------------------------------------------------
// Machine registry
// ---------------------------------------------------------------------------

fn create_gorf(rom_set: &RomSet, checksums: Checksums) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(AstrocadeSystem::from_rom_set(&GORF, rom_set, checksums)?))
}

fn create_gorfpgm1(
    rom_set: &RomSet,
    checksums: Checksums,
) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(AstrocadeSystem::from_rom_set(&GORFPGM1, rom_set, checksums)?))
}

fn create_gorfpgm1g(
    rom_set: &RomSet,
    checksums: Checksums,
) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(AstrocadeSystem::from_rom_set(&GORFPGM1G, rom_set, checksums)?))
}

inventory::submit! {
    MachineEntry::new("gorf", "gorf", "Gorf", create_gorf)
}

inventory::submit! {
    MachineEntry::new("gorfpgm1", "gorfpgm1", "Gorf (program 1)", create_gorfpgm1)
}

inventory::submit! {
    MachineEntry::new(
        "gorfpgm1g",
        "gorfpgm1g",
        "Gorf (program 1, with German Language ROM)",
        create_gorfpgm1g
    )
}
