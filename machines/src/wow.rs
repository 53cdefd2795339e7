use astrocade_core::core::address_map::{Access, AddressRange};
use astrocade_core::core::input::PortDef;
use astrocade_core::core::machine::Machine;

use crate::astrocade::*;
use crate::astrocade_maps::{PortMap, ProgramMap};
use crate::registry::MachineEntry;
use crate::rom_loader::{Checksums, RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Wizard of Wor ROM definitions
// ---------------------------------------------------------------------------

const fn rom(name: &'static str, offset: usize, crc32: u32) -> RomEntry {
    RomEntry {
        name,
        size: 0x1000,
        offset,
        crc32: Some(crc32),
    }
}

pub static WOW_MAINCPU: RomRegion = RomRegion {
    size: 0x10000,
    fill: 0x00,
    entries: &[
        rom("wow.x1", 0x0000, 0xc1295786),
        rom("wow.x2", 0x1000, 0x9be93215),
        rom("wow.x3", 0x2000, 0x75e5a22e),
        rom("wow.x4", 0x3000, 0xef28eb84),
        rom("wow.x5", 0x8000, 0x16912c2b),
        rom("wow.x6", 0x9000, 0x35797f82),
        rom("wow.x7", 0xa000, 0xce404305),
    ],
};

/// Same program with the German language ROM at C000.
pub static WOWG_MAINCPU: RomRegion = RomRegion {
    size: 0x10000,
    fill: 0x00,
    entries: &[
        rom("wow.x1", 0x0000, 0xc1295786),
        rom("wow.x2", 0x1000, 0x9be93215),
        rom("wow.x3", 0x2000, 0x75e5a22e),
        rom("wow.x4", 0x3000, 0xef28eb84),
        rom("wow.x5", 0x8000, 0x16912c2b),
        rom("wow.x6", 0x9000, 0x35797f82),
        rom("wow.x7", 0xa000, 0xce404305),
        rom("german.x11", 0xc000, 0x16f84d73),
    ],
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

static PORTS: [PortDef; 4] = [
    PortDef::new("P1HANDLE", 0xFF),
    PortDef::new("P2HANDLE", 0xEF),
    PortDef::new("P3HANDLE", 0x6F),
    PortDef::new("P4HANDLE", 0xEF),
];

// German ROM set defaults to the German language dip.
static WOWG_PORTS: [PortDef; 4] = [
    PortDef::new("P1HANDLE", 0xFF),
    PortDef::new("P2HANDLE", 0xEF),
    PortDef::new("P3HANDLE", 0x6F),
    PortDef::new("P4HANDLE", 0xE7),
];

// Button 2 (the "doubles" button) is active high.
static BUTTONS: [ButtonDef; 19] = [
    ButtonDef::low(INPUT_COIN1, "Coin 1", "P1HANDLE", 0x01),
    ButtonDef::low(INPUT_COIN2, "Coin 2", "P1HANDLE", 0x02),
    ButtonDef::low(INPUT_COIN3, "Coin 3", "P1HANDLE", 0x04),
    ButtonDef::low(INPUT_SERVICE, "Service", "P1HANDLE", 0x08),
    ButtonDef::low(INPUT_TILT, "Tilt", "P1HANDLE", 0x10),
    ButtonDef::low(INPUT_P1_START, "P1 Start", "P1HANDLE", 0x20),
    ButtonDef::low(INPUT_P2_START, "P2 Start", "P1HANDLE", 0x40),
    ButtonDef::low(INPUT_P1_UP, "P1 Up", "P3HANDLE", 0x01),
    ButtonDef::low(INPUT_P1_DOWN, "P1 Down", "P3HANDLE", 0x02),
    ButtonDef::low(INPUT_P1_LEFT, "P1 Left", "P3HANDLE", 0x04),
    ButtonDef::low(INPUT_P1_RIGHT, "P1 Right", "P3HANDLE", 0x08),
    ButtonDef::high(INPUT_P1_BUTTON2, "P1 Button 2", "P3HANDLE", 0x10),
    ButtonDef::low(INPUT_P1_BUTTON1, "P1 Fire", "P3HANDLE", 0x20),
    ButtonDef::low(INPUT_P2_UP, "P2 Up", "P2HANDLE", 0x01),
    ButtonDef::low(INPUT_P2_DOWN, "P2 Down", "P2HANDLE", 0x02),
    ButtonDef::low(INPUT_P2_LEFT, "P2 Left", "P2HANDLE", 0x04),
    ButtonDef::low(INPUT_P2_RIGHT, "P2 Right", "P2HANDLE", 0x08),
    ButtonDef::high(INPUT_P2_BUTTON2, "P2 Button 2", "P2HANDLE", 0x10),
    ButtonDef::low(INPUT_P2_BUTTON1, "P2 Fire", "P2HANDLE", 0x20),
];

// ---------------------------------------------------------------------------
// Address-decoded outputs
// ---------------------------------------------------------------------------

/// Port 15. The data byte is ignored: bit 8 of the offset is the level and
/// bits 9-11 pick the output. Always reads 0xFF.
pub(crate) fn io_r(board: &mut AstrocadeBoard, access: Access) -> u8 {
    let level = (access.offset >> 8) & 1 != 0;
    match (access.offset >> 9) & 7 {
        0 => board.outputs.set_coin_counter(0, level),
        1 => board.outputs.set_coin_counter(1, level),
        n @ 2..=5 => board.state.sparkle[n as usize - 2] = level,
        7 => board.outputs.set_coin_counter(2, level),
        _ => {}
    }
    0xFF
}

/// Port 17, shared with Gorf. The phoneme arrives in the high address byte;
/// it is latched for the speech collaborator and echoed back.
pub(crate) fn speech_r(board: &mut AstrocadeBoard, access: Access) -> u8 {
    let phoneme = (access.offset >> 8) as u8;
    board.speech.write(0, phoneme);
    phoneme
}

fn init(board: &mut AstrocadeBoard) {
    board.state.video_config =
        VideoConfig::SOUND_PRESENT | VideoConfig::LIGHTPEN_INTS | VideoConfig::STARS;
    board.io.install_read_handler(
        AddressRange::at(0x15).mirror(0xFF00).mask(0x0FFF),
        Handler::WowIo,
    );
    board.io.install_read_handler(
        AddressRange::at(0x17).mirror(0xFF00).mask(0xFFFF),
        Handler::Speech,
    );
}

pub static WOW: GameDef = GameDef {
    name: "wow",
    description: "Wizard of Wor",
    program_map: ProgramMap::Wow,
    port_map: PortMap::StereoPattern,
    maincpu: &WOW_MAINCPU,
    user1: None,
    user2: None,
    sub: None,
    ports: &PORTS,
    custom_inputs: &[],
    buttons: &BUTTONS,
    init,
    port_changed: None,
};

pub static WOWG: GameDef = GameDef {
    name: "wowg",
    description: "Wizard of Wor (with German Language ROM)",
    program_map: ProgramMap::Wow,
    port_map: PortMap::StereoPattern,
    maincpu: &WOWG_MAINCPU,
    user1: None,
    user2: None,
    sub: None,
    ports: &WOWG_PORTS,
    custom_inputs: &[],
    buttons: &BUTTONS,
    init,
    port_changed: None,
};

// ---------------------------------------------------------------------------
// Machine registry
// ---------------------------------------------------------------------------

fn create_wow(rom_set: &RomSet, checksums: Checksums) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(AstrocadeSystem::from_rom_set(&WOW, rom_set, checksums)?))
}

fn create_wowg(rom_set: &RomSet, checksums: Checksums) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(AstrocadeSystem::from_rom_set(&WOWG, rom_set, checksums)?))
}

inventory::submit! {
    MachineEntry::new("wow", "wow", "Wizard of Wor", create_wow)
}

inventory::submit! {
    MachineEntry::new("wowg", "wowg", "Wizard of Wor (with German Language ROM)", create_wowg)
}
