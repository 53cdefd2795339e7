use astrocade_core::core::address_map::AddressRange;
use astrocade_core::core::input::PortDef;
use astrocade_core::core::machine::Machine;

use crate::astrocade::*;
use crate::astrocade_maps::{PortMap, ProgramMap};
use crate::registry::MachineEntry;
use crate::rom_loader::{Checksums, RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Extra Bases ROM definitions
// ---------------------------------------------------------------------------

pub static EBASES_MAINCPU: RomRegion = RomRegion {
    size: 0x4000,
    fill: 0x00,
    entries: &[
        RomEntry {
            name: "m761a",
            size: 0x1000,
            offset: 0x0000,
            crc32: Some(0x34422147),
        },
        RomEntry {
            name: "m761b",
            size: 0x1000,
            offset: 0x1000,
            crc32: Some(0x4f28dfd6),
        },
        RomEntry {
            name: "m761c",
            size: 0x1000,
            offset: 0x2000,
            crc32: Some(0xbff6c97e),
        },
        RomEntry {
            name: "m761d",
            size: 0x1000,
            offset: 0x3000,
            crc32: Some(0x5173781a),
        },
    ],
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

static PORTS: [PortDef; 8] = [
    PortDef::new("P1HANDLE", 0x33),
    PortDef::new("P2HANDLE", 0x07),
    PortDef::new("P3HANDLE", 0x00),
    PortDef::new("P4HANDLE", 0x00),
    PortDef::new("TRACKX1", 0x00),
    PortDef::new("TRACKY1", 0x00),
    PortDef::new("TRACKX2", 0x00),
    PortDef::new("TRACKY2", 0x00),
];

static CUSTOM_INPUTS: [(&str, CustomInput); 1] = [("P4HANDLE", CustomInput::EbasesTrackball)];

static BUTTONS: [ButtonDef; 7] = [
    ButtonDef::low(INPUT_COIN1, "Coin 1", "P2HANDLE", 0x01),
    ButtonDef::low(INPUT_COIN2, "Coin 2", "P2HANDLE", 0x02),
    ButtonDef::low(INPUT_TILT, "Tilt", "P2HANDLE", 0x04),
    ButtonDef::low(INPUT_P1_START, "P1 Start", "P1HANDLE", 0x10),
    ButtonDef::low(INPUT_P2_START, "P2 Start", "P1HANDLE", 0x20),
    ButtonDef::low(INPUT_P1_BUTTON1, "P1 Button", "P1HANDLE", 0x02),
    ButtonDef::low(INPUT_P2_BUTTON1, "P2 Button", "P1HANDLE", 0x01),
];

/// Trackball axes in multiplexer order.
const TRACKBALL_CHANNELS: [&str; 4] = ["TRACKX2", "TRACKY2", "TRACKX1", "TRACKY1"];

pub(crate) fn trackball_r(board: &AstrocadeBoard) -> u8 {
    let channel = TRACKBALL_CHANNELS[(board.state.input_select & 0x03) as usize];
    board.inputs.read(channel)
}

pub(crate) fn trackball_select_w(board: &mut AstrocadeBoard, data: u8) {
    board.state.input_select = data & 0x03;
}

pub(crate) fn coin_w(board: &mut AstrocadeBoard, data: u8) {
    board.outputs.set_coin_counter(0, data & 0x01 != 0);
}

fn init(board: &mut AstrocadeBoard) {
    board.state.video_config = VideoConfig::SOUND_PRESENT;
    board
        .io
        .install_write_handler(AddressRange::at(0x20).mirror(0xFF07), Handler::EbasesCoin);
    board.io.install_write_handler(
        AddressRange::at(0x28).mirror(0xFF07),
        Handler::EbasesTrackballSelect,
    );
}

pub static EBASES: GameDef = GameDef {
    name: "ebases",
    description: "Extra Bases",
    program_map: ProgramMap::Ebases,
    port_map: PortMap::Base,
    maincpu: &EBASES_MAINCPU,
    user1: None,
    user2: None,
    sub: None,
    ports: &PORTS,
    custom_inputs: &CUSTOM_INPUTS,
    buttons: &BUTTONS,
    init,
    port_changed: None,
};

// ---------------------------------------------------------------------------
// Machine registry
// ---------------------------------------------------------------------------

fn create_machine(rom_set: &RomSet, checksums: Checksums) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(AstrocadeSystem::from_rom_set(&EBASES, rom_set, checksums)?))
}

inventory::submit! {
    MachineEntry::new("ebases", "ebases", "Extra Bases", create_machine)
}
