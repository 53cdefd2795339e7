use astrocade_core::core::address_map::{Access, AddressRange};
use astrocade_core::core::input::PortDef;
use astrocade_core::core::machine::Machine;

use crate::astrocade::*;
use crate::astrocade_maps::{PortMap, ProgramMap};
use crate::registry::MachineEntry;
use crate::rom_loader::{Checksums, RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Space Zap ROM definitions
// ---------------------------------------------------------------------------

pub static SPACEZAP_MAINCPU: RomRegion = RomRegion {
    size: 0x4000,
    fill: 0x00,
    entries: &[
        RomEntry {
            name: "0662.01",
            size: 0x1000,
            offset: 0x0000,
            crc32: Some(0xa92de312),
        },
        RomEntry {
            name: "0663.xx",
            size: 0x1000,
            offset: 0x1000,
            crc32: Some(0x4836ebf1),
        },
        RomEntry {
            name: "0664.xx",
            size: 0x1000,
            offset: 0x2000,
            crc32: Some(0xd8193a80),
        },
        RomEntry {
            name: "0665.xx",
            size: 0x1000,
            offset: 0x3000,
            crc32: Some(0x3784228d),
        },
    ],
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

static PORTS: [PortDef; 5] = [
    PortDef::new("P1HANDLE", 0xFF),
    PortDef::new("P2HANDLE", 0xFF),
    PortDef::new("P3HANDLE", 0xFF),
    PortDef::new("P4HANDLE", 0x07),
    // Monitor type: 0 = B/W with colour overlay, 1 = colour.
    PortDef::new("FAKE", 0x00),
];

static BUTTONS: [ButtonDef; 16] = [
    ButtonDef::low(INPUT_COIN1, "Coin 1", "P1HANDLE", 0x01),
    ButtonDef::low(INPUT_COIN2, "Coin 2", "P1HANDLE", 0x02),
    ButtonDef::low(INPUT_TILT, "Tilt", "P1HANDLE", 0x04),
    ButtonDef::low(INPUT_SERVICE, "Service", "P1HANDLE", 0x08),
    ButtonDef::low(INPUT_P1_START, "P1 Start", "P1HANDLE", 0x10),
    ButtonDef::low(INPUT_P2_START, "P2 Start", "P1HANDLE", 0x20),
    ButtonDef::low(INPUT_P1_UP, "P1 Aim Up", "P3HANDLE", 0x01),
    ButtonDef::low(INPUT_P1_DOWN, "P1 Aim Down", "P3HANDLE", 0x02),
    ButtonDef::low(INPUT_P1_LEFT, "P1 Aim Left", "P3HANDLE", 0x04),
    ButtonDef::low(INPUT_P1_RIGHT, "P1 Aim Right", "P3HANDLE", 0x08),
    ButtonDef::low(INPUT_P1_BUTTON1, "P1 Fire", "P3HANDLE", 0x10),
    ButtonDef::low(INPUT_P2_UP, "P2 Aim Up", "P2HANDLE", 0x01),
    ButtonDef::low(INPUT_P2_DOWN, "P2 Aim Down", "P2HANDLE", 0x02),
    ButtonDef::low(INPUT_P2_LEFT, "P2 Aim Left", "P2HANDLE", 0x04),
    ButtonDef::low(INPUT_P2_RIGHT, "P2 Aim Right", "P2HANDLE", 0x08),
    ButtonDef::low(INPUT_P2_BUTTON1, "P2 Fire", "P2HANDLE", 0x10),
];

/// Port 13: coin counters from address bits 8 and 9, data from P3HANDLE.
pub(crate) fn io_r(board: &mut AstrocadeBoard, access: Access) -> u8 {
    board
        .outputs
        .set_coin_counter(0, (access.offset >> 8) & 1 != 0);
    board
        .outputs
        .set_coin_counter(1, (access.offset >> 9) & 1 != 0);
    board.inputs.get("P3HANDLE").unwrap_or(0xFF)
}

fn monitor_changed(board: &mut AstrocadeBoard, name: &str, value: u8) {
    if name != "FAKE" {
        return;
    }
    board
        .state
        .video_config
        .set(VideoConfig::MONITOR_BW, value == 0);
}

fn init(board: &mut AstrocadeBoard) {
    board.state.video_config = VideoConfig::SOUND_PRESENT | VideoConfig::MONITOR_BW;
    board.io.install_read_handler(
        AddressRange::at(0x13).mirror(0xFF00).mask(0x03FF),
        Handler::SpacezapIo,
    );
}

pub static SPACEZAP: GameDef = GameDef {
    name: "spacezap",
    description: "Space Zap",
    program_map: ProgramMap::Spacezap,
    port_map: PortMap::MonoPattern,
    maincpu: &SPACEZAP_MAINCPU,
    user1: None,
    user2: None,
    sub: None,
    ports: &PORTS,
    custom_inputs: &[],
    buttons: &BUTTONS,
    init,
    port_changed: Some(monitor_changed),
};

// ---------------------------------------------------------------------------
// Machine registry
// ---------------------------------------------------------------------------

fn create_machine(rom_set: &RomSet, checksums: Checksums) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(AstrocadeSystem::from_rom_set(&SPACEZAP, rom_set, checksums)?))
}

inventory::submit! {
    MachineEntry::new("spacezap", "spacezap", "Space Zap", create_machine)
}
