use astrocade_core::core::address_map::{Access, AddressRange};
use astrocade_core::core::input::PortDef;
use astrocade_core::core::machine::Machine;

use crate::astrocade::*;
use crate::astrocade_maps::{PortMap, ProgramMap};
use crate::registry::MachineEntry;
use crate::rom_loader::{Checksums, RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Professor Pac-Man ROM definitions
//
// The PLS153 decoder PLDs on the CPU, EPROM, game and screen boards are not
// loaded: their logic is expressed by the address maps.
// ---------------------------------------------------------------------------

const fn rom(name: &'static str, offset: usize, size: usize, crc32: u32) -> RomEntry {
    RomEntry {
        name,
        size,
        offset,
        crc32: Some(crc32),
    }
}

pub static PROFPAC_MAINCPU: RomRegion = RomRegion {
    size: 0x10000,
    fill: 0x00,
    entries: &[
        rom("pps1", 0x0000, 0x2000, 0xa244a62d),
        rom("pps2", 0x2000, 0x2000, 0x8a9a6653),
        rom("pps9", 0xc000, 0x2000, 0x17a0b418),
    ],
};

/// Banked ROM behind the 4000-BFFF window, four 32K pages.
pub static PROFPAC_USER1: RomRegion = RomRegion {
    size: 0x20000,
    fill: 0xFF,
    entries: &[
        rom("pps3", 0x04000, 0x2000, 0x15717fd8),
        rom("pps4", 0x06000, 0x2000, 0x36540598),
        rom("pps5", 0x08000, 0x2000, 0x8dc89a59),
        rom("pps6", 0x0a000, 0x2000, 0x5a2186c3),
        rom("pps7", 0x0c000, 0x2000, 0xf9c26aba),
        rom("pps8", 0x0e000, 0x2000, 0x4d201e41),
    ],
};

/// 640K EPROM expansion board, 16K pages mapped over 4000-7FFF.
pub static PROFPAC_USER2: RomRegion = RomRegion {
    size: 0xa0000,
    fill: 0xFF,
    entries: &[
        rom("ppq1", 0x00000, 0x4000, 0xdddc2ccc),
        rom("ppq2", 0x04000, 0x4000, 0x33bbcabe),
        rom("ppq3", 0x08000, 0x4000, 0x3534d895),
        rom("ppq4", 0x0c000, 0x4000, 0x17e3581d),
        rom("ppq5", 0x10000, 0x4000, 0x80882a93),
        rom("ppq6", 0x14000, 0x4000, 0xe5ddaee5),
        rom("ppq7", 0x18000, 0x4000, 0xc029cd34),
        rom("ppq8", 0x1c000, 0x4000, 0xfb3a1ac9),
        rom("ppq9", 0x20000, 0x4000, 0x5e944488),
        rom("ppq10", 0x24000, 0x4000, 0xed72a81f),
        rom("ppq11", 0x28000, 0x4000, 0x98295020),
        rom("ppq12", 0x2c000, 0x4000, 0xe01a8dbe),
        rom("ppq13", 0x30000, 0x4000, 0x87165d4f),
        rom("ppq14", 0x34000, 0x4000, 0xecb861de),
    ],
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

static PORTS: [PortDef; 4] = [
    PortDef::new("P1HANDLE", 0x3F),
    PortDef::new("P2HANDLE", 0x77),
    PortDef::new("P3HANDLE", 0x00),
    PortDef::new("P4HANDLE", 0x03),
];

// Each player has three buttons, A-C, with a lamp behind each.
static BUTTONS: [ButtonDef; 12] = [
    ButtonDef::low(INPUT_COIN1, "Coin 1", "P1HANDLE", 0x01),
    ButtonDef::low(INPUT_COIN2, "Coin 2", "P1HANDLE", 0x02),
    ButtonDef::low(INPUT_SERVICE, "Service", "P1HANDLE", 0x04),
    ButtonDef::low(INPUT_TILT, "Tilt", "P1HANDLE", 0x08),
    ButtonDef::low(INPUT_P1_START, "P1 Start", "P1HANDLE", 0x10),
    ButtonDef::low(INPUT_P2_START, "P2 Start", "P1HANDLE", 0x20),
    ButtonDef::low(INPUT_P1_BUTTON1, "Right A", "P2HANDLE", 0x10),
    ButtonDef::low(INPUT_P1_BUTTON2, "Right B", "P2HANDLE", 0x20),
    ButtonDef::low(INPUT_P1_BUTTON3, "Right C", "P2HANDLE", 0x40),
    ButtonDef::low(INPUT_P2_BUTTON1, "Left A", "P2HANDLE", 0x01),
    ButtonDef::low(INPUT_P2_BUTTON2, "Left B", "P2HANDLE", 0x02),
    ButtonDef::low(INPUT_P2_BUTTON3, "Left C", "P2HANDLE", 0x04),
];

/// Port 14: coin counters from bits 8-9, LEDs from bits 10-11.
pub(crate) fn io_1_r(board: &mut AstrocadeBoard, access: Access) -> u8 {
    let bit = |n: u16| (access.offset >> n) & 1 != 0;
    board.outputs.set_coin_counter(0, bit(8));
    board.outputs.set_coin_counter(1, bit(9));
    board.outputs.set_led(0, bit(10));
    board.outputs.set_led(1, bit(11));
    0xFF
}

/// Offset bit driving each button lamp: left A-C, then right A-C.
const LAMP_BITS: [u16; 6] = [8, 9, 10, 12, 13, 14];

/// Port 15: button lamps.
pub(crate) fn io_2_r(board: &mut AstrocadeBoard, access: Access) -> u8 {
    for (lamp, bit) in LAMP_BITS.into_iter().enumerate() {
        board
            .outputs
            .set_lamp(lamp, (access.offset >> bit) & 1 != 0);
    }
    0xFF
}

fn init(board: &mut AstrocadeBoard) {
    board.state.video_config = VideoConfig::SOUND_PRESENT;
    board.io.install_read_handler(
        AddressRange::at(0x14).mirror(0xFF00).mask(0x0FFF),
        Handler::ProfpacIo1,
    );
    board.io.install_read_handler(
        AddressRange::at(0x15).mirror(0xFF00).mask(0x77FF),
        Handler::ProfpacIo2,
    );

    board.profpac_banksw_w(0);
    board.register_post_load(PostLoadHook::RestoreBanking);
}

pub static PROFPAC: GameDef = GameDef {
    name: "profpac",
    description: "Professor Pac-Man",
    program_map: ProgramMap::Profpac,
    port_map: PortMap::Color16Pattern,
    maincpu: &PROFPAC_MAINCPU,
    user1: Some(&PROFPAC_USER1),
    user2: Some(&PROFPAC_USER2),
    sub: None,
    ports: &PORTS,
    custom_inputs: &[],
    buttons: &BUTTONS,
    init,
    port_changed: None,
};

// ---------------------------------------------------------------------------
// Machine registry
// ---------------------------------------------------------------------------

fn create_machine(rom_set: &RomSet, checksums: Checksums) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(AstrocadeSystem::from_rom_set(&PROFPAC, rom_set, checksums)?))
}

inventory::submit! {
    MachineEntry::new("profpac", "profpac", "Professor Pac-Man", create_machine)
}
