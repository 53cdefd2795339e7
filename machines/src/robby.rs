use astrocade_core::core::address_map::{Access, AddressRange};
use astrocade_core::core::input::PortDef;
use astrocade_core::core::machine::Machine;

use crate::astrocade::*;
use crate::astrocade_maps::{PortMap, ProgramMap};
use crate::registry::MachineEntry;
use crate::rom_loader::{Checksums, RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Robby Roto ROM definitions
// ---------------------------------------------------------------------------

const fn rom(name: &'static str, offset: usize, crc32: u32) -> RomEntry {
    RomEntry {
        name,
        size: 0x1000,
        offset,
        crc32: Some(crc32),
    }
}

pub static ROBBY_MAINCPU: RomRegion = RomRegion {
    size: 0x10000,
    fill: 0x00,
    entries: &[
        rom("rotox1.bin", 0x0000, 0xa431b85a),
        rom("rotox2.bin", 0x1000, 0x33cdda83),
        rom("rotox3.bin", 0x2000, 0xdbf97491),
        rom("rotox4.bin", 0x3000, 0xa3b90ac8),
        rom("rotox5.bin", 0x8000, 0x46ae8a94),
        rom("rotox6.bin", 0x9000, 0x7916b730),
        rom("rotox7.bin", 0xa000, 0x276dc4a5),
        rom("rotox8.bin", 0xb000, 0x1ef13457),
        rom("rotox9.bin", 0xc000, 0x370352bf),
        rom("rotox10.bin", 0xd000, 0xe762cbda),
    ],
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

static PORTS: [PortDef; 4] = [
    PortDef::new("P1HANDLE", 0x7F),
    PortDef::new("P2HANDLE", 0xFF),
    PortDef::new("P3HANDLE", 0xFF),
    PortDef::new("P4HANDLE", 0x8F),
];

static BUTTONS: [ButtonDef; 17] = [
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
    ButtonDef::low(INPUT_P1_BUTTON1, "P1 Button", "P3HANDLE", 0x20),
    ButtonDef::low(INPUT_P2_UP, "P2 Up", "P2HANDLE", 0x01),
    ButtonDef::low(INPUT_P2_DOWN, "P2 Down", "P2HANDLE", 0x02),
    ButtonDef::low(INPUT_P2_LEFT, "P2 Left", "P2HANDLE", 0x04),
    ButtonDef::low(INPUT_P2_RIGHT, "P2 Right", "P2HANDLE", 0x08),
    ButtonDef::low(INPUT_P2_BUTTON1, "P2 Button", "P2HANDLE", 0x20),
];

/// Port 15: coin counters 0-2 and the two start-button LEDs.
pub(crate) fn io_r(board: &mut AstrocadeBoard, access: Access) -> u8 {
    let level = (access.offset >> 8) & 1 != 0;
    match (access.offset >> 9) & 7 {
        n @ 0..=2 => board.outputs.set_coin_counter(n as usize, level),
        6 => board.outputs.set_led(0, level),
        7 => board.outputs.set_led(1, level),
        _ => {}
    }
    0xFF
}

fn init(board: &mut AstrocadeBoard) {
    board.state.video_config = VideoConfig::SOUND_PRESENT;
    board.io.install_read_handler(
        AddressRange::at(0x15).mirror(0xFF00).mask(0x0FFF),
        Handler::RobbyIo,
    );
}

pub static ROBBY: GameDef = GameDef {
    name: "robby",
    description: "Robby Roto",
    program_map: ProgramMap::Robby,
    port_map: PortMap::StereoPattern,
    maincpu: &ROBBY_MAINCPU,
    user1: None,
    user2: None,
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
    Ok(Box::new(AstrocadeSystem::from_rom_set(&ROBBY, rom_set, checksums)?))
}

inventory::submit! {
    MachineEntry::new("robby", "robby", "Robby Roto", create_machine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leds_on_selects_six_and_seven() {
        let mut sys = AstrocadeSystem::new(&ROBBY);
        sys.board_mut().io_read(0x0D15);
        sys.board_mut().io_read(0x0F15);
        assert!(sys.board().outputs().led(0));
        assert!(sys.board().outputs().led(1));
        sys.board_mut().io_read(0x0E15);
        assert!(!sys.board().outputs().led(1));
    }
}
