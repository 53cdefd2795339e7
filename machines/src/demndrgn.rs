use astrocade_core::core::address_map::{Access, AddressRange};
use astrocade_core::core::input::PortDef;
use astrocade_core::core::machine::Machine;

use crate::astrocade::*;
use crate::astrocade_maps::{PortMap, ProgramMap};
use crate::registry::MachineEntry;
use crate::rom_loader::{Checksums, RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Demons & Dragons ROM definitions
// ---------------------------------------------------------------------------

const fn rom(name: &'static str, offset: usize, crc32: u32) -> RomEntry {
    RomEntry {
        name,
        size: 0x2000,
        offset,
        crc32: Some(crc32),
    }
}

pub static DEMNDRGN_MAINCPU: RomRegion = RomRegion {
    size: 0x10000,
    fill: 0x00,
    entries: &[
        rom("dd-x1.bin", 0x0000, 0x9aeaf79e),
        rom("dd-x2.bin", 0x2000, 0x0c63b624),
        rom("dd-x9.bin", 0xc000, 0x3792d632),
    ],
};

pub static DEMNDRGN_USER1: RomRegion = RomRegion {
    size: 0x20000,
    fill: 0xFF,
    entries: &[
        rom("dd-x5.bin", 0x08000, 0xe377e831),
        rom("dd-x6.bin", 0x0a000, 0x0fcb46ad),
        rom("dd-x7.bin", 0x0c000, 0x0675e4fa),
        rom("dd-x10.bin", 0x10000, 0x4a22c4f9),
        rom("dd-x11.bin", 0x12000, 0xd3158845),
        rom("dd-x12.bin", 0x14000, 0x592c1d9a),
        rom("dd-x13.bin", 0x16000, 0x492d7b7e),
        rom("dd-x14.bin", 0x18000, 0x7843c818),
        rom("dd-x15.bin", 0x1a000, 0x6e6bc1b6),
        rom("dd-x16.bin", 0x1c000, 0x7a4a343b),
    ],
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

static PORTS: [PortDef; 8] = [
    PortDef::new("P1HANDLE", 0xFF),
    PortDef::new("P2HANDLE", 0x00),
    PortDef::new("P3HANDLE", 0x00),
    PortDef::new("P4HANDLE", 0x00),
    PortDef::new("MOVEX", 0x00),
    PortDef::new("MOVEY", 0x00),
    PortDef::new("FIREX", 0x80),
    PortDef::new("FIREY", 0x80),
];

static CUSTOM_INPUTS: [(&str, CustomInput); 1] = [("P2HANDLE", CustomInput::DemndrgnJoystick)];

static BUTTONS: [ButtonDef; 6] = [
    ButtonDef::low(INPUT_COIN1, "Coin 1", "P1HANDLE", 0x01),
    ButtonDef::low(INPUT_COIN2, "Coin 2", "P1HANDLE", 0x02),
    ButtonDef::low(INPUT_SERVICE, "Service", "P1HANDLE", 0x04),
    ButtonDef::low(INPUT_TILT, "Tilt", "P1HANDLE", 0x08),
    ButtonDef::low(INPUT_P1_START, "P1 Start", "P1HANDLE", 0x10),
    ButtonDef::low(INPUT_P2_START, "P2 Start", "P1HANDLE", 0x20),
];

/// Movement trackball axes, picked by the select bit latched in `io_r`.
const MOVE_CHANNELS: [&str; 2] = ["MOVEX", "MOVEY"];

pub(crate) fn joystick_r(board: &AstrocadeBoard) -> u8 {
    board
        .inputs
        .read(MOVE_CHANNELS[(board.state.input_select & 1) as usize])
}

/// Port 14: coin counters, LEDs and the trackball axis select.
pub(crate) fn io_r(board: &mut AstrocadeBoard, access: Access) -> u8 {
    let bit = |n: u16| (access.offset >> n) & 1 != 0;
    board.outputs.set_coin_counter(0, bit(8));
    board.outputs.set_coin_counter(1, bit(9));
    board.outputs.set_led(0, bit(10));
    board.outputs.set_led(1, bit(11));
    board.state.input_select = ((access.offset >> 12) & 1) as u8;
    0xFF
}

pub(crate) fn sound_w(_board: &mut AstrocadeBoard, data: u8) {
    log::debug!("Trigger sound sample 0x{data:02x}");
}

fn init(board: &mut AstrocadeBoard) {
    board.state.video_config = VideoConfig::empty();
    board.io.install_read_handler(
        AddressRange::at(0x14).mirror(0xFF00).mask(0x1FFF),
        Handler::DemndrgnIo,
    );
    board
        .io
        .install_read_port(AddressRange::at(0x1C).mirror(0xFF00), "FIREX");
    board
        .io
        .install_read_port(AddressRange::at(0x1D).mirror(0xFF00), "FIREY");
    board
        .io
        .install_write_handler(AddressRange::at(0x97).mirror(0xFF00), Handler::DemndrgnSound);

    board.profpac_banksw_w(0);
    board.register_post_load(PostLoadHook::RestoreBanking);
}

pub static DEMNDRGN: GameDef = GameDef {
    name: "demndrgn",
    description: "Demons & Dragons (prototype)",
    program_map: ProgramMap::Demndrgn,
    port_map: PortMap::Color16PatternNoSound,
    maincpu: &DEMNDRGN_MAINCPU,
    user1: Some(&DEMNDRGN_USER1),
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
    Ok(Box::new(AstrocadeSystem::from_rom_set(&DEMNDRGN, rom_set, checksums)?))
}

inventory::submit! {
    MachineEntry::new("demndrgn", "demndrgn", "Demons & Dragons (prototype)", create_machine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_read_selects_trackball_axis() {
        let mut sys = AstrocadeSystem::new(&DEMNDRGN);
        sys.set_port("MOVEX", 0x12);
        sys.set_port("MOVEY", 0x34);

        sys.board_mut().io_read(0x0014);
        assert_eq!(sys.board_mut().io_read(0x0011), 0x12);

        sys.board_mut().io_read(0x1014);
        assert_eq!(sys.board().state().input_select, 1);
        assert_eq!(sys.board_mut().io_read(0x0011), 0x34);
    }

    #[test]
    fn io_read_drives_counters_and_leds() {
        let mut sys = AstrocadeSystem::new(&DEMNDRGN);
        sys.board_mut().io_read(0x0A14);
        let outputs = sys.board().outputs();
        assert!(!outputs.coin_counter(0));
        assert!(outputs.coin_counter(1));
        assert!(!outputs.led(0));
        assert!(outputs.led(1));
    }

    #[test]
    fn fire_stick_ports_are_mirrored() {
        let mut sys = AstrocadeSystem::new(&DEMNDRGN);
        sys.set_port("FIREX", 0x40);
        assert_eq!(sys.board_mut().io_read(0x371C), 0x40);
        assert_eq!(sys.board_mut().io_read(0x001D), 0x80);
    }

    #[test]
    fn no_sound_flag() {
        let sys = AstrocadeSystem::new(&DEMNDRGN);
        assert!(sys.board().video_config().is_empty());
        assert_eq!(sys.board().expansion_pages(), None);
    }
}
