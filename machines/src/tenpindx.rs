use astrocade_core::core::address_map::{Access, AddressRange};
use astrocade_core::core::input::PortDef;
use astrocade_core::core::machine::Machine;

use crate::astrocade::*;
use crate::astrocade_maps::{PortMap, ProgramMap};
use crate::registry::MachineEntry;
use crate::rom_loader::{Checksums, RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Ten Pin Deluxe ROM definitions
// ---------------------------------------------------------------------------

const fn rom(name: &'static str, offset: usize, crc32: u32) -> RomEntry {
    RomEntry {
        name,
        size: 0x2000,
        offset,
        crc32: Some(crc32),
    }
}

pub static TENPINDX_MAINCPU: RomRegion = RomRegion {
    size: 0x10000,
    fill: 0x00,
    entries: &[
        rom("tpd_x1.bin", 0x0000, 0xef424484),
        rom("tpd_x2.bin", 0x2000, 0xa0f53af2),
        rom("tpd_x9.bin", 0xc000, 0xce9a9bd4),
    ],
};

/// Sound board Z80 program.
pub static TENPINDX_SUB: RomRegion = RomRegion {
    size: 0x4000,
    fill: 0x00,
    entries: &[RomEntry {
        name: "tpd_axfd.bin",
        size: 0x4000,
        offset: 0x0000,
        crc32: Some(0x0aed11f3),
    }],
};

pub static TENPINDX_USER1: RomRegion = RomRegion {
    size: 0x20000,
    fill: 0xFF,
    entries: &[
        rom("tpd_x3.bin", 0x04000, 0xd4645f6d),
        rom("tpd_x4.bin", 0x06000, 0xacf474ba),
        rom("tpd_x5.bin", 0x08000, 0xe206913f),
        rom("tpd_x6.bin", 0x0a000, 0xd90142fb),
        rom("tpd_x8.bin", 0x0e000, 0xae22cf50),
        rom("tpd_x10.bin", 0x10000, 0x85d5b970),
        rom("tpd_x11.bin", 0x12000, 0x7bd3c90f),
        rom("tpd_x12.bin", 0x14000, 0x46078cc7),
        rom("tpd_x13.bin", 0x16000, 0xb49767b4),
        rom("tpd_x14.bin", 0x18000, 0x29a28d40),
        rom("tpd_x15.bin", 0x1a000, 0x2ae98fb2),
        rom("tpd_x16.bin", 0x1c000, 0x8839d0e1),
    ],
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

// P62-P64 are the pinsetter switch matrix, active low.
static PORTS: [PortDef; 6] = [
    PortDef::new("P60", 0xFF),
    PortDef::new("P61", 0x73),
    PortDef::new("P62", 0xFF),
    PortDef::new("P63", 0xFF),
    PortDef::new("P64", 0xFF),
    PortDef::new("DIPSW", 0x00),
];

const SWITCH_PORTS: [&str; 5] = ["P60", "P61", "P62", "P63", "P64"];

static BUTTONS: [ButtonDef; 7] = [
    ButtonDef::low(INPUT_COIN1, "Coin 1", "P60", 0x01),
    ButtonDef::low(INPUT_COIN2, "Coin 2", "P60", 0x02),
    ButtonDef::low(INPUT_SERVICE, "Service", "P60", 0x04),
    ButtonDef::low(INPUT_TILT, "Tilt", "P60", 0x08),
    ButtonDef::low(INPUT_P1_BUTTON1, "Select Game", "P60", 0x10),
    ButtonDef::low(INPUT_P1_BUTTON2, "Players", "P60", 0x20),
    ButtonDef::low(INPUT_P1_START, "Start", "P60", 0x40),
];

// ---------------------------------------------------------------------------
// Lamps, counters and the sound board link
// ---------------------------------------------------------------------------

/// Ports 65-66. Port 65 drives lamps 0-5 from bits 2-7, port 66 lamps 6-9
/// from bits 0-3.
pub(crate) fn lamp_w(board: &mut AstrocadeBoard, access: Access, data: u8) {
    let (first, shift, count) = if access.offset == 0 { (0, 2, 6) } else { (6, 0, 4) };
    for i in 0..count {
        board
            .outputs
            .set_lamp(first + i, (data >> (shift + i)) & 1 != 0);
    }
}

pub(crate) fn counter_w(board: &mut AstrocadeBoard, data: u8) {
    board.outputs.set_coin_counter(0, data & 0x01 != 0);
    if data & 0xFC != 0 {
        log::debug!("tenpindx_counter_w = {data:02X}");
    }
}

/// Port 68: one of the nine "flashlights" (lamps 10-18), or none.
pub(crate) fn lights_w(board: &mut AstrocadeBoard, data: u8) {
    let which = (data >> 4) as usize;
    for i in 0..9 {
        board.outputs.set_lamp(10 + i, which == i + 1);
    }
}

/// Port 97: latch a command for the sound board and pulse its NMI.
pub(crate) fn sound_w(board: &mut AstrocadeBoard, data: u8) {
    board.sound_latch = data;
    board.sub_nmi_pending = true;
}

fn init(board: &mut AstrocadeBoard) {
    board.state.video_config = VideoConfig::empty();
    for (i, port) in SWITCH_PORTS.into_iter().enumerate() {
        board
            .io
            .install_read_port(AddressRange::at(0x60 + i as u16).mirror(0xFF00), port);
    }
    let io = &mut board.io;
    io.install_write_handler(AddressRange::new(0x65, 0x66).mirror(0xFF00), Handler::TenpinLamp);
    io.install_write_handler(AddressRange::at(0x67).mirror(0xFF00), Handler::TenpinCounter);
    io.install_write_handler(AddressRange::at(0x68).mirror(0xFF00), Handler::TenpinLights);
    io.install_write_handler(AddressRange::at(0x97).mirror(0xFF00), Handler::TenpinSound);

    board.profpac_banksw_w(0);
    board.register_post_load(PostLoadHook::RestoreBanking);
}

pub static TENPINDX: GameDef = GameDef {
    name: "tenpindx",
    description: "Ten Pin Deluxe",
    program_map: ProgramMap::Profpac,
    port_map: PortMap::Color16PatternNoSound,
    maincpu: &TENPINDX_MAINCPU,
    user1: Some(&TENPINDX_USER1),
    user2: None,
    sub: Some(&TENPINDX_SUB),
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
    Ok(Box::new(AstrocadeSystem::from_rom_set(&TENPINDX, rom_set, checksums)?))
}

inventory::submit! {
    MachineEntry::new("tenpindx", "tenpindx", "Ten Pin Deluxe", create_machine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lamp_ports_split_across_two_addresses() {
        let mut sys = AstrocadeSystem::new(&TENPINDX);
        sys.board_mut().io_write(0x0065, 0x84);
        sys.board_mut().io_write(0x0066, 0x09);
        let outputs = sys.board().outputs();
        assert!(outputs.lamp(0));
        assert!(!outputs.lamp(1));
        assert!(outputs.lamp(5));
        assert!(outputs.lamp(6));
        assert!(!outputs.lamp(7));
        assert!(outputs.lamp(9));
    }

    #[test]
    fn only_one_flashlight_at_a_time() {
        let mut sys = AstrocadeSystem::new(&TENPINDX);
        sys.board_mut().io_write(0x0068, 0x30);
        let lit: Vec<usize> = (10..19).filter(|&l| sys.board().outputs().lamp(l)).collect();
        assert_eq!(lit, vec![12]);

        sys.board_mut().io_write(0x0068, 0x00);
        assert!((10..19).all(|l| !sys.board().outputs().lamp(l)));
    }

    #[test]
    fn switch_ports_read_through_mirror() {
        let mut sys = AstrocadeSystem::new(&TENPINDX);
        assert_eq!(sys.board_mut().io_read(0x2361), 0x73);
        sys.set_input(INPUT_P1_START, true);
        assert_eq!(sys.board_mut().io_read(0x0060), 0xBF);
    }

    #[test]
    fn sound_command_reaches_sub_cpu() {
        let mut sys = AstrocadeSystem::new(&TENPINDX);
        sys.board_mut().io_write(0x4497, 0x5A);
        assert!(sys.board_mut().take_sub_nmi());
        assert!(!sys.board_mut().take_sub_nmi());
        assert_eq!(sys.board_mut().sub_io_read(0x97), 0x5A);
    }

    #[test]
    fn counter_follows_bit_zero() {
        let mut sys = AstrocadeSystem::new(&TENPINDX);
        sys.board_mut().io_write(0x0067, 0xFD);
        assert!(sys.board().outputs().coin_counter(0));
        sys.board_mut().io_write(0x0067, 0x02);
        assert!(!sys.board().outputs().coin_counter(0));
    }
}
