use astrocade_core::core::address_map::{Access, AddressRange};
use astrocade_core::core::input::PortDef;
use astrocade_core::core::machine::Machine;

use crate::astrocade::*;
use crate::astrocade_maps::{PortMap, ProgramMap};
use crate::registry::MachineEntry;
use crate::rom_loader::{Checksums, RomEntry, RomLoadError, RomRegion, RomSet};

// ---------------------------------------------------------------------------
// Sea Wolf II ROM definitions
// ---------------------------------------------------------------------------

pub static SEAWOLF2_MAINCPU: RomRegion = RomRegion {
    size: 0x2000,
    fill: 0x00,
    entries: &[
        RomEntry {
            name: "sw2x1.bin",
            size: 0x0800,
            offset: 0x0000,
            crc32: Some(0xad0103f6),
        },
        RomEntry {
            name: "sw2x2.bin",
            size: 0x0800,
            offset: 0x0800,
            crc32: Some(0xe0430f0a),
        },
        RomEntry {
            name: "sw2x3.bin",
            size: 0x0800,
            offset: 0x1000,
            crc32: Some(0x05ad1619),
        },
        RomEntry {
            name: "sw2x4.bin",
            size: 0x0800,
            offset: 0x1800,
            crc32: Some(0x1a1a14a2),
        },
    ],
};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

// Periscope handles are 6-bit positional controls centred at 0x1F.
static PORTS: [PortDef; 4] = [
    PortDef::new("P1HANDLE", 0x1F),
    PortDef::new("P2HANDLE", 0x1F),
    PortDef::new("P3HANDLE", 0x00),
    PortDef::new("P4HANDLE", 0xC9),
];

static BUTTONS: [ButtonDef; 5] = [
    ButtonDef::high(INPUT_COIN1, "Coin", "P3HANDLE", 0x01),
    ButtonDef::high(INPUT_P1_START, "P1 Start", "P3HANDLE", 0x02),
    ButtonDef::high(INPUT_P2_START, "P2 Start", "P3HANDLE", 0x04),
    ButtonDef::high(INPUT_P1_BUTTON1, "P1 Fire", "P2HANDLE", 0x80),
    ButtonDef::high(INPUT_P2_BUTTON1, "P2 Fire", "P1HANDLE", 0x80),
];

// ---------------------------------------------------------------------------
// Sound and lamp outputs
// ---------------------------------------------------------------------------

/// Rising bit on port 40 -> (sample channel, sample id).
const PORT_1_SAMPLES: [(u8, usize, usize); 6] = [
    (0x01, 1, 1), // left torpedo
    (0x02, 0, 0), // left ship hit
    (0x04, 4, 4), // left mine hit
    (0x08, 6, 1), // right torpedo
    (0x10, 5, 0), // right ship hit
    (0x20, 9, 4), // right mine hit
];

/// Channels gated by the port 41 master enable.
const GATED_CHANNELS: [usize; 8] = [0, 1, 3, 4, 5, 6, 8, 9];

pub(crate) fn sound_1_w(board: &mut AstrocadeBoard, data: u8) {
    let rising = data & !board.state.port_1_last;
    board.state.port_1_last = data;

    for (bit, channel, sample) in PORT_1_SAMPLES {
        if rising & bit != 0 {
            board.outputs.trigger_sample(channel, sample);
        }
    }
}

pub(crate) fn sound_2_w(board: &mut AstrocadeBoard, data: u8) {
    let rising = data & !board.state.port_2_last;
    board.state.port_2_last = data;

    let master = if data & 0x80 != 0 { 1.0 } else { 0.0 };
    for channel in GATED_CHANNELS {
        board.outputs.set_volume(channel, master);
    }

    // Dive sound pans between channels 2 and 7 with the low three bits.
    board.outputs.set_volume(2, f32::from(!data & 0x07) / 7.0);
    board.outputs.set_volume(7, f32::from(data & 0x07) / 7.0);

    if rising & 0x08 != 0 {
        board.outputs.trigger_sample(2, 2);
        board.outputs.trigger_sample(7, 2);
    }
    if rising & 0x10 != 0 {
        board.outputs.trigger_sample(8, 3); // right sonar
    }
    if rising & 0x20 != 0 {
        board.outputs.trigger_sample(3, 3); // left sonar
    }

    board.outputs.set_coin_counter(0, data & 0x40 != 0);
}

/// Ports 42 (player 2, left) and 43 (player 1, right). Seven lamps each:
/// hit, reload, ready and four torpedo-available lamps.
pub(crate) fn lamps_w(board: &mut AstrocadeBoard, access: Access, data: u8) {
    let base = ((access.offset ^ 1) & 1) as usize * 7;
    board.outputs.set_lamp(base, (data >> 5) & 1 != 0);
    board.outputs.set_lamp(base + 1, (!data >> 4) & 1 != 0);
    board.outputs.set_lamp(base + 2, (data >> 4) & 1 != 0);
    for torpedo in 0..4 {
        board
            .outputs
            .set_lamp(base + 3 + torpedo, (data >> (3 - torpedo)) & 1 != 0);
    }
}

fn init(board: &mut AstrocadeBoard) {
    board.state.video_config = VideoConfig::empty();
    board.io.install_write_handler(
        AddressRange::at(0x40).mirror(0xFF18),
        Handler::Seawolf2Sound1,
    );
    board.io.install_write_handler(
        AddressRange::at(0x41).mirror(0xFF18),
        Handler::Seawolf2Sound2,
    );
    board.io.install_write_handler(
        AddressRange::new(0x42, 0x43).mirror(0xFF18),
        Handler::Seawolf2Lamps,
    );
}

pub static SEAWOLF2: GameDef = GameDef {
    name: "seawolf2",
    description: "Seawolf II",
    program_map: ProgramMap::Seawolf2,
    port_map: PortMap::Base,
    maincpu: &SEAWOLF2_MAINCPU,
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
    Ok(Box::new(AstrocadeSystem::from_rom_set(&SEAWOLF2, rom_set, checksums)?))
}

inventory::submit! {
    MachineEntry::new("seawolf2", "seawolf2", "Seawolf II", create_machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrocade_core::device::OutputEvent;

    #[test]
    fn left_player_lamps_start_at_seven() {
        let mut sys = AstrocadeSystem::new(&SEAWOLF2);
        // Port 42 drives the left-hand (player 2) bank.
        sys.board_mut().io_write(0x0042, 0x20);
        assert!(sys.board().outputs().lamp(7));
        assert!(!sys.board().outputs().lamp(0));
        // Reload lamp is active low.
        assert!(sys.board().outputs().lamp(8));

        sys.board_mut().io_write(0x0043, 0x08);
        assert!(sys.board().outputs().lamp(3));
    }

    #[test]
    fn dive_panning_follows_low_bits() {
        let mut sys = AstrocadeSystem::new(&SEAWOLF2);
        sys.board_mut().io_write(0x0041, 0x87);
        let outputs = sys.board().outputs();
        assert_eq!(outputs.volume(2), 0.0);
        assert_eq!(outputs.volume(7), 1.0);
        assert_eq!(outputs.volume(0), 1.0);
        assert!(!outputs.coin_counter(0));
    }

    #[test]
    fn mirror_bits_reach_the_same_port() {
        let mut sys = AstrocadeSystem::new(&SEAWOLF2);
        sys.board_mut().io_write(0x1240 | 0x08, 0x01);
        let events = sys.take_output_events();
        assert!(events.contains(&OutputEvent::Sample {
            channel: 1,
            sample: 1
        }));
    }
}
