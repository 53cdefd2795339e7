mod common;

use astrocade_core::core::machine::Machine;
use astrocade_core::core::{Bus, BusMaster};
use astrocade_core::device::OutputEvent;
use astrocade_machines::astrocade::{INPUT_COIN1, INPUT_P1_BUTTON1, VideoConfig};
use astrocade_machines::{ebases, gorf, seawolf2, spacezap, tenpindx, wow};

use common::{boot, region_image};

const CPU: BusMaster = BusMaster::Cpu(0);
const SUB: BusMaster = BusMaster::Cpu(1);

fn samples(events: &[OutputEvent]) -> Vec<(usize, usize)> {
    events
        .iter()
        .filter_map(|e| match *e {
            OutputEvent::Sample { channel, sample } => Some((channel, sample)),
            _ => None,
        })
        .collect()
}

// =================================================================
// Router basics
// =================================================================

#[test]
fn test_unmapped_reads_return_ff() {
    let mut sys = boot(&seawolf2::SEAWOLF2);
    for addr in [0x2000u16, 0x3FFF, 0x8000, 0xBFFF, 0xC400, 0xFFFF] {
        assert_eq!(sys.read(CPU, addr), 0xFF, "{addr:04X}");
        assert_eq!(sys.read(CPU, addr), 0xFF, "{addr:04X} again");
    }
    assert!(sys.take_output_events().is_empty());
}

#[test]
fn test_rom_ignores_writes_and_ram_keeps_them() {
    let mut sys = boot(&seawolf2::SEAWOLF2);
    let rom = region_image(&seawolf2::SEAWOLF2, &seawolf2::SEAWOLF2_MAINCPU);

    sys.write(CPU, 0x4000, 0x55);
    assert_eq!(sys.read(CPU, 0x4000), 0x55);

    sys.write(CPU, 0xC3FF, 0x66);
    assert_eq!(sys.read(CPU, 0xC3FF), 0x66);

    // ROM area writes go to the function generator, never the ROM.
    sys.write(CPU, 0x0100, 0x77);
    assert_eq!(sys.read(CPU, 0x0100), rom[0x0100]);
}

#[test]
fn test_function_generator_writes_video_ram() {
    let mut sys = boot(&ebases::EBASES);
    sys.write(CPU, 0x0123, 0x3C);
    assert_eq!(sys.read(CPU, 0x4123), 0x3C);
}

// =================================================================
// Rising-edge sound triggers
// =================================================================

#[test]
fn test_sound_trigger_fires_once_per_rising_edge() {
    let mut sys = boot(&seawolf2::SEAWOLF2);
    sys.io_write(CPU, 0x0040, 0x00);
    sys.take_output_events();

    sys.io_write(CPU, 0x0040, 0x01);
    assert_eq!(samples(&sys.take_output_events()), vec![(1, 1)]);

    sys.io_write(CPU, 0x0040, 0x01);
    assert!(samples(&sys.take_output_events()).is_empty());
}

#[test]
fn test_no_trigger_from_power_on_state() {
    let mut sys = boot(&seawolf2::SEAWOLF2);
    // Ports start all-ones, so the first write cannot rise.
    sys.io_write(CPU, 0x0040, 0x3F);
    assert!(samples(&sys.take_output_events()).is_empty());
}

#[test]
fn test_multiple_bits_rise_together() {
    let mut sys = boot(&seawolf2::SEAWOLF2);
    sys.io_write(CPU, 0x0040, 0x00);
    sys.take_output_events();
    sys.io_write(CPU, 0x0040, 0x24);
    assert_eq!(samples(&sys.take_output_events()), vec![(4, 4), (9, 4)]);
}

#[test]
fn test_second_port_edges_and_master_enable() {
    let mut sys = boot(&seawolf2::SEAWOLF2);
    sys.io_write(CPU, 0x0041, 0x00);
    sys.take_output_events();

    sys.io_write(CPU, 0x0041, 0x88);
    assert_eq!(samples(&sys.take_output_events()), vec![(2, 2), (7, 2)]);
    assert_eq!(sys.board().outputs().volume(9), 1.0);
    assert_eq!(sys.board().outputs().volume(2), 1.0);

    sys.io_write(CPU, 0x0041, 0x30);
    assert_eq!(samples(&sys.take_output_events()), vec![(8, 3), (3, 3)]);
    assert_eq!(sys.board().outputs().volume(9), 0.0);
}

// =================================================================
// Address-bit decodes
// =================================================================

#[test]
fn test_spacezap_counters_from_address_bits() {
    let mut sys = boot(&spacezap::SPACEZAP);
    sys.set_port("P3HANDLE", 0x5A);
    assert_eq!(sys.io_read(CPU, 0x0313), 0x5A);
    assert!(sys.board().outputs().coin_counter(0));
    assert!(sys.board().outputs().coin_counter(1));
    assert_eq!(sys.io_read(CPU, 0x0013), 0x5A);
    assert!(!sys.board().outputs().coin_counter(0));
}

#[test]
fn test_spacezap_monitor_switch() {
    let mut sys = boot(&spacezap::SPACEZAP);
    assert!(sys.board().video_config().contains(VideoConfig::MONITOR_BW));
    sys.set_port("FAKE", 0x01);
    assert!(!sys.board().video_config().contains(VideoConfig::MONITOR_BW));
    sys.set_port("FAKE", 0x00);
    assert!(sys.board().video_config().contains(VideoConfig::MONITOR_BW));
}

#[test]
fn test_wow_sparkle_latches() {
    let mut sys = boot(&wow::WOW);
    // Select 2 (sparkle 0) high, then select 5 (sparkle 3) high.
    sys.io_read(CPU, 0x0515);
    sys.io_read(CPU, 0x0B15);
    assert_eq!(sys.board().sparkle(), [true, false, false, true]);
    sys.io_read(CPU, 0x0415);
    assert_eq!(sys.board().sparkle(), [false, false, false, true]);
}

#[test]
fn test_gorf_lamps_from_port_16() {
    let mut sys = boot(&gorf::GORF);
    // Select 3, level 1.
    sys.io_read(CPU, 0x0716);
    assert!(sys.board().outputs().lamp(3));
    sys.io_read(CPU, 0x0616);
    assert!(!sys.board().outputs().lamp(3));
}

#[test]
fn test_ebases_trackball_multiplexer() {
    let mut sys = boot(&ebases::EBASES);
    for (i, port) in ["TRACKX2", "TRACKY2", "TRACKX1", "TRACKY1"].iter().enumerate() {
        sys.set_port(port, 0x10 + i as u8);
    }
    for select in 0..4u8 {
        sys.io_write(CPU, 0x0028, select);
        assert_eq!(sys.io_read(CPU, 0x0013), 0x10 + select);
    }
    // Only two select bits are latched; mirror bits reach the same port.
    sys.io_write(CPU, 0x1F2F, 0x06);
    assert_eq!(sys.board().state().input_select, 0x02);
}

#[test]
fn test_buttons_fold_into_handle_ports() {
    let mut sys = boot(&ebases::EBASES);
    sys.set_input(INPUT_COIN1, true);
    assert_eq!(sys.io_read(CPU, 0x0011), 0x06);
    sys.set_input(INPUT_COIN1, false);
    assert_eq!(sys.io_read(CPU, 0x0011), 0x07);

    let mut sys = boot(&seawolf2::SEAWOLF2);
    sys.set_input(INPUT_P1_BUTTON1, true);
    assert_eq!(sys.io_read(CPU, 0x0011), 0x9F);
}

// =================================================================
// Ten Pin Deluxe sound board
// =================================================================

#[test]
fn test_tenpin_sub_cpu_maps() {
    let mut sys = boot(&tenpindx::TENPINDX);
    let sub_rom = region_image(&tenpindx::TENPINDX, &tenpindx::TENPINDX_SUB);

    assert_eq!(sys.read(SUB, 0x1234), sub_rom[0x1234]);
    sys.write(SUB, 0x8001, 0x11);
    sys.write(SUB, 0xC7FF, 0x22);
    assert_eq!(sys.read(SUB, 0x8001), 0x11);
    assert_eq!(sys.read(SUB, 0xC7FF), 0x22);
    assert_eq!(sys.read(SUB, 0x9000), 0xFF);
}

#[test]
fn test_tenpin_sound_latch_and_ay_port() {
    let mut sys = boot(&tenpindx::TENPINDX);
    sys.io_write(CPU, 0x0097, 0x3C);
    assert!(sys.board_mut().take_sub_nmi());
    // Sub I/O decodes only A0-A7.
    assert_eq!(sys.io_read(SUB, 0x5597), 0x3C);

    sys.set_port("DIPSW", 0xA5);
    sys.io_write(SUB, 0x0098, 14);
    assert_eq!(sys.io_read(SUB, 0x0098), 0xA5);

    sys.io_write(SUB, 0x0098, 3);
    sys.io_write(SUB, 0x009A, 0x42);
    assert_eq!(sys.io_read(SUB, 0x0098), 0x42);
}

#[test]
fn test_main_cpu_has_no_sub_cpu_on_other_boards() {
    let mut sys = boot(&wow::WOW);
    assert_eq!(sys.read(SUB, 0x0000), 0xFF);
    assert_eq!(sys.read(BusMaster::Cpu(2), 0x0000), 0xFF);
}
