mod common;

use astrocade_core::core::address_map::{AddressRange, ReadTarget, WriteTarget};
use astrocade_core::core::{Bus, BusMaster, PortDef};
use common::{TestBus, TestHandler};

const CPU: BusMaster = BusMaster::Cpu(0);

/// ROM at 0000-1FFF filled with its low address byte, RAM at 4000-7FFF.
fn rom_and_ram() -> TestBus {
    let mut bus = TestBus::new(&[]);
    let rom: Vec<u8> = (0..0x2000u16).map(|a| a as u8).collect();
    let rom = bus.memory.add_region("maincpu", rom);
    let ram = bus.memory.add_filled("ram", 0x4000, 0x00);
    bus.program
        .install_rom(AddressRange::new(0x0000, 0x1FFF), rom, 0);
    bus.program
        .install_ram(AddressRange::new(0x4000, 0x7FFF), ram, 0);
    bus
}

// =============================================================================
// Storage targets
// =============================================================================

#[test]
fn test_ram_write_then_read() {
    let mut bus = rom_and_ram();
    bus.write(CPU, 0x4000, 0x55);
    assert_eq!(bus.read(CPU, 0x4000), 0x55);
    bus.write(CPU, 0x7FFF, 0xAA);
    assert_eq!(bus.read(CPU, 0x7FFF), 0xAA);
}

#[test]
fn test_rom_ignores_writes() {
    let mut bus = rom_and_ram();
    assert_eq!(bus.read(CPU, 0x0100), 0x00);
    assert_eq!(bus.read(CPU, 0x01A5), 0xA5);
    bus.write(CPU, 0x01A5, 0x77);
    assert_eq!(bus.read(CPU, 0x01A5), 0xA5);
}

#[test]
fn test_unmapped_reads_return_ff() {
    let mut bus = rom_and_ram();
    for addr in [0x2000, 0x3FFF, 0x8000, 0xC000, 0xFFFF] {
        assert_eq!(bus.read(CPU, addr), 0xFF, "addr {addr:04X}");
        assert_eq!(bus.read(CPU, addr), 0xFF, "addr {addr:04X} second read");
    }
    // Unmapped writes are dropped without touching mapped storage.
    bus.write(CPU, 0x8000, 0x12);
    assert_eq!(bus.read(CPU, 0x8000), 0xFF);
    assert_eq!(bus.read(CPU, 0x4000), 0x00);
}

#[test]
fn test_mirrored_ram_shares_storage() {
    let mut bus = TestBus::new(&[]);
    let ram = bus.memory.add_filled("ram", 0x0400, 0x00);
    bus.program
        .install_ram(AddressRange::new(0xC000, 0xC3FF).mirror(0x0C00), ram, 0);
    bus.write(CPU, 0xC010, 0x3C);
    assert_eq!(bus.read(CPU, 0xCC10), 0x3C);
    assert_eq!(bus.read(CPU, 0xC410), 0x3C);
}

// =============================================================================
// Banks
// =============================================================================

#[test]
fn test_bank_follows_base() {
    let mut bus = TestBus::new(&[]);
    let mut pages = vec![0x10u8; 0x2000];
    pages[0x1000..].fill(0x20);
    let paged = bus.memory.add_region("user1", pages);
    let bank = bus.memory.add_bank("bank1");
    bus.program
        .install_read_bank(AddressRange::new(0x8000, 0x8FFF), bank);

    // No base yet: reads fall back to the unmapped value.
    assert_eq!(bus.read(CPU, 0x8000), 0xFF);

    bus.memory.set_bank_base(bank, paged, 0);
    assert_eq!(bus.read(CPU, 0x8000), 0x10);
    bus.memory.set_bank_base(bank, paged, 0x1000);
    assert_eq!(bus.read(CPU, 0x8000), 0x20);

    // Past the end of the region.
    bus.memory.set_bank_base(bank, paged, 0x1800);
    assert_eq!(bus.read(CPU, 0x8FFF), 0xFF);

    bus.memory.clear_bank(bank);
    assert_eq!(bus.read(CPU, 0x8000), 0xFF);
}

// =============================================================================
// Install ordering
// =============================================================================

#[test]
fn test_later_install_wins() {
    let mut bus = rom_and_ram();
    bus.program.install_readwrite_handler(
        AddressRange::new(0x4000, 0x40FF),
        TestHandler::Latch,
        TestHandler::Latch,
    );
    bus.write(CPU, 0x4010, 0x99);
    assert_eq!(bus.latch, 0x99);
    assert_eq!(bus.read(CPU, 0x4010), 0x99);
    assert_eq!(bus.handler_offsets, vec![0x10, 0x10]);

    // RAM outside the carve-out is untouched.
    bus.write(CPU, 0x4100, 0x01);
    assert_eq!(bus.read(CPU, 0x4100), 0x01);
    assert_eq!(bus.latch, 0x99);
}

#[test]
fn test_covering_install_replaces_entries() {
    let mut bus = rom_and_ram();
    bus.program
        .install_read_handler(AddressRange::new(0x4000, 0x40FF), TestHandler::Latch);
    bus.program.unmap_read(AddressRange::new(0x4000, 0x7FFF));
    assert_eq!(
        bus.program.resolve_read(0x4010).map(|(_, t)| t),
        Some(ReadTarget::Unmapped)
    );

    // Reinstalling the same table twice leaves an identical table.
    let mut again = rom_and_ram();
    again.program.unmap_read(AddressRange::new(0x4000, 0x7FFF));
    again.program.unmap_read(AddressRange::new(0x4000, 0x7FFF));
    assert_eq!(bus.program, again.program);
}

#[test]
fn test_read_and_write_tables_are_independent() {
    let mut bus = rom_and_ram();
    bus.program
        .install_write_handler(AddressRange::new(0x0000, 0x3FFF), TestHandler::Latch);
    assert!(matches!(
        bus.program.resolve_read(0x0010),
        Some((_, ReadTarget::Memory { .. }))
    ));
    assert!(matches!(
        bus.program.resolve_write(0x0010),
        Some((_, WriteTarget::Handler(TestHandler::Latch)))
    ));
    bus.write(CPU, 0x0010, 0x42);
    assert_eq!(bus.latch, 0x42);
    assert_eq!(bus.read(CPU, 0x0010), 0x10);
}

#[test]
fn test_nop_write() {
    let mut bus = rom_and_ram();
    bus.program.nop_write(AddressRange::new(0x4000, 0x4FFF));
    bus.write(CPU, 0x4000, 0x55);
    assert_eq!(bus.read(CPU, 0x4000), 0x00);
}

// =============================================================================
// I/O space
// =============================================================================

#[test]
fn test_port_handler_offset_uses_mask() {
    let mut bus = TestBus::new(&[]);
    bus.io.install_read_handler(
        AddressRange::at(0x0015).mirror(0xFF00).mask(0x0FFF),
        TestHandler::Latch,
    );
    bus.latch = 0x5A;
    assert_eq!(bus.io_read(CPU, 0x0315), 0x5A);
    assert_eq!(bus.io_read(CPU, 0xF415), 0x5A);
    // Offset keeps address bits 8-11 so the handler can decode them.
    assert_eq!(bus.handler_offsets, vec![0x0300, 0x0400]);
}

#[test]
fn test_named_port_read() {
    let mut bus = TestBus::new(&[PortDef::new("DIPSW", 0xA5)]);
    bus.io
        .install_read_port(AddressRange::at(0x0013).mirror(0xFF00), "DIPSW");
    assert_eq!(bus.io_read(CPU, 0x1213), 0xA5);
    bus.ports.set("DIPSW", 0x3C);
    assert_eq!(bus.io_read(CPU, 0x0013), 0x3C);
    assert_eq!(bus.io_read(CPU, 0x0014), 0xFF);
}

#[test]
fn test_global_mask_folds_high_bits() {
    let mut bus = TestBus::new(&[]);
    bus.io = astrocade_core::core::AddressSpace::new("sub io").with_global_mask(0x00FF);
    bus.io
        .install_readwrite_handler(AddressRange::at(0x97), TestHandler::Latch, TestHandler::Latch);
    bus.io_write(CPU, 0x1297, 0x42);
    assert_eq!(bus.io_read(CPU, 0xFF97), 0x42);
}
