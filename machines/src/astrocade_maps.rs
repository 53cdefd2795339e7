//! Static program and port maps for the Astrocade board variants.
//!
//! Where ranges overlap, the narrower carve-out is installed after the
//! wider range so that it wins resolution.

use astrocade_core::core::address_map::AddressRange;
use astrocade_core::core::memory::RegionId;
use astrocade_core::device::ProtectedRam;

use crate::astrocade::{AstrocadeBoard, Handler, SCREEN_PAGE_SIZE, SCREEN_PAGES};

/// Program-space layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramMap {
    Seawolf2,
    Ebases,
    Spacezap,
    /// Wizard of Wor and Gorf.
    Wow,
    Robby,
    /// Professor Pac-Man and Ten Pin Deluxe.
    Profpac,
    Demndrgn,
}

/// I/O-space layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortMap {
    Base,
    MonoPattern,
    StereoPattern,
    Color16Pattern,
    Color16PatternNoSound,
}

const PROTECTED_ARM_PORT: u16 = 0xA55B;

pub(crate) fn install_program_map(board: &mut AstrocadeBoard, map: ProgramMap) {
    let Some(maincpu) = board.memory.region_id("maincpu") else {
        return;
    };

    match map {
        ProgramMap::Seawolf2 => {
            board.program.install_rom(AddressRange::new(0x0000, 0x1FFF), maincpu, 0);
            install_funcgen_and_videoram(board);
            let ram = board.add_ram("ram", 0x0400);
            board.program.install_ram(AddressRange::new(0xC000, 0xC3FF), ram, 0);
        }
        ProgramMap::Ebases => {
            board.program.install_rom(AddressRange::new(0x0000, 0x3FFF), maincpu, 0);
            install_funcgen_and_videoram(board);
        }
        ProgramMap::Spacezap => {
            board.program.install_rom(AddressRange::new(0x0000, 0x3FFF), maincpu, 0);
            install_funcgen_and_videoram(board);
            install_protected_ram(board, 0xD000, 0x40);
            let ram = board.add_ram("ram", 0x07C0);
            board.program.install_ram(AddressRange::new(0xD040, 0xD7FF), ram, 0);
        }
        ProgramMap::Wow => {
            board.program.install_rom(AddressRange::new(0x0000, 0x3FFF), maincpu, 0);
            install_funcgen_and_videoram(board);
            board.program.install_rom(AddressRange::new(0x8000, 0xCFFF), maincpu, 0x8000);
            install_protected_ram(board, 0xD000, 0x40);
            let ram = board.add_ram("ram", 0x0FC0);
            board.program.install_ram(AddressRange::new(0xD040, 0xDFFF), ram, 0);
        }
        ProgramMap::Robby => {
            board.program.install_rom(AddressRange::new(0x0000, 0x3FFF), maincpu, 0);
            install_funcgen_and_videoram(board);
            board.program.install_rom(AddressRange::new(0x8000, 0xDFFF), maincpu, 0x8000);
            install_nvram(board);
            install_protected_ram(board, 0xE000, 0x200);
            install_high_ram(board);
        }
        ProgramMap::Profpac => {
            install_16col_base(board, maincpu);
            install_protected_ram(board, 0xE000, 0x200);
            install_high_ram(board);
        }
        ProgramMap::Demndrgn => {
            install_16col_base(board, maincpu);
            install_high_ram(board);
        }
    }
}

/// Function generator writes over the ROM area, plain video RAM above it.
fn install_funcgen_and_videoram(board: &mut AstrocadeBoard) {
    board
        .program
        .install_write_handler(AddressRange::new(0x0000, 0x3FFF), Handler::FuncGen);
    let videoram = board.add_ram("videoram", 0x4000);
    board
        .program
        .install_ram(AddressRange::new(0x4000, 0x7FFF), videoram, 0);
}

/// Screen RAM, the `bank1` window and the fixed ROM of the 16-colour boards.
fn install_16col_base(board: &mut AstrocadeBoard, maincpu: RegionId) {
    board.program.install_rom(AddressRange::new(0x0000, 0x3FFF), maincpu, 0);
    board
        .program
        .install_write_handler(AddressRange::new(0x0000, 0x3FFF), Handler::FuncGen);

    let bank1 = board.memory.add_bank("bank1");
    board.memory.add_bank("bank2");
    board
        .program
        .install_read_bank(AddressRange::new(0x4000, 0xBFFF), bank1);

    let screen_ram = board.add_ram("screenram", SCREEN_PAGE_SIZE * SCREEN_PAGES);
    board.screen_ram = Some(screen_ram);
    board.program.install_readwrite_handler(
        AddressRange::new(0x4000, 0x7FFF),
        Handler::ScreenRam,
        Handler::ScreenRam,
    );

    board.program.install_rom(AddressRange::new(0xC000, 0xDFFF), maincpu, 0xC000);
    install_nvram(board);
}

fn install_nvram(board: &mut AstrocadeBoard) {
    let nvram = board.add_ram("nvram", 0x0800);
    board.nvram = Some(nvram);
    board
        .program
        .install_ram(AddressRange::new(0xE000, 0xE7FF), nvram, 0);
}

fn install_high_ram(board: &mut AstrocadeBoard) {
    let ram = board.add_ram("ram", 0x1800);
    board.program.install_ram(AddressRange::new(0xE800, 0xFFFF), ram, 0);
}

fn install_protected_ram(board: &mut AstrocadeBoard, start: u16, size: usize) {
    board.protected_ram = Some(ProtectedRam::new(size));
    board.program.install_readwrite_handler(
        AddressRange::new(start, start + (size as u16 - 1)),
        Handler::ProtectedRam,
        Handler::ProtectedRam,
    );
}

pub(crate) fn install_port_map(board: &mut AstrocadeBoard, map: PortMap) {
    let io = &mut board.io;
    io.install_readwrite_handler(
        AddressRange::new(0x0000, 0x0019).mirror(0xFF00).mask(0xFFFF),
        Handler::DataChip,
        Handler::DataChip,
    );
    if map == PortMap::Base {
        return;
    }

    if matches!(map, PortMap::StereoPattern | PortMap::Color16Pattern) {
        io.install_write_handler(
            AddressRange::new(0x0050, 0x0058).mirror(0xFF00).mask(0xFFFF),
            Handler::Sound2,
        );
    }
    io.install_write_handler(
        AddressRange::new(0x0078, 0x007E).mirror(0xFF00),
        Handler::PatternBoard,
    );

    if matches!(map, PortMap::Color16Pattern | PortMap::Color16PatternNoSound) {
        io.install_write_handler(AddressRange::at(0x00BF).mirror(0xFF00), Handler::PageSelect);
        io.install_write_handler(
            AddressRange::new(0x00C0, 0x00C5).mirror(0xFF00),
            Handler::ScreenRamCtrl,
        );
        io.install_read_handler(AddressRange::at(0x00C3).mirror(0xFF00), Handler::Intercept);
        io.install_write_handler(AddressRange::at(0x00F3).mirror(0xFF00), Handler::BankSelect);
    }

    io.install_write_handler(AddressRange::at(PROTECTED_ARM_PORT), Handler::ProtectedRamEnable);
}

/// Ten Pin Deluxe sound board: Z80 with its own ROM, two RAM chips, a CTC,
/// the sound latch and an AY-8912.
pub(crate) fn install_tenpin_sub_maps(board: &mut AstrocadeBoard) {
    if let Some(sub) = board.memory.region_id("sub") {
        board
            .sub_program
            .install_rom(AddressRange::new(0x0000, 0x3FFF), sub, 0);
    }
    let lo = board.add_ram("sub_ram_lo", 0x0800);
    board
        .sub_program
        .install_ram(AddressRange::new(0x8000, 0x87FF), lo, 0);
    let hi = board.add_ram("sub_ram_hi", 0x0800);
    board
        .sub_program
        .install_ram(AddressRange::new(0xC000, 0xC7FF), hi, 0);

    let io = &mut board.sub_io;
    io.install_readwrite_handler(AddressRange::new(0x90, 0x93), Handler::Ctc, Handler::Ctc);
    io.install_read_handler(AddressRange::at(0x97), Handler::SoundLatch);
    io.install_readwrite_handler(AddressRange::at(0x98), Handler::AyRead, Handler::AyAddress);
    io.install_write_handler(AddressRange::at(0x9A), Handler::AyData);
}
