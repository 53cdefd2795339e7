//! Address-space router.
//!
//! Each space keeps separate read and write tables. Entries are resolved
//! newest-first, so an install overrides any earlier entry it overlaps and
//! fully-covered earlier entries are dropped outright. Handler targets carry
//! an opaque, machine-defined id (`H`); the space only reports which handler
//! owns an access and the machine dispatches it.

use std::fmt::Debug;

use crate::core::memory::{BankId, MemoryRegions, RegionId};

/// Address value returned for reads that resolve to nothing.
pub const UNMAPPED_READ: u8 = 0xFF;

/// A decoded address window.
///
/// `mirror` bits are don't-care: an address matches when, with those bits
/// cleared, it lies in `start..=end`. `mask` selects which address bits a
/// handler sees as its offset; without one, everything but the mirror bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressRange {
    pub start: u16,
    pub end: u16,
    pub mask: Option<u16>,
    pub mirror: u16,
}

impl AddressRange {
    pub const fn new(start: u16, end: u16) -> Self {
        Self {
            start,
            end,
            mask: None,
            mirror: 0,
        }
    }

    /// Single-address window.
    pub const fn at(addr: u16) -> Self {
        Self::new(addr, addr)
    }

    pub const fn mirror(self, mirror: u16) -> Self {
        Self { mirror, ..self }
    }

    pub const fn mask(self, mask: u16) -> Self {
        Self {
            mask: Some(mask),
            ..self
        }
    }

    fn effective_mask(&self) -> u16 {
        self.mask.unwrap_or(!self.mirror)
    }

    pub fn matches(&self, addr: u16) -> bool {
        let a = addr & !self.mirror;
        a >= self.start && a <= self.end
    }

    /// True if every address `other` matches is also matched by `self`.
    fn covers(&self, other: &AddressRange) -> bool {
        self.mirror == other.mirror && self.start <= other.start && self.end >= other.end
    }

    /// Byte offset into backing storage.
    pub fn storage_offset(&self, addr: u16) -> usize {
        ((addr & !self.mirror) - self.start) as usize
    }

    /// Offset passed to handlers: masked address relative to the masked start.
    pub fn handler_offset(&self, addr: u16) -> u16 {
        let mask = self.effective_mask();
        (addr & mask).wrapping_sub(self.start & mask)
    }
}

/// What a read resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadTarget<H> {
    /// Plain storage (ROM or RAM) starting at `base` within a region.
    Memory { region: RegionId, base: usize },
    Bank(BankId),
    /// Named input port.
    Port(&'static str),
    Handler(H),
    Unmapped,
}

/// What a write resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteTarget<H> {
    Memory { region: RegionId, base: usize },
    Handler(H),
    /// Accepted and discarded.
    Nop,
    Unmapped,
}

/// Address details handed to a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    /// Full bus address as issued by the CPU.
    pub addr: u16,
    /// Masked offset relative to the window start.
    pub offset: u16,
}

/// Outcome of routing a read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadAction<H> {
    Value(u8),
    Port(&'static str),
    Handler(H, Access),
}

/// Outcome of routing a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteAction<H> {
    Done,
    Handler(H, Access),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry<T> {
    range: AddressRange,
    target: T,
}

/// One CPU address space (program or I/O).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressSpace<H> {
    name: &'static str,
    global_mask: u16,
    unmap_value: u8,
    reads: Vec<Entry<ReadTarget<H>>>,
    writes: Vec<Entry<WriteTarget<H>>>,
}

impl<H: Copy + Debug> AddressSpace<H> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            global_mask: 0xFFFF,
            unmap_value: UNMAPPED_READ,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Restrict decoding to the given address bits (e.g. 0xFF for an 8-bit port space).
    pub fn with_global_mask(mut self, mask: u16) -> Self {
        self.global_mask = mask;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn global_mask(&self) -> u16 {
        self.global_mask
    }

    // --- Installation ---

    pub fn install_read(&mut self, range: AddressRange, target: ReadTarget<H>) {
        self.reads.retain(|e| !range.covers(&e.range));
        self.reads.push(Entry { range, target });
    }

    pub fn install_write(&mut self, range: AddressRange, target: WriteTarget<H>) {
        self.writes.retain(|e| !range.covers(&e.range));
        self.writes.push(Entry { range, target });
    }

    pub fn install_rom(&mut self, range: AddressRange, region: RegionId, base: usize) {
        self.install_read(range, ReadTarget::Memory { region, base });
    }

    pub fn install_ram(&mut self, range: AddressRange, region: RegionId, base: usize) {
        self.install_read(range, ReadTarget::Memory { region, base });
        self.install_write(range, WriteTarget::Memory { region, base });
    }

    pub fn install_read_bank(&mut self, range: AddressRange, bank: BankId) {
        self.install_read(range, ReadTarget::Bank(bank));
    }

    pub fn install_read_port(&mut self, range: AddressRange, port: &'static str) {
        self.install_read(range, ReadTarget::Port(port));
    }

    pub fn install_read_handler(&mut self, range: AddressRange, handler: H) {
        self.install_read(range, ReadTarget::Handler(handler));
    }

    pub fn install_write_handler(&mut self, range: AddressRange, handler: H) {
        self.install_write(range, WriteTarget::Handler(handler));
    }

    pub fn install_readwrite_handler(&mut self, range: AddressRange, read: H, write: H) {
        self.install_read_handler(range, read);
        self.install_write_handler(range, write);
    }

    pub fn unmap_read(&mut self, range: AddressRange) {
        self.install_read(range, ReadTarget::Unmapped);
    }

    pub fn unmap_write(&mut self, range: AddressRange) {
        self.install_write(range, WriteTarget::Unmapped);
    }

    pub fn nop_write(&mut self, range: AddressRange) {
        self.install_write(range, WriteTarget::Nop);
    }

    // --- Resolution ---

    pub fn resolve_read(&self, addr: u16) -> Option<(AddressRange, ReadTarget<H>)> {
        let addr = addr & self.global_mask;
        self.reads
            .iter()
            .rev()
            .find(|e| e.range.matches(addr))
            .map(|e| (e.range, e.target))
    }

    pub fn resolve_write(&self, addr: u16) -> Option<(AddressRange, WriteTarget<H>)> {
        let addr = addr & self.global_mask;
        self.writes
            .iter()
            .rev()
            .find(|e| e.range.matches(addr))
            .map(|e| (e.range, e.target))
    }

    /// Route a read. Storage reads are completed here; ports and handlers
    /// are returned for the owner to service.
    pub fn read(&self, addr: u16, mem: &MemoryRegions) -> ReadAction<H> {
        let Some((range, target)) = self.resolve_read(addr) else {
            log::trace!("{}: unmapped read {:04X}", self.name, addr);
            return ReadAction::Value(self.unmap_value);
        };
        let masked = addr & self.global_mask;
        match target {
            ReadTarget::Memory { region, base } => ReadAction::Value(
                mem.read(region, base + range.storage_offset(masked))
                    .unwrap_or(self.unmap_value),
            ),
            ReadTarget::Bank(bank) => ReadAction::Value(
                mem.read_bank(bank, range.storage_offset(masked))
                    .unwrap_or(self.unmap_value),
            ),
            ReadTarget::Port(name) => ReadAction::Port(name),
            ReadTarget::Handler(h) => ReadAction::Handler(
                h,
                Access {
                    addr,
                    offset: range.handler_offset(masked),
                },
            ),
            ReadTarget::Unmapped => {
                log::trace!("{}: unmapped read {:04X}", self.name, addr);
                ReadAction::Value(self.unmap_value)
            }
        }
    }

    /// Route a write. Storage writes are completed here; handlers are
    /// returned for the owner to service.
    pub fn write(&self, addr: u16, data: u8, mem: &mut MemoryRegions) -> WriteAction<H> {
        let Some((range, target)) = self.resolve_write(addr) else {
            log::trace!("{}: unmapped write {:04X} <- {:02X}", self.name, addr, data);
            return WriteAction::Done;
        };
        let masked = addr & self.global_mask;
        match target {
            WriteTarget::Memory { region, base } => {
                mem.write(region, base + range.storage_offset(masked), data);
                WriteAction::Done
            }
            WriteTarget::Handler(h) => WriteAction::Handler(
                h,
                Access {
                    addr,
                    offset: range.handler_offset(masked),
                },
            ),
            WriteTarget::Nop => WriteAction::Done,
            WriteTarget::Unmapped => {
                log::trace!("{}: unmapped write {:04X} <- {:02X}", self.name, addr, data);
                WriteAction::Done
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum H {
        A,
        B,
    }

    fn setup() -> (AddressSpace<H>, MemoryRegions, RegionId, RegionId) {
        let mut mem = MemoryRegions::new();
        let rom = mem.add_region("maincpu", (0..0x100).map(|i| i as u8).collect());
        let ram = mem.add_filled("ram", 0x10, 0);
        (AddressSpace::new("program"), mem, rom, ram)
    }

    #[test]
    fn unmapped_read_returns_fill() {
        let (space, mem, _, _) = setup();
        assert_eq!(space.read(0x1234, &mem), ReadAction::Value(0xFF));
    }

    #[test]
    fn unmapped_write_is_ignored() {
        let (space, mut mem, _, ram) = setup();
        assert_eq!(space.write(0x1234, 0x55, &mut mem), WriteAction::Done);
        assert!(mem.region(ram).iter().all(|&b| b == 0));
    }

    #[test]
    fn rom_reads_and_ignores_writes() {
        let (mut space, mut mem, rom, _) = setup();
        space.install_rom(AddressRange::new(0x0000, 0x00FF), rom, 0);
        assert_eq!(space.read(0x0042, &mem), ReadAction::Value(0x42));
        space.write(0x0042, 0x00, &mut mem);
        assert_eq!(space.read(0x0042, &mem), ReadAction::Value(0x42));
    }

    #[test]
    fn ram_mirror_aliases_storage() {
        let (mut space, mut mem, _, ram) = setup();
        space.install_ram(AddressRange::new(0x1000, 0x100F).mirror(0x0010), ram, 0);
        space.write(0x1013, 0xAB, &mut mem);
        assert_eq!(mem.region(ram)[3], 0xAB);
        assert_eq!(space.read(0x1003, &mem), ReadAction::Value(0xAB));
    }

    #[test]
    fn handler_sees_raw_address_and_masked_offset() {
        let (mut space, mem, _, _) = setup();
        space.install_read_handler(
            AddressRange::at(0x0015).mask(0x0FFF).mirror(0xFF00),
            H::A,
        );
        match space.read(0x3715, &mem) {
            ReadAction::Handler(H::A, access) => {
                assert_eq!(access.addr, 0x3715);
                assert_eq!(access.offset, 0x0700);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn default_mask_strips_mirror_bits() {
        let (mut space, mut mem, _, _) = setup();
        space.install_write_handler(AddressRange::new(0x0042, 0x0043).mirror(0xFF18), H::B);
        match space.write(0x374B, 0x00, &mut mem) {
            WriteAction::Handler(H::B, access) => assert_eq!(access.offset, 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn later_install_overrides_overlap() {
        let (mut space, mem, rom, _) = setup();
        space.install_rom(AddressRange::new(0x0000, 0x00FF), rom, 0);
        space.install_read_handler(AddressRange::new(0x0010, 0x001F), H::B);
        assert!(matches!(space.read(0x0012, &mem), ReadAction::Handler(H::B, _)));
        assert_eq!(space.read(0x0020, &mem), ReadAction::Value(0x20));
    }

    #[test]
    fn covering_install_drops_older_entries() {
        let (mut space, _, rom, _) = setup();
        space.install_read_handler(AddressRange::new(0x0010, 0x001F), H::A);
        space.install_read_handler(AddressRange::new(0x0018, 0x001F), H::B);
        space.install_rom(AddressRange::new(0x0000, 0x00FF), rom, 0);
        assert_eq!(space.reads.len(), 1);
    }

    #[test]
    fn repeated_installs_converge() {
        let (mut a, _, rom, _) = setup();
        let mut b = a.clone();
        a.install_rom(AddressRange::new(0x0000, 0x00FF), rom, 0);
        a.install_read_handler(AddressRange::new(0x0000, 0x003F), H::A);
        for _ in 0..3 {
            b.install_rom(AddressRange::new(0x0000, 0x00FF), rom, 0);
            b.install_read_handler(AddressRange::new(0x0000, 0x003F), H::A);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn unmap_read_hides_earlier_mapping() {
        let (mut space, mem, rom, _) = setup();
        space.install_rom(AddressRange::new(0x0000, 0x00FF), rom, 0);
        space.unmap_read(AddressRange::new(0x0040, 0x007F));
        assert_eq!(space.read(0x0050, &mem), ReadAction::Value(0xFF));
        assert_eq!(space.read(0x0080, &mem), ReadAction::Value(0x80));
    }

    #[test]
    fn unset_bank_reads_fill() {
        let (mut space, mut mem, rom, _) = setup();
        let bank = mem.add_bank("bank1");
        space.install_read_bank(AddressRange::new(0x4000, 0x40FF), bank);
        assert_eq!(space.read(0x4000, &mem), ReadAction::Value(0xFF));
        mem.set_bank_base(bank, rom, 0x10);
        assert_eq!(space.read(0x4001, &mem), ReadAction::Value(0x11));
    }

    #[test]
    fn global_mask_folds_high_bits() {
        let mut space: AddressSpace<H> = AddressSpace::new("io").with_global_mask(0x00FF);
        let mem = MemoryRegions::new();
        space.install_read_port(AddressRange::at(0x0097), "SOUNDLATCH");
        assert_eq!(space.read(0x1297, &mem), ReadAction::Port("SOUNDLATCH"));
    }

    #[test]
    fn nop_write_accepts_silently() {
        let (mut space, mut mem, _, ram) = setup();
        space.install_ram(AddressRange::new(0x0000, 0x000F), ram, 0);
        space.nop_write(AddressRange::new(0x0000, 0x000F));
        space.write(0x0001, 0x77, &mut mem);
        assert_eq!(mem.region(ram)[1], 0);
    }
}
