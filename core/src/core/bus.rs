/// Identifies who is accessing the bus (for multi-CPU boards)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusMaster {
    Cpu(usize), // CPU 0 = main, CPU 1 = sound sub-CPU, etc.
}

/// The two address spaces a Z80-class CPU drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpaceId {
    Program,
    Io,
}

/// Generic bus interface the CPU core calls for every memory and I/O reference.
pub trait Bus {
    type Address: Copy + Into<u64>; // u16 for 8-bit CPUs
    type Data; // u8 for 8-bit CPUs

    fn read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data;
    fn write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data);

    /// Read from I/O port address space (separate from memory on Z80).
    /// Default maps to memory read; override for CPUs with separate I/O.
    fn io_read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data {
        self.read(master, addr)
    }

    /// Write to I/O port address space (separate from memory on Z80).
    /// Default maps to memory write; override for CPUs with separate I/O.
    fn io_write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data) {
        self.write(master, addr, data)
    }

    /// Space-addressed read, for callers that carry a [`SpaceId`] around.
    fn read_space(&mut self, master: BusMaster, space: SpaceId, addr: Self::Address) -> Self::Data {
        match space {
            SpaceId::Program => self.read(master, addr),
            SpaceId::Io => self.io_read(master, addr),
        }
    }

    /// Space-addressed write, for callers that carry a [`SpaceId`] around.
    fn write_space(
        &mut self,
        master: BusMaster,
        space: SpaceId,
        addr: Self::Address,
        data: Self::Data,
    ) {
        match space {
            SpaceId::Program => self.write(master, addr, data),
            SpaceId::Io => self.io_write(master, addr, data),
        }
    }
}
