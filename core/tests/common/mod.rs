#![allow(dead_code)]

use astrocade_core::core::address_map::{AddressSpace, ReadAction, WriteAction};
use astrocade_core::core::{Bus, BusMaster, InputPorts, MemoryRegions, PortDef};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestHandler {
    /// Latches the last byte written; reads return it.
    Latch,
}

/// Minimal routed bus: one program space, one I/O space, a latch device.
pub struct TestBus {
    pub memory: MemoryRegions,
    pub program: AddressSpace<TestHandler>,
    pub io: AddressSpace<TestHandler>,
    pub ports: InputPorts,
    pub latch: u8,
    pub handler_offsets: Vec<u16>,
}

impl TestBus {
    pub fn new(ports: &[PortDef]) -> Self {
        Self {
            memory: MemoryRegions::new(),
            program: AddressSpace::new("program"),
            io: AddressSpace::new("io"),
            ports: InputPorts::new(ports),
            latch: 0,
            handler_offsets: Vec::new(),
        }
    }

    fn finish_read(&mut self, action: ReadAction<TestHandler>) -> u8 {
        match action {
            ReadAction::Value(v) => v,
            ReadAction::Port(name) => self.ports.read(name),
            ReadAction::Handler(TestHandler::Latch, access) => {
                self.handler_offsets.push(access.offset);
                self.latch
            }
        }
    }

    fn finish_write(&mut self, action: WriteAction<TestHandler>, data: u8) {
        if let WriteAction::Handler(TestHandler::Latch, access) = action {
            self.handler_offsets.push(access.offset);
            self.latch = data;
        }
    }
}

impl Bus for TestBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        let action = self.program.read(addr, &self.memory);
        self.finish_read(action)
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        let action = self.program.write(addr, data, &mut self.memory);
        self.finish_write(action, data);
    }

    fn io_read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        let action = self.io.read(addr, &self.memory);
        self.finish_read(action)
    }

    fn io_write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        let action = self.io.write(addr, data, &mut self.memory);
        self.finish_write(action, data);
    }
}
