pub mod core;
pub mod device;

pub mod prelude {
    pub use crate::core::address_map::{Access, AddressRange, AddressSpace, ReadAction, WriteAction};
    pub use crate::core::machine::{InputButton, Machine};
    pub use crate::core::{Bus, BusMaster, InputPorts, MemoryRegions, PortDef, SaveState, SpaceId};
    pub use crate::device::{OutputEvent, OutputPanel};
}
