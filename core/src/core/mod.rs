pub mod address_map;
pub mod bus;
pub mod input;
pub mod machine;
pub mod memory;
pub mod save_state;

pub use address_map::{AddressRange, AddressSpace, ReadAction, WriteAction};
pub use bus::{Bus, BusMaster, SpaceId};
pub use input::{InputPorts, PortDef};
pub use machine::{InputButton, Machine};
pub use memory::{BankId, MemoryRegions, RegionId};
pub use save_state::{SaveState, StateError};
