pub mod outputs;
pub mod protected_ram;
pub mod register_latch;

pub use outputs::{OutputEvent, OutputPanel};
pub use protected_ram::ProtectedRam;
pub use register_latch::RegisterLatch;
