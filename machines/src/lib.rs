//! Bally/Midway Astrocade arcade drivers.

pub mod astrocade;
pub mod astrocade_maps;
pub mod profpac_bank;
pub mod registry;
pub mod rom_loader;

pub mod demndrgn;
pub mod ebases;
pub mod gorf;
pub mod profpac;
pub mod robby;
pub mod seawolf2;
pub mod spacezap;
pub mod tenpindx;
pub mod wow;

pub use astrocade::{AstrocadeBoard, AstrocadeSystem, GameDef, Handler, MachineState, VideoConfig};
pub use profpac_bank::{BankMapping, LowerHalf};
pub use rom_loader::{Checksums, RomLoadError, RomSet};
