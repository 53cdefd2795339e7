use crate::core::bus::Bus;
use crate::core::save_state::{SaveState, StateError};
use crate::device::outputs::OutputEvent;

/// Describes a single input button that a machine accepts.
pub struct InputButton {
    /// Machine-defined button identifier, passed to `set_input()`.
    pub id: u8,
    /// Human-readable name for display/configuration (e.g., "P1 Fire", "Coin").
    pub name: &'static str,
}

/// Machine-agnostic interface for emulated boards.
///
/// Each game implements this trait so a host can drive it without knowing
/// about the board's address decoding, banking or I/O wiring. CPU-style
/// accesses go through the [`Bus`] supertrait.
pub trait Machine: Bus<Address = u16, Data = u8> {
    /// Short name of the game (e.g., "wow").
    fn name(&self) -> &'static str;

    /// Handle an input event. `button` is a machine-defined ID from `input_map()`.
    /// `pressed` is true for key-down, false for key-up.
    fn set_input(&mut self, button: u8, pressed: bool);

    /// Get the list of input buttons this machine accepts.
    fn input_map(&self) -> &[InputButton];

    /// Overwrite a named input port (analog axes, DIP banks). Returns false
    /// if the machine has no port with that name.
    fn set_port(&mut self, name: &str, value: u8) -> bool;

    /// Current value of every named input port, in declaration order.
    fn input_ports(&self) -> Vec<(&'static str, u8)>;

    /// Reset the machine to its initial power-on state.
    fn reset(&mut self);

    /// Battery-backed RAM contents, for machines that have any.
    fn save_nvram(&self) -> Option<Vec<u8>> {
        None
    }

    /// Restore battery-backed RAM. Ignored by machines without NVRAM.
    fn load_nvram(&mut self, _data: &[u8]) {}

    fn save_state(&self) -> SaveState;

    /// Restore raw fields, then rebuild any derived mappings.
    fn load_state(&mut self, state: &SaveState) -> Result<(), StateError>;

    /// Drain lamp/counter/sound events emitted since the last call.
    fn take_output_events(&mut self) -> Vec<OutputEvent>;
}
