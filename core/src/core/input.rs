//! Named logical input ports.
//!
//! Handlers read inputs by name (`"P1HANDLE"`, `"TRACKX1"`, ...). Ports hold
//! the current sampled byte; buttons are folded in by the owning machine.

use std::collections::BTreeMap;

/// Value returned for a port name that was never defined.
pub const MISSING_PORT: u8 = 0xFF;

/// Static description of a named port and its idle value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortDef {
    pub name: &'static str,
    pub default: u8,
}

impl PortDef {
    pub const fn new(name: &'static str, default: u8) -> Self {
        Self { name, default }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputPorts {
    values: BTreeMap<&'static str, u8>,
    defs: Vec<PortDef>,
}

impl InputPorts {
    pub fn new(defs: &[PortDef]) -> Self {
        let values = defs.iter().map(|d| (d.name, d.default)).collect();
        Self {
            values,
            defs: defs.to_vec(),
        }
    }

    /// Current value of a port, or 0xFF if the port does not exist.
    pub fn read(&self, name: &str) -> u8 {
        self.get(name).unwrap_or(MISSING_PORT)
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.values.get(name).copied()
    }

    /// Overwrite a port value. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: u8) -> bool {
        match self.values.get_mut(name) {
            Some(v) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    /// Set or clear a single bit of a port (active-high).
    pub fn set_bit(&mut self, name: &str, mask: u8, on: bool) {
        if let Some(v) = self.values.get_mut(name) {
            if on {
                *v |= mask;
            } else {
                *v &= !mask;
            }
        }
    }

    /// Active-low variant: pressed clears the bit.
    pub fn set_bit_active_low(&mut self, name: &str, mask: u8, pressed: bool) {
        self.set_bit(name, mask, !pressed);
    }

    /// Restore every port to its idle value.
    pub fn reset(&mut self) {
        for def in &self.defs {
            self.values.insert(def.name, def.default);
        }
    }

    pub fn defs(&self) -> &[PortDef] {
        &self.defs
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        self.defs.iter().map(|d| (d.name, self.read(d.name)))
    }
}
