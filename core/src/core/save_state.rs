//! Save-state container.
//!
//! A save state is a flat set of named fields. Machines register scalar
//! registers and byte blocks under stable names; anything derived from
//! those fields (bank mappings) is rebuilt by the machine after loading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("save state is for machine '{found}', expected '{expected}'")]
    MachineMismatch { expected: String, found: String },

    #[error("save state is missing field '{0}'")]
    MissingField(String),

    #[error("field '{field}' has the wrong type (expected {expected})")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("field '{field}' has {actual} bytes, expected {expected}")]
    WrongLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("save state serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Byte(u8),
    Flag(bool),
    Bytes(Vec<u8>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    pub machine: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl SaveState {
    pub fn new(machine: &str) -> Self {
        Self {
            machine: machine.to_string(),
            fields: BTreeMap::new(),
        }
    }

    pub fn put_u8(&mut self, name: &str, value: u8) {
        self.fields.insert(name.to_string(), FieldValue::Byte(value));
    }

    pub fn put_bool(&mut self, name: &str, value: bool) {
        self.fields.insert(name.to_string(), FieldValue::Flag(value));
    }

    pub fn put_bytes(&mut self, name: &str, value: &[u8]) {
        self.fields
            .insert(name.to_string(), FieldValue::Bytes(value.to_vec()));
    }

    fn field(&self, name: &str) -> Result<&FieldValue, StateError> {
        self.fields
            .get(name)
            .ok_or_else(|| StateError::MissingField(name.to_string()))
    }

    pub fn get_u8(&self, name: &str) -> Result<u8, StateError> {
        match self.field(name)? {
            FieldValue::Byte(v) => Ok(*v),
            _ => Err(StateError::WrongType {
                field: name.to_string(),
                expected: "byte",
            }),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, StateError> {
        match self.field(name)? {
            FieldValue::Flag(v) => Ok(*v),
            _ => Err(StateError::WrongType {
                field: name.to_string(),
                expected: "flag",
            }),
        }
    }

    pub fn get_bytes(&self, name: &str) -> Result<&[u8], StateError> {
        match self.field(name)? {
            FieldValue::Bytes(v) => Ok(v),
            _ => Err(StateError::WrongType {
                field: name.to_string(),
                expected: "bytes",
            }),
        }
    }

    /// Copy a byte block into `dest`, which must be exactly the saved length.
    pub fn copy_bytes(&self, name: &str, dest: &mut [u8]) -> Result<(), StateError> {
        let src = self.get_bytes(name)?;
        if src.len() != dest.len() {
            return Err(StateError::WrongLength {
                field: name.to_string(),
                expected: dest.len(),
                actual: src.len(),
            });
        }
        dest.copy_from_slice(src);
        Ok(())
    }

    pub fn expect_machine(&self, name: &str) -> Result<(), StateError> {
        if self.machine != name {
            return Err(StateError::MachineMismatch {
                expected: name.to_string(),
                found: self.machine.clone(),
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(text)?)
    }
}
