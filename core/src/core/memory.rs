//! Named backing stores (ROM/RAM regions) and runtime-switchable banks.
//!
//! Regions are created once when a machine is configured. Banks are named
//! windows whose base pointer is reassigned at runtime; an unset bank reads
//! as unmapped.

/// Handle to a region registered with [`MemoryRegions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(usize);

/// Handle to a bank registered with [`MemoryRegions`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BankId(usize);

/// Presence and size of a region, as seen by bank logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionInfo {
    pub id: RegionId,
    pub len: usize,
}

struct Region {
    name: &'static str,
    data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Bank {
    name: &'static str,
    base: Option<(RegionId, usize)>,
}

/// All byte regions and banks owned by one machine instance.
#[derive(Default)]
pub struct MemoryRegions {
    regions: Vec<Region>,
    banks: Vec<Bank>,
}

impl MemoryRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region. Re-registering a name replaces its contents.
    pub fn add_region(&mut self, name: &'static str, data: Vec<u8>) -> RegionId {
        if let Some(id) = self.region_id(name) {
            self.regions[id.0].data = data;
            return id;
        }
        self.regions.push(Region { name, data });
        RegionId(self.regions.len() - 1)
    }

    /// Register a region of `size` bytes, every byte set to `fill`.
    pub fn add_filled(&mut self, name: &'static str, size: usize, fill: u8) -> RegionId {
        self.add_region(name, vec![fill; size])
    }

    pub fn region_id(&self, name: &str) -> Option<RegionId> {
        self.regions
            .iter()
            .position(|r| r.name == name)
            .map(RegionId)
    }

    /// Look up a region by name. Absent optional regions return `None`.
    pub fn region_info(&self, name: &str) -> Option<RegionInfo> {
        self.region_id(name).map(|id| RegionInfo {
            id,
            len: self.regions[id.0].data.len(),
        })
    }

    pub fn region(&self, id: RegionId) -> &[u8] {
        &self.regions[id.0].data
    }

    pub fn region_mut(&mut self, id: RegionId) -> &mut [u8] {
        &mut self.regions[id.0].data
    }

    /// Bounds-checked byte read.
    pub fn read(&self, id: RegionId, offset: usize) -> Option<u8> {
        self.regions[id.0].data.get(offset).copied()
    }

    /// Bounds-checked byte write. Returns false if `offset` is outside the region.
    pub fn write(&mut self, id: RegionId, offset: usize, data: u8) -> bool {
        match self.regions[id.0].data.get_mut(offset) {
            Some(byte) => {
                *byte = data;
                true
            }
            None => false,
        }
    }

    // --- Banks ---

    /// Register a bank. Banks start unset (reads fall through as unmapped).
    pub fn add_bank(&mut self, name: &'static str) -> BankId {
        if let Some(id) = self.bank_id(name) {
            return id;
        }
        self.banks.push(Bank { name, base: None });
        BankId(self.banks.len() - 1)
    }

    pub fn bank_id(&self, name: &str) -> Option<BankId> {
        self.banks.iter().position(|b| b.name == name).map(BankId)
    }

    pub fn set_bank_base(&mut self, bank: BankId, region: RegionId, offset: usize) {
        self.banks[bank.0].base = Some((region, offset));
    }

    pub fn clear_bank(&mut self, bank: BankId) {
        self.banks[bank.0].base = None;
    }

    pub fn bank_base(&self, bank: BankId) -> Option<(RegionId, usize)> {
        self.banks[bank.0].base
    }

    /// Read through a bank. `None` if the bank is unset or the offset runs
    /// past the end of its region.
    pub fn read_bank(&self, bank: BankId, offset: usize) -> Option<u8> {
        let (region, base) = self.banks[bank.0].base?;
        self.read(region, base + offset)
    }
}
