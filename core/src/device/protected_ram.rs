/// Write-protected RAM behind an arm latch.
///
/// A write to the arm port sets the latch. The next access to the RAM
/// consumes it: a write commits only while armed, and both reads and writes
/// clear the latch. Every protected write therefore needs its own arm.
pub struct ProtectedRam {
    data: Vec<u8>,
    write_enable: bool,
}

impl ProtectedRam {
    /// Create a zeroed, disarmed block of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
            write_enable: false,
        }
    }

    /// Arm the latch. The data byte written to the arm port is ignored.
    pub fn arm(&mut self) {
        self.write_enable = true;
    }

    pub fn is_armed(&self) -> bool {
        self.write_enable
    }

    /// Restore the latch from a save state.
    pub fn set_armed(&mut self, armed: bool) {
        self.write_enable = armed;
    }

    /// Offsets wrap at the block size. `None` for an empty block.
    fn index(&self, offset: u16) -> Option<usize> {
        (offset as usize).checked_rem(self.data.len())
    }

    /// Read a byte. Reading disarms the latch. An empty block reads 0xFF.
    pub fn read(&mut self, offset: u16) -> u8 {
        self.write_enable = false;
        self.peek(offset)
    }

    /// Write a byte if armed. Returns whether the write was committed.
    pub fn write(&mut self, offset: u16, value: u8) -> bool {
        let armed = std::mem::take(&mut self.write_enable);
        match self.index(offset) {
            Some(index) if armed => {
                self.data[index] = value;
                true
            }
            _ => false,
        }
    }

    /// Side-effect-free read for debuggers and tests.
    pub fn peek(&self, offset: u16) -> u8 {
        self.index(offset).map_or(0xFF, |index| self.data[index])
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Load contents from a byte slice (e.g., from an NVRAM file).
    ///
    /// Short slices fill only the leading bytes; long slices are truncated.
    pub fn load_from(&mut self, src: &[u8]) {
        let len = src.len().min(self.data.len());
        self.data[..len].copy_from_slice(&src[..len]);
    }

    pub fn snapshot(&self) -> &[u8] {
        &self.data
    }
}
