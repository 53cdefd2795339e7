/// Opaque register file standing in for a custom chip whose internals are
/// not emulated (video data chip, sound chips, CTC, AY-8912).
///
/// Writes latch per register; reads return the last latched byte. The
/// owning board decides how addresses fold onto register indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterLatch {
    name: &'static str,
    regs: Vec<u8>,
}

impl RegisterLatch {
    pub fn new(name: &'static str, count: usize) -> Self {
        Self {
            name,
            regs: vec![0; count],
        }
    }

    pub fn read(&self, reg: usize) -> u8 {
        self.regs.get(reg).copied().unwrap_or(0xFF)
    }

    pub fn write(&mut self, reg: usize, data: u8) {
        match self.regs.get_mut(reg) {
            Some(r) => *r = data,
            None => log::trace!("{}: write to register {reg} out of range", self.name),
        }
    }

    pub fn reset(&mut self) {
        self.regs.fill(0);
    }

    pub fn snapshot(&self) -> &[u8] {
        &self.regs
    }

    pub fn load_from(&mut self, src: &[u8]) {
        let len = src.len().min(self.regs.len());
        self.regs[..len].copy_from_slice(&src[..len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_latch_per_register() {
        let mut chip = RegisterLatch::new("astrocade1", 8);
        chip.write(2, 0x12);
        chip.write(5, 0x34);
        assert_eq!(chip.read(2), 0x12);
        assert_eq!(chip.read(5), 0x34);
        assert_eq!(chip.read(0), 0x00);
    }

    #[test]
    fn out_of_range_register() {
        let mut chip = RegisterLatch::new("ctc", 4);
        chip.write(4, 0x55);
        assert_eq!(chip.read(4), 0xFF);
    }

    #[test]
    fn reset_clears() {
        let mut chip = RegisterLatch::new("ay8912", 16);
        chip.write(7, 0x3F);
        chip.reset();
        assert_eq!(chip.read(7), 0);
    }
}
