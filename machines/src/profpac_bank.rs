//! Bank controller for the 16-colour boards.
//!
//! The bank-select byte picks which 32K page of `user1` appears at
//! 4000-BFFF. Page 0 shares its lower half with screen RAM. Bit 7 maps a
//! 16K page of the optional `user2` expansion board over 4000-7FFF.
//!
//! Only the selector byte is persisted. The mapping is recomputed from it
//! on every write and replayed after a state load.

use astrocade_core::core::address_map::AddressRange;

use crate::astrocade::{AstrocadeBoard, Handler};

const PRIMARY_PAGE_SIZE: usize = 0x8000;
const EXPANSION_PAGE_SIZE: usize = 0x4000;

/// Selector value of expansion page 0. A board jumper can move this to 0xA8;
/// only the default is modeled.
const EXPANSION_BASE: u8 = 0x80;

const WINDOW: AddressRange = AddressRange::new(0x4000, 0xBFFF);
const LOWER_HALF: AddressRange = AddressRange::new(0x4000, 0x7FFF);

/// What backs 4000-7FFF for a given selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LowerHalf {
    Primary,
    ScreenRam,
    Expansion(u8),
    Unmapped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BankMapping {
    /// 32K page of `user1` mapped at 4000-BFFF.
    pub primary_page: u8,
    pub lower: LowerHalf,
}

/// Decode a selector. `expansion_pages` is `None` when no expansion board
/// is fitted.
pub fn decode(selector: u8, expansion_pages: Option<usize>) -> BankMapping {
    let primary_page = (selector >> 5) & 0x03;
    let mut lower = if primary_page == 0 {
        LowerHalf::ScreenRam
    } else {
        LowerHalf::Primary
    };

    if selector & 0x80 != 0
        && let Some(pages) = expansion_pages
    {
        let page = selector - EXPANSION_BASE;
        lower = if (page as usize) < pages {
            LowerHalf::Expansion(page)
        } else {
            LowerHalf::Unmapped
        };
    }

    BankMapping {
        primary_page,
        lower,
    }
}

impl AstrocadeBoard {
    /// Number of 16K pages on the expansion board, if one is fitted.
    pub fn expansion_pages(&self) -> Option<usize> {
        self.memory
            .region_info("user2")
            .map(|info| info.len / EXPANSION_PAGE_SIZE)
    }

    /// Mapping implied by the current selector.
    pub fn bank_mapping(&self) -> BankMapping {
        decode(self.state.profpac_bank, self.expansion_pages())
    }

    /// Bank-select port write. Also the post-load replay path.
    pub(crate) fn profpac_banksw_w(&mut self, data: u8) {
        self.state.profpac_bank = data;
        let mapping = decode(data, self.expansion_pages());
        log::debug!(
            "bank select {data:02X}: primary page {}, lower half {:?}",
            mapping.primary_page,
            mapping.lower
        );

        let bank1 = self.memory.add_bank("bank1");
        self.program.install_read_bank(WINDOW, bank1);
        match self.memory.region_id("user1") {
            Some(user1) => self.memory.set_bank_base(
                bank1,
                user1,
                PRIMARY_PAGE_SIZE * mapping.primary_page as usize,
            ),
            None => self.memory.clear_bank(bank1),
        }

        match mapping.lower {
            LowerHalf::Primary => {}
            LowerHalf::ScreenRam => {
                self.program.install_read_handler(LOWER_HALF, Handler::ScreenRam);
            }
            LowerHalf::Expansion(page) => {
                let bank2 = self.memory.add_bank("bank2");
                self.program.install_read_bank(LOWER_HALF, bank2);
                if let Some(user2) = self.memory.region_id("user2") {
                    self.memory
                        .set_bank_base(bank2, user2, EXPANSION_PAGE_SIZE * page as usize);
                }
            }
            LowerHalf::Unmapped => {
                log::warn!(
                    "bank select {data:02X}: expansion page {:02X} out of range, 4000-7FFF unmapped",
                    data - EXPANSION_BASE
                );
                self.program.unmap_read(LOWER_HALF);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_page_from_bits_5_and_6() {
        assert_eq!(decode(0x00, None).primary_page, 0);
        assert_eq!(decode(0x20, None).primary_page, 1);
        assert_eq!(decode(0x40, None).primary_page, 2);
        assert_eq!(decode(0x60, None).primary_page, 3);
        assert_eq!(decode(0x1F, None).primary_page, 0);
    }

    #[test]
    fn page_zero_shows_screen_ram() {
        assert_eq!(decode(0x00, None).lower, LowerHalf::ScreenRam);
        assert_eq!(decode(0x20, None).lower, LowerHalf::Primary);
    }

    #[test]
    fn expansion_bit_ignored_without_board() {
        for selector in 0x80..=0xFF {
            let mapping = decode(selector, None);
            assert_ne!(mapping.lower, LowerHalf::Unmapped);
            assert!(!matches!(mapping.lower, LowerHalf::Expansion(_)));
        }
        assert_eq!(decode(0x80, None).lower, LowerHalf::ScreenRam);
    }

    #[test]
    fn expansion_page_is_selector_minus_base() {
        assert_eq!(decode(0x80, Some(0x28)).lower, LowerHalf::Expansion(0));
        assert_eq!(decode(0xA7, Some(0x28)).lower, LowerHalf::Expansion(0x27));
        // Primary page still follows bits 5-6.
        assert_eq!(decode(0xA7, Some(0x28)).primary_page, 1);
    }

    #[test]
    fn expansion_page_past_end_is_unmapped() {
        assert_eq!(decode(0xA8, Some(0x28)).lower, LowerHalf::Unmapped);
        assert_eq!(decode(0xFF, Some(0x28)).lower, LowerHalf::Unmapped);
    }

    #[test]
    fn decode_is_total() {
        for selector in 0..=0xFFu8 {
            for pages in [None, Some(0), Some(0x28), Some(0x80)] {
                let mapping = decode(selector, pages);
                assert!(mapping.primary_page < 4);
            }
        }
    }
}
