// Sprite pipeline
//
// Sprites are processed in three stages spread over each visible scanline:
// dots 1-64 clear the secondary OAM, dots 65-256 evaluate the 64 primary
// OAM entries against the current line, and dots 257-320 load pattern data
// for the up-to-eight survivors into the per-slot shift state used while
// drawing the following scanline.

use super::registers::Status;
use super::Ppu;

impl Ppu {
    /// Run one dot of sprite work on a visible scanline
    pub(super) fn run_sprite_dot(&mut self) {
        let dot = self.dot;

        if (1..=64).contains(&dot) {
            // Stage 1: clear one secondary OAM byte every other dot
            if dot.is_multiple_of(2) {
                self.secondary_oam[(dot as usize) / 2 - 1] = 0xFF;
            }
            return;
        }

        if dot == 65 {
            self.eval_n = 0;
            self.eval_m = 0;
            self.pending_sprite_count = 0;
            self.sprite_zero_at_next = None;
        }
        if (65..=256).contains(&dot) {
            // Stage 2: copy in-range sprites into secondary OAM
            self.evaluate_sprite_dot(dot);
        }

        if (257..=320).contains(&dot) {
            // Stage 3: one slot fetch per eight dots
            self.sprite_count = self.pending_sprite_count;
            self.sprite_zero_at = self.sprite_zero_at_next;
            if (dot - 257).is_multiple_of(8) {
                self.fetch_sprite_slot(((dot - 257) / 8) as usize);
            }
        }
    }

    /// One evaluation dot: odd dots read primary OAM, even dots store
    ///
    /// The evaluation walks sprites with index n and byte index m. An
    /// out-of-range y (checked when m is 0) skips to the next sprite;
    /// completing all four bytes commits a secondary OAM slot. Once eight
    /// slots are full, the scan continues on y coordinates alone to raise
    /// the overflow flag for a ninth in-range sprite.
    fn evaluate_sprite_dot(&mut self, dot: u16) {
        if self.eval_n >= 64 {
            return;
        }
        let height = self.control.sprite_height();

        if self.pending_sprite_count < 8 {
            if !dot.is_multiple_of(2) {
                self.eval_latch = self.oam[4 * self.eval_n + self.eval_m];
                return;
            }

            self.secondary_oam[4 * self.pending_sprite_count + self.eval_m] = self.eval_latch;

            if self.eval_m == 0 {
                let y = i16::from(self.eval_latch);
                if !(self.scanline >= y && self.scanline < y + height) {
                    // Not on this line; the stored y will be overwritten by
                    // the next candidate
                    self.eval_n += 1;
                    return;
                }
            }

            if self.eval_m == 3 {
                if self.eval_n == 0 {
                    self.sprite_zero_at_next = Some(self.pending_sprite_count);
                }
                self.eval_n += 1;
                self.eval_m = 0;
                self.pending_sprite_count += 1;
            } else {
                self.eval_m += 1;
            }
        } else {
            // Secondary OAM is full; keep scanning for the overflow flag
            if !dot.is_multiple_of(2) {
                self.eval_latch = self.oam[4 * self.eval_n];
                return;
            }

            let y = i16::from(self.eval_latch);
            if self.scanline >= y && self.scanline < y + height {
                self.status.insert(Status::SPRITE_OVERFLOW);
            }
            self.eval_n += 1;
        }
    }

    /// Load one sprite slot's shift state from secondary OAM
    ///
    /// Slots past the evaluated count are loaded from an all-0xFF entry, so
    /// their pattern fetch lands in an unused region and their x counter
    /// parks at the right edge.
    fn fetch_sprite_slot(&mut self, slot: usize) {
        let (y, tile, attribute, x) = if slot < self.sprite_count {
            (
                self.secondary_oam[slot * 4],
                self.secondary_oam[slot * 4 + 1],
                self.secondary_oam[slot * 4 + 2],
                self.secondary_oam[slot * 4 + 3],
            )
        } else {
            (0xFF, 0xFF, 0xFF, 0xFF)
        };

        self.sprite_x[slot] = x;
        self.sprite_attributes[slot] = attribute;

        let height = self.control.sprite_height();
        let mut row = self.scanline - i16::from(y);
        if attribute & 0x80 != 0 {
            // Vertical flip, over the full sprite height
            row = height - 1 - row;
        }

        let mut tile = u16::from(tile);
        let table = if height == 16 {
            // 8x16 sprites: bit 0 of the tile index selects the pattern
            // table, and the bottom half comes from the odd tile of the pair
            let table = (tile & 0x1) << 12;
            tile &= 0xFE;
            if row >= 8 {
                tile |= 1;
                row -= 8;
            }
            table
        } else {
            self.control.sprite_table_base()
        };

        let pattern_addr = table | (tile << 4) | (row as u16);
        let mut pattern_lo = self.read_ppu_memory(pattern_addr);
        let mut pattern_hi = self.read_ppu_memory(pattern_addr.wrapping_add(8));

        if attribute & 0x40 != 0 {
            // Horizontal flip
            pattern_lo = pattern_lo.reverse_bits();
            pattern_hi = pattern_hi.reverse_bits();
        }

        self.sprite_pattern_lo[slot] = pattern_lo;
        self.sprite_pattern_hi[slot] = pattern_hi;
    }

    /// Produce the sprite pixel for screen column `x`
    ///
    /// Scans the active slots in priority order, advancing the shift state
    /// of every slot whose x window covers this column. The first opaque
    /// pixel wins.
    ///
    /// # Returns
    ///
    /// The sprite palette index (0x10 + palette * 4 + pattern bits) and the
    /// slot that produced it, or (0, None) when every covering slot is
    /// transparent.
    pub(super) fn sprite_pixel(&mut self, x: u16) -> (u8, Option<usize>) {
        let mut pixel = 0u8;
        let mut source = None;

        for slot in 0..self.sprite_count {
            let offset = x as i16 - i16::from(self.sprite_x[slot]);
            if !(0..8).contains(&offset) {
                continue;
            }

            let bits = ((self.sprite_pattern_hi[slot] & 0x80) >> 6)
                | ((self.sprite_pattern_lo[slot] & 0x80) >> 7);
            self.sprite_pattern_hi[slot] <<= 1;
            self.sprite_pattern_lo[slot] <<= 1;

            if bits != 0 && source.is_none() {
                pixel = 0x10 + bits + 4 * (self.sprite_attributes[slot] & 0x3);
                source = Some(slot);
            }
        }

        (pixel, source)
    }
}
