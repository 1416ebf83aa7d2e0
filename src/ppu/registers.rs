// PPU register handling
//
// The register file decodes the eight CPU-visible ports plus the OAM DMA
// trigger. Several reads have side effects (PPUSTATUS clears the VBlank flag
// and the write toggle; PPUDATA advances the VRAM address); each is noted on
// the match arm that implements it.

use bitflags::bitflags;

use super::constants::WARMUP_CYCLES;
use super::Ppu;
use crate::bus::CpuBus;

bitflags! {
    /// PPUCTRL ($2000)
    ///
    /// Bits 1-0 select the base nametable and are additionally copied into
    /// bits 11-10 of the temporary VRAM address on every write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Control: u8 {
        /// Base nametable address, low bit
        const NAMETABLE_LO = 0b0000_0001;
        /// Base nametable address, high bit
        const NAMETABLE_HI = 0b0000_0010;
        /// VRAM address increment per PPUDATA access (0: +1, 1: +32)
        const VRAM_INCREMENT_32 = 0b0000_0100;
        /// Sprite pattern table for 8x8 sprites (0: $0000, 1: $1000)
        const SPRITE_TABLE_1000 = 0b0000_1000;
        /// Background pattern table (0: $0000, 1: $1000)
        const BACKGROUND_TABLE_1000 = 0b0001_0000;
        /// Sprite size (0: 8x8, 1: 8x16)
        const SPRITES_8X16 = 0b0010_0000;
        /// PPU master/slave select (unused by the core)
        const MASTER_SLAVE = 0b0100_0000;
        /// Generate an NMI at the start of VBlank
        const GENERATE_NMI = 0b1000_0000;
    }
}

impl Control {
    /// VRAM address step applied after each PPUDATA access
    pub fn vram_increment(self) -> u16 {
        if self.contains(Control::VRAM_INCREMENT_32) {
            32
        } else {
            1
        }
    }

    /// Base address of the 8x8 sprite pattern table
    pub fn sprite_table_base(self) -> u16 {
        if self.contains(Control::SPRITE_TABLE_1000) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Base address of the background pattern table
    pub fn background_table_base(self) -> u16 {
        if self.contains(Control::BACKGROUND_TABLE_1000) {
            0x1000
        } else {
            0x0000
        }
    }

    /// Sprite height in pixels (8 or 16)
    pub fn sprite_height(self) -> i16 {
        if self.contains(Control::SPRITES_8X16) {
            16
        } else {
            8
        }
    }
}

bitflags! {
    /// PPUMASK ($2001)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mask: u8 {
        /// Produce a grayscale display
        const GRAYSCALE = 0b0000_0001;
        /// Show background in the leftmost 8 pixels
        const SHOW_BACKGROUND_LEFT = 0b0000_0010;
        /// Show sprites in the leftmost 8 pixels
        const SHOW_SPRITES_LEFT = 0b0000_0100;
        /// Render the background plane
        const SHOW_BACKGROUND = 0b0000_1000;
        /// Render the sprite plane
        const SHOW_SPRITES = 0b0001_0000;
        /// Emphasize red
        const EMPHASIZE_RED = 0b0010_0000;
        /// Emphasize green
        const EMPHASIZE_GREEN = 0b0100_0000;
        /// Emphasize blue
        const EMPHASIZE_BLUE = 0b1000_0000;
    }
}

impl Mask {
    /// Whether either rendering plane is enabled
    pub fn rendering_enabled(self) -> bool {
        self.intersects(Mask::SHOW_BACKGROUND | Mask::SHOW_SPRITES)
    }

    /// Emphasis bits packed as (blue, green, red) in bits 2..0
    pub fn emphasis(self) -> u8 {
        self.bits() >> 5
    }
}

bitflags! {
    /// PPUSTATUS ($2002), bits 7:5
    ///
    /// The low five bits of a status read come from the register latch, not
    /// from here.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        /// More than eight in-range sprites were found on a scanline
        const SPRITE_OVERFLOW = 0b0010_0000;
        /// An opaque sprite-0 pixel overlapped an opaque background pixel
        const SPRITE_ZERO_HIT = 0b0100_0000;
        /// Currently in the vertical blanking interval
        const VBLANK = 0b1000_0000;
    }
}

impl Ppu {
    /// Read from a PPU register
    ///
    /// # Arguments
    ///
    /// * `register` - The register number (0-7)
    ///
    /// # Register Behaviors
    ///
    /// - PPUSTATUS ($2002): returns flags over the latch's low 5 bits;
    ///   clears the VBlank flag and resets the shared write toggle
    /// - OAMDATA ($2004): returns OAM data at the current OAM address, or
    ///   0xFF during the secondary-OAM clear window of a rendered scanline
    /// - PPUDATA ($2007): buffered for non-palette addresses, then advances v
    /// - Write-only registers: return the last value seen on the bus latch
    pub(super) fn read_register(&mut self, register: u16) -> u8 {
        match register {
            2 => {
                // $2002: PPUSTATUS
                // Reading has two side effects: the VBlank flag is cleared
                // and the PPUSCROLL/PPUADDR write toggle resets.
                let value = (self.latch & 0x1F) | self.status.bits();
                self.status.remove(Status::VBLANK);
                self.write_toggle = false;
                value
            }
            4 => {
                // $2004: OAMDATA
                // While the secondary OAM of a rendered scanline is being
                // cleared (dots 1-64), the port reads back 0xFF.
                if self.mask.rendering_enabled()
                    && (0..=239).contains(&self.scanline)
                    && (1..=64).contains(&self.dot)
                {
                    0xFF
                } else {
                    self.oam[self.oam_addr as usize]
                }
            }
            7 => {
                // $2007: PPUDATA
                // Non-palette reads return the stale buffer and refill it
                // from the current address. Palette reads return the palette
                // byte directly but still refill the buffer from the
                // nametable underneath the palette window.
                let addr = self.v & 0x3FFF;
                let value = if addr >= 0x3F00 {
                    self.read_buffer = self.read_ppu_memory(addr - 0x1000);
                    self.read_ppu_memory(addr)
                } else {
                    let stale = self.read_buffer;
                    self.read_buffer = self.read_ppu_memory(addr);
                    stale
                };

                self.v = self.v.wrapping_add(self.control.vram_increment()) & 0x7FFF;
                value
            }
            _ => {
                // Write-only ports read back the bus latch
                self.latch
            }
        }
    }

    /// Write to a PPU register
    ///
    /// Every write refreshes the bus latch, including writes dropped by the
    /// warm-up gate. PPUCTRL, PPUMASK, PPUSCROLL and PPUADDR are ignored
    /// until the PPU has run its power-on warm-up period.
    ///
    /// # Arguments
    ///
    /// * `register` - The register number (0-7)
    /// * `data` - The value to write
    pub(super) fn write_register(&mut self, register: u16, data: u8) {
        self.latch = data;

        let warmed_up = self.cycles > WARMUP_CYCLES;
        match register {
            0 => {
                // $2000: PPUCTRL
                if !warmed_up {
                    tracing::trace!(data, "PPUCTRL write dropped during warm-up");
                    return;
                }

                let was_nmi_enabled = self.control.contains(Control::GENERATE_NMI);
                self.control = Control::from_bits_truncate(data);

                // t: ...GH.. ........ <- d: ......GH
                self.t = (self.t & 0xF3FF) | ((u16::from(data) & 0x03) << 10);

                // Enabling NMI generation while the VBlank flag is still set
                // fires the interrupt right away.
                if !was_nmi_enabled
                    && self.control.contains(Control::GENERATE_NMI)
                    && self.status.contains(Status::VBLANK)
                {
                    self.trigger_nmi();
                }
            }
            1 => {
                // $2001: PPUMASK
                if !warmed_up {
                    tracing::trace!(data, "PPUMASK write dropped during warm-up");
                    return;
                }
                self.mask = Mask::from_bits_truncate(data);
            }
            2 => {
                // $2002: PPUSTATUS is read-only
            }
            3 => {
                // $2003: OAMADDR
                self.oam_addr = data;
            }
            4 => {
                // $2004: OAMDATA
                // Stores and advances the OAM address outside of rendering;
                // writes during rendering are dropped.
                if !self.rendering_active() {
                    self.oam[self.oam_addr as usize] = data;
                    self.oam_addr = self.oam_addr.wrapping_add(1);
                }
            }
            5 => {
                // $2005: PPUSCROLL (two writes: X then Y)
                if !warmed_up {
                    tracing::trace!(data, "PPUSCROLL write dropped during warm-up");
                    return;
                }

                if !self.write_toggle {
                    // t: ....... ...ABCDE <- d: ABCDEFGH
                    // x:              FGH <- d: ABCDEFGH
                    self.t = (self.t & 0xFFE0) | (u16::from(data) >> 3);
                    self.fine_x = data & 0x07;
                    self.write_toggle = true;
                } else {
                    // t: FGH..AB CDE..... <- d: ABCDEFGH
                    self.t = (self.t & 0x8C1F)
                        | ((u16::from(data) & 0xF8) << 2)
                        | ((u16::from(data) & 0x07) << 12);
                    self.write_toggle = false;
                }
            }
            6 => {
                // $2006: PPUADDR (two writes: high byte then low byte)
                if !warmed_up {
                    tracing::trace!(data, "PPUADDR write dropped during warm-up");
                    return;
                }

                if !self.write_toggle {
                    // t: .CDEFGH ........ <- d: ..CDEFGH, bit 14 cleared
                    self.t = (self.t & 0x80FF) | ((u16::from(data) & 0x3F) << 8);
                    self.write_toggle = true;
                } else {
                    // t: ....... ABCDEFGH <- d: ABCDEFGH, then v <- t
                    self.t = (self.t & 0xFF00) | u16::from(data);
                    self.v = self.t;
                    self.write_toggle = false;
                }
            }
            7 => {
                // $2007: PPUDATA
                self.write_ppu_memory(self.v, data);
                self.v = self.v.wrapping_add(self.control.vram_increment()) & 0x7FFF;
            }
            _ => {}
        }
    }

    /// Run an OAM DMA transfer ($4014)
    ///
    /// Copies 256 bytes from CPU page `data << 8` into OAM, starting at the
    /// current OAM address and wrapping within OAM. The CPU is stalled for
    /// 513 cycles, or 514 when the transfer starts on an odd CPU cycle.
    pub(super) fn oam_dma(&mut self, data: u8) {
        self.latch = data;

        let Some(cpu) = self.cpu.clone() else {
            return;
        };
        let mut cpu = cpu.borrow_mut();

        let mut stall = 513;
        if cpu.odd_cycle() {
            stall += 1;
        }
        cpu.stall(stall);

        let base = u16::from(data) << 8;
        for i in 0..256u16 {
            let byte = cpu.read(base | i);
            self.oam[(usize::from(self.oam_addr) + usize::from(i)) & 0xFF] = byte;
        }

        tracing::trace!(page = data, stall, "OAM DMA transfer");
    }
}
