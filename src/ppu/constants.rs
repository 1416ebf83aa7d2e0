// PPU constants

/// PPU register address mask for mirroring
///
/// PPU registers are 8 bytes ($2000-$2007) but mirrored throughout
/// $2000-$3FFF. Use this mask to get the register number: `addr & 0x0007`
pub(super) const PPU_REGISTER_MASK: u16 = 0x0007;

/// CPU address of the OAM DMA trigger
pub(super) const OAMDMA_ADDR: u16 = 0x4014;

/// Size of palette RAM in bytes
pub(super) const PALETTE_SIZE: usize = 32;

/// Size of primary OAM in bytes (64 sprites x 4 bytes)
pub(super) const OAM_SIZE: usize = 256;

/// Size of secondary OAM in bytes (8 sprites x 4 bytes)
pub(super) const SECONDARY_OAM_SIZE: usize = 32;

// ========================================
// PPU Timing Constants (NTSC)
// ========================================

/// Number of PPU dots per scanline
pub(super) const DOTS_PER_SCANLINE: u16 = 341;

/// Number of scanlines per frame (NTSC)
pub(super) const SCANLINES_PER_FRAME: u16 = 262;

/// Total PPU dots per frame when no dot is skipped
/// 341 dots/scanline x 262 scanlines = 89,342 dots
#[allow(dead_code)]
pub(super) const DOTS_PER_FRAME: u32 = (DOTS_PER_SCANLINE as u32) * (SCANLINES_PER_FRAME as u32);

/// Pre-render scanline number
pub(super) const PRERENDER_SCANLINE: i16 = -1;

/// Last visible scanline
pub(super) const LAST_VISIBLE_SCANLINE: i16 = 239;

/// First VBlank scanline; VBlank begins at dot 1 of this line
pub(super) const VBLANK_SCANLINE: i16 = 241;

/// Last scanline of the frame before wrapping to the pre-render line
pub(super) const LAST_SCANLINE: i16 = 260;

/// Register warm-up window in PPU cycles
///
/// Writes to PPUCTRL, PPUMASK, PPUSCROLL and PPUADDR are dropped until the
/// PPU has run 29,658 CPU cycles (three PPU cycles each) after power-on.
pub(super) const WARMUP_CYCLES: u64 = 29_658 * 3;
