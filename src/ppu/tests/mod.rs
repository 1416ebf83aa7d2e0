//! PPU unit tests
//!
//! Tests for the PPU core, organized by functionality: register file,
//! memory routing, frame timing, pixel production, and hardware quirks.

use super::*;
use crate::bus::CpuBus;
use crate::mapper::{BasicMapper, Mirroring};
use crate::palette::DEFAULT_PALETTE;
use crate::video::FrameRecorder;

use std::cell::RefCell;
use std::rc::Rc;

// ========================================
// Test Constants (PPU Register Addresses)
// ========================================

/// PPU Control Register ($2000) - Write only
pub(crate) const PPUCTRL: u16 = 0x2000;
/// PPU Mask Register ($2001) - Write only
pub(crate) const PPUMASK: u16 = 0x2001;
/// PPU Status Register ($2002) - Read only
pub(crate) const PPUSTATUS: u16 = 0x2002;
/// OAM Address Port ($2003) - Write only
pub(crate) const OAMADDR: u16 = 0x2003;
/// OAM Data Port ($2004) - Read/Write
pub(crate) const OAMDATA: u16 = 0x2004;
/// Scroll Position Register ($2005) - Write×2
pub(crate) const PPUSCROLL: u16 = 0x2005;
/// PPU Address Register ($2006) - Write×2
pub(crate) const PPUADDR: u16 = 0x2006;
/// PPU Data Port ($2007) - Read/Write
pub(crate) const PPUDATA: u16 = 0x2007;
/// OAM DMA trigger ($4014) - Write only
pub(crate) const OAMDMA: u16 = 0x4014;

// ========================================
// Test Helpers
// ========================================

/// CPU test double recording NMIs and stall requests
pub(crate) struct MockCpu {
    pub memory: Vec<u8>,
    pub nmi_count: u32,
    pub stalls: Vec<u32>,
    pub odd: bool,
}

impl MockCpu {
    pub fn new() -> Self {
        MockCpu {
            memory: vec![0; 0x10000],
            nmi_count: 0,
            stalls: Vec::new(),
            odd: false,
        }
    }
}

impl CpuBus for MockCpu {
    fn read(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn trigger_nmi(&mut self) {
        self.nmi_count += 1;
    }

    fn stall(&mut self, cycles: u32) {
        self.stalls.push(cycles);
    }

    fn odd_cycle(&self) -> bool {
        self.odd
    }
}

/// Create a PPU wired to a `BasicMapper` with CHR-RAM
pub(crate) fn test_ppu() -> Ppu {
    let mut ppu = Ppu::new();
    let mapper = Rc::new(RefCell::new(
        Box::new(BasicMapper::new(Mirroring::Horizontal)) as Box<dyn Mapper>,
    ));
    ppu.set_mapper(mapper);
    ppu
}

/// Create a PPU plus a frame recorder attached as its video sink
pub(crate) fn ppu_with_recorder() -> (Ppu, Rc<RefCell<FrameRecorder>>) {
    let mut ppu = test_ppu();
    let recorder = Rc::new(RefCell::new(FrameRecorder::new()));
    ppu.set_video_sink(recorder.clone());
    (ppu, recorder)
}

/// Create a PPU plus a mock CPU attached for NMI/DMA traffic
pub(crate) fn ppu_with_cpu() -> (Ppu, Rc<RefCell<MockCpu>>) {
    let mut ppu = test_ppu();
    let cpu = Rc::new(RefCell::new(MockCpu::new()));
    ppu.set_cpu(cpu.clone());
    (ppu, cpu)
}

/// Move the PPU past its register warm-up window without running it
pub(crate) fn skip_warmup(ppu: &mut Ppu) {
    ppu.cycles = WARMUP_CYCLES + 1;
}

/// Set the VRAM address through PPUADDR
pub(crate) fn set_vram_addr(ppu: &mut Ppu, addr: u16) {
    ppu.write(PPUADDR, (addr >> 8) as u8);
    ppu.write(PPUADDR, addr as u8);
}

/// Write one byte of PPU memory through PPUADDR/PPUDATA
pub(crate) fn write_vram(ppu: &mut Ppu, addr: u16, data: u8) {
    set_vram_addr(ppu, addr);
    ppu.write(PPUDATA, data);
}

/// Read one byte of PPU memory through PPUADDR/PPUDATA
///
/// Issues the dummy read needed for buffered (non-palette) addresses.
pub(crate) fn read_vram(ppu: &mut Ppu, addr: u16) -> u8 {
    set_vram_addr(ppu, addr);
    if addr < 0x3F00 {
        let _ = ppu.read(PPUDATA);
    }
    ppu.read(PPUDATA)
}

// ========================================
// Test Modules
// ========================================

mod registers;
