// rp2c02 - Cycle-accurate NES PPU core
//
// This crate implements the Picture Processing Unit (2C02) of the NES as a
// standalone, cycle-accurate state machine. The CPU core, the cartridge
// mapper, and the presentation layer are external collaborators reached
// through the traits in `bus`, `mapper`, and `video`.

// Public modules
pub mod bus;
pub mod mapper;
pub mod palette;
pub mod ppu;
pub mod video;

// Re-export main types for convenience
pub use bus::{CpuBus, MemoryMappedDevice};
pub use mapper::{BasicMapper, Mapper, Mirroring};
pub use palette::{Palette, PaletteError};
pub use ppu::Ppu;
pub use video::{DumpError, FrameRecorder, VideoSink, SCREEN_HEIGHT, SCREEN_WIDTH};
