// Bus module - CPU-facing interfaces
//
// The PPU sits on the CPU bus twice: its eight registers are mirrored
// throughout $2000-$3FFF, and the OAM DMA trigger lives at $4014. The outer
// emulator routes those ranges here through `MemoryMappedDevice`.
//
// ```text
// $2000-$2007: PPU Registers
// $2008-$3FFF: Mirrors of PPU Registers (repeating every 8 bytes)
// $4014:       OAM DMA trigger
// ```
//
// Going the other way, the PPU needs a narrow view of the CPU: a read path
// for the OAM DMA source page, an NMI trigger, and a stall request for the
// DMA transfer window. `CpuBus` bundles those capabilities so the core never
// holds a reference to the CPU itself.

/// Trait for memory-mapped components
///
/// Defines the interface for components that can be mapped into the CPU's
/// address space. The PPU implements this trait to expose its register file;
/// addresses are masked by the implementation, so mirrors are handled
/// transparently.
pub trait MemoryMappedDevice {
    /// Read a byte from the device
    ///
    /// # Arguments
    /// * `addr` - The address to read from (device-specific addressing)
    ///
    /// # Returns
    /// The byte value at the specified address
    fn read(&mut self, addr: u16) -> u8;

    /// Write a byte to the device
    ///
    /// # Arguments
    /// * `addr` - The address to write to (device-specific addressing)
    /// * `data` - The byte value to write
    fn write(&mut self, addr: u16, data: u8);
}

/// The PPU's view of the CPU
///
/// The PPU never owns the CPU; it borrows these capabilities when an NMI
/// fires or an OAM DMA transfer runs. A test double can count NMIs and
/// record stall requests.
pub trait CpuBus {
    /// Read a byte from CPU address space (used as the OAM DMA source)
    fn read(&mut self, addr: u16) -> u8;

    /// Raise the CPU's non-maskable interrupt line
    ///
    /// Edge-triggered and idempotent within a frame; the CPU side is
    /// responsible for deduplicating repeated assertions.
    fn trigger_nmi(&mut self);

    /// Suspend the CPU for `cycles` CPU clock cycles
    ///
    /// OAM DMA requests 513 cycles, or 514 when it starts on an odd CPU
    /// cycle.
    fn stall(&mut self, cycles: u32);

    /// Whether the CPU is currently on an odd clock cycle
    ///
    /// Decides the extra alignment cycle of an OAM DMA stall.
    fn odd_cycle(&self) -> bool;
}
