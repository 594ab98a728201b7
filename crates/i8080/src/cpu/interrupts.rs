use super::Cpu8080;
use crate::memory::Bus8080;

/// Restart address for an interrupt vector (`RST n` jumps to 8 * n).
#[inline]
pub const fn vector_address(vector: u8) -> u16 {
    ((vector & 0x07) as u16) << 3
}

impl Cpu8080 {
    /// Handle a maskable interrupt.
    ///
    /// When interrupts are enabled this behaves like `RST vector`: the
    /// current PC is pushed, PC moves to 8 * vector and interrupts are
    /// disabled until the guest executes EI again. A halted CPU wakes up.
    /// With interrupts disabled the request is dropped.
    ///
    /// Returns whether the interrupt was delivered. Only call this between
    /// steps.
    pub fn interrupt(&mut self, bus: &mut dyn Bus8080, vector: u8) -> bool {
        if !self.interrupts_enabled {
            return false;
        }
        self.interrupts_enabled = false;
        self.halted = false;
        self.push(bus, self.pc);
        self.pc = vector_address(vector);
        log::debug!("interrupt {vector} delivered, pc={:04X}", self.pc);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::FlatBus;

    #[test]
    fn vectors_map_to_restart_addresses() {
        assert_eq!(vector_address(1), 0x0008);
        assert_eq!(vector_address(2), 0x0010);
        assert_eq!(vector_address(7), 0x0038);
    }

    #[test]
    fn delivered_interrupt_pushes_pc_and_disables() {
        let mut bus = FlatBus::new();
        let mut cpu = Cpu8080::new();
        cpu.interrupts_enabled = true;
        cpu.pc = 0x1a2b;
        cpu.sp = 0x2400;

        assert!(cpu.interrupt(&mut bus, 1));
        assert_eq!(cpu.pc, 0x0008);
        assert_eq!(cpu.sp, 0x23fe);
        assert_eq!(bus.memory.read(0x23fe), 0x2b);
        assert_eq!(bus.memory.read(0x23ff), 0x1a);
        assert!(!cpu.interrupts_enabled);

        // No EI in between: the second request is dropped.
        assert!(!cpu.interrupt(&mut bus, 2));
        assert_eq!(cpu.pc, 0x0008);
        assert_eq!(cpu.sp, 0x23fe);
    }

    #[test]
    fn disabled_interrupt_is_a_no_op() {
        let mut bus = FlatBus::new();
        let mut cpu = Cpu8080::new();
        cpu.pc = 0x0100;
        cpu.sp = 0x2400;
        assert!(!cpu.interrupt(&mut bus, 2));
        assert_eq!(cpu.pc, 0x0100);
        assert_eq!(cpu.sp, 0x2400);
        assert_eq!(bus.memory.read(0x23ff), 0);
    }
}
