use bitfield::bitfield;

bitfield!{
    /// ATmega8A lock bits: `BLB12 BLB11 BLB02 BLB01 LB2 LB1`.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct LockBits(u8);
    impl Debug;
    pub lb1, set_lb1: 0;
    pub lb2, set_lb2: 1;
    pub blb01, set_blb01: 2;
    pub blb02, set_blb02: 3;
    pub blb11, set_blb11: 4;
    pub blb12, set_blb12: 5;
}

const LOCK_BITS_MASK: u8 = 0x3F;

impl LockBits {
    /// All bits unprogrammed: no lock on memories, no SPM/LPM restrictions
    /// on either the application or the boot loader section.
    pub fn unprogrammed() -> LockBits {
        LockBits(LOCK_BITS_MASK)
    }

    pub fn bits(&self) -> u8 {
        self.0 & LOCK_BITS_MASK
    }

    pub fn is_unrestricted(&self) -> bool {
        self.bits() == LOCK_BITS_MASK
    }
}

impl Default for LockBits {
    fn default() -> LockBits {
        LockBits::unprogrammed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unrestricted() {
        let lock = LockBits::default();
        assert_eq!(lock.bits(), 0x3F);
        assert!(lock.is_unrestricted());
        assert!(lock.lb1() && lock.lb2() && lock.blb12());
    }

    #[test]
    fn programmed_bit_restricts() {
        let mut lock = LockBits::unprogrammed();
        lock.set_blb02(false);
        assert_eq!(lock.bits(), 0x37);
        assert!(!lock.is_unrestricted());
    }
}
