//! Automaton-based pseudo-random number generator.
use rand::{CryptoRng, RngCore, SeedableRng};

use super::prg::BashPrg;
use crate::error::Result;

/// Announcement separating the generator from other uses of a key.
const ANNOUNCEMENT: &[u8; 28] = b"STB 34.101.77 bash-prg rng\0\0";

/// Security level of the generator.
const LEVEL: usize = 256;

/// Capacity of the generator.
const CAPACITY: usize = 2;

/// Pseudo-random number generator over a keyed [`BashPrg`].
///
/// Every request squeezes fresh output and then ratchets the automaton, so a
/// compromised state does not reveal earlier outputs.
#[derive(Clone)]
pub struct BashRng {
    prg: BashPrg,
}

impl BashRng {
    fn gen_mut(&mut self, dest: &mut [u8]) -> Result<()> {
        self.prg.squeeze_mut(dest)?;
        self.prg.ratchet()
    }
}

impl SeedableRng for BashRng {
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut prg = BashPrg::new();
        // level, capacity and header lengths are fixed and valid
        if let Err(e) = prg.start(LEVEL, CAPACITY, ANNOUNCEMENT, seed) {
            panic!("BashRng start failure: {}", e);
        }
        Self { prg }
    }
}

impl RngCore for BashRng {
    fn next_u32(&mut self) -> u32 {
        let mut v = [0_u8; 4];
        self.fill_bytes(&mut v);
        u32::from_le_bytes(v)
    }

    fn next_u64(&mut self) -> u64 {
        let mut v = [0_u8; 8];
        self.fill_bytes(&mut v);
        u64::from_le_bytes(v)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(e) = self.gen_mut(dest) {
            panic!("BashRng failure: {}", e);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for BashRng {}
