//! `bash-hash`: hashing with the `bash-f` sponge.
use alloc::vec::Vec;

use digest::{BlockInput, FixedOutput, Reset, Update};
use generic_array::{
    typenum::{U128, U32, U48, U64, U96},
    GenericArray,
};
use subtle::ConstantTimeEq;

use super::prp::bash_f::{bash_f, ByteOrder, STATE_SIZE, STATE_WORDS};
use crate::error::{Parameter, Result};

/// Padding marker written right after the last message byte.
const PAD: u8 = 0x40;

/// Incremental `bash-hash` engine with a 32, 48 or 64 byte output.
///
/// The state words are kept big-endian packed and the permutation is applied with
/// [`ByteOrder::Big`], which makes the byte view of the state the standard one.
#[derive(Clone, Debug)]
pub struct Bash {
    /// Permutation state.
    s: [u64; STATE_WORDS],

    /// Pending input, only the first `block_len` bytes are used.
    buf: [u8; STATE_SIZE],

    /// Number of pending bytes in `buf`.
    pos: usize,

    /// Total number of bytes processed.
    len: u64,

    output_len: usize,
    block_len: usize,
}

impl Bash {
    /// Create a hash engine producing `output_len` bytes (32, 48 or 64).
    pub fn new(output_len: usize) -> Result<Self> {
        try_or!(
            matches!(output_len, 32 | 48 | 64),
            Parameter::OutputLength(output_len)
        )?;
        Ok(Self::init(output_len))
    }

    /// `output_len` must be already validated.
    fn init(output_len: usize) -> Self {
        let mut h = Self {
            s: [0; STATE_WORDS],
            buf: [0; STATE_SIZE],
            pos: 0,
            len: 0,
            output_len,
            block_len: STATE_SIZE - 2 * output_len,
        };
        h.reset();
        h
    }

    /// Reset to the initial state, keeping the output length.
    pub fn reset(&mut self) {
        self.s = [0; STATE_WORDS];
        self.buf = [0; STATE_SIZE];
        self.pos = 0;
        self.len = 0;
        // byte 184 is the most significant byte of the big-endian packed word 23
        self.s[STATE_WORDS - 1] = (self.output_len as u64) << 56;
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// Total number of bytes passed to [`Bash::update`] since the last reset.
    pub fn processed_len(&self) -> u64 {
        self.len
    }

    /// Absorb more data.
    pub fn update(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        let mut x = data.as_ref();
        self.len = self.len.wrapping_add(x.len() as u64);
        while !x.is_empty() {
            let n = core::cmp::min(self.block_len - self.pos, x.len());
            self.buf[self.pos..self.pos + n].copy_from_slice(&x[..n]);
            x = &x[n..];
            self.pos += n;
            if self.pos == self.block_len {
                self.absorb_block();
                self.pos = 0;
            }
        }
        self
    }

    fn absorb_block(&mut self) {
        for (w, chunk) in self.s.iter_mut().zip(self.buf[..self.block_len].chunks_exact(8)) {
            let mut b = [0_u8; 8];
            b.copy_from_slice(chunk);
            *w ^= u64::from_be_bytes(b);
        }
        bash_f(&mut self.s, ByteOrder::Big);
    }

    /// Pad and absorb the pending block of a copy, then eject `out.len()` bytes.
    /// `out` must be exactly `output_len` bytes long.
    fn finalize(&self, out: &mut [u8]) {
        let mut last = self.clone();
        let (pos, block_len) = (last.pos, last.block_len);
        last.buf[pos..block_len].fill(0);
        last.buf[pos] = PAD;
        last.absorb_block();
        for (chunk, w) in out.chunks_mut(8).zip(last.s.iter()) {
            chunk.copy_from_slice(&w.to_be_bytes()[..chunk.len()]);
        }
    }

    /// Hash value of the data absorbed so far. The engine itself is not modified.
    pub fn digest(&self) -> Vec<u8> {
        let mut out = vec![0; self.output_len];
        self.finalize(&mut out);
        out
    }

    /// Write the hash value into `out`, which must be `output_len` bytes long.
    pub fn digest_into(&self, mut out: impl AsMut<[u8]>) -> Result<()> {
        let out = out.as_mut();
        try_or!(
            out.len() == self.output_len,
            crate::Error::LengthMismatch(self.output_len, out.len())
        )?;
        self.finalize(out);
        Ok(())
    }

    /// Compare the hash value with `expected` in constant time.
    pub fn verify(&self, expected: impl AsRef<[u8]>) -> bool {
        bool::from(self.digest().as_slice().ct_eq(expected.as_ref()))
    }
}

/// Hash `data` at security level `level` (128, 192 or 256), the output is `level / 4` bytes.
pub fn bash_hash(level: usize, data: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    try_or!(matches!(level, 128 | 192 | 256), Parameter::Level(level))?;
    Ok(Bash::new(level / 4)?.update(data).digest())
}

/// `bash256`, aka BASH.HASH128.
pub fn bash256(data: impl AsRef<[u8]>) -> [u8; 32] {
    let mut out = [0; 32];
    Bash::init(32).update(data).finalize(&mut out);
    out
}

/// `bash384`, aka BASH.HASH192.
pub fn bash384(data: impl AsRef<[u8]>) -> [u8; 48] {
    let mut out = [0; 48];
    Bash::init(48).update(data).finalize(&mut out);
    out
}

/// `bash512`, aka BASH.HASH256.
pub fn bash512(data: impl AsRef<[u8]>) -> [u8; 64] {
    let mut out = [0; 64];
    Bash::init(64).update(data).finalize(&mut out);
    out
}

macro_rules! bash_variant {
    ($(#[$doc:meta])* $name:ident, $output_len:expr, $output_size:ty, $block_size:ty) => {
        $(#[$doc])*
        #[derive(Clone, Debug)]
        pub struct $name(Bash);

        impl Default for $name {
            fn default() -> Self {
                Self(Bash::init($output_len))
            }
        }

        impl BlockInput for $name {
            type BlockSize = $block_size;
        }

        impl Update for $name {
            fn update(&mut self, data: impl AsRef<[u8]>) {
                self.0.update(data);
            }
        }

        impl FixedOutput for $name {
            type OutputSize = $output_size;

            fn finalize_into(self, out: &mut GenericArray<u8, Self::OutputSize>) {
                self.0.finalize(out);
            }

            fn finalize_into_reset(&mut self, out: &mut GenericArray<u8, Self::OutputSize>) {
                self.0.finalize(out);
                self.0.reset();
            }
        }

        impl Reset for $name {
            fn reset(&mut self) {
                self.0.reset();
            }
        }
    };
}

bash_variant!(
    /// `digest`-compatible `bash-hash` with a 32 byte output.
    Bash256, 32, U32, U128
);
bash_variant!(
    /// `digest`-compatible `bash-hash` with a 48 byte output.
    Bash384, 48, U48, U96
);
bash_variant!(
    /// `digest`-compatible `bash-hash` with a 64 byte output.
    Bash512, 64, U64, U64
);
