use generic_array::{typenum::U192, GenericArray};

use super::PRP;

/// Number of `bash-f` rounds.
pub const ROUNDS: usize = 24;

/// Size of the `bash-f` state in 64-bit words.
pub const STATE_WORDS: usize = 24;

/// Size of the `bash-f` state in bytes.
pub const STATE_SIZE: usize = 192;

/// Round constants, `RC[i]` is injected into word 23 at the end of round `i`.
const RC: [u64; ROUNDS] = [
    0x3bf5080ac8ba94b1,
    0xc1d1659c1bbd92f6,
    0x60e8b2ce0ddec97b,
    0xec5fb8fe790fbc13,
    0xaa043de6436706a7,
    0x8929ff6a5e535bfd,
    0x98bf1e2c50c97550,
    0x4c5f8f162864baa8,
    0x262fc78b14325d54,
    0x1317e3c58a192eaa,
    0x098bf1e2c50c9755,
    0xd8ee19681d669304,
    0x6c770cb40eb34982,
    0x363b865a0759a4c1,
    0xc73622b47c4c0ace,
    0x639b115a3e260567,
    0xede6693460f3da1d,
    0xaad8d5034f9935a0,
    0x556c6a81a7cc9ad0,
    0x2ab63540d3e64d68,
    0x155b1aa069f326b4,
    0x0aad8d5034f9935a,
    0x0556c6a81a7cc9ad,
    0xde8082cd72debc78,
];

/// Rotation amounts `(m1, n1, m2, n2)` of the `bash-s` slot `v`.
const ROT: [[u8; 4]; 8] = [
    [8, 53, 14, 1],
    [56, 51, 34, 7],
    [8, 37, 46, 49],
    [56, 3, 2, 23],
    [8, 21, 14, 33],
    [56, 19, 34, 39],
    [8, 5, 46, 17],
    [56, 35, 2, 55],
];

/// Word shuffle applied after the `bash-s` layer: `S'[i] = S[P[i]]`.
const P: [usize; STATE_WORDS] = [
    15, 10, 9, 12, 11, 14, 13, 8, 17, 16, 19, 18, 21, 20, 23, 22, 6, 3, 0, 5, 2, 7, 4, 1,
];

/// Interpretation of the state words at the boundary of [`bash_f`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Words are used as is.
    Little,
    /// Words are byte-swapped before the first and after the last round.
    Big,
}

/// Left rotation, amounts 0 and 64 (or more) leave the word unchanged.
#[inline(always)]
fn rot_hi(x: u64, n: u32) -> u64 {
    if n == 0 || n >= 64 {
        x
    } else {
        x.rotate_left(n)
    }
}

/// `bash-s`: nonlinear update of the words `i0`, `i1`, `i2`.
#[allow(clippy::too_many_arguments)]
#[inline(always)]
pub fn bash_s(s: &mut [u64; STATE_WORDS], i0: usize, i1: usize, i2: usize, m1: u32, n1: u32, m2: u32, n2: u32) {
    let mut t0 = rot_hi(s[i0], m1);
    s[i0] ^= s[i1] ^ s[i2];
    let mut t1 = s[i1] ^ rot_hi(s[i0], n1);
    s[i1] = t0 ^ t1;
    s[i2] ^= rot_hi(s[i2], m2) ^ rot_hi(t1, n2);
    t0 = !s[i2];
    t1 = s[i0] | s[i2];
    let t2 = s[i0] & s[i1];
    t0 |= s[i1];
    s[i1] ^= t1;
    s[i2] ^= t2;
    s[i0] ^= t0;
}

fn permute(s: &mut [u64; STATE_WORDS]) {
    let t = *s;
    for (si, &pi) in s.iter_mut().zip(P.iter()) {
        *si = t[pi];
    }
}

fn swap_words(s: &mut [u64; STATE_WORDS]) {
    for w in s.iter_mut() {
        *w = w.swap_bytes();
    }
}

/// `bash-f`: the 24-round sponge permutation.
pub fn bash_f(s: &mut [u64; STATE_WORDS], order: ByteOrder) {
    if order == ByteOrder::Big {
        swap_words(s);
    }

    for rc in RC.iter() {
        for (v, rot) in ROT.iter().enumerate() {
            bash_s(
                s,
                v,
                v + 8,
                v + 16,
                rot[0] as u32,
                rot[1] as u32,
                rot[2] as u32,
                rot[3] as u32,
            );
        }
        permute(s);
        s[23] ^= *rc;
    }

    if order == ByteOrder::Big {
        swap_words(s);
    }
}

/// A pseudo-random permutation implementing `bash-f` over a byte state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BashF {
    /// State bytes, word `i` is stored little-endian at `8 * i`.
    state: GenericArray<u8, U192>,
}

impl BashF {
    /// Use `bash-f` on the state.
    fn permutation(&mut self) {
        let mut words = [0_u64; STATE_WORDS];
        for (w, chunk) in words.iter_mut().zip(self.state.chunks_exact(8)) {
            let mut b = [0_u8; 8];
            b.copy_from_slice(chunk);
            *w = u64::from_le_bytes(b);
        }
        bash_f(&mut words, ByteOrder::Little);
        for (w, chunk) in words.iter().zip(self.state.chunks_exact_mut(8)) {
            chunk.copy_from_slice(&w.to_le_bytes());
        }
    }
}

impl PRP for BashF {
    type StateSize = U192;

    fn transform(&mut self) {
        self.permutation();
    }

    fn state(&self) -> &GenericArray<u8, Self::StateSize> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut GenericArray<u8, Self::StateSize> {
        &mut self.state
    }
}
