//! `bash-prg`: the programmable automaton.
use alloc::vec::Vec;
use core::fmt;

use subtle::{Choice, ConstantTimeEq};

use super::prp::{
    bash_f::{BashF, STATE_SIZE},
    PRP,
};
use crate::error::{
    Error::{BufferOverrun, KeyModeRequired, LengthMismatch, NotStarted},
    Parameter, Result,
};

/// Domain separation codes, identifying the operation a commit starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Restart without a key, ratchet.
    Null = 0x01,
    /// Restart with a key.
    Key = 0x05,
    /// Absorb.
    Data = 0x09,
    /// Encrypt or decrypt.
    Text = 0x0D,
    /// Squeeze.
    Out = 0x11,
}

/// Padding marker written at `buf_len` on commit.
const PAD: u8 = 0x80;

/// Offset of the level/capacity byte.
const PARAMS_OFFSET: usize = STATE_SIZE - 8;

/// Max length of announcements and keys.
const MAX_HEADER_PART: usize = 60;

fn xor(s: &mut [u8], x: &[u8]) {
    for (si, xi) in s.iter_mut().zip(x.iter()) {
        *si ^= *xi;
    }
}

fn copy(s: &[u8], y: &mut [u8]) {
    for (si, yi) in s.iter().zip(y.iter_mut()) {
        *yi = *si;
    }
}

fn encrypt_xor(s: &mut [u8], x: &[u8], y: &mut [u8]) {
    for (si, (xi, yi)) in s.iter_mut().zip(x.iter().zip(y.iter_mut())) {
        *si ^= *xi;
        *yi = *si;
    }
}

fn decrypt_xor(s: &mut [u8], y: &[u8], x: &mut [u8]) {
    for (si, (yi, xi)) in s.iter_mut().zip(y.iter().zip(x.iter_mut())) {
        *xi = *si ^ *yi;
        *si = *yi;
    }
}

fn encrypt_xor_inplace(s: &mut [u8], x: &mut [u8]) {
    for (si, xi) in s.iter_mut().zip(x.iter_mut()) {
        *si ^= *xi;
        *xi = *si;
    }
}

fn decrypt_xor_inplace(s: &mut [u8], y: &mut [u8]) {
    for (si, yi) in s.iter_mut().zip(y.iter_mut()) {
        let t = *yi;
        *yi ^= *si;
        *si = t;
    }
}

fn check_level(l: usize) -> Result<()> {
    try_or!(matches!(l, 128 | 192 | 256), Parameter::Level(l))
}

fn check_capacity(d: usize) -> Result<()> {
    try_or!(matches!(d, 1 | 2), Parameter::Capacity(d))
}

fn check_header(l: usize, ann: &[u8], key: &[u8]) -> Result<()> {
    try_or!(
        ann.len() % 4 == 0 && ann.len() <= MAX_HEADER_PART,
        Parameter::AnnouncementLength(ann.len())
    )?;
    try_or!(
        key.len() % 4 == 0 && key.len() <= MAX_HEADER_PART,
        Parameter::KeyLength(key.len())
    )?;
    try_or!(
        key.is_empty() || key.len() >= l / 8,
        Parameter::KeyTooShort(l / 8, key.len())
    )
}

/// Header byte encoding announcement and key lengths.
fn header(ann: &[u8], key: &[u8]) -> u8 {
    (ann.len() * 4 + key.len() / 4) as u8
}

/// Buffer length in unkeyed mode.
fn unkeyed_buf_len(l: usize, d: usize) -> usize {
    STATE_SIZE - d * l / 4
}

/// Buffer length in keyed mode.
fn keyed_buf_len(l: usize, d: usize) -> usize {
    STATE_SIZE - l * (2 + d) / 16
}

/// Programmable automaton over `bash-f`.
///
/// A fresh automaton is unstarted, every operation but [`BashPrg::start`] fails on it.
/// Each operation first commits the data of the previous one under its own
/// [`Command`] code, so transcripts of different operations never collide.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BashPrg {
    /// Permutation together with its state.
    s: BashF,

    /// Security level.
    l: usize,

    /// Capacity multiplier.
    d: usize,

    /// Size of the data part of the state, 0 for an unstarted automaton.
    buf_len: usize,

    /// Current position (offset in bytes) within the data part.
    pos: usize,
}

impl BashPrg {
    /// Create an unstarted automaton.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> usize {
        self.l
    }

    pub fn capacity(&self) -> usize {
        self.d
    }

    pub fn buf_len(&self) -> usize {
        self.buf_len
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_started(&self) -> bool {
        self.buf_len != 0
    }

    /// Whether the automaton was started or restarted with a key.
    pub fn is_keyed(&self) -> bool {
        16 * (STATE_SIZE - self.buf_len) == self.l * (2 + self.d)
    }

    /// Start with security level `l`, capacity `d`, announcement `ann` and optional `key`.
    ///
    /// `ann` and `key` lengths must be multiples of 4 not exceeding 60, a non-empty `key`
    /// must be at least `l / 8` bytes long.
    pub fn start(&mut self, l: usize, d: usize, ann: impl AsRef<[u8]>, key: impl AsRef<[u8]>) -> Result<()> {
        let (ann, key) = (ann.as_ref(), key.as_ref());
        check_level(l)?;
        check_capacity(d)?;
        check_header(l, ann, key)?;

        let pos = 1 + ann.len() + key.len();
        let s = self.s.state_mut();
        s[0] = header(ann, key);
        s[1..1 + ann.len()].copy_from_slice(ann);
        s[1 + ann.len()..pos].copy_from_slice(key);
        s[pos..].fill(0);
        s[PARAMS_OFFSET] = (l / 4 + d) as u8;

        self.l = l;
        self.d = d;
        self.buf_len = if key.is_empty() {
            unkeyed_buf_len(l, d)
        } else {
            keyed_buf_len(l, d)
        };
        self.pos = pos;
        Ok(())
    }

    /// Restart with a new announcement and optional key, keeping the current secret state.
    /// A non-empty `key` switches the automaton into keyed mode.
    pub fn restart(&mut self, ann: impl AsRef<[u8]>, key: impl AsRef<[u8]>) -> Result<()> {
        let (ann, key) = (ann.as_ref(), key.as_ref());
        try_or!(self.is_started(), NotStarted)?;
        check_header(self.l, ann, key)?;

        if key.is_empty() {
            self.commit(Command::Null)?;
        } else {
            self.commit(Command::Key)?;
            self.buf_len = keyed_buf_len(self.l, self.d);
        }

        let pos = 1 + ann.len() + key.len();
        let s = self.s.state_mut();
        s[0] ^= header(ann, key);
        xor(&mut s[1..1 + ann.len()], ann);
        xor(&mut s[1 + ann.len()..pos], key);
        self.pos = pos;
        Ok(())
    }

    /// Finish the current operation: mark it with `code`, pad and transform.
    fn commit(&mut self, code: Command) -> Result<()> {
        try_or!(self.is_started(), NotStarted)?;
        try_or!(self.pos < self.buf_len, BufferOverrun(self.pos, self.buf_len))?;
        let (pos, buf_len) = (self.pos, self.buf_len);
        let s = self.s.state_mut();
        s[pos] ^= code as u8;
        s[buf_len] ^= PAD;
        self.s.transform();
        self.pos = 0;
        Ok(())
    }

    fn buf_min_mut(&mut self, n: usize) -> &mut [u8] {
        let m = core::cmp::min(self.pos + n, self.buf_len);
        &mut self.s.state_mut()[self.pos..m]
    }

    /// Advance after processing `n` bytes, transforming on a full buffer.
    fn update(&mut self, n: usize) {
        self.pos += n;
        if self.pos == self.buf_len {
            self.s.transform();
            self.pos = 0;
        }
    }

    /// Begin absorbing.
    pub fn absorb_start(&mut self) -> Result<()> {
        self.commit(Command::Data)
    }

    /// Absorb the next piece of data.
    pub fn absorb_step(&mut self, data: impl AsRef<[u8]>) -> Result<()> {
        try_or!(self.is_started(), NotStarted)?;
        let mut x = data.as_ref();
        while !x.is_empty() {
            let s = self.buf_min_mut(x.len());
            let n = s.len();
            xor(s, &x[..n]);
            x = &x[n..];
            self.update(n);
        }
        Ok(())
    }

    /// Absorb `data`.
    pub fn absorb(&mut self, data: impl AsRef<[u8]>) -> Result<()> {
        self.absorb_start()?;
        self.absorb_step(data)
    }

    /// Begin squeezing.
    pub fn squeeze_start(&mut self) -> Result<()> {
        self.commit(Command::Out)
    }

    /// Squeeze the next piece of output into `out`.
    pub fn squeeze_step(&mut self, mut out: impl AsMut<[u8]>) -> Result<()> {
        try_or!(self.is_started(), NotStarted)?;
        let mut y = out.as_mut();
        while !y.is_empty() {
            let s = self.buf_min_mut(y.len());
            let n = s.len();
            copy(s, &mut y[..n]);
            y = &mut y[n..];
            self.update(n);
        }
        Ok(())
    }

    /// Squeeze `out.len()` bytes into `out`.
    pub fn squeeze_mut(&mut self, out: impl AsMut<[u8]>) -> Result<()> {
        self.squeeze_start()?;
        self.squeeze_step(out)
    }

    /// Squeeze `n` bytes.
    pub fn squeeze(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut y = vec![0; n];
        self.squeeze_mut(&mut y)?;
        Ok(y)
    }

    /// Squeeze `expected.len()` bytes and compare them with `expected` in constant time.
    pub fn squeeze_eq(&mut self, expected: impl AsRef<[u8]>) -> Result<bool> {
        self.squeeze_start()?;
        let mut y = expected.as_ref();
        let mut eq = Choice::from(1);
        while !y.is_empty() {
            let s = self.buf_min_mut(y.len());
            let n = s.len();
            eq &= (&*s).ct_eq(&y[..n]);
            y = &y[n..];
            self.update(n);
        }
        Ok(eq.into())
    }

    /// Begin encrypting, the automaton must be keyed.
    pub fn encr_start(&mut self) -> Result<()> {
        try_or!(self.is_keyed(), KeyModeRequired)?;
        self.commit(Command::Text)
    }

    /// Encrypt in-place the next piece of plaintext.
    pub fn encr_step(&mut self, mut buf: impl AsMut<[u8]>) -> Result<()> {
        try_or!(self.is_started(), NotStarted)?;
        try_or!(self.is_keyed(), KeyModeRequired)?;
        let mut xy = buf.as_mut();
        while !xy.is_empty() {
            let s = self.buf_min_mut(xy.len());
            let n = s.len();
            encrypt_xor_inplace(s, &mut xy[..n]);
            xy = &mut xy[n..];
            self.update(n);
        }
        Ok(())
    }

    /// Encrypt a byte slice.
    /// Input and output slices must be non-overlapping and of the same length.
    pub fn encrypt_mut(&mut self, plain: impl AsRef<[u8]>, mut cipher: impl AsMut<[u8]>) -> Result<()> {
        let mut plain = plain.as_ref();
        let mut cipher = cipher.as_mut();
        try_or!(plain.len() == cipher.len(), LengthMismatch(plain.len(), cipher.len()))?;
        self.encr_start()?;
        while !plain.is_empty() {
            let s = self.buf_min_mut(plain.len());
            let n = s.len();
            encrypt_xor(s, &plain[..n], &mut cipher[..n]);
            plain = &plain[n..];
            cipher = &mut cipher[n..];
            self.update(n);
        }
        Ok(())
    }

    /// Encrypt in-place.
    pub fn encrypt_inplace(&mut self, buf: impl AsMut<[u8]>) -> Result<()> {
        self.encr_start()?;
        self.encr_step(buf)
    }

    /// Encrypt `plain`, returning the ciphertext.
    pub fn encrypt(&mut self, plain: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let plain = plain.as_ref();
        let mut cipher = vec![0; plain.len()];
        self.encrypt_mut(plain, &mut cipher)?;
        Ok(cipher)
    }

    /// Begin decrypting, the automaton must be keyed.
    pub fn decr_start(&mut self) -> Result<()> {
        try_or!(self.is_keyed(), KeyModeRequired)?;
        self.commit(Command::Text)
    }

    /// Decrypt in-place the next piece of ciphertext.
    pub fn decr_step(&mut self, mut buf: impl AsMut<[u8]>) -> Result<()> {
        try_or!(self.is_started(), NotStarted)?;
        try_or!(self.is_keyed(), KeyModeRequired)?;
        let mut xy = buf.as_mut();
        while !xy.is_empty() {
            let s = self.buf_min_mut(xy.len());
            let n = s.len();
            decrypt_xor_inplace(s, &mut xy[..n]);
            xy = &mut xy[n..];
            self.update(n);
        }
        Ok(())
    }

    /// Decrypt a byte slice.
    /// Input and output slices must be non-overlapping and of the same length.
    pub fn decrypt_mut(&mut self, cipher: impl AsRef<[u8]>, mut plain: impl AsMut<[u8]>) -> Result<()> {
        let mut cipher = cipher.as_ref();
        let mut plain = plain.as_mut();
        try_or!(plain.len() == cipher.len(), LengthMismatch(cipher.len(), plain.len()))?;
        self.decr_start()?;
        while !cipher.is_empty() {
            let s = self.buf_min_mut(cipher.len());
            let n = s.len();
            decrypt_xor(s, &cipher[..n], &mut plain[..n]);
            cipher = &cipher[n..];
            plain = &mut plain[n..];
            self.update(n);
        }
        Ok(())
    }

    /// Decrypt in-place.
    pub fn decrypt_inplace(&mut self, buf: impl AsMut<[u8]>) -> Result<()> {
        self.decr_start()?;
        self.decr_step(buf)
    }

    /// Decrypt `cipher`, returning the plaintext.
    pub fn decrypt(&mut self, cipher: impl AsRef<[u8]>) -> Result<Vec<u8>> {
        let cipher = cipher.as_ref();
        let mut plain = vec![0; cipher.len()];
        self.decrypt_mut(cipher, &mut plain)?;
        Ok(plain)
    }

    /// Irreversibly change the state: commit and mix the previous state back in.
    pub fn ratchet(&mut self) -> Result<()> {
        let t = self.s;
        self.commit(Command::Null)?;
        xor(self.s.state_mut(), t.state());
        Ok(())
    }
}

impl fmt::Debug for BashPrg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.s.state();
        write!(
            f,
            "[{}:{}|{}]",
            hex::encode(&s[..self.pos]),
            hex::encode(&s[self.pos..self.buf_len]),
            hex::encode(&s[self.buf_len..])
        )
    }
}
