//! Hashing and authenticated encryption expressed through [`BashPrg`].
use alloc::vec::Vec;

use crate::{
    core::prg::BashPrg,
    error::{Error::BadMac, Result},
};

/// Hash `data` at security level `l` with capacity `d`, the output is `l / 4` bytes.
pub fn prg_hash(l: usize, d: usize, data: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    let mut alpha = BashPrg::new();
    alpha.start(l, d, [0_u8; 0], [0_u8; 0])?;
    alpha.absorb(data)?;
    alpha.squeeze(l / 4)
}

/// Authenticated encryption: returns the ciphertext of `plain` followed by an `l / 8` byte tag
/// covering `ann`, `ad` and `plain`.
pub fn prg_ae_encrypt(
    l: usize,
    d: usize,
    ann: impl AsRef<[u8]>,
    plain: impl AsRef<[u8]>,
    ad: impl AsRef<[u8]>,
    key: impl AsRef<[u8]>,
) -> Result<Vec<u8>> {
    let mut alpha = BashPrg::new();
    alpha.start(l, d, ann, key)?;
    alpha.absorb(ad)?;
    let mut y = alpha.encrypt(plain)?;
    y.extend_from_slice(&alpha.squeeze(l / 8)?);
    Ok(y)
}

/// Authenticated decryption of a ciphertext produced by [`prg_ae_encrypt`].
///
/// Fails with [`BadMac`](crate::Error::BadMac) if the tag does not match, the plaintext is
/// released only on success.
pub fn prg_ae_decrypt(
    l: usize,
    d: usize,
    ann: impl AsRef<[u8]>,
    cipher: impl AsRef<[u8]>,
    ad: impl AsRef<[u8]>,
    key: impl AsRef<[u8]>,
) -> Result<Vec<u8>> {
    let cipher = cipher.as_ref();
    let mut alpha = BashPrg::new();
    alpha.start(l, d, ann, key)?;
    if cipher.len() < l / 8 {
        return err!(BadMac);
    }
    let (y, tag) = cipher.split_at(cipher.len() - l / 8);
    alpha.absorb(ad)?;
    let x = alpha.decrypt(y)?;
    try_or!(alpha.squeeze_eq(tag)?, BadMac)?;
    Ok(x)
}
