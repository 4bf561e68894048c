use alloc::vec::Vec;

use digest::Digest;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use super::{
    hash::{bash256, bash384, bash512, bash_hash, Bash, Bash256, Bash384, Bash512},
    prg::BashPrg,
    prp::{
        bash_f::{bash_f, bash_s, BashF, ByteOrder, STATE_WORDS},
        PRP,
    },
};
use crate::{Error, Parameter};

// Vectors from "МИ.10177.10.01", tests of STB 34.101.77-2020.

const MSG_127: &str = "B194BAC80A08F53B366D008E584A5DE48504FA9D1BB6C7AC252E72C202FDCE0D\
                       5BE3D61217B96181FE6786AD716B890B5CB0C0FF33C356B835C405AED8E07F99\
                       E12BDC1AE28257EC703FCCF095EE8DF1C1AB76389FE678CAF7C6F860D5BB9C4F\
                       F33C657B637C306ADD4EA7799EB23D313E98B56E27D3BCCF591E181F4C5AB7";

const MSG_TEXT: &str = "466966747920666F7572206279746520\
                        6F7220666F75722068756E6472656420\
                        7468697274792074776F20626974206D\
                        657373616765";

fn unhex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

#[test]
fn bash256_vectors() {
    assert_eq!(
        bash256(b"")[..],
        unhex("114C3DFAE373D9BCBC3602D6386F2D6A2059BA1BF9048DBAA5146A6CB775709D")[..]
    );
    assert_eq!(
        bash256(&unhex(MSG_127)[..127])[..],
        unhex("3D7F4EFA00E9BA33FEED259986567DCF5C6D12D51057A968F14F06CC0F905961")[..]
    );
    assert_eq!(
        bash256(unhex(MSG_TEXT))[..],
        unhex("8F866380A7714B539DBC9F3D18020BCAEDBD428AECC69F1405699BE12C19ED02")[..]
    );
}

#[test]
fn bash384_vectors() {
    assert_eq!(
        bash384(b"")[..],
        unhex(
            "296F63CDDF8E4963A657A8861FAD1D9D75BAF67E747B7E00AF8E55BAB9E2627B\
             B0E2B752D867E70BEB88D13D495A4ECB"
        )[..]
    );
    assert_eq!(
        bash384(&unhex(MSG_127)[..95])[..],
        unhex(
            "64334AF830D33F63E9ACDFA184E32522103FFF5C6860110A2CD369EDBC04387C\
             501D8F92F749AE4DE15A8305C353D64D"
        )[..]
    );
    assert_eq!(
        bash384(unhex(MSG_TEXT))[..],
        unhex(
            "0CC67F5E0D51D7D174146E85393C171F3E7B76456589653ED19025C4B2A69601\
             B685F4EC7D8CCB6EE1E7EC8793A82D55"
        )[..]
    );
}

#[test]
fn bash512_vectors() {
    assert_eq!(
        bash512(b"")[..],
        unhex(
            "D3A5F9B655CE3EFC1C3E6F2FA1E10F39EC1C3950462097CED1130814868E49E3\
             887581066CD78A97B6685A410E239D12A357FAFF1B252D6310AA1F95FD4A0283"
        )[..]
    );
    assert_eq!(
        bash512(&unhex(MSG_127)[..63])[..],
        unhex(
            "2A66C87C189C12E255239406123BDEDBF19955EAF0808B2AD705E249220845E2\
             0F4786FB6765D0B5C48984B1B16556EF19EA8192B985E4233D9C09508D6339E7"
        )[..]
    );
    assert_eq!(
        bash512(unhex(MSG_TEXT))[..],
        unhex(
            "38FBE3C7A8F85A6416E876EF884F68886336E5214BC189D5B30079211861B4C8\
             846012005C4316313B31CB0B1FB5011E1FDADF7E48061283BCCBD67DE9131DDA"
        )[..]
    );
}

#[test]
fn digest_types_match_engine() {
    let msg = unhex(MSG_TEXT);
    assert_eq!(Bash256::digest(&msg)[..], bash256(&msg)[..]);
    assert_eq!(Bash384::digest(&msg)[..], bash384(&msg)[..]);
    assert_eq!(Bash512::digest(&msg)[..], bash512(&msg)[..]);

    let mut h = Bash256::new();
    h.update(&msg[..10]);
    h.update(&msg[10..]);
    assert_eq!(h.finalize_reset()[..], bash256(&msg)[..]);
    assert_eq!(h.finalize()[..], bash256(b"")[..]);
}

#[test]
fn bash_hash_by_level() {
    let msg = unhex(MSG_TEXT);
    assert_eq!(bash_hash(128, &msg).unwrap(), bash256(&msg).to_vec());
    assert_eq!(bash_hash(192, &msg).unwrap(), bash384(&msg).to_vec());
    assert_eq!(bash_hash(256, &msg).unwrap(), bash512(&msg).to_vec());
    let e = bash_hash(64, &msg).unwrap_err();
    assert_eq!(e.downcast_ref::<Error>(), Some(&Error::InvalidParameter(Parameter::Level(64))));
}

#[test]
fn invalid_output_len() {
    for &n in &[0, 16, 33, 128] {
        let e = Bash::new(n).unwrap_err();
        assert_eq!(
            e.downcast_ref::<Error>(),
            Some(&Error::InvalidParameter(Parameter::OutputLength(n)))
        );
    }
    assert_eq!(Bash::new(32).unwrap().block_len(), 128);
    assert_eq!(Bash::new(48).unwrap().block_len(), 96);
    assert_eq!(Bash::new(64).unwrap().block_len(), 64);
}

#[test]
fn incremental_equals_one_shot() {
    let mut rng = StdRng::seed_from_u64(34_101_77);
    let mut msg = vec![0_u8; 1000];
    rng.fill_bytes(&mut msg);

    for &output_len in &[32, 48, 64] {
        let mut one_shot = Bash::new(output_len).unwrap();
        one_shot.update(&msg);
        let expected = one_shot.digest();

        for _ in 0..20 {
            let mut h = Bash::new(output_len).unwrap();
            let mut rest = &msg[..];
            while !rest.is_empty() {
                let n = rng.gen_range(0..=rest.len().min(200));
                h.update(&rest[..n]);
                rest = &rest[n..];
            }
            assert_eq!(h.processed_len(), msg.len() as u64);
            assert_eq!(h.digest(), expected);
        }

        let mut bytewise = Bash::new(output_len).unwrap();
        for b in msg.iter() {
            bytewise.update([*b]);
        }
        assert_eq!(bytewise.digest(), expected);
    }
}

#[test]
fn digest_leaves_engine_usable() {
    let mut h = Bash::new(32).unwrap();
    h.update(b"foo");
    assert_eq!(h.digest(), h.digest());
    assert_eq!(h.digest()[..], bash256(b"foo")[..]);
    h.update(b"bar");
    assert_eq!(h.digest()[..], bash256(b"foobar")[..]);
    assert!(h.verify(bash256(b"foobar")));
    assert!(!h.verify(bash256(b"foo")));
    assert!(!h.verify(&bash256(b"foobar")[..31]));

    let mut out = [0_u8; 32];
    h.digest_into(&mut out).unwrap();
    assert_eq!(out, bash256(b"foobar"));
    let e = h.digest_into([0_u8; 31]).unwrap_err();
    assert_eq!(e.downcast_ref::<Error>(), Some(&Error::LengthMismatch(32, 31)));

    h.reset();
    assert_eq!(h.processed_len(), 0);
    assert_eq!(h.digest()[..], bash256(b"")[..]);
}

#[test]
fn clone_is_independent() {
    let mut m = Bash::new(48).unwrap();
    m.update(b"foo");
    let mut c = m.clone();
    c.update(b"bar");
    m.update(b"baz");
    assert_eq!(c.digest()[..], bash384(b"foobar")[..]);
    assert_eq!(m.digest()[..], bash384(b"foobaz")[..]);
    assert_ne!(c.digest(), m.digest());
}

#[test]
fn rotation_identity_amounts() {
    // bash-s with all rotations disabled is a plain boolean function of the three words
    let mut s = [0_u64; STATE_WORDS];
    s[0] = 0x0123_4567_89AB_CDEF;
    s[8] = 0xFEDC_BA98_7654_3210;
    s[16] = 0x0F0F_0F0F_F0F0_F0F0;
    let mut t = s;
    bash_s(&mut s, 0, 8, 16, 0, 0, 0, 0);
    bash_s(&mut t, 0, 8, 16, 64, 64, 64, 64);
    assert_eq!(s, t);
    assert!(s.iter().enumerate().all(|(i, &w)| w == 0 || i % 8 == 0));
}

#[test]
fn big_endian_flag_swaps_at_boundary() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut s = [0_u64; STATE_WORDS];
    for w in s.iter_mut() {
        *w = rng.gen();
    }

    let mut big = s;
    bash_f(&mut big, ByteOrder::Big);

    let mut little = s;
    for w in little.iter_mut() {
        *w = w.swap_bytes();
    }
    bash_f(&mut little, ByteOrder::Little);
    for w in little.iter_mut() {
        *w = w.swap_bytes();
    }

    assert_eq!(big, little);
    assert_ne!(big, s);
}

#[test]
fn bash_f_bytes_are_little_endian_words() {
    let mut f = BashF::default();
    for (i, b) in f.state_mut().iter_mut().enumerate() {
        *b = i as u8;
    }

    let mut words = [0_u64; STATE_WORDS];
    for (w, chunk) in words.iter_mut().zip(f.state().chunks(8)) {
        let mut b = [0_u8; 8];
        b.copy_from_slice(chunk);
        *w = u64::from_le_bytes(b);
    }
    bash_f(&mut words, ByteOrder::Little);
    f.transform();

    for (w, chunk) in words.iter().zip(f.state().chunks(8)) {
        assert_eq!(&w.to_le_bytes()[..], chunk);
    }
}

const NONE: &[u8] = &[];

fn prg_round_trip(l: usize, d: usize, n: usize) {
    let key = vec![0x3C_u8; l / 8];
    let mut rng = StdRng::seed_from_u64(n as u64);
    let mut x = vec![0_u8; n];
    rng.fill_bytes(&mut x);

    let mut s = BashPrg::new();
    s.start(l, d, [1_u8, 2, 3, 4], &key).unwrap();
    s.absorb(&x).unwrap();
    let mut s2 = s.clone();

    let y = s.encrypt(&x).unwrap();
    let t = s.squeeze(n).unwrap();

    let z = s2.decrypt(&y).unwrap();
    assert!(s2.squeeze_eq(&t).unwrap());

    assert!(x == z, "{}: x != D(E(x))", n);
    assert_eq!(s, s2, "{}: states diverged", n);
}

fn prg_steps(l: usize, d: usize, n: usize) {
    let key = vec![0x77_u8; l / 8];
    let mut x = vec![0_u8; n];
    StdRng::seed_from_u64(!(n as u64)).fill_bytes(&mut x);

    let mut whole = BashPrg::new();
    whole.start(l, d, NONE, &key).unwrap();
    let mut parts = whole.clone();

    whole.absorb(&x).unwrap();
    let y = whole.encrypt(&x).unwrap();
    let t = whole.squeeze(n).unwrap();

    parts.absorb_start().unwrap();
    let mut yy = x.clone();
    for chunk in x.chunks(17) {
        parts.absorb_step(chunk).unwrap();
    }
    parts.encr_start().unwrap();
    for chunk in yy.chunks_mut(23) {
        parts.encr_step(chunk).unwrap();
    }
    let mut tt = vec![0_u8; n];
    parts.squeeze_start().unwrap();
    for chunk in tt.chunks_mut(5) {
        parts.squeeze_step(chunk).unwrap();
    }

    assert_eq!(y, yy, "{}: E(x) differs between one-shot and steps", n);
    assert_eq!(t, tt, "{}: squeeze differs between one-shot and steps", n);
    assert_eq!(whole, parts);
}

#[test]
fn prg_with_size_boundary_cases() {
    for &(l, d) in &[(128, 1), (128, 2), (192, 1), (192, 2), (256, 1), (256, 2)] {
        let mut prg = BashPrg::new();
        prg.start(l, d, NONE, vec![0_u8; l / 8]).unwrap();
        let rate = prg.buf_len();
        for i in 0..50 {
            prg_round_trip(l, d, i);
            prg_steps(l, d, i);
        }
        for &n in &[
            rate / 2 - 1,
            rate / 2,
            rate / 2 + 1,
            rate - 1,
            rate,
            rate + 1,
            rate * 2 - 1,
            rate * 2,
            rate * 2 + 1,
            rate * 5,
        ] {
            prg_round_trip(l, d, n);
            prg_steps(l, d, n);
        }
    }
}

#[test]
fn prg_inplace_matches_buffers() {
    let key = [9_u8; 24];
    let mut a = BashPrg::new();
    a.start(192, 1, NONE, key).unwrap();
    let mut b = a.clone();

    let x = b"in place and out of place agree".to_vec();
    let y = a.encrypt(&x).unwrap();
    let mut xy = x.clone();
    b.encrypt_inplace(&mut xy).unwrap();
    assert_eq!(y, xy);

    let mut c = BashPrg::new();
    c.start(192, 1, NONE, key).unwrap();
    c.decrypt_inplace(&mut xy).unwrap();
    assert_eq!(xy, x);
}

#[test]
fn prg_clone_is_independent() {
    let mut a = BashPrg::new();
    a.start(128, 2, NONE, NONE).unwrap();
    a.absorb(b"common prefix").unwrap();
    let mut b = a.clone();
    a.absorb(b"left").unwrap();
    b.absorb(b"right").unwrap();
    assert_ne!(a.squeeze(32).unwrap(), b.squeeze(32).unwrap());
}

#[test]
fn prg_operations_are_domain_separated() {
    let mut base = BashPrg::new();
    base.start(256, 1, NONE, [5_u8; 32]).unwrap();

    let mut absorbed = base.clone();
    absorbed.absorb(NONE).unwrap();
    let mut encrypted = base.clone();
    encrypted.encrypt(NONE).unwrap();
    let mut squeezed = base.clone();
    squeezed.squeeze(0).unwrap();
    let mut restarted = base.clone();
    restarted.restart(NONE, NONE).unwrap();

    let outputs: Vec<Vec<u8>> = [absorbed, encrypted, squeezed, restarted]
        .iter_mut()
        .map(|p| p.squeeze(32).unwrap())
        .collect();
    for i in 0..outputs.len() {
        for j in i + 1..outputs.len() {
            assert_ne!(outputs[i], outputs[j]);
        }
    }
}

#[test]
fn prg_ratchet_is_not_plain_commit() {
    let mut a = BashPrg::new();
    a.start(192, 2, NONE, [1_u8; 24]).unwrap();
    a.absorb(b"secret material").unwrap();
    let mut b = a.clone();

    a.ratchet().unwrap();
    b.restart(NONE, NONE).unwrap();
    assert_eq!(a.pos(), 0);
    assert_eq!(b.pos(), 1);
    assert_ne!(a.squeeze(24).unwrap(), b.squeeze(24).unwrap());

    // ratchet twice from the same state gives the same result
    let mut c = BashPrg::new();
    c.start(192, 2, NONE, [1_u8; 24]).unwrap();
    c.absorb(b"secret material").unwrap();
    let mut e = c.clone();
    c.ratchet().unwrap();
    e.ratchet().unwrap();
    assert_eq!(c, e);
}

#[test]
fn prg_restart_with_key_switches_mode() {
    let mut prg = BashPrg::new();
    prg.start(128, 2, [0xAB_u8; 8], NONE).unwrap();
    assert!(!prg.is_keyed());
    assert_eq!(prg.buf_len(), 192 - 2 * 128 / 4);

    prg.restart([0xCD_u8; 4], [0x10_u8; 32]).unwrap();
    assert!(prg.is_keyed());
    assert_eq!(prg.buf_len(), 192 - 128 * 4 / 16);
    assert_eq!(prg.pos(), 1 + 4 + 32);

    // restart without a key keeps key mode
    prg.restart(NONE, NONE).unwrap();
    assert!(prg.is_keyed());

    let e = prg.restart([0_u8; 3], NONE).unwrap_err();
    assert_eq!(
        e.downcast_ref::<Error>(),
        Some(&Error::InvalidParameter(Parameter::AnnouncementLength(3)))
    );
}
