use std::io::{Cursor, Read};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use siteup_sync::etag::{CHUNK_SIZE, etag_for_path, etag_from_reader};
use tempfile::TempDir;

#[test]
fn four_bytes_use_single_chunk_form() {
    let etag = etag_from_reader(Cursor::new(b"abcd")).unwrap();
    assert_eq!(etag.as_deref(), Some("\"e2fc714c4727ee9395f324cd2e7f331f\""));
}

#[test]
fn empty_stream_has_no_etag() {
    let etag = etag_from_reader(Cursor::new(b"")).unwrap();
    assert_eq!(etag, None);
}

#[test]
fn exactly_one_chunk_stays_single_form() {
    let data = vec![0xAB_u8; CHUNK_SIZE];
    let etag = etag_from_reader(Cursor::new(data)).unwrap().unwrap();
    assert!(!etag.contains('-'), "one full chunk is not multipart: {etag}");
    assert_eq!(etag.len(), 34);
}

#[test]
fn one_byte_over_chunk_counts_two() {
    let data = vec![0xAB_u8; CHUNK_SIZE + 1];
    let etag = etag_from_reader(Cursor::new(data)).unwrap().unwrap();
    assert!(etag.ends_with("-2\""), "expected two chunks: {etag}");
}

#[test]
fn two_chunks_plus_remainder_counts_three() {
    let data = vec![0x5A_u8; CHUNK_SIZE * 2 + 100];
    let etag = etag_from_reader(Cursor::new(data)).unwrap().unwrap();
    assert!(etag.ends_with("-3\""), "expected three chunks: {etag}");
}

#[test]
fn multi_chunk_form_is_hash_of_part_hashes() {
    let data: Vec<u8> = (0..CHUNK_SIZE + 5).map(|i| (i % 251) as u8).collect();
    let etag = etag_from_reader(Cursor::new(&data)).unwrap().unwrap();

    let first = md5::compute(&data[..CHUNK_SIZE]);
    let second = md5::compute(&data[CHUNK_SIZE..]);
    let mut concatenated = Vec::with_capacity(32);
    concatenated.extend_from_slice(&first.0);
    concatenated.extend_from_slice(&second.0);
    let expected = format!("\"{:x}-2\"", md5::compute(&concatenated));

    assert_eq!(etag, expected);
}

/// Hands out at most `cap` bytes per read call.
struct Dribble<R> {
    inner: R,
    cap: usize,
}

impl<R: Read> Read for Dribble<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let cap = self.cap.min(buf.len());
        self.inner.read(&mut buf[..cap])
    }
}

#[test]
fn short_reads_do_not_shift_chunk_boundaries() {
    let data: Vec<u8> = (0..CHUNK_SIZE + 10).map(|i| (i % 179) as u8).collect();
    let straight = etag_from_reader(Cursor::new(&data)).unwrap();
    let dribbled = etag_from_reader(Dribble {
        inner: Cursor::new(&data),
        cap: 4091,
    })
    .unwrap();
    assert_eq!(straight, dribbled);
}

#[test]
fn identical_copies_fingerprint_identically() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    std::fs::write(&a, b"the same payload in two files").unwrap();
    std::fs::write(&b, b"the same payload in two files").unwrap();

    assert_eq!(etag_for_path(&a).unwrap(), etag_for_path(&b).unwrap());
}

#[test]
fn missing_file_errors() {
    let dir = TempDir::new().unwrap();
    assert!(etag_for_path(&dir.path().join("gone.txt")).is_err());
}

proptest! {
    #[test]
    fn small_payloads_use_quoted_hex_form(data in proptest::collection::vec(any::<u8>(), 1..4096)) {
        let etag = etag_from_reader(Cursor::new(&data)).unwrap().unwrap();
        prop_assert_eq!(etag.len(), 34);
        prop_assert!(etag.starts_with('"') && etag.ends_with('"'));
        prop_assert!(etag[1..33].bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));

        let again = etag_from_reader(Cursor::new(&data)).unwrap().unwrap();
        prop_assert_eq!(etag, again);
    }
}
