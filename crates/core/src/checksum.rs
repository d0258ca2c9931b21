use sha1_smol::Sha1;
use std::{fs::read, path::Path};

use crate::error::{IoContext, MigrationResult};

#[inline]
pub fn sha1<D: AsRef<[u8]>>(data: D) -> String {
    Sha1::from(data).digest().to_string()
}

#[inline]
pub fn file_sha1(path: &Path) -> MigrationResult<String> {
    Ok(sha1(read(path).at_path(path)?))
}

#[inline]
pub fn validate_file_sha1(path: &Path, hash: &str) -> MigrationResult<bool> {
    Ok(hash == file_sha1(path)?)
}

#[test]
fn test_sha1() {
    assert_eq!(sha1("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
}

#[test]
fn test_validate_file_sha1() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.sb");
    std::fs::write(&path, "abc").unwrap();
    assert!(validate_file_sha1(&path, "a9993e364706816aba3e25717850c26c9cd0d89d").unwrap());
    assert!(!validate_file_sha1(&path, "0000").unwrap());
}
