//! Content hashing and binary sniffing

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

const CHUNK_SIZE: usize = 8 * 1024;
const SNIFF_SIZE: usize = 1024;

/// Compute the SHA-256 hash of a file's content, hex encoded
///
/// The file is streamed in fixed-size chunks.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn compute_file_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Whether the first kilobyte of a file contains a NUL byte
///
/// Unreadable files are reported as text; the read error resurfaces
/// later when the pipeline opens the file.
#[must_use]
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut head = Vec::with_capacity(SNIFF_SIZE);
    match file.take(SNIFF_SIZE as u64).read_to_end(&mut head) {
        Ok(_) => head.contains(&0),
        Err(_) => false,
    }
}

/// Hash a file, yielding `None` when it cannot be read
#[must_use]
pub fn hash_file(path: &Path) -> Option<String> {
    compute_file_hash(path).ok()
}
