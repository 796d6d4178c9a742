use rand::Rng;

use super::directory::StudentDirectory;
use super::types::StudentId;

/// Prefix carried by every generated identifier
pub const ID_PREFIX: char = 'F';

/// Number of random characters after the prefix
pub const ID_SUFFIX_LEN: usize = 5;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Source of candidate student identifiers
pub trait IdGenerator: std::fmt::Debug {
    /// Produce the next candidate; uniqueness is checked by the caller
    fn next_candidate(&mut self) -> StudentId;
}

/// Allocate an identifier that was never issued by the directory
pub fn allocate(generator: &mut dyn IdGenerator, directory: &StudentDirectory) -> StudentId {
    loop {
        let candidate = generator.next_candidate();
        if !directory.contains(&candidate) && !directory.was_issued(&candidate) {
            return candidate;
        }
    }
}

/// Random identifiers such as `F3K9QZ`
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_candidate(&mut self) -> StudentId {
        let mut rng = rand::thread_rng();
        let mut raw = String::with_capacity(ID_SUFFIX_LEN + 1);
        raw.push(ID_PREFIX);
        for _ in 0..ID_SUFFIX_LEN {
            raw.push(ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char);
        }
        StudentId::new(raw)
    }
}

/// Deterministic identifiers `F00001`, `F00002`, ...
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_candidate(&mut self) -> StudentId {
        self.next += 1;
        StudentId::new(format!("{}{:0width$}", ID_PREFIX, self.next, width = ID_SUFFIX_LEN))
    }
}
