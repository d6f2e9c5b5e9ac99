use rand::Rng;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SEGMENT_LENGTH: usize = 4;
const SEPARATOR: char = '-';

/// A claim code of the form `XXXX-XXXX` over `[A-Z0-9]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimCode(String);

impl ClaimCode {
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Every character is drawn independently and uniformly from the alphabet.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut segment = || -> String {
            (0..SEGMENT_LENGTH)
                .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
                .collect()
        };
        let first = segment();
        let second = segment();
        Self(format!("{}{}{}", first, SEPARATOR, second))
    }

    /// Parses a code typed by a human. Surrounding whitespace and lower case
    /// letters are tolerated.
    pub fn parse(s: String) -> Result<ClaimCode, String> {
        let normalized = s.trim().to_uppercase();
        if is_well_formed(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(format!("{} is not a valid claim code.", s))
        }
    }
}

fn is_well_formed(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    bytes.len() == 2 * SEGMENT_LENGTH + 1
        && bytes.iter().enumerate().all(|(i, b)| {
            if i == SEGMENT_LENGTH {
                *b == SEPARATOR as u8
            } else {
                ALPHABET.contains(b)
            }
        })
}

impl AsRef<str> for ClaimCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClaimCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
