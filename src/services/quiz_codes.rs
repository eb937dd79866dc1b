use rand::Rng;
use sqlx::PgPool;

use crate::repositories::quizzes;

// No 0/O/1/I to keep codes readable when dictated in class.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

const MAX_ATTEMPTS: usize = 16;

pub(crate) fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char).collect()
}

/// Generates a join code that is not yet taken by another quiz.
pub(crate) async fn generate_unique_code(pool: &PgPool, length: usize) -> sqlx::Result<String> {
    for _ in 0..MAX_ATTEMPTS {
        let code = generate_code(length);
        if !quizzes::code_exists(pool, &code).await? {
            return Ok(code);
        }
    }

    // 32^length codes; collisions this persistent mean the table is nearly full.
    Err(sqlx::Error::Protocol("exhausted quiz code candidates".into()))
}

pub(crate) fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_use_alphabet_and_length() {
        for _ in 0..50 {
            let code = generate_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize_code("  ab2c3d \n"), "AB2C3D");
    }
}
