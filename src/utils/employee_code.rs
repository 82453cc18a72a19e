use rand::Rng;
use sqlx::MySqlPool;
use std::future::Future;
use thiserror::Error;

const CODE_PREFIX: &str = "TRD";
const MAX_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum CodeError {
    /// The 4-digit code space is effectively full; operators must widen it.
    #[error("Unable to generate unique employee code after {MAX_ATTEMPTS} attempts")]
    Exhausted,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// One candidate code: fixed prefix plus a zero-padded random 4-digit suffix,
/// e.g. `TRD0042`.
fn candidate(rng: &mut impl Rng) -> String {
    format!("{}{:04}", CODE_PREFIX, rng.gen_range(1..=9999))
}

/// Draws candidates until `is_taken` clears one, up to the attempt bound.
/// Generic over the collision check so the retry logic is testable without a
/// database.
pub async fn generate_with<F, Fut>(mut is_taken: F) -> Result<String, CodeError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, sqlx::Error>>,
{
    let mut rng = rand::thread_rng();

    for _ in 0..MAX_ATTEMPTS {
        let code = candidate(&mut rng);
        if !is_taken(code.clone()).await? {
            return Ok(code);
        }
    }

    Err(CodeError::Exhausted)
}

/// Produces a fresh employee code, collision-checked against the directory.
pub async fn generate_employee_code(pool: &MySqlPool) -> Result<String, CodeError> {
    generate_with(|code| async move {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_code = ?)",
        )
        .bind(code)
        .fetch_one(pool)
        .await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_are_prefixed_four_digit_codes() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let code = candidate(&mut rng);
            assert_eq!(code.len(), 7);
            assert!(code.starts_with("TRD"));
            assert!(code[3..].chars().all(|c| c.is_ascii_digit()));
            assert_ne!(&code[3..], "0000");
        }
    }

    #[actix_web::test]
    async fn first_free_candidate_wins() {
        let code = generate_with(|_| async { Ok::<_, sqlx::Error>(false) })
            .await
            .unwrap();
        assert!(code.starts_with("TRD"));
    }

    #[actix_web::test]
    async fn exhaustion_is_a_hard_error() {
        let mut attempts = 0u32;
        let result = generate_with(|_| {
            attempts += 1;
            async { Ok::<_, sqlx::Error>(true) }
        })
        .await;
        assert!(matches!(result, Err(CodeError::Exhausted)));
        assert_eq!(attempts, MAX_ATTEMPTS);
    }

    #[actix_web::test]
    async fn storage_errors_propagate() {
        let result =
            generate_with(|_| async { Err::<bool, _>(sqlx::Error::RowNotFound) }).await;
        assert!(matches!(result, Err(CodeError::Database(_))));
    }
}
