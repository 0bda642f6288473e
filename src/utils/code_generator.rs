//! Short code generation and custom alias validation.
//!
//! Random codes are drawn uniformly from the configured alphabet (base62 by
//! default). Caller-supplied aliases skip random generation but are checked
//! against the alias policy and the collision oracle like any other code.

use std::future::Future;

use rand::Rng;
use tracing::debug;

use crate::error::AppError;

/// Digits, upper-case and lower-case ASCII letters.
pub const BASE62_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Codes that would shadow service routes.
pub const RESERVED_CODES: &[&str] = &["api", "health", "stats", "dashboard", "cleanup", "metrics"];

/// Bounds shared by generated codes and custom aliases.
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 10;

/// Extra characters allowed in custom aliases on top of the alphabet.
const ALIAS_SEPARATORS: &[char] = &['-', '_'];

/// Shape of generated codes and custom aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePolicy {
    pub alphabet: Vec<char>,
    pub length: usize,
    pub custom_min_length: usize,
    pub custom_max_length: usize,
    pub max_attempts: usize,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self {
            alphabet: BASE62_ALPHABET.chars().collect(),
            length: 6,
            custom_min_length: MIN_CODE_LENGTH,
            custom_max_length: MAX_CODE_LENGTH,
            max_attempts: 5,
        }
    }
}

/// A code ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: String,
    pub is_custom: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    policy: CodePolicy,
}

impl CodeGenerator {
    pub fn new(policy: CodePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CodePolicy {
        &self.policy
    }

    /// Draws one candidate code of the configured length.
    pub fn random_code(&self) -> String {
        let mut rng = rand::rng();
        let alphabet = &self.policy.alphabet;

        (0..self.policy.length)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect()
    }

    /// Validates a user-provided custom alias.
    ///
    /// # Rules
    ///
    /// - Length within `custom_min_length..=custom_max_length`
    /// - Characters from the alphabet, plus `-` and `_`
    /// - Cannot start or end with `-` or `_`
    /// - Cannot be a reserved route word
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCode`] if any rule is violated.
    pub fn validate_custom_code(&self, code: &str) -> Result<(), AppError> {
        let len = code.chars().count();
        let (min, max) = (self.policy.custom_min_length, self.policy.custom_max_length);

        if len < min || len > max {
            return Err(AppError::invalid_code(format!(
                "must be {min}-{max} characters, got {len}"
            )));
        }

        if let Some(bad) = code
            .chars()
            .find(|c| !self.policy.alphabet.contains(c) && !ALIAS_SEPARATORS.contains(c))
        {
            return Err(AppError::invalid_code(format!(
                "character '{bad}' is not allowed"
            )));
        }

        if code.starts_with(ALIAS_SEPARATORS) || code.ends_with(ALIAS_SEPARATORS) {
            return Err(AppError::invalid_code(
                "cannot start or end with '-' or '_'",
            ));
        }

        if RESERVED_CODES
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(code))
        {
            return Err(AppError::invalid_code(format!("'{code}' is reserved")));
        }

        Ok(())
    }

    /// Produces a code that `exists` reports as free.
    ///
    /// A custom alias is validated and returned unchanged; if it is taken the
    /// call fails with [`AppError::CodeAlreadyExists`] without retrying.
    /// Random candidates are redrawn on collision up to `max_attempts` times,
    /// after which the call fails with [`AppError::GenerationExhausted`].
    pub async fn generate<F, Fut>(
        &self,
        custom_code: Option<&str>,
        mut exists: F,
    ) -> Result<GeneratedCode, AppError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<bool, AppError>>,
    {
        if let Some(custom) = custom_code {
            self.validate_custom_code(custom)?;

            if exists(custom.to_string()).await? {
                return Err(AppError::code_exists(custom));
            }

            return Ok(GeneratedCode {
                code: custom.to_string(),
                is_custom: true,
            });
        }

        for attempt in 1..=self.policy.max_attempts {
            let candidate = self.random_code();

            if !exists(candidate.clone()).await? {
                return Ok(GeneratedCode {
                    code: candidate,
                    is_custom: false,
                });
            }

            debug!(attempt, code = %candidate, "Generated code collided, retrying");
        }

        Err(AppError::GenerationExhausted {
            attempts: self.policy.max_attempts,
        })
    }
}
