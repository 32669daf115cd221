//! Verification code record kept per business and phone number.

use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

use crate::errors::CodeError;

/// Wrong guesses allowed for a fresh code
pub const DEFAULT_MAX_ATTEMPTS: i64 = 3;

/// `remaining_attempts` value of a code that was verified successfully
pub const SPENT_ATTEMPTS: i64 = -1;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Store key of the code issued for `phone` within `business`
///
/// # Example
///
/// ```
/// use re_core::domain::entities::code_key;
///
/// assert_eq!(code_key("login", "13800001234"), "phone_code:login:13800001234");
/// ```
pub fn code_key(business: &str, phone: &str) -> String {
    format!("phone_code:{}:{}", business, phone)
}

/// Live verification code
///
/// At most one record exists per key. It is replaced only by a new issue after
/// the cooldown, and destroyed only by expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    /// The 6-digit zero-padded code
    pub code: String,

    /// Wrong guesses left; `SPENT_ATTEMPTS` once verified
    pub remaining_attempts: i64,

    /// Issue time as unix milliseconds
    pub issued_at: i64,
}

impl CodeRecord {
    pub fn new(code: impl Into<String>, max_attempts: i64, issued_at: i64) -> Self {
        Self {
            code: code.into(),
            remaining_attempts: max_attempts,
            issued_at,
        }
    }

    /// Whether the record was already verified successfully
    pub fn is_spent(&self) -> bool {
        self.remaining_attempts == SPENT_ATTEMPTS
    }

    /// Check `input` against the code and update the attempt counter
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Code matched, the record is now spent
    /// * `Ok(false)` - Mismatch, one attempt consumed
    /// * `Err(CodeError::VerifyTooMany)` - No attempts left (or already spent), record untouched
    pub fn verify(&mut self, input: &str) -> Result<bool, CodeError> {
        if self.remaining_attempts <= 0 {
            return Err(CodeError::VerifyTooMany);
        }

        if constant_time_eq(self.code.as_bytes(), input.as_bytes()) {
            self.remaining_attempts = SPENT_ATTEMPTS;
            Ok(true)
        } else {
            self.remaining_attempts -= 1;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record() {
        let record = CodeRecord::new("012345", DEFAULT_MAX_ATTEMPTS, 1_700_000_000_000);
        assert_eq!(record.code.len(), CODE_LENGTH);
        assert_eq!(record.remaining_attempts, 3);
        assert!(!record.is_spent());
    }

    #[test]
    fn test_verify_success_spends_record() {
        let mut record = CodeRecord::new("123456", DEFAULT_MAX_ATTEMPTS, 0);
        assert_eq!(record.verify("123456"), Ok(true));
        assert!(record.is_spent());
        assert_eq!(record.verify("123456"), Err(CodeError::VerifyTooMany));
    }

    #[test]
    fn test_verify_mismatch_decrements() {
        let mut record = CodeRecord::new("123456", DEFAULT_MAX_ATTEMPTS, 0);
        assert_eq!(record.verify("000000"), Ok(false));
        assert_eq!(record.verify("000001"), Ok(false));
        assert_eq!(record.verify("000002"), Ok(false));
        assert_eq!(record.remaining_attempts, 0);

        // Correct code after exhaustion is still rejected and state is untouched
        assert_eq!(record.verify("123456"), Err(CodeError::VerifyTooMany));
        assert_eq!(record.remaining_attempts, 0);
    }

    #[test]
    fn test_code_key() {
        assert_eq!(code_key("login", "+8613800001234"), "phone_code:login:+8613800001234");
    }
}
