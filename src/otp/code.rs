use rand::Rng;
use sqlx::FromRow;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

/// Issued one-time code. Rows are append-only; `used` flips once.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationCode {
    pub id: Uuid,
    pub email: String,
    #[sqlx(rename = "otp_code")]
    pub code: String,
    pub expires_at: OffsetDateTime,
    pub used: bool,
    pub created_at: OffsetDateTime,
}

/// Row to insert for a fresh issuance.
#[derive(Debug, Clone)]
pub struct NewVerificationCode {
    pub email: String,
    pub code: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl NewVerificationCode {
    pub fn issue(email: &str, now: OffsetDateTime, ttl: Duration) -> Self {
        Self {
            email: email.to_string(),
            code: generate_code(),
            created_at: now,
            expires_at: now + ttl,
        }
    }
}

impl VerificationCode {
    /// Eligible iff unused, not yet expired and both email and code match.
    pub fn accepts(&self, email: &str, code: &str, now: OffsetDateTime) -> bool {
        !self.used && now < self.expires_at && self.email == email && self.code == code
    }
}

/// Uniform 6-digit code, never with a leading zero.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX).to_string()
}

pub fn is_well_formed(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn row(now: OffsetDateTime) -> VerificationCode {
        VerificationCode {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            code: "123456".into(),
            expires_at: now + Duration::minutes(10),
            used: false,
            created_at: now,
        }
    }

    #[test]
    fn generated_codes_are_six_digits_in_range() {
        for _ in 0..1000 {
            let code = generate_code();
            assert!(is_well_formed(&code), "bad code {code}");
            let n: u32 = code.parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&n));
        }
    }

    #[test]
    fn generated_codes_vary() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| generate_code()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn issue_sets_ten_minute_expiry() {
        let now = datetime!(2026-01-01 12:00 UTC);
        let new = NewVerificationCode::issue("a@b.com", now, Duration::minutes(10));
        assert_eq!(new.created_at, now);
        assert_eq!(new.expires_at, datetime!(2026-01-01 12:10 UTC));
        assert!(is_well_formed(&new.code));
    }

    #[test]
    fn accepts_until_just_before_expiry() {
        let now = datetime!(2026-01-01 12:00 UTC);
        let r = row(now);
        assert!(r.accepts("a@b.com", "123456", now + Duration::minutes(10) - Duration::seconds(1)));
        assert!(!r.accepts("a@b.com", "123456", now + Duration::minutes(10)));
    }

    #[test]
    fn rejects_used_or_mismatched() {
        let now = datetime!(2026-01-01 12:00 UTC);
        let mut r = row(now);
        assert!(!r.accepts("a@b.com", "654321", now));
        assert!(!r.accepts("x@b.com", "123456", now));
        r.used = true;
        assert!(!r.accepts("a@b.com", "123456", now));
    }

    #[test]
    fn well_formed_rejects_non_digits_and_wrong_length() {
        assert!(is_well_formed("000123"));
        assert!(!is_well_formed("12345"));
        assert!(!is_well_formed("1234567"));
        assert!(!is_well_formed("12a456"));
        assert!(!is_well_formed("１２３４５６"));
    }
}
