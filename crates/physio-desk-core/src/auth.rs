//! Credential hashing and staff authentication.
//!
//! Hashes are salted and stretched; unsalted single-round digests are
//! never produced or accepted.

use thiserror::Error;
use tracing::warn;

use crate::db::{Database, DbError, DbResult};
use crate::models::StaffIdentity;

/// Stretching rounds applied to every password.
const HASH_ITERATIONS: u32 = 64_000;

/// Authentication failures. The three refusal reasons stay distinguishable
/// so callers can show "account deactivated" rather than a generic login
/// error.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid company access key")]
    InvalidCompanyKey,

    #[error("invalid staff ID or password")]
    InvalidCredentials,

    #[error("account has been deactivated")]
    AccountDeactivated,

    #[error(transparent)]
    Store(#[from] DbError),
}

/// Hash a password with a fresh random salt.
///
/// Output is `iterations$salt_hex$digest_hex`; embedding the parameters
/// lets the iteration count be raised later without rehashing every
/// account at once.
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().into_bytes();
    let digest = stretch(password.as_bytes(), &salt, HASH_ITERATIONS);
    format!("{}${}${}", HASH_ITERATIONS, hex::encode(salt), hex::encode(digest))
}

/// Check a password against a stored `iterations$salt$digest` value.
/// Malformed stored values simply fail verification.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(iterations), Some(salt), Some(digest)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Ok(salt) = hex::decode(salt) else {
        return false;
    };
    hex::encode(stretch(password.as_bytes(), &salt, iterations)) == digest
}

fn stretch(password: &[u8], salt: &[u8], iterations: u32) -> [u8; 32] {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password);
    let mut digest: [u8; 32] = hasher.finalize().into();
    for _ in 1..iterations {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(password);
        digest = hasher.finalize().into();
    }
    digest
}

/// Staff authentication over the shared store.
pub struct AuthService<'a> {
    db: &'a Database,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Authenticate a staff member.
    ///
    /// The company key is checked first and independently: a wrong key
    /// fails before any credential is looked at. A deactivated account
    /// with correct credentials fails with its own reason. On success the
    /// caller holds the returned identity for the rest of its run; there
    /// is no session to invalidate.
    pub fn authenticate(
        &self,
        staff_id: &str,
        password: &str,
        company_key: &str,
    ) -> Result<StaffIdentity, AuthError> {
        if !self.db.verify_access_key(company_key)? {
            warn!(staff_id, "login rejected: wrong company key");
            return Err(AuthError::InvalidCompanyKey);
        }

        let Some(account) = self.db.staff_auth_row(staff_id)? else {
            warn!(staff_id, "login rejected: unknown staff ID");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &account.password_hash) {
            warn!(staff_id, "login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        if !account.is_active {
            warn!(staff_id, "login rejected: account deactivated");
            return Err(AuthError::AccountDeactivated);
        }

        Ok(StaffIdentity {
            id: account.id,
            staff_id: account.staff_id,
            role: account.role,
        })
    }

    /// First-time-setup key check. Does not log anyone in.
    pub fn verify_access_key(&self, key: &str) -> DbResult<bool> {
        self.db.verify_access_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DEFAULT_ACCESS_KEY;
    use crate::models::Role;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.seed_defaults();
        db
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret99");
        let b = hash_password("secret99");

        // Same password, different salt, different hash; both verify.
        assert_ne!(a, b);
        assert!(verify_password("secret99", &a));
        assert!(verify_password("secret99", &b));
        assert!(!verify_password("secret98", &a));
    }

    #[test]
    fn test_malformed_stored_hash_fails_closed() {
        assert!(!verify_password("secret99", ""));
        assert!(!verify_password("secret99", "not-a-hash"));
        assert!(!verify_password("secret99", "abc$zz$zz"));
    }

    #[test]
    fn test_authenticate_success() {
        let db = setup_db();
        let auth = AuthService::new(&db);

        let identity = auth
            .authenticate("10003", "password3", DEFAULT_ACCESS_KEY)
            .unwrap();
        assert_eq!(identity.staff_id, "10003");
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn test_company_key_checked_first() {
        let db = setup_db();
        let auth = AuthService::new(&db);

        // Valid credentials, wrong key: the key decides.
        let result = auth.authenticate("10003", "password3", "WRONG");
        assert!(matches!(result, Err(AuthError::InvalidCompanyKey)));

        // Nonsense credentials, wrong key: same failure, key first.
        let result = auth.authenticate("no-such-id", "nope", "WRONG");
        assert!(matches!(result, Err(AuthError::InvalidCompanyKey)));
    }

    #[test]
    fn test_bad_credentials() {
        let db = setup_db();
        let auth = AuthService::new(&db);

        let result = auth.authenticate("10003", "wrong-password", DEFAULT_ACCESS_KEY);
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        let result = auth.authenticate("99999", "password3", DEFAULT_ACCESS_KEY);
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_deactivated_account_distinct_failure() {
        let db = setup_db();
        db.set_staff_active("10001", false).unwrap();
        let auth = AuthService::new(&db);

        // Correct credentials on a deactivated account: its own reason.
        let result = auth.authenticate("10001", "password1", DEFAULT_ACCESS_KEY);
        assert!(matches!(result, Err(AuthError::AccountDeactivated)));

        // Wrong password on the same account: plain invalid credentials.
        let result = auth.authenticate("10001", "wrong", DEFAULT_ACCESS_KEY);
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_verify_access_key_standalone() {
        let db = setup_db();
        let auth = AuthService::new(&db);

        assert!(auth.verify_access_key(DEFAULT_ACCESS_KEY).unwrap());
        assert!(!auth.verify_access_key("WRONG").unwrap());
    }
}
