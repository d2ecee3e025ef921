/// Capability traits for accounts
///
/// An account is something you can log in as ([`Authenticatable`]) and
/// something that can be asked about permissions ([`PermissionCheck`]).
/// Keeping them as separate traits lets request extractors and admin tooling
/// depend only on the capability they need.

use super::password::{self, PasswordError};

/// Credentials side of an account
pub trait Authenticatable {
    /// Login name. For accounts this is the email address.
    fn username(&self) -> &str;

    /// Stored PHC hash, or an unusable-password marker
    fn password_hash(&self) -> &str;

    /// Replaces the stored hash in memory; persisting is the caller's job
    fn set_password_hash(&mut self, hash: String);

    /// Whether the account may log in at all
    fn is_active(&self) -> bool;

    /// Hashes and stores `raw`; `None` stores an unusable password
    fn set_password(&mut self, raw: Option<&str>) -> Result<(), PasswordError> {
        let hash = match raw {
            Some(raw) => password::hash_password(raw)?,
            None => password::make_unusable_password(),
        };
        self.set_password_hash(hash);
        Ok(())
    }

    /// Checks `raw` against the stored hash; unusable passwords never match
    fn check_password(&self, raw: &str) -> Result<bool, PasswordError> {
        if !self.has_usable_password() {
            return Ok(false);
        }
        password::verify_password(raw, self.password_hash())
    }

    fn has_usable_password(&self) -> bool {
        password::is_password_usable(self.password_hash())
    }
}

/// Authorization side of an account
///
/// No per-account permission grants are stored: active superusers hold every
/// permission and everyone else holds none.
pub trait PermissionCheck {
    /// Can use the admin console
    fn is_staff(&self) -> bool;

    /// Holds every permission while active
    fn is_superuser(&self) -> bool;

    /// Whether the account is active; inactive accounts hold no permissions
    fn is_permission_active(&self) -> bool;

    /// True if the account holds `perm` (e.g. `"accounts.change_profile"`)
    fn has_perm(&self, _perm: &str) -> bool {
        self.is_permission_active() && self.is_superuser()
    }

    /// True if the account holds all of `perms`
    fn has_perms(&self, perms: &[&str]) -> bool {
        perms.iter().all(|perm| self.has_perm(perm))
    }

    /// True if the account holds any permission in `app_label`
    fn has_module_perms(&self, _app_label: &str) -> bool {
        self.is_permission_active() && self.is_superuser()
    }
}
