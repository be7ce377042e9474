//! User accounts and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ValidationError, require_text};
use crate::money::Money;

/// What an account is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Restaurant,
    Client,
    Deliveryman,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::Admin, Self::Restaurant, Self::Client, Self::Deliveryman];

    /// Canonical lowercase name, used for storage and display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Restaurant => "restaurant",
            Self::Client => "client",
            Self::Deliveryman => "deliveryman",
        }
    }

    /// Whether accounts of this role carry a credit balance.
    #[must_use]
    pub const fn has_credit(self) -> bool {
        !matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    /// Case-insensitive; accepts the Italian names as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" | "amministratore" => Ok(Self::Admin),
            "restaurant" | "ristorante" => Ok(Self::Restaurant),
            "client" | "cliente" => Ok(Self::Client),
            "deliveryman" | "fattorino" => Ok(Self::Deliveryman),
            _ => Err(ValidationError::unknown("role", s)),
        }
    }
}

/// Personal and address details of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub street: String,
    pub house_number: String,
}

impl UserProfile {
    /// Check required fields and the shape of phone and email.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("surname", &self.surname)?;
        require_text("city", &self.city)?;
        require_text("street", &self.street)?;
        require_text("house number", &self.house_number)?;

        let phone = require_text("phone", &self.phone)?;
        let digits = phone.strip_prefix('+').unwrap_or(phone);
        let valid_phone = digits.chars().all(|c| c.is_ascii_digit() || c == ' ')
            && digits.chars().filter(char::is_ascii_digit).count() >= 6;
        if !valid_phone {
            return Err(ValidationError::invalid(
                "phone",
                "use digits, spaces and an optional leading '+'",
            ));
        }

        let email = require_text("email", &self.email)?;
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ValidationError::invalid("email", format!("'{email}'"))),
        }
    }

    /// Full name for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// Delivery address for display.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{} {}, {}", self.street, self.house_number, self.city)
    }
}

/// A persisted account.
///
/// `credit` is `Some` for every role except admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Encoded password hash, see [`crate::password`].
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub profile: UserProfile,
    pub role: Role,
    pub credit: Option<Money>,
}

impl User {
    #[must_use]
    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }

    /// The balance, treating a missing one as zero.
    #[must_use]
    pub fn balance(&self) -> Money {
        self.credit.unwrap_or(Money::ZERO)
    }
}

/// Input for registering a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    /// Plain text password; hashed before it reaches a repository.
    pub password: String,
    pub profile: UserProfile,
    pub role: Role,
}

impl NewUser {
    pub const MIN_PASSWORD_LEN: usize = 8;

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_username(&self.username)?;
        if self.password.chars().count() < Self::MIN_PASSWORD_LEN {
            return Err(ValidationError::invalid(
                "password",
                format!("must be at least {} characters", Self::MIN_PASSWORD_LEN),
            ));
        }
        self.profile.validate()
    }
}

/// Usernames are 3 to 32 characters of letters, digits, `_`, `.` or `-`.
pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err(ValidationError::invalid(
            "username",
            "must be between 3 and 32 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError::invalid(
            "username",
            "only letters, digits, '_', '.' and '-' are allowed",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            name: "Mario".into(),
            surname: "Rossi".into(),
            phone: "+39 333 1234567".into(),
            email: "mario@example.it".into(),
            city: "Cesena".into(),
            street: "Via Roma".into(),
            house_number: "12".into(),
        }
    }

    #[test]
    fn test_role_parsing_accepts_both_languages() {
        assert_eq!("Cliente".parse::<Role>().unwrap(), Role::Client);
        assert_eq!(" FATTORINO ".parse::<Role>().unwrap(), Role::Deliveryman);
        assert_eq!("restaurant".parse::<Role>().unwrap(), Role::Restaurant);
        assert_eq!("amministratore".parse::<Role>().unwrap(), Role::Admin);
        assert!("chef".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_round_trips_through_as_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!(!Role::Admin.has_credit());
        assert!(Role::Client.has_credit());
    }

    #[test]
    fn test_profile_validation() {
        assert!(profile().validate().is_ok());

        let mut blank = profile();
        blank.city = "  ".into();
        assert_eq!(blank.validate(), Err(ValidationError::Empty("city")));

        let mut bad_phone = profile();
        bad_phone.phone = "call me".into();
        assert!(bad_phone.validate().is_err());

        let mut misplaced_plus = profile();
        misplaced_plus.phone = "333+1234567".into();
        assert!(misplaced_plus.validate().is_err());

        let mut bad_email = profile();
        bad_email.email = "mario.example.it".into();
        assert!(bad_email.validate().is_err());
        bad_email.email = "mario@".into();
        assert!(bad_email.validate().is_err());

        let mut local_host = profile();
        local_host.email = "a@localhost".into();
        assert!(local_host.validate().is_ok());
    }

    #[test]
    fn test_new_user_validation() {
        let user = NewUser {
            username: "mario.rossi".into(),
            password: "P@ssw0rd".into(),
            profile: profile(),
            role: Role::Client,
        };
        assert!(user.validate().is_ok());

        let short_password = NewUser {
            password: "abc".into(),
            ..user.clone()
        };
        assert!(short_password.validate().is_err());

        let bad_name = NewUser {
            username: "mario rossi".into(),
            ..user
        };
        assert!(bad_name.validate().is_err());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            username: "mario".into(),
            password_hash: "secret".into(),
            profile: profile(),
            role: Role::Client,
            credit: Some(Money::from_euros(20)),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"credit\":\"20.00\""));
    }
}
