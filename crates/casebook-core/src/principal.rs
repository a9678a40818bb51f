//! First-party records: the firm's principals and user accounts.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  error::{present, required},
  id::{PrincipalId, UserId},
};

// ─── Principal ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::CaseStore::create_principal`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrincipal {
  pub name:    String,
  pub surname: String,
  pub tax_id:  String,
}

impl NewPrincipal {
  pub fn new(
    name: impl Into<String>,
    surname: impl Into<String>,
    tax_id: impl Into<String>,
  ) -> Result<Self> {
    Ok(Self {
      name:    required("name", name.into())?,
      surname: required("surname", surname.into())?,
      tax_id:  required("tax_id", tax_id.into())?,
    })
  }

  pub fn validate(&self) -> Result<()> {
    present("name", &self.name)?;
    present("surname", &self.surname)?;
    present("tax_id", &self.tax_id)
  }
}

/// An active principal of the firm. Any number of principals can be attached
/// to a matter, and a principal can work on any number of matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
  pub principal_id: PrincipalId,
  pub name:         String,
  pub surname:      String,
  pub tax_id:       String,
}

impl Principal {
  pub fn from_new(principal_id: PrincipalId, input: NewPrincipal) -> Self {
    Self {
      principal_id,
      name: input.name,
      surname: input.surname,
      tax_id: input.tax_id,
    }
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CaseStore::create_user`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
  pub name:     String,
  pub surname:  String,
  #[serde(default)]
  pub password: Option<String>,
}

impl NewUser {
  pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Result<Self> {
    Ok(Self {
      name:     required("name", name.into())?,
      surname:  required("surname", surname.into())?,
      password: None,
    })
  }

  pub fn with_password(mut self, password: impl Into<String>) -> Self {
    self.password = Some(password.into());
    self
  }

  pub fn validate(&self) -> Result<()> {
    present("name", &self.name)?;
    present("surname", &self.surname)
  }
}

/// A user account. Stored only; nothing in the workspace authenticates
/// against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:  UserId,
  pub name:     String,
  pub surname:  String,
  #[serde(skip_serializing)]
  pub password: Option<String>,
}

impl User {
  pub fn from_new(user_id: UserId, input: NewUser) -> Self {
    Self {
      user_id,
      name: input.name,
      surname: input.surname,
      password: input.password,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn principal_requires_all_fields() {
    assert!(NewPrincipal::new("John", "Snow", "18097129831").is_ok());
    assert!(matches!(
      NewPrincipal::new("John", "Snow", ""),
      Err(Error::MissingField("tax_id"))
    ));
  }

  #[test]
  fn user_password_is_optional_and_never_serialised() {
    let input = NewUser::new("Vicky", "Vouloutsi").unwrap().with_password("pw");
    let user = User::from_new(UserId(1), input);
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password").is_none());
    assert_eq!(json["name"], "Vicky");
  }

  #[test]
  fn user_requires_surname() {
    assert!(matches!(
      NewUser::new("Bob", ""),
      Err(Error::MissingField("surname"))
    ));
  }
}
