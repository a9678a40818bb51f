//! Parties — the persons and organizations a filing can be brought against.
//!
//! Party records are plain attribute storage. The only rule they carry is
//! required-field presence; identity is the store-assigned id, so two persons
//! with identical names are still two distinct parties.

use std::{
  fmt,
  hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  error::{present, required},
  id::{OrganizationId, PersonId},
};

// ─── PartyRef ────────────────────────────────────────────────────────────────

/// A reference to the party a filing is connected to.
///
/// Serialises as `{"person": 3}` or `{"organization": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRef {
  Person(PersonId),
  Organization(OrganizationId),
}

impl PartyRef {
  pub fn is_person(&self) -> bool { matches!(self, Self::Person(_)) }

  pub fn is_organization(&self) -> bool {
    matches!(self, Self::Organization(_))
  }
}

impl fmt::Display for PartyRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Person(id) => id.fmt(f),
      Self::Organization(id) => id.fmt(f),
    }
  }
}

impl From<PersonId> for PartyRef {
  fn from(id: PersonId) -> Self { Self::Person(id) }
}

impl From<OrganizationId> for PartyRef {
  fn from(id: OrganizationId) -> Self { Self::Organization(id) }
}

// ─── ContactInfo ─────────────────────────────────────────────────────────────

/// Contact details owned by exactly one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
  pub address:           String,
  pub city:              String,
  pub mobile:            String,
  pub email:             String,
  #[serde(default)]
  pub post_office:       Option<String>,
  #[serde(default)]
  pub secondary_address: Option<String>,
  #[serde(default)]
  pub home_phone:        Option<String>,
  #[serde(default)]
  pub work_phone:        Option<String>,
}

impl ContactInfo {
  pub fn new(
    address: impl Into<String>,
    city: impl Into<String>,
    mobile: impl Into<String>,
    email: impl Into<String>,
  ) -> Result<Self> {
    let info = Self {
      address:           address.into(),
      city:              city.into(),
      mobile:            mobile.into(),
      email:             email.into(),
      post_office:       None,
      secondary_address: None,
      home_phone:        None,
      work_phone:        None,
    };
    info.validate()?;
    Ok(info)
  }

  pub fn with_post_office(mut self, po: impl Into<String>) -> Self {
    self.post_office = Some(po.into());
    self
  }

  pub fn with_secondary_address(mut self, address: impl Into<String>) -> Self {
    self.secondary_address = Some(address.into());
    self
  }

  pub fn with_home_phone(mut self, phone: impl Into<String>) -> Self {
    self.home_phone = Some(phone.into());
    self
  }

  pub fn with_work_phone(mut self, phone: impl Into<String>) -> Self {
    self.work_phone = Some(phone.into());
    self
  }

  /// Check required-field presence. Called by constructors and again by
  /// stores before persisting, since the fields are public.
  pub fn validate(&self) -> Result<()> {
    present("address", &self.address)?;
    present("city", &self.city)?;
    present("mobile", &self.mobile)?;
    present("email", &self.email)?;
    Ok(())
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CaseStore::create_person`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
  pub name:        String,
  pub surname:     String,
  pub father_name: String,
  pub tax_id:      String,
  #[serde(default)]
  pub mother_name: Option<String>,
  /// Number of the national identity card.
  #[serde(default)]
  pub national_id: Option<String>,
  #[serde(default)]
  pub contact:     Option<ContactInfo>,
}

impl NewPerson {
  pub fn new(
    name: impl Into<String>,
    surname: impl Into<String>,
    father_name: impl Into<String>,
    tax_id: impl Into<String>,
  ) -> Result<Self> {
    Ok(Self {
      name:        required("name", name.into())?,
      surname:     required("surname", surname.into())?,
      father_name: required("father_name", father_name.into())?,
      tax_id:      required("tax_id", tax_id.into())?,
      mother_name: None,
      national_id: None,
      contact:     None,
    })
  }

  pub fn with_mother_name(mut self, mother_name: impl Into<String>) -> Self {
    self.mother_name = Some(mother_name.into());
    self
  }

  pub fn with_national_id(mut self, national_id: impl Into<String>) -> Self {
    self.national_id = Some(national_id.into());
    self
  }

  pub fn with_contact(mut self, contact: ContactInfo) -> Self {
    self.contact = Some(contact);
    self
  }

  pub fn validate(&self) -> Result<()> {
    present("name", &self.name)?;
    present("surname", &self.surname)?;
    present("father_name", &self.father_name)?;
    present("tax_id", &self.tax_id)?;
    if let Some(contact) = &self.contact {
      contact.validate()?;
    }
    Ok(())
  }
}

/// A natural person, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id:   PersonId,
  pub name:        String,
  pub surname:     String,
  pub father_name: String,
  pub mother_name: Option<String>,
  pub national_id: Option<String>,
  pub tax_id:      String,
  pub contact:     Option<ContactInfo>,
}

impl Person {
  pub fn from_new(person_id: PersonId, input: NewPerson) -> Self {
    Self {
      person_id,
      name: input.name,
      surname: input.surname,
      father_name: input.father_name,
      mother_name: input.mother_name,
      national_id: input.national_id,
      tax_id: input.tax_id,
      contact: input.contact,
    }
  }

  pub fn party_ref(&self) -> PartyRef { PartyRef::Person(self.person_id) }
}

impl PartialEq for Person {
  fn eq(&self, other: &Self) -> bool { self.person_id == other.person_id }
}

impl Eq for Person {}

impl Hash for Person {
  fn hash<H: Hasher>(&self, state: &mut H) { self.person_id.hash(state) }
}

// ─── Organization ────────────────────────────────────────────────────────────

/// Input to [`crate::store::CaseStore::create_organization`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
  pub name:       String,
  pub tax_id:     String,
  /// Registered seat or main location.
  pub base:       String,
  #[serde(default)]
  pub brand_name: Option<String>,
  #[serde(default)]
  pub notes:      Option<String>,
  #[serde(default)]
  pub contact:    Option<ContactInfo>,
}

impl NewOrganization {
  pub fn new(
    name: impl Into<String>,
    tax_id: impl Into<String>,
    base: impl Into<String>,
  ) -> Result<Self> {
    Ok(Self {
      name:       required("name", name.into())?,
      tax_id:     required("tax_id", tax_id.into())?,
      base:       required("base", base.into())?,
      brand_name: None,
      notes:      None,
      contact:    None,
    })
  }

  pub fn with_brand_name(mut self, brand_name: impl Into<String>) -> Self {
    self.brand_name = Some(brand_name.into());
    self
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    self.notes = Some(notes.into());
    self
  }

  pub fn with_contact(mut self, contact: ContactInfo) -> Self {
    self.contact = Some(contact);
    self
  }

  pub fn validate(&self) -> Result<()> {
    present("name", &self.name)?;
    present("tax_id", &self.tax_id)?;
    present("base", &self.base)?;
    if let Some(contact) = &self.contact {
      contact.validate()?;
    }
    Ok(())
  }
}

/// An organization, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
  pub organization_id: OrganizationId,
  pub name:            String,
  pub brand_name:      Option<String>,
  pub base:            String,
  pub tax_id:          String,
  pub notes:           Option<String>,
  pub contact:         Option<ContactInfo>,
}

impl Organization {
  pub fn from_new(organization_id: OrganizationId, input: NewOrganization) -> Self {
    Self {
      organization_id,
      name: input.name,
      brand_name: input.brand_name,
      base: input.base,
      tax_id: input.tax_id,
      notes: input.notes,
      contact: input.contact,
    }
  }

  pub fn party_ref(&self) -> PartyRef {
    PartyRef::Organization(self.organization_id)
  }
}

impl PartialEq for Organization {
  fn eq(&self, other: &Self) -> bool {
    self.organization_id == other.organization_id
  }
}

impl Eq for Organization {}

impl Hash for Organization {
  fn hash<H: Hasher>(&self, state: &mut H) { self.organization_id.hash(state) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn person_requires_tax_id() {
    let err = NewPerson::new("James", "Joyce", "William", "  ").unwrap_err();
    assert!(matches!(err, Error::MissingField("tax_id")));
    assert!(err.is_construction());
  }

  #[test]
  fn person_optional_fields_are_optional() {
    let p = NewPerson::new("Jim", "Sturgess", "Alex", "8923723").unwrap();
    assert!(p.mother_name.is_none());
    assert!(p.national_id.is_none());

    let p = p.with_mother_name("Orelia").with_national_id("28971739812");
    assert_eq!(p.mother_name.as_deref(), Some("Orelia"));
    assert!(p.validate().is_ok());
  }

  #[test]
  fn organization_requires_base() {
    let err = NewOrganization::new("IBM", "8091273923", "").unwrap_err();
    assert!(matches!(err, Error::MissingField("base")));
  }

  #[test]
  fn contact_requires_email() {
    let err =
      ContactInfo::new("Marchmont Cr. 24", "Edinburgh", "004428731893712", "")
        .unwrap_err();
    assert!(matches!(err, Error::MissingField("email")));
  }

  #[test]
  fn nested_contact_is_validated() {
    let mut contact =
      ContactInfo::new("Propylaion 43", "Athens", "6984232921", "m@example.com")
        .unwrap();
    contact.city.clear();
    let p = NewPerson::new("Alex", "Mao", "Brian", "98712398")
      .unwrap()
      .with_contact(contact);
    assert!(matches!(p.validate(), Err(Error::MissingField("city"))));
  }

  #[test]
  fn identity_is_by_id_not_by_fields() {
    let input = NewPerson::new("John", "Snow", "Alex", "39048703").unwrap();
    let a = Person::from_new(PersonId(1), input.clone());
    let b = Person::from_new(PersonId(2), input.clone());
    let c = Person::from_new(PersonId(1), input);
    assert_ne!(a, b);
    assert_eq!(a, c);
  }

  #[test]
  fn party_ref_wire_shape() {
    let json = serde_json::to_value(PartyRef::Organization(OrganizationId(7)))
      .unwrap();
    assert_eq!(json, serde_json::json!({ "organization": 7 }));

    let back: PartyRef =
      serde_json::from_value(serde_json::json!({ "person": 3 })).unwrap();
    assert_eq!(back, PartyRef::Person(PersonId(3)));
  }
}
