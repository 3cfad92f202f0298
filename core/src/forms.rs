//! Caller-side input forms for creating and editing entities.
//!
//! The data-access layer forwards whatever it is given. These forms are
//! where range and presence checks happen, before any request is built,
//! and where an edit is reduced to the fields that actually changed.

use chrono::{DateTime, Utc};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::types::{Client, ClientPatch, LoyaltyProgram, LoyaltyProgramPatch, LoyaltyProgramRef};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unknown loyalty program {0}")]
    UnknownLoyaltyProgram(i64),
}

/// Format `at` the way the backend stores registration dates,
/// e.g. `2024-01-01T00:00:00.000Z`.
pub fn registration_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct LoyaltyProgramForm {
    #[validate(range(min = 1))]
    pub level: i32,
    #[validate(range(min = 1, max = 100))]
    pub discount_amount: i32,
    #[validate(range(min = 1))]
    pub validity_period: i32,
    #[validate(length(min = 1))]
    pub description: String,
}

impl From<&LoyaltyProgram> for LoyaltyProgramForm {
    fn from(program: &LoyaltyProgram) -> Self {
        Self {
            level: program.level,
            discount_amount: program.discount_amount,
            validity_period: program.validity_period,
            description: program.description.clone(),
        }
    }
}

impl LoyaltyProgramForm {
    /// Validate and build a program ready for `create` (no id).
    pub fn into_program(self) -> Result<LoyaltyProgram, FormError> {
        self.validate()?;
        Ok(LoyaltyProgram {
            id: None,
            level: self.level,
            discount_amount: self.discount_amount,
            validity_period: self.validity_period,
            description: self.description,
        })
    }

    /// Validate and return the fields that differ from `current`.
    pub fn diff(&self, current: &LoyaltyProgram) -> Result<LoyaltyProgramPatch, FormError> {
        self.validate()?;
        Ok(LoyaltyProgramPatch {
            level: changed(&self.level, &current.level),
            discount_amount: changed(&self.discount_amount, &current.discount_amount),
            validity_period: changed(&self.validity_period, &current.validity_period),
            description: changed(&self.description, &current.description),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ClientForm {
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub patronymic: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub email: String,
    /// 0 means "nothing selected" and fails validation.
    #[validate(range(min = 1))]
    pub loyalty_program_id: i64,
}

impl From<&Client> for ClientForm {
    fn from(client: &Client) -> Self {
        Self {
            last_name: client.last_name.clone(),
            first_name: client.first_name.clone(),
            patronymic: client.patronymic.clone(),
            phone_number: client.phone_number.clone(),
            address: client.address.clone(),
            email: client.email.clone(),
            loyalty_program_id: client.loyalty_program.id().unwrap_or_default(),
        }
    }
}

impl ClientForm {
    /// Validate and build a client ready for `create`, embedding the selected
    /// program from `programs` and stamping `registered_at`.
    pub fn into_client(self, programs: &[LoyaltyProgram], registered_at: DateTime<Utc>) -> Result<Client, FormError> {
        self.validate()?;
        let program = select(programs, self.loyalty_program_id)?;
        Ok(Client {
            id: None,
            last_name: self.last_name,
            first_name: self.first_name,
            patronymic: self.patronymic,
            phone_number: self.phone_number,
            address: self.address,
            email: self.email,
            registration_date: registration_timestamp(registered_at),
            loyalty_program: LoyaltyProgramRef::Embedded(program),
        })
    }

    /// Validate and return the fields that differ from `current`. The
    /// registration date is never part of an edit.
    pub fn diff(&self, current: &Client, programs: &[LoyaltyProgram]) -> Result<ClientPatch, FormError> {
        self.validate()?;
        let loyalty_program = if current.loyalty_program.id() == Some(self.loyalty_program_id) {
            None
        } else {
            Some(LoyaltyProgramRef::Embedded(select(programs, self.loyalty_program_id)?))
        };
        Ok(ClientPatch {
            last_name: changed(&self.last_name, &current.last_name),
            first_name: changed(&self.first_name, &current.first_name),
            patronymic: changed(&self.patronymic, &current.patronymic),
            phone_number: changed(&self.phone_number, &current.phone_number),
            address: changed(&self.address, &current.address),
            email: changed(&self.email, &current.email),
            registration_date: None,
            loyalty_program,
        })
    }
}

fn changed<T: PartialEq + Clone>(new: &T, old: &T) -> Option<T> {
    (new != old).then(|| new.clone())
}

fn select(programs: &[LoyaltyProgram], id: i64) -> Result<LoyaltyProgram, FormError> {
    programs
        .iter()
        .find(|program| program.id == Some(id))
        .cloned()
        .ok_or(FormError::UnknownLoyaltyProgram(id))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn programs() -> Vec<LoyaltyProgram> {
        vec![
            LoyaltyProgram {
                id: Some(1),
                level: 1,
                discount_amount: 5,
                validity_period: 30,
                description: "Bronze".to_string(),
            },
            LoyaltyProgram {
                id: Some(2),
                level: 2,
                discount_amount: 15,
                validity_period: 365,
                description: "Gold".to_string(),
            },
        ]
    }

    fn program_form() -> LoyaltyProgramForm {
        LoyaltyProgramForm::from(&programs()[0])
    }

    fn client_form() -> ClientForm {
        ClientForm {
            last_name: "Ivanov".to_string(),
            first_name: "Ivan".to_string(),
            patronymic: "Ivanovich".to_string(),
            phone_number: "+1234567890".to_string(),
            address: "1 Main St".to_string(),
            email: "a@b.com".to_string(),
            loyalty_program_id: 1,
        }
    }

    fn new_year() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn timestamp_has_millis_and_zulu_suffix() {
        assert_eq!(registration_timestamp(new_year()), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn discount_must_be_a_percentage() {
        for discount in [0, 101, -5] {
            let form = LoyaltyProgramForm {
                discount_amount: discount,
                ..program_form()
            };
            assert!(matches!(form.into_program(), Err(FormError::Validation(_))), "{discount}");
        }
        for discount in [1, 100] {
            let form = LoyaltyProgramForm {
                discount_amount: discount,
                ..program_form()
            };
            assert!(form.into_program().is_ok(), "{discount}");
        }
    }

    #[test]
    fn level_validity_and_description_are_required() {
        let bad = [
            LoyaltyProgramForm { level: 0, ..program_form() },
            LoyaltyProgramForm { validity_period: 0, ..program_form() },
            LoyaltyProgramForm { description: String::new(), ..program_form() },
        ];
        for form in bad {
            assert!(form.validate().is_err(), "{form:?}");
        }
    }

    #[test]
    fn into_program_leaves_id_unset() {
        let program = program_form().into_program().unwrap();
        assert_eq!(program.id, None);
        assert_eq!(program.description, "Bronze");
    }

    #[test]
    fn program_diff_contains_only_changes() {
        let current = &programs()[0];
        let form = LoyaltyProgramForm {
            discount_amount: 7,
            ..program_form()
        };
        let patch = form.diff(current).unwrap();
        assert_eq!(
            patch,
            LoyaltyProgramPatch {
                discount_amount: Some(7),
                ..LoyaltyProgramPatch::default()
            }
        );
        assert!(program_form().diff(current).unwrap().is_empty());
    }

    #[test]
    fn invalid_edit_produces_no_patch() {
        let form = LoyaltyProgramForm {
            discount_amount: 150,
            ..program_form()
        };
        assert!(form.diff(&programs()[0]).is_err());
    }

    #[test]
    fn into_client_embeds_selected_program() {
        let client = client_form().into_client(&programs(), new_year()).unwrap();
        assert_eq!(client.id, None);
        assert_eq!(client.registration_date, "2024-01-01T00:00:00.000Z");
        assert_eq!(
            client.loyalty_program,
            LoyaltyProgramRef::Embedded(programs()[0].clone())
        );
    }

    #[test]
    fn into_client_requires_every_field_and_a_program() {
        let form = ClientForm {
            email: String::new(),
            ..client_form()
        };
        assert!(matches!(
            form.into_client(&programs(), new_year()),
            Err(FormError::Validation(_))
        ));

        let form = ClientForm {
            loyalty_program_id: 0,
            ..client_form()
        };
        assert!(matches!(
            form.into_client(&programs(), new_year()),
            Err(FormError::Validation(_))
        ));

        let form = ClientForm {
            loyalty_program_id: 99,
            ..client_form()
        };
        assert!(matches!(
            form.into_client(&programs(), new_year()),
            Err(FormError::UnknownLoyaltyProgram(99))
        ));
    }

    #[test]
    fn client_diff_tracks_text_and_program_changes() {
        let current = Client {
            id: Some(42),
            ..client_form().into_client(&programs(), new_year()).unwrap()
        };
        let form = ClientForm {
            email: "new@b.com".to_string(),
            loyalty_program_id: 2,
            ..ClientForm::from(&current)
        };
        let patch = form.diff(&current, &programs()).unwrap();
        assert_eq!(patch.email.as_deref(), Some("new@b.com"));
        assert_eq!(patch.loyalty_program.and_then(|p| p.id()), Some(2));
        assert!(patch.last_name.is_none());
        assert!(patch.registration_date.is_none());

        let unchanged = ClientForm::from(&current).diff(&current, &programs()).unwrap();
        assert!(unchanged.is_empty());
    }
}
