//! Domain DTOs for the loyalty API.
//!
//! # Design
//! These types mirror the backend schema but are defined independently from
//! the mock-backend crate; integration tests catch any schema drift.
//!
//! The wire schema is snake_case (`id_client`, `loyalty_level`, ...).
//! Entities decode through private raw structs that read every legacy key
//! separately and prefer the snake_case one when both are present. Integer
//! fields go through [`lenient`](crate::lenient) and unknown keys are
//! ignored. Ids are omitted from encoded bodies while unset.

use serde::{Deserialize, Serialize};

use crate::lenient;

/// A loyalty program tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawLoyaltyProgram")]
pub struct LoyaltyProgram {
    #[serde(rename = "id_loyalty_program", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "loyalty_level")]
    pub level: i32,
    /// Percentage, expected in `1..=100`. Not checked here.
    pub discount_amount: i32,
    /// Days.
    pub validity_period: i32,
    pub description: String,
}

/// Every key a loyalty program has been sent under. Each legacy key is its
/// own field so a body carrying both spellings still decodes.
#[derive(Deserialize)]
struct RawLoyaltyProgram {
    #[serde(default, deserialize_with = "lenient::optional_int")]
    id_loyalty_program: Option<i64>,
    #[serde(default, rename = "idLoyaltyProgram", deserialize_with = "lenient::optional_int")]
    id_loyalty_program_camel: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    loyalty_level: Option<i32>,
    #[serde(default, rename = "loyaltyLevel", deserialize_with = "lenient::optional_int")]
    loyalty_level_camel: Option<i32>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    level: Option<i32>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    discount_amount: Option<i32>,
    #[serde(default, rename = "discountAmount", deserialize_with = "lenient::optional_int")]
    discount_amount_camel: Option<i32>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    validity_period: Option<i32>,
    #[serde(default, rename = "validityPeriod", deserialize_with = "lenient::optional_int")]
    validity_period_camel: Option<i32>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawLoyaltyProgram> for LoyaltyProgram {
    type Error = String;

    fn try_from(raw: RawLoyaltyProgram) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.id_loyalty_program.or(raw.id_loyalty_program_camel).or(raw.id),
            level: required(
                "loyalty_level",
                raw.loyalty_level.or(raw.loyalty_level_camel).or(raw.level),
            )?,
            discount_amount: required("discount_amount", raw.discount_amount.or(raw.discount_amount_camel))?,
            validity_period: required("validity_period", raw.validity_period.or(raw.validity_period_camel))?,
            description: required("description", raw.description)?,
        })
    }
}

/// How a client points at its loyalty program.
///
/// Encoded as the embedded object; a bare id is accepted on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum LoyaltyProgramRef {
    Embedded(LoyaltyProgram),
    Id(#[serde(deserialize_with = "lenient::int")] i64),
}

impl LoyaltyProgramRef {
    /// Id of the referenced program, if known.
    pub fn id(&self) -> Option<i64> {
        match self {
            LoyaltyProgramRef::Embedded(program) => program.id,
            LoyaltyProgramRef::Id(id) => Some(*id),
        }
    }

    pub fn program(&self) -> Option<&LoyaltyProgram> {
        match self {
            LoyaltyProgramRef::Embedded(program) => Some(program),
            LoyaltyProgramRef::Id(_) => None,
        }
    }
}

impl From<LoyaltyProgram> for LoyaltyProgramRef {
    fn from(program: LoyaltyProgram) -> Self {
        LoyaltyProgramRef::Embedded(program)
    }
}

impl From<i64> for LoyaltyProgramRef {
    fn from(id: i64) -> Self {
        LoyaltyProgramRef::Id(id)
    }
}

/// A registered client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawClient")]
pub struct Client {
    #[serde(rename = "id_client", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub last_name: String,
    pub first_name: String,
    pub patronymic: String,
    pub phone_number: String,
    pub address: String,
    pub email: String,
    /// `yyyy-MM-ddTHH:mm:ss.SSSZ`, set by the caller at creation.
    #[serde(rename = "date_registration")]
    pub registration_date: String,
    pub loyalty_program: LoyaltyProgramRef,
}

#[derive(Deserialize)]
struct RawClient {
    #[serde(default, deserialize_with = "lenient::optional_int")]
    id_client: Option<i64>,
    #[serde(default, rename = "idClient", deserialize_with = "lenient::optional_int")]
    id_client_camel: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional_int")]
    id: Option<i64>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default, rename = "lastName")]
    last_name_camel: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default, rename = "firstName")]
    first_name_camel: Option<String>,
    #[serde(default)]
    patronymic: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default, rename = "phoneNumber")]
    phone_number_camel: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    adress: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    date_registration: Option<String>,
    #[serde(default, rename = "dateRegistration")]
    date_registration_camel: Option<String>,
    #[serde(default, rename = "registrationDate")]
    registration_date: Option<String>,
    #[serde(default)]
    loyalty_program: Option<LoyaltyProgramRef>,
    #[serde(default, rename = "loyaltyProgram")]
    loyalty_program_camel: Option<LoyaltyProgramRef>,
}

impl TryFrom<RawClient> for Client {
    type Error = String;

    fn try_from(raw: RawClient) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.id_client.or(raw.id_client_camel).or(raw.id),
            last_name: required("last_name", raw.last_name.or(raw.last_name_camel))?,
            first_name: required("first_name", raw.first_name.or(raw.first_name_camel))?,
            patronymic: required("patronymic", raw.patronymic)?,
            phone_number: required("phone_number", raw.phone_number.or(raw.phone_number_camel))?,
            address: required("address", raw.address.or(raw.adress))?,
            email: required("email", raw.email)?,
            registration_date: required(
                "date_registration",
                raw.date_registration
                    .or(raw.date_registration_camel)
                    .or(raw.registration_date),
            )?,
            loyalty_program: required(
                "loyalty_program",
                raw.loyalty_program.or(raw.loyalty_program_camel),
            )?,
        })
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, String> {
    value.ok_or_else(|| format!("missing field `{field}`"))
}

/// Changed fields of a client. Only the fields present in the JSON are
/// applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "date_registration",
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loyalty_program: Option<LoyaltyProgramRef>,
}

impl ClientPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Changed fields of a loyalty program. Values are forwarded as given, with
/// no range checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoyaltyProgramPatch {
    #[serde(rename = "loyalty_level", skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_period: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LoyaltyProgramPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold() -> LoyaltyProgram {
        LoyaltyProgram {
            id: Some(1),
            level: 2,
            discount_amount: 15,
            validity_period: 365,
            description: "Gold".to_string(),
        }
    }

    #[test]
    fn program_serializes_snake_case_and_omits_unset_id() {
        let program = LoyaltyProgram { id: None, ..gold() };
        let json = serde_json::to_value(&program).unwrap();
        assert!(json.get("id_loyalty_program").is_none());
        assert_eq!(json["loyalty_level"], 2);
        assert_eq!(json["discount_amount"], 15);
        assert_eq!(json["validity_period"], 365);
        assert_eq!(json["description"], "Gold");
    }

    #[test]
    fn program_decodes_camel_case_strings_and_unknown_fields() {
        let program: LoyaltyProgram = serde_json::from_str(
            r#"{"id":"1","loyaltyLevel":"2","discountAmount":15,
                "validityPeriod":"365","description":"Gold","tier_color":"gold"}"#,
        )
        .unwrap();
        assert_eq!(program, gold());
    }

    #[test]
    fn client_decodes_embedded_program() {
        let client: Client = serde_json::from_str(
            r#"{"id_client":42,"last_name":"Ivanov","first_name":"Ivan",
                "patronymic":"Ivanovich","phone_number":"+1234567890",
                "address":"1 Main St","email":"a@b.com",
                "date_registration":"2024-01-01T00:00:00.000Z",
                "loyalty_program":{"id_loyalty_program":1,"loyalty_level":2,
                "discount_amount":15,"validity_period":365,"description":"Gold"}}"#,
        )
        .unwrap();
        assert_eq!(client.id, Some(42));
        assert_eq!(client.loyalty_program, LoyaltyProgramRef::Embedded(gold()));
        assert_eq!(client.loyalty_program.id(), Some(1));
    }

    #[test]
    fn client_decodes_program_reference_and_legacy_keys() {
        let client: Client = serde_json::from_str(
            r#"{"idClient":"7","lastName":"Petrov","firstName":"Petr",
                "patronymic":"Petrovich","phoneNumber":"555","adress":"2 Side St",
                "email":"p@b.com","dateRegistration":"2024-02-02T10:00:00.000Z",
                "loyaltyProgram":3}"#,
        )
        .unwrap();
        assert_eq!(client.id, Some(7));
        assert_eq!(client.address, "2 Side St");
        assert_eq!(client.loyalty_program, LoyaltyProgramRef::Id(3));
        assert!(client.loyalty_program.program().is_none());
    }

    #[test]
    fn program_with_canonical_and_legacy_keys_prefers_canonical() {
        let program: LoyaltyProgram = serde_json::from_str(
            r#"{"id":9,"id_loyalty_program":1,"loyalty_level":2,"loyaltyLevel":5,
                "discount_amount":15,"validity_period":365,"description":"Gold"}"#,
        )
        .unwrap();
        assert_eq!(program, gold());
    }

    #[test]
    fn client_with_address_and_misspelled_address_decodes() {
        let client: Client = serde_json::from_str(
            r#"{"id":42,"id_client":42,"last_name":"Ivanov","lastName":"Old",
                "first_name":"Ivan","patronymic":"Ivanovich",
                "phone_number":"+1234567890","address":"1 Main St","adress":"old",
                "email":"a@b.com","date_registration":"2024-01-01T00:00:00.000Z",
                "loyalty_program":1,"loyaltyProgram":2}"#,
        )
        .unwrap();
        assert_eq!(client.id, Some(42));
        assert_eq!(client.last_name, "Ivanov");
        assert_eq!(client.address, "1 Main St");
        assert_eq!(client.loyalty_program, LoyaltyProgramRef::Id(1));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = serde_json::from_str::<LoyaltyProgram>(
            r#"{"loyalty_level":2,"discount_amount":15,"validity_period":365}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing field `description`"), "{err}");
    }

    #[test]
    fn client_patch_serializes_only_set_fields() {
        let patch = ClientPatch {
            email: Some("new@b.com".to_string()),
            ..ClientPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"email": "new@b.com"}));
        assert!(!patch.is_empty());
        assert!(ClientPatch::default().is_empty());
    }

    #[test]
    fn program_patch_forwards_out_of_range_values() {
        let patch = LoyaltyProgramPatch {
            discount_amount: Some(150),
            level: Some(0),
            ..LoyaltyProgramPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"loyalty_level": 0, "discount_amount": 150})
        );
    }
}
