//! Binds each entity type to its collection path and patch carrier so the
//! request builder and the service can be written once for both entities.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{Client, ClientPatch, LoyaltyProgram, LoyaltyProgramPatch};

/// An entity exposed by the backend as a REST collection.
pub trait Resource: Serialize + DeserializeOwned + Send + 'static {
    /// Body type for `PATCH {COLLECTION}/{id}`.
    type Patch: Serialize;

    /// Collection path, leading slash included.
    const COLLECTION: &'static str;

    /// Singular noun used in error messages.
    const NOUN: &'static str;

    /// Plural noun used in error messages.
    const PLURAL: &'static str;
}

impl Resource for Client {
    type Patch = ClientPatch;
    const COLLECTION: &'static str = "/clients";
    const NOUN: &'static str = "client";
    const PLURAL: &'static str = "clients";
}

impl Resource for LoyaltyProgram {
    type Patch = LoyaltyProgramPatch;
    const COLLECTION: &'static str = "/lp";
    const NOUN: &'static str = "loyalty program";
    const PLURAL: &'static str = "loyalty programs";
}
