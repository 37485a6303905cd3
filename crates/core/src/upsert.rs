//! Insert-or-update requests for patient entities.
//!
//! Every intake step saves one or more entities, and each entity is inserted when the current
//! record has no positive identifier for it and updated otherwise. [`Upsert::plan`] makes that
//! choice once; [`EntityRequest`] carries the result for any of the six entity kinds so a
//! transport needs a single `upsert` operation.
//!
//! Inserts are `POST` requests answered with `201 Created`; updates are `PUT` requests
//! answered with `202 Accepted`. Health vitals are insert-only.

use crate::constants::{
    ADDRESSES_PATH, EMAILS_PATH, IDENTITIES_PATH, PATIENTS_PATH, PHONES_PATH, VITALS_PATH,
};
use crate::models::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Profile,
    Identity,
    Address,
    Phone,
    Email,
    Vital,
}

impl EntityKind {
    /// Collection path the insert and update requests are sent to.
    pub fn path(self) -> &'static str {
        match self {
            EntityKind::Profile => PATIENTS_PATH,
            EntityKind::Identity => IDENTITIES_PATH,
            EntityKind::Address => ADDRESSES_PATH,
            EntityKind::Phone => PHONES_PATH,
            EntityKind::Email => EMAILS_PATH,
            EntityKind::Vital => VITALS_PATH,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Profile => "profile",
            EntityKind::Identity => "identity",
            EntityKind::Address => "address",
            EntityKind::Phone => "phone",
            EntityKind::Email => "email",
            EntityKind::Vital => "health vital",
        }
    }

    /// Decodes a backend response body into the record of this kind.
    pub fn decode(self, body: serde_json::Value) -> serde_json::Result<EntityRecord> {
        Ok(match self {
            EntityKind::Profile => EntityRecord::Profile(serde_json::from_value(body)?),
            EntityKind::Identity => EntityRecord::Identity(serde_json::from_value(body)?),
            EntityKind::Address => EntityRecord::Address(serde_json::from_value(body)?),
            EntityKind::Phone => EntityRecord::Phone(serde_json::from_value(body)?),
            EntityKind::Email => EntityRecord::Email(serde_json::from_value(body)?),
            EntityKind::Vital => EntityRecord::Vital(serde_json::from_value(body)?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Insert,
    Update,
}

impl Operation {
    /// The only status code that counts as success for this operation.
    pub fn expected_status(self) -> u16 {
        match self {
            Operation::Insert => 201,
            Operation::Update => 202,
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Operation::Insert => "added",
            Operation::Update => "updated",
        }
    }
}

/// An insert request or an update request for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Upsert<I, U> {
    Insert(I),
    Update(U),
}

impl<I, U> Upsert<I, U> {
    /// Chooses update when `existing_id` is present and positive, insert otherwise.
    pub fn plan(
        existing_id: Option<i64>,
        insert: impl FnOnce() -> I,
        update: impl FnOnce(i64) -> U,
    ) -> Self {
        match existing_id.filter(|id| *id > 0) {
            Some(id) => Upsert::Update(update(id)),
            None => Upsert::Insert(insert()),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Upsert::Insert(_) => Operation::Insert,
            Upsert::Update(_) => Operation::Update,
        }
    }
}

/// A save request for any patient entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRequest {
    Profile(Upsert<InsertProfileRequest, UpdateProfileRequest>),
    Identity(Upsert<InsertIdentityRequest, UpdateIdentityRequest>),
    Address(Upsert<InsertAddressRequest, UpdateAddressRequest>),
    Phone(Upsert<InsertPhoneRequest, UpdatePhoneRequest>),
    Email(Upsert<InsertEmailRequest, UpdateEmailRequest>),
    Vital(InsertVitalRequest),
}

impl EntityRequest {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRequest::Profile(_) => EntityKind::Profile,
            EntityRequest::Identity(_) => EntityKind::Identity,
            EntityRequest::Address(_) => EntityKind::Address,
            EntityRequest::Phone(_) => EntityKind::Phone,
            EntityRequest::Email(_) => EntityKind::Email,
            EntityRequest::Vital(_) => EntityKind::Vital,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            EntityRequest::Profile(u) => u.operation(),
            EntityRequest::Identity(u) => u.operation(),
            EntityRequest::Address(u) => u.operation(),
            EntityRequest::Phone(u) => u.operation(),
            EntityRequest::Email(u) => u.operation(),
            EntityRequest::Vital(_) => Operation::Insert,
        }
    }

    /// JSON body of the request.
    pub fn body(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            EntityRequest::Profile(u) => serde_json::to_value(u),
            EntityRequest::Identity(u) => serde_json::to_value(u),
            EntityRequest::Address(u) => serde_json::to_value(u),
            EntityRequest::Phone(u) => serde_json::to_value(u),
            EntityRequest::Email(u) => serde_json::to_value(u),
            EntityRequest::Vital(r) => serde_json::to_value(r),
        }
    }
}

/// The record the backend returned for a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRecord {
    Profile(PatientProfile),
    Identity(PatientIdentity),
    Address(PatientAddress),
    Phone(PatientPhone),
    Email(PatientEmail),
    Vital(PatientHealthVital),
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRecord::Profile(_) => EntityKind::Profile,
            EntityRecord::Identity(_) => EntityKind::Identity,
            EntityRecord::Address(_) => EntityKind::Address,
            EntityRecord::Phone(_) => EntityKind::Phone,
            EntityRecord::Email(_) => EntityKind::Email,
            EntityRecord::Vital(_) => EntityKind::Vital,
        }
    }

    pub fn into_profile(self) -> Option<PatientProfile> {
        match self {
            EntityRecord::Profile(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_identity(self) -> Option<PatientIdentity> {
        match self {
            EntityRecord::Identity(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_address(self) -> Option<PatientAddress> {
        match self {
            EntityRecord::Address(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_phone(self) -> Option<PatientPhone> {
        match self {
            EntityRecord::Phone(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_email(self) -> Option<PatientEmail> {
        match self {
            EntityRecord::Email(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_vital(self) -> Option<PatientHealthVital> {
        match self {
            EntityRecord::Vital(record) => Some(record),
            _ => None,
        }
    }
}
