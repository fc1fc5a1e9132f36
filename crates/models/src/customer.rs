use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{payment, product, session, verification};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub address: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Product,
    Session,
    Payment,
    Verification,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Product => Entity::has_many(product::Entity).into(),
            Relation::Session => Entity::has_many(session::Entity).into(),
            Relation::Payment => Entity::has_many(payment::Entity).into(),
            Relation::Verification => Entity::has_many(verification::Entity).into(),
        }
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl Related<session::Entity> for Entity {
    fn to() -> RelationDef { Relation::Session.def() }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Payment.def() }
}

impl Related<verification::Entity> for Entity {
    fn to() -> RelationDef { Relation::Verification.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Create payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCustomer {
    #[validate(length(min = 1, max = 255), custom(function = "crate::validation::not_blank"))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 32), custom(function = "crate::validation::not_blank"))]
    pub phone: String,
    #[validate(length(min = 1, max = 512), custom(function = "crate::validation::not_blank"))]
    pub address: String,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CustomerChanges {
    #[validate(length(min = 1, max = 255), custom(function = "crate::validation::not_blank"))]
    pub name: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 32), custom(function = "crate::validation::not_blank"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 512), custom(function = "crate::validation::not_blank"))]
    pub address: Option<String>,
    pub active: Option<bool>,
}

/// Emails compare case-insensitively, so they are stored trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

impl NewCustomer {
    /// Merge the payload with system defaults into a fresh record.
    pub fn into_model(self) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            active: self.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

impl CustomerChanges {
    /// Apply present fields onto `model` and bump `updated_at`.
    pub fn apply(self, model: &mut Model) {
        if let Some(v) = self.name { model.name = v.trim().to_string(); }
        if let Some(v) = self.email { model.email = normalize_email(&v); }
        if let Some(v) = self.phone { model.phone = v.trim().to_string(); }
        if let Some(v) = self.address { model.address = v.trim().to_string(); }
        if let Some(v) = self.active { model.active = v; }
        model.updated_at = Utc::now();
    }
}
