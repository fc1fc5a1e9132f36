use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{customer, payment, session};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "expired")]
    Expired,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "verification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub session_id: Uuid,
    pub payment_id: Uuid,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub status: VerificationStatus,
    pub attempts: i32,
    pub expires_at: DateTimeUtc,
    pub verified_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
    Session,
    Payment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
            Relation::Session => Entity::belongs_to(session::Entity)
                .from(Column::SessionId)
                .to(session::Column::Id)
                .into(),
            Relation::Payment => Entity::belongs_to(payment::Entity)
                .from(Column::PaymentId)
                .to(payment::Column::Id)
                .into(),
        }
    }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl Related<session::Entity> for Entity {
    fn to() -> RelationDef { Relation::Session.def() }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Payment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewVerification {
    pub customer_id: Uuid,
    pub session_id: Uuid,
    pub payment_id: Uuid,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64), custom(function = "crate::validation::not_blank"))]
    pub kind: String,
    #[serde(default)]
    pub status: Option<VerificationStatus>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub attempts: Option<i32>,
    pub expires_at: DateTimeUtc,
    #[serde(default)]
    pub verified_at: Option<DateTimeUtc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VerificationChanges {
    pub customer_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64), custom(function = "crate::validation::not_blank"))]
    pub kind: Option<String>,
    pub status: Option<VerificationStatus>,
    #[validate(range(min = 0))]
    pub attempts: Option<i32>,
    pub expires_at: Option<DateTimeUtc>,
    #[serde(default, deserialize_with = "crate::serde_ext::double_option")]
    pub verified_at: Option<Option<DateTimeUtc>>,
}

impl NewVerification {
    pub fn into_model(self) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            customer_id: self.customer_id,
            session_id: self.session_id,
            payment_id: self.payment_id,
            kind: self.kind,
            status: self.status.unwrap_or_default(),
            attempts: self.attempts.unwrap_or(0),
            expires_at: self.expires_at,
            verified_at: self.verified_at,
            created_at: now,
            updated_at: now,
        }
    }
}

impl VerificationChanges {
    pub fn apply(self, model: &mut Model) {
        if let Some(v) = self.customer_id { model.customer_id = v; }
        if let Some(v) = self.session_id { model.session_id = v; }
        if let Some(v) = self.payment_id { model.payment_id = v; }
        if let Some(v) = self.kind { model.kind = v; }
        if let Some(v) = self.status { model.status = v; }
        if let Some(v) = self.attempts { model.attempts = v; }
        if let Some(v) = self.expires_at { model.expires_at = v; }
        if let Some(v) = self.verified_at { model.verified_at = v; }
        model.updated_at = Utc::now();
    }
}
