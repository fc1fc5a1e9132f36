use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{customer, verification};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "ended")]
    Ended,
    #[sea_orm(string_value = "revoked")]
    Revoked,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub user_agent: String,
    pub status: SessionStatus,
    pub started_at: DateTimeUtc,
    pub ended_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
    Verification,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
            Relation::Verification => Entity::has_many(verification::Entity).into(),
        }
    }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl Related<verification::Entity> for Entity {
    fn to() -> RelationDef { Relation::Verification.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSession {
    pub customer_id: Uuid,
    #[validate(length(min = 1, max = 512), custom(function = "crate::validation::not_blank"))]
    pub user_agent: String,
    #[serde(default)]
    pub status: Option<SessionStatus>,
    #[serde(default)]
    pub started_at: Option<DateTimeUtc>,
    #[serde(default)]
    pub ended_at: Option<DateTimeUtc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SessionChanges {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, max = 512), custom(function = "crate::validation::not_blank"))]
    pub user_agent: Option<String>,
    pub status: Option<SessionStatus>,
    pub started_at: Option<DateTimeUtc>,
    #[serde(default, deserialize_with = "crate::serde_ext::double_option")]
    pub ended_at: Option<Option<DateTimeUtc>>,
}

impl NewSession {
    pub fn into_model(self) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            customer_id: self.customer_id,
            user_agent: self.user_agent,
            status: self.status.unwrap_or_default(),
            started_at: self.started_at.unwrap_or(now),
            ended_at: self.ended_at,
            created_at: now,
            updated_at: now,
        }
    }
}

impl SessionChanges {
    pub fn apply(self, model: &mut Model) {
        if let Some(v) = self.customer_id { model.customer_id = v; }
        if let Some(v) = self.user_agent { model.user_agent = v; }
        if let Some(v) = self.status { model.status = v; }
        if let Some(v) = self.started_at { model.started_at = v; }
        if let Some(v) = self.ended_at { model.ended_at = v; }
        model.updated_at = Utc::now();
    }
}
