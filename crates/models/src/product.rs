//! Rentable product (called "service" by older clients).

use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::{customer, payment, validation};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub min_monthly_rent: String,
    pub max_monthly_rent: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
    Payment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
            Relation::Payment => Entity::has_many(payment::Entity).into(),
        }
    }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Payment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    pub customer_id: Uuid,
    #[validate(length(min = 1, max = 255), custom(function = "crate::validation::not_blank"))]
    pub name: String,
    #[validate(length(min = 1), custom(function = "crate::validation::not_blank"))]
    pub description: String,
    #[validate(length(max = 32), custom(function = "crate::validation::decimal_amount"))]
    pub min_monthly_rent: String,
    #[validate(length(max = 32), custom(function = "crate::validation::decimal_amount"))]
    pub max_monthly_rent: String,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProductChanges {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255), custom(function = "crate::validation::not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1), custom(function = "crate::validation::not_blank"))]
    pub description: Option<String>,
    #[validate(length(max = 32), custom(function = "crate::validation::decimal_amount"))]
    pub min_monthly_rent: Option<String>,
    #[validate(length(max = 32), custom(function = "crate::validation::decimal_amount"))]
    pub max_monthly_rent: Option<String>,
    pub active: Option<bool>,
}

/// The lower rent bound may not exceed the upper one.
pub fn check_rent_bounds(min: &str, max: &str) -> Result<(), ValidationErrors> {
    match (validation::parse_amount(min), validation::parse_amount(max)) {
        (Some(lo), Some(hi)) if lo > hi => Err(validation::field_error(
            "min_monthly_rent",
            "range",
            "must not exceed max_monthly_rent",
        )),
        _ => Ok(()),
    }
}

impl NewProduct {
    pub fn into_model(self) -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            customer_id: self.customer_id,
            name: self.name.trim().to_string(),
            description: self.description,
            min_monthly_rent: self.min_monthly_rent.trim().to_string(),
            max_monthly_rent: self.max_monthly_rent.trim().to_string(),
            active: self.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

impl ProductChanges {
    pub fn apply(self, model: &mut Model) {
        if let Some(v) = self.customer_id { model.customer_id = v; }
        if let Some(v) = self.name { model.name = v.trim().to_string(); }
        if let Some(v) = self.description { model.description = v; }
        if let Some(v) = self.min_monthly_rent { model.min_monthly_rent = v.trim().to_string(); }
        if let Some(v) = self.max_monthly_rent { model.max_monthly_rent = v.trim().to_string(); }
        if let Some(v) = self.active { model.active = v; }
        model.updated_at = Utc::now();
    }
}
