use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{customer, product, verification};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    /// Decimal amount kept as text to avoid float rounding.
    pub amount: String,
    pub currency: String,
    pub method: String,
    pub status: PaymentStatus,
    /// Reference issued by the external payment provider.
    pub reference: String,
    pub paid_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
    Product,
    Verification,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
            Relation::Product => Entity::belongs_to(product::Entity)
                .from(Column::ProductId)
                .to(product::Column::Id)
                .into(),
            Relation::Verification => Entity::has_many(verification::Entity).into(),
        }
    }
}

impl Related<customer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Customer.def() }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl Related<verification::Entity> for Entity {
    fn to() -> RelationDef { Relation::Verification.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPayment {
    pub customer_id: Uuid,
    pub product_id: Uuid,
    #[validate(length(max = 32), custom(function = "crate::validation::decimal_amount"))]
    pub amount: String,
    #[validate(custom(function = "crate::validation::currency_code"))]
    pub currency: String,
    #[validate(length(min = 1, max = 64), custom(function = "crate::validation::not_blank"))]
    pub method: String,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[validate(length(min = 1, max = 255), custom(function = "crate::validation::not_blank"))]
    pub reference: String,
    #[serde(default)]
    pub paid_at: Option<DateTimeUtc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PaymentChanges {
    pub customer_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    #[validate(length(max = 32), custom(function = "crate::validation::decimal_amount"))]
    pub amount: Option<String>,
    #[validate(custom(function = "crate::validation::currency_code"))]
    pub currency: Option<String>,
    #[validate(length(min = 1, max = 64), custom(function = "crate::validation::not_blank"))]
    pub method: Option<String>,
    pub status: Option<PaymentStatus>,
    #[validate(length(min = 1, max = 255), custom(function = "crate::validation::not_blank"))]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_ext::double_option")]
    pub paid_at: Option<Option<DateTimeUtc>>,
}

impl NewPayment {
    /// A payment created as `paid` without an explicit `paid_at` is stamped now.
    pub fn into_model(self) -> Model {
        let now = Utc::now();
        let status = self.status.unwrap_or_default();
        let paid_at = match (status, self.paid_at) {
            (_, Some(at)) => Some(at),
            (PaymentStatus::Paid, None) => Some(now),
            _ => None,
        };
        Model {
            id: Uuid::new_v4(),
            customer_id: self.customer_id,
            product_id: self.product_id,
            amount: self.amount.trim().to_string(),
            currency: self.currency.to_ascii_uppercase(),
            method: self.method,
            status,
            reference: self.reference,
            paid_at,
            created_at: now,
            updated_at: now,
        }
    }
}

impl PaymentChanges {
    /// Moving into `paid` stamps `paid_at` unless the payload or the record already carries one.
    pub fn apply(self, model: &mut Model) {
        let now = Utc::now();
        if let Some(v) = self.customer_id { model.customer_id = v; }
        if let Some(v) = self.product_id { model.product_id = v; }
        if let Some(v) = self.amount { model.amount = v.trim().to_string(); }
        if let Some(v) = self.currency { model.currency = v.to_ascii_uppercase(); }
        if let Some(v) = self.method { model.method = v; }
        if let Some(v) = self.reference { model.reference = v; }
        if let Some(v) = self.paid_at { model.paid_at = v; }
        if let Some(status) = self.status {
            if status == PaymentStatus::Paid && model.status != PaymentStatus::Paid && model.paid_at.is_none() {
                model.paid_at = Some(now);
            }
            model.status = status;
        }
        model.updated_at = now;
    }
}
