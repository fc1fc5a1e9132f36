//! OpenAPI document served under `/docs`.
//!
//! The entities live in `models` without schema derives; the request and
//! response shapes are mirrored here as documentation-only structs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBodyDoc {
    pub error: String,
    /// Machine-readable kind such as `email-in-use` or `customer-not-found`.
    pub kind: String,
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

#[derive(ToSchema)]
pub struct CustomerDoc {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct NewCustomerDoc {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub active: Option<bool>,
}

#[derive(ToSchema)]
pub struct CustomerChangesDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub active: Option<bool>,
}

#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub name: String,
    pub description: String,
    /// Decimal as text.
    pub min_monthly_rent: String,
    pub max_monthly_rent: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct NewProductDoc {
    pub customer_id: Uuid,
    pub name: String,
    pub description: String,
    pub min_monthly_rent: String,
    pub max_monthly_rent: String,
    pub active: Option<bool>,
}

#[derive(ToSchema)]
pub struct ProductChangesDoc {
    pub customer_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub min_monthly_rent: Option<String>,
    pub max_monthly_rent: Option<String>,
    pub active: Option<bool>,
}

#[derive(ToSchema)]
pub struct SessionDoc {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub user_agent: String,
    /// `active`, `ended` or `revoked`.
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct NewSessionDoc {
    pub customer_id: Uuid,
    pub user_agent: String,
    pub status: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(ToSchema)]
pub struct SessionChangesDoc {
    pub customer_id: Option<Uuid>,
    pub user_agent: Option<String>,
    pub status: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    /// `null` clears the end time.
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(ToSchema)]
pub struct PaymentDoc {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub amount: String,
    pub currency: String,
    pub method: String,
    /// `pending`, `paid`, `failed` or `refunded`.
    pub status: String,
    pub reference: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct NewPaymentDoc {
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub amount: String,
    pub currency: String,
    pub method: String,
    pub status: Option<String>,
    pub reference: String,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(ToSchema)]
pub struct PaymentChangesDoc {
    pub customer_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
    pub reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct VerificationDoc {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub session_id: Uuid,
    pub payment_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    /// `pending`, `approved`, `rejected` or `expired`.
    pub status: String,
    pub attempts: i32,
    pub expires_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct NewVerificationDoc {
    pub customer_id: Uuid,
    pub session_id: Uuid,
    pub payment_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub attempts: Option<i32>,
    pub expires_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct VerificationChangesDoc {
    pub customer_id: Option<Uuid>,
    pub session_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub attempts: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::customers::list,
        crate::routes::customers::get,
        crate::routes::customers::create,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::sessions::list,
        crate::routes::sessions::get,
        crate::routes::sessions::create,
        crate::routes::sessions::update,
        crate::routes::sessions::delete,
        crate::routes::payments::list,
        crate::routes::payments::get,
        crate::routes::payments::create,
        crate::routes::payments::update,
        crate::routes::payments::delete,
        crate::routes::verifications::list,
        crate::routes::verifications::get,
        crate::routes::verifications::create,
        crate::routes::verifications::update,
        crate::routes::verifications::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBodyDoc,
            CustomerDoc,
            NewCustomerDoc,
            CustomerChangesDoc,
            ProductDoc,
            NewProductDoc,
            ProductChangesDoc,
            SessionDoc,
            NewSessionDoc,
            SessionChangesDoc,
            PaymentDoc,
            NewPaymentDoc,
            PaymentChangesDoc,
            VerificationDoc,
            NewVerificationDoc,
            VerificationChangesDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "customers"),
        (name = "products"),
        (name = "sessions"),
        (name = "payments"),
        (name = "verifications")
    )
)]
pub struct ApiDoc;
