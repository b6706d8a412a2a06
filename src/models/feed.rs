use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// The fixed set of feed categories stocked by the godown
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    ToSchema,
)]
pub enum FeedCategory {
    ShrimpFeed,
    FishFeedGrowfin,
    FishFeedNutriva,
}

impl FeedCategory {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShrimpFeed => "Shrimp Feed",
            Self::FishFeedGrowfin => "Fish Feed (Growfin)",
            Self::FishFeedNutriva => "Fish Feed (Nutriva)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub id: Uuid,
    pub name: String,
    pub category: FeedCategory,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for adding a feed to the catalog
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFeed {
    #[validate(custom = "validate_name")]
    pub name: String,
    pub category: FeedCategory,
    #[validate(custom = "validate_price")]
    pub price: Decimal,
    /// Opening warehouse quantity; zero or absent leaves the ledger untouched
    #[serde(default)]
    pub initial_quantity: Option<u32>,
}

/// Partial update; only present fields are written
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_name")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FeedCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_price")]
    pub price: Option<Decimal>,
}

impl FeedPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.price.is_none()
    }
}

/// Stored shape of a feed document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeedDraft<'a> {
    pub name: &'a str,
    pub category: FeedCategory,
    pub price: Decimal,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name");
        err.message = Some("Feed name must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("price");
        err.message = Some("Price must not be negative".into());
        return Err(err);
    }
    Ok(())
}
