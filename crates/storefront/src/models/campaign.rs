//! Campaign model.
//!
//! Campaigns are owned by the brand/influencer management surface; this
//! service only ever reads them to decide purchasability.

use serde::{Deserialize, Serialize};

use clementine_core::{BrandId, CampaignId, CampaignStatus};

/// A brand campaign under which products are sold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub brand_id: BrandId,
    pub name: String,
    pub status: CampaignStatus,
}
