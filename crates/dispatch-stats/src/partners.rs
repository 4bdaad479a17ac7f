//! Delivery fleet availability

use dispatch_model::{DeliveryPartner, PartnerStatus};
use serde::Serialize;

/// Partner counts by availability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartnerStats {
    /// All partners
    pub total: usize,
    /// Available for assignment
    pub online: usize,
    /// Carrying an order
    pub busy: usize,
    /// Off shift
    pub offline: usize,
}

/// Count partners per status; unrecognised statuses count toward `total` only
#[must_use]
pub fn summarize_partners(partners: &[DeliveryPartner]) -> PartnerStats {
    partners.iter().fold(
        PartnerStats {
            total: partners.len(),
            ..PartnerStats::default()
        },
        |mut stats, partner| {
            match partner.status {
                PartnerStatus::Online => stats.online += 1,
                PartnerStatus::Busy => stats.busy += 1,
                PartnerStatus::Offline => stats.offline += 1,
                PartnerStatus::Other(_) => {}
            }
            stats
        },
    )
}
