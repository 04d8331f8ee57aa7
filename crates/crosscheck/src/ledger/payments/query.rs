use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::PaymentView;

/// Inclusive date range supplied in the request body of a filtered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    #[serde(rename = "startDate")]
    pub start: NaiveDate,
    #[serde(rename = "endDate")]
    pub end: NaiveDate,
}

impl DateWindow {
    fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Optional narrowing applied to a landlord's payment listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    /// Case-insensitive substring matched against `ref_num` or the tenant's
    /// full name, union semantics.
    pub keyword: Option<String>,
    pub window: Option<DateWindow>,
}

impl PaymentFilter {
    fn admits(&self, payment: &PaymentView) -> bool {
        if let Some(keyword) = &self.keyword {
            let needle = keyword.to_lowercase();
            let in_ref = payment.ref_num.to_lowercase().contains(&needle);
            let in_name = payment.tenant.full_name.to_lowercase().contains(&needle);
            if !in_ref && !in_name {
                return false;
            }
        }

        if let Some(window) = &self.window {
            if !window.contains(payment.date) {
                return false;
            }
        }

        true
    }
}

/// Applies every active filter in one pass over a single materialized
/// sequence, then sorts descending by date. Keeping both filters in the same
/// pass makes the result independent of which of them are active.
pub fn apply_filter(mut payments: Vec<PaymentView>, filter: &PaymentFilter) -> Vec<PaymentView> {
    payments.retain(|payment| filter.admits(payment));
    payments.sort_by(|a, b| b.date.cmp(&a.date));
    payments
}
