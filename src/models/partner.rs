use serde::Deserialize;

use super::de;
use super::user::User;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Partner {
    #[serde(flatten)]
    pub user: User,
    #[serde(default, deserialize_with = "de::flexible_f64")]
    pub total_commissions_received: Option<f64>,
    #[serde(default, deserialize_with = "de::flexible_f64")]
    pub account_balance: Option<f64>,
    #[serde(default, deserialize_with = "de::flexible_u64")]
    pub total_transactions: Option<u64>,
}

/// Aggregates shown above the partner table. Computed over the current page only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartnerStats {
    pub total_commissions: f64,
    pub active: usize,
    pub active_percent: u64,
    pub total_transactions: u64,
}

impl PartnerStats {
    pub fn compute(partners: &[Partner], total_count: u64) -> Self {
        let total_commissions = partners
            .iter()
            .map(|p| p.total_commissions_received.unwrap_or(0.0))
            .sum();
        let active = partners.iter().filter(|p| p.user.is_active).count();
        let active_percent = if total_count > 0 {
            ((active as f64 / total_count as f64) * 100.0).round() as u64
        } else {
            0
        };
        let total_transactions = partners.iter().map(|p| p.total_transactions.unwrap_or(0)).sum();

        Self {
            total_commissions,
            active,
            active_percent,
            total_transactions,
        }
    }
}

/// Amounts are XOF, shown without decimals and with thin grouping.
pub fn format_xof(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped} XOF")
    } else {
        format!("{grouped} XOF")
    }
}
