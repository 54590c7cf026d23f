use rust_decimal::Decimal;
use serde::Serialize;

use super::booking::Milestone;

/// Progress of a booking's payment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Share of milestones completed, by count, to one decimal place.
    pub completion_percent: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
}

impl MilestoneSummary {
    pub fn from_milestones(milestones: &[Milestone]) -> Self {
        let total = milestones.len();
        let completed = milestones.iter().filter(|m| m.is_completed()).count();
        let completion_percent = if total == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(completed as u64) * Decimal::ONE_HUNDRED / Decimal::from(total as u64))
                .round_dp(1)
        };

        let total_amount: Decimal = milestones.iter().map(|m| m.amount).sum();
        let paid_amount: Decimal = milestones
            .iter()
            .filter(|m| m.is_completed())
            .map(|m| m.amount)
            .sum();

        MilestoneSummary {
            total,
            completed,
            pending: total - completed,
            completion_percent,
            total_amount,
            paid_amount,
            remaining_amount: total_amount - paid_amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::MilestoneStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn milestone(id: u32, amount: Decimal, status: MilestoneStatus) -> Milestone {
        Milestone {
            id,
            name: format!("Milestone {}", id),
            description: String::new(),
            amount,
            percentage: dec!(10),
            status,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            paid_date: None,
            invoice_number: None,
            invoice_date: None,
            gst_amount: None,
            total_amount: None,
        }
    }

    #[test]
    fn test_summary_counts_and_amounts() {
        let milestones = vec![
            milestone(1, dec!(8500000), MilestoneStatus::Completed),
            milestone(2, dec!(8500000), MilestoneStatus::Completed),
            milestone(3, dec!(12500000), MilestoneStatus::Pending),
        ];
        let summary = MilestoneSummary::from_milestones(&milestones);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.completion_percent, dec!(66.7));
        assert_eq!(summary.paid_amount, dec!(17000000));
        assert_eq!(summary.remaining_amount, dec!(12500000));
    }

    #[test]
    fn test_upcoming_counts_as_pending() {
        let milestones = vec![
            milestone(1, dec!(100), MilestoneStatus::Pending),
            milestone(2, dec!(100), MilestoneStatus::Upcoming),
        ];
        let summary = MilestoneSummary::from_milestones(&milestones);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.completion_percent, Decimal::ZERO);
    }

    #[test]
    fn test_empty_plan() {
        let summary = MilestoneSummary::from_milestones(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.completion_percent, Decimal::ZERO);
        assert_eq!(summary.remaining_amount, Decimal::ZERO);
    }
}
