//! Verdicts from accepted reveals.

use vetting_types::{ApprovalThreshold, CandidateId, Tally, VettingResult, VettingSession};

use crate::params::BPS_DENOMINATOR;

/// Turns a candidate's tally into a verdict.
///
/// Only accepted reveals count. Jurors that committed and never revealed are
/// neither approvals nor rejections, so the denominator is `total_reveals`,
/// not the jury size.
pub struct TallyEngine;

impl TallyEngine {
    /// Whether `approvals` out of `total` clears `threshold`.
    ///
    /// With zero reveals nobody approved, so the candidate is not approved.
    pub fn is_approved(threshold: ApprovalThreshold, approvals: u64, total: u64) -> bool {
        if total == 0 {
            return false;
        }
        match threshold {
            ApprovalThreshold::StrictMajority => u128::from(approvals) * 2 > u128::from(total),
            ApprovalThreshold::AtLeastBps(bps) => {
                u128::from(approvals) * u128::from(BPS_DENOMINATOR)
                    >= u128::from(bps) * u128::from(total)
            }
        }
    }

    /// `approvals * 100 / total`, rounded down; 0 when nothing was revealed.
    pub fn approval_percentage(approvals: u64, total: u64) -> u64 {
        if total == 0 {
            return 0;
        }
        (u128::from(approvals) * 100 / u128::from(total)) as u64
    }

    pub fn evaluate(
        &self,
        session: &VettingSession,
        candidate: CandidateId,
        tally: Tally,
    ) -> VettingResult {
        let total = tally.total();
        VettingResult {
            session: session.id,
            candidate,
            approvals: tally.approvals,
            rejections: tally.rejections,
            total_reveals: total,
            approval_percentage: Self::approval_percentage(tally.approvals, total),
            approved: Self::is_approved(session.threshold, tally.approvals, total),
        }
    }
}
