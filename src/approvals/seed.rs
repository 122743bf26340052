//! Built-in demo approval items, used when no approvals file is configured.

use rust_decimal_macros::dec;

use crate::dialogue::subject::SubjectRecord;

/// Pending items shown on the demo CEO dashboard.
pub fn demo_subjects() -> Vec<SubjectRecord> {
    vec![
        SubjectRecord::new(
            "APR-2041",
            "Provision four additional GPU nodes so the research agents can finish the Q3 model evaluations on schedule.",
        )
        .with_title("GPU capacity increase")
        .with_requester("Nova (Infrastructure Agent)")
        .with_category("finops")
        .with_amount(dec!(18400.00)),
        SubjectRecord::new(
            "APR-2042",
            "Grant the client-support agent read access to the billing ledger to resolve invoice disputes without escalation.",
        )
        .with_title("Billing ledger access")
        .with_requester("Atlas (Compliance Agent)")
        .with_category("compliance"),
        SubjectRecord::new(
            "APR-2043",
            "Onboard a new outbound sales agent with a starting monthly budget for prospecting tools.",
        )
        .with_title("Sales agent onboarding")
        .with_requester("Mira (Operations Agent)")
        .with_category("agents")
        .with_amount(dec!(2750.00)),
    ]
}
