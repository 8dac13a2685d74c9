/// The canonical clinical extraction categories, in display order.
/// The parser never enforces these: category text from the model is kept
/// verbatim, and display layers decide whether to reconcile against this
/// list. Order matters to consumers, so append-only edits here.
pub const CLINICAL_CATEGORIES: &[&str] = &[
    "Chief Complaint/Reason for Visit",
    "History of Present Illness (HPI)",
    "Past Medical History",
    "Past Surgical History",
    "Family History",
    "Social History",
    "Current Medications",
    "Allergies",
    "Review of Systems",
    "Vital Signs",
    "Physical Examination Findings",
    "Diagnostic Test Results",
    "Assessment/Clinical Impression",
    "Diagnosis/Differential Diagnosis",
    "Treatment Plan",
    "Medications Prescribed",
    "Follow-up Instructions",
    "Referrals",
];

/// Categories a well-formed consultation extraction should contain.
/// Absence produces validation warnings, never errors.
pub const EXPECTED_CATEGORIES: &[&str] = &["Chief Complaint", "History of Present Illness"];

/// The ordered category catalog, for callers that surface it (the CLI
/// prints it behind a flag).
pub fn clinical_categories() -> &'static [&'static str] {
    CLINICAL_CATEGORIES
}
