// The extraction prompt and its envelope. The marker lines and the
// "N. Category:" / "   - detail" shapes are load-bearing: the output
// parser is a plain scanner that depends on them exactly.

/// System-role instruction sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a medical AI scribe assistant.";

/// First marker line of the extraction envelope.
pub const EXTRACTION_START_MARKER: &str = "=== CLINICAL DATA EXTRACTION ===";

/// Last marker line of the extraction envelope.
pub const EXTRACTION_END_MARKER: &str = "=== END OF EXTRACTION ===";

/// The single placeholder substituted into the template.
pub const TRANSCRIPT_PLACEHOLDER: &str = "{{TRANSCRIPT}}";

pub const CLINICAL_EXTRACTION_PROMPT: &str = r#"You are reviewing the transcript of a conversation between a doctor and a patient. Extract every piece of clinical information that is explicitly stated and organize it under the categories below.

CATEGORIES:
1. Chief Complaint/Reason for Visit
2. History of Present Illness (HPI)
3. Past Medical History
4. Past Surgical History
5. Family History
6. Social History
7. Current Medications
8. Allergies
9. Review of Systems
10. Vital Signs
11. Physical Examination Findings
12. Diagnostic Test Results
13. Assessment/Clinical Impression
14. Diagnosis/Differential Diagnosis
15. Treatment Plan
16. Medications Prescribed
17. Follow-up Instructions
18. Referrals

RULES:
- Extract ONLY information explicitly stated in the transcript.
- NEVER infer, assume, or add facts that are not directly spoken.
- Preserve exact values (doses, durations, measurements) as spoken.
- Omit any category with no extractable content. Do not emit empty headings or placeholders.

OUTPUT FORMAT - follow this exactly:
- Begin with the line === CLINICAL DATA EXTRACTION ===
- For each category that has content, write the category as "N. Category Name:" on its own line, followed by one "   - detail" line per extracted fact.
- End with the line === END OF EXTRACTION ===
- Output nothing before the first marker or after the last.

TRANSCRIPT:
{{TRANSCRIPT}}
"#;

/// Build the full extraction prompt for one sanitized transcript.
/// Pure string substitution of the single placeholder.
pub fn build_extraction_prompt(sanitized_transcript: &str) -> String {
    CLINICAL_EXTRACTION_PROMPT.replace(TRANSCRIPT_PLACEHOLDER, sanitized_transcript)
}
