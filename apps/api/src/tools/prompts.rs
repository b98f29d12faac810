// Prompt templates for the tool registry and the follow-up planner.
// Each template is filled with `fill_template` before sending.

/// Outreach email template. Replace: {candidate}, {purpose}
pub const OUTREACH_EMAIL_TEMPLATE: &str = "Write a friendly outreach email to {candidate} \
    for the purpose of {purpose}. Keep it professional, clear, and concise. Use a warm tone.";

/// Hiring checklist template. Replace: {context}
pub const CHECKLIST_TEMPLATE: &str = "Based on this Job description: {context}\n\
    Create a startup hiring checklist. Break it down into stages like sourcing, \
    screening, interviewing, onboarding.";

/// Offer letter template. Replace: {candidate_name}, {salary}
pub const OFFER_LETTER_TEMPLATE: &str = "Create a formal offer letter for {candidate_name} \
    for the offered position. The annual salary is {salary}. Include details like joining date \
    (to be discussed), benefits, company culture, and a welcoming tone. Format it professionally.";

/// Content edit template. Replace: {existing}, {instruction}
pub const EDIT_CONTENT_TEMPLATE: &str = r#"You are a professional assistant. Your job is to edit content according to recruiter needs.

Here is the existing content:
{existing}

Here is the instruction to modify it:
{instruction}

Update the content accordingly. Return only the updated version."#;

/// Planner prompt. Replace: {artifacts}, {tool_catalogue}
pub const PLANNER_SYSTEM_TEMPLATE: &str = r#"You help a recruiter with follow-up requests after a job description was drafted.
When a request needs one of the tools below, choose exactly one tool.

Here are the current artifacts you can reference or edit.

{artifacts}

Available tools:
{tool_catalogue}

RULES:
- When the user wants to *change* one of these artifacts, call `edit_content` with:
    - existing: the exact text of the item being edited
    - instruction: the user's request
    - target: the artifact key being edited (jd, email, checklist, offer_letter)
- When the user wants a new email, checklist, offer letter or web lookup, call the matching tool.
- Omit optional arguments you cannot infer. Never invent a salary or a candidate name.
- When no tool fits (a question, advice, small talk), answer in plain text and do not output JSON.

To call a tool, return ONLY a JSON object with this EXACT schema (no extra fields, no prose):
{
  "tool": "tool_name",
  "args": {"argument_name": "value"}
}"#;
