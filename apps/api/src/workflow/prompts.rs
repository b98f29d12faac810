// Prompts and fixed messages for the workflow nodes.

/// Question extraction prompt. Replace: {persona}, {request}
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"{persona}
Extract job roles mentioned in this hiring request: '{request}'.
Then, for each role, generate important follow-up questions to help create a job description.
To ensure accuracy, begin with questions about these compulsory topics, adapted to the role:
- Essential skills required for this role.
- Qualifications candidates need to have.
- Years of experience required.
- What is the role level? (e.g., junior, mid-level, senior)
- What is the location of the job? (remote, hybrid (address), on-site (address))
- What is the budget or compensation range for this position?
After the compulsory questions, add dynamic optional questions relevant to the specific role,
such as specific responsibilities, required certifications, or company culture/values.
LIMIT the questions to a maximum of 10.
Output ONLY the questions in a bullet list format, one per line, and nothing else."#;

/// Job description prompt. Replace: {role}, {clarifications}
pub const JD_PROMPT_TEMPLATE: &str = r#"Generate a detailed job description for the role of {role} based on the following clarifications:

{clarifications}

Include required skills, responsibilities, job location, and qualifications in markdown format.
You can fill in other information based on the clarifications, the role and general assumptions.
Do not ask in the description to fill details and do not leave placeholders.
Avoid creating sections of which the user did not provide details."#;

pub const QUESTIONS_HEADER: &str = "To create the best job descriptions, please answer:";

pub const CLARIFY_ACK: &str = "Thanks for the details. Generating job description draft now...";

pub const JD_FALLBACK: &str = "Something went wrong generating the job description.";

pub const FINAL_PLAN_HEADER: &str = "Final Recruiting Plan:";
