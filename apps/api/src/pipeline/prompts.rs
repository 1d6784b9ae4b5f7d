// Prompt templates for the extraction and composition stages.
// Shared fragments come from llm_client::prompts.

/// Job extraction prompt. Replace `{flat_fields}` and `{page_data}` before sending.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"### TEXT DESCRIBING A JOB
{page_data}

### INSTRUCTION:
Extract the job posting from the text above and return a JSON object with:
- `role`: the job title
- `skills`: the required skills, as a list of strings
- `experience`: the experience requirement, as one string
- `job_details`: any other relevant details, as one string

The response MUST be valid JSON with no extra text.
Return exactly ONE job posting, even if the text contains several.
If the text does not describe a job, return an empty string for `role`.

{flat_fields}

### OUTPUT FORMAT:
{
    "role": "Software Engineer",
    "skills": ["Python", "Django", "REST APIs"],
    "experience": "2+ years",
    "job_details": "Full-time position in a tech company."
}"#;

/// Shared output structure for every email persona.
const EMAIL_FORMAT: &str = r#"### OUTPUT FORMAT:
Provide the email in a professional format with:
- A subject line, starting with "Subject:"
- A proper salutation
- A well-structured body (opening, main content, closing)
- A polite sign-off"#;

/// Applicant email prompt. Replace `{job_description}` and `{email_format}` before sending.
pub const INDIVIDUAL_EMAIL_TEMPLATE: &str = r#"### JOB DESCRIPTION:
{job_description}

### INSTRUCTION:
You are ABC, a highly skilled professional with expertise relevant to the given job description.
You are applying for this role and need to craft a compelling, personalized cold email that highlights:
- Your key skills and experience that align with the job.
- Your enthusiasm for the position and the company.
- How you can add value to the organization.
- A polite and professional request for further discussion or an interview.

Make the email concise, engaging, and persuasive while maintaining a formal yet approachable tone.

{email_format}

### EMAIL (NO PREAMBLE):"#;

/// B2B outreach prompt. Replace `{job_description}` and `{email_format}` before sending.
pub const EXECUTIVE_EMAIL_TEMPLATE: &str = r#"### JOB DESCRIPTION:
{job_description}

### INSTRUCTION:
You are ABC, a business development executive at XYZ, a software and AI consulting company.
XYZ helps organizations scale by supplying dedicated engineering teams and tailored solutions,
with lower cost, faster delivery and less hiring overhead than building the capability in-house.
The hiring company above is looking for this role. Write a cold email to its hiring manager that:
- Shows you understand the problem this role is meant to solve.
- Positions XYZ as a partner that can deliver the same skills and outcomes.
- Maps the listed skills and experience to capabilities XYZ already provides.
- Ends with a clear, low-friction request for a short introductory call.

Make the email concise and persuasive, with a confident, consultative, formal tone. Do not
pretend to be a job applicant.

{email_format}

### EMAIL (NO PREAMBLE):"#;

/// Fills in the applicant or executive template.
pub fn render_email_prompt(template: &str, job_description: &str) -> String {
    template
        .replace("{email_format}", EMAIL_FORMAT)
        .replace("{job_description}", job_description)
}
