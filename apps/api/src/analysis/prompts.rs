// All LLM prompt templates for the Analysis module.
// Each template asks for JSON, but callers must tolerate prose around it.

/// CV analysis prompt template. Replace `{cv_text}` before sending.
pub const CV_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following CV/resume and extract key information:

{cv_text}

Please extract and organize the following information:
1. Name
2. Contact information
3. Skills (technical and soft skills)
4. Work experience (company names, positions, dates, and key responsibilities)
5. Education (degrees, institutions, dates)
6. Certifications
7. Projects (if any)

Format the output as a structured JSON object with the keys "name", "contact_information",
"skills", "work_experience", "education", "certifications" and "projects"."#;

/// Job description analysis prompt template. Replace `{job_description}` before sending.
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract key information:

{job_description}

Please extract and organize the following information:
1. Job title
2. Company name (if available)
3. Required skills
4. Required experience
5. Required education
6. Responsibilities
7. Nice-to-have qualifications

Format the output as a structured JSON object with the keys "job_title", "company_name",
"required_skills", "required_experience", "required_education", "responsibilities" and
"nice_to_have_qualifications"."#;

/// Suggestion synthesis prompt template.
/// Replace: {cv_analysis}, {job_analysis} (pretty-printed JSON)
pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = r#"I need you to act as a career coach and provide suggestions to improve a CV/resume to better match a specific job description.

Here is the analysis of the CV:
{cv_analysis}

Here is the analysis of the job description:
{job_analysis}

Please provide detailed suggestions on how to improve the CV to better match this job description. Include:

1. Skills gap analysis: What skills mentioned in the job description are missing from the CV?
2. Experience alignment: How can the work experience be better presented to match the job requirements?
3. Specific wording suggestions: What keywords from the job description should be incorporated?
4. Sections to add or emphasize: What parts of the CV need more attention?
5. General formatting or structure improvements

Format your response as a structured JSON object with exactly these keys:
{
  "skills_gap_analysis": ...,
  "experience_alignment": ...,
  "specific_wording_suggestions": ...,
  "sections_to_add_or_emphasize": ...,
  "general_formatting_improvements": ...
}"#;

/// Substitutes `{name}` placeholders in one left-to-right pass over `template`.
/// Inserted values are never rescanned, so a value containing another
/// placeholder's text is embedded verbatim.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    loop {
        let next = values
            .iter()
            .filter_map(|&(name, value)| rest.find(name).map(|at| (at, name, value)))
            .min_by_key(|&(at, _, _)| at);

        let Some((at, name, value)) = next else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + name.len()..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_every_occurrence() {
        let filled = fill_template("{a} and {b} and {a}", &[("{a}", "1"), ("{b}", "2")]);
        assert_eq!(filled, "1 and 2 and 1");
    }

    #[test]
    fn test_fill_template_does_not_rescan_inserted_values() {
        let filled = fill_template("A={a} B={b}", &[("{a}", "see {b}"), ("{b}", "secret")]);
        assert_eq!(filled, "A=see {b} B=secret");
    }

    #[test]
    fn test_fill_template_leaves_json_braces_alone() {
        let filled = fill_template(
            SUGGESTIONS_PROMPT_TEMPLATE,
            &[("{cv_analysis}", "{}"), ("{job_analysis}", "{}")],
        );
        assert!(filled.contains("\"skills_gap_analysis\": ..."));
        assert!(!filled.contains("{cv_analysis}"));
    }
}
