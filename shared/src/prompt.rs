//! Prompt templates sent to the completion model.
//!
//! Inputs are embedded verbatim; sanitizing them is left to the model.

/// Treat empty values as absent.
fn or_default<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => fallback,
    }
}

/// Build the general tutoring prompt.
pub fn compose_chat_prompt(
    message: &str,
    subject: Option<&str>,
    grade: Option<&str>,
    context: Option<&str>,
) -> String {
    format!(
        "You are an expert AI tutor. Please help the student with the following:

Subject: {subject}
Grade Level: {grade}
Previous Context: {context}

Student's Question: {message}

Please provide a clear, educational response that:
1. Directly addresses the student's question
2. Explains concepts in an age-appropriate way
3. Encourages critical thinking
4. Provides examples when helpful
5. Asks follow-up questions to ensure understanding

Keep your response concise but thorough.",
        subject = or_default(subject, "General"),
        grade = or_default(grade, "Any"),
        context = or_default(context, "None"),
        message = message,
    )
}

/// Build the subject-specialized prompt used by `/api/tutor/:subject`.
pub fn compose_subject_prompt(
    subject: &str,
    message: &str,
    grade: Option<&str>,
    difficulty: Option<&str>,
) -> String {
    format!(
        "You are an expert {subject} tutor. Please help the student with the following:

Grade Level: {grade}
Difficulty: {difficulty}

Student's Question: {message}

Please provide a specialized {subject} response that:
1. Uses appropriate {subject} terminology
2. Provides step-by-step explanations
3. Includes relevant examples or formulas
4. Encourages problem-solving skills
5. Suggests practice problems if applicable

Make your response engaging and educational.",
        subject = subject,
        grade = or_default(grade, "Any"),
        difficulty = or_default(difficulty, "Standard"),
        message = message,
    )
}
