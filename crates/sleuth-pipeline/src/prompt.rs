//! Prompt construction for the analysis stage

/// Builds the prompt sent to the oracle for one normalized source
pub struct PromptBuilder<'a> {
    code: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for `code`
    pub fn new(code: &'a str) -> Self {
        Self { code }
    }

    /// Build the complete analysis prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(ANALYSIS_INSTRUCTIONS.len() + self.code.len() + 32);

        prompt.push_str(ANALYSIS_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("JS Code:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.code);
        if !self.code.ends_with('\n') {
            prompt.push('\n');
        }
        prompt.push_str("---\n");

        prompt
    }
}

const ANALYSIS_INSTRUCTIONS: &str = r#"Analyze this JavaScript code and explain in detail:
- Any secrets, hardcoded API keys, tokens or credentials?
- Any suspicious logic (obfuscation, unexpected network calls, data exfiltration)?
- Any security risks from dynamic execution, such as eval, new Function,
  setTimeout or setInterval called with a string, or document.write?

For each finding, quote the relevant code and say why it matters."#;
