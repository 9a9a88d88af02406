/// Fixed instruction block. The field names are what the renderer reads.
const INSTRUCTIONS: &str = "\
You explain a word the user looked up while reading.
Reply with a single JSON object and nothing else: no prose, no markdown, no code fences.
Use exactly this schema:
{
  \"title\": \"short heading for the explanation\",
  \"word\": \"the word in its dictionary form\",
  \"meaning\": \"general meaning of the word\",
  \"meaning_in_context\": \"what the word means in the given context\",
  \"usage\": \"register, collocations and grammar notes\",
  \"examples\": [
    { \"text\": \"example sentence\", \"explain\": \"what the example shows\" }
  ]
}
Use empty strings or an empty list for anything you cannot fill in.";

/// Compile the full prompt for one lookup.
///
/// `style` is user supplied and only appended when it has content. `word`
/// and `context` are inserted verbatim.
pub fn build_prompt(style: &str, word: &str, context: &str) -> String {
    let mut prompt = String::from(INSTRUCTIONS);

    let style = style.trim();
    if !style.is_empty() {
        prompt.push_str("\n\nAdditional requirements:\n");
        prompt.push_str(style);
    }

    prompt.push_str("\n\nword: ");
    prompt.push_str(word);
    prompt.push_str("\ncontext: ");
    prompt.push_str(context);

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_pins_schema_and_ends_with_fields() {
        let prompt = build_prompt("", "run", "I run every day.");

        assert!(prompt.starts_with(INSTRUCTIONS));
        assert!(prompt.contains("\"meaning_in_context\""));
        assert!(prompt.ends_with("word: run\ncontext: I run every day."));
        assert!(!prompt.contains("Additional requirements"));
    }

    #[test]
    fn style_is_trimmed_and_appended() {
        let prompt = build_prompt("  Answer in German.\n", "run", "");

        assert!(prompt.contains("Additional requirements:\nAnswer in German.\n\nword: run"));
    }

    #[test]
    fn blank_style_is_skipped() {
        let prompt = build_prompt(" \n\t ", "run", "");
        assert!(!prompt.contains("Additional requirements"));
    }

    #[test]
    fn missing_context_leaves_empty_line() {
        let prompt = build_prompt("", "run", "");
        assert!(prompt.ends_with("\ncontext: "));
    }

    #[test]
    fn context_newlines_are_not_escaped() {
        let prompt = build_prompt("", "run", "line one\nline two");
        assert!(prompt.ends_with("context: line one\nline two"));
    }
}
