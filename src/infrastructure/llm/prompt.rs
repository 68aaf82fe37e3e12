//! The fixed prompt shared by every provider.

pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f64 = 0.1;

/// Upper bound on how much article text is sent to a provider.
pub const MAX_INPUT_CHARS: usize = 4000;

pub const SYSTEM_PROMPT: &str = "You are a financial sentiment analyst. \
You read market news and judge its likely effect on the securities it mentions. \
Respond with a single JSON object and nothing else.";

pub fn user_prompt(text: &str, context: Option<&str>) -> String {
    let text = truncate_chars(text.trim(), MAX_INPUT_CHARS);
    let context = match context.map(str::trim) {
        Some(c) if !c.is_empty() => format!("\nContext: {c}\n"),
        _ => String::new(),
    };

    format!(
        r#"Analyze the sentiment of the following financial news text.
{context}
Text: {text}

Respond with JSON in exactly this shape:
{{
  "score": <number from -1.0 (very bearish) to 1.0 (very bullish)>,
  "label": "<very_bearish | bearish | neutral | bullish | very_bullish>",
  "confidence": <number from 0.0 to 1.0>,
  "aspects": {{"<aspect, e.g. earnings, guidance, management>": <score from -1.0 to 1.0>}},
  "reasoning": "<one or two sentences>"
}}"#
    )
}

/// Cut to at most `max` characters on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
