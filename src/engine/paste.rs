use icu_normalizer::ComposingNormalizerBorrowed;

/// Cleans pasted text before it becomes a target: NFC composition, no tabs or
/// carriage returns, single spaces, at most one blank line between
/// paragraphs, no surrounding whitespace.
pub fn normalize_pasted(text: &str) -> String {
    let composed = ComposingNormalizerBorrowed::new_nfc().normalize(text);

    let mut out = String::with_capacity(composed.len());
    let mut newlines = 0usize;
    for ch in composed.chars() {
        match ch {
            '\t' | '\r' => {}
            ' ' if out.ends_with(' ') => {}
            '\n' => {
                newlines += 1;
                if newlines <= 2 {
                    out.push('\n');
                }
            }
            _ => {
                newlines = 0;
                out.push(ch);
            }
        }
        if ch == ' ' {
            newlines = 0;
        }
    }
    out.trim().to_string()
}
