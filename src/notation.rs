// Unicode decorations for the denotational notation: superscript capitals
// tag assignment operators with their variable, combining overlines mark
// numeral literals.

/// Maps a variable letter (or the digit 2) to its Unicode superscript form.
/// Letters with no superscript codepoint fall back to `^` + the letter.
pub fn superscript(c: char) -> String {
    match c {
        'A' => "ᴬ",
        'B' => "ᴮ",
        'D' => "ᴰ",
        'E' => "ᴱ",
        'G' => "ᴳ",
        'H' => "ᴴ",
        'I' => "ᴵ",
        'J' => "ᴶ",
        'K' => "ᴷ",
        'L' => "ᴸ",
        'M' => "ᴹ",
        'N' => "ᴺ",
        'O' => "ᴼ",
        'P' => "ᴾ",
        'R' => "ᴿ",
        'T' => "ᵀ",
        'U' => "ᵁ",
        'V' => "ⱽ",
        'W' => "ᵂ",
        '2' => "²",
        _ => return format!("^{}", c),
    }
    .to_string()
}

/// Decorates a numeral with a combining overline after every digit.
pub fn overline(digits: &str) -> String {
    digits.chars().flat_map(|c| [c, '\u{0305}']).collect()
}
