//! String similarity primitives used by the blocking strategies.

use std::collections::HashSet;

/// Edit distance with unit cost for insertion, deletion and substitution.
///
/// Operates on `char`s, so multi-byte letters count as one edit.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let (long, short): (Vec<char>, Vec<char>) = {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a.len() < b.len() { (b, a) } else { (a, b) }
    };

    if short.is_empty() {
        return long.len();
    }

    // Single row sized to the shorter input.
    let mut previous: Vec<usize> = (0..=short.len()).collect();
    let mut current: Vec<usize> = Vec::with_capacity(short.len() + 1);

    for (i, lc) in long.iter().enumerate() {
        current.clear();
        current.push(i + 1);
        for (j, sc) in short.iter().enumerate() {
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            let substitution = previous[j] + usize::from(lc != sc);
            current.push(insertion.min(deletion).min(substitution));
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[short.len()]
}

/// Dice coefficient over the sets of distinct characters of each input.
///
/// Works on unigram character sets, not bigrams: `"test name"` and
/// `"name test"` produce the same set and score 1.0.
pub fn dice_coefficient(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let a_chars: HashSet<char> = a.chars().collect();
    let b_chars: HashSet<char> = b.chars().collect();
    let overlap = a_chars.intersection(&b_chars).count();

    (overlap as f64 * 2.0) / (a_chars.len() + b_chars.len()) as f64
}

/// Digit class of a consonant, `None` for vowels and unmapped letters.
fn soundex_digit(c: char) -> Option<char> {
    match c {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        _ => None,
    }
}

fn is_soundex_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 'h' | 'w')
}

/// Four-character phonetic code: one lowercase anchor letter + three digits.
///
/// Inputs without any letter encode as `"0000"`; a single-character input
/// encodes as that character followed by `"000"`.
pub fn soundex(input: &str) -> String {
    let lower = input.to_lowercase();

    let mut chars = lower.chars();
    if let (Some(only), None) = (chars.next(), chars.next()) {
        return format!("{only}000");
    }

    let mut letters = lower.chars().filter(|c| c.is_alphabetic());
    let Some(anchor) = letters.next() else {
        return "0000".to_string();
    };

    let consonants: Vec<char> = letters.filter(|c| !is_soundex_vowel(*c)).collect();
    if consonants.is_empty() {
        return format!("{anchor}000");
    }

    let mut digits: Vec<char> = Vec::with_capacity(consonants.len());
    for digit in consonants.into_iter().filter_map(soundex_digit) {
        if digits.last() != Some(&digit) {
            digits.push(digit);
        }
    }

    // The anchor already stands for its own sound.
    if digits.first().is_some() && digits.first().copied() == soundex_digit(anchor) {
        digits.remove(0);
    }

    let mut code = String::with_capacity(4);
    code.push(anchor);
    code.extend(digits.into_iter().take(3));
    while code.chars().count() < 4 {
        code.push('0');
    }
    code
}
