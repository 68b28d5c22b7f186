//! Spreadsheet column letters (`A`, `B`, ..., `Z`, `AA`, ...).
//!
//! Sheets exported without a heading row are addressed by column letter, so
//! their layouts declare aliases such as `A` or `AC`.

/// Letter name of a 0-based column index.
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// 0-based column index of a letter name, case-insensitive.
///
/// Returns `None` for empty input or anything other than ASCII letters.
pub fn column_index(letters: &str) -> Option<usize> {
    let letters = letters.trim();
    if letters.is_empty() {
        return None;
    }
    let mut n: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        n = n.checked_mul(26)?.checked_add(digit)?;
    }
    Some(n - 1)
}

/// Letter headers for a sheet of `count` columns.
pub fn column_letters(count: usize) -> Vec<String> {
    (0..count).map(column_letter).collect()
}
