//! Caesar shift cipher over ASCII letters. Case is preserved; every other
//! byte passes through untouched.

pub fn caesar_encrypt(text: &str, shift: i32) -> String {
    text.chars().map(|c| shift_char(c, shift)).collect()
}

pub fn caesar_decrypt(text: &str, shift: i32) -> String {
    caesar_encrypt(text, -shift)
}

fn shift_char(c: char, shift: i32) -> char {
    let base = match c {
        'a'..='z' => b'a',
        'A'..='Z' => b'A',
        _ => return c,
    };
    let offset = (c as u8 - base) as i32;
    let shifted = (offset + shift).rem_euclid(26) as u8;
    (base + shifted) as char
}
