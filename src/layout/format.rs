//! Row formats
//!
//! Minimal `%[-][width]x` placeholder expansion for menu rows and bars.
//! Each screen supplies the meaning of its letters; `%%` is a literal `%`.
//! A placeholder the screen does not know is copied through unchanged.

use crate::layout::text_measure::{string_width, truncate_to_width};

pub fn expand_format(fmt: &str, lookup: impl Fn(char) -> Option<String>) -> String {
    let mut out = String::with_capacity(fmt.len());
    let mut chars = fmt.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut directive = String::from("%");
        let left = chars.next_if_eq(&'-').is_some();
        if left {
            directive.push('-');
        }
        let mut width = 0usize;
        while let Some(d) = chars.next_if(char::is_ascii_digit) {
            directive.push(d);
            width = width * 10 + d.to_digit(10).map_or(0, |v| v as usize);
        }
        let Some(letter) = chars.next() else {
            out.push_str(&directive);
            break;
        };

        match lookup(letter) {
            Some(value) => pad(&mut out, &value, width, left),
            None => {
                out.push_str(&directive);
                out.push(letter);
            }
        }
    }
    out
}

fn pad(out: &mut String, value: &str, width: usize, left: bool) {
    let value = if width > 0 {
        truncate_to_width(value, width)
    } else {
        value
    };
    let fill = width.saturating_sub(string_width(value));
    if left {
        out.push_str(value);
        out.extend(std::iter::repeat_n(' ', fill));
    } else {
        out.extend(std::iter::repeat_n(' ', fill));
        out.push_str(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(c: char) -> Option<String> {
        match c {
            'n' => Some("7".to_string()),
            'd' => Some("description".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_plain_and_percent() {
        assert_eq!(expand_format("100%% done", lookup), "100% done");
    }

    #[test]
    fn test_width_alignment() {
        assert_eq!(expand_format("[%3n]", lookup), "[  7]");
        assert_eq!(expand_format("[%-3n]", lookup), "[7  ]");
        assert_eq!(expand_format("%-4d|", lookup), "desc|");
    }

    #[test]
    fn test_unknown_letter_kept() {
        assert_eq!(expand_format("%-5z %n", lookup), "%-5z 7");
        assert_eq!(expand_format("trailing %", lookup), "trailing %");
    }
}
