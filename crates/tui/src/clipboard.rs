use std::io;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use crossterm::{execute, style::Print};

/// Ask the terminal to place `text` on the system clipboard (OSC 52).
pub fn copy(text: &str) -> Result<(), String> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text))).map_err(|err| err.to_string())
}

fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_wraps_base64_payload() {
        assert_eq!(osc52_sequence("{}"), "\x1b]52;c;e30=\x1b\\");
    }

    #[test]
    fn multibyte_text_is_encoded_as_utf8() {
        let sequence = osc52_sequence("1990年");
        let payload = sequence
            .trim_start_matches("\x1b]52;c;")
            .trim_end_matches("\x1b\\");
        let decoded = STANDARD.decode(payload).expect("valid base64");
        assert_eq!(String::from_utf8(decoded).expect("utf8"), "1990年");
    }
}
