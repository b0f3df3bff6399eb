//! Normalisation of uploaded bytes into a single line of text.

/// Remove NUL characters, turn every carriage return and line feed into a
/// space, and trim the result.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than rejected.
pub fn sanitise(input: &[u8]) -> String {
  let text = String::from_utf8_lossy(input);
  let cleaned: String = text
    .chars()
    .filter(|&c| c != '\0')
    .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
    .collect();
  cleaned.trim().to_owned()
}
