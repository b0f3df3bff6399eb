//! Translation languages supported by the analyser.

use std::{fmt, str::FromStr};

use crate::Error;

/// The language Collatinus translates lemmata into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
  Catalan,
  German,
  #[default]
  English,
  Spanish,
  Basque,
  French,
  Galician,
  Italian,
  Dutch,
  Portuguese,
}

impl Language {
  /// Two-letter code, as accepted in configuration.
  pub fn code(self) -> &'static str {
    match self {
      Self::Catalan => "ca",
      Self::German => "de",
      Self::English => "en",
      Self::Spanish => "es",
      Self::Basque => "eu",
      Self::French => "fr",
      Self::Galician => "gl",
      Self::Italian => "it",
      Self::Dutch => "nl",
      Self::Portuguese => "pt",
    }
  }

  /// Command-line flag that switches the analyser to this language.
  pub fn flag(self) -> String { format!("-t{}", self.code()) }
}

impl FromStr for Language {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "ca" => Ok(Self::Catalan),
      "de" => Ok(Self::German),
      "en" => Ok(Self::English),
      "es" => Ok(Self::Spanish),
      "eu" => Ok(Self::Basque),
      "fr" => Ok(Self::French),
      "gl" => Ok(Self::Galician),
      "it" => Ok(Self::Italian),
      "nl" => Ok(Self::Dutch),
      "pt" => Ok(Self::Portuguese),
      _ => Err(Error::UnsupportedLanguage(s.to_owned())),
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_codes_case_insensitively() {
    assert_eq!("EN".parse::<Language>().unwrap(), Language::English);
    assert_eq!(" nl ".parse::<Language>().unwrap(), Language::Dutch);
  }

  #[test]
  fn flag_prefixes_code() {
    assert_eq!(Language::English.flag(), "-ten");
    assert_eq!(Language::Basque.flag(), "-teu");
  }

  #[test]
  fn rejects_unknown_codes() {
    assert!(matches!(
      "la".parse::<Language>(),
      Err(Error::UnsupportedLanguage(code)) if code == "la"
    ));
  }
}
