use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Instruction prepended to questions that should be answered in Arabic.
const ARABIC_INSTRUCTION: &str = "أجب على هذا السؤال باللغة العربية فقط: ";

/// Requested answer language. Applied as a prefix on the question sent to the
/// synthesizer; retrieval always sees the raw question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLanguage {
    #[default]
    English,
    Arabic,
}

impl AnswerLanguage {
    pub fn instruction(&self) -> Option<&'static str> {
        match self {
            AnswerLanguage::English => None,
            AnswerLanguage::Arabic => Some(ARABIC_INSTRUCTION),
        }
    }

    pub fn apply(&self, question: &str) -> String {
        match self.instruction() {
            Some(prefix) => format!("{prefix}{question}"),
            None => question.to_string(),
        }
    }
}

impl FromStr for AnswerLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(AnswerLanguage::English),
            "arabic" | "ar" => Ok(AnswerLanguage::Arabic),
            other => Err(format!("unknown language '{other}' (expected english or arabic)")),
        }
    }
}

impl fmt::Display for AnswerLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerLanguage::English => f.write_str("english"),
            AnswerLanguage::Arabic => f.write_str("arabic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_leaves_question_untouched() {
        assert_eq!(AnswerLanguage::English.apply("What is X?"), "What is X?");
    }

    #[test]
    fn arabic_prefixes_instruction() {
        let q = AnswerLanguage::Arabic.apply("What is X?");
        assert!(q.starts_with(ARABIC_INSTRUCTION));
        assert!(q.ends_with("What is X?"));
    }

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("Arabic".parse::<AnswerLanguage>(), Ok(AnswerLanguage::Arabic));
        assert_eq!("en".parse::<AnswerLanguage>(), Ok(AnswerLanguage::English));
        assert!("klingon".parse::<AnswerLanguage>().is_err());
        assert_eq!(AnswerLanguage::default(), AnswerLanguage::English);
    }
}
