use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Programming languages whose source trees can be indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Java,
    Cpp,
    #[serde(rename = "cs")]
    CSharp,
    Python,
    Haskell,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Self::C,
        Self::Java,
        Self::Cpp,
        Self::CSharp,
        Self::Python,
        Self::Haskell,
    ];

    /// File extensions (without the dot) indexed for this language, in traversal order.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::C => &["c", "h"],
            Self::Java => &["java", "jak", "aj"],
            Self::Cpp => &["cpp", "h"],
            Self::CSharp => &["cs"],
            Self::Python => &["py"],
            Self::Haskell => &["hs"],
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::CSharp => "cs",
            Self::Python => "python",
            Self::Haskell => "haskell",
        }
    }

    /// File name of the stop-word list for this language.
    pub fn stopwords_file(self) -> String {
        format!("stopwords_{}.dat", self.tag())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.tag() == s)
            .ok_or_else(|| ConfigError::UnsupportedLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_tag() {
        for lang in Language::ALL {
            assert_eq!(lang.tag().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn c_family_covers_headers() {
        assert_eq!(Language::C.extensions(), &["c", "h"]);
        assert!(Language::Cpp.extensions().contains(&"h"));
    }

    #[test]
    fn unknown_tag_fails_fast() {
        let err = "cobol".parse::<Language>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedLanguage(ref s) if s == "cobol"));
    }

    #[test]
    fn serde_uses_tags() {
        let lang: Language = serde_json::from_str("\"cs\"").unwrap();
        assert_eq!(lang, Language::CSharp);
        assert_eq!(Language::CSharp.stopwords_file(), "stopwords_cs.dat");
    }
}
