use chrono::NaiveDateTime;

/// Word difficulty buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceType {
    Translation,
    Daily,
    Business,
    Academic,
    Slang,
    Quote,
}

impl SentenceType {
    pub const ALL: [SentenceType; 6] = [
        SentenceType::Translation,
        SentenceType::Daily,
        SentenceType::Business,
        SentenceType::Academic,
        SentenceType::Slang,
        SentenceType::Quote,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "translation" => Some(SentenceType::Translation),
            "daily" => Some(SentenceType::Daily),
            "business" => Some(SentenceType::Business),
            "academic" => Some(SentenceType::Academic),
            "slang" => Some(SentenceType::Slang),
            "quote" => Some(SentenceType::Quote),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceType::Translation => "translation",
            SentenceType::Daily => "daily",
            SentenceType::Business => "business",
            SentenceType::Academic => "academic",
            SentenceType::Slang => "slang",
            SentenceType::Quote => "quote",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentenceType::Translation => "Translation practice",
            SentenceType::Daily => "Daily expression",
            SentenceType::Business => "Business English",
            SentenceType::Academic => "Academic English",
            SentenceType::Slang => "Slang",
            SentenceType::Quote => "Quote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl GrammarLevel {
    pub const ALL: [GrammarLevel; 3] = [
        GrammarLevel::Beginner,
        GrammarLevel::Intermediate,
        GrammarLevel::Advanced,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "beginner" => Some(GrammarLevel::Beginner),
            "intermediate" => Some(GrammarLevel::Intermediate),
            "advanced" => Some(GrammarLevel::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GrammarLevel::Beginner => "beginner",
            GrammarLevel::Intermediate => "intermediate",
            GrammarLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Word,
    Sentence,
    Grammar,
}

impl LogType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "word" => Some(LogType::Word),
            "sentence" => Some(LogType::Sentence),
            "grammar" => Some(LogType::Grammar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Word => "word",
            LogType::Sentence => "sentence",
            LogType::Grammar => "grammar",
        }
    }
}

/// Shared review contract for the three mutable entity types. A review bumps
/// the counter by exactly one and stamps the timestamp with the call time.
pub trait Reviewable {
    fn increment_review(&mut self, now: NaiveDateTime);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::parse(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::parse("EASY"), None);
        assert_eq!(Difficulty::parse(""), None);
    }

    #[test]
    fn sentence_type_round_trip() {
        for t in SentenceType::ALL {
            assert_eq!(SentenceType::parse(t.as_str()), Some(t));
            assert!(!t.label().is_empty());
        }
        assert_eq!(SentenceType::parse("poem"), None);
    }

    #[test]
    fn grammar_level_round_trip() {
        for l in GrammarLevel::ALL {
            assert_eq!(GrammarLevel::parse(l.as_str()), Some(l));
        }
        assert_eq!(GrammarLevel::parse("expert"), None);
    }

    #[test]
    fn log_type_round_trip() {
        assert_eq!(LogType::parse("word"), Some(LogType::Word));
        assert_eq!(LogType::parse("sentence"), Some(LogType::Sentence));
        assert_eq!(LogType::parse("grammar"), Some(LogType::Grammar));
        assert_eq!(LogType::parse("goal"), None);
    }
}
