// src/models/tagging_stats.rs

/// Annotation progress for one uploaded file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaggingStats {
    pub total_questions: u64,
    pub tagged_questions: u64,
    pub total_words: u64,
    pub tagged_words: u64,
}

impl TaggingStats {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_questions: 0,
            tagged_questions: 0,
            total_words: 0,
            tagged_words: 0,
        }
    }

    /// Folds one question's exported tag string into the totals.
    #[inline]
    pub fn add_question(&mut self, tags: &str) {
        let mut words: u64 = 0;
        let mut tagged: u64 = 0;
        for token in tags.split_whitespace() {
            words = words.saturating_add(1);
            if token != "O" {
                tagged = tagged.saturating_add(1);
            }
        }

        self.total_questions = self.total_questions.saturating_add(1);
        self.total_words = self.total_words.saturating_add(words);
        self.tagged_words = self.tagged_words.saturating_add(tagged);
        if tagged > 0 {
            self.tagged_questions = self.tagged_questions.saturating_add(1);
        }
    }

    #[inline]
    #[must_use]
    #[expect(clippy::as_conversions, reason = "Precision not critical")]
    #[expect(clippy::cast_precision_loss, reason = "Precision not critical")]
    pub fn calculate_percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        (self.tagged_questions as f64 / self.total_questions as f64) * 100.0
    }
}
