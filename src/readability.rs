use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Paragraphs shorter than this are skipped in per-paragraph scoring;
/// readability formulas are meaningless on fragments.
const MIN_PARAGRAPH_WORDS: usize = 5;

const PREVIEW_LEN: usize = 100;

#[derive(Error, Debug, PartialEq)]
pub enum ReadabilityError {
    #[error("No readable content found")]
    EmptyContent,
}

/// Whole-document readability metrics.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMetrics {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub gunning_fog: f64,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
    pub text_standard: String,
    pub word_count: usize,
    pub sentence_count: usize,
    pub syllable_count: usize,
    pub avg_sentence_length: f64,
    pub avg_syllables_per_word: f64,
    pub readability_level: String,
    pub grade_level: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ParagraphScore {
    Scored {
        paragraph_number: usize,
        text_preview: String,
        flesch_score: f64,
        grade_level: f64,
        color: String,
        word_count: usize,
        sentence_count: usize,
        readability_level: String,
    },
    Failed {
        paragraph_number: usize,
        text_preview: String,
        error: String,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ColorCounts {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualizationData {
    pub color_distribution: ColorCounts,
    pub score_range: ScoreRange,
    pub total_paragraphs: usize,
}

/// Compute whole-document metrics. Empty (or symbol-only) content is an
/// explicit error, never a panic.
pub fn document_metrics(content: &str) -> Result<DocumentMetrics, ReadabilityError> {
    let clean = clean_content(content);
    if clean.trim().is_empty() {
        return Err(ReadabilityError::EmptyContent);
    }

    let stats = TextStats::from(&clean);
    let flesch = stats.flesch_reading_ease();
    let fk_grade = stats.flesch_kincaid_grade();

    Ok(DocumentMetrics {
        flesch_reading_ease: flesch,
        flesch_kincaid_grade: fk_grade,
        gunning_fog: stats.gunning_fog(),
        automated_readability_index: stats.automated_readability_index(),
        coleman_liau_index: stats.coleman_liau_index(),
        text_standard: stats.text_standard(),
        word_count: stats.words,
        sentence_count: stats.sentences,
        syllable_count: stats.syllables,
        avg_sentence_length: stats.avg_sentence_length(),
        avg_syllables_per_word: stats.avg_syllables_per_word(),
        readability_level: interpret_reading_ease(flesch).to_string(),
        grade_level: interpret_grade_level(fk_grade).to_string(),
    })
}

/// Score each paragraph (blank-line delimited) independently. Paragraphs
/// under the word minimum are skipped; a paragraph whose own metric
/// computation fails is recorded as failed and the rest continue.
pub fn analyze_paragraphs(content: &str) -> Vec<ParagraphScore> {
    let paragraphs: Vec<&str> = content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut scores = Vec::new();

    for (i, paragraph) in paragraphs.iter().enumerate() {
        let word_count = paragraph.split_whitespace().count();
        if word_count < MIN_PARAGRAPH_WORDS {
            continue;
        }

        let preview = text_preview(paragraph);

        match document_metrics(paragraph) {
            Ok(metrics) => {
                let flesch = metrics.flesch_reading_ease;
                scores.push(ParagraphScore::Scored {
                    paragraph_number: i + 1,
                    text_preview: preview,
                    flesch_score: flesch,
                    grade_level: metrics.flesch_kincaid_grade,
                    color: readability_color(flesch).to_string(),
                    word_count,
                    sentence_count: metrics.sentence_count,
                    readability_level: interpret_reading_ease(flesch).to_string(),
                });
            }
            Err(e) => scores.push(ParagraphScore::Failed {
                paragraph_number: i + 1,
                text_preview: preview,
                error: e.to_string(),
            }),
        }
    }

    scores
}

/// Aggregate counts and score spread for the paragraph traffic-light view.
pub fn visualization_data(paragraph_scores: &[ParagraphScore]) -> VisualizationData {
    let mut colors = ColorCounts::default();
    let mut scores = Vec::new();

    for para in paragraph_scores {
        if let ParagraphScore::Scored { color, flesch_score, .. } = para {
            match color.as_str() {
                "green" => colors.green += 1,
                "yellow" => colors.yellow += 1,
                _ => colors.red += 1,
            }
            scores.push(*flesch_score);
        }
    }

    let range = if scores.is_empty() {
        ScoreRange {
            min: 0.0,
            max: 0.0,
            avg: 0.0,
        }
    } else {
        ScoreRange {
            min: scores.iter().cloned().fold(f64::INFINITY, f64::min),
            max: scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            avg: scores.iter().sum::<f64>() / scores.len() as f64,
        }
    };

    VisualizationData {
        color_distribution: colors,
        score_range: range,
        total_paragraphs: paragraph_scores.len(),
    }
}

/// Flesch reading-ease bands, boundary inclusive on the easier bucket.
pub fn interpret_reading_ease(score: f64) -> &'static str {
    if score >= 90.0 {
        "Very Easy"
    } else if score >= 80.0 {
        "Easy"
    } else if score >= 70.0 {
        "Fairly Easy"
    } else if score >= 60.0 {
        "Standard"
    } else if score >= 50.0 {
        "Fairly Difficult"
    } else if score >= 30.0 {
        "Difficult"
    } else {
        "Very Difficult"
    }
}

pub fn interpret_grade_level(grade: f64) -> &'static str {
    if grade <= 6.0 {
        "Elementary School"
    } else if grade <= 8.0 {
        "Middle School"
    } else if grade <= 12.0 {
        "High School"
    } else if grade <= 16.0 {
        "College"
    } else {
        "Graduate Level"
    }
}

/// Traffic-light color for a paragraph's reading-ease score.
pub fn readability_color(flesch_score: f64) -> &'static str {
    if flesch_score >= 70.0 {
        "green"
    } else if flesch_score >= 50.0 {
        "yellow"
    } else {
        "red"
    }
}

fn text_preview(paragraph: &str) -> String {
    if paragraph.chars().count() > PREVIEW_LEN {
        let truncated: String = paragraph.chars().take(PREVIEW_LEN).collect();
        format!("{truncated}...")
    } else {
        paragraph.to_string()
    }
}

/// Strip markdown/code punctuation so formulas see prose, keeping word
/// characters, whitespace, and sentence terminators.
fn clean_content(content: &str) -> String {
    static CLEAN_RE: OnceLock<Regex> = OnceLock::new();
    let re = CLEAN_RE.get_or_init(|| Regex::new(r"[^\w\s.!?]").expect("clean regex"));
    re.replace_all(content, "").to_string()
}

struct TextStats {
    words: usize,
    sentences: usize,
    syllables: usize,
    complex_words: usize,
    letters: usize,
}

impl TextStats {
    fn from(clean: &str) -> Self {
        let word_list: Vec<&str> = clean.split_whitespace().collect();
        let words = word_list.len();

        let mut syllables = 0;
        let mut complex_words = 0;
        let mut letters = 0;
        for word in &word_list {
            let s = count_syllables(word);
            syllables += s;
            if s >= 3 {
                complex_words += 1;
            }
            letters += word.chars().filter(|c| c.is_alphanumeric()).count();
        }

        Self {
            words,
            sentences: count_sentences(clean),
            syllables,
            complex_words,
            letters,
        }
    }

    fn avg_sentence_length(&self) -> f64 {
        self.words as f64 / self.sentences.max(1) as f64
    }

    fn avg_syllables_per_word(&self) -> f64 {
        self.syllables as f64 / self.words.max(1) as f64
    }

    fn flesch_reading_ease(&self) -> f64 {
        round2(206.835 - 1.015 * self.avg_sentence_length() - 84.6 * self.avg_syllables_per_word())
    }

    fn flesch_kincaid_grade(&self) -> f64 {
        round2(0.39 * self.avg_sentence_length() + 11.8 * self.avg_syllables_per_word() - 15.59)
    }

    fn gunning_fog(&self) -> f64 {
        let complex_ratio = self.complex_words as f64 / self.words.max(1) as f64;
        round2(0.4 * (self.avg_sentence_length() + 100.0 * complex_ratio))
    }

    fn automated_readability_index(&self) -> f64 {
        let chars_per_word = self.letters as f64 / self.words.max(1) as f64;
        round2(4.71 * chars_per_word + 0.5 * self.avg_sentence_length() - 21.43)
    }

    fn coleman_liau_index(&self) -> f64 {
        let words = self.words.max(1) as f64;
        let l = self.letters as f64 / words * 100.0;
        let s = self.sentences as f64 / words * 100.0;
        round2(0.0588 * l - 0.296 * s - 15.8)
    }

    /// Consensus grade band across the grade-oriented formulas, e.g.
    /// "8th and 9th grade".
    fn text_standard(&self) -> String {
        let grades = [
            self.flesch_kincaid_grade(),
            self.gunning_fog(),
            self.automated_readability_index(),
            self.coleman_liau_index(),
        ];

        let mut rounded: Vec<i64> = grades
            .iter()
            .map(|g| g.round().max(0.0) as i64)
            .collect();
        rounded.sort_unstable();

        // Mode, ties broken toward the lower grade.
        let mut best = rounded[0];
        let mut best_count = 0;
        for &g in &rounded {
            let count = rounded.iter().filter(|&&x| x == g).count();
            if count > best_count {
                best = g;
                best_count = count;
            }
        }

        format!("{} and {} grade", ordinal(best), ordinal(best + 1))
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn count_sentences(text: &str) -> usize {
    let count = text
        .split(['.', '!', '?'])
        .filter(|segment| segment.chars().any(char::is_alphanumeric))
        .count();
    count.max(1)
}

/// Vowel-group heuristic: count runs of vowels, drop a trailing silent 'e',
/// floor at one syllable per word.
fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    if count > 1 && letters.ends_with(&['e']) && !letters.ends_with(&['l', 'e']) {
        count -= 1;
    }

    count.max(1)
}
