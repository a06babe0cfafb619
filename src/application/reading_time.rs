//! Reading-time estimation for raw markdown bodies.
//!
//! The estimate works on the unparsed source. Chinese characters count one
//! unit each, ASCII letters and digits count one unit per five characters,
//! and every image reference (spotted by its file extension) adds a viewing
//! cost that starts at 12 seconds and shrinks by a second per image down to
//! 3 seconds.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Characters read per minute.
pub const CHARS_PER_MINUTE: f64 = 350.0;
/// ASCII alphanumerics that make up one reading unit.
pub const ASCII_CHARS_PER_WORD: usize = 5;
pub const FIRST_IMAGE_SECONDS: u32 = 12;
pub const MIN_IMAGE_SECONDS: u32 = 3;
pub const MINUTES_PLACEHOLDER: &str = "{minutes}";
pub const DEFAULT_FORMAT: &str = "{minutes}分钟";

static IMAGE_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(png|jpg|jpeg|svg|webp|gif)").expect("image extension pattern is valid")
});

/// Estimated reading duration in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ReadingTime {
    pub minutes: u32,
}

/// Raw counts the estimate is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextTally {
    pub cjk_chars: usize,
    pub ascii_word_units: usize,
    pub images: usize,
}

impl TextTally {
    pub fn of(content: &str) -> Self {
        let images = IMAGE_EXTENSION.find_iter(content).count();
        let cjk_chars = content.chars().filter(|ch| is_cjk(*ch)).count();
        let ascii_chars = content
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .count();

        Self {
            cjk_chars,
            ascii_word_units: ascii_chars.div_ceil(ASCII_CHARS_PER_WORD),
            images,
        }
    }

    pub fn reading_units(&self) -> usize {
        self.cjk_chars + self.ascii_word_units
    }

    /// 12, 11, 10, … seconds per image, never below 3.
    pub fn image_seconds(&self) -> u64 {
        let mut cost = FIRST_IMAGE_SECONDS;
        let mut total = 0u64;
        for _ in 0..self.images {
            total += u64::from(cost);
            if cost > MIN_IMAGE_SECONDS {
                cost -= 1;
            }
        }
        total
    }
}

/// Output template for a [`ReadingTime`], e.g. `{minutes}分钟` or `{minutes} min`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingTimeFormat {
    template: String,
}

impl ReadingTimeFormat {
    /// Returns `None` when the template lacks the `{minutes}` placeholder.
    pub fn new(template: impl Into<String>) -> Option<Self> {
        let template = template.into();
        template
            .contains(MINUTES_PLACEHOLDER)
            .then_some(Self { template })
    }

    pub fn render(&self, time: ReadingTime) -> String {
        self.template
            .replace(MINUTES_PLACEHOLDER, &time.minutes.to_string())
    }
}

impl Default for ReadingTimeFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadingTimeEstimator {
    format: ReadingTimeFormat,
}

impl ReadingTimeEstimator {
    pub fn new(format: ReadingTimeFormat) -> Self {
        Self { format }
    }

    /// Estimate how long `content` takes to read, scaled by `complexity`.
    ///
    /// Empty content is zero minutes; anything else is at least one minute.
    pub fn estimate(&self, content: &str, complexity: f64) -> ReadingTime {
        if content.is_empty() {
            return ReadingTime { minutes: 0 };
        }

        let tally = TextTally::of(content);
        let chars_per_second = CHARS_PER_MINUTE / 60.0;

        let mut seconds = tally.reading_units() as f64 / chars_per_second;
        seconds += tally.image_seconds() as f64;
        seconds *= complexity;

        let minutes = (seconds / 60.0).ceil();
        // NaN and negative products land on the floor as well.
        let minutes = if minutes >= 1.0 { minutes as u32 } else { 1 };

        ReadingTime { minutes }
    }

    pub fn format(&self, time: ReadingTime) -> String {
        self.format.render(time)
    }

    /// Formatted estimate, e.g. `3分钟`.
    pub fn reading_time(&self, content: &str, complexity: f64) -> String {
        self.format(self.estimate(content, complexity))
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ReadingTimeFormat::default().render(*self))
    }
}

/// Estimate with the default `{minutes}分钟` format.
pub fn reading_time(content: &str, complexity: f64) -> String {
    ReadingTimeEstimator::default().reading_time(content, complexity)
}

fn is_cjk(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&ch)
}
