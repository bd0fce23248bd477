//! Candidate generation from pause groups and segment windows.
//!
//! Two sources feed the pool, in this order:
//! 1. Pause-delimited segment groups, sliced when longer than the maximum
//! 2. Sliding windows of one to `max_window_segments` consecutive segments
//!
//! The pool is then filtered by duration and speech overlap, deduplicated,
//! and capped.

use std::collections::HashSet;

use reclip_models::{Candidate, SpeechWindow, TimeSpan, Transcript, TranscriptSegment, Word};
use tracing::debug;

use crate::config::{CandidateConfig, DurationRange};

/// True when the text ends in `.`, `!` or `?`, optionally followed by a
/// closing double or curly quote.
pub fn ends_sentence(text: &str) -> bool {
    let mut chars = text.trim_end().chars().rev();
    let last = match chars.next() {
        Some('"' | '\u{201D}' | '\u{2019}') => chars.next(),
        other => other,
    };
    matches!(last, Some('.' | '!' | '?'))
}

/// Pause-delimited run of segments.
struct Group<'a> {
    segments: Vec<&'a TranscriptSegment>,
}

impl Group<'_> {
    fn start(&self) -> f64 {
        self.segments.first().map_or(0.0, |s| s.start)
    }

    fn end(&self) -> f64 {
        self.segments.last().map_or(0.0, |s| s.end)
    }

    fn text(&self) -> String {
        join_text(&self.segments)
    }

    fn words(&self) -> Vec<Word> {
        self.segments.iter().flat_map(|s| s.timed_words()).collect()
    }
}

fn join_text(segments: &[&TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the candidate pool.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    config: CandidateConfig,
}

impl CandidateGenerator {
    pub fn new(config: CandidateConfig) -> Self {
        Self { config }
    }

    /// Generate, filter and cap candidates.
    pub fn generate(&self, transcript: &Transcript, speech: &[SpeechWindow]) -> Vec<Candidate> {
        let segments: Vec<&TranscriptSegment> = transcript
            .segments
            .iter()
            .filter(|s| !s.text.trim().is_empty() && s.end > s.start)
            .collect();
        let hull = self.config.duration_hull();

        let mut raw = self.from_groups(&segments, hull);
        let grouped = raw.len();
        raw.extend(self.from_windows(&segments));
        let windowed = raw.len() - grouped;

        let mut seen: HashSet<(u64, u64)> = HashSet::new();
        let pool: Vec<Candidate> = raw
            .into_iter()
            .filter(|c| c.duration() > 0.0 && self.config.fits_any(c.duration()))
            .filter(|c| SpeechWindow::any_overlap(speech, c))
            .filter(|c| seen.insert((c.start.to_bits(), c.end.to_bits())))
            .take(self.config.pool_size)
            .collect();

        debug!(
            segments = segments.len(),
            grouped,
            windowed,
            pool = pool.len(),
            "Candidate pool built"
        );
        pool
    }

    /// Split segments into groups wherever the gap reaches the pause threshold.
    fn group<'a>(&self, segments: &[&'a TranscriptSegment]) -> Vec<Group<'a>> {
        let mut groups: Vec<Group<'a>> = Vec::new();
        for &segment in segments {
            let starts_new = groups
                .last()
                .map_or(true, |g| segment.start - g.end() >= self.config.pause_threshold_secs);
            if starts_new {
                groups.push(Group {
                    segments: vec![segment],
                });
            } else if let Some(group) = groups.last_mut() {
                group.segments.push(segment);
            }
        }
        groups
    }

    fn from_groups(&self, segments: &[&TranscriptSegment], range: DurationRange) -> Vec<Candidate> {
        let mut out = Vec::new();
        for group in self.group(segments) {
            let duration = group.end() - group.start();
            if duration < range.min_secs {
                continue;
            }
            if duration <= range.max_secs {
                out.push(Candidate::new(group.start(), group.end(), group.text()));
            } else {
                out.extend(slice_words(&group.words(), range.max_secs));
            }
        }
        out
    }

    fn from_windows(&self, segments: &[&TranscriptSegment]) -> Vec<Candidate> {
        let mut out = Vec::new();
        for i in 0..segments.len() {
            let last = (i + self.config.max_window_segments).min(segments.len());
            for j in i + 1..=last {
                let window = &segments[i..j];
                let text = join_text(window);
                if self.config.avoid_mid_sentence_cut && !ends_sentence(&text) {
                    continue;
                }
                out.push(Candidate::new(window[0].start, window[j - i - 1].end, text));
            }
        }
        out
    }
}

/// Consecutive word runs no longer than `max_secs`. The last may be shorter.
fn slice_words(words: &[Word], max_secs: f64) -> Vec<Candidate> {
    let mut slices = Vec::new();
    let mut current: Vec<&Word> = Vec::new();

    for word in words {
        if let Some(first) = current.first() {
            if word.end - first.start > max_secs {
                slices.push(words_to_candidate(&current));
                current.clear();
            }
        }
        current.push(word);
    }
    if !current.is_empty() {
        slices.push(words_to_candidate(&current));
    }
    slices
}

fn words_to_candidate(words: &[&Word]) -> Candidate {
    let start = words.first().map_or(0.0, |w| w.start);
    let end = words.last().map_or(0.0, |w| w.end);
    let text = words
        .iter()
        .map(|w| w.text.trim())
        .collect::<Vec<_>>()
        .join(" ");
    Candidate::new(start, end, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclip_models::PlatformMap;

    fn segment(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            start,
            end,
            text: text.to_string(),
            words: Vec::new(),
        }
    }

    fn config(min: f64, max: f64) -> CandidateConfig {
        CandidateConfig {
            durations: PlatformMap::uniform(DurationRange::new(min, max)),
            ..CandidateConfig::default()
        }
    }

    fn all_speech() -> Vec<SpeechWindow> {
        vec![SpeechWindow::new(0.0, 1000.0)]
    }

    #[test]
    fn test_ends_sentence() {
        assert!(ends_sentence("Done."));
        assert!(ends_sentence("Really?  "));
        assert!(ends_sentence("He said \"go.\""));
        assert!(ends_sentence("She asked \u{201C}why?\u{201D}"));
        assert!(!ends_sentence("He said \"go\""));
        assert!(!ends_sentence("the students'"));
        assert!(!ends_sentence("goin'"));
        assert!(!ends_sentence("and then,"));
        assert!(!ends_sentence(""));
    }

    #[test]
    fn test_durations_within_platform_ranges() {
        let transcript = Transcript::new(vec![
            segment(0.0, 4.0, "First idea."),
            segment(4.1, 9.0, "Second idea"),
            segment(9.1, 14.0, "keeps going."),
            segment(20.0, 21.0, "Short."),
        ]);
        let generator = CandidateGenerator::new(config(5.0, 12.0));
        let pool = generator.generate(&transcript, &all_speech());

        assert!(!pool.is_empty());
        for c in &pool {
            assert!(c.duration() >= 5.0 && c.duration() <= 12.0, "{c:?}");
        }
    }

    #[test]
    fn test_disjoint_ranges_leave_no_gap_candidates() {
        let transcript = Transcript::new(vec![
            segment(0.0, 30.0, "One long thought."),
            segment(100.0, 115.0, "A shorter one."),
        ]);
        let generator = CandidateGenerator::new(CandidateConfig {
            durations: PlatformMap::new(
                DurationRange::new(10.0, 20.0),
                DurationRange::new(10.0, 20.0),
                DurationRange::new(40.0, 60.0),
            ),
            ..CandidateConfig::default()
        });
        let pool = generator.generate(&transcript, &all_speech());

        assert_eq!(pool.len(), 1);
        assert_eq!((pool[0].start, pool[0].end), (100.0, 115.0));
        for c in &pool {
            assert!(generator.config.fits_any(c.duration()), "{c:?}");
        }
    }

    #[test]
    fn test_mid_sentence_windows_dropped() {
        let transcript = Transcript::new(vec![
            segment(0.0, 5.0, "We started with"),
            segment(5.0, 10.0, "a tiny team."),
        ]);
        let generator = CandidateGenerator::new(config(4.0, 20.0));
        let pool = generator.generate(&transcript, &all_speech());
        // The first segment alone is cut mid-sentence
        assert!(pool.iter().all(|c| ends_sentence(&c.text)));
        assert!(pool.iter().any(|c| c.start == 0.0 && c.end == 10.0));
    }

    #[test]
    fn test_long_group_is_sliced() {
        let words: Vec<Word> = (0..10)
            .map(|i| Word {
                start: i as f64 * 3.0,
                end: i as f64 * 3.0 + 2.5,
                text: format!("w{i}"),
            })
            .collect();
        let transcript = Transcript::new(vec![TranscriptSegment {
            start: 0.0,
            end: 29.5,
            text: "w0 w1 w2 w3 w4 w5 w6 w7 w8 w9".to_string(),
            words,
        }]);
        let generator = CandidateGenerator::new(config(5.0, 12.0));
        let pool = generator.generate(&transcript, &all_speech());

        assert_eq!(pool.len(), 3);
        assert_eq!((pool[0].start, pool[0].end), (0.0, 11.5));
        assert_eq!(pool[0].tokens, vec!["w0", "w1", "w2", "w3"]);
        assert_eq!((pool[1].start, pool[1].end), (12.0, 23.5));
        assert_eq!((pool[2].start, pool[2].end), (24.0, 29.5));
    }

    #[test]
    fn test_silence_only_candidates_discarded() {
        let transcript = Transcript::new(vec![segment(0.0, 10.0, "All quiet here.")]);
        let generator = CandidateGenerator::new(config(5.0, 12.0));
        assert!(generator
            .generate(&transcript, &[SpeechWindow::new(10.0, 20.0)])
            .is_empty());
        assert!(generator.generate(&transcript, &[]).is_empty());
        assert_eq!(generator.generate(&transcript, &all_speech()).len(), 1);
    }

    #[test]
    fn test_pool_is_capped_in_order() {
        let segments: Vec<TranscriptSegment> = (0..20)
            .map(|i| segment(i as f64 * 10.0, i as f64 * 10.0 + 8.0, "Point made."))
            .collect();
        let generator = CandidateGenerator::new(CandidateConfig {
            pool_size: 5,
            ..config(5.0, 9.0)
        });
        let pool = generator.generate(&Transcript::new(segments), &all_speech());
        assert_eq!(pool.len(), 5);
        let starts: Vec<f64> = pool.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0.0, 10.0, 20.0, 30.0, 40.0]);
    }
}
