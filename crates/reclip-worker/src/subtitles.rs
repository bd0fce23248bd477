//! Word-level caption files for exported clips.
//!
//! Words overlapping a clip are shifted to clip time, wrapped greedily into
//! lines of at most `max_chars_per_line` characters and grouped into cues of
//! at most `max_lines` lines. Cues render to SRT, WebVTT and ASS.

use std::collections::HashSet;

use reclip_engine::scoring::normalize_token;
use reclip_models::Word;

use crate::config::{SubtitleConfig, SubtitleTemplate};

/// ASS line break.
const ASS_BREAK: &str = "\\N";

/// One caption cue in clip-relative time.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionCue {
    pub start: f64,
    pub end: f64,
    pub lines: Vec<String>,
}

/// Build cues for the words overlapping `[clip_start, clip_end]`.
pub fn build_cues(
    words: &[Word],
    clip_start: f64,
    clip_end: f64,
    config: &SubtitleConfig,
) -> Vec<CaptionCue> {
    let duration = (clip_end - clip_start).max(0.0);
    let mut cues = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut cue_start: Option<f64> = None;
    let mut cue_end = 0.0;

    for word in words {
        if word.end <= clip_start || word.start >= clip_end {
            continue;
        }
        let token = word.text.trim();
        if token.is_empty() {
            continue;
        }
        let start = (word.start - clip_start).clamp(0.0, duration);
        let end = (word.end - clip_start).clamp(0.0, duration);

        let fits = line.is_empty()
            || line.chars().count() + 1 + token.chars().count() <= config.max_chars_per_line;
        if !fits {
            lines.push(std::mem::take(&mut line));
            if lines.len() >= config.max_lines {
                cues.push(CaptionCue {
                    start: cue_start.unwrap_or(start),
                    end: cue_end,
                    lines: std::mem::take(&mut lines),
                });
                cue_start = None;
            }
        }

        if cue_start.is_none() {
            cue_start = Some(start);
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(token);
        cue_end = end;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    if let Some(start) = cue_start {
        if !lines.is_empty() {
            cues.push(CaptionCue {
                start,
                end: cue_end,
                lines,
            });
        }
    }
    cues
}

/// `HH:MM:SS,mmm` or `HH:MM:SS.mmm`.
fn clock(seconds: f64, separator: char) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let secs = (total_ms / 1000) % 60;
    let ms = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02}{separator}{ms:03}")
}

/// `H:MM:SS.cc` as used by ASS.
fn ass_clock(seconds: f64) -> String {
    let total_cs = (seconds.max(0.0) * 100.0).round() as u64;
    let hours = total_cs / 360_000;
    let minutes = (total_cs / 6000) % 60;
    let secs = (total_cs / 100) % 60;
    let cs = total_cs % 100;
    format!("{hours}:{minutes:02}:{secs:02}.{cs:02}")
}

pub fn to_srt(cues: &[CaptionCue]) -> String {
    let mut out = String::new();
    for (index, cue) in cues.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            clock(cue.start, ','),
            clock(cue.end, ','),
            cue.lines.join("\n")
        ));
    }
    out
}

pub fn to_vtt(cues: &[CaptionCue]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for cue in cues {
        out.push_str(&format!(
            "{} --> {}\n{}\n\n",
            clock(cue.start, '.'),
            clock(cue.end, '.'),
            cue.lines.join("\n")
        ));
    }
    out
}

/// Wrap keyword tokens in an ASS colour override.
fn highlight(line: &str, terms: &HashSet<String>, color: &str) -> String {
    line.split(' ')
        .map(|word| {
            if terms.contains(&normalize_token(word)) {
                format!("{{\\c{color}}}{word}{{\\c}}")
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render an ASS script for a 1080x1920 canvas.
pub fn to_ass(
    cues: &[CaptionCue],
    template: &SubtitleTemplate,
    keywords: &[String],
    config: &SubtitleConfig,
) -> String {
    let terms: HashSet<String> = keywords
        .iter()
        .map(|k| normalize_token(k))
        .filter(|k| !k.is_empty())
        .collect();
    let margin = (config.safe_margin_ratio * 100.0).round() as i64;
    let border_style = if template.boxed { 3 } else { 1 };
    let bold = if template.bold { -1 } else { 0 };
    let back_color = if template.boxed {
        &template.box_color
    } else {
        &template.outline_color
    };

    let mut out = String::new();
    out.push_str("[Script Info]\nScriptType: v4.00+\nPlayResX: 1080\nPlayResY: 1920\n\n");
    out.push_str("[V4+ Styles]\n");
    out.push_str(
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, \
         BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, \
         BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n",
    );
    out.push_str(&format!(
        "Style: Default,{},{},{},{},{},{},{},0,0,0,100,100,0,0,{},{},{},2,{},{},{},1\n\n",
        template.font,
        template.font_size,
        template.primary_color,
        template.primary_color,
        template.outline_color,
        back_color,
        bold,
        border_style,
        template.outline,
        template.shadow,
        margin,
        margin,
        margin.max(1) * 3,
    ));
    out.push_str("[Events]\n");
    out.push_str(
        "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n",
    );

    for cue in cues {
        let lines: Vec<String> = cue
            .lines
            .iter()
            .map(|line| {
                if config.highlight && !terms.is_empty() {
                    highlight(line, &terms, &template.highlight_color)
                } else {
                    line.clone()
                }
            })
            .collect();
        out.push_str(&format!(
            "Dialogue: 0,{},{},Default,,0,0,0,,{}\n",
            ass_clock(cue.start),
            ass_clock(cue.end),
            lines.join(ASS_BREAK)
        ));
    }
    out
}
