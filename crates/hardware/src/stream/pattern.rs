//! Frame/line structured pattern source.
//!
//! Stands in for a video front end in the source clock domain: always valid,
//! producing a deterministic word per accepted transfer from frame, line, and
//! pixel counters, and pulsing a frame-boundary output each time the frame
//! wraps. The frame pulse is what the system assembly converts into the
//! synchronized queue-reset/engine-start sequence.

use crate::stream::StreamSource;

/// Deterministic frame-structured word generator.
#[derive(Debug)]
pub struct PatternSource {
    line_words: u32,
    frame_lines: u32,
    word: u32,
    line: u32,
    frame: u32,
    frame_pulse: bool,
}

impl PatternSource {
    /// A source at the top of frame 0 with the given geometry.
    pub const fn new(line_words: u32, frame_lines: u32) -> Self {
        Self {
            line_words,
            frame_lines,
            word: 0,
            line: 0,
            frame: 0,
            frame_pulse: false,
        }
    }

    /// True for exactly one `pop` after the final word of a frame.
    pub const fn frame_pulse(&self) -> bool {
        self.frame_pulse
    }

    /// Frames completed so far.
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Rewinds the position counters to the top of the current frame.
    pub fn clear(&mut self) {
        self.word = 0;
        self.line = 0;
    }
}

impl StreamSource for PatternSource {
    fn valid(&self) -> bool {
        true
    }

    fn peek(&self) -> u32 {
        // Frame in the top byte keeps consecutive frames distinguishable;
        // line/word give every position in a frame a unique value.
        (self.frame << 24) ^ (self.line << 12) ^ self.word
    }

    fn pop(&mut self) {
        self.frame_pulse = false;
        self.word += 1;
        if self.word >= self.line_words {
            self.word = 0;
            self.line += 1;
            if self.line >= self.frame_lines {
                self.line = 0;
                self.frame = self.frame.wrapping_add(1);
                self.frame_pulse = true;
            }
        }
    }
}
