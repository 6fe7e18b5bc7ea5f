use crate::geometry::Point;
use log::warn;
use serde::{Deserialize, Serialize};

/// Distance between stacked attribute lines, in mils.
pub const ATTRIBUTE_PITCH: i64 = 200;

/// Attribute keys drawn visibly; everything else is emitted hidden.
const VISIBLE_KEYS: &[&str] = &["refdes", "value", "device"];

/// An unplaced `key=value` pair in the order the caller wants it shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Split on the first `=`. Text without one is kept as a free-text line.
    pub fn parse(text: &str) -> Self {
        match text.split_once('=') {
            Some((key, value)) => Self::new(key.trim(), value.trim()),
            None => {
                warn!("attribute {text:?} has no '='; keeping it as plain text");
                Self::new("", text.trim())
            }
        }
    }
}

/// A placed attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeText {
    pub key: String,
    pub value: String,
    /// Offset index along the run, assigned by the cursor.
    pub line: usize,
    pub position: Point,
    pub visible: bool,
}

impl AttributeText {
    /// The text as written out: `key=value`, or the bare value for free text.
    pub fn text(&self) -> String {
        if self.key.is_empty() {
            self.value.clone()
        } else {
            format!("{}={}", self.key, self.value)
        }
    }

    pub fn translate(&mut self, delta: Point) {
        self.position = self.position + delta;
    }
}

/// Direction successive lines advance in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Run {
    /// Downwards from the anchor.
    #[default]
    Vertical,
    /// Rightwards from the anchor.
    Horizontal,
}

/// Where the next attribute line goes.
///
/// The cursor is a plain value: `place` consumes it and hands back the
/// advanced one, and a fresh `TextCursor::new()` starts at line 0, so nothing
/// carries over between conversion units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCursor {
    line: usize,
    run: Run,
    pitch: i64,
}

impl Default for TextCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCursor {
    pub fn new() -> Self {
        Self {
            line: 0,
            run: Run::Vertical,
            pitch: ATTRIBUTE_PITCH,
        }
    }

    pub fn with_run(mut self, run: Run) -> Self {
        self.run = run;
        self
    }

    pub fn with_pitch(mut self, pitch: i64) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn position_of(&self, anchor: Point, line: usize) -> Point {
        let step = line as i64 * self.pitch;
        match self.run {
            Run::Vertical => anchor.offset(0, -step),
            Run::Horizontal => anchor.offset(step, 0),
        }
    }

    /// Lay `attrs` out in order starting at the cursor's current line.
    pub fn place(self, anchor: Point, attrs: &[Attribute]) -> (Vec<AttributeText>, TextCursor) {
        let mut cursor = self;
        let placed = attrs
            .iter()
            .map(|attr| {
                let line = cursor.line;
                cursor.line += 1;
                AttributeText {
                    key: attr.key.clone(),
                    value: attr.value.clone(),
                    line,
                    position: cursor.position_of(anchor, line),
                    visible: attr.key.is_empty() || VISIBLE_KEYS.contains(&attr.key.as_str()),
                }
            })
            .collect();
        (placed, cursor)
    }
}
