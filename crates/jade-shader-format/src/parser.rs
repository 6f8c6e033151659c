use crate::error::{ParseError, ParseErrorKind};
use crate::stage::ShaderStage;

/// Marker token that opens a stage block.
pub const STAGE_MARKER: &str = "#type";

// ── Output ────────────────────────────────────────────────────────────────

/// The two stage bodies of a dual-stage shader source.
///
/// Bodies are the verbatim text between a marker line and the next marker
/// (or end of input), line terminators included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualStageSource {
    pub vertex: String,
    pub fragment: String,
    /// Stages in the order their blocks appeared.
    pub order: [ShaderStage; 2],
}

impl DualStageSource {
    pub fn body(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

// ── Line scanner ──────────────────────────────────────────────────────────

struct Line<'s> {
    /// Line content without its terminator (`\n` or `\r\n`).
    text: &'s str,
    /// Byte offset of the first character of the line.
    start: usize,
    /// Byte offset just past the terminator.
    end: usize,
    /// 1-based line number.
    number: usize,
}

struct LineScanner<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
}

impl<'s> LineScanner<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 0 }
    }

    fn next_line(&mut self) -> Option<Line<'s>> {
        if self.pos >= self.src.len() {
            return None;
        }

        let start = self.pos;
        let rest = &self.src[start..];
        let (raw, end) = match rest.find('\n') {
            Some(i) => (&rest[..i], start + i + 1),
            None => (rest, self.src.len()),
        };

        self.pos = end;
        self.line += 1;

        Some(Line {
            text: raw.strip_suffix('\r').unwrap_or(raw),
            start,
            end,
            number: self.line,
        })
    }

    fn last_line(&self) -> usize {
        self.line.max(1)
    }
}

/// Returns the stage-name token when `text` is a marker line.
///
/// `#type` must be the first non-blank text and be followed by a space or
/// tab (or nothing, which is reported as a missing name). `#typedef` and
/// similar are ordinary body text.
fn marker_token(text: &str) -> Option<&str> {
    let rest = text.trim_start().strip_prefix(STAGE_MARKER)?;
    if rest.is_empty() || rest.starts_with([' ', '\t']) {
        Some(rest.trim())
    } else {
        None
    }
}

// ── Parser ────────────────────────────────────────────────────────────────

struct Block {
    stage: ShaderStage,
    body_start: usize,
    body_end: usize,
}

/// Splits a dual-stage source into its vertex and fragment bodies.
pub fn parse_str(src: &str) -> Result<DualStageSource, ParseError> {
    let mut scanner = LineScanner::new(src);
    let mut blocks: Vec<Block> = Vec::with_capacity(2);
    let mut open: Option<(ShaderStage, usize)> = None;

    while let Some(line) = scanner.next_line() {
        let Some(token) = marker_token(line.text) else { continue };

        if token.is_empty() {
            return Err(ParseError::new(ParseErrorKind::MissingStageName, line.number));
        }
        let stage: ShaderStage = token
            .parse()
            .map_err(|t| ParseError::new(ParseErrorKind::UnknownStage(t), line.number))?;

        if let Some((prev, body_start)) = open.take() {
            blocks.push(Block { stage: prev, body_start, body_end: line.start });
        }
        if blocks.iter().any(|b| b.stage == stage) {
            return Err(ParseError::new(ParseErrorKind::DuplicateStage(stage), line.number));
        }

        open = Some((stage, line.end));
    }

    if let Some((stage, body_start)) = open {
        blocks.push(Block { stage, body_start, body_end: src.len() });
    }

    let find = |stage: ShaderStage| {
        blocks
            .iter()
            .find(|b| b.stage == stage)
            .map(|b| src[b.body_start..b.body_end].to_string())
            .ok_or_else(|| {
                ParseError::new(ParseErrorKind::MissingStage(stage), scanner.last_line())
            })
    };

    let vertex = find(ShaderStage::Vertex)?;
    let fragment = find(ShaderStage::Fragment)?;

    Ok(DualStageSource {
        vertex,
        fragment,
        order: [blocks[0].stage, blocks[1].stage],
    })
}
