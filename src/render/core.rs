use std::collections::HashMap;
use std::io::Write;

use blake3::Hash;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};

use crate::error::Result;
use crate::geometry::Rect;
use crate::width::{display_width, truncate_to_width};

/// What a leaf asks the rendering collaborator to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementContent {
    Text(String),
    Button { label: String, code: u32 },
    TextInput { text: String, code: u32 },
}

/// One draw instruction emitted by the draw pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    pub identity: &'a str,
    pub rect: Rect,
    pub content: ElementContent,
}

/// Source of text typed into inputs since the last draw.
pub trait InputSource {
    fn stored_text(&self, identity: &str) -> Option<String>;
}

/// Rendering collaborator. Draw calls are fire-and-forget.
pub trait Renderer: InputSource {
    fn draw(&mut self, element: &Element<'_>);
}

/// Owned copy of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnElement {
    pub identity: String,
    pub rect: Rect,
    pub content: ElementContent,
}

/// Renderer that records every draw call; hosts with their own toolkit replay it.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    elements: Vec<DrawnElement>,
    stored: HashMap<String, String>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[DrawnElement] {
        &self.elements
    }

    pub fn get(&self, identity: &str) -> Option<&DrawnElement> {
        self.elements.iter().find(|element| element.identity == identity)
    }

    /// Forget recorded elements, keeping stored input text.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn set_stored_text(&mut self, identity: impl Into<String>, text: impl Into<String>) {
        self.stored.insert(identity.into(), text.into());
    }
}

impl InputSource for DrawList {
    fn stored_text(&self, identity: &str) -> Option<String> {
        self.stored.get(identity).cloned()
    }
}

impl Renderer for DrawList {
    fn draw(&mut self, element: &Element<'_>) {
        self.elements.push(DrawnElement {
            identity: element.identity.to_string(),
            rect: element.rect,
            content: element.content.clone(),
        });
    }
}

/// Terminal renderer parameters.
#[derive(Debug, Clone, Default)]
pub struct RendererSettings {
    /// Where to park the cursor after a flush.
    pub restore_cursor: Option<(u16, u16)>,
}

/// Renders elements as text into a terminal, one character cell per layout unit.
///
/// Elements are queued by [`Renderer::draw`] and written by [`AnsiRenderer::flush`].
/// Each flush is one frame: elements whose rectangle and content are unchanged
/// since the last flush are skipped, and elements that were painted before but
/// not drawn this frame are erased.
pub struct AnsiRenderer {
    settings: RendererSettings,
    pending: Vec<DrawnElement>,
    painted: HashMap<String, Painted>,
    stored: HashMap<String, String>,
    clear_requested: bool,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            settings,
            pending: Vec::new(),
            painted: HashMap::new(),
            stored: HashMap::new(),
            clear_requested: true,
        }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn set_stored_text(&mut self, identity: impl Into<String>, text: impl Into<String>) {
        self.stored.insert(identity.into(), text.into());
    }

    /// Clear the screen and repaint everything on the next flush (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.painted.clear();
        self.clear_requested = true;
    }

    /// Write queued elements; returns how many were actually painted.
    pub fn flush(&mut self, writer: &mut impl Write) -> Result<usize> {
        if self.clear_requested {
            queue!(writer, Clear(ClearType::All))?;
            self.clear_requested = false;
        }

        let frame = std::mem::take(&mut self.pending);
        let drawn: HashMap<&str, Rect> = frame
            .iter()
            .map(|element| (element.identity.as_str(), element.rect))
            .collect();

        // Blank what left the frame or moved before painting over the area.
        let mut stale: Vec<String> = self
            .painted
            .iter()
            .filter(|(identity, previous)| {
                drawn.get(identity.as_str()) != Some(&previous.rect)
            })
            .map(|(identity, _)| identity.clone())
            .collect();
        stale.sort();
        for identity in stale {
            if let Some(previous) = self.painted.remove(&identity) {
                erase_rect(writer, previous.rect)?;
            }
        }

        let mut painted = 0;
        for element in frame {
            let hash = fingerprint(&element);
            if self.painted.get(&element.identity).map(|p| p.hash) == Some(hash) {
                continue;
            }
            render_element(writer, &element)?;
            self.painted.insert(
                element.identity,
                Painted {
                    rect: element.rect,
                    hash,
                },
            );
            painted += 1;
        }

        if let Some((row, col)) = self.settings.restore_cursor {
            queue!(writer, MoveTo(col, row))?;
        }

        writer.flush()?;
        Ok(painted)
    }
}

impl InputSource for AnsiRenderer {
    fn stored_text(&self, identity: &str) -> Option<String> {
        self.stored.get(identity).cloned()
    }
}

impl Renderer for AnsiRenderer {
    fn draw(&mut self, element: &Element<'_>) {
        self.pending.push(DrawnElement {
            identity: element.identity.to_string(),
            rect: element.rect,
            content: element.content.clone(),
        });
    }
}

/// Where an element was last painted and what it showed.
#[derive(Debug, Clone, Copy)]
struct Painted {
    rect: Rect,
    hash: Hash,
}

fn fingerprint(element: &DrawnElement) -> Hash {
    let mut hasher = blake3::Hasher::new();
    let Rect {
        x,
        y,
        width,
        height,
    } = element.rect;
    for value in [x, y, width, height] {
        hasher.update(&value.to_le_bytes());
    }
    hasher.update(display_text(&element.content).as_bytes());
    hasher.finalize()
}

fn display_text(content: &ElementContent) -> String {
    match content {
        ElementContent::Text(text) => text.clone(),
        ElementContent::Button { label, .. } => format!("[{label}]"),
        ElementContent::TextInput { text, .. } => format!("> {text}"),
    }
}

fn render_element(writer: &mut impl Write, element: &DrawnElement) -> Result<()> {
    let Rect {
        x,
        y,
        width,
        height,
    } = element.rect;

    if element.rect.is_empty() {
        return Ok(());
    }

    let mut lines = wrap_to_width(&display_text(&element.content), width);
    lines.truncate(height as usize);
    while lines.len() < height as usize {
        lines.push(String::new());
    }

    for (offset, line) in lines.iter_mut().enumerate() {
        pad_line(line, width);
        queue!(
            writer,
            MoveTo(x, y.saturating_add(offset as u16)),
            Print(line.as_str())
        )?;
    }

    Ok(())
}

fn erase_rect(writer: &mut impl Write, rect: Rect) -> Result<()> {
    if rect.is_empty() {
        return Ok(());
    }
    let blank = " ".repeat(rect.width as usize);
    for offset in 0..rect.height {
        queue!(
            writer,
            MoveTo(rect.x, rect.y.saturating_add(offset)),
            Print(blank.as_str())
        )?;
    }
    Ok(())
}

fn wrap_to_width(content: &str, width: u16) -> Vec<String> {
    let width = width as usize;
    let mut lines = Vec::new();
    for raw in content.split('\n') {
        let mut current = String::new();
        for word in raw.split(' ').filter(|word| !word.is_empty()) {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if display_width(&candidate) <= width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // Words wider than the cell are hard-cut.
            let mut rest = word.to_string();
            while display_width(&rest) > width {
                let head = truncate_to_width(&rest, width);
                if head.is_empty() {
                    rest.clear();
                    break;
                }
                rest = rest[head.len()..].to_string();
                lines.push(head);
            }
            current = rest;
        }
        lines.push(current);
    }
    lines
}

fn pad_line(line: &mut String, width: u16) {
    let width = width as usize;
    if display_width(line) > width {
        *line = truncate_to_width(line, width);
    }
    let missing = width.saturating_sub(display_width(line));
    line.extend(std::iter::repeat_n(' ', missing));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(identity: &'static str, rect: Rect, text: &str) -> Element<'static> {
        Element {
            identity,
            rect,
            content: ElementContent::Text(text.to_string()),
        }
    }

    #[test]
    fn wrap_basic() {
        let lines = wrap_to_width("hello world", 5);
        assert_eq!(lines, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn wrap_hard_cuts_long_words() {
        let lines = wrap_to_width("abcdefg", 3);
        assert_eq!(lines, vec!["abc", "def", "g"]);
    }

    #[test]
    fn renderer_writes_cursor_sequences() {
        let mut renderer = AnsiRenderer::with_default();
        renderer.draw(&element("status", Rect::new(2, 3, 5, 2), "hi"));

        let mut output = Vec::new();
        let painted = renderer.flush(&mut output).unwrap();
        assert_eq!(painted, 1);

        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("\u{1b}[4;3Hhi   "));
        assert!(rendered.contains("\u{1b}[5;3H     "));
    }

    #[test]
    fn unchanged_elements_are_skipped() {
        let mut renderer = AnsiRenderer::with_default();
        let mut sink = Vec::new();
        renderer.draw(&element("a", Rect::new(0, 0, 4, 1), "one"));
        renderer.flush(&mut sink).unwrap();

        renderer.draw(&element("a", Rect::new(0, 0, 4, 1), "one"));
        assert_eq!(renderer.flush(&mut sink).unwrap(), 0);

        renderer.draw(&element("a", Rect::new(0, 0, 4, 1), "two"));
        assert_eq!(renderer.flush(&mut sink).unwrap(), 1);

        renderer.invalidate();
        renderer.draw(&element("a", Rect::new(0, 0, 4, 1), "two"));
        assert_eq!(renderer.flush(&mut sink).unwrap(), 1);
    }

    #[test]
    fn features_missing_from_a_frame_are_erased() {
        let mut renderer = AnsiRenderer::with_default();
        let mut sink = Vec::new();
        renderer.draw(&element("keep", Rect::new(0, 0, 4, 1), "one"));
        renderer.draw(&element("gone", Rect::new(0, 1, 3, 1), "two"));
        assert_eq!(renderer.flush(&mut sink).unwrap(), 2);

        let mut output = Vec::new();
        renderer.draw(&element("keep", Rect::new(0, 0, 4, 1), "one"));
        assert_eq!(renderer.flush(&mut output).unwrap(), 0);
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("\u{1b}[2;1H   "));
        assert!(!rendered.contains("two"));

        // Once erased it is painted again when it comes back.
        renderer.draw(&element("keep", Rect::new(0, 0, 4, 1), "one"));
        renderer.draw(&element("gone", Rect::new(0, 1, 3, 1), "two"));
        assert_eq!(renderer.flush(&mut sink).unwrap(), 1);
    }

    #[test]
    fn moved_feature_blanks_its_old_rect() {
        let mut renderer = AnsiRenderer::with_default();
        let mut sink = Vec::new();
        renderer.draw(&element("a", Rect::new(0, 0, 2, 1), "x"));
        renderer.flush(&mut sink).unwrap();

        let mut output = Vec::new();
        renderer.draw(&element("a", Rect::new(5, 2, 2, 1), "x"));
        assert_eq!(renderer.flush(&mut output).unwrap(), 1);
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("\u{1b}[1;1H  "));
        assert!(rendered.contains("\u{1b}[3;6Hx "));
    }

    #[test]
    fn empty_rects_paint_nothing() {
        let mut renderer = AnsiRenderer::with_default();
        let mut output = Vec::new();
        renderer.draw(&element("flat", Rect::new(1, 1, 4, 0), "x"));
        assert_eq!(renderer.flush(&mut output).unwrap(), 1);
        assert!(!String::from_utf8(output).unwrap().contains('x'));
    }

    #[test]
    fn draw_list_records_and_serves_input() {
        let mut list = DrawList::new();
        list.set_stored_text("val", "typed");
        list.draw(&element("t", Rect::new(0, 0, 1, 1), "x"));
        assert_eq!(list.elements().len(), 1);
        assert_eq!(list.stored_text("val").as_deref(), Some("typed"));
        assert_eq!(list.stored_text("other"), None);
        list.clear();
        assert!(list.elements().is_empty());
    }
}
