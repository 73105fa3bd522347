use crate::property::PropertyStore;

use super::grid::Grid;

/// Identity of a cell, unique within its grid for lookup purposes.
pub type Identity = String;

/// Identity given to filler that later placements may consume.
pub const REMOVABLE_SPACING: &str = "spacer";

/// Identity given to filler reserving rows beneath a multi-row cell.
pub const FIXED_SPACING: &str = "fixture";

/// Filler policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    /// May be split, shrunk or consumed by later insertions.
    Removable,
    /// Reserved for a vertical span; never touched by placement.
    Fixed,
}

/// Content carried by a leaf cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text {
        text: String,
    },
    /// Text mirroring a property-store value; `fallback` is shown when the read fails.
    PropertyText {
        property: String,
        fallback: String,
    },
    Button {
        label: String,
        code: u32,
    },
    /// Entry box; `value` is the last captured text (initially the default).
    TextInput {
        code: u32,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellKind {
    Leaf(Payload),
    Filler(Spacing),
    /// A nested page laid out inside the cell's rectangle.
    Composite(Grid),
}

/// Positioned unit of content with a horizontal weight and vertical span.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    identity: Identity,
    horizontal: u32,
    vertical: u32,
    kind: CellKind,
}

impl Cell {
    /// Weights are clamped to at least one.
    pub fn new(identity: impl Into<Identity>, horizontal: u32, vertical: u32, kind: CellKind) -> Self {
        Self {
            identity: identity.into(),
            horizontal: horizontal.max(1),
            vertical: vertical.max(1),
            kind,
        }
    }

    pub fn text(
        identity: impl Into<Identity>,
        horizontal: u32,
        vertical: u32,
        text: impl Into<String>,
    ) -> Self {
        Self::new(
            identity,
            horizontal,
            vertical,
            CellKind::Leaf(Payload::Text { text: text.into() }),
        )
    }

    pub fn property_text(
        identity: impl Into<Identity>,
        horizontal: u32,
        vertical: u32,
        property: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        Self::new(
            identity,
            horizontal,
            vertical,
            CellKind::Leaf(Payload::PropertyText {
                property: property.into(),
                fallback: fallback.into(),
            }),
        )
    }

    pub fn button(
        identity: impl Into<Identity>,
        horizontal: u32,
        vertical: u32,
        label: impl Into<String>,
        code: u32,
    ) -> Self {
        Self::new(
            identity,
            horizontal,
            vertical,
            CellKind::Leaf(Payload::Button {
                label: label.into(),
                code,
            }),
        )
    }

    pub fn text_input(
        identity: impl Into<Identity>,
        horizontal: u32,
        vertical: u32,
        default_text: impl Into<String>,
        code: u32,
    ) -> Self {
        Self::new(
            identity,
            horizontal,
            vertical,
            CellKind::Leaf(Payload::TextInput {
                code,
                value: default_text.into(),
            }),
        )
    }

    pub fn spacing(horizontal: u32, vertical: u32) -> Self {
        Self::new(
            REMOVABLE_SPACING,
            horizontal,
            vertical,
            CellKind::Filler(Spacing::Removable),
        )
    }

    pub fn fixed_spacing(horizontal: u32, vertical: u32) -> Self {
        Self::new(
            FIXED_SPACING,
            horizontal,
            vertical,
            CellKind::Filler(Spacing::Fixed),
        )
    }

    pub fn composite(
        identity: impl Into<Identity>,
        horizontal: u32,
        vertical: u32,
        grid: Grid,
    ) -> Self {
        Self::new(identity, horizontal, vertical, CellKind::Composite(grid))
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn rename(&mut self, identity: impl Into<Identity>) {
        self.identity = identity.into();
    }

    pub fn horizontal(&self) -> u32 {
        self.horizontal
    }

    pub fn vertical(&self) -> u32 {
        self.vertical
    }

    pub(crate) fn set_horizontal(&mut self, weight: u32) {
        self.horizontal = weight.max(1);
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    pub fn into_kind(self) -> CellKind {
        self.kind
    }

    pub fn payload(&self) -> Option<&Payload> {
        match &self.kind {
            CellKind::Leaf(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn grid(&self) -> Option<&Grid> {
        match &self.kind {
            CellKind::Composite(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn grid_mut(&mut self) -> Option<&mut Grid> {
        match &mut self.kind {
            CellKind::Composite(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn is_filler(&self) -> bool {
        matches!(self.kind, CellKind::Filler(_))
    }

    pub fn is_removable(&self) -> bool {
        matches!(self.kind, CellKind::Filler(Spacing::Removable))
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.kind, CellKind::Filler(Spacing::Fixed))
    }

    /// Current data content: what an action would read from this feature.
    ///
    /// Fillers and composites carry no content of their own. Property text
    /// reports its fallback here since no store is at hand; use
    /// [`Cell::resolve_content`] to read the bound property.
    pub fn content(&self) -> Option<String> {
        match &self.kind {
            CellKind::Leaf(Payload::Text { text }) => Some(text.clone()),
            CellKind::Leaf(Payload::PropertyText { fallback, .. }) => Some(fallback.clone()),
            CellKind::Leaf(Payload::Button { label, .. }) => Some(label.clone()),
            CellKind::Leaf(Payload::TextInput { value, .. }) => Some(value.clone()),
            CellKind::Filler(_) | CellKind::Composite(_) => None,
        }
    }

    /// Like [`Cell::content`], but property text reads `properties` first.
    pub fn resolve_content(&self, properties: &dyn PropertyStore) -> Option<String> {
        match &self.kind {
            CellKind::Leaf(Payload::PropertyText { property, fallback }) => {
                Some(properties.read_or(property, fallback))
            }
            _ => self.content(),
        }
    }

    /// Replace the captured value of a text input. Returns false for other kinds.
    pub fn set_input_value(&mut self, text: impl Into<String>) -> bool {
        match &mut self.kind {
            CellKind::Leaf(Payload::TextInput { value, .. }) => {
                *value = text.into();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn release_reservation(&mut self) {
        if self.is_fixed() {
            self.kind = CellKind::Filler(Spacing::Removable);
            self.identity = REMOVABLE_SPACING.to_string();
            self.vertical = 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_clamped_to_one() {
        let cell = Cell::text("basic", 0, 0, "Test");
        assert_eq!(cell.horizontal(), 1);
        assert_eq!(cell.vertical(), 1);
    }

    #[test]
    fn fillers_have_no_content() {
        assert_eq!(Cell::spacing(3, 1).content(), None);
        assert!(Cell::spacing(3, 1).is_removable());
        assert!(Cell::fixed_spacing(3, 1).is_fixed());
        assert!(!Cell::fixed_spacing(3, 1).is_removable());
    }

    #[test]
    fn property_text_resolves_through_the_store() {
        use crate::property::{EmptyPropertyStore, MemoryPropertyStore};

        let cell = Cell::property_text("volume", 1, 1, "audio.volume", "n/a");
        let store = MemoryPropertyStore::new().with("audio.volume", "11");
        assert_eq!(cell.content().as_deref(), Some("n/a"));
        assert_eq!(cell.resolve_content(&store).as_deref(), Some("11"));
        assert_eq!(cell.resolve_content(&EmptyPropertyStore).as_deref(), Some("n/a"));
        assert_eq!(Cell::spacing(1, 1).resolve_content(&store), None);
    }

    #[test]
    fn text_input_value_is_its_content() {
        let mut input = Cell::text_input("val", 1, 1, "default", 34523);
        assert_eq!(input.content().as_deref(), Some("default"));
        assert!(input.set_input_value("typed"));
        assert_eq!(input.content().as_deref(), Some("typed"));
        assert!(!Cell::text("t", 1, 1, "x").set_input_value("nope"));
    }
}
