use std::ops::Range;
use std::rc::Rc;

use travail_core::*;
use unicode_segmentation::UnicodeSegmentation;

pub const TF_FONT_SP: f32 = 16.0;
pub const TF_PADDING_X_DP: f32 = 12.0;

fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i >= byte {
            break;
        }
        last = i;
    }
    last
}

fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    for (i, _) in text.grapheme_indices(true) {
        if i > byte {
            return i;
        }
    }
    text.len()
}

fn clamp_to_char_boundary(s: &str, i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    let mut j = i;
    while j > 0 && !s.is_char_boundary(j) {
        j -= 1;
    }
    j
}

/// Byte offset of the grapheme boundary closest to `x` px from the start of
/// `text`, using the same approximate advances as layout.
pub fn index_for_x(text: &str, size_px: f32, x: f32) -> usize {
    let mut pen = 0.0;
    for (i, g) in text.grapheme_indices(true) {
        let w = crate::layout::approx_text_width(g, size_px);
        if x < pen + w * 0.5 {
            return i;
        }
        pen += w;
    }
    text.len()
}

/// Editing state of one text field, owned by the platform runner and keyed
/// by the field's view id. Offsets are byte indices on char boundaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextFieldState {
    pub text: String,
    pub selection: Range<usize>,
    /// IME preedit span inside `text`.
    pub composition: Option<Range<usize>>,
}

impl TextFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for an existing value, caret at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: end..end,
            composition: None,
        }
    }

    /// Adopts `value` when the owner changed it behind our back.
    pub fn sync(&mut self, value: &str) {
        if self.text != value {
            *self = Self::with_text(value);
        }
    }

    pub fn insert_text(&mut self, text: &str) {
        let start = clamp_to_char_boundary(&self.text, self.selection.start.min(self.selection.end));
        let end = clamp_to_char_boundary(&self.text, self.selection.start.max(self.selection.end));

        self.text.replace_range(start..end, text);
        let new_pos = start + text.len();
        self.selection = new_pos..new_pos;
    }

    pub fn delete_backward(&mut self) {
        if self.selection.start == self.selection.end {
            let pos = self.selection.start.min(self.text.len());
            if pos > 0 {
                let prev = prev_grapheme_boundary(&self.text, pos);
                self.text.replace_range(prev..pos, "");
                self.selection = prev..prev;
            }
        } else {
            self.insert_text("");
        }
    }

    pub fn delete_forward(&mut self) {
        if self.selection.start == self.selection.end {
            let pos = self.selection.start.min(self.text.len());
            if pos < self.text.len() {
                let next = next_grapheme_boundary(&self.text, pos);
                self.text.replace_range(pos..next, "");
            }
        } else {
            self.insert_text("");
        }
    }

    /// Moves the caret by `delta` graphemes.
    pub fn move_cursor(&mut self, delta: isize, extend_selection: bool) {
        let mut pos = self.selection.end.min(self.text.len());
        if delta < 0 {
            for _ in 0..delta.unsigned_abs() {
                pos = prev_grapheme_boundary(&self.text, pos);
            }
        } else {
            for _ in 0..delta.unsigned_abs() {
                pos = next_grapheme_boundary(&self.text, pos);
            }
        }
        self.place_caret(pos, extend_selection);
    }

    pub fn home(&mut self, extend_selection: bool) {
        self.place_caret(0, extend_selection);
    }

    pub fn end(&mut self, extend_selection: bool) {
        self.place_caret(self.text.len(), extend_selection);
    }

    fn place_caret(&mut self, pos: usize, extend_selection: bool) {
        if extend_selection {
            self.selection.end = pos;
        } else {
            self.selection = pos..pos;
        }
    }

    pub fn caret_index(&self) -> usize {
        self.selection.end.min(self.text.len())
    }

    pub fn selected_text(&self) -> &str {
        let s = self.selection.start.min(self.selection.end);
        let e = self.selection.start.max(self.selection.end);
        self.text.get(s..e).unwrap_or("")
    }

    /// Replaces the preedit span with `text`. `cursor` is a byte range
    /// inside `text`.
    pub fn set_composition(&mut self, text: &str, cursor: Option<(usize, usize)>) {
        if text.is_empty() {
            self.cancel_composition();
            return;
        }

        let anchor = match self.composition.take() {
            Some(r) => {
                let s = clamp_to_char_boundary(&self.text, r.start);
                let e = clamp_to_char_boundary(&self.text, r.end).max(s);
                self.text.replace_range(s..e, text);
                s
            }
            None => {
                let pos = clamp_to_char_boundary(&self.text, self.selection.start);
                self.text.insert_str(pos, text);
                pos
            }
        };
        self.composition = Some(anchor..anchor + text.len());

        self.selection = match cursor {
            Some((c0, c1)) => {
                let b0 = clamp_to_char_boundary(text, c0);
                let b1 = clamp_to_char_boundary(text, c1);
                (anchor + b0)..(anchor + b1)
            }
            None => {
                let end = anchor + text.len();
                end..end
            }
        };
    }

    pub fn commit_composition(&mut self, text: &str) {
        if let Some(r) = self.composition.take() {
            let s = clamp_to_char_boundary(&self.text, r.start);
            let e = clamp_to_char_boundary(&self.text, r.end).max(s);
            self.selection = s..e;
        }
        self.insert_text(text);
    }

    pub fn cancel_composition(&mut self) {
        if let Some(r) = self.composition.take() {
            let s = clamp_to_char_boundary(&self.text, r.start);
            let e = clamp_to_char_boundary(&self.text, r.end).max(s);
            self.text.replace_range(s..e, "");
            self.selection = s..s;
        }
    }
}

/// Single-line text input. `value` is owned by the caller, which receives
/// every edit through `on_change` and recomposes with the new value.
/// `hint` is drawn in the theme's muted color while `value` is empty.
pub fn TextField(
    value: impl Into<String>,
    hint: impl Into<String>,
    modifier: Modifier,
    on_change: impl Fn(String) + 'static,
) -> View {
    let hint = hint.into();
    View::new(
        0,
        ViewKind::TextField {
            value: value.into(),
            hint: hint.clone(),
            font_size: TF_FONT_SP,
            color: theme().on_surface,
            on_change: Some(Rc::new(on_change)),
        },
    )
    .modifier(modifier)
    .semantics(Semantics::new(Role::TextField).label(hint))
}

/// `TextField` without its own decoration: no inner inset and a single line
/// of height, for fields drawn inside a styled container.
pub fn BasicTextField(
    value: impl Into<String>,
    hint: impl Into<String>,
    modifier: Modifier,
    on_change: impl Fn(String) + 'static,
) -> View {
    let line = TF_FONT_SP * crate::layout::LINE_HEIGHT;
    TextField(value, hint, modifier.padding(0.0).height(line), on_change)
}
