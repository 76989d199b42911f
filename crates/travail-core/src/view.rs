use crate::{Color, Modifier, Rect};
use std::rc::Rc;

pub type ViewId = u64;

pub type Callback = Rc<dyn Fn()>;
pub type ScrollCallback = Rc<dyn Fn(f32) -> f32>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// How a bitmap fills its box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentScale {
    /// Whole image visible, letterboxed.
    #[default]
    Fit,
    /// Fills the box, cropping the overflowing axis around the center.
    Crop,
}

#[derive(Clone)]
pub enum ViewKind {
    Box,
    Row,
    Column,
    Scroll {
        axis: Axis,
        /// Consumes a delta along `axis`, returns what was left over.
        on_scroll: Option<ScrollCallback>,
        /// Reports (viewport, content) extents along `axis` after layout.
        set_extents: Option<Rc<dyn Fn(f32, f32)>>,
        get_scroll_offset: Option<Rc<dyn Fn() -> f32>>,
    },
    Text {
        text: String,
        color: Color,
        font_size: f32,
        weight: FontWeight,
    },
    /// A bundled image resource, looked up by id at render time.
    Icon {
        resource: String,
        tint: Option<Color>,
        scale: ContentScale,
    },
    /// Clickable container; children are the content.
    Button {
        on_click: Option<Callback>,
    },
    TextField {
        value: String,
        hint: String,
        font_size: f32,
        color: Color,
        on_change: Option<Rc<dyn Fn(String)>>,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Box => write!(f, "Box"),
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Scroll { axis, .. } => f.debug_struct("Scroll").field("axis", axis).finish(),
            ViewKind::Text {
                text,
                color,
                font_size,
                weight,
            } => f
                .debug_struct("Text")
                .field("text", text)
                .field("color", color)
                .field("font_size", font_size)
                .field("weight", weight)
                .finish(),
            ViewKind::Icon {
                resource,
                tint,
                scale,
            } => f
                .debug_struct("Icon")
                .field("resource", resource)
                .field("tint", tint)
                .field("scale", scale)
                .finish(),
            ViewKind::Button { .. } => f
                .debug_struct("Button")
                .field("on_click", &"<callback>")
                .finish(),
            ViewKind::TextField {
                value,
                hint,
                font_size,
                color,
                ..
            } => f
                .debug_struct("TextField")
                .field("value", value)
                .field("hint", hint)
                .field("font_size", font_size)
                .field("color", color)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub modifier: Modifier,
    pub children: Vec<View>,
    pub semantics: Option<crate::semantics::Semantics>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            modifier: Modifier::default(),
            children: vec![],
            semantics: None,
        }
    }
    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn semantics(mut self, s: crate::semantics::Semantics) -> Self {
        self.semantics = Some(s);
        self
    }
}

/// Renderable scene
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub clear_color: Color,
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Rect {
        rect: Rect,
        color: Color,
        radius: f32,
    },
    Border {
        rect: Rect,
        color: Color,
        width: f32,
        radius: f32,
    },
    Text {
        rect: Rect,
        text: String,
        color: Color,
        size: f32,
        weight: FontWeight,
    },
    Image {
        rect: Rect,
        resource: String,
        tint: Option<Color>,
        scale: ContentScale,
    },
    PushClip {
        rect: Rect,
        radius: f32,
    },
    PopClip,
}

impl Scene {
    /// Text runs in paint order, mostly for tests and debugging.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Color, FontWeight)> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Text {
                text,
                color,
                weight,
                ..
            } => Some((text.as_str(), *color, *weight)),
            _ => None,
        })
    }
}
