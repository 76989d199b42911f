//! Layout and paint.
//!
//! `layout_and_paint` turns a composed `View` tree into a flat `Scene`, the
//! `HitRegion`s used for input routing and the `SemNode`s used by tests and
//! accessibility. Layout is flexbox via taffy; every length on a `Modifier`
//! is dp and text sizes are sp, converted with the current `Density` and
//! `TextScale`.
//!
//! Hit regions and semantics come out in paint order, so the topmost region
//! under a point is the last one that contains it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use taffy::geometry::Point;
use taffy::prelude::{length, percent};
use taffy::style::{
    AlignItems, AvailableSpace, Display, FlexDirection, JustifyContent, Overflow, Style,
};
use taffy::{NodeId, TaffyTree};
use travail_core::*;
use unicode_segmentation::UnicodeSegmentation;

use crate::Interactions;
use crate::textfield::{TF_PADDING_X_DP, TextFieldState};

/// Line box height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.3;

const PRESSED_OVERLAY: Color = Color(0, 0, 0, 0x1F);

/// Rough advance of a single-line run: 0.6em per grapheme.
pub fn approx_text_width(text: &str, size_px: f32) -> f32 {
    text.graphemes(true).count() as f32 * size_px * 0.6
}

#[derive(Clone)]
enum NodeCtx {
    Text { text: String, font_sp: f32 },
    TextField { font_sp: f32 },
    Container,
}

fn stamp(mut v: View, id: &mut u64) -> View {
    v.id = *id;
    *id += 1;
    v.children = v.children.into_iter().map(|c| stamp(c, id)).collect();
    v
}

fn flex_dir_for(kind: &ViewKind) -> FlexDirection {
    match kind {
        ViewKind::Row
        | ViewKind::Button { .. }
        | ViewKind::Scroll {
            axis: Axis::Horizontal,
            ..
        } => FlexDirection::Row,
        _ => FlexDirection::Column,
    }
}

fn is_container(kind: &ViewKind) -> bool {
    !matches!(
        kind,
        ViewKind::Text { .. } | ViewKind::TextField { .. } | ViewKind::Icon { .. }
    )
}

fn style_from_modifier(m: &Modifier, kind: &ViewKind, parent: Option<&ViewKind>) -> Style {
    let px = dp_to_px;
    let mut s = Style {
        display: Display::Flex,
        flex_direction: flex_dir_for(kind),
        ..Default::default()
    };

    s.align_items = if matches!(kind, ViewKind::Button { .. }) {
        Some(AlignItems::Center)
    } else if is_container(kind) {
        Some(AlignItems::Stretch)
    } else {
        Some(AlignItems::FlexStart)
    };
    s.justify_content = if matches!(kind, ViewKind::Button { .. }) {
        Some(JustifyContent::Center)
    } else {
        Some(JustifyContent::FlexStart)
    };
    if let Some(a) = m.align_items_container {
        s.align_items = Some(a);
    }
    if let Some(j) = m.justify_content {
        s.justify_content = Some(j);
    }
    if let Some(a) = m.align_self {
        s.align_self = Some(a);
    }

    if let Some(g) = m.flex_grow {
        s.flex_grow = g;
    }
    if let Some(sh) = m.flex_shrink {
        s.flex_shrink = sh;
    }
    if let Some(b) = m.flex_basis {
        s.flex_basis = length(px(b.max(0.0)));
    }
    // Scroll content keeps its natural extent instead of shrinking to the viewport.
    if matches!(parent, Some(ViewKind::Scroll { .. })) {
        s.flex_shrink = 0.0;
    }

    if let Some(gap) = m.spacing {
        let g = length(px(gap));
        s.gap = taffy::geometry::Size {
            width: g,
            height: g,
        };
    }

    if matches!(kind, ViewKind::Scroll { .. }) {
        s.overflow = Point {
            x: Overflow::Hidden,
            y: Overflow::Hidden,
        };
    }

    if let Some(pv) = m.padding_values {
        s.padding = taffy::geometry::Rect {
            left: length(px(pv.left)),
            right: length(px(pv.right)),
            top: length(px(pv.top)),
            bottom: length(px(pv.bottom)),
        };
    } else if let Some(p) = m.padding {
        let v = length(px(p));
        s.padding = taffy::geometry::Rect {
            left: v,
            right: v,
            top: v,
            bottom: v,
        };
    }

    // Explicit size wins over fill
    let mut width_set = false;
    let mut height_set = false;
    if let Some(sz) = m.size {
        s.size.width = length(px(sz.width.max(0.0)));
        s.size.height = length(px(sz.height.max(0.0)));
        width_set = true;
        height_set = true;
    }
    if let Some(w) = m.width {
        s.size.width = length(px(w.max(0.0)));
        width_set = true;
    }
    if let Some(h) = m.height {
        s.size.height = length(px(h.max(0.0)));
        height_set = true;
    }

    // Fill along the parent's main axis grows, fill across it is tight.
    let parent_is_row = parent.map(flex_dir_for) == Some(FlexDirection::Row);
    let want_fill_w = (m.fill_max || m.fill_max_w) && !width_set;
    let want_fill_h = (m.fill_max || m.fill_max_h) && !height_set;
    let (fill_main, fill_cross) = if parent_is_row {
        (want_fill_w, want_fill_h)
    } else {
        (want_fill_h, want_fill_w)
    };
    if fill_main {
        s.flex_grow = s.flex_grow.max(1.0);
        s.flex_shrink = s.flex_shrink.max(1.0);
        s.flex_basis = length(0.0);
        if parent_is_row {
            s.min_size.width = length(0.0);
        } else {
            s.min_size.height = length(0.0);
        }
    }
    if fill_cross {
        if parent_is_row {
            s.min_size.height = percent(1.0);
            s.max_size.height = percent(1.0);
        } else {
            s.min_size.width = percent(1.0);
            s.max_size.width = percent(1.0);
        }
    }

    if let Some(w) = m.min_width {
        s.min_size.width = length(px(w.max(0.0)));
    }
    if let Some(h) = m.min_height {
        s.min_size.height = length(px(h.max(0.0)));
    }

    s
}

fn build_node(
    v: &View,
    parent: Option<&ViewKind>,
    t: &mut TaffyTree<NodeCtx>,
    nodes_map: &mut HashMap<ViewId, NodeId>,
) -> UiResult<NodeId> {
    let style = style_from_modifier(&v.modifier, &v.kind, parent);

    let node = match &v.kind {
        ViewKind::Text {
            text, font_size, ..
        } => t.new_leaf_with_context(
            style,
            NodeCtx::Text {
                text: text.clone(),
                font_sp: *font_size,
            },
        )?,
        ViewKind::TextField { font_size, .. } => t.new_leaf_with_context(
            style,
            NodeCtx::TextField {
                font_sp: *font_size,
            },
        )?,
        ViewKind::Icon { .. } => t.new_leaf(style)?,
        _ => {
            let children = v
                .children
                .iter()
                .map(|c| build_node(c, Some(&v.kind), t, nodes_map))
                .collect::<UiResult<Vec<_>>>()?;
            let n = t.new_with_children(style, &children)?;
            t.set_node_context(n, Some(NodeCtx::Container))?;
            n
        }
    };

    nodes_map.insert(v.id, node);
    Ok(node)
}

fn measure(
    known: taffy::geometry::Size<Option<f32>>,
    ctx: Option<&mut NodeCtx>,
) -> taffy::geometry::Size<f32> {
    match ctx {
        Some(NodeCtx::Text { text, font_sp }) => {
            let size_px = sp_to_px(*font_sp);
            taffy::geometry::Size {
                width: known
                    .width
                    .unwrap_or_else(|| approx_text_width(text, size_px)),
                height: known.height.unwrap_or(size_px * LINE_HEIGHT),
            }
        }
        Some(NodeCtx::TextField { font_sp }) => taffy::geometry::Size {
            width: known.width.unwrap_or_else(|| dp_to_px(220.0)),
            height: known
                .height
                .unwrap_or_else(|| sp_to_px(*font_sp) * LINE_HEIGHT + dp_to_px(16.0)),
        },
        Some(NodeCtx::Container) | None => taffy::geometry::Size::ZERO,
    }
}

/// Farthest (x, y) reached by `node`'s subtree, relative to its own origin.
fn subtree_extents(node: NodeId, t: &TaffyTree<NodeCtx>) -> UiResult<(f32, f32)> {
    let l = t.layout(node)?;
    let (mut w, mut h) = (l.size.width, l.size.height);
    for ch in t.children(node)? {
        let cl = t.layout(ch)?;
        let (loc_x, loc_y) = (cl.location.x, cl.location.y);
        let (cw, chh) = subtree_extents(ch, t)?;
        w = w.max(loc_x + cw);
        h = h.max(loc_y + chh);
    }
    Ok((w, h))
}

/// Lays out `root` at `size_px_u32` and paints it.
///
/// `textfield_states` supplies caret/composition for text fields, keyed by
/// view id; fields without an entry draw their value with the caret at the
/// end. `interactions` drives the pressed overlay and `focused` the caret.
pub fn layout_and_paint(
    root: &View,
    size_px_u32: (u32, u32),
    textfield_states: &HashMap<u64, Rc<RefCell<TextFieldState>>>,
    interactions: &Interactions,
    focused: Option<u64>,
) -> UiResult<(Scene, Vec<HitRegion>, Vec<SemNode>)> {
    let mut id = 1u64;
    let root = stamp(root.clone(), &mut id);

    let mut taffy: TaffyTree<NodeCtx> = TaffyTree::new();
    let mut nodes_map = HashMap::new();
    let root_node = build_node(&root, None, &mut taffy, &mut nodes_map)?;

    let (w_px, h_px) = (size_px_u32.0 as f32, size_px_u32.1 as f32);
    let mut rs = taffy.style(root_node)?.clone();
    rs.size.width = length(w_px);
    rs.size.height = length(h_px);
    taffy.set_style(root_node, rs)?;

    let available = taffy::geometry::Size {
        width: AvailableSpace::Definite(w_px),
        height: AvailableSpace::Definite(h_px),
    };
    taffy.compute_layout_with_measure(
        root_node,
        available,
        |known, _avail, _node, ctx, _style| measure(known, ctx),
    )?;

    let mut painter = Painter {
        t: &taffy,
        nodes: &nodes_map,
        textfield_states,
        interactions,
        focused,
        scene: Scene {
            clear_color: theme().background,
            nodes: vec![],
        },
        hits: vec![],
        sems: vec![],
    };
    painter.walk(&root, (0.0, 0.0))?;

    log::trace!(
        "painted {} scene nodes, {} hit regions",
        painter.scene.nodes.len(),
        painter.hits.len()
    );
    Ok((painter.scene, painter.hits, painter.sems))
}

struct Painter<'a> {
    t: &'a TaffyTree<NodeCtx>,
    nodes: &'a HashMap<ViewId, NodeId>,
    textfield_states: &'a HashMap<u64, Rc<RefCell<TextFieldState>>>,
    interactions: &'a Interactions,
    focused: Option<u64>,
    scene: Scene,
    hits: Vec<HitRegion>,
    sems: Vec<SemNode>,
}

impl Painter<'_> {
    fn walk(&mut self, v: &View, parent_offset_px: (f32, f32)) -> UiResult<()> {
        let (location, size, padding) = {
            let l = self.t.layout(self.nodes[&v.id])?;
            (l.location, l.size, l.padding)
        };
        let rect = Rect {
            x: parent_offset_px.0 + location.x,
            y: parent_offset_px.1 + location.y,
            w: size.width,
            h: size.height,
        };
        let content_rect = Rect {
            x: rect.x + padding.left,
            y: rect.y + padding.top,
            w: (rect.w - padding.left - padding.right).max(0.0),
            h: (rect.h - padding.top - padding.bottom).max(0.0),
        };

        let th = theme();
        let m = &v.modifier;
        let is_button = matches!(v.kind, ViewKind::Button { .. });
        let radius = m
            .clip_rounded
            .or(is_button.then_some(th.shape_medium))
            .map(dp_to_px)
            .unwrap_or(0.0);

        let background = m.background.or(is_button.then_some(th.primary));
        if let Some(bg) = background {
            self.scene.nodes.push(SceneNode::Rect {
                rect,
                color: bg,
                radius,
            });
        }
        if let Some(b) = &m.border {
            self.scene.nodes.push(SceneNode::Border {
                rect,
                color: b.color,
                width: dp_to_px(b.width),
                radius: dp_to_px(b.radius),
            });
        }

        let on_click = match &v.kind {
            ViewKind::Button { on_click } => on_click.clone().or_else(|| m.on_click.clone()),
            _ => m.on_click.clone(),
        };
        if on_click.is_some() && self.interactions.pressed.contains(&v.id) {
            self.scene.nodes.push(SceneNode::Rect {
                rect,
                color: PRESSED_OVERLAY,
                radius,
            });
        }

        self.push_semantics(v, rect);

        match &v.kind {
            ViewKind::Text {
                text,
                color,
                font_size,
                weight,
            } => {
                let size_px = sp_to_px(*font_size);
                let line_h = size_px * LINE_HEIGHT;
                self.scene.nodes.push(SceneNode::Text {
                    rect: Rect {
                        x: content_rect.x,
                        y: content_rect.y + ((content_rect.h - line_h) * 0.5).max(0.0),
                        w: content_rect.w,
                        h: line_h,
                    },
                    text: text.clone(),
                    color: *color,
                    size: size_px,
                    weight: *weight,
                });
            }
            ViewKind::Icon {
                resource,
                tint,
                scale,
            } => {
                self.scene.nodes.push(SceneNode::Image {
                    rect: content_rect,
                    resource: resource.clone(),
                    tint: *tint,
                    scale: *scale,
                });
            }
            ViewKind::TextField {
                value,
                hint,
                font_size,
                color,
                on_change,
            } => {
                let inner = if m.padding.is_some() || m.padding_values.is_some() {
                    content_rect
                } else {
                    let pad = dp_to_px(TF_PADDING_X_DP);
                    Rect {
                        x: rect.x + pad,
                        w: (rect.w - 2.0 * pad).max(0.0),
                        ..rect
                    }
                };
                self.hits.push(HitRegion {
                    id: v.id,
                    rect,
                    on_click: on_click.clone(),
                    on_scroll: m.on_scroll.clone(),
                    focusable: true,
                    on_text_change: on_change.clone(),
                    text: Some(value.clone()),
                    text_inset: inner.x - rect.x,
                });
                self.paint_text_field(v.id, inner, value, hint, *font_size, *color);
            }
            ViewKind::Scroll {
                axis,
                on_scroll,
                set_extents,
                get_scroll_offset,
            } => {
                let on_scroll = on_scroll.clone().map(|cb| {
                    let axis = *axis;
                    Rc::new(move |d: Vec2| match axis {
                        Axis::Vertical => Vec2 { x: d.x, y: cb(d.y) },
                        Axis::Horizontal => Vec2 { x: cb(d.x), y: d.y },
                    }) as Rc<dyn Fn(Vec2) -> Vec2>
                });
                self.hits.push(HitRegion {
                    id: v.id,
                    rect,
                    on_click: None,
                    on_scroll,
                    focusable: false,
                    on_text_change: None,
                    text: None,
                    text_inset: 0.0,
                });

                let vp = content_rect;
                let mut content_extent = 0.0f32;
                for c in &v.children {
                    let nid = self.nodes[&c.id];
                    let cl = self.t.layout(nid)?;
                    let (cx, cy) = (cl.location.x, cl.location.y);
                    let (cw, chh) = subtree_extents(nid, self.t)?;
                    content_extent = content_extent.max(match axis {
                        Axis::Vertical => cy - padding.top + chh,
                        Axis::Horizontal => cx - padding.left + cw,
                    });
                }
                let viewport_extent = match axis {
                    Axis::Vertical => vp.h,
                    Axis::Horizontal => vp.w,
                };
                if let Some(set) = set_extents {
                    set(viewport_extent, content_extent);
                }
                let offset = get_scroll_offset.as_ref().map(|get| get()).unwrap_or(0.0);

                self.scene.nodes.push(SceneNode::PushClip {
                    rect: vp,
                    radius: 0.0,
                });
                let hit_start = self.hits.len();
                let child_offset = match axis {
                    Axis::Vertical => (rect.x, rect.y - offset),
                    Axis::Horizontal => (rect.x - offset, rect.y),
                };
                for c in &v.children {
                    self.walk(c, child_offset)?;
                }
                // Descendants can only be hit inside the viewport.
                let tail = self.hits.split_off(hit_start);
                self.hits.extend(tail.into_iter().filter_map(|mut h| {
                    h.rect = h.rect.intersect(&vp)?;
                    Some(h)
                }));
                self.scene.nodes.push(SceneNode::PopClip);
                return Ok(());
            }
            ViewKind::Box | ViewKind::Row | ViewKind::Column | ViewKind::Button { .. } => {}
        }

        if !matches!(v.kind, ViewKind::TextField { .. })
            && (on_click.is_some() || m.on_scroll.is_some())
        {
            self.hits.push(HitRegion {
                id: v.id,
                rect,
                on_click,
                on_scroll: m.on_scroll.clone(),
                focusable: is_button,
                on_text_change: None,
                text: None,
                text_inset: 0.0,
            });
        }

        for c in &v.children {
            self.walk(c, (rect.x, rect.y))?;
        }
        Ok(())
    }

    fn push_semantics(&mut self, v: &View, rect: Rect) {
        let explicit = v.semantics.as_ref().or(v.modifier.semantics.as_ref());
        let (role, label, enabled) = match (explicit, &v.kind) {
            (Some(s), _) => (s.role, s.label.clone(), s.enabled),
            (None, ViewKind::Text { text, .. }) => (Role::Text, Some(text.clone()), true),
            (None, ViewKind::Button { .. }) => (Role::Button, None, true),
            (None, ViewKind::TextField { hint, .. }) => (Role::TextField, Some(hint.clone()), true),
            _ => return,
        };
        self.sems.push(SemNode {
            id: v.id,
            role,
            label,
            rect,
            focused: self.focused == Some(v.id),
            enabled,
        });
    }

    fn paint_text_field(
        &mut self,
        id: u64,
        inner: Rect,
        value: &str,
        hint: &str,
        font_sp: f32,
        color: Color,
    ) {
        let th = theme();
        let size_px = sp_to_px(font_sp);
        let line_h = size_px * LINE_HEIGHT;
        let line = Rect {
            y: inner.y + ((inner.h - line_h) * 0.5).max(0.0),
            h: line_h,
            ..inner
        };

        let state = self
            .textfield_states
            .get(&id)
            .map(|s| s.borrow().clone())
            .filter(|s| s.text == value);

        self.scene.nodes.push(SceneNode::PushClip {
            rect: inner,
            radius: 0.0,
        });

        if value.is_empty() {
            self.scene.nodes.push(SceneNode::Text {
                rect: line,
                text: hint.to_string(),
                color: th.muted,
                size: size_px,
                weight: FontWeight::Normal,
            });
        } else {
            self.scene.nodes.push(SceneNode::Text {
                rect: line,
                text: value.to_string(),
                color,
                size: size_px,
                weight: FontWeight::Normal,
            });
        }

        let x_at = |byte: usize| {
            let prefix = value.get(..byte.min(value.len())).unwrap_or(value);
            inner.x + approx_text_width(prefix, size_px)
        };

        if let Some(range) = state.as_ref().and_then(|s| s.composition.clone()) {
            let (x0, x1) = (x_at(range.start), x_at(range.end));
            self.scene.nodes.push(SceneNode::Rect {
                rect: Rect {
                    x: x0,
                    y: line.y + line.h - dp_to_px(2.0),
                    w: (x1 - x0).max(0.0),
                    h: dp_to_px(2.0),
                },
                color: th.primary,
                radius: 0.0,
            });
        }

        if self.focused == Some(id) {
            let caret = state
                .as_ref()
                .map(|s| s.caret_index())
                .unwrap_or(value.len());
            self.scene.nodes.push(SceneNode::Rect {
                rect: Rect {
                    x: x_at(caret),
                    y: line.y,
                    w: dp_to_px(1.5),
                    h: line.h,
                },
                color: th.caret,
                radius: 0.0,
            });
        }

        self.scene.nodes.push(SceneNode::PopClip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;
    use std::cell::Cell;

    fn paint(root: &View) -> (Scene, Vec<HitRegion>, Vec<SemNode>) {
        layout_and_paint(root, (400, 800), &HashMap::new(), &Interactions::default(), None)
            .expect("layout")
    }

    fn rect_of_text(scene: &Scene, needle: &str) -> Option<Rect> {
        scene.nodes.iter().find_map(|n| match n {
            SceneNode::Text { rect, text, .. } if text == needle => Some(*rect),
            _ => None,
        })
    }

    #[test]
    fn column_stacks_children_with_spacing() {
        let root = Column(Modifier::new().fill_max_size().spaced_by(10.0)).child((
            Box(Modifier::new().height(50.0).background(Color::BLACK)),
            Text("below"),
        ));
        let (scene, _, _) = paint(&root);

        assert!(matches!(
            scene.nodes.first(),
            Some(SceneNode::Rect { rect, .. }) if rect.y == 0.0 && rect.h == 50.0 && rect.w == 400.0
        ));
        let below = rect_of_text(&scene, "below").expect("text painted");
        assert!(below.y >= 60.0);
    }

    #[test]
    fn weight_shares_remaining_row_space() {
        let root = Row(Modifier::new().fill_max_size()).child((
            Box(Modifier::new().width(100.0).background(Color::BLACK)),
            Box(Modifier::new().weight(1.0).background(Color::WHITE)),
        ));
        let (scene, _, _) = paint(&root);
        let widths: Vec<f32> = scene
            .nodes
            .iter()
            .filter_map(|n| match n {
                SceneNode::Rect { rect, .. } => Some(rect.w),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![100.0, 300.0]);
    }

    #[test]
    fn clickable_emits_hit_and_semantics_in_paint_order() {
        let clicks = Rc::new(Cell::new(0));
        let c = clicks.clone();
        let root = Column(Modifier::new().fill_max_size()).child(
            Column(
                Modifier::new()
                    .size(80.0, 100.0)
                    .clickable(move || c.set(c.get() + 1))
                    .semantics(Semantics::button("Flights")),
            )
            .child(Text("Flights")),
        );
        let (_, hits, sems) = paint(&root);

        let labelled: Vec<_> = sems
            .iter()
            .filter(|s| s.label.as_deref() == Some("Flights"))
            .map(|s| s.role)
            .collect();
        assert_eq!(labelled, vec![Role::Button, Role::Text]);

        let button = &sems[0];
        let hit = hits.iter().find(|h| h.id == button.id).expect("hit region");
        if let Some(cb) = &hit.on_click {
            cb();
        }
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn text_field_shows_hint_only_when_empty() {
        let empty = TextField("", "Choose your Date", Modifier::new().fill_max_width(), |_| {});
        let (scene, hits, _) = paint(&Column(Modifier::new()).child(empty));
        assert!(scene.texts().any(|(t, c, _)| t == "Choose your Date" && c == theme().muted));
        assert_eq!(hits.len(), 1);
        assert!(hits[0].focusable);

        let filled = TextField("12 Dec", "Choose your Date", Modifier::new(), |_| {});
        let (scene, _, _) = paint(&Column(Modifier::new()).child(filled));
        assert!(scene.texts().all(|(t, _, _)| t != "Choose your Date"));
        assert!(scene.texts().any(|(t, _, _)| t == "12 Dec"));
    }

    #[test]
    fn basic_text_field_sits_inside_its_container_padding() {
        let root = Column(Modifier::new()).child(
            Box(Modifier::new().size(300.0, 100.0).padding_hv(16.0, 12.0)).child(
                Row(Modifier::new()).child(BasicTextField(
                    "",
                    "Search Places",
                    Modifier::new().weight(1.0),
                    |_| {},
                )),
            ),
        );
        let (scene, hits, _) = paint(&root);
        let hint = rect_of_text(&scene, "Search Places").expect("hint painted");
        assert_eq!(hint.x, 16.0);
        assert_eq!(hint.y, 12.0);
        assert!((hint.h - 16.0 * LINE_HEIGHT).abs() < 0.01);
        assert_eq!(hits[0].rect.w, 268.0);
        assert_eq!(hits[0].text_inset, 0.0);

        let decorated = Column(Modifier::new()).child(TextField("", "To", Modifier::new(), |_| {}));
        let (_, hits, _) = paint(&decorated);
        assert_eq!(hits[0].text_inset, 12.0);
    }

    #[test]
    fn focused_text_field_draws_caret() {
        let root = Column(Modifier::new()).child(TextField("ab", "hint", Modifier::new(), |_| {}));
        let count_rects = |scene: &Scene| {
            scene
                .nodes
                .iter()
                .filter(|n| matches!(n, SceneNode::Rect { .. }))
                .count()
        };

        let (unfocused, hits, _) = paint(&root);
        let field_id = hits[0].id;
        let (focused, _, sems) = layout_and_paint(
            &root,
            (400, 800),
            &HashMap::new(),
            &Interactions::default(),
            Some(field_id),
        )
        .expect("layout");

        assert_eq!(count_rects(&focused), count_rects(&unfocused) + 1);
        assert!(sems.iter().any(|s| s.id == field_id && s.focused));
    }

    #[test]
    fn horizontal_scroll_clips_and_offsets_children() {
        let state = Rc::new(ScrollState::new());
        let cards = Row(Modifier::new().spaced_by(16.0)).child(
            (0..4)
                .map(|i| {
                    Box(Modifier::new().size(200.0, 100.0))
                        .child(Text(format!("card {i}")))
                })
                .collect::<Vec<_>>(),
        );
        let root = Column(Modifier::new().fill_max_size()).child(HorizontalScroll(
            Modifier::new().fill_max_width(),
            state.clone(),
            cards,
        ));

        let (scene, hits, _) = paint(&root);
        // 4 * 200 + 3 * 16
        assert_eq!(state.scroll_by(10_000.0), 10_000.0 - (848.0 - 400.0));
        assert!(matches!(scene.nodes.first(), Some(SceneNode::PushClip { .. })));
        assert!(hits.iter().any(|h| h.on_scroll.is_some()));

        let (scene, _, _) = paint(&root);
        let first = rect_of_text(&scene, "card 0").expect("card painted");
        assert_eq!(first.x, -448.0);
    }

    #[test]
    fn scroll_hit_regions_are_clipped_to_viewport() {
        let root = Column(Modifier::new().fill_max_size()).child(VerticalScroll(
            Modifier::new().height(100.0),
            Rc::new(ScrollState::new()),
            Column(Modifier::new()).child((
                Box(Modifier::new().height(80.0).clickable(|| {})),
                Box(Modifier::new().height(80.0).clickable(|| {})),
                Box(Modifier::new().height(80.0).clickable(|| {})),
            )),
        ));
        let (_, hits, _) = paint(&root);
        let clickable: Vec<Rect> = hits
            .iter()
            .filter(|h| h.on_click.is_some())
            .map(|h| h.rect)
            .collect();
        assert_eq!(clickable.len(), 2);
        assert_eq!(clickable[1].h, 20.0);
    }

    #[test]
    fn button_defaults_to_primary_background() {
        let root = Column(Modifier::new()).child(Button(
            "Search Flight",
            Modifier::new().fill_max_width().height(50.0),
            || {},
        ));
        let (scene, hits, _) = paint(&root);
        assert!(matches!(
            scene.nodes.first(),
            Some(SceneNode::Rect { color, radius, .. }) if *color == theme().primary && *radius == 12.0
        ));
        assert!(hits.iter().any(|h| h.focusable && h.on_click.is_some()));
        assert!(
            scene
                .texts()
                .any(|(t, c, w)| t == "Search Flight" && c == Color::WHITE && w == FontWeight::Bold)
        );
    }
}
