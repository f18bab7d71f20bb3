//! Tooltips for bound elements.
//!
//! A tooltip is driven by a [`TooltipTarget`] snapshot of the element it
//! decorates. Each variant implements [`Tooltip`]; richer variants wrap a
//! simpler one and delegate to it instead of re-implementing it:
//!
//! - [`PlainTooltip`] shows the element's title.
//! - [`HideableTooltip`] adds an explicit hide switch and can restrict itself
//!   to elements whose text is cut off.
//! - [`ContainerTooltip`] follows the hovered child of a container.
//! - [`SelectTooltip`] shows the selected option of a drop-down.
//!
//! Placement flips to the opposite side when the preferred side lacks room.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Side of the anchor the tooltip sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Above,
    #[default]
    Below,
    Left,
    Right,
}

impl Placement {
    fn flip(self) -> Self {
        match self {
            Self::Above => Self::Below,
            Self::Below => Self::Above,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, Self::Above | Self::Below)
    }
}

/// Sizing used to lay out tooltip text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipStyle {
    pub char_width: f64,
    pub line_height: f64,
    pub padding: f64,
    /// Distance between anchor and tooltip.
    pub gap: f64,
    pub max_width: f64,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 18.0,
            padding: 4.0,
            gap: 4.0,
            max_width: 320.0,
        }
    }
}

impl TooltipStyle {
    /// Box size for `text`, wrapping at `max_width`.
    #[allow(clippy::cast_precision_loss)]
    pub fn measure(&self, text: &str) -> (f64, f64) {
        let inner_max = (self.max_width - 2.0 * self.padding).max(self.char_width);
        let per_line = (inner_max / self.char_width).floor().max(1.0);
        let mut width: f64 = 0.0;
        let mut lines = 0.0;
        for line in text.lines() {
            let chars = line.chars().count() as f64;
            width = width.max(chars.min(per_line) * self.char_width);
            lines += (chars / per_line).ceil().max(1.0);
        }
        (
            width + 2.0 * self.padding,
            lines.max(1.0) * self.line_height + 2.0 * self.padding,
        )
    }
}

/// A child element inside a container target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildTarget {
    pub title: Option<String>,
    pub rect: Rect,
}

/// What the host knows about the decorated element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipTarget {
    /// Bound title text; blank means no tooltip.
    pub title: Option<String>,
    pub rect: Rect,
    /// Width the element's content would need without clipping.
    pub content_width: f64,
    pub disabled: bool,
    /// Child under the pointer, for container targets.
    pub hovered_child: Option<ChildTarget>,
    /// Text of the selected option, for drop-downs.
    pub selected_option: Option<String>,
}

impl TooltipTarget {
    pub fn is_truncated(&self) -> bool {
        self.content_width > self.rect.width
    }
}

/// Output for the host to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TooltipView {
    pub visible: bool,
    pub text: String,
    /// Where to draw the tooltip; `None` while hidden.
    pub area: Option<Rect>,
    pub placement: Placement,
}

pub trait Tooltip {
    /// Resolve and remember the text to show, if any.
    fn handle_title_resolution(&mut self, target: &TooltipTarget) -> Option<String>;

    /// Whether the tooltip should be shown for `target` given the last
    /// resolved title.
    fn check_visible(&self, target: &TooltipTarget) -> bool;

    /// Resolve, decide visibility and lay out within `viewport`.
    fn update_elements(&mut self, target: &TooltipTarget, viewport: Rect) -> TooltipView;
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Position a `size` box next to `anchor`, flipping when the preferred side
/// has no room and clamping into `viewport`.
pub fn place(
    anchor: Rect,
    size: (f64, f64),
    viewport: Rect,
    preferred: Placement,
    gap: f64,
) -> (Rect, Placement) {
    let (w, h) = size;
    let available = |p: Placement| match p {
        Placement::Above => anchor.y - viewport.y,
        Placement::Below => viewport.bottom() - anchor.bottom(),
        Placement::Left => anchor.x - viewport.x,
        Placement::Right => viewport.right() - anchor.right(),
    };
    let needed = |p: Placement| if p.is_vertical() { h + gap } else { w + gap };

    let placement = if available(preferred) >= needed(preferred) {
        preferred
    } else {
        let flipped = preferred.flip();
        if available(flipped) >= needed(flipped) || available(flipped) > available(preferred) {
            flipped
        } else {
            preferred
        }
    };

    let clamp_x = |x: f64| x.min(viewport.right() - w).max(viewport.x);
    let clamp_y = |y: f64| y.min(viewport.bottom() - h).max(viewport.y);
    let (x, y) = match placement {
        Placement::Above => (clamp_x(anchor.x), anchor.y - gap - h),
        Placement::Below => (clamp_x(anchor.x), anchor.bottom() + gap),
        Placement::Left => (anchor.x - gap - w, clamp_y(anchor.y)),
        Placement::Right => (anchor.right() + gap, clamp_y(anchor.y)),
    };
    (Rect::new(x, y, w, h), placement)
}

/// Build the view for a resolved title, shared by every variant.
fn layout_view(
    visible: bool,
    title: Option<&str>,
    anchor: Rect,
    viewport: Rect,
    placement: Placement,
    style: &TooltipStyle,
) -> TooltipView {
    match title {
        Some(text) if visible => {
            let (area, placement) = place(
                anchor,
                style.measure(text),
                viewport,
                placement,
                style.gap,
            );
            TooltipView {
                visible: true,
                text: text.to_string(),
                area: Some(area),
                placement,
            }
        }
        _ => TooltipView {
            placement,
            ..TooltipView::default()
        },
    }
}

/// Shows the element's own title.
#[derive(Debug, Clone, Default)]
pub struct PlainTooltip {
    pub placement: Placement,
    pub style: TooltipStyle,
    title: Option<String>,
}

impl PlainTooltip {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            ..Self::default()
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn view_for(&self, visible: bool, anchor: Rect, viewport: Rect) -> TooltipView {
        layout_view(
            visible,
            self.title.as_deref(),
            anchor,
            viewport,
            self.placement,
            &self.style,
        )
    }

    fn remember(&mut self, title: Option<String>) -> Option<String> {
        if self.title != title {
            tracing::trace!(title = ?title, "tooltip title changed");
        }
        self.title = title;
        self.title.clone()
    }
}

impl Tooltip for PlainTooltip {
    fn handle_title_resolution(&mut self, target: &TooltipTarget) -> Option<String> {
        self.remember(non_blank(target.title.as_deref()))
    }

    fn check_visible(&self, target: &TooltipTarget) -> bool {
        !target.disabled && self.title.is_some()
    }

    fn update_elements(&mut self, target: &TooltipTarget, viewport: Rect) -> TooltipView {
        self.handle_title_resolution(target);
        let visible = self.check_visible(target);
        self.view_for(visible, target.rect, viewport)
    }
}

/// A plain tooltip that can be switched off, or limited to clipped text.
#[derive(Debug, Clone, Default)]
pub struct HideableTooltip {
    base: PlainTooltip,
    hidden: bool,
    only_when_truncated: bool,
}

impl HideableTooltip {
    pub fn new(placement: Placement) -> Self {
        Self {
            base: PlainTooltip::new(placement),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn only_when_truncated(mut self, on: bool) -> Self {
        self.only_when_truncated = on;
        self
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn title(&self) -> Option<&str> {
        self.base.title()
    }
}

impl Tooltip for HideableTooltip {
    fn handle_title_resolution(&mut self, target: &TooltipTarget) -> Option<String> {
        self.base.handle_title_resolution(target)
    }

    fn check_visible(&self, target: &TooltipTarget) -> bool {
        !self.hidden
            && self.base.check_visible(target)
            && (!self.only_when_truncated || target.is_truncated())
    }

    fn update_elements(&mut self, target: &TooltipTarget, viewport: Rect) -> TooltipView {
        self.handle_title_resolution(target);
        let visible = self.check_visible(target);
        self.base.view_for(visible, target.rect, viewport)
    }
}

/// Follows the hovered child of a container, anchoring to that child.
#[derive(Debug, Clone, Default)]
pub struct ContainerTooltip {
    base: HideableTooltip,
}

impl ContainerTooltip {
    pub fn new(placement: Placement) -> Self {
        Self {
            base: HideableTooltip::new(placement),
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.base.set_hidden(hidden);
    }
}

impl Tooltip for ContainerTooltip {
    /// The hovered child's title wins over the container's own.
    fn handle_title_resolution(&mut self, target: &TooltipTarget) -> Option<String> {
        let child = target
            .hovered_child
            .as_ref()
            .and_then(|c| non_blank(c.title.as_deref()));
        match child {
            Some(title) => self.base.base.remember(Some(title)),
            None => self.base.handle_title_resolution(target),
        }
    }

    fn check_visible(&self, target: &TooltipTarget) -> bool {
        target.hovered_child.is_some() && self.base.check_visible(target)
    }

    fn update_elements(&mut self, target: &TooltipTarget, viewport: Rect) -> TooltipView {
        self.handle_title_resolution(target);
        let visible = self.check_visible(target);
        let anchor = target.hovered_child.as_ref().map_or(target.rect, |c| c.rect);
        self.base.base.view_for(visible, anchor, viewport)
    }
}

/// Shows the selected option of a drop-down whose text is cut off.
#[derive(Debug, Clone)]
pub struct SelectTooltip {
    base: HideableTooltip,
}

impl Default for SelectTooltip {
    fn default() -> Self {
        Self::new(Placement::default())
    }
}

impl SelectTooltip {
    pub fn new(placement: Placement) -> Self {
        Self {
            base: HideableTooltip::new(placement).only_when_truncated(true),
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.base.set_hidden(hidden);
    }
}

impl Tooltip for SelectTooltip {
    fn handle_title_resolution(&mut self, target: &TooltipTarget) -> Option<String> {
        match non_blank(target.selected_option.as_deref()) {
            Some(text) => self.base.base.remember(Some(text)),
            None => self.base.handle_title_resolution(target),
        }
    }

    fn check_visible(&self, target: &TooltipTarget) -> bool {
        self.base.check_visible(target)
    }

    fn update_elements(&mut self, target: &TooltipTarget, viewport: Rect) -> TooltipView {
        self.handle_title_resolution(target);
        let visible = self.check_visible(target);
        self.base.base.view_for(visible, target.rect, viewport)
    }
}

/// Variant tag used by bindings to pick a tooltip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipKind {
    #[default]
    Plain,
    Hideable,
    Container,
    Select,
}

impl TooltipKind {
    pub fn build(self, placement: Placement) -> Box<dyn Tooltip> {
        match self {
            Self::Plain => Box::new(PlainTooltip::new(placement)),
            Self::Hideable => Box::new(HideableTooltip::new(placement)),
            Self::Container => Box::new(ContainerTooltip::new(placement)),
            Self::Select => Box::new(SelectTooltip::new(placement)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 800.0,
        height: 600.0,
    };

    fn target(title: &str) -> TooltipTarget {
        TooltipTarget {
            title: Some(title.to_string()),
            rect: Rect::new(100.0, 100.0, 120.0, 20.0),
            content_width: 80.0,
            ..TooltipTarget::default()
        }
    }

    #[test]
    fn test_plain_shows_title_below() {
        let mut tip = TooltipKind::Plain.build(Placement::Below);
        let view = tip.update_elements(&target("Save"), VIEWPORT);
        assert!(view.visible);
        assert_eq!(view.text, "Save");
        assert_eq!(view.placement, Placement::Below);
        assert_eq!(view.area.unwrap().y, 124.0);
    }

    #[test]
    fn test_blank_title_is_hidden() {
        let mut tip = PlainTooltip::new(Placement::Below);
        let view = tip.update_elements(&target("   "), VIEWPORT);
        assert!(!view.visible);
        assert!(view.area.is_none());
    }

    #[test]
    fn test_flips_when_no_room_below() {
        let mut t = target("Bottom");
        t.rect.y = 590.0;
        let mut tip = PlainTooltip::new(Placement::Below);
        let view = tip.update_elements(&t, VIEWPORT);
        assert_eq!(view.placement, Placement::Above);
        assert!(view.area.unwrap().bottom() <= 590.0);
    }

    #[test]
    fn test_hideable_switch_and_truncation() {
        let mut tip = HideableTooltip::new(Placement::Below);
        tip.set_hidden(true);
        assert!(!tip.update_elements(&target("x"), VIEWPORT).visible);
        tip.set_hidden(false);
        assert!(tip.update_elements(&target("x"), VIEWPORT).visible);

        let mut clipped_only = HideableTooltip::new(Placement::Below).only_when_truncated(true);
        assert!(!clipped_only.update_elements(&target("x"), VIEWPORT).visible);
        let mut t = target("x");
        t.content_width = 500.0;
        assert!(clipped_only.update_elements(&t, VIEWPORT).visible);
    }

    #[test]
    fn test_container_follows_hovered_child() {
        let mut tip = ContainerTooltip::new(Placement::Right);
        let mut t = target("container");
        assert!(!tip.update_elements(&t, VIEWPORT).visible);

        t.hovered_child = Some(ChildTarget {
            title: Some("child".into()),
            rect: Rect::new(300.0, 200.0, 50.0, 20.0),
        });
        let view = tip.update_elements(&t, VIEWPORT);
        assert_eq!(view.text, "child");
        assert_eq!(view.area.unwrap().x, 354.0);
    }

    #[test]
    fn test_select_shows_truncated_option() {
        let mut tip = TooltipKind::Select.build(Placement::Below);
        let mut t = target("");
        t.selected_option = Some("A very long option label".into());
        assert!(!tip.update_elements(&t, VIEWPORT).visible);
        t.content_width = 300.0;
        let view = tip.update_elements(&t, VIEWPORT);
        assert!(view.visible);
        assert_eq!(view.text, "A very long option label");
    }

    #[test]
    fn test_measure_wraps_long_text() {
        let style = TooltipStyle::default();
        let (w, h) = style.measure(&"x".repeat(100));
        assert!(w <= style.max_width);
        assert!(h > style.line_height + 2.0 * style.padding);
    }
}
