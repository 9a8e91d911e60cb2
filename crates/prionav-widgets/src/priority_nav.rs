#![forbid(unsafe_code)]

//! Priority navigation row.
//!
//! [`PriorityNav`] lays out the visible items left to right, followed by the
//! overflow trigger when anything has overflowed. The overflowed items are
//! drawn in a popup below the trigger while the [`Toggle`] is open.
//!
//! Which items are visible is decided by the overflow engine, driven through
//! [`NavShell`], the [`FitShell`] this widget provides to the runtime. Every
//! commit produces a [`RowLayout`], which is both what [`PriorityNav`]
//! renders and the measurement the engine reads.
//!
//! # Layout
//!
//! ```text
//! |Home␣␣|␣␣Blog␣␣|␣≡␣|         container_width
//! ^ first item has no left padding
//!                  ^ trigger counts toward row_width
//! ```
//!
//! - Item width is `label + item_spacing` for the first item and
//!   `item_spacing + label + item_spacing` for the rest.
//! - Container width is `max(width, min_container_width)`.
//! - The popup's top-left corner is the trigger's bottom-left corner.
//!
//! Spacing and the width floor come from the runtime's [`NavConfig`], handed
//! to every commit. Nothing is drawn until the first commit.
//!
//! # Example
//!
//! ```
//! use prionav_core::geometry::Rect;
//! use prionav_render::buffer::Buffer;
//! use prionav_runtime::{NavConfig, NavRuntime};
//! use prionav_widgets::{NavItem, NavState, PriorityNav, StatefulWidget};
//!
//! let nav = PriorityNav::new(NavItem::sequence(["Home", "Blog", "About"]));
//! let mut state = NavState::default();
//! let config = NavConfig::default().with_item_spacing(1);
//! let mut runtime = NavRuntime::new(nav.ids(), config);
//!
//! runtime.mount(30, &mut nav.shell(&mut state));
//!
//! let mut buf = Buffer::new(30, 4);
//! nav.render(Rect::new(0, 0, 30, 1), &mut buf, &mut state);
//! assert!(runtime.overflow().is_empty());
//! ```

use std::collections::HashMap;
use std::fmt;

use prionav_core::event::Event;
use prionav_core::geometry::Rect;
use prionav_core::item::ItemId;
use prionav_layout::{Measure, MeasureError, WidthLedger};
use prionav_render::buffer::Buffer;
use prionav_render::style::Style;
use prionav_render::{display_width, width_u16};
use prionav_runtime::{FitShell, MAX_ITEM_SPACING, NavConfig};

use crate::dropdown::{DropdownList, OverflowRenderer};
use crate::toggle::{IconRenderer, IconSettings, Toggle, ToggleButton};
use crate::{StatefulWidget, draw_text_span, set_style_area};

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    id: ItemId,
    label: String,
}

impl NavItem {
    /// Item with an explicit id.
    #[must_use]
    pub fn new(id: ItemId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// Item whose id is derived from its label.
    ///
    /// Two items with the same label get the same id; [`PriorityNav::new`]
    /// keeps only the first of them.
    #[must_use]
    pub fn keyed(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            id: ItemId::from_key(label.as_str()),
            label,
        }
    }

    /// Items with ids assigned by position.
    #[must_use]
    pub fn sequence<I, S>(labels: I) -> Vec<NavItem>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| NavItem::new(ItemId::from_index(i), label))
            .collect()
    }

    /// Stable identity.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Display text.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    fn label_width(&self) -> u16 {
        width_u16(display_width(&self.label))
    }
}

/// Where one visible item landed in the row, relative to the row origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSlot {
    /// Item identity.
    pub id: ItemId,
    /// Left edge of the padded item.
    pub x: u16,
    /// Padded width; this is the width the engine sees.
    pub width: u16,
    /// Left edge of the label.
    pub label_x: u16,
    /// Label width.
    pub label_width: u16,
}

/// A committed row: what gets rendered and what the engine measures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowLayout {
    container_width: Option<u16>,
    row_width: u16,
    slots: Vec<ItemSlot>,
    trigger: Option<(u16, u16)>,
    overflow: Vec<ItemId>,
    widths: WidthLedger,
}

impl RowLayout {
    /// Whether this layout came from a commit.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.container_width.is_some()
    }

    /// Visible items in order.
    #[must_use]
    pub fn slots(&self) -> &[ItemSlot] {
        &self.slots
    }

    /// Trigger `(x, width)` relative to the row origin, if drawn.
    #[must_use]
    pub fn trigger_span(&self) -> Option<(u16, u16)> {
        self.trigger
    }

    /// Overflowed items in order.
    #[must_use]
    pub fn overflow(&self) -> &[ItemId] {
        &self.overflow
    }

    /// Widths registered by this commit, keyed by item.
    #[must_use]
    pub fn widths(&self) -> &WidthLedger {
        &self.widths
    }
}

impl Measure for RowLayout {
    fn container_width(&self) -> Result<u16, MeasureError> {
        self.container_width.ok_or(MeasureError::NotMounted)
    }

    fn row_width(&self) -> Result<u16, MeasureError> {
        if self.container_width.is_none() {
            return Err(MeasureError::NotMounted);
        }
        Ok(self.row_width)
    }

    fn item_width(&self, id: ItemId) -> Result<u16, MeasureError> {
        self.widths.get(id).ok_or(MeasureError::MissingItem(id))
    }
}

/// Result of a pointer press on the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavHit {
    /// A visible item.
    Item(ItemId),
    /// The overflow trigger; the popup was toggled.
    Trigger,
    /// A row in the open popup.
    OverflowItem(ItemId),
}

/// Per-instance state: popup toggle, the committed layout, and where
/// things were last drawn.
#[derive(Debug, Clone, Default)]
pub struct NavState {
    toggle: Toggle,
    layout: RowLayout,
    ledger: WidthLedger,
    item_areas: Vec<(ItemId, Rect)>,
    trigger_area: Option<Rect>,
    popup_area: Option<Rect>,
    popup_rows: Vec<(ItemId, Rect)>,
    commits: u64,
}

impl NavState {
    /// Popup toggle.
    #[must_use]
    pub fn toggle(&self) -> &Toggle {
        &self.toggle
    }

    /// Open or close the popup. Ignored while nothing overflows.
    pub fn toggle_popup(&mut self) {
        if !self.layout.overflow.is_empty() {
            self.toggle.toggle();
        }
    }

    /// Last committed layout.
    #[must_use]
    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    /// Number of commits so far.
    #[must_use]
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Trigger area from the last render.
    #[must_use]
    pub fn trigger_area(&self) -> Option<Rect> {
        self.trigger_area
    }

    /// Popup area from the last render.
    #[must_use]
    pub fn popup_area(&self) -> Option<Rect> {
        self.popup_area
    }

    /// Popup rows from the last render, keyed by item.
    #[must_use]
    pub fn popup_rows(&self) -> &[(ItemId, Rect)] {
        &self.popup_rows
    }

    /// Visible item areas from the last render.
    #[must_use]
    pub fn item_areas(&self) -> &[(ItemId, Rect)] {
        &self.item_areas
    }

    /// What sits under `(x, y)` in the last render.
    #[must_use]
    pub fn hit_test(&self, x: u16, y: u16) -> Option<NavHit> {
        if let Some((id, _)) = self.popup_rows.iter().find(|(_, r)| r.contains(x, y)) {
            return Some(NavHit::OverflowItem(*id));
        }
        if self.trigger_area.is_some_and(|r| r.contains(x, y)) {
            return Some(NavHit::Trigger);
        }
        self.item_areas
            .iter()
            .find(|(_, r)| r.contains(x, y))
            .map(|(id, _)| NavHit::Item(*id))
    }

    /// Feed a pointer event. Hover and trigger clicks update the toggle;
    /// any left press reports what it landed on.
    pub fn handle_event(&mut self, event: &Event) -> Option<NavHit> {
        let Event::Mouse(mouse) = event else {
            return None;
        };
        if self.toggle.handle_event(event, self.trigger_area) {
            return Some(NavHit::Trigger);
        }
        if !mouse.is_left_press() {
            return None;
        }
        let (x, y) = mouse.position();
        self.hit_test(x, y)
    }

    fn commit(&mut self, layout: RowLayout) {
        self.toggle.sync(!layout.overflow.is_empty());
        if layout.overflow.is_empty() {
            self.popup_area = None;
            self.popup_rows.clear();
        }
        self.layout = layout;
        self.commits += 1;
    }

    fn clear_areas(&mut self) {
        self.item_areas.clear();
        self.trigger_area = None;
        self.popup_area = None;
        self.popup_rows.clear();
    }
}

/// Priority navigation bar.
pub struct PriorityNav {
    items: Vec<NavItem>,
    index: HashMap<ItemId, usize>,
    container_style: Style,
    row_style: Style,
    icon_settings: IconSettings,
    icon_renderer: Box<dyn IconRenderer>,
    overflow_renderer: Box<dyn OverflowRenderer>,
}

impl fmt::Debug for PriorityNav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityNav")
            .field("items", &self.items)
            .field("container_style", &self.container_style)
            .field("row_style", &self.row_style)
            .field("icon_settings", &self.icon_settings)
            .finish_non_exhaustive()
    }
}

impl PriorityNav {
    /// Navigation bar over `items` in priority order.
    ///
    /// Ids must be unique: an item whose id was already seen is dropped.
    #[must_use]
    pub fn new(items: Vec<NavItem>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());
        for item in items {
            if index.contains_key(&item.id) {
                prionav_core::debug!(
                    target: "prionav.nav",
                    item = item.id.get(),
                    label = item.label.as_str(),
                    "duplicate item id dropped"
                );
                continue;
            }
            index.insert(item.id, unique.len());
            unique.push(item);
        }
        Self {
            items: unique,
            index,
            container_style: Style::default(),
            row_style: Style::default(),
            icon_settings: IconSettings::default(),
            icon_renderer: Box::new(ToggleButton),
            overflow_renderer: Box::new(DropdownList::default()),
        }
    }

    /// Style for the whole container.
    #[must_use]
    pub fn container_style(mut self, style: Style) -> Self {
        self.container_style = style;
        self
    }

    /// Style for the row of items and the trigger.
    #[must_use]
    pub fn row_style(mut self, style: Style) -> Self {
        self.row_style = style;
        self
    }

    /// Appearance passed to the icon renderer.
    #[must_use]
    pub fn icon_settings(mut self, settings: IconSettings) -> Self {
        self.icon_settings = settings;
        self
    }

    /// Replace the trigger visual.
    #[must_use]
    pub fn icon_renderer(mut self, renderer: impl IconRenderer + 'static) -> Self {
        self.icon_renderer = Box::new(renderer);
        self
    }

    /// Replace the popup.
    #[must_use]
    pub fn overflow_renderer(mut self, renderer: impl OverflowRenderer + 'static) -> Self {
        self.overflow_renderer = Box::new(renderer);
        self
    }

    /// Items in priority order.
    #[must_use]
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Item ids in priority order, ready for the runtime.
    #[must_use]
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(NavItem::id).collect()
    }

    /// Look an item up by id.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&NavItem> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    /// Cells the trigger occupies when drawn.
    #[must_use]
    pub fn trigger_width(&self) -> u16 {
        self.icon_renderer.width(&self.icon_settings)
    }

    /// Adapter the runtime drives commits through.
    pub fn shell<'a>(&'a self, state: &'a mut NavState) -> NavShell<'a> {
        NavShell { nav: self, state }
    }

    /// Lay `visible` out in a container `container_width` wide, with the
    /// trigger after it when `overflow` is non-empty. Spacing and the width
    /// floor come from `config`.
    ///
    /// Ids with no matching item are skipped and get no width.
    pub fn layout(
        &self,
        config: &NavConfig,
        container_width: u16,
        visible: &[ItemId],
        overflow: &[ItemId],
        ledger: &mut WidthLedger,
    ) -> RowLayout {
        ledger.begin_pass();
        let spacing = u32::from(config.item_spacing.min(MAX_ITEM_SPACING));
        let mut x: u32 = 0;
        let mut slots = Vec::with_capacity(visible.len());

        for &id in visible {
            let Some(item) = self.item(id) else {
                continue;
            };
            let left = if slots.is_empty() { 0 } else { spacing };
            let label_width = item.label_width();
            let width = clamp_u16(left + u32::from(label_width) + spacing);
            slots.push(ItemSlot {
                id,
                x: clamp_u16(x),
                width,
                label_x: clamp_u16(x + left),
                label_width,
            });
            ledger.record(id, width);
            x += u32::from(width);
        }

        let trigger = if overflow.is_empty() {
            None
        } else {
            let width = self.trigger_width();
            let span = (clamp_u16(x), width);
            x += u32::from(width);
            Some(span)
        };

        RowLayout {
            container_width: Some(config.effective_container_width(container_width)),
            row_width: clamp_u16(x),
            slots,
            trigger,
            overflow: overflow.to_vec(),
            widths: ledger.clone(),
        }
    }
}

fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

impl StatefulWidget for PriorityNav {
    type State = NavState;

    fn render(&self, area: Rect, buf: &mut Buffer, state: &mut NavState) {
        state.clear_areas();
        if area.is_empty() || !state.layout.is_committed() {
            return;
        }

        let layout = &state.layout;
        let container_width = layout.container_width.unwrap_or(area.width);
        let container = Rect::new(area.x, area.y, container_width, area.height)
            .intersection(&buf.bounds());
        if container.is_empty() {
            return;
        }
        set_style_area(buf, container, self.container_style);

        let row = Rect::new(area.x, area.y, layout.row_width, 1).intersection(&container);
        set_style_area(buf, row, self.row_style);

        let max_x = container.right();
        for slot in &layout.slots {
            let slot_area = Rect::new(area.x.saturating_add(slot.x), area.y, slot.width, 1)
                .intersection(&container);
            if slot_area.is_empty() {
                continue;
            }
            if let Some(item) = self.item(slot.id) {
                draw_text_span(
                    buf,
                    area.x.saturating_add(slot.label_x),
                    area.y,
                    item.label(),
                    self.row_style,
                    max_x,
                );
            }
            state.item_areas.push((slot.id, slot_area));
        }

        let Some((trigger_x, trigger_width)) = layout.trigger else {
            return;
        };
        let trigger_area = Rect::new(area.x.saturating_add(trigger_x), area.y, trigger_width, 1)
            .intersection(&container);
        if trigger_area.is_empty() {
            return;
        }
        self.icon_renderer
            .render(trigger_area, buf, &self.icon_settings, &state.toggle);
        state.trigger_area = Some(trigger_area);

        if !state.toggle.is_open() {
            return;
        }
        let items: Vec<&NavItem> = layout
            .overflow
            .iter()
            .filter_map(|&id| self.item(id))
            .collect();
        let (width, height) = self.overflow_renderer.size(&items);
        let popup = Rect::new(trigger_area.x, trigger_area.bottom(), width, height)
            .intersection(&buf.bounds());
        if popup.is_empty() {
            return;
        }
        state.popup_rows = self.overflow_renderer.render(popup, buf, &items);
        state.popup_area = Some(popup);
    }
}

/// [`FitShell`] over a [`PriorityNav`] and its [`NavState`].
///
/// Each commit lays the row out, stores it in the state for the next
/// render, and hands it to the engine as the measurement.
pub struct NavShell<'a> {
    nav: &'a PriorityNav,
    state: &'a mut NavState,
}

impl FitShell for NavShell<'_> {
    type Measurement = RowLayout;

    fn commit(
        &mut self,
        config: &NavConfig,
        container_width: u16,
        visible: &[ItemId],
        overflow: &[ItemId],
    ) -> Option<RowLayout> {
        let layout = self.nav.layout(
            config,
            container_width,
            visible,
            overflow,
            &mut self.state.ledger,
        );
        prionav_core::debug!(
            target: "prionav.nav",
            visible = visible.len(),
            overflow = overflow.len(),
            row_width = layout.row_width,
            "commit"
        );
        self.state.commit(layout.clone());
        Some(layout)
    }
}
