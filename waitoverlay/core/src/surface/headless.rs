//! Headless Surface
//!
//! An in-memory [`Surface`] with a virtual clock. Element trees, timers,
//! repaint ticks, transition listeners and fetches are all simulated; the
//! host decides when each deferred effect happens and collects the resulting
//! [`OverlayEvent`]s with [`HeadlessSurface::take_events`].
//!
//! Used by the test suite and the demo binary.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt::Write as _;
use std::time::Duration;

use super::{
    ContainerId, ContainerMetrics, ElementId, FetchError, FetchHandle, FrameHandle,
    ObserverHandle, Surface, TimerHandle,
};
use crate::engine::WaitOverlay;
use crate::events::OverlayEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Container(ContainerId),
    Element(ElementId),
}

/// One simulated element
#[derive(Debug, Clone, Default)]
pub struct HeadlessElement {
    parent: Option<Parent>,
    children: Vec<ElementId>,
    styles: BTreeMap<String, String>,
    classes: Vec<String>,
    text: Option<String>,
    markup: Option<String>,
    markup_root_styles: BTreeMap<String, String>,
    markup_descendant_styles: BTreeMap<String, String>,
}

impl HeadlessElement {
    /// Value of a style property
    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    /// All style properties, sorted by name
    #[must_use]
    pub fn styles(&self) -> &BTreeMap<String, String> {
        &self.styles
    }

    /// Class names in insertion order
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Plain text content, if set
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Markup content, if set
    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// Style applied to the markup's vector root
    #[must_use]
    pub fn markup_root_style(&self, property: &str) -> Option<&str> {
        self.markup_root_styles.get(property).map(String::as_str)
    }

    /// Style applied to every markup descendant
    #[must_use]
    pub fn markup_descendant_style(&self, property: &str) -> Option<&str> {
        self.markup_descendant_styles.get(property).map(String::as_str)
    }

    /// Child elements in order
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

#[derive(Debug, Clone, Default)]
struct HeadlessContainer {
    metrics: ContainerMetrics,
    children: Vec<ElementId>,
}

/// In-memory surface driven by a virtual clock
#[derive(Debug)]
pub struct HeadlessSurface {
    page_root: ContainerId,
    viewport: (f64, f64),
    containers: BTreeMap<ContainerId, HeadlessContainer>,
    elements: HashMap<ElementId, HeadlessElement>,
    observers: BTreeMap<ObserverHandle, ContainerId>,
    frames: BTreeSet<FrameHandle>,
    timers: BTreeMap<TimerHandle, Duration>,
    transition_listeners: BTreeSet<ElementId>,
    fetches: BTreeMap<FetchHandle, String>,
    events: VecDeque<OverlayEvent>,
    now: Duration,
    next_id: u64,
}

impl HeadlessSurface {
    /// Create a surface whose page root fills a viewport of `(width, height)`
    #[must_use]
    pub fn new(viewport: (f64, f64)) -> Self {
        let page_root = ContainerId::from_raw(0);
        let mut containers = BTreeMap::new();
        containers.insert(
            page_root,
            HeadlessContainer {
                metrics: ContainerMetrics::uniform(viewport.0, viewport.1),
                children: Vec::new(),
            },
        );
        Self {
            page_root,
            viewport,
            containers,
            elements: HashMap::new(),
            observers: BTreeMap::new(),
            frames: BTreeSet::new(),
            timers: BTreeMap::new(),
            transition_listeners: BTreeSet::new(),
            fetches: BTreeMap::new(),
            events: VecDeque::new(),
            now: Duration::ZERO,
            next_id: 1,
        }
    }

    fn next_raw(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register a host container
    pub fn add_container(&mut self, metrics: ContainerMetrics) -> ContainerId {
        let id = ContainerId::from_raw(self.next_raw());
        self.containers.insert(
            id,
            HeadlessContainer {
                metrics,
                children: Vec::new(),
            },
        );
        id
    }

    /// Change a container's size, notifying its observers
    pub fn set_container_size(&mut self, container: ContainerId, metrics: ContainerMetrics) {
        let Some(entry) = self.containers.get_mut(&container) else {
            return;
        };
        entry.metrics = metrics;
        if self.observers.values().any(|c| *c == container) {
            self.events
                .push_back(OverlayEvent::ContainerResized(container));
        }
    }

    /// Change the viewport size (the page root follows)
    pub fn set_viewport(&mut self, viewport: (f64, f64)) {
        self.viewport = viewport;
        let page_root = self.page_root;
        self.set_container_size(page_root, ContainerMetrics::uniform(viewport.0, viewport.1));
    }

    /// Drop a container together with everything attached to it
    pub fn remove_container(&mut self, container: ContainerId) {
        let Some(entry) = self.containers.remove(&container) else {
            return;
        };
        for child in entry.children {
            self.drop_subtree(child);
        }
        self.events
            .push_back(OverlayEvent::ContainerRemoved(container));
    }

    /// Elements attached directly to a container
    #[must_use]
    pub fn container_children(&self, container: ContainerId) -> &[ElementId] {
        self.containers
            .get(&container)
            .map(|c| c.children.as_slice())
            .unwrap_or_default()
    }

    /// Look up an element
    #[must_use]
    pub fn element(&self, element: ElementId) -> Option<&HeadlessElement> {
        self.elements.get(&element)
    }

    /// Style property of an element
    #[must_use]
    pub fn style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.elements.get(&element).and_then(|e| e.style(property))
    }

    /// Number of live elements
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Fire every pending repaint tick
    pub fn run_frames(&mut self) {
        for frame in std::mem::take(&mut self.frames) {
            self.events.push_back(OverlayEvent::FrameReady(frame));
        }
    }

    /// Move the virtual clock forward, firing every timer that falls due
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
        let mut due: Vec<(Duration, TimerHandle)> = self
            .timers
            .iter()
            .filter(|(_, at)| **at <= self.now)
            .map(|(handle, at)| (*at, *handle))
            .collect();
        due.sort();
        for (_, handle) in due {
            self.timers.remove(&handle);
            self.events.push_back(OverlayEvent::TimerFired(handle));
        }
    }

    /// Current virtual time
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Time until the earliest pending timer, if any
    #[must_use]
    pub fn next_timer_due(&self) -> Option<Duration> {
        self.timers
            .values()
            .min()
            .map(|at| at.saturating_sub(self.now))
    }

    /// Number of pending timers
    #[must_use]
    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Number of pending repaint ticks
    #[must_use]
    pub fn pending_frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of active resize observers
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Finish every transition somebody listens for
    pub fn complete_transitions(&mut self) {
        for element in std::mem::take(&mut self.transition_listeners) {
            if self.elements.contains_key(&element) {
                self.events
                    .push_back(OverlayEvent::TransitionEnded(element));
            }
        }
    }

    /// In-flight fetches with their URLs
    #[must_use]
    pub fn pending_fetches(&self) -> Vec<(FetchHandle, String)> {
        self.fetches
            .iter()
            .map(|(handle, url)| (*handle, url.clone()))
            .collect()
    }

    /// Complete a fetch; returns `false` if it was not pending
    pub fn resolve_fetch(&mut self, handle: FetchHandle, result: Result<String, FetchError>) -> bool {
        if self.fetches.remove(&handle).is_none() {
            return false;
        }
        self.events
            .push_back(OverlayEvent::FetchCompleted { handle, result });
        true
    }

    /// Drain queued events in the order they happened
    pub fn take_events(&mut self) -> Vec<OverlayEvent> {
        self.events.drain(..).collect()
    }

    /// Indented dump of a container's element tree
    #[must_use]
    pub fn render_tree(&self, container: ContainerId) -> String {
        let mut out = container.to_string();
        out.push('\n');
        for child in self.container_children(container) {
            self.render_element(*child, 1, &mut out);
        }
        out
    }

    fn render_element(&self, id: ElementId, depth: usize, out: &mut String) {
        let Some(element) = self.elements.get(&id) else {
            return;
        };
        let _ = write!(out, "{}{id}", "  ".repeat(depth));
        for class in &element.classes {
            let _ = write!(out, " .{class}");
        }
        if let Some(text) = &element.text {
            let _ = write!(out, " {text:?}");
        }
        if element.markup.is_some() {
            out.push_str(" <markup>");
        }
        out.push('\n');
        for child in &element.children {
            self.render_element(*child, depth + 1, out);
        }
    }

    fn detach(&mut self, element: ElementId) {
        let Some(parent) = self.elements.get_mut(&element).and_then(|e| e.parent.take()) else {
            return;
        };
        let siblings = match parent {
            Parent::Container(id) => self.containers.get_mut(&id).map(|c| &mut c.children),
            Parent::Element(id) => self.elements.get_mut(&id).map(|e| &mut e.children),
        };
        if let Some(siblings) = siblings {
            siblings.retain(|child| *child != element);
        }
    }

    fn drop_subtree(&mut self, element: ElementId) {
        let Some(removed) = self.elements.remove(&element) else {
            return;
        };
        self.transition_listeners.remove(&element);
        for child in removed.children {
            self.drop_subtree(child);
        }
    }

    fn drop_children(&mut self, element: ElementId) {
        let children = self
            .elements
            .get_mut(&element)
            .map(|e| std::mem::take(&mut e.children))
            .unwrap_or_default();
        for child in children {
            self.drop_subtree(child);
        }
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new((1280.0, 720.0))
    }
}

impl Surface for HeadlessSurface {
    fn page_root(&self) -> ContainerId {
        self.page_root
    }

    fn create_element(&mut self) -> ElementId {
        let id = ElementId::from_raw(self.next_raw());
        self.elements.insert(id, HeadlessElement::default());
        id
    }

    fn append_to_container(&mut self, container: ContainerId, element: ElementId) {
        if !self.elements.contains_key(&element) || !self.containers.contains_key(&container) {
            return;
        }
        self.detach(element);
        if let Some(entry) = self.containers.get_mut(&container) {
            entry.children.push(element);
        }
        if let Some(e) = self.elements.get_mut(&element) {
            e.parent = Some(Parent::Container(container));
        }
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if parent == child || !self.elements.contains_key(&child) {
            return;
        }
        self.detach(child);
        let Some(p) = self.elements.get_mut(&parent) else {
            return;
        };
        p.children.push(child);
        if let Some(c) = self.elements.get_mut(&child) {
            c.parent = Some(Parent::Element(parent));
        }
    }

    fn remove_element(&mut self, element: ElementId) {
        self.detach(element);
        self.drop_subtree(element);
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        let Some(e) = self.elements.get_mut(&element) else {
            return;
        };
        // An empty value clears the property
        if value.is_empty() {
            e.styles.remove(property);
        } else {
            e.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(&element) {
            for name in class.split_whitespace() {
                if !e.classes.iter().any(|c| c == name) {
                    e.classes.push(name.to_string());
                }
            }
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.elements
            .get(&element)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.drop_children(element);
        if let Some(e) = self.elements.get_mut(&element) {
            e.text = Some(text.to_string());
            e.markup = None;
            e.markup_root_styles.clear();
            e.markup_descendant_styles.clear();
        }
    }

    fn set_markup(&mut self, element: ElementId, markup: &str) {
        self.drop_children(element);
        if let Some(e) = self.elements.get_mut(&element) {
            e.markup = Some(markup.to_string());
            e.text = None;
            e.markup_root_styles.clear();
            e.markup_descendant_styles.clear();
        }
    }

    fn style_markup_root(&mut self, element: ElementId, css: &[(&str, &str)]) {
        let Some(e) = self.elements.get_mut(&element) else {
            return;
        };
        let is_vector = e
            .markup
            .as_deref()
            .is_some_and(|m| m.trim_start().to_lowercase().starts_with("<svg"));
        if is_vector {
            for (property, value) in css {
                e.markup_root_styles
                    .insert((*property).to_string(), (*value).to_string());
            }
        }
    }

    fn style_markup_descendants(&mut self, element: ElementId, css: &[(&str, &str)]) {
        let Some(e) = self.elements.get_mut(&element) else {
            return;
        };
        if e.markup.is_some() {
            for (property, value) in css {
                e.markup_descendant_styles
                    .insert((*property).to_string(), (*value).to_string());
            }
        }
    }

    fn container_metrics(&self, container: ContainerId) -> ContainerMetrics {
        self.containers
            .get(&container)
            .map(|c| c.metrics)
            .unwrap_or_default()
    }

    fn viewport_size(&self) -> (f64, f64) {
        self.viewport
    }

    fn offset_top(&self, element: ElementId) -> f64 {
        self.style(element, "top")
            .and_then(|top| top.strip_suffix("px"))
            .and_then(|px| px.trim().parse().ok())
            .unwrap_or(0.0)
    }

    fn observe_resize(&mut self, container: ContainerId) -> ObserverHandle {
        let handle = ObserverHandle::from_raw(self.next_raw());
        self.observers.insert(handle, container);
        handle
    }

    fn disconnect_observer(&mut self, handle: ObserverHandle) {
        self.observers.remove(&handle);
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle::from_raw(self.next_raw());
        self.frames.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.remove(&handle);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle::from_raw(self.next_raw());
        self.timers.insert(handle, self.now + delay);
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }

    fn listen_transition_end(&mut self, element: ElementId) {
        self.transition_listeners.insert(element);
    }

    fn cancel_transition_end(&mut self, element: ElementId) {
        self.transition_listeners.remove(&element);
    }

    fn fetch_text(&mut self, url: &str) -> FetchHandle {
        let handle = FetchHandle::from_raw(self.next_raw());
        self.fetches.insert(handle, url.to_string());
        handle
    }
}

/// Event pumping for engines driven by a [`HeadlessSurface`]
impl WaitOverlay<HeadlessSurface> {
    /// Deliver queued surface events until none are left
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let events = self.surface_mut().take_events();
            if events.is_empty() {
                return handled;
            }
            handled += events.len();
            for event in events {
                self.handle_event(event);
            }
        }
    }

    /// Fire pending repaint ticks and deliver the results
    pub fn run_frames(&mut self) -> usize {
        self.surface_mut().run_frames();
        self.pump()
    }

    /// Advance the virtual clock and deliver the results
    pub fn advance(&mut self, by: Duration) -> usize {
        self.surface_mut().advance(by);
        self.pump()
    }

    /// Finish running transitions and deliver the results
    pub fn complete_transitions(&mut self) -> usize {
        self.surface_mut().complete_transitions();
        self.pump()
    }
}
