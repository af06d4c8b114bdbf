//! In-memory page with a virtual clock
//!
//! [`MemoryPage`] implements [`Host`] over a small element tree so that
//! components can be exercised without a browser. [`Harness`] drives an
//! [`Enhancer`] against it the way the browser would: events only reach
//! elements that have a listener, queued asynchronous outcomes are flushed
//! after every dispatch, and timers fire in due order as time advances.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use crate::app::Enhancer;
use crate::config::EnhanceConfig;
use crate::input::{ClickInfo, Disposition, Key, Listen, PageEvent, Task, WindowSignal};
use crate::platform::Host;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
}

#[derive(Debug)]
struct PendingTimer {
    id: u64,
    due_ms: u64,
    task: Task<NodeId>,
}

#[derive(Debug)]
pub struct MemoryPage {
    nodes: Vec<NodeData>,
    width: u32,
    hidden: bool,
    loaded: bool,
    autoplay_allowed: bool,
    confirm_answer: bool,
    now_ms: u64,
    next_timer: u64,
    timers: Vec<PendingTimer>,
    queued: VecDeque<PageEvent<NodeId>>,
    listeners: Vec<(NodeId, Listen)>,
    window_signals: Vec<WindowSignal>,
    document_clicks: bool,
    observed: Vec<NodeId>,
    playing: Vec<NodeId>,
    play_requests: usize,
    confirms: Vec<String>,
    navigations: Vec<String>,
    focused: Option<NodeId>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// An empty, fully loaded desktop-width page
    pub fn new() -> Self {
        let body = NodeData {
            tag: "body".to_string(),
            ..NodeData::default()
        };

        Self {
            nodes: vec![body],
            width: 1280,
            hidden: false,
            loaded: true,
            autoplay_allowed: true,
            confirm_answer: true,
            now_ms: 0,
            next_timer: 0,
            timers: Vec::new(),
            queued: VecDeque::new(),
            listeners: Vec::new(),
            window_signals: Vec::new(),
            document_clicks: false,
            observed: Vec::new(),
            playing: Vec::new(),
            play_requests: 0,
            confirms: Vec::new(),
            navigations: Vec::new(),
            focused: None,
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a new element under `parent`
    pub fn add(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_string(),
            parent: Some(parent),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..NodeData::default()
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    pub fn set_autoplay_allowed(&mut self, allowed: bool) {
        self.autoplay_allowed = allowed;
    }

    pub fn set_confirm_answer(&mut self, answer: bool) {
        self.confirm_answer = answer;
    }

    pub fn focus(&mut self, node: NodeId) {
        self.focused = Some(node);
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.body() {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].styles.get(property).map(String::as_str)
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    pub fn count(&self, selector: &str) -> usize {
        self.query_all(selector).len()
    }

    pub fn is_listening(&self, node: NodeId, kind: Listen) -> bool {
        self.listeners.contains(&(node, kind))
    }

    /// Element listeners currently installed
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_observed(&self, node: NodeId) -> bool {
        self.observed.contains(&node)
    }

    pub fn is_playing(&self, node: NodeId) -> bool {
        self.playing.contains(&node)
    }

    pub fn play_requests(&self) -> usize {
        self.play_requests
    }

    pub fn confirms(&self) -> &[String] {
        &self.confirms
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Pending timer tasks in the order they will fire
    pub fn pending_timers(&self) -> Vec<Task<NodeId>> {
        let mut timers: Vec<&PendingTimer> = self.timers.iter().collect();
        timers.sort_by_key(|t| (t.due_ms, t.id));
        timers.into_iter().map(|t| t.task.clone()).collect()
    }

    fn take_due_timer(&mut self, limit_ms: u64) -> Option<Task<NodeId>> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= limit_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i)?;

        let timer = self.timers.remove(index);
        self.now_ms = timer.due_ms;
        Some(timer.task)
    }

    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[scope.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn matches(&self, node: NodeId, selector: &Compound) -> bool {
        let data = &self.nodes[node.0];
        if let Some(tag) = &selector.tag {
            if !data.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &selector.id {
            if data.attrs.get("id") != Some(id) {
                return false;
            }
        }
        if !selector.classes.iter().all(|c| self.has_class(&node, c)) {
            return false;
        }
        selector.attrs.iter().all(|(name, op)| match (data.attrs.get(name), op) {
            (None, _) => false,
            (Some(_), AttrOp::Exists) => true,
            (Some(value), AttrOp::Equals(expected)) => value == expected,
            (Some(value), AttrOp::Contains(needle)) => value.contains(needle.as_str()),
        })
    }

    fn select(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let compound = parse_selector(selector);
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.matches(*node, &compound))
            .collect()
    }

    fn class_list(&self, node: NodeId) -> Vec<String> {
        self.nodes[node.0]
            .attrs
            .get("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn set_class_list(&mut self, node: NodeId, classes: Vec<String>) {
        self.nodes[node.0]
            .attrs
            .insert("class".to_string(), classes.join(" "));
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }
}

impl Host for MemoryPage {
    type Node = NodeId;
    type Timer = u64;

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body())
            .into_iter()
            .find(|node| self.nodes[node.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.select(self.body(), selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.select(self.body(), selector)
    }

    fn query_in(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.select(*scope, selector).into_iter().next()
    }

    fn query_all_in(&self, scope: &NodeId, selector: &str) -> Vec<NodeId> {
        self.select(*scope, selector)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(n) = current {
            if n == *ancestor {
                return true;
            }
            current = self.nodes[n.0].parent;
        }
        false
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        self.nodes[node.0].attrs.remove(name);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.class_list(*node).iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        let mut classes = self.class_list(*node);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_class_list(*node, classes);
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        let mut classes = self.class_list(*node);
        classes.retain(|c| c != class);
        self.set_class_list(*node, classes);
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        let styles = &mut self.nodes[node.0].styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.nodes[node.0].text = text.to_string();
    }

    fn value(&self, node: &NodeId) -> String {
        self.nodes[node.0].value.clone()
    }

    fn set_value(&mut self, node: &NodeId, value: &str) {
        self.nodes[node.0].value = value.to_string();
    }

    fn blur(&mut self, node: &NodeId) {
        if self.focused == Some(*node) {
            self.focused = None;
        }
    }

    fn create_element(&mut self, tag: &str, class: &str) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        let mut data = NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        };
        if !class.is_empty() {
            data.attrs.insert("class".to_string(), class.to_string());
        }
        self.nodes.push(data);
        Some(id)
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.detach(*child);
        self.nodes[child.0].parent = Some(*parent);
        self.nodes[parent.0].children.push(*child);
    }

    fn remove(&mut self, node: &NodeId) {
        let listeners = std::mem::take(&mut self.listeners);
        self.listeners = listeners
            .into_iter()
            .filter(|(target, _)| !self.contains(node, target))
            .collect();
        self.detach(*node);
    }

    fn listen(&mut self, node: &NodeId, kind: Listen) {
        if !self.is_listening(*node, kind) {
            self.listeners.push((*node, kind));
        }
    }

    fn listen_window(&mut self, signal: WindowSignal) {
        if !self.window_signals.contains(&signal) {
            self.window_signals.push(signal);
        }
    }

    fn listen_document_clicks(&mut self) {
        self.document_clicks = true;
    }

    fn observe_viewport(&mut self, node: &NodeId) {
        if !self.observed.contains(node) {
            self.observed.push(*node);
        }
    }

    fn viewport_width(&self) -> u32 {
        self.width
    }

    fn document_hidden(&self) -> bool {
        self.hidden
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.confirm_answer
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }

    fn play_media(&mut self, node: &NodeId) {
        self.play_requests += 1;
        if self.autoplay_allowed {
            if !self.playing.contains(node) {
                self.playing.push(*node);
            }
        } else {
            self.queued.push_back(PageEvent::PlaybackRejected {
                node: *node,
                reason: "NotAllowedError: play() failed because the user didn't interact with the document first".to_string(),
            });
        }
    }

    fn pause_media(&mut self, node: &NodeId) {
        self.playing.retain(|n| n != node);
    }

    fn set_timeout(&mut self, delay: Duration, task: Task<NodeId>) -> u64 {
        let id = self.next_timer;
        self.next_timer += 1;
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.timers.push(PendingTimer {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            task,
        });
        id
    }

    fn clear_timeout(&mut self, timer: u64) {
        self.timers.retain(|t| t.id != timer);
    }
}

#[derive(Debug)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
}

/// A single compound selector: `tag#id.class[attr][attr="v"][attr*="v"]`
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, AttrOp)>,
}

fn parse_selector(selector: &str) -> Compound {
    let chars: Vec<char> = selector.trim().chars().collect();
    let ident = |i: &mut usize| -> String {
        let start = *i;
        while *i < chars.len() && (chars[*i].is_alphanumeric() || chars[*i] == '-' || chars[*i] == '_') {
            *i += 1;
        }
        chars[start..*i].iter().collect()
    };

    let mut out = Compound::default();
    let mut i = 0;
    let tag = ident(&mut i);
    if !tag.is_empty() {
        out.tag = Some(tag);
    }

    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                out.classes.push(ident(&mut i));
            }
            '#' => {
                i += 1;
                out.id = Some(ident(&mut i));
            }
            '[' => {
                i += 1;
                let name = ident(&mut i);
                let op = match chars[i] {
                    ']' => AttrOp::Exists,
                    '=' => {
                        i += 1;
                        AttrOp::Equals(attr_value(&chars, &mut i))
                    }
                    '*' => {
                        i += 2;
                        AttrOp::Contains(attr_value(&chars, &mut i))
                    }
                    other => panic!("unsupported attribute operator {other:?} in {selector:?}"),
                };
                assert_eq!(chars[i], ']', "unterminated attribute in {selector:?}");
                i += 1;
                out.attrs.push((name, op));
            }
            other => panic!("unsupported selector syntax {other:?} in {selector:?}"),
        }
    }

    out
}

fn attr_value(chars: &[char], i: &mut usize) -> String {
    let quote = chars[*i];
    if quote == '"' || quote == '\'' {
        *i += 1;
        let start = *i;
        while chars[*i] != quote {
            *i += 1;
        }
        let value = chars[start..*i].iter().collect();
        *i += 1;
        value
    } else {
        let start = *i;
        while chars[*i] != ']' {
            *i += 1;
        }
        chars[start..*i].iter().collect()
    }
}

/// Drives an [`Enhancer`] over a [`MemoryPage`] like a browser event loop would
pub struct Harness {
    pub page: MemoryPage,
    pub enhancer: Enhancer<MemoryPage>,
}

impl Harness {
    pub fn activate(page: MemoryPage) -> Self {
        Self::with_config(page, EnhanceConfig::default())
    }

    pub fn with_config(mut page: MemoryPage, config: EnhanceConfig) -> Self {
        let enhancer = Enhancer::activate(&mut page, config);
        let mut harness = Self { page, enhancer };
        harness.flush();
        harness
    }

    /// Delivers one event, then any asynchronous outcomes it queued
    pub fn dispatch(&mut self, event: PageEvent<NodeId>) -> Disposition {
        let disposition = self.enhancer.handle(&mut self.page, event);
        self.flush();
        disposition
    }

    fn flush(&mut self) {
        while let Some(event) = self.page.queued.pop_front() {
            self.enhancer.handle(&mut self.page, event);
        }
    }

    /// Moves the virtual clock forward, firing due timers in order
    pub fn advance(&mut self, ms: u64) {
        let target = self.page.now_ms + ms;
        while let Some(task) = self.page.take_due_timer(target) {
            self.dispatch(PageEvent::Timer(task));
        }
        self.page.now_ms = target;
    }

    pub fn click(&mut self, node: NodeId) -> Disposition {
        self.click_with(node, ClickInfo::primary())
    }

    /// Element listener first, then the document-level listener
    pub fn click_with(&mut self, node: NodeId, click: ClickInfo) -> Disposition {
        let mut disposition = Disposition::Proceed;
        if self.page.is_listening(node, Listen::Click) {
            disposition = self.dispatch(PageEvent::Click { node, click });
        }
        if self.page.document_clicks {
            self.dispatch(PageEvent::DocumentClick { target: node });
        }
        disposition
    }

    /// Replaces a control's value the way typing would, firing `input`
    pub fn type_text(&mut self, node: NodeId, text: &str) {
        self.page.set_value(&node, text);
        if self.page.is_listening(node, Listen::Input) {
            self.dispatch(PageEvent::Input { node });
        }
    }

    pub fn key_down(&mut self, node: NodeId, key: &str) {
        if self.page.is_listening(node, Listen::KeyDown) {
            self.dispatch(PageEvent::KeyDown {
                node,
                key: Key::from_dom(key),
            });
        }
    }

    pub fn submit(&mut self, form: NodeId) -> Disposition {
        if self.page.is_listening(form, Listen::Submit) {
            self.dispatch(PageEvent::Submit { node: form })
        } else {
            Disposition::Proceed
        }
    }

    /// A full one-finger horizontal swipe from `from_x` to `to_x`
    pub fn swipe(&mut self, node: NodeId, from_x: f64, to_x: f64) {
        self.touch_start(node, from_x);
        self.touch_move(node, to_x);
        self.touch_end(node);
    }

    pub fn touch_start(&mut self, node: NodeId, x: f64) {
        if self.page.is_listening(node, Listen::Touch) {
            self.dispatch(PageEvent::TouchStart { node, x });
        }
    }

    pub fn touch_move(&mut self, node: NodeId, x: f64) {
        if self.page.is_listening(node, Listen::Touch) {
            self.dispatch(PageEvent::TouchMove { node, x });
        }
    }

    pub fn touch_end(&mut self, node: NodeId) {
        if self.page.is_listening(node, Listen::Touch) {
            self.dispatch(PageEvent::TouchEnd { node });
        }
    }

    pub fn resize(&mut self, width: u32) {
        self.page.width = width;
        self.window_signal(WindowSignal::Resize);
    }

    pub fn finish_loading(&mut self) {
        self.page.loaded = true;
        self.window_signal(WindowSignal::Load);
    }

    pub fn set_document_hidden(&mut self, hidden: bool) {
        self.page.hidden = hidden;
        self.window_signal(WindowSignal::VisibilityChange);
    }

    pub fn intersect(&mut self, node: NodeId, visible: bool) {
        if self.page.is_observed(node) {
            self.dispatch(PageEvent::Intersection { node, visible });
        }
    }

    fn window_signal(&mut self, signal: WindowSignal) {
        if self.page.window_signals.contains(&signal) {
            self.dispatch(PageEvent::Window(signal));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_match_compound_forms() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let visual = page.add(
            body,
            "div",
            &[("class", "auth-visual bg"), ("data-bg", "/static/image3.jpg")],
        );
        let form = page.add(body, "form", &[("data-confirm", "Delete?")]);
        let other = page.add(body, "div", &[("class", "auth-visual")]);

        assert_eq!(page.query(".auth-visual.bg[data-bg]"), Some(visual));
        assert_eq!(page.query(".auth-visual.bg[data-bg*=\"image3.jpg\"]"), Some(visual));
        assert_eq!(page.query(".auth-visual.bg[data-bg*=\"image4.jpg\"]"), None);
        assert_eq!(page.query("form[data-confirm]"), Some(form));
        assert_eq!(page.query_all(".auth-visual"), vec![visual, other]);
    }

    #[test]
    fn removed_nodes_leave_queries_and_listeners() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let outer = page.add(body, "div", &[("id", "outer")]);
        let inner = page.add(outer, "span", &[("class", "flash")]);

        page.listen(&inner, Listen::Click);
        page.listen(&inner, Listen::Click);
        assert_eq!(page.listener_count(), 1);

        page.remove(&outer);
        assert!(!page.is_attached(inner));
        assert!(!page.is_listening(inner, Listen::Click));
        assert_eq!(page.by_id("outer"), None);
        assert_eq!(page.count(".flash"), 0);
        assert!(page.contains(&outer, &inner));
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut page = MemoryPage::new();
        page.set_timeout(Duration::from_millis(30), Task::SyncNav);
        page.set_timeout(Duration::from_millis(10), Task::FilterSearch);

        assert_eq!(page.take_due_timer(5), None);
        assert_eq!(page.take_due_timer(100), Some(Task::FilterSearch));
        assert_eq!(page.now_ms(), 10);
        assert_eq!(page.take_due_timer(100), Some(Task::SyncNav));
    }
}
