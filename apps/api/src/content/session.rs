#![allow(dead_code)]

//! The admin editing model: one session over a loaded content document,
//! with per-field Viewing/Editing state machines and a pending-change set.
//!
//! Edits mutate only the session's in-memory copy. Each committed field edit
//! re-clones its page subtree into the pending set, so saving a page means
//! replacing the whole page server-side, not sending a diff. The pending set
//! is session memory only: dropping the session before `save_all` loses it.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::content::patch::{set_at_path, value_at_path};
use crate::content::store::{ContentError, ContentSink, Document};

/// One admin editing session.
pub struct EditSession {
    document: Document,
    edit_mode: bool,
    pending: BTreeMap<String, Value>,
}

impl EditSession {
    pub fn new(document: Document) -> Self {
        EditSession {
            document,
            edit_mode: false,
            pending: BTreeMap::new(),
        }
    }

    /// Global edit-mode toggle. While off, every field renders as static
    /// text and clicks do nothing.
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.edit_mode = on;
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_pages(&self) -> Vec<&str> {
        self.pending.keys().map(String::as_str).collect()
    }

    /// The value currently displayed for a field.
    pub fn value_at(&self, page: &str, path: &str) -> Option<&Value> {
        value_at_path(self.document.get(page)?, path)
    }

    /// Applies one field edit to the in-memory document and marks the page
    /// dirty with a full clone of its updated subtree.
    pub fn apply_edit(&mut self, page: &str, path: &str, value: Value) -> Result<(), ContentError> {
        let subtree = self
            .document
            .get_mut(page)
            .ok_or_else(|| ContentError::InvalidPage(page.to_string()))?;

        set_at_path(subtree, path, value)?;
        self.pending.insert(page.to_string(), subtree.clone());
        Ok(())
    }

    /// Flushes every dirty page through the sink, one page at a time,
    /// stopping at the first failure. Pages flushed before the failure stay
    /// committed and leave the pending set; the failed page and any pages
    /// after it remain pending for a retry.
    pub fn save_all(&mut self, sink: &dyn ContentSink) -> SaveReport {
        let mut saved = Vec::new();
        let mut failed = None;

        for (page, data) in self.pending.iter() {
            match sink.replace_page(page, data.clone()) {
                Ok(()) => saved.push(page.clone()),
                Err(err) => {
                    failed = Some((page.clone(), err));
                    break;
                }
            }
        }

        for page in &saved {
            self.pending.remove(page);
        }

        SaveReport {
            saved,
            failed,
            still_pending: self.pending_pages().iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Outcome of a save: exactly which pages committed, which one failed, and
/// which remain dirty. A partial save is reported, never hidden.
#[derive(Debug)]
pub struct SaveReport {
    pub saved: Vec<String>,
    pub failed: Option<(String, ContentError)>,
    pub still_pending: Vec<String>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none() && self.still_pending.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Enter,
    Escape,
}

enum FieldMode {
    Viewing,
    Editing { snapshot: String, buffer: String },
}

/// Per-rendered-field controller. Fields are Viewing until an admin click
/// (gated by the session's edit mode) snapshots the displayed value into an
/// editable buffer; blur or Enter commits a changed buffer, Escape discards.
pub struct EditableField {
    page: String,
    path: String,
    multiline: bool,
    mode: FieldMode,
}

impl EditableField {
    pub fn new(page: impl Into<String>, path: impl Into<String>) -> Self {
        EditableField {
            page: page.into(),
            path: path.into(),
            multiline: false,
            mode: FieldMode::Viewing,
        }
    }

    /// Multi-line fields only differ in Enter handling; the state machine is
    /// the same.
    pub fn multiline(page: impl Into<String>, path: impl Into<String>) -> Self {
        EditableField {
            multiline: true,
            ..EditableField::new(page, path)
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FieldMode::Editing { .. })
    }

    /// The value the field currently shows: the buffer while editing, the
    /// session document's value otherwise.
    pub fn displayed_value(&self, session: &EditSession) -> String {
        match &self.mode {
            FieldMode::Editing { buffer, .. } => buffer.clone(),
            FieldMode::Viewing => self.current_text(session),
        }
    }

    fn current_text(&self, session: &EditSession) -> String {
        session
            .value_at(&self.page, &self.path)
            .map(display_string)
            .unwrap_or_default()
    }

    /// Viewing -> Editing, only while the session is globally in edit mode.
    pub fn click(&mut self, session: &EditSession) {
        if !session.edit_mode() || self.is_editing() {
            return;
        }
        let current = self.current_text(session);
        self.mode = FieldMode::Editing {
            snapshot: current.clone(),
            buffer: current,
        };
    }

    /// Replaces the editable buffer. No-op while Viewing.
    pub fn input(&mut self, text: impl Into<String>) {
        if let FieldMode::Editing { buffer, .. } = &mut self.mode {
            *buffer = text.into();
        }
    }

    /// Editing -> Viewing; commits iff the buffer differs from the value at
    /// entry. Returns whether a change was committed.
    pub fn blur(&mut self, session: &mut EditSession) -> Result<bool, ContentError> {
        let FieldMode::Editing { snapshot, buffer } =
            std::mem::replace(&mut self.mode, FieldMode::Viewing)
        else {
            return Ok(false);
        };

        if buffer == snapshot {
            return Ok(false);
        }

        session.apply_edit(&self.page, &self.path, Value::String(buffer))?;
        Ok(true)
    }

    pub fn key_press(
        &mut self,
        key: KeyPress,
        session: &mut EditSession,
    ) -> Result<bool, ContentError> {
        match key {
            KeyPress::Enter if !self.multiline => self.blur(session),
            // The widget owns newline insertion for multi-line fields.
            KeyPress::Enter => Ok(false),
            KeyPress::Escape => {
                self.mode = FieldMode::Viewing;
                Ok(false)
            }
        }
    }
}

/// Scalars render via their natural string form; a string leaf renders
/// without quotes.
fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    fn session() -> EditSession {
        let document = json!({
            "home": {"hero": {"title": "Welcome", "subtitle": "Care"}},
            "about": {"values": [{"title": "B", "description": "D"}]}
        });
        let Value::Object(map) = document else { unreachable!() };
        EditSession::new(map)
    }

    /// Sink that records writes and fails on one configured page.
    struct FlakySink {
        fail_on: Option<&'static str>,
        written: RefCell<Vec<String>>,
    }

    impl FlakySink {
        fn new(fail_on: Option<&'static str>) -> Self {
            FlakySink {
                fail_on,
                written: RefCell::new(Vec::new()),
            }
        }
    }

    impl ContentSink for FlakySink {
        fn replace_page(&self, page: &str, _data: Value) -> Result<(), ContentError> {
            if self.fail_on == Some(page) {
                return Err(ContentError::Io(std::io::Error::other("disk full")));
            }
            self.written.borrow_mut().push(page.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_click_requires_edit_mode() {
        let session = session();
        let mut field = EditableField::new("home", "hero.title");

        field.click(&session);
        assert!(!field.is_editing());
    }

    #[test]
    fn test_escape_restores_displayed_value_and_leaves_no_pending_change() {
        let mut session = session();
        session.set_edit_mode(true);
        let mut field = EditableField::new("home", "hero.title");

        field.click(&session);
        assert!(field.is_editing());

        field.input("Totally different");
        field.key_press(KeyPress::Escape, &mut session).unwrap();

        assert!(!field.is_editing());
        assert_eq!(field.displayed_value(&session), "Welcome");
        assert!(!session.has_unsaved_changes());
        assert_eq!(session.value_at("home", "hero.title"), Some(&json!("Welcome")));
    }

    #[test]
    fn test_blur_commits_changed_buffer_and_marks_page_dirty() {
        let mut session = session();
        session.set_edit_mode(true);
        let mut field = EditableField::new("about", "values[0].title");

        field.click(&session);
        field.input("Boldness");
        let committed = field.blur(&mut session).unwrap();

        assert!(committed);
        assert_eq!(session.value_at("about", "values[0].title"), Some(&json!("Boldness")));
        // Untouched sibling field survives.
        assert_eq!(session.value_at("about", "values[0].description"), Some(&json!("D")));
        assert_eq!(session.pending_pages(), vec!["about"]);
    }

    #[test]
    fn test_blur_without_change_is_clean() {
        let mut session = session();
        session.set_edit_mode(true);
        let mut field = EditableField::new("home", "hero.title");

        field.click(&session);
        let committed = field.blur(&mut session).unwrap();

        assert!(!committed);
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_enter_commits_single_line_but_not_multiline() {
        let mut session = session();
        session.set_edit_mode(true);

        let mut single = EditableField::new("home", "hero.title");
        single.click(&session);
        single.input("Via Enter");
        assert!(single.key_press(KeyPress::Enter, &mut session).unwrap());
        assert!(!single.is_editing());

        let mut multi = EditableField::multiline("home", "hero.subtitle");
        multi.click(&session);
        multi.input("Line one");
        assert!(!multi.key_press(KeyPress::Enter, &mut session).unwrap());
        assert!(multi.is_editing());
    }

    #[test]
    fn test_save_all_flushes_every_dirty_page() {
        let mut session = session();
        session.set_edit_mode(true);
        session.apply_edit("home", "hero.title", json!("H")).unwrap();
        session.apply_edit("about", "values[0].title", json!("A")).unwrap();

        let sink = FlakySink::new(None);
        let report = session.save_all(&sink);

        assert!(report.is_complete());
        assert_eq!(report.saved, vec!["about", "home"]);
        assert!(!session.has_unsaved_changes());
        assert_eq!(*sink.written.borrow(), vec!["about", "home"]);
    }

    #[test]
    fn test_partial_save_keeps_earlier_pages_committed() {
        let mut session = session();
        session.apply_edit("about", "values[0].title", json!("A")).unwrap();
        session.apply_edit("home", "hero.title", json!("H")).unwrap();

        // "about" flushes first (deterministic order), then "home" fails.
        let sink = FlakySink::new(Some("home"));
        let report = session.save_all(&sink);

        assert_eq!(report.saved, vec!["about"]);
        assert_eq!(report.failed.as_ref().unwrap().0, "home");
        assert_eq!(report.still_pending, vec!["home"]);
        assert!(!report.is_complete());

        // The first page's write reached the sink and stays committed.
        assert_eq!(*sink.written.borrow(), vec!["about"]);
        // Only the failed page is still dirty; a retry won't re-send "about".
        assert!(session.has_unsaved_changes());
        assert_eq!(session.pending_pages(), vec!["home"]);
    }

    #[test]
    fn test_apply_edit_rejects_unknown_page() {
        let mut session = session();
        let err = session.apply_edit("blog", "hero.title", json!("x")).unwrap_err();
        assert!(matches!(err, ContentError::InvalidPage(p) if p == "blog"));
    }

    #[test]
    fn test_apply_edit_bad_path_leaves_page_clean() {
        let mut session = session();
        let err = session
            .apply_edit("about", "values[9].title", json!("x"))
            .unwrap_err();
        assert!(matches!(err, ContentError::PathNotFound(_)));
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_numeric_leaf_renders_via_display_string() {
        let document = json!({"home": {"stats": [{"value": 40}]}});
        let Value::Object(map) = document else { unreachable!() };
        let mut session = EditSession::new(map);
        session.set_edit_mode(true);

        let mut field = EditableField::new("home", "stats[0].value");
        field.click(&session);
        assert_eq!(field.displayed_value(&session), "40");
    }
}
