//! # Session
//!
//! The caller-side glue around the core: one live [`Document`], its [`HistoryStack`], and the
//! active layer tools apply to.
//!
//! Paint tools mark the session dirty and [`Session::end_gesture`] commits once per gesture (pointer
//! release). Structural edits commit immediately, unless they changed nothing. Opacity changes
//! are treated like a gesture, so a slider can be dragged through many values and land as a single
//! undo step.

use crate::{
    color::Color,
    compositor::{self, Image},
    error::EditError,
    history::HistoryStack,
    paint::{self, Outcome, Tool, ToolAction},
    state::{Document, LayerID},
};

pub struct Session {
    document: Document,
    history: HistoryStack,
    active: LayerID,
    // Live document has changes the history hasn't seen.
    dirty: bool,
}
impl Default for Session {
    fn default() -> Self {
        Self::new(Document::default())
    }
}
impl Session {
    /// Start editing `document`, which becomes the oldest history entry.
    /// The topmost layer starts active.
    #[must_use]
    pub fn new(document: Document) -> Self {
        let history = HistoryStack::new(&document);
        Self::from_parts(document, history)
    }
    pub fn with_history_capacity(document: Document, capacity: usize) -> Result<Self, EditError> {
        let history = HistoryStack::with_capacity(&document, capacity)?;
        Ok(Self::from_parts(document, history))
    }
    fn from_parts(document: Document, history: HistoryStack) -> Self {
        let active = document.top_layer().id();
        Self {
            document,
            history,
            active,
            dirty: false,
        }
    }
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
    #[must_use]
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }
    #[must_use]
    pub fn active_layer(&self) -> LayerID {
        self.active
    }
    /// True if there are edits waiting for [`Self::end_gesture`].
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
    pub fn select_layer(&mut self, id: LayerID) -> Result<(), EditError> {
        if !self.document.contains(id) {
            return Err(EditError::LayerNotFound(id));
        }
        self.active = id;
        Ok(())
    }
    /// Apply a tool to the active layer. Does not commit.
    pub fn apply(
        &mut self,
        tool: Tool,
        x: usize,
        y: usize,
        color: Color,
    ) -> Result<Outcome, EditError> {
        let outcome = paint::apply(
            &mut self.document,
            ToolAction {
                layer: self.active,
                x,
                y,
                tool,
                color,
            },
        )?;
        self.dirty |= outcome.changed();
        Ok(outcome)
    }
    /// Commit everything since the last commit as one undo step. Returns whether anything was
    /// committed.
    pub fn end_gesture(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.commit();
        true
    }
    fn commit(&mut self) {
        self.history.commit(&self.document);
        self.dirty = false;
    }
    /// Commit after a structural edit, unless it left the document as it was.
    fn commit_if(&mut self, changed: bool) {
        if changed {
            self.commit();
        }
    }
    /// Push a new layer on top and make it active.
    pub fn add_layer(&mut self) -> LayerID {
        let id = self.document.add_layer();
        self.commit();
        self.active = id;
        id
    }
    /// Delete a layer. If it was active, the topmost remaining layer becomes active.
    pub fn delete_layer(&mut self, id: LayerID) -> Result<(), EditError> {
        self.document.delete_layer(id)?;
        self.commit();
        self.ensure_active();
        Ok(())
    }
    /// Move a layer in the stack, returning its new index. Moving it where it already is commits
    /// nothing.
    pub fn move_layer(&mut self, id: LayerID, to: usize) -> Result<usize, EditError> {
        let from = self.document.index_of(id);
        let to = self.document.move_layer(id, to)?;
        self.commit_if(from != Some(to));
        Ok(to)
    }
    /// Renaming to the current name commits nothing.
    pub fn rename_layer(&mut self, id: LayerID, name: impl Into<String>) -> Result<(), EditError> {
        let changed = self.document.rename_layer(id, name)?;
        self.commit_if(changed);
        Ok(())
    }
    pub fn toggle_visible(&mut self, id: LayerID) -> Result<bool, EditError> {
        let visible = self.document.toggle_visible(id)?;
        self.commit();
        Ok(visible)
    }
    /// Resize the document. Resizing to the current size commits nothing.
    pub fn resize(&mut self, new_size: usize) -> Result<(), EditError> {
        let changed = new_size != self.document.size();
        self.document.resize(new_size)?;
        self.commit_if(changed);
        Ok(())
    }
    /// Change opacity without committing. Call [`Self::end_gesture`] when the user lets go.
    pub fn set_opacity(&mut self, id: LayerID, percent: u8) -> Result<(), EditError> {
        let before = self.document.layer(id)?.opacity();
        self.document.set_opacity(id, percent)?;
        self.dirty |= self.document.layer(id)?.opacity() != before;
        Ok(())
    }
    /// Step back one history entry. Uncommitted edits are committed first so they can be redone.
    /// Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        let Some(document) = self.history.undo() else {
            return false;
        };
        self.restore(document);
        true
    }
    /// Step forward one history entry. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        if self.dirty {
            // Anything undone is about to be superseded by the pending edits.
            self.end_gesture();
            return false;
        }
        let Some(document) = self.history.redo() else {
            return false;
        };
        self.restore(document);
        true
    }
    fn restore(&mut self, document: Document) {
        self.document = document;
        self.dirty = false;
        self.ensure_active();
    }
    /// Keep the active layer if it still exists, otherwise fall back to the top.
    fn ensure_active(&mut self) {
        if !self.document.contains(self.active) {
            let top = self.document.top_layer().id();
            log::debug!("Active layer {} gone, selecting {top}", self.active);
            self.active = top;
        }
    }
    #[must_use]
    pub fn composite(&self) -> Image {
        compositor::composite(&self.document)
    }
}

#[cfg(test)]
mod test {
    use super::Session;
    use crate::{
        color::Color,
        error::EditError,
        paint::{Outcome, Tool},
        state::Document,
    };

    fn session(size: usize) -> Session {
        Session::new(Document::new(size).unwrap())
    }
    fn cell(session: &Session, x: usize, y: usize) -> Option<Color> {
        session
            .document()
            .layer(session.active_layer())
            .unwrap()
            .grid()
            .get(x, y)
            .unwrap()
    }

    #[test]
    fn gesture_commits_once() {
        let mut session = session(8);
        for x in 0..5 {
            session.apply(Tool::Paint, x, 0, Color::RED).unwrap();
        }
        assert!(session.is_dirty());
        assert!(session.end_gesture());
        assert!(!session.end_gesture());
        assert_eq!(session.history().len(), 2);

        assert!(session.undo());
        assert!((0..5).all(|x| cell(&session, x, 0).is_none()));
    }
    #[test]
    fn unchanged_tools_dont_dirty() {
        let mut session = session(8);
        assert_eq!(
            session.apply(Tool::Erase, 0, 0, Color::RED),
            Ok(Outcome::Unchanged)
        );
        assert_eq!(
            session.apply(Tool::Pick, 0, 0, Color::RED),
            Ok(Outcome::Picked(None))
        );
        assert!(!session.end_gesture());
        assert_eq!(session.history().len(), 1);
    }
    #[test]
    fn add_selects_and_delete_falls_back() {
        let mut session = session(8);
        let first = session.active_layer();
        let second = session.add_layer();
        let third = session.add_layer();
        assert_eq!(session.active_layer(), third);

        session.select_layer(second).unwrap();
        session.delete_layer(second).unwrap();
        assert_eq!(session.active_layer(), third);

        session.delete_layer(third).unwrap();
        assert_eq!(session.active_layer(), first);
        assert_eq!(session.delete_layer(first), Err(EditError::LastLayer));
        assert_eq!(session.document().layers().len(), 1);
    }
    #[test]
    fn undo_restores_deleted_layer() {
        let mut session = session(8);
        let added = session.add_layer();
        session.apply(Tool::Paint, 1, 1, Color::GREEN).unwrap();
        session.end_gesture();
        session.delete_layer(added).unwrap();
        assert!(!session.document().contains(added));

        assert!(session.undo());
        assert!(session.document().contains(added));
        assert_eq!(
            session.document().layer(added).unwrap().grid().get(1, 1),
            Ok(Some(Color::GREEN))
        );
    }
    #[test]
    fn undo_past_layer_creation_reselects() {
        let mut session = session(8);
        let added = session.add_layer();
        assert_eq!(session.active_layer(), added);
        assert!(session.undo());
        assert_ne!(session.active_layer(), added);
        assert_eq!(
            session.active_layer(),
            session.document().top_layer().id()
        );
    }
    #[test]
    fn opacity_commits_on_release() {
        let mut session = session(8);
        let id = session.active_layer();
        for percent in [90, 70, 50, 30] {
            session.set_opacity(id, percent).unwrap();
        }
        assert_eq!(session.history().len(), 1);
        assert!(session.set_opacity(id, 150).is_err());
        assert!(session.end_gesture());
        assert_eq!(session.history().len(), 2);

        assert!(session.undo());
        assert_eq!(
            session.document().layer(id).unwrap().opacity().percent(),
            100
        );
        assert!(session.redo());
        assert_eq!(session.document().layer(id).unwrap().opacity().percent(), 30);
    }
    #[test]
    fn undo_commits_pending_first() {
        let mut session = session(8);
        session.apply(Tool::Paint, 0, 0, Color::RED).unwrap();
        assert!(session.undo());
        assert_eq!(cell(&session, 0, 0), None);
        assert!(session.redo());
        assert_eq!(cell(&session, 0, 0), Some(Color::RED));
    }
    #[test]
    fn redo_with_pending_edits_commits_them() {
        let mut session = session(8);
        session.apply(Tool::Paint, 0, 0, Color::RED).unwrap();
        session.end_gesture();
        assert!(session.undo());
        assert!(session.history().can_redo());

        session.apply(Tool::Paint, 1, 1, Color::BLUE).unwrap();
        assert!(!session.redo());
        assert!(!session.is_dirty());
        assert!(!session.history().can_redo());
        assert_eq!(cell(&session, 1, 1), Some(Color::BLUE));
        assert_eq!(cell(&session, 0, 0), None);

        assert!(session.undo());
        assert_eq!(cell(&session, 1, 1), None);
    }
    #[test]
    fn unchanged_structural_edits_dont_commit() {
        let mut session =
            Session::with_history_capacity(Document::new(8).unwrap(), 3).unwrap();
        let id = session.active_layer();
        session.apply(Tool::Paint, 0, 0, Color::RED).unwrap();
        session.end_gesture();
        for _ in 0..3 {
            assert_eq!(session.move_layer(id, 0), Ok(0));
            session.rename_layer(id, "Layer 1").unwrap();
        }
        assert_eq!(session.history().len(), 2);

        assert!(session.undo());
        assert_eq!(cell(&session, 0, 0), None);
        assert!(!session.undo());
    }
    #[test]
    fn real_structural_edits_commit() {
        let mut session = session(8);
        let bottom = session.active_layer();
        session.add_layer();
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.move_layer(bottom, 1), Ok(1));
        session.rename_layer(bottom, "Ink").unwrap();
        assert_eq!(session.history().len(), 4);

        assert!(session.undo());
        assert_eq!(session.document().layer(bottom).unwrap().name(), "Layer 1");
        assert_eq!(session.document().index_of(bottom), Some(1));
        assert!(session.undo());
        assert_eq!(session.document().index_of(bottom), Some(0));
    }
    #[test]
    fn resize_is_undoable() {
        let mut session = session(8);
        session.apply(Tool::Paint, 7, 7, Color::BLUE).unwrap();
        session.end_gesture();
        session.resize(4).unwrap();
        assert_eq!(session.document().size(), 4);
        session.resize(4).unwrap();
        assert_eq!(session.history().len(), 3);

        assert!(session.undo());
        assert_eq!(session.document().size(), 8);
        assert_eq!(cell(&session, 7, 7), Some(Color::BLUE));
    }
    #[test]
    fn composite_reflects_live_document() {
        let mut session = session(4);
        session.apply(Tool::Fill, 0, 0, Color::YELLOW).unwrap();
        let image = session.composite();
        assert!(image.rows().flatten().all(|&pixel| pixel == Color::YELLOW));
    }
}
