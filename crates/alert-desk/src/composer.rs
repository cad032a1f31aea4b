//! Alert composer: the draft subject and rich-text body.

use tracing::debug;

use crate::document::{Block, BlockKind, Document, Mark, MarkupError};
use crate::error::EditError;

/// Default alert subject.
pub const DEFAULT_SUBJECT: &str = "Disaster Alert";

/// Body every new draft starts from.
pub const DEFAULT_TEMPLATE: &str = r#"
      <h1>Disaster Alert</h1>
      <p>Dear User,</p>
      <p>We regret to inform you that a disaster has occurred in your area. Please take the necessary precautions and stay safe.</p>
      <p>For more information, please visit our website or contact our support team.</p>
      <p>Stay safe,</p>
      <p>Your Disaster Management Team</p>
    "#;

/// Subject plus structured body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertDraft {
    pub subject: String,
    pub body: Document,
}

impl AlertDraft {
    /// Transport markup for the body.
    pub fn serialize(&self) -> String {
        self.body.to_markup()
    }
}

/// One editor action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the whole document with a new editor state.
    Replace(Document),
    /// Parse markup and replace the whole document with it.
    ReplaceMarkup(String),
    /// Replace the text of a block with a single unstyled run.
    SetText { block: usize, text: String },
    /// Insert a block before position `at` (`at == len` appends).
    InsertBlock { at: usize, block: Block },
    /// Remove the block at `at`.
    RemoveBlock { at: usize },
    /// Change a block between heading and paragraph.
    SetKind { block: usize, kind: BlockKind },
    /// Toggle a mark across a whole block.
    ToggleMark { block: usize, mark: Mark },
}

/// Owns the alert draft.
#[derive(Debug, Clone)]
pub struct Composer {
    draft: AlertDraft,
}

impl Composer {
    /// Composer seeded with the default template and `subject`.
    pub fn new(subject: impl Into<String>) -> Result<Self, MarkupError> {
        Ok(Self {
            draft: AlertDraft {
                subject: subject.into(),
                body: default_document()?,
            },
        })
    }

    /// Current draft.
    pub fn draft(&self) -> &AlertDraft {
        &self.draft
    }

    /// Current body.
    pub fn document(&self) -> &Document {
        &self.draft.body
    }

    /// Current subject.
    pub fn subject(&self) -> &str {
        &self.draft.subject
    }

    /// Change the subject line.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.draft.subject = subject.into();
    }

    /// Apply an editor action.
    ///
    /// The edit is applied to a copy that replaces the body only on success,
    /// so a failed edit leaves the document exactly as it was.
    pub fn edit(&mut self, edit: Edit) -> Result<(), EditError> {
        let next = apply(&self.draft.body, edit)?;
        debug!(blocks = next.len(), "Draft body edited");
        self.draft.body = next;
        Ok(())
    }

    /// Transport markup for the current body.
    pub fn serialize(&self) -> String {
        self.draft.serialize()
    }

    /// Restore the default template, keeping the subject.
    pub fn reset(&mut self) -> Result<(), MarkupError> {
        self.draft.body = default_document()?;
        Ok(())
    }
}

/// Parse [`DEFAULT_TEMPLATE`].
pub fn default_document() -> Result<Document, MarkupError> {
    Document::from_markup(DEFAULT_TEMPLATE)
}

fn apply(current: &Document, edit: Edit) -> Result<Document, EditError> {
    let check = |index: usize, len: usize| {
        if index < len {
            Ok(index)
        } else {
            Err(EditError::OutOfRange { index, len })
        }
    };

    match edit {
        Edit::Replace(doc) => Ok(Document::new(doc.blocks().to_vec())?),
        Edit::ReplaceMarkup(markup) => Ok(Document::from_markup(&markup)?),
        Edit::SetText { block, text } => {
            let mut next = current.clone();
            let index = check(block, next.len())?;
            let kind = next.blocks()[index].kind;
            next.blocks_mut()[index] = Block::plain(kind, text);
            Ok(next)
        }
        Edit::InsertBlock { at, block } => {
            let mut next = current.clone();
            if at > next.len() {
                return Err(EditError::OutOfRange {
                    index: at,
                    len: next.len(),
                });
            }
            next.blocks_mut().insert(at, block);
            Ok(Document::new(next.blocks().to_vec())?)
        }
        Edit::RemoveBlock { at } => {
            let mut next = current.clone();
            let index = check(at, next.len())?;
            next.blocks_mut().remove(index);
            Ok(next)
        }
        Edit::SetKind { block, kind } => {
            let mut next = current.clone();
            let index = check(block, next.len())?;
            next.blocks_mut()[index].kind = kind.validate()?;
            Ok(next)
        }
        Edit::ToggleMark { block, mark } => {
            let mut next = current.clone();
            let index = check(block, next.len())?;
            next.blocks_mut()[index].toggle_mark(mark);
            Ok(next)
        }
    }
}
