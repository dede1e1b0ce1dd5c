//! System clipboard access.

use forge_models::MessageId;

use crate::error::Result;
use crate::transcript::Transcript;

/// Destination for copied text.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The OS clipboard, opened on first use and kept for the process lifetime.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Create a handle; nothing is opened until the first copy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        let clipboard = self.inner.insert(clipboard);
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// Copy the newest model message in `transcript`.
///
/// Returns the id of the copied message, or `None` when there is none yet.
pub fn copy_last_reply(transcript: &Transcript, clipboard: &mut dyn Clipboard) -> Result<Option<MessageId>> {
    let Some(message) = transcript.last_model() else {
        return Ok(None);
    };
    clipboard.set_text(&message.text)?;
    Ok(Some(message.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::testing::RecordingClipboard;
    use forge_models::DisplayType;

    #[test]
    fn test_copy_last_reply_copies_model_text() {
        let mut clipboard = RecordingClipboard::new();
        let mut transcript = Transcript::new();
        assert!(copy_last_reply(&transcript, &mut clipboard).unwrap().is_none());

        transcript.seed("Summary", Vec::new());
        transcript.begin_turn("question", DisplayType::Text).unwrap();

        let id = copy_last_reply(&transcript, &mut clipboard).unwrap().unwrap();
        assert!(id.is_initial());
        assert_eq!(clipboard.copied(), vec!["Summary".to_string()]);
    }

    #[test]
    fn test_copy_last_reply_unavailable() {
        let mut transcript = Transcript::new();
        transcript.seed("Summary", Vec::new());

        let result = copy_last_reply(&transcript, &mut RecordingClipboard::unavailable());
        assert!(matches!(result, Err(AppError::Clipboard(_))));
    }
}
