//! Yes/no confirmation prompt with a single bound action.

/// A prompt holding at most one pending action.
///
/// Showing the prompt again replaces the previous action, so an old binding
/// can never fire. The action is handed out at most once.
#[derive(Debug)]
pub struct ConfirmDialog<A> {
    prompt: Option<Prompt<A>>,
}

#[derive(Debug)]
struct Prompt<A> {
    title: String,
    message: String,
    action: A,
}

impl<A> Default for ConfirmDialog<A> {
    fn default() -> Self {
        Self { prompt: None }
    }
}

impl<A> ConfirmDialog<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with a fresh binding. Returns the action that was replaced, if any.
    pub fn show(&mut self, title: impl Into<String>, message: impl Into<String>, action: A) -> Option<A> {
        self.prompt
            .replace(Prompt {
                title: title.into(),
                message: message.into(),
                action,
            })
            .map(|p| p.action)
    }

    /// Close and return the bound action for the caller to run.
    pub fn accept(&mut self) -> Option<A> {
        self.prompt.take().map(|p| p.action)
    }

    /// Close without running anything.
    pub fn cancel(&mut self) {
        self.prompt = None;
    }

    pub fn is_open(&self) -> bool {
        self.prompt.is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.prompt.as_ref().map(|p| p.title.as_str())
    }

    pub fn message(&self) -> Option<&str> {
        self.prompt.as_ref().map(|p| p.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebinding_replaces_previous_action() {
        let mut d = ConfirmDialog::new();
        assert_eq!(d.show("Delete", "first?", 1), None);
        assert_eq!(d.show("Delete", "second?", 2), Some(1));
        assert_eq!(d.message(), Some("second?"));
        assert_eq!(d.accept(), Some(2));
        assert!(!d.is_open());
        assert_eq!(d.accept(), None);
    }

    #[test]
    fn cancel_drops_the_action() {
        let mut d = ConfirmDialog::new();
        d.show("Delete", "sure?", "x");
        d.cancel();
        assert!(!d.is_open());
        assert_eq!(d.accept(), None);
    }
}
