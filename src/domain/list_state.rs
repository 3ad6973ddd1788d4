#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListUiState {
    Loading,
    Ready,
    Empty,
    Error,
}

/// State of a list screen (projects, chats, cameras, sites).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListScreenState<T> {
    ui_state: ListUiState,
    items: Vec<T>,
    error: Option<String>,
}

impl<T> Default for ListScreenState<T> {
    fn default() -> Self {
        Self {
            ui_state: ListUiState::Loading,
            items: Vec::new(),
            error: None,
        }
    }
}

impl<T> ListScreenState<T> {
    pub fn ui_state(&self) -> ListUiState {
        self.ui_state.clone()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_ready(&mut self, items: Vec<T>) {
        if items.is_empty() {
            self.set_empty();
            return;
        }

        self.ui_state = ListUiState::Ready;
        self.items = items;
        self.error = None;
    }

    pub fn set_empty(&mut self) {
        self.ui_state = ListUiState::Empty;
        self.items.clear();
        self.error = None;
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.ui_state = ListUiState::Error;
        self.items.clear();
        self.error = Some(text.into());
    }

    /// Applies a usecase result, mapping the error to its user-facing text.
    pub fn apply<E>(&mut self, result: Result<Vec<T>, E>, describe: impl FnOnce(&E) -> String) {
        match result {
            Ok(items) => self.set_ready(items),
            Err(error) => self.set_error(describe(&error)),
        }
    }
}
