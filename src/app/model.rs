//! Application model types: `App` and `Mode`.

use std::path::PathBuf;

use crate::controller::ControlResult;

/// Which screen the UI is showing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Choose one configured folder or all of them.
    #[default]
    FolderPicker,
    Player,
    /// Typing a search query over the playlist.
    Search,
}

/// The main application (view) model.
pub struct App {
    pub mode: Mode,

    pub folders: Vec<PathBuf>,
    pub picker_selected: usize,
    /// Human-readable label of what was loaded, e.g. a folder path or "All Folders".
    pub source_label: Option<String>,

    pub search_query: String,
    pub search_results: Vec<(String, usize)>,
    pub search_selected: usize,

    pub show_progress_bar: bool,
    pub show_details: bool,

    /// Last advisory message (errors from commands, startup notes).
    pub message: Option<String>,
}

pub const ALL_FOLDERS: &str = "All Folders";

impl App {
    /// Create a new `App` for the configured `folders`.
    pub fn new(folders: Vec<PathBuf>) -> Self {
        Self {
            mode: Mode::FolderPicker,
            folders,
            picker_selected: 0,
            source_label: None,
            search_query: String::new(),
            search_results: Vec::new(),
            search_selected: 0,
            show_progress_bar: false,
            show_details: false,
            message: None,
        }
    }

    /// Picker rows: every folder, then the "All Folders" entry.
    pub fn picker_entries(&self) -> Vec<String> {
        self.folders
            .iter()
            .map(|f| f.display().to_string())
            .chain(std::iter::once(ALL_FOLDERS.to_string()))
            .collect()
    }

    pub fn picker_next(&mut self) {
        let n = self.folders.len() + 1;
        self.picker_selected = (self.picker_selected + 1) % n;
    }

    pub fn picker_prev(&mut self) {
        let n = self.folders.len() + 1;
        self.picker_selected = (self.picker_selected + n - 1) % n;
    }

    /// Folders to load for the current picker row, with a label for the status line.
    pub fn picker_choice(&self) -> (Vec<PathBuf>, String) {
        match self.folders.get(self.picker_selected) {
            Some(folder) => (vec![folder.clone()], folder.display().to_string()),
            None => (self.folders.clone(), ALL_FOLDERS.to_string()),
        }
    }

    /// Switch to the player after a successful load.
    pub fn enter_player(&mut self, label: String) {
        self.source_label = Some(label);
        self.mode = Mode::Player;
    }

    pub fn enter_search(&mut self) {
        self.mode = Mode::Search;
        self.search_query.clear();
        self.search_results.clear();
        self.search_selected = 0;
    }

    pub fn exit_search(&mut self) {
        self.mode = Mode::Player;
        self.search_query.clear();
        self.search_results.clear();
        self.search_selected = 0;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
    }

    /// Replace the results, keeping the cursor in range.
    pub fn set_search_results(&mut self, results: Vec<(String, usize)>) {
        self.search_results = results;
        if self.search_selected >= self.search_results.len() {
            self.search_selected = 0;
        }
    }

    pub fn search_next(&mut self) {
        if !self.search_results.is_empty() {
            self.search_selected = (self.search_selected + 1) % self.search_results.len();
        }
    }

    pub fn search_prev(&mut self) {
        let n = self.search_results.len();
        if n > 0 {
            self.search_selected = (self.search_selected + n - 1) % n;
        }
    }

    /// Playlist index of the highlighted search result.
    pub fn selected_search_index(&self) -> Option<usize> {
        self.search_results.get(self.search_selected).map(|(_, i)| *i)
    }

    pub fn toggle_progress_bar(&mut self) {
        self.show_progress_bar = !self.show_progress_bar;
    }

    pub fn toggle_details(&mut self) {
        self.show_details = !self.show_details;
    }

    pub fn notify(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Show a failed command as a message; successes clear it.
    pub fn report<T>(&mut self, result: &ControlResult<T>) {
        match result {
            Ok(_) => self.clear_message(),
            Err(e) => self.notify(e.to_string()),
        }
    }
}
