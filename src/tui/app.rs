use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::todotxt::{check_tags, Clock, Task, TodoFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Input,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One list of the file, showing the tasks that carry all of `filters`.
#[derive(Debug, Clone)]
pub struct ListWindow {
    pub title: String,
    pub filters: Vec<String>,
    pub selected: usize,
}

impl ListWindow {
    pub fn new(path: &std::path::Path, filters: Vec<String>) -> Self {
        Self {
            title: format!("{}/{}", path.display(), filters.join("")),
            filters,
            selected: 0,
        }
    }
}

pub struct App {
    pub mode: AppMode,
    pub path: PathBuf,
    pub file: TodoFile,
    /// Open windows; the last one is on top.
    pub windows: Vec<ListWindow>,
    pub sort_by_priority: bool,
    pub input_buffer: String,
    pub status_message: Option<(String, StatusLevel)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(path: PathBuf, file: TodoFile, filters: Vec<String>) -> Self {
        let window = ListWindow::new(&path, filters);
        Self {
            mode: AppMode::Normal,
            path,
            file,
            windows: vec![window],
            sort_by_priority: false,
            input_buffer: String::new(),
            status_message: None,
            should_quit: false,
        }
    }

    pub fn window(&self) -> Option<&ListWindow> {
        self.windows.last()
    }

    /// Tasks shown in the top window with their file indices.
    pub fn visible_tasks(&self) -> Vec<(usize, &Task)> {
        let Some(window) = self.window() else {
            return Vec::new();
        };
        let mut tasks = self.file.filter(&window.filters);
        if self.sort_by_priority {
            // No priority sorts after Z; equal priorities keep file order
            tasks.sort_by_key(|(_, t)| (t.priority().is_none(), t.priority()));
        }
        tasks
    }

    pub fn selected_task(&self) -> Option<(usize, &Task)> {
        let selected = self.window()?.selected;
        self.visible_tasks().get(selected).copied()
    }

    pub fn move_selection_down(&mut self) {
        let visible = self.visible_tasks().len();
        if let Some(window) = self.windows.last_mut() {
            if visible > 0 && window.selected < visible - 1 {
                window.selected += 1;
            }
        }
    }

    pub fn move_selection_up(&mut self) {
        if let Some(window) = self.windows.last_mut() {
            window.selected = window.selected.saturating_sub(1);
        }
    }

    pub fn move_to_top(&mut self) {
        if let Some(window) = self.windows.last_mut() {
            window.selected = 0;
        }
    }

    pub fn move_to_bottom(&mut self) {
        let visible = self.visible_tasks().len();
        if let Some(window) = self.windows.last_mut() {
            window.selected = visible.saturating_sub(1);
        }
    }

    fn clamp_selections(&mut self) {
        for i in 0..self.windows.len() {
            let visible = self.file.filter(&self.windows[i].filters).len();
            let window = &mut self.windows[i];
            if window.selected >= visible {
                window.selected = visible.saturating_sub(1);
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>, level: StatusLevel) {
        self.status_message = Some((message.into(), level));
    }

    pub fn reload(&mut self) {
        match TodoFile::load(&self.path) {
            Ok(file) => {
                debug!("Reloaded {}", self.path.display());
                self.file = file;
                self.clamp_selections();
            }
            Err(e) => {
                self.set_status(format!("Error reading tasks: {}", e), StatusLevel::Error);
            }
        }
    }

    /// Completes the selected task and writes the file back.
    ///
    /// The file is re-read first so edits made elsewhere since the last
    /// reload are kept. If the selected line no longer holds the task on
    /// screen, nothing is written and the view is refreshed instead.
    pub fn complete_selected(&mut self, clock: &impl Clock) {
        let Some((index, shown)) = self.selected_task() else {
            return;
        };
        let shown = shown.to_string();

        let mut file = match TodoFile::load(&self.path) {
            Ok(file) => file,
            Err(e) => {
                self.set_status(format!("Error reading tasks: {}", e), StatusLevel::Error);
                return;
            }
        };

        let on_disk = file.get(index).map(|task| (task.to_string(), task.is_done()));
        match on_disk {
            Some((text, done)) if text == shown => {
                if done {
                    self.file = file;
                    self.clamp_selections();
                    self.set_status("Task is already done", StatusLevel::Warning);
                    return;
                }
            }
            _ => {
                warn!("Task {} changed on disk, not completing it", index);
                self.file = file;
                self.clamp_selections();
                self.set_status("Task changed on disk, reloaded", StatusLevel::Warning);
                return;
            }
        }

        if let Err(e) = file.complete(index, clock) {
            self.set_status(format!("Failed to complete task: {}", e), StatusLevel::Error);
            return;
        }
        match file.save(&self.path) {
            Ok(()) => {
                info!("Completed task {}", index);
                self.file = file;
                self.clamp_selections();
                self.set_status(format!("Completed task {}", index), StatusLevel::Success);
            }
            Err(e) => {
                self.reload();
                self.set_status(format!("Failed to save: {}", e), StatusLevel::Error);
            }
        }
    }

    pub fn toggle_sort(&mut self) {
        self.sort_by_priority = !self.sort_by_priority;
        let msg = if self.sort_by_priority {
            "Sorted by priority"
        } else {
            "File order"
        };
        self.set_status(msg, StatusLevel::Info);
    }

    pub fn start_filter(&mut self) {
        self.mode = AppMode::Input;
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.mode = AppMode::Normal;
        self.input_buffer.clear();
    }

    /// Opens a window for the tags typed at the filter prompt.
    pub fn submit_input(&mut self) {
        let tags: Vec<String> = self
            .input_buffer
            .split_whitespace()
            .map(str::to_string)
            .collect();
        self.mode = AppMode::Normal;
        self.input_buffer.clear();

        if tags.is_empty() {
            return;
        }
        match check_tags(&tags) {
            Ok(()) => self.open_window(tags),
            Err(e) => self.set_status(e.to_string(), StatusLevel::Error),
        }
    }

    pub fn open_window(&mut self, filters: Vec<String>) {
        let window = ListWindow::new(&self.path, filters);
        debug!("Opening window {}", window.title);
        self.windows.push(window);
    }

    /// Closes the top window; closing the last one quits.
    pub fn close_window(&mut self) {
        self.windows.pop();
        if self.windows.is_empty() {
            self.should_quit = true;
        }
    }

    pub fn toggle_help(&mut self) {
        if self.mode == AppMode::Help {
            self.mode = AppMode::Normal;
        } else {
            self.mode = AppMode::Help;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todotxt::task::FixedClock;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const LINES: &str = "Pay rent\n\
                         (B) Call mom +Family @phone\n\
                         (A) Book flights +Travel\n\
                         x 2012-12-23 Buy gifts +Family\n";

    fn app(dir: &TempDir) -> App {
        let path = dir.path().join("todo.txt");
        std::fs::write(&path, LINES).unwrap();
        let file = TodoFile::load(&path).unwrap();
        App::new(path, file, Vec::new())
    }

    fn indices(app: &App) -> Vec<usize> {
        app.visible_tasks().iter().map(|(i, _)| *i).collect()
    }

    #[test]
    fn test_window_title() {
        let window = ListWindow::new(
            std::path::Path::new("/t/todo.txt"),
            vec!["+a".into(), "@b".into()],
        );
        assert_eq!(window.title, "/t/todo.txt/+a@b");
    }

    #[test]
    fn test_sort_by_priority() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        assert_eq!(indices(&app), vec![0, 1, 2, 3]);

        app.toggle_sort();
        assert_eq!(indices(&app), vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_filter_opens_window() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        app.start_filter();
        app.input_buffer.push_str("+Family");
        app.submit_input();

        assert_eq!(app.windows.len(), 2);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(indices(&app), vec![1, 3]);

        app.close_window();
        assert_eq!(indices(&app), vec![0, 1, 2, 3]);
        assert!(!app.should_quit);
        app.close_window();
        assert!(app.should_quit);
    }

    #[test]
    fn test_bad_filter_keeps_window() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        app.start_filter();
        app.input_buffer.push_str("+Family oops");
        app.submit_input();

        assert_eq!(app.windows.len(), 1);
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(msg, "Bad tag: oops");
        assert_eq!(level, StatusLevel::Error);
    }

    #[test]
    fn test_complete_selected_saves() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let clock = FixedClock(NaiveDate::from_ymd_opt(2013, 1, 2).unwrap());

        app.move_selection_down();
        app.complete_selected(&clock);

        let saved = std::fs::read_to_string(&app.path).unwrap();
        assert_eq!(saved.lines().nth(1), Some("x 2013-01-02 (B) Call mom +Family @phone"));

        app.move_to_bottom();
        app.complete_selected(&clock);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);
    }

    #[test]
    fn test_selection_clamped_on_reload() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.move_to_bottom();
        assert_eq!(app.selected_task().map(|(i, _)| i), Some(3));

        std::fs::write(&app.path, "only one\n").unwrap();
        app.reload();
        assert_eq!(app.selected_task().map(|(i, _)| i), Some(0));
    }

    #[test]
    fn test_complete_keeps_lines_added_elsewhere() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        std::fs::write(&path, "first\nsecond\n").unwrap();
        let file = TodoFile::load(&path).unwrap();
        let mut app = App::new(path.clone(), file, Vec::new());

        std::fs::write(&path, "first\nsecond\nadded elsewhere\n").unwrap();
        app.complete_selected(&FixedClock(NaiveDate::from_ymd_opt(2013, 1, 2).unwrap()));

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "x 2013-01-02 first\nsecond\nadded elsewhere\n"
        );
        assert_eq!(app.file.len(), 3);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Success);
    }

    #[test]
    fn test_complete_skips_task_changed_elsewhere() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        std::fs::write(&path, "first\nsecond\n").unwrap();
        let file = TodoFile::load(&path).unwrap();
        let mut app = App::new(path.clone(), file, Vec::new());

        std::fs::write(&path, "inserted\nfirst\nsecond\n").unwrap();
        app.complete_selected(&FixedClock(NaiveDate::from_ymd_opt(2013, 1, 2).unwrap()));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "inserted\nfirst\nsecond\n");
        assert_eq!(app.file.get(0).unwrap().to_string(), "inserted");
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(msg, "Task changed on disk, reloaded");
        assert_eq!(level, StatusLevel::Warning);
    }
}
