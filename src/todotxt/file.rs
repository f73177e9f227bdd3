use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::debug;

use super::task::{Clock, Task};
use crate::error::{Result, TodoError};

/// The tasks of a todo.txt file, one per line. A task's index is its
/// 0-based line number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFile {
    tasks: Vec<Task>,
}

impl TodoFile {
    /// Reads one task per line. Blank lines are kept as empty tasks so
    /// indices stay aligned with line numbers.
    pub fn read_from(input: impl BufRead) -> Result<Self> {
        Self::read_named(input, Path::new("-"))
    }

    /// Like [`TodoFile::read_from`], naming `path` in encoding errors.
    fn read_named(mut input: impl BufRead, path: &Path) -> Result<Self> {
        let mut tasks = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = std::str::from_utf8(&buf).map_err(|_| TodoError::Encoding {
                path: path.to_path_buf(),
                line: tasks.len() + 1,
            })?;
            tasks.push(Task::new(line.trim_end_matches(['\r', '\n'])));
        }
        Ok(Self { tasks })
    }

    pub fn write_to(&self, mut out: impl Write) -> Result<()> {
        for task in &self.tasks {
            writeln!(out, "{}", task)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Loads the file at `path`. A missing file is an empty list.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("{} does not exist, starting empty", path.display());
            return Ok(Self::default());
        }
        let file = fs::File::open(path)?;
        let todo = Self::read_named(BufReader::new(file), path)?;
        debug!("Read {} tasks from {}", todo.len(), path.display());
        Ok(todo)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        fs::write(path, buf)?;
        debug!("Wrote {} tasks to {}", self.len(), path.display());
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends a task and returns its index.
    pub fn push(&mut self, task: Task) -> usize {
        self.tasks.push(task);
        self.tasks.len() - 1
    }

    /// Returns the tasks carrying every one of `tags`, with their indices.
    pub fn filter<'a, S: AsRef<str>>(&'a self, tags: &[S]) -> Vec<(usize, &'a Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| tags.iter().all(|tag| task.has_tag(tag.as_ref())))
            .collect()
    }

    /// Completes the task at `index`.
    pub fn complete(&mut self, index: usize, clock: &impl Clock) -> Result<&Task> {
        let task = self.tasks.get_mut(index).ok_or(TodoError::TaskIndex(index))?;
        task.complete(clock);
        Ok(&*task)
    }
}
