use chrono::{Local, NaiveDate};

use crate::error::Result;
use crate::operations;
use crate::store::TaskStore;
use crate::task::{format_date, parse_date, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Description,
    Deadline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub description: String,
    pub deadline: String,
    pub focus: FormField,
    pub editing: Option<usize>, // row being edited, None when adding
}

impl TaskForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Description => &mut self.description,
            FormField::Deadline => &mut self.deadline,
        }
    }

    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Description => FormField::Deadline,
            FormField::Deadline => FormField::Description,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Form(TaskForm),
}

/// One user's session: the loaded collection plus selection and form state.
#[derive(Debug)]
pub struct Planner {
    store: TaskStore,
    identity: String,
    pub tasks: Vec<Task>,
    pub selected: usize,
    pub mode: Mode,
    pub status: Option<String>,
}

impl Planner {
    pub fn open(store: TaskStore, identity: impl Into<String>) -> Result<Self> {
        let identity = identity.into();
        let tasks = store.load(&identity)?;
        Ok(Self {
            store,
            identity,
            tasks,
            selected: 0,
            mode: Mode::Browse,
            status: None,
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn all_completed(&self) -> bool {
        operations::all_completed(&self.tasks)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn start_add(&mut self) {
        self.start_add_on(Local::now().date_naive());
    }

    pub fn start_add_on(&mut self, today: NaiveDate) {
        self.mode = Mode::Form(TaskForm {
            description: String::new(),
            deadline: format_date(today),
            focus: FormField::Description,
            editing: None,
        });
    }

    pub fn start_edit(&mut self) {
        if let Some(task) = self.tasks.get(self.selected) {
            self.mode = Mode::Form(TaskForm {
                description: task.description.clone(),
                deadline: task.deadline.clone(),
                focus: FormField::Description,
                editing: Some(self.selected),
            });
        }
    }

    pub fn cancel_form(&mut self) {
        self.mode = Mode::Browse;
    }

    /// Applies the open form. Invalid input keeps the form open with a
    /// status message.
    pub fn submit_form(&mut self) {
        let Mode::Form(form) = &self.mode else {
            return;
        };
        let Some(deadline) = parse_date(&form.deadline) else {
            self.status = Some("Deadline must be YYYY-MM-DD".to_string());
            return;
        };
        let description = form.description.trim().to_string();
        let editing = form.editing;

        let result = match editing {
            Some(index) => operations::edit(
                &self.store,
                &self.identity,
                &mut self.tasks,
                index,
                &description,
                deadline,
            ),
            None => operations::add(
                &self.store,
                &self.identity,
                &mut self.tasks,
                &description,
                deadline,
            )
            .map(drop),
        };

        match result {
            Ok(()) => {
                if editing.is_none() {
                    self.selected = self.tasks.len() - 1;
                }
                self.mode = Mode::Browse;
                self.status = None;
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(task) = self.tasks.get(self.selected) else {
            return;
        };
        let value = !task.completed;
        let result = operations::toggle_complete(
            &self.store,
            &self.identity,
            &mut self.tasks,
            self.selected,
            value,
        );
        self.report(result);
    }

    pub fn delete_selected(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let result =
            operations::delete(&self.store, &self.identity, &mut self.tasks, self.selected);
        if result.is_ok() {
            self.clamp_selection();
        }
        self.report(result.map(|_| ()));
    }

    pub fn purge_completed(&mut self) {
        match operations::purge_completed(&self.store, &self.identity, self.tasks.clone()) {
            Ok(remaining) => {
                self.tasks = remaining;
                self.clamp_selection();
                self.status = None;
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
    }

    fn report(&mut self, result: Result<()>) {
        self.status = result.err().map(|err| err.to_string());
    }
}
