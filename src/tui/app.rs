use ratatui::widgets::TableState;
use tracing::warn;
use crate::actions::{create_task, delete_task, get_tasks, toggle_task_completion};
use crate::auth::Session;
use crate::codec::{fields, FormData, NO_REPETITION};
use crate::models::{RecurrenceKind, Task};
use crate::storage::Store;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
    /// Waiting for y/n before deleting this task.
    ConfirmDelete(u64),
}

/// Steps of the "Add Task" wizard. Which recurrence steps appear depends on
/// the chosen repetition type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AddStep {
    #[default]
    Title,
    Due,
    RepetitionType,
    DailyInterval,
    WeeklyDays,
    MonthlyDay,
    CustomInterval,
    CustomUnit,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub form: FormData,
    pub step: AddStep,
}

pub struct App {
    pub store: Store,
    pub session: Session,
    pub tasks: Vec<Task>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    /// Last outcome shown under the table.
    pub status: Option<String>,
}

impl App {
    /// Creates a new App instance and loads the user's tasks.
    pub fn new(store: Store, session: Session) -> App {
        let mut app = App {
            store,
            session,
            tasks: Vec::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            status: None,
        };
        app.reload();
        app
    }

    /// Selects the next task, wrapping around.
    pub fn next(&mut self) {
        if self.tasks.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task, wrapping around.
    pub fn previous(&mut self) {
        if self.tasks.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    /// Flips the selected task between pending and completed.
    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.task_id) else { return };
        match toggle_task_completion(&self.store, Some(&self.session), id) {
            Ok(_) => self.status = None,
            Err(e) => self.status = Some(e.to_string()),
        }
        self.reload();
    }

    /// Asks for confirmation before deleting the selected task.
    pub fn ask_delete_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.task_id) {
            self.input_mode = InputMode::ConfirmDelete(id);
        }
    }

    pub fn delete(&mut self, task_id: u64) {
        match delete_task(&self.store, Some(&self.session), task_id) {
            Ok(()) => self.status = Some(format!("Tarefa {} excluída.", task_id)),
            Err(e) => self.status = Some(e.to_string()),
        }
        self.input_mode = InputMode::Normal;
        self.reload();
    }

    /// Leaves the wizard or confirmation prompt without changes.
    pub fn cancel(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Reloads tasks from storage and keeps the selection in range.
    pub fn reload(&mut self) {
        self.tasks = match get_tasks(&self.store, Some(&self.session)) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "failed to load tasks");
                self.status = Some(e.to_string());
                Vec::new()
            }
        };

        if self.tasks.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.tasks.len() {
                self.state.select(Some(self.tasks.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
        self.status = None;
    }

    /// Takes the current input as the answer to the current wizard step.
    pub fn handle_adding_input(&mut self) {
        let input = self.input_buffer.trim().to_string();
        let form = &mut self.add_state.form;
        let next = match self.add_state.step {
            AddStep::Title => {
                if input.is_empty() { return; }
                form.append(fields::TITLE, input);
                Some(AddStep::Due)
            }
            AddStep::Due => {
                if input.is_empty() { return; }
                form.append(fields::DUE_DATE, input);
                Some(AddStep::RepetitionType)
            }
            AddStep::RepetitionType => {
                let kind = if input.is_empty() { NO_REPETITION.to_string() } else { input.to_lowercase() };
                let next = match kind.parse::<RecurrenceKind>() {
                    Ok(RecurrenceKind::Daily) => Some(AddStep::DailyInterval),
                    Ok(RecurrenceKind::Weekly) => Some(AddStep::WeeklyDays),
                    Ok(RecurrenceKind::Monthly) => Some(AddStep::MonthlyDay),
                    Ok(RecurrenceKind::Custom) => Some(AddStep::CustomInterval),
                    Err(_) => None,
                };
                form.append(fields::REPETITION_TYPE, kind);
                next
            }
            AddStep::DailyInterval => {
                form.append(fields::DAILY_INTERVAL, input);
                None
            }
            AddStep::WeeklyDays => {
                for day in input.split(|c: char| c == ',' || c.is_whitespace()).filter(|d| !d.is_empty()) {
                    form.append(fields::WEEKLY_DAYS, day.to_lowercase());
                }
                None
            }
            AddStep::MonthlyDay => {
                form.append(fields::MONTHLY_DAY, input);
                None
            }
            AddStep::CustomInterval => {
                form.append(fields::CUSTOM_INTERVAL, input);
                Some(AddStep::CustomUnit)
            }
            AddStep::CustomUnit => {
                form.append(fields::CUSTOM_UNIT, input.to_lowercase());
                None
            }
        };
        self.input_buffer.clear();

        match next {
            Some(step) => self.add_state.step = step,
            None => self.finish_add(),
        }
    }

    fn finish_add(&mut self) {
        match create_task(&self.store, Some(&self.session), &self.add_state.form) {
            Ok(task) => self.status = Some(format!("Tarefa criada (id = {}).", task.task_id)),
            Err(e) => {
                self.status = Some(format!("Erro ao criar tarefa. Tente novamente. ({})", e));
            }
        }
        self.input_mode = InputMode::Normal;
        self.reload();
    }
}
