//! CLI handlers. Each one calls into [`crate::actions`] and prints the result.

use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::actions::{create_task, delete_task, get_tasks, toggle_task_completion};
use crate::auth::{self, Session};
use crate::codec::{fields, FormData};
use crate::config::Config;
use crate::error::Result;
use crate::format::{describe_optional, format_due_date, status_label};
use crate::models::Task;
use crate::storage::Store;

/// Recurrence options for `add`, named after the form fields they fill.
#[derive(Debug, Default, Clone)]
pub struct RepeatArgs {
    /// none, daily, weekly, monthly or custom.
    pub repeat: Option<String>,
    /// Interval for daily and custom rules.
    pub every: Option<String>,
    /// Days for weekly rules.
    pub days: Vec<String>,
    pub day_of_month: Option<String>,
    pub unit: Option<String>,
}

/// Maps CLI arguments onto the add-task form so both front ends share one
/// recurrence policy.
pub fn build_form(title: &str, due: &str, repeat: &RepeatArgs) -> FormData {
    let mut form = FormData::new().with(fields::TITLE, title).with(fields::DUE_DATE, due);
    if let Some(kind) = &repeat.repeat {
        form.append(fields::REPETITION_TYPE, kind.as_str());
    }
    if let Some(every) = &repeat.every {
        form.append(fields::DAILY_INTERVAL, every.as_str());
        form.append(fields::CUSTOM_INTERVAL, every.as_str());
    }
    for day in &repeat.days {
        form.append(fields::WEEKLY_DAYS, day.as_str());
    }
    if let Some(day) = &repeat.day_of_month {
        form.append(fields::MONTHLY_DAY, day.as_str());
    }
    if let Some(unit) = &repeat.unit {
        form.append(fields::CUSTOM_UNIT, unit.as_str());
    }
    form
}

/// Signs in, or reports the existing session.
pub fn cmd_login(config: &Config, email: &str, name: Option<&str>) -> Result<()> {
    if let Some(session) = auth::current_session(config) {
        println!("Já conectado como {}.", session.email);
        return Ok(());
    }
    let session = auth::sign_in(config, email, name)?;
    println!("Conectado como {}.", session.email);
    Ok(())
}

pub fn cmd_logout(config: &Config) -> Result<()> {
    if auth::sign_out(config)? {
        println!("Sessão encerrada.");
    } else {
        println!("Nenhuma sessão ativa.");
    }
    Ok(())
}

pub fn cmd_whoami(session: Option<&Session>) {
    match session {
        Some(s) => match &s.name {
            Some(name) => println!("{} <{}>", name, s.email),
            None => println!("{}", s.email),
        },
        None => println!("Nenhuma sessão ativa."),
    }
}

/// Adds a new task for the signed-in user.
pub fn cmd_add(store: &Store, session: Option<&Session>, form: &FormData) -> Result<()> {
    let task = create_task(store, session, form)?;
    println!(
        "Tarefa criada (id = {}): {}",
        task.task_id,
        describe_optional(task.repetition.as_ref())
    );
    Ok(())
}

/// Lists the user's tasks in a table, earliest due date first.
pub fn cmd_list(store: &Store, session: Option<&Session>) -> Result<()> {
    let tasks = get_tasks(store, session)?;
    if tasks.is_empty() {
        println!("Nenhuma tarefa");
        println!("Comece criando uma nova tarefa.");
        return Ok(());
    }
    println!("{}", task_table(&tasks));
    Ok(())
}

pub fn task_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Tarefa").add_attribute(Attribute::Bold),
            Cell::new("Vencimento").add_attribute(Attribute::Bold),
            Cell::new("Repetição").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status_color = if t.is_completed { Color::Green } else { Color::Yellow };
        let title = if t.is_completed {
            Cell::new(&t.title).add_attribute(Attribute::CrossedOut).fg(Color::Grey)
        } else {
            Cell::new(&t.title)
        };
        table.add_row(vec![
            Cell::new(t.task_id),
            title,
            Cell::new(format_due_date(t.due_date)),
            Cell::new(describe_optional(t.repetition.as_ref())),
            Cell::new(status_label(t.is_completed)).fg(status_color),
        ]);
    }
    table
}

/// Marks a task as completed, or back to pending.
pub fn cmd_toggle(store: &Store, session: Option<&Session>, id: u64) -> Result<()> {
    let task = toggle_task_completion(store, session, id)?;
    println!("Tarefa {}: {}.", id, status_label(task.is_completed));
    Ok(())
}

/// Removes a task, asking first unless `force` is set.
pub fn cmd_remove(store: &Store, session: Option<&Session>, id: u64, force: bool) -> Result<()> {
    let session = auth::require_session(session)?;
    if !force {
        print!("Tem certeza que deseja excluir esta tarefa? [s/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !matches!(input.trim().to_lowercase().as_str(), "s" | "y") {
            println!("Cancelado.");
            return Ok(());
        }
    }
    delete_task(store, Some(session), id)?;
    println!("Tarefa {} excluída.", id);
    Ok(())
}
