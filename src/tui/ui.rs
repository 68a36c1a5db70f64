use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use crate::format::{describe_optional, format_due_date, status_label};
use super::app::{AddStep, App, InputMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Status
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    let user = app.session.name.clone().unwrap_or_else(|| app.session.email.clone());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Tarefas Domésticas - {}", user));

    if app.tasks.is_empty() {
        let empty = Paragraph::new("Nenhuma tarefa\nComece criando uma nova tarefa (a).")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let rows: Vec<Row> = app
            .tasks
            .iter()
            .map(|t| {
                let style = if t.is_completed {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                let status_style = if t.is_completed {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Yellow)
                };

                Row::new(vec![
                    Cell::from(t.task_id.to_string()),
                    Cell::from(t.title.clone()).style(style),
                    Cell::from(format_due_date(t.due_date)),
                    Cell::from(describe_optional(t.repetition.as_ref())),
                    Cell::from(status_label(t.is_completed)).style(status_style),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(28),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(Row::new(vec!["ID", "Tarefa", "Vencimento", "Repetição", "Status"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1))
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, chunks[0], &mut app.state);
    }

    let status = Paragraph::new(app.status.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Magenta));
    f.render_widget(status, chunks[1]);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Sair | a: Adicionar | Space: Concluir/Reabrir | d: Excluir | j/k: Navegar",
        InputMode::Adding => "Enter: Próximo | Esc: Cancelar",
        InputMode::ConfirmDelete(_) => "Tem certeza que deseja excluir esta tarefa? s: Sim | qualquer tecla: Não",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    if app.input_mode == InputMode::Adding {
        let area = centered_rect(60, 3, f.area()); // border + 1 line
        f.render_widget(Clear, area);

        let title = match app.add_state.step {
            AddStep::Title => "Nova Tarefa: Título",
            AddStep::Due => "Nova Tarefa: Vencimento (AAAA-MM-DD)",
            AddStep::RepetitionType => "Repetição: none, daily, weekly, monthly, custom",
            AddStep::DailyInterval => "A cada quantos dias?",
            AddStep::WeeklyDays => "Dias (ex: monday, friday)",
            AddStep::MonthlyDay => "Dia do mês (1-31)",
            AddStep::CustomInterval => "Intervalo",
            AddStep::CustomUnit => "Unidade: days, weeks, months, years",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
