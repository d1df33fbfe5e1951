use anyhow::Result;
use costlens::{BudgetReport, Severity};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

pub struct App {
    pub report: BudgetReport,
    pub state: TableState,
}

impl App {
    pub fn new(report: BudgetReport) -> Self {
        let mut state = TableState::default();
        if !report.items.is_empty() {
            state.select(Some(0));
        }
        Self { report, state }
    }

    pub fn next(&mut self) {
        let len = self.report.items.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.report.items.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Verdict header
            Constraint::Min(0),    // Items + suggestions
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_items(f, content[0], app);
    render_suggestions(f, content[1], app);
    render_status_bar(f, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let verdict = &app.report.verdict;
    let diff_color = if verdict.is_deficit() { Color::Red } else { Color::Green };
    let sign = if verdict.is_deficit() { "-" } else { "" };
    let costs = &verdict.category_costs;

    let lines = vec![
        Line::from(vec![
            Span::styled(
                app.report.city.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  |  Salary: ${:.2}", app.report.salary)),
            Span::raw("  |  Left over: "),
            Span::styled(
                format!("{}${:.2}", sign, verdict.diff.abs()),
                Style::default().fg(diff_color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!(
                    "Housing ${:.2}  Food ${:.2}  Transport ${:.2}  ",
                    costs.housing, costs.food, costs.transport
                ),
                Style::default().fg(Color::White),
            ),
            Span::styled(verdict.summary.clone(), Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let header = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_items(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Item", "Unit", "Qty", "Monthly"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.report.items.iter().map(|item| {
        let (unit, color) = match item.unit_price {
            Some(price) => (format!("{:.2}", price), Color::White),
            None => ("n/a".to_string(), Color::DarkGray),
        };

        Row::new(vec![
            Cell::from(item.label.clone()),
            Cell::from(unit).style(Style::default().fg(color)),
            Cell::from(format!("{}", item.quantity)),
            Cell::from(format!("{:.2}", item.monthly)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Monthly Costs "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn severity_style(severity: Severity) -> (&'static str, Color) {
    match severity {
        Severity::Good => ("✓", Color::Green),
        Severity::Neutral => ("i", Color::Gray),
        Severity::Bad => ("!", Color::Red),
    }
}

fn render_suggestions(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    for suggestion in &app.report.verdict.suggestions {
        let (icon, color) = severity_style(suggestion.severity);
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", icon), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(suggestion.text.clone(), Style::default().fg(color)),
        ]));
        lines.push(Line::from(""));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Suggestions "),
        );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let status_spans = vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use costlens::{CategoryCosts, CostBreakdown, CostRecord, LabelTable, Salary};

    fn app(records: Vec<CostRecord>) -> App {
        let breakdown = costlens::aggregate(&records, &LabelTable::default());
        App::new(BudgetReport::new("Lisbon", Salary::new(2000.0).unwrap(), breakdown))
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app(vec![CostRecord::new("Monthly Pass", "40")]);
        let len = app.report.items.len();

        app.previous();
        assert_eq!(app.state.selected(), Some(len - 1));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_without_items() {
        let breakdown = CostBreakdown::from_parts(CategoryCosts::default(), None, None, 0.0);
        let mut app = App::new(BudgetReport::new("X", Salary::new(1.0).unwrap(), breakdown));

        app.next();
        assert_eq!(app.state.selected(), None);
    }
}
