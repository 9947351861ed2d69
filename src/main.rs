mod app;
mod config;
mod engine;
mod event;
mod logging;
mod session;
mod source;
mod surface;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tracing::{info, warn};

use app::{App, Regions};
use config::Config;
use engine::highlight::rendered_runs;
use event::{AppEvent, EventHandler};
use session::editor::Mode;
use ui::components::input_pane::InputPane;
use ui::components::typing_area::{TargetArea, Viewport};
use ui::layout::{AppLayout, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "retype", version, about = "Terminal typing practice on your own pasted text")]
struct Cli {
    #[arg(short, long, help = "Practise on the contents of this file instead of a paste")]
    file: Option<PathBuf>,

    #[arg(long, help = "Correct a mistyped word when its trailing space is typed")]
    autocorrect: bool,

    #[arg(long, help = "Insert punctuation automatically so only letters need typing")]
    ignore_punctuation: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = Config::path();
    let load_result = Config::load_from(&config_path);
    let mut config = load_result.as_ref().cloned().unwrap_or_default();

    let _log_guard = match logging::init(&config.log_level) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("logging disabled: {err:#}");
            None
        }
    };
    if let Err(err) = &load_result {
        warn!(path = %config_path.display(), %err, "config unreadable, using defaults");
    }

    // Read the file before touching the terminal so errors print normally.
    let initial_text = cli
        .file
        .as_deref()
        .map(source::load_text)
        .transpose()
        .context("could not load practice text")?;

    config.autocorrect |= cli.autocorrect;
    config.ignore_punctuation |= cli.ignore_punctuation;
    let theme_name = cli.theme.unwrap_or_else(|| config.theme.clone());
    let theme = Theme::load(&theme_name).unwrap_or_else(|| {
        warn!(theme = %theme_name, available = ?Theme::available_themes(), "unknown theme, using default");
        Theme::default()
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste, EnableMouseCapture)?;

    // Release events only arrive with the kitty keyboard protocol.
    let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true))
        && execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok();
    info!(keyboard_enhanced, "terminal ready");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, config_path, theme, keyboard_enhanced);
    if let Some(text) = initial_text.as_deref() {
        app.editor.set_target_text(Some(text));
    }

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);
    app.shutdown();

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        let mut regions = app.regions;
        terminal.draw(|frame| regions = render(frame, app))?;
        app.regions = regions;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Paste(text) => app.handle_paste(text),
            AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn render(frame: &mut ratatui::Frame, app: &App) -> Regions {
    let area = frame.area();
    let colors = &app.theme.colors;
    let editor = &app.editor;
    let settings = editor.settings();

    let autocorrect_hint = format!("[F2] autocorrect: {}", on_off(settings.autocorrect));
    let punctuation_hint = format!("[F3] skip punctuation: {}", on_off(settings.ignore_punctuation));
    let hints = [
        autocorrect_hint.as_str(),
        punctuation_hint.as_str(),
        "[Ctrl+N] new text",
        "[Click] jump to word",
        "[Esc] quit",
    ];
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    let typed = editor.typed_text();
    let typed_len = typed.chars().count();
    let (status, status_color) = match editor.mode() {
        Mode::AwaitingText => ("waiting for text".to_string(), colors.header_fg()),
        Mode::Practicing(target) if typed == target.as_str() => {
            ("complete".to_string(), colors.success())
        }
        Mode::Practicing(target) => (format!("{typed_len}/{}", target.len()), colors.header_fg()),
    };
    let mut header_spans = vec![
        Span::styled(
            " retype ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("| {status} "),
            Style::default().fg(status_color).bg(colors.header_bg()),
        ),
    ];
    if let Some(err) = &app.last_error {
        header_spans.push(Span::styled(
            format!("| {err}"),
            Style::default().fg(colors.text_incorrect()).bg(colors.header_bg()),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans))
        .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let target_view = editor.target_view();
    frame.render_widget(TargetArea::new(target_view, typed_len, &app.theme), layout.target);

    let runs = rendered_runs(editor.highlight());
    let input = InputPane::new(editor.input(), &runs, &app.theme)
        .caret(editor.caret_offset(), editor.input().is_focused());
    frame.render_widget(input, layout.input);

    let footer_lines: Vec<Line> = hint_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);

    Regions {
        header: layout.header,
        target: Viewport::compute(layout.target, target_view, typed_len),
        input: layout.input,
        footer: layout.footer,
    }
}
