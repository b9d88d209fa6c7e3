use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use tecleo::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{terminal_events, Runner},
    word_source::{FixedWords, RandomWords, WordList, WordSource},
    TypingResult,
};
use tracing::info;

const TICK_RATE_MS: u64 = 100;

/// timed word typing test: type the words before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// number of seconds the test lasts
    #[clap(short = 's', long = "secs")]
    session_duration_secs: Option<u64>,

    /// number of words drawn for a test
    #[clap(short = 'w', long = "words")]
    words_per_session: Option<usize>,

    /// bundled word list to draw from
    #[clap(short = 'l', long)]
    word_list: Option<String>,

    /// custom prompt to type instead of random words
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// store the resulting settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// write debug level events to the log file
    #[clap(long)]
    debug: bool,
}

impl Cli {
    /// Flags given on the command line win over the stored config.
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(secs) = self.session_duration_secs {
            config.session_duration_secs = secs;
        }
        if let Some(words) = self.words_per_session {
            config.words_per_session = words;
        }
        if let Some(ref list) = self.word_list {
            config.word_list = list.clone();
        }
        config
    }

    fn word_source(&self, config: &Config) -> TypingResult<Box<dyn WordSource>> {
        Ok(match self.prompt {
            Some(ref prompt) => Box::new(FixedWords::from_prompt(prompt)),
            None => Box::new(RandomWords::new(WordList::bundled(&config.word_list)?)),
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Err(err) = logging::init(&AppDirs::log_path(), cli.debug) {
        eprintln!("logging disabled: {err}");
    }

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    if cli.save_config {
        config.validate()?;
        store.save(&config)?;
        info!(path = %store.path().display(), "config saved");
    }

    let source = cli.word_source(&config)?;
    let mut app = App::new(config, source)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(terminal_events(), Duration::from_millis(TICK_RATE_MS));

    terminal.draw(|f| ui(app, f))?;

    while app.handle(runner.step())? == Control::Continue {
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
