mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
};
use twistr::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    corpus::{CorpusSource, EmbeddedCorpusSource, FileCorpusSource, ScoredCorpus},
    drill::{DrillProgress, DrillSession, DrillStep, TrainingMode},
    focus::Focus,
    language::{select_corpus, BandFilter, TextAnalyzer},
    runtime::{
        command_for, Command, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker,
        TrainerEvent,
    },
    session::{AdaptiveSession, RoundFeedback, RoundPrompt, SessionSummary},
};

/// terminal tongue twister trainer with difficulty scoring and adaptive sessions
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "Scores tongue twisters by pronunciation difficulty and drills you through them, either with a fixed routine or with adaptive perfection rounds that follow your self-ratings."
)]
pub struct Cli {
    /// path to the tongue twister dataset
    #[clap(long)]
    json: Option<PathBuf>,

    /// number of tongue twisters to train
    #[clap(short = 'n', long)]
    count: Option<usize>,

    /// difficulty band to draw from
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<BandFilter>,

    /// training routine
    #[clap(short = 'm', long, value_enum)]
    mode: Option<TrainingMode>,

    /// seconds per twister in timed mode
    #[clap(short = 't', long)]
    time: Option<u64>,

    /// repetitions per twister in repeat mode
    #[clap(short = 'r', long)]
    reps: Option<u32>,

    /// what perfection mode concentrates on
    #[clap(short = 'f', long, value_enum)]
    focus: Option<Focus>,

    /// perfection level 1-5, sessions run level + 2 rounds
    #[clap(short = 'l', long)]
    level: Option<u8>,

    /// blend all bands proportionally when no band is chosen
    #[clap(long)]
    mix: Option<bool>,

    /// seed for reproducible selection
    #[clap(long)]
    seed: Option<u64>,

    /// use the bundled sample dataset
    #[clap(long)]
    sample: bool,

    /// store these options as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer the flags that were given over stored preferences
    fn apply(&self, config: Config) -> Config {
        Config {
            json: self.json.clone().unwrap_or(config.json),
            count: self.count.unwrap_or(config.count),
            difficulty: self.difficulty.unwrap_or(config.difficulty),
            mode: self.mode.unwrap_or(config.mode),
            time: self.time.unwrap_or(config.time),
            reps: self.reps.unwrap_or(config.reps),
            focus: self.focus.unwrap_or(config.focus),
            level: self.level.unwrap_or(config.level),
            mix: self.mix.unwrap_or(config.mix),
        }
    }
}

#[derive(Debug, Default)]
pub struct AdaptiveState {
    pub prompt: Option<RoundPrompt>,
    pub feedback: Option<RoundFeedback>,
    pub summary: Option<SessionSummary>,
}

pub enum Activity {
    Drill(DrillSession),
    Adaptive(Box<AdaptiveSession>, AdaptiveState),
}

pub struct App {
    pub config: Config,
    pub band_counts: [usize; 4],
    pub activity: Activity,
    pub should_quit: bool,
    rng: ChaCha8Rng,
}

impl App {
    pub fn new(
        config: Config,
        corpus: &ScoredCorpus,
        analyzer: TextAnalyzer,
        mut rng: ChaCha8Rng,
    ) -> twistr::Result<Self> {
        let items = select_corpus(
            corpus,
            config.difficulty,
            config.count,
            config.mix,
            &mut rng,
        )?;

        let activity = match config.mode {
            TrainingMode::Perfection => {
                let mut session =
                    AdaptiveSession::new(items, config.focus, config.level, analyzer, &mut rng)?;
                let state = AdaptiveState {
                    prompt: session.next_round(&mut rng),
                    ..AdaptiveState::default()
                };
                Activity::Adaptive(Box::new(session), state)
            }
            mode => Activity::Drill(DrillSession::new(items, mode, config.time, config.reps)?),
        };

        Ok(Self {
            band_counts: corpus.band_counts(),
            config,
            activity,
            should_quit: false,
            rng,
        })
    }

    pub fn is_finished(&self) -> bool {
        match &self.activity {
            Activity::Drill(drill) => drill.is_finished(),
            Activity::Adaptive(_, state) => state.summary.is_some(),
        }
    }

    pub fn handle(&mut self, command: Command) {
        if command == Command::Quit {
            self.should_quit = true;
            return;
        }

        match &mut self.activity {
            Activity::Drill(drill) => {
                if command == Command::Advance && drill.advance() == DrillProgress::Finished {
                    log::info!("all {} tongue twisters done", drill.items().len());
                }
            }
            Activity::Adaptive(session, state) => match command {
                Command::Rate(rating) if state.feedback.is_none() && state.prompt.is_some() => {
                    match session.submit_rating(rating as i64) {
                        Ok(feedback) => state.feedback = Some(feedback),
                        Err(err) => log::warn!("rating ignored: {err}"),
                    }
                }
                Command::Advance if state.feedback.is_some() => {
                    state.feedback = None;
                    state.prompt = session.next_round(&mut self.rng);
                    if state.prompt.is_none() {
                        state.summary = Some(session.summary());
                    }
                }
                _ => {}
            },
        }
    }

    /// Returns true when the screen needs redrawing
    pub fn on_tick(&mut self, elapsed_secs: f64) -> bool {
        match &mut self.activity {
            Activity::Drill(drill) => {
                let counting = matches!(drill.step(), DrillStep::Countdown { .. });
                drill.on_tick(elapsed_secs);
                counting
            }
            Activity::Adaptive(..) => false,
        }
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load()).sanitized();
    if cli.save_config {
        store.save(&config)?;
        log::info!("saved defaults to {}", store.path().display());
    }

    let loaded = if cli.sample {
        EmbeddedCorpusSource.load()
    } else {
        FileCorpusSource::new(&config.json).load()
    };
    let items = match loaded {
        Ok(items) => items,
        Err(err) => Cli::command().error(ErrorKind::Io, err).exit(),
    };

    let analyzer = TextAnalyzer::default();
    let corpus = ScoredCorpus::analyze(items, &analyzer);
    let rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut app = match App::new(config, &corpus, analyzer, rng) {
        Ok(app) => app,
        Err(err) => Cli::command().error(ErrorKind::InvalidValue, err).exit(),
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    while !app.should_quit {
        match runner.step() {
            TrainerEvent::Tick => {
                if app.on_tick(runner.tick_secs()) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            TrainerEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            TrainerEvent::Key(key) => {
                if let Some(command) = command_for(&key) {
                    app.handle(command);
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use twistr::language::DifficultyBand;

    fn sample_corpus() -> (ScoredCorpus, TextAnalyzer) {
        let analyzer = TextAnalyzer::default();
        let items = EmbeddedCorpusSource.load().unwrap();
        (ScoredCorpus::analyze(items, &analyzer), analyzer)
    }

    fn app_with(config: Config) -> App {
        let (corpus, analyzer) = sample_corpus();
        App::new(config, &corpus, analyzer, ChaCha8Rng::seed_from_u64(17)).unwrap()
    }

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_cli_defaults_leave_config_untouched() {
        let cli = Cli::parse_from(["twistr"]);
        assert_eq!(cli.apply(Config::default()), Config::default());
        assert!(!cli.sample);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "twistr",
            "--count",
            "8",
            "--difficulty",
            "hard",
            "--mode",
            "perfection",
            "--focus",
            "breathing",
            "--level",
            "4",
            "--mix",
            "false",
            "--seed",
            "3",
        ]);
        let config = cli.apply(Config::default());
        assert_eq!(config.count, 8);
        assert_eq!(config.difficulty, BandFilter::Hard);
        assert_eq!(config.mode, TrainingMode::Perfection);
        assert_eq!(config.focus, Focus::Breathing);
        assert_eq!(config.level, 4);
        assert!(!config.mix);
        assert_eq!(config.time, 30);
        assert_eq!(cli.seed, Some(3));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["twistr", "--mode", "marathon"]).is_err());
    }

    #[test]
    fn test_drill_app_walks_through_items() {
        let mut app = app_with(Config {
            count: 3,
            ..Config::default()
        });
        for _ in 0..3 {
            assert!(!app.is_finished());
            app.handle(Command::Advance);
        }
        assert!(app.is_finished());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_command_stops_the_app() {
        let mut app = app_with(Config::default());
        app.handle(Command::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_timed_app_redraws_while_counting() {
        let mut app = app_with(Config {
            mode: TrainingMode::Timed,
            time: 1,
            count: 1,
            ..Config::default()
        });
        assert!(!app.on_tick(0.1));
        app.handle(Command::Advance);
        assert!(app.on_tick(0.5));
        assert!(app.on_tick(0.5));
        assert!(app.is_finished());
    }

    #[test]
    fn test_perfection_app_rates_and_summarises() {
        let mut app = app_with(Config {
            mode: TrainingMode::Perfection,
            level: 1,
            count: 6,
            ..Config::default()
        });

        for _ in 0..3 {
            // advancing before rating does nothing
            app.handle(Command::Advance);
            app.handle(Command::Rate(4));
            app.handle(Command::Advance);
        }
        assert!(app.is_finished());
        match &app.activity {
            Activity::Adaptive(_, state) => {
                let summary = state.summary.as_ref().unwrap();
                assert_eq!(summary.rounds, 3);
                assert_eq!(summary.average, 4.0);
            }
            Activity::Drill(_) => panic!("expected a perfection session"),
        }
    }

    #[test]
    fn test_ui_renders_drill_item() {
        let app = app_with(Config {
            difficulty: BandFilter::Expert,
            count: 1,
            ..Config::default()
        });
        let content = rendered(&app);
        assert!(content.contains("1/1"));
        assert!(content.contains(&DifficultyBand::Expert.to_string()));
    }

    #[test]
    fn test_ui_renders_perfection_round_and_summary() {
        let mut app = app_with(Config {
            mode: TrainingMode::Perfection,
            level: 1,
            ..Config::default()
        });
        assert!(rendered(&app).contains("Round 1/3"));

        for _ in 0..3 {
            app.handle(Command::Rate(2));
            app.handle(Command::Advance);
        }
        assert!(rendered(&app).contains("Session complete"));
    }
}
