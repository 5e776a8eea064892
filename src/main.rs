// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use parking_lot::Mutex;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use lingoplay::app_config::{self, AiProvider, BlurMode, Config};
use lingoplay::app_controller::PlayerController;
use lingoplay::database::StateStore;
use lingoplay::lookup_service::{CompletedLookup, LookupState};
use lingoplay::providers::mock::MockProvider;
use lingoplay::shortcuts::{self, KeyTarget};
use lingoplay::subtitle_processor::{format_clock, format_timestamp};
use lingoplay::sync::{LineStatus, SyncAction};

/// CLI Wrapper for AiProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Gemini,
    #[value(name = "openai")]
    OpenAI,
}

impl From<CliProvider> for AiProvider {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Gemini => AiProvider::Gemini,
            CliProvider::OpenAI => AiProvider::OpenAI,
        }
    }
}

/// CLI Wrapper for BlurMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliBlurMode {
    None,
    Focus,
    All,
}

impl From<CliBlurMode> for BlurMode {
    fn from(cli_mode: CliBlurMode) -> Self {
        match cli_mode {
            CliBlurMode::None => BlurMode::None,
            CliBlurMode::Focus => BlurMode::Focus,
            CliBlurMode::All => BlurMode::All,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Parser, Debug)]
struct TranscriptArgs {
    /// SRT file in the language being learned
    #[arg(value_name = "PRIMARY_SRT")]
    primary: PathBuf,

    /// SRT file in the learner's language
    #[arg(short, long)]
    secondary: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pair two SRT files and print the dual-language transcript
    Import {
        #[command(flatten)]
        transcript: TranscriptArgs,

        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a transcript against a simulated video clock
    Simulate {
        #[command(flatten)]
        transcript: TranscriptArgs,

        /// Pause at the end of each sentence
        #[arg(long)]
        auto_pause: bool,

        /// Resume this many milliseconds after an auto-pause (default: stop)
        #[arg(long)]
        resume_after_ms: Option<u64>,

        /// Progress callback period in milliseconds
        #[arg(long, default_value_t = 50)]
        tick_ms: u64,

        /// Playback rate
        #[arg(long, default_value_t = 1.0)]
        rate: f64,

        /// Key press at a playback position, e.g. `3.5=KeyD` (repeatable)
        #[arg(long = "key", value_name = "SECS=CODE")]
        keys: Vec<String>,

        /// Merge this line (1-based) into its successor before playing (repeatable)
        #[arg(long = "merge", value_name = "LINE_NUMBER")]
        merges: Vec<usize>,

        /// Analyze the active sentence at this position with the mock provider
        #[arg(long, value_name = "SECS")]
        lookup_at: Option<f64>,
    },

    /// Ask the AI provider about a word or a sentence
    Lookup {
        #[command(subcommand)]
        target: LookupTarget,

        /// Answer from the offline mock provider
        #[arg(long, global = true)]
        mock: bool,
    },

    /// Show or edit saved words and bookmarks
    Notebook {
        #[command(subcommand)]
        action: NotebookAction,
    },

    /// Show or change the user settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Print the keyboard shortcuts
    Keys,

    /// Generate shell completions for lingoplay
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum LookupTarget {
    /// Explain a word in its context sentence
    Word {
        word: String,

        /// Sentence the word appears in
        #[arg(long, default_value = "")]
        context: String,

        /// Save the word to the notebook
        #[arg(long)]
        save: bool,
    },
    /// Translate and analyze a sentence
    Sentence { sentence: String },
}

#[derive(Subcommand, Debug)]
enum NotebookAction {
    /// List saved words and bookmarked sentences
    List,
    /// Delete a saved word by id
    DeleteWord { id: String },
    /// Delete a bookmarked sentence by id
    DeleteSentence { id: String },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print the current settings as JSON
    Show,
    /// Change one or more settings
    Set(SettingsArgs),
    /// Check that the configured provider answers with the saved key
    Check {
        /// Use the offline mock provider
        #[arg(long)]
        mock: bool,
    },
}

#[derive(Parser, Debug)]
struct SettingsArgs {
    #[arg(long, value_enum)]
    provider: Option<CliProvider>,

    #[arg(long, env = "LINGOPLAY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    model: Option<String>,

    #[arg(long, action = ArgAction::Set)]
    auto_pause: Option<bool>,

    #[arg(long, value_enum)]
    blur: Option<CliBlurMode>,

    #[arg(long, action = ArgAction::Set)]
    show_primary: Option<bool>,

    #[arg(long, action = ArgAction::Set)]
    show_secondary: Option<bool>,

    /// Language being learned (ISO code)
    #[arg(long)]
    primary_language: Option<String>,

    /// Learner's own language (ISO code)
    #[arg(long)]
    secondary_language: Option<String>,
}

/// LingoPlay - dual-subtitle language-learning player
///
/// Synchronizes a dual-language transcript with video playback, pauses at
/// sentence boundaries and explains words and sentences with an AI model.
#[derive(Parser, Debug)]
#[command(name = "lingoplay")]
#[command(version)]
#[command(about = "Dual-subtitle language-learning player core")]
#[command(long_about = "LingoPlay pairs two SRT tracks into a dual-language transcript, keeps the active line in step with playback and explains words and sentences with an AI model.

EXAMPLES:
    lingoplay import movie.en.srt -s movie.zh.srt          # Print the paired transcript
    lingoplay simulate movie.en.srt --auto-pause           # Play until the first auto-pause
    lingoplay simulate movie.en.srt --key 3.0=KeyD         # Press 'next sentence' at 3s
    lingoplay lookup word run --context \"We run home.\"     # Explain a word
    lingoplay settings set --provider openai --model gpt-4o-mini
    lingoplay completions bash > lingoplay.bash           # Generate bash completions

CONFIGURATION:
    Timing constants live in conf.json by default (created when missing).
    Settings, saved words and bookmarks live in the state database.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let (color, tag) = Self::style_for_level(record.level());
        let _ = writeln!(
            std::io::stderr(),
            "{}{} {} {}\x1B[0m",
            color,
            now,
            tag,
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Installed at the most verbose level; `log::set_max_level` narrows it later
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lingoplay", &mut std::io::stdout());
        return Ok(());
    }

    if let Commands::Keys = &cli.command {
        for line in shortcuts::help_lines() {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Import { transcript, json } => run_import(config, transcript, json),
        Commands::Simulate {
            transcript,
            auto_pause,
            resume_after_ms,
            tick_ms,
            rate,
            keys,
            merges,
            lookup_at,
        } => {
            let options = SimulateOptions {
                auto_pause,
                resume_after: resume_after_ms.map(Duration::from_millis),
                tick: Duration::from_millis(tick_ms.max(1)),
                rate,
                keys: parse_key_schedule(&keys)?,
                merges,
                lookup_at,
            };
            run_simulate(config, transcript, options).await
        }
        Commands::Lookup { target, mock } => run_lookup(config, target, mock).await,
        Commands::Notebook { action } => run_notebook(config, action),
        Commands::Settings { action } => run_settings(config, action).await,
        Commands::Keys | Commands::Completions { .. } => Ok(()),
    }
}

fn open_controller(config: Config) -> Result<PlayerController> {
    let db_path = config.resolve_database_path()?;
    let store = StateStore::open(&db_path)?;
    PlayerController::new(config, store)
}

/// Controller that never touches the user's database
fn scratch_controller(config: Config) -> Result<PlayerController> {
    PlayerController::new(config, StateStore::new_in_memory()?)
}

fn import_transcript(controller: &mut PlayerController, transcript: &TranscriptArgs) -> Result<usize> {
    let count = controller.import_files(&transcript.primary, transcript.secondary.as_ref(), None)?;
    if count == 0 {
        return Err(anyhow!("No subtitle lines found in {:?}", transcript.primary));
    }
    info!("Imported {} lines", count);
    Ok(count)
}

fn run_import(config: Config, transcript: TranscriptArgs, json: bool) -> Result<()> {
    let mut controller = scratch_controller(config)?;
    import_transcript(&mut controller, &transcript)?;

    let subtitles = controller.core().subtitles();
    if json {
        println!("{}", serde_json::to_string_pretty(subtitles)?);
        return Ok(());
    }

    for (i, line) in subtitles.iter().enumerate() {
        println!(
            "{:>4}  {} --> {}  {}",
            i + 1,
            format_timestamp(line.start),
            format_timestamp(line.end),
            line.text_primary
        );
        if !line.text_secondary.is_empty() {
            println!("{:>4}  {:>29}  {}", "", "", line.text_secondary);
        }
    }
    Ok(())
}

// ============================================================================
// Simulation
// ============================================================================

struct SimulateOptions {
    auto_pause: bool,
    resume_after: Option<Duration>,
    tick: Duration,
    rate: f64,
    keys: Vec<(f64, String)>,
    merges: Vec<usize>,
    lookup_at: Option<f64>,
}

fn parse_key_schedule(entries: &[String]) -> Result<Vec<(f64, String)>> {
    let mut schedule = entries
        .iter()
        .map(|entry| {
            let (at, code) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid key '{}', expected SECS=CODE", entry))?;
            let at: f64 = at
                .trim()
                .parse()
                .with_context(|| format!("Invalid key time in '{}'", entry))?;
            Ok((at, code.trim().to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    schedule.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(schedule)
}

/// Stand-in for the video element: advances its position while playing
struct SimulatedVideo {
    position: f64,
    playing: bool,
    rate: f64,
    duration: f64,
}

impl SimulatedVideo {
    fn advance(&mut self, elapsed: Duration) {
        if self.playing {
            self.position = (self.position + elapsed.as_secs_f64() * self.rate).min(self.duration);
        }
    }

    /// Apply actions; returns seek lock releases to schedule
    fn apply(&mut self, actions: Vec<SyncAction>, controller: &PlayerController) -> Vec<(u64, Instant)> {
        let mut releases = Vec::new();
        for action in actions {
            match action {
                SyncAction::SetPlaying(playing) => self.playing = playing,
                SyncAction::SeekTo(time) => self.position = time.clamp(0.0, self.duration),
                SyncAction::SetPlaybackRate(rate) => self.rate = rate,
                SyncAction::ReleaseSeekLockAfter { generation, delay } => {
                    releases.push((generation, Instant::now() + delay));
                }
                SyncAction::ScrollIntoView(index) => {
                    if let Some(line) = controller.core().subtitles().get(index) {
                        println!(
                            "[{}] #{} {}",
                            format_clock(self.position),
                            index + 1,
                            line.text_primary
                        );
                    }
                }
            }
        }
        releases
    }
}

async fn run_simulate(config: Config, transcript: TranscriptArgs, options: SimulateOptions) -> Result<()> {
    let mut controller = scratch_controller(config)?;
    import_transcript(&mut controller, &transcript)?;
    controller.use_mock_provider(MockProvider::working());

    let mut settings = controller.settings().clone();
    settings.auto_pause = options.auto_pause;
    settings.api_key = "offline".to_string();
    controller.update_settings(settings)?;

    // Line numbers shift as lines merge; apply from the highest down
    let mut merges = options.merges.clone();
    merges.sort_unstable_by(|a, b| b.cmp(a));
    for line_number in merges {
        let id = controller
            .core()
            .subtitles()
            .get(line_number.saturating_sub(1))
            .map(|line| line.id.clone());
        match id {
            Some(id) if controller.core_mut().merge(&id) => info!("Merged line {}", line_number),
            _ => warn!("Cannot merge line {}", line_number),
        }
    }

    let duration = controller
        .core()
        .subtitles()
        .last()
        .map_or(0.0, |line| line.end + 2.0);

    let core = controller.core_mut();
    core.load_source("simulated://video");
    core.on_duration(duration);
    core.on_ready();

    let mut video = SimulatedVideo {
        position: 0.0,
        playing: false,
        rate: 1.0,
        duration,
    };
    let actions = controller.core_mut().set_playback_rate(options.rate);
    video.apply(actions, &controller);
    let actions = controller.core_mut().play();
    video.apply(actions, &controller);

    let (lookup_tx, mut lookup_rx) = mpsc::unbounded_channel::<CompletedLookup>();
    let mut keys = options.keys.into_iter().peekable();
    let mut lookup_at = options.lookup_at;
    let mut releases: Vec<(u64, Instant)> = Vec::new();
    let mut resume_deadline: Option<Instant> = None;
    let mut lookups_in_flight = 0usize;

    let mut ticker = tokio::time::interval(options.tick);
    let mut last_tick = Instant::now();

    loop {
        let next_release = releases.iter().map(|(_, at)| *at).min();

        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                video.advance(now - last_tick);
                last_tick = now;

                let was_playing = video.playing;
                let actions = controller.core_mut().on_tick(video.position, video.playing);
                releases.extend(video.apply(actions, &controller));

                if was_playing && !video.playing {
                    if let Some(id) = controller.core().last_auto_paused_id() {
                        println!("[{}] auto-paused after sentence {}", format_clock(video.position), id);
                    }
                    if let Some(delay) = options.resume_after {
                        resume_deadline = Some(Instant::now() + delay);
                    }
                }

                while let Some((_, code)) = keys.next_if(|(at, _)| *at <= video.position) {
                    println!("[{}] key {}", format_clock(video.position), code);
                    let actions = controller.handle_key(&code, KeyTarget::Player)?;
                    releases.extend(video.apply(actions, &controller));
                }

                if lookup_at.is_some_and(|at| at <= video.position) {
                    lookup_at = None;
                    let sentence = controller.core().active_subtitle().map(|line| line.text_primary.clone());
                    if let Some(sentence) = sentence {
                        let (pending, actions) = controller.begin_sentence_lookup(&sentence)?;
                        releases.extend(video.apply(actions, &controller));
                        lookups_in_flight += 1;
                        let tx = lookup_tx.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(pending.run().await);
                        });
                    }
                }

                if video.position >= video.duration {
                    let actions = controller.core_mut().on_ended();
                    video.apply(actions, &controller);
                    println!("[{}] ended", format_clock(video.position));
                    break;
                }

                // Nothing left that could resume playback
                if !video.playing && resume_deadline.is_none() && lookups_in_flight == 0 {
                    break;
                }
            }

            _ = tokio::time::sleep_until(next_release.unwrap_or_else(Instant::now)), if next_release.is_some() => {
                let now = Instant::now();
                releases.retain(|(generation, at)| {
                    if *at <= now {
                        let released = controller.core_mut().release_seek_lock(*generation);
                        debug!("Seek lock #{} release: {}", generation, released);
                        false
                    } else {
                        true
                    }
                });
            }

            _ = tokio::time::sleep_until(resume_deadline.unwrap_or_else(Instant::now)), if resume_deadline.is_some() => {
                resume_deadline = None;
                let actions = controller.core_mut().play();
                video.apply(actions, &controller);
            }

            Some(completed) = lookup_rx.recv() => {
                lookups_in_flight = lookups_in_flight.saturating_sub(1);
                if controller.complete_lookup(completed) {
                    if let LookupState::Ready(analysis) = controller.sentence_lookup() {
                        println!("    translation: {}", analysis.translation);
                        println!("    grammar:     {}", analysis.grammar_analysis);
                    }
                }
                controller.dismiss_sentence_lookup();
                let actions = controller.core_mut().play();
                releases.extend(video.apply(actions, &controller));
            }
        }
    }

    print_transcript_status(&controller);
    Ok(())
}

fn print_transcript_status(controller: &PlayerController) {
    let core = controller.core();
    for (i, line) in core.subtitles().iter().enumerate() {
        let marker = match core.line_status(i) {
            LineStatus::Past => " ",
            LineStatus::Current => ">",
            LineStatus::Future => ".",
        };
        println!("{} {:>4} {}", marker, i + 1, line.text_primary);
    }
}

// ============================================================================
// Lookups, notebook and settings
// ============================================================================

async fn run_lookup(config: Config, target: LookupTarget, mock: bool) -> Result<()> {
    let mut controller = open_controller(config)?;
    if mock {
        controller.use_mock_provider(MockProvider::working());
    }

    let save = matches!(target, LookupTarget::Word { save: true, .. });
    let (pending, _actions) = match &target {
        LookupTarget::Word { word, context, .. } => controller.begin_word_lookup(word, context)?,
        LookupTarget::Sentence { sentence } => controller.begin_sentence_lookup(sentence)?,
    };

    let controller = Arc::new(Mutex::new(controller));
    let shared = Arc::clone(&controller);
    tokio::spawn(async move {
        let completed = pending.run().await;
        shared.lock().complete_lookup(completed);
    })
    .await
    .context("Lookup task failed")?;

    let mut controller = controller.lock();
    match &target {
        LookupTarget::Word { word, .. } => match controller.word_lookup() {
            LookupState::Ready(analysis) => {
                println!("{}", word);
                println!("  definition:  {}", analysis.definition);
                println!("  translation: {}", analysis.translation);
                println!("  example:     {}", analysis.usage_example);
            }
            LookupState::Failed(message) => return Err(anyhow!("{}", message)),
            _ => return Err(anyhow!("Lookup did not complete")),
        },
        LookupTarget::Sentence { .. } => match controller.sentence_lookup() {
            LookupState::Ready(analysis) => {
                println!("translation: {}", analysis.translation);
                println!("grammar:     {}", analysis.grammar_analysis);
                println!("idioms:      {}", analysis.idioms_and_collocations);
            }
            LookupState::Failed(message) => return Err(anyhow!("{}", message)),
            _ => return Err(anyhow!("Lookup did not complete")),
        },
    }

    if save {
        if controller.save_looked_up_word()? {
            println!("Saved to notebook.");
        } else {
            println!("Already in notebook.");
        }
    }
    Ok(())
}

fn run_notebook(config: Config, action: NotebookAction) -> Result<()> {
    let mut controller = open_controller(config)?;

    match action {
        NotebookAction::List => {
            let notebook = controller.notebook();
            println!("Words ({}):", notebook.words().len());
            for word in notebook.words() {
                println!("  {}  {} - {}", word.id, word.word, word.translation);
            }
            println!("Sentences ({}):", notebook.sentences().len());
            for sentence in notebook.sentences() {
                println!("  {}  {}", sentence.id, sentence.text_primary);
                if let Some(note) = &sentence.note {
                    println!("  {:>36}  note: {}", "", note);
                }
            }
        }
        NotebookAction::DeleteWord { id } => {
            if !controller.delete_word(&id)? {
                return Err(anyhow!("No saved word with id {}", id));
            }
        }
        NotebookAction::DeleteSentence { id } => {
            if !controller.delete_sentence(&id)? {
                return Err(anyhow!("No bookmarked sentence with id {}", id));
            }
        }
    }
    Ok(())
}

async fn run_settings(config: Config, action: SettingsAction) -> Result<()> {
    let mut controller = open_controller(config)?;

    match action {
        SettingsAction::Show => {
            let mut shown = controller.settings().clone();
            if shown.has_api_key() {
                shown.api_key = "********".to_string();
            }
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        SettingsAction::Set(args) => {
            let mut settings = controller.settings().clone();
            if let Some(provider) = args.provider {
                settings.provider = provider.into();
            }
            if let Some(api_key) = args.api_key {
                settings.api_key = api_key;
            }
            if let Some(base_url) = args.base_url {
                settings.base_url = base_url;
            }
            if let Some(model) = args.model {
                settings.model_name = model;
            }
            if let Some(auto_pause) = args.auto_pause {
                settings.auto_pause = auto_pause;
            }
            if let Some(blur) = args.blur {
                settings.blur_mode = blur.into();
            }
            if let Some(show_primary) = args.show_primary {
                settings.show_primary = show_primary;
            }
            if let Some(show_secondary) = args.show_secondary {
                settings.show_secondary = show_secondary;
            }
            if let Some(language) = args.primary_language {
                settings.primary_language = language;
            }
            if let Some(language) = args.secondary_language {
                settings.secondary_language = language;
            }
            controller.update_settings(settings)?;
            println!("Settings saved.");
        }
        SettingsAction::Check { mock } => {
            if mock {
                controller.use_mock_provider(MockProvider::working());
            }
            let provider = controller.check_connection().await?;
            println!("{} provider is reachable.", provider);
        }
    }
    Ok(())
}
