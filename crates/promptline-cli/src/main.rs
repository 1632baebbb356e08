//! promptline: type text on stdin, see which saved prompts would be suggested.
//!
//! Usage:
//!   promptline                      # corpus paths from ~/.promptline/config.toml
//!   promptline -p prompts.json      # override the prompt snapshot
//!   promptline -r presets.json      # override the preset snapshot
//!   promptline -c config.toml       # use another config file
//!
//! Each input line is treated as the full text of the input field with the
//! caret at its end. Lines starting with `:` drive the popup instead:
//! `:next`, `:prev`, `:exec`, `:hide`, `:quit`.

use anyhow::Result;
use async_trait::async_trait;
use promptline_common::config::{load_config, load_config_from};
use promptline_engine::{
    BufferElement, EndOfTextReader, HostElement, Rect, SuggestionEngine, SuggestionListener,
    TokioScheduler,
};
use promptline_matcher::highlight::highlight_segments;
use promptline_matcher::MatchRecord;
use promptline_store::preset::VariablePreset;
use promptline_store::prompt::Prompt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

struct PrintListener;

#[async_trait]
impl SuggestionListener for PrintListener {
    fn on_hide(&self) {
        println!("  (hidden)");
    }

    fn on_select_change(&self, index: Option<usize>) {
        tracing::debug!("selection -> {:?}", index);
    }

    async fn on_execute(&self, record: &MatchRecord) -> bool {
        println!(
            "  insert at {}..{} (line {}): {}",
            record.match_start, record.match_end, record.newline_count, record.content
        );
        true
    }
}

struct Args {
    config: Option<PathBuf>,
    prompts: Option<PathBuf>,
    presets: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config: None,
        prompts: None,
        presets: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "-p" | "-r" => {
                let flag = args[i].clone();
                i += 1;
                if let Some(value) = args.get(i).map(PathBuf::from) {
                    match flag.as_str() {
                        "-c" => parsed.config = Some(value),
                        "-p" => parsed.prompts = Some(value),
                        _ => parsed.presets = Some(value),
                    }
                }
            }
            "-h" | "--help" => {
                println!("promptline: preview prompt suggestions for typed text");
                println!();
                println!("Usage:");
                println!("  promptline [-c config.toml] [-p prompts.json] [-r presets.json]");
                println!();
                println!("Type text, one line per keystroke burst. Commands:");
                println!("  :next  :prev  :exec  :hide  :quit");
                return None;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }
    Some(parsed)
}

fn print_matches(engine: &SuggestionEngine) {
    let selected = engine.selected_index();
    for (i, m) in engine.matches().iter().enumerate() {
        let name: String = highlight_segments(&m.name, &m.search_term)
            .into_iter()
            .map(|(seg, hit)| if hit { format!("[{}]", seg) } else { seg })
            .collect();
        let marker = if selected == Some(i) { ">" } else { " " };
        let pin = if m.is_pinned { "*" } else { "" };
        println!(
            "{} {}. {}{} ({:?}, {} words)",
            marker,
            i + 1,
            name,
            pin,
            m.match_type,
            m.word_count
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args() else {
        return Ok(());
    };

    let config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let prompts_path = args
        .prompts
        .unwrap_or_else(|| PathBuf::from(&config.corpus.prompts_path));
    let presets_path = args
        .presets
        .unwrap_or_else(|| PathBuf::from(&config.corpus.presets_path));

    let prompts = Prompt::load_all(&prompts_path)?;
    let presets = VariablePreset::load_all(&presets_path)?;
    tracing::info!(
        "loaded {} prompts from {}, {} presets from {}",
        prompts.len(),
        prompts_path.display(),
        presets.len(),
        presets_path.display()
    );

    let settle = config.engine.debounce() + Duration::from_millis(10);
    let engine = SuggestionEngine::new(
        config.engine,
        Arc::new(EndOfTextReader),
        Arc::new(TokioScheduler::current()?),
    );
    let element = Arc::new(BufferElement::new(Rect::default()));
    engine.set_element(Some(element.clone() as Arc<dyn HostElement>));
    engine.set_listener(Arc::new(PrintListener));
    engine.set_prompts(prompts);
    engine.set_presets(presets);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" | ":q" => break,
            ":next" | ":n" => engine.select_next(),
            ":prev" | ":p" => engine.select_previous(),
            ":hide" => engine.force_hide(),
            ":exec" | ":x" => {
                if engine.execute().await.is_none() {
                    println!("  nothing selected");
                }
                continue;
            }
            _ => {
                element.set_text(&line);
                engine.handle_content_change(line.as_str());
                tokio::time::sleep(settle).await;
            }
        }
        print_matches(&engine);
    }

    engine.destroy();
    Ok(())
}
