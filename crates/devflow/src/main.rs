//! Renders the consultation page in the terminal.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use devflow::core::{ChatMessage, Role, WidgetView};
use devflow::{Page, PageBuilder, gemini_consultant};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum PageEvent {
    Idle,
    Transcript(ChatMessage),
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let api_key = env::var("GEMINI_API_KEY").ok();
    if api_key.is_none() {
        warn!("GEMINI_API_KEY environment variable is not set");
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let page = PageBuilder::with_consultant(gemini_consultant(api_key.as_deref()))
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(PageEvent::Idle).ok();
            }
        })
        .on_transcript({
            let event_tx = event_tx.clone();
            move |msg| {
                event_tx.send(PageEvent::Transcript(msg.clone())).ok();
            }
        })
        .build();

    println!("{}", "Hamdalla Dev".bold());
    println!("Digitale Lösungen für kleine Unternehmen und Einzelhändler.");
    println!();

    // One reader for the whole session, so buffered input survives prompts.
    let mut lines = io::BufReader::new(io::stdin()).lines();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    'outer: loop {
        let Ok(snapshot) = page.snapshot().await else {
            break;
        };

        if let Some(label) = Page::toggle_button(&snapshot) {
            print!("[Enter] {label}  [/quit] Beenden ");
            std::io::stdout().flush().ok();
            let Some(line) = read_line(&mut lines).await else {
                break;
            };
            if line.trim() == "/quit" {
                break;
            }
            if page.open_consultant().is_err() {
                break;
            }
            if let Ok(snapshot) = page.snapshot().await {
                if let Some(view) = snapshot.view() {
                    render_view(&view);
                }
            }
            continue;
        }

        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut lines).await else {
            break;
        };
        match line.trim() {
            "/close" => {
                page.close_consultant().ok();
                continue;
            }
            "/quit" => break,
            _ => {}
        }
        if page.send_message(&line).is_err() {
            break;
        }

        // Blank input is dropped by the widget, nothing to wait for then.
        match page.snapshot().await {
            Ok(after)
                if after.transcript.len() > snapshot.transcript.len() => {}
            Ok(_) => continue,
            Err(_) => break,
        }

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("💬 Der KI-Berater schreibt...");

        loop {
            progress_bar.inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            match event {
                PageEvent::Transcript(msg) => {
                    if msg.role == Role::Assistant {
                        // Finish the progress bar before printing anything else.
                        progress_bar.finish_and_clear();
                        render_message(&msg);
                    }
                }
                PageEvent::Idle => {
                    progress_bar.finish_and_clear();
                    break;
                }
            }
        }
    }
}

fn render_view(view: &WidgetView<'_>) {
    println!();
    println!("{}", "Hamdi KI-Berater · Online".bright_cyan().bold());
    for msg in view.transcript {
        render_message(msg);
    }
    if view.pending {
        println!("{}…", BAR_CHAR.bright_cyan());
    }
    println!(
        "{}",
        "KI kann Fehler machen, technische Details bitte prüfen. [/close] Schließen"
            .dimmed()
    );
}

fn render_message(msg: &ChatMessage) {
    match msg.role {
        Role::Assistant => println!(
            "{}🤖 {}",
            BAR_CHAR.bright_cyan(),
            msg.content.bright_white()
        ),
        Role::User => println!("{}{}", BAR_CHAR.bright_yellow(), msg.content),
    }
}

async fn read_line<R>(lines: &mut Lines<R>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    match lines.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
