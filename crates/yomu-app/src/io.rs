use kanal::AsyncSender;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use yomu_types::{AppEvent, ContentUpdate, Sentence};

/// Parse one input line.
///
/// Accepts `:click`, `:clear`, `:quit`, a JSON content update, or a plain
/// `word | context` lookup where a leading `+` means shift was held.
pub fn parse_command(line: &str) -> Option<AppEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match line {
        ":click" | ":explain" => return Some(AppEvent::ExplainClicked),
        ":clear" => return Some(AppEvent::ContentCleared),
        ":quit" | ":q" => return Some(AppEvent::Shutdown),
        _ => {}
    }

    if line.starts_with(':') {
        tracing::warn!("Unknown command: {}", line);
        return None;
    }

    if line.starts_with('{') {
        return match serde_json::from_str::<ContentUpdate>(line) {
            Ok(update) => Some(AppEvent::ContentUpdated(update)),
            Err(e) => {
                tracing::warn!("Invalid content update: {}", e);
                None
            }
        };
    }

    let (shift, rest) = match line.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let (word, context) = match rest.split_once('|') {
        Some((word, context)) => (word.trim(), context.trim()),
        None => (rest.trim(), ""),
    };

    if word.is_empty() {
        return None;
    }

    let mut update = ContentUpdate {
        word: word.to_string(),
        ..ContentUpdate::default()
    };
    if shift {
        update.modifier_keys.insert("shift".to_string());
    }
    if !context.is_empty() {
        update.sentence = Some(Sentence {
            text: context.to_string(),
        });
    }

    Some(AppEvent::ContentUpdated(update))
}

/// Forward parsed input lines as events until EOF or cancellation
pub async fn watch_input<R>(
    reader: R,
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    if let Some(event) = parse_command(&line) {
                        event_tx.send(event).await?;
                    }
                }
                None => {
                    tracing::info!("Input closed");
                    event_tx.send(AppEvent::Shutdown).await?;
                    break;
                }
            },
            _ = cancel.cancelled() => {
                tracing::info!("Input watcher stopping");
                break;
            }
        }
    }

    Ok(())
}

/// Watcher for stdin
pub async fn watcher_io(
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("Reading lookups from stdin");
    watch_input(BufReader::new(tokio::io::stdin()), event_tx, cancel.clone()).await?;

    // Event loop owns shutdown after EOF, in-flight requests still finish
    cancel.cancelled().await;
    Ok(())
}
