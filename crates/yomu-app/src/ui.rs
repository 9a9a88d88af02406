use std::fmt::Write as _;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use yomu_core::Pane;
use yomu_types::{PaneBody, PaneView, Section};

const SEPARATOR: &str = "────────────────────────────────";

/// Pane that formats every view for a terminal.
///
/// `show` runs under the session's pane lock, so it only queues the text.
/// [`pane_writer`] does the actual terminal I/O.
pub struct TerminalPane {
    tx: AsyncSender<String>,
    ansi: bool,
}

impl TerminalPane {
    pub fn new(ansi: bool) -> (Self, AsyncReceiver<String>) {
        let (tx, rx) = kanal::unbounded_async();
        (Self { tx, ansi }, rx)
    }

    pub fn stdout() -> (Self, AsyncReceiver<String>) {
        Self::new(atty::is(atty::Stream::Stdout))
    }

    fn bold(&self, text: &str) -> String {
        if self.ansi {
            format!("\x1b[1m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

/// Plain text rendering of a view
pub fn format_view(view: &PaneView, bold: impl Fn(&str) -> String) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{SEPARATOR}");

    if let Some(status) = &view.status {
        let _ = writeln!(out, "[{:?}] {}", view.state, status);
    }
    if let Some(detail) = &view.detail {
        let _ = writeln!(out, "  {detail}");
    }

    match &view.body {
        PaneBody::Empty => {}
        PaneBody::Raw(text) => {
            let _ = writeln!(out, "{text}");
        }
        PaneBody::Sections(tree) => {
            match &tree.badge {
                Some(badge) => {
                    let _ = writeln!(out, "{}  [{}]", bold(&tree.header), badge);
                }
                None => {
                    let _ = writeln!(out, "{}", bold(&tree.header));
                }
            }

            for section in &tree.sections {
                match section {
                    Section::Text { label, body } => {
                        let _ = writeln!(out, "{}", bold(*label));
                        let _ = writeln!(out, "  {body}");
                    }
                    Section::Examples(examples) => {
                        let _ = writeln!(out, "{}", bold("Examples"));
                        for example in examples {
                            if let Some(text) = &example.text {
                                let _ = writeln!(out, "  • {text}");
                            }
                            if let Some(explain) = &example.explain {
                                let _ = writeln!(out, "    {explain}");
                            }
                        }
                    }
                }
            }
        }
    }

    if view.show_explain_button {
        let _ = writeln!(out, "[Explain]  (type :click)");
    }

    out
}

impl Pane for TerminalPane {
    fn show(&mut self, view: PaneView) {
        let text = format_view(&view, |t| self.bold(t));
        if let Err(e) = self.tx.try_send(text) {
            tracing::error!("Pane writer is gone: {}", e);
        }
    }
}

/// Write queued views until every pane is dropped
pub async fn pane_writer<W>(out: &mut W, views: AsyncReceiver<String>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Ok(text) = views.recv().await {
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
    }

    tracing::debug!("Pane writer finished");
    Ok(())
}
