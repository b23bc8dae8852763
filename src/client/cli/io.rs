use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str = "You: ";

/// Prompts for and reads one line. `None` means the input is exhausted.
pub async fn read_user_input<R, W>(input: &mut R, output: &mut W) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(PROMPT.as_bytes()).await?;
    output.flush().await?;
    let mut buffer = String::new();
    if input.read_line(&mut buffer).await? == 0 {
        return Ok(None);
    }
    Ok(Some(buffer.trim().to_string()))
}

pub async fn write_assistant_message<W>(output: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let text = unescape_parens(text);
    output
        .write_all(format!("Assistant: {text}\n\n").as_bytes())
        .await?;
    output.flush().await
}

/// Replaces the escaped parentheses `\(` and `\)` the model emits for
/// inline math with plain ones.
pub fn unescape_parens(text: &str) -> String {
    let mut unescaper = Unescaper::default();
    let mut unescaped = unescaper.push(text);
    unescaped.push_str(unescaper.finish());
    unescaped
}

/// Incremental [`unescape_parens`] for streamed text, where an escape
/// sequence may be split between two chunks.
#[derive(Debug, Default)]
pub struct Unescaper {
    pending_backslash: bool,
}

impl Unescaper {
    pub fn push(&mut self, chunk: &str) -> String {
        let mut unescaped = String::with_capacity(chunk.len());
        for c in chunk.chars() {
            if self.pending_backslash {
                self.pending_backslash = false;
                if !matches!(c, '(' | ')') {
                    unescaped.push('\\');
                }
            }
            if c == '\\' {
                self.pending_backslash = true;
            } else {
                unescaped.push(c);
            }
        }
        unescaped
    }

    pub fn finish(&mut self) -> &'static str {
        if std::mem::take(&mut self.pending_backslash) {
            "\\"
        } else {
            ""
        }
    }
}
