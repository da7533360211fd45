//! Terminal REPL for trying the bot without Telegram

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::bot::{BotReply, ChartBot, ChatKind};
use crate::error::Result;

const PROMPT: &str = ">>> ";

/// Banner printed before the first prompt
pub fn banner(kind: ChatKind, group_prefix: &str) -> String {
    let mode = match kind {
        ChatKind::Direct => "direct chat".to_string(),
        ChatKind::Group => format!("group chat (prefix '{group_prefix}')"),
    };
    format!(
        "Artemis chart bot, {mode}\n\
         Try: price vs tvl solana 1w 1d | news eth | /help\n\
         Type 'exit' or press Ctrl-D to quit.\n"
    )
}

/// Read messages from `input` until `exit` or EOF, writing replies to `output`
pub async fn run_repl<R, W>(bot: &ChartBot, kind: ChatKind, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(banner(kind, bot.group_prefix()).as_bytes())
        .await?;

    let mut lines = input.lines();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\nGoodbye!\n").await?;
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit" | "/exit") {
            output.write_all(b"Goodbye!\n").await?;
            break;
        }

        let text = match bot.handle(line, kind).await {
            Some(reply) => render_reply(&reply),
            None => "(ignored: not a command)\n\n".to_string(),
        };
        output.write_all(text.as_bytes()).await?;
    }

    output.flush().await?;
    Ok(())
}

/// Terminal form of a reply; images are shown as a placeholder above the caption
fn render_reply(reply: &BotReply) -> String {
    match &reply.photo {
        Some(png) => format!("[chart image, {} bytes]\n{}\n\n", png.len(), reply.text),
        None => format!("{}\n\n", reply.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartbot_core::{AssetMappings, ChartBuilder};
    use std::sync::Arc;

    fn bot() -> ChartBot {
        let mappings = AssetMappings::from_json(
            r#"{"artemis_id_to_symbols": {"solana": ["sol"]}, "artemis_id_to_type": {"solana": "chain"}}"#,
        )
        .unwrap();
        ChartBot::new(Arc::new(mappings), ChartBuilder::new())
    }

    #[tokio::test]
    async fn test_repl_session() {
        let input: &[u8] = b"price solana 1w 1d\n\nhello\nexit\nprice solana 1m 1d\n";
        let mut output = Vec::new();

        run_repl(&bot(), ChatKind::Direct, input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Artemis chart bot, direct chat"));
        assert!(output.contains("*Price - Solana (1 Week, Daily)*"));
        assert!(output.contains("(ignored: not a command)"));
        assert!(output.ends_with("Goodbye!\n"));
        assert!(!output.contains("1 Month"));
    }

    #[tokio::test]
    async fn test_repl_group_mode_and_eof() {
        let input: &[u8] = b"price solana 1w 1d\n=art price solana 1w 1d";
        let mut output = Vec::new();

        run_repl(&bot(), ChatKind::Group, input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("group chat (prefix '=art')"));
        assert_eq!(output.matches("(ignored: not a command)").count(), 1);
        assert_eq!(output.matches("*Price - Solana (1 Week, Daily)*").count(), 1);
        assert!(output.ends_with("\nGoodbye!\n"));
    }

    #[test]
    fn test_render_photo_reply() {
        let reply = BotReply::photo(vec![0; 2048], "*TVL - Solana (3 Months, Daily)*");
        assert_eq!(
            render_reply(&reply),
            "[chart image, 2048 bytes]\n*TVL - Solana (3 Months, Daily)*\n\n"
        );
        assert_eq!(render_reply(&BotReply::plain("hi")), "hi\n\n");
    }
}
