use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{Gateway, Utterance};

pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't get that.";
pub const NOTHING_HEARD: &str = "I didn't hear anything. Try again.";

/// Text-line stand-in for a microphone + speech-to-text engine.
/// Each line read is one utterance; speech goes to stdout and, optionally,
/// to an external TTS program.
pub struct ConsoleGateway<R> {
    lines: Mutex<Lines<R>>,
    // Held for the whole of one utterance so overlapping speakers queue up.
    voice: Mutex<()>,
    tts_command: Option<String>,
}

impl ConsoleGateway<BufReader<Stdin>> {
    pub fn stdin(tts_command: Option<String>) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tts_command)
    }
}

impl<R> ConsoleGateway<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(reader: R, tts_command: Option<String>) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            voice: Mutex::new(()),
            tts_command,
        }
    }
}

#[async_trait]
impl<R> Gateway for ConsoleGateway<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn listen(&self, timeout: Duration) -> Utterance {
        println!("Listening...");
        let next = {
            let mut lines = self.lines.lock().await;
            tokio::time::timeout(timeout, lines.next_line()).await
        };

        match next {
            Ok(Ok(Some(line))) => {
                let utterance = Utterance::heard(&line);
                match &utterance {
                    Utterance::Heard(text) => info!("You said: {}", text),
                    Utterance::NoInput => self.speak(NOT_UNDERSTOOD).await,
                }
                utterance
            }
            Ok(Ok(None)) => {
                // Input closed: behave like a silent microphone instead of spinning.
                debug!("Transcript source exhausted");
                tokio::time::sleep(timeout).await;
                Utterance::NoInput
            }
            Ok(Err(e)) => {
                warn!("Transcript read failed: {}", e);
                self.speak(NOT_UNDERSTOOD).await;
                Utterance::NoInput
            }
            Err(_) => {
                self.speak(NOTHING_HEARD).await;
                Utterance::NoInput
            }
        }
    }

    async fn speak(&self, text: &str) {
        let _voice = self.voice.lock().await;
        println!("Assistant: {}", text);

        if let Some(program) = &self.tts_command {
            match tokio::process::Command::new(program)
                .arg(text)
                .kill_on_drop(true)
                .status()
                .await
            {
                Ok(status) if !status.success() => warn!("TTS '{}' exited with {}", program, status),
                Ok(_) => {}
                Err(e) => warn!("Failed to spawn '{}': {}", program, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_one_utterance_per_line() {
        let gateway = ConsoleGateway::new(&b"What Time Is It\n\nbye\n"[..], None);
        let timeout = Duration::from_millis(200);

        assert_eq!(gateway.listen(timeout).await, Utterance::Heard("what time is it".into()));
        assert_eq!(gateway.listen(timeout).await, Utterance::NoInput);
        assert_eq!(gateway.listen(timeout).await, Utterance::Heard("bye".into()));
    }

    #[tokio::test]
    async fn exhausted_input_is_silence() {
        let gateway = ConsoleGateway::new(&b""[..], None);
        assert!(gateway.listen(Duration::from_millis(10)).await.is_silence());
    }
}
