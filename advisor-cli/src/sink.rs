use advisor_core::NotificationSink;
use async_trait::async_trait;
use std::io::Write;

/// Prints each message to stdout, separated by a blank line.
#[derive(Debug, Default)]
pub struct StdoutSink;

#[async_trait]
impl NotificationSink for StdoutSink {
    async fn send(&self, _user_id: &str, text: &str) -> anyhow::Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}\n")?;
        out.flush()?;
        Ok(())
    }
}
