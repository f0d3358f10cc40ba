use anyhow::Context as _;
use tokio::io::AsyncBufReadExt as _;
use url::Url;

/// Defaults scheme-less input to `https://` and rejects non-http(s) schemes.
pub fn ensure_scheme(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        anyhow::bail!("url is empty");
    }

    if explicit_scheme(raw).is_some() {
        let url = Url::parse(raw).with_context(|| format!("parse url: {raw}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("url scheme must be http or https: {raw}");
        }
        return Ok(raw.to_owned());
    }

    let with_scheme = format!("https://{raw}");
    Url::parse(&with_scheme).with_context(|| format!("parse url: {raw}"))?;
    Ok(with_scheme)
}

/// The scheme when `raw` starts with `<scheme>://`; a `://` later in the
/// path or query does not count.
fn explicit_scheme(raw: &str) -> Option<&str> {
    let (scheme, _) = raw.split_once("://")?;
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    (starts_alpha && valid).then_some(scheme)
}

/// Trims, drops blank entries and applies [`ensure_scheme`] to each URL.
pub fn prepare_urls<I, S>(raw: I) -> anyhow::Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter(|url| !url.as_ref().trim().is_empty())
        .map(|url| ensure_scheme(url.as_ref()))
        .collect()
}

/// Reads stdin to EOF, one entry per line.
pub async fn read_stdin_lines() -> anyhow::Result<Vec<String>> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut out = Vec::new();
    while let Some(line) = lines.next_line().await.context("read stdin line")? {
        out.push(line);
    }
    Ok(out)
}

/// Reads stdin until the first non-blank line.
pub async fn read_stdin_url() -> anyhow::Result<String> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await.context("read stdin line")? {
        if !line.trim().is_empty() {
            return Ok(line);
        }
    }
    anyhow::bail!("no url given on the command line or stdin")
}
