//! Interactive Menu
//!
//! Line-oriented driver over a shared cache. Generic over the input and
//! output streams so it runs on a terminal or on in-memory buffers.

use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::debug;

use crate::error::Result;
use crate::shared::SharedCache;

const MENU: &str = "\nSelect an option:\n\
1. Add an entry\n\
2. Retrieve an entry\n\
3. Remove an entry\n\
4. Print cache contents\n\
5. Show statistics\n\
6. Exit\n\
Enter your choice: ";

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Retrieve,
    Remove,
    Print,
    Stats,
    Exit,
}

impl FromStr for MenuChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Add),
            "2" => Ok(Self::Retrieve),
            "3" => Ok(Self::Remove),
            "4" => Ok(Self::Print),
            "5" => Ok(Self::Stats),
            "6" => Ok(Self::Exit),
            other => Err(format!("unknown choice '{}'", other)),
        }
    }
}

/// Runs the menu until the user exits or input ends.
pub async fn run_menu<R, W>(cache: &SharedCache<String, String>, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        let Some(line) = prompt(&mut lines, &mut output, MENU).await? else {
            break;
        };

        let choice = match line.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(reason) => {
                debug!(%reason, "rejected menu input");
                output.write_all(b"Invalid choice. Please try again.\n").await?;
                continue;
            }
        };

        if choice == MenuChoice::Exit {
            break;
        }
        if !execute(cache, choice, &mut lines, &mut output).await? {
            break;
        }
    }

    output.write_all(b"Exiting program.\n").await?;
    output.flush().await?;
    Ok(())
}

/// Carries out one choice. Returns `false` when input ran out mid-command.
async fn execute<R, W>(
    cache: &SharedCache<String, String>,
    choice: MenuChoice,
    lines: &mut Lines<R>,
    output: &mut W,
) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match choice {
        MenuChoice::Add => {
            let Some(key) = prompt(lines, output, "Enter key: ").await? else {
                return Ok(false);
            };
            let Some(value) = prompt(lines, output, "Enter value: ").await? else {
                return Ok(false);
            };
            if let Some((evicted, _)) = cache.put(key, value).await {
                output
                    .write_all(format!("Evicted least recently used key: {}\n", evicted).as_bytes())
                    .await?;
            }
        }
        MenuChoice::Retrieve => {
            let Some(key) = prompt(lines, output, "Enter key: ").await? else {
                return Ok(false);
            };
            let reply = match cache.get(&key).await {
                Some(value) => format!("Value: {}\n", value),
                None => "Entry not found in cache.\n".to_string(),
            };
            output.write_all(reply.as_bytes()).await?;
        }
        MenuChoice::Remove => {
            let Some(key) = prompt(lines, output, "Enter key: ").await? else {
                return Ok(false);
            };
            let reply = match cache.remove(&key).await {
                Some(_) => "Entry removed from cache.\n",
                None => "Entry not found in cache.\n",
            };
            output.write_all(reply.as_bytes()).await?;
        }
        MenuChoice::Print => {
            let mut listing = String::from("Cache Contents:\n");
            {
                let guard = cache.lock().await;
                for (key, value) in guard.iter() {
                    listing.push_str(&format!("Key: {}, Value: {}\n", key, value));
                }
            }
            output.write_all(listing.as_bytes()).await?;
        }
        MenuChoice::Stats => {
            let stats = cache.stats().await;
            let body = serde_json::to_string_pretty(&stats)?;
            let report = format!(
                "Statistics at {}:\n{}\nHit rate: {:.2}\n",
                chrono::Utc::now().to_rfc3339(),
                body,
                stats.hit_rate()
            );
            output.write_all(report.as_bytes()).await?;
        }
        MenuChoice::Exit => return Ok(false),
    }

    Ok(true)
}

/// Writes `text` and reads one trimmed line; `None` at end of input.
async fn prompt<R, W>(lines: &mut Lines<R>, output: &mut W, text: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.flush().await?;
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SplayCache;
    use tokio::io::BufReader;

    fn shared(capacity: usize) -> SharedCache<String, String> {
        SharedCache::new(SplayCache::new(capacity).unwrap())
    }

    async fn run(cache: &SharedCache<String, String>, script: &str) -> String {
        let mut output = Vec::new();
        run_menu(cache, script.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!("1".parse::<MenuChoice>(), Ok(MenuChoice::Add));
        assert_eq!(" 4 ".parse::<MenuChoice>(), Ok(MenuChoice::Print));
        assert_eq!("6".parse::<MenuChoice>(), Ok(MenuChoice::Exit));
        assert!("7".parse::<MenuChoice>().is_err());
        assert!("".parse::<MenuChoice>().is_err());
    }

    #[tokio::test]
    async fn test_add_then_retrieve() {
        let cache = shared(4);
        let out = run(&cache, "1\nfruit\napple\n2\nfruit\n6\n").await;

        assert!(out.contains("Value: apple\n"));
        assert!(out.ends_with("Exiting program.\n"));
    }

    #[tokio::test]
    async fn test_retrieve_missing_key() {
        let cache = shared(4);
        let out = run(&cache, "2\nghost\n6\n").await;
        assert!(out.contains("Entry not found in cache.\n"));
    }

    #[tokio::test]
    async fn test_remove_reports_absence() {
        let cache = shared(4);
        cache.put("a".to_string(), "1".to_string()).await;

        let out = run(&cache, "3\na\n3\na\n6\n").await;
        assert_eq!(out.matches("Entry removed from cache.").count(), 1);
        assert_eq!(out.matches("Entry not found in cache.").count(), 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_print_lists_in_key_order() {
        let cache = shared(4);
        let out = run(&cache, "1\nb\n2\n1\na\n1\n4\n6\n").await;

        let listing = out.split("Cache Contents:\n").nth(1).unwrap();
        assert!(listing.starts_with("Key: a, Value: 1\nKey: b, Value: 2\n"));
    }

    #[tokio::test]
    async fn test_add_reports_eviction() {
        let cache = shared(1);
        let out = run(&cache, "1\na\n1\n1\nb\n2\n6\n").await;
        assert!(out.contains("Evicted least recently used key: a\n"));
    }

    #[tokio::test]
    async fn test_stats_output_is_json() {
        let cache = shared(4);
        let out = run(&cache, "2\nnope\n5\n6\n").await;

        assert!(out.contains("\"misses\": 1"));
        assert!(out.contains("Hit rate: 0.00"));
    }

    #[tokio::test]
    async fn test_invalid_choice_and_end_of_input() {
        let cache = shared(4);
        let out = run(&cache, "9\n1\nhalf").await;

        assert!(out.contains("Invalid choice. Please try again.\n"));
        assert!(out.ends_with("Exiting program.\n"));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_exit_with_mock_input() {
        let cache = shared(4);
        let input = tokio_test::io::Builder::new().read(b"6\n").build();
        let mut output = Vec::new();

        run_menu(&cache, BufReader::new(input), &mut output).await.unwrap();

        let out = String::from_utf8(output).unwrap();
        assert!(out.starts_with("\nSelect an option:\n"));
        assert!(out.ends_with("Exiting program.\n"));
    }
}
