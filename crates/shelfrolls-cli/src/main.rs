//! Shelfrolls CLI
//!
//! Roll dice from the terminal, or roll against a reading-queue file to
//! pick the next read.

use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Shelfrolls - dice for your reading queue
#[derive(Parser)]
#[command(name = "shelfpick")]
#[command(author, version, about = "Shelfrolls - roll dice against your reading queue")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll dice (e.g. "d20", "2d6")
    Roll {
        /// Dice spec such as d20 or 2d6
        #[arg(value_parser = parse_dice_arg)]
        dice: DiceSpec,
    },

    /// Roll a die to pick the next item from a reading queue
    Pick {
        /// Path to the reading queue JSON (an array of {"title", "author"?})
        #[arg(short, long, default_value = "queue.json")]
        queue: PathBuf,
    },
}

const SUPPORTED_SIDES: [u32; 6] = [4, 6, 8, 10, 12, 20];

#[derive(Clone, Copy, Debug)]
struct DiceSpec {
    count: usize,
    sides: u32,
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

fn parse_dice_arg(raw: &str) -> Result<DiceSpec, String> {
    let lower = raw.to_lowercase();
    let (count, sides) = match lower.split_once('d') {
        Some(("", sides)) => (1, sides),
        Some((count, sides)) => (
            count
                .parse::<usize>()
                .map_err(|_| format!("invalid dice count in {raw:?}"))?,
            sides,
        ),
        None => return Err(format!("expected a dice spec like d20 or 2d6, got {raw:?}")),
    };
    let sides = sides
        .parse::<u32>()
        .map_err(|_| format!("invalid side count in {raw:?}"))?;
    if !SUPPORTED_SIDES.contains(&sides) {
        return Err(format!(
            "unsupported die d{sides}; pick one of d4 d6 d8 d10 d12 d20"
        ));
    }
    if count == 0 || count > 100 {
        return Err("dice count must be between 1 and 100".to_string());
    }
    Ok(DiceSpec { count, sides })
}

#[derive(Debug, Serialize, Deserialize)]
struct QueueItem {
    title: String,
    #[serde(default)]
    author: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Roll { dice } => roll(dice),
        Commands::Pick { queue } => {
            if let Err(e) = pick(&queue) {
                eprintln!("{} {e}", "error:".red().bold());
                std::process::exit(1);
            }
        }
    }
}

fn roll(spec: DiceSpec) {
    let mut rng = rand::thread_rng();
    let rolls: Vec<u32> = (0..spec.count)
        .map(|_| rng.gen_range(1..=spec.sides))
        .collect();
    let total: u32 = rolls.iter().sum();

    let rolls_str: Vec<String> = rolls.iter().map(|r| r.to_string()).collect();
    println!(
        "{} {} = {}",
        spec.to_string().cyan().bold(),
        rolls_str.join(" + "),
        total.to_string().green().bold()
    );
}

/// The smallest supported die that covers the queue, if any.
fn die_for_queue(len: usize) -> Option<u32> {
    SUPPORTED_SIDES
        .into_iter()
        .find(|&sides| len <= sides as usize)
}

fn pick(path: &PathBuf) -> Result<(), String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let items: Vec<QueueItem> =
        serde_json::from_str(&raw).map_err(|e| format!("bad queue file: {e}"))?;
    if items.is_empty() {
        return Err("the reading queue is empty".to_string());
    }

    let mut rng = rand::thread_rng();
    let index = match die_for_queue(items.len()) {
        Some(sides) => {
            // Roll until the die lands inside the queue, like at the table.
            let mut result = rng.gen_range(1..=sides) as usize;
            let mut rolls = vec![result];
            while result > items.len() {
                result = rng.gen_range(1..=sides) as usize;
                rolls.push(result);
            }
            let rolls_str: Vec<String> = rolls.iter().map(|r| r.to_string()).collect();
            println!(
                "{} {}",
                format!("d{sides}:").cyan().bold(),
                rolls_str.join(", ")
            );
            result - 1
        }
        None => {
            // More books than the biggest die; draw uniformly instead.
            println!("{}", "queue longer than a d20, drawing a slip".dimmed());
            rng.gen_range(0..items.len())
        }
    };

    let item = &items[index];
    match &item.author {
        Some(author) => println!(
            "Next read: {} by {}",
            item.title.green().bold(),
            author.yellow()
        ),
        None => println!("Next read: {}", item.title.green().bold()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dice_arg() {
        let spec = parse_dice_arg("d20").unwrap();
        assert_eq!(spec.count, 1);
        assert_eq!(spec.sides, 20);

        let spec = parse_dice_arg("2D6").unwrap();
        assert_eq!(spec.count, 2);
        assert_eq!(spec.sides, 6);

        assert!(parse_dice_arg("d7").is_err());
        assert!(parse_dice_arg("0d6").is_err());
        assert!(parse_dice_arg("six").is_err());
    }

    #[test]
    fn test_die_for_queue() {
        assert_eq!(die_for_queue(1), Some(4));
        assert_eq!(die_for_queue(4), Some(4));
        assert_eq!(die_for_queue(5), Some(6));
        assert_eq!(die_for_queue(13), Some(20));
        assert_eq!(die_for_queue(20), Some(20));
        assert_eq!(die_for_queue(21), None);
    }

    #[test]
    fn test_queue_item_parses_with_and_without_author() {
        let items: Vec<QueueItem> = serde_json::from_str(
            r#"[{"title": "Piranesi", "author": "Susanna Clarke"}, {"title": "Annals"}]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].author.as_deref(), Some("Susanna Clarke"));
        assert!(items[1].author.is_none());
    }
}
