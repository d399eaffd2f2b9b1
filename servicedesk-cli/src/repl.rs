//! Line-based interaction with a running grid.

use chrono::NaiveDate;
use chrono::NaiveTime;
use servicedesk_lib::api::query::DateRange;
use servicedesk_lib::api::query::Direction;
use servicedesk_lib::api::query::FilterCriteria;
use servicedesk_lib::grid::FieldKind;
use servicedesk_lib::grid::FilterPanel;
use servicedesk_lib::grid::GridHandle;
use servicedesk_lib::grid::Outcome;
use servicedesk_lib::grid::ScrollPosition;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::error::CliError;

const HELP: &str = "\
Commands:
  more                      load the next page
  sort <column> [asc|desc]  sort by a column (toggles without a direction)
  filter <key>=<value> ...  set filter fields and reload
  dates <from> <to>         restrict to a date range (YYYY-MM-DD)
  reset                     clear all filters and reload
  reload                    reload the first page
  fields                    list filter fields
  help                      show this help
  quit                      exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    More,
    Sort {
        column: String,
        direction: Option<Direction>,
    },
    Filter(Vec<(String, String)>),
    Dates(DateRange),
    Reset,
    Reload,
    Fields,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };

        let command = match verb {
            "more" | "m" => Self::More,
            "sort" | "s" => {
                let column = words.next().ok_or("usage: sort <column> [asc|desc]")?;
                let direction = words
                    .next()
                    .map(|d| d.parse::<Direction>().map_err(|_| format!("bad direction '{d}'")))
                    .transpose()?;
                Self::Sort {
                    column: column.to_string(),
                    direction,
                }
            }
            "filter" | "f" => {
                let pairs = words
                    .map(|pair| {
                        pair.split_once('=')
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                            .ok_or_else(|| format!("expected key=value, got '{pair}'"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if pairs.is_empty() {
                    return Err("usage: filter <key>=<value> ...".to_string());
                }
                Self::Filter(pairs)
            }
            "dates" | "d" => {
                let (Some(from), Some(to)) = (words.next(), words.next()) else {
                    return Err("usage: dates <from> <to>".to_string());
                };
                Self::Dates(parse_range(from, to)?)
            }
            "reset" => Self::Reset,
            "reload" | "r" => Self::Reload,
            "fields" => Self::Fields,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };
        Ok(Some(command))
    }
}

/// Parses a whole-day range: `from` at midnight to the last millisecond of
/// `to`, both UTC.
fn parse_range(from: &str, to: &str) -> Result<DateRange, String> {
    let day = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("bad date '{s}': {e}"));
    let from = day(from)?.and_time(NaiveTime::MIN).and_utc();
    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).ok_or("invalid time")?;
    let to = day(to)?.and_time(end_of_day).and_utc();
    if to < from {
        return Err("the range ends before it starts".to_string());
    }
    Ok(DateRange::new(from, to))
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(grid: &GridHandle, mut filters: FilterPanel, local_sort: bool) -> Result<(), CliError> {
    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        let result = match command {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Fields => {
                print_fields(&filters);
                continue;
            }
            Command::More => grid.scroll(ScrollPosition::at_bottom()).await,
            Command::Sort { column, direction: None } => grid.click_header(column).await,
            Command::Sort {
                column,
                direction: Some(direction),
            } => {
                if local_sort {
                    grid.sort_locally(column, direction).await
                } else {
                    let size = window_size(grid).await?;
                    grid.sort_on_server(column, direction, 0, size).await
                }
            }
            Command::Filter(pairs) => {
                let rejected: Vec<_> = pairs
                    .into_iter()
                    .filter(|(key, value)| !filters.set(key, value.as_str()))
                    .map(|(key, _)| key)
                    .collect();
                if !rejected.is_empty() {
                    eprintln!("Not applied: {}; see 'fields'", rejected.join(", "));
                }
                grid.apply_filter(Some(filters.criteria())).await
            }
            Command::Dates(range) => {
                filters.set_date_range(Some(range));
                grid.apply_filter(Some(filters.criteria())).await
            }
            Command::Reset => {
                let criteria = reset_criteria(&mut filters);
                grid.apply_filter(Some(criteria)).await
            }
            Command::Reload => grid.reload().await,
        };

        match result {
            Ok(outcome) => report(outcome),
            Err(e) => {
                log::error!("Grid command failed: {e}");
                eprintln!("Error: {e}");
            }
        }
    }

    Ok(())
}

/// Size of the current window, reused for explicit server sorts.
/// Clears the panel and returns its blank criteria. The cleared fields are
/// still sent, as empty values.
fn reset_criteria(filters: &mut FilterPanel) -> FilterCriteria {
    filters.clear();
    filters.criteria()
}

async fn window_size(grid: &GridHandle) -> Result<usize, CliError> {
    let snapshot = grid.snapshot().await?;
    Ok(snapshot.end.saturating_sub(snapshot.start).max(1))
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Appended { rows: 0 } => println!("No more rows"),
        Outcome::Skipped => println!("Nothing to load"),
        Outcome::Ignored => println!("That column is not sortable"),
        Outcome::Replaced { .. } | Outcome::Appended { .. } | Outcome::SortedLocally(_) | Outcome::Superseded => {}
    }
}

fn print_fields(filters: &FilterPanel) {
    for field in filters.fields() {
        match &field.kind {
            FieldKind::Text => println!("  {:<18} {} = '{}'", field.key, field.label, field.value()),
            FieldKind::Select { options } => println!(
                "  {:<18} {} = '{}' (one of: {})",
                field.key,
                field.label,
                field.value(),
                options
                    .iter()
                    .map(|o| if o.is_empty() { "''".to_string() } else { o.clone() })
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
    if let Some(range) = filters.date_range() {
        println!("  dates              {} .. {}", range.from_param(), range.to_param());
    }
}
