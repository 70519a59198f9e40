use crate::error::Error;
use crate::harvest::{BatchSummary, Harvester};
use crate::progress::{ProgressReporter, SilentReporter};
use crate::search::SearchClient;
use crate::store::ImageStore;
use crate::utils::prompt::read_answer;
use crate::utils::stats::StatsTimer;
use std::io::{self, BufRead, ErrorKind, Write};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const MAX_IMAGES_RANGE: RangeInclusive<usize> = 1..=100;
pub const EXIT_COMMAND: &str = "exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    NoResults,
    Completed(BatchSummary),
}

/// Everything a round needs: where to search, how to download, which key to use.
pub struct Session {
    search: SearchClient,
    harvester: Harvester,
    api_key: String,
    reporter: Arc<dyn ProgressReporter>,
}

impl Session {
    pub fn new(search: SearchClient, harvester: Harvester, api_key: impl Into<String>) -> Self {
        Self {
            search,
            harvester,
            api_key: api_key.into(),
            reporter: Arc::new(SilentReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// One round: search, then download and store the batch.
    /// The store is not touched when the search comes back empty.
    pub async fn run_round<S>(
        &self,
        query: &str,
        max_images: usize,
        store: &mut S,
    ) -> Result<RoundOutcome, Error>
    where
        S: ImageStore + ?Sized,
    {
        let mut search_timer = StatsTimer::new();
        self.reporter.on_search_start(query);
        let descriptors = self.search.search(query, &self.api_key, max_images).await?;
        search_timer.finish();
        self.reporter
            .on_search_complete(descriptors.len(), search_timer.get_duration_secs() as f64);

        if descriptors.is_empty() {
            info!("No result found for '{}'", query);
            return Ok(RoundOutcome::NoResults);
        }

        info!("Found {} results", descriptors.len());
        let summary = self
            .harvester
            .fetch_and_store(&descriptors, store, self.reporter.as_ref())
            .await;
        Ok(RoundOutcome::Completed(summary))
    }

    /// Prompt for queries until `exit` or end of input, running one round per
    /// query. Rounds never overlap. Returns the number of rounds run.
    pub async fn run_interactive<R, W, S>(
        &self,
        input: &mut R,
        output: &mut W,
        store: &mut S,
    ) -> Result<usize, Error>
    where
        R: BufRead,
        W: Write,
        S: ImageStore + ?Sized,
    {
        let mut rounds = 0;

        loop {
            let query =
                match next_answer(input, output, "\nEnter the search query (or 'exit' to quit): ")? {
                    Answer::Line(query) => query,
                    Answer::Unreadable => {
                        writeln!(output, "Wrong value!")?;
                        continue;
                    }
                    Answer::Closed => break,
                };
            if query.eq_ignore_ascii_case(EXIT_COMMAND) {
                break;
            }

            let answer = match next_answer(
                input,
                output,
                "Enter the maximum number of images to download[1-100]: ",
            )? {
                Answer::Line(answer) => answer,
                Answer::Unreadable => String::new(),
                Answer::Closed => break,
            };
            let Some(max_images) = parse_max_images(&answer) else {
                writeln!(output, "Wrong value!")?;
                continue;
            };

            writeln!(output, "please wait a few seconds...")?;
            let mut round_timer = StatsTimer::new();
            let outcome = self.run_round(&query, max_images, store).await;
            round_timer.finish();
            rounds += 1;

            match outcome {
                Ok(RoundOutcome::NoResults) => writeln!(output, "No result found!")?,
                Ok(RoundOutcome::Completed(summary)) => {
                    writeln!(output, "{}", "-".repeat(40))?;
                    writeln!(
                        output,
                        "Downloaded {} and stored {} of {} results in {:.2}s",
                        summary.downloaded,
                        summary.stored,
                        summary.requested,
                        round_timer.get_duration_secs()
                    )?;
                }
                Err(err) => {
                    error!("Search for '{}' failed: {}", query, err);
                    writeln!(output, "No result found!")?;
                }
            }
        }

        Ok(rounds)
    }
}

enum Answer {
    Line(String),
    /// The line was consumed but is not valid UTF-8.
    Unreadable,
    Closed,
}

fn next_answer<R, W>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<Answer>
where
    R: BufRead,
    W: Write,
{
    match read_answer(input, output, prompt) {
        Ok(Some(line)) => Ok(Answer::Line(line)),
        Ok(None) => Ok(Answer::Closed),
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            warn!("Ignoring input line that is not valid UTF-8");
            Ok(Answer::Unreadable)
        }
        Err(err) => Err(err),
    }
}

/// Parse the image count prompt. Only integers in [`MAX_IMAGES_RANGE`] are accepted.
pub fn parse_max_images(input: &str) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| MAX_IMAGES_RANGE.contains(n))
}
