use crate::infra::{load_graph, KeywordIntentModel};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use venue_match::error::AppError;
use venue_match::intent::{IntentExtraction, IntentWorkflow};
use venue_match::matching::{MatchOutcome, MatchRequest, MatchService, DEFAULT_MIN_COVERAGE};

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Required amenity; repeat the flag for each one
    #[arg(long = "require", value_name = "AMENITY")]
    pub(crate) requirements: Vec<String>,
    /// Expected attendee count
    #[arg(long)]
    pub(crate) attendees: u32,
    /// Minimum amenity coverage a venue must reach
    #[arg(long, default_value_t = DEFAULT_MIN_COVERAGE)]
    pub(crate) min_coverage: f64,
    /// Number of venues to shortlist (1-5)
    #[arg(long, default_value_t = 1)]
    pub(crate) shortlist: usize,
    /// JSON-lines venue dataset; falls back to the built-in demo campus
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Emit the full outcome as JSON instead of a rendered summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExtractArgs {
    /// Free-text booking query, e.g. "Chess Club tournament for 30 players"
    pub(crate) query: String,
    /// Ask for extra constraints when the query yields fewer than two
    #[arg(long)]
    pub(crate) enrich: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// JSON-lines venue dataset; falls back to the built-in demo campus
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Booking query driving the walk-through
    #[arg(
        long,
        default_value = "Film Society needs an evening screening for 80 people with a projector and wi-fi"
    )]
    pub(crate) query: String,
    /// Number of venues to shortlist (1-5)
    #[arg(long, default_value_t = 3)]
    pub(crate) shortlist: usize,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        requirements,
        attendees,
        min_coverage,
        shortlist,
        dataset,
        json,
    } = args;

    let graph = load_graph(dataset.as_deref())?;
    let service = MatchService::new(Arc::new(graph));

    let mut request = MatchRequest::new(requirements, attendees);
    request.min_coverage = min_coverage;
    request.shortlist = shortlist;

    let outcome = service.rank(&request)?;
    if json {
        println!("{}", to_json(&outcome)?);
    } else {
        render_outcome(&outcome);
    }
    Ok(())
}

pub(crate) fn run_extract(args: ExtractArgs) -> Result<(), AppError> {
    let workflow = IntentWorkflow::new(Arc::new(KeywordIntentModel));
    let extraction = workflow.extract(&args.query, args.enrich);

    println!("{}", to_json(&extraction)?);

    if extraction.is_unrecoverable() {
        let reason = extraction.error.unwrap_or_else(|| "unknown".to_string());
        return Err(AppError::Io(std::io::Error::other(format!(
            "intent extraction failed: {reason}"
        ))));
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        dataset,
        query,
        shortlist,
    } = args;

    println!("Venue Scout demo");
    let graph = load_graph(dataset.as_deref())?;
    println!(
        "- Venue graph: {} venues across {} buildings",
        graph.venue_count(),
        graph.building_count()
    );

    println!("\nStep 1: intent extraction");
    println!("  Query: {query}");
    let workflow = IntentWorkflow::new(Arc::new(KeywordIntentModel));
    let extraction = workflow.extract(&query, true);
    render_extraction(&extraction);

    println!("\nStep 2: venue ranking");
    let mut request = MatchRequest::new(
        extraction.requirements.clone(),
        extraction.attendees.unwrap_or(0),
    );
    request.shortlist = shortlist;

    let service = MatchService::new(Arc::new(graph));
    let outcome = service.rank(&request)?;
    render_outcome(&outcome);

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Io(std::io::Error::other(err)))
}

fn render_extraction(extraction: &IntentExtraction) {
    println!(
        "  Organizer: {}",
        extraction.organizer.as_deref().unwrap_or("(unknown)")
    );
    println!(
        "  Event type: {}",
        extraction.event_type.as_deref().unwrap_or("(unknown)")
    );
    match extraction.attendees {
        Some(attendees) => println!("  Attendees: {attendees}"),
        None => println!("  Attendees: (unknown)"),
    }
    println!("  Requirements: {}", extraction.requirements.join(", "));
    if !extraction.constraints.is_empty() {
        println!("  Constraints: {}", extraction.constraints.join("; "));
    }
    if let Some(error) = &extraction.error {
        println!("  Validation notes: {error}");
    }
}

fn render_outcome(outcome: &MatchOutcome) {
    if outcome.ranked.is_empty() {
        println!("  No venue passed the capacity and coverage filters.");
    }
    for (rank, row) in outcome.ranked.iter().enumerate() {
        println!(
            "  {}. {} (cap {}) score {} | coverage {} | slack {}",
            rank + 1,
            row.venue,
            row.capacity,
            row.score,
            row.coverage,
            row.slack
        );
        if !row.missing_list.is_empty() {
            println!("     missing: {}", row.missing_list.join(", "));
        }
    }
    println!("\n{}", outcome.explanation.text_information);
}
