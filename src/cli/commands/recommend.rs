//! ffcs recommend - Filter and rank instructors

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::engine::{ItemResult, RankingMode, RecommendRequest};
use crate::error::{FfcsError, Result};
use crate::utils::{format_score, truncate_string};

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Course code filter (case-insensitive substring, e.g. CSE1004)
    #[arg(long)]
    pub course_code: Option<String>,

    /// Slot filter (case-insensitive substring, e.g. A1)
    #[arg(long)]
    pub slot: Option<String>,

    /// Filter on any attribute column: NAME=VALUE (repeatable)
    #[arg(long = "attr", value_name = "NAME=VALUE")]
    pub attributes: Vec<String>,

    /// Required style tag (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Free-text description of the instructor you want
    #[arg(long)]
    pub query: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'n', allow_negative_numbers = true)]
    pub top_n: Option<i64>,
}

#[derive(Serialize)]
struct RecommendOutput<'a> {
    mode: RankingMode,
    count: usize,
    request: &'a RecommendRequest,
    results: Vec<ItemResult>,
}

pub fn run(ctx: &AppContext, args: &RecommendArgs) -> Result<()> {
    let request = build_request(ctx, args)?;
    let engine = ctx.engine()?;
    let results = engine.recommend(&request)?;

    if ctx.robot() {
        let output = RecommendOutput {
            mode: request.mode(),
            count: results.len(),
            request: &request,
            results,
        };
        return emit_robot(&robot_ok(output));
    }

    emit_human(render(&request, &results));
    Ok(())
}

/// Validate CLI input into an engine request.
pub fn build_request(ctx: &AppContext, args: &RecommendArgs) -> Result<RecommendRequest> {
    #[allow(clippy::cast_possible_wrap)]
    let default_top_n = ctx.config.recommend.default_top_n as i64;
    validate(args)?;
    let top_n = args.top_n.unwrap_or(default_top_n);

    let mut request = RecommendRequest::new().top_n(top_n);
    if let Some(code) = &args.course_code {
        request = request.course_code(code.as_str());
    }
    if let Some(slot) = &args.slot {
        request = request.slot(slot.as_str());
    }
    for raw in &args.attributes {
        let (name, value) = parse_attribute(raw)?;
        request = request.attribute(name, value);
    }
    request = request.tags(args.tags.iter().map(String::as_str));
    if let Some(query) = &args.query {
        request = request.query(query.as_str());
    }
    Ok(request)
}

/// Reject malformed flags before any catalog work happens.
pub fn validate(args: &RecommendArgs) -> Result<()> {
    if let Some(top_n) = args.top_n.filter(|n| *n < 0) {
        return Err(FfcsError::InvalidRequest(format!(
            "top_n must be >= 0 (got {top_n})"
        )));
    }
    for raw in &args.attributes {
        parse_attribute(raw)?;
    }
    Ok(())
}

fn parse_attribute(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(FfcsError::InvalidRequest(format!(
            "attribute filter must be NAME=VALUE (got {raw:?})"
        ))),
    }
}

fn render(request: &RecommendRequest, results: &[ItemResult]) -> HumanLayout {
    let semantic = request.mode() == RankingMode::Semantic;
    let mut layout = HumanLayout::new();
    layout.title("Recommendations");
    if let Some(query) = request.query_text() {
        layout.kv("Query", query);
    }
    layout.kv("Ranked by", if semantic { "similarity" } else { "rating" });
    layout.kv("Results", &results.len().to_string());
    layout.blank();

    if results.is_empty() {
        layout.push_line("No instructors match these filters.");
        return layout;
    }

    for (rank, result) in results.iter().enumerate() {
        let attributes = result
            .attributes
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        layout.push_line(format!(
            "{:>2}. {} ({}) {}",
            rank + 1,
            result.name,
            result.department,
            attributes
        ));
        let mut detail = format!("    rating {:.1}", result.quality_score);
        if semantic {
            detail.push_str(&format!("  similarity {}", format_score(result.score, true)));
        }
        detail.push_str(&format!("  [{}]", truncate_string(&result.tags, 60)));
        layout.push_line(detail);
    }
    layout
}
