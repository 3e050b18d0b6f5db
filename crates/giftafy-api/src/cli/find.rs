//! `giftafy find`: questionnaire, search, and the results table.

use std::time::Duration;

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;

use giftafy_core::form::{FormStep, GiftFinderForm, StepAnswers};
use giftafy_core::search::filter::{PriceBucket, SortKey};
use giftafy_core::search::results::ResultsView;
use giftafy_core::search::service::{GiftSearchService, ResultSource};
use giftafy_infra::http::client::HttpGiftFunctions;
use giftafy_types::error::{SaveError, SearchError};
use giftafy_types::gift::GiftRecord;
use giftafy_types::query::{AgeRange, BUDGET_OPTIONS, GiftQuery, Occasion, Relationship};

use crate::state::ClientContext;

/// Shown instead of results when the hosted search refuses for quota.
pub const QUOTA_MESSAGE: &str =
    "You've reached your daily search limit. Upgrade your plan or try again tomorrow.";

#[derive(clap::Args)]
pub struct FindArgs {
    /// Who the gift is for (Friend, Family Member, Partner, Colleague, Child, Other).
    #[arg(long)]
    pub relationship: Option<Relationship>,

    /// Recipient age range (Under 18, 18-25, 26-35, 36-45, 46-60, 60+).
    #[arg(long)]
    pub age: Option<AgeRange>,

    /// Occasion (Birthday, Anniversary, Wedding, Christmas, Graduation, Just Because, Other).
    #[arg(long)]
    pub occasion: Option<Occasion>,

    /// Free-text interests, e.g. "cooking".
    #[arg(long)]
    pub interests: Option<String>,

    /// Budget label, e.g. "$50-$100", "Under $25", "$500+".
    #[arg(long)]
    pub budget: Option<String>,

    /// Base URL of a giftafy server to search through.
    #[arg(long, env = "GIFTAFY_REMOTE")]
    pub remote: Option<String>,

    /// Bearer token for the server (see `giftafy account login`).
    #[arg(long, env = "GIFTAFY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Only show gifts whose title contains this text.
    #[arg(long)]
    pub text: Option<String>,

    /// Price bucket (all, under50, 50to100, 100to250, over250).
    #[arg(long)]
    pub price: Option<PriceBucket>,

    /// Sort order (match, priceAsc, priceDesc, popularity).
    #[arg(long)]
    pub sort: Option<String>,

    /// Maximum number of results.
    #[arg(long)]
    pub limit: Option<usize>,
}

impl FindArgs {
    /// The query described by flags, or `None` when no question was answered
    /// on the command line.
    pub fn flag_query(&self) -> Option<GiftQuery> {
        if self.relationship.is_none()
            && self.age.is_none()
            && self.occasion.is_none()
            && self.interests.is_none()
            && self.budget.is_none()
        {
            return None;
        }

        let mut query = GiftQuery::default();
        if let Some(relationship) = self.relationship {
            query.relationship = relationship;
        }
        if let Some(age) = self.age {
            query.age_range = age;
        }
        if let Some(occasion) = self.occasion {
            query.occasion = occasion;
        }
        if let Some(interests) = &self.interests {
            query.interests = interests.clone();
        }
        if let Some(budget) = &self.budget {
            query.budget_label = budget.clone();
        }
        Some(query)
    }

    fn remote_client(&self, ctx: &ClientContext) -> Result<Option<HttpGiftFunctions>> {
        let Some(endpoint) = self.remote.as_ref().or(ctx.config.remote.endpoint.as_ref()) else {
            return Ok(None);
        };

        let mut client = HttpGiftFunctions::new(endpoint, ctx.config.remote.timeout_secs)?;
        if let Some(token) = &self.token {
            client = client.with_access_token(SecretString::from(token.clone()));
        }
        Ok(Some(client))
    }
}

/// Run a gift search and show the results.
///
/// # Examples
///
/// ```bash
/// # Interactive questionnaire
/// giftafy find
///
/// # One-shot with flags
/// giftafy find --relationship friend --occasion birthday --interests cooking --budget '$50-$100'
/// ```
pub async fn run(ctx: &ClientContext, args: FindArgs, json: bool) -> Result<()> {
    let interactive = args.flag_query().is_none() && !json;
    let query = match args.flag_query() {
        Some(query) => query,
        None if json => GiftQuery::default(),
        None => questionnaire()?,
    };

    let service = GiftSearchService::new(args.remote_client(ctx)?, ctx.catalog.clone())
        .with_local_latency(Duration::from_millis(ctx.config.search.local_latency_ms))
        .with_max_results(args.limit.or(ctx.config.search.max_results));
    let saver = args.remote_client(ctx)?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message("Finding gifts...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = service.search(&query).await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(SearchError::QuotaExceeded) => bail!(QUOTA_MESSAGE),
        Err(e) => return Err(e.into()),
    };

    let mut view = ResultsView::new(service.generations());
    view.accept(outcome);
    view.set_text(args.text.clone());
    if let Some(bucket) = args.price {
        view.set_price_bucket(bucket);
    }
    if let Some(sort) = &args.sort {
        view.set_sort_key(SortKey::parse(sort));
    }

    if json {
        let output = serde_json::json!({
            "phrase": view.outcome().map(|o| o.phrase.as_str()),
            "budget": view.outcome().map(|o| o.budget),
            "source": view.source(),
            "warning": view.warning(),
            "options": view.options(),
            "gifts": view.visible(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    render_results(&view);

    if interactive {
        refine(&mut view, saver.as_ref()).await?;
    }

    Ok(())
}

/// Walk the three questionnaire steps, pre-selecting the current answers.
fn questionnaire() -> Result<GiftQuery> {
    let mut form = GiftFinderForm::new();

    loop {
        println!();
        println!(
            "  {} {}",
            style(format!("Step {}/{}", form.step().index() + 1, FormStep::ALL.len())).dim(),
            style(form.step().label()).bold()
        );

        let answers = match form.step() {
            FormStep::Recipient => {
                let current = form.query();
                let relationship = Relationship::ALL[select(
                    "Who is the gift for?",
                    &Relationship::ALL.map(|r| r.label()),
                    Relationship::ALL.iter().position(|r| *r == current.relationship),
                )?];
                let age_range = AgeRange::ALL[select(
                    "Their age range",
                    &AgeRange::ALL.map(|a| a.label()),
                    AgeRange::ALL.iter().position(|a| *a == current.age_range),
                )?];
                StepAnswers::Recipient {
                    relationship: Some(relationship),
                    age_range: Some(age_range),
                }
            }
            FormStep::Occasion => {
                let current = form.query();
                let occasion = Occasion::ALL[select(
                    "What's the occasion?",
                    &Occasion::ALL.map(|o| o.label()),
                    Occasion::ALL.iter().position(|o| *o == current.occasion),
                )?];
                let interests: String = Input::new()
                    .with_prompt("Their interests (optional)")
                    .default(current.interests.clone())
                    .allow_empty(true)
                    .interact_text()?;
                StepAnswers::Occasion {
                    occasion: Some(occasion),
                    interests: Some(interests),
                }
            }
            FormStep::Budget => {
                let current = form.query();
                let budget = BUDGET_OPTIONS[select(
                    "Budget",
                    &BUDGET_OPTIONS,
                    BUDGET_OPTIONS.iter().position(|b| *b == current.budget_label),
                )?];
                StepAnswers::Budget {
                    budget_label: Some(budget.to_string()),
                }
            }
        };

        if let Some(query) = form.submit_step(answers) {
            return Ok(query);
        }
    }
}

fn select(prompt: &str, items: &[&str], current: Option<usize>) -> Result<usize> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(current.unwrap_or(0))
        .interact()?)
}

fn render_results(view: &ResultsView) {
    let gifts = view.visible();

    println!();
    if let Some(outcome) = view.outcome() {
        let source = match outcome.source {
            ResultSource::Remote => "live search",
            ResultSource::Catalog => "local catalog",
        };
        println!(
            "  {} {}  {}",
            style("🎁").bold(),
            style(&outcome.phrase).cyan().bold(),
            style(format!("({source})")).dim()
        );
    }
    if let Some(warning) = view.warning() {
        println!("  {} {}", style("!").yellow().bold(), style(warning).yellow());
    }
    println!();

    if gifts.is_empty() {
        println!(
            "  {} No gifts found. Try a different budget or fewer filters.",
            style("i").blue().bold()
        );
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Gift").fg(Color::White),
        Cell::new("Price").fg(Color::White),
        Cell::new("Retailer").fg(Color::White),
        Cell::new("Rating").fg(Color::White),
        Cell::new("Match").fg(Color::White),
    ]);

    for (i, gift) in gifts.iter().enumerate() {
        let mut title = gift.title.clone();
        if gift.is_trending {
            title.push_str(" 🔥");
        }
        if view.is_saved(gift) {
            title.push_str(" ✓");
        }
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(title),
            Cell::new(price_label(gift)).fg(Color::Green),
            Cell::new(&gift.retailer),
            Cell::new(format!("{:.1} ({})", gift.rating, gift.reviews)),
            Cell::new(format!("{}%", gift.match_score)).fg(match_color(gift.match_score)),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} gift{} shown",
        style(gifts.len()).bold(),
        if gifts.len() == 1 { "" } else { "s" }
    );
    println!();
}

fn price_label(gift: &GiftRecord) -> String {
    match &gift.original_price {
        Some(original) => format!("{} (was {original})", gift.price),
        None => gift.price.clone(),
    }
}

fn match_color(score: u8) -> Color {
    match score {
        90.. => Color::Green,
        75..=89 => Color::Yellow,
        _ => Color::DarkGrey,
    }
}

/// Interactive filter, sort and save actions on the shown results.
async fn refine(view: &mut ResultsView, saver: Option<&HttpGiftFunctions>) -> Result<()> {
    const ACTIONS: [&str; 6] = [
        "Filter by title",
        "Price range",
        "Sort",
        "Save a gift",
        "Save as favorite",
        "Done",
    ];

    loop {
        match Select::new()
            .with_prompt("What next?")
            .items(&ACTIONS)
            .default(ACTIONS.len() - 1)
            .interact()?
        {
            0 => {
                let text: String = Input::new()
                    .with_prompt("Title contains (empty to clear)")
                    .allow_empty(true)
                    .interact_text()?;
                let text = text.trim();
                view.set_text((!text.is_empty()).then(|| text.to_string()));
            }
            1 => {
                let buckets = PriceBucket::ALL.map(|b| b.as_str());
                let current = PriceBucket::ALL
                    .iter()
                    .position(|b| *b == view.options().price_bucket);
                view.set_price_bucket(PriceBucket::ALL[select("Price range", &buckets, current)?]);
            }
            2 => {
                let keys = [
                    SortKey::Match,
                    SortKey::PriceAsc,
                    SortKey::PriceDesc,
                    SortKey::Popularity,
                ];
                let labels = keys.clone().map(|k| k.to_string());
                let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
                let current = keys.iter().position(|k| *k == view.options().sort_key);
                let choice = select("Sort by", &labels, current)?;
                view.set_sort_key(keys[choice].clone());
            }
            action @ (3 | 4) => {
                save_interactive(view, saver, action == 4).await?;
            }
            _ => return Ok(()),
        }
        render_results(view);
    }
}

async fn save_interactive(
    view: &mut ResultsView,
    saver: Option<&HttpGiftFunctions>,
    is_favorite: bool,
) -> Result<()> {
    let Some(saver) = saver else {
        println!(
            "  {} Saving needs a server. Pass {} and {}.",
            style("i").blue().bold(),
            style("--remote").yellow(),
            style("--token").yellow()
        );
        return Ok(());
    };

    let gifts = view.visible();
    if gifts.is_empty() {
        return Ok(());
    }
    let titles: Vec<&str> = gifts.iter().map(|g| g.title.as_str()).collect();
    let gift = &gifts[select("Which gift?", &titles, None)?];

    match view.save(saver, gift, is_favorite).await {
        Ok(saved) => {
            println!(
                "  {} Saved {}{}",
                style("✓").green().bold(),
                style(&saved.gift.title).cyan(),
                if saved.is_favorite { " as a favorite" } else { "" }
            );
        }
        Err(SaveError::AuthenticationRequired) => {
            println!(
                "  {} Sign in to save gifts: {}",
                style("!").yellow().bold(),
                style("giftafy account login <email>").yellow()
            );
        }
        Err(SaveError::CapabilityDenied) => {
            println!(
                "  {} Favorites are a Pro feature. Upgrade your plan to keep favorites.",
                style("★").yellow().bold()
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "save failed");
            println!(
                "  {} Couldn't save that gift right now. Please try again.",
                style("✗").red().bold()
            );
        }
    }
    Ok(())
}
