//! Read-side marketplace queries.

use crate::common::{self, GlobalOpts};
use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use suitudy_sdk::ObjectId;
use suitudy_sdk::marketplace::LectureListing;

/// Marketplace query commands.
#[derive(clap::Subcommand, Debug)]
pub enum QueryCommand {
    /// Show an account's token balance
    Balance(OwnerArgs),
    /// List an account's token coins
    Coins(OwnerArgs),
    /// List the lectures currently for sale
    Listings,
    /// List the live lectures an instructor has listed
    Instructor(OwnerArgs),
    /// List the lecture passes an account owns
    Passes(OwnerArgs),
    /// Show the pass an account holds for one lecture
    Pass(PassQueryArgs),
}

#[derive(Args, Debug)]
pub struct OwnerArgs {
    /// Account address
    #[arg(long)]
    owner: Option<String>,
}

#[derive(Args, Debug)]
pub struct PassQueryArgs {
    /// Account address
    #[arg(long)]
    owner: Option<String>,

    /// Lecture object id
    #[arg(long)]
    lecture: String,
}

impl QueryCommand {
    pub async fn run(&self, global: &GlobalOpts) -> Result<()> {
        match self {
            QueryCommand::Balance(args) => cmd_balance(args, global).await,
            QueryCommand::Coins(args) => cmd_coins(args, global).await,
            QueryCommand::Listings => cmd_listings(global).await,
            QueryCommand::Instructor(args) => cmd_instructor(args, global).await,
            QueryCommand::Passes(args) => cmd_passes(args, global).await,
            QueryCommand::Pass(args) => cmd_pass(args, global).await,
        }
    }
}

async fn cmd_balance(args: &OwnerArgs, global: &GlobalOpts) -> Result<()> {
    let owner = common::require_address(&args.owner)?;
    let balance = global
        .marketplace()?
        .token_balance(&owner)
        .await
        .context("failed to get token balance")?;

    if global.json {
        output::print_json(&balance)?;
    } else {
        output::print_header("Token Balance");
        output::print_kv("Owner", owner.as_str());
        output::print_kv("Balance", &output::format_tokens(balance.total_balance));
        output::print_kv("Coins", &balance.coin_object_count.to_string());
    }
    Ok(())
}

async fn cmd_coins(args: &OwnerArgs, global: &GlobalOpts) -> Result<()> {
    let owner = common::require_address(&args.owner)?;
    let coins = global
        .marketplace()?
        .token_holdings(&owner)
        .await
        .context("failed to get token coins")?;

    if global.json {
        output::print_json(&coins)?;
    } else {
        output::print_header(&format!("Token Coins ({})", coins.len()));
        for coin in &coins {
            output::print_kv(coin.coin_object_id.as_str(), &output::format_tokens(coin.balance));
        }
    }
    Ok(())
}

async fn cmd_listings(global: &GlobalOpts) -> Result<()> {
    let listings = global
        .marketplace()?
        .listings()
        .await
        .context("failed to load listings")?;
    print_listings("Lectures For Sale", &listings, global.json)
}

async fn cmd_instructor(args: &OwnerArgs, global: &GlobalOpts) -> Result<()> {
    let instructor = common::require_address(&args.owner)?;
    let listings = global
        .marketplace()?
        .instructor_listings(&instructor)
        .await
        .context("failed to load instructor listings")?;
    print_listings(&format!("Lectures by {}", instructor.to_short_string()), &listings, global.json)
}

fn print_listings(title: &str, listings: &[LectureListing], json: bool) -> Result<()> {
    if json {
        return output::print_json(listings);
    }
    output::print_header(&format!("{title} ({})", listings.len()));
    for listing in listings {
        output::print_kv(listing.id.as_str(), &listing.title);
        output::print_kv("  Price", &output::format_tokens(listing.price));
        output::print_kv("  Instructor", listing.instructor.as_str());
    }
    Ok(())
}

async fn cmd_passes(args: &OwnerArgs, global: &GlobalOpts) -> Result<()> {
    let owner = common::require_address(&args.owner)?;
    let passes = global
        .marketplace()?
        .passes(&owner)
        .await
        .context("failed to load lecture passes")?;

    if global.json {
        output::print_json(&passes)?;
    } else {
        output::print_header(&format!("Lecture Passes ({})", passes.len()));
        for pass in &passes {
            let label = pass.title.as_deref().unwrap_or(pass.lecture_id.as_str());
            output::print_kv(pass.id.as_str(), label);
        }
    }
    Ok(())
}

async fn cmd_pass(args: &PassQueryArgs, global: &GlobalOpts) -> Result<()> {
    let owner = common::require_address(&args.owner)?;
    let lecture = ObjectId::new(args.lecture.as_str());
    let pass = global
        .marketplace()?
        .pass_for_lecture(&owner, &lecture)
        .await
        .context("failed to load lecture passes")?;

    match (pass, global.json) {
        (Some(pass), true) => output::print_json(&pass)?,
        (None, true) => output::print_json(&serde_json::Value::Null)?,
        (Some(pass), false) => {
            output::print_header("Lecture Pass");
            output::print_kv("Pass", pass.id.as_str());
            output::print_kv("Lecture", pass.lecture_id.as_str());
            output::print_kv("Content", &pass.content_url);
        }
        (None, false) => output::print_warning(&format!("{owner} has no pass for {lecture}")),
    }
    Ok(())
}
