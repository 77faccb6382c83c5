//! Transaction building commands.
//!
//! Each subcommand prints the intent as wallet-standard JSON on stdout, ready
//! to be handed to a wallet or a sponsor service.

use crate::common::{self, GlobalOpts};
use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use suitudy_sdk::transaction::NewLecture;
use suitudy_sdk::{CoinHolding, ObjectId, TransactionIntent};
use tracing::debug;

/// Transaction building commands.
#[derive(clap::Subcommand, Debug)]
pub enum BuildCommand {
    /// Buy tokens with SUI taken from the gas coin
    BuyToken(BuyTokenArgs),
    /// Sell tokens back to the bank
    SellToken(SellTokenArgs),
    /// List a new lecture for sale
    ListLecture(ListLectureArgs),
    /// Buy access to a lecture
    BuyLecture(BuyLectureArgs),
    /// Delete a lecture you listed
    DeleteLecture(LectureArgs),
    /// Burn a lecture pass you own
    BurnPass(PassArgs),
}

/// Where a payment's coins come from.
#[derive(Args, Debug)]
pub struct PaymentArgs {
    /// Token coin to pay from, as <coin-object-id>:<amount> (repeatable)
    #[arg(long = "coin", value_name = "ID:AMOUNT")]
    coins: Vec<String>,

    /// Fetch the owner's token coins from the ledger instead of --coin
    #[arg(long)]
    owner: Option<String>,
}

#[derive(Args, Debug)]
pub struct BuyTokenArgs {
    /// Amount of SUI to spend, e.g. 0.1
    #[arg(long)]
    amount: String,

    /// Sender address recorded in the intent
    #[arg(long)]
    sender: Option<String>,
}

#[derive(Args, Debug)]
pub struct SellTokenArgs {
    /// Amount of tokens to sell
    #[arg(long)]
    amount: String,

    #[command(flatten)]
    payment: PaymentArgs,

    /// Sender address recorded in the intent
    #[arg(long)]
    sender: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListLectureArgs {
    /// Lecture title
    #[arg(long)]
    title: String,

    /// Lecture description
    #[arg(long)]
    description: String,

    /// Cover image URL
    #[arg(long)]
    image_url: String,

    /// URL of the gated content
    #[arg(long)]
    content_url: String,

    /// Price in tokens
    #[arg(long)]
    price: String,

    /// Sender address recorded in the intent
    #[arg(long)]
    sender: Option<String>,
}

#[derive(Args, Debug)]
pub struct BuyLectureArgs {
    /// Lecture object id
    #[arg(long)]
    lecture: String,

    /// Lecture price in tokens
    #[arg(long)]
    price: String,

    #[command(flatten)]
    payment: PaymentArgs,

    /// Sender address recorded in the intent
    #[arg(long)]
    sender: Option<String>,
}

#[derive(Args, Debug)]
pub struct LectureArgs {
    /// Lecture object id
    #[arg(long)]
    lecture: String,

    /// Sender address recorded in the intent
    #[arg(long)]
    sender: Option<String>,
}

#[derive(Args, Debug)]
pub struct PassArgs {
    /// Lecture pass object id
    #[arg(long)]
    pass: String,

    /// Sender address recorded in the intent
    #[arg(long)]
    sender: Option<String>,
}

impl BuildCommand {
    pub async fn run(&self, global: &GlobalOpts) -> Result<()> {
        let target = global.package_target()?;

        let (intent, sender) = match self {
            BuildCommand::BuyToken(args) => {
                let amount = common::parse_amount(&args.amount)?;
                (target.buy_token(amount)?, &args.sender)
            }
            BuildCommand::SellToken(args) => {
                let amount = common::parse_amount(&args.amount)?;
                let holdings = resolve_holdings(&args.payment, global).await?;
                (target.sell_token(amount, &holdings)?, &args.sender)
            }
            BuildCommand::ListLecture(args) => {
                let lecture = NewLecture::new(
                    args.title.as_str(),
                    args.description.as_str(),
                    args.image_url.as_str(),
                    args.content_url.as_str(),
                    common::parse_amount(&args.price)?,
                )?;
                (target.list_lecture(&lecture)?, &args.sender)
            }
            BuildCommand::BuyLecture(args) => {
                let price = common::parse_amount(&args.price)?;
                let holdings = resolve_holdings(&args.payment, global).await?;
                let lecture = ObjectId::new(args.lecture.as_str());
                (target.buy_lecture(&lecture, price, &holdings)?, &args.sender)
            }
            BuildCommand::DeleteLecture(args) => {
                let lecture = ObjectId::new(args.lecture.as_str());
                (target.delete_lecture(&lecture)?, &args.sender)
            }
            BuildCommand::BurnPass(args) => {
                let pass = ObjectId::new(args.pass.as_str());
                (target.burn_pass(&pass)?, &args.sender)
            }
        };

        print_intent(intent, sender)
    }
}

/// Returns the holdings named with `--coin`, or the owner's token coins.
async fn resolve_holdings(payment: &PaymentArgs, global: &GlobalOpts) -> Result<Vec<CoinHolding>> {
    if !payment.coins.is_empty() {
        return payment
            .coins
            .iter()
            .map(|coin| common::parse_holding(coin))
            .collect();
    }

    let Some(owner) = &payment.owner else {
        anyhow::bail!("No coins to pay with. Pass --coin <ID:AMOUNT> or --owner <0x...>.");
    };
    let owner = common::parse_address(owner)?;
    let holdings = global
        .marketplace()?
        .token_holdings(&owner)
        .await
        .context("failed to fetch token coins")?;
    debug!(owner = %owner, coins = holdings.len(), "Fetched token holdings");
    if holdings.is_empty() {
        output::print_warning(&format!("{owner} holds no SUITUDY coins"));
    }
    Ok(holdings)
}

fn print_intent(mut intent: TransactionIntent, sender: &Option<String>) -> Result<()> {
    if let Some(sender) = sender {
        intent.set_sender(common::parse_address(sender)?);
    }
    let value = intent.to_json_value()?;
    output::print_json(&value)
}
