// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn offer_fields(cmd: Command) -> Command {
    cmd.arg(opt("merchant", "Merchant the offer applies to"))
        .arg(opt("percent", "Percent back, e.g. 10").conflicts_with_all(["min-spend", "reward"]))
        .arg(opt("max", "Maximum reward for a percent-back offer"))
        .arg(opt("min-spend", "Minimum spend for a fixed-reward offer"))
        .arg(opt("reward", "Fixed reward once the minimum spend is met"))
        .arg(opt("expires", "Expiration date YYYY-MM-DD"))
}

fn benefit_fields(cmd: Command) -> Command {
    cmd.arg(opt("name", "Benefit name"))
        .arg(opt("amount", "Maximum value per period"))
        .arg(opt("frequency", "monthly|quarterly|annually|once"))
        .arg(opt("filter", "Comma-separated merchant keywords"))
        .arg(opt("expires", "Expiration date YYYY-MM-DD"))
        .arg(opt("balance", "Current balance (defaults to the maximum)"))
}

pub fn build_cli() -> Command {
    Command::new("whatcard")
        .about("Pick the card that pays the most and track perks, offers and annual fees")
        .version(clap::crate_version!())
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Wallet owner (defaults to the configured default user)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(json_flags(
            Command::new("recommend")
                .about("Rank active cards for a purchase")
                .arg(req("merchant", "Merchant name"))
                .arg(req("amount", "Purchase amount"))
                .arg(opt("category", "Spending category (guessed from the merchant if omitted)"))
                .arg(opt("benefit", "Only consider the benefit with this exact name"))
                .arg(
                    Arg::new("use")
                        .long("use")
                        .action(ArgAction::SetTrue)
                        .help("Record the purchase on the chosen card"),
                )
                .arg(
                    Arg::new("pick")
                        .long("pick")
                        .value_parser(value_parser!(usize))
                        .default_value("1")
                        .help("Rank of the card to use with --use (1 = best)"),
                ),
        ))
        .subcommand(
            Command::new("category")
                .about("Category suggestions")
                .subcommand(
                    Command::new("guess")
                        .about("Guess the category of a merchant")
                        .arg(req("merchant", "Merchant name")),
                )
                .subcommand(
                    Command::new("benefit")
                        .about("Category implied by a benefit name")
                        .arg(req("name", "Benefit name")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transaction history")
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List recorded transactions, newest first")
                        .arg(opt("card", "Only this card id"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction and reverse its effects")
                        .arg(req("id", "Transaction id")),
                )
                .subcommand(
                    Command::new("export")
                        .about("Export transactions")
                        .arg(req("format", "csv|json"))
                        .arg(req("out", "Output path")),
                ),
        )
        .subcommand(
            Command::new("offer")
                .about("Merchant offers")
                .subcommand(offer_fields(
                    Command::new("add")
                        .about("Add an offer")
                        .arg(req("card", "Card id"))
                        .arg(opt("id", "Offer id (generated if omitted)")),
                ))
                .subcommand(offer_fields(
                    Command::new("edit")
                        .about("Change an offer")
                        .arg(req("id", "Offer id"))
                        .arg(opt("card", "Move the offer to another card")),
                ))
                .subcommand(json_flags(
                    Command::new("list").about("List offers").arg(
                        Arg::new("eligible")
                            .long("eligible")
                            .action(ArgAction::SetTrue)
                            .help("Only offers that can currently be used"),
                    ),
                ))
                .subcommand(
                    Command::new("used")
                        .about("Mark an offer as used")
                        .arg(req("id", "Offer id")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an offer")
                        .arg(req("id", "Offer id")),
                ),
        )
        .subcommand(
            Command::new("card")
                .about("Cards in the wallet")
                .subcommand(json_flags(Command::new("list").about("List cards")))
                .subcommand(
                    Command::new("toggle")
                        .about("Activate or deactivate a card")
                        .arg(req("id", "Card id")),
                )
                .subcommand(
                    Command::new("fee")
                        .about("Adjust annual fee tracking")
                        .arg(req("id", "Card id"))
                        .arg(opt("balance", "Remaining fee balance"))
                        .arg(opt("total", "Total annual fee"))
                        .arg(opt("date", "Date the fee was last paid (YYYY-MM-DD)")),
                )
                .subcommand(
                    Command::new("renew")
                        .about("Start the next card year")
                        .arg(req("id", "Card id")),
                ),
        )
        .subcommand(
            Command::new("perk")
                .about("Card benefits and balances")
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List benefits with balances")
                        .arg(opt("card", "Only this card id")),
                ))
                .subcommand(benefit_fields(
                    Command::new("add")
                        .about("Add a custom benefit to a card")
                        .arg(req("card", "Card id"))
                        .arg(opt("id", "Benefit id (generated if omitted)")),
                ))
                .subcommand(benefit_fields(
                    Command::new("edit")
                        .about("Change a benefit")
                        .arg(req("card", "Card id"))
                        .arg(req("id", "Benefit id")),
                ))
                .subcommand(
                    Command::new("set")
                        .about("Set the remaining balance of a benefit")
                        .arg(req("id", "Benefit id"))
                        .arg(req("balance", "New balance")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a benefit")
                        .arg(req("card", "Card id"))
                        .arg(req("id", "Benefit id")),
                ),
        )
        .subcommand(
            Command::new("state")
                .about("Whole-wallet snapshot")
                .subcommand(Command::new("show").about("Print the snapshot as JSON"))
                .subcommand(
                    Command::new("export")
                        .about("Write the snapshot to a file")
                        .arg(req("out", "Output path")),
                )
                .subcommand(
                    Command::new("import")
                        .about("Replace the snapshot from a file")
                        .arg(req("file", "Snapshot JSON file")),
                )
                .subcommand(Command::new("reset").about("Discard saved data and start fresh")),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(
                    Command::new("get")
                        .about("Read a setting")
                        .arg(req("key", "Setting key")),
                )
                .subcommand(
                    Command::new("set")
                        .about("Write a setting")
                        .arg(req("key", "Setting key"))
                        .arg(req("value", "Setting value")),
                ),
        )
}
